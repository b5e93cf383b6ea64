//! Style Values
//!
//! A style length is either undefined, `auto`, an absolute point value or a
//! percentage of the owner's size. Resolution produces the NaN sentinel for
//! anything that has no concrete answer.

use crate::num;

/// A style length value.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    #[default]
    Undefined,
    Auto,
    Point(f32),
    Percent(f32),
}

impl Value {
    pub const ZERO: Value = Value::Point(0.0);

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Value::Auto)
    }

    /// Resolve against the owner's size. Undefined and auto resolve to the
    /// NaN sentinel, as does a percentage of an undefined owner.
    pub fn resolve(&self, owner_size: f32) -> f32 {
        match *self {
            Value::Point(points) => points,
            Value::Percent(percent) => percent * owner_size * 0.01,
            Value::Undefined | Value::Auto => f32::NAN,
        }
    }

    /// Like [`resolve`](Value::resolve), but `auto` margins resolve to zero.
    /// Their free-space distribution happens during justification instead.
    pub fn resolve_margin(&self, owner_size: f32) -> f32 {
        if self.is_auto() {
            0.0
        } else {
            self.resolve(owner_size)
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Value::Undefined, Value::Undefined) | (Value::Auto, Value::Auto) => true,
            (Value::Point(a), Value::Point(b)) | (Value::Percent(a), Value::Percent(b)) => {
                num::floats_equal(a, b)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_point_and_percent() {
        assert_eq!(Value::Point(10.0).resolve(100.0), 10.0);
        assert_eq!(Value::Percent(50.0).resolve(200.0), 100.0);
        assert!(Value::Percent(50.0).resolve(f32::NAN).is_nan());
        assert!(Value::Auto.resolve(100.0).is_nan());
        assert!(Value::Undefined.resolve(100.0).is_nan());
    }

    #[test]
    fn test_resolve_margin_auto_is_zero() {
        assert_eq!(Value::Auto.resolve_margin(100.0), 0.0);
        assert_eq!(Value::Point(4.0).resolve_margin(100.0), 4.0);
    }

    #[test]
    fn test_equality_epsilon() {
        assert_eq!(Value::Point(1.0), Value::Point(1.00005));
        assert_ne!(Value::Point(1.0), Value::Point(1.01));
        assert_ne!(Value::Point(1.0), Value::Percent(1.0));
        assert_eq!(Value::Undefined, Value::Undefined);
        assert_eq!(Value::Point(f32::NAN), Value::Point(f32::NAN));
    }
}
