//! Float helpers
//!
//! Layout math uses `f32::NAN` as the "undefined" sentinel; any arithmetic
//! touching an undefined value yields undefined. These helpers make the
//! sentinel explicit and give comparisons a fixed tolerance.

/// Tolerance for float comparisons throughout the engine.
pub const EPSILON: f32 = 0.0001;

pub fn is_undefined(value: f32) -> bool {
    value.is_nan()
}

pub fn is_defined(value: f32) -> bool {
    !value.is_nan()
}

/// Equality within [`EPSILON`]. Two undefined values compare equal.
pub fn floats_equal(a: f32, b: f32) -> bool {
    if is_defined(a) && is_defined(b) {
        (a - b).abs() < EPSILON
    } else {
        is_undefined(a) && is_undefined(b)
    }
}

/// Max that prefers the defined operand over an undefined one.
pub fn float_max(a: f32, b: f32) -> f32 {
    if is_defined(a) && is_defined(b) {
        a.max(b)
    } else if is_undefined(a) {
        b
    } else {
        a
    }
}

/// Min that prefers the defined operand over an undefined one.
pub fn float_min(a: f32, b: f32) -> f32 {
    if is_defined(a) && is_defined(b) {
        a.min(b)
    } else if is_undefined(a) {
        b
    } else {
        a
    }
}

/// Undefined collapses to zero; used when writing final layout fields.
pub fn float_sanitize(value: f32) -> f32 {
    if is_undefined(value) { 0.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floats_equal_tolerance() {
        assert!(floats_equal(1.0, 1.00005));
        assert!(!floats_equal(1.0, 1.001));
        assert!(floats_equal(f32::NAN, f32::NAN));
        assert!(!floats_equal(f32::NAN, 1.0));
    }

    #[test]
    fn test_max_min_prefer_defined() {
        assert_eq!(float_max(f32::NAN, 3.0), 3.0);
        assert_eq!(float_max(5.0, f32::NAN), 5.0);
        assert_eq!(float_min(f32::NAN, 3.0), 3.0);
        assert!(float_max(f32::NAN, f32::NAN).is_nan());
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(float_sanitize(f32::NAN), 0.0);
        assert_eq!(float_sanitize(-2.5), -2.5);
    }
}
