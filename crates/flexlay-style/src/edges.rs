//! Edge Sets
//!
//! One `Value` per logical edge, with the precedence cascade used when a
//! physical edge is read back out: specific edge, then horizontal/vertical
//! shorthand, then `all`. `start`/`end` never fall back to `all`.

use crate::{Edge, Value};
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edges([Value; Edge::COUNT]);

impl Edges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the cascade for a physical or logical edge.
    pub fn computed(&self, edge: Edge, default: Value) -> Value {
        if !self[edge].is_undefined() {
            return self[edge];
        }
        match edge {
            Edge::Top | Edge::Bottom if !self[Edge::Vertical].is_undefined() => {
                return self[Edge::Vertical];
            }
            Edge::Left | Edge::Right | Edge::Start | Edge::End
                if !self[Edge::Horizontal].is_undefined() =>
            {
                return self[Edge::Horizontal];
            }
            _ => {}
        }
        if matches!(edge, Edge::Start | Edge::End) {
            return Value::Undefined;
        }
        if !self[Edge::All].is_undefined() {
            return self[Edge::All];
        }
        default
    }
}

impl Index<Edge> for Edges {
    type Output = Value;

    fn index(&self, edge: Edge) -> &Value {
        &self.0[edge as usize]
    }
}

impl IndexMut<Edge> for Edges {
    fn index_mut(&mut self, edge: Edge) -> &mut Value {
        &mut self.0[edge as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_edge_wins() {
        let mut edges = Edges::new();
        edges[Edge::Left] = Value::Point(5.0);
        edges[Edge::Horizontal] = Value::Point(10.0);
        edges[Edge::All] = Value::Point(20.0);
        assert_eq!(edges.computed(Edge::Left, Value::ZERO), Value::Point(5.0));
        assert_eq!(edges.computed(Edge::Right, Value::ZERO), Value::Point(10.0));
        assert_eq!(edges.computed(Edge::Top, Value::ZERO), Value::Point(20.0));
    }

    #[test]
    fn test_vertical_shorthand() {
        let mut edges = Edges::new();
        edges[Edge::Vertical] = Value::Point(7.0);
        assert_eq!(edges.computed(Edge::Top, Value::ZERO), Value::Point(7.0));
        assert_eq!(edges.computed(Edge::Bottom, Value::ZERO), Value::Point(7.0));
        assert_eq!(edges.computed(Edge::Left, Value::ZERO), Value::ZERO);
    }

    #[test]
    fn test_start_end_skip_all() {
        let mut edges = Edges::new();
        edges[Edge::All] = Value::Point(9.0);
        assert_eq!(edges.computed(Edge::Start, Value::ZERO), Value::Undefined);
        assert_eq!(edges.computed(Edge::End, Value::ZERO), Value::Undefined);
        assert_eq!(edges.computed(Edge::Left, Value::ZERO), Value::Point(9.0));

        edges[Edge::Horizontal] = Value::Point(3.0);
        assert_eq!(edges.computed(Edge::Start, Value::ZERO), Value::Point(3.0));
    }

    #[test]
    fn test_default_when_nothing_set() {
        let edges = Edges::new();
        assert_eq!(edges.computed(Edge::Top, Value::Point(1.0)), Value::Point(1.0));
        assert_eq!(edges.computed(Edge::Start, Value::Point(1.0)), Value::Undefined);
    }
}
