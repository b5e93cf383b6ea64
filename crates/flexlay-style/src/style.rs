//! Node Style
//!
//! The full set of layout properties for one node, plus the resolution
//! helpers the layout pass leans on: leading/trailing margins, padding and
//! border per axis, positional insets, gap lookup and the flex shorthand
//! rules.

use crate::num;
use crate::{Align, Direction, Display, Edge, Edges, FlexDirection, Gutter, Justify, Overflow,
            PositionType, Value, Wrap};
use crate::Dim;

/// Per-node style. A plain value type; comparing two styles is structural,
/// with NaN-valued unset fields comparing equal to themselves.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub direction: Direction,
    pub flex_direction: FlexDirection,
    pub justify_content: Justify,
    pub align_content: Align,
    pub align_items: Align,
    pub align_self: Align,
    pub position_type: PositionType,
    pub flex_wrap: Wrap,
    pub overflow: Overflow,
    pub display: Display,
    /// Shorthand feeding grow/shrink/basis resolution. NaN when unset.
    pub flex: f32,
    /// NaN when unset; resolves to 0 by default.
    pub flex_grow: f32,
    /// NaN when unset; resolves to 0 (1 under web defaults).
    pub flex_shrink: f32,
    pub flex_basis: Value,
    pub margin: Edges,
    pub position: Edges,
    pub padding: Edges,
    pub border: Edges,
    pub gap: [Value; Gutter::COUNT],
    pub dimensions: [Value; Dim::COUNT],
    pub min_dimensions: [Value; Dim::COUNT],
    pub max_dimensions: [Value; Dim::COUNT],
    /// Width / height. NaN when unset.
    pub aspect_ratio: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            direction: Direction::Inherit,
            flex_direction: FlexDirection::Column,
            justify_content: Justify::FlexStart,
            align_content: Align::FlexStart,
            align_items: Align::Stretch,
            align_self: Align::Auto,
            position_type: PositionType::Relative,
            flex_wrap: Wrap::NoWrap,
            overflow: Overflow::Visible,
            display: Display::Flex,
            flex: f32::NAN,
            flex_grow: f32::NAN,
            flex_shrink: f32::NAN,
            flex_basis: Value::Auto,
            margin: Edges::new(),
            position: Edges::new(),
            padding: Edges::new(),
            border: Edges::new(),
            gap: [Value::Undefined; Gutter::COUNT],
            dimensions: [Value::Undefined; Dim::COUNT],
            min_dimensions: [Value::Undefined; Dim::COUNT],
            max_dimensions: [Value::Undefined; Dim::COUNT],
            aspect_ratio: f32::NAN,
        }
    }
}

impl PartialEq for Style {
    fn eq(&self, other: &Self) -> bool {
        self.direction == other.direction
            && self.flex_direction == other.flex_direction
            && self.justify_content == other.justify_content
            && self.align_content == other.align_content
            && self.align_items == other.align_items
            && self.align_self == other.align_self
            && self.position_type == other.position_type
            && self.flex_wrap == other.flex_wrap
            && self.overflow == other.overflow
            && self.display == other.display
            && num::floats_equal(self.flex, other.flex)
            && num::floats_equal(self.flex_grow, other.flex_grow)
            && num::floats_equal(self.flex_shrink, other.flex_shrink)
            && self.flex_basis == other.flex_basis
            && self.margin == other.margin
            && self.position == other.position
            && self.padding == other.padding
            && self.border == other.border
            && self.gap == other.gap
            && self.dimensions == other.dimensions
            && self.min_dimensions == other.min_dimensions
            && self.max_dimensions == other.max_dimensions
            && num::floats_equal(self.aspect_ratio, other.aspect_ratio)
    }
}

impl Style {
    /// Defaults matching web browsers: row direction, stretched lines.
    pub fn web_default() -> Self {
        Self {
            flex_direction: FlexDirection::Row,
            align_content: Align::Stretch,
            ..Self::default()
        }
    }

    pub fn dimension(&self, dim: Dim) -> Value {
        self.dimensions[dim as usize]
    }

    pub fn min_dimension(&self, dim: Dim) -> Value {
        self.min_dimensions[dim as usize]
    }

    pub fn max_dimension(&self, dim: Dim) -> Value {
        self.max_dimensions[dim as usize]
    }

    // ---- flex shorthand resolution ----

    pub fn resolve_flex_grow(&self) -> f32 {
        if num::is_defined(self.flex_grow) {
            return self.flex_grow;
        }
        if num::is_defined(self.flex) && self.flex > 0.0 {
            return self.flex;
        }
        0.0
    }

    pub fn resolve_flex_shrink(&self, use_web_defaults: bool) -> f32 {
        if num::is_defined(self.flex_shrink) {
            return self.flex_shrink;
        }
        if !use_web_defaults && num::is_defined(self.flex) && self.flex < 0.0 {
            return -self.flex;
        }
        if use_web_defaults { 1.0 } else { 0.0 }
    }

    pub fn resolve_flex_basis(&self, use_web_defaults: bool) -> Value {
        if !self.flex_basis.is_auto() && !self.flex_basis.is_undefined() {
            return self.flex_basis;
        }
        if num::is_defined(self.flex) && self.flex > 0.0 {
            return if use_web_defaults { Value::Auto } else { Value::ZERO };
        }
        Value::Auto
    }

    pub fn is_flexible(&self, use_web_defaults: bool) -> bool {
        self.position_type != PositionType::Absolute
            && (self.resolve_flex_grow() != 0.0 || self.resolve_flex_shrink(use_web_defaults) != 0.0)
    }

    // ---- margins ----

    /// Raw leading margin value; `start` overrides the physical edge on row
    /// axes. Shorthand slots are deliberately not consulted here, so an auto
    /// set via `horizontal`/`all` does not count as an auto margin.
    pub fn margin_leading_value(&self, axis: FlexDirection) -> Value {
        if axis.is_row() && !self.margin[Edge::Start].is_undefined() {
            self.margin[Edge::Start]
        } else {
            self.margin[axis.leading_edge()]
        }
    }

    pub fn margin_trailing_value(&self, axis: FlexDirection) -> Value {
        if axis.is_row() && !self.margin[Edge::End].is_undefined() {
            self.margin[Edge::End]
        } else {
            self.margin[axis.trailing_edge()]
        }
    }

    pub fn leading_margin(&self, axis: FlexDirection, width_size: f32) -> f32 {
        if axis.is_row() && !self.margin[Edge::Start].is_undefined() {
            return self.margin[Edge::Start].resolve_margin(width_size);
        }
        self.margin
            .computed(axis.leading_edge(), Value::ZERO)
            .resolve_margin(width_size)
    }

    pub fn trailing_margin(&self, axis: FlexDirection, width_size: f32) -> f32 {
        if axis.is_row() && !self.margin[Edge::End].is_undefined() {
            return self.margin[Edge::End].resolve_margin(width_size);
        }
        self.margin
            .computed(axis.trailing_edge(), Value::ZERO)
            .resolve_margin(width_size)
    }

    pub fn margin_for_axis(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.leading_margin(axis, width_size) + self.trailing_margin(axis, width_size)
    }

    // ---- padding and border ----

    pub fn leading_padding(&self, axis: FlexDirection, width_size: f32) -> f32 {
        if axis.is_row() && !self.padding[Edge::Start].is_undefined() {
            let resolved = self.padding[Edge::Start].resolve(width_size);
            if num::is_defined(resolved) && resolved > 0.0 {
                return resolved;
            }
        }
        let resolved = self
            .padding
            .computed(axis.leading_edge(), Value::ZERO)
            .resolve(width_size);
        num::float_max(resolved, 0.0)
    }

    pub fn trailing_padding(&self, axis: FlexDirection, width_size: f32) -> f32 {
        if axis.is_row() && !self.padding[Edge::End].is_undefined() {
            // Unlike the start edge, an explicit zero end padding wins over
            // the physical edge.
            let resolved = self.padding[Edge::End].resolve(width_size);
            if num::is_defined(resolved) && resolved >= 0.0 {
                return resolved;
            }
        }
        let resolved = self
            .padding
            .computed(axis.trailing_edge(), Value::ZERO)
            .resolve(width_size);
        num::float_max(resolved, 0.0)
    }

    pub fn leading_border(&self, axis: FlexDirection) -> f32 {
        if axis.is_row() {
            if let Value::Point(points) = self.border[Edge::Start] {
                if num::is_defined(points) && points >= 0.0 {
                    return points;
                }
            }
        }
        let resolved = self.border.computed(axis.leading_edge(), Value::ZERO).resolve(0.0);
        num::float_max(resolved, 0.0)
    }

    pub fn trailing_border(&self, axis: FlexDirection) -> f32 {
        if axis.is_row() {
            if let Value::Point(points) = self.border[Edge::End] {
                if num::is_defined(points) && points >= 0.0 {
                    return points;
                }
            }
        }
        let resolved = self.border.computed(axis.trailing_edge(), Value::ZERO).resolve(0.0);
        num::float_max(resolved, 0.0)
    }

    pub fn leading_padding_and_border(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.leading_padding(axis, width_size) + self.leading_border(axis)
    }

    pub fn trailing_padding_and_border(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.trailing_padding(axis, width_size) + self.trailing_border(axis)
    }

    pub fn padding_and_border_for_axis(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.leading_padding_and_border(axis, width_size)
            + self.trailing_padding_and_border(axis, width_size)
    }

    // ---- positional insets ----

    pub fn is_leading_position_defined(&self, axis: FlexDirection) -> bool {
        (axis.is_row()
            && !self.position.computed(Edge::Start, Value::Undefined).is_undefined())
            || !self
                .position
                .computed(axis.leading_edge(), Value::Undefined)
                .is_undefined()
    }

    pub fn is_trailing_position_defined(&self, axis: FlexDirection) -> bool {
        (axis.is_row()
            && !self.position.computed(Edge::End, Value::Undefined).is_undefined())
            || !self
                .position
                .computed(axis.trailing_edge(), Value::Undefined)
                .is_undefined()
    }

    /// Leading inset along the axis; zero when no inset is set at all.
    pub fn leading_position(&self, axis: FlexDirection, axis_size: f32) -> f32 {
        if axis.is_row() {
            let inset = self.position.computed(Edge::Start, Value::Undefined);
            if !inset.is_undefined() {
                return inset.resolve(axis_size);
            }
        }
        let inset = self.position.computed(axis.leading_edge(), Value::Undefined);
        if inset.is_undefined() { 0.0 } else { inset.resolve(axis_size) }
    }

    pub fn trailing_position(&self, axis: FlexDirection, axis_size: f32) -> f32 {
        if axis.is_row() {
            let inset = self.position.computed(Edge::End, Value::Undefined);
            if !inset.is_undefined() {
                return inset.resolve(axis_size);
            }
        }
        let inset = self.position.computed(axis.trailing_edge(), Value::Undefined);
        if inset.is_undefined() { 0.0 } else { inset.resolve(axis_size) }
    }

    // ---- gap ----

    /// Gap between items along the axis: column-gap on row axes, row-gap on
    /// column axes, the `all` gutter as fallback, zero when unset.
    pub fn gap_for_axis(&self, axis: FlexDirection, owner_size: f32) -> f32 {
        let gutter = if axis.is_row() { Gutter::Column } else { Gutter::Row };
        let mut gap = self.gap[gutter as usize];
        if gap.is_undefined() {
            gap = self.gap[Gutter::All as usize];
        }
        if gap.is_undefined() || gap.is_auto() {
            return 0.0;
        }
        gap.resolve(owner_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flex_shorthand_resolution() {
        let mut style = Style::default();
        assert_eq!(style.resolve_flex_grow(), 0.0);
        assert_eq!(style.resolve_flex_shrink(false), 0.0);
        assert_eq!(style.resolve_flex_shrink(true), 1.0);
        assert_eq!(style.resolve_flex_basis(false), Value::Auto);

        style.flex = 2.0;
        assert_eq!(style.resolve_flex_grow(), 2.0);
        assert_eq!(style.resolve_flex_basis(false), Value::ZERO);
        assert_eq!(style.resolve_flex_basis(true), Value::Auto);

        style.flex = -3.0;
        assert_eq!(style.resolve_flex_grow(), 0.0);
        assert_eq!(style.resolve_flex_shrink(false), 3.0);

        style.flex_grow = 1.5;
        style.flex_shrink = 0.5;
        assert_eq!(style.resolve_flex_grow(), 1.5);
        assert_eq!(style.resolve_flex_shrink(false), 0.5);
    }

    #[test]
    fn test_margin_start_overrides_row_axis() {
        let mut style = Style::default();
        style.margin[Edge::Left] = Value::Point(10.0);
        style.margin[Edge::Start] = Value::Point(4.0);
        assert_eq!(style.leading_margin(FlexDirection::Row, 100.0), 4.0);
        assert_eq!(style.leading_margin(FlexDirection::RowReverse, 100.0), 4.0);
        assert_eq!(style.leading_margin(FlexDirection::Column, 100.0), 0.0);
    }

    #[test]
    fn test_auto_margin_resolves_to_zero() {
        let mut style = Style::default();
        style.margin[Edge::Left] = Value::Auto;
        assert_eq!(style.leading_margin(FlexDirection::Row, 100.0), 0.0);
        assert!(style.margin_leading_value(FlexDirection::Row).is_auto());
    }

    #[test]
    fn test_padding_clamped_to_zero() {
        let mut style = Style::default();
        style.padding[Edge::Top] = Value::Point(-5.0);
        assert_eq!(style.leading_padding(FlexDirection::Column, 100.0), 0.0);
        style.padding[Edge::Top] = Value::Percent(10.0);
        assert_eq!(style.leading_padding(FlexDirection::Column, 200.0), 20.0);
    }

    #[test]
    fn test_padding_end_zero_overrides_physical_edge() {
        let mut style = Style::default();
        style.padding[Edge::Right] = Value::Point(5.0);
        style.padding[Edge::End] = Value::Point(0.0);
        assert_eq!(style.trailing_padding(FlexDirection::Row, 100.0), 0.0);

        // A zero start padding falls through to the physical edge.
        style.padding[Edge::Left] = Value::Point(5.0);
        style.padding[Edge::Start] = Value::Point(0.0);
        assert_eq!(style.leading_padding(FlexDirection::Row, 100.0), 5.0);
    }

    #[test]
    fn test_border_ignores_negative() {
        let mut style = Style::default();
        style.border[Edge::Left] = Value::Point(-1.0);
        assert_eq!(style.leading_border(FlexDirection::Row), 0.0);
        style.border[Edge::Left] = Value::Point(2.0);
        assert_eq!(style.leading_border(FlexDirection::Row), 2.0);
    }

    #[test]
    fn test_position_inset_defaults_to_zero() {
        let mut style = Style::default();
        assert!(!style.is_leading_position_defined(FlexDirection::Row));
        assert_eq!(style.leading_position(FlexDirection::Row, 100.0), 0.0);
        style.position[Edge::Left] = Value::Percent(10.0);
        assert!(style.is_leading_position_defined(FlexDirection::Row));
        assert_eq!(style.leading_position(FlexDirection::Row, 100.0), 10.0);
    }

    #[test]
    fn test_gap_gutter_fallback() {
        let mut style = Style::default();
        assert_eq!(style.gap_for_axis(FlexDirection::Row, 100.0), 0.0);
        style.gap[Gutter::All as usize] = Value::Point(8.0);
        assert_eq!(style.gap_for_axis(FlexDirection::Row, 100.0), 8.0);
        assert_eq!(style.gap_for_axis(FlexDirection::Column, 100.0), 8.0);
        style.gap[Gutter::Column as usize] = Value::Point(2.0);
        assert_eq!(style.gap_for_axis(FlexDirection::Row, 100.0), 2.0);
        assert_eq!(style.gap_for_axis(FlexDirection::Column, 100.0), 8.0);
    }

    #[test]
    fn test_equality_tolerates_unset_floats() {
        // flex, flex_grow/shrink and aspect_ratio default to NaN; identical
        // styles must still compare equal.
        assert_eq!(Style::default(), Style::default());
        assert_eq!(Style::web_default(), Style::web_default());

        let mut changed = Style::default();
        changed.flex_grow = 1.0;
        assert_ne!(changed, Style::default());
    }

    #[test]
    fn test_web_defaults() {
        let style = Style::web_default();
        assert_eq!(style.flex_direction, FlexDirection::Row);
        assert_eq!(style.align_content, Align::Stretch);
        assert_eq!(style.align_items, Align::Stretch);
    }
}
