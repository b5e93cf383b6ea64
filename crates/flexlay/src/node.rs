//! Node State
//!
//! Internal node representation: style, computed layout, measurement cache
//! slots and the bookkeeping flags driving incremental relayout.

use crate::cache::{CachedMeasurement, MAX_CACHED_RESULTS};
use crate::measure::{BaselineFunc, DirtiedFunc, MeasureFunc};
use crate::tree::NodeId;
use flexlay_style::{Dim, Direction, Style, Value};

/// Rounding treats text nodes specially so fractional content is never
/// truncated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeType {
    #[default]
    Default,
    Text,
}

/// Computed layout for one node, valid as of its last clean generation.
#[derive(Debug, Clone)]
pub struct LayoutResults {
    /// Physical offsets, indexed Left/Top/Right/Bottom.
    pub(crate) position: [f32; 4],
    pub(crate) dimensions: [f32; Dim::COUNT],
    pub(crate) margin: [f32; 4],
    pub(crate) border: [f32; 4],
    pub(crate) padding: [f32; 4],
    pub(crate) direction: Direction,
    pub(crate) had_overflow: bool,
    pub(crate) computed_flex_basis: f32,
    pub(crate) computed_flex_basis_generation: u32,
    pub(crate) measured_dimensions: [f32; Dim::COUNT],
    pub(crate) cached_measurements: [CachedMeasurement; MAX_CACHED_RESULTS],
    pub(crate) next_cached_measurements_index: usize,
    pub(crate) cached_layout: CachedMeasurement,
    pub(crate) generation: u32,
    pub(crate) last_owner_direction: Option<Direction>,
}

impl Default for LayoutResults {
    fn default() -> Self {
        Self {
            position: [0.0; 4],
            dimensions: [f32::NAN; Dim::COUNT],
            margin: [0.0; 4],
            border: [0.0; 4],
            padding: [0.0; 4],
            direction: Direction::Inherit,
            had_overflow: false,
            computed_flex_basis: f32::NAN,
            computed_flex_basis_generation: 0,
            measured_dimensions: [f32::NAN; Dim::COUNT],
            cached_measurements: [CachedMeasurement::default(); MAX_CACHED_RESULTS],
            next_cached_measurements_index: 0,
            cached_layout: CachedMeasurement::default(),
            generation: 0,
            last_owner_direction: None,
        }
    }
}

impl LayoutResults {
    pub fn left(&self) -> f32 {
        self.position[0]
    }

    pub fn top(&self) -> f32 {
        self.position[1]
    }

    pub fn right(&self) -> f32 {
        self.position[2]
    }

    pub fn bottom(&self) -> f32 {
        self.position[3]
    }

    pub fn width(&self) -> f32 {
        self.dimensions[Dim::Width as usize]
    }

    pub fn height(&self) -> f32 {
        self.dimensions[Dim::Height as usize]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn had_overflow(&self) -> bool {
        self.had_overflow
    }

    pub(crate) fn invalidate_cache(&mut self) {
        self.next_cached_measurements_index = 0;
        self.cached_layout = CachedMeasurement::default();
    }
}

pub(crate) struct Node {
    pub style: Style,
    pub layout: LayoutResults,
    pub line_index: usize,
    pub owner: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub measure: Option<Box<dyn MeasureFunc>>,
    pub baseline: Option<Box<dyn BaselineFunc>>,
    pub dirtied: Option<DirtiedFunc>,
    pub node_type: NodeType,
    pub is_reference_baseline: bool,
    pub is_dirty: bool,
    pub has_new_layout: bool,
    pub resolved_dimensions: [Value; Dim::COUNT],
}

impl Node {
    pub fn new(style: Style) -> Self {
        Self {
            style,
            layout: LayoutResults::default(),
            line_index: 0,
            owner: None,
            children: Vec::new(),
            measure: None,
            baseline: None,
            dirtied: None,
            node_type: NodeType::Default,
            is_reference_baseline: false,
            is_dirty: false,
            has_new_layout: true,
            resolved_dimensions: [Value::Undefined; Dim::COUNT],
        }
    }

    /// A max dimension equal to the min pins the dimension exactly; the pair
    /// then overrides the styled dimension.
    pub fn resolve_dimensions(&mut self) {
        for dim in [Dim::Width, Dim::Height] {
            let index = dim as usize;
            let max = self.style.max_dimensions[index];
            let min = self.style.min_dimensions[index];
            if !max.is_undefined() && max == min {
                self.resolved_dimensions[index] = max;
            } else {
                self.resolved_dimensions[index] = self.style.dimensions[index];
            }
        }
    }

    pub fn resolved_dimension(&self, dim: Dim) -> Value {
        self.resolved_dimensions[dim as usize]
    }

    pub fn resolve_direction(&self, owner_direction: Direction) -> Direction {
        if self.style.direction == Direction::Inherit {
            if owner_direction != Direction::Inherit {
                owner_direction
            } else {
                Direction::Ltr
            }
        } else {
            self.style.direction
        }
    }

    fn relative_position(&self, axis: flexlay_style::FlexDirection, axis_size: f32) -> f32 {
        if self.style.is_leading_position_defined(axis) {
            self.style.leading_position(axis, axis_size)
        } else {
            -self.style.trailing_position(axis, axis_size)
        }
    }

    /// Write the node's own offsets from margins and positional insets. The
    /// root ignores the requested direction and positions as LTR.
    pub fn set_position(
        &mut self,
        direction: Direction,
        main_size: f32,
        cross_size: f32,
        owner_width: f32,
    ) {
        let direction_respecting_root =
            if self.owner.is_some() { direction } else { Direction::Ltr };
        let main_axis = self.style.flex_direction.resolve(direction_respecting_root);
        let cross_axis = main_axis.cross(direction_respecting_root);

        let relative_main = self.relative_position(main_axis, main_size);
        let relative_cross = self.relative_position(cross_axis, cross_size);

        self.layout.position[main_axis.leading_edge() as usize] =
            self.style.leading_margin(main_axis, owner_width) + relative_main;
        self.layout.position[main_axis.trailing_edge() as usize] =
            self.style.trailing_margin(main_axis, owner_width) + relative_main;
        self.layout.position[cross_axis.leading_edge() as usize] =
            self.style.leading_margin(cross_axis, owner_width) + relative_cross;
        self.layout.position[cross_axis.trailing_edge() as usize] =
            self.style.trailing_margin(cross_axis, owner_width) + relative_cross;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexlay_style::num;

    #[test]
    fn test_resolve_dimensions_min_max_pin() {
        let mut node = Node::new(Style::default());
        node.style.dimensions[Dim::Width as usize] = Value::Point(100.0);
        node.style.min_dimensions[Dim::Width as usize] = Value::Point(50.0);
        node.style.max_dimensions[Dim::Width as usize] = Value::Point(50.0);
        node.resolve_dimensions();
        assert_eq!(node.resolved_dimension(Dim::Width), Value::Point(50.0));
        assert_eq!(node.resolved_dimension(Dim::Height), Value::Undefined);
    }

    #[test]
    fn test_resolve_direction_inherit() {
        let node = Node::new(Style::default());
        assert_eq!(node.resolve_direction(Direction::Rtl), Direction::Rtl);
        assert_eq!(node.resolve_direction(Direction::Inherit), Direction::Ltr);
    }

    #[test]
    fn test_layout_defaults() {
        let layout = LayoutResults::default();
        assert!(num::is_undefined(layout.width()));
        assert_eq!(layout.left(), 0.0);
        assert!(!layout.had_overflow());
    }
}
