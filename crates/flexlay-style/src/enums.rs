//! Style Enums
//!
//! Property enums and the axis/edge lookup helpers the layout pass is built
//! on. Defaults follow the non-web configuration; web defaults are applied
//! when a tree is created with that flag set.

/// Layout direction (writing direction of the row axis).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Inherit,
    Ltr,
    Rtl,
}

/// Main axis direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexDirection {
    #[default]
    Column,
    ColumnReverse,
    Row,
    RowReverse,
}

impl FlexDirection {
    pub fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    pub fn is_column(self) -> bool {
        matches!(self, Self::Column | Self::ColumnReverse)
    }

    pub fn is_reversed(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }

    /// Apply the resolved layout direction: RTL flips the row axes.
    pub fn resolve(self, direction: Direction) -> FlexDirection {
        if direction == Direction::Rtl {
            match self {
                Self::Row => Self::RowReverse,
                Self::RowReverse => Self::Row,
                other => other,
            }
        } else {
            self
        }
    }

    /// The axis perpendicular to this one, under the given direction.
    pub fn cross(self, direction: Direction) -> FlexDirection {
        if self.is_column() {
            Self::Row.resolve(direction)
        } else {
            Self::Column
        }
    }

    /// Physical edge where this axis starts.
    pub fn leading_edge(self) -> Edge {
        match self {
            Self::Column => Edge::Top,
            Self::ColumnReverse => Edge::Bottom,
            Self::Row => Edge::Left,
            Self::RowReverse => Edge::Right,
        }
    }

    /// Physical edge where this axis ends.
    pub fn trailing_edge(self) -> Edge {
        match self {
            Self::Column => Edge::Bottom,
            Self::ColumnReverse => Edge::Top,
            Self::Row => Edge::Right,
            Self::RowReverse => Edge::Left,
        }
    }

    /// Edge that carries the computed position along this axis. Reverse axes
    /// still position from the top/left; the trailing correction happens at
    /// the end of the pass.
    pub fn position_edge(self) -> Edge {
        match self {
            Self::Column | Self::ColumnReverse => Edge::Top,
            Self::Row | Self::RowReverse => Edge::Left,
        }
    }

    /// Dimension measured along this axis.
    pub fn dimension(self) -> Dim {
        match self {
            Self::Column | Self::ColumnReverse => Dim::Height,
            Self::Row | Self::RowReverse => Dim::Width,
        }
    }
}

/// Main axis alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Justify {
    #[default]
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// Cross axis alignment, shared by align-items, align-self and align-content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    #[default]
    Auto,
    FlexStart,
    Center,
    FlexEnd,
    Stretch,
    Baseline,
    SpaceBetween,
    SpaceAround,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionType {
    Static,
    #[default]
    Relative,
    Absolute,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Wrap {
    #[default]
    NoWrap,
    Wrap,
    WrapReverse,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Scroll,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Display {
    #[default]
    Flex,
    None,
}

/// Logical edges addressable by the per-edge style properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
    Start,
    End,
    Horizontal,
    Vertical,
    All,
}

impl Edge {
    pub const COUNT: usize = 9;
}

/// Gutter slots for the gap property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gutter {
    Column,
    Row,
    All,
}

impl Gutter {
    pub const COUNT: usize = 3;
}

/// Width/height selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dim {
    Width,
    Height,
}

impl Dim {
    pub const COUNT: usize = 2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_resolution_rtl() {
        assert_eq!(FlexDirection::Row.resolve(Direction::Rtl), FlexDirection::RowReverse);
        assert_eq!(FlexDirection::RowReverse.resolve(Direction::Rtl), FlexDirection::Row);
        assert_eq!(FlexDirection::Column.resolve(Direction::Rtl), FlexDirection::Column);
        assert_eq!(FlexDirection::Row.resolve(Direction::Ltr), FlexDirection::Row);
    }

    #[test]
    fn test_cross_axis() {
        assert_eq!(FlexDirection::Column.cross(Direction::Ltr), FlexDirection::Row);
        assert_eq!(FlexDirection::Column.cross(Direction::Rtl), FlexDirection::RowReverse);
        assert_eq!(FlexDirection::Row.cross(Direction::Ltr), FlexDirection::Column);
        assert_eq!(FlexDirection::RowReverse.cross(Direction::Rtl), FlexDirection::Column);
    }

    #[test]
    fn test_edge_tables() {
        assert_eq!(FlexDirection::Row.leading_edge(), Edge::Left);
        assert_eq!(FlexDirection::RowReverse.leading_edge(), Edge::Right);
        assert_eq!(FlexDirection::ColumnReverse.trailing_edge(), Edge::Top);
        assert_eq!(FlexDirection::RowReverse.position_edge(), Edge::Left);
        assert_eq!(FlexDirection::Column.dimension(), Dim::Height);
    }
}
