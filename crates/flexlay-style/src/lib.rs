//! flexlay-style
//!
//! Value types, property enums and edge resolution shared by the flexlay
//! layout engine. Everything here is plain data: no tree, no callbacks.

pub mod edges;
pub mod enums;
pub mod num;
pub mod style;
pub mod value;

pub use edges::Edges;
pub use enums::{Align, Dim, Direction, Display, Edge, FlexDirection, Gutter, Justify, Overflow,
                PositionType, Wrap};
pub use style::Style;
pub use value::Value;
