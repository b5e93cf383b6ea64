//! flexlay
//!
//! A flexbox layout engine. Build a tree of nodes, style them, then call
//! [`FlexTree::calculate_layout`] and read the computed positions back.
//!
//! Nodes live in an arena owned by the [`FlexTree`] and are addressed by
//! [`NodeId`] handles. Leaf nodes that size themselves from content install
//! a [`MeasureFunc`]. Repeated layout calls are incremental: only dirty
//! subtrees are recomputed, everything else is answered from per-node
//! measurement caches.
//!
//! ```
//! use flexlay::{Direction, FlexTree, Value};
//!
//! let mut tree = FlexTree::new();
//! let root = tree.new_node();
//! tree.set_width(root, Value::Point(100.0));
//! tree.set_height(root, Value::Point(100.0));
//!
//! let child = tree.new_node();
//! tree.set_flex_grow(child, 1.0);
//! tree.add_child(root, child).unwrap();
//!
//! tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr);
//! assert_eq!(tree.layout_height(child), 100.0);
//! ```

mod algorithm;
mod cache;
mod config;
mod error;
mod measure;
mod node;
mod round;
mod tree;

pub use cache::CacheStats;
pub use config::Config;
pub use error::TreeError;
pub use measure::{BaselineFunc, DirtiedFunc, MeasureFunc, MeasureMode, Size};
pub use node::{LayoutResults, NodeType};
pub use round::round_value_to_pixel_grid;
pub use tree::{FlexTree, NodeId};

pub use flexlay_style::{num, Align, Dim, Direction, Display, Edge, Edges, FlexDirection, Gutter,
                        Justify, Overflow, PositionType, Style, Value, Wrap};
