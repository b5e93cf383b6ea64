//! Measurement Callbacks
//!
//! Leaf nodes that size themselves from content (text, images) install a
//! measure function; baseline alignment can install a baseline function.
//! Both are trait objects so hosts can use closures or their own types.

use crate::tree::NodeId;

/// Sizing constraint passed to measurement and layout.
///
/// `Undefined` asks for max-content, `Exactly` for the given size,
/// `AtMost` for fit-content capped at the given size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MeasureMode {
    #[default]
    Undefined,
    Exactly,
    AtMost,
}

/// A measured content size, in points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Content measurement for leaf nodes. Returning NaN for either dimension is
/// a contract violation and aborts the layout pass.
pub trait MeasureFunc {
    fn measure(
        &mut self,
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        height_mode: MeasureMode,
    ) -> Size;
}

impl<F> MeasureFunc for F
where
    F: FnMut(f32, MeasureMode, f32, MeasureMode) -> Size,
{
    fn measure(
        &mut self,
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        height_mode: MeasureMode,
    ) -> Size {
        self(width, width_mode, height, height_mode)
    }
}

/// Baseline of a node's content, measured down from its top edge.
pub trait BaselineFunc {
    fn baseline(&mut self, width: f32, height: f32) -> f32;
}

impl<F> BaselineFunc for F
where
    F: FnMut(f32, f32) -> f32,
{
    fn baseline(&mut self, width: f32, height: f32) -> f32 {
        self(width, height)
    }
}

/// Notification fired when a clean node becomes dirty.
pub type DirtiedFunc = Box<dyn FnMut(NodeId)>;
