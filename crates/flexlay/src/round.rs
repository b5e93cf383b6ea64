//! Pixel Grid Rounding
//!
//! Layout math runs in fractional points; the final pass snaps results to
//! the device pixel grid. Widths and heights are computed as differences of
//! rounded absolute edges so adjacent boxes never show a one-pixel seam.

use crate::node::NodeType;
use crate::tree::{FlexTree, NodeId};
use flexlay_style::{num, Dim, Edge};

fn double_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.0001
}

/// Round half-up onto the grid defined by `point_scale_factor`, with forced
/// ceil/floor overrides used for text nodes.
pub fn round_value_to_pixel_grid(
    value: f32,
    point_scale_factor: f32,
    force_ceil: bool,
    force_floor: bool,
) -> f32 {
    let mut scaled = f64::from(value) * f64::from(point_scale_factor);
    // Rounding within 0.0001 of a grid line must land on it regardless of
    // the forced direction, or accumulated float error creeps in.
    let mut fractial = scaled % 1.0;
    if fractial < 0.0 {
        fractial += 1.0;
    }
    if double_eq(fractial, 0.0) {
        scaled -= fractial;
    } else if double_eq(fractial, 1.0) {
        scaled = scaled - fractial + 1.0;
    } else if force_ceil {
        scaled = scaled - fractial + 1.0;
    } else if force_floor {
        scaled -= fractial;
    } else {
        let round_up = !fractial.is_nan() && (fractial > 0.5 || double_eq(fractial, 0.5));
        scaled = scaled - fractial + if round_up { 1.0 } else { 0.0 };
    }
    if scaled.is_nan() || point_scale_factor.is_nan() {
        f32::NAN
    } else {
        (scaled / f64::from(point_scale_factor)) as f32
    }
}

impl FlexTree {
    pub(crate) fn round_layout_results_to_pixel_grid(
        &mut self,
        node: NodeId,
        absolute_left: f64,
        absolute_top: f64,
    ) {
        let scale = self.config().point_scale_factor;
        if scale == 0.0 {
            return;
        }

        let n = self.node(node);
        let node_left = n.layout.position[Edge::Left as usize];
        let node_top = n.layout.position[Edge::Top as usize];
        let node_width = n.layout.dimensions[Dim::Width as usize];
        let node_height = n.layout.dimensions[Dim::Height as usize];
        let text_rounding = n.node_type == NodeType::Text;

        let absolute_node_left = absolute_left + f64::from(node_left);
        let absolute_node_top = absolute_top + f64::from(node_top);
        let absolute_node_right = absolute_node_left + f64::from(node_width);
        let absolute_node_bottom = absolute_node_top + f64::from(node_height);

        // Text nodes keep their fractional content: a fractional width is
        // ceiled, an integral one floored, so glyphs are never clipped.
        let fractional_width = (node_width * scale) % 1.0;
        let has_fractional_width =
            !num::floats_equal(fractional_width, 0.0) && !num::floats_equal(fractional_width, 1.0);
        let fractional_height = (node_height * scale) % 1.0;
        let has_fractional_height =
            !num::floats_equal(fractional_height, 0.0) && !num::floats_equal(fractional_height, 1.0);

        let n = self.node_mut(node);
        n.layout.position[Edge::Left as usize] =
            round_value_to_pixel_grid(node_left, scale, false, text_rounding);
        n.layout.position[Edge::Top as usize] =
            round_value_to_pixel_grid(node_top, scale, false, text_rounding);

        n.layout.dimensions[Dim::Width as usize] = round_value_to_pixel_grid(
            absolute_node_right as f32,
            scale,
            text_rounding && has_fractional_width,
            text_rounding && !has_fractional_width,
        ) - round_value_to_pixel_grid(absolute_node_left as f32, scale, false, text_rounding);
        n.layout.dimensions[Dim::Height as usize] = round_value_to_pixel_grid(
            absolute_node_bottom as f32,
            scale,
            text_rounding && has_fractional_height,
            text_rounding && !has_fractional_height,
        ) - round_value_to_pixel_grid(absolute_node_top as f32, scale, false, text_rounding);

        let children = self.node(node).children.clone();
        for child in children {
            self.round_layout_results_to_pixel_grid(child, absolute_node_left, absolute_node_top);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_value_to_pixel_grid(1.4, 1.0, false, false), 1.0);
        assert_eq!(round_value_to_pixel_grid(1.5, 1.0, false, false), 2.0);
        assert_eq!(round_value_to_pixel_grid(1.6, 1.0, false, false), 2.0);
    }

    #[test]
    fn test_round_negative_values() {
        assert_eq!(round_value_to_pixel_grid(-1.4, 1.0, false, false), -1.0);
        assert_eq!(round_value_to_pixel_grid(-1.6, 1.0, false, false), -2.0);
    }

    #[test]
    fn test_round_fractional_scale() {
        assert_eq!(round_value_to_pixel_grid(1.2, 2.0, false, false), 1.0);
        assert_eq!(round_value_to_pixel_grid(1.3, 2.0, false, false), 1.5);
        assert_eq!(round_value_to_pixel_grid(0.24, 2.0, false, false), 0.5);
    }

    #[test]
    fn test_forced_directions() {
        assert_eq!(round_value_to_pixel_grid(1.1, 1.0, true, false), 2.0);
        assert_eq!(round_value_to_pixel_grid(1.9, 1.0, false, true), 1.0);
        // Values within tolerance of a grid line ignore the force flags.
        assert_eq!(round_value_to_pixel_grid(2.00005, 1.0, true, false), 2.0);
    }

    #[test]
    fn test_undefined_passes_through() {
        assert!(round_value_to_pixel_grid(f32::NAN, 1.0, false, false).is_nan());
    }
}
