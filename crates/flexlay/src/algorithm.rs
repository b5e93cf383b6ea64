//! Layout Algorithm
//!
//! The flexbox pass: flex basis computation, line collection, the two-pass
//! flexible length resolution, main-axis justification, cross-axis and
//! multi-line alignment, absolute children and the cached entry points.
//!
//! The flexible length resolution deliberately deviates from the CSS
//! specification's iterative algorithm: one pass freezes every item whose
//! min/max constraint fires and removes its flex factor from the pool, a
//! second pass sizes the rest against the adjusted free space. Consumers
//! depend on this exact numeric behavior.

use crate::cache::{can_use_cached_measurement, CachedMeasurement, MAX_CACHED_RESULTS};
use crate::measure::{MeasureMode, Size};
use crate::node::LayoutResults;
use crate::tree::{FlexTree, NodeId};
use flexlay_style::{num, Align, Dim, Direction, Display, Edge, FlexDirection, Justify, Overflow,
                    PositionType, Value, Wrap};
use tracing::{debug, error, trace};

/// One collected flex line: the relative children on it and the totals the
/// flexible length resolution works from.
struct FlexLine {
    items: Vec<NodeId>,
    size_consumed: f32,
    total_flex_grow_factors: f32,
    total_flex_shrink_scaled_factors: f32,
    end_of_line_index: usize,
    remaining_free_space: f32,
    main_dim: f32,
    cross_dim: f32,
}

impl FlexTree {
    /// Compute the layout of the tree rooted at `root` under the given
    /// available space. `f32::NAN` means unconstrained on that axis.
    pub fn calculate_layout(
        &mut self,
        root: NodeId,
        owner_width: f32,
        owner_height: f32,
        owner_direction: Direction,
    ) {
        // Each call is one generation; cached results from the same
        // generation stay valid for clean subtrees.
        self.generation = self.generation.wrapping_add(1);
        self.node_mut(root).resolve_dimensions();

        let style = self.node(root).style;

        let width;
        let width_mode;
        if self.is_style_dim_defined(root, FlexDirection::Row, owner_width) {
            width = self.node(root).resolved_dimension(Dim::Width).resolve(owner_width)
                + style.margin_for_axis(FlexDirection::Row, owner_width);
            width_mode = MeasureMode::Exactly;
        } else if num::is_defined(style.max_dimension(Dim::Width).resolve(owner_width)) {
            width = style.max_dimension(Dim::Width).resolve(owner_width);
            width_mode = MeasureMode::AtMost;
        } else {
            width = owner_width;
            width_mode = if num::is_undefined(width) {
                MeasureMode::Undefined
            } else {
                MeasureMode::Exactly
            };
        }

        let height;
        let height_mode;
        if self.is_style_dim_defined(root, FlexDirection::Column, owner_height) {
            height = self.node(root).resolved_dimension(Dim::Height).resolve(owner_height)
                + style.margin_for_axis(FlexDirection::Column, owner_width);
            height_mode = MeasureMode::Exactly;
        } else if num::is_defined(style.max_dimension(Dim::Height).resolve(owner_height)) {
            height = style.max_dimension(Dim::Height).resolve(owner_height);
            height_mode = MeasureMode::AtMost;
        } else {
            height = owner_height;
            height_mode = if num::is_undefined(height) {
                MeasureMode::Undefined
            } else {
                MeasureMode::Exactly
            };
        }

        debug!(
            generation = self.generation,
            width, height, "starting layout pass"
        );

        if self.layout_node_internal(
            root,
            width,
            height,
            owner_direction,
            width_mode,
            height_mode,
            owner_width,
            owner_height,
            true,
        ) {
            let direction = self.node(root).layout.direction;
            self.node_mut(root)
                .set_position(direction, owner_width, owner_height, owner_width);
            self.round_layout_results_to_pixel_grid(root, 0.0, 0.0);
        }

        debug!(
            width = self.node(root).layout.dimensions[Dim::Width as usize],
            height = self.node(root).layout.dimensions[Dim::Height as usize],
            "layout pass finished"
        );
    }

    // ---- small predicates ----

    pub(crate) fn is_style_dim_defined(
        &self,
        node: NodeId,
        axis: FlexDirection,
        owner_size: f32,
    ) -> bool {
        let resolved = self.node(node).resolved_dimension(axis.dimension());
        match resolved {
            Value::Auto | Value::Undefined => false,
            Value::Point(points) => !(num::is_defined(points) && points < 0.0),
            Value::Percent(percent) => {
                !(num::is_defined(percent) && (percent < 0.0 || num::is_undefined(owner_size)))
            }
        }
    }

    fn is_layout_dim_defined(&self, node: NodeId, axis: FlexDirection) -> bool {
        let value = self.node(node).layout.measured_dimensions[axis.dimension() as usize];
        num::is_defined(value) && value >= 0.0
    }

    fn dim_with_margin(&self, node: NodeId, axis: FlexDirection, width_size: f32) -> f32 {
        let n = self.node(node);
        n.layout.measured_dimensions[axis.dimension() as usize]
            + n.style.leading_margin(axis, width_size)
            + n.style.trailing_margin(axis, width_size)
    }

    fn resolve_flex_grow(&self, node: NodeId) -> f32 {
        let n = self.node(node);
        // The root is never flexible against its owner.
        if n.owner.is_none() {
            return 0.0;
        }
        n.style.resolve_flex_grow()
    }

    fn resolve_flex_shrink(&self, node: NodeId) -> f32 {
        let n = self.node(node);
        if n.owner.is_none() {
            return 0.0;
        }
        n.style.resolve_flex_shrink(self.config().use_web_defaults)
    }

    fn is_node_flexible(&self, node: NodeId) -> bool {
        self.node(node).style.position_type != PositionType::Absolute
            && (self.resolve_flex_grow(node) != 0.0 || self.resolve_flex_shrink(node) != 0.0)
    }

    /// Effective cross alignment of `child` inside `node`. Baseline makes no
    /// sense on column containers and degrades to flex-start there.
    fn align_item(&self, node: NodeId, child: NodeId) -> Align {
        let child_align = self.node(child).style.align_self;
        let align = if child_align == Align::Auto {
            self.node(node).style.align_items
        } else {
            child_align
        };
        if align == Align::Baseline && self.node(node).style.flex_direction.is_column() {
            return Align::FlexStart;
        }
        align
    }

    fn is_baseline_layout(&self, node: NodeId) -> bool {
        if self.node(node).style.flex_direction.is_column() {
            return false;
        }
        if self.node(node).style.align_items == Align::Baseline {
            return true;
        }
        for &child in &self.node(node).children {
            let style = &self.node(child).style;
            if style.position_type != PositionType::Absolute && style.align_self == Align::Baseline {
                return true;
            }
        }
        false
    }

    /// Baseline of a node: its baseline callback if set, otherwise the
    /// baseline of its reference child (or first in-flow child on the first
    /// line), otherwise its own height.
    fn node_baseline(&mut self, node: NodeId) -> f32 {
        if self.node(node).baseline.is_some() {
            let (width, height) = {
                let layout = &self.node(node).layout;
                (
                    layout.measured_dimensions[Dim::Width as usize],
                    layout.measured_dimensions[Dim::Height as usize],
                )
            };
            let mut func = self.node_mut(node).baseline.take();
            let baseline = match func.as_mut() {
                Some(func) => func.baseline(width, height),
                None => unreachable!(),
            };
            self.node_mut(node).baseline = func;
            if num::is_undefined(baseline) {
                error!("baseline function returned an undefined value");
                panic!("baseline function returned an undefined value");
            }
            return baseline;
        }

        let mut baseline_child: Option<NodeId> = None;
        for &child in &self.node(node).children {
            if self.node(child).line_index > 0 {
                break;
            }
            if self.node(child).style.position_type == PositionType::Absolute {
                continue;
            }
            if self.align_item(node, child) == Align::Baseline
                || self.node(child).is_reference_baseline
            {
                baseline_child = Some(child);
                break;
            }
            if baseline_child.is_none() {
                baseline_child = Some(child);
            }
        }

        match baseline_child {
            None => self.node(node).layout.measured_dimensions[Dim::Height as usize],
            Some(child) => {
                let baseline = self.node_baseline(child);
                baseline + self.node(child).layout.position[Edge::Top as usize]
            }
        }
    }

    // ---- bounding ----

    fn bound_axis_within_min_max(
        &self,
        node: NodeId,
        axis: FlexDirection,
        value: f32,
        axis_size: f32,
    ) -> f32 {
        let style = &self.node(node).style;
        let dim = axis.dimension();
        let min = style.min_dimension(dim).resolve(axis_size);
        let max = style.max_dimension(dim).resolve(axis_size);
        if max >= 0.0 && value > max {
            return max;
        }
        if min >= 0.0 && value < min {
            return min;
        }
        value
    }

    /// Min/max clamp, then floor at the node's own padding and border.
    fn bound_axis(
        &self,
        node: NodeId,
        axis: FlexDirection,
        value: f32,
        axis_size: f32,
        width_size: f32,
    ) -> f32 {
        num::float_max(
            self.bound_axis_within_min_max(node, axis, value, axis_size),
            self.node(node).style.padding_and_border_for_axis(axis, width_size),
        )
    }

    fn constrain_max_size_for_mode(
        &self,
        node: NodeId,
        axis: FlexDirection,
        owner_axis_size: f32,
        owner_width: f32,
        mode: &mut MeasureMode,
        size: &mut f32,
    ) {
        let style = &self.node(node).style;
        let max_size = style.max_dimension(axis.dimension()).resolve(owner_axis_size)
            + style.margin_for_axis(axis, owner_width);
        match *mode {
            MeasureMode::Exactly | MeasureMode::AtMost => {
                if num::is_defined(max_size) && *size >= max_size {
                    *size = max_size;
                }
            }
            MeasureMode::Undefined => {
                if num::is_defined(max_size) {
                    *mode = MeasureMode::AtMost;
                    *size = max_size;
                }
            }
        }
    }

    fn calculate_available_inner_dim(
        &self,
        node: NodeId,
        dim: Dim,
        available_dim: f32,
        padding_and_border: f32,
        owner_dim: f32,
    ) -> f32 {
        let mut available_inner_dim = available_dim - padding_and_border;
        // Max dimension overrides predefined dimension value; Min dimension
        // in turn overrides both of the above.
        if num::is_defined(available_inner_dim) {
            let style = &self.node(node).style;
            let min = style.min_dimension(dim).resolve(owner_dim);
            let min_inner = if num::is_undefined(min) { 0.0 } else { min - padding_and_border };
            let max = style.max_dimension(dim).resolve(owner_dim);
            let max_inner = if num::is_undefined(max) { f32::MAX } else { max - padding_and_border };
            available_inner_dim =
                num::float_max(num::float_min(available_inner_dim, max_inner), min_inner);
        }
        available_inner_dim
    }

    // ---- layout bookkeeping ----

    fn zero_out_layout_recursively(&mut self, node: NodeId) {
        let n = self.node_mut(node);
        n.layout = LayoutResults::default();
        n.layout.dimensions = [0.0; Dim::COUNT];
        n.has_new_layout = true;
        let children = self.node(node).children.clone();
        for child in children {
            self.zero_out_layout_recursively(child);
        }
    }

    fn set_child_trailing_position(&mut self, node: NodeId, child: NodeId, axis: FlexDirection) {
        let size = self.node(child).layout.measured_dimensions[axis.dimension() as usize];
        let owner_size = self.node(node).layout.measured_dimensions[axis.dimension() as usize];
        let leading = self.node(child).layout.position[axis.position_edge() as usize];
        self.node_mut(child).layout.position[axis.trailing_edge() as usize] =
            owner_size - size - leading;
    }

    // ---- flex basis ----

    #[allow(clippy::too_many_arguments)]
    fn compute_flex_basis_for_child(
        &mut self,
        node: NodeId,
        child: NodeId,
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        owner_width: f32,
        owner_height: f32,
        height_mode: MeasureMode,
        direction: Direction,
    ) {
        let web_defaults = self.config().use_web_defaults;
        let experimental_web_flex_basis = self.config().experimental_web_flex_basis;
        let generation = self.generation;

        let main_axis = self.node(node).style.flex_direction.resolve(direction);
        let is_main_axis_row = main_axis.is_row();
        let main_axis_size = if is_main_axis_row { width } else { height };
        let main_axis_owner_size = if is_main_axis_row { owner_width } else { owner_height };

        let resolved_flex_basis = self
            .node(child)
            .style
            .resolve_flex_basis(web_defaults)
            .resolve(main_axis_owner_size);
        let is_row_style_dim_defined =
            self.is_style_dim_defined(child, FlexDirection::Row, owner_width);
        let is_column_style_dim_defined =
            self.is_style_dim_defined(child, FlexDirection::Column, owner_height);

        if num::is_defined(resolved_flex_basis) && num::is_defined(main_axis_size) {
            let needs_compute = num::is_undefined(self.node(child).layout.computed_flex_basis)
                || (experimental_web_flex_basis
                    && self.node(child).layout.computed_flex_basis_generation != generation);
            if needs_compute {
                let padding_and_border = self
                    .node(child)
                    .style
                    .padding_and_border_for_axis(main_axis, owner_width);
                self.node_mut(child).layout.computed_flex_basis =
                    num::float_max(resolved_flex_basis, padding_and_border);
            }
        } else if is_main_axis_row && is_row_style_dim_defined {
            // The width is definite, so use that as the flex basis.
            let padding_and_border = self
                .node(child)
                .style
                .padding_and_border_for_axis(FlexDirection::Row, owner_width);
            let resolved = self.node(child).resolved_dimension(Dim::Width).resolve(owner_width);
            self.node_mut(child).layout.computed_flex_basis =
                num::float_max(resolved, padding_and_border);
        } else if !is_main_axis_row && is_column_style_dim_defined {
            let padding_and_border = self
                .node(child)
                .style
                .padding_and_border_for_axis(FlexDirection::Column, owner_width);
            let resolved = self.node(child).resolved_dimension(Dim::Height).resolve(owner_height);
            self.node_mut(child).layout.computed_flex_basis =
                num::float_max(resolved, padding_and_border);
        } else {
            // Compute the flex basis and hypothetical main size (i.e. the
            // clamped flex basis) by measuring the child.
            let mut child_width = f32::NAN;
            let mut child_height = f32::NAN;
            let mut child_width_mode = MeasureMode::Undefined;
            let mut child_height_mode = MeasureMode::Undefined;

            let child_style = self.node(child).style;
            let margin_row = child_style.margin_for_axis(FlexDirection::Row, owner_width);
            let margin_column = child_style.margin_for_axis(FlexDirection::Column, owner_width);

            if is_row_style_dim_defined {
                child_width = self.node(child).resolved_dimension(Dim::Width).resolve(owner_width)
                    + margin_row;
                child_width_mode = MeasureMode::Exactly;
            }
            if is_column_style_dim_defined {
                child_height = self
                    .node(child)
                    .resolved_dimension(Dim::Height)
                    .resolve(owner_height)
                    + margin_column;
                child_height_mode = MeasureMode::Exactly;
            }

            // The W3C spec doesn't say anything about the 'overflow'
            // property, but all major browsers appear to implement the
            // following logic.
            let overflow = self.node(node).style.overflow;
            if (!is_main_axis_row && overflow == Overflow::Scroll) || overflow != Overflow::Scroll {
                if num::is_undefined(child_width) && num::is_defined(width) {
                    child_width = width;
                    child_width_mode = MeasureMode::AtMost;
                }
            }
            if (is_main_axis_row && overflow == Overflow::Scroll) || overflow != Overflow::Scroll {
                if num::is_undefined(child_height) && num::is_defined(height) {
                    child_height = height;
                    child_height_mode = MeasureMode::AtMost;
                }
            }

            let aspect_ratio = child_style.aspect_ratio;
            if num::is_defined(aspect_ratio) {
                if !is_main_axis_row && child_width_mode == MeasureMode::Exactly {
                    child_height = margin_column + (child_width - margin_row) / aspect_ratio;
                    child_height_mode = MeasureMode::Exactly;
                } else if is_main_axis_row && child_height_mode == MeasureMode::Exactly {
                    child_width = margin_row + (child_height - margin_column) * aspect_ratio;
                    child_width_mode = MeasureMode::Exactly;
                }
            }

            // If child has no defined size in the cross axis and is set to
            // stretch, set the cross axis to be measured exactly with the
            // available inner size.
            let has_exact_width = num::is_defined(width) && width_mode == MeasureMode::Exactly;
            let child_width_stretch = self.align_item(node, child) == Align::Stretch
                && child_width_mode != MeasureMode::Exactly;
            if !is_main_axis_row && !is_row_style_dim_defined && has_exact_width && child_width_stretch
            {
                child_width = width;
                child_width_mode = MeasureMode::Exactly;
                if num::is_defined(aspect_ratio) {
                    child_height = (child_width - margin_row) / aspect_ratio;
                    child_height_mode = MeasureMode::Exactly;
                }
            }

            let has_exact_height = num::is_defined(height) && height_mode == MeasureMode::Exactly;
            let child_height_stretch = self.align_item(node, child) == Align::Stretch
                && child_height_mode != MeasureMode::Exactly;
            if is_main_axis_row
                && !is_column_style_dim_defined
                && has_exact_height
                && child_height_stretch
            {
                child_height = height;
                child_height_mode = MeasureMode::Exactly;
                if num::is_defined(aspect_ratio) {
                    child_width = (child_height - margin_column) * aspect_ratio;
                    child_width_mode = MeasureMode::Exactly;
                }
            }

            self.constrain_max_size_for_mode(
                child,
                FlexDirection::Row,
                owner_width,
                owner_width,
                &mut child_width_mode,
                &mut child_width,
            );
            self.constrain_max_size_for_mode(
                child,
                FlexDirection::Column,
                owner_height,
                owner_width,
                &mut child_height_mode,
                &mut child_height,
            );

            // Measure the child.
            self.layout_node_internal(
                child,
                child_width,
                child_height,
                direction,
                child_width_mode,
                child_height_mode,
                owner_width,
                owner_height,
                false,
            );

            let measured = self.node(child).layout.measured_dimensions[main_axis.dimension() as usize];
            let padding_and_border = self
                .node(child)
                .style
                .padding_and_border_for_axis(main_axis, owner_width);
            self.node_mut(child).layout.computed_flex_basis =
                num::float_max(measured, padding_and_border);
        }
        self.node_mut(child).layout.computed_flex_basis_generation = generation;
    }

    /// Resolve dimensions and flex basis for every child, returning the sum
    /// of outer flex bases along the main axis.
    #[allow(clippy::too_many_arguments)]
    fn compute_flex_basis_for_children(
        &mut self,
        node: NodeId,
        available_inner_width: f32,
        available_inner_height: f32,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        direction: Direction,
        main_axis: FlexDirection,
        perform_layout: bool,
    ) -> f32 {
        let mut total_outer_flex_basis = 0.0;
        let is_main_axis_row = main_axis.is_row();
        let measure_mode_main_dim = if is_main_axis_row { width_mode } else { height_mode };

        // A container with exactly one flexible child under an exact main
        // constraint can skip measuring it: flex sizing overrides anyway.
        let mut single_flex_child: Option<NodeId> = None;
        if measure_mode_main_dim == MeasureMode::Exactly {
            for &child in &self.node(node).children {
                if self.is_node_flexible(child) {
                    if single_flex_child.is_some()
                        || num::floats_equal(self.resolve_flex_grow(child), 0.0)
                        || num::floats_equal(self.resolve_flex_shrink(child), 0.0)
                    {
                        single_flex_child = None;
                        break;
                    }
                    single_flex_child = Some(child);
                }
            }
        }

        let children = self.node(node).children.clone();
        for child in children {
            self.node_mut(child).resolve_dimensions();
            if self.node(child).style.display == Display::None {
                self.zero_out_layout_recursively(child);
                let n = self.node_mut(child);
                n.has_new_layout = true;
                n.is_dirty = false;
                continue;
            }
            if perform_layout {
                // An initial position pass so insets and margins are in
                // place before the real placement below.
                let child_direction = self.node(child).resolve_direction(direction);
                let main_dim =
                    if is_main_axis_row { available_inner_width } else { available_inner_height };
                let cross_dim =
                    if is_main_axis_row { available_inner_height } else { available_inner_width };
                self.node_mut(child).set_position(
                    child_direction,
                    main_dim,
                    cross_dim,
                    available_inner_width,
                );
            }
            if self.node(child).style.position_type == PositionType::Absolute {
                continue;
            }
            if single_flex_child == Some(child) {
                let generation = self.generation;
                let n = self.node_mut(child);
                n.layout.computed_flex_basis_generation = generation;
                n.layout.computed_flex_basis = 0.0;
            } else {
                self.compute_flex_basis_for_child(
                    node,
                    child,
                    available_inner_width,
                    width_mode,
                    available_inner_height,
                    available_inner_width,
                    available_inner_height,
                    height_mode,
                    direction,
                );
            }
            total_outer_flex_basis += self.node(child).layout.computed_flex_basis
                + self
                    .node(child)
                    .style
                    .margin_for_axis(main_axis, available_inner_width);
        }
        total_outer_flex_basis
    }

    // ---- line collection ----

    #[allow(clippy::too_many_arguments)]
    fn collect_flex_line(
        &mut self,
        node: NodeId,
        owner_direction: Direction,
        main_axis_owner_size: f32,
        available_inner_width: f32,
        available_inner_main_dim: f32,
        start_of_line_index: usize,
        line_count: usize,
    ) -> FlexLine {
        let mut line = FlexLine {
            items: Vec::new(),
            size_consumed: 0.0,
            total_flex_grow_factors: 0.0,
            total_flex_shrink_scaled_factors: 0.0,
            end_of_line_index: start_of_line_index,
            remaining_free_space: 0.0,
            main_dim: 0.0,
            cross_dim: 0.0,
        };

        let direction = self.node(node).resolve_direction(owner_direction);
        let main_axis = self.node(node).style.flex_direction.resolve(direction);
        let is_node_flex_wrap = self.node(node).style.flex_wrap != Wrap::NoWrap;
        let gap = self.node(node).style.gap_for_axis(main_axis, available_inner_width);

        let mut size_consumed_including_min_constraint = 0.0;
        let children = self.node(node).children.clone();

        // Add items to the current line until it's full or we run out of
        // items.
        let mut end_of_line_index = start_of_line_index;
        while end_of_line_index < children.len() {
            let child = children[end_of_line_index];
            let child_style = self.node(child).style;
            if child_style.display == Display::None
                || child_style.position_type == PositionType::Absolute
            {
                end_of_line_index += 1;
                line.end_of_line_index = end_of_line_index;
                continue;
            }

            let is_first_element_in_line = line.items.is_empty();
            self.node_mut(child).line_index = line_count;

            let child_margin_main_axis = child_style.margin_for_axis(main_axis, available_inner_width);
            let child_leading_gap_main_axis = if is_first_element_in_line { 0.0 } else { gap };
            let flex_basis_with_min_and_max_constraints = self.bound_axis_within_min_max(
                child,
                main_axis,
                self.node(child).layout.computed_flex_basis,
                main_axis_owner_size,
            );

            // If this is a multi-line flow and this item pushes us over the
            // available size, we've hit the end of the current line.
            if size_consumed_including_min_constraint
                + flex_basis_with_min_and_max_constraints
                + child_margin_main_axis
                + child_leading_gap_main_axis
                > available_inner_main_dim
                && is_node_flex_wrap
                && !line.items.is_empty()
            {
                break;
            }

            size_consumed_including_min_constraint += flex_basis_with_min_and_max_constraints
                + child_margin_main_axis
                + child_leading_gap_main_axis;
            line.size_consumed += flex_basis_with_min_and_max_constraints
                + child_margin_main_axis
                + child_leading_gap_main_axis;

            if self.is_node_flexible(child) {
                line.total_flex_grow_factors += self.resolve_flex_grow(child);
                // Unlike the grow factor, the shrink factor is scaled
                // relative to the child dimension.
                line.total_flex_shrink_scaled_factors += -self.resolve_flex_shrink(child)
                    * self.node(child).layout.computed_flex_basis;
            }

            line.items.push(child);
            end_of_line_index += 1;
            line.end_of_line_index = end_of_line_index;
        }

        // The total flex factors need to be floored to 1.
        if line.total_flex_grow_factors > 0.0 && line.total_flex_grow_factors < 1.0 {
            line.total_flex_grow_factors = 1.0;
        }
        if line.total_flex_shrink_scaled_factors > 0.0 && line.total_flex_shrink_scaled_factors < 1.0
        {
            line.total_flex_shrink_scaled_factors = 1.0;
        }

        line
    }

    // ---- flexible length resolution ----

    fn distribute_free_space_first_pass(
        &mut self,
        line: &mut FlexLine,
        main_axis: FlexDirection,
        main_axis_owner_size: f32,
        available_inner_main_dim: f32,
        available_inner_width: f32,
    ) {
        let mut delta_free_space = 0.0;
        let items = line.items.clone();
        for child in items {
            let child_flex_basis = self.bound_axis_within_min_max(
                child,
                main_axis,
                self.node(child).layout.computed_flex_basis,
                main_axis_owner_size,
            );

            if line.remaining_free_space < 0.0 {
                let flex_shrink_scaled_factor = -self.resolve_flex_shrink(child) * child_flex_basis;
                // Is this child able to shrink?
                if num::is_defined(flex_shrink_scaled_factor) && flex_shrink_scaled_factor != 0.0 {
                    let base_main_size = child_flex_basis
                        + line.remaining_free_space / line.total_flex_shrink_scaled_factors
                            * flex_shrink_scaled_factor;
                    let bound_main_size = self.bound_axis(
                        child,
                        main_axis,
                        base_main_size,
                        available_inner_main_dim,
                        available_inner_width,
                    );
                    if num::is_defined(base_main_size)
                        && num::is_defined(bound_main_size)
                        && base_main_size != bound_main_size
                    {
                        // By excluding this item's size and flex factor from
                        // remaining, this item's min/max constraints should
                        // also trigger in the second pass resulting in the
                        // item's size calculation being identical in the
                        // first and second passes.
                        delta_free_space += bound_main_size - child_flex_basis;
                        line.total_flex_shrink_scaled_factors -= -self.resolve_flex_shrink(child)
                            * self.node(child).layout.computed_flex_basis;
                    }
                }
            } else if num::is_defined(line.remaining_free_space) && line.remaining_free_space > 0.0
            {
                let flex_grow_factor = self.resolve_flex_grow(child);
                // Is this child able to grow?
                if num::is_defined(flex_grow_factor) && flex_grow_factor != 0.0 {
                    let base_main_size = child_flex_basis
                        + line.remaining_free_space / line.total_flex_grow_factors
                            * flex_grow_factor;
                    let bound_main_size = self.bound_axis(
                        child,
                        main_axis,
                        base_main_size,
                        available_inner_main_dim,
                        available_inner_width,
                    );
                    if num::is_defined(base_main_size)
                        && num::is_defined(bound_main_size)
                        && base_main_size != bound_main_size
                    {
                        delta_free_space += bound_main_size - child_flex_basis;
                        line.total_flex_grow_factors -= flex_grow_factor;
                    }
                }
            }
        }
        line.remaining_free_space -= delta_free_space;
    }

    #[allow(clippy::too_many_arguments)]
    fn distribute_free_space_second_pass(
        &mut self,
        line: &mut FlexLine,
        node: NodeId,
        main_axis: FlexDirection,
        cross_axis: FlexDirection,
        main_axis_owner_size: f32,
        available_inner_main_dim: f32,
        available_inner_cross_dim: f32,
        available_inner_width: f32,
        available_inner_height: f32,
        main_axis_overflows: bool,
        measure_mode_cross_dim: MeasureMode,
        perform_layout: bool,
    ) -> f32 {
        let mut delta_free_space = 0.0;
        let is_main_axis_row = main_axis.is_row();
        let is_node_flex_wrap = self.node(node).style.flex_wrap != Wrap::NoWrap;

        let items = line.items.clone();
        for child in items {
            let child_flex_basis = self.bound_axis_within_min_max(
                child,
                main_axis,
                self.node(child).layout.computed_flex_basis,
                main_axis_owner_size,
            );
            let mut updated_main_size = child_flex_basis;

            if num::is_defined(line.remaining_free_space) && line.remaining_free_space < 0.0 {
                let flex_shrink_scaled_factor = -self.resolve_flex_shrink(child) * child_flex_basis;
                // Is this child able to shrink?
                if flex_shrink_scaled_factor != 0.0 {
                    let child_size = if num::is_defined(line.total_flex_shrink_scaled_factors)
                        && line.total_flex_shrink_scaled_factors == 0.0
                    {
                        child_flex_basis + flex_shrink_scaled_factor
                    } else {
                        child_flex_basis
                            + (line.remaining_free_space / line.total_flex_shrink_scaled_factors)
                                * flex_shrink_scaled_factor
                    };
                    updated_main_size = self.bound_axis(
                        child,
                        main_axis,
                        child_size,
                        available_inner_main_dim,
                        available_inner_width,
                    );
                }
            } else if num::is_defined(line.remaining_free_space) && line.remaining_free_space > 0.0
            {
                let flex_grow_factor = self.resolve_flex_grow(child);
                // Is this child able to grow?
                if num::is_defined(flex_grow_factor) && flex_grow_factor != 0.0 {
                    updated_main_size = self.bound_axis(
                        child,
                        main_axis,
                        child_flex_basis
                            + line.remaining_free_space / line.total_flex_grow_factors
                                * flex_grow_factor,
                        available_inner_main_dim,
                        available_inner_width,
                    );
                }
            }

            delta_free_space += updated_main_size - child_flex_basis;

            let child_style = self.node(child).style;
            let margin_main = child_style.margin_for_axis(main_axis, available_inner_width);
            let margin_cross = child_style.margin_for_axis(cross_axis, available_inner_width);

            let mut child_cross_size;
            let mut child_main_size = updated_main_size + margin_main;
            let mut child_cross_mode;
            let mut child_main_mode = MeasureMode::Exactly;

            let aspect_ratio = child_style.aspect_ratio;
            if num::is_defined(aspect_ratio) {
                child_cross_size = if is_main_axis_row {
                    (child_main_size - margin_main) / aspect_ratio
                } else {
                    (child_main_size - margin_main) * aspect_ratio
                };
                child_cross_mode = MeasureMode::Exactly;
                child_cross_size += margin_cross;
            } else if num::is_defined(available_inner_cross_dim)
                && !self.is_style_dim_defined(child, cross_axis, available_inner_cross_dim)
                && measure_mode_cross_dim == MeasureMode::Exactly
                && !(is_node_flex_wrap && main_axis_overflows)
                && self.align_item(node, child) == Align::Stretch
                && !child_style.margin_leading_value(cross_axis).is_auto()
                && !child_style.margin_trailing_value(cross_axis).is_auto()
            {
                child_cross_size = available_inner_cross_dim;
                child_cross_mode = MeasureMode::Exactly;
            } else if !self.is_style_dim_defined(child, cross_axis, available_inner_cross_dim) {
                child_cross_size = available_inner_cross_dim;
                child_cross_mode = if num::is_undefined(child_cross_size) {
                    MeasureMode::Undefined
                } else {
                    MeasureMode::AtMost
                };
            } else {
                let resolved_cross = self.node(child).resolved_dimension(cross_axis.dimension());
                child_cross_size =
                    resolved_cross.resolve(available_inner_cross_dim) + margin_cross;
                let is_loose_percentage_measurement =
                    matches!(resolved_cross, Value::Percent(_))
                        && measure_mode_cross_dim != MeasureMode::Exactly;
                child_cross_mode =
                    if num::is_undefined(child_cross_size) || is_loose_percentage_measurement {
                        MeasureMode::Undefined
                    } else {
                        MeasureMode::Exactly
                    };
            }

            self.constrain_max_size_for_mode(
                child,
                main_axis,
                available_inner_main_dim,
                available_inner_width,
                &mut child_main_mode,
                &mut child_main_size,
            );
            self.constrain_max_size_for_mode(
                child,
                cross_axis,
                available_inner_cross_dim,
                available_inner_width,
                &mut child_cross_mode,
                &mut child_cross_size,
            );

            let requires_stretch_layout =
                !self.is_style_dim_defined(child, cross_axis, available_inner_cross_dim)
                    && self.align_item(node, child) == Align::Stretch
                    && !child_style.margin_leading_value(cross_axis).is_auto()
                    && !child_style.margin_trailing_value(cross_axis).is_auto();

            let child_width = if is_main_axis_row { child_main_size } else { child_cross_size };
            let child_height = if is_main_axis_row { child_cross_size } else { child_main_size };
            let child_width_mode = if is_main_axis_row { child_main_mode } else { child_cross_mode };
            let child_height_mode = if is_main_axis_row { child_cross_mode } else { child_main_mode };

            let is_layout_pass = perform_layout && !requires_stretch_layout;
            let direction = self.node(node).layout.direction;
            // Recursively call the layout algorithm for this child with the
            // updated main size.
            self.layout_node_internal(
                child,
                child_width,
                child_height,
                direction,
                child_width_mode,
                child_height_mode,
                available_inner_width,
                available_inner_height,
                is_layout_pass,
            );
            let child_overflowed = self.node(child).layout.had_overflow;
            let n = self.node_mut(node);
            n.layout.had_overflow = n.layout.had_overflow || child_overflowed;
        }
        delta_free_space
    }

    /// Two passes over the line: freeze min/max violators first, then size
    /// the rest against the adjusted pool of free space and flex factors.
    #[allow(clippy::too_many_arguments)]
    fn resolve_flexible_lengths(
        &mut self,
        line: &mut FlexLine,
        node: NodeId,
        main_axis: FlexDirection,
        cross_axis: FlexDirection,
        main_axis_owner_size: f32,
        available_inner_main_dim: f32,
        available_inner_cross_dim: f32,
        available_inner_width: f32,
        available_inner_height: f32,
        main_axis_overflows: bool,
        measure_mode_cross_dim: MeasureMode,
        perform_layout: bool,
    ) {
        let original_free_space = line.remaining_free_space;
        self.distribute_free_space_first_pass(
            line,
            main_axis,
            main_axis_owner_size,
            available_inner_main_dim,
            available_inner_width,
        );
        let distributed_free_space = self.distribute_free_space_second_pass(
            line,
            node,
            main_axis,
            cross_axis,
            main_axis_owner_size,
            available_inner_main_dim,
            available_inner_cross_dim,
            available_inner_width,
            available_inner_height,
            main_axis_overflows,
            measure_mode_cross_dim,
            perform_layout,
        );
        line.remaining_free_space = original_free_space - distributed_free_space;
    }

    // ---- main axis justification ----

    #[allow(clippy::too_many_arguments)]
    fn justify_main_axis(
        &mut self,
        node: NodeId,
        line: &mut FlexLine,
        start_of_line_index: usize,
        main_axis: FlexDirection,
        cross_axis: FlexDirection,
        measure_mode_main_dim: MeasureMode,
        measure_mode_cross_dim: MeasureMode,
        main_axis_owner_size: f32,
        owner_width: f32,
        available_inner_main_dim: f32,
        available_inner_cross_dim: f32,
        available_inner_width: f32,
        perform_layout: bool,
    ) {
        let style = self.node(node).style;
        let leading_padding_and_border_main =
            style.leading_padding_and_border(main_axis, owner_width);
        let trailing_padding_and_border_main =
            style.trailing_padding_and_border(main_axis, owner_width);
        let gap = style.gap_for_axis(main_axis, owner_width);

        // If we are using "at most" rules in the main axis, make sure that
        // remainingFreeSpace is 0 when min main dimension is not given.
        if measure_mode_main_dim == MeasureMode::AtMost && line.remaining_free_space > 0.0 {
            let min_main = style
                .min_dimension(main_axis.dimension())
                .resolve(main_axis_owner_size);
            if num::is_defined(min_main) {
                // The line might overshoot the available space, but a min
                // dimension can still claim part of the remainder.
                let min_available_main_dim = min_main
                    - leading_padding_and_border_main
                    - trailing_padding_and_border_main;
                let occupied_space_by_child_nodes =
                    available_inner_main_dim - line.remaining_free_space;
                line.remaining_free_space =
                    num::float_max(0.0, min_available_main_dim - occupied_space_by_child_nodes);
            } else {
                line.remaining_free_space = 0.0;
            }
        }

        let children = self.node(node).children.clone();

        let mut number_of_auto_margins_on_current_line = 0;
        for &child in &children[start_of_line_index..line.end_of_line_index] {
            let child_style = &self.node(child).style;
            if child_style.position_type != PositionType::Absolute {
                if child_style.margin_leading_value(main_axis).is_auto() {
                    number_of_auto_margins_on_current_line += 1;
                }
                if child_style.margin_trailing_value(main_axis).is_auto() {
                    number_of_auto_margins_on_current_line += 1;
                }
            }
        }

        // In order to position the elements in the main axis, we have two
        // controls: the space between the beginning and the first element
        // and the space between each two elements.
        let mut leading_main_dim = 0.0;
        let mut between_main_dim = gap;
        let justify_content = style.justify_content;
        let items_on_line = line.items.len();

        if number_of_auto_margins_on_current_line == 0 {
            match justify_content {
                Justify::Center => leading_main_dim = line.remaining_free_space / 2.0,
                Justify::FlexEnd => leading_main_dim = line.remaining_free_space,
                Justify::SpaceBetween => {
                    if items_on_line > 1 {
                        between_main_dim += num::float_max(line.remaining_free_space, 0.0)
                            / (items_on_line - 1) as f32;
                    }
                }
                Justify::SpaceEvenly => {
                    // Space is distributed evenly across all elements.
                    leading_main_dim = line.remaining_free_space / (items_on_line + 1) as f32;
                    between_main_dim += leading_main_dim;
                }
                Justify::SpaceAround => {
                    // Space on the edges is half of the space between
                    // elements.
                    leading_main_dim =
                        0.5 * line.remaining_free_space / items_on_line as f32;
                    between_main_dim += leading_main_dim * 2.0;
                }
                Justify::FlexStart => {}
            }
        }

        line.main_dim = leading_padding_and_border_main + leading_main_dim;
        line.cross_dim = 0.0;

        let mut max_ascent_for_current_line = 0.0_f32;
        let mut max_descent_for_current_line = 0.0_f32;
        let is_node_baseline_layout = self.is_baseline_layout(node);
        let can_skip_flex = !perform_layout && measure_mode_cross_dim == MeasureMode::Exactly;

        for i in start_of_line_index..line.end_of_line_index {
            let child = children[i];
            let child_style = self.node(child).style;
            let is_last_child = i == line.end_of_line_index - 1;
            // Remove the gap if it is the last element of the line.
            if is_last_child {
                between_main_dim -= gap;
            }
            if child_style.display == Display::None {
                continue;
            }
            if child_style.position_type == PositionType::Absolute
                && child_style.is_leading_position_defined(main_axis)
            {
                if perform_layout {
                    // In case the child is position absolute and has
                    // left/top being defined, we override the position to
                    // whatever the user said (and margin/border).
                    let position = child_style.leading_position(main_axis, available_inner_main_dim)
                        + self.node(node).style.leading_border(main_axis)
                        + child_style.leading_margin(main_axis, available_inner_width);
                    self.node_mut(child).layout.position[main_axis.position_edge() as usize] =
                        position;
                }
            } else if child_style.position_type != PositionType::Absolute {
                // Now that we placed the element, we need to update the
                // variables. We need to do that only for relative elements.
                // Absolute elements do not take part in that phase.
                if child_style.margin_leading_value(main_axis).is_auto() {
                    line.main_dim += line.remaining_free_space
                        / number_of_auto_margins_on_current_line as f32;
                }
                if perform_layout {
                    let edge = main_axis.position_edge() as usize;
                    self.node_mut(child).layout.position[edge] += line.main_dim;
                }
                if child_style.margin_trailing_value(main_axis).is_auto() {
                    line.main_dim += line.remaining_free_space
                        / number_of_auto_margins_on_current_line as f32;
                }
                if can_skip_flex {
                    // If we skipped the flex step, then we can't rely on the
                    // measuredDims because they weren't computed. This means
                    // we can't call dim_with_margin.
                    line.main_dim += between_main_dim
                        + child_style.margin_for_axis(main_axis, available_inner_width)
                        + self.node(child).layout.computed_flex_basis;
                    line.cross_dim = available_inner_cross_dim;
                } else {
                    // The main dimension is the sum of all the elements
                    // dimension plus the spacing.
                    line.main_dim +=
                        between_main_dim + self.dim_with_margin(child, main_axis, available_inner_width);

                    if is_node_baseline_layout {
                        // If the child is baseline aligned then the
                        // cross dimension is calculated by adding
                        // maxAscent and maxDescent from the baseline.
                        let ascent = self.node_baseline(child)
                            + child_style.leading_margin(FlexDirection::Column, available_inner_width);
                        let descent = self.node(child).layout.measured_dimensions
                            [Dim::Height as usize]
                            + child_style.margin_for_axis(FlexDirection::Column, available_inner_width)
                            - ascent;
                        max_ascent_for_current_line =
                            num::float_max(max_ascent_for_current_line, ascent);
                        max_descent_for_current_line =
                            num::float_max(max_descent_for_current_line, descent);
                    } else {
                        // The cross dimension is the max of the elements
                        // dimension since there can only be one element in
                        // that cross dimension in the case when the items
                        // are not baseline aligned.
                        line.cross_dim = num::float_max(
                            line.cross_dim,
                            self.dim_with_margin(child, cross_axis, available_inner_width),
                        );
                    }
                }
            } else if perform_layout {
                let edge = main_axis.position_edge() as usize;
                let leading_border = self.node(node).style.leading_border(main_axis);
                self.node_mut(child).layout.position[edge] += leading_border + leading_main_dim;
            }
        }
        line.main_dim += trailing_padding_and_border_main;

        if is_node_baseline_layout {
            line.cross_dim = max_ascent_for_current_line + max_descent_for_current_line;
        }
    }

    // ---- absolute children ----

    #[allow(clippy::too_many_arguments)]
    fn absolute_layout_child(
        &mut self,
        node: NodeId,
        child: NodeId,
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        direction: Direction,
    ) {
        let main_axis = self.node(node).style.flex_direction.resolve(direction);
        let cross_axis = main_axis.cross(direction);
        let is_main_axis_row = main_axis.is_row();

        let mut child_width = f32::NAN;
        let mut child_height = f32::NAN;

        let child_style = self.node(child).style;
        let margin_row = child_style.margin_for_axis(FlexDirection::Row, width);
        let margin_column = child_style.margin_for_axis(FlexDirection::Column, width);

        if self.is_style_dim_defined(child, FlexDirection::Row, width) {
            child_width =
                self.node(child).resolved_dimension(Dim::Width).resolve(width) + margin_row;
        } else {
            // If the child doesn't have a specified width, compute the width
            // based on the left/right offsets if they're defined.
            if child_style.is_leading_position_defined(FlexDirection::Row)
                && child_style.is_trailing_position_defined(FlexDirection::Row)
            {
                child_width = self.node(node).layout.measured_dimensions[Dim::Width as usize]
                    - (self.node(node).style.leading_border(FlexDirection::Row)
                        + self.node(node).style.trailing_border(FlexDirection::Row))
                    - (child_style.leading_position(FlexDirection::Row, width)
                        + child_style.trailing_position(FlexDirection::Row, width));
                child_width = self.bound_axis(child, FlexDirection::Row, child_width, width, width);
            }
        }

        if self.is_style_dim_defined(child, FlexDirection::Column, height) {
            child_height =
                self.node(child).resolved_dimension(Dim::Height).resolve(height) + margin_column;
        } else {
            if child_style.is_leading_position_defined(FlexDirection::Column)
                && child_style.is_trailing_position_defined(FlexDirection::Column)
            {
                child_height = self.node(node).layout.measured_dimensions[Dim::Height as usize]
                    - (self.node(node).style.leading_border(FlexDirection::Column)
                        + self.node(node).style.trailing_border(FlexDirection::Column))
                    - (child_style.leading_position(FlexDirection::Column, height)
                        + child_style.trailing_position(FlexDirection::Column, height));
                child_height =
                    self.bound_axis(child, FlexDirection::Column, child_height, height, width);
            }
        }

        // Exactly one dimension needs to be defined for us to be able to do
        // aspect ratio calculation. One dimension being the anchor and the
        // other being flexible.
        let aspect_ratio = child_style.aspect_ratio;
        if num::is_undefined(child_width) ^ num::is_undefined(child_height) {
            if num::is_defined(aspect_ratio) {
                if num::is_undefined(child_width) {
                    child_width = margin_row + (child_height - margin_column) * aspect_ratio;
                } else if num::is_undefined(child_height) {
                    child_height = margin_column + (child_width - margin_row) / aspect_ratio;
                }
            }
        }

        // If we're still missing one or the other dimension, measure the
        // content.
        if num::is_undefined(child_width) || num::is_undefined(child_height) {
            let mut child_width_mode = if num::is_undefined(child_width) {
                MeasureMode::Undefined
            } else {
                MeasureMode::Exactly
            };
            let child_height_mode = if num::is_undefined(child_height) {
                MeasureMode::Undefined
            } else {
                MeasureMode::Exactly
            };

            // If the size of the owner is defined then try to constrain the
            // absolute child to that size as well. This allows text within
            // the absolute child to wrap to the size of its owner.
            if !is_main_axis_row
                && num::is_undefined(child_width)
                && width_mode != MeasureMode::Undefined
                && num::is_defined(width)
                && width > 0.0
            {
                child_width = width;
                child_width_mode = MeasureMode::AtMost;
            }

            self.layout_node_internal(
                child,
                child_width,
                child_height,
                direction,
                child_width_mode,
                child_height_mode,
                child_width,
                child_height,
                false,
            );
            child_width = self.node(child).layout.measured_dimensions[Dim::Width as usize]
                + child_style.margin_for_axis(FlexDirection::Row, width);
            child_height = self.node(child).layout.measured_dimensions[Dim::Height as usize]
                + child_style.margin_for_axis(FlexDirection::Column, width);
        }

        self.layout_node_internal(
            child,
            child_width,
            child_height,
            direction,
            MeasureMode::Exactly,
            MeasureMode::Exactly,
            child_width,
            child_height,
            true,
        );

        let main_axis_size = if is_main_axis_row { width } else { height };
        let cross_axis_size = if is_main_axis_row { height } else { width };

        if child_style.is_trailing_position_defined(main_axis)
            && !child_style.is_leading_position_defined(main_axis)
        {
            let position = self.node(node).layout.measured_dimensions
                [main_axis.dimension() as usize]
                - self.node(child).layout.measured_dimensions[main_axis.dimension() as usize]
                - self.node(node).style.trailing_border(main_axis)
                - child_style.trailing_margin(main_axis, width)
                - child_style.trailing_position(main_axis, main_axis_size);
            self.node_mut(child).layout.position[main_axis.position_edge() as usize] = position;
        } else if !child_style.is_leading_position_defined(main_axis)
            && self.node(node).style.justify_content == Justify::Center
        {
            let position = (self.node(node).layout.measured_dimensions
                [main_axis.dimension() as usize]
                - self.node(child).layout.measured_dimensions[main_axis.dimension() as usize])
                / 2.0;
            self.node_mut(child).layout.position[main_axis.position_edge() as usize] = position;
        } else if !child_style.is_leading_position_defined(main_axis)
            && self.node(node).style.justify_content == Justify::FlexEnd
        {
            let position = self.node(node).layout.measured_dimensions
                [main_axis.dimension() as usize]
                - self.node(child).layout.measured_dimensions[main_axis.dimension() as usize];
            self.node_mut(child).layout.position[main_axis.position_edge() as usize] = position;
        }

        if child_style.is_trailing_position_defined(cross_axis)
            && !child_style.is_leading_position_defined(cross_axis)
        {
            let position = self.node(node).layout.measured_dimensions
                [cross_axis.dimension() as usize]
                - self.node(child).layout.measured_dimensions[cross_axis.dimension() as usize]
                - self.node(node).style.trailing_border(cross_axis)
                - child_style.trailing_margin(cross_axis, width)
                - child_style.trailing_position(cross_axis, cross_axis_size);
            self.node_mut(child).layout.position[cross_axis.position_edge() as usize] = position;
        } else if !child_style.is_leading_position_defined(cross_axis)
            && self.align_item(node, child) == Align::Center
        {
            let position = (self.node(node).layout.measured_dimensions
                [cross_axis.dimension() as usize]
                - self.node(child).layout.measured_dimensions[cross_axis.dimension() as usize])
                / 2.0;
            self.node_mut(child).layout.position[cross_axis.position_edge() as usize] = position;
        } else if !child_style.is_leading_position_defined(cross_axis)
            && ((self.align_item(node, child) == Align::FlexEnd)
                ^ (self.node(node).style.flex_wrap == Wrap::WrapReverse))
        {
            let position = self.node(node).layout.measured_dimensions
                [cross_axis.dimension() as usize]
                - self.node(child).layout.measured_dimensions[cross_axis.dimension() as usize];
            self.node_mut(child).layout.position[cross_axis.position_edge() as usize] = position;
        }
    }

    // ---- leaf and trivial measurements ----

    #[allow(clippy::too_many_arguments)]
    fn measure_node_with_measure_func(
        &mut self,
        node: NodeId,
        available_width: f32,
        available_height: f32,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        owner_width: f32,
        owner_height: f32,
    ) {
        let style = self.node(node).style;
        let padding_and_border_axis_row =
            style.padding_and_border_for_axis(FlexDirection::Row, available_width);
        let padding_and_border_axis_column =
            style.padding_and_border_for_axis(FlexDirection::Column, available_width);
        let margin_axis_row = style.margin_for_axis(FlexDirection::Row, available_width);
        let margin_axis_column = style.margin_for_axis(FlexDirection::Column, available_width);

        // We want to make sure we don't call measure with negative size.
        let inner_width = if num::is_undefined(available_width) {
            available_width
        } else {
            num::float_max(0.0, available_width - margin_axis_row - padding_and_border_axis_row)
        };
        let inner_height = if num::is_undefined(available_height) {
            available_height
        } else {
            num::float_max(
                0.0,
                available_height - margin_axis_column - padding_and_border_axis_column,
            )
        };

        if width_mode == MeasureMode::Exactly && height_mode == MeasureMode::Exactly {
            // Don't bother sizing the text if both dimensions are already
            // defined.
            let width = self.bound_axis(
                node,
                FlexDirection::Row,
                available_width - margin_axis_row,
                owner_width,
                owner_width,
            );
            let height = self.bound_axis(
                node,
                FlexDirection::Column,
                available_height - margin_axis_column,
                owner_height,
                owner_width,
            );
            let n = self.node_mut(node);
            n.layout.measured_dimensions[Dim::Width as usize] = width;
            n.layout.measured_dimensions[Dim::Height as usize] = height;
            return;
        }

        // Measure the text under the current constraints.
        let mut func = self.node_mut(node).measure.take();
        let measured: Size = match func.as_mut() {
            Some(func) => func.measure(inner_width, width_mode, inner_height, height_mode),
            None => unreachable!(),
        };
        self.node_mut(node).measure = func;

        if num::is_undefined(measured.width) || num::is_undefined(measured.height) {
            error!("measure function returned an undefined dimension");
            panic!("measure function returned an undefined dimension");
        }

        let width = self.bound_axis(
            node,
            FlexDirection::Row,
            if width_mode == MeasureMode::Undefined || width_mode == MeasureMode::AtMost {
                measured.width + padding_and_border_axis_row
            } else {
                available_width - margin_axis_row
            },
            owner_width,
            owner_width,
        );
        let height = self.bound_axis(
            node,
            FlexDirection::Column,
            if height_mode == MeasureMode::Undefined || height_mode == MeasureMode::AtMost {
                measured.height + padding_and_border_axis_column
            } else {
                available_height - margin_axis_column
            },
            owner_height,
            owner_width,
        );
        let n = self.node_mut(node);
        n.layout.measured_dimensions[Dim::Width as usize] = width;
        n.layout.measured_dimensions[Dim::Height as usize] = height;
    }

    /// For nodes with no children: padding plus border is the content size.
    #[allow(clippy::too_many_arguments)]
    fn measure_empty_container(
        &mut self,
        node: NodeId,
        available_width: f32,
        available_height: f32,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        owner_width: f32,
        owner_height: f32,
    ) {
        let style = self.node(node).style;
        let padding_and_border_axis_row =
            style.padding_and_border_for_axis(FlexDirection::Row, owner_width);
        let padding_and_border_axis_column =
            style.padding_and_border_for_axis(FlexDirection::Column, owner_width);
        let margin_axis_row = style.margin_for_axis(FlexDirection::Row, owner_width);
        let margin_axis_column = style.margin_for_axis(FlexDirection::Column, owner_width);

        let width = self.bound_axis(
            node,
            FlexDirection::Row,
            if width_mode == MeasureMode::Undefined || width_mode == MeasureMode::AtMost {
                padding_and_border_axis_row
            } else {
                available_width - margin_axis_row
            },
            owner_width,
            owner_width,
        );
        let height = self.bound_axis(
            node,
            FlexDirection::Column,
            if height_mode == MeasureMode::Undefined || height_mode == MeasureMode::AtMost {
                padding_and_border_axis_column
            } else {
                available_height - margin_axis_column
            },
            owner_height,
            owner_width,
        );
        let n = self.node_mut(node);
        n.layout.measured_dimensions[Dim::Width as usize] = width;
        n.layout.measured_dimensions[Dim::Height as usize] = height;
    }

    /// Fast path for measure-only passes when the size is already decided.
    #[allow(clippy::too_many_arguments)]
    fn try_fixed_size_measurement(
        &mut self,
        node: NodeId,
        available_width: f32,
        available_height: f32,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        owner_width: f32,
        owner_height: f32,
    ) -> bool {
        let collapsed_width = num::is_defined(available_width)
            && width_mode == MeasureMode::AtMost
            && available_width <= 0.0;
        let collapsed_height = num::is_defined(available_height)
            && height_mode == MeasureMode::AtMost
            && available_height <= 0.0;
        let both_exact =
            width_mode == MeasureMode::Exactly && height_mode == MeasureMode::Exactly;
        if !(collapsed_width || collapsed_height || both_exact) {
            return false;
        }

        let style = self.node(node).style;
        let margin_axis_row = style.margin_for_axis(FlexDirection::Row, owner_width);
        let margin_axis_column = style.margin_for_axis(FlexDirection::Column, owner_width);

        let width = self.bound_axis(
            node,
            FlexDirection::Row,
            if num::is_undefined(available_width)
                || (width_mode == MeasureMode::AtMost && available_width < 0.0)
            {
                0.0
            } else {
                available_width - margin_axis_row
            },
            owner_width,
            owner_width,
        );
        let height = self.bound_axis(
            node,
            FlexDirection::Column,
            if num::is_undefined(available_height)
                || (height_mode == MeasureMode::AtMost && available_height < 0.0)
            {
                0.0
            } else {
                available_height - margin_axis_column
            },
            owner_height,
            owner_width,
        );
        let n = self.node_mut(node);
        n.layout.measured_dimensions[Dim::Width as usize] = width;
        n.layout.measured_dimensions[Dim::Height as usize] = height;
        true
    }

    // ---- the full pass ----

    #[allow(clippy::too_many_arguments)]
    fn layout_impl(
        &mut self,
        node: NodeId,
        available_width: f32,
        available_height: f32,
        owner_direction: Direction,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        owner_width: f32,
        owner_height: f32,
        perform_layout: bool,
    ) {
        if num::is_undefined(available_width) && width_mode != MeasureMode::Undefined {
            error!("undefined available width requires MeasureMode::Undefined");
            panic!("undefined available width requires MeasureMode::Undefined");
        }
        if num::is_undefined(available_height) && height_mode != MeasureMode::Undefined {
            error!("undefined available height requires MeasureMode::Undefined");
            panic!("undefined available height requires MeasureMode::Undefined");
        }

        let direction = self.node(node).resolve_direction(owner_direction);
        self.node_mut(node).layout.direction = direction;

        let flex_row_direction = FlexDirection::Row.resolve(direction);
        let flex_column_direction = FlexDirection::Column.resolve(direction);
        let start_edge = if direction == Direction::Rtl { Edge::Right } else { Edge::Left };
        let end_edge = if direction == Direction::Rtl { Edge::Left } else { Edge::Right };

        let style = self.node(node).style;
        let margin_row_leading = style.leading_margin(flex_row_direction, owner_width);
        let margin_row_trailing = style.trailing_margin(flex_row_direction, owner_width);
        let margin_column_leading = style.leading_margin(flex_column_direction, owner_width);
        let margin_column_trailing = style.trailing_margin(flex_column_direction, owner_width);
        {
            let layout = &mut self.node_mut(node).layout;
            layout.margin[start_edge as usize] = margin_row_leading;
            layout.margin[end_edge as usize] = margin_row_trailing;
            layout.margin[Edge::Top as usize] = margin_column_leading;
            layout.margin[Edge::Bottom as usize] = margin_column_trailing;

            layout.border[start_edge as usize] = style.leading_border(flex_row_direction);
            layout.border[end_edge as usize] = style.trailing_border(flex_row_direction);
            layout.border[Edge::Top as usize] = style.leading_border(flex_column_direction);
            layout.border[Edge::Bottom as usize] = style.trailing_border(flex_column_direction);

            layout.padding[start_edge as usize] =
                style.leading_padding(flex_row_direction, owner_width);
            layout.padding[end_edge as usize] =
                style.trailing_padding(flex_row_direction, owner_width);
            layout.padding[Edge::Top as usize] =
                style.leading_padding(flex_column_direction, owner_width);
            layout.padding[Edge::Bottom as usize] =
                style.trailing_padding(flex_column_direction, owner_width);
        }
        let margin_axis_row = margin_row_leading + margin_row_trailing;
        let margin_axis_column = margin_column_leading + margin_column_trailing;

        if self.node(node).measure.is_some() {
            self.measure_node_with_measure_func(
                node,
                available_width,
                available_height,
                width_mode,
                height_mode,
                owner_width,
                owner_height,
            );
            return;
        }

        let child_count = self.node(node).children.len();
        if child_count == 0 {
            self.measure_empty_container(
                node,
                available_width,
                available_height,
                width_mode,
                height_mode,
                owner_width,
                owner_height,
            );
            return;
        }

        // If we're not being asked to perform a full layout we can skip the
        // algorithm if we already know the size.
        if !perform_layout
            && self.try_fixed_size_measurement(
                node,
                available_width,
                available_height,
                width_mode,
                height_mode,
                owner_width,
                owner_height,
            )
        {
            return;
        }

        self.node_mut(node).layout.had_overflow = false;

        let main_axis = style.flex_direction.resolve(direction);
        let cross_axis = main_axis.cross(direction);
        let is_main_axis_row = main_axis.is_row();
        let is_node_flex_wrap = style.flex_wrap != Wrap::NoWrap;

        let main_axis_owner_size = if is_main_axis_row { owner_width } else { owner_height };
        let cross_axis_owner_size = if is_main_axis_row { owner_height } else { owner_width };

        let padding_and_border_axis_main = style.padding_and_border_for_axis(main_axis, owner_width);
        let leading_padding_and_border_cross =
            style.leading_padding_and_border(cross_axis, owner_width);
        let trailing_padding_and_border_cross =
            style.trailing_padding_and_border(cross_axis, owner_width);
        let padding_and_border_axis_cross =
            leading_padding_and_border_cross + trailing_padding_and_border_cross;

        let mut measure_mode_main_dim = if is_main_axis_row { width_mode } else { height_mode };
        let measure_mode_cross_dim = if is_main_axis_row { height_mode } else { width_mode };

        let padding_and_border_axis_row =
            if is_main_axis_row { padding_and_border_axis_main } else { padding_and_border_axis_cross };
        let padding_and_border_axis_column =
            if is_main_axis_row { padding_and_border_axis_cross } else { padding_and_border_axis_main };

        // STEP 2: DETERMINE AVAILABLE SIZE IN MAIN AND CROSS DIRECTIONS

        let available_inner_width = self.calculate_available_inner_dim(
            node,
            Dim::Width,
            available_width - margin_axis_row,
            padding_and_border_axis_row,
            owner_width,
        );
        let available_inner_height = self.calculate_available_inner_dim(
            node,
            Dim::Height,
            available_height - margin_axis_column,
            padding_and_border_axis_column,
            owner_height,
        );
        let mut available_inner_main_dim =
            if is_main_axis_row { available_inner_width } else { available_inner_height };
        let available_inner_cross_dim =
            if is_main_axis_row { available_inner_height } else { available_inner_width };

        // STEP 3: DETERMINE FLEX BASIS FOR EACH ITEM

        let mut total_main_dim = self.compute_flex_basis_for_children(
            node,
            available_inner_width,
            available_inner_height,
            width_mode,
            height_mode,
            direction,
            main_axis,
            perform_layout,
        );
        if child_count > 1 {
            total_main_dim += style.gap_for_axis(main_axis, available_inner_cross_dim)
                * (child_count - 1) as f32;
        }

        let main_axis_overflows = measure_mode_main_dim != MeasureMode::Undefined
            && total_main_dim > available_inner_main_dim;
        if is_node_flex_wrap && main_axis_overflows && measure_mode_main_dim == MeasureMode::AtMost
        {
            measure_mode_main_dim = MeasureMode::Exactly;
        }

        // STEP 4: COLLECT FLEX ITEMS INTO FLEX LINES

        let mut start_of_line_index = 0;
        let mut end_of_line_index = 0;
        let mut line_count = 0usize;
        let mut total_line_cross_dim = 0.0;
        let cross_axis_gap = style.gap_for_axis(cross_axis, available_inner_cross_dim);
        let mut max_line_main_dim = 0.0;

        while end_of_line_index < child_count {
            let mut line = self.collect_flex_line(
                node,
                owner_direction,
                main_axis_owner_size,
                available_inner_width,
                available_inner_main_dim,
                start_of_line_index,
                line_count,
            );
            end_of_line_index = line.end_of_line_index;

            // STEP 5: RESOLVING FLEXIBLE LENGTHS ON MAIN AXIS
            let can_skip_flex = !perform_layout && measure_mode_cross_dim == MeasureMode::Exactly;

            let mut size_based_on_content = false;
            // If we don't measure with exact main dimension we want to
            // ensure we don't violate min and max.
            if measure_mode_main_dim != MeasureMode::Exactly {
                let min_inner_width =
                    style.min_dimension(Dim::Width).resolve(owner_width) - padding_and_border_axis_row;
                let max_inner_width =
                    style.max_dimension(Dim::Width).resolve(owner_width) - padding_and_border_axis_row;
                let min_inner_height = style.min_dimension(Dim::Height).resolve(owner_height)
                    - padding_and_border_axis_column;
                let max_inner_height = style.max_dimension(Dim::Height).resolve(owner_height)
                    - padding_and_border_axis_column;

                let min_inner_main_dim =
                    if is_main_axis_row { min_inner_width } else { min_inner_height };
                let max_inner_main_dim =
                    if is_main_axis_row { max_inner_width } else { max_inner_height };

                if num::is_defined(min_inner_main_dim) && line.size_consumed < min_inner_main_dim {
                    available_inner_main_dim = min_inner_main_dim;
                } else if num::is_defined(max_inner_main_dim)
                    && line.size_consumed > max_inner_main_dim
                {
                    available_inner_main_dim = max_inner_main_dim;
                } else {
                    let use_legacy_stretch_behaviour =
                        self.config().use_legacy_stretch_behaviour;
                    if !use_legacy_stretch_behaviour
                        && ((num::is_defined(line.total_flex_grow_factors)
                            && line.total_flex_grow_factors == 0.0)
                            || (num::is_defined(self.resolve_flex_grow(node))
                                && self.resolve_flex_grow(node) == 0.0))
                    {
                        // If we don't have any children to flex or we can't
                        // flex the node itself, space we've used is all
                        // space we need. Root node also should be shrunk to
                        // minimum.
                        available_inner_main_dim = line.size_consumed;
                    }
                    size_based_on_content = !use_legacy_stretch_behaviour;
                }
            }

            if !size_based_on_content && num::is_defined(available_inner_main_dim) {
                line.remaining_free_space = available_inner_main_dim - line.size_consumed;
            } else if line.size_consumed < 0.0 {
                // availableInnerMainDim is indefinite which means the node
                // is being sized based on its content. sizeConsumed is
                // negative which means the node will allocate 0 points for
                // its content. Consequently, remainingFreeSpace is 0 -
                // sizeConsumed.
                line.remaining_free_space = -line.size_consumed;
            }

            if !can_skip_flex {
                self.resolve_flexible_lengths(
                    &mut line,
                    node,
                    main_axis,
                    cross_axis,
                    main_axis_owner_size,
                    available_inner_main_dim,
                    available_inner_cross_dim,
                    available_inner_width,
                    available_inner_height,
                    main_axis_overflows,
                    measure_mode_cross_dim,
                    perform_layout,
                );
            }

            {
                let overflowed = line.remaining_free_space < 0.0;
                let n = self.node_mut(node);
                n.layout.had_overflow = n.layout.had_overflow || overflowed;
            }

            // STEP 6: MAIN-AXIS JUSTIFICATION & CROSS-AXIS SIZE DETERMINATION
            self.justify_main_axis(
                node,
                &mut line,
                start_of_line_index,
                main_axis,
                cross_axis,
                measure_mode_main_dim,
                measure_mode_cross_dim,
                main_axis_owner_size,
                owner_width,
                available_inner_main_dim,
                available_inner_cross_dim,
                available_inner_width,
                perform_layout,
            );

            let mut container_cross_axis = available_inner_cross_dim;
            if measure_mode_cross_dim == MeasureMode::Undefined
                || measure_mode_cross_dim == MeasureMode::AtMost
            {
                // Compute the cross axis from the max cross dimension of the
                // children.
                container_cross_axis = self.bound_axis(
                    node,
                    cross_axis,
                    line.cross_dim + padding_and_border_axis_cross,
                    cross_axis_owner_size,
                    owner_width,
                ) - padding_and_border_axis_cross;
            }

            // If there's no flex wrap, the cross dimension is defined by the
            // container.
            if !is_node_flex_wrap && measure_mode_cross_dim == MeasureMode::Exactly {
                line.cross_dim = available_inner_cross_dim;
            }

            // Clamp to the min/max size specified on the container.
            line.cross_dim = self.bound_axis(
                node,
                cross_axis,
                line.cross_dim + padding_and_border_axis_cross,
                cross_axis_owner_size,
                owner_width,
            ) - padding_and_border_axis_cross;

            // STEP 7: CROSS-AXIS ALIGNMENT
            // We can skip child alignment if we're just measuring the
            // container.
            if perform_layout {
                let children = self.node(node).children.clone();
                for i in start_of_line_index..end_of_line_index {
                    let child = children[i];
                    let child_style = self.node(child).style;
                    if child_style.display == Display::None {
                        continue;
                    }
                    if child_style.position_type == PositionType::Absolute {
                        // If the child is absolutely positioned and has a
                        // top/left/bottom/right set, override all the
                        // previously computed positions to set it correctly.
                        let is_child_leading_pos_defined =
                            child_style.is_leading_position_defined(cross_axis);
                        if is_child_leading_pos_defined {
                            let position = child_style
                                .leading_position(cross_axis, available_inner_cross_dim)
                                + style.leading_border(cross_axis)
                                + child_style.leading_margin(cross_axis, available_inner_width);
                            self.node_mut(child).layout.position
                                [cross_axis.position_edge() as usize] = position;
                        }
                        // If leading position is not defined or calculations
                        // result in NaN, default to border + margin.
                        if !is_child_leading_pos_defined
                            || num::is_undefined(
                                self.node(child).layout.position
                                    [cross_axis.position_edge() as usize],
                            )
                        {
                            let position = style.leading_border(cross_axis)
                                + child_style.leading_margin(cross_axis, available_inner_width);
                            self.node_mut(child).layout.position
                                [cross_axis.position_edge() as usize] = position;
                        }
                    } else {
                        let mut leading_cross_dim = leading_padding_and_border_cross;

                        // For a relative children, we're either using
                        // alignItems (owner) or alignSelf (child) in order
                        // to determine the position in the cross axis.
                        let align_item = self.align_item(node, child);

                        // If the child uses align stretch, we need to lay it
                        // out one more time, this time forcing the cross-axis
                        // size to be the computed cross size for the current
                        // line.
                        if align_item == Align::Stretch
                            && !child_style.margin_leading_value(cross_axis).is_auto()
                            && !child_style.margin_trailing_value(cross_axis).is_auto()
                        {
                            // If the child defines a definite size for its
                            // cross axis, there's no need to stretch.
                            if !self.is_style_dim_defined(
                                child,
                                cross_axis,
                                available_inner_cross_dim,
                            ) {
                                let mut child_main_size = self.node(child).layout
                                    .measured_dimensions[main_axis.dimension() as usize];
                                let aspect_ratio = child_style.aspect_ratio;
                                let mut child_cross_size = if num::is_defined(aspect_ratio) {
                                    child_style.margin_for_axis(cross_axis, available_inner_width)
                                        + if is_main_axis_row {
                                            child_main_size / aspect_ratio
                                        } else {
                                            child_main_size * aspect_ratio
                                        }
                                } else {
                                    line.cross_dim
                                };
                                child_main_size +=
                                    child_style.margin_for_axis(main_axis, available_inner_width);

                                let mut child_main_mode = MeasureMode::Exactly;
                                let mut child_cross_mode = MeasureMode::Exactly;
                                self.constrain_max_size_for_mode(
                                    child,
                                    main_axis,
                                    available_inner_main_dim,
                                    available_inner_width,
                                    &mut child_main_mode,
                                    &mut child_main_size,
                                );
                                self.constrain_max_size_for_mode(
                                    child,
                                    cross_axis,
                                    available_inner_cross_dim,
                                    available_inner_width,
                                    &mut child_cross_mode,
                                    &mut child_cross_size,
                                );

                                let child_width = if is_main_axis_row {
                                    child_main_size
                                } else {
                                    child_cross_size
                                };
                                let child_height = if is_main_axis_row {
                                    child_cross_size
                                } else {
                                    child_main_size
                                };

                                let align_content = style.align_content;
                                let cross_axis_does_not_grow =
                                    align_content != Align::Stretch && is_node_flex_wrap;
                                let child_width_mode = if num::is_undefined(child_width)
                                    || (!is_main_axis_row && cross_axis_does_not_grow)
                                {
                                    MeasureMode::Undefined
                                } else {
                                    MeasureMode::Exactly
                                };
                                let child_height_mode = if num::is_undefined(child_height)
                                    || (is_main_axis_row && cross_axis_does_not_grow)
                                {
                                    MeasureMode::Undefined
                                } else {
                                    MeasureMode::Exactly
                                };

                                self.layout_node_internal(
                                    child,
                                    child_width,
                                    child_height,
                                    direction,
                                    child_width_mode,
                                    child_height_mode,
                                    available_inner_width,
                                    available_inner_height,
                                    true,
                                );
                            }
                        } else {
                            let remaining_cross_dim = container_cross_axis
                                - self.dim_with_margin(child, cross_axis, available_inner_width);

                            if child_style.margin_leading_value(cross_axis).is_auto()
                                && child_style.margin_trailing_value(cross_axis).is_auto()
                            {
                                leading_cross_dim +=
                                    num::float_max(0.0, remaining_cross_dim / 2.0);
                            } else if child_style.margin_trailing_value(cross_axis).is_auto() {
                                // No-Op
                            } else if child_style.margin_leading_value(cross_axis).is_auto() {
                                leading_cross_dim += num::float_max(0.0, remaining_cross_dim);
                            } else if align_item == Align::FlexStart {
                                // No-Op
                            } else if align_item == Align::Center {
                                leading_cross_dim += remaining_cross_dim / 2.0;
                            } else {
                                leading_cross_dim += remaining_cross_dim;
                            }
                        }
                        // And we apply the position.
                        let edge = cross_axis.position_edge() as usize;
                        self.node_mut(child).layout.position[edge] +=
                            total_line_cross_dim + leading_cross_dim;
                    }
                }
            }

            let applied_cross_gap = if line_count != 0 { cross_axis_gap } else { 0.0 };
            total_line_cross_dim += line.cross_dim + applied_cross_gap;
            max_line_main_dim = num::float_max(max_line_main_dim, line.main_dim);

            line_count += 1;
            start_of_line_index = end_of_line_index;
        }

        // STEP 8: MULTI-LINE CONTENT ALIGNMENT
        // currentLead stores the size of the cross dim.
        if perform_layout && (is_node_flex_wrap || self.is_baseline_layout(node)) {
            let mut cross_dim_lead = 0.0;
            let mut current_lead = leading_padding_and_border_cross;
            if num::is_defined(available_inner_cross_dim) {
                let remaining_align_content_dim =
                    available_inner_cross_dim - total_line_cross_dim;
                match style.align_content {
                    Align::FlexEnd => current_lead += remaining_align_content_dim,
                    Align::Center => current_lead += remaining_align_content_dim / 2.0,
                    Align::Stretch => {
                        if available_inner_cross_dim > total_line_cross_dim {
                            cross_dim_lead = remaining_align_content_dim / line_count as f32;
                        }
                    }
                    Align::SpaceAround => {
                        if available_inner_cross_dim > total_line_cross_dim {
                            current_lead += remaining_align_content_dim / (2 * line_count) as f32;
                            if line_count > 1 {
                                cross_dim_lead =
                                    remaining_align_content_dim / line_count as f32;
                            }
                        } else {
                            current_lead += remaining_align_content_dim / 2.0;
                        }
                    }
                    Align::SpaceBetween => {
                        if available_inner_cross_dim > total_line_cross_dim && line_count > 1 {
                            cross_dim_lead =
                                remaining_align_content_dim / (line_count - 1) as f32;
                        }
                    }
                    _ => {}
                }
            }

            let children = self.node(node).children.clone();
            let mut end_index = 0;
            for i in 0..line_count {
                let start_index = end_index;

                // Compute the line's height and find the endIndex.
                let mut line_height = 0.0;
                let mut max_ascent_for_current_line = 0.0_f32;
                let mut max_descent_for_current_line = 0.0_f32;
                let mut ii = start_index;
                while ii < child_count {
                    let child = children[ii];
                    let child_style = self.node(child).style;
                    if child_style.display == Display::None {
                        ii += 1;
                        continue;
                    }
                    if child_style.position_type != PositionType::Absolute {
                        if self.node(child).line_index != i {
                            break;
                        }
                        if self.is_layout_dim_defined(child, cross_axis) {
                            line_height = num::float_max(
                                line_height,
                                self.node(child).layout.measured_dimensions
                                    [cross_axis.dimension() as usize]
                                    + child_style.margin_for_axis(cross_axis, available_inner_width),
                            );
                        }
                        if self.align_item(node, child) == Align::Baseline {
                            let ascent = self.node_baseline(child)
                                + child_style
                                    .leading_margin(FlexDirection::Column, available_inner_width);
                            let descent = self.node(child).layout.measured_dimensions
                                [Dim::Height as usize]
                                + child_style
                                    .margin_for_axis(FlexDirection::Column, available_inner_width)
                                - ascent;
                            max_ascent_for_current_line =
                                num::float_max(max_ascent_for_current_line, ascent);
                            max_descent_for_current_line =
                                num::float_max(max_descent_for_current_line, descent);
                            line_height = num::float_max(
                                line_height,
                                max_ascent_for_current_line + max_descent_for_current_line,
                            );
                        }
                    }
                    ii += 1;
                }
                end_index = ii;
                line_height += cross_dim_lead;
                current_lead += if i != 0 { cross_axis_gap } else { 0.0 };

                for ii in start_index..end_index {
                    let child = children[ii];
                    let child_style = self.node(child).style;
                    if child_style.display == Display::None {
                        continue;
                    }
                    if child_style.position_type != PositionType::Absolute {
                        match self.align_item(node, child) {
                            Align::FlexStart => {
                                let position = current_lead
                                    + child_style.leading_margin(cross_axis, available_inner_width);
                                self.node_mut(child).layout.position
                                    [cross_axis.position_edge() as usize] = position;
                            }
                            Align::FlexEnd => {
                                let position = current_lead + line_height
                                    - child_style.trailing_margin(cross_axis, available_inner_width)
                                    - self.node(child).layout.measured_dimensions
                                        [cross_axis.dimension() as usize];
                                self.node_mut(child).layout.position
                                    [cross_axis.position_edge() as usize] = position;
                            }
                            Align::Center => {
                                let child_height = self.node(child).layout.measured_dimensions
                                    [cross_axis.dimension() as usize];
                                self.node_mut(child).layout.position
                                    [cross_axis.position_edge() as usize] =
                                    current_lead + (line_height - child_height) / 2.0;
                            }
                            Align::Stretch => {
                                let position = current_lead
                                    + child_style.leading_margin(cross_axis, available_inner_width);
                                self.node_mut(child).layout.position
                                    [cross_axis.position_edge() as usize] = position;

                                // Remeasure child with the line height as it
                                // has only been measured with the owners
                                // height yet.
                                if !self.is_style_dim_defined(
                                    child,
                                    cross_axis,
                                    available_inner_cross_dim,
                                ) {
                                    let measured = self.node(child).layout.measured_dimensions;
                                    let child_width = if is_main_axis_row {
                                        measured[Dim::Width as usize]
                                            + child_style
                                                .margin_for_axis(main_axis, available_inner_width)
                                    } else {
                                        line_height
                                    };
                                    let child_height = if is_main_axis_row {
                                        line_height
                                    } else {
                                        measured[Dim::Height as usize]
                                            + child_style
                                                .margin_for_axis(cross_axis, available_inner_width)
                                    };

                                    if !(num::floats_equal(
                                        child_width,
                                        measured[Dim::Width as usize],
                                    ) && num::floats_equal(
                                        child_height,
                                        measured[Dim::Height as usize],
                                    )) {
                                        self.layout_node_internal(
                                            child,
                                            child_width,
                                            child_height,
                                            direction,
                                            MeasureMode::Exactly,
                                            MeasureMode::Exactly,
                                            available_inner_width,
                                            available_inner_height,
                                            true,
                                        );
                                    }
                                }
                            }
                            Align::Baseline => {
                                let baseline = self.node_baseline(child);
                                let position = current_lead + max_ascent_for_current_line - baseline
                                    + child_style.leading_position(
                                        FlexDirection::Column,
                                        available_inner_cross_dim,
                                    );
                                self.node_mut(child).layout.position[Edge::Top as usize] =
                                    position;
                            }
                            _ => {}
                        }
                    }
                }
                current_lead += line_height;
            }
        }

        // STEP 9: COMPUTING FINAL DIMENSIONS

        let width = self.bound_axis(
            node,
            FlexDirection::Row,
            available_width - margin_axis_row,
            owner_width,
            owner_width,
        );
        let height = self.bound_axis(
            node,
            FlexDirection::Column,
            available_height - margin_axis_column,
            owner_height,
            owner_width,
        );
        {
            let n = self.node_mut(node);
            n.layout.measured_dimensions[Dim::Width as usize] = width;
            n.layout.measured_dimensions[Dim::Height as usize] = height;
        }

        // If the user didn't specify a width or height for the node, set the
        // dimensions based on the children.
        if measure_mode_main_dim == MeasureMode::Undefined
            || (style.overflow != Overflow::Scroll
                && measure_mode_main_dim == MeasureMode::AtMost)
        {
            // Clamp the size to the min/max size, if specified, and make
            // sure it doesn't go below the padding and border amount.
            let bounded =
                self.bound_axis(node, main_axis, max_line_main_dim, main_axis_owner_size, owner_width);
            self.node_mut(node).layout.measured_dimensions[main_axis.dimension() as usize] =
                bounded;
        } else if measure_mode_main_dim == MeasureMode::AtMost
            && style.overflow == Overflow::Scroll
        {
            let bounded = num::float_max(
                num::float_min(
                    available_inner_main_dim + padding_and_border_axis_main,
                    self.bound_axis_within_min_max(
                        node,
                        main_axis,
                        max_line_main_dim,
                        main_axis_owner_size,
                    ),
                ),
                padding_and_border_axis_main,
            );
            self.node_mut(node).layout.measured_dimensions[main_axis.dimension() as usize] =
                bounded;
        }

        if measure_mode_cross_dim == MeasureMode::Undefined
            || (style.overflow != Overflow::Scroll
                && measure_mode_cross_dim == MeasureMode::AtMost)
        {
            let bounded = self.bound_axis(
                node,
                cross_axis,
                total_line_cross_dim + padding_and_border_axis_cross,
                cross_axis_owner_size,
                owner_width,
            );
            self.node_mut(node).layout.measured_dimensions[cross_axis.dimension() as usize] =
                bounded;
        } else if measure_mode_cross_dim == MeasureMode::AtMost
            && style.overflow == Overflow::Scroll
        {
            let bounded = num::float_max(
                num::float_min(
                    available_inner_cross_dim + padding_and_border_axis_cross,
                    self.bound_axis_within_min_max(
                        node,
                        cross_axis,
                        total_line_cross_dim + padding_and_border_axis_cross,
                        cross_axis_owner_size,
                    ),
                ),
                padding_and_border_axis_cross,
            );
            self.node_mut(node).layout.measured_dimensions[cross_axis.dimension() as usize] =
                bounded;
        }

        // As we only wrapped in normal direction yet, we need to reverse the
        // positions on wrap-reverse.
        if perform_layout && style.flex_wrap == Wrap::WrapReverse {
            let children = self.node(node).children.clone();
            let cross_size =
                self.node(node).layout.measured_dimensions[cross_axis.dimension() as usize];
            for child in children {
                if self.node(child).style.position_type != PositionType::Absolute {
                    let edge = cross_axis.position_edge() as usize;
                    let child_cross_size =
                        self.node(child).layout.measured_dimensions[cross_axis.dimension() as usize];
                    let position = self.node(child).layout.position[edge];
                    self.node_mut(child).layout.position[edge] =
                        cross_size - position - child_cross_size;
                }
            }
        }

        if perform_layout {
            // STEP 10: SIZING AND POSITIONING ABSOLUTE CHILDREN
            let children = self.node(node).children.clone();
            for child in children {
                let child_style = &self.node(child).style;
                if child_style.display == Display::None
                    || child_style.position_type != PositionType::Absolute
                {
                    continue;
                }
                self.absolute_layout_child(
                    node,
                    child,
                    available_inner_width,
                    if is_main_axis_row { measure_mode_main_dim } else { measure_mode_cross_dim },
                    available_inner_height,
                    direction,
                );
            }

            // STEP 11: SETTING TRAILING POSITIONS FOR CHILDREN
            let needs_main_trailing_pos = main_axis.is_reversed();
            let needs_cross_trailing_pos = cross_axis.is_reversed();
            if needs_main_trailing_pos || needs_cross_trailing_pos {
                let children = self.node(node).children.clone();
                for child in children {
                    if self.node(child).style.display == Display::None {
                        continue;
                    }
                    if needs_main_trailing_pos {
                        self.set_child_trailing_position(node, child, main_axis);
                    }
                    if needs_cross_trailing_pos {
                        self.set_child_trailing_position(node, child, cross_axis);
                    }
                }
            }
        }
    }

    // ---- cached entry point ----

    /// Run or reuse a layout/measurement for `node`, consulting the per-node
    /// cache first. Returns whether the subtree was actually (re)computed.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn layout_node_internal(
        &mut self,
        node: NodeId,
        available_width: f32,
        available_height: f32,
        owner_direction: Direction,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        owner_width: f32,
        owner_height: f32,
        perform_layout: bool,
    ) -> bool {
        let generation = self.generation;
        let need_to_visit_node = {
            let n = self.node(node);
            (n.is_dirty && n.layout.generation != generation)
                || n.layout.last_owner_direction != Some(owner_direction)
        };
        if need_to_visit_node {
            // Invalidate the cached results.
            self.node_mut(node).layout.invalidate_cache();
        }

        let mut cached_results: Option<CachedMeasurement> = None;

        // Determine whether the results are already cached. We maintain a
        // separate cache for layouts and measurements. A layout operation
        // modifies the positions and dimensions for nodes in the subtree;
        // a measurement never does.
        if self.node(node).measure.is_some() {
            let style = self.node(node).style;
            let margin_axis_row = style.margin_for_axis(FlexDirection::Row, owner_width);
            let margin_axis_column = style.margin_for_axis(FlexDirection::Column, owner_width);
            let config = *self.config();
            let layout = &self.node(node).layout;

            // First, try to use the layout cache.
            if can_use_cached_measurement(
                width_mode,
                available_width,
                height_mode,
                available_height,
                &layout.cached_layout,
                margin_axis_row,
                margin_axis_column,
                &config,
            ) {
                cached_results = Some(layout.cached_layout);
            } else {
                // Try to use the measurement cache.
                for i in 0..layout.next_cached_measurements_index {
                    if can_use_cached_measurement(
                        width_mode,
                        available_width,
                        height_mode,
                        available_height,
                        &layout.cached_measurements[i],
                        margin_axis_row,
                        margin_axis_column,
                        &config,
                    ) {
                        cached_results = Some(layout.cached_measurements[i]);
                        break;
                    }
                }
            }
        } else if perform_layout {
            let layout = &self.node(node).layout;
            if layout.cached_layout.matches_spec(
                available_width,
                available_height,
                width_mode,
                height_mode,
            ) {
                cached_results = Some(layout.cached_layout);
            }
        } else {
            let layout = &self.node(node).layout;
            for i in 0..layout.next_cached_measurements_index {
                if layout.cached_measurements[i].matches_spec(
                    available_width,
                    available_height,
                    width_mode,
                    height_mode,
                ) {
                    cached_results = Some(layout.cached_measurements[i]);
                    break;
                }
            }
        }

        if !need_to_visit_node && cached_results.is_some() {
            let cached = cached_results.unwrap_or_default();
            trace!(node = node.0, "measurement cache hit");
            self.stats.hits += 1;
            let n = self.node_mut(node);
            n.layout.measured_dimensions[Dim::Width as usize] = cached.computed_width;
            n.layout.measured_dimensions[Dim::Height as usize] = cached.computed_height;
        } else {
            self.stats.misses += 1;
            self.layout_impl(
                node,
                available_width,
                available_height,
                owner_direction,
                width_mode,
                height_mode,
                owner_width,
                owner_height,
                perform_layout,
            );
            self.node_mut(node).layout.last_owner_direction = Some(owner_direction);

            if cached_results.is_none() {
                let n = self.node_mut(node);
                let new_entry = CachedMeasurement {
                    available_width,
                    available_height,
                    width_mode,
                    height_mode,
                    computed_width: n.layout.measured_dimensions[Dim::Width as usize],
                    computed_height: n.layout.measured_dimensions[Dim::Height as usize],
                };
                if perform_layout {
                    n.layout.cached_layout = new_entry;
                } else {
                    if n.layout.next_cached_measurements_index == MAX_CACHED_RESULTS {
                        n.layout.next_cached_measurements_index = 0;
                    }
                    let index = n.layout.next_cached_measurements_index;
                    n.layout.cached_measurements[index] = new_entry;
                    n.layout.next_cached_measurements_index += 1;
                }
            }
        }

        if perform_layout {
            let n = self.node_mut(node);
            n.layout.dimensions = n.layout.measured_dimensions;
            n.has_new_layout = true;
            n.is_dirty = false;
        }
        self.node_mut(node).layout.generation = generation;

        need_to_visit_node || cached_results.is_none()
    }
}
