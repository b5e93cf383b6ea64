//! Flex Tree
//!
//! Arena of nodes addressed by stable handles. The tree owns every node,
//! its config and the generation counter driving cache invalidation; all
//! mutation goes through it so dirty-propagation cannot be bypassed.

use crate::cache::CacheStats;
use crate::config::Config;
use crate::error::TreeError;
use crate::measure::{BaselineFunc, DirtiedFunc, MeasureFunc};
use crate::node::{LayoutResults, Node, NodeType};
use flexlay_style::{num, Align, Dim, Direction, Display, Edge, FlexDirection, Gutter, Justify,
                    Overflow, PositionType, Style, Value, Wrap};

/// Handle to a node inside a [`FlexTree`]. Only valid for the tree that
/// created it and until that node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

pub struct FlexTree {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    config: Config,
    pub(crate) generation: u32,
    pub(crate) stats: CacheStats,
}

impl Default for FlexTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FlexTree {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            config,
            generation: 0,
            stats: CacheStats::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Hit/miss counters accumulated across all layout passes.
    pub fn cache_stats(&self) -> CacheStats {
        self.stats
    }

    pub fn reset_cache_stats(&mut self) {
        self.stats.reset();
    }

    fn default_style(&self) -> Style {
        if self.config.use_web_defaults {
            Style::web_default()
        } else {
            Style::default()
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        match self.nodes.get(id.0).and_then(Option::as_ref) {
            Some(node) => node,
            None => panic!("stale node handle {:?}", id),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.nodes.get_mut(id.0).and_then(Option::as_mut) {
            Some(node) => node,
            None => panic!("stale node handle {:?}", id),
        }
    }

    // ---- lifecycle ----

    pub fn new_node(&mut self) -> NodeId {
        let style = self.default_style();
        self.new_node_with_style(style)
    }

    pub fn new_node_with_style(&mut self, style: Style) -> NodeId {
        let node = Node::new(style);
        if let Some(slot) = self.free.pop() {
            self.nodes[slot] = Some(node);
            NodeId(slot)
        } else {
            self.nodes.push(Some(node));
            NodeId(self.nodes.len() - 1)
        }
    }

    /// Remove a single node. Its children are detached, not removed.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(owner) = self.node(node).owner {
            let _ = self.remove_child(owner, node);
        }
        let children = std::mem::take(&mut self.node_mut(node).children);
        for child in children {
            self.node_mut(child).owner = None;
        }
        self.nodes[node.0] = None;
        self.free.push(node.0);
    }

    /// Remove a node and every node below it.
    pub fn remove_subtree(&mut self, node: NodeId) {
        let children = self.node(node).children.clone();
        for child in children {
            self.remove_subtree(child);
        }
        self.remove(node);
    }

    /// Restore a detached, childless node to its freshly created state.
    pub fn reset(&mut self, node: NodeId) -> Result<(), TreeError> {
        let n = self.node(node);
        if n.owner.is_some() || !n.children.is_empty() {
            return Err(TreeError::NodeStillInUse);
        }
        let style = self.default_style();
        self.nodes[node.0] = Some(Node::new(style));
        Ok(())
    }

    // ---- children ----

    pub fn insert_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> Result<(), TreeError> {
        if self.node(child).owner.is_some() {
            return Err(TreeError::ChildAlreadyOwned);
        }
        if self.node(parent).measure.is_some() {
            return Err(TreeError::MeasureNodeCannotHaveChildren);
        }
        let len = self.node(parent).children.len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).owner = Some(parent);
        self.mark_dirty_and_propagate(parent);
        Ok(())
    }

    /// Append as the last child.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let index = self.node(parent).children.len();
        self.insert_child(parent, child, index)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let position = self.node(parent).children.iter().position(|&c| c == child);
        if let Some(position) = position {
            self.node_mut(parent).children.remove(position);
            let detached = self.node_mut(child);
            detached.owner = None;
            detached.layout = LayoutResults::default();
            self.mark_dirty_and_propagate(parent);
        }
        Ok(())
    }

    pub fn remove_all_children(&mut self, parent: NodeId) {
        let children = std::mem::take(&mut self.node_mut(parent).children);
        if children.is_empty() {
            return;
        }
        for child in children {
            let detached = self.node_mut(child);
            detached.owner = None;
            detached.layout = LayoutResults::default();
        }
        self.mark_dirty_and_propagate(parent);
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        self.node(node).children.len()
    }

    pub fn child_at(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.node(node).children.get(index).copied()
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).owner
    }

    // ---- dirtiness ----

    pub fn is_dirty(&self, node: NodeId) -> bool {
        self.node(node).is_dirty
    }

    /// Manually invalidate a measure node after its content changed.
    pub fn mark_dirty(&mut self, node: NodeId) -> Result<(), TreeError> {
        if self.node(node).measure.is_none() {
            return Err(TreeError::OnlyMeasureNodesCanBeMarkedDirty);
        }
        self.mark_dirty_and_propagate(node);
        Ok(())
    }

    pub(crate) fn mark_dirty_and_propagate(&mut self, node: NodeId) {
        let n = self.node_mut(node);
        if n.is_dirty {
            return;
        }
        n.is_dirty = true;
        n.layout.computed_flex_basis = f32::NAN;
        let owner = n.owner;

        let mut dirtied = self.node_mut(node).dirtied.take();
        if let Some(callback) = dirtied.as_mut() {
            callback(node);
        }
        let slot = &mut self.node_mut(node).dirtied;
        if slot.is_none() {
            *slot = dirtied;
        }

        if let Some(owner) = owner {
            self.mark_dirty_and_propagate(owner);
        }
    }

    // ---- callbacks and flags ----

    pub fn set_measure_func(
        &mut self,
        node: NodeId,
        measure: Option<Box<dyn MeasureFunc>>,
    ) -> Result<(), TreeError> {
        if measure.is_some() && !self.node(node).children.is_empty() {
            return Err(TreeError::MeasureFuncOnNodeWithChildren);
        }
        let n = self.node_mut(node);
        n.node_type = if measure.is_some() { NodeType::Text } else { NodeType::Default };
        n.measure = measure;
        Ok(())
    }

    pub fn set_baseline_func(&mut self, node: NodeId, baseline: Option<Box<dyn BaselineFunc>>) {
        self.node_mut(node).baseline = baseline;
    }

    pub fn set_dirtied_func(&mut self, node: NodeId, dirtied: Option<DirtiedFunc>) {
        self.node_mut(node).dirtied = dirtied;
    }

    pub fn set_node_type(&mut self, node: NodeId, node_type: NodeType) {
        self.node_mut(node).node_type = node_type;
    }

    pub fn node_type(&self, node: NodeId) -> NodeType {
        self.node(node).node_type
    }

    pub fn set_is_reference_baseline(&mut self, node: NodeId, is_reference_baseline: bool) {
        if self.node(node).is_reference_baseline != is_reference_baseline {
            self.node_mut(node).is_reference_baseline = is_reference_baseline;
            self.mark_dirty_and_propagate(node);
        }
    }

    pub fn is_reference_baseline(&self, node: NodeId) -> bool {
        self.node(node).is_reference_baseline
    }

    // ---- style ----

    pub fn style(&self, node: NodeId) -> &Style {
        &self.node(node).style
    }

    /// Replace the whole style, dirtying the node if anything changed.
    pub fn set_style(&mut self, node: NodeId, style: Style) {
        self.update_style(node, |s| {
            if *s == style {
                false
            } else {
                *s = style;
                true
            }
        });
    }

    fn update_style(&mut self, node: NodeId, update: impl FnOnce(&mut Style) -> bool) {
        if update(&mut self.node_mut(node).style) {
            self.mark_dirty_and_propagate(node);
        }
    }

    fn update_float(&mut self, node: NodeId, value: f32, get: impl FnOnce(&mut Style) -> &mut f32) {
        self.update_style(node, |s| {
            let slot = get(s);
            if num::floats_equal(*slot, value) {
                false
            } else {
                *slot = value;
                true
            }
        });
    }

    fn update_value(
        &mut self,
        node: NodeId,
        value: Value,
        get: impl FnOnce(&mut Style) -> &mut Value,
    ) {
        self.update_style(node, |s| {
            let slot = get(s);
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        });
    }

    pub fn set_direction(&mut self, node: NodeId, value: Direction) {
        self.update_style(node, |s| {
            if s.direction == value { false } else { s.direction = value; true }
        });
    }

    pub fn set_flex_direction(&mut self, node: NodeId, value: FlexDirection) {
        self.update_style(node, |s| {
            if s.flex_direction == value { false } else { s.flex_direction = value; true }
        });
    }

    pub fn set_justify_content(&mut self, node: NodeId, value: Justify) {
        self.update_style(node, |s| {
            if s.justify_content == value { false } else { s.justify_content = value; true }
        });
    }

    pub fn set_align_content(&mut self, node: NodeId, value: Align) {
        self.update_style(node, |s| {
            if s.align_content == value { false } else { s.align_content = value; true }
        });
    }

    pub fn set_align_items(&mut self, node: NodeId, value: Align) {
        self.update_style(node, |s| {
            if s.align_items == value { false } else { s.align_items = value; true }
        });
    }

    pub fn set_align_self(&mut self, node: NodeId, value: Align) {
        self.update_style(node, |s| {
            if s.align_self == value { false } else { s.align_self = value; true }
        });
    }

    pub fn set_position_type(&mut self, node: NodeId, value: PositionType) {
        self.update_style(node, |s| {
            if s.position_type == value { false } else { s.position_type = value; true }
        });
    }

    pub fn set_flex_wrap(&mut self, node: NodeId, value: Wrap) {
        self.update_style(node, |s| {
            if s.flex_wrap == value { false } else { s.flex_wrap = value; true }
        });
    }

    pub fn set_overflow(&mut self, node: NodeId, value: Overflow) {
        self.update_style(node, |s| {
            if s.overflow == value { false } else { s.overflow = value; true }
        });
    }

    pub fn set_display(&mut self, node: NodeId, value: Display) {
        self.update_style(node, |s| {
            if s.display == value { false } else { s.display = value; true }
        });
    }

    pub fn set_flex(&mut self, node: NodeId, value: f32) {
        self.update_float(node, value, |s| &mut s.flex);
    }

    pub fn set_flex_grow(&mut self, node: NodeId, value: f32) {
        self.update_float(node, value, |s| &mut s.flex_grow);
    }

    pub fn set_flex_shrink(&mut self, node: NodeId, value: f32) {
        self.update_float(node, value, |s| &mut s.flex_shrink);
    }

    pub fn set_flex_basis(&mut self, node: NodeId, value: Value) {
        self.update_value(node, value, |s| &mut s.flex_basis);
    }

    pub fn set_width(&mut self, node: NodeId, value: Value) {
        self.update_value(node, value, |s| &mut s.dimensions[Dim::Width as usize]);
    }

    pub fn set_height(&mut self, node: NodeId, value: Value) {
        self.update_value(node, value, |s| &mut s.dimensions[Dim::Height as usize]);
    }

    pub fn set_min_width(&mut self, node: NodeId, value: Value) {
        self.update_value(node, value, |s| &mut s.min_dimensions[Dim::Width as usize]);
    }

    pub fn set_min_height(&mut self, node: NodeId, value: Value) {
        self.update_value(node, value, |s| &mut s.min_dimensions[Dim::Height as usize]);
    }

    pub fn set_max_width(&mut self, node: NodeId, value: Value) {
        self.update_value(node, value, |s| &mut s.max_dimensions[Dim::Width as usize]);
    }

    pub fn set_max_height(&mut self, node: NodeId, value: Value) {
        self.update_value(node, value, |s| &mut s.max_dimensions[Dim::Height as usize]);
    }

    pub fn set_aspect_ratio(&mut self, node: NodeId, value: f32) {
        self.update_float(node, value, |s| &mut s.aspect_ratio);
    }

    pub fn set_margin(&mut self, node: NodeId, edge: Edge, value: Value) {
        self.update_value(node, value, |s| &mut s.margin[edge]);
    }

    pub fn set_position(&mut self, node: NodeId, edge: Edge, value: Value) {
        self.update_value(node, value, |s| &mut s.position[edge]);
    }

    pub fn set_padding(&mut self, node: NodeId, edge: Edge, value: Value) {
        self.update_value(node, value, |s| &mut s.padding[edge]);
    }

    pub fn set_border(&mut self, node: NodeId, edge: Edge, value: Value) {
        self.update_value(node, value, |s| &mut s.border[edge]);
    }

    pub fn set_gap(&mut self, node: NodeId, gutter: Gutter, value: Value) {
        self.update_value(node, value, |s| &mut s.gap[gutter as usize]);
    }

    // ---- layout results ----

    pub fn layout(&self, node: NodeId) -> &LayoutResults {
        &self.node(node).layout
    }

    pub fn layout_left(&self, node: NodeId) -> f32 {
        self.node(node).layout.left()
    }

    pub fn layout_top(&self, node: NodeId) -> f32 {
        self.node(node).layout.top()
    }

    pub fn layout_width(&self, node: NodeId) -> f32 {
        self.node(node).layout.width()
    }

    pub fn layout_height(&self, node: NodeId) -> f32 {
        self.node(node).layout.height()
    }

    pub fn layout_direction(&self, node: NodeId) -> Direction {
        self.node(node).layout.direction
    }

    pub fn layout_had_overflow(&self, node: NodeId) -> bool {
        self.node(node).layout.had_overflow
    }

    fn physical_edge(&self, node: NodeId, edge: Edge) -> Edge {
        let rtl = self.node(node).layout.direction == Direction::Rtl;
        match edge {
            Edge::Start => if rtl { Edge::Right } else { Edge::Left },
            Edge::End => if rtl { Edge::Left } else { Edge::Right },
            Edge::Left | Edge::Top | Edge::Right | Edge::Bottom => edge,
            other => panic!("cannot read layout values for shorthand edge {:?}", other),
        }
    }

    pub fn layout_margin(&self, node: NodeId, edge: Edge) -> f32 {
        let edge = self.physical_edge(node, edge);
        self.node(node).layout.margin[edge as usize]
    }

    pub fn layout_border(&self, node: NodeId, edge: Edge) -> f32 {
        let edge = self.physical_edge(node, edge);
        self.node(node).layout.border[edge as usize]
    }

    pub fn layout_padding(&self, node: NodeId, edge: Edge) -> f32 {
        let edge = self.physical_edge(node, edge);
        self.node(node).layout.padding[edge as usize]
    }

    /// Whether the last pass produced a layout the host has not consumed yet.
    pub fn has_new_layout(&self, node: NodeId) -> bool {
        self.node(node).has_new_layout
    }

    pub fn mark_layout_seen(&mut self, node: NodeId) {
        self.node_mut(node).has_new_layout = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove_child() {
        let mut tree = FlexTree::new();
        let parent = tree.new_node();
        let a = tree.new_node();
        let b = tree.new_node();
        tree.add_child(parent, a).unwrap();
        tree.insert_child(parent, b, 0).unwrap();
        assert_eq!(tree.children(parent), &[b, a]);
        assert_eq!(tree.parent(a), Some(parent));

        tree.remove_child(parent, b).unwrap();
        assert_eq!(tree.children(parent), &[a]);
        assert_eq!(tree.parent(b), None);
    }

    #[test]
    fn test_insert_owned_child_fails() {
        let mut tree = FlexTree::new();
        let p1 = tree.new_node();
        let p2 = tree.new_node();
        let child = tree.new_node();
        tree.add_child(p1, child).unwrap();
        assert_eq!(tree.add_child(p2, child), Err(TreeError::ChildAlreadyOwned));
    }

    #[test]
    fn test_measure_node_rejects_children() {
        let mut tree = FlexTree::new();
        let leaf = tree.new_node();
        tree.set_measure_func(
            leaf,
            Some(Box::new(|_, _, _, _| crate::measure::Size::new(10.0, 10.0))),
        )
        .unwrap();
        let child = tree.new_node();
        assert_eq!(
            tree.add_child(leaf, child),
            Err(TreeError::MeasureNodeCannotHaveChildren)
        );

        let parent = tree.new_node();
        tree.add_child(parent, child).unwrap();
        assert_eq!(
            tree.set_measure_func(parent, Some(Box::new(|_, _, _, _| crate::measure::Size::default()))),
            Err(TreeError::MeasureFuncOnNodeWithChildren)
        );
    }

    #[test]
    fn test_mark_dirty_requires_measure_func() {
        let mut tree = FlexTree::new();
        let node = tree.new_node();
        assert_eq!(tree.mark_dirty(node), Err(TreeError::OnlyMeasureNodesCanBeMarkedDirty));
    }

    #[test]
    fn test_style_setter_dirty_propagation() {
        let mut tree = FlexTree::new();
        let parent = tree.new_node();
        let child = tree.new_node();
        tree.add_child(parent, child).unwrap();
        // attach marks dirty; clear the flags first
        tree.node_mut(parent).is_dirty = false;
        tree.node_mut(child).is_dirty = false;

        tree.set_width(child, Value::Point(10.0));
        assert!(tree.is_dirty(child));
        assert!(tree.is_dirty(parent));

        tree.node_mut(parent).is_dirty = false;
        tree.node_mut(child).is_dirty = false;
        // same value again is a no-op
        tree.set_width(child, Value::Point(10.0));
        assert!(!tree.is_dirty(child));
        assert!(!tree.is_dirty(parent));
    }

    #[test]
    fn test_set_style_with_identical_style_is_noop() {
        let mut tree = FlexTree::new();
        let node = tree.new_node();
        let mut style = Style::default();
        style.dimensions[Dim::Width as usize] = Value::Point(10.0);
        tree.set_style(node, style);
        tree.node_mut(node).is_dirty = false;

        // Unset float fields are NaN; replaying the same style must not
        // dirty the node.
        tree.set_style(node, style);
        assert!(!tree.is_dirty(node));

        style.dimensions[Dim::Width as usize] = Value::Point(20.0);
        tree.set_style(node, style);
        assert!(tree.is_dirty(node));
    }

    #[test]
    fn test_dirtied_callback_fires_once_per_transition() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut tree = FlexTree::new();
        let node = tree.new_node();
        let count = Rc::new(RefCell::new(0));
        let seen = count.clone();
        tree.set_dirtied_func(node, Some(Box::new(move |_| *seen.borrow_mut() += 1)));

        tree.set_width(node, Value::Point(10.0));
        tree.set_height(node, Value::Point(10.0));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_reset_requires_detached_leaf() {
        let mut tree = FlexTree::new();
        let parent = tree.new_node();
        let child = tree.new_node();
        tree.add_child(parent, child).unwrap();
        assert_eq!(tree.reset(parent), Err(TreeError::NodeStillInUse));
        assert_eq!(tree.reset(child), Err(TreeError::NodeStillInUse));
        tree.remove_child(parent, child).unwrap();
        tree.set_width(child, Value::Point(5.0));
        tree.reset(child).unwrap();
        assert_eq!(tree.style(child).dimensions[Dim::Width as usize], Value::Undefined);
    }

    #[test]
    fn test_slot_reuse_after_remove() {
        let mut tree = FlexTree::new();
        let a = tree.new_node();
        tree.remove(a);
        let b = tree.new_node();
        assert_eq!(a.0, b.0);
    }
}
