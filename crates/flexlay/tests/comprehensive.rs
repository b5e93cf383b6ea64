//! Comprehensive tests for flexlay
//!
//! End-to-end layout scenarios: growing, shrinking, wrapping, justification,
//! alignment, measure functions, caching and pixel rounding.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use flexlay::*;

// Honors RUST_LOG when a test run needs the layout pass traces.
fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn fixed_root(tree: &mut FlexTree, width: f32, height: f32) -> NodeId {
    let root = tree.new_node();
    tree.set_width(root, Value::Point(width));
    tree.set_height(root, Value::Point(height));
    root
}

fn layout(tree: &mut FlexTree, root: NodeId) {
    init_logging();
    tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr);
}

// ============================================================================
// GROW AND SHRINK
// ============================================================================

#[test]
fn test_grow_distributes_remaining_space() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 100.0);
    tree.set_flex_direction(root, FlexDirection::Row);

    let a = tree.new_node();
    tree.set_flex_grow(a, 1.0);
    tree.add_child(root, a).unwrap();

    let b = tree.new_node();
    tree.set_flex_grow(b, 2.0);
    tree.add_child(root, b).unwrap();

    layout(&mut tree, root);

    assert_eq!(tree.layout_left(a), 0.0);
    assert_eq!(tree.layout_width(a), 33.0);
    assert_eq!(tree.layout_left(b), 33.0);
    assert_eq!(tree.layout_width(b), 67.0);
    // Children stretch to the container's cross size by default.
    assert_eq!(tree.layout_height(a), 100.0);
    assert_eq!(tree.layout_height(b), 100.0);
}

#[test]
fn test_grow_with_margin() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 100.0);
    tree.set_flex_direction(root, FlexDirection::Row);

    let a = tree.new_node();
    tree.set_flex_grow(a, 1.0);
    tree.set_margin(a, Edge::Left, Value::Point(10.0));
    tree.add_child(root, a).unwrap();

    let b = tree.new_node();
    tree.set_flex_grow(b, 2.0);
    tree.add_child(root, b).unwrap();

    layout(&mut tree, root);

    // The margin is taken out of the distributable space first.
    assert_eq!(tree.layout_left(a), 10.0);
    assert_eq!(tree.layout_width(a), 30.0);
    assert_eq!(tree.layout_left(b), 40.0);
    assert_eq!(tree.layout_width(b), 60.0);
}

#[test]
fn test_shrink_respects_min_width() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 20.0);
    tree.set_flex_direction(root, FlexDirection::Row);

    let a = tree.new_node();
    tree.set_width(a, Value::Point(60.0));
    tree.set_flex_shrink(a, 1.0);
    tree.add_child(root, a).unwrap();

    let b = tree.new_node();
    tree.set_width(b, Value::Point(60.0));
    tree.set_min_width(b, Value::Point(55.0));
    tree.set_flex_shrink(b, 1.0);
    tree.add_child(root, b).unwrap();

    layout(&mut tree, root);

    // b freezes at its min width; the whole deficit lands on a.
    assert_eq!(tree.layout_width(a), 45.0);
    assert_eq!(tree.layout_width(b), 55.0);
    assert_eq!(tree.layout_left(b), 45.0);
}

#[test]
fn test_single_grow_child_fills_nested() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 90.0, 90.0);

    let child = tree.new_node();
    tree.set_flex_grow(child, 1.0);
    tree.set_flex_shrink(child, 1.0);
    tree.add_child(root, child).unwrap();

    let grandchild = tree.new_node();
    tree.set_flex_grow(grandchild, 1.0);
    tree.set_flex_shrink(grandchild, 1.0);
    tree.add_child(child, grandchild).unwrap();

    layout(&mut tree, root);

    assert_eq!(tree.layout_width(grandchild), 90.0);
    assert_eq!(tree.layout_height(grandchild), 90.0);
}

#[test]
fn test_many_equal_grow_children() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 10.0);
    tree.set_flex_direction(root, FlexDirection::Row);

    let mut children = Vec::new();
    for _ in 0..10 {
        let child = tree.new_node();
        tree.set_flex_grow(child, 1.0);
        tree.add_child(root, child).unwrap();
        children.push(child);
    }

    layout(&mut tree, root);

    for (i, &child) in children.iter().enumerate() {
        assert_eq!(tree.layout_width(child), 10.0);
        assert_eq!(tree.layout_left(child), 10.0 * i as f32);
    }
}

// ============================================================================
// WRAPPING
// ============================================================================

#[test]
fn test_wrap_breaks_lines() {
    let mut tree = FlexTree::new();
    let root = tree.new_node();
    tree.set_width(root, Value::Point(100.0));
    tree.set_flex_direction(root, FlexDirection::Row);
    tree.set_flex_wrap(root, Wrap::Wrap);

    let mut children = Vec::new();
    for _ in 0..3 {
        let child = tree.new_node();
        tree.set_width(child, Value::Point(40.0));
        tree.set_height(child, Value::Point(10.0));
        tree.add_child(root, child).unwrap();
        children.push(child);
    }

    layout(&mut tree, root);

    assert_eq!(tree.layout_left(children[0]), 0.0);
    assert_eq!(tree.layout_top(children[0]), 0.0);
    assert_eq!(tree.layout_left(children[1]), 40.0);
    assert_eq!(tree.layout_top(children[1]), 0.0);
    // The third item does not fit and starts a new line.
    assert_eq!(tree.layout_left(children[2]), 0.0);
    assert_eq!(tree.layout_top(children[2]), 10.0);
    // Content-sized height covers both lines.
    assert_eq!(tree.layout_height(root), 20.0);
}

#[test]
fn test_cross_gap_between_lines() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 100.0);
    tree.set_flex_direction(root, FlexDirection::Row);
    tree.set_flex_wrap(root, Wrap::Wrap);
    tree.set_align_items(root, Align::FlexStart);
    tree.set_gap(root, Gutter::Row, Value::Point(8.0));

    let mut children = Vec::new();
    for _ in 0..4 {
        let child = tree.new_node();
        tree.set_width(child, Value::Point(50.0));
        tree.set_height(child, Value::Point(20.0));
        tree.add_child(root, child).unwrap();
        children.push(child);
    }

    layout(&mut tree, root);

    assert_eq!(tree.layout_top(children[0]), 0.0);
    assert_eq!(tree.layout_top(children[1]), 0.0);
    assert_eq!(tree.layout_top(children[2]), 28.0);
    assert_eq!(tree.layout_top(children[3]), 28.0);
}

// ============================================================================
// MAIN AXIS JUSTIFICATION
// ============================================================================

fn justify_fixture(justify: Justify) -> (FlexTree, NodeId, NodeId) {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 20.0);
    tree.set_flex_direction(root, FlexDirection::Row);
    tree.set_justify_content(root, justify);
    let a = tree.new_node();
    tree.set_width(a, Value::Point(20.0));
    tree.add_child(root, a).unwrap();
    let b = tree.new_node();
    tree.set_width(b, Value::Point(20.0));
    tree.add_child(root, b).unwrap();
    layout(&mut tree, root);
    (tree, a, b)
}

#[test]
fn test_justify_center() {
    let (tree, a, b) = justify_fixture(Justify::Center);
    assert_eq!(tree.layout_left(a), 30.0);
    assert_eq!(tree.layout_left(b), 50.0);
}

#[test]
fn test_justify_flex_end() {
    let (tree, a, b) = justify_fixture(Justify::FlexEnd);
    assert_eq!(tree.layout_left(a), 60.0);
    assert_eq!(tree.layout_left(b), 80.0);
}

#[test]
fn test_justify_space_between() {
    let (tree, a, b) = justify_fixture(Justify::SpaceBetween);
    assert_eq!(tree.layout_left(a), 0.0);
    assert_eq!(tree.layout_left(b), 80.0);
}

#[test]
fn test_justify_space_around() {
    let (tree, a, b) = justify_fixture(Justify::SpaceAround);
    assert_eq!(tree.layout_left(a), 15.0);
    assert_eq!(tree.layout_left(b), 65.0);
}

#[test]
fn test_justify_space_evenly() {
    let (tree, a, b) = justify_fixture(Justify::SpaceEvenly);
    assert_eq!(tree.layout_left(a), 20.0);
    assert_eq!(tree.layout_left(b), 60.0);
}

#[test]
fn test_auto_margin_overrides_justify() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 40.0);
    tree.set_flex_direction(root, FlexDirection::Row);
    tree.set_justify_content(root, Justify::FlexEnd);

    let child = tree.new_node();
    tree.set_width(child, Value::Point(40.0));
    tree.set_margin(child, Edge::Left, Value::Auto);
    tree.set_margin(child, Edge::Right, Value::Auto);
    tree.add_child(root, child).unwrap();

    layout(&mut tree, root);

    // Auto margins absorb all free space; justify-content is ignored.
    assert_eq!(tree.layout_left(child), 30.0);
}

// ============================================================================
// GAPS
// ============================================================================

#[test]
fn test_gap_between_items() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 20.0);
    tree.set_flex_direction(root, FlexDirection::Row);
    tree.set_gap(root, Gutter::Column, Value::Point(10.0));

    let mut children = Vec::new();
    for _ in 0..3 {
        let child = tree.new_node();
        tree.set_width(child, Value::Point(20.0));
        tree.add_child(root, child).unwrap();
        children.push(child);
    }

    layout(&mut tree, root);

    assert_eq!(tree.layout_left(children[0]), 0.0);
    assert_eq!(tree.layout_left(children[1]), 30.0);
    assert_eq!(tree.layout_left(children[2]), 60.0);
}

#[test]
fn test_gap_grows_content_sized_container() {
    let mut tree = FlexTree::new();
    let root = tree.new_node();
    tree.set_height(root, Value::Point(20.0));
    tree.set_flex_direction(root, FlexDirection::Row);
    tree.set_gap(root, Gutter::Column, Value::Point(10.0));

    for _ in 0..3 {
        let child = tree.new_node();
        tree.set_width(child, Value::Point(20.0));
        tree.add_child(root, child).unwrap();
    }

    layout(&mut tree, root);

    assert_eq!(tree.layout_width(root), 80.0);
}

// ============================================================================
// DIRECTION
// ============================================================================

#[test]
fn test_rtl_mirrors_row() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 20.0);
    tree.set_flex_direction(root, FlexDirection::Row);

    let a = tree.new_node();
    tree.set_width(a, Value::Point(30.0));
    tree.add_child(root, a).unwrap();
    let b = tree.new_node();
    tree.set_width(b, Value::Point(30.0));
    tree.add_child(root, b).unwrap();

    tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Rtl);

    assert_eq!(tree.layout_direction(root), Direction::Rtl);
    assert_eq!(tree.layout_left(a), 70.0);
    assert_eq!(tree.layout_left(b), 40.0);
}

#[test]
fn test_start_margin_follows_direction() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 20.0);
    tree.set_flex_direction(root, FlexDirection::Row);

    let child = tree.new_node();
    tree.set_width(child, Value::Point(30.0));
    tree.set_margin(child, Edge::Start, Value::Point(5.0));
    tree.add_child(root, child).unwrap();

    tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Rtl);

    // In RTL the start edge is the right edge.
    assert_eq!(tree.layout_margin(child, Edge::Start), 5.0);
    assert_eq!(tree.layout_left(child), 65.0);

    tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr);
    assert_eq!(tree.layout_left(child), 5.0);
}

// ============================================================================
// BASELINE ALIGNMENT
// ============================================================================

#[test]
fn test_baseline_alignment() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 100.0);
    tree.set_flex_direction(root, FlexDirection::Row);
    tree.set_align_items(root, Align::Baseline);

    let a = tree.new_node();
    tree.set_width(a, Value::Point(20.0));
    tree.set_height(a, Value::Point(40.0));
    tree.add_child(root, a).unwrap();

    let b = tree.new_node();
    tree.set_width(b, Value::Point(20.0));
    tree.set_height(b, Value::Point(20.0));
    tree.set_baseline_func(b, Some(Box::new(|_w, _h| 10.0)));
    tree.add_child(root, b).unwrap();

    layout(&mut tree, root);

    // a's baseline is its bottom (40); b's is at 10, so b shifts down.
    assert_eq!(tree.layout_top(a), 0.0);
    assert_eq!(tree.layout_top(b), 30.0);
}

// ============================================================================
// PERCENTAGES
// ============================================================================

#[test]
fn test_percent_dimensions() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 200.0, 100.0);

    let child = tree.new_node();
    tree.set_width(child, Value::Percent(50.0));
    tree.set_height(child, Value::Percent(25.0));
    tree.add_child(root, child).unwrap();

    layout(&mut tree, root);

    assert_eq!(tree.layout_width(child), 100.0);
    assert_eq!(tree.layout_height(child), 25.0);
}

// ============================================================================
// ABSOLUTE POSITIONING
// ============================================================================

#[test]
fn test_absolute_inset_placement() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 100.0);

    let child = tree.new_node();
    tree.set_position_type(child, PositionType::Absolute);
    tree.set_position(child, Edge::Left, Value::Point(10.0));
    tree.set_position(child, Edge::Right, Value::Point(30.0));
    tree.set_position(child, Edge::Top, Value::Point(20.0));
    tree.set_height(child, Value::Point(50.0));
    tree.add_child(root, child).unwrap();

    layout(&mut tree, root);

    assert_eq!(tree.layout_left(child), 10.0);
    assert_eq!(tree.layout_top(child), 20.0);
    // Width is derived from the opposing insets.
    assert_eq!(tree.layout_width(child), 60.0);
    assert_eq!(tree.layout_height(child), 50.0);
}

// ============================================================================
// MEASURE FUNCTIONS AND CACHING
// ============================================================================

#[test]
fn test_measure_func_sizes_leaf() {
    let mut tree = FlexTree::new();
    let root = tree.new_node();
    tree.set_width(root, Value::Point(100.0));
    tree.set_flex_direction(root, FlexDirection::Row);

    let leaf = tree.new_node();
    tree.set_measure_func(leaf, Some(Box::new(|_w, _wm, _h, _hm| Size::new(30.0, 10.0))))
        .unwrap();
    tree.add_child(root, leaf).unwrap();

    layout(&mut tree, root);

    assert_eq!(tree.layout_width(leaf), 30.0);
    assert_eq!(tree.layout_height(leaf), 10.0);
    assert_eq!(tree.layout_height(root), 10.0);
}

#[test]
fn test_measure_cached_across_layout_passes() {
    let mut tree = FlexTree::new();
    let root = tree.new_node();
    tree.set_width(root, Value::Point(100.0));
    tree.set_flex_direction(root, FlexDirection::Row);

    let count = Rc::new(RefCell::new(0));
    let seen = count.clone();
    let leaf = tree.new_node();
    tree.set_measure_func(
        leaf,
        Some(Box::new(move |_w, _wm, _h, _hm| {
            *seen.borrow_mut() += 1;
            Size::new(30.0, 10.0)
        })),
    )
    .unwrap();
    tree.add_child(root, leaf).unwrap();

    layout(&mut tree, root);
    assert_eq!(*count.borrow(), 1);

    // A second pass with identical constraints is answered from the cache.
    layout(&mut tree, root);
    assert_eq!(*count.borrow(), 1);
    assert!(tree.cache_stats().hits >= 1);

    // Dirtying the leaf forces a remeasure.
    tree.mark_dirty(leaf).unwrap();
    layout(&mut tree, root);
    assert_eq!(*count.borrow(), 2);
}

#[test]
fn test_remeasure_on_tighter_constraint() {
    let mut tree = FlexTree::new();
    let root = tree.new_node();
    tree.set_width(root, Value::Point(200.0));
    tree.set_flex_direction(root, FlexDirection::Row);

    let count = Rc::new(RefCell::new(0));
    let seen = count.clone();
    let leaf = tree.new_node();
    tree.set_measure_func(
        leaf,
        Some(Box::new(move |w: f32, wm, _h, _hm| {
            *seen.borrow_mut() += 1;
            let width = if wm == MeasureMode::Undefined { 100.0 } else { w.min(100.0) };
            Size::new(width, 10.0)
        })),
    )
    .unwrap();
    tree.add_child(root, leaf).unwrap();

    layout(&mut tree, root);
    assert_eq!(tree.layout_width(leaf), 100.0);
    let calls_after_first = *count.borrow();

    // Shrinking the container below the measured size invalidates the
    // cached measurement even though the leaf itself is clean.
    tree.set_width(root, Value::Point(50.0));
    layout(&mut tree, root);
    assert_eq!(tree.layout_width(leaf), 50.0);
    assert!(*count.borrow() > calls_after_first);
}

#[test]
fn test_incremental_relayout_after_style_change() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 20.0);
    tree.set_flex_direction(root, FlexDirection::Row);

    let child = tree.new_node();
    tree.set_width(child, Value::Point(40.0));
    tree.add_child(root, child).unwrap();

    layout(&mut tree, root);
    assert_eq!(tree.layout_width(child), 40.0);
    tree.mark_layout_seen(child);
    assert!(!tree.has_new_layout(child));

    tree.set_width(child, Value::Point(70.0));
    assert!(tree.is_dirty(root));
    layout(&mut tree, root);

    assert_eq!(tree.layout_width(child), 70.0);
    assert!(tree.has_new_layout(child));
}

#[test]
fn test_clean_relayout_leaves_children_untouched() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 100.0);
    tree.set_flex_direction(root, FlexDirection::Row);

    let a = tree.new_node();
    tree.set_flex_grow(a, 1.0);
    tree.set_margin(a, Edge::Left, Value::Point(10.0));
    tree.add_child(root, a).unwrap();

    let b = tree.new_node();
    tree.set_flex_grow(b, 2.0);
    tree.add_child(root, b).unwrap();

    layout(&mut tree, root);
    let rect = |tree: &FlexTree, n: NodeId| {
        (
            tree.layout_left(n),
            tree.layout_top(n),
            tree.layout_width(n),
            tree.layout_height(n),
        )
    };
    let first_a = rect(&tree, a);
    let first_b = rect(&tree, b);
    tree.mark_layout_seen(root);
    tree.mark_layout_seen(a);
    tree.mark_layout_seen(b);

    // Same arguments, nothing dirty: the children must not be revisited.
    layout(&mut tree, root);

    assert!(!tree.has_new_layout(a));
    assert!(!tree.has_new_layout(b));
    assert_eq!(rect(&tree, a), first_a);
    assert_eq!(rect(&tree, b), first_b);
}

// ============================================================================
// PIXEL ROUNDING
// ============================================================================

#[test]
fn test_rounding_distributes_pixels() {
    let mut tree = FlexTree::new();
    let root = fixed_root(&mut tree, 100.0, 10.0);
    tree.set_flex_direction(root, FlexDirection::Row);

    let mut children = Vec::new();
    for _ in 0..3 {
        let child = tree.new_node();
        tree.set_flex_grow(child, 1.0);
        tree.add_child(root, child).unwrap();
        children.push(child);
    }

    layout(&mut tree, root);

    // 100/3 cannot round to three equal widths; the middle child absorbs
    // the extra pixel and the edges stay seamless.
    assert_eq!(tree.layout_width(children[0]), 33.0);
    assert_eq!(tree.layout_width(children[1]), 34.0);
    assert_eq!(tree.layout_width(children[2]), 33.0);
    assert_eq!(tree.layout_left(children[1]), 33.0);
    assert_eq!(tree.layout_left(children[2]), 67.0);
}

#[test]
fn test_scale_zero_disables_rounding() {
    let mut tree = FlexTree::with_config(Config::new().with_point_scale_factor(0.0));
    let root = fixed_root(&mut tree, 100.0, 10.0);
    tree.set_flex_direction(root, FlexDirection::Row);

    let mut children = Vec::new();
    for _ in 0..3 {
        let child = tree.new_node();
        tree.set_flex_grow(child, 1.0);
        tree.add_child(root, child).unwrap();
        children.push(child);
    }

    layout(&mut tree, root);

    for &child in &children {
        assert!((tree.layout_width(child) - 100.0 / 3.0).abs() < 0.01);
    }
}
