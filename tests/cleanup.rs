mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{init_tracing, Lifecycle};
use spark_testing_library::{
    cleanup, document, engine, h, is_mounted, mounted_count, render, CleanupGuard, Component,
    ComponentType, Error, Props, RenderOptions, VNode, MAX_CLEANUP_PASSES,
};

#[test]
fn cleanup_unmounts_and_empties_body() {
    init_tracing();
    let _cleanup = CleanupGuard::new();

    let lifecycle = Lifecycle::default();
    let tracked = lifecycle.component();

    render(VNode::component(&tracked, Props::new()), RenderOptions::default()).unwrap();
    render(VNode::component(&tracked, Props::new()), RenderOptions::default()).unwrap();
    assert_eq!(mounted_count(), 2);
    assert_eq!(document().body().child_nodes().len(), 2);

    cleanup();

    assert_eq!(document().body().inner_html(), "");
    assert_eq!(mounted_count(), 0);
    assert_eq!(lifecycle.unmounts.get(), 2);
}

#[test]
fn cleanup_after_unmount_does_not_tear_down_twice() {
    init_tracing();
    let _cleanup = CleanupGuard::new();

    let lifecycle = Lifecycle::default();
    let tracked = lifecycle.component();
    let result = render(VNode::component(&tracked, Props::new()), RenderOptions::default()).unwrap();

    result.unmount();
    cleanup();
    cleanup();

    assert_eq!(lifecycle.unmounts.get(), 1);
    assert!(result.container().parent_node().is_none());
}

#[test]
fn cleanup_tolerates_container_removed_by_caller() {
    init_tracing();
    let _cleanup = CleanupGuard::new();

    let lifecycle = Lifecycle::default();
    let tracked = lifecycle.component();
    let result = render(VNode::component(&tracked, Props::new()), RenderOptions::default()).unwrap();

    result.container().remove();
    assert!(result.container().parent_node().is_none());

    cleanup();

    assert_eq!(lifecycle.unmounts.get(), 1);
    assert_eq!(mounted_count(), 0);
}

#[test]
fn cleanup_leaves_foreign_parents_alone() {
    init_tracing();
    let _cleanup = CleanupGuard::new();

    let host = document().create_element("div").unwrap();
    let container = document().create_element("div").unwrap();
    host.append_child(&container).unwrap();
    document().body().append_child(&host).unwrap();

    render(h("p").child("nested"), RenderOptions::new().container(&container)).unwrap();
    cleanup();

    // Only containers that are direct children of the body are removed.
    assert_eq!(container.parent_node(), Some(host.clone()));
    assert_eq!(container.inner_html(), "");
    assert!(!is_mounted(&container));

    host.remove();
}

#[test]
fn cleanup_reaches_detached_caller_container() {
    init_tracing();
    let _cleanup = CleanupGuard::new();

    let lifecycle = Lifecycle::default();
    let tracked = lifecycle.component();
    let container = document().create_element("div").unwrap();

    render(
        VNode::component(&tracked, Props::new()),
        RenderOptions::new().container(&container),
    )
    .unwrap();
    cleanup();

    assert_eq!(lifecycle.unmounts.get(), 1);
    assert_eq!(container.inner_html(), "");
    assert!(!is_mounted(&container));
}

#[test]
fn handle_after_cleanup() {
    init_tracing();
    let _cleanup = CleanupGuard::new();

    let result = render(h("div"), RenderOptions::default()).unwrap();
    cleanup();

    // Unmount is a no-op; rerender refuses the released container.
    result.unmount();
    let err = result.rerender(h("span")).unwrap_err();
    assert!(matches!(err, Error::ContainerReleased(id) if id == result.container().id()));
    assert_eq!(result.container().inner_html(), "");
}

#[test]
fn failed_render_is_still_cleaned_up() {
    init_tracing();
    let _cleanup = CleanupGuard::new();

    assert!(render(h("bad tag"), RenderOptions::default()).is_err());
    assert_eq!(mounted_count(), 1);
    assert_eq!(document().body().child_nodes().len(), 1);

    cleanup();

    assert_eq!(mounted_count(), 0);
    assert_eq!(document().body().inner_html(), "");
}

#[test]
fn rendering_into_same_container_registers_once() {
    init_tracing();
    let _cleanup = CleanupGuard::new();

    let container = document().create_element("div").unwrap();
    render(h("p").child("a"), RenderOptions::new().container(&container)).unwrap();
    render(h("p").child("b"), RenderOptions::new().container(&container)).unwrap();

    assert_eq!(mounted_count(), 1);
    assert_eq!(container.inner_html(), "<p>b</p>");
}

#[test]
fn guard_cleans_up_on_drop() {
    init_tracing();
    let container = {
        let _cleanup = CleanupGuard::new();
        let result = render(h("div"), RenderOptions::default()).unwrap();
        assert!(is_mounted(result.container()));
        result.container().clone()
    };

    assert!(!is_mounted(&container));
    assert!(container.parent_node().is_none());
}

#[test]
fn cleanup_releases_engine_anchors() {
    init_tracing();
    let _cleanup = CleanupGuard::new();

    let explicit = document().create_element("div").unwrap();
    let first = render(h("p"), RenderOptions::default()).unwrap();
    let second = render(h("p"), RenderOptions::new().container(&explicit)).unwrap();
    assert_eq!(engine::anchor_for(first.container()), Some(first.anchor()));
    assert_eq!(engine::anchor_for(&explicit), Some(second.anchor()));

    cleanup();

    assert_eq!(engine::anchor_for(first.container()), None);
    assert_eq!(engine::anchor_for(&explicit), None);
    assert_eq!(engine::mounted_root_count(), 0);
}

#[test]
fn repeated_render_and_cleanup_keeps_engine_empty() {
    init_tracing();
    let _cleanup = CleanupGuard::new();
    cleanup();
    let baseline = engine::anchored_container_count();

    for _ in 0..100 {
        render(h("div"), RenderOptions::default()).unwrap();
        cleanup();
    }

    assert_eq!(engine::anchored_container_count(), baseline);
    assert_eq!(engine::mounted_root_count(), 0);
}

/// Renders a fresh copy of itself whenever it is torn down, while enabled.
struct Respawn {
    enabled: Rc<Cell<bool>>,
    spawned: Rc<Cell<usize>>,
    own_type: Rc<RefCell<Option<ComponentType>>>,
}

impl Component for Respawn {
    fn render(&self, _props: &Props) -> VNode {
        h("p").child("again").into()
    }

    fn will_unmount(&self) {
        if !self.enabled.get() {
            return;
        }
        let own_type = self.own_type.borrow().clone();
        if let Some(own_type) = own_type {
            render(VNode::component(&own_type, Props::new()), RenderOptions::default()).unwrap();
            self.spawned.set(self.spawned.get() + 1);
        }
    }
}

#[test]
fn cleanup_stops_when_teardown_keeps_rendering() {
    init_tracing();
    let _cleanup = CleanupGuard::new();

    let enabled = Rc::new(Cell::new(true));
    let spawned = Rc::new(Cell::new(0));
    let own_type = Rc::new(RefCell::new(None));
    let respawn = {
        let (enabled, spawned, own_type) = (enabled.clone(), spawned.clone(), own_type.clone());
        ComponentType::new("Respawn", move || Respawn {
            enabled: enabled.clone(),
            spawned: spawned.clone(),
            own_type: own_type.clone(),
        })
    };
    *own_type.borrow_mut() = Some(respawn.clone());

    render(VNode::component(&respawn, Props::new()), RenderOptions::default()).unwrap();
    cleanup();

    assert_eq!(spawned.get(), MAX_CLEANUP_PASSES);
    assert_eq!(mounted_count(), 1);

    enabled.set(false);
    cleanup();
    own_type.borrow_mut().take();

    assert_eq!(mounted_count(), 0);
    assert_eq!(document().body().inner_html(), "");
}
