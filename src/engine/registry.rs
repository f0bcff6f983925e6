//! Root Registry - Mounted trees keyed by mount anchor.
//!
//! Manages the lifecycle of render roots:
//! - Container → anchor mapping (one stable anchor per container)
//! - Anchor → mounted tree, present while something is rendered there
//! - Null-tree teardown that is safe to repeat
//! - Forgetting a container once it is released for good

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::dom::Node;
use crate::error::EngineError;
use crate::primitives::VNode;
use crate::types::{MountAnchor, NodeId, NodeType};
use super::reconcile::{self, Mounted};

// =============================================================================
// Registry State
// =============================================================================

struct Root {
    container: Node,
    tree: Mounted,
}

thread_local! {
    /// Anchor handed out for each container ever rendered into.
    static CONTAINER_ANCHORS: RefCell<HashMap<NodeId, MountAnchor>> = RefCell::new(HashMap::new());

    /// Live trees. An anchor without an entry has nothing mounted.
    static ROOTS: RefCell<HashMap<MountAnchor, Root>> = RefCell::new(HashMap::new());

    /// Next anchor id.
    static NEXT_ANCHOR: Cell<u64> = const { Cell::new(1) };
}

fn anchor_for_or_create(container: &Node) -> MountAnchor {
    CONTAINER_ANCHORS.with(|anchors| {
        *anchors.borrow_mut().entry(container.id()).or_insert_with(|| {
            NEXT_ANCHOR.with(|next| {
                let id = next.get();
                next.set(id + 1);
                MountAnchor(id)
            })
        })
    })
}

// =============================================================================
// Render & Teardown
// =============================================================================

/// Render `tree` into `container`.
///
/// The first render replaces whatever the container held; later renders
/// patch the existing tree in place. Returns the container's anchor, which
/// stays the same for the container's lifetime.
pub fn render(tree: impl Into<VNode>, container: &Node) -> Result<MountAnchor, EngineError> {
    match container.node_type() {
        NodeType::Element | NodeType::Fragment => {}
        NodeType::Text => return Err(EngineError::InvalidContainer("text".into())),
        NodeType::Document => return Err(EngineError::InvalidContainer("document".into())),
    }

    let tree = tree.into();
    let anchor = anchor_for_or_create(container);

    // Take the root out while patching: component hooks may render into
    // other containers.
    let existing = ROOTS.with(|roots| roots.borrow_mut().remove(&anchor));

    match existing {
        Some(mut root) => {
            tracing::trace!(?anchor, container = %container.id(), "patching root");
            let result = reconcile::patch(&mut root.tree, tree, container);
            ROOTS.with(|roots| roots.borrow_mut().insert(anchor, root));
            result?;
        }
        None => {
            tracing::trace!(?anchor, container = %container.id(), "mounting root");
            container.remove_children();
            let tree = reconcile::mount(tree, container, None)?;
            ROOTS.with(|roots| {
                roots.borrow_mut().insert(
                    anchor,
                    Root {
                        container: container.clone(),
                        tree,
                    },
                )
            });
        }
    }

    Ok(anchor)
}

/// Render the null tree at `anchor`, tearing down everything mounted there.
///
/// Returns `false` when nothing was mounted, which makes repeated calls
/// harmless.
pub fn unmount(anchor: MountAnchor) -> bool {
    let root = ROOTS.with(|roots| roots.borrow_mut().remove(&anchor));
    match root {
        Some(root) => {
            tracing::trace!(?anchor, container = %root.container.id(), "unmounting root");
            reconcile::unmount(root.tree);
            true
        }
        None => {
            tracing::trace!(?anchor, "nothing mounted at anchor");
            false
        }
    }
}

/// Tear down whatever is mounted in `container` and drop its anchor.
///
/// A later render into the same container gets a fresh anchor. Returns
/// `false` when the engine never rendered into `container`.
pub fn forget(container: &Node) -> bool {
    let anchor = CONTAINER_ANCHORS.with(|anchors| anchors.borrow_mut().remove(&container.id()));
    match anchor {
        Some(anchor) => {
            unmount(anchor);
            tracing::trace!(?anchor, container = %container.id(), "forgot container");
            true
        }
        None => false,
    }
}

/// Number of containers that currently hold an anchor.
pub fn anchored_container_count() -> usize {
    CONTAINER_ANCHORS.with(|anchors| anchors.borrow().len())
}

// =============================================================================
// Lookups
// =============================================================================

/// Anchor of a container the engine has rendered into.
pub fn anchor_for(container: &Node) -> Option<MountAnchor> {
    CONTAINER_ANCHORS.with(|anchors| anchors.borrow().get(&container.id()).copied())
}

/// Whether a tree is currently mounted at `anchor`.
pub fn has_tree(anchor: MountAnchor) -> bool {
    ROOTS.with(|roots| roots.borrow().contains_key(&anchor))
}

/// Number of anchors with a mounted tree.
pub fn mounted_root_count() -> usize {
    ROOTS.with(|roots| roots.borrow().len())
}

/// Number of live component instances under `anchor`.
pub fn component_count(anchor: MountAnchor) -> usize {
    ROOTS.with(|roots| {
        roots
            .borrow()
            .get(&anchor)
            .map_or(0, |root| root.tree.component_count())
    })
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Tear down every root and forget all anchors (for testing).
pub fn reset_engine() {
    let roots: Vec<Root> = ROOTS.with(|roots| roots.borrow_mut().drain().map(|(_, root)| root).collect());
    for root in roots {
        reconcile::unmount(root.tree);
    }
    CONTAINER_ANCHORS.with(|anchors| anchors.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::primitives::{h, Component, ComponentType, Props};

    fn container() -> Node {
        Node::new_element("div").unwrap()
    }

    #[test]
    fn test_render_returns_stable_anchor() {
        reset_engine();
        let c = container();

        let first = render(h("p").child("one"), &c).unwrap();
        let second = render(h("p").child("two"), &c).unwrap();

        assert_eq!(first, second);
        assert_eq!(anchor_for(&c), Some(first));
        assert_eq!(c.inner_html(), "<p>two</p>");
    }

    #[test]
    fn test_first_render_replaces_existing_content() {
        reset_engine();
        let c = container();
        c.set_inner_html("<em>stale</em>").unwrap();

        render("fresh", &c).unwrap();
        assert_eq!(c.inner_html(), "fresh");
    }

    #[test]
    fn test_unmount_is_idempotent() {
        reset_engine();
        let c = container();
        let anchor = render(h("div"), &c).unwrap();

        assert!(has_tree(anchor));
        assert!(unmount(anchor));
        assert!(!unmount(anchor));
        assert!(!has_tree(anchor));
        assert_eq!(c.inner_html(), "");
    }

    #[test]
    fn test_render_after_unmount_reuses_anchor() {
        reset_engine();
        let c = container();
        let anchor = render(h("div"), &c).unwrap();
        unmount(anchor);

        let again = render(h("span"), &c).unwrap();
        assert_eq!(anchor, again);
        assert_eq!(c.inner_html(), "<span></span>");
    }

    #[test]
    fn test_forget_drops_anchor() {
        reset_engine();
        let c = container();
        let anchor = render(h("div"), &c).unwrap();

        assert!(forget(&c));
        assert!(!has_tree(anchor));
        assert_eq!(anchor_for(&c), None);
        assert_eq!(anchored_container_count(), 0);
        assert_eq!(c.inner_html(), "");
        assert!(!forget(&c));

        let fresh = render(h("span"), &c).unwrap();
        assert_ne!(fresh, anchor);
    }

    #[test]
    fn test_invalid_container() {
        reset_engine();
        let text = Node::new_text("x");
        assert!(matches!(render(h("div"), &text), Err(EngineError::InvalidContainer(_))));
    }

    #[test]
    fn test_error_keeps_previous_root() {
        reset_engine();
        let c = container();
        let anchor = render(h("div").child("ok"), &c).unwrap();

        assert!(render(h("bad tag"), &c).is_err());
        assert!(has_tree(anchor));
        assert_eq!(mounted_root_count(), 1);
    }

    struct Nested {
        inner: Node,
    }

    impl Component for Nested {
        fn render(&self, _props: &Props) -> VNode {
            h("div").into()
        }

        fn did_mount(&self) {
            let _ = render(h("b").child("nested"), &self.inner);
        }
    }

    #[test]
    fn test_hooks_may_render_other_roots() {
        reset_engine();
        let outer = container();
        let inner = container();
        let inner_for_factory = inner.clone();
        let ty = ComponentType::new("Nested", move || Nested {
            inner: inner_for_factory.clone(),
        });

        render(VNode::component(&ty, Props::new()), &outer).unwrap();
        assert_eq!(inner.inner_html(), "<b>nested</b>");
        assert_eq!(mounted_root_count(), 2);
    }

    #[test]
    fn test_component_count() {
        reset_engine();
        let c = container();
        let hits = Rc::new(Cell::new(0));
        let hits_in_render = hits.clone();
        let ty = ComponentType::function("Leaf", move |_| {
            hits_in_render.set(hits_in_render.get() + 1);
            VNode::Null
        });

        let anchor = render(h("div").child(VNode::component(&ty, Props::new())), &c).unwrap();
        assert_eq!(component_count(anchor), 1);
        assert_eq!(hits.get(), 1);
    }
}
