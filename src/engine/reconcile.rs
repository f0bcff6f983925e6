//! Reconciler - Build, patch and tear down mounted trees.
//!
//! A [`Mounted`] tree mirrors the [`VNode`] it was built from and owns the
//! component instances and DOM nodes that tree produced.
//!
//! # Lifecycle order
//!
//! - Mount: DOM is built detached, inserted, then `did_mount` fires
//!   children-first.
//! - Unmount: `will_unmount` fires parent-first, refs are cleared, then the
//!   DOM (including portal content) is removed.
//! - Replace: the new tree is built and inserted, the old tree is unmounted,
//!   then the new tree's `did_mount` hooks fire.
//!
//! Nothing renders to zero DOM nodes: `Null`, empty fragments and portals
//! leave an empty text placeholder so siblings keep their position.

use crate::dom::Node;
use crate::error::EngineError;
use crate::primitives::{Component, ComponentType, ElementNode, NodeRef, VNode};

// =============================================================================
// Mounted Tree
// =============================================================================

pub(crate) enum Mounted {
    Placeholder(Node),
    Text(Node),
    Element {
        node: Node,
        node_ref: Option<NodeRef>,
        children: Vec<Mounted>,
    },
    Component {
        ty: ComponentType,
        instance: Box<dyn Component>,
        rendered: Box<Mounted>,
    },
    /// Never empty; an empty fragment mounts as a placeholder.
    Fragment(Vec<Mounted>),
    Portal {
        target: Node,
        placeholder: Node,
        children: Vec<Mounted>,
    },
}

impl Mounted {
    /// DOM nodes this tree occupies in its parent, in order.
    pub(crate) fn dom_nodes(&self) -> Vec<Node> {
        match self {
            Mounted::Placeholder(node) | Mounted::Text(node) => vec![node.clone()],
            Mounted::Element { node, .. } => vec![node.clone()],
            Mounted::Component { rendered, .. } => rendered.dom_nodes(),
            Mounted::Fragment(children) => children.iter().flat_map(Mounted::dom_nodes).collect(),
            Mounted::Portal { placeholder, .. } => vec![placeholder.clone()],
        }
    }

    fn first_dom_node(&self) -> Option<Node> {
        self.dom_nodes().into_iter().next()
    }

    fn last_dom_node(&self) -> Option<Node> {
        self.dom_nodes().pop()
    }

    /// Number of live component instances in the tree.
    pub(crate) fn component_count(&self) -> usize {
        match self {
            Mounted::Placeholder(_) | Mounted::Text(_) => 0,
            Mounted::Element { children, .. }
            | Mounted::Fragment(children)
            | Mounted::Portal { children, .. } => children.iter().map(Mounted::component_count).sum(),
            Mounted::Component { rendered, .. } => 1 + rendered.component_count(),
        }
    }
}

// =============================================================================
// Mount
// =============================================================================

/// Mount `vnode` into `parent` before `before` (or at the end).
///
/// On failure nothing stays in the DOM, and components whose `did_mount`
/// already ran get their `will_unmount`.
pub(crate) fn mount(vnode: VNode, parent: &Node, before: Option<&Node>) -> Result<Mounted, EngineError> {
    let mounted = build(vnode)?;
    if let Err(err) = insert(&mounted, parent, before) {
        for dom in mounted.dom_nodes() {
            dom.remove();
        }
        return Err(err);
    }
    if let Err(err) = finish(&mounted) {
        tracing::trace!(%err, "rolling back partial mount");
        unmount(mounted);
        return Err(err);
    }
    Ok(mounted)
}

/// Create the DOM for a tree without attaching it anywhere.
fn build(vnode: VNode) -> Result<Mounted, EngineError> {
    match vnode {
        VNode::Null => Ok(Mounted::Placeholder(Node::new_text(""))),
        VNode::Text(text) => Ok(Mounted::Text(Node::new_text(&text))),
        VNode::Element(element) => build_element(element),
        VNode::Component(ty, props) => {
            let instance = ty.instantiate();
            let rendered = build(instance.render(&props))?;
            Ok(Mounted::Component {
                ty,
                instance,
                rendered: Box::new(rendered),
            })
        }
        VNode::Fragment(children) if children.is_empty() => {
            Ok(Mounted::Placeholder(Node::new_text("")))
        }
        VNode::Fragment(children) => {
            let children = children.into_iter().map(build).collect::<Result<Vec<_>, _>>()?;
            Ok(Mounted::Fragment(children))
        }
        VNode::Portal(children, target) => {
            let children = children.into_iter().map(build).collect::<Result<Vec<_>, _>>()?;
            Ok(Mounted::Portal {
                target,
                placeholder: Node::new_text(""),
                children,
            })
        }
    }
}

fn build_element(element: ElementNode) -> Result<Mounted, EngineError> {
    let node = Node::new_element(&element.tag)?;
    for (name, value) in &element.attrs {
        node.set_attribute(name, value)?;
    }

    let mut children = Vec::with_capacity(element.children.len());
    for child in element.children {
        let child = build(child)?;
        for dom in child.dom_nodes() {
            node.append_child(&dom)?;
        }
        children.push(child);
    }

    Ok(Mounted::Element {
        node,
        node_ref: element.node_ref,
        children,
    })
}

fn insert(mounted: &Mounted, parent: &Node, before: Option<&Node>) -> Result<(), EngineError> {
    for dom in mounted.dom_nodes() {
        parent.insert_before(&dom, before)?;
    }
    Ok(())
}

/// Attach portal content, fill refs and fire `did_mount`, children first.
fn finish(mounted: &Mounted) -> Result<(), EngineError> {
    match mounted {
        Mounted::Placeholder(_) | Mounted::Text(_) => {}
        Mounted::Element { node, node_ref, children } => {
            for child in children {
                finish(child)?;
            }
            if let Some(node_ref) = node_ref {
                node_ref.set(Some(node.clone()));
            }
        }
        Mounted::Component { instance, rendered, .. } => {
            finish(rendered)?;
            instance.did_mount();
        }
        Mounted::Fragment(children) => {
            for child in children {
                finish(child)?;
            }
        }
        Mounted::Portal { target, children, .. } => {
            for child in children {
                insert(child, target, None)?;
            }
            for child in children {
                finish(child)?;
            }
        }
    }
    Ok(())
}

// =============================================================================
// Unmount
// =============================================================================

/// Tear a tree down: hooks first, then DOM removal.
pub(crate) fn unmount(mounted: Mounted) {
    run_unmount_hooks(&mounted);
    detach_portals(&mounted);
    for dom in mounted.dom_nodes() {
        dom.remove();
    }
}

fn run_unmount_hooks(mounted: &Mounted) {
    match mounted {
        Mounted::Placeholder(_) | Mounted::Text(_) => {}
        Mounted::Element { node_ref, children, .. } => {
            if let Some(node_ref) = node_ref {
                node_ref.set(None);
            }
            children.iter().for_each(run_unmount_hooks);
        }
        Mounted::Component { instance, rendered, .. } => {
            instance.will_unmount();
            run_unmount_hooks(rendered);
        }
        Mounted::Fragment(children) | Mounted::Portal { children, .. } => {
            children.iter().for_each(run_unmount_hooks);
        }
    }
}

fn detach_portals(mounted: &Mounted) {
    match mounted {
        Mounted::Placeholder(_) | Mounted::Text(_) => {}
        Mounted::Element { children, .. } | Mounted::Fragment(children) => {
            children.iter().for_each(detach_portals);
        }
        Mounted::Component { rendered, .. } => detach_portals(rendered),
        Mounted::Portal { children, .. } => {
            for child in children {
                detach_portals(child);
                for dom in child.dom_nodes() {
                    dom.remove();
                }
            }
        }
    }
}

// =============================================================================
// Patch
// =============================================================================

/// Whether `vnode` can update `mounted` in place.
fn can_patch(mounted: &Mounted, vnode: &VNode) -> bool {
    match (mounted, vnode) {
        (Mounted::Placeholder(_), VNode::Null) => true,
        (Mounted::Text(_), VNode::Text(_)) => true,
        (Mounted::Element { node, .. }, VNode::Element(element)) => {
            node.tag_name() == Some(element.tag.to_ascii_lowercase().as_str())
        }
        (Mounted::Component { ty, .. }, VNode::Component(next, _)) => ty.same_type(next),
        (Mounted::Fragment(_), VNode::Fragment(children)) => !children.is_empty(),
        (Mounted::Portal { target, .. }, VNode::Portal(_, next)) => target == next,
        _ => false,
    }
}

/// Update `mounted` so it reflects `vnode`. `parent` is the node that holds
/// the tree's DOM nodes.
pub(crate) fn patch(mounted: &mut Mounted, vnode: VNode, parent: &Node) -> Result<(), EngineError> {
    if !can_patch(mounted, &vnode) {
        return replace(mounted, vnode, parent);
    }

    match (mounted, vnode) {
        (Mounted::Text(node), VNode::Text(text)) => {
            if node.data().as_deref() != Some(text.as_str()) {
                node.set_data(&text);
            }
        }
        (Mounted::Element { node, node_ref, children }, VNode::Element(element)) => {
            patch_attributes(node, &element.attrs)?;
            patch_children(children, element.children, node, None)?;

            let same_ref = match (&*node_ref, &element.node_ref) {
                (Some(a), Some(b)) => a.same_slot(b),
                (None, None) => true,
                _ => false,
            };
            if !same_ref {
                if let Some(old) = node_ref.take() {
                    old.set(None);
                }
                if let Some(new) = &element.node_ref {
                    new.set(Some(node.clone()));
                }
                *node_ref = element.node_ref;
            }
        }
        (Mounted::Component { instance, rendered, .. }, VNode::Component(_, props)) => {
            let next = instance.render(&props);
            patch(rendered, next, parent)?;
        }
        (Mounted::Fragment(children), VNode::Fragment(next)) => {
            let end = children
                .last()
                .and_then(Mounted::last_dom_node)
                .and_then(|last| last.next_sibling());
            patch_children(children, next, parent, end.as_ref())?;
        }
        (Mounted::Portal { target, children, .. }, VNode::Portal(next, _)) => {
            let target = target.clone();
            patch_children(children, next, &target, None)?;
        }
        // Placeholder against Null: nothing to do. Other pairs were ruled
        // out by can_patch.
        _ => {}
    }
    Ok(())
}

fn replace(mounted: &mut Mounted, vnode: VNode, parent: &Node) -> Result<(), EngineError> {
    let next = build(vnode)?;
    let before = mounted.first_dom_node();
    insert(&next, parent, before.as_ref())?;
    let previous = std::mem::replace(mounted, next);
    unmount(previous);
    finish(mounted)
}

fn patch_attributes(node: &Node, attrs: &[(String, String)]) -> Result<(), EngineError> {
    for (name, _) in node.attributes() {
        if !attrs.iter().any(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            node.remove_attribute(&name);
        }
    }
    for (name, value) in attrs {
        if node.get_attribute(name).as_deref() != Some(value.as_str()) {
            node.set_attribute(name, value)?;
        }
    }
    Ok(())
}

/// Patch children pairwise by position. New trailing children are inserted
/// before `end`; surplus old children are unmounted.
fn patch_children(
    children: &mut Vec<Mounted>,
    next: Vec<VNode>,
    parent: &Node,
    end: Option<&Node>,
) -> Result<(), EngineError> {
    let next_len = next.len();
    for (index, vnode) in next.into_iter().enumerate() {
        if index < children.len() {
            patch(&mut children[index], vnode, parent)?;
        } else {
            children.push(mount(vnode, parent, end)?);
        }
    }
    while children.len() > next_len {
        if let Some(surplus) = children.pop() {
            unmount(surplus);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::primitives::{h, Props};

    fn host() -> Node {
        Node::new_element("div").unwrap()
    }

    struct Counted {
        mounts: Rc<Cell<u32>>,
        unmounts: Rc<Cell<u32>>,
    }

    impl Component for Counted {
        fn render(&self, props: &Props) -> VNode {
            h("span").child(props.get("label").unwrap_or("")).into()
        }

        fn did_mount(&self) {
            self.mounts.set(self.mounts.get() + 1);
        }

        fn will_unmount(&self) {
            self.unmounts.set(self.unmounts.get() + 1);
        }
    }

    fn counted() -> (ComponentType, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let mounts = Rc::new(Cell::new(0));
        let unmounts = Rc::new(Cell::new(0));
        let (m, u) = (mounts.clone(), unmounts.clone());
        let ty = ComponentType::new("Counted", move || Counted {
            mounts: m.clone(),
            unmounts: u.clone(),
        });
        (ty, mounts, unmounts)
    }

    #[test]
    fn test_mount_element_tree() {
        let parent = host();
        let tree: VNode = h("ul").child(h("li").child("one")).child(h("li").child("two")).into();

        let mounted = mount(tree, &parent, None).unwrap();
        assert_eq!(parent.inner_html(), "<ul><li>one</li><li>two</li></ul>");
        assert_eq!(mounted.dom_nodes().len(), 1);
    }

    #[test]
    fn test_null_leaves_empty_placeholder() {
        let parent = host();
        let mounted = mount(VNode::Null, &parent, None).unwrap();

        assert_eq!(parent.inner_html(), "");
        assert_eq!(parent.child_nodes().len(), 1);

        unmount(mounted);
        assert!(!parent.has_child_nodes());
    }

    #[test]
    fn test_invalid_tag_is_an_error() {
        let parent = host();
        let err = mount(h("not valid").into(), &parent, None).err().unwrap();
        assert!(matches!(err, EngineError::Dom(_)));
        assert!(!parent.has_child_nodes());
    }

    #[test]
    fn test_component_lifecycle() {
        let parent = host();
        let (ty, mounts, unmounts) = counted();

        let mounted = mount(VNode::component(&ty, Props::new().set("label", "a")), &parent, None).unwrap();
        assert_eq!(mounts.get(), 1);
        assert_eq!(parent.inner_html(), "<span>a</span>");
        assert_eq!(mounted.component_count(), 1);

        unmount(mounted);
        assert_eq!(unmounts.get(), 1);
        assert_eq!(parent.inner_html(), "");
    }

    #[test]
    fn test_patch_keeps_component_instance() {
        let parent = host();
        let (ty, mounts, unmounts) = counted();

        let mut mounted = mount(VNode::component(&ty, Props::new().set("label", "a")), &parent, None).unwrap();
        let span = parent.first_child().unwrap();

        patch(&mut mounted, VNode::component(&ty, Props::new().set("label", "b")), &parent).unwrap();

        assert_eq!(parent.inner_html(), "<span>b</span>");
        assert_eq!(parent.first_child(), Some(span));
        assert_eq!(mounts.get(), 1);
        assert_eq!(unmounts.get(), 0);
    }

    #[test]
    fn test_patch_replaces_different_kind() {
        let parent = host();
        let (ty, _, unmounts) = counted();

        let mut mounted = mount(VNode::component(&ty, Props::new()), &parent, None).unwrap();
        patch(&mut mounted, h("p").child("plain").into(), &parent).unwrap();

        assert_eq!(unmounts.get(), 1);
        assert_eq!(parent.inner_html(), "<p>plain</p>");
    }

    #[test]
    fn test_patch_attributes_and_children() {
        let parent = host();
        let mut mounted = mount(
            h("div").attr("a", "1").attr("b", "2").child("x").child("y").into(),
            &parent,
            None,
        )
        .unwrap();

        patch(
            &mut mounted,
            h("div").attr("a", "3").child("x").child("z").child(h("i")).into(),
            &parent,
        )
        .unwrap();

        assert_eq!(parent.inner_html(), "<div a=\"3\">xz<i></i></div>");
    }

    #[test]
    fn test_fragment_grow_keeps_position() {
        let parent = host();
        let mut mounted = mount(VNode::fragment(vec!["a".into()]), &parent, None).unwrap();
        parent.append_child(&Node::new_text("|tail")).unwrap();

        patch(&mut mounted, VNode::fragment(vec!["a".into(), "b".into()]), &parent).unwrap();
        assert_eq!(parent.text_content(), "ab|tail");

        patch(&mut mounted, VNode::fragment(vec!["c".into()]), &parent).unwrap();
        assert_eq!(parent.text_content(), "c|tail");
    }

    #[test]
    fn test_portal_content_lives_in_target() {
        let parent = host();
        let target = host();
        let tree = h("div").child(VNode::portal(vec![h("b").child("away").into()], &target));

        let mounted = mount(tree.into(), &parent, None).unwrap();
        assert_eq!(parent.inner_html(), "<div></div>");
        assert_eq!(target.inner_html(), "<b>away</b>");

        unmount(mounted);
        assert_eq!(target.inner_html(), "");
    }

    #[test]
    fn test_failed_mount_rolls_back() {
        let parent = host();
        let (ty, mounts, unmounts) = counted();
        let not_a_parent = Node::new_text("text");
        let tree = VNode::fragment(vec![
            VNode::component(&ty, Props::new()),
            VNode::portal(vec![h("b").into()], &not_a_parent),
        ]);

        assert!(mount(tree, &parent, None).is_err());
        assert_eq!(mounts.get(), 1);
        assert_eq!(unmounts.get(), 1);
        assert!(!parent.has_child_nodes());
    }

    #[test]
    fn test_node_ref_lifecycle() {
        let parent = host();
        let node_ref = NodeRef::new();

        let mounted = mount(h("div").node_ref(&node_ref).into(), &parent, None).unwrap();
        assert_eq!(node_ref.current(), parent.first_child());

        unmount(mounted);
        assert_eq!(node_ref.current(), None);
    }
}
