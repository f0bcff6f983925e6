//! DOM Node - Reference-counted tree nodes.
//!
//! A [`Node`] is a cheap handle (`Rc`) to shared node state. Parents own
//! their children; children keep a weak back-pointer to their parent, so a
//! detached subtree is freed as soon as the last handle to it is dropped.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::DomError;
use crate::types::{NodeId, NodeType};
use super::markup;

/// Next node id. Ids are never reused, across threads too.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

fn next_node_id() -> NodeId {
    NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
}

// =============================================================================
// Node State
// =============================================================================

enum NodeData {
    Document,
    Fragment,
    Text(RefCell<String>),
    Element {
        tag: String,
        attrs: RefCell<Vec<(String, String)>>,
        /// Content fragment, present only for `<template>`.
        content: Option<Node>,
    },
}

struct NodeInner {
    id: NodeId,
    data: NodeData,
    parent: RefCell<Weak<NodeInner>>,
    children: RefCell<Vec<Node>>,
}

/// Handle to a DOM node.
///
/// Cloning the handle does not clone the node. Equality is identity.
#[derive(Clone)]
pub struct Node(Rc<NodeInner>);

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.data {
            NodeData::Document => write!(f, "Node(#document {})", self.0.id),
            NodeData::Fragment => write!(f, "Node(#fragment {})", self.0.id),
            NodeData::Text(data) => write!(f, "Node(#text {:?} {})", data.borrow(), self.0.id),
            NodeData::Element { tag, .. } => write!(f, "Node(<{}> {})", tag, self.0.id),
        }
    }
}

/// Check that `name` is usable as an element or attribute name.
fn validate_name(name: &str) -> Result<(), DomError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(DomError::InvalidCharacter(name.to_string()))
    }
}

// =============================================================================
// Construction
// =============================================================================

impl Node {
    fn with_data(data: NodeData) -> Self {
        Node(Rc::new(NodeInner {
            id: next_node_id(),
            data,
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
        }))
    }

    /// Create a detached element. Tag names are lowercased.
    pub(crate) fn new_element(tag: &str) -> Result<Self, DomError> {
        validate_name(tag)?;
        Ok(Self::new_element_unchecked(tag))
    }

    pub(crate) fn new_element_unchecked(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        let content = (tag == "template").then(Node::new_fragment);
        Self::with_data(NodeData::Element {
            tag,
            attrs: RefCell::new(Vec::new()),
            content,
        })
    }

    pub(crate) fn new_text(data: &str) -> Self {
        Self::with_data(NodeData::Text(RefCell::new(data.to_string())))
    }

    pub(crate) fn new_fragment() -> Self {
        Self::with_data(NodeData::Fragment)
    }

    pub(crate) fn new_document() -> Self {
        Self::with_data(NodeData::Document)
    }
}

// =============================================================================
// Identity & Kind
// =============================================================================

impl Node {
    pub fn id(&self) -> NodeId {
        self.0.id
    }

    pub fn node_type(&self) -> NodeType {
        match &self.0.data {
            NodeData::Document => NodeType::Document,
            NodeData::Fragment => NodeType::Fragment,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Element { .. } => NodeType::Element,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.0.data, NodeData::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.0.data, NodeData::Text(_))
    }

    /// Lowercase tag name, `None` for non-elements.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.0.data {
            NodeData::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn is_same_node(&self, other: &Node) -> bool {
        self == other
    }

    /// Content fragment of a `<template>` element.
    pub fn template_content(&self) -> Option<Node> {
        match &self.0.data {
            NodeData::Element { content, .. } => content.clone(),
            _ => None,
        }
    }
}

// =============================================================================
// Tree Navigation
// =============================================================================

impl Node {
    pub fn parent_node(&self) -> Option<Node> {
        self.0.parent.borrow().upgrade().map(Node)
    }

    pub fn child_nodes(&self) -> Vec<Node> {
        self.0.children.borrow().clone()
    }

    pub fn has_child_nodes(&self) -> bool {
        !self.0.children.borrow().is_empty()
    }

    pub fn first_child(&self) -> Option<Node> {
        self.0.children.borrow().first().cloned()
    }

    pub fn last_child(&self) -> Option<Node> {
        self.0.children.borrow().last().cloned()
    }

    pub fn next_sibling(&self) -> Option<Node> {
        let parent = self.parent_node()?;
        let children = parent.0.children.borrow();
        let index = children.iter().position(|c| c == self)?;
        children.get(index + 1).cloned()
    }

    /// True if `other` is this node or one of its descendants.
    pub fn contains(&self, other: &Node) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if &node == self {
                return true;
            }
            current = node.parent_node();
        }
        false
    }

    /// Topmost ancestor (the node itself when detached).
    pub fn root(&self) -> Node {
        let mut node = self.clone();
        while let Some(parent) = node.parent_node() {
            node = parent;
        }
        node
    }

    /// True if the node is inside a document.
    pub fn is_connected(&self) -> bool {
        self.root().node_type() == NodeType::Document
    }

    /// All descendants in tree order, excluding the node itself.
    pub fn descendants(&self) -> Vec<Node> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants(&self, out: &mut Vec<Node>) {
        for child in self.0.children.borrow().iter() {
            out.push(child.clone());
            child.collect_descendants(out);
        }
    }

    /// Descendant elements in tree order, excluding the node itself.
    pub fn descendant_elements(&self) -> Vec<Node> {
        self.descendants().into_iter().filter(Node::is_element).collect()
    }
}

// =============================================================================
// Tree Mutation
// =============================================================================

impl Node {
    pub fn append_child(&self, child: &Node) -> Result<Node, DomError> {
        self.insert_before(child, None)
    }

    /// Insert `child` before `reference`, or at the end when `reference` is
    /// `None`. Inserting a fragment moves its children instead.
    pub fn insert_before(&self, child: &Node, reference: Option<&Node>) -> Result<Node, DomError> {
        if matches!(self.0.data, NodeData::Text(_)) {
            return Err(DomError::HierarchyRequest("text nodes cannot have children".into()));
        }
        if child.node_type() == NodeType::Document {
            return Err(DomError::HierarchyRequest("a document cannot be inserted".into()));
        }
        if child.contains(self) {
            return Err(DomError::HierarchyRequest(
                "the new child is an ancestor of the parent".into(),
            ));
        }
        if let Some(reference) = reference {
            if reference.parent_node().as_ref() != Some(self) {
                return Err(DomError::NotFound);
            }
        }

        let moving: Vec<Node> = if child.node_type() == NodeType::Fragment {
            let taken = std::mem::take(&mut *child.0.children.borrow_mut());
            for node in &taken {
                *node.0.parent.borrow_mut() = Weak::new();
            }
            taken
        } else {
            vec![child.clone()]
        };

        // Inserting a node before itself is the same as inserting before its
        // next sibling.
        let reference = match reference {
            Some(r) if r == child => r.next_sibling(),
            other => other.cloned(),
        };

        for node in &moving {
            node.detach();
        }

        let mut children = self.0.children.borrow_mut();
        let mut index = reference
            .and_then(|r| children.iter().position(|c| *c == r))
            .unwrap_or(children.len());
        for node in moving {
            *node.0.parent.borrow_mut() = Rc::downgrade(&self.0);
            children.insert(index, node);
            index += 1;
        }

        Ok(child.clone())
    }

    pub fn remove_child(&self, child: &Node) -> Result<Node, DomError> {
        if child.parent_node().as_ref() != Some(self) {
            return Err(DomError::NotFound);
        }
        child.detach();
        Ok(child.clone())
    }

    /// Detach from the parent, if any.
    pub fn remove(&self) {
        self.detach();
    }

    /// Detach every child.
    pub fn remove_children(&self) {
        let children = std::mem::take(&mut *self.0.children.borrow_mut());
        for child in children {
            *child.0.parent.borrow_mut() = Weak::new();
        }
    }

    fn detach(&self) {
        let parent = self.0.parent.replace(Weak::new());
        if let Some(parent) = parent.upgrade() {
            parent.children.borrow_mut().retain(|c| !Rc::ptr_eq(&c.0, &self.0));
        }
    }

    /// Copy this node, and its subtree when `deep` is set. The copy is
    /// detached.
    pub fn clone_node(&self, deep: bool) -> Node {
        let copy = match &self.0.data {
            NodeData::Document => Node::new_document(),
            NodeData::Fragment => Node::new_fragment(),
            NodeData::Text(data) => Node::new_text(&data.borrow()),
            NodeData::Element { tag, attrs, content } => {
                let copy = Node::new_element_unchecked(tag);
                if let NodeData::Element { attrs: copy_attrs, .. } = &copy.0.data {
                    *copy_attrs.borrow_mut() = attrs.borrow().clone();
                }
                if let (true, Some(content), Some(copy_content)) =
                    (deep, content, copy.template_content())
                {
                    for child in content.child_nodes() {
                        copy_content.push_child(child.clone_node(true));
                    }
                }
                copy
            }
        };
        if deep {
            for child in self.child_nodes() {
                copy.push_child(child.clone_node(true));
            }
        }
        copy
    }

    /// Append a node known to be detached and valid for this parent.
    pub(crate) fn push_child(&self, child: Node) {
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child);
    }
}

// =============================================================================
// Attributes
// =============================================================================

impl Node {
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        match &self.0.data {
            NodeData::Element { attrs, .. } => {
                let name = name.to_ascii_lowercase();
                attrs.borrow().iter().find(|(n, _)| *n == name).map(|(_, v)| v.clone())
            }
            _ => None,
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Set an attribute. Names are lowercased; setting on a non-element is a
    /// no-op.
    pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
        validate_name(name)?;
        if let NodeData::Element { attrs, .. } = &self.0.data {
            let name = name.to_ascii_lowercase();
            let mut attrs = attrs.borrow_mut();
            match attrs.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = value.to_string(),
                None => attrs.push((name, value.to_string())),
            }
        }
        Ok(())
    }

    pub fn remove_attribute(&self, name: &str) {
        if let NodeData::Element { attrs, .. } = &self.0.data {
            let name = name.to_ascii_lowercase();
            attrs.borrow_mut().retain(|(n, _)| *n != name);
        }
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        match &self.0.data {
            NodeData::Element { attrs, .. } => attrs.borrow().clone(),
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// Text & Markup
// =============================================================================

impl Node {
    /// Character data of a text node.
    pub fn data(&self) -> Option<String> {
        match &self.0.data {
            NodeData::Text(data) => Some(data.borrow().clone()),
            _ => None,
        }
    }

    /// Replace the character data of a text node. No-op for other nodes.
    pub fn set_data(&self, value: &str) {
        if let NodeData::Text(data) = &self.0.data {
            *data.borrow_mut() = value.to_string();
        }
    }

    /// Concatenated text of the node and its descendants.
    pub fn text_content(&self) -> String {
        match &self.0.data {
            NodeData::Text(data) => data.borrow().clone(),
            _ => {
                let mut out = String::new();
                for node in self.descendants() {
                    if let NodeData::Text(data) = &node.0.data {
                        out.push_str(&data.borrow());
                    }
                }
                out
            }
        }
    }

    /// Replace all children with a single text node.
    pub fn set_text_content(&self, text: &str) {
        match &self.0.data {
            NodeData::Text(data) => *data.borrow_mut() = text.to_string(),
            _ => {
                self.remove_children();
                if !text.is_empty() {
                    self.push_child(Node::new_text(text));
                }
            }
        }
    }

    /// Serialized markup of the children.
    pub fn inner_html(&self) -> String {
        match self.template_content() {
            Some(content) => markup::serialize_children(&content),
            None => markup::serialize_children(self),
        }
    }

    /// Serialized markup of the node itself.
    pub fn outer_html(&self) -> String {
        markup::serialize(self)
    }

    /// Replace the children with the parsed `html`.
    ///
    /// For `<template>` elements the markup lands in the content fragment.
    pub fn set_inner_html(&self, html: &str) -> Result<(), DomError> {
        if self.is_text() {
            self.set_data(html);
            return Ok(());
        }
        let fragment = markup::parse_fragment(html)?;
        let target = self.template_content().unwrap_or_else(|| self.clone());
        target.remove_children();
        target.append_child(&fragment)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(tag: &str) -> Node {
        Node::new_element(tag).unwrap()
    }

    #[test]
    fn test_append_and_parent() {
        let parent = el("div");
        let child = el("span");
        parent.append_child(&child).unwrap();

        assert_eq!(child.parent_node(), Some(parent.clone()));
        assert_eq!(parent.first_child(), Some(child.clone()));
        assert!(parent.contains(&child));
        assert!(!child.contains(&parent));
    }

    #[test]
    fn test_append_moves_between_parents() {
        let a = el("div");
        let b = el("div");
        let child = el("p");

        a.append_child(&child).unwrap();
        b.append_child(&child).unwrap();

        assert!(!a.has_child_nodes());
        assert_eq!(child.parent_node(), Some(b));
    }

    #[test]
    fn test_cycle_rejected() {
        let parent = el("div");
        let child = el("div");
        parent.append_child(&child).unwrap();

        let err = child.append_child(&parent).unwrap_err();
        assert!(matches!(err, DomError::HierarchyRequest(_)));
    }

    #[test]
    fn test_remove_child_not_a_child() {
        let parent = el("div");
        let stranger = el("div");
        assert_eq!(parent.remove_child(&stranger), Err(DomError::NotFound));
    }

    #[test]
    fn test_insert_before_and_siblings() {
        let parent = el("ul");
        let first = el("li");
        let last = el("li");
        parent.append_child(&last).unwrap();
        parent.insert_before(&first, Some(&last)).unwrap();

        assert_eq!(parent.first_child(), Some(first.clone()));
        assert_eq!(first.next_sibling(), Some(last.clone()));
        assert_eq!(last.next_sibling(), None);
    }

    #[test]
    fn test_fragment_insert_moves_children() {
        let fragment = Node::new_fragment();
        fragment.append_child(&el("a")).unwrap();
        fragment.append_child(&el("b")).unwrap();

        let parent = el("div");
        parent.append_child(&fragment).unwrap();

        assert!(!fragment.has_child_nodes());
        assert_eq!(parent.inner_html(), "<a></a><b></b>");
    }

    #[test]
    fn test_invalid_tag() {
        assert!(matches!(Node::new_element("1abc"), Err(DomError::InvalidCharacter(_))));
        assert!(matches!(Node::new_element(""), Err(DomError::InvalidCharacter(_))));
        assert!(matches!(Node::new_element("my widget"), Err(DomError::InvalidCharacter(_))));
    }

    #[test]
    fn test_attributes() {
        let div = el("DIV");
        assert_eq!(div.tag_name(), Some("div"));

        div.set_attribute("data-testid", "one").unwrap();
        div.set_attribute("Title", "hello").unwrap();
        div.set_attribute("data-testid", "two").unwrap();

        assert_eq!(div.get_attribute("data-testid").as_deref(), Some("two"));
        assert_eq!(div.get_attribute("title").as_deref(), Some("hello"));
        assert_eq!(div.attributes().len(), 2);

        div.remove_attribute("title");
        assert!(!div.has_attribute("title"));
    }

    #[test]
    fn test_text_content_and_inner_html() {
        let div = el("div");
        div.set_inner_html("<strong>Hello <em>World</em></strong>").unwrap();

        assert_eq!(div.text_content(), "Hello World");
        assert_eq!(div.inner_html(), "<strong>Hello <em>World</em></strong>");

        div.set_text_content("plain");
        assert_eq!(div.inner_html(), "plain");
    }

    #[test]
    fn test_template_content() {
        let template = el("template");
        template.set_inner_html("<p>inside</p>").unwrap();

        assert!(!template.has_child_nodes());
        let content = template.template_content().unwrap();
        assert_eq!(content.node_type(), NodeType::Fragment);
        assert_eq!(template.inner_html(), "<p>inside</p>");
    }

    #[test]
    fn test_clone_node_is_independent() {
        let div = el("div");
        div.set_inner_html("<span>a</span>").unwrap();

        let copy = div.clone_node(true);
        div.set_inner_html("<span>b</span>").unwrap();

        assert_eq!(copy.inner_html(), "<span>a</span>");
        assert!(copy.parent_node().is_none());
    }
}
