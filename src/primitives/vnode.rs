//! VNode - Declarative tree descriptions.
//!
//! A [`VNode`] says what should be on screen; the engine decides how to get
//! the DOM there. Trees are cheap to clone and carry no DOM state.
//!
//! # Example
//!
//! ```ignore
//! use spark_testing_library::primitives::{h, VNode};
//!
//! let tree: VNode = h("div")
//!     .attr("data-testid", "greeting")
//!     .child(h("strong").child("Hello").child(" ").child("World"))
//!     .into();
//! ```

use crate::dom::Node;
use super::types::{ComponentType, NodeRef, Props};

/// A declarative tree description.
#[derive(Clone, Debug, Default)]
pub enum VNode {
    /// Renders nothing.
    #[default]
    Null,
    /// A text node.
    Text(String),
    /// An element with attributes and children.
    Element(ElementNode),
    /// A component instantiated from its type with the given props.
    Component(ComponentType, Props),
    /// Several siblings without a wrapping element.
    Fragment(Vec<VNode>),
    /// Children rendered into `target` instead of the surrounding parent.
    Portal(Vec<VNode>, Node),
}

impl VNode {
    pub fn text(text: impl Into<String>) -> Self {
        VNode::Text(text.into())
    }

    pub fn component(ty: &ComponentType, props: Props) -> Self {
        VNode::Component(ty.clone(), props)
    }

    pub fn fragment(children: Vec<VNode>) -> Self {
        VNode::Fragment(children)
    }

    pub fn portal(children: Vec<VNode>, target: &Node) -> Self {
        VNode::Portal(children, target.clone())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, VNode::Null)
    }
}

impl From<&str> for VNode {
    fn from(text: &str) -> Self {
        VNode::Text(text.to_string())
    }
}

impl From<String> for VNode {
    fn from(text: String) -> Self {
        VNode::Text(text)
    }
}

impl From<ElementNode> for VNode {
    fn from(element: ElementNode) -> Self {
        VNode::Element(element)
    }
}

impl<T: Into<VNode>> From<Option<T>> for VNode {
    fn from(node: Option<T>) -> Self {
        node.map_or(VNode::Null, Into::into)
    }
}

// =============================================================================
// Element Builder
// =============================================================================

/// Element description, built with [`h`].
#[derive(Clone, Debug)]
pub struct ElementNode {
    pub(crate) tag: String,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<VNode>,
    pub(crate) node_ref: Option<NodeRef>,
}

/// Start an element description.
pub fn h(tag: &str) -> ElementNode {
    ElementNode {
        tag: tag.to_string(),
        attrs: Vec::new(),
        children: Vec::new(),
        node_ref: None,
    }
}

impl ElementNode {
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    pub fn child(mut self, child: impl Into<VNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VNode>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Fill `node_ref` with this element's node while it is mounted.
    pub fn node_ref(mut self, node_ref: &NodeRef) -> Self {
        self.node_ref = Some(node_ref.clone());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_builder() {
        let element = h("div")
            .attr("id", "a")
            .attr("id", "b")
            .child("text")
            .children(["x", "y"]);

        assert_eq!(element.tag(), "div");
        assert_eq!(element.attrs, vec![("id".to_string(), "b".to_string())]);
        assert_eq!(element.children.len(), 3);
    }

    #[test]
    fn test_option_into_vnode() {
        assert!(VNode::from(None::<&str>).is_null());
        assert!(matches!(VNode::from(Some("x")), VNode::Text(_)));
    }
}
