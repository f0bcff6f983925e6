//! Document - The per-thread host document.
//!
//! Every thread gets its own `<html><head></head><body></body></html>` tree.
//! Rust's test harness runs tests on separate threads, so tests never see
//! each other's markup.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::DomError;
use super::markup;
use super::node::Node;

thread_local! {
    static DOCUMENT: Document = Document::new();
}

/// Get the document of the current thread.
pub fn document() -> Document {
    DOCUMENT.with(|doc| doc.clone())
}

struct DocumentInner {
    node: Node,
    html: Node,
    head: Node,
    body: Node,
    ranges: Cell<bool>,
}

/// Handle to a document. Cheap to clone.
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

impl Document {
    fn new() -> Self {
        let node = Node::new_document();
        let html = Node::new_element_unchecked("html");
        let head = Node::new_element_unchecked("head");
        let body = Node::new_element_unchecked("body");
        html.push_child(head.clone());
        html.push_child(body.clone());
        node.push_child(html.clone());

        Self {
            inner: Rc::new(DocumentInner {
                node,
                html,
                head,
                body,
                ranges: Cell::new(true),
            }),
        }
    }

    /// The document node itself.
    pub fn node(&self) -> &Node {
        &self.inner.node
    }

    /// The `<html>` element.
    pub fn document_element(&self) -> &Node {
        &self.inner.html
    }

    pub fn head(&self) -> &Node {
        &self.inner.head
    }

    pub fn body(&self) -> &Node {
        &self.inner.body
    }

    pub fn create_element(&self, tag: &str) -> Result<Node, DomError> {
        Node::new_element(tag)
    }

    pub fn create_text_node(&self, data: &str) -> Node {
        Node::new_text(data)
    }

    pub fn create_document_fragment(&self) -> Node {
        Node::new_fragment()
    }

    /// Create a range, or `None` when the host has no range support.
    pub fn create_range(&self) -> Option<Range> {
        self.inner.ranges.get().then(|| Range {
            context: self.inner.body.clone(),
        })
    }

    /// Toggle range support, to emulate hosts that lack `createRange`.
    pub fn set_range_support(&self, enabled: bool) {
        self.inner.ranges.set(enabled);
    }

    pub fn supports_ranges(&self) -> bool {
        self.inner.ranges.get()
    }
}

/// A collapsed range positioned inside the body.
pub struct Range {
    context: Node,
}

impl Range {
    /// Parse `markup` into a detached fragment, in the context of the range.
    pub fn create_contextual_fragment(&self, markup: &str) -> Result<Node, DomError> {
        tracing::trace!(context = %self.context.id(), "creating contextual fragment");
        markup::parse_fragment(markup)
    }
}
