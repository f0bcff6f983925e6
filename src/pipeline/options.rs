//! Render Options - Where and how a tree is rendered.

use crate::dom::Node;
use crate::primitives::ComponentType;
use crate::queries::QuerySet;

/// Options for [`render`](super::render).
///
/// Every field is optional; `RenderOptions::default()` renders into a fresh
/// `div` appended to the body, scopes queries and debug output to the body,
/// binds the default query set and does not wrap the tree.
///
/// # Example
///
/// ```ignore
/// let options = RenderOptions::new()
///     .container(&my_container)
///     .wrapper(&theme_provider);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Mount point. When `None`, a `div` is created and appended to the body.
    pub container: Option<Node>,

    /// Scope for bound queries and `debug()`. Defaults to the container.
    /// Only used together with `container`; an auto-created container is
    /// always scoped to the body.
    pub base_element: Option<Node>,

    /// Query set to bind instead of the default one.
    pub queries: Option<QuerySet>,

    /// Component rendered around the tree, receiving it as its only child.
    pub wrapper: Option<ComponentType>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container(mut self, container: &Node) -> Self {
        self.container = Some(container.clone());
        self
    }

    pub fn base_element(mut self, base_element: &Node) -> Self {
        self.base_element = Some(base_element.clone());
        self
    }

    pub fn queries(mut self, queries: QuerySet) -> Self {
        self.queries = Some(queries);
        self
    }

    pub fn wrapper(mut self, wrapper: &ComponentType) -> Self {
        self.wrapper = Some(wrapper.clone());
        self
    }
}
