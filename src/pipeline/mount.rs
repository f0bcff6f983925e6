//! Mount API - Render a tree into a tracked container and get a handle back.
//!
//! [`render`] resolves the container, registers it in the live container
//! set, optionally wraps the tree and hands it to the engine. The returned
//! [`RenderResult`] exposes the container, bound queries and the lifecycle
//! operations for that one mount.
//!
//! # Example
//!
//! ```ignore
//! use spark_testing_library::{cleanup, h, render, RenderOptions};
//!
//! let result = render(h("div").attr("data-testid", "greeting").child("hi"), RenderOptions::default())?;
//! assert_eq!(result.get_by_test_id("greeting")?.text_content(), "hi");
//!
//! result.rerender(h("div").attr("data-testid", "greeting").child("bye"))?;
//! result.debug();
//!
//! cleanup();
//! ```

use std::io::Write;
use std::ops::Deref;

use tracing::debug;

use crate::dom::{document, Node};
use crate::engine;
use crate::error::{DomError, Error, Result};
use crate::primitives::{ComponentType, Props, VNode};
use crate::queries::{get_queries_for_element, log_dom, write_dom, BoundQueries};
use crate::types::MountAnchor;
use super::containers::{is_mounted, with_registry};
use super::options::RenderOptions;

// =============================================================================
// Render Result
// =============================================================================

/// Handle for one rendered tree.
///
/// Dereferences to [`BoundQueries`] scoped to the base element, so
/// `result.get_by_text("Save")` works directly.
///
/// Dropping the handle does not unmount anything; teardown happens through
/// [`unmount`](RenderResult::unmount) or [`cleanup`](super::cleanup).
#[derive(Debug)]
pub struct RenderResult {
    container: Node,
    base_element: Node,
    anchor: MountAnchor,
    wrapper: Option<ComponentType>,
    queries: BoundQueries,
}

impl RenderResult {
    /// The node the tree was rendered into.
    pub fn container(&self) -> &Node {
        &self.container
    }

    /// Scope of the bound queries and of `debug()`.
    pub fn base_element(&self) -> &Node {
        &self.base_element
    }

    /// Engine anchor for this container.
    pub fn anchor(&self) -> MountAnchor {
        self.anchor
    }

    /// Queries bound to the base element.
    pub fn queries(&self) -> &BoundQueries {
        &self.queries
    }

    /// Print the base element to stdout.
    pub fn debug(&self) {
        log_dom(&self.base_element, None);
    }

    /// Print `element` to stdout.
    pub fn debug_element(&self, element: &Node) {
        log_dom(element, None);
    }

    /// Write `element`, or the base element, to `out`.
    pub fn debug_to<W: Write>(&self, out: &mut W, element: Option<&Node>) -> Result<()> {
        write_dom(out, element.unwrap_or(&self.base_element), None)?;
        Ok(())
    }

    /// Tear down the mounted tree.
    ///
    /// The container stays in the document and in the live set until
    /// `cleanup()`. Calling this more than once is a no-op.
    pub fn unmount(&self) {
        let torn_down = engine::unmount(self.anchor);
        debug!(container = %self.container.id(), torn_down, "unmount");
    }

    /// Render `ui` into the same container, reusing the wrapper.
    ///
    /// Fails with [`Error::ContainerReleased`] once `cleanup()` has released
    /// the container.
    pub fn rerender(&self, ui: impl Into<VNode>) -> Result<()> {
        if !is_mounted(&self.container) {
            return Err(Error::ContainerReleased(self.container.id()));
        }
        debug!(container = %self.container.id(), "rerender");
        mount_into(ui.into(), &self.container, self.wrapper.as_ref())?;
        Ok(())
    }

    /// Detached snapshot of the container's current content.
    ///
    /// Later changes to the container do not affect the returned fragment.
    pub fn as_fragment(&self) -> Result<Node> {
        let markup = self.container.inner_html();
        let doc = document();

        let fragment = match doc.create_range() {
            Some(range) => range.create_contextual_fragment(&markup)?,
            None => {
                let template = doc.create_element("template")?;
                template.set_inner_html(&markup)?;
                template.template_content().ok_or_else(|| {
                    DomError::HierarchyRequest("template element has no content".to_string())
                })?
            }
        };
        Ok(fragment)
    }
}

impl Deref for RenderResult {
    type Target = BoundQueries;

    fn deref(&self) -> &BoundQueries {
        &self.queries
    }
}

// =============================================================================
// Render
// =============================================================================

/// Render `ui` and return a handle for it.
///
/// Without an explicit container a fresh `div` is appended to the body and
/// the base element is the body, whatever `options.base_element` says.
/// The container is registered for `cleanup()` before the engine runs, so
/// it is tracked even when rendering fails.
pub fn render(ui: impl Into<VNode>, options: RenderOptions) -> Result<RenderResult> {
    let RenderOptions {
        container,
        base_element,
        queries,
        wrapper,
    } = options;

    let (container, base_element) = match container {
        Some(container) => {
            let base_element = base_element.unwrap_or_else(|| container.clone());
            (container, base_element)
        }
        None => {
            let doc = document();
            let container = doc.create_element("div")?;
            doc.body().append_child(&container)?;
            if base_element.is_some() {
                debug!("base_element ignored for an auto-created container");
            }
            (container, doc.body().clone())
        }
    };

    debug!(
        container = %container.id(),
        base_element = %base_element.id(),
        wrapped = wrapper.is_some(),
        "render"
    );

    let anchor = mount_into(ui.into(), &container, wrapper.as_ref())?;

    Ok(RenderResult {
        queries: get_queries_for_element(&base_element, queries),
        container,
        base_element,
        anchor,
        wrapper,
    })
}

/// Register `container`, wrap `ui` and delegate to the engine.
fn mount_into(ui: VNode, container: &Node, wrapper: Option<&ComponentType>) -> Result<MountAnchor> {
    with_registry(|registry| registry.register(container));

    let tree = match wrapper {
        Some(wrapper) => VNode::component(wrapper, Props::with_children(vec![ui])),
        None => ui,
    };

    let anchor = engine::render(tree, container)?;
    with_registry(|registry| registry.set_anchor(container, anchor));
    Ok(anchor)
}
