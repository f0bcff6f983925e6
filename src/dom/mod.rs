//! Host DOM - Document, nodes and markup.
//!
//! A minimal DOM-like environment for rendering into:
//! - [`Document`] - Per-thread document with `head` and `body`
//! - [`Node`] - Reference-counted element/text/fragment handle
//! - [`markup`] - Serializer and fragment parser behind `inner_html`

mod document;
mod node;
pub mod markup;

pub use document::*;
pub use node::*;
