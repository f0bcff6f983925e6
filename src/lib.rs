//! # spark-testing-library
//!
//! Render components into an isolated DOM container and query them in tests.
//!
//! ## Architecture
//!
//! Every test thread gets its own document, engine roots and live container
//! set, so tests running in parallel never see each other's output.
//!
//! ```text
//! VNode tree → render() → live container set → engine (mount / patch) → DOM
//!                  │
//!                  └→ RenderResult: queries, debug, rerender, unmount, as_fragment
//! ```
//!
//! ## Modules
//!
//! - [`dom`] - Per-thread document, nodes and markup
//! - [`primitives`] - VNode trees, components, props and refs
//! - [`engine`] - Mount, patch and tear down trees at container anchors
//! - [`queries`] - Bound queries, text matching, pretty printing, config
//! - [`pipeline`] - `render`, `RenderResult` and `cleanup`
//! - [`types`] - Node ids, mount anchors, match flags
//!
//! ## Example
//!
//! ```ignore
//! use spark_testing_library::{h, render, CleanupGuard, RenderOptions};
//!
//! let _cleanup = CleanupGuard::new();
//! let result = render(h("div").attr("data-testid", "greeting").child("Hello"), RenderOptions::default())?;
//! assert_eq!(result.get_by_test_id("greeting")?.text_content(), "Hello");
//! ```

pub mod dom;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod queries;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{DomError, EngineError, Error, QueryError, Result};

pub use dom::{document, Document, Node};

pub use primitives::{h, Component, ComponentType, ElementNode, NodeRef, Props, VNode};

pub use queries::*;

pub use pipeline::{
    cleanup, is_mounted, mounted_count, render, CleanupGuard, RenderOptions, RenderResult,
    MAX_CLEANUP_PASSES,
};
