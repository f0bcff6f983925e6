//! Query Library - Find and inspect rendered DOM.
//!
//! This module provides everything a test uses to look at output:
//! - [`BoundQueries`] - `get_by_*` / `query_by_*` lookups bound to a scope
//! - [`QuerySet`] - Named query functions, overridable per render
//! - [`TextMatch`] - Exact, loose or predicate text matching
//! - [`pretty_dom`] - Indented markup for debug output and error messages
//! - [`Config`] - Test id attribute, print limit and highlighting
//!
//! # Example
//!
//! ```ignore
//! use spark_testing_library::queries::{within, TextMatch};
//!
//! let queries = within(&container);
//! let greeting = queries.get_by_text("Hello World")?;
//! let maybe = queries.query_by_test_id(TextMatch::loose("portal"))?;
//! ```

mod bound;
mod builtins;
mod config;
mod matcher;
mod pretty;

pub use bound::*;
pub use builtins::{implicit_role, node_text, query_all_by_attribute, role_of};
pub use config::*;
pub use matcher::*;
pub use pretty::*;
