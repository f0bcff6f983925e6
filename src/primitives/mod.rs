//! Primitives - Tree description building blocks.
//!
//! This module provides what a caller renders:
//! - [`VNode`] - Declarative tree (elements, text, components, fragments, portals)
//! - [`h`] - Element builder
//! - [`Component`] / [`ComponentType`] - Component instances and their types
//! - [`Props`] - Values and children handed to a component
//! - [`NodeRef`] - Access to a mounted element's DOM node
//!
//! # Example
//!
//! ```ignore
//! use spark_testing_library::primitives::{h, ComponentType, Props, VNode};
//!
//! let greet = ComponentType::function("Greet", |props| {
//!     h("div")
//!         .child(h("strong").child(props.get("greeting").unwrap_or("Hi")))
//!         .into()
//! });
//!
//! let tree = VNode::component(&greet, Props::new().set("greeting", "Hello"));
//! ```

mod types;
mod vnode;

pub use types::*;
pub use vnode::*;
