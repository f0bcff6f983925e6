//! Rendering Engine - Mount declarative trees into DOM containers.
//!
//! The engine manages:
//! - Registry: anchor per container, live tree per anchor
//! - Reconciler: build, patch and tear down mounted trees
//!
//! # Contract
//!
//! - [`render`] mounts a tree into a container, replacing what was there,
//!   and patches in place on later calls. It returns the container's
//!   [`MountAnchor`](crate::types::MountAnchor).
//! - [`unmount`] renders the null tree at an anchor: every component gets
//!   its `will_unmount` and the DOM is removed. Calling it on an anchor with
//!   nothing mounted does nothing.
//!
//! Portal content is torn down together with its owning tree.

mod registry;
mod reconcile;

pub use registry::*;
