//! Error types for spark-testing-library.
//!
//! Each layer owns its error enum. The crate-level [`Error`] wraps them so
//! failures from the DOM, the engine or the query layer reach the caller
//! unchanged.

use thiserror::Error;

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the host DOM.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("Invalid character in name: {0:?}")]
    InvalidCharacter(String),

    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),

    #[error("Node to be removed is not a child of this node")]
    NotFound,

    #[error("Markup parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },
}

/// Errors raised by the rendering engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("DOM error while rendering: {0}")]
    Dom(#[from] DomError),

    #[error("Cannot render into a {0} node")]
    InvalidContainer(String),
}

/// Errors raised by bound queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unable to find an element {description}\n\n{dom}")]
    NotFound { description: String, dom: String },

    #[error("Found {count} elements {description}, expected one\n\n{dom}")]
    Multiple {
        count: usize,
        description: String,
        dom: String,
    },

    #[error("No query named {0:?} is bound to this element")]
    UnknownQuery(String),
}

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Container {0} was released by cleanup and can no longer be rendered into")]
    ContainerReleased(crate::types::NodeId),
}
