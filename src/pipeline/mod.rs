//! Render Pipeline
//!
//! The test-facing surface: render a tree, work with the handle, clean up.
//!
//! ```text
//! render(ui, options) → live container set → engine::render → RenderResult
//!                                                                   │
//! cleanup() ← every registered container ← unmount / rerender ──────┘
//! ```
//!
//! ## Key Design Principles
//!
//! - **Register first**: a container joins the live set before the engine
//!   touches it, so a failing render is still cleaned up
//! - **Anchors, not containers**: teardown goes through the engine anchor
//!   recorded at render time
//! - **Per thread**: the live set, like the document, belongs to the test
//!   thread that created it

mod cleanup;
mod containers;
mod mount;
mod options;

pub use cleanup::{cleanup, CleanupGuard, MAX_CLEANUP_PASSES};
pub use containers::{is_mounted, mounted_containers, mounted_count, ContainerRegistry};
pub use mount::{render, RenderResult};
pub use options::RenderOptions;
