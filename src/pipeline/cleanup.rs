//! Cleanup - Tear down every container rendered on this thread.
//!
//! Call [`cleanup`] after each test, or hold a [`CleanupGuard`] for the
//! length of the test so it runs even when an assertion panics.

use tracing::{debug, warn};

use crate::dom::{document, Node};
use crate::engine;
use crate::types::MountAnchor;
use super::containers::with_registry;

/// Sweeps run by one `cleanup()` call before giving up on teardown hooks
/// that keep rendering new containers.
pub const MAX_CLEANUP_PASSES: usize = 16;

/// Unmount every live container and empty the live set.
///
/// Containers the library appended to the body are removed from it;
/// containers elsewhere stay where they are. Never fails, and a second call
/// does nothing.
///
/// Teardown hooks may render again, so the set is swept until it is empty,
/// at most [`MAX_CLEANUP_PASSES`] times. Containers still registered after
/// that are left for the next call.
pub fn cleanup() {
    for pass in 0..MAX_CLEANUP_PASSES {
        let entries = with_registry(|registry| registry.entries());
        if entries.is_empty() {
            return;
        }
        debug!(pass, containers = entries.len(), "cleanup");
        for (container, anchor) in entries {
            cleanup_at_container(&container, anchor);
        }
    }

    let remaining = with_registry(|registry| registry.len());
    if remaining > 0 {
        warn!(remaining, passes = MAX_CLEANUP_PASSES, "teardown keeps rendering; cleanup stopped");
    }
}

fn cleanup_at_container(container: &Node, anchor: Option<MountAnchor>) {
    let body = document().body().clone();
    if container.parent_node().as_ref() == Some(&body) {
        if let Err(err) = body.remove_child(container) {
            warn!(container = %container.id(), %err, "failed to detach container");
        }
    }

    if let Some(anchor) = anchor {
        engine::unmount(anchor);
    }
    engine::forget(container);

    with_registry(|registry| registry.release(container));
}

// =============================================================================
// Cleanup Guard
// =============================================================================

/// Runs [`cleanup`] when dropped.
///
/// ```ignore
/// #[test]
/// fn shows_greeting() {
///     let _cleanup = CleanupGuard::new();
///     let result = render(h("p").child("hi"), RenderOptions::default()).unwrap();
///     assert!(result.get_by_text("hi").is_ok());
/// }
/// ```
#[must_use = "cleanup runs when the guard is dropped"]
#[derive(Debug, Default)]
pub struct CleanupGuard {
    _private: (),
}

impl CleanupGuard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        cleanup();
    }
}
