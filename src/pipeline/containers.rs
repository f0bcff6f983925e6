//! Live Container Set - Every container rendered into and not yet cleaned up.
//!
//! Containers are registered before the engine renders into them, whether or
//! not they are attached to the document, so [`cleanup`](super::cleanup)
//! reaches caller-supplied containers too. Entries are keyed by node
//! identity; registering twice keeps a single entry.
//!
//! The set is thread-local: each test thread has its own.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::dom::Node;
use crate::types::{MountAnchor, NodeId};

struct Entry {
    container: Node,
    /// Set once the engine has rendered into the container.
    anchor: Option<MountAnchor>,
}

/// Registry of live containers.
#[derive(Default)]
pub struct ContainerRegistry {
    entries: HashMap<NodeId, Entry>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `container`. Idempotent.
    pub fn register(&mut self, container: &Node) {
        self.entries.entry(container.id()).or_insert_with(|| Entry {
            container: container.clone(),
            anchor: None,
        });
    }

    /// Record the anchor the engine returned for a registered container.
    pub fn set_anchor(&mut self, container: &Node, anchor: MountAnchor) {
        if let Some(entry) = self.entries.get_mut(&container.id()) {
            entry.anchor = Some(anchor);
        }
    }

    pub fn anchor(&self, container: &Node) -> Option<MountAnchor> {
        self.entries.get(&container.id()).and_then(|entry| entry.anchor)
    }

    /// Stop tracking `container`. Returns whether it was tracked.
    pub fn release(&mut self, container: &Node) -> bool {
        self.entries.remove(&container.id()).is_some()
    }

    pub fn contains(&self, container: &Node) -> bool {
        self.entries.contains_key(&container.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of every tracked container with its anchor.
    pub fn entries(&self) -> Vec<(Node, Option<MountAnchor>)> {
        self.entries
            .values()
            .map(|entry| (entry.container.clone(), entry.anchor))
            .collect()
    }
}

thread_local! {
    static MOUNTED_CONTAINERS: RefCell<ContainerRegistry> = RefCell::new(ContainerRegistry::new());
}

/// Run `f` against this thread's registry.
///
/// Do not call back into rendering from `f`; the registry is borrowed.
pub(crate) fn with_registry<R>(f: impl FnOnce(&mut ContainerRegistry) -> R) -> R {
    MOUNTED_CONTAINERS.with(|registry| f(&mut registry.borrow_mut()))
}

/// Whether `container` is in the live set.
pub fn is_mounted(container: &Node) -> bool {
    with_registry(|registry| registry.contains(container))
}

/// Number of containers in the live set.
pub fn mounted_count() -> usize {
    with_registry(|registry| registry.len())
}

/// Containers in the live set, in no particular order.
pub fn mounted_containers() -> Vec<Node> {
    with_registry(|registry| {
        registry
            .entries()
            .into_iter()
            .map(|(container, _)| container)
            .collect()
    })
}
