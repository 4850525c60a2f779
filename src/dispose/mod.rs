//! Hierarchical cleanup.
//!
//! Anything that changes the environment for the duration of a session is
//! registered into a [`Disposer`] as a [`Resource`]. Disposing a node releases
//! its children in insertion order, exactly once each, including children
//! added while the release pass is running.

mod leaf;
mod node;
mod scope;

pub use leaf::Leaf;
pub use node::{DisposeHandle, Disposer};
pub use scope::{DisposeGuard, with_existing_disposer};

/// A resource with an idempotent release.
///
/// `dispose` must never panic outward; the second and later calls do nothing.
pub trait Disposable {
    fn dispose(&self);
    fn is_disposed(&self) -> bool;
}

/// Something a [`Disposer`] can own: a single release step or a nested node.
pub enum Resource {
    Leaf(Leaf),
    Node(Disposer),
}

impl Resource {
    pub fn label(&self) -> String {
        match self {
            Resource::Leaf(leaf) => leaf.label().to_string(),
            Resource::Node(node) => node.label(),
        }
    }
}

impl Disposable for Resource {
    fn dispose(&self) {
        match self {
            Resource::Leaf(leaf) => leaf.dispose(),
            Resource::Node(node) => node.dispose(),
        }
    }

    fn is_disposed(&self) -> bool {
        match self {
            Resource::Leaf(leaf) => leaf.is_disposed(),
            Resource::Node(node) => node.is_disposed(),
        }
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Leaf(leaf) => f.debug_tuple("Leaf").field(&leaf.label()).finish(),
            Resource::Node(node) => f.debug_tuple("Node").field(&node.label()).finish(),
        }
    }
}

impl From<Leaf> for Resource {
    fn from(leaf: Leaf) -> Self {
        Resource::Leaf(leaf)
    }
}

impl From<Disposer> for Resource {
    fn from(node: Disposer) -> Self {
        Resource::Node(node)
    }
}
