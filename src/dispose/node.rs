use crate::dispose::{Disposable, Leaf, Resource};
use crate::host::Lifecycle;
use log::{debug, trace};
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

/// Opaque key for a child registered into a [`Disposer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisposeHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Active,
    Disposing,
    Disposed,
}

struct Parent {
    node: Weak<RefCell<Node>>,
    handle: DisposeHandle,
}

struct Node {
    label: Cow<'static, str>,
    state: State,
    next_id: u64,
    children: VecDeque<(DisposeHandle, Resource)>,
    parent: Option<Parent>,
}

/// A node in the cleanup tree.
///
/// Cloning gives another handle to the same node. No borrow of the node is
/// held while a child is being released, so children may add to, release from
/// or dispose the node they live in.
#[derive(Clone)]
pub struct Disposer {
    inner: Rc<RefCell<Node>>,
}

impl Disposer {
    /// A node with no parent.
    pub fn root(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Node {
                label: label.into(),
                state: State::Active,
                next_id: 0,
                children: VecDeque::new(),
                parent: None,
            })),
        }
    }

    /// A root that is also torn down with the host.
    ///
    /// The node is registered into the lifecycle's subscriptions and leaves
    /// that list again once it is disposed on its own.
    pub fn attached<L>(lifecycle: &L, label: impl Into<Cow<'static, str>>) -> Self
    where
        L: Lifecycle + ?Sized,
    {
        lifecycle.subscriptions().child(label)
    }

    /// A nested node registered under `self`.
    ///
    /// If `self` is already disposed the child comes back disposed.
    pub fn child(&self, label: impl Into<Cow<'static, str>>) -> Disposer {
        let child = Disposer::root(label);
        if let Some(handle) = self.add(child.clone()) {
            child.inner.borrow_mut().parent = Some(Parent {
                node: Rc::downgrade(&self.inner),
                handle,
            });
        }
        child
    }

    pub fn label(&self) -> String {
        self.inner.borrow().label.to_string()
    }

    /// Registers a child.
    ///
    /// On a disposed node the resource is released before this returns and no
    /// handle is given out. While the node is mid-disposal the child joins the
    /// running pass.
    pub fn add(&self, resource: impl Into<Resource>) -> Option<DisposeHandle> {
        let resource = resource.into();
        {
            let mut node = self.inner.borrow_mut();
            if node.state != State::Disposed {
                let handle = DisposeHandle(node.next_id);
                node.next_id += 1;
                trace!("{}: registered {}", node.label, resource.label());
                node.children.push_back((handle, resource));
                return Some(handle);
            }
        }

        debug!(
            "{} is already disposed, releasing {} immediately",
            self.label(),
            resource.label()
        );
        resource.dispose();
        None
    }

    /// Shorthand for registering a [`Leaf`].
    pub fn add_fn(
        &self,
        label: impl Into<Cow<'static, str>>,
        release: impl FnOnce() -> anyhow::Result<()> + 'static,
    ) -> Option<DisposeHandle> {
        self.add(Leaf::new(label, release))
    }

    /// Releases a single child early. Returns false when the handle is not
    /// (or no longer) registered here.
    pub fn release(&self, handle: DisposeHandle) -> bool {
        match self.take(handle) {
            Some(resource) => {
                resource.dispose();
                true
            }
            None => false,
        }
    }

    /// Removes a child without releasing it.
    fn take(&self, handle: DisposeHandle) -> Option<Resource> {
        let mut node = self.inner.borrow_mut();
        let index = node.children.iter().position(|(h, _)| *h == handle)?;
        node.children.remove(index).map(|(_, resource)| resource)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ptr_eq(&self, other: &Disposer) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Disposable for Disposer {
    fn dispose(&self) {
        {
            let mut node = self.inner.borrow_mut();
            if node.state != State::Active {
                return;
            }
            node.state = State::Disposing;
            debug!("Disposing {} ({} children)", node.label, node.children.len());
        }

        loop {
            let next = self.inner.borrow_mut().children.pop_front();
            let Some((_, resource)) = next else {
                break;
            };
            resource.dispose();
        }

        let parent = {
            let mut node = self.inner.borrow_mut();
            node.state = State::Disposed;
            node.parent.take()
        };

        // a parent that is mid-pass has already popped us, so this is a no-op there
        if let Some(parent) = parent {
            if let Some(node) = parent.node.upgrade() {
                let detached = Disposer { inner: node }.take(parent.handle);
                drop(detached);
            }
        }
    }

    fn is_disposed(&self) -> bool {
        self.inner.borrow().state == State::Disposed
    }
}

impl std::fmt::Debug for Disposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.inner.borrow();
        f.debug_struct("Disposer")
            .field("label", &node.label)
            .field("state", &node.state)
            .field("children", &node.children.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::{Cell, RefCell};

    type Log = Rc<RefCell<Vec<String>>>;

    fn record(log: &Log, name: &'static str) -> Leaf {
        let log = log.clone();
        Leaf::from_fn(name, move || log.borrow_mut().push(name.to_string()))
    }

    #[test]
    fn test_dispose_in_insertion_order() {
        let log = Log::default();
        let root = Disposer::root("root");
        root.add(record(&log, "a"));
        root.add(record(&log, "b"));
        root.add(record(&log, "c"));

        root.dispose();
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert!(root.is_disposed());
        assert!(root.is_empty());
    }

    #[test]
    fn test_dispose_twice_releases_once() {
        let count = Rc::new(Cell::new(0));
        let root = Disposer::root("root");
        root.add(Leaf::from_fn("counter", {
            let count = count.clone();
            move || count.set(count.get() + 1)
        }));

        root.dispose();
        root.dispose();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_add_after_dispose_releases_immediately() {
        let log = Log::default();
        let root = Disposer::root("root");
        root.dispose();

        let handle = root.add(record(&log, "late"));
        assert!(handle.is_none());
        assert_eq!(*log.borrow(), vec!["late"]);

        root.dispose();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_nested_children_released_before_later_siblings() {
        let log = Log::default();
        let root = Disposer::root("root");
        root.add(record(&log, "a"));
        let child = root.child("child");
        child.add(record(&log, "child.a"));
        child.add(record(&log, "child.b"));
        root.add(record(&log, "b"));

        root.dispose();
        assert_eq!(*log.borrow(), vec!["a", "child.a", "child.b", "b"]);
        assert!(child.is_disposed());
    }

    #[test]
    fn test_child_disposed_alone_detaches_from_parent() {
        let log = Log::default();
        let root = Disposer::root("root");
        let child = root.child("child");
        child.add(record(&log, "inner"));
        assert_eq!(root.len(), 1);

        child.dispose();
        assert_eq!(root.len(), 0);
        assert!(!root.is_disposed());

        root.dispose();
        assert_eq!(*log.borrow(), vec!["inner"]);
    }

    #[test]
    fn test_child_of_disposed_parent_is_disposed() {
        let root = Disposer::root("root");
        root.dispose();
        let child = root.child("child");
        assert!(child.is_disposed());
    }

    #[test]
    fn test_add_during_dispose_joins_the_pass() {
        let log = Log::default();
        let root = Disposer::root("root");
        root.add(Leaf::from_fn("spawner", {
            let root = root.clone();
            let log = log.clone();
            move || {
                log.borrow_mut().push("spawner".to_string());
                let late = log.clone();
                let handle = root.add(Leaf::from_fn("late", move || {
                    late.borrow_mut().push("late".to_string())
                }));
                assert!(handle.is_some());
            }
        }));
        root.add(record(&log, "b"));

        root.dispose();
        assert_eq!(*log.borrow(), vec!["spawner", "b", "late"]);

        root.dispose();
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_reentrant_dispose_is_ignored() {
        let count = Rc::new(Cell::new(0));
        let root = Disposer::root("root");
        root.add(Leaf::from_fn("reentrant", {
            let root = root.clone();
            move || root.dispose()
        }));
        root.add(Leaf::from_fn("counter", {
            let count = count.clone();
            move || count.set(count.get() + 1)
        }));

        root.dispose();
        assert_eq!(count.get(), 1);
        assert!(root.is_disposed());
    }

    #[test]
    fn test_failing_child_does_not_block_siblings() {
        let log = Log::default();
        let root = Disposer::root("root");
        root.add(record(&log, "a"));
        root.add_fn("failing", || Err(anyhow!("cannot restore")));
        root.add(Leaf::from_fn("panicking", || panic!("cannot restore")));
        root.add(record(&log, "b"));

        root.dispose();
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_release_single_child() {
        let log = Log::default();
        let root = Disposer::root("root");
        let first = root.add(record(&log, "a")).unwrap();
        root.add(record(&log, "b"));

        assert!(root.release(first));
        assert!(!root.release(first));
        assert_eq!(*log.borrow(), vec!["a"]);

        root.dispose();
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_wrapped_disposable() {
        let log = Log::default();
        let inner = Disposer::root("inner");
        inner.add(record(&log, "x"));

        let root = Disposer::root("root");
        root.add(Leaf::wrap("inner", inner.clone()));
        root.dispose();

        assert!(inner.is_disposed());
        assert_eq!(*log.borrow(), vec!["x"]);
    }
}
