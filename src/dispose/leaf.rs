use crate::dispose::Disposable;
use log::warn;
use std::borrow::Cow;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

type Release = Box<dyn FnOnce() -> anyhow::Result<()>>;

/// A one-shot release step.
///
/// The closure runs at most once. Errors and panics coming out of it are
/// logged and swallowed so that siblings still get released.
pub struct Leaf {
    label: Cow<'static, str>,
    release: RefCell<Option<Release>>,
}

impl Leaf {
    pub fn new(
        label: impl Into<Cow<'static, str>>,
        release: impl FnOnce() -> anyhow::Result<()> + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            release: RefCell::new(Some(Box::new(release))),
        }
    }

    /// Release step that cannot fail.
    pub fn from_fn(label: impl Into<Cow<'static, str>>, release: impl FnOnce() + 'static) -> Self {
        Self::new(label, move || {
            release();
            Ok(())
        })
    }

    /// Wraps any other disposable so it can live in a tree.
    pub fn wrap(label: impl Into<Cow<'static, str>>, inner: impl Disposable + 'static) -> Self {
        Self::from_fn(label, move || inner.dispose())
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Disposable for Leaf {
    fn dispose(&self) {
        // take before calling so a re-entrant dispose finds nothing to run
        let Some(release) = self.release.borrow_mut().take() else {
            return;
        };

        match panic::catch_unwind(AssertUnwindSafe(release)) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to release {}: {e:#}", self.label),
            Err(_) => warn!("Release of {} panicked", self.label),
        }
    }

    fn is_disposed(&self) -> bool {
        self.release.borrow().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_leaf_runs_once() {
        let count = Rc::new(Cell::new(0));
        let leaf = Leaf::from_fn("counter", {
            let count = count.clone();
            move || count.set(count.get() + 1)
        });

        assert!(!leaf.is_disposed());
        leaf.dispose();
        leaf.dispose();
        assert!(leaf.is_disposed());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_leaf_swallows_errors_and_panics() {
        let failing = Leaf::new("failing", || Err(anyhow!("boom")));
        failing.dispose();
        assert!(failing.is_disposed());

        let panicking = Leaf::from_fn("panicking", || panic!("boom"));
        panicking.dispose();
        assert!(panicking.is_disposed());
    }
}
