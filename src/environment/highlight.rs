use crate::dispose::{DisposeHandle, Disposer};
use crate::host::Decorations;
use anyhow::Result;
use log::debug;
use std::cell::Cell;
use std::rc::Rc;

/// Highlight on the line a pending motion would land on.
///
/// At most one highlight is alive at a time. Each one is a child of the
/// session disposer, so whatever is showing when the session ends goes away
/// with it.
pub struct DestinationHighlight<D: Decorations + ?Sized> {
    decorations: Rc<D>,
    disposer: Disposer,
    current: Cell<Option<DisposeHandle>>,
}

impl<D> DestinationHighlight<D>
where
    D: Decorations + ?Sized + 'static,
{
    pub fn new(decorations: Rc<D>, disposer: Disposer) -> Self {
        Self {
            decorations,
            disposer,
            current: Cell::new(None),
        }
    }

    /// Replaces the current highlight with one on `line`.
    pub fn show(&self, line: usize) -> Result<()> {
        self.clear();

        let id = self.decorations.highlight_line(line)?;
        debug!("Highlighting destination line {line}");

        let decorations = Rc::clone(&self.decorations);
        let handle = self
            .disposer
            .add_fn("destination highlight", move || decorations.remove_highlight(id));
        self.current.set(handle);
        Ok(())
    }

    pub fn clear(&self) {
        if let Some(handle) = self.current.take() {
            self.disposer.release(handle);
        }
    }

    pub fn is_showing(&self) -> bool {
        self.current.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispose::Disposable;
    use crate::testing::FakeHost;

    #[test]
    fn test_show_replaces_previous_highlight() {
        let host = Rc::new(FakeHost::new());
        let disposer = Disposer::root("test");
        let highlight = DestinationHighlight::new(host.clone(), disposer.clone());

        highlight.show(3).unwrap();
        highlight.show(7).unwrap();
        assert_eq!(host.highlighted_lines(), vec![7]);
        assert_eq!(disposer.len(), 1);

        disposer.dispose();
        assert!(host.highlighted_lines().is_empty());
        assert_eq!(
            host.events(),
            vec!["highlight 3", "unhighlight 3", "highlight 7", "unhighlight 7"]
        );
    }

    #[test]
    fn test_clear_removes_highlight() {
        let host = Rc::new(FakeHost::new());
        let disposer = Disposer::root("test");
        let highlight = DestinationHighlight::new(host.clone(), disposer.clone());

        highlight.show(2).unwrap();
        assert!(highlight.is_showing());
        highlight.clear();
        assert!(!highlight.is_showing());
        assert!(host.highlighted_lines().is_empty());
        assert!(disposer.is_empty());
    }

    #[test]
    fn test_show_after_dispose_leaves_nothing_behind() {
        let host = Rc::new(FakeHost::new());
        let disposer = Disposer::root("test");
        let highlight = DestinationHighlight::new(host.clone(), disposer.clone());
        disposer.dispose();

        highlight.show(4).unwrap();
        assert!(!highlight.is_showing());
        assert!(host.highlighted_lines().is_empty());
    }
}
