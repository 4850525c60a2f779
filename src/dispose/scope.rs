use crate::dispose::{Disposable, Disposer};
use std::future::Future;

/// Disposes the wrapped node when dropped.
///
/// Dropping happens on normal return, on early return through `?`, while
/// unwinding from a panic and when the owning future is dropped mid-await.
#[must_use = "the disposer is released as soon as the guard is dropped"]
pub struct DisposeGuard(Disposer);

impl DisposeGuard {
    pub fn new(disposer: Disposer) -> Self {
        Self(disposer)
    }

    pub fn disposer(&self) -> &Disposer {
        &self.0
    }
}

impl Drop for DisposeGuard {
    fn drop(&mut self) {
        self.0.dispose();
    }
}

/// Runs `body` with `disposer` and disposes it however `body` ends.
///
/// The disposal finishes before the result (or the panic) reaches the caller.
pub async fn with_existing_disposer<T, F, Fut>(disposer: &Disposer, body: F) -> T
where
    F: FnOnce(Disposer) -> Fut,
    Fut: Future<Output = T>,
{
    let guard = DisposeGuard::new(disposer.clone());
    let result = body(disposer.clone()).await;
    drop(guard);
    result
}
