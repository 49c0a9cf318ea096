use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// Delays `callback(value)` until `schedule` has not been called for `delay`.
///
/// Each `schedule` cancels the previous pending fire before arming a new one.
/// A cancelled fire never reaches the callback.
pub struct Debouncer<T> {
    runtime: Handle,
    callback: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<CancellationToken>,
    disposed: bool,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(runtime: Handle, callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            runtime,
            callback: Arc::new(callback),
            pending: None,
            disposed: false,
        }
    }

    pub fn schedule(&mut self, value: T, delay: Duration) {
        self.cancel();
        if self.disposed {
            return;
        }

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let callback = Arc::clone(&self.callback);
        self.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => callback(value),
            }
        });
        self.pending = Some(token);
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    /// Cancels any pending fire and ignores every later `schedule`.
    pub fn dispose(&mut self) {
        self.cancel();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}
