//! One-shot background task for resolver work.
//!
//! Channel-based: the spawned job reports through a oneshot, and the
//! receiving half can be shared between any number of waiters.

use futures::FutureExt;
use futures::future::Shared;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

/// A handle to an asynchronous task that produces a single result.
///
/// The task is spawned eagerly; dropping the handle does not stop it.
pub struct AsyncTask<T> {
    rx: oneshot::Receiver<T>,
}

/// A cloneable view of an [`AsyncTask`] result.
pub type SharedTask<T> = Shared<AsyncTask<T>>;

impl<T> AsyncTask<T>
where
    T: Send + 'static,
{
    /// Create from oneshot receiver (for advanced use).
    #[inline]
    #[must_use]
    pub fn new(rx: oneshot::Receiver<T>) -> Self {
        Self { rx }
    }

    /// Run a blocking closure on the runtime's blocking pool.
    #[inline]
    pub fn spawn_on<F>(handle: &Handle, f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        handle.spawn_blocking(move || {
            let _ = tx.send(f());
        });
        Self::new(rx)
    }

    /// Spawn an async operation on the given runtime.
    #[inline]
    pub fn spawn_async_on<F>(handle: &Handle, future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        handle.spawn(async move {
            let _ = tx.send(future.await);
        });
        Self::new(rx)
    }

    /// Convert into a future that many waiters can clone and await.
    ///
    /// The job still runs exactly once.
    #[must_use]
    pub fn shared(self) -> SharedTask<T>
    where
        T: Clone,
    {
        FutureExt::shared(self)
    }
}

impl<T> Future for AsyncTask<T> {
    type Output = Result<T, oneshot::error::RecvError>;

    #[inline]
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx)
    }
}
