//! Partial-resolution proxy
//!
//! Wraps an object whose properties are only partly known. Properties
//! present at construction are read synchronously from the live object;
//! every other property is a [`Deferred`] that settles once the single
//! background resolution has merged the complete object in.
//!
//! # Examples
//!
//! ```rust,no_run
//! use partial_proxy::{PartialProxy, Property};
//! use std::collections::HashMap;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let partial = HashMap::from([("a", 1)]);
//!     let proxy = PartialProxy::new(partial, || async {
//!         Ok::<_, std::io::Error>(HashMap::from([("a", 2), ("b", 3)]))
//!     })?;
//!
//!     assert!(matches!(proxy.get("a"), Property::Ready(Some(1))));
//!     assert_eq!(proxy.value("b").await?, Some(3));
//!     assert!(matches!(proxy.get("a"), Property::Ready(Some(2))));
//!     Ok(())
//! }
//! ```

pub mod bag;
pub mod builder;
pub mod error;
pub mod json;

pub use bag::{JsonObject, PropertyBag};
pub use builder::ProxyBuilder;
pub use error::{PartialError, PartialResult, SharedError};

use crate::runtime::{AsyncTask, SharedTask};
use futures::FutureExt;
use futures::future::{self, Either};
use log::{debug, warn};
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::task::{Context, Poll, ready};
use tokio::sync::oneshot::error::RecvError;

/// Outcome of the one resolution, observable by any number of waiters.
type Resolution = SharedTask<PartialResult<()>>;

/// Future returned by [`PartialProxy::value`] and [`Property::resolve`].
///
/// Settles at once for known keys; otherwise waits like a [`Deferred`].
pub type PropertyFuture<B> =
    Either<future::Ready<PartialResult<Option<<B as PropertyBag>::Value>>>, Deferred<B>>;

/// A partially known object with a pending background resolution.
///
/// Cloning is cheap (Arc clone) and shares the same live object and
/// resolution; it never re-runs the resolver.
pub struct PartialProxy<B: PropertyBag> {
    live: Arc<RwLock<B>>,
    known: Arc<HashSet<B::Key>>,
    resolution: Resolution,
    label: Arc<str>,
}

impl<B: PropertyBag> PartialProxy<B> {
    /// Create a new proxy builder around a partial object
    #[must_use]
    pub fn builder(partial: B) -> ProxyBuilder<B> {
        ProxyBuilder::new(partial)
    }

    /// Convenience: wrap `partial` and start `resolver` on the current runtime.
    ///
    /// The resolver is invoked once, right here. Fails with
    /// [`PartialError::NoRuntime`] outside a tokio runtime.
    pub fn new<F, Fut, E>(partial: B, resolver: F) -> PartialResult<Self>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<B, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::builder(partial).spawn(resolver)
    }

    /// Membership set that decides known versus deferred reads.
    ///
    /// Must be taken before the resolution task is spawned.
    pub(crate) fn capture_known(partial: &B) -> HashSet<B::Key> {
        partial.keys().cloned().collect()
    }

    pub(crate) fn assemble(
        label: Arc<str>,
        live: Arc<RwLock<B>>,
        known: HashSet<B::Key>,
        task: AsyncTask<PartialResult<()>>,
    ) -> Self {
        debug!(
            "resolving `{label}` in the background ({} properties known)",
            known.len()
        );
        Self {
            live,
            known: Arc::new(known),
            resolution: task.shared(),
            label,
        }
    }

    /// Read a property.
    ///
    /// Keys present at construction are returned immediately from the live
    /// object; any other key yields a [`Deferred`] value.
    pub fn get(&self, key: impl Into<B::Key>) -> Property<B> {
        let key = key.into();
        if self.known.contains(&key) {
            return Property::Ready(read_live(&self.live).property(&key).cloned());
        }
        Property::Deferred(Deferred {
            resolution: self.resolution.clone(),
            pending: None,
            live: Arc::clone(&self.live),
            key,
            label: Arc::clone(&self.label),
        })
    }

    /// Read a property, waiting only if it was unknown at construction.
    ///
    /// The returned future does not borrow the proxy.
    pub fn value(&self, key: impl Into<B::Key>) -> PropertyFuture<B> {
        self.get(key).resolve()
    }

    /// Whether `key` was present at construction.
    #[must_use]
    pub fn is_known(&self, key: &B::Key) -> bool {
        self.known.contains(key)
    }

    /// Keys present at construction.
    pub fn known_keys(&self) -> impl Iterator<Item = &B::Key> + '_ {
        self.known.iter()
    }

    /// Clone of the live object as it is right now.
    #[must_use]
    pub fn snapshot(&self) -> B
    where
        B: Clone,
    {
        read_live(&self.live).clone()
    }

    /// Wait for the merge and return the complete object.
    pub async fn complete(&self) -> PartialResult<B>
    where
        B: Clone,
    {
        settle(&self.label, self.resolution.clone().await)?;
        Ok(self.snapshot())
    }

    /// Name used for this proxy in log output
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<B: PropertyBag> Clone for PartialProxy<B> {
    fn clone(&self) -> Self {
        Self {
            live: Arc::clone(&self.live),
            known: Arc::clone(&self.known),
            resolution: self.resolution.clone(),
            label: Arc::clone(&self.label),
        }
    }
}

impl<B: PropertyBag> fmt::Debug for PartialProxy<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialProxy")
            .field("label", &self.label)
            .field("known", &self.known.len())
            .finish_non_exhaustive()
    }
}

/// Result of reading a property through a [`PartialProxy`].
pub enum Property<B: PropertyBag> {
    /// Known at construction; the current live value.
    Ready(Option<B::Value>),
    /// Unknown at construction; settles after the merge.
    Deferred(Deferred<B>),
}

impl<B: PropertyBag> Property<B> {
    /// Whether the value was available without waiting.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Property::Ready(_))
    }

    /// A future for the value whichever branch this is.
    pub fn resolve(self) -> PropertyFuture<B> {
        match self {
            Property::Ready(value) => Either::Left(future::ready(Ok(value))),
            Property::Deferred(deferred) => Either::Right(deferred),
        }
    }
}

/// A property value that becomes available once the resolution merges.
///
/// Resolves to `None` when the complete object does not define the key.
/// After a resolver failure every `Deferred` fails with the same error.
///
/// To await one inside a task passed to `tokio::spawn`, use owned keys
/// such as `String`; borrowed `&'static str` keys fail the spawn's `Send`
/// check.
pub struct Deferred<B: PropertyBag> {
    /// Never polled; clones start from it.
    resolution: Resolution,
    /// This instance's waiter, taken from `resolution` on first poll.
    pending: Option<Resolution>,
    live: Arc<RwLock<B>>,
    key: B::Key,
    label: Arc<str>,
}

impl<B: PropertyBag> Deferred<B> {
    /// Key this value is waiting on
    pub fn key(&self) -> &B::Key {
        &self.key
    }
}

impl<B: PropertyBag> Clone for Deferred<B> {
    fn clone(&self) -> Self {
        Self {
            resolution: self.resolution.clone(),
            pending: None,
            live: Arc::clone(&self.live),
            key: self.key.clone(),
            label: Arc::clone(&self.label),
        }
    }
}

// The key is never pinned structurally.
impl<B: PropertyBag> Unpin for Deferred<B> {}

impl<B: PropertyBag> Future for Deferred<B> {
    type Output = PartialResult<Option<B::Value>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let Deferred {
            resolution,
            pending,
            ..
        } = &mut *this;
        let waiter = pending.get_or_insert_with(|| resolution.clone());
        let outcome = ready!(waiter.poll_unpin(cx));
        this.pending = None;
        settle(&this.label, outcome)?;
        Poll::Ready(Ok(read_live(&this.live).property(&this.key).cloned()))
    }
}

/// Flatten a shared resolution outcome.
fn settle(label: &str, outcome: Result<PartialResult<()>, RecvError>) -> PartialResult<()> {
    outcome.map_err(|err| {
        warn!("resolution task for `{label}` ended without reporting");
        PartialError::from(err)
    })?
}

/// Merge a resolver outcome into the live object; failures leave it untouched.
pub(crate) fn merge_outcome<B: PropertyBag>(
    label: &str,
    live: &RwLock<B>,
    outcome: PartialResult<B>,
) -> PartialResult<()> {
    match outcome {
        Ok(complete) => {
            write_live(live).merge(complete);
            debug!("merged resolved properties into `{label}`");
            Ok(())
        }
        Err(err) => {
            warn!("resolver for `{label}` failed: {err}");
            Err(err)
        }
    }
}

fn read_live<B>(live: &RwLock<B>) -> RwLockReadGuard<'_, B> {
    live.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_live<B>(live: &RwLock<B>) -> RwLockWriteGuard<'_, B> {
    live.write().unwrap_or_else(PoisonError::into_inner)
}
