//! Builder for configuring and starting a [`PartialProxy`].

use super::error::{PartialError, PartialResult};
use super::{PartialProxy, PropertyBag, merge_outcome};
use crate::runtime::AsyncTask;
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, RwLock};
use tokio::runtime::Handle;

const DEFAULT_LABEL: &str = "partial";

/// Builder for creating a `PartialProxy` with a label and runtime
pub struct ProxyBuilder<B: PropertyBag> {
    partial: B,
    label: String,
    runtime: Option<Handle>,
}

impl<B: PropertyBag> ProxyBuilder<B> {
    /// Create a new builder around the known part of the object
    #[must_use]
    pub fn new(partial: B) -> Self {
        Self {
            partial,
            label: DEFAULT_LABEL.to_string(),
            runtime: None,
        }
    }

    /// Set the name used for this proxy in log output
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Run the resolution on this runtime instead of the current one
    #[must_use]
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Invoke `resolver` now and merge its result in the background.
    pub fn spawn<F, Fut, E>(self, resolver: F) -> PartialResult<PartialProxy<B>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<B, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.spawn_with(move || {
            let pending = resolver();
            async move { pending.await.map_err(PartialError::resolver) }
        })
    }

    /// Run a synchronous `resolver` on the blocking pool and merge its result.
    pub fn spawn_blocking<F, E>(self, resolver: F) -> PartialResult<PartialProxy<B>>
    where
        F: FnOnce() -> Result<B, E> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let handle = self.handle()?;
        let (label, live, known) = self.into_parts();

        let task = {
            let label = Arc::clone(&label);
            let live = Arc::clone(&live);
            AsyncTask::spawn_on(&handle, move || {
                merge_outcome(&label, &live, resolver().map_err(PartialError::resolver))
            })
        };
        Ok(PartialProxy::assemble(label, live, known, task))
    }

    /// Shared path for resolvers already mapped onto `PartialError`.
    pub(crate) fn spawn_with<F, Fut>(self, resolver: F) -> PartialResult<PartialProxy<B>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = PartialResult<B>> + Send + 'static,
    {
        let handle = self.handle()?;
        let (label, live, known) = self.into_parts();
        let pending = resolver();

        let task = {
            let label = Arc::clone(&label);
            let live = Arc::clone(&live);
            AsyncTask::spawn_async_on(&handle, async move {
                let outcome = pending.await;
                merge_outcome(&label, &live, outcome)
            })
        };
        Ok(PartialProxy::assemble(label, live, known, task))
    }

    fn handle(&self) -> PartialResult<Handle> {
        match &self.runtime {
            Some(handle) => Ok(handle.clone()),
            None => Handle::try_current().map_err(|_| PartialError::NoRuntime),
        }
    }

    fn into_parts(self) -> (Arc<str>, Arc<RwLock<B>>, HashSet<B::Key>) {
        let known = PartialProxy::capture_known(&self.partial);
        (
            Arc::from(self.label),
            Arc::new(RwLock::new(self.partial)),
            known,
        )
    }
}
