//! JSON objects as partial objects, with serde decoding on read.

use super::PartialProxy;
use super::bag::JsonObject;
use super::builder::ProxyBuilder;
use super::error::{PartialError, PartialResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

impl PartialProxy<JsonObject> {
    /// Wrap a JSON object and resolve the rest from `resolver`.
    ///
    /// Both `partial` and the resolved value must be JSON objects.
    pub fn from_json<F, Fut, E>(partial: Value, resolver: F) -> PartialResult<Self>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::builder(into_object(partial)?).spawn_json(resolver)
    }

    /// Read `key` and decode it, waiting only if it was unknown at construction.
    pub async fn value_as<T: DeserializeOwned>(&self, key: &str) -> PartialResult<Option<T>> {
        match self.value(key).await? {
            Some(value) => decode(key, value).map(Some),
            None => Ok(None),
        }
    }

    /// Wait for the merge and decode the complete object.
    pub async fn complete_as<T: DeserializeOwned>(&self) -> PartialResult<T> {
        let complete = self.complete().await?;
        serde_json::from_value(Value::Object(complete))
            .map_err(|e| PartialError::DecodeObject(Arc::new(e)))
    }
}

impl ProxyBuilder<JsonObject> {
    /// Like [`ProxyBuilder::spawn`] for resolvers producing a `serde_json::Value`.
    ///
    /// A non-object result fails the resolution with
    /// [`PartialError::InvalidInput`].
    pub fn spawn_json<F, Fut, E>(self, resolver: F) -> PartialResult<PartialProxy<JsonObject>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.spawn_with(move || {
            let pending = resolver();
            async move { into_object(pending.await.map_err(PartialError::resolver)?) }
        })
    }
}

/// Unwrap a JSON object, rejecting every other kind of value.
pub fn into_object(value: Value) -> PartialResult<JsonObject> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(PartialError::InvalidInput(format!(
            "expected a JSON object, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> PartialResult<T> {
    serde_json::from_value(value).map_err(|e| PartialError::Decode {
        key: key.to_string(),
        source: Arc::new(e),
    })
}
