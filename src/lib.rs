//! `partial_proxy` - partially resolved objects
//!
//! Wrap an object whose properties are only partly known together with an
//! async function producing the complete object. Known properties are read
//! synchronously; the rest are deferred values that settle once the single
//! background resolution has merged the complete object in.

// Module declarations
pub mod proxy;
pub mod runtime;

// Re-export runtime types
pub use runtime::{AsyncTask, SharedTask};

// Re-export proxy types
pub use proxy::{
    Deferred, JsonObject, PartialProxy, Property, PropertyBag, PropertyFuture, ProxyBuilder,
    json::into_object,
};

// Re-export error types
pub use proxy::{PartialError, PartialResult, SharedError};
