//! Runtime module
//!
//! Provides the one-shot task primitive behind proxy resolution.

pub mod async_task;

// Re-export async task types
pub use async_task::{AsyncTask, SharedTask};
