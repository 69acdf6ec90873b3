//! Filesystem rule loader with hot-reload via `notify` watcher.
//!
//! One rule per YAML file (`<id>.yml`). Loaded rules are validated and
//! upserted into a shared [`RuleStore`](crate::store::RuleStore); the watcher
//! keeps that store in sync with the directory while the host runs.

mod core;
mod error;
mod watcher;


pub use self::core::RuleLoader;
pub use self::error::{LoadResult, LoadStatus};
pub use crate::error::{Result, RuleError};
