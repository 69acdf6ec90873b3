//! Alert rule engine for the digital-twin core.
//!
//! This crate provides:
//! - YAML-based `AlertRule` definitions with serde deserialization
//! - Validation with path-addressed errors and suggestions
//! - An insertion-ordered rule store with CRUD operations
//! - Filesystem loader with hot-reload via `notify` watcher
//! - The snapshot evaluator and level/edge trigger gating

pub mod error;
pub mod evaluator;
pub mod loader;
pub mod schema;
pub mod store;
pub mod trigger;
pub mod validation;

pub use error::{Result, RuleError};
pub use evaluator::{RuleEvaluator, TriggeredAlert};
pub use store::{RulePatch, RuleStore};
pub use trigger::{Transitions, TriggerGate, TriggerMode};
