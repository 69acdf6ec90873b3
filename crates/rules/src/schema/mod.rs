//! YAML DSL schema types with serde deserialization.
//!
//! A rule document looks like:
//!
//! ```yaml
//! apiVersion: v1
//! kind: AlertRule
//! metadata:
//!   id: pressure-out-of-range
//!   name: Pressure Out of Range
//! spec:
//!   sensor_type: pressure
//!   condition: out_of_range
//!   threshold: { min: 1000, max: 1050 }
//!   severity: warning
//! ```

mod condition;
mod metadata;
mod notifications;
mod rule;

pub use condition::*;
pub use metadata::*;
pub use notifications::*;
pub use rule::*;

#[cfg(test)]
mod tests;
