//! Comparison operators, thresholds and the compiled check they produce.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison operator applied to one sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[serde(alias = "greaterThan")]
    GreaterThan,
    #[serde(alias = "lessThan")]
    LessThan,
    Equals,
    #[serde(alias = "outOfRange")]
    OutOfRange,
    #[serde(alias = "inRange")]
    InRange,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::GreaterThan,
        Condition::LessThan,
        Condition::Equals,
        Condition::OutOfRange,
        Condition::InRange,
    ];

    /// Range operators take a `{min, max}` threshold, the rest a scalar.
    pub fn is_range(&self) -> bool {
        matches!(self, Condition::OutOfRange | Condition::InRange)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::GreaterThan => "greater_than",
            Condition::LessThan => "less_than",
            Condition::Equals => "equals",
            Condition::OutOfRange => "out_of_range",
            Condition::InRange => "in_range",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "greater_than" | "greaterThan" => Ok(Condition::GreaterThan),
            "less_than" | "lessThan" => Ok(Condition::LessThan),
            "equals" => Ok(Condition::Equals),
            "out_of_range" | "outOfRange" => Ok(Condition::OutOfRange),
            "in_range" | "inRange" => Ok(Condition::InRange),
            other => Err(format!("unknown condition: '{}'", other)),
        }
    }
}

/// Threshold value: a bare number for scalar operators or a `{min, max}` map
/// for range operators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    Scalar(f64),
    Range { min: f64, max: f64 },
}

impl Threshold {
    pub fn range(min: f64, max: f64) -> Self {
        Threshold::Range { min, max }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, Threshold::Range { .. })
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            Threshold::Scalar(v) => v.is_finite(),
            Threshold::Range { min, max } => min.is_finite() && max.is_finite(),
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Scalar(v) => write!(f, "{}", v),
            Threshold::Range { min, max } => write!(f, "{}..{}", min, max),
        }
    }
}

/// Alert severity, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// A condition and threshold whose shapes are known to agree.
///
/// Built by [`Check::compile`]; once built, evaluation cannot hit a
/// shape mismatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Check {
    Above(f64),
    Below(f64),
    /// Exact equality unless a tolerance is given.
    Equals { target: f64, tolerance: Option<f64> },
    /// Strictly outside `[min, max]`; the bounds themselves do not trigger.
    OutsideRange { min: f64, max: f64 },
    /// Inside `[min, max]`, bounds included.
    WithinRange { min: f64, max: f64 },
}

impl Check {
    /// Pair an operator with a threshold, rejecting mismatched shapes and
    /// inverted ranges.
    pub fn compile(
        condition: Condition,
        threshold: Threshold,
        tolerance: Option<f64>,
    ) -> Result<Self, String> {
        match (condition, threshold) {
            (Condition::GreaterThan, Threshold::Scalar(t)) => Ok(Check::Above(t)),
            (Condition::LessThan, Threshold::Scalar(t)) => Ok(Check::Below(t)),
            (Condition::Equals, Threshold::Scalar(t)) => Ok(Check::Equals {
                target: t,
                tolerance,
            }),
            (Condition::OutOfRange, Threshold::Range { min, max })
            | (Condition::InRange, Threshold::Range { min, max })
                if min > max =>
            {
                Err(format!("range threshold has min {} > max {}", min, max))
            }
            (Condition::OutOfRange, Threshold::Range { min, max }) => {
                Ok(Check::OutsideRange { min, max })
            }
            (Condition::InRange, Threshold::Range { min, max }) => {
                Ok(Check::WithinRange { min, max })
            }
            (c, Threshold::Scalar(_)) => Err(format!(
                "condition '{}' requires a {{min, max}} threshold",
                c
            )),
            (c, Threshold::Range { .. }) => Err(format!(
                "condition '{}' requires a scalar threshold",
                c
            )),
        }
    }

    pub fn is_triggered(&self, value: f64) -> bool {
        match *self {
            Check::Above(t) => value > t,
            Check::Below(t) => value < t,
            Check::Equals {
                target,
                tolerance: None,
            } => value == target,
            Check::Equals {
                target,
                tolerance: Some(tol),
            } => (value - target).abs() <= tol,
            Check::OutsideRange { min, max } => value < min || value > max,
            Check::WithinRange { min, max } => value >= min && value <= max,
        }
    }
}
