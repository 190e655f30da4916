//! Error types for stimulus generation.
//!
//! Every variant is fatal for the seed being generated: callers may retry
//! with another seed or relaxed parameters, but nothing partial is kept.

use std::path::PathBuf;

use crate::types::{Condition, Task};
use crate::validation::ValidationReport;

/// Main generation error type.
#[derive(Debug, thiserror::Error)]
pub enum StimError {
    /// Parameters the task or code formats cannot express
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Not enough unused codes left in a pool
    #[error("code pool exhausted while {context}: needed {needed}, found {found}")]
    PoolExhausted {
        context: String,
        needed: usize,
        found: usize,
    },

    /// A decoy could not be placed without changing the designed condition
    #[error(
        "no decoy for {condition} trial on task {task} (slot {slot}) after {attempts} attempts"
    )]
    DecoyPlacementExhausted {
        condition: Condition,
        task: Task,
        slot: usize,
        attempts: usize,
    },

    /// Seeded manual set does not realize the condition it was built for
    #[error("manual set for task {task} classifies as {actual}, expected {expected}")]
    DesignMismatch {
        task: Task,
        expected: Condition,
        actual: Condition,
    },

    /// A design failed to realize every availability × overlap cell once
    #[error(
        "design coverage broken: missing [{}], repeated [{}]",
        fmt_conditions(.missing),
        fmt_conditions(.repeated)
    )]
    IncompleteCoverage {
        missing: Vec<Condition>,
        repeated: Vec<Condition>,
    },

    /// Shape grids that cannot be overlaid
    #[error("composition conflict: {0}")]
    CompositionConflict(String),

    /// Shape atlas does not hold the requested part
    #[error("shape atlas has no {side} part {part}")]
    UnknownPart { part: usize, side: &'static str },

    /// Generated mapping broke one or more invariants
    #[error("task code mapping failed validation:\n{0}")]
    ValidationFailure(ValidationReport),

    /// Filesystem failure reading an atlas or writing an artifact
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

fn fmt_conditions(conditions: &[Condition]) -> String {
    conditions
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, StimError>;
