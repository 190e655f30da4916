//! Trial assembly: choosing target tasks and manual sets that realize every
//! cell of the availability × overlap design.
//!
//! - [`search`]: incremental constrained search with bounded decoy retries
//! - [`matrix`]: closed-form construction over boolean availability matrices
//! - [`random`]: unstructured baseline sampler (no coverage guarantee)
//! - [`classify`]: the condition classifier both designed strategies check against
//!
//! The two designed strategies implement [`TrialAssembler`] and produce the
//! same [`Design`] shape, so callers pick one through [`AssemblyStrategy`].

pub mod classify;
pub mod matrix;
pub mod random;
pub mod search;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::Serialize;

use crate::error::{Result, StimError};
use crate::types::{Condition, ManualEntry, Task};

use self::matrix::MatrixAssembler;
use self::search::{SearchAssembler, SearchConfig};

/// One designed trial: the target task, the condition its manual realizes,
/// and the manual entries shown alongside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesignedTrial {
    pub task: Task,
    pub condition: Condition,
    pub manual: Vec<ManualEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Design {
    pub trials: Vec<DesignedTrial>,
}

impl Design {
    pub fn conditions(&self) -> Vec<Condition> {
        self.trials.iter().map(|t| t.condition).collect()
    }

    /// Every one of the eight conditions must appear exactly once.
    pub fn verify_coverage(&self) -> Result<()> {
        let mut counts: HashMap<Condition, usize> = HashMap::new();
        for t in &self.trials {
            *counts.entry(t.condition).or_default() += 1;
        }
        let missing: Vec<Condition> = Condition::all()
            .into_iter()
            .filter(|c| !counts.contains_key(c))
            .collect();
        let mut repeated: Vec<Condition> = counts
            .iter()
            .filter(|(_, n)| **n > 1)
            .map(|(&c, _)| c)
            .collect();
        repeated.sort();

        if missing.is_empty() && repeated.is_empty() {
            Ok(())
        } else {
            Err(StimError::IncompleteCoverage { missing, repeated })
        }
    }
}

/// A strategy that builds a [`Design`] for an `n_part × n_part` task grid.
pub trait TrialAssembler {
    fn name(&self) -> &'static str;

    fn assemble(&self, n_part: usize, rng: &mut dyn RngCore) -> Result<Design>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssemblyStrategy {
    #[default]
    Search,
    Matrix,
}

impl AssemblyStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssemblyStrategy::Search => "search",
            AssemblyStrategy::Matrix => "matrix",
        }
    }

    pub fn assembler(self, search: SearchConfig) -> Box<dyn TrialAssembler> {
        match self {
            AssemblyStrategy::Search => Box::new(SearchAssembler::new(search)),
            AssemblyStrategy::Matrix => Box::new(MatrixAssembler),
        }
    }
}

impl fmt::Display for AssemblyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssemblyStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "search" => Ok(AssemblyStrategy::Search),
            "matrix" => Ok(AssemblyStrategy::Matrix),
            other => Err(format!("unknown strategy {other:?} (expected search or matrix)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Availability, Overlap};

    fn trial(c: Condition) -> DesignedTrial {
        DesignedTrial {
            task: Task::new(0, 0),
            condition: c,
            manual: Vec::new(),
        }
    }

    #[test]
    fn full_design_passes_coverage() {
        let design = Design {
            trials: Condition::all().into_iter().map(trial).collect(),
        };
        assert!(design.verify_coverage().is_ok());
    }

    #[test]
    fn coverage_reports_missing_and_repeated() {
        let mut trials: Vec<_> = Condition::all().into_iter().map(trial).collect();
        let dup = Condition::new(Availability::Available, Overlap::Exact);
        trials[7] = trial(dup);
        let err = Design { trials }.verify_coverage().unwrap_err();
        match err {
            StimError::IncompleteCoverage { missing, repeated } => {
                assert_eq!(
                    missing,
                    vec![Condition::new(Availability::Unavailable, Overlap::None)]
                );
                assert_eq!(repeated, vec![dup]);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn strategy_parses() {
        assert_eq!("matrix".parse(), Ok(AssemblyStrategy::Matrix));
        assert!("grid".parse::<AssemblyStrategy>().is_err());
        assert_eq!(AssemblyStrategy::Search.assembler(SearchConfig::default()).name(), "search");
    }
}
