//! Unstructured sampling: a random manual and random trials, with no design
//! coverage. Used for short practice sections.

use rand::seq::index;
use rand::{Rng, RngCore};

use crate::constants::*;
use crate::error::{Result, StimError};
use crate::types::{Kind, ManualEntry, Task};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomSampler {
    pub n_manual: usize,
    pub n_trials: usize,
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self {
            n_manual: RANDOM_N_MANUAL,
            n_trials: RANDOM_N_TRIALS,
        }
    }
}

/// Trials and one manual shared by all of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomSection {
    pub trials: Vec<Task>,
    pub manual: Vec<ManualEntry>,
}

impl RandomSampler {
    pub fn new(n_manual: usize, n_trials: usize) -> Self {
        Self { n_manual, n_trials }
    }

    /// `n_manual` distinct tasks, each revealed as compositional or bespoke
    /// by a fair coin; `n_trials` tasks drawn with replacement.
    pub fn sample(&self, n_part: usize, rng: &mut dyn RngCore) -> Result<RandomSection> {
        let tasks = Task::all(n_part);
        if self.n_manual > tasks.len() {
            return Err(StimError::InvalidParameters(format!(
                "cannot reveal {} distinct tasks out of {}",
                self.n_manual,
                tasks.len()
            )));
        }
        if tasks.is_empty() && self.n_trials > 0 {
            return Err(StimError::InvalidParameters(
                "random section needs at least one part".to_string(),
            ));
        }

        let manual = index::sample(rng, tasks.len(), self.n_manual)
            .into_iter()
            .map(|i| {
                let kind = if rng.random_bool(0.5) {
                    Kind::Compositional
                } else {
                    Kind::Bespoke
                };
                ManualEntry::new(tasks[i], kind)
            })
            .collect();

        let trials = (0..self.n_trials)
            .map(|_| tasks[rng.random_range(0..tasks.len())])
            .collect();

        Ok(RandomSection { trials, manual })
    }
}
