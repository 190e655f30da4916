//! Incremental constrained search for a covering design.
//!
//! For each of the eight conditions (in shuffled order):
//! 1. pick a random target task;
//! 2. seed the manual with exactly the entries that realize the condition;
//! 3. check the seeded manual with the classifier;
//! 4. add random `(task, kind)` decoys one at a time, rejecting any that would
//!    change the target's classification, with a bounded number of attempts
//!    per decoy slot;
//! 5. shuffle the manual.
//!
//! Each condition also gets its own decoy count from a shuffled schedule
//! (`min, min + step, …`), so manual length does not give the condition away.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::{debug, info};

use crate::assembly::classify::classify;
use crate::assembly::{Design, DesignedTrial, TrialAssembler};
use crate::constants::*;
use crate::error::{Result, StimError};
use crate::types::{Availability, Condition, Kind, ManualEntry, Overlap, Part, Task};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub decoy_min: usize,
    pub decoy_step: usize,
    pub max_attempts: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            decoy_min: DECOY_MIN,
            decoy_step: DECOY_STEP,
            max_attempts: DECOY_MAX_ATTEMPTS,
        }
    }
}

impl SearchConfig {
    /// One decoy count per condition, unshuffled.
    pub fn decoy_counts(&self) -> Vec<usize> {
        (0..CONDITION_COUNT)
            .map(|k| self.decoy_min + k * self.decoy_step)
            .collect()
    }
}

pub struct SearchAssembler {
    config: SearchConfig,
}

impl SearchAssembler {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Build the manual for one condition around a random target task.
    pub fn build_trial(
        &self,
        n_part: usize,
        condition: Condition,
        n_decoys: usize,
        rng: &mut dyn RngCore,
    ) -> Result<DesignedTrial> {
        check_parts(n_part)?;
        let target = Task::new(rng.random_range(0..n_part), rng.random_range(0..n_part));
        let mut manual = seed_manual(target, condition, n_part, rng);

        let seeded = classify(&manual, target);
        if seeded != condition {
            return Err(StimError::DesignMismatch {
                task: target,
                expected: condition,
                actual: seeded,
            });
        }

        let mut rejected = 0usize;
        for slot in 0..n_decoys {
            let mut placed = false;
            for _ in 0..self.config.max_attempts {
                let decoy = random_entry(n_part, rng);
                manual.push(decoy);
                if classify(&manual, target) == condition {
                    placed = true;
                    break;
                }
                manual.pop();
                rejected += 1;
            }
            if !placed {
                return Err(StimError::DecoyPlacementExhausted {
                    condition,
                    task: target,
                    slot,
                    attempts: self.config.max_attempts,
                });
            }
        }

        manual.shuffle(rng);
        debug!(
            %condition,
            task = %target,
            decoys = n_decoys,
            rejected,
            "trial assembled"
        );
        Ok(DesignedTrial {
            task: target,
            condition,
            manual,
        })
    }
}

impl TrialAssembler for SearchAssembler {
    fn name(&self) -> &'static str {
        "search"
    }

    fn assemble(&self, n_part: usize, rng: &mut dyn RngCore) -> Result<Design> {
        check_parts(n_part)?;

        let mut conditions = Condition::all().to_vec();
        conditions.shuffle(rng);
        let mut decoy_counts = self.config.decoy_counts();
        decoy_counts.shuffle(rng);

        let mut trials = Vec::with_capacity(CONDITION_COUNT);
        for (condition, n_decoys) in conditions.into_iter().zip(decoy_counts) {
            trials.push(self.build_trial(n_part, condition, n_decoys, rng)?);
        }
        trials.shuffle(rng);

        let design = Design { trials };
        design.verify_coverage()?;
        info!(trials = design.trials.len(), "search design assembled");
        Ok(design)
    }
}

/// Full and partial overlap need a second part on each side.
fn check_parts(n_part: usize) -> Result<()> {
    if n_part < 2 {
        return Err(StimError::InvalidParameters(format!(
            "search design needs at least 2 parts, got {n_part}"
        )));
    }
    Ok(())
}

/// A part index other than `p`, uniformly.
fn other_part(p: Part, n_part: usize, rng: &mut dyn RngCore) -> Part {
    let k = rng.random_range(0..n_part - 1);
    if k >= p {
        k + 1
    } else {
        k
    }
}

fn random_entry(n_part: usize, rng: &mut dyn RngCore) -> ManualEntry {
    let task = Task::new(rng.random_range(0..n_part), rng.random_range(0..n_part));
    let kind = if rng.random_bool(0.5) {
        Kind::Bespoke
    } else {
        Kind::Compositional
    };
    ManualEntry::new(task, kind)
}

/// The minimal entries that realize `condition` for `target`.
fn seed_manual(
    target: Task,
    condition: Condition,
    n_part: usize,
    rng: &mut dyn RngCore,
) -> Vec<ManualEntry> {
    let mut manual = Vec::new();
    if condition.availability == Availability::Available {
        manual.push(ManualEntry::bespoke(target));
    }
    match condition.overlap {
        Overlap::Exact => manual.push(ManualEntry::compositional(target)),
        Overlap::Full => {
            let right = other_part(target.right, n_part, rng);
            let left = other_part(target.left, n_part, rng);
            manual.push(ManualEntry::compositional(Task::new(target.left, right)));
            manual.push(ManualEntry::compositional(Task::new(left, target.right)));
        }
        Overlap::Partial => {
            if rng.random_bool(0.5) {
                let right = other_part(target.right, n_part, rng);
                manual.push(ManualEntry::compositional(Task::new(target.left, right)));
            } else {
                let left = other_part(target.left, n_part, rng);
                manual.push(ManualEntry::compositional(Task::new(left, target.right)));
            }
        }
        Overlap::None => {}
    }
    manual
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_codes::seeded_rng;

    #[test]
    fn other_part_never_returns_input() {
        let mut rng = seeded_rng(5);
        for p in 0..4 {
            for _ in 0..50 {
                let q = other_part(p, 4, &mut rng);
                assert_ne!(p, q);
                assert!(q < 4);
            }
        }
    }

    #[test]
    fn seeded_manual_realizes_condition() {
        let mut rng = seeded_rng(9);
        let target = Task::new(1, 2);
        for condition in Condition::all() {
            let manual = seed_manual(target, condition, 4, &mut rng);
            assert_eq!(classify(&manual, target), condition);
        }
    }

    #[test]
    fn decoys_keep_condition() {
        let assembler = SearchAssembler::new(SearchConfig::default());
        let mut rng = seeded_rng(2);
        for condition in Condition::all() {
            let trial = assembler.build_trial(4, condition, 12, &mut rng).unwrap();
            assert_eq!(classify(&trial.manual, trial.task), condition);
            assert!(trial.manual.len() >= 12);
        }
    }

    #[test]
    fn zero_attempt_budget_exhausts() {
        let assembler = SearchAssembler::new(SearchConfig {
            max_attempts: 0,
            ..SearchConfig::default()
        });
        let mut rng = seeded_rng(0);
        let condition = Condition::new(Availability::Unavailable, Overlap::None);
        let err = assembler.build_trial(4, condition, 1, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            StimError::DecoyPlacementExhausted {
                slot: 0,
                attempts: 0,
                ..
            }
        ));
    }

    #[test]
    fn design_covers_every_condition_once() {
        let assembler = SearchAssembler::new(SearchConfig::default());
        for seed in 0..10 {
            let design = assembler.assemble(4, &mut seeded_rng(seed)).unwrap();
            assert_eq!(design.trials.len(), CONDITION_COUNT);
            design.verify_coverage().unwrap();
        }
    }

    #[test]
    fn decoy_schedule_lengths_are_distinct() {
        let counts = SearchConfig::default().decoy_counts();
        assert_eq!(counts, vec![6, 8, 10, 12, 14, 16, 18, 20]);
    }

    #[test]
    fn single_trial_on_degenerate_grid_is_rejected() {
        let assembler = SearchAssembler::new(SearchConfig::default());
        let condition = Condition::new(Availability::Unavailable, Overlap::Full);
        for n_part in [0, 1] {
            assert!(matches!(
                assembler.build_trial(n_part, condition, 0, &mut seeded_rng(0)),
                Err(StimError::InvalidParameters(_))
            ));
        }
    }

    #[test]
    fn single_part_grid_is_rejected() {
        let assembler = SearchAssembler::new(SearchConfig::default());
        assert!(matches!(
            assembler.assemble(1, &mut seeded_rng(0)),
            Err(StimError::InvalidParameters(_))
        ));
    }
}
