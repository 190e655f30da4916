//! Assignment of compositional and bespoke codes to every task.
//!
//! Algorithm:
//! 1. Draw `2 * n_part` distinct part-codes of `code_length / 2` digits and
//!    split them into left and right halves.
//! 2. The compositional code of task `(i, j)` is `left[i] + right[j]`.
//! 3. Shuffle the full-length pool once. For each task, walk the pool from the
//!    start and take the first unused code whose first half differs from the
//!    compositional first half and whose last half differs from the
//!    compositional last half, until the task holds `solutions_per_task` codes.
//! 4. Validate the finished mapping (see [`crate::validation`]).
//!
//! All randomness comes from the generator passed in, so a seed fully
//! determines the mapping.

use std::collections::{BTreeMap, HashSet};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::code_space::CodeSpace;
use crate::error::{Result, StimError};
use crate::types::{Code, GeneratorParams, Task, TaskCodeMapping, TaskSolutions};
use crate::validation::validate_mapping;

/// Generator used for every seeded draw in this crate.
pub type StimRng = ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> StimRng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub struct TaskCodeGenerator {
    params: GeneratorParams,
}

impl TaskCodeGenerator {
    pub fn new(params: GeneratorParams) -> Self {
        Self { params }
    }

    /// Build the mapping for `seed` with a fresh generator.
    pub fn generate(&self, seed: u64) -> Result<TaskCodeMapping> {
        self.generate_with(&mut seeded_rng(seed))
    }

    /// Build the mapping, drawing from an existing generator.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TaskCodeMapping> {
        let p = self.params;
        p.validate()?;
        let half = p.half_length();
        let space = CodeSpace::new(p.max_digit);

        let parts = space.draw_part_codes(p.n_part, half, rng)?;
        let tasks = Task::all(p.n_part);

        let mut used: HashSet<Code> = HashSet::with_capacity(p.task_count() * p.solutions_per_task);
        let compositional: Vec<(Task, Code)> = tasks
            .iter()
            .map(|&t| (t, Code::concat(&parts.left[t.left], &parts.right[t.right])))
            .collect();
        used.extend(compositional.iter().map(|(_, c)| c.clone()));

        let pool = space.all_unique_codes(p.code_length, rng)?;
        debug!(
            pool = pool.len(),
            tasks = tasks.len(),
            "drawing bespoke codes"
        );

        let mut mapping = BTreeMap::new();
        for (task, comp) in compositional {
            let bespoke = draw_bespoke(&pool, &mut used, &comp, half, p.solutions_per_task - 1)
                .map_err(|found| StimError::PoolExhausted {
                    context: format!("assigning bespoke codes to task {task}"),
                    needed: p.solutions_per_task - 1,
                    found,
                })?;
            mapping.insert(
                task,
                TaskSolutions {
                    compositional: comp,
                    bespoke,
                },
            );
        }

        let mapping = TaskCodeMapping {
            params: p,
            tasks: mapping,
        };
        validate_mapping(&mapping).into_result()?;

        info!(
            tasks = mapping.len(),
            codes = used.len(),
            "task code mapping generated"
        );
        Ok(mapping)
    }
}

/// Take the first `count` pool codes that are unused and excluded from both
/// halves of `comp`. On exhaustion returns how many were found.
fn draw_bespoke(
    pool: &[Code],
    used: &mut HashSet<Code>,
    comp: &Code,
    half: usize,
    count: usize,
) -> std::result::Result<Vec<Code>, usize> {
    let mut out = Vec::with_capacity(count);
    for code in pool {
        if out.len() == count {
            break;
        }
        if used.contains(code)
            || code.head(half) == comp.head(half)
            || code.tail(half) == comp.tail(half)
        {
            continue;
        }
        used.insert(code.clone());
        out.push(code.clone());
    }
    if out.len() < count {
        return Err(out.len());
    }
    Ok(out)
}
