//! Closed-form covering design over boolean availability matrices.
//!
//! `C[i][j]` marks tasks whose compositional code is revealed. With four
//! distinct parts `a, b, c, d` the fixed pattern is `C[a][a]`, `C[a][b]`,
//! `C[b][c]`. Every task then has an overlap type: exact if `C[i][j]`, full if
//! both row `i` and column `j` hold a `C` cell, partial if only one does, and
//! none otherwise. For each type two cells are
//! chosen; the first also gets its bespoke code revealed (`B[i][j]`), which
//! yields all eight conditions without search.

use rand::seq::{index, SliceRandom};
use rand::RngCore;
use tracing::info;

use crate::assembly::classify::classify;
use crate::assembly::{Design, DesignedTrial, TrialAssembler};
use crate::constants::*;
use crate::error::{Result, StimError};
use crate::types::{Availability, Condition, ManualEntry, Overlap, Task};

pub type BoolGrid = Vec<Vec<bool>>;

/// The matrices behind one matrix design, kept for inspection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityMatrices {
    pub compositional: BoolGrid,
    pub bespoke: BoolGrid,
    pub types: Vec<Vec<Overlap>>,
    /// Chosen cells, two per overlap type, in type order.
    pub chosen: Vec<Task>,
}

impl AvailabilityMatrices {
    pub fn condition(&self, task: Task) -> Condition {
        Condition::new(
            Availability::from_present(self.bespoke[task.left][task.right]),
            self.types[task.left][task.right],
        )
    }

    /// Compositional entries for every `C` cell, then bespoke entries for
    /// every `B` cell, in row-major order.
    pub fn manual(&self) -> Vec<ManualEntry> {
        let mut manual = cells(&self.compositional)
            .map(ManualEntry::compositional)
            .collect::<Vec<_>>();
        manual.extend(cells(&self.bespoke).map(ManualEntry::bespoke));
        manual
    }
}

fn cells(grid: &BoolGrid) -> impl Iterator<Item = Task> + '_ {
    grid.iter().enumerate().flat_map(|(i, row)| {
        row.iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .map(move |(j, _)| Task::new(i, j))
    })
}

/// Overlap type of every cell given the compositional matrix.
pub fn overlap_types(c: &BoolGrid) -> Vec<Vec<Overlap>> {
    let n = c.len();
    let row_has: Vec<bool> = c.iter().map(|row| row.iter().any(|&x| x)).collect();
    let col_has: Vec<bool> = (0..n).map(|j| c.iter().any(|row| row[j])).collect();
    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| Overlap::from_cell(c[i][j], row_has[i], col_has[j]))
                .collect()
        })
        .collect()
}

/// Draw the compositional pattern and the bespoke cells.
pub fn build_matrices(n_part: usize, rng: &mut dyn RngCore) -> Result<AvailabilityMatrices> {
    if n_part < MATRIX_MIN_PARTS {
        return Err(StimError::InvalidParameters(format!(
            "matrix design needs at least {MATRIX_MIN_PARTS} parts, got {n_part}"
        )));
    }

    let picked = index::sample(rng, n_part, MATRIX_MIN_PARTS).into_vec();
    let (a, b, c) = (picked[0], picked[1], picked[2]);

    let mut comp = vec![vec![false; n_part]; n_part];
    comp[a][a] = true;
    comp[a][b] = true;
    comp[b][c] = true;

    let types = overlap_types(&comp);
    let mut bespoke = vec![vec![false; n_part]; n_part];
    let mut chosen = Vec::with_capacity(CONDITION_COUNT);

    for overlap in Overlap::ALL {
        let of_type: Vec<Task> = Task::all(n_part)
            .into_iter()
            .filter(|task| types[task.left][task.right] == overlap)
            .collect();
        if of_type.len() < 2 {
            return Err(StimError::IncompleteCoverage {
                missing: Availability::ALL
                    .iter()
                    .map(|&av| Condition::new(av, overlap))
                    .collect(),
                repeated: Vec::new(),
            });
        }
        let pair = index::sample(rng, of_type.len(), 2).into_vec();
        let first = of_type[pair[0]];
        let second = of_type[pair[1]];
        bespoke[first.left][first.right] = true;

        let mut these = [first, second];
        these.shuffle(rng);
        chosen.extend(these);
    }

    Ok(AvailabilityMatrices {
        compositional: comp,
        bespoke,
        types,
        chosen,
    })
}

pub struct MatrixAssembler;

impl TrialAssembler for MatrixAssembler {
    fn name(&self) -> &'static str {
        "matrix"
    }

    fn assemble(&self, n_part: usize, rng: &mut dyn RngCore) -> Result<Design> {
        let matrices = build_matrices(n_part, rng)?;
        let mut manual = matrices.manual();
        manual.shuffle(rng);

        let mut trials = Vec::with_capacity(matrices.chosen.len());
        for &task in &matrices.chosen {
            let condition = matrices.condition(task);
            let actual = classify(&manual, task);
            if actual != condition {
                return Err(StimError::DesignMismatch {
                    task,
                    expected: condition,
                    actual,
                });
            }
            trials.push(DesignedTrial {
                task,
                condition,
                manual: manual.clone(),
            });
        }

        let design = Design { trials };
        design.verify_coverage()?;
        info!(
            trials = design.trials.len(),
            manual = manual.len(),
            "matrix design assembled"
        );
        Ok(design)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_codes::seeded_rng;

    #[test]
    fn types_follow_row_and_column_occupancy() {
        // C at (0,0), (0,1), (1,2) on a 4x4 grid
        let mut c = vec![vec![false; 4]; 4];
        c[0][0] = true;
        c[0][1] = true;
        c[1][2] = true;
        let types = overlap_types(&c);
        assert_eq!(types[0][0], Overlap::Exact);
        assert_eq!(types[1][0], Overlap::Full);
        assert_eq!(types[0][3], Overlap::Partial);
        assert_eq!(types[2][1], Overlap::Partial);
        assert_eq!(types[3][3], Overlap::None);
        let count = |o: Overlap| types.iter().flatten().filter(|&&x| x == o).count();
        assert_eq!(
            (
                count(Overlap::None),
                count(Overlap::Partial),
                count(Overlap::Full),
                count(Overlap::Exact)
            ),
            (2, 8, 3, 3)
        );
    }

    #[test]
    fn cell_types_agree_with_classifier() {
        let m = build_matrices(5, &mut seeded_rng(12)).unwrap();
        let manual: Vec<ManualEntry> = cells(&m.compositional)
            .map(ManualEntry::compositional)
            .collect();
        for task in Task::all(5) {
            assert_eq!(
                classify(&manual, task).overlap,
                m.types[task.left][task.right],
                "task {task}"
            );
        }
    }

    #[test]
    fn matrices_pick_two_cells_per_type() {
        let m = build_matrices(4, &mut seeded_rng(4)).unwrap();
        assert_eq!(m.chosen.len(), 8);
        for pair in m.chosen.chunks(2) {
            assert_ne!(pair[0], pair[1]);
            assert_eq!(
                m.types[pair[0].left][pair[0].right],
                m.types[pair[1].left][pair[1].right]
            );
            let bespoke = pair
                .iter()
                .filter(|t| m.bespoke[t.left][t.right])
                .count();
            assert_eq!(bespoke, 1);
        }
        assert_eq!(cells(&m.compositional).count(), 3);
        assert_eq!(cells(&m.bespoke).count(), 4);
    }

    #[test]
    fn every_seed_covers_all_conditions() {
        for seed in 0..25 {
            let design = MatrixAssembler.assemble(4, &mut seeded_rng(seed)).unwrap();
            design.verify_coverage().unwrap();
            let manual = &design.trials[0].manual;
            assert_eq!(manual.len(), 7);
            assert!(design.trials.iter().all(|t| &t.manual == manual));
        }
    }

    #[test]
    fn larger_grids_work() {
        let design = MatrixAssembler.assemble(6, &mut seeded_rng(1)).unwrap();
        assert_eq!(design.trials.len(), 8);
    }

    #[test]
    fn small_grid_is_rejected() {
        assert!(matches!(
            MatrixAssembler.assemble(3, &mut seeded_rng(0)),
            Err(StimError::InvalidParameters(_))
        ));
    }
}
