//! Assembly of the per-seed JSON artifact.
//!
//! One seeded generator drives, in order: code assignment, the main design,
//! and the instruction section. Rendering consumes no randomness.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::assembly::random::{RandomSampler, RandomSection};
use crate::assembly::search::SearchConfig;
use crate::assembly::{AssemblyStrategy, Design};
use crate::error::{Result, StimError};
use crate::shapes::{make_bespoke, render_task, ShapeAtlas};
use crate::task_codes::{seeded_rng, TaskCodeGenerator};
use crate::types::{Code, GeneratorParams, Kind, ManualEntry, Task, TaskCodeMapping, TaskSolutions};

// ── Output JSON types ──

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualJson {
    pub task: Task,
    pub kind: Kind,
    pub compositional: bool,
    pub code: Code,
    pub block_string: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialJson {
    pub task: Task,
    pub solutions: TaskSolutions,
    pub block_string: String,
    pub manual: Vec<ManualJson>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionParams {
    #[serde(flatten)]
    pub generator: GeneratorParams,
    pub strategy: &'static str,
    pub seed: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct Section {
    pub trials: Vec<TrialJson>,
    pub params: SectionParams,
}

#[derive(Clone, Debug, Serialize)]
pub struct StimulusConfig {
    pub trials: Vec<TrialJson>,
    pub params: SectionParams,
    pub instructions: Section,
}

// ── Rendering ──

/// Resolves manual entries to concrete codes and block strings.
struct Renderer<'a> {
    mapping: &'a TaskCodeMapping,
    atlas: &'a dyn ShapeAtlas,
}

impl Renderer<'_> {
    fn solutions(&self, task: Task) -> Result<&TaskSolutions> {
        self.mapping.get(&task).ok_or_else(|| {
            StimError::InvalidParameters(format!("task {task} is not in the code mapping"))
        })
    }

    /// Repeated bespoke entries for one task reveal successive bespoke codes.
    fn manual(&self, entries: &[ManualEntry]) -> Result<Vec<ManualJson>> {
        let mut bespoke_seen: HashMap<Task, usize> = HashMap::new();
        entries
            .iter()
            .map(|e| {
                let solutions = self.solutions(e.task)?;
                let block = render_task(self.atlas, e.task)?;
                let (code, block_string) = match e.kind {
                    Kind::Compositional => (solutions.compositional.clone(), block),
                    Kind::Bespoke => {
                        if solutions.bespoke.is_empty() {
                            return Err(StimError::InvalidParameters(format!(
                                "task {} has no bespoke codes to reveal",
                                e.task
                            )));
                        }
                        let k = bespoke_seen.entry(e.task).or_default();
                        let code = solutions.bespoke[*k % solutions.bespoke.len()].clone();
                        *k += 1;
                        (code, make_bespoke(&block))
                    }
                };
                Ok(ManualJson {
                    task: e.task,
                    kind: e.kind,
                    compositional: e.kind == Kind::Compositional,
                    code,
                    block_string,
                })
            })
            .collect()
    }

    fn trial(&self, task: Task, manual: &[ManualEntry]) -> Result<TrialJson> {
        Ok(TrialJson {
            task,
            solutions: self.solutions(task)?.clone(),
            block_string: render_task(self.atlas, task)?,
            manual: self.manual(manual)?,
        })
    }

    fn design(&self, design: &Design) -> Result<Vec<TrialJson>> {
        design
            .trials
            .iter()
            .map(|t| self.trial(t.task, &t.manual))
            .collect()
    }

    fn random(&self, section: &RandomSection) -> Result<Vec<TrialJson>> {
        section
            .trials
            .iter()
            .map(|&t| self.trial(t, &section.manual))
            .collect()
    }
}

// ── Builder ──

/// Smaller parameters and atlas for the instruction section.
pub struct InstructionSetup<'a> {
    pub params: GeneratorParams,
    pub sampler: RandomSampler,
    pub atlas: &'a dyn ShapeAtlas,
}

pub struct ConfigBuilder<'a> {
    pub params: GeneratorParams,
    pub strategy: AssemblyStrategy,
    pub search: SearchConfig,
    pub atlas: &'a dyn ShapeAtlas,
    pub instructions: InstructionSetup<'a>,
}

impl ConfigBuilder<'_> {
    fn check_atlas(atlas: &dyn ShapeAtlas, params: &GeneratorParams) -> Result<()> {
        if atlas.n_part() < params.n_part {
            return Err(StimError::InvalidParameters(format!(
                "shape atlas holds {} parts, {} requested",
                atlas.n_part(),
                params.n_part
            )));
        }
        Ok(())
    }

    /// A section whose manual may reveal bespoke entries needs a bespoke code
    /// per task.
    fn check_bespoke(section: &str, params: &GeneratorParams, reveals: bool) -> Result<()> {
        if reveals && params.solutions_per_task < 2 {
            return Err(StimError::InvalidParameters(format!(
                "{section} section reveals bespoke codes, so solutions_per_task must be \
                 at least 2, got {}",
                params.solutions_per_task
            )));
        }
        Ok(())
    }

    /// Build the full artifact for one seed. Nothing is returned unless every
    /// stage succeeds.
    pub fn build(&self, seed: u64) -> Result<StimulusConfig> {
        Self::check_atlas(self.atlas, &self.params)?;
        Self::check_atlas(self.instructions.atlas, &self.instructions.params)?;
        Self::check_bespoke("main", &self.params, true)?;
        Self::check_bespoke(
            "instruction",
            &self.instructions.params,
            self.instructions.sampler.n_manual > 0,
        )?;

        let mut rng = seeded_rng(seed);

        let mapping = TaskCodeGenerator::new(self.params).generate_with(&mut rng)?;
        let design = self
            .strategy
            .assembler(self.search)
            .assemble(self.params.n_part, &mut rng)?;
        let trials = Renderer {
            mapping: &mapping,
            atlas: self.atlas,
        }
        .design(&design)?;

        let setup = &self.instructions;
        let instruct_mapping = TaskCodeGenerator::new(setup.params).generate_with(&mut rng)?;
        let section = setup.sampler.sample(setup.params.n_part, &mut rng)?;
        let instruct_trials = Renderer {
            mapping: &instruct_mapping,
            atlas: setup.atlas,
        }
        .random(&section)?;

        info!(
            seed,
            strategy = self.strategy.as_str(),
            trials = trials.len(),
            "config built"
        );

        Ok(StimulusConfig {
            trials,
            params: SectionParams {
                generator: self.params,
                strategy: self.strategy.as_str(),
                seed,
            },
            instructions: Section {
                trials: instruct_trials,
                params: SectionParams {
                    generator: setup.params,
                    strategy: "random",
                    seed,
                },
            },
        })
    }
}
