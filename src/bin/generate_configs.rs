//! Generate one stimulus config per seed index.
//!
//! Usage:
//!   generate-configs --configs 50 --strategy search --shapes data/shapes.json
//!
//! Each config `i` is generated from seed `i` and written to `<out>/<i>.json`.
//! A failing seed aborts the run; configs already written stay valid.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use code_stimuli::assembly::random::RandomSampler;
use code_stimuli::assembly::search::SearchConfig;
use code_stimuli::assembly::AssemblyStrategy;
use code_stimuli::config::{ConfigBuilder, InstructionSetup};
use code_stimuli::constants::*;
use code_stimuli::env_config::{config_dir, init_tracing};
use code_stimuli::io::write_config;
use code_stimuli::shapes::GridAtlas;
use code_stimuli::types::GeneratorParams;

#[derive(Parser, Debug)]
#[command(name = "generate-configs", about = "Generate seeded stimulus configs")]
struct Args {
    /// Number of configs to write
    #[arg(long, default_value_t = 50)]
    configs: u64,

    /// First seed index
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Trial assembly strategy: search or matrix
    #[arg(long, default_value_t = AssemblyStrategy::Search)]
    strategy: AssemblyStrategy,

    /// Shape atlas for the main block
    #[arg(long, default_value = "data/shapes.json")]
    shapes: PathBuf,

    /// Shape atlas for the instructions
    #[arg(long, default_value = "data/instruct_shapes.json")]
    instruct_shapes: PathBuf,

    /// Output directory (defaults to $CODE_STIMULI_CONFIG_DIR)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Largest digit used in codes (digits start at 1)
    #[arg(long, default_value_t = MAX_DIGIT)]
    max_digit: u8,

    /// Digits per code; must be even
    #[arg(long, default_value_t = CODE_LENGTH)]
    code_length: usize,

    /// Parts per side in the main block
    #[arg(long, default_value_t = N_PART)]
    n_part: usize,

    /// Codes per task, one of them compositional
    #[arg(long, default_value_t = SOLUTIONS_PER_TASK)]
    solutions_per_task: usize,

    /// Attempts per decoy slot in the search strategy
    #[arg(long, default_value_t = DECOY_MAX_ATTEMPTS)]
    max_attempts: usize,

    /// Parts per side in the instruction section
    #[arg(long, default_value_t = 2)]
    instruct_n_part: usize,

    /// Codes per task in the instruction section
    #[arg(long, default_value_t = 4)]
    instruct_solutions: usize,

    /// Manual entries shown in the instruction section
    #[arg(long, default_value_t = 2)]
    instruct_manual: usize,

    /// Trials in the instruction section
    #[arg(long, default_value_t = 3)]
    instruct_trials: usize,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let atlas = GridAtlas::load(&args.shapes)
        .with_context(|| format!("loading shapes from {}", args.shapes.display()))?;
    let instruct_atlas = GridAtlas::load(&args.instruct_shapes).with_context(|| {
        format!(
            "loading instruction shapes from {}",
            args.instruct_shapes.display()
        )
    })?;
    let out = args.out.clone().unwrap_or_else(config_dir);

    let builder = ConfigBuilder {
        params: GeneratorParams {
            max_digit: args.max_digit,
            code_length: args.code_length,
            n_part: args.n_part,
            solutions_per_task: args.solutions_per_task,
        },
        strategy: args.strategy,
        search: SearchConfig {
            max_attempts: args.max_attempts,
            ..SearchConfig::default()
        },
        atlas: &atlas,
        instructions: InstructionSetup {
            params: GeneratorParams {
                max_digit: args.max_digit,
                code_length: args.code_length,
                n_part: args.instruct_n_part,
                solutions_per_task: args.instruct_solutions,
            },
            sampler: RandomSampler::new(args.instruct_manual, args.instruct_trials),
            atlas: &instruct_atlas,
        },
    };

    let t0 = Instant::now();
    for index in args.start..args.start + args.configs {
        let config = builder
            .build(index)
            .with_context(|| format!("generating config {index}"))?;
        write_config(&out, index, &config)?;
    }
    info!(
        configs = args.configs,
        dir = %out.display(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "wrote configs"
    );
    Ok(())
}
