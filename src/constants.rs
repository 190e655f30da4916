//! Default generation parameters and glyph constants.
//!
//! The defaults describe the main experiment block:
//! - digits `1..=`[`MAX_DIGIT`], codes of [`CODE_LENGTH`] digits
//! - [`N_PART`] parts per side, so `N_PART²` = 16 tasks
//! - [`SOLUTIONS_PER_TASK`] codes per task (1 compositional + 19 bespoke)
//!
//! A task is written as two decimal digits (`"{left+1}{right+1}"`), which caps
//! both the alphabet and the part count at 9.

/// Largest digit a code may contain. Digits start at 1.
pub const MAX_DIGIT: u8 = 9;

/// Number of digits in a full code. Must be even: each half is a part-code.
pub const CODE_LENGTH: usize = 4;

/// Number of parts per side.
pub const N_PART: usize = 4;

/// Codes assigned to every task (exactly one of them compositional).
pub const SOLUTIONS_PER_TASK: usize = 20;

/// Upper bound for `max_digit` and `n_part` imposed by the two-digit task format.
pub const MAX_SINGLE_DIGIT: usize = 9;

/// Parts required by the closed-form matrix design (`a, b, c, d`).
pub const MATRIX_MIN_PARTS: usize = 4;

/// Number of cells in the availability × overlap design.
pub const CONDITION_COUNT: usize = 8;

/// Smallest decoy count in the default schedule.
pub const DECOY_MIN: usize = 6;

/// Spacing between consecutive decoy counts in the default schedule
/// (6, 8, …, 20 for the eight conditions).
pub const DECOY_STEP: usize = 2;

/// Attempts allowed per decoy slot before the search gives up.
pub const DECOY_MAX_ATTEMPTS: usize = 1000;

/// Manual entries in an unstructured (random) section.
pub const RANDOM_N_MANUAL: usize = 8;

/// Trials in an unstructured (random) section.
pub const RANDOM_N_TRIALS: usize = 10;

/// Glyph owned by the left part.
pub const LEFT_GLYPH: char = '1';

/// Glyph owned by the right part.
pub const RIGHT_GLYPH: char = '2';

/// Glyph that replaces both part glyphs in a bespoke rendering.
pub const BESPOKE_GLYPH: char = '3';

/// Empty cell.
pub const BLANK_GLYPH: char = '_';

/// Output directory when neither the CLI nor the environment names one.
pub const DEFAULT_CONFIG_DIR: &str = "static/json/code-pilot";
