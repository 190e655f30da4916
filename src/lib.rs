//! # Code Stimuli: seeded compositional/bespoke code configurations
//!
//! Generates the stimulus configuration for a two-part categorization task.
//! Every task is a `(left, right)` pair of parts and owns one **compositional**
//! code (left part-code followed by right part-code) plus several **bespoke**
//! codes with no decomposable structure.
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | 1 | [`code_space`] | Enumerate and shuffle every code over digits `1..=max_digit`; draw disjoint part-codes |
//! | 2 | [`task_codes`] | Assign 1 compositional + N bespoke codes per task under global uniqueness and half-exclusion |
//! | 3 | [`validation`] | Exhaustively check the mapping, collecting every violation |
//! | 4 | [`assembly`] | Choose trials whose manuals realize all 8 availability × overlap conditions |
//! | 5 | [`config`], [`shapes`], [`io`] | Render block strings and write one JSON artifact per seed |
//!
//! ## Conditions
//!
//! Given a set of revealed `(task, kind)` manual entries, a target task is
//! *available* iff its own bespoke entry was revealed, and its overlap is
//! *exact* (own compositional entry revealed), *full* (compositional entries
//! share both its left and its right part), *partial* (only one side) or
//! *none*. See [`assembly::classify`].
//!
//! ## Determinism
//!
//! A single ChaCha8 generator seeded from the config index is threaded through
//! every draw. The same parameters and seed always give byte-identical output.

pub mod assembly;
pub mod code_space;
pub mod config;
pub mod constants;
pub mod env_config;
pub mod error;
pub mod io;
pub mod shapes;
pub mod task_codes;
pub mod types;
pub mod validation;

pub use error::{Result, StimError};
