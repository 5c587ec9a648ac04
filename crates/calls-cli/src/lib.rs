//! # Calls CLI
//!
//! Wiring for the `calls911` binary: argument parsing, the single analysis
//! run and the console report.

#![warn(clippy::all)]

pub mod cli;
pub mod pipeline;
pub mod report;

pub use cli::{prompt_for_input, Args, INPUT_PROMPT};
pub use pipeline::{Pipeline, RunOutcome, SUMMARY_FILE};
