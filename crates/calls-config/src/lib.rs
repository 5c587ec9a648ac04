//! # Calls Config
//!
//! Configuration for the calls911 pipeline: analysis knobs, chart output and
//! logging, loaded from YAML with environment variable overrides.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{
    AnalysisConfig, ChartToggles, Config, LoggingSettings, OutputConfig, PaletteConfig,
    PaletteName,
};
