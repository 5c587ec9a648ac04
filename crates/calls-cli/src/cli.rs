//! Command line arguments and the input prompt

use anyhow::{bail, Result};
use calls_config::{ChartToggles, Config, ConfigError};
use clap::Parser;
use dialoguer::Input;
use std::path::PathBuf;

/// Prompt shown when no input file is given
pub const INPUT_PROMPT: &str = "Enter the path to the 911 CSV file";

/// Analyze a CSV export of 911 calls and draw charts of the results
#[derive(Parser, Debug)]
#[command(name = "calls911", author, version, about, long_about = None)]
pub struct Args {
    /// CSV file to analyze; prompted for when omitted
    pub input: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for charts and the JSON summary
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Log level or filter directives
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,
}

impl Args {
    /// Apply command line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.no_charts {
            config.output.charts = ChartToggles::none();
        }
        config.validate_all().map_err(ConfigError::ValidationError)?;
        Ok(())
    }
}

/// Ask for the input path on the terminal
pub fn prompt_for_input() -> Result<PathBuf> {
    let answer: String = Input::new().with_prompt(INPUT_PROMPT).interact_text()?;
    let answer = answer.trim();
    if answer.is_empty() {
        bail!("No input file given");
    }
    Ok(PathBuf::from(answer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let args = Args::try_parse_from([
            "calls911",
            "911.csv",
            "--config",
            "calls911.yaml",
            "--output-dir",
            "out",
            "--log-level",
            "debug",
            "--no-charts",
        ])
        .unwrap();

        assert_eq!(args.input, Some(PathBuf::from("911.csv")));
        assert_eq!(args.config, Some(PathBuf::from("calls911.yaml")));
        assert!(args.no_charts);

        let mut config = Config::default();
        args.apply(&mut config).unwrap();
        assert_eq!(config.output.directory, "out");
        assert_eq!(config.logging.level, "debug");
        assert!(!config.output.charts.any());
    }

    #[test]
    fn test_input_is_optional() {
        let args = Args::try_parse_from(["calls911"]).unwrap();
        assert!(args.input.is_none());

        let mut config = Config::default();
        args.apply(&mut config).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_rejects_bad_output_dir() {
        let args = Args::try_parse_from(["calls911", "--output-dir", "out|put"]).unwrap();
        let mut config = Config::default();
        assert!(args.apply(&mut config).is_err());
    }
}
