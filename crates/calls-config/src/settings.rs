//! Application configuration structures

use crate::validation::{validate_file_path, HEX_COLOR_REGEX};
use calls_common::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Feature extraction and summary settings
    #[validate(nested)]
    pub analysis: AnalysisConfig,

    /// Chart rendering and export settings
    #[validate(nested)]
    pub output: OutputConfig,

    /// Logging configuration
    #[validate(nested)]
    pub logging: LoggingSettings,
}

/// Feature extraction and summary settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AnalysisConfig {
    /// How many entries the zip and township frequency tables keep
    #[validate(range(min = 1, max = 1000, message = "top_n must be between 1 and 1000"))]
    pub top_n: usize,

    /// chrono format strings tried in order when parsing `timeStamp`.
    /// Empty means the extractor's built-in list.
    pub timestamp_formats: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            timestamp_formats: Vec::new(),
        }
    }
}

/// Chart rendering and export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory charts and exports are written into
    #[validate(length(min = 1, message = "Output directory cannot be empty"))]
    pub directory: String,

    /// Chart width in pixels
    #[validate(range(min = 200, max = 4000, message = "Width must be between 200 and 4000 pixels"))]
    pub width: u32,

    /// Chart height in pixels
    #[validate(range(min = 200, max = 4000, message = "Height must be between 200 and 4000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    pub background_color: String,

    /// Also write `summary.json` with the stats and every aggregate
    pub export_json: bool,

    /// Which charts to render
    pub charts: ChartToggles,

    /// Heatmap color maps
    pub palettes: PaletteConfig,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "charts".to_string(),
            width: 1200,
            height: 600,
            background_color: "#FFFFFF".to_string(),
            export_json: false,
            charts: ChartToggles::default(),
            palettes: PaletteConfig::default(),
        }
    }
}

/// Per-chart switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartToggles {
    pub reasons: bool,
    pub day_hour: bool,
    pub day_month: bool,
    pub calls_over_time: bool,
    pub monthly_trend: bool,
}

impl Default for ChartToggles {
    fn default() -> Self {
        Self {
            reasons: true,
            day_hour: true,
            day_month: true,
            calls_over_time: true,
            monthly_trend: true,
        }
    }
}

impl ChartToggles {
    /// Whether any chart is switched on
    pub fn any(&self) -> bool {
        self.reasons || self.day_hour || self.day_month || self.calls_over_time || self.monthly_trend
    }

    /// Every chart switched off
    pub fn none() -> Self {
        Self {
            reasons: false,
            day_hour: false,
            day_month: false,
            calls_over_time: false,
            monthly_trend: false,
        }
    }
}

/// Named sequential color maps for heatmaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteName {
    Magma,
    Inferno,
    Viridis,
    Cividis,
    Plasma,
}

impl fmt::Display for PaletteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Magma => "magma",
            Self::Inferno => "inferno",
            Self::Viridis => "viridis",
            Self::Cividis => "cividis",
            Self::Plasma => "plasma",
        };
        f.write_str(name)
    }
}

/// Color map per heatmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub day_hour: PaletteName,
    pub day_hour_clustered: PaletteName,
    pub day_month: PaletteName,
    pub day_month_clustered: PaletteName,
    /// Bars of the reason count plot
    pub reasons: PaletteName,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            day_hour: PaletteName::Magma,
            day_hour_clustered: PaletteName::Inferno,
            day_month: PaletteName::Viridis,
            day_month_clustered: PaletteName::Cividis,
            reasons: PaletteName::Plasma,
        }
    }
}

/// Logging section of the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level or `EnvFilter` directive string
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub level: String,
    pub json_format: bool,
    pub pretty_format: bool,
    pub file_path: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_format: false,
            file_path: None,
        }
    }
}

impl LoggingSettings {
    /// Convert into the logging setup understood by `calls_common`
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.level.clone(),
            json_format: self.json_format,
            pretty_format: self.pretty_format,
            file_path: self.file_path.clone(),
            ..LoggingConfig::default()
        }
    }
}

impl Config {
    /// Run the derived range/length checks plus the hand-written ones
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if !HEX_COLOR_REGEX.is_match(&self.output.background_color) {
            let mut err = ValidationError::new("invalid_hex_color");
            err.message = Some("Background color must be a hex color like #FFFFFF".into());
            errors.add("background_color", err);
        }

        if let Err(err) = validate_file_path(&self.output.directory) {
            errors.add("directory", err);
        }

        if let Some(path) = &self.logging.file_path {
            if let Err(err) = validate_file_path(path) {
                errors.add("file_path", err);
            }
        }

        if self
            .analysis
            .timestamp_formats
            .iter()
            .any(|f| f.trim().is_empty())
        {
            let mut err = ValidationError::new("empty_timestamp_format");
            err.message = Some("Timestamp formats cannot be blank".into());
            errors.add("timestamp_formats", err);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
