//! Graph rendering trait and shared helpers

use crate::{ColorScheme, GraphConfig};
use async_trait::async_trait;
use calls_analysis::DimensionValue;
use calls_common::Result;
use plotters::prelude::*;
use std::path::Path;

/// Trait for rendering a chart to an image file
#[async_trait]
pub trait GraphRenderer: Send + Sync {
    /// Render the chart to a PNG at `path`
    async fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()>;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Get colors from color scheme
    fn get_colors(&self, scheme: &ColorScheme) -> Vec<RGBColor> {
        match scheme {
            ColorScheme::Default => vec![
                RGBColor(31, 119, 180),  // Blue
                RGBColor(255, 127, 14),  // Orange
                RGBColor(44, 160, 44),   // Green
                RGBColor(214, 39, 40),   // Red
                RGBColor(148, 103, 189), // Purple
                RGBColor(140, 86, 75),   // Brown
                RGBColor(227, 119, 194), // Pink
                RGBColor(127, 127, 127), // Gray
            ],
            ColorScheme::Vibrant => vec![
                RGBColor(230, 25, 75),
                RGBColor(60, 180, 75),
                RGBColor(255, 225, 25),
                RGBColor(0, 130, 200),
                RGBColor(245, 130, 48),
                RGBColor(145, 30, 180),
            ],
            ColorScheme::Monochrome => vec![
                RGBColor(0, 0, 0),
                RGBColor(64, 64, 64),
                RGBColor(128, 128, 128),
                RGBColor(192, 192, 192),
            ],
            ColorScheme::Custom(colors) if !colors.is_empty() => {
                colors.iter().map(|c| self.parse_color(c)).collect()
            }
            ColorScheme::Custom(_) => vec![RGBColor(0, 0, 0)],
        }
    }

    /// Parse a color string (hex format) to RGBColor
    fn parse_color(&self, color_str: &str) -> RGBColor {
        parse_hex_color(color_str).unwrap_or(RGBColor(0, 0, 0))
    }

    /// Get background color from style config
    fn get_background_color(&self, config: &GraphConfig) -> RGBColor {
        config
            .style
            .background_color
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or(WHITE)
    }
}

/// Parse `#RRGGBB`
pub fn parse_hex_color(color_str: &str) -> Option<RGBColor> {
    let hex = color_str.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// `(min, max)` widened by `fraction` of the span on both sides
pub fn padded_range(min: f64, max: f64, fraction: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span.abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    (min - span * fraction, max + span * fraction)
}

/// Axis label for a category index, empty outside the key list
pub fn key_label(keys: &[DimensionValue], index: i64) -> String {
    usize::try_from(index)
        .ok()
        .and_then(|i| keys.get(i))
        .map(ToString::to_string)
        .unwrap_or_default()
}
