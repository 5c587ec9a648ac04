//! Sequential color maps for heatmaps and bar fills

use calls_config::PaletteName;
use plotters::style::RGBColor;

const MAGMA: [RGBColor; 9] = [
    RGBColor(0x00, 0x00, 0x04),
    RGBColor(0x1C, 0x10, 0x33),
    RGBColor(0x4F, 0x12, 0x7B),
    RGBColor(0x81, 0x25, 0x81),
    RGBColor(0xB5, 0x36, 0x7A),
    RGBColor(0xE5, 0x50, 0x64),
    RGBColor(0xFB, 0x87, 0x61),
    RGBColor(0xFE, 0xC2, 0x87),
    RGBColor(0xFC, 0xFD, 0xBF),
];

const INFERNO: [RGBColor; 9] = [
    RGBColor(0x00, 0x00, 0x04),
    RGBColor(0x1F, 0x0C, 0x48),
    RGBColor(0x55, 0x0F, 0x6D),
    RGBColor(0x88, 0x22, 0x6A),
    RGBColor(0xBA, 0x36, 0x55),
    RGBColor(0xE3, 0x59, 0x33),
    RGBColor(0xF9, 0x8C, 0x0A),
    RGBColor(0xF9, 0xC9, 0x32),
    RGBColor(0xFC, 0xFF, 0xA4),
];

const VIRIDIS: [RGBColor; 10] = [
    RGBColor(0x44, 0x01, 0x54),
    RGBColor(0x48, 0x28, 0x78),
    RGBColor(0x3E, 0x4A, 0x89),
    RGBColor(0x31, 0x68, 0x8E),
    RGBColor(0x26, 0x82, 0x8E),
    RGBColor(0x1F, 0x9E, 0x89),
    RGBColor(0x35, 0xB7, 0x79),
    RGBColor(0x6D, 0xCD, 0x59),
    RGBColor(0xB4, 0xDE, 0x2C),
    RGBColor(0xFD, 0xE7, 0x25),
];

const CIVIDIS: [RGBColor; 10] = [
    RGBColor(0x00, 0x22, 0x4E),
    RGBColor(0x12, 0x35, 0x70),
    RGBColor(0x3B, 0x49, 0x6C),
    RGBColor(0x57, 0x5D, 0x6D),
    RGBColor(0x70, 0x71, 0x73),
    RGBColor(0x8A, 0x87, 0x79),
    RGBColor(0xA6, 0x9D, 0x75),
    RGBColor(0xC4, 0xB5, 0x6C),
    RGBColor(0xE4, 0xCF, 0x5B),
    RGBColor(0xFE, 0xE8, 0x38),
];

const PLASMA: [RGBColor; 10] = [
    RGBColor(0x0D, 0x08, 0x87),
    RGBColor(0x46, 0x03, 0x9F),
    RGBColor(0x72, 0x01, 0xA8),
    RGBColor(0x9C, 0x17, 0x9E),
    RGBColor(0xBD, 0x37, 0x86),
    RGBColor(0xD8, 0x57, 0x6B),
    RGBColor(0xED, 0x79, 0x53),
    RGBColor(0xFB, 0x9F, 0x3A),
    RGBColor(0xFD, 0xCA, 0x26),
    RGBColor(0xF0, 0xF9, 0x21),
];

/// Piecewise-linear gradient through evenly spaced color stops
#[derive(Debug, Clone, Copy)]
pub struct Gradient {
    stops: &'static [RGBColor],
}

impl Gradient {
    pub fn for_palette(name: PaletteName) -> Self {
        let stops: &'static [RGBColor] = match name {
            PaletteName::Magma => &MAGMA,
            PaletteName::Inferno => &INFERNO,
            PaletteName::Viridis => &VIRIDIS,
            PaletteName::Cividis => &CIVIDIS,
            PaletteName::Plasma => &PLASMA,
        };
        Self { stops }
    }

    /// Color at position `t`, clamped to 0.0..=1.0
    pub fn color_at(&self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let last = self.stops.len() - 1;
        let scaled = t * last as f64;
        let lower = (scaled.floor() as usize).min(last);
        let upper = (lower + 1).min(last);
        let frac = scaled - lower as f64;

        let a = self.stops[lower];
        let b = self.stops[upper];
        RGBColor(lerp(a.0, b.0, frac), lerp(a.1, b.1, frac), lerp(a.2, b.2, frac))
    }

    /// Color for `value` on a 0..=`max` scale
    pub fn scaled(&self, value: f64, max: f64) -> RGBColor {
        if max <= 0.0 {
            self.color_at(0.0)
        } else {
            self.color_at(value / max)
        }
    }

    /// `n` colors spread evenly across the gradient, ends excluded
    pub fn sample(&self, n: usize) -> Vec<RGBColor> {
        (0..n)
            .map(|i| self.color_at((i as f64 + 0.5) / n as f64))
            .collect()
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
}
