//! Least-squares trend lines over count series

use crate::aggregator::Series;
use serde::Serialize;
use tracing::debug;

/// Multiplier applied to the residual standard error for the band
/// (normal approximation of a 95% interval)
pub const BAND_Z: f64 = 1.96;

/// A fitted point with its observed value and band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitPoint {
    pub x: f64,
    pub observed: f64,
    pub fitted: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// Result of an ordinary least-squares fit `y = slope * x + intercept`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Half-width of the band; `None` with fewer than three points
    pub band: Option<f64>,
    pub points: Vec<FitPoint>,
}

impl LinearFit {
    /// Fit a line through `(x, y)` points.
    ///
    /// Returns `None` for fewer than two points or when every x is equal.
    pub fn fit(data: &[(f64, f64)]) -> Option<Self> {
        if data.len() < 2 {
            return None;
        }

        let n = data.len() as f64;
        let sum_x: f64 = data.iter().map(|(x, _)| x).sum();
        let sum_y: f64 = data.iter().map(|(_, y)| y).sum();
        let sum_xy: f64 = data.iter().map(|(x, y)| x * y).sum();
        let sum_x_squared: f64 = data.iter().map(|(x, _)| x.powi(2)).sum();

        let denominator = n * sum_x_squared - sum_x.powi(2);
        if denominator.abs() < f64::EPSILON {
            return None;
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;
        let band = residual_band(data, slope, intercept);

        let points = data
            .iter()
            .map(|&(x, observed)| {
                let fitted = slope * x + intercept;
                FitPoint {
                    x,
                    observed,
                    fitted,
                    lower: band.map(|b| fitted - b),
                    upper: band.map(|b| fitted + b),
                }
            })
            .collect();

        Some(Self {
            slope,
            intercept,
            band,
            points,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Smallest and largest x of the fitted data
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?.x;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (lo.min(p.x), hi.max(p.x))
        }))
    }
}

fn residual_band(data: &[(f64, f64)], slope: f64, intercept: f64) -> Option<f64> {
    if data.len() < 3 {
        return None;
    }
    let residual_sum_squares: f64 = data
        .iter()
        .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
        .sum();
    let standard_error = (residual_sum_squares / (data.len() as f64 - 2.0)).sqrt();
    Some(BAND_Z * standard_error)
}

/// Fit calls-per-month over the months that have any calls.
///
/// Months with no records are left out rather than fitted as zero.
pub fn monthly_trend(by_month: &Series) -> Option<LinearFit> {
    let data: Vec<(f64, f64)> = by_month
        .points()
        .iter()
        .filter(|(_, count)| *count > 0)
        .filter_map(|(key, count)| key.as_number().map(|x| (x, *count as f64)))
        .collect();

    let fit = LinearFit::fit(&data);
    match &fit {
        Some(fit) => debug!(
            slope = fit.slope,
            intercept = fit.intercept,
            months = data.len(),
            "Fitted monthly trend"
        ),
        None => debug!(months = data.len(), "Not enough months for a trend line"),
    }
    fit
}
