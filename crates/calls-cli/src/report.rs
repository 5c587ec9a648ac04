//! Plain-text summary printed after a run

use crate::pipeline::RunOutcome;
use calls_analysis::{FrequencyEntry, StatsSummary};
use std::fmt::{self, Write};

/// Render the console report for a finished run
pub fn render(outcome: &RunOutcome) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    if write_report(&mut out, outcome).is_err() {
        out.clear();
    }
    out
}

/// Write the full report into `out`
pub fn write_report(out: &mut impl Write, outcome: &RunOutcome) -> fmt::Result {
    write_summary(out, &outcome.results.summary)?;

    writeln!(out, "\nCalls by reason:")?;
    for (reason, count) in outcome.results.by_reason.points() {
        writeln!(out, "  {reason:<12} {count:>8}")?;
    }
    if outcome.whole_title_reasons > 0 {
        writeln!(
            out,
            "  ({} title(s) had no ':' and were used whole)",
            outcome.whole_title_reasons
        )?;
    }

    if let Some(fit) = &outcome.results.monthly_trend {
        writeln!(
            out,
            "\nMonthly trend: {:+.2} calls per month (intercept {:.2})",
            fit.slope, fit.intercept
        )?;
    }

    if !outcome.charts.is_empty() {
        writeln!(out, "\nCharts:")?;
        for path in &outcome.charts {
            writeln!(out, "  {}", path.display())?;
        }
    }
    if let Some(path) = &outcome.summary_json {
        writeln!(out, "\nSummary written to {}", path.display())?;
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, summary: &StatsSummary) -> fmt::Result {
    writeln!(out, "Total records: {}", summary.total_records)?;

    write_top(out, "Top zip codes", &summary.top_zips)?;
    write_top(out, "Top townships", &summary.top_townships)?;

    writeln!(out, "\nDistinct titles: {}", summary.distinct_titles)?;

    writeln!(out, "\nColumns:")?;
    writeln!(out, "  {:<10} {:>10}  {}", "column", "non-null", "type")?;
    for column in &summary.columns {
        writeln!(
            out,
            "  {:<10} {:>10}  {}",
            column.name, column.non_null, column.kind
        )?;
    }
    Ok(())
}

fn write_top(out: &mut impl Write, heading: &str, entries: &[FrequencyEntry]) -> fmt::Result {
    writeln!(out, "\n{heading}:")?;
    if entries.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for entry in entries {
        writeln!(out, "  {:<20} {:>8}", entry.value, entry.count)?;
    }
    Ok(())
}
