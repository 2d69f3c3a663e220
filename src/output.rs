//! Output formatting and persistence for search results and plot data.
//!
//! Supports an aligned text table, CSV append, and JSON serialization.

use anyhow::Result;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

use crate::catalog::SearchHit;
use crate::plot::PlotData;
use csv::WriterBuilder;

const SEARCH_HEADERS: [&str; 5] = [
    "Planet Name",
    "Discovery Year",
    "Discovery Method",
    "Host Name",
    "Discovery Facility",
];

fn hit_cells(hit: &SearchHit) -> [String; 5] {
    [
        hit.pl_name.clone().unwrap_or_default(),
        hit.disc_year.map(|y| y.to_string()).unwrap_or_default(),
        hit.discoverymethod.clone().unwrap_or_default(),
        hit.hostname.clone().unwrap_or_default(),
        hit.disc_facility.clone().unwrap_or_default(),
    ]
}

/// Renders search hits as an aligned text table.
pub fn format_search_table(hits: &[SearchHit]) -> String {
    let rows: Vec<[String; 5]> = hits.iter().map(hit_cells).collect();

    let mut widths: [usize; 5] = SEARCH_HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    for (i, header) in SEARCH_HEADERS.iter().enumerate() {
        out.push_str(&format!("{:<width$}  ", header, width = widths[i]));
    }
    out.push('\n');
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            out.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
        }
        out.push('\n');
    }
    out
}

/// Prints search hits to stdout as an aligned table.
pub fn print_search_table(hits: &[SearchHit]) {
    print!("{}", format_search_table(hits));
}

/// Appends search hits as rows to a CSV file, writing the header only
/// when the file does not already exist.
pub fn append_search_csv(path: &str, hits: &[SearchHit]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending search results to CSV");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for hit in hits {
        writer.serialize(hit)?;
    }
    writer.flush()?;

    Ok(())
}

/// Prints any serializable value as pretty JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes plot data as a CSV of `bin_center,bin_mean` rows. The trend
/// line coefficients go into a leading comment row so a spreadsheet user
/// still sees them.
pub fn write_plot_csv(path: &str, plot: &PlotData) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(file);

    writer.write_record([
        format!("# slope={}", plot.fit.slope),
        format!("intercept={}", plot.fit.intercept),
        format!("r_value={}", plot.fit.r_value),
        format!("p_value={}", plot.fit.p_value),
        format!("std_err={}", plot.fit.std_err),
    ])?;
    writer.write_record(["bin_center", "bin_mean"])?;
    for (center, mean) in plot.binned.centers.iter().zip(&plot.binned.means) {
        writer.write_record([center.to_string(), mean.to_string()])?;
    }
    writer.flush()?;

    Ok(())
}
