//! Builds the data behind an attribute-vs-attribute scatter plot: binned
//! aggregated points plus a trend line over the raw samples. Rendering is
//! left to the consumer.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::catalog::{CatalogStore, Column};
use crate::trend::{BinnedSeries, LineFit, aggregate, fit_line};

/// Everything a renderer needs to draw the scatter plot and its overlaid
/// trend line.
#[derive(Debug, Clone, Serialize)]
pub struct PlotData {
    pub generated_at: DateTime<Utc>,
    pub x_label: String,
    pub y_label: String,
    pub sample_count: usize,
    pub binned: BinnedSeries,
    pub fit: LineFit,
    /// Trend line endpoints at the extremes of the raw x data.
    pub trend_x: [f64; 2],
    pub trend_y: [f64; 2],
}

/// Pulls sample pairs for the chosen columns from the store, aggregates
/// them into bins, and fits the trend line over the unbinned data.
///
/// # Errors
///
/// Fails if either column is non-numeric, if no row has both values
/// present, or if the regression is undefined (all x identical).
pub fn build_plot(
    store: &dyn CatalogStore,
    x: Column,
    y: Column,
    bin_count: u32,
) -> Result<PlotData> {
    if !x.is_numeric() || !y.is_numeric() {
        bail!(
            "cannot plot text columns (got {} and {})",
            x.sql_name(),
            y.sql_name()
        );
    }

    let pairs = store.sample_pairs(x, y)?;
    if pairs.is_empty() {
        bail!(
            "no catalog rows have both {} and {} present",
            x.sql_name(),
            y.sql_name()
        );
    }

    let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();

    let binned = aggregate(&xs, &ys, bin_count)
        .with_context(|| format!("aggregating {} against {}", y.sql_name(), x.sql_name()))?;
    let fit = fit_line(&xs, &ys)
        .with_context(|| format!("fitting trend line for {} against {}", y.sql_name(), x.sql_name()))?;

    let x_min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    info!(
        x = x.sql_name(),
        y = y.sql_name(),
        samples = xs.len(),
        slope = fit.slope,
        r_value = fit.r_value,
        "Plot data computed"
    );

    Ok(PlotData {
        generated_at: Utc::now(),
        x_label: x.label().to_string(),
        y_label: y.label().to_string(),
        sample_count: xs.len(),
        binned,
        fit,
        trend_x: [x_min, x_max],
        trend_y: [fit.y_at(x_min), fit.y_at(x_max)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ExoplanetRecord, SqliteCatalog};

    fn planet(name: &str, rade: f64, masse: f64) -> ExoplanetRecord {
        ExoplanetRecord {
            pl_name: Some(name.to_string()),
            pl_rade: Some(rade),
            pl_masse: Some(masse),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_plot_happy_path() {
        let mut store = SqliteCatalog::in_memory().unwrap();
        store
            .insert_records(&[
                planet("a", 1.0, 2.0),
                planet("b", 2.0, 4.0),
                planet("c", 3.0, 6.0),
                planet("d", 4.0, 8.0),
            ])
            .unwrap();

        let data = build_plot(&store, Column::PlRade, Column::PlMasse, 2).unwrap();

        assert_eq!(data.sample_count, 4);
        assert_eq!(data.binned.means, vec![3.0, 7.0]);
        assert!((data.fit.slope - 2.0).abs() < 1e-12);
        assert_eq!(data.trend_x, [1.0, 4.0]);
        assert!((data.trend_y[0] - 2.0).abs() < 1e-9);
        assert!((data.trend_y[1] - 8.0).abs() < 1e-9);
        assert_eq!(data.x_label, "Radius (Earth radii)");
    }

    #[test]
    fn test_build_plot_skips_incomplete_rows() {
        let mut store = SqliteCatalog::in_memory().unwrap();
        let mut partial = planet("partial", 1.5, 0.0);
        partial.pl_masse = None;
        store
            .insert_records(&[partial, planet("a", 1.0, 2.0), planet("b", 3.0, 6.0)])
            .unwrap();

        let data = build_plot(&store, Column::PlRade, Column::PlMasse, 4).unwrap();
        assert_eq!(data.sample_count, 2);
    }

    #[test]
    fn test_build_plot_empty_result_set() {
        let store = SqliteCatalog::in_memory().unwrap();
        assert!(build_plot(&store, Column::PlRade, Column::PlMasse, 10).is_err());
    }

    #[test]
    fn test_build_plot_rejects_text_column() {
        let store = SqliteCatalog::in_memory().unwrap();
        assert!(build_plot(&store, Column::PlName, Column::PlMasse, 10).is_err());
    }

    #[test]
    fn test_build_plot_degenerate_regression() {
        let mut store = SqliteCatalog::in_memory().unwrap();
        store
            .insert_records(&[planet("a", 2.0, 1.0), planet("b", 2.0, 3.0)])
            .unwrap();

        assert!(build_plot(&store, Column::PlRade, Column::PlMasse, 5).is_err());
    }
}
