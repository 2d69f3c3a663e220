//! Binned aggregation and trend fitting for scatter plots.
//!
//! Both entry points are pure: [`aggregate`] reduces a sample set to one
//! mean per fixed-width bin for rendering, and [`fit_line`] computes an
//! ordinary-least-squares line over the raw (unbinned) samples.

use serde::Serialize;
use thiserror::Error;

/// Widens the bin range so the extreme x values fall strictly inside the
/// first and last bin instead of on a boundary.
const RANGE_EPSILON: f64 = 1e-6;

/// Default number of bins used by the plot pipeline.
pub const DEFAULT_BIN_COUNT: u32 = 200;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrendError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("regression is undefined: fewer than 2 distinct x values")]
    UndefinedRegression,
}

/// One aggregated series: a bin center and the mean y of the samples that
/// landed in that bin. Bins that received no samples report a mean of
/// exactly `0.0`; renderers that want to skip them must do so themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinnedSeries {
    pub centers: Vec<f64>,
    pub means: Vec<f64>,
}

/// Ordinary-least-squares fit over the full sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_value: f64,
    pub p_value: f64,
    pub std_err: f64,
}

impl LineFit {
    /// Evaluates the fitted line at `x`.
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

fn check_input(x: &[f64], y: &[f64]) -> Result<(), TrendError> {
    if x.is_empty() || y.is_empty() {
        return Err(TrendError::InvalidInput("empty sample sequence"));
    }
    if x.len() != y.len() {
        return Err(TrendError::InvalidInput("x and y lengths differ"));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(TrendError::InvalidInput("non-finite sample value"));
    }
    Ok(())
}

/// Partitions `[min(x) - 1e-6, max(x) + 1e-6)` into `bin_count` equal-width
/// bins and returns each bin's center together with the mean y of the
/// samples assigned to it.
///
/// A sample belongs to the bin whose upper edge is the first boundary
/// strictly greater than its x value. Empty bins report a mean of `0.0`.
///
/// # Errors
///
/// Returns [`TrendError::InvalidInput`] for empty input, mismatched
/// lengths, non-finite values, or `bin_count == 0`.
pub fn aggregate(x: &[f64], y: &[f64], bin_count: u32) -> Result<BinnedSeries, TrendError> {
    check_input(x, y)?;
    if bin_count == 0 {
        return Err(TrendError::InvalidInput("bin_count must be at least 1"));
    }

    let lo = x.iter().copied().fold(f64::INFINITY, f64::min) - RANGE_EPSILON;
    let hi = x.iter().copied().fold(f64::NEG_INFINITY, f64::max) + RANGE_EPSILON;

    let bins = bin_count as usize;
    let width = (hi - lo) / bin_count as f64;

    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let centers: Vec<f64> = edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();

    let mut sums = vec![0.0f64; bins];
    let mut counts = vec![0u64; bins];

    for (&xi, &yi) in x.iter().zip(y) {
        // First edge strictly greater than xi, minus one. edges[0] <= xi
        // always holds, so the subtraction cannot underflow; the clamp
        // covers x values that land on the widened upper boundary after
        // rounding.
        let idx = (edges.partition_point(|&e| e <= xi) - 1).min(bins - 1);
        sums[idx] += yi;
        counts[idx] += 1;
    }

    let means = sums
        .iter()
        .zip(&counts)
        .map(|(&sum, &count)| if count > 0 { sum / count as f64 } else { 0.0 })
        .collect();

    Ok(BinnedSeries { centers, means })
}

/// Fits a least-squares line over the raw samples using centered two-pass
/// moments, returning slope, intercept, Pearson r, the two-sided p-value
/// of the slope, and the standard error of the slope estimate.
///
/// With exactly two samples the fit has zero degrees of freedom; the
/// p-value is reported as `1.0` and the standard error as `0.0`.
///
/// # Errors
///
/// Returns [`TrendError::InvalidInput`] for empty input, mismatched
/// lengths, or non-finite values, and [`TrendError::UndefinedRegression`]
/// when fewer than 2 distinct x values are present (the slope would be
/// undefined).
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LineFit, TrendError> {
    check_input(x, y)?;

    let n = x.len();
    if n < 2 {
        return Err(TrendError::UndefinedRegression);
    }

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let mut ssx = 0.0;
    let mut ssy = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        ssx += dx * dx;
        ssy += dy * dy;
        sxy += dx * dy;
    }

    if ssx == 0.0 {
        return Err(TrendError::UndefinedRegression);
    }

    let slope = sxy / ssx;
    let intercept = mean_y - slope * mean_x;
    let r_value = if ssy == 0.0 {
        0.0
    } else {
        (sxy / (ssx * ssy).sqrt()).clamp(-1.0, 1.0)
    };

    let df = (n - 2) as f64;
    let (p_value, std_err) = if n == 2 {
        (1.0, 0.0)
    } else if 1.0 - r_value * r_value <= 0.0 {
        // Perfect fit: the t statistic diverges.
        (0.0, 0.0)
    } else {
        let t = r_value * (df / ((1.0 - r_value) * (1.0 + r_value))).sqrt();
        let p = students_t_two_sided(t, df);
        let se = ((1.0 - r_value * r_value) * ssy / ssx / df).sqrt();
        (p, se)
    };

    Ok(LineFit {
        slope,
        intercept,
        r_value,
        p_value,
        std_err,
    })
}

/// Two-sided p-value of a Student-t statistic with `df` degrees of
/// freedom, via the regularized incomplete beta function.
fn students_t_two_sided(t: f64, df: f64) -> f64 {
    inc_beta(df / 2.0, 0.5, df / (df + t * t)).clamp(0.0, 1.0)
}

fn ln_gamma(x: f64) -> f64 {
    const COF: [f64; 6] = [
        76.18009172947146,
        -86.50532032941677,
        24.01409824083091,
        -1.231739572450155,
        0.1208650973866179e-2,
        -0.5395239384953e-5,
    ];
    let mut y = x;
    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut ser = 1.000000000190015;
    for c in COF {
        y += 1.0;
        ser += c / y;
    }
    -tmp + (2.5066282746310005 * ser / x).ln()
}

/// Regularized incomplete beta function I_x(a, b).
fn inc_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let front =
        (ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln()).exp();
    // The continued fraction converges fastest for x below the mean of the
    // distribution; use the symmetry relation otherwise.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_cf(a, b, x) / a
    } else {
        1.0 - front * beta_cf(b, a, 1.0 - x) / b
    }
}

/// Lentz continued-fraction evaluation backing [`inc_beta`].
fn beta_cf(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 200;
    const EPS: f64 = 3.0e-14;
    const FLOOR: f64 = 1.0e-300;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < FLOOR {
        d = FLOOR;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < FLOOR {
            d = FLOOR;
        }
        c = 1.0 + aa / c;
        if c.abs() < FLOOR {
            c = FLOOR;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < FLOOR {
            d = FLOOR;
        }
        c = 1.0 + aa / c;
        if c.abs() < FLOOR {
            c = FLOOR;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;

        if (del - 1.0).abs() < EPS {
            break;
        }
    }

    h
}
