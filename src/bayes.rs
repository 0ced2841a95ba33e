use super::ratio::{RatioPoint, RatioResult};
use super::series::BinSeries;
use probability::prelude::{Beta, Inverse};

const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.683;
const DEFAULT_PRIOR: (f64, f64) = (1.0, 1.0);
const GOLDEN_TOLERANCE: f64 = 1e-10;
const GOLDEN_MAX_ITERATIONS: usize = 200;

/// The interval reported around the point estimate of a Bayesian ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interval {
    /// The narrowest interval holding the requested posterior probability.
    Shortest,
    /// The interval leaving equal posterior probability in both tails.
    Central,
}

/// The statistic of the posterior used as the ratio value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointEstimate {
    Mode,
    Mean,
}

/// Options for [bayes_ratio].
///
/// Every option left as `None` takes its documented default, which together
/// reproduce the classic Bayesian division: a uniform prior, the posterior
/// mode, and the shortest 68.3% interval.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BayesOptions {
    pub confidence_level: Option<f64>,
    pub prior: Option<(f64, f64)>,
    pub interval: Option<Interval>,
    pub point: Option<PointEstimate>,
}

impl BayesOptions {
    /// The posterior probability held by the interval, 0.683 by default.
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level.unwrap_or(DEFAULT_CONFIDENCE_LEVEL)
    }
    /// The `(alpha, beta)` parameters of the Beta prior, `(1, 1)` by default.
    pub fn prior(&self) -> (f64, f64) {
        self.prior.unwrap_or(DEFAULT_PRIOR)
    }
    /// [Interval::Shortest] by default.
    pub fn interval(&self) -> Interval {
        self.interval.unwrap_or(Interval::Shortest)
    }
    /// [PointEstimate::Mode] by default.
    pub fn point(&self) -> PointEstimate {
        self.point.unwrap_or(PointEstimate::Mode)
    }
    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = Some(level);
        self
    }
    pub fn with_prior(mut self, alpha: f64, beta: f64) -> Self {
        self.prior = Some((alpha, beta));
        self
    }
    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = Some(interval);
        self
    }
    pub fn with_point(mut self, point: PointEstimate) -> Self {
        self.point = Some(point);
        self
    }
    pub fn validate(&self) -> Result<(), super::Error> {
        let cl = self.confidence_level();
        if !(cl > 0.0 && cl < 1.0) {
            return Err(super::Error::InvalidOption(format!("confidence level {} outside of (0,1)", cl)));
        }
        let (alpha, beta) = self.prior();
        if !(alpha.is_finite() && alpha > 0.0 && beta.is_finite() && beta > 0.0) {
            return Err(super::Error::InvalidOption(format!("prior ({}, {}) must be positive", alpha, beta)));
        }
        Ok(())
    }
}

/// The mode of Beta(a, b), taking the boundary when the density is monotone.
fn beta_mode(a: f64, b: f64) -> f64 {
    if a > 1.0 && b > 1.0 {
        (a - 1.0) / (a + b - 2.0)
    } else if a < b {
        0.0
    } else if a > b {
        1.0
    } else {
        0.5
    }
}

fn central_interval(posterior: &Beta, level: f64) -> (f64, f64) {
    (posterior.inverse(0.5 * (1.0 - level)), posterior.inverse(0.5 * (1.0 + level)))
}

/// Find the lower tail probability `p` minimizing `q(p + level) - q(p)` by
/// golden-section search on `[0, 1 - level]`.
fn shortest_interval(posterior: &Beta, a: f64, b: f64, level: f64) -> (f64, f64) {
    if a <= 1.0 {
        return (0.0, posterior.inverse(level));
    }
    if b <= 1.0 {
        return (posterior.inverse(1.0 - level), 1.0);
    }
    if a == b {
        return central_interval(posterior, level);
    }
    let width = |p: f64| posterior.inverse(p + level) - posterior.inverse(p);
    let inv_phi = 0.5 * (5f64.sqrt() - 1.0);
    let (mut lo, mut hi) = (0.0, 1.0 - level);
    let mut x1 = hi - inv_phi * (hi - lo);
    let mut x2 = lo + inv_phi * (hi - lo);
    let (mut f1, mut f2) = (width(x1), width(x2));
    for _ in 0..GOLDEN_MAX_ITERATIONS {
        if hi - lo < GOLDEN_TOLERANCE {
            break;
        }
        if f1 < f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - inv_phi * (hi - lo);
            f1 = width(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + inv_phi * (hi - lo);
            f2 = width(x2);
        }
    }
    let p = 0.5 * (lo + hi);
    let (lower, upper) = (posterior.inverse(p), posterior.inverse(p + level));
    if lower.is_finite() && upper.is_finite() && lower <= upper {
        (lower, upper)
    } else {
        log::warn!("shortest interval search failed for Beta({}, {}); using central interval", a, b);
        central_interval(posterior, level)
    }
}

/// This function computes the Bayesian ratio of `numerator` counts out of
/// `denominator` counts with asymmetric errors.
///
/// The posterior of the ratio in bin `i` is `Beta(k + alpha, n - k + beta)`
/// where `k` and `n` are the numerator and denominator contents.  The ratio
/// point is the posterior mode (or mean) and the errors reach to the bounds
/// of the requested credible interval, so both stay within `[0, 1]`.
///
/// Bins with an empty denominator have content and errors 0 and are marked
/// [crate::BinStatus::EmptyDenominator].  Negative counts, or a numerator
/// exceeding a non-empty denominator, are rejected.
///
/// ```
/// use histratio::{bayes_ratio, BayesOptions, BinSeries};
///
/// let edges = [0.0, 1.0, 2.0];
/// let pass = BinSeries::with_poisson_errors(&edges, &[3.0, 10.0])?;
/// let total = BinSeries::with_poisson_errors(&edges, &[10.0, 10.0])?;
/// let r = bayes_ratio(&pass, &total, &BayesOptions::default())?;
/// assert!((r.points()[0].content - 0.3).abs() < 1e-12);
/// assert_eq!(r.points()[1].content, 1.0);
/// assert_eq!(r.points()[1].error_high, 0.0);
/// # Ok::<(), histratio::Error>(())
/// ```
pub fn bayes_ratio(
    numerator: &BinSeries,
    denominator: &BinSeries,
    options: &BayesOptions,
) -> Result<RatioResult, super::Error> {
    BinSeries::check_lengths(numerator, denominator)?;
    options.validate()?;
    let level = options.confidence_level();
    let (alpha, beta) = options.prior();
    log::debug!(
        "bayes ratio over {} bins (cl={}, prior=({}, {}), {:?} interval)",
        numerator.len(),
        level,
        alpha,
        beta,
        options.interval()
    );
    let points = numerator
        .iter()
        .zip(denominator.iter())
        .enumerate()
        .map(|(index, (num, den))| {
            let (k, n) = (num.content, den.content);
            if k < 0.0 || n < 0.0 || (n > 0.0 && k > n) {
                return Err(super::Error::InvalidCounts { index, numerator: k, denominator: n });
            }
            if n == 0.0 {
                log::trace!("bin {}: empty denominator", index);
                return Ok(RatioPoint::empty_denominator());
            }
            let (a, b) = (k + alpha, n - k + beta);
            let posterior = Beta::new(a, b, 0.0, 1.0);
            let value = match options.point() {
                PointEstimate::Mode => beta_mode(a, b),
                PointEstimate::Mean => a / (a + b),
            };
            let (lower, upper) = match options.interval() {
                Interval::Shortest => shortest_interval(&posterior, a, b, level),
                Interval::Central => central_interval(&posterior, level),
            };
            let (lower, upper) = (lower.min(value), upper.max(value));
            let mut point = RatioPoint::symmetric(value, 0.0);
            point.error_low = value - lower;
            point.error_high = upper - value;
            Ok(point)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RatioResult::from_points(points))
}
