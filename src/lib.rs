//! Bin-wise ratios of histograms with statistical and Bayesian uncertainty bands.
//!
//! Use this crate to compute the lower "ratio panel" of a comparison plot:
//! the per-bin quotient of a numerator and a denominator distribution, its
//! uncertainty, and the relative uncertainty band of the denominator drawn
//! around 1.0.  Rendering is left to the caller.
//!
//! # Examples
//!
//! ```
//! use histratio::{BinSeries, RatioMethod, StatOptions};
//!
//! let edges = [0.0, 1.0, 2.0, 3.0];
//! let data = BinSeries::with_poisson_errors(&edges, &[10.0, 0.0, 20.0])?;
//! let mc = BinSeries::from_edges(&edges, &[5.0, 5.0, 0.0], &[2.24, 2.24, 0.0])?;
//!
//! let plot = histratio::compute(&data, &mc, &RatioMethod::Stat(StatOptions::default()))?;
//! assert_eq!(plot.ratio.contents(), vec![2.0, 0.0, 0.0]);
//! assert!(plot.band.is_some());
//! # Ok::<(), histratio::Error>(())
//! ```
#[macro_use]
mod series;
mod ratio;
mod band;
mod bayes;
mod method;
mod serde;
use thiserror;

pub use series::BinRecord;
pub use series::BinSeries;
pub use ratio::{plain_ratio, stat_ratio, BinStatus, RatioPoint, RatioResult};
pub use band::{den_error_band, BandPoint, UncertaintyBand, REFERENCE_VALUE};
pub use bayes::{bayes_ratio, BayesOptions, Interval, PointEstimate};
pub use method::{compute, RatioMethod, RatioPlot, StatOptions};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("series length mismatch: numerator has {numerator} bins, denominator has {denominator}")]
    LengthMismatch { numerator: usize, denominator: usize },
    #[error("{edges} edges cannot bound {bins} bins")]
    EdgeCount { edges: usize, bins: usize },
    #[error("invalid bin {index}: {reason}")]
    InvalidBin { index: usize, reason: String },
    #[error("invalid counts in bin {index}: {numerator} of {denominator}")]
    InvalidCounts { index: usize, numerator: f64, denominator: f64 },
    #[error("invalid option: {}", .0)]
    InvalidOption(String),
}
