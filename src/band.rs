use super::ratio::BinStatus;
use super::series::BinSeries;
use std::slice;

/// The y-value every band point is centered on.
pub const REFERENCE_VALUE: f64 = 1.0;

/// A box of relative uncertainty around [REFERENCE_VALUE] spanning one bin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BandPoint {
    pub center: f64,
    /// Always [REFERENCE_VALUE].
    pub value: f64,
    pub low_width: f64,
    pub high_width: f64,
    pub rel_error_low: f64,
    pub rel_error_high: f64,
    pub status: BinStatus,
}

impl BandPoint {
    /// The lower boundary of the band.
    pub fn lower(&self) -> f64 {
        self.value - self.rel_error_low
    }
    /// The upper boundary of the band.
    pub fn upper(&self) -> f64 {
        self.value + self.rel_error_high
    }
}

/// A relative-error envelope around 1.0, one point per bin.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UncertaintyBand {
    points: Vec<BandPoint>,
}

impl UncertaintyBand {
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    pub fn points(&self) -> &[BandPoint] {
        &self.points
    }
    pub fn iter(&self) -> slice::Iter<'_, BandPoint> {
        self.points.iter()
    }
    /// The symmetric relative error of each bin.
    pub fn rel_errors(&self) -> Vec<f64> {
        self.points.iter().map(|p| 0.5 * (p.rel_error_low + p.rel_error_high)).collect()
    }
}

impl<'a> IntoIterator for &'a UncertaintyBand {
    type Item = &'a BandPoint;
    type IntoIter = slice::Iter<'a, BandPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Builds the band `error / content * scale` around 1.0 for each bin of
/// `denominator`, with 0 for bins whose content is not positive.
pub(crate) fn relative_band(denominator: &BinSeries, scale: f64) -> UncertaintyBand {
    let points = denominator
        .iter()
        .enumerate()
        .map(|(i, bin)| {
            let (rel_error, status) = if bin.content > 0.0 {
                (bin.error / bin.content * scale, BinStatus::Defined)
            } else {
                log::trace!("bin {}: no band for content {}", i, bin.content);
                (0.0, BinStatus::EmptyDenominator)
            };
            BandPoint {
                center: bin.center,
                value: REFERENCE_VALUE,
                low_width: bin.low_width(),
                high_width: bin.high_width(),
                rel_error_low: rel_error,
                rel_error_high: rel_error,
                status,
            }
        })
        .collect();
    UncertaintyBand { points }
}

/// This function builds the relative uncertainty band of `denominator`.
///
/// Bin `i` of the band is centered on 1.0 with a symmetric half-height of
/// `error[i] / content[i]` (0 for empty bins) and spans the full bin
/// horizontally.
pub fn den_error_band(denominator: &BinSeries) -> UncertaintyBand {
    log::debug!("denominator error band over {} bins", denominator.len());
    relative_band(denominator, 1.0)
}
