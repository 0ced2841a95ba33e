use super::band::{self, UncertaintyBand};
use super::series::{BinRecord, BinSeries};
use super::method::StatOptions;
use std::slice;

/// Whether a ratio (or band) value could be computed for a bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinStatus {
    #[default]
    Defined,
    /// The denominator of the bin was empty.  The value and errors of the bin
    /// are reported as 0 and should not be read as a measured zero.
    EmptyDenominator,
}

/// A single bin of a ratio with (possibly asymmetric) errors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatioPoint {
    pub content: f64,
    pub error_low: f64,
    pub error_high: f64,
    pub status: BinStatus,
}

impl RatioPoint {
    pub(crate) fn symmetric(content: f64, error: f64) -> Self {
        RatioPoint { content, error_low: error, error_high: error, status: BinStatus::Defined }
    }
    pub(crate) fn empty_denominator() -> Self {
        RatioPoint { content: 0.0, error_low: 0.0, error_high: 0.0, status: BinStatus::EmptyDenominator }
    }
    /// The mean of the low and high errors; the error itself for symmetric points.
    pub fn error(&self) -> f64 {
        0.5 * (self.error_low + self.error_high)
    }
    pub fn is_defined(&self) -> bool {
        self.status == BinStatus::Defined
    }
}

/// A bin-wise ratio, index-aligned with the series it was computed from.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatioResult {
    points: Vec<RatioPoint>,
}

impl RatioResult {
    pub(crate) fn from_points(points: Vec<RatioPoint>) -> Self {
        RatioResult { points }
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    pub fn points(&self) -> &[RatioPoint] {
        &self.points
    }
    pub fn iter(&self) -> slice::Iter<'_, RatioPoint> {
        self.points.iter()
    }
    pub fn contents(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.content).collect()
    }
    /// The symmetric error of each bin, see [RatioPoint::error].
    pub fn errors(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.error()).collect()
    }
    /// Count the bins whose denominator was empty.
    pub fn undefined_count(&self) -> usize {
        self.points.iter().filter(|p| !p.is_defined()).count()
    }
}

impl<'a> IntoIterator for &'a RatioResult {
    type Item = &'a RatioPoint;
    type IntoIter = slice::Iter<'a, RatioPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

fn quotient(num: &BinRecord, den: &BinRecord) -> Option<f64> {
    if den.content == 0.0 {
        None
    } else {
        Some(num.content / den.content)
    }
}

/// This function divides `numerator` by `denominator` bin by bin.
///
/// The error of each bin is propagated from both input errors as for a
/// quotient of independent quantities:
///
/// > σ = hypot(σₙ / d, σ_d · (n/d) / d)
///
/// Bins with an empty denominator have content and error 0 and are marked
/// [BinStatus::EmptyDenominator].
pub fn plain_ratio(numerator: &BinSeries, denominator: &BinSeries) -> Result<RatioResult, super::Error> {
    BinSeries::check_lengths(numerator, denominator)?;
    log::debug!("plain ratio over {} bins", numerator.len());
    let points = numerator
        .iter()
        .zip(denominator.iter())
        .enumerate()
        .map(|(i, (num, den))| match quotient(num, den) {
            Some(content) => {
                let error = (num.error / den.content).hypot(den.error * content / den.content);
                RatioPoint::symmetric(content, error)
            }
            None => {
                log::trace!("bin {}: empty denominator", i);
                RatioPoint::empty_denominator()
            }
        })
        .collect();
    Ok(RatioResult::from_points(points))
}

/// This function divides `numerator` by `denominator`, keeping only the
/// numerator's statistical uncertainty on the ratio points.
///
/// The error of bin `i` is `ratio[i] / sqrt(numerator[i])`, the ratio
/// scaled by the relative Poisson error of the numerator count, or 0 when
/// the numerator is not positive.  The denominator's uncertainty is returned
/// instead as a relative band around 1.0, scaled by `sqrt(mc_scale)`.
pub fn stat_ratio(
    numerator: &BinSeries,
    denominator: &BinSeries,
    options: &StatOptions,
) -> Result<(RatioResult, UncertaintyBand), super::Error> {
    BinSeries::check_lengths(numerator, denominator)?;
    options.validate()?;
    log::debug!("stat ratio over {} bins (mc_scale={})", numerator.len(), options.mc_scale());
    let points = numerator
        .iter()
        .zip(denominator.iter())
        .map(|(num, den)| match quotient(num, den) {
            Some(content) => {
                let error = if num.content > 0.0 { content / num.content.sqrt() } else { 0.0 };
                RatioPoint::symmetric(content, error)
            }
            None => RatioPoint::empty_denominator(),
        })
        .collect();
    let band = band::relative_band(denominator, options.mc_scale().sqrt());
    Ok((RatioResult::from_points(points), band))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{den_error_band, Error};
    use approx::*;
    use rand::prelude::*;

    fn scenario() -> (BinSeries, BinSeries) {
        (series![(10, 3.16), (0, 0), (20, 4.47)], series![(5, 2.24), (5, 2.24), (0, 0)])
    }

    #[test]
    fn plain() -> Result<(), Error> {
        let (num, den) = scenario();
        let r = plain_ratio(&num, &den)?;
        assert_eq!(r.contents(), vec![2.0, 0.0, 0.0]);
        let expected = ((3.16f64 * 5.0).powi(2) + (2.24f64 * 10.0).powi(2)).sqrt() / 25.0;
        assert_relative_eq!(r.errors()[0], expected, epsilon = 1e-12);
        assert_eq!(r.errors()[1], 0.0);
        assert_eq!(r.points()[2].error(), 0.0);
        assert_eq!(r.points()[1].status, BinStatus::Defined);
        assert_eq!(r.points()[2].status, BinStatus::EmptyDenominator);
        assert_eq!(r.undefined_count(), 1);
        Ok(())
    }

    #[test]
    fn plain_matches_quotient() -> Result<(), Error> {
        let mut rng = rand::rng();
        let mut nums = vec![];
        let mut dens = vec![];
        for _ in 0..50 {
            nums.push(rng.random_range(0.0..100.0f64));
            dens.push(match rng.random::<u8>() % 4 { 0 => 0.0, _ => rng.random_range(1.0..100.0f64) });
        }
        let edges: Vec<f64> = (0..=50).map(|i| i as f64).collect();
        let num = BinSeries::with_poisson_errors(&edges, &nums)?;
        let den = BinSeries::with_poisson_errors(&edges, &dens)?;
        let r = plain_ratio(&num, &den)?;
        assert_eq!(r.len(), 50);
        for (i, p) in r.iter().enumerate() {
            if dens[i] > 0.0 {
                assert_eq!(p.content, nums[i] / dens[i]);
                assert!(p.is_defined());
            } else {
                assert_eq!(p.content, 0.0);
                assert_eq!(p.error(), 0.0);
                assert!(!p.is_defined());
            }
        }
        Ok(())
    }

    #[test]
    fn plain_extreme_magnitudes() -> Result<(), Error> {
        let num = BinSeries::from_edges(&[0.0, 1.0], &[1.0], &[1.0])?;
        let den = BinSeries::from_edges(&[0.0, 1.0], &[1e-90], &[1e-91])?;
        let tiny = plain_ratio(&num, &den)?.points()[0];
        assert_relative_eq!(tiny.content, 1e90, max_relative = 1e-12);
        assert!(tiny.error().is_finite());
        assert_relative_eq!(tiny.error(), 1e90 * 1.01f64.sqrt(), max_relative = 1e-12);

        let num = BinSeries::from_edges(&[0.0, 1.0], &[1e80], &[1e79])?;
        let den = BinSeries::from_edges(&[0.0, 1.0], &[1e80], &[1e79])?;
        let huge = plain_ratio(&num, &den)?.points()[0];
        assert_eq!(huge.content, 1.0);
        assert!(huge.error().is_finite());
        assert_relative_eq!(huge.error(), 0.02f64.sqrt(), max_relative = 1e-12);
        Ok(())
    }

    #[test]
    fn length_mismatch() {
        let num = series![1, 2, 3];
        let den = series![1, 2];
        assert!(matches!(plain_ratio(&num, &den), Err(Error::LengthMismatch { numerator: 3, denominator: 2 })));
        assert!(matches!(
            stat_ratio(&num, &den, &StatOptions::default()),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn stat() -> Result<(), Error> {
        let (num, den) = scenario();
        let (r, band) = stat_ratio(&num, &den, &StatOptions::default())?;
        assert_eq!(r.contents(), vec![2.0, 0.0, 0.0]);
        assert_relative_eq!(r.errors()[0], 2.0 / 10f64.sqrt(), epsilon = 1e-12);
        assert_eq!(r.errors()[1], 0.0);
        assert_eq!(r.errors()[2], 0.0);
        assert_eq!(band, den_error_band(&den));
        Ok(())
    }

    #[test]
    fn stat_mc_scale() -> Result<(), Error> {
        let (num, den) = scenario();
        let (_, band) = stat_ratio(&num, &den, &StatOptions::default().with_mc_scale(4.0))?;
        assert_relative_eq!(band.points()[0].rel_error_high, 2.0 * 2.24 / 5.0, epsilon = 1e-12);
        assert_relative_eq!(band.points()[0].rel_error_low, 2.0 * 2.24 / 5.0, epsilon = 1e-12);
        assert_eq!(band.points()[2].rel_error_high, 0.0);
        assert!(stat_ratio(&num, &den, &StatOptions::default().with_mc_scale(-1.0)).is_err());
        Ok(())
    }

    #[test]
    fn stat_error_ignores_denominator_error() -> Result<(), Error> {
        let mut rng = rand::rng();
        let num = series![(12, 3.5), (7, 2.6), (0, 0), (30, 5.5)];
        let den = series![(6, 2.4), (9, 3), (4, 2), (15, 3.9)];
        let (reference, _) = stat_ratio(&num, &den, &StatOptions::default())?;
        for _ in 0..10 {
            let shuffled: Vec<f64> = den.iter().map(|_| rng.random_range(0.0..10.0)).collect();
            let edges: Vec<f64> = (0..=den.len()).map(|i| i as f64).collect();
            let other = BinSeries::from_edges(&edges, &den.contents(), &shuffled)?;
            let (r, _) = stat_ratio(&num, &other, &StatOptions::default())?;
            assert_eq!(r.errors(), reference.errors());
        }
        Ok(())
    }
}
