use super::band::{den_error_band, UncertaintyBand};
use super::bayes::{bayes_ratio, BayesOptions};
use super::ratio::{plain_ratio, stat_ratio, RatioResult};
use super::series::BinSeries;

/// Options for [stat_ratio](crate::stat_ratio).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatOptions {
    pub mc_scale: Option<f64>,
}

impl StatOptions {
    /// The factor by which the simulated sample was scaled to the data,
    /// 1.0 by default.  The band is widened by its square root.
    pub fn mc_scale(&self) -> f64 {
        self.mc_scale.unwrap_or(1.0)
    }
    pub fn with_mc_scale(mut self, scale: f64) -> Self {
        self.mc_scale = Some(scale);
        self
    }
    pub fn validate(&self) -> Result<(), super::Error> {
        match self.mc_scale() {
            s if s.is_finite() && s >= 0.0 => Ok(()),
            s => Err(super::Error::InvalidOption(format!("mc_scale {} must be finite and non-negative", s))),
        }
    }
}

/// The RatioMethod selects how the ratio panel of a comparison is built.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RatioMethod {
    /// Ratio with errors from both inputs, no band.
    #[default]
    Plain,
    /// Ratio with errors from both inputs, plus the denominator's relative band.
    DenominatorBand,
    /// Ratio with numerator-only errors, plus the scaled denominator band.
    Stat(StatOptions),
    /// Bayesian ratio of counts with asymmetric errors, no band.
    Bayes(BayesOptions),
}

/// The ratio points and optional band of a ratio panel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatioPlot {
    pub ratio: RatioResult,
    pub band: Option<UncertaintyBand>,
}

/// This function computes the ratio of `numerator` to `denominator`, and
/// the band drawn with it, using `method`.
pub fn compute(
    numerator: &BinSeries,
    denominator: &BinSeries,
    method: &RatioMethod,
) -> Result<RatioPlot, super::Error> {
    match method {
        RatioMethod::Plain => Ok(RatioPlot {
            ratio: plain_ratio(numerator, denominator)?,
            band: None,
        }),
        RatioMethod::DenominatorBand => Ok(RatioPlot {
            ratio: plain_ratio(numerator, denominator)?,
            band: Some(den_error_band(denominator)),
        }),
        RatioMethod::Stat(options) => {
            let (ratio, band) = stat_ratio(numerator, denominator, options)?;
            Ok(RatioPlot { ratio, band: Some(band) })
        }
        RatioMethod::Bayes(options) => Ok(RatioPlot {
            ratio: bayes_ratio(numerator, denominator, options)?,
            band: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn scenario() -> (BinSeries, BinSeries) {
        (series![(10, 3.16), (0, 0), (20, 4.47)], series![(5, 2.24), (5, 2.24), (0, 0)])
    }

    #[test]
    fn dispatch() -> Result<(), Error> {
        let (num, den) = scenario();
        let plain = compute(&num, &den, &RatioMethod::default())?;
        assert_eq!(plain.ratio, plain_ratio(&num, &den)?);
        assert!(plain.band.is_none());

        let banded = compute(&num, &den, &RatioMethod::DenominatorBand)?;
        assert_eq!(banded.ratio, plain.ratio);
        assert_eq!(banded.band, Some(den_error_band(&den)));

        let stat = compute(&num, &den, &RatioMethod::Stat(StatOptions::default()))?;
        assert_eq!(stat.ratio.contents(), plain.ratio.contents());
        assert_ne!(stat.ratio.errors(), plain.ratio.errors());
        assert_eq!(stat.band, banded.band);
        Ok(())
    }

    #[test]
    fn dispatch_bayes() -> Result<(), Error> {
        let num = series![2, 5, 0];
        let den = series![4, 5, 0];
        let plot = compute(&num, &den, &RatioMethod::Bayes(BayesOptions::default()))?;
        assert!(plot.band.is_none());
        assert_eq!(plot.ratio.contents(), vec![0.5, 1.0, 0.0]);
        assert_eq!(plot.ratio.undefined_count(), 1);
        Ok(())
    }

    #[test]
    fn options() {
        assert_eq!(StatOptions::default().mc_scale(), 1.0);
        assert_eq!(StatOptions::default().with_mc_scale(2.5).mc_scale(), 2.5);
        assert!(StatOptions::default().with_mc_scale(f64::NAN).validate().is_err());
        assert!(StatOptions::default().with_mc_scale(0.0).validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn method_from_json() -> Result<(), serde_json::Error> {
        let m: RatioMethod = serde_json::from_str(r#"{"Stat": {"mc_scale": 4.0}}"#)?;
        assert_eq!(m, RatioMethod::Stat(StatOptions::default().with_mc_scale(4.0)));
        let m: RatioMethod = serde_json::from_str(r#"{"Bayes": {"confidence_level": 0.95}}"#)?;
        assert_eq!(m, RatioMethod::Bayes(BayesOptions::default().with_confidence_level(0.95)));
        let m: RatioMethod = serde_json::from_str(r#""DenominatorBand""#)?;
        assert_eq!(m, RatioMethod::DenominatorBand);
        Ok(())
    }
}
