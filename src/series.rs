use std::slice;

#[allow(unused_macros)]
macro_rules! br {
    ($i:expr, ($content:expr, $error:expr)) => (
        $crate::BinRecord::new($i as f64 + 0.5, $i as f64, $i as f64 + 1.0, $content as f64, $error as f64)
    );
    ($i:expr, ($content:expr)) => (
        $crate::BinRecord::new($i as f64 + 0.5, $i as f64, $i as f64 + 1.0, $content as f64, (($content as f64).abs()).sqrt())
    );
    ($i:expr, $content:expr) => ( br!($i, ($content)) )
}
#[allow(unused_macros)]
/// series! macro will turn a list of values into a [BinSeries] of unit-width bins.
///
/// Bin `i` spans `[i, i+1)`.  The values can be of the form `content`,
/// `(content)`, or `(content, error)`.  In the first two forms, the omitted
/// `error` defaults to the Poisson error `sqrt(|content|)`.
macro_rules! series {
    () => ( $crate::BinSeries::empty() );
    ($($bv:tt),+ $(,)?) => ( {
        let mut records = Vec::new();
        $( records.push(br!(records.len(), $bv)); )+
        $crate::BinSeries::new(records).expect("series! built an invalid series")
    } )
}

/// The statistics of a single histogram bin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinRecord {
    pub center: f64,
    pub low_edge: f64,
    pub high_edge: f64,
    pub content: f64,
    pub error: f64,
}

impl BinRecord {
    pub fn new(center: f64, low_edge: f64, high_edge: f64, content: f64, error: f64) -> Self {
        BinRecord { center, low_edge, high_edge, content, error }
    }
    /// Distance from the low edge to the center.
    pub fn low_width(&self) -> f64 {
        self.center - self.low_edge
    }
    /// Distance from the center to the high edge.
    pub fn high_width(&self) -> f64 {
        self.high_edge - self.center
    }
    fn check(&self) -> Result<(), &'static str> {
        let fields = [self.center, self.low_edge, self.high_edge, self.content, self.error];
        if !fields.iter().all(|v| v.is_finite()) {
            Err("non-finite value")
        } else if !(self.low_edge <= self.center && self.center <= self.high_edge) {
            Err("center outside of bin edges")
        } else if self.error < 0.0 {
            Err("negative error")
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
/// An immutable, ordered snapshot of per-bin statistics.
///
/// A [BinSeries] is what callers extract from their own histogram storage
/// before asking for a ratio.  Numerator and denominator series are
/// index-aligned: bin `i` of one corresponds to bin `i` of the other.
/// Once built, a series cannot be modified.
pub struct BinSeries {
    bins: Vec<BinRecord>,
}

impl BinSeries {
    /// This function creates a series from a list of [BinRecord]s.
    ///
    /// Every record must hold finite values, a center within its edges and
    /// a non-negative error.
    ///
    /// ```
    /// use histratio::{BinRecord, BinSeries};
    ///
    /// let s = BinSeries::new(vec![BinRecord::new(0.5, 0.0, 1.0, 4.0, 2.0)]).unwrap();
    /// assert_eq!(s.len(), 1);
    /// ```
    pub fn new(bins: Vec<BinRecord>) -> Result<BinSeries, super::Error> {
        for (index, bin) in bins.iter().enumerate() {
            if let Err(reason) = bin.check() {
                return Err(super::Error::InvalidBin { index, reason: reason.to_string() });
            }
        }
        Ok(BinSeries { bins })
    }
    /// This function creates a series with no bins.
    pub fn empty() -> BinSeries {
        BinSeries { bins: vec![] }
    }
    /// This function creates a series from `n + 1` bin edges and `n`
    /// contents and errors.  Bin centers are the edge midpoints.
    pub fn from_edges(edges: &[f64], contents: &[f64], errors: &[f64]) -> Result<BinSeries, super::Error> {
        if contents.len() != errors.len() {
            return Err(super::Error::LengthMismatch { numerator: contents.len(), denominator: errors.len() });
        }
        if edges.len() != contents.len() + 1 {
            return Err(super::Error::EdgeCount { edges: edges.len(), bins: contents.len() });
        }
        let bins = edges
            .windows(2)
            .zip(contents.iter().zip(errors))
            .enumerate()
            .map(|(index, (w, (content, error)))| {
                if w[0] < w[1] {
                    Ok(BinRecord::new(0.5 * (w[0] + w[1]), w[0], w[1], *content, *error))
                } else {
                    Err(super::Error::InvalidBin { index, reason: "edges not increasing".to_string() })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        BinSeries::new(bins)
    }
    /// This function creates a series from bin edges and raw counts, with
    /// the error of each bin set to `sqrt(|content|)`.
    pub fn with_poisson_errors(edges: &[f64], contents: &[f64]) -> Result<BinSeries, super::Error> {
        let errors: Vec<f64> = contents.iter().map(|c| c.abs().sqrt()).collect();
        BinSeries::from_edges(edges, contents, &errors)
    }
    pub fn len(&self) -> usize {
        self.bins.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
    pub fn bins(&self) -> &[BinRecord] {
        &self.bins
    }
    pub fn get(&self, index: usize) -> Option<&BinRecord> {
        self.bins.get(index)
    }
    pub fn iter(&self) -> slice::Iter<'_, BinRecord> {
        self.bins.iter()
    }
    pub fn contents(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.content).collect()
    }
    pub fn errors(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.error).collect()
    }
    /// Determines if `other` has the same number of bins with the same edges.
    pub fn aligned_with(&self, other: &BinSeries) -> bool {
        self.len() == other.len()
            && self.bins.iter().zip(other.bins.iter()).all(|(a, b)| {
                a.low_edge == b.low_edge && a.high_edge == b.high_edge
            })
    }
    /// This function fails unless `numerator` and `denominator` have the
    /// same number of bins.
    pub(crate) fn check_lengths(numerator: &BinSeries, denominator: &BinSeries) -> Result<(), super::Error> {
        if numerator.len() != denominator.len() {
            Err(super::Error::LengthMismatch { numerator: numerator.len(), denominator: denominator.len() })
        } else {
            Ok(())
        }
    }
}

impl<'a> IntoIterator for &'a BinSeries {
    type Item = &'a BinRecord;
    type IntoIter = slice::Iter<'a, BinRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.bins.iter()
    }
}
