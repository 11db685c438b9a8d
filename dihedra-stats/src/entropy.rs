//! Histogram-based Shannon entropy of angular samples.
//!
//! Values are binned into a fixed-range, equal-width histogram and the entropy
//! of the resulting bin-occupancy distribution is reported in bits. The range
//! does not adapt to the data: circular deltas live in `[0, 180]`, yet the
//! default binning spans `[0, 360)` so that the upper half stays empty and
//! entropies remain comparable with previously published tables.

use std::borrow::Cow;
use std::fmt;

use dihedra_core::{DihedraError, Result};

/// Default number of bins.
pub const DEFAULT_BINS: usize = 60;

/// Fixed-range, equal-width histogram layout.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Binning {
    pub bins: usize,
    pub min: f64,
    pub max: f64,
}

impl Default for Binning {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            min: 0.0,
            max: 360.0,
        }
    }
}

impl Binning {
    /// Create a binning, validating the layout.
    ///
    /// # Errors
    ///
    /// Returns an error if `bins` is zero, a bound is not finite, or
    /// `max <= min`.
    pub fn new(bins: usize, min: f64, max: f64) -> Result<Self> {
        let binning = Self { bins, min, max };
        binning.validate()?;
        Ok(binning)
    }

    /// `bins` equal-width bins over `[0, 360)` degrees.
    pub fn degrees(bins: usize) -> Result<Self> {
        Self::new(bins, 0.0, 360.0)
    }

    /// Check the layout.
    pub fn validate(&self) -> Result<()> {
        if self.bins == 0 {
            return Err(DihedraError::InvalidInput(
                "histogram needs at least one bin".into(),
            ));
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(DihedraError::InvalidInput(format!(
                "histogram range must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.max <= self.min {
            return Err(DihedraError::InvalidInput(format!(
                "histogram range is empty: [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Width of a single bin.
    pub fn width(&self) -> f64 {
        (self.max - self.min) / self.bins as f64
    }

    /// Bin index of `x`, or `None` if it falls outside `[min, max]`.
    ///
    /// Bins are half-open except the last, which also holds `max`.
    pub fn bin_of(&self, x: f64) -> Option<usize> {
        if !(x >= self.min && x <= self.max) {
            return None;
        }
        if x == self.max {
            return Some(self.bins - 1);
        }
        let norm = self.bins as f64 / (self.max - self.min);
        let mut idx = (((x - self.min) * norm) as usize).min(self.bins - 1);
        // Settle rounding at bin boundaries against the exact edges.
        if x < self.edge(idx) {
            idx -= 1;
        } else if idx + 1 < self.bins && x >= self.edge(idx + 1) {
            idx += 1;
        }
        Some(idx)
    }

    /// Lower edge of bin `k`; `edge(bins)` is `max`.
    pub fn edge(&self, k: usize) -> f64 {
        if k >= self.bins {
            self.max
        } else {
            self.min + k as f64 * self.width()
        }
    }

    /// Upper bound on the entropy of any sample under this binning.
    pub fn max_entropy(&self) -> f64 {
        (self.bins as f64).log2()
    }
}

/// What to do with non-finite entries before binning.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InvalidPolicy {
    /// Discard the entry. The sample shrinks accordingly.
    #[default]
    Drop,
    /// Reject the whole sample.
    Fail,
    /// Replace the entry with a fixed value.
    Substitute(f64),
}

impl InvalidPolicy {
    /// Apply the policy, borrowing when the sample is already clean.
    ///
    /// # Errors
    ///
    /// Returns an error under [`InvalidPolicy::Fail`] if any entry is not
    /// finite.
    pub fn apply<'a>(&self, values: &'a [f64]) -> Result<Cow<'a, [f64]>> {
        if values.iter().all(|v| v.is_finite()) {
            return Ok(Cow::Borrowed(values));
        }
        match *self {
            InvalidPolicy::Drop => Ok(Cow::Owned(
                values.iter().copied().filter(|v| v.is_finite()).collect(),
            )),
            InvalidPolicy::Fail => {
                let (pos, bad) = values
                    .iter()
                    .enumerate()
                    .find(|(_, v)| !v.is_finite())
                    .map(|(i, v)| (i, *v))
                    .unwrap_or((0, f64::NAN));
                Err(DihedraError::InvalidInput(format!(
                    "non-finite value {} at position {}",
                    bad, pos
                )))
            }
            InvalidPolicy::Substitute(fill) => Ok(Cow::Owned(
                values
                    .iter()
                    .map(|&v| if v.is_finite() { v } else { fill })
                    .collect(),
            )),
        }
    }
}

/// Entropy of one sample, or the marker for a sample with no usable data.
///
/// `Undefined` is distinct from `Defined(0.0)`: the latter means every value
/// fell into one bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntropyValue {
    Defined(f64),
    Undefined,
}

impl EntropyValue {
    pub fn is_defined(&self) -> bool {
        matches!(self, EntropyValue::Defined(_))
    }

    /// The entropy in bits, if defined.
    pub fn value(&self) -> Option<f64> {
        match self {
            EntropyValue::Defined(h) => Some(*h),
            EntropyValue::Undefined => None,
        }
    }
}

impl From<Option<f64>> for EntropyValue {
    fn from(v: Option<f64>) -> Self {
        match v {
            Some(h) if h.is_finite() => EntropyValue::Defined(h),
            _ => EntropyValue::Undefined,
        }
    }
}

impl fmt::Display for EntropyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntropyValue::Defined(h) => write!(f, "{}", h),
            EntropyValue::Undefined => f.write_str("undefined"),
        }
    }
}

/// Count finite values per bin. Values outside the range are not counted.
pub fn histogram_counts(values: &[f64], binning: &Binning) -> Vec<usize> {
    let mut counts = vec![0usize; binning.bins];
    for &v in values {
        if let Some(i) = binning.bin_of(v) {
            counts[i] += 1;
        }
    }
    counts
}

/// Shannon entropy in bits, H = -Σ p_i log2(p_i), of a vector of bin counts.
///
/// Empty bins contribute nothing. Returns `None` when the total is zero.
pub fn shannon_entropy_bits(counts: &[usize]) -> Option<f64> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return None;
    }
    let n = total as f64;
    let mut h = 0.0;
    for &c in counts {
        if c > 0 {
            let p = c as f64 / n;
            h -= p * p.log2();
        }
    }
    // A single occupied bin gives -1·log2(1) = -0.0.
    Some(h.max(0.0))
}

/// Entropy of `values` under `binning`, after applying `policy`.
///
/// # Errors
///
/// Returns an error if the binning is invalid or the policy is
/// [`InvalidPolicy::Fail`] and a value is not finite.
pub fn binned_entropy(
    values: &[f64],
    binning: &Binning,
    policy: InvalidPolicy,
) -> Result<EntropyValue> {
    binning.validate()?;
    let cleaned = policy.apply(values)?;
    let counts = histogram_counts(&cleaned, binning);
    Ok(shannon_entropy_bits(&counts).into())
}

/// Entropy of `values` over `bins` equal-width bins spanning `range`,
/// dropping non-finite entries.
///
/// # Errors
///
/// Returns an error only for an invalid bin layout.
///
/// # Examples
///
/// ```
/// use dihedra_stats::entropy::{histogram_entropy, EntropyValue};
///
/// let h = histogram_entropy(&[], 60, (0.0, 360.0)).unwrap();
/// assert_eq!(h, EntropyValue::Undefined);
///
/// let h = histogram_entropy(&[3.0, 3.0, 3.0], 60, (0.0, 360.0)).unwrap();
/// assert_eq!(h, EntropyValue::Defined(0.0));
///
/// let h = histogram_entropy(&[1.0, 7.0], 60, (0.0, 360.0)).unwrap();
/// assert_eq!(h, EntropyValue::Defined(1.0));
/// ```
pub fn histogram_entropy(values: &[f64], bins: usize, range: (f64, f64)) -> Result<EntropyValue> {
    let binning = Binning::new(bins, range.0, range.1)?;
    binned_entropy(values, &binning, InvalidPolicy::Drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn defined(v: EntropyValue) -> f64 {
        v.value().expect("entropy should be defined")
    }

    #[test]
    fn empty_is_undefined() {
        let h = histogram_entropy(&[], 60, (0.0, 360.0)).unwrap();
        assert_eq!(h, EntropyValue::Undefined);
        assert!(!h.is_defined());
    }

    #[test]
    fn all_invalid_is_undefined() {
        let h = histogram_entropy(&[f64::NAN, f64::INFINITY], 60, (0.0, 360.0)).unwrap();
        assert_eq!(h, EntropyValue::Undefined);
    }

    #[test]
    fn identical_values_are_zero() {
        let values = vec![42.5; 20];
        let h = histogram_entropy(&values, 60, (0.0, 360.0)).unwrap();
        assert_eq!(h, EntropyValue::Defined(0.0));
    }

    #[test]
    fn two_equal_bins_is_one_bit() {
        let values = [1.0, 2.0, 13.0, 14.0];
        let h = defined(histogram_entropy(&values, 60, (0.0, 360.0)).unwrap());
        assert!((h - 1.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_over_all_bins_is_log2_bins() {
        // One value at the centre of each 6-degree bin, repeated.
        let values: Vec<f64> = (0..60 * 50).map(|i| (i % 60) as f64 * 6.0 + 3.0).collect();
        let h = defined(histogram_entropy(&values, 60, (0.0, 360.0)).unwrap());
        assert!((h - 60f64.log2()).abs() < 1e-10, "H={}", h);
    }

    #[test]
    fn evenly_spread_sample_approaches_log2_bins() {
        let n = 36_000;
        let values: Vec<f64> = (0..n).map(|i| i as f64 * 360.0 / n as f64).collect();
        let h = defined(histogram_entropy(&values, 60, (0.0, 360.0)).unwrap());
        assert!((h - 60f64.log2()).abs() < 1e-6, "H={}", h);
        assert!(h <= Binning::default().max_entropy() + 1e-12);
    }

    #[test]
    fn nan_entries_are_dropped() {
        let clean = [10.0, 10.5, 100.0];
        let dirty = [10.0, f64::NAN, 10.5, f64::NEG_INFINITY, 100.0];
        assert_eq!(
            histogram_entropy(&clean, 60, (0.0, 360.0)).unwrap(),
            histogram_entropy(&dirty, 60, (0.0, 360.0)).unwrap()
        );
    }

    #[test]
    fn fail_policy_rejects_nan() {
        let err = binned_entropy(&[1.0, f64::NAN], &Binning::default(), InvalidPolicy::Fail)
            .unwrap_err();
        assert!(err.to_string().contains("position 1"));
        assert!(binned_entropy(&[1.0, 2.0], &Binning::default(), InvalidPolicy::Fail).is_ok());
    }

    #[test]
    fn substitute_policy_fills() {
        let h = binned_entropy(
            &[1.0, f64::NAN],
            &Binning::default(),
            InvalidPolicy::Substitute(1.0),
        )
        .unwrap();
        assert_eq!(h, EntropyValue::Defined(0.0));
    }

    #[test]
    fn out_of_range_values_are_not_counted() {
        let h = histogram_entropy(&[-5.0, 400.0], 60, (0.0, 360.0)).unwrap();
        assert_eq!(h, EntropyValue::Undefined);
        let h = histogram_entropy(&[-5.0, 2.0, 2.5], 60, (0.0, 360.0)).unwrap();
        assert_eq!(h, EntropyValue::Defined(0.0));
    }

    #[test]
    fn upper_edge_goes_to_last_bin() {
        let b = Binning::default();
        assert_eq!(b.bin_of(360.0), Some(59));
        assert_eq!(b.bin_of(0.0), Some(0));
        assert_eq!(b.bin_of(5.999), Some(0));
        assert_eq!(b.bin_of(6.0), Some(1));
        assert_eq!(b.bin_of(180.0), Some(30));
        assert_eq!(b.bin_of(360.1), None);
        assert_eq!(b.bin_of(f64::NAN), None);
    }

    #[test]
    fn deltas_leave_upper_half_empty() {
        let values: Vec<f64> = (0..=180).map(|d| d as f64).collect();
        let counts = histogram_counts(&values, &Binning::default());
        assert!(counts[31..].iter().all(|&c| c == 0));
        assert_eq!(counts.iter().sum::<usize>(), 181);
    }

    #[test]
    fn invalid_binning_rejected() {
        assert!(Binning::new(0, 0.0, 360.0).is_err());
        assert!(Binning::new(10, 5.0, 5.0).is_err());
        assert!(Binning::new(10, 0.0, f64::INFINITY).is_err());
        assert!(histogram_entropy(&[1.0], 0, (0.0, 360.0)).is_err());
    }

    #[test]
    fn display_forms() {
        assert_eq!(EntropyValue::Defined(1.5).to_string(), "1.5");
        assert_eq!(EntropyValue::Undefined.to_string(), "undefined");
        assert_eq!(EntropyValue::from(Some(f64::NAN)), EntropyValue::Undefined);
    }

    proptest! {
        #[test]
        fn order_invariant(mut values in proptest::collection::vec(0.0f64..180.0, 0..200)) {
            let forward = histogram_entropy(&values, 60, (0.0, 360.0)).unwrap();
            values.reverse();
            let k = values.len() / 3;
            values.rotate_left(k);
            let shuffled = histogram_entropy(&values, 60, (0.0, 360.0)).unwrap();
            prop_assert_eq!(forward, shuffled);
        }

        #[test]
        fn bounded_by_log2_bins(values in proptest::collection::vec(0.0f64..360.0, 1..300)) {
            let h = histogram_entropy(&values, 60, (0.0, 360.0)).unwrap().value().unwrap();
            prop_assert!(h >= 0.0);
            prop_assert!(h <= 60f64.log2() + 1e-12);
        }
    }
}
