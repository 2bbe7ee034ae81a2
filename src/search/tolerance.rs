//! The tolerance predicate deciding whether two features are the same compound.
//!
//! The m/z test is relative and asymmetric: the difference is expressed in
//! parts-per-million of the *reference* feature, which is always the second
//! argument. The engine passes the stored (candidate) peak as the reference, so
//! `|query - candidate| / candidate * 1e6 <= ppm`.

use serde::{Deserialize, Serialize};

use crate::model::Peak;

/// Anything with an m/z and a retention time
pub trait Feature {
    /// Mass-to-charge ratio
    fn mz(&self) -> f64;
    /// Retention time in seconds
    fn rt(&self) -> f64;
}

impl Feature for Peak {
    fn mz(&self) -> f64 {
        self.mz
    }

    fn rt(&self) -> f64 {
        self.rt
    }
}

/// A virtual peak given by coordinates only, the query side of a point search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    /// Query m/z
    pub mz: f64,
    /// Query retention time in seconds
    pub rt: f64,
}

impl QueryPoint {
    /// Create a query point
    pub fn new(mz: f64, rt: f64) -> Self {
        Self { mz, rt }
    }
}

impl Feature for QueryPoint {
    fn mz(&self) -> f64 {
        self.mz
    }

    fn rt(&self) -> f64 {
        self.rt
    }
}

/// Matching windows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// m/z window in parts-per-million of the reference m/z
    pub ppm: f64,
    /// Absolute retention time window in seconds
    pub rt: f64,
}

impl Tolerance {
    /// Create a tolerance
    pub fn new(ppm: f64, rt: f64) -> Self {
        Self { ppm, rt }
    }
}

/// Relative m/z difference of `mz` from `reference`, in ppm
#[inline]
pub fn ppm_difference(mz: f64, reference: f64) -> f64 {
    (mz - reference).abs() / reference * 1e6
}

/// `true` when both the m/z and the rt test hold; both bounds are inclusive
#[inline]
pub fn within_tolerance<A, B>(feature: &A, reference: &B, tolerance: &Tolerance) -> bool
where
    A: Feature + ?Sized,
    B: Feature + ?Sized,
{
    ppm_difference(feature.mz(), reference.mz()) <= tolerance.ppm
        && (feature.rt() - reference.rt()).abs() <= tolerance.rt
}

/// Range of reference m/z values that can pass the m/z test against `mz`.
///
/// Solving `|mz - p| <= p * ppm * 1e-6` for `p` gives
/// `mz / (1 + k) <= p <= mz / (1 - k)` with `k = ppm * 1e-6`. The bounds are
/// widened by a few ulps; callers still apply [`within_tolerance`] exactly.
pub fn mz_window(mz: f64, ppm: f64) -> (f64, f64) {
    let k = ppm * 1e-6;
    let lo = mz / (1.0 + k);
    let hi = if k >= 1.0 { f64::INFINITY } else { mz / (1.0 - k) };
    (lo * (1.0 - 1e-12), hi * (1.0 + 1e-12))
}
