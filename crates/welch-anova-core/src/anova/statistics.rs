//! Per-group descriptive statistics and Welch weights

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::table::GroupLabel;

/// Descriptive statistics of one group
#[derive(Debug, Clone, Serialize)]
pub struct GroupStatistics {
    /// Group identifier
    pub label: GroupLabel,
    /// Number of observations
    pub n: usize,
    /// Sample mean
    pub mean: f64,
    /// Sample variance (ddof = 1); NaN when n = 1
    pub variance: f64,
    /// Variance actually used for the weight (the floor if degenerate)
    pub effective_variance: f64,
    /// Welch weight n / effective_variance
    pub weight: f64,
    /// n <= 1 or zero variance
    pub degenerate: bool,
}

impl GroupStatistics {
    /// Compute statistics for one group, substituting `variance_floor` for a
    /// degenerate variance.
    pub fn compute(label: GroupLabel, values: &[f64], variance_floor: f64) -> Self {
        let n = values.len();
        let mean = values.mean();
        let variance = if n > 1 { values.variance() } else { f64::NAN };

        let degenerate = n <= 1 || variance == 0.0;
        let effective_variance = if degenerate { variance_floor } else { variance };

        Self {
            label,
            n,
            mean,
            variance,
            effective_variance,
            weight: n as f64 / effective_variance,
            degenerate,
        }
    }

    /// n - 1 as a float, if the group contributes to the correction terms
    pub(crate) fn dof(&self) -> Option<f64> {
        (self.n > 1).then(|| (self.n - 1) as f64)
    }
}
