use std::fmt;

use serde::Serialize;

use crate::anova::GroupStatistics;
use crate::table::GroupLabel;

/// Variance substituted for degenerate groups unless configured otherwise
pub const DEFAULT_VARIANCE_FLOOR: f64 = 1e-9;

/// Smallest denominator degrees of freedom reported.
///
/// A degenerate group with few observations can dominate the weights and
/// drive df2 to zero or below; df2 is raised to this value so the p-value
/// stays defined.
pub const MIN_DDOF2: f64 = 1.0;

/// How groups with one observation or zero variance are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DegeneracyPolicy {
    /// Replace the variance with the configured floor (default)
    #[default]
    Substitute,
    /// Same as `Substitute`, but log a warning naming the affected groups
    WarnAndSubstitute,
    /// Drop degenerate groups before computing the test
    Exclude,
}

/// Which closed form is used for F and the denominator degrees of freedom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WelchFormula {
    /// F = SS / c with c = 1 + 2/(k²-1)·Λ and df2 = W²/Σ(w²/(n-1)) - (k-1)
    #[default]
    Simplified,
    /// Welch (1951): F = (SS/(k-1)) / (1 + 2(k-2)/(k²-1)·Λ), df2 = (k²-1)/(3Λ)
    Standard,
}

/// Policy for missing (NULL or NaN) dependent values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum NanPolicy {
    /// Skip rows with a missing dependent value (default)
    #[default]
    DropNaN,
    /// Error if any dependent value is missing
    ErrorOnNaN,
}

/// Options for Welch's ANOVA
#[derive(Debug, Clone)]
pub struct WelchAnovaOptions {
    /// Treatment of groups with n <= 1 or zero variance
    pub degeneracy: DegeneracyPolicy,
    /// Variance substituted for degenerate groups (must be finite and > 0)
    pub variance_floor: f64,
    /// Closed form for F and df2
    pub formula: WelchFormula,
    /// Treatment of missing dependent values
    pub nan_policy: NanPolicy,
}

impl Default for WelchAnovaOptions {
    fn default() -> Self {
        Self {
            degeneracy: DegeneracyPolicy::Substitute,
            variance_floor: DEFAULT_VARIANCE_FLOOR,
            formula: WelchFormula::Simplified,
            nan_policy: NanPolicy::DropNaN,
        }
    }
}

/// Result of Welch's ANOVA
#[derive(Debug, Clone, Serialize)]
pub struct WelchAnovaResult {
    /// F statistic
    #[serde(rename = "F")]
    pub f_statistic: f64,
    /// Upper-tail probability of F under the null hypothesis
    #[serde(rename = "p-value")]
    pub p_value: f64,
    /// Numerator degrees of freedom (k - 1)
    pub ddof1: usize,
    /// Denominator degrees of freedom (Welch-Satterthwaite style, may be fractional)
    pub ddof2: f64,
    /// Number of groups entering the test
    pub n_groups: usize,
    /// Number of observations entering the test
    pub n: usize,
    /// Per-group descriptive statistics, in label order
    pub groups: Vec<GroupStatistics>,
    /// Groups whose variance was replaced by the floor (or dropped under `Exclude`)
    pub degenerate_groups: Vec<GroupLabel>,
    /// Test method
    pub method: String,
}

impl WelchAnovaResult {
    /// Alias for `p_value`
    pub fn p(&self) -> f64 {
        self.p_value
    }

    /// True if any group needed the degeneracy policy, i.e. the result is approximate
    pub fn is_approximate(&self) -> bool {
        !self.degenerate_groups.is_empty()
    }
}

impl fmt::Display for WelchAnovaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   {:>12} {:>12} {:>6} {:>10}", "F", "p-value", "ddof1", "ddof2")?;
        write!(
            f,
            "0  {:>12.6} {:>12.6e} {:>6} {:>10.4}",
            self.f_statistic, self.p_value, self.ddof1, self.ddof2
        )
    }
}
