//! Welch F statistic and degrees of freedom from group statistics

use super::statistics::GroupStatistics;
use crate::types::WelchFormula;

/// F statistic with its two degrees of freedom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchStatistic {
    pub f_statistic: f64,
    pub ddof1: usize,
    pub ddof2: f64,
}

/// Compute Welch's F and degrees of freedom.
///
/// Groups with n = 1 are left out of the correction factor and the df2
/// denominator. When no group has n > 1 that denominator is empty and df2
/// is `+∞`.
///
/// `groups` must hold at least two entries.
pub fn welch_statistic(groups: &[GroupStatistics], formula: WelchFormula) -> WelchStatistic {
    let k = groups.len() as f64;
    let ddof1 = groups.len().saturating_sub(1);

    let weight_sum: f64 = groups.iter().map(|g| g.weight).sum();
    let grand_mean = groups.iter().map(|g| g.weight * g.mean).sum::<f64>() / weight_sum;

    let ss: f64 = groups
        .iter()
        .map(|g| g.weight * (g.mean - grand_mean).powi(2))
        .sum();

    // Λ = Σ (1 - w/W)² / (n - 1)
    let lambda: f64 = groups
        .iter()
        .filter_map(|g| g.dof().map(|dof| (1.0 - g.weight / weight_sum).powi(2) / dof))
        .sum();

    let (f_statistic, ddof2) = match formula {
        WelchFormula::Simplified => {
            let c = 1.0 + (2.0 / (k * k - 1.0)) * lambda;
            let f = if c != 0.0 { ss / c } else { 0.0 };

            let denom: f64 = groups
                .iter()
                .filter_map(|g| g.dof().map(|dof| g.weight * g.weight / dof))
                .sum();
            let df2 = if denom > 0.0 {
                weight_sum * weight_sum / denom - (k - 1.0)
            } else {
                f64::INFINITY
            };
            (f, df2)
        }
        WelchFormula::Standard => {
            let c = 1.0 + (2.0 * (k - 2.0) / (k * k - 1.0)) * lambda;
            let f = if c != 0.0 { ss / (k - 1.0) / c } else { 0.0 };
            let df2 = if lambda > 0.0 {
                (k * k - 1.0) / (3.0 * lambda)
            } else {
                f64::INFINITY
            };
            (f, df2)
        }
    };

    WelchStatistic {
        f_statistic,
        ddof1,
        ddof2,
    }
}
