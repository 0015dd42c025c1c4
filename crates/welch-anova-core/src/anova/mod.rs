//! Welch's one-way ANOVA
//!
//! Tests equality of group means without assuming equal variances. Each
//! group is weighted by n / s²; groups with a single observation or zero
//! variance have no usable s² and are handled by [`DegeneracyPolicy`]:
//! by default the variance is replaced with a small floor (1e-9). That
//! substitution is an approximation which can give a degenerate group an
//! arbitrarily large weight; affected groups are listed in
//! [`WelchAnovaResult::degenerate_groups`].

mod groups;
mod statistics;
mod welch;

pub use groups::group_observations;
pub use statistics::GroupStatistics;
pub use welch::{welch_statistic, WelchStatistic};

use crate::distribution::f_survival;
use crate::errors::{StatsError, StatsResult};
use crate::table::{Dataset, GroupLabel};
use crate::types::{
    DegeneracyPolicy, WelchAnovaOptions, WelchAnovaResult, WelchFormula, MIN_DDOF2,
};

/// Welch's ANOVA of column `dv` grouped by column `between`
///
/// # Arguments
/// * `data` - Dataset holding both columns
/// * `dv` - Name of the numeric dependent variable
/// * `between` - Name of the grouping column
/// * `options` - Degeneracy policy, variance floor, formula and NaN policy
///
/// # Errors
/// `InvalidColumn` if either column is absent, `NonNumericData` if a
/// dependent value cannot be read as a number, `InsufficientGroups` if
/// fewer than two groups remain.
pub fn welch_anova(
    data: &Dataset,
    dv: &str,
    between: &str,
    options: &WelchAnovaOptions,
) -> StatsResult<WelchAnovaResult> {
    let groups = group_observations(data, dv, between, options.nan_policy)?;
    welch_anova_groups(&groups, options)
}

/// Welch's ANOVA over pre-partitioned groups
pub fn welch_anova_groups(
    groups: &[(GroupLabel, Vec<f64>)],
    options: &WelchAnovaOptions,
) -> StatsResult<WelchAnovaResult> {
    let floor = options.variance_floor;
    if !floor.is_finite() || floor <= 0.0 {
        return Err(StatsError::InvalidValue {
            field: "variance_floor",
            message: format!("{floor} (must be finite and > 0)"),
        });
    }

    if groups.len() < 2 {
        return Err(StatsError::InsufficientGroups {
            found: groups.len(),
        });
    }

    if let Some((label, _)) = groups.iter().find(|(_, values)| values.is_empty()) {
        return Err(StatsError::InvalidInput(format!(
            "group '{label}' has no observations"
        )));
    }

    let mut seen: Vec<&GroupLabel> = groups.iter().map(|(label, _)| label).collect();
    seen.sort();
    if let Some(pair) = seen.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(StatsError::InvalidInput(format!(
            "group '{}' appears more than once",
            pair[0]
        )));
    }

    let mut stats: Vec<GroupStatistics> = groups
        .iter()
        .map(|(label, values)| GroupStatistics::compute(label.clone(), values, floor))
        .collect();

    let degenerate_groups: Vec<GroupLabel> = stats
        .iter()
        .filter(|s| s.degenerate)
        .map(|s| s.label.clone())
        .collect();

    if !degenerate_groups.is_empty() {
        let names = join_labels(&degenerate_groups);
        match options.degeneracy {
            DegeneracyPolicy::Substitute => {
                log::debug!("substituting variance {floor:e} for degenerate group(s): {names}");
            }
            DegeneracyPolicy::WarnAndSubstitute => {
                log::warn!(
                    "group(s) {names} have fewer than 2 observations or zero variance; \
                     substituting variance {floor:e}, results are approximate"
                );
            }
            DegeneracyPolicy::Exclude => {
                log::debug!("excluding degenerate group(s): {names}");
                stats.retain(|s| !s.degenerate);
                if stats.len() < 2 {
                    return Err(StatsError::InsufficientGroups { found: stats.len() });
                }
            }
        }
    }

    let WelchStatistic {
        f_statistic,
        ddof1,
        mut ddof2,
    } = welch_statistic(&stats, options.formula);

    if ddof2 < MIN_DDOF2 {
        log::warn!("ddof2 = {ddof2} is below {MIN_DDOF2}; raising it to {MIN_DDOF2}");
        ddof2 = MIN_DDOF2;
    }

    let p_value = f_survival(f_statistic, ddof1 as f64, ddof2);
    if p_value.is_nan() {
        log::warn!("p-value undefined for F = {f_statistic}, ddof1 = {ddof1}, ddof2 = {ddof2}");
    }

    let n = stats.iter().map(|s| s.n).sum();
    log::debug!(
        "Welch ANOVA: k = {}, n = {n}, F = {f_statistic}, p = {p_value}, ddof2 = {ddof2}",
        stats.len()
    );

    let method = match options.formula {
        WelchFormula::Simplified => "Welch's ANOVA (simplified correction)",
        WelchFormula::Standard => "Welch's ANOVA",
    };

    Ok(WelchAnovaResult {
        f_statistic,
        p_value,
        ddof1,
        ddof2,
        n_groups: stats.len(),
        n,
        groups: stats,
        degenerate_groups,
        method: method.to_string(),
    })
}

/// Welch's ANOVA over plain sample vectors
///
/// Groups are labelled by their position. NaN values are ignored.
pub fn welch_anova_slices(
    groups: &[Vec<f64>],
    options: &WelchAnovaOptions,
) -> StatsResult<WelchAnovaResult> {
    let labelled: Vec<(GroupLabel, Vec<f64>)> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let values = g.iter().copied().filter(|x| !x.is_nan()).collect();
            (GroupLabel::Int(i as i64), values)
        })
        .collect();

    welch_anova_groups(&labelled, options)
}

fn join_labels(labels: &[GroupLabel]) -> String {
    labels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NanPolicy;
    use approx::assert_relative_eq;

    fn three_groups() -> Dataset {
        Dataset::new()
            .with_column(
                "Store_Location",
                vec!["A", "A", "A", "B", "B", "B", "C", "C", "C"],
            )
            .unwrap()
            .with_column(
                "Amount_Spent",
                vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
            )
            .unwrap()
    }

    fn run(data: &Dataset) -> WelchAnovaResult {
        welch_anova(
            data,
            "Amount_Spent",
            "Store_Location",
            &WelchAnovaOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_reference_scenario() {
        let r = run(&three_groups());

        assert_eq!(r.ddof1, 2);
        assert_relative_eq!(r.ddof2, 4.0, epsilon = 1e-9);
        assert_relative_eq!(r.f_statistic, 324.0 / 7.0, epsilon = 1e-9);
        // sf of F(2, 4) at x is (1 + x/2)^-2 = (7/169)^2
        assert_relative_eq!(r.p_value, 49.0 / 28561.0, max_relative = 1e-6);
        assert!((0.0..=1.0).contains(&r.p()));
        assert_eq!(r.n_groups, 3);
        assert_eq!(r.n, 9);
        assert!(!r.is_approximate());
    }

    #[test]
    fn test_two_groups_match_welch_t_test() {
        let a = vec![5.1, 4.9, 5.6, 5.0, 4.4, 5.3];
        let b = vec![7.1, 6.2, 7.9, 7.0, 6.8, 8.3, 5.9, 7.4];
        let opts = WelchAnovaOptions {
            formula: WelchFormula::Standard,
            ..Default::default()
        };
        let r = welch_anova_slices(&[a.clone(), b.clone()], &opts).unwrap();

        let mean = |x: &[f64]| x.iter().sum::<f64>() / x.len() as f64;
        let var = |x: &[f64]| {
            let m = mean(x);
            x.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (x.len() - 1) as f64
        };
        let (n1, n2) = (a.len() as f64, b.len() as f64);
        let (v1, v2) = (var(&a) / n1, var(&b) / n2);
        let t = (mean(&a) - mean(&b)) / (v1 + v2).sqrt();
        let df = (v1 + v2).powi(2) / (v1 * v1 / (n1 - 1.0) + v2 * v2 / (n2 - 1.0));

        assert_relative_eq!(r.f_statistic, t * t, max_relative = 1e-10);
        assert_relative_eq!(r.ddof2, df, max_relative = 1e-10);
        assert_eq!(r.ddof1, 1);
    }

    #[test]
    fn test_singleton_group_is_finite() {
        let groups = vec![vec![5.0], vec![1.0, 2.0, 3.0], vec![4.0, 5.5, 6.0]];
        let r = welch_anova_slices(&groups, &WelchAnovaOptions::default()).unwrap();

        assert!(r.f_statistic.is_finite());
        assert!(r.p_value.is_finite());
        assert!((0.0..=1.0).contains(&r.p_value));
        assert_eq!(r.degenerate_groups, vec![GroupLabel::Int(0)]);
        assert!(r.is_approximate());
    }

    #[test]
    fn test_zero_variance_group_is_finite() {
        let groups = vec![vec![5.0, 5.0, 5.0], vec![1.0, 2.0, 3.0], vec![7.0, 8.0, 9.0]];
        let opts = WelchAnovaOptions {
            degeneracy: DegeneracyPolicy::WarnAndSubstitute,
            ..Default::default()
        };
        let r = welch_anova_slices(&groups, &opts).unwrap();

        assert!(r.f_statistic.is_finite());
        assert!(r.p_value.is_finite());
        assert_eq!(r.ddof2, MIN_DDOF2);
        assert_eq!(r.degenerate_groups, vec![GroupLabel::Int(0)]);
    }

    #[test]
    fn test_dominant_zero_variance_group_raises_ddof2() {
        // the [1, 1] group dominates W, so df2 would be about (2 - 1) - (3 - 1) = -1
        let groups = vec![vec![0.0, 1.0], vec![2.0, 0.0], vec![1.0, 1.0]];
        let r = welch_anova_slices(&groups, &WelchAnovaOptions::default()).unwrap();

        assert_eq!(r.ddof1, 2);
        assert_eq!(r.ddof2, MIN_DDOF2);
        assert!(r.f_statistic.is_finite());
        assert!(r.p_value.is_finite());
        assert!((0.0..=1.0).contains(&r.p_value));
        assert_eq!(r.degenerate_groups, vec![GroupLabel::Int(2)]);

        let raw = welch_statistic(&r.groups, WelchFormula::Simplified);
        assert!(raw.ddof2 < 0.0);
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let groups = vec![
            (GroupLabel::from("a"), vec![1.0, 2.0]),
            (GroupLabel::from("b"), vec![3.0, 4.0]),
            (GroupLabel::from("a"), vec![5.0, 6.0]),
        ];
        let err = welch_anova_groups(&groups, &WelchAnovaOptions::default()).unwrap_err();
        assert_eq!(
            err,
            StatsError::InvalidInput("group 'a' appears more than once".into())
        );
    }

    #[test]
    fn test_all_singletons() {
        let groups = vec![vec![1.0], vec![2.0], vec![3.0]];
        let r = welch_anova_slices(&groups, &WelchAnovaOptions::default()).unwrap();

        assert!(r.f_statistic.is_finite());
        assert_eq!(r.ddof2, f64::INFINITY);
        assert!((0.0..=1.0).contains(&r.p_value));
        assert_eq!(r.degenerate_groups.len(), 3);
    }

    #[test]
    fn test_exclude_policy() {
        let groups = vec![
            vec![9.0],
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ];
        let opts = WelchAnovaOptions {
            degeneracy: DegeneracyPolicy::Exclude,
            ..Default::default()
        };
        let r = welch_anova_slices(&groups, &opts).unwrap();

        assert_eq!(r.n_groups, 3);
        assert_eq!(r.n, 9);
        assert_eq!(r.degenerate_groups, vec![GroupLabel::Int(0)]);
        assert_relative_eq!(r.f_statistic, 324.0 / 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_exclude_policy_leaves_too_few_groups() {
        let groups = vec![vec![1.0], vec![2.0, 2.0], vec![1.0, 3.0]];
        let opts = WelchAnovaOptions {
            degeneracy: DegeneracyPolicy::Exclude,
            ..Default::default()
        };
        let err = welch_anova_slices(&groups, &opts).unwrap_err();
        assert_eq!(err, StatsError::InsufficientGroups { found: 1 });
    }

    #[test]
    fn test_single_group_rejected() {
        let ds = Dataset::new()
            .with_column("g", vec!["x", "x", "x"])
            .unwrap()
            .with_column("y", vec![1.0, 2.0, 3.0])
            .unwrap();
        let err = welch_anova(&ds, "y", "g", &WelchAnovaOptions::default()).unwrap_err();
        assert_eq!(err, StatsError::InsufficientGroups { found: 1 });
    }

    #[test]
    fn test_missing_column() {
        let err = welch_anova(
            &three_groups(),
            "Amount",
            "Store_Location",
            &WelchAnovaOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StatsError::InvalidColumn { ref name, .. } if name == "Amount"));
    }

    #[test]
    fn test_non_numeric_dependent_variable() {
        let ds = Dataset::new()
            .with_column("g", vec!["a", "a", "b", "b"])
            .unwrap()
            .with_column("y", vec!["1.5", "2", "three", "4"])
            .unwrap();
        let err = welch_anova(&ds, "y", "g", &WelchAnovaOptions::default()).unwrap_err();
        assert!(matches!(err, StatsError::NonNumericData { row: 2, .. }));
    }

    #[test]
    fn test_text_dependent_variable_is_coerced() {
        let ds = Dataset::new()
            .with_column("g", vec![1_i64, 1, 1, 2, 2, 2, 3, 3, 3])
            .unwrap()
            .with_column("y", vec!["1", "2", "3", "4", "5", "6", "7", "8", "9"])
            .unwrap();
        let r = welch_anova(&ds, "y", "g", &WelchAnovaOptions::default()).unwrap();
        assert_relative_eq!(r.f_statistic, 324.0 / 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_values_filtered() {
        let ds = Dataset::new()
            .with_column("g", vec!["A", "A", "A", "A", "B", "B", "B", "C", "C", "C"])
            .unwrap()
            .with_column(
                "y",
                vec![
                    Some(1.0),
                    None,
                    Some(2.0),
                    Some(3.0),
                    Some(4.0),
                    Some(5.0),
                    Some(6.0),
                    Some(7.0),
                    Some(f64::NAN),
                    Some(8.0),
                ],
            )
            .unwrap();
        let r = welch_anova(&ds, "y", "g", &WelchAnovaOptions::default()).unwrap();
        assert_eq!(r.n, 8);

        let strict = WelchAnovaOptions {
            nan_policy: NanPolicy::ErrorOnNaN,
            ..Default::default()
        };
        assert!(matches!(
            welch_anova(&ds, "y", "g", &strict),
            Err(StatsError::MissingValue { row: 1, .. })
        ));
    }

    #[test]
    fn test_invalid_variance_floor() {
        let opts = WelchAnovaOptions {
            variance_floor: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            welch_anova(&three_groups(), "Amount_Spent", "Store_Location", &opts),
            Err(StatsError::InvalidValue { field: "variance_floor", .. })
        ));
    }

    #[test]
    fn test_empty_group_rejected() {
        let groups = vec![vec![1.0, 2.0], vec![f64::NAN]];
        assert!(matches!(
            welch_anova_slices(&groups, &WelchAnovaOptions::default()),
            Err(StatsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_group_statistics_reported_in_label_order() {
        let ds = Dataset::new()
            .with_column("g", vec!["c", "a", "b", "a", "c", "b"])
            .unwrap()
            .with_column("y", vec![6.0, 1.0, 3.0, 2.0, 7.0, 4.0])
            .unwrap();
        let r = welch_anova(&ds, "y", "g", &WelchAnovaOptions::default()).unwrap();
        let labels: Vec<String> = r.groups.iter().map(|g| g.label.to_string()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
        assert_relative_eq!(r.groups[0].mean, 1.5, epsilon = 1e-12);
    }
}
