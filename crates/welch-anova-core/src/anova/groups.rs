//! Partitioning of dataset rows into groups

use std::collections::BTreeMap;

use crate::errors::{StatsError, StatsResult};
use crate::table::{Dataset, GroupLabel};
use crate::types::NanPolicy;

/// Partition the non-missing values of `dv` by the labels in `between`.
///
/// Rows whose label is missing are dropped. Rows whose dependent value is
/// missing are dropped under `NanPolicy::DropNaN` and rejected under
/// `NanPolicy::ErrorOnNaN`. Groups are returned in label order and every
/// returned group is non-empty.
pub fn group_observations(
    data: &Dataset,
    dv: &str,
    between: &str,
    nan_policy: NanPolicy,
) -> StatsResult<Vec<(GroupLabel, Vec<f64>)>> {
    let values = data.column(dv)?;
    let labels = data.column(between)?;

    let mut groups: BTreeMap<GroupLabel, Vec<f64>> = BTreeMap::new();
    let mut dropped = 0usize;

    for row in 0..values.len() {
        let value = values.numeric_at(dv, row)?;
        match (labels.label_at(row), value) {
            (Some(label), Some(v)) => groups.entry(label).or_default().push(v),
            (_, None) if nan_policy == NanPolicy::ErrorOnNaN => {
                return Err(StatsError::MissingValue {
                    column: dv.to_string(),
                    row,
                });
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!("dropped {dropped} row(s) with a missing '{dv}' or '{between}' value");
    }

    Ok(groups.into_iter().collect())
}
