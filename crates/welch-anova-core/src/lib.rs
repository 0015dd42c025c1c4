//! welch-anova-core: Welch's one-way ANOVA for grouped tabular data
//!
//! Computes the Welch F statistic, its two degrees of freedom and the
//! p-value for a numeric column split by a grouping column. The F
//! distribution comes from statrs.

pub mod anova;
pub mod distribution;
pub mod errors;
pub mod table;
pub mod types;

pub use anova::{
    group_observations, welch_anova, welch_anova_groups, welch_anova_slices, GroupStatistics,
};
pub use errors::{StatsError, StatsResult};
pub use table::{Column, Dataset, GroupLabel};
pub use types::*;
