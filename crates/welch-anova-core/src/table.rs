//! Minimal column-oriented dataset
//!
//! The engine receives its data as an explicit [`Dataset`] of named, equal-length
//! columns. Missing entries are `None`; numeric coercion of the dependent column
//! and label extraction from the grouping column happen here.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::errors::{StatsError, StatsResult};

/// A single column of a [`Dataset`]
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Float(Vec<Option<f64>>),
    Int(Vec<Option<i64>>),
    Text(Vec<Option<String>>),
    Bool(Vec<Option<bool>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Text(v) => v.len(),
            Column::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interpret row `row` as a number.
    ///
    /// Returns `Ok(None)` for a missing value (NULL, NaN, or blank text).
    /// `name` is only used for error reporting.
    pub fn numeric_at(&self, name: &str, row: usize) -> StatsResult<Option<f64>> {
        let value = match self {
            Column::Float(v) => v[row].filter(|x| !x.is_nan()),
            Column::Int(v) => v[row].map(|x| x as f64),
            Column::Bool(v) => v[row].map(|b| if b { 1.0 } else { 0.0 }),
            Column::Text(v) => match v[row].as_deref().map(str::trim) {
                None | Some("") => None,
                Some(s) => {
                    let parsed = s.parse::<f64>().map_err(|_| StatsError::NonNumericData {
                        column: name.to_string(),
                        row,
                        value: s.to_string(),
                    })?;
                    Some(parsed).filter(|x| !x.is_nan())
                }
            },
        };

        if let Some(x) = value {
            if x.is_infinite() {
                return Err(StatsError::InvalidValue {
                    field: "dependent variable",
                    message: format!("column '{name}', row {row} is infinite"),
                });
            }
        }
        Ok(value)
    }

    /// Group label at row `row`, or `None` if missing
    pub fn label_at(&self, row: usize) -> Option<GroupLabel> {
        match self {
            Column::Float(v) => v[row].and_then(GroupLabel::from_f64),
            Column::Int(v) => v[row].map(GroupLabel::Int),
            Column::Text(v) => v[row].clone().map(GroupLabel::Text),
            Column::Bool(v) => v[row].map(GroupLabel::Bool),
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(v: Vec<f64>) -> Self {
        Column::Float(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<f64>>> for Column {
    fn from(v: Vec<Option<f64>>) -> Self {
        Column::Float(v)
    }
}

impl From<Vec<i64>> for Column {
    fn from(v: Vec<i64>) -> Self {
        Column::Int(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<i64>>> for Column {
    fn from(v: Vec<Option<i64>>) -> Self {
        Column::Int(v)
    }
}

impl From<Vec<bool>> for Column {
    fn from(v: Vec<bool>) -> Self {
        Column::Bool(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<String>> for Column {
    fn from(v: Vec<String>) -> Self {
        Column::Text(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<String>>> for Column {
    fn from(v: Vec<Option<String>>) -> Self {
        Column::Text(v)
    }
}

impl From<Vec<&str>> for Column {
    fn from(v: Vec<&str>) -> Self {
        Column::Text(v.into_iter().map(|s| Some(s.to_string())).collect())
    }
}

impl From<Vec<Option<&str>>> for Column {
    fn from(v: Vec<Option<&str>>) -> Self {
        Column::Text(v.into_iter().map(|s| s.map(str::to_string)).collect())
    }
}

/// Identifier of a group, taken from the grouping column.
///
/// Labels are totally ordered (by variant, then by value) so groups are always
/// enumerated in the same order. Float labels compare with `-0.0 == 0.0`;
/// NaN never becomes a label.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GroupLabel {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl GroupLabel {
    fn from_f64(x: f64) -> Option<Self> {
        if x.is_nan() {
            None
        } else if x == 0.0 {
            Some(GroupLabel::Float(0.0))
        } else {
            Some(GroupLabel::Float(x))
        }
    }

    fn rank(&self) -> u8 {
        match self {
            GroupLabel::Bool(_) => 0,
            GroupLabel::Int(_) => 1,
            GroupLabel::Float(_) => 2,
            GroupLabel::Text(_) => 3,
        }
    }
}

impl PartialEq for GroupLabel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupLabel {}

impl PartialOrd for GroupLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupLabel::Bool(a), GroupLabel::Bool(b)) => a.cmp(b),
            (GroupLabel::Int(a), GroupLabel::Int(b)) => a.cmp(b),
            (GroupLabel::Float(a), GroupLabel::Float(b)) => a.total_cmp(b),
            (GroupLabel::Text(a), GroupLabel::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupLabel::Bool(b) => write!(f, "{b}"),
            GroupLabel::Int(i) => write!(f, "{i}"),
            GroupLabel::Float(x) => write!(f, "{x}"),
            GroupLabel::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for GroupLabel {
    fn from(s: &str) -> Self {
        GroupLabel::Text(s.to_string())
    }
}

impl From<i64> for GroupLabel {
    fn from(i: i64) -> Self {
        GroupLabel::Int(i)
    }
}

/// Named, equal-length columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<(String, Column)>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column, builder style.
    ///
    /// Fails if the name is already taken or the length differs from the
    /// columns already present.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        column: impl Into<Column>,
    ) -> StatsResult<Self> {
        self.add_column(name, column)?;
        Ok(self)
    }

    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        column: impl Into<Column>,
    ) -> StatsResult<()> {
        let name = name.into();
        let column = column.into();

        if self.columns.iter().any(|(n, _)| *n == name) {
            return Err(StatsError::InvalidInput(format!("duplicate column '{name}'")));
        }
        if let Some(expected) = self.n_rows() {
            if column.len() != expected {
                return Err(StatsError::DimensionMismatch {
                    column: name,
                    expected,
                    found: column.len(),
                });
            }
        }

        self.columns.push((name, column));
        Ok(())
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> StatsResult<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| StatsError::InvalidColumn {
                name: name.to_string(),
                available: self.column_names().map(str::to_string).collect(),
            })
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Number of rows, or `None` if the dataset has no columns
    pub fn n_rows(&self) -> Option<usize> {
        self.columns.first().map(|(_, c)| c.len())
    }
}
