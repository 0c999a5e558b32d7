//! Filter state and predicate evaluation
//!
//! A row passes when it matches the global text filter (if any) and every
//! active per-column filter. Inactive values (empty text, unbounded ranges,
//! empty sets) are never stored: setting one clears that column's filter.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use stockroom_core::Value;

use crate::column::ColumnDef;

/// Inclusive date range; either bound may be open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Self {
        Self { from, to }
    }

    /// Whole-day range: `from` starts at midnight, `to` covers its entire day
    pub fn days(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        let end_of_day = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999);
        Self {
            from: from.map(|d| d.and_time(NaiveTime::MIN)),
            to: to.and_then(|d| end_of_day.map(|t| d.and_time(t))),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.from.is_none_or(|from| from <= instant) && self.to.is_none_or(|to| instant <= to)
    }
}

/// Inclusive numeric range; either bound may be open
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumberRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, number: f64) -> bool {
        self.min.is_none_or(|min| min <= number) && self.max.is_none_or(|max| number <= max)
    }
}

/// A filter value for a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    /// Case-insensitive substring match against the cell's display string
    Text(String),
    /// Cell must be a date inside the range; unparseable cells never match
    DateRange(DateRange),
    /// Cell must be numeric and inside the range
    NumberRange(NumberRange),
    /// Cell's display string must be one of the selected options
    OneOf(BTreeSet<String>),
}

impl FilterValue {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn one_of<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(options.into_iter().map(Into::into).collect())
    }

    /// Whether this value constrains anything at all
    pub fn is_active(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::DateRange(range) => !range.is_unbounded(),
            Self::NumberRange(range) => !range.is_unbounded(),
            Self::OneOf(options) => !options.is_empty(),
        }
    }

    /// Evaluate this filter against a cell value
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Text(needle) => contains_ignore_case(&value.to_string(), needle),
            Self::DateRange(range) => value
                .as_datetime()
                .is_some_and(|instant| range.contains(instant)),
            Self::NumberRange(range) => value.as_f64().is_some_and(|n| range.contains(n)),
            Self::OneOf(options) => options.contains(&value.to_string()),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Committed filter state of a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    columns: IndexMap<String, FilterValue>,
    global: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the filter for one column. Returns true if the state changed.
    pub fn set_column(&mut self, column_id: &str, value: Option<FilterValue>) -> bool {
        match value.filter(FilterValue::is_active) {
            Some(value) => {
                if self.columns.get(column_id) == Some(&value) {
                    return false;
                }
                self.columns.insert(column_id.to_string(), value);
                true
            }
            None => self.columns.shift_remove(column_id).is_some(),
        }
    }

    /// Replace the cross-column text filter. Returns true if the state changed.
    pub fn set_global(&mut self, value: Option<String>) -> bool {
        let value = value.filter(|text| !text.is_empty());
        if self.global == value {
            return false;
        }
        self.global = value;
        true
    }

    pub fn column(&self, column_id: &str) -> Option<&FilterValue> {
        self.columns.get(column_id)
    }

    pub fn global(&self) -> Option<&str> {
        self.global.as_deref()
    }

    /// Active column filters in the order they were first set
    pub fn columns(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.columns.iter().map(|(id, value)| (id.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.global.is_none()
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.is_empty();
        self.columns.clear();
        self.global = None;
        changed
    }

    /// Evaluate every active filter against a row
    pub(crate) fn row_matches<T>(&self, row: &T, columns: &[ColumnDef<T>]) -> bool {
        if let Some(needle) = &self.global {
            let hit = columns
                .iter()
                .filter(|column| column.can_filter())
                .any(|column| contains_ignore_case(&column.value(row).to_string(), needle));
            if !hit {
                return false;
            }
        }

        self.columns.iter().all(|(column_id, filter)| {
            match columns.iter().find(|column| column.id() == column_id) {
                Some(column) => filter.matches(&column.value(row)),
                // Only known columns are ever stored
                None => true,
            }
        })
    }
}
