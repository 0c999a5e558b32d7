//! Multi-column sorting for the row model
//!
//! Sort keys are applied in priority order; rows that tie on every key keep
//! their incoming relative order.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use stockroom_core::Value;
use unicase::UniCase;

use crate::column::ColumnDef;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// A column to sort by with its direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortColumn {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortColumn {
    pub fn new(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_id: column_id.into(),
            direction,
        }
    }

    pub fn ascending(column_id: impl Into<String>) -> Self {
        Self::new(column_id, SortDirection::Ascending)
    }

    pub fn descending(column_id: impl Into<String>) -> Self {
        Self::new(column_id, SortDirection::Descending)
    }
}

/// Configuration for missing values in sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NullPosition {
    /// Missing values appear first
    First,
    /// Missing values appear last, whatever the direction
    #[default]
    Last,
}

/// Multi-column sort configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiColumnSort {
    /// Columns to sort by, in priority order (first = highest priority)
    columns: Vec<SortColumn>,
    null_position: NullPosition,
}

impl MultiColumnSort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_null_position(null_position: NullPosition) -> Self {
        Self {
            columns: Vec::new(),
            null_position,
        }
    }

    pub fn add_column(&mut self, column: SortColumn) {
        self.columns.retain(|c| c.column_id != column.column_id);
        self.columns.push(column);
    }

    pub fn add_ascending(&mut self, column_id: impl Into<String>) {
        self.add_column(SortColumn::ascending(column_id));
    }

    pub fn add_descending(&mut self, column_id: impl Into<String>) {
        self.add_column(SortColumn::descending(column_id));
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[SortColumn] {
        &self.columns
    }

    pub fn null_position(&self) -> NullPosition {
        self.null_position
    }

    pub fn set_null_position(&mut self, position: NullPosition) {
        self.null_position = position;
    }

    /// Current direction for a column, if it is part of the sort
    pub fn direction_of(&self, column_id: &str) -> Option<SortDirection> {
        self.columns
            .iter()
            .find(|c| c.column_id == column_id)
            .map(|c| c.direction)
    }

    /// Zero-based priority of a column within the sort
    pub fn priority_of(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.column_id == column_id)
    }

    /// Cycle a column through ascending → descending → unsorted, making it
    /// the only sort key.
    pub fn toggle(&mut self, column_id: &str) {
        let next = match self.direction_of(column_id) {
            None => Some(SortDirection::Ascending),
            Some(SortDirection::Ascending) => Some(SortDirection::Descending),
            Some(SortDirection::Descending) => None,
        };
        self.columns.clear();
        if let Some(direction) = next {
            self.columns.push(SortColumn::new(column_id, direction));
        }
    }

    /// Cycle a column through ascending → descending → unsorted while keeping
    /// the other keys. New keys get the lowest priority.
    pub fn toggle_multi(&mut self, column_id: &str) {
        match self.priority_of(column_id) {
            None => self.columns.push(SortColumn::ascending(column_id)),
            Some(ix) => match self.columns[ix].direction {
                SortDirection::Ascending => self.columns[ix].direction = SortDirection::Descending,
                SortDirection::Descending => {
                    self.columns.remove(ix);
                }
            },
        }
    }

    /// Compare two cell keys; missing keys go where `null_position` says
    fn compare_keys(&self, a: &Option<SortKey>, b: &Option<SortKey>, direction: SortDirection) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => match self.null_position {
                NullPosition::First => Ordering::Less,
                NullPosition::Last => Ordering::Greater,
            },
            (Some(_), None) => match self.null_position {
                NullPosition::First => Ordering::Greater,
                NullPosition::Last => Ordering::Less,
            },
            (Some(a), Some(b)) => direction.apply(a.cmp(b)),
        }
    }

    /// Compare two precomputed key rows
    fn compare_rows(&self, keys_a: &[Option<SortKey>], keys_b: &[Option<SortKey>], directions: &[SortDirection]) -> Ordering {
        for ((a, b), direction) in keys_a.iter().zip(keys_b).zip(directions) {
            let ordering = self.compare_keys(a, b, *direction);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Stable-sort row indices by the configured keys.
    ///
    /// Keys naming unknown or unsortable columns are skipped.
    pub(crate) fn sort_indices<T>(&self, indices: &mut Vec<usize>, rows: &[T], columns: &[ColumnDef<T>]) {
        let keys: Vec<(&ColumnDef<T>, SortDirection)> = self
            .columns
            .iter()
            .filter_map(|sort_col| {
                columns
                    .iter()
                    .find(|c| c.id() == sort_col.column_id && c.can_sort())
                    .map(|c| (c, sort_col.direction))
            })
            .collect();

        if keys.is_empty() {
            return;
        }

        let directions: Vec<SortDirection> = keys.iter().map(|(_, d)| *d).collect();
        let mut decorated: Vec<(usize, Vec<Option<SortKey>>)> = indices
            .iter()
            .map(|&ix| {
                let row = &rows[ix];
                let row_keys = keys
                    .iter()
                    .map(|(column, _)| SortKey::from_value(&column.value(row)))
                    .collect();
                (ix, row_keys)
            })
            .collect();

        // `sort_by` is stable, which is what keeps ties in source order
        decorated.sort_by(|(_, a), (_, b)| self.compare_rows(a, b, &directions));

        indices.clear();
        indices.extend(decorated.into_iter().map(|(ix, _)| ix));
    }
}

/// Comparable form of a non-missing cell.
///
/// Keys of different kinds order as booleans, numbers, instants, then text,
/// so mixed columns still sort by a total order.
#[derive(Debug, Clone)]
enum SortKey {
    Bool(bool),
    Number(f64),
    Instant(NaiveDateTime),
    Text(String),
}

impl SortKey {
    /// `None` for cells that sort with the nulls: `Null`, NaN and
    /// decimals that do not parse
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Bool(*b)),
            v if v.is_numeric() => v.as_f64().filter(|n| !n.is_nan()).map(Self::Number),
            v if v.is_temporal() => v.as_datetime().map(Self::Instant),
            other => Some(Self::Text(other.to_string())),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Number(_) => 1,
            Self::Instant(_) => 2,
            Self::Text(_) => 3,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Instant(a), Self::Instant(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => collate(a, b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

/// Case-insensitive Unicode order, exact code points as tie-break
fn collate(a: &str, b: &str) -> Ordering {
    UniCase::new(a)
        .cmp(&UniCase::new(b))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        qty: Option<i64>,
    }

    fn item(name: &'static str, qty: Option<i64>) -> Item {
        Item { name, qty }
    }

    fn columns() -> Vec<ColumnDef<Item>> {
        vec![
            ColumnDef::accessor("name", "Name", |i: &Item| i.name.into()),
            ColumnDef::accessor("qty", "Qty", |i: &Item| i.qty.into()),
            ColumnDef::display("actions", "", "Edit"),
        ]
    }

    fn sorted(sort: &MultiColumnSort, rows: &[Item]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        sort.sort_indices(&mut indices, rows, &columns());
        indices
    }

    #[test]
    fn test_single_column_sort_ascending() {
        let rows = vec![item("c", Some(3)), item("a", Some(1)), item("b", Some(2))];

        let mut sort = MultiColumnSort::new();
        sort.add_ascending("qty");

        assert_eq!(sorted(&sort, &rows), vec![1, 2, 0]);
    }

    #[test]
    fn test_single_column_sort_descending() {
        let rows = vec![item("a", Some(1)), item("c", Some(3)), item("b", Some(2))];

        let mut sort = MultiColumnSort::new();
        sort.add_descending("qty");

        assert_eq!(sorted(&sort, &rows), vec![1, 2, 0]);
    }

    #[test]
    fn test_multi_column_sort() {
        let rows = vec![
            item("A", Some(2)),
            item("B", Some(1)),
            item("A", Some(1)),
            item("B", Some(2)),
        ];

        let mut sort = MultiColumnSort::new();
        sort.add_ascending("name");
        sort.add_descending("qty");

        assert_eq!(sorted(&sort, &rows), vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_ties_keep_source_order_in_both_directions() {
        let rows = vec![
            item("first", Some(1)),
            item("second", Some(1)),
            item("third", Some(0)),
            item("fourth", Some(1)),
        ];

        let mut sort = MultiColumnSort::new();
        sort.add_ascending("qty");
        assert_eq!(sorted(&sort, &rows), vec![2, 0, 1, 3]);

        sort.toggle_multi("qty");
        assert_eq!(sorted(&sort, &rows), vec![0, 1, 3, 2]);
    }

    #[test]
    fn test_null_values_sorted_last_in_both_directions() {
        let rows = vec![item("a", None), item("b", Some(2)), item("c", Some(1)), item("d", None)];

        let mut sort = MultiColumnSort::new();
        sort.add_ascending("qty");
        assert_eq!(sorted(&sort, &rows), vec![2, 1, 0, 3]);

        sort.toggle_multi("qty");
        assert_eq!(sorted(&sort, &rows), vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_null_values_sorted_first() {
        let rows = vec![item("a", Some(2)), item("b", None), item("c", Some(1))];

        let mut sort = MultiColumnSort::with_null_position(NullPosition::First);
        sort.add_ascending("qty");

        assert_eq!(sorted(&sort, &rows), vec![1, 2, 0]);
    }

    #[test]
    fn test_string_sort_ignores_case() {
        let rows = vec![item("banana", None), item("Apple", None), item("cherry", None)];

        let mut sort = MultiColumnSort::new();
        sort.add_ascending("name");

        assert_eq!(sorted(&sort, &rows), vec![1, 0, 2]);
    }

    #[test]
    fn test_unknown_and_static_columns_are_ignored() {
        let rows = vec![item("b", Some(1)), item("a", Some(2))];

        let mut sort = MultiColumnSort::new();
        sort.add_ascending("missing");
        sort.add_ascending("actions");

        assert_eq!(sorted(&sort, &rows), vec![0, 1]);
    }

    #[test]
    fn test_toggle_cycles_and_replaces_other_keys() {
        let mut sort = MultiColumnSort::new();
        sort.add_ascending("name");

        sort.toggle("qty");
        assert_eq!(sort.columns(), &[SortColumn::ascending("qty")]);
        sort.toggle("qty");
        assert_eq!(sort.columns(), &[SortColumn::descending("qty")]);
        sort.toggle("qty");
        assert!(sort.is_empty());
    }

    #[test]
    fn test_toggle_multi_keeps_priority() {
        let mut sort = MultiColumnSort::new();
        sort.toggle_multi("name");
        sort.toggle_multi("qty");
        sort.toggle_multi("name");

        assert_eq!(
            sort.columns(),
            &[SortColumn::descending("name"), SortColumn::ascending("qty")]
        );
        assert_eq!(sort.priority_of("qty"), Some(1));

        sort.toggle_multi("name");
        assert_eq!(sort.columns(), &[SortColumn::ascending("qty")]);
    }

    fn key_cmp(a: Value, b: Value) -> Ordering {
        SortKey::from_value(&a).cmp(&SortKey::from_value(&b))
    }

    #[test]
    fn test_compare_mixed_values() {
        assert_eq!(key_cmp(Value::Int64(10), Value::Float64(9.5)), Ordering::Greater);
        assert_eq!(key_cmp(Value::Decimal("2.50".into()), Value::Int64(3)), Ordering::Less);

        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(
            key_cmp(Value::Date(day), Value::DateTime(day.and_hms_opt(8, 0, 0).unwrap())),
            Ordering::Less
        );

        // Numbers before text, whatever the text looks like
        assert_eq!(key_cmp(Value::Int64(500), Value::String("12".into())), Ordering::Less);
        assert_eq!(key_cmp(Value::String("abc".into()), Value::Int64(1)), Ordering::Greater);
    }

    #[test]
    fn test_nan_and_unparseable_numbers_sort_with_nulls() {
        assert_eq!(SortKey::from_value(&Value::Float64(f64::NAN)), None);
        assert_eq!(SortKey::from_value(&Value::Decimal("n/a".into())), None);

        let columns = vec![ColumnDef::accessor("price", "Price", |v: &Value| v.clone())];
        let rows = vec![
            Value::Float64(3.0),
            Value::Float64(f64::NAN),
            Value::Decimal("n/a".into()),
            Value::Float64(1.0),
            Value::Decimal("2.00".into()),
        ];
        let order = |sort: &MultiColumnSort| {
            let mut indices: Vec<usize> = (0..rows.len()).collect();
            sort.sort_indices(&mut indices, &rows, &columns);
            indices
        };

        let mut sort = MultiColumnSort::new();
        sort.add_ascending("price");
        assert_eq!(order(&sort), vec![3, 4, 0, 1, 2]);

        sort.toggle_multi("price");
        assert_eq!(order(&sort), vec![0, 4, 3, 1, 2]);
    }

    #[test]
    fn test_mixed_column_sorts_in_both_directions() {
        let columns = vec![ColumnDef::accessor("code", "Code", |v: &Value| v.clone())];
        let rows = vec![
            Value::String("beta".into()),
            Value::Int64(7),
            Value::Null,
            Value::String("Alpha".into()),
            Value::Float64(-1.5),
            Value::Bool(true),
        ];
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        let mut sort = MultiColumnSort::new();
        sort.add_ascending("code");

        sort.sort_indices(&mut indices, &rows, &columns);
        assert_eq!(indices, vec![5, 4, 1, 3, 0, 2]);

        sort.toggle_multi("code");
        sort.sort_indices(&mut indices, &rows, &columns);
        assert_eq!(indices, vec![0, 3, 1, 4, 5, 2]);
    }
}
