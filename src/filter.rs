//! Subsetting a [`Table`] by the user's current selections.
//!
//! Everything here is a pure function of its inputs: applying the same
//! criteria twice yields the same table as applying them once.

use crate::model::{Dimension, Record, Table};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashSet};

/// Inclusive date interval. When `start > end` nothing matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `[min InvoiceDate, max InvoiceDate]` over `table`, or `None` if no
    /// record carries a readable date.
    pub fn spanning(table: &Table) -> Option<Self> {
        let mut dates = table.iter().filter_map(|r| r.invoice_date);
        let first = dates.next()?;
        let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// Selected values for the categorical filters. An empty set places no
/// constraint on its field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    pub regions: BTreeSet<String>,
    pub states: BTreeSet<String>,
    pub cities: BTreeSet<String>,
}

impl CategoryFilter {
    pub fn with_regions<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn with_states<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn with_cities<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cities.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.states.is_empty() && self.cities.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        [
            (Dimension::Region, &self.regions),
            (Dimension::State, &self.states),
            (Dimension::City, &self.cities),
        ]
        .iter()
        .all(|(dim, selected)| selected.is_empty() || selected.contains(dim.of(record)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterCriteria {
    pub categories: CategoryFilter,
    pub date_range: DateRange,
}

impl FilterCriteria {
    pub fn new(categories: CategoryFilter, date_range: DateRange) -> Self {
        Self {
            categories,
            date_range,
        }
    }

    /// No categorical constraint and the full date span of `table`.
    pub fn unrestricted(table: &Table) -> Option<Self> {
        DateRange::spanning(table).map(|range| Self::new(CategoryFilter::default(), range))
    }

    /// Records with no invoice date never match.
    pub fn matches(&self, record: &Record) -> bool {
        self.categories.matches(record)
            && record
                .invoice_date
                .is_some_and(|d| self.date_range.contains(d))
    }
}

pub fn apply(table: &Table, criteria: &FilterCriteria) -> Table {
    if criteria.date_range.is_empty() {
        return Table::default();
    }
    table
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}

/// Only the categorical half of the criteria; dates are left untouched.
pub fn apply_categories(table: &Table, categories: &CategoryFilter) -> Table {
    if categories.is_empty() {
        return table.clone();
    }
    table
        .iter()
        .filter(|r| categories.matches(r))
        .cloned()
        .collect()
}

/// Values offered for a field, in first-seen order, blanks omitted.
pub fn distinct_values(table: &Table, dim: Dimension) -> Vec<String> {
    let mut seen = HashSet::new();
    table
        .iter()
        .map(|r| dim.of(r))
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, record};

    fn sample() -> Table {
        Table::new(vec![
            record("West", "California", "Los Angeles", "A", "2021-01-01", 100.0),
            record("East", "New York", "New York", "B", "2021-02-15", 50.0),
            record("West", "Washington", "Seattle", "A", "2021-03-31", 25.0),
            record("East", "New York", "Albany", "C", "not a date", 10.0),
        ])
    }

    #[test]
    fn spanning_covers_min_and_max() {
        let range = DateRange::spanning(&sample()).unwrap();
        assert_eq!(range.start, date("2021-01-01"));
        assert_eq!(range.end, date("2021-03-31"));
        assert_eq!(DateRange::spanning(&Table::default()), None);
    }

    #[test]
    fn unrestricted_criteria_keep_every_dated_record() {
        let table = Table::new(sample().records()[..3].to_vec());
        let criteria = FilterCriteria::unrestricted(&table).unwrap();
        assert_eq!(apply(&table, &criteria), table);
    }

    #[test]
    fn region_selection_keeps_only_that_region() {
        let table = sample();
        let criteria = FilterCriteria::new(
            CategoryFilter::default().with_regions(["West"]),
            DateRange::spanning(&table).unwrap(),
        );
        let filtered = apply(&table, &criteria);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.region == "West"));
    }

    #[test]
    fn selections_on_several_fields_combine() {
        let table = sample();
        let criteria = FilterCriteria::new(
            CategoryFilter::default()
                .with_regions(["West", "East"])
                .with_cities(["Seattle", "New York"]),
            DateRange::spanning(&table).unwrap(),
        );
        let cities: Vec<_> = apply(&table, &criteria)
            .iter()
            .map(|r| r.city.clone())
            .collect();
        assert_eq!(cities, vec!["New York", "Seattle"]);
    }

    #[test]
    fn date_bounds_are_inclusive_and_null_dates_excluded() {
        let table = sample();
        let criteria = FilterCriteria::new(
            CategoryFilter::default(),
            DateRange::new(date("2021-02-15"), date("2021-03-31")),
        );
        let filtered = apply(&table, &criteria);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.invoice_date.is_some()));
    }

    #[test]
    fn inverted_range_is_empty() {
        let criteria = FilterCriteria::new(
            CategoryFilter::default(),
            DateRange::new(date("2021-03-01"), date("2021-01-01")),
        );
        assert!(apply(&sample(), &criteria).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let table = sample();
        let criteria = FilterCriteria::new(
            CategoryFilter::default().with_states(["New York", "California"]),
            DateRange::new(date("2021-01-01"), date("2021-02-28")),
        );
        let once = apply(&table, &criteria);
        assert_eq!(apply(&once, &criteria), once);
    }

    #[test]
    fn category_only_filter_keeps_undated_rows() {
        let filtered = apply_categories(&sample(), &CategoryFilter::default().with_regions(["East"]));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn distinct_values_in_first_seen_order() {
        assert_eq!(distinct_values(&sample(), Dimension::Region), vec!["West", "East"]);
        assert_eq!(
            distinct_values(&sample(), Dimension::Retailer),
            vec!["A", "B", "C"]
        );
    }
}
