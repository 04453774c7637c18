//! Scalar KPIs and grouped sums over a [`Table`].
//!
//! Grouped results keep keys in the order they are first seen in the table;
//! call [`Grouped::sorted_by_key`] when a chart wants them ordered. Records
//! whose grouping value is blank do not contribute to any group.

use crate::model::{Dimension, Measure, Record, Table};
use std::collections::HashMap;
use std::hash::Hash;

/// Ordered key → value mapping produced by a group-by.
#[derive(Clone, Debug, PartialEq)]
pub struct Grouped<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for Grouped<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K, V> Grouped<K, V> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (K, V)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn sorted_by_key(mut self) -> Self
    where
        K: Ord,
    {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }
}

impl<K> Grouped<K, f64> {
    pub fn total(&self) -> f64 {
        self.values().sum()
    }
}

/// First-seen-order accumulation shared by every group-by below.
fn group_by<'a, K, V>(
    records: impl IntoIterator<Item = &'a Record>,
    key: impl Fn(&Record) -> Option<K>,
    value: impl Fn(&Record) -> V,
    add: impl Fn(&mut V, V),
) -> Grouped<K, V>
where
    K: Eq + Hash + Clone,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut entries: Vec<(K, V)> = Vec::new();
    for record in records {
        let Some(k) = key(record) else { continue };
        let v = value(record);
        match index.get(&k) {
            Some(&i) => add(&mut entries[i].1, v),
            None => {
                index.insert(k.clone(), entries.len());
                entries.push((k, v));
            }
        }
    }
    Grouped { entries }
}

fn non_blank(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

pub fn total_sales(table: &Table) -> f64 {
    table.iter().map(|r| r.total_sales).sum()
}

pub fn total_profit(table: &Table) -> f64 {
    table.iter().map(|r| r.operating_profit).sum()
}

/// Saturates at `i64::MAX` rather than overflowing.
pub fn total_units(table: &Table) -> i64 {
    table
        .iter()
        .map(|r| r.units_sold)
        .fold(0i64, i64::saturating_add)
}

pub fn order_count(table: &Table) -> usize {
    table.len()
}

/// Sum of `measure` for each distinct value of `group`.
pub fn sum_by_field(table: &Table, group: Dimension, measure: Measure) -> Grouped<String, f64> {
    group_by(
        table,
        |r| non_blank(group.of(r)),
        |r| measure.of(r),
        |acc: &mut f64, v: f64| *acc += v,
    )
}

/// Two-level grouping, e.g. region then city, for hierarchical charts.
pub fn sum_by_path(
    table: &Table,
    outer: Dimension,
    inner: Dimension,
    measure: Measure,
) -> Grouped<(String, String), f64> {
    group_by(
        table,
        |r| Some((non_blank(outer.of(r))?, non_blank(inner.of(r))?)),
        |r| measure.of(r),
        |acc: &mut f64, v: f64| *acc += v,
    )
}

/// Total sales per calendar month, keyed `YYYY-MM`. Undated records are skipped.
pub fn monthly_sales(table: &Table) -> Grouped<String, f64> {
    group_by(
        table,
        |r| r.invoice_date.map(|d| d.format("%Y-%m").to_string()),
        |r| r.total_sales,
        |acc: &mut f64, v: f64| *acc += v,
    )
}

/// Two measures summed side by side per group, for dual-axis charts.
pub fn sum_two_measures_by_field(
    table: &Table,
    group: Dimension,
    a: Measure,
    b: Measure,
) -> Grouped<String, (f64, f64)> {
    group_by(
        table,
        |r| non_blank(group.of(r)),
        |r| (a.of(r), b.of(r)),
        |acc: &mut (f64, f64), (va, vb): (f64, f64)| {
            acc.0 += va;
            acc.1 += vb;
        },
    )
}

/// The headline numbers shown above the charts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Kpis {
    pub total_sales: f64,
    pub total_profit: f64,
    pub total_units: i64,
    pub order_count: usize,
}

impl Kpis {
    pub fn from_table(table: &Table) -> Self {
        Self {
            total_sales: total_sales(table),
            total_profit: total_profit(table),
            total_units: total_units(table),
            order_count: order_count(table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn two_retailers_scenario() {
        let table = Table::new(vec![
            record("West", "California", "Los Angeles", "A", "2021-01-01", 100.0),
            record("East", "New York", "New York", "B", "2021-01-02", 50.0),
        ]);

        let by_retailer = sum_by_field(&table, Dimension::Retailer, Measure::TotalSales);
        assert_eq!(
            by_retailer.clone().into_entries(),
            vec![("A".to_string(), 100.0), ("B".to_string(), 50.0)]
        );
        assert_eq!(by_retailer.get("A"), Some(&100.0));
        assert_eq!(total_sales(&table), 150.0);
        assert_eq!(order_count(&table), 2);
    }

    #[test]
    fn empty_table_yields_zeros_and_empty_groups() {
        let table = Table::default();
        assert_eq!(Kpis::from_table(&table), Kpis::default());
        assert!(sum_by_field(&table, Dimension::State, Measure::UnitsSold).is_empty());
        assert!(monthly_sales(&table).is_empty());
        assert!(sum_by_path(&table, Dimension::Region, Dimension::City, Measure::TotalSales)
            .is_empty());
    }

    #[test]
    fn group_sums_match_total_for_named_retailers() {
        let table = Table::new(vec![
            record("West", "California", "Los Angeles", "A", "2021-01-01", 10.5),
            record("West", "California", "San Diego", "", "2021-01-01", 99.0),
            record("East", "Maine", "Portland", "B", "2021-01-03", 4.25),
            record("East", "Maine", "Portland", "A", "2021-01-04", 1.0),
        ]);
        let by_retailer = sum_by_field(&table, Dimension::Retailer, Measure::TotalSales);
        let named: Table = table
            .iter()
            .filter(|r| !r.retailer.is_empty())
            .cloned()
            .collect();
        assert_eq!(by_retailer.len(), 2);
        assert_eq!(by_retailer.total(), total_sales(&named));
    }

    #[test]
    fn monthly_sales_groups_by_year_month_and_skips_undated() {
        let table = Table::new(vec![
            record("W", "S", "C", "A", "2021-02-10", 5.0),
            record("W", "S", "C", "A", "2021-01-31", 1.0),
            record("W", "S", "C", "A", "2021-02-01", 2.0),
            record("W", "S", "C", "A", "not a date", 1000.0),
        ]);
        let monthly = monthly_sales(&table);
        assert_eq!(monthly.keys().collect::<Vec<_>>(), vec!["2021-02", "2021-01"]);
        let sorted = monthly.sorted_by_key();
        assert_eq!(
            sorted.into_entries(),
            vec![("2021-01".to_string(), 1.0), ("2021-02".to_string(), 7.0)]
        );
    }

    #[test]
    fn path_grouping_keeps_both_levels() {
        let table = Table::new(vec![
            record("West", "California", "Los Angeles", "A", "2021-01-01", 3.0),
            record("West", "California", "San Diego", "A", "2021-01-01", 4.0),
            record("West", "California", "Los Angeles", "B", "2021-01-01", 5.0),
        ]);
        let tree = sum_by_path(&table, Dimension::Region, Dimension::City, Measure::TotalSales);
        assert_eq!(
            tree.into_entries(),
            vec![
                (("West".to_string(), "Los Angeles".to_string()), 8.0),
                (("West".to_string(), "San Diego".to_string()), 4.0),
            ]
        );
    }

    #[test]
    fn two_measures_per_state() {
        let mut first = record("W", "Texas", "Houston", "A", "2021-01-01", 100.0);
        first.units_sold = 3;
        let mut second = record("W", "Texas", "Dallas", "A", "2021-01-01", 20.0);
        second.units_sold = 7;
        let table = Table::new(vec![first, second]);

        let by_state = sum_two_measures_by_field(
            &table,
            Dimension::State,
            Measure::TotalSales,
            Measure::UnitsSold,
        );
        assert_eq!(by_state.get("Texas"), Some(&(120.0, 10.0)));
    }

    #[test]
    fn kpis_sum_every_measure() {
        let mut rec = record("W", "S", "C", "A", "2021-01-01", 200.0);
        rec.operating_profit = 80.0;
        rec.units_sold = 4;
        let table = Table::new(vec![rec.clone(), rec]);
        let kpis = Kpis::from_table(&table);
        assert_eq!(kpis.total_sales, 400.0);
        assert_eq!(kpis.total_profit, 160.0);
        assert_eq!(kpis.total_units, 8);
        assert_eq!(kpis.order_count, 2);
    }

    #[test]
    fn unit_total_saturates_instead_of_overflowing() {
        let mut huge = record("W", "S", "C", "A", "2021-01-01", 1.0);
        huge.units_sold = crate::normalize::parse_units("9223372036854775807");
        let mut one = huge.clone();
        one.units_sold = crate::normalize::parse_units("1");
        let table = Table::new(vec![huge, one]);

        assert_eq!(total_units(&table), i64::MAX);
        assert_eq!(Kpis::from_table(&table).total_units, i64::MAX);
    }
}
