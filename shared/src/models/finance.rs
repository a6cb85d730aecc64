//! Daily finance aggregates (`pos_daily_finance`)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One business day of a location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DailyFinance {
    pub tenant_id: String,
    pub location_id: i64,
    pub business_date: NaiveDate,
    pub sales: f64,
    pub budget: f64,
    pub labour_cost: f64,
    pub waste_total: f64,
}

/// Totals over a date range
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceTotals {
    pub sales: f64,
    pub budget: f64,
    pub labour_cost: f64,
    pub waste_total: f64,
    pub days: u32,
}

impl FinanceTotals {
    pub fn from_days(days: &[DailyFinance]) -> Self {
        days.iter().fold(Self::default(), |acc, d| Self {
            sales: acc.sales + d.sales,
            budget: acc.budget + d.budget,
            labour_cost: acc.labour_cost + d.labour_cost,
            waste_total: acc.waste_total + d.waste_total,
            days: acc.days + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, sales: f64) -> DailyFinance {
        DailyFinance {
            tenant_id: "t1".into(),
            location_id: 1,
            business_date: date.parse().unwrap(),
            sales,
            budget: 1000.0,
            labour_cost: 300.0,
            waste_total: 10.0,
        }
    }

    #[test]
    fn totals_sum_every_day() {
        let totals = FinanceTotals::from_days(&[day("2026-10-01", 900.0), day("2026-10-02", 1100.0)]);
        assert_eq!(totals.days, 2);
        assert!((totals.sales - 2000.0).abs() < 1e-9);
        assert!((totals.budget - 2000.0).abs() < 1e-9);
        assert!((totals.labour_cost - 600.0).abs() < 1e-9);
        assert!((totals.waste_total - 20.0).abs() < 1e-9);
    }

    #[test]
    fn empty_range_is_zero() {
        assert_eq!(FinanceTotals::from_days(&[]), FinanceTotals::default());
    }
}
