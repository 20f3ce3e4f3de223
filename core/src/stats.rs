//! Derived figures for the dashboard and history views.
//!
//! Everything here is a pure function of an ordered history slice (newest
//! first) and, where relevant, the biodata profile.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

use crate::models::{BloodPressureRecord, PRAYER_NAMES, PrayerRecord, PressureStatus, WeightRecord};
use crate::sync::{DashboardData, TrackedRecord};

/// Rounded integer percentage; 0 when the total is 0.
#[must_use]
pub fn percentage(value: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (value * 100 + total / 2) / total
}

/// Arithmetic mean rounded to two decimals; 0 for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().sum();
    (sum / values.len() as f64 * 100.0).round() / 100.0
}

/// Latest weight reading and the change against the previous entry.
#[derive(Debug, Clone, Serialize)]
pub struct WeightSummary {
    pub date: NaiveDate,
    pub latest_kg: f64,
    pub change_kg: Option<f64>,
}

#[must_use]
pub fn weight_summary(history: &[WeightRecord]) -> Option<WeightSummary> {
    let latest = history.first()?;
    let change_kg = history.get(1).map(|prev| latest.evening_kg - prev.evening_kg);
    Some(WeightSummary {
        date: latest.date,
        latest_kg: latest.evening_kg,
        change_kg,
    })
}

/// Latest averaged blood-pressure reading with its classification.
#[derive(Debug, Clone, Serialize)]
pub struct PressureSummary {
    pub date: NaiveDate,
    pub systolic: i32,
    pub diastolic: i32,
    pub status: PressureStatus,
}

#[must_use]
pub fn pressure_summary(history: &[BloodPressureRecord]) -> Option<PressureSummary> {
    let latest = history.first()?;
    Some(PressureSummary {
        date: latest.date,
        systolic: latest.average_systolic(),
        diastolic: latest.average_diastolic(),
        status: latest.status(),
    })
}

/// Percentage of all possible prayers (7 per day) completed in the given
/// month; `None` when the month has no records.
#[must_use]
pub fn monthly_prayer_percentage(
    history: &[PrayerRecord],
    year: i32,
    month: u32,
) -> Option<u32> {
    let records: Vec<&PrayerRecord> = history
        .iter()
        .filter(|r| r.date.year() == year && r.date.month() == month)
        .collect();
    if records.is_empty() {
        return None;
    }
    let completed: u32 = records.iter().map(|r| u32::from(r.total)).sum();
    let possible = 7 * records.len() as u32;
    Some(percentage(completed, possible))
}

/// Per-prayer completion percentages over a record set, in checklist order.
#[must_use]
pub fn prayer_completion(history: &[PrayerRecord]) -> Vec<(&'static str, u32)> {
    let total = history.len() as u32;
    let mut counts = [0u32; 7];
    for record in history {
        for (count, done) in counts.iter_mut().zip(record.flags()) {
            if done {
                *count += 1;
            }
        }
    }
    PRAYER_NAMES
        .iter()
        .zip(counts)
        .map(|(name, count)| (*name, percentage(count, total)))
        .collect()
}

/// Mean of the daily weight averages, grouped by `YYYY-MM` (ascending).
#[must_use]
pub fn monthly_weight_averages(history: &[WeightRecord]) -> Vec<(String, f64)> {
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in history {
        grouped
            .entry(month_key(record.date))
            .or_default()
            .push(record.average_kg());
    }
    grouped
        .into_iter()
        .map(|(month, values)| (month, mean(&values)))
        .collect()
}

/// Mean of the daily systolic averages, grouped by `YYYY-MM` (ascending).
#[must_use]
pub fn monthly_systolic_averages(history: &[BloodPressureRecord]) -> Vec<(String, f64)> {
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in history {
        grouped
            .entry(month_key(record.date))
            .or_default()
            .push(f64::from(record.average_systolic()));
    }
    grouped
        .into_iter()
        .map(|(month, values)| (month, mean(&values)))
        .collect()
}

fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// One row of the recent-days overview: whatever was logged that day.
#[derive(Debug, Clone, Serialize)]
pub struct DayOverview {
    pub date: NaiveDate,
    pub weight_avg_kg: Option<f64>,
    pub pressure: Option<(i32, i32)>,
    pub prayers_total: Option<u8>,
}

/// The last `days` calendar days, today first, with gaps left visible.
#[must_use]
pub fn recent_overview(data: &DashboardData, today: NaiveDate, days: u32) -> Vec<DayOverview> {
    (0..days)
        .map(|offset| {
            let date = today - Duration::days(i64::from(offset));
            DayOverview {
                date,
                weight_avg_kg: data
                    .weight
                    .iter()
                    .find(|r| r.date == date)
                    .map(WeightRecord::average_kg),
                pressure: data
                    .pressure
                    .iter()
                    .find(|r| r.date == date)
                    .map(|r| (r.average_systolic(), r.average_diastolic())),
                prayers_total: data.prayer.iter().find(|r| r.date == date).map(|r| r.total),
            }
        })
        .collect()
}

/// Relative date ranges behind the history filter buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    #[must_use]
    pub fn start_from(self, today: NaiveDate) -> NaiveDate {
        match self {
            Period::Day => today - Duration::days(1),
            Period::Week => today - Duration::days(7),
            Period::Month => today.checked_sub_months(Months::new(1)).unwrap_or(today),
            Period::Year => today.checked_sub_months(Months::new(12)).unwrap_or(today),
        }
    }
}

/// Records falling inside the period, inclusive on both ends.
#[must_use]
pub fn filter_period<R: TrackedRecord>(records: &[R], period: Period, today: NaiveDate) -> Vec<R> {
    let start = period.start_from(today);
    records
        .iter()
        .filter(|r| r.date() >= start && r.date() <= today)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerRecord;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn weight(day: &str, morning: f64, evening: f64) -> WeightRecord {
        WeightRecord {
            date: date(day),
            morning_kg: morning,
            evening_kg: evening,
        }
    }

    fn pressure(day: &str, sys_am: i32, dia_am: i32, sys_pm: i32, dia_pm: i32) -> BloodPressureRecord {
        BloodPressureRecord {
            date: date(day),
            systolic_morning: sys_am,
            diastolic_morning: dia_am,
            systolic_evening: sys_pm,
            diastolic_evening: dia_pm,
            medication_taken: false,
            meal_morning: String::new(),
            meal_afternoon: String::new(),
            meal_evening: String::new(),
        }
    }

    #[test]
    fn test_percentage_rounds() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(7, 7), 100);
    }

    #[test]
    fn test_percentage_zero_total() {
        assert_eq!(percentage(5, 0), 0);
    }

    #[test]
    fn test_mean_rounds_to_two_decimals() {
        assert!((mean(&[1.0, 2.0]) - 1.5).abs() < 1e-9);
        assert!((mean(&[75.231, 75.233]) - 75.23).abs() < 1e-9);
        assert!((mean(&[]) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_weight_summary_change() {
        let history = vec![
            weight("2024-01-05", 75.2, 75.8),
            weight("2024-01-04", 75.6, 76.1),
        ];
        let summary = weight_summary(&history).unwrap();
        assert_eq!(summary.date, date("2024-01-05"));
        assert!((summary.latest_kg - 75.8).abs() < 1e-9);
        assert!((summary.change_kg.unwrap() - (-0.3)).abs() < 1e-9);
    }

    #[test]
    fn test_weight_summary_single_entry_has_no_change() {
        let history = vec![weight("2024-01-05", 75.2, 75.8)];
        let summary = weight_summary(&history).unwrap();
        assert!(summary.change_kg.is_none());
        assert!(weight_summary(&[]).is_none());
    }

    #[test]
    fn test_pressure_summary() {
        let history = vec![pressure("2024-01-05", 124, 82, 120, 80)];
        let summary = pressure_summary(&history).unwrap();
        assert_eq!(summary.systolic, 122);
        assert_eq!(summary.diastolic, 81);
        assert_eq!(summary.status, PressureStatus::High);
    }

    #[test]
    fn test_monthly_prayer_percentage() {
        let history = vec![
            PrayerRecord::new(date("2024-01-05"), [true; 7]),
            PrayerRecord::new(
                date("2024-01-04"),
                [true, true, true, true, true, false, false],
            ),
            // different month, must not count
            PrayerRecord::new(date("2023-12-31"), [false; 7]),
        ];
        // (7 + 5) of 14 possible
        assert_eq!(monthly_prayer_percentage(&history, 2024, 1), Some(86));
        assert_eq!(monthly_prayer_percentage(&history, 2024, 2), None);
    }

    #[test]
    fn test_prayer_completion_per_prayer() {
        let history = vec![
            PrayerRecord::new(
                date("2024-01-05"),
                [true, true, false, false, false, false, false],
            ),
            PrayerRecord::new(
                date("2024-01-04"),
                [true, false, false, false, false, false, false],
            ),
        ];
        let completion = prayer_completion(&history);
        assert_eq!(completion[0], ("subuh", 100));
        assert_eq!(completion[1], ("dzuhur", 50));
        assert_eq!(completion[2], ("ashar", 0));
    }

    #[test]
    fn test_monthly_weight_averages_groups_by_month() {
        let history = vec![
            weight("2024-02-01", 74.0, 74.4),
            weight("2024-01-05", 75.2, 75.8),
            weight("2024-01-04", 75.6, 76.0),
        ];
        let averages = monthly_weight_averages(&history);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].0, "2024-01");
        // (75.5 + 75.8) / 2
        assert!((averages[0].1 - 75.65).abs() < 1e-9);
        assert_eq!(averages[1].0, "2024-02");
        assert!((averages[1].1 - 74.2).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_systolic_averages() {
        let history = vec![
            pressure("2024-01-05", 120, 80, 118, 78),
            pressure("2024-01-04", 130, 85, 128, 82),
        ];
        let averages = monthly_systolic_averages(&history);
        assert_eq!(averages.len(), 1);
        // daily averages 119 and 129
        assert!((averages[0].1 - 124.0).abs() < 1e-9);
    }

    #[test]
    fn test_recent_overview_leaves_gaps() {
        let data = DashboardData {
            weight: vec![weight("2024-01-05", 75.2, 75.8)],
            pressure: vec![pressure("2024-01-04", 120, 80, 118, 78)],
            prayer: vec![PrayerRecord::new(
                date("2024-01-05"),
                [true, true, true, false, false, false, false],
            )],
        };
        let rows = recent_overview(&data, date("2024-01-05"), 3);
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].date, date("2024-01-05"));
        assert!((rows[0].weight_avg_kg.unwrap() - 75.5).abs() < 1e-9);
        assert!(rows[0].pressure.is_none());
        assert_eq!(rows[0].prayers_total, Some(3));

        assert_eq!(rows[1].date, date("2024-01-04"));
        assert!(rows[1].weight_avg_kg.is_none());
        assert_eq!(rows[1].pressure, Some((119, 79)));

        assert!(rows[2].weight_avg_kg.is_none());
        assert!(rows[2].pressure.is_none());
        assert!(rows[2].prayers_total.is_none());
    }

    #[test]
    fn test_period_ranges() {
        let today = date("2024-03-15");
        assert_eq!(Period::Day.start_from(today), date("2024-03-14"));
        assert_eq!(Period::Week.start_from(today), date("2024-03-08"));
        assert_eq!(Period::Month.start_from(today), date("2024-02-15"));
        assert_eq!(Period::Year.start_from(today), date("2023-03-15"));
    }

    #[test]
    fn test_filter_period_inclusive() {
        let history = vec![
            weight("2024-03-15", 75.0, 75.2),
            weight("2024-03-08", 75.4, 75.6),
            weight("2024-03-07", 75.8, 76.0),
        ];
        let filtered = filter_period(&history, Period::Week, date("2024-03-15"));
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[1].date, date("2024-03-08"));
    }
}
