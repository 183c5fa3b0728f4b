//! CSV export of per-day summaries.
//!
//! Rows are appended; the header is written only when the file is new or
//! empty. The file is synced to disk before returning.

use crate::ledger::DailySnapshot;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::Path;

/// One exported day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRow {
    pub date: String,
    pub calorie_goal: f64,
    pub consumed: f64,
    pub burned: f64,
    pub net: f64,
    pub remaining: f64,
    pub progress_percent: i32,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub food_entries: usize,
    pub workout_minutes: u32,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl From<&DailySnapshot> for DailyRow {
    fn from(day: &DailySnapshot) -> Self {
        DailyRow {
            date: day.date.format("%Y-%m-%d").to_string(),
            calorie_goal: round1(day.calorie_goal),
            consumed: round1(day.consumed),
            burned: round1(day.burned),
            net: round1(day.net_calories()),
            remaining: round1(day.remaining_calories()),
            progress_percent: day.progress_percent(),
            protein_g: round1(day.macros.protein_g),
            carbs_g: round1(day.macros.carbs_g),
            fat_g: round1(day.macros.fat_g),
            food_entries: day.food_entries,
            workout_minutes: day.workout_minutes,
        }
    }
}

/// Append one row per snapshot to `csv_path`
///
/// Returns the number of rows written.
pub fn export_daily_summaries(days: &[DailySnapshot], csv_path: &Path) -> Result<usize> {
    if days.is_empty() {
        tracing::info!("No days to export");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for day in days {
        writer.serialize(DailyRow::from(day))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} days to {:?}", days.len(), csv_path);
    Ok(days.len())
}

/// Read rows back from an exported file
pub fn read_daily_summaries(csv_path: &Path) -> Result<Vec<DailyRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(csv_path)?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals;
    use crate::ledger::{summarize, DayWindow};
    use crate::Macros;
    use chrono::NaiveDate;

    fn snapshot(day: u32, consumed: f64) -> DailySnapshot {
        let date = NaiveDate::from_ymd_opt(2024, 4, day).unwrap();
        let mut snapshot = summarize(&[], &DayWindow::utc(date), 2000.0, goals::macro_goals(2000.0));
        snapshot.consumed = consumed;
        snapshot.macros = Macros::new(50.25, 120.0, 33.333);
        snapshot
    }

    #[test]
    fn test_export_creates_file_with_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("out").join("daily.csv");

        let count = export_daily_summaries(&[snapshot(1, 1500.0), snapshot(2, 2500.0)], &csv_path)
            .unwrap();
        assert_eq!(count, 2);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert!(contents.starts_with("date,calorie_goal,consumed"));

        let rows = read_daily_summaries(&csv_path).unwrap();
        assert_eq!(rows[0].date, "2024-04-01");
        assert_eq!(rows[0].remaining, 500.0);
        assert_eq!(rows[0].progress_percent, 75);
        assert_eq!(rows[1].progress_percent, 125);
        assert_eq!(rows[0].fat_g, 33.3);
    }

    #[test]
    fn test_export_appends_without_duplicate_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("daily.csv");

        export_daily_summaries(&[snapshot(1, 1000.0)], &csv_path).unwrap();
        export_daily_summaries(&[snapshot(2, 1200.0)], &csv_path).unwrap();

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(contents.matches("date,").count(), 1);
        assert_eq!(read_daily_summaries(&csv_path).unwrap().len(), 2);
    }

    #[test]
    fn test_export_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("daily.csv");

        assert_eq!(export_daily_summaries(&[], &csv_path).unwrap(), 0);
        assert!(!csv_path.exists());
    }
}
