//! Time-windowed reads over the entry journal.

use crate::ledger::DayWindow;
use crate::{LoggedEntry, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::Path;

/// Entries logged within `[start, end]`, newest first
///
/// An entry id that appears more than once in the journal is returned once.
pub fn load_entries_between(
    journal_path: &Path,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<LoggedEntry>> {
    let mut seen_ids = HashSet::new();
    let mut entries: Vec<LoggedEntry> = crate::journal::read_entries(journal_path)?
        .into_iter()
        .filter(|e| e.logged_at >= start && e.logged_at <= end)
        .filter(|e| seen_ids.insert(e.id))
        .collect();

    entries.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));

    tracing::debug!(
        "Loaded {} entries between {} and {}",
        entries.len(),
        start,
        end
    );
    Ok(entries)
}

/// Entries inside a day window, newest first
pub fn load_day(journal_path: &Path, window: &DayWindow) -> Result<Vec<LoggedEntry>> {
    load_entries_between(journal_path, window.start, window.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_default_catalog;
    use crate::journal::{EntrySink, JsonlSink};
    use crate::MealType;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, hour, 0, 0).unwrap()
    }

    fn entry(logged_at: DateTime<Utc>) -> LoggedEntry {
        get_default_catalog()
            .food("chuoi")
            .unwrap()
            .entry(120.0, MealType::Snack, logged_at)
    }

    #[test]
    fn test_load_between_filters_and_sorts() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("entries.jsonl");
        let mut sink = JsonlSink::new(&path);

        sink.append(&entry(at(8))).unwrap();
        sink.append(&entry(at(20))).unwrap();
        sink.append(&entry(at(12))).unwrap();
        sink.append(&entry(at(8) - Duration::days(2))).unwrap();

        let loaded = load_entries_between(&path, at(0), at(23)).unwrap();
        let times: Vec<_> = loaded.iter().map(|e| e.logged_at).collect();
        assert_eq!(times, vec![at(20), at(12), at(8)]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("entries.jsonl");
        let mut sink = JsonlSink::new(&path);

        sink.append(&entry(at(6))).unwrap();
        sink.append(&entry(at(18))).unwrap();

        assert_eq!(load_entries_between(&path, at(6), at(18)).unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_ids_are_returned_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("entries.jsonl");
        let mut sink = JsonlSink::new(&path);

        let e = entry(at(9));
        sink.append(&e).unwrap();
        sink.append(&e).unwrap();

        assert_eq!(load_entries_between(&path, at(0), at(23)).unwrap().len(), 1);
    }

    #[test]
    fn test_load_day() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("entries.jsonl");
        let mut sink = JsonlSink::new(&path);

        sink.append(&entry(at(10))).unwrap();
        sink.append(&entry(at(10) + Duration::days(1))).unwrap();

        let window = DayWindow::utc(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(load_day(&path, &window).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_journal_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.jsonl");

        assert!(load_entries_between(&path, at(0), at(23)).unwrap().is_empty());
    }
}
