//! Weight history.
//!
//! Every weigh-in is appended to its own JSONL log. Logging a weight also
//! moves the profile weight, so the energy plan follows the latest value.

use crate::journal::{append_record, read_records};
use crate::{Error, Result, UserState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Changes smaller than this are reported as no change
pub const WEIGHT_CHANGE_EPSILON: f64 = 0.01;

/// One weigh-in
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightRecord {
    pub id: Uuid,
    pub weight_kg: f64,
    pub logged_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl WeightRecord {
    pub fn new(weight_kg: f64, logged_at: DateTime<Utc>, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            weight_kg,
            logged_at,
            note,
        }
    }
}

/// Result of a weigh-in
#[derive(Clone, Debug, PartialEq)]
pub struct WeighIn {
    pub record: WeightRecord,
    /// Profile weight before this weigh-in
    pub previous_kg: f64,
}

impl WeighIn {
    /// Signed change from the previous profile weight, `None` when negligible
    pub fn change_kg(&self) -> Option<f64> {
        let change = self.record.weight_kg - self.previous_kg;
        (change.abs() >= WEIGHT_CHANGE_EPSILON).then_some(change)
    }
}

/// Record a weigh-in and move the profile weight to it
///
/// Requires a profile. The state update runs first, so a missing profile
/// leaves the log untouched.
pub fn log_weight(
    log_path: &Path,
    state_path: &Path,
    weight_kg: f64,
    at: DateTime<Utc>,
    note: Option<String>,
) -> Result<WeighIn> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(Error::Validation(format!(
            "weight must be greater than 0 (got {})",
            weight_kg
        )));
    }

    let mut previous_kg = weight_kg;
    UserState::update(state_path, |state| {
        let profile = state.require_profile()?;
        previous_kg = profile.weight_kg;
        let updated = profile.with_weight(weight_kg);
        state.profile = Some(updated);
        Ok(())
    })?;

    let record = WeightRecord::new(weight_kg, at, note);
    append_record(log_path, &record)?;

    tracing::info!("Logged weight {:.1} kg (was {:.1} kg)", weight_kg, previous_kg);
    Ok(WeighIn {
        record,
        previous_kg,
    })
}

/// All weigh-ins, newest first
pub fn load_history(log_path: &Path) -> Result<Vec<WeightRecord>> {
    let mut records: Vec<WeightRecord> = read_records(log_path, "weight log")?;
    records.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));
    Ok(records)
}

/// Weigh-ins at or after `since`, oldest first
pub fn history_since(log_path: &Path, since: DateTime<Utc>) -> Result<Vec<WeightRecord>> {
    let mut records: Vec<WeightRecord> = read_records::<WeightRecord>(log_path, "weight log")?
        .into_iter()
        .filter(|r| r.logged_at >= since)
        .collect();
    records.sort_by(|a, b| a.logged_at.cmp(&b.logged_at));
    Ok(records)
}

pub fn latest(log_path: &Path) -> Result<Option<WeightRecord>> {
    Ok(load_history(log_path)?.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityLevel, Sex, UserProfile, WeightIntent};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 7, 0, 0).unwrap()
    }

    fn seed_profile(state_path: &Path) {
        UserState::update(state_path, |state| {
            state.profile = Some(UserProfile {
                sex: Sex::Male,
                age_years: 40,
                height_cm: 175.0,
                weight_kg: 82.0,
                activity: ActivityLevel::Light,
                intent: WeightIntent::Lose,
            });
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_log_weight_updates_profile_and_history() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");
        let log_path = temp_dir.path().join("weights.jsonl");
        seed_profile(&state_path);

        let weigh_in = log_weight(&log_path, &state_path, 81.2, t0(), None).unwrap();

        assert_eq!(weigh_in.previous_kg, 82.0);
        assert!((weigh_in.change_kg().unwrap() - (-0.8)).abs() < 1e-9);

        let state = UserState::load(&state_path).unwrap();
        assert_eq!(state.profile.unwrap().weight_kg, 81.2);

        let history = load_history(&log_path).unwrap();
        assert_eq!(history, vec![weigh_in.record]);
    }

    #[test]
    fn test_unchanged_weight_has_no_change() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");
        let log_path = temp_dir.path().join("weights.jsonl");
        seed_profile(&state_path);

        let weigh_in = log_weight(&log_path, &state_path, 82.004, t0(), None).unwrap();
        assert_eq!(weigh_in.change_kg(), None);
    }

    #[test]
    fn test_log_weight_requires_profile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");
        let log_path = temp_dir.path().join("weights.jsonl");

        let result = log_weight(&log_path, &state_path, 70.0, t0(), None);

        assert!(matches!(result, Err(Error::State(_))));
        assert!(!log_path.exists());
    }

    #[test]
    fn test_log_weight_rejects_non_positive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");
        let log_path = temp_dir.path().join("weights.jsonl");
        seed_profile(&state_path);

        assert!(matches!(
            log_weight(&log_path, &state_path, 0.0, t0(), None),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            log_weight(&log_path, &state_path, f64::NAN, t0(), None),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_history_ordering_and_latest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");
        let log_path = temp_dir.path().join("weights.jsonl");
        seed_profile(&state_path);

        // Logged out of order on purpose
        log_weight(&log_path, &state_path, 81.0, t0() + Duration::days(7), None).unwrap();
        log_weight(&log_path, &state_path, 81.6, t0(), Some("after holiday".into())).unwrap();
        log_weight(&log_path, &state_path, 80.4, t0() + Duration::days(14), None).unwrap();

        let newest_first: Vec<f64> = load_history(&log_path)
            .unwrap()
            .iter()
            .map(|r| r.weight_kg)
            .collect();
        assert_eq!(newest_first, vec![80.4, 81.0, 81.6]);

        let since: Vec<f64> = history_since(&log_path, t0() + Duration::days(1))
            .unwrap()
            .iter()
            .map(|r| r.weight_kg)
            .collect();
        assert_eq!(since, vec![81.0, 80.4]);

        assert_eq!(latest(&log_path).unwrap().unwrap().weight_kg, 80.4);
    }

    #[test]
    fn test_missing_log_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("weights.jsonl");

        assert!(load_history(&log_path).unwrap().is_empty());
        assert!(latest(&log_path).unwrap().is_none());
    }
}
