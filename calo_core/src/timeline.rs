//! Weight-goal timeline projection.
//!
//! Converts between the three interdependent goal quantities: target weight,
//! duration in days, and weekly rate in kg/week. A goal is either
//! rate-driven or duration-driven; whichever field was edited last is the
//! independent one and the other is derived.
//!
//! Rounding policy: days are rounded to the nearest whole day after
//! converting from a rate. Weekly rates are never rounded here.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Energy content of one kilogram of body fat
pub const KCAL_PER_KG: f64 = 7700.0;

/// Recommended weekly rate band (kg/week)
pub const SAFE_RATE_MIN: f64 = 0.25;
pub const SAFE_LOSS_RATE_MAX: f64 = 1.0;
pub const SAFE_GAIN_RATE_MAX: f64 = 0.5;

/// Limits applied by [`safe_calorie_goal_for_target`]
pub const MAX_DAILY_DEFICIT: f64 = 1000.0;
pub const MAX_DAILY_SURPLUS: f64 = 500.0;
pub const MIN_CALORIES_MALE: f64 = 1500.0;
pub const MIN_CALORIES_FEMALE: f64 = 1200.0;

/// Weekly rate needed to cover the weight difference in `days`
///
/// Returns `0.0` for a non-positive duration.
pub fn weekly_rate_from_duration(current_kg: f64, target_kg: f64, days: i64) -> f64 {
    if days <= 0 {
        return 0.0;
    }
    let weeks = days as f64 / 7.0;
    (current_kg - target_kg).abs() / weeks
}

/// Days needed to cover the weight difference at `weekly_rate`
///
/// Returns `0` for a non-positive rate.
pub fn duration_from_weekly_rate(current_kg: f64, target_kg: f64, weekly_rate: f64) -> i64 {
    if weekly_rate.is_nan() || weekly_rate <= 0.0 {
        return 0;
    }
    let weeks = (current_kg - target_kg).abs() / weekly_rate;
    (weeks * 7.0).round() as i64
}

/// Daily calorie goal that reaches `target_kg` from `current_kg` in `days`
///
/// The total energy difference is spread evenly across the duration. A
/// non-positive duration leaves the goal at TDEE.
pub fn calorie_goal_for_target(
    tdee: f64,
    current_kg: f64,
    target_kg: f64,
    days: i64,
    is_losing: bool,
) -> f64 {
    let adjustment = daily_adjustment(current_kg, target_kg, days);
    if is_losing {
        tdee - adjustment
    } else {
        tdee + adjustment
    }
}

fn daily_adjustment(current_kg: f64, target_kg: f64, days: i64) -> f64 {
    if days <= 0 {
        return 0.0;
    }
    let total_energy = (current_kg - target_kg).abs() * KCAL_PER_KG;
    total_energy / days as f64
}

/// Like [`calorie_goal_for_target`], with the daily deficit capped at
/// 1000 kcal, the surplus at 500 kcal, and the result floored at the
/// sex-specific minimum intake.
pub fn safe_calorie_goal_for_target(
    tdee: f64,
    current_kg: f64,
    target_kg: f64,
    days: i64,
    is_male: bool,
) -> f64 {
    let adjustment = daily_adjustment(current_kg, target_kg, days);
    let goal = if target_kg < current_kg {
        tdee - adjustment.min(MAX_DAILY_DEFICIT)
    } else {
        tdee + adjustment.min(MAX_DAILY_SURPLUS)
    };
    let floor = if is_male {
        MIN_CALORIES_MALE
    } else {
        MIN_CALORIES_FEMALE
    };
    goal.max(floor)
}

/// Whether a weekly rate falls inside the recommended band
///
/// Advisory only: callers still compute and save the goal.
pub fn is_rate_safe(weekly_rate: f64, is_losing: bool) -> bool {
    let max = if is_losing {
        SAFE_LOSS_RATE_MAX
    } else {
        SAFE_GAIN_RATE_MAX
    };
    (SAFE_RATE_MIN..=max).contains(&weekly_rate)
}

/// Human-facing speed classification of a weekly rate
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RatePace {
    VerySlow,
    SlowAndSafe,
    Moderate,
    Fast,
    TooFast,
    NotRecommended,
}

impl RatePace {
    pub fn label(self) -> &'static str {
        match self {
            RatePace::VerySlow => "Very slow",
            RatePace::SlowAndSafe => "Slow & safe",
            RatePace::Moderate => "Moderate",
            RatePace::Fast => "Fast",
            RatePace::TooFast => "Too fast",
            RatePace::NotRecommended => "Too fast - not recommended",
        }
    }
}

pub fn rate_pace(weekly_rate: f64, is_losing: bool) -> RatePace {
    if weekly_rate < 0.25 {
        RatePace::VerySlow
    } else if weekly_rate <= 0.5 {
        RatePace::SlowAndSafe
    } else if weekly_rate <= 0.75 {
        if is_losing {
            RatePace::Moderate
        } else {
            RatePace::Fast
        }
    } else if weekly_rate <= 1.0 {
        if is_losing {
            RatePace::Fast
        } else {
            RatePace::TooFast
        }
    } else {
        RatePace::NotRecommended
    }
}

/// Warning text for a rate outside the recommended band, if any
pub fn safety_warning(weekly_rate: f64, is_losing: bool) -> Option<String> {
    if is_rate_safe(weekly_rate, is_losing) {
        return None;
    }
    let max = if is_losing {
        SAFE_LOSS_RATE_MAX
    } else {
        SAFE_GAIN_RATE_MAX
    };
    Some(format!(
        "{} ({:.2} kg/week) is outside the recommended {:.2}-{:.2} kg/week range",
        rate_pace(weekly_rate, is_losing).label(),
        weekly_rate,
        SAFE_RATE_MIN,
        max
    ))
}

/// Date the target is expected to be reached
pub fn projected_target_date(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now + Duration::days(days)
}

/// Whole days left until `target_date`, truncated toward zero
///
/// Zero or negative once the date is less than a day away or has passed.
pub fn days_remaining(target_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (target_date - now).num_days()
}

// ============================================================================
// Timeline input mode
// ============================================================================

/// Which goal quantity the user set; the other one is derived
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimelineMode {
    /// User picked a weekly rate, duration is derived
    RateDriven { weekly_rate: f64 },
    /// User picked a duration, weekly rate is derived
    DurationDriven { days: i64 },
}

impl TimelineMode {
    /// Editing the rate makes the goal rate-driven
    pub fn edit_rate(self, weekly_rate: f64) -> Self {
        TimelineMode::RateDriven { weekly_rate }
    }

    /// Editing the duration makes the goal duration-driven
    pub fn edit_duration(self, days: i64) -> Self {
        TimelineMode::DurationDriven { days }
    }

    pub fn is_rate_driven(&self) -> bool {
        matches!(self, TimelineMode::RateDriven { .. })
    }

    /// Resolve both quantities for a weight change
    pub fn project(&self, current_kg: f64, target_kg: f64) -> Projection {
        match *self {
            TimelineMode::RateDriven { weekly_rate } => Projection {
                days: duration_from_weekly_rate(current_kg, target_kg, weekly_rate),
                weekly_rate,
            },
            TimelineMode::DurationDriven { days } => Projection {
                days,
                weekly_rate: weekly_rate_from_duration(current_kg, target_kg, days),
            },
        }
    }
}

/// Both timeline quantities after resolving a [`TimelineMode`]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Projection {
    pub days: i64,
    pub weekly_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_weekly_rate_from_duration() {
        assert!((weekly_rate_from_duration(80.0, 75.0, 70) - 0.5).abs() < 1e-9);
        // Direction does not matter
        assert!((weekly_rate_from_duration(75.0, 80.0, 70) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_rate_non_positive_duration_is_zero() {
        assert_eq!(weekly_rate_from_duration(80.0, 75.0, 0), 0.0);
        assert_eq!(weekly_rate_from_duration(80.0, 75.0, -7), 0.0);
    }

    #[test]
    fn test_duration_from_weekly_rate_rounds() {
        assert_eq!(duration_from_weekly_rate(80.0, 75.0, 0.5), 70);
        // 3 kg at 0.75 kg/week = 28 days
        assert_eq!(duration_from_weekly_rate(70.0, 73.0, 0.75), 28);
        // 1 kg at 0.3 kg/week = 23.33 days
        assert_eq!(duration_from_weekly_rate(70.0, 69.0, 0.3), 23);
        assert_eq!(duration_from_weekly_rate(70.0, 69.0, 0.0), 0);
    }

    #[test]
    fn test_round_trip_duration_rate_duration() {
        let rate = weekly_rate_from_duration(80.0, 75.0, 70);
        let days = duration_from_weekly_rate(80.0, 75.0, rate);
        assert!((days - 70).abs() <= 1);
    }

    #[test]
    fn test_calorie_goal_for_target_losing() {
        // 5 kg * 7700 = 38500 kcal over 70 days = 550 kcal/day
        let goal = calorie_goal_for_target(2500.0, 80.0, 75.0, 70, true);
        assert!((goal - 1950.0).abs() < 1e-9);
    }

    #[test]
    fn test_calorie_goal_for_target_gaining() {
        // 2 kg * 7700 = 15400 kcal over 56 days = 275 kcal/day
        let goal = calorie_goal_for_target(2200.0, 60.0, 62.0, 56, false);
        assert!((goal - 2475.0).abs() < 1e-9);
    }

    #[test]
    fn test_calorie_goal_for_target_zero_days() {
        assert_eq!(calorie_goal_for_target(2200.0, 60.0, 62.0, 0, false), 2200.0);
    }

    #[test]
    fn test_safe_goal_caps_deficit_and_floors() {
        // 10 kg in 28 days would need 2750 kcal/day
        let goal = safe_calorie_goal_for_target(2800.0, 90.0, 80.0, 28, true);
        assert_eq!(goal, 1800.0);

        let goal = safe_calorie_goal_for_target(2000.0, 90.0, 80.0, 28, false);
        assert_eq!(goal, MIN_CALORIES_FEMALE);

        let goal = safe_calorie_goal_for_target(2000.0, 60.0, 70.0, 28, true);
        assert_eq!(goal, 2500.0);
    }

    #[test]
    fn test_rate_safety_band() {
        assert!(is_rate_safe(0.5, true));
        assert!(is_rate_safe(1.0, true));
        assert!(!is_rate_safe(1.2, true));
        assert!(!is_rate_safe(0.1, true));

        assert!(is_rate_safe(0.25, false));
        assert!(is_rate_safe(0.5, false));
        assert!(!is_rate_safe(0.75, false));
    }

    #[test]
    fn test_rate_pace() {
        assert_eq!(rate_pace(0.2, true), RatePace::VerySlow);
        assert_eq!(rate_pace(0.5, true), RatePace::SlowAndSafe);
        assert_eq!(rate_pace(0.75, true), RatePace::Moderate);
        assert_eq!(rate_pace(0.75, false), RatePace::Fast);
        assert_eq!(rate_pace(1.0, true), RatePace::Fast);
        assert_eq!(rate_pace(1.0, false), RatePace::TooFast);
        assert_eq!(rate_pace(1.5, true), RatePace::NotRecommended);
    }

    #[test]
    fn test_safety_warning_only_outside_band() {
        assert!(safety_warning(0.5, true).is_none());

        let warning = safety_warning(1.5, true).unwrap();
        assert!(warning.contains("not recommended"));
        assert!(warning.contains("1.50 kg/week"));
    }

    #[test]
    fn test_projected_target_date() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let date = projected_target_date(now, 70);
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 3, 11, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_days_remaining() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();

        assert_eq!(days_remaining(now + Duration::days(30), now), 30);
        // Partial days are dropped
        assert_eq!(days_remaining(now + Duration::hours(47), now), 1);
        assert_eq!(days_remaining(now + Duration::hours(23), now), 0);
        assert_eq!(days_remaining(now - Duration::days(3), now), -3);
    }

    #[test]
    fn test_last_edited_field_wins() {
        let mode = TimelineMode::RateDriven { weekly_rate: 0.5 };

        let mode = mode.edit_duration(84);
        assert!(!mode.is_rate_driven());
        let projection = mode.project(80.0, 74.0);
        assert_eq!(projection.days, 84);
        assert!((projection.weekly_rate - 0.5).abs() < 1e-9);

        let mode = mode.edit_rate(0.75);
        assert!(mode.is_rate_driven());
        let projection = mode.project(80.0, 74.0);
        assert_eq!(projection.days, 56);
        assert_eq!(projection.weekly_rate, 0.75);
    }

    #[test]
    fn test_mode_serialization() {
        let mode = TimelineMode::DurationDriven { days: 70 };
        let json = serde_json::to_string(&mode).unwrap();
        assert!(json.contains("\"mode\":\"duration_driven\""));

        let parsed: TimelineMode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, mode);
    }

    proptest! {
        #[test]
        fn prop_duration_round_trip_within_a_day(
            current in 40.0f64..200.0,
            diff in 0.5f64..40.0,
            days in 7i64..=728,
        ) {
            let target = current - diff;
            let rate = weekly_rate_from_duration(current, target, days);
            let back = duration_from_weekly_rate(current, target, rate);
            prop_assert!((back - days).abs() <= 1);
        }
    }
}
