//! Daily ledger: aggregates one day of logged entries against the goals.
//!
//! Snapshots are never stored. They are recomputed from the entries that
//! fall inside a day window every time they are needed.

use crate::{LoggedEntry, Macros, MealType};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Upper clamp for macro progress percentages
pub const MACRO_PERCENT_CAP: i32 = 999;

/// Inclusive `[start, end]` bounds of a calendar day
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Window for `date` as observed in `tz`
    ///
    /// Runs from local midnight to one millisecond before the next midnight.
    pub fn for_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Self {
        let midnight = date.and_time(NaiveTime::default());
        let start = local_to_utc(tz, midnight);
        let end = local_to_utc(tz, midnight + Duration::days(1)) - Duration::milliseconds(1);
        Self { date, start, end }
    }

    pub fn utc(date: NaiveDate) -> Self {
        Self::for_date(date, &Utc)
    }

    /// Window of the local calendar day containing `at`
    pub fn containing<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> Self {
        let date = at.with_timezone(tz).date_naive();
        Self::for_date(date, tz)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }

    /// Entries logged inside the window
    pub fn select<'a>(
        &'a self,
        entries: &'a [LoggedEntry],
    ) -> impl Iterator<Item = &'a LoggedEntry> + 'a {
        entries.iter().filter(move |e| self.contains(e.logged_at))
    }
}

fn local_to_utc<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

/// Per-macro progress toward the macro goals, in percent
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroProgress {
    pub protein: i32,
    pub carbs: i32,
    pub fat: i32,
}

/// Calories eaten per meal slot
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct MealCalories {
    pub breakfast: f64,
    pub lunch: f64,
    pub dinner: f64,
    pub snack: f64,
}

impl MealCalories {
    pub fn get(&self, meal: MealType) -> f64 {
        match meal {
            MealType::Breakfast => self.breakfast,
            MealType::Lunch => self.lunch,
            MealType::Dinner => self.dinner,
            MealType::Snack => self.snack,
        }
    }

    pub fn add(&mut self, meal: MealType, calories: f64) {
        match meal {
            MealType::Breakfast => self.breakfast += calories,
            MealType::Lunch => self.lunch += calories,
            MealType::Dinner => self.dinner += calories,
            MealType::Snack => self.snack += calories,
        }
    }

    /// Meals with a non-zero total, in the order of a day
    pub fn eaten(&self) -> Vec<(MealType, f64)> {
        MealType::ALL
            .iter()
            .map(|&meal| (meal, self.get(meal)))
            .filter(|&(_, calories)| calories > 0.0)
            .collect()
    }
}

/// Aggregated figures for one day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub calorie_goal: f64,
    pub consumed: f64,
    pub burned: f64,
    pub macros: Macros,
    pub macro_goals: Macros,
    #[serde(default)]
    pub meal_calories: MealCalories,
    pub food_entries: usize,
    pub workout_entries: usize,
    pub workout_minutes: u32,
}

impl DailySnapshot {
    /// Consumed minus burned
    pub fn net_calories(&self) -> f64 {
        self.consumed - self.burned
    }

    /// Exercise calories are added back to the allowance before subtracting
    /// what was eaten.
    pub fn remaining_calories(&self) -> f64 {
        (self.calorie_goal + self.burned) - self.consumed
    }

    /// Consumption as a percentage of the exercise-adjusted allowance
    pub fn progress_percent(&self) -> i32 {
        let allowance = self.calorie_goal + self.burned;
        if allowance > 0.0 {
            (self.consumed / allowance * 100.0).round() as i32
        } else {
            0
        }
    }

    pub fn macro_progress(&self) -> MacroProgress {
        MacroProgress {
            protein: macro_percent(self.macros.protein_g, self.macro_goals.protein_g),
            carbs: macro_percent(self.macros.carbs_g, self.macro_goals.carbs_g),
            fat: macro_percent(self.macros.fat_g, self.macro_goals.fat_g),
        }
    }

    pub fn is_over_goal(&self) -> bool {
        self.net_calories() > self.calorie_goal
    }
}

/// `round(total / goal * 100)` clamped to `[0, MACRO_PERCENT_CAP]`
///
/// A zero or negative goal yields 0.
pub fn macro_percent(total: f64, goal: f64) -> i32 {
    if goal.is_nan() || goal <= 0.0 {
        return 0;
    }
    let percent = (total / goal * 100.0).round();
    if percent.is_nan() {
        return 0;
    }
    percent.clamp(0.0, f64::from(MACRO_PERCENT_CAP)) as i32
}

/// Sum the entries inside `window` into a snapshot
pub fn summarize(
    entries: &[LoggedEntry],
    window: &DayWindow,
    calorie_goal: f64,
    macro_goals: Macros,
) -> DailySnapshot {
    let mut snapshot = DailySnapshot {
        date: window.date,
        calorie_goal,
        consumed: 0.0,
        burned: 0.0,
        macros: Macros::default(),
        macro_goals,
        meal_calories: MealCalories::default(),
        food_entries: 0,
        workout_entries: 0,
        workout_minutes: 0,
    };

    for entry in window.select(entries) {
        if let Some(meal) = entry.meal() {
            let macros = entry.macros();
            snapshot.consumed += entry.calories_consumed();
            snapshot.meal_calories.add(meal, entry.calories_consumed());
            snapshot.macros.protein_g += macros.protein_g;
            snapshot.macros.carbs_g += macros.carbs_g;
            snapshot.macros.fat_g += macros.fat_g;
            snapshot.food_entries += 1;
        } else {
            snapshot.burned += entry.calories_burned();
            snapshot.workout_minutes += entry.duration_minutes();
            snapshot.workout_entries += 1;
        }
    }

    tracing::debug!(
        "Summarized {}: consumed {:.0}, burned {:.0} ({} food, {} workout entries)",
        snapshot.date,
        snapshot.consumed,
        snapshot.burned,
        snapshot.food_entries,
        snapshot.workout_entries
    );

    snapshot
}

/// One snapshot per day for `days` days ending on `last_date`, oldest first
pub fn daily_series<Tz: TimeZone>(
    entries: &[LoggedEntry],
    last_date: NaiveDate,
    days: u32,
    tz: &Tz,
    calorie_goal: f64,
    macro_goals: Macros,
) -> Vec<DailySnapshot> {
    (0..i64::from(days))
        .rev()
        .map(|offset| {
            let date = last_date - Duration::days(offset);
            let window = DayWindow::for_date(date, tz);
            summarize(entries, &window, calorie_goal, macro_goals)
        })
        .collect()
}
