//! Daily calorie and macronutrient targets.
//!
//! The ±500 kcal/day intent offset corresponds to roughly 0.5 kg/week
//! (7700 kcal per kg of body fat).

use crate::{energy, timeline, GoalTarget, Macros, UserProfile, WeightIntent};
use serde::{Deserialize, Serialize};

/// Daily kcal offset applied for lose/gain intents
pub const INTENT_OFFSET_KCAL: f64 = 500.0;

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Share of daily calories assigned to each macronutrient
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroSplit {
    /// 30% protein, 40% carbohydrate, 30% fat
    pub const STANDARD: MacroSplit = MacroSplit {
        protein: 0.30,
        carbs: 0.40,
        fat: 0.30,
    };
}

/// Calorie goal for the simple lose/maintain/gain intent
pub fn daily_calorie_goal(tdee: f64, intent: WeightIntent) -> f64 {
    match intent {
        WeightIntent::Lose => tdee - INTENT_OFFSET_KCAL,
        WeightIntent::Maintain => tdee,
        WeightIntent::Gain => tdee + INTENT_OFFSET_KCAL,
    }
}

/// Macro gram targets for a calorie goal using the standard split
pub fn macro_goals(calorie_goal: f64) -> Macros {
    let split = MacroSplit::STANDARD;
    Macros {
        protein_g: calorie_goal * split.protein / KCAL_PER_G_PROTEIN,
        carbs_g: calorie_goal * split.carbs / KCAL_PER_G_CARBS,
        fat_g: calorie_goal * split.fat / KCAL_PER_G_FAT,
    }
}

/// Where the effective calorie goal came from
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalSource {
    /// Pinned by the user
    Manual,
    /// Derived from an explicit weight target and timeline
    Target,
    /// Derived from the lose/maintain/gain intent
    Intent,
}

/// TDEE for a profile
pub fn profile_tdee(profile: &UserProfile) -> f64 {
    let bmr = energy::bmr(
        profile.weight_kg,
        profile.height_cm,
        profile.age_years,
        profile.is_male(),
    );
    energy::tdee(bmr, energy::activity_multiplier(profile.activity))
}

/// Pick the effective daily calorie goal
///
/// A manual override wins, then an explicit weight target, then the intent.
pub fn resolve_calorie_goal(
    profile: &UserProfile,
    target: Option<&GoalTarget>,
    manual_override: Option<f64>,
) -> (f64, GoalSource) {
    if let Some(goal) = manual_override {
        return (goal, GoalSource::Manual);
    }

    let tdee = profile_tdee(profile);

    if let Some(target) = target {
        let projection = target.timeline.project(profile.weight_kg, target.target_weight_kg);
        let goal = timeline::calorie_goal_for_target(
            tdee,
            profile.weight_kg,
            target.target_weight_kg,
            projection.days,
            target.is_losing(profile.weight_kg),
        );
        return (goal, GoalSource::Target);
    }

    (daily_calorie_goal(tdee, profile.intent), GoalSource::Intent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::TimelineMode;
    use crate::{ActivityLevel, Sex};

    fn profile(intent: WeightIntent) -> UserProfile {
        UserProfile {
            sex: Sex::Male,
            age_years: 30,
            height_cm: 180.0,
            weight_kg: 75.0,
            activity: ActivityLevel::Moderate,
            intent,
        }
    }

    #[test]
    fn test_intent_offsets() {
        let tdee = 2400.0;
        assert_eq!(daily_calorie_goal(tdee, WeightIntent::Lose) + 500.0, tdee);
        assert_eq!(daily_calorie_goal(tdee, WeightIntent::Maintain), tdee);
        assert_eq!(daily_calorie_goal(tdee, WeightIntent::Gain) - 500.0, tdee);
    }

    #[test]
    fn test_macro_goals_for_2000_kcal() {
        let macros = macro_goals(2000.0);
        assert!((macros.protein_g - 150.0).abs() < 0.01);
        assert!((macros.carbs_g - 200.0).abs() < 0.01);
        assert!((macros.fat_g - 66.67).abs() < 0.01);
    }

    #[test]
    fn test_macro_split_sums_to_one() {
        let split = MacroSplit::STANDARD;
        assert!((split.protein + split.carbs + split.fat - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_macro_goals_recover_calories() {
        let macros = macro_goals(1800.0);
        let kcal = macros.protein_g * KCAL_PER_G_PROTEIN
            + macros.carbs_g * KCAL_PER_G_CARBS
            + macros.fat_g * KCAL_PER_G_FAT;
        assert!((kcal - 1800.0).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_uses_intent_without_target() {
        let p = profile(WeightIntent::Lose);
        let (goal, source) = resolve_calorie_goal(&p, None, None);

        // BMR 1730 * 1.55 = 2681.5, minus 500
        assert_eq!(source, GoalSource::Intent);
        assert!((goal - 2181.5).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_prefers_target_over_intent() {
        let p = profile(WeightIntent::Gain);
        let target = GoalTarget::new(70.0, TimelineMode::DurationDriven { days: 77 });
        let (goal, source) = resolve_calorie_goal(&p, Some(&target), None);

        // 5 kg * 7700 / 77 days = 500 kcal/day deficit
        assert_eq!(source, GoalSource::Target);
        assert!((goal - 2181.5).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_prefers_manual_override() {
        let p = profile(WeightIntent::Lose);
        let target = GoalTarget::new(70.0, TimelineMode::RateDriven { weekly_rate: 0.5 });
        let (goal, source) = resolve_calorie_goal(&p, Some(&target), Some(1900.0));

        assert_eq!(source, GoalSource::Manual);
        assert_eq!(goal, 1900.0);
    }
}
