//! Core domain types for the Calo tracker.
//!
//! This module defines the fundamental value types used throughout the system:
//! - User attributes (sex, activity tier, weight intent)
//! - Weight-goal targets
//! - Logged consumption and expenditure entries
//! - Macronutrient gram triples
//!
//! Enum-like inputs that round-trip through loosely-typed storage parse
//! leniently: an unknown tag falls back to the most common tier instead of
//! failing.

use crate::timeline::TimelineMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// User Attributes
// ============================================================================

/// Biological sex used by the Mifflin-St Jeor offset
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn is_male(self) -> bool {
        matches!(self, Sex::Male)
    }
}

/// Ordinal activity tier driving the TDEE multiplier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// Parse a storage tag, falling back to `Moderate` for anything unknown
    pub fn parse_lenient(tag: &str) -> Self {
        match normalize_tag(tag).as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" | "lightly_active" => ActivityLevel::Light,
            "moderate" | "moderately_active" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" | "extra_active" => ActivityLevel::VeryActive,
            other => {
                tracing::warn!("Unknown activity level {:?}, using moderate", other);
                ActivityLevel::Moderate
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

impl From<String> for ActivityLevel {
    fn from(tag: String) -> Self {
        Self::parse_lenient(&tag)
    }
}

impl From<ActivityLevel> for String {
    fn from(level: ActivityLevel) -> Self {
        level.as_str().to_string()
    }
}

/// Simple weight-goal intent used when no explicit target is set
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum WeightIntent {
    Lose,
    #[default]
    Maintain,
    Gain,
}

impl WeightIntent {
    /// Parse a storage tag, falling back to `Maintain` for anything unknown
    pub fn parse_lenient(tag: &str) -> Self {
        match normalize_tag(tag).as_str() {
            "lose" | "loss" => WeightIntent::Lose,
            "maintain" => WeightIntent::Maintain,
            "gain" => WeightIntent::Gain,
            other => {
                tracing::warn!("Unknown weight goal {:?}, using maintain", other);
                WeightIntent::Maintain
            }
        }
    }

    /// Intent implied by moving from `current_kg` to `target_kg`
    pub fn between(current_kg: f64, target_kg: f64) -> Self {
        if target_kg < current_kg {
            WeightIntent::Lose
        } else if target_kg > current_kg {
            WeightIntent::Gain
        } else {
            WeightIntent::Maintain
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeightIntent::Lose => "lose",
            WeightIntent::Maintain => "maintain",
            WeightIntent::Gain => "gain",
        }
    }
}

impl From<String> for WeightIntent {
    fn from(tag: String) -> Self {
        Self::parse_lenient(&tag)
    }
}

impl From<WeightIntent> for String {
    fn from(intent: WeightIntent) -> Self {
        intent.as_str().to_string()
    }
}

/// Meal slot a consumption entry was logged under
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

impl MealType {
    /// Every meal slot in the order of a day
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    /// Parse a storage tag, falling back to `Snack` for anything unknown
    pub fn parse_lenient(tag: &str) -> Self {
        match normalize_tag(tag).as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            "snack" => MealType::Snack,
            other => {
                tracing::warn!("Unknown meal type {:?}, using snack", other);
                MealType::Snack
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl From<String> for MealType {
    fn from(tag: String) -> Self {
        Self::parse_lenient(&tag)
    }
}

impl From<MealType> for String {
    fn from(meal: MealType) -> Self {
        meal.as_str().to_string()
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase().replace(['-', ' '], "_")
}

/// Personal attributes read by the energy model
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub sex: Sex,
    pub age_years: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    #[serde(default)]
    pub activity: ActivityLevel,
    #[serde(default)]
    pub intent: WeightIntent,
}

impl UserProfile {
    pub fn is_male(&self) -> bool {
        self.sex.is_male()
    }

    pub fn with_weight(&self, weight_kg: f64) -> Self {
        Self {
            weight_kg,
            ..self.clone()
        }
    }

}

// ============================================================================
// Goal Target
// ============================================================================

/// Explicit weight target that overrides the simple intent
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GoalTarget {
    pub target_weight_kg: f64,
    pub timeline: TimelineMode,
    pub target_date: Option<DateTime<Utc>>,
}

impl GoalTarget {
    pub fn new(target_weight_kg: f64, timeline: TimelineMode) -> Self {
        Self {
            target_weight_kg,
            timeline,
            target_date: None,
        }
    }

    pub fn with_target_date(&self, target_date: DateTime<Utc>) -> Self {
        Self {
            target_date: Some(target_date),
            ..self.clone()
        }
    }

    pub fn is_losing(&self, current_weight_kg: f64) -> bool {
        self.target_weight_kg < current_weight_kg
    }
}

// ============================================================================
// Macronutrients
// ============================================================================

/// Protein, carbohydrate and fat in grams
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Macros {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl Macros {
    pub fn new(protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            protein_g,
            carbs_g,
            fat_g,
        }
    }
}

// ============================================================================
// Logged Entries
// ============================================================================

/// Denormalized totals captured when an entry is logged
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    /// Food eaten
    Consumption {
        meal: MealType,
        calories: f64,
        protein_g: f64,
        carbs_g: f64,
        fat_g: f64,
    },
    /// Exercise performed
    Expenditure {
        duration_minutes: u32,
        calories_burned: f64,
    },
}

/// A consumption or expenditure event
///
/// Totals are computed from the reference item at logging time so that later
/// edits to the item never rewrite history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggedEntry {
    pub id: Uuid,
    pub item_id: String,
    pub logged_at: DateTime<Utc>,
    pub quantity: f64,
    pub kind: EntryKind,
}

impl LoggedEntry {
    pub fn is_consumption(&self) -> bool {
        matches!(self.kind, EntryKind::Consumption { .. })
    }

    /// Calories eaten (zero for expenditure entries)
    pub fn calories_consumed(&self) -> f64 {
        match self.kind {
            EntryKind::Consumption { calories, .. } => calories,
            EntryKind::Expenditure { .. } => 0.0,
        }
    }

    /// Calories burned (zero for consumption entries)
    pub fn calories_burned(&self) -> f64 {
        match self.kind {
            EntryKind::Expenditure {
                calories_burned, ..
            } => calories_burned,
            EntryKind::Consumption { .. } => 0.0,
        }
    }

    /// Meal slot of a consumption entry
    pub fn meal(&self) -> Option<MealType> {
        match self.kind {
            EntryKind::Consumption { meal, .. } => Some(meal),
            EntryKind::Expenditure { .. } => None,
        }
    }

    /// Macro grams eaten (zero for expenditure entries)
    pub fn macros(&self) -> Macros {
        match self.kind {
            EntryKind::Consumption {
                protein_g,
                carbs_g,
                fat_g,
                ..
            } => Macros::new(protein_g, carbs_g, fat_g),
            EntryKind::Expenditure { .. } => Macros::default(),
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        match self.kind {
            EntryKind::Expenditure {
                duration_minutes, ..
            } => duration_minutes,
            EntryKind::Consumption { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_level_parses_known_tags() {
        assert_eq!(ActivityLevel::parse_lenient("sedentary"), ActivityLevel::Sedentary);
        assert_eq!(ActivityLevel::parse_lenient("LIGHT"), ActivityLevel::Light);
        assert_eq!(ActivityLevel::parse_lenient("very-active"), ActivityLevel::VeryActive);
        assert_eq!(ActivityLevel::parse_lenient(" active "), ActivityLevel::Active);
    }

    #[test]
    fn test_unknown_tags_fall_back_to_common_tier() {
        assert_eq!(ActivityLevel::parse_lenient("couch"), ActivityLevel::Moderate);
        assert_eq!(WeightIntent::parse_lenient("bulk"), WeightIntent::Maintain);
        assert_eq!(MealType::parse_lenient("brunch"), MealType::Snack);
    }

    #[test]
    fn test_lenient_deserialization() {
        let json = r#"{
            "sex": "female",
            "age_years": 30,
            "height_cm": 165.0,
            "weight_kg": 60.0,
            "activity": "jogging",
            "intent": "lose"
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.activity, ActivityLevel::Moderate);
        assert_eq!(profile.intent, WeightIntent::Lose);
    }

    #[test]
    fn test_enum_tags_serialize_as_strings() {
        let json = serde_json::to_string(&ActivityLevel::VeryActive).unwrap();
        assert_eq!(json, "\"very_active\"");

        let json = serde_json::to_string(&MealType::Dinner).unwrap();
        assert_eq!(json, "\"dinner\"");
    }

    #[test]
    fn test_intent_between_weights() {
        assert_eq!(WeightIntent::between(80.0, 75.0), WeightIntent::Lose);
        assert_eq!(WeightIntent::between(60.0, 65.0), WeightIntent::Gain);
        assert_eq!(WeightIntent::between(70.0, 70.0), WeightIntent::Maintain);
    }

    #[test]
    fn test_profile_updates_produce_new_values() {
        let profile = UserProfile {
            sex: Sex::Male,
            age_years: 30,
            height_cm: 180.0,
            weight_kg: 80.0,
            activity: ActivityLevel::Moderate,
            intent: WeightIntent::Maintain,
        };

        let lighter = profile.with_weight(78.0);
        assert_eq!(profile.weight_kg, 80.0);
        assert_eq!(lighter.weight_kg, 78.0);
        assert_eq!(lighter.age_years, 30);
    }

    #[test]
    fn test_entry_accessors() {
        let food = LoggedEntry {
            id: Uuid::new_v4(),
            item_id: "pho_bo".into(),
            logged_at: Utc::now(),
            quantity: 500.0,
            kind: EntryKind::Consumption {
                meal: MealType::Breakfast,
                calories: 450.0,
                protein_g: 25.0,
                carbs_g: 60.0,
                fat_g: 10.0,
            },
        };
        assert!(food.is_consumption());
        assert_eq!(food.calories_consumed(), 450.0);
        assert_eq!(food.calories_burned(), 0.0);
        assert_eq!(food.macros().protein_g, 25.0);

        let run = LoggedEntry {
            id: Uuid::new_v4(),
            item_id: "running".into(),
            logged_at: Utc::now(),
            quantity: 30.0,
            kind: EntryKind::Expenditure {
                duration_minutes: 30,
                calories_burned: 300.0,
            },
        };
        assert!(!run.is_consumption());
        assert_eq!(run.calories_consumed(), 0.0);
        assert_eq!(run.calories_burned(), 300.0);
        assert_eq!(run.duration_minutes(), 30);
        assert_eq!(run.macros(), Macros::default());
    }
}
