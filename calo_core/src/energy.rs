//! Energy model: BMR, TDEE and BMI.
//!
//! All functions are pure arithmetic. Range validation (weight 20–500 kg,
//! height 50–250 cm, age 1–120) is the caller's job; out-of-range inputs
//! produce implausible numbers, never errors.

use crate::ActivityLevel;
use serde::{Deserialize, Serialize};

/// Mifflin-St Jeor sex offsets
const MALE_OFFSET: f64 = 5.0;
const FEMALE_OFFSET: f64 = -161.0;

/// Basal metabolic rate (kcal/day), Mifflin-St Jeor
///
/// `10*weight + 6.25*height - 5*age + (5 if male else -161)`
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: u32, is_male: bool) -> f64 {
    let offset = if is_male { MALE_OFFSET } else { FEMALE_OFFSET };
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years) + offset
}

/// TDEE multiplier for an activity tier
pub fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.20,
        ActivityLevel::Light => 1.375,
        ActivityLevel::Moderate => 1.55,
        ActivityLevel::Active => 1.725,
        ActivityLevel::VeryActive => 1.90,
    }
}

/// Total daily energy expenditure (kcal/day)
pub fn tdee(bmr: f64, multiplier: f64) -> f64 {
    bmr * multiplier
}

/// Body-mass index, or `0.0` when weight or height is not positive
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if weight_kg <= 0.0 || height_cm <= 0.0 {
        return 0.0;
    }
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// BMI classification using the WHO thresholds for Asian populations
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    /// BMI could not be computed
    Unavailable,
    Underweight,
    Normal,
    Overweight,
    PreObese,
    ObeseI,
    ObeseII,
    ObeseIII,
}

impl BmiCategory {
    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Unavailable => "--",
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::PreObese => "Pre-obese",
            BmiCategory::ObeseI => "Obese I",
            BmiCategory::ObeseII => "Obese II",
            BmiCategory::ObeseIII => "Obese III",
        }
    }
}

pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi.is_nan() || bmi <= 0.0 {
        BmiCategory::Unavailable
    } else if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 23.0 {
        BmiCategory::Normal
    } else if bmi < 25.0 {
        BmiCategory::Overweight
    } else if bmi < 30.0 {
        BmiCategory::PreObese
    } else if bmi < 35.0 {
        BmiCategory::ObeseI
    } else if bmi < 40.0 {
        BmiCategory::ObeseII
    } else {
        BmiCategory::ObeseIII
    }
}

/// Ideal body weight (kg), Devine formula
pub fn ideal_weight(height_cm: f64, is_male: bool) -> f64 {
    let height_in = height_cm / 2.54;
    let base = if is_male { 50.0 } else { 45.5 };
    base + 2.3 * (height_in - 60.0)
}
