//! Energy plan assembly.
//!
//! Bundles everything derived from a profile into one value:
//! - BMR, TDEE, BMI and its category, ideal weight
//! - the effective calorie goal and where it came from
//! - macro gram targets
//! - the projection toward an explicit weight target, if one is set

use crate::energy::{self, BmiCategory};
use crate::goals::{self, GoalSource};
use crate::timeline::{self, RatePace};
use crate::{GoalTarget, Macros, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress toward an explicit weight target
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TargetPlan {
    pub target_weight_kg: f64,
    pub days: i64,
    pub weekly_rate: f64,
    pub target_date: DateTime<Utc>,
    /// Whole days from now until `target_date`
    pub days_remaining: i64,
    pub pace: RatePace,
    /// Present when the rate is outside the recommended band
    pub rate_warning: Option<String>,
    /// Goal with the daily adjustment capped and minimum intake enforced
    pub safe_calorie_goal: f64,
}

impl TargetPlan {
    /// Whether the target date has been reached without a new target
    pub fn is_overdue(&self) -> bool {
        self.days_remaining <= 0
    }
}

/// Everything computed from a profile
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EnergyPlan {
    pub bmr: f64,
    pub tdee: f64,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub ideal_weight_kg: f64,
    pub calorie_goal: f64,
    pub goal_source: GoalSource,
    pub macro_goals: Macros,
    pub target: Option<TargetPlan>,
}

/// Compute the energy plan for a profile
///
/// `now` anchors the projected target date when the target does not carry
/// one already.
pub fn plan(
    profile: &UserProfile,
    target: Option<&GoalTarget>,
    manual_override: Option<f64>,
    now: DateTime<Utc>,
) -> EnergyPlan {
    let bmr = energy::bmr(
        profile.weight_kg,
        profile.height_cm,
        profile.age_years,
        profile.is_male(),
    );
    let tdee = energy::tdee(bmr, energy::activity_multiplier(profile.activity));
    let bmi = energy::bmi(profile.weight_kg, profile.height_cm);

    let (calorie_goal, goal_source) = goals::resolve_calorie_goal(profile, target, manual_override);
    let target = target.map(|t| plan_target(profile, t, tdee, now));

    tracing::info!(
        "Plan: BMR {:.0}, TDEE {:.0}, goal {:.0} kcal ({:?})",
        bmr,
        tdee,
        calorie_goal,
        goal_source
    );

    EnergyPlan {
        bmr,
        tdee,
        bmi,
        bmi_category: energy::bmi_category(bmi),
        ideal_weight_kg: energy::ideal_weight(profile.height_cm, profile.is_male()),
        calorie_goal,
        goal_source,
        macro_goals: goals::macro_goals(calorie_goal),
        target,
    }
}

fn plan_target(
    profile: &UserProfile,
    target: &GoalTarget,
    tdee: f64,
    now: DateTime<Utc>,
) -> TargetPlan {
    let current = profile.weight_kg;
    let projection = target.timeline.project(current, target.target_weight_kg);
    let is_losing = target.is_losing(current);

    // No weight change means there is no rate to judge
    let rate_warning = if (current - target.target_weight_kg).abs() > f64::EPSILON {
        timeline::safety_warning(projection.weekly_rate, is_losing)
    } else {
        None
    };
    if let Some(ref warning) = rate_warning {
        tracing::warn!("{}", warning);
    }

    let target_date = target
        .target_date
        .unwrap_or_else(|| timeline::projected_target_date(now, projection.days));

    TargetPlan {
        target_weight_kg: target.target_weight_kg,
        days: projection.days,
        weekly_rate: projection.weekly_rate,
        target_date,
        days_remaining: timeline::days_remaining(target_date, now),
        pace: timeline::rate_pace(projection.weekly_rate, is_losing),
        rate_warning,
        safe_calorie_goal: timeline::safe_calorie_goal_for_target(
            tdee,
            current,
            target.target_weight_kg,
            projection.days,
            profile.is_male(),
        ),
    }
}
