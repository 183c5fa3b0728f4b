//! Built-in reference catalog of foods and workouts.
//!
//! Foods are described per 100 g, workouts per 60 minutes. Totals are
//! computed once when an entry is logged and stored on the entry.

use crate::{EntryKind, Error, LoggedEntry, MealType, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Grams that food nutrient values refer to
pub const FOOD_REFERENCE_GRAMS: f64 = 100.0;

/// Minutes that workout burn values refer to
pub const WORKOUT_REFERENCE_MINUTES: f64 = 60.0;

/// Default duration offered when favoriting a workout
pub const DEFAULT_WORKOUT_MINUTES: f64 = 30.0;

/// Cached default catalog, built once and reused
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// A food with nutrient values per 100 g
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub kcal_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    /// Typical serving, used as the default quantity
    pub serving_g: f64,
}

impl FoodItem {
    /// Build a consumption entry for `grams` of this food
    pub fn entry(&self, grams: f64, meal: MealType, at: DateTime<Utc>) -> LoggedEntry {
        let scale = grams / FOOD_REFERENCE_GRAMS;
        LoggedEntry {
            id: Uuid::new_v4(),
            item_id: self.id.clone(),
            logged_at: at,
            quantity: grams,
            kind: EntryKind::Consumption {
                meal,
                calories: self.kcal_per_100g * scale,
                protein_g: self.protein_per_100g * scale,
                carbs_g: self.carbs_per_100g * scale,
                fat_g: self.fat_per_100g * scale,
            },
        }
    }
}

/// A workout with calories burned per 60 minutes
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub kcal_per_hour: f64,
}

impl WorkoutItem {
    /// Build an expenditure entry for `minutes` of this workout
    pub fn entry(&self, minutes: u32, at: DateTime<Utc>) -> LoggedEntry {
        LoggedEntry {
            id: Uuid::new_v4(),
            item_id: self.id.clone(),
            logged_at: at,
            quantity: minutes as f64,
            kind: EntryKind::Expenditure {
                duration_minutes: minutes,
                calories_burned: self.kcal_per_hour * minutes as f64 / WORKOUT_REFERENCE_MINUTES,
            },
        }
    }
}

/// Reference items keyed by id
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub foods: HashMap<String, FoodItem>,
    pub workouts: HashMap<String, WorkoutItem>,
}

impl Catalog {
    pub fn food(&self, id: &str) -> Result<&FoodItem> {
        self.foods
            .get(id)
            .ok_or_else(|| Error::Catalog(format!("Unknown food: {}", id)))
    }

    pub fn workout(&self, id: &str) -> Result<&WorkoutItem> {
        self.workouts
            .get(id)
            .ok_or_else(|| Error::Catalog(format!("Unknown workout: {}", id)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.foods.contains_key(id) || self.workouts.contains_key(id)
    }

    /// Default quantity for an item: serving grams or workout minutes
    pub fn default_quantity(&self, id: &str) -> Option<f64> {
        if let Some(food) = self.foods.get(id) {
            return Some(food.serving_g);
        }
        self.workouts.get(id).map(|_| DEFAULT_WORKOUT_MINUTES)
    }

    /// Foods sorted by id
    pub fn sorted_foods(&self) -> Vec<&FoodItem> {
        let mut foods: Vec<_> = self.foods.values().collect();
        foods.sort_by(|a, b| a.id.cmp(&b.id));
        foods
    }

    /// Workouts sorted by id
    pub fn sorted_workouts(&self) -> Vec<&WorkoutItem> {
        let mut workouts: Vec<_> = self.workouts.values().collect();
        workouts.sort_by(|a, b| a.id.cmp(&b.id));
        workouts
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of problems; empty means the catalog is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, food) in &self.foods {
            if id != &food.id {
                errors.push(format!("Food key '{}' does not match id '{}'", id, food.id));
            }
            if self.workouts.contains_key(id) {
                errors.push(format!("Id '{}' is both a food and a workout", id));
            }
            let values = [
                food.kcal_per_100g,
                food.protein_per_100g,
                food.carbs_per_100g,
                food.fat_per_100g,
            ];
            if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                errors.push(format!("Food '{}': negative or non-finite nutrient value", id));
            }
            if food.serving_g <= 0.0 {
                errors.push(format!("Food '{}': serving must be positive", id));
            }
        }

        for (id, workout) in &self.workouts {
            if id != &workout.id {
                errors.push(format!(
                    "Workout key '{}' does not match id '{}'",
                    id, workout.id
                ));
            }
            if !workout.kcal_per_hour.is_finite() || workout.kcal_per_hour <= 0.0 {
                errors.push(format!("Workout '{}': burn rate must be positive", id));
            }
        }

        if self.foods.is_empty() {
            errors.push("Catalog has no foods".to_string());
        }
        if self.workouts.is_empty() {
            errors.push("Catalog has no workouts".to_string());
        }

        errors
    }
}

/// Builds the default catalog
///
/// Prefer `get_default_catalog()`, which caches the result.
pub fn build_default_catalog() -> Catalog {
    let mut catalog = Catalog::default();

    // ========================================================================
    // Foods (per 100 g)
    // ========================================================================

    let foods = [
        // id, name, category, kcal, protein, carbs, fat, serving
        ("com_trang", "Cơm trắng", "rice", 130.0, 2.7, 28.0, 0.3, 150.0),
        ("com_rang", "Cơm rang", "rice", 180.0, 4.0, 25.0, 7.0, 200.0),
        ("pho_bo", "Phở bò", "noodles", 112.5, 5.0, 15.0, 3.0, 400.0),
        ("pho_ga", "Phở gà", "noodles", 95.0, 4.5, 13.75, 2.0, 400.0),
        ("bun_bo_hue", "Bún bò Huế", "noodles", 106.7, 4.9, 12.9, 3.3, 450.0),
        ("bun_cha", "Bún chả", "noodles", 137.5, 6.25, 12.5, 6.25, 400.0),
        ("banh_mi", "Bánh mì thịt", "bread", 233.3, 10.0, 26.7, 9.3, 150.0),
        ("xoi_xeo", "Xôi xéo", "rice", 186.7, 4.0, 30.0, 5.3, 150.0),
        ("thit_ga_luoc", "Thịt gà luộc", "meat", 165.0, 31.0, 0.0, 3.6, 100.0),
        ("thit_bo_xao", "Thịt bò xào", "meat", 280.0, 26.0, 3.0, 18.0, 100.0),
        ("thit_kho_tau", "Thịt kho tàu", "meat", 350.0, 20.0, 8.0, 26.0, 100.0),
        ("ca_kho", "Cá kho", "seafood", 120.0, 14.7, 2.0, 6.0, 150.0),
        ("tom_luoc", "Tôm luộc", "seafood", 99.0, 21.0, 0.2, 1.0, 100.0),
        ("rau_muong_xao", "Rau muống xào", "vegetables", 53.3, 2.0, 2.7, 4.0, 150.0),
        ("dau_phu_chien", "Đậu phụ chiên", "vegetables", 180.0, 12.0, 5.0, 13.0, 100.0),
        ("trung_luoc", "Trứng luộc", "egg", 155.0, 13.0, 1.1, 11.0, 50.0),
        ("goi_cuon", "Gỏi cuốn", "snack", 125.0, 6.7, 16.7, 3.3, 120.0),
        ("cha_gio", "Chả giò", "snack", 180.0, 6.0, 15.0, 11.0, 100.0),
        ("tra_sua", "Trà sữa trân châu", "drink", 60.0, 0.4, 10.0, 2.0, 500.0),
        ("ca_phe_sua_da", "Cà phê sữa đá", "drink", 60.0, 1.0, 9.0, 2.0, 200.0),
        ("chuoi", "Chuối", "fruit", 89.0, 1.1, 23.0, 0.3, 120.0),
        ("xoai", "Xoài", "fruit", 60.0, 0.8, 15.0, 0.4, 200.0),
    ];

    for (id, name, category, kcal, protein, carbs, fat, serving) in foods {
        catalog.foods.insert(
            id.into(),
            FoodItem {
                id: id.into(),
                name: name.into(),
                category: category.into(),
                kcal_per_100g: kcal,
                protein_per_100g: protein,
                carbs_per_100g: carbs,
                fat_per_100g: fat,
                serving_g: serving,
            },
        );
    }

    // ========================================================================
    // Workouts (per 60 minutes)
    // ========================================================================

    let workouts = [
        ("running", "Chạy bộ", "cardio", 600.0),
        ("brisk_walking", "Đi bộ nhanh", "cardio", 300.0),
        ("cycling", "Đạp xe", "cardio", 480.0),
        ("swimming", "Bơi lội", "cardio", 660.0),
        ("jump_rope", "Nhảy dây", "cardio", 720.0),
        ("aerobic", "Aerobic", "cardio", 420.0),
        ("football", "Bóng đá", "sport", 540.0),
        ("badminton", "Cầu lông", "sport", 420.0),
        ("gym", "Tập gym", "strength", 360.0),
        ("crossfit", "Crossfit", "strength", 600.0),
        ("yoga", "Yoga", "flexibility", 240.0),
        ("pilates", "Pilates", "flexibility", 300.0),
    ];

    for (id, name, category, kcal_per_hour) in workouts {
        catalog.workouts.insert(
            id.into(),
            WorkoutItem {
                id: id.into(),
                name: name.into(),
                category: category.into(),
                kcal_per_hour,
            },
        );
    }

    catalog
}
