#![forbid(unsafe_code)]

//! Core domain model and business logic for the Calo energy-balance tracker.
//!
//! This crate provides:
//! - Domain types (profiles, goal targets, logged entries, macros)
//! - Energy math (BMR, TDEE, BMI, ideal weight)
//! - Calorie goals, weight-target timelines and rate advice
//! - Daily ledger aggregation and the overflow gauge
//! - Favorite ranking
//! - Reference catalog and persistence (journal, state, weight log, CSV export)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod energy;
pub mod goals;
pub mod timeline;
pub mod ledger;
pub mod favorites;
pub mod gauge;
pub mod catalog;
pub mod engine;
pub mod journal;
pub mod state;
pub mod history;
pub mod export;
pub mod weight;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use catalog::{get_default_catalog, Catalog};
pub use engine::{plan, EnergyPlan, TargetPlan};
pub use favorites::{FavoriteBook, RankOrder};
pub use gauge::OverflowGauge;
pub use journal::{EntrySink, JsonlSink};
pub use ledger::{DailySnapshot, DayWindow, MealCalories};
pub use state::UserState;
pub use timeline::TimelineMode;
pub use history::load_entries_between;
