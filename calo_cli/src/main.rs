use calo_core::favorites::FavoriteRecord;
use calo_core::ledger::{self, DailySnapshot};
use calo_core::*;
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "calo")]
#[command(about = "Calorie and energy-balance tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set or show the user profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Set a weight target or a manual calorie goal
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },

    /// Log a food or a workout
    Log {
        #[command(subcommand)]
        action: LogAction,
    },

    /// Toggle an item as favorite
    Favorite {
        /// Catalog item id
        id: String,

        /// Default quantity (grams or minutes)
        #[arg(long)]
        quantity: Option<f64>,
    },

    /// List favorites
    Favorites {
        /// Ranking (recent, popular)
        #[arg(long, default_value = "recent")]
        sort: String,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Log a weigh-in, or list the weight history when no weight is given
    Weight {
        /// Weight in kg
        kg: Option<f64>,

        /// Note stored with the weigh-in
        #[arg(long)]
        note: Option<String>,

        /// Only list weigh-ins from the last N days
        #[arg(long)]
        days: Option<u32>,
    },

    /// Show the daily summary (default)
    Today {
        /// Day to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Export daily summaries to CSV
    Export {
        /// Number of days ending today
        #[arg(long, default_value_t = 7)]
        days: u32,

        /// Output file, defaults to <data-dir>/export/daily.csv
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List reference foods and workouts
    Catalog,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Create or replace the profile
    Set {
        /// male or female
        #[arg(long)]
        sex: String,

        #[arg(long)]
        age: u32,

        /// Height in cm
        #[arg(long)]
        height: f64,

        /// Weight in kg
        #[arg(long)]
        weight: f64,

        /// sedentary, light, moderate, active, very_active
        #[arg(long)]
        activity: Option<String>,

        /// lose, maintain, gain
        #[arg(long)]
        intent: Option<String>,
    },

    /// Show the profile and computed plan
    Show,
}

#[derive(Subcommand)]
enum GoalAction {
    /// Aim for a target weight at a weekly rate or within a number of weeks
    Target {
        /// Target weight in kg
        #[arg(long)]
        weight: f64,

        /// Weekly rate in kg/week
        #[arg(long, conflicts_with = "weeks")]
        rate: Option<f64>,

        /// Duration in weeks
        #[arg(long)]
        weeks: Option<u32>,
    },

    /// Pin the daily calorie goal
    Calories { kcal: f64 },

    /// Remove the weight target and any pinned calorie goal
    Clear,
}

#[derive(Subcommand)]
enum LogAction {
    /// Log a food by catalog id
    Food {
        id: String,

        /// Grams eaten, defaults to the favorite quantity or one serving
        #[arg(long)]
        grams: Option<f64>,

        /// breakfast, lunch, dinner, snack
        #[arg(long)]
        meal: Option<String>,
    },

    /// Log a workout by catalog id
    Workout {
        id: String,

        /// Minutes, defaults to the favorite quantity or 30
        #[arg(long)]
        minutes: Option<u32>,
    },
}

struct Paths {
    state: PathBuf,
    journal: PathBuf,
    weights: PathBuf,
    export: PathBuf,
}

impl Paths {
    fn new(data_dir: &Path) -> Self {
        Self {
            state: data_dir.join("state.json"),
            journal: data_dir.join("entries.jsonl"),
            weights: data_dir.join("weights.jsonl"),
            export: data_dir.join("export").join("daily.csv"),
        }
    }
}

fn main() -> Result<()> {
    calo_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    std::fs::create_dir_all(&data_dir)?;
    let paths = Paths::new(&data_dir);
    tracing::debug!("Using data directory {:?}", data_dir);

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Catalog("Invalid catalog".into()));
    }

    match cli.command {
        Some(Commands::Profile { action }) => match action {
            ProfileAction::Set {
                sex,
                age,
                height,
                weight,
                activity,
                intent,
            } => cmd_profile_set(&paths, &config, &sex, age, height, weight, activity, intent),
            ProfileAction::Show => cmd_profile_show(&paths),
        },
        Some(Commands::Goal { action }) => match action {
            GoalAction::Target {
                weight,
                rate,
                weeks,
            } => cmd_goal_target(&paths, &config, weight, rate, weeks),
            GoalAction::Calories { kcal } => cmd_goal_calories(&paths, &config, kcal),
            GoalAction::Clear => cmd_goal_clear(&paths),
        },
        Some(Commands::Log { action }) => match action {
            LogAction::Food { id, grams, meal } => cmd_log_food(&paths, catalog, &id, grams, meal),
            LogAction::Workout { id, minutes } => cmd_log_workout(&paths, catalog, &id, minutes),
        },
        Some(Commands::Favorite { id, quantity }) => {
            cmd_favorite(&paths, catalog, &id, quantity)
        }
        Some(Commands::Favorites { sort, limit }) => cmd_favorites(&paths, catalog, &sort, limit),
        Some(Commands::Weight { kg, note, days }) => cmd_weight(&paths, &config, kg, note, days),
        Some(Commands::Today { date }) => cmd_today(&paths, &config, date.as_deref()),
        Some(Commands::Export { days, out }) => {
            let out = out.unwrap_or_else(|| paths.export.clone());
            cmd_export(&paths, days, &out)
        }
        Some(Commands::Catalog) => cmd_catalog(catalog),
        None => cmd_today(&paths, &config, None),
    }
}

fn parse_sex(value: &str) -> Result<Sex> {
    match value.trim().to_lowercase().as_str() {
        "male" | "m" => Ok(Sex::Male),
        "female" | "f" => Ok(Sex::Female),
        other => Err(Error::Validation(format!(
            "sex must be male or female (got {:?})",
            other
        ))),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_profile_set(
    paths: &Paths,
    config: &Config,
    sex: &str,
    age: u32,
    height: f64,
    weight: f64,
    activity: Option<String>,
    intent: Option<String>,
) -> Result<()> {
    let profile = UserProfile {
        sex: parse_sex(sex)?,
        age_years: age,
        height_cm: height,
        weight_kg: weight,
        activity: activity
            .as_deref()
            .map(ActivityLevel::parse_lenient)
            .unwrap_or_default(),
        intent: intent
            .as_deref()
            .map(WeightIntent::parse_lenient)
            .unwrap_or_default(),
    };
    config.limits.validate_profile(&profile)?;

    let state = UserState::update(&paths.state, |state| {
        state.profile = Some(profile.clone());
        Ok(())
    })?;

    println!("✓ Profile saved");
    display_plan(&profile, &state.plan(Utc::now())?);
    Ok(())
}

fn cmd_profile_show(paths: &Paths) -> Result<()> {
    let state = UserState::load(&paths.state)?;
    let profile = state.require_profile()?;
    display_plan(profile, &state.plan(Utc::now())?);

    if let Some(record) = weight::latest(&paths.weights)? {
        println!(
            "  Last weigh-in: {:.1} kg on {}",
            record.weight_kg,
            record.logged_at.with_timezone(&Local).format("%Y-%m-%d")
        );
        println!();
    }
    Ok(())
}

fn cmd_goal_target(
    paths: &Paths,
    config: &Config,
    weight: f64,
    rate: Option<f64>,
    weeks: Option<u32>,
) -> Result<()> {
    config.limits.validate_target_weight(weight)?;

    let mode = match (rate, weeks) {
        (_, Some(weeks)) => {
            config.limits.validate_weeks(weeks)?;
            TimelineMode::DurationDriven {
                days: i64::from(weeks) * 7,
            }
        }
        (Some(rate), None) => {
            config.limits.validate_weekly_rate(rate)?;
            TimelineMode::RateDriven { weekly_rate: rate }
        }
        (None, None) => TimelineMode::RateDriven {
            weekly_rate: config.display.default_weekly_rate,
        },
    };

    let now = Utc::now();
    let state = UserState::update(&paths.state, |state| {
        let current = state.require_profile()?.weight_kg;
        let days = mode.project(current, weight).days;
        state.goal_target = Some(
            GoalTarget::new(weight, mode)
                .with_target_date(timeline::projected_target_date(now, days)),
        );
        Ok(())
    })?;

    let plan = state.plan(now)?;
    println!("✓ Target saved");
    if let Some(ref target) = plan.target {
        display_target(target);
    }
    println!("  Daily goal: {:.0} kcal ({})", plan.calorie_goal, source_label(plan.goal_source));
    if state.calorie_goal_override.is_some() {
        println!("  Note: the pinned calorie goal stays in effect until `calo goal clear`");
    }
    Ok(())
}

fn cmd_goal_calories(paths: &Paths, config: &Config, kcal: f64) -> Result<()> {
    config.limits.validate_calorie_goal(kcal)?;
    UserState::update(&paths.state, |state| {
        state.calorie_goal_override = Some(kcal);
        Ok(())
    })?;
    println!("✓ Daily calorie goal pinned at {:.0} kcal", kcal);
    Ok(())
}

fn cmd_goal_clear(paths: &Paths) -> Result<()> {
    UserState::update(&paths.state, |state| {
        state.goal_target = None;
        state.calorie_goal_override = None;
        Ok(())
    })?;
    println!("✓ Goal cleared");
    Ok(())
}

/// Quantity to log: explicit value, then favorite default, then catalog default
fn resolve_quantity(
    explicit: Option<f64>,
    favorite: Option<&FavoriteRecord>,
    catalog_default: f64,
) -> f64 {
    explicit
        .or_else(|| favorite.map(|f| f.default_quantity))
        .unwrap_or(catalog_default)
}

/// Bump the favorite's use count under the state lock
fn count_favorite_use(paths: &Paths, id: &str, at: DateTime<Utc>) -> Result<()> {
    UserState::update(&paths.state, |state| {
        if state.favorites.record_use(id, at) {
            tracing::debug!("Counted favorite use of {}", id);
        }
        Ok(())
    })?;
    Ok(())
}

fn cmd_log_food(
    paths: &Paths,
    catalog: &Catalog,
    id: &str,
    grams: Option<f64>,
    meal: Option<String>,
) -> Result<()> {
    let food = catalog.food(id)?;
    let state = UserState::load(&paths.state)?;
    let grams = resolve_quantity(grams, state.favorites.get(id), food.serving_g);
    if !grams.is_finite() || grams <= 0.0 {
        return Err(Error::Validation(format!(
            "grams must be greater than 0 (got {})",
            grams
        )));
    }
    let meal = meal
        .as_deref()
        .map(MealType::parse_lenient)
        .unwrap_or_default();

    let now = Utc::now();
    let entry = food.entry(grams, meal, now);
    JsonlSink::new(&paths.journal).append(&entry)?;

    if state.favorites.is_favorite(id) {
        count_favorite_use(paths, id, now)?;
    }

    println!(
        "✓ Logged {} ({:.0} g, {}): {:.0} kcal",
        food.name,
        grams,
        meal.as_str(),
        entry.calories_consumed()
    );
    Ok(())
}

fn cmd_log_workout(
    paths: &Paths,
    catalog: &Catalog,
    id: &str,
    minutes: Option<u32>,
) -> Result<()> {
    let workout = catalog.workout(id)?;
    let state = UserState::load(&paths.state)?;
    let minutes = resolve_quantity(
        minutes.map(f64::from),
        state.favorites.get(id),
        calo_core::catalog::DEFAULT_WORKOUT_MINUTES,
    )
    .round();
    if !minutes.is_finite() || minutes < 1.0 {
        return Err(Error::Validation(format!(
            "minutes must be at least 1 (got {})",
            minutes
        )));
    }

    let now = Utc::now();
    let entry = workout.entry(minutes as u32, now);
    JsonlSink::new(&paths.journal).append(&entry)?;

    if state.favorites.is_favorite(id) {
        count_favorite_use(paths, id, now)?;
    }

    println!(
        "✓ Logged {} ({} min): {:.0} kcal burned",
        workout.name,
        entry.duration_minutes(),
        entry.calories_burned()
    );
    Ok(())
}

fn cmd_weight(
    paths: &Paths,
    config: &Config,
    kg: Option<f64>,
    note: Option<String>,
    days: Option<u32>,
) -> Result<()> {
    let Some(kg) = kg else {
        return list_weights(paths, days);
    };

    config.limits.validate_weight(kg)?;
    let weigh_in = weight::log_weight(&paths.weights, &paths.state, kg, Utc::now(), note)?;
    match weigh_in.change_kg() {
        Some(change) => println!("✓ Logged weight {:.1} kg ({:+.1} kg)", kg, change),
        None => println!("✓ Logged weight {:.1} kg (no change)", kg),
    }
    Ok(())
}

fn list_weights(paths: &Paths, days: Option<u32>) -> Result<()> {
    let records = match days {
        Some(days) => {
            let since = Utc::now() - Duration::days(i64::from(days));
            let mut records = weight::history_since(&paths.weights, since)?;
            records.reverse();
            records
        }
        None => weight::load_history(&paths.weights)?,
    };

    if records.is_empty() {
        println!("No weigh-ins yet.");
        return Ok(());
    }

    for record in records {
        println!(
            "  {}  {:>6.1} kg{}",
            record.logged_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            record.weight_kg,
            record
                .note
                .as_deref()
                .map(|n| format!("  {}", n))
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn cmd_favorite(
    paths: &Paths,
    catalog: &Catalog,
    id: &str,
    quantity: Option<f64>,
) -> Result<()> {
    let default_quantity = catalog
        .default_quantity(id)
        .ok_or_else(|| Error::Catalog(format!("Unknown item: {}", id)))?;
    let quantity = quantity.unwrap_or(default_quantity);

    let mut added = false;
    UserState::update(&paths.state, |state| {
        added = state.favorites.toggle(id, quantity, Utc::now());
        Ok(())
    })?;

    if added {
        println!("✓ Added {} to favorites", id);
    } else {
        println!("✓ Removed {} from favorites", id);
    }
    Ok(())
}

fn cmd_favorites(paths: &Paths, catalog: &Catalog, sort: &str, limit: usize) -> Result<()> {
    let order = match sort.trim().to_lowercase().as_str() {
        "recent" => RankOrder::Recent,
        "popular" => RankOrder::Popular,
        other => {
            eprintln!("Unknown sort order: {}. Using recent.", other);
            RankOrder::Recent
        }
    };

    let state = UserState::load(&paths.state)?;
    if state.favorites.is_empty() {
        println!("No favorites yet.");
        return Ok(());
    }

    for record in state.favorites.top(order, limit) {
        let name = item_name(catalog, &record.item_id);
        println!(
            "  {:<16} {:<24} used {:>3}x  last {}",
            record.item_id,
            name,
            record.use_count,
            record.last_used.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn item_name<'a>(catalog: &'a Catalog, id: &'a str) -> &'a str {
    catalog
        .foods
        .get(id)
        .map(|f| f.name.as_str())
        .or_else(|| catalog.workouts.get(id).map(|w| w.name.as_str()))
        .unwrap_or(id)
}

/// Calorie goal and macro goals currently in effect
fn effective_goals(state: &UserState) -> Result<(f64, Macros)> {
    if state.profile.is_some() {
        let plan = state.plan(Utc::now())?;
        return Ok((plan.calorie_goal, plan.macro_goals));
    }
    match state.calorie_goal_override {
        Some(goal) => Ok((goal, goals::macro_goals(goal))),
        None => Err(Error::State(
            "No profile or calorie goal set; run `calo profile set` first".into(),
        )),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| Error::Validation(format!("Invalid date {:?}: {}", value, e)))
}

fn cmd_today(paths: &Paths, config: &Config, date: Option<&str>) -> Result<()> {
    let date = match date {
        Some(value) => parse_date(value)?,
        None => Local::now().date_naive(),
    };

    let state = UserState::load(&paths.state)?;
    let (goal, macro_goals) = effective_goals(&state)?;

    let window = DayWindow::for_date(date, &Local);
    let entries = history::load_day(&paths.journal, &window)?;
    let snapshot = ledger::summarize(&entries, &window, goal, macro_goals);

    display_snapshot(&snapshot, config.display.gauge_width);

    if state.profile.is_some() {
        if let Some(target) = state.plan(Utc::now())?.target {
            display_target_status(&target);
            println!();
        }
    }
    Ok(())
}

fn cmd_export(paths: &Paths, days: u32, out: &Path) -> Result<()> {
    if days == 0 {
        return Err(Error::Validation("days must be at least 1".into()));
    }

    let state = UserState::load(&paths.state)?;
    let (goal, macro_goals) = effective_goals(&state)?;

    let entries = journal::read_entries(&paths.journal)?;
    let series = ledger::daily_series(
        &entries,
        Local::now().date_naive(),
        days,
        &Local,
        goal,
        macro_goals,
    );

    let count = export::export_daily_summaries(&series, out)?;
    println!("✓ Exported {} days to CSV", count);
    println!("  CSV: {}", out.display());
    Ok(())
}

fn cmd_catalog(catalog: &Catalog) -> Result<()> {
    println!("Foods (per 100 g):");
    for food in catalog.sorted_foods() {
        println!(
            "  {:<16} {:<22} {:>5.0} kcal  P {:>4.1}  C {:>4.1}  F {:>4.1}  serving {:.0} g",
            food.id,
            food.name,
            food.kcal_per_100g,
            food.protein_per_100g,
            food.carbs_per_100g,
            food.fat_per_100g,
            food.serving_g
        );
    }
    println!();
    println!("Workouts (per 60 min):");
    for workout in catalog.sorted_workouts() {
        println!(
            "  {:<16} {:<22} {:>5.0} kcal",
            workout.id, workout.name, workout.kcal_per_hour
        );
    }
    Ok(())
}

fn source_label(source: goals::GoalSource) -> &'static str {
    match source {
        goals::GoalSource::Manual => "pinned",
        goals::GoalSource::Target => "weight target",
        goals::GoalSource::Intent => "intent",
    }
}

fn display_plan(profile: &UserProfile, plan: &EnergyPlan) {
    println!();
    println!(
        "  {:?}, {} years, {:.0} cm, {:.1} kg, {} activity, goal: {}",
        profile.sex,
        profile.age_years,
        profile.height_cm,
        profile.weight_kg,
        profile.activity.as_str(),
        profile.intent.as_str()
    );
    println!("  BMR:          {:.0} kcal", plan.bmr);
    println!("  TDEE:         {:.0} kcal", plan.tdee);
    println!("  BMI:          {:.1} ({})", plan.bmi, plan.bmi_category.label());
    println!("  Ideal weight: {:.1} kg", plan.ideal_weight_kg);
    println!(
        "  Daily goal:   {:.0} kcal ({})",
        plan.calorie_goal,
        source_label(plan.goal_source)
    );
    println!(
        "  Macros:       P {:.0} g  C {:.0} g  F {:.0} g",
        plan.macro_goals.protein_g, plan.macro_goals.carbs_g, plan.macro_goals.fat_g
    );
    if let Some(ref target) = plan.target {
        display_target(target);
    }
    println!();
}

fn display_target(target: &TargetPlan) {
    println!(
        "  Target:       {:.1} kg in {} days ({:.2} kg/week, {})",
        target.target_weight_kg,
        target.days,
        target.weekly_rate,
        target.pace.label()
    );
    println!(
        "  Target date:  {}",
        target.target_date.with_timezone(&Local).format("%Y-%m-%d")
    );
    if target.is_overdue() {
        println!("{}", TARGET_OVERDUE);
    } else {
        println!("  Days left:    {}", target.days_remaining);
    }
    if let Some(ref warning) = target.rate_warning {
        eprintln!("Warning: {}", warning);
        println!("  Safer goal:   {:.0} kcal", target.safe_calorie_goal);
    }
}

const TARGET_OVERDUE: &str = "  Target date reached; set a new one with `calo goal target`";

fn display_target_status(target: &TargetPlan) {
    if target.is_overdue() {
        println!("{}", TARGET_OVERDUE);
    } else {
        println!(
            "  Target:       {:.1} kg, {} days left",
            target.target_weight_kg, target.days_remaining
        );
    }
}

/// ASCII rendering of the overflow gauge
fn render_gauge(progress: f64, width: usize) -> String {
    let gauge = OverflowGauge::new(progress);
    let (normal, overflow) = gauge.segments().split_width(width as f64);
    let normal = (normal.round() as usize).min(width);
    let overflow = if gauge.is_overflow() {
        width - normal
    } else {
        (overflow.round() as usize).min(width - normal)
    };
    let empty = width - normal - overflow;
    format!(
        "[{}{}{}]",
        "#".repeat(normal),
        "!".repeat(overflow),
        ".".repeat(empty)
    )
}

fn display_snapshot(snapshot: &DailySnapshot, gauge_width: usize) {
    let progress = snapshot.progress_percent();
    let macro_progress = snapshot.macro_progress();

    println!("\n{}", snapshot.date.format("%A %Y-%m-%d"));
    println!("  Goal:      {:>6.0} kcal", snapshot.calorie_goal);
    println!("  Consumed:  {:>6.0} kcal", snapshot.consumed);
    println!("  Burned:    {:>6.0} kcal", snapshot.burned);
    println!("  Net:       {:>6.0} kcal", snapshot.net_calories());
    println!("  Remaining: {:>6.0} kcal", snapshot.remaining_calories());
    let meals: Vec<String> = snapshot
        .meal_calories
        .eaten()
        .iter()
        .map(|(meal, kcal)| format!("{} {:.0}", meal.as_str(), kcal))
        .collect();
    if !meals.is_empty() {
        println!("  Meals:     {}", meals.join(", "));
    }
    println!(
        "  {} {}%{}",
        render_gauge(f64::from(progress), gauge_width),
        progress,
        if snapshot.is_over_goal() { "  over goal" } else { "" }
    );
    println!(
        "  Protein {:.0}/{:.0} g ({}%)  Carbs {:.0}/{:.0} g ({}%)  Fat {:.0}/{:.0} g ({}%)",
        snapshot.macros.protein_g,
        snapshot.macro_goals.protein_g,
        macro_progress.protein,
        snapshot.macros.carbs_g,
        snapshot.macro_goals.carbs_g,
        macro_progress.carbs,
        snapshot.macros.fat_g,
        snapshot.macro_goals.fat_g,
        macro_progress.fat
    );
    println!(
        "  Entries: {} food, {} workout ({} min)",
        snapshot.food_entries, snapshot.workout_entries, snapshot.workout_minutes
    );
    println!();
}
