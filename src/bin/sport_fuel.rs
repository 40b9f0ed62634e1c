// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use sport_fuel_planner::config::PlannerConfig;
use sport_fuel_planner::intelligence::{
    activity::ActivityModel, cadence_for, calculate_energy, compare_with_plan, cumulative_series,
    daily_totals, default_snack_candidates, hourly_rate, per_meal_kcal, plan_for_session,
    pre_workout_snack_kcal, recommend_snack, Cadence,
};
use sport_fuel_planner::constants::meals;
use sport_fuel_planner::logging::init_from_env;
use sport_fuel_planner::models::{
    ActivityKind, ActivitySelection, BodyMetrics, Intensity, MeasuredSession, SessionResult, Sex,
};
use sport_fuel_planner::providers::StaticFoodCatalog;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "sport-fuel")]
#[command(about = "Plan energy, fluid and intake checkpoints for a training session")]
#[command(version)]
struct Cli {
    /// Planner config file (TOML)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Trained calorie model; the factor table is used when absent or unusable
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Basal metabolic rate and daily fluid baseline
    Energy {
        #[command(flatten)]
        metrics: MetricsArgs,
    },
    /// Calories burned and fluid lost in one session
    Session {
        #[command(flatten)]
        metrics: MetricsArgs,
        #[command(flatten)]
        activity: ActivityArgs,
    },
    /// Timed eat and drink checkpoints for one session
    Plan {
        #[command(flatten)]
        metrics: MetricsArgs,
        #[command(flatten)]
        activity: ActivityArgs,
        /// Override the eat interval in minutes
        #[arg(long)]
        eat_interval: Option<u32>,
        /// Override the drink interval in minutes
        #[arg(long)]
        drink_interval: Option<u32>,
        /// Session start (RFC 3339) to print wall-clock times
        #[arg(long)]
        start: Option<DateTime<Utc>>,
    },
    /// Daily totals, meal split, pre-workout snack and burn curve
    Day {
        #[command(flatten)]
        metrics: MetricsArgs,
        #[command(flatten)]
        activity: ActivityArgs,
    },
    /// Compare a recorded workout with its plan
    Analyze {
        #[command(flatten)]
        metrics: MetricsArgs,
        #[command(flatten)]
        activity: ActivityArgs,
        /// Recorded duration in minutes
        #[arg(long)]
        recorded_minutes: f64,
        /// Average heart rate in bpm
        #[arg(long)]
        avg_hr: Option<f64>,
        /// Calories reported by the device
        #[arg(long)]
        reported_kcal: Option<f64>,
    },
}

#[derive(Args)]
struct MetricsArgs {
    /// Body weight in kg
    #[arg(long)]
    weight: f64,
    /// Height in cm
    #[arg(long)]
    height: u32,
    /// Age in years
    #[arg(long)]
    age: u32,
    /// male, female or other
    #[arg(long, default_value = "other")]
    sex: String,
}

impl MetricsArgs {
    fn to_metrics(&self) -> Result<BodyMetrics> {
        let sex: Sex = self.sex.parse()?;
        let metrics = BodyMetrics::new(self.weight, self.height, self.age, sex)?;
        metrics
            .validate_ranges()
            .context("Body metrics outside the supported ranges")?;
        Ok(metrics)
    }
}

#[derive(Args)]
struct ActivityArgs {
    /// running, cycling, swimming or triathlon
    #[arg(long)]
    activity: String,
    /// light, moderate or hard
    #[arg(long, default_value = "moderate")]
    intensity: String,
    /// Planned duration in minutes
    #[arg(long)]
    duration: f64,
    /// Planned distance in km (model path only)
    #[arg(long)]
    distance: Option<f64>,
}

impl ActivityArgs {
    fn to_selection(&self) -> Result<ActivitySelection> {
        let kind: ActivityKind = self.activity.parse()?;
        let intensity: Intensity = self.intensity.parse()?;
        let mut selection = ActivitySelection::new(kind, intensity, self.duration);
        if let Some(distance) = self.distance {
            selection = selection.with_distance(distance);
        }
        Ok(selection)
    }
}

struct Planner {
    config: PlannerConfig,
    activity_model: ActivityModel,
}

impl Planner {
    fn new(config: PlannerConfig, model: Option<PathBuf>) -> Self {
        let activity_model = match model {
            Some(path) => ActivityModel::load_with_model(config.activity.clone(), &path),
            None => ActivityModel::new(config.activity.clone()),
        };
        Self {
            config,
            activity_model,
        }
    }

    fn session(&self, metrics: &BodyMetrics, activity: &ActivityArgs) -> Result<(ActivitySelection, SessionResult)> {
        let selection = activity.to_selection()?;
        let session = self
            .activity_model
            .session_energy(&selection, metrics.weight_kg)?;
        Ok((selection, session))
    }

    fn cadence(&self, duration_minutes: f64) -> Cadence {
        cadence_for(whole_minutes(duration_minutes), &self.config.cadence)
    }
}

fn whole_minutes(duration_minutes: f64) -> u32 {
    duration_minutes.max(0.0).floor().min(f64::from(u32::MAX)) as u32
}

#[tokio::main]
async fn main() -> Result<()> {
    init_from_env()?;

    let cli = Cli::parse();
    let config = PlannerConfig::load(cli.config.clone())?;
    let planner = Planner::new(config, cli.model.clone());

    let output = match cli.command {
        Commands::Energy { metrics } => {
            let metrics = metrics.to_metrics()?;
            let energy = calculate_energy(&metrics, &planner.config.harris_benedict)?;
            serde_json::to_value(energy)?
        }
        Commands::Session { metrics, activity } => {
            let metrics = metrics.to_metrics()?;
            let (_, session) = planner.session(&metrics, &activity)?;
            serde_json::to_value(session)?
        }
        Commands::Plan {
            metrics,
            activity,
            eat_interval,
            drink_interval,
            start,
        } => {
            let metrics = metrics.to_metrics()?;
            let (selection, session) = planner.session(&metrics, &activity)?;
            let defaults = planner.cadence(selection.duration_minutes);
            let cadence = Cadence {
                eat_interval_minutes: eat_interval.unwrap_or(defaults.eat_interval_minutes),
                drink_interval_minutes: drink_interval.unwrap_or(defaults.drink_interval_minutes),
            };
            let plan = plan_for_session(selection.duration_minutes, &session, cadence)?;

            let schedule = start.map(|start| {
                plan.timed(start)
                    .into_iter()
                    .map(|(at, checkpoint)| json!({ "at": at, "checkpoint": checkpoint }))
                    .collect::<Vec<_>>()
            });

            json!({
                "session": session,
                "plan": plan,
                "schedule": schedule,
            })
        }
        Commands::Day { metrics, activity } => {
            let metrics = metrics.to_metrics()?;
            let energy = calculate_energy(&metrics, &planner.config.harris_benedict)?;
            let (selection, session) = planner.session(&metrics, &activity)?;
            let totals = daily_totals(&energy, &session);
            let per_meal = per_meal_kcal(totals.total_kcal, meals::MEALS_PER_DAY)?;

            let snack_target = pre_workout_snack_kcal(session.session_kcal);
            let catalog = StaticFoodCatalog::default();
            let snack = recommend_snack(&catalog, &default_snack_candidates(), snack_target).await;
            let curve = cumulative_series(whole_minutes(selection.duration_minutes), &session);

            json!({
                "energy": energy,
                "session": session,
                "totals": totals,
                "per_meal_kcal": per_meal,
                "pre_workout_snack": { "target_kcal": snack_target, "recommendation": snack },
                "kcal_per_hour": hourly_rate(selection.duration_minutes, &session),
                "cumulative": curve,
            })
        }
        Commands::Analyze {
            metrics,
            activity,
            recorded_minutes,
            avg_hr,
            reported_kcal,
        } => {
            let metrics = metrics.to_metrics()?;
            let (_, planned) = planner.session(&metrics, &activity)?;
            let recorded = MeasuredSession {
                duration_minutes: recorded_minutes,
                distance_km: activity.distance,
                avg_hr,
                max_hr: None,
                reported_kcal,
            };
            let comparison = compare_with_plan(&recorded, &metrics, Some(&planned))?;
            serde_json::to_value(comparison)?
        }
    };

    info!(model_loaded = planner.activity_model.has_model(), "Planning complete");
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
