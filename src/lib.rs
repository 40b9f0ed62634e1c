// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Sport Fuel Planner
//!
//! Nutrition and hydration planning for endurance training.
//!
//! ## Features
//!
//! - **Basal energy**: Harris-Benedict metabolic rate and daily fluid baseline
//! - **Session burn**: calories and fluid lost per sport and intensity, optionally
//!   from a trained random forest with automatic fallback to the factor table
//! - **Intake plan**: timed eat and drink checkpoints during a session
//! - **Offline trainer**: builds the calorie model from a reference burn-rate table
//! - **Post-workout analysis**: heart-rate calorie estimate and sweat loss against the plan
//!
//! ## Architecture
//!
//! - **Models**: value types passed between the calculations
//! - **Intelligence**: energy, activity, scheduler, meal plan and workout analysis
//! - **Predictor**: dataset reader, feature encoding, forest, trainer and persisted model
//! - **Providers**: capability traits for food lookup and activity import
//! - **Config**: TOML configuration with embedded defaults
//!
//! ## Example Usage
//!
//! ```rust
//! use sport_fuel_planner::intelligence::{build_plan, default_cadence, energy_for, session_energy};
//! use sport_fuel_planner::models::{ActivityKind, BodyMetrics, Intensity, Sex};
//!
//! fn main() -> anyhow::Result<()> {
//!     let metrics = BodyMetrics::new(70.0, 175, 25, Sex::Male)?;
//!     let energy = energy_for(&metrics)?;
//!
//!     let session = session_energy(ActivityKind::Running, Intensity::Moderate, 60.0, metrics.weight_kg)?;
//!     let cadence = default_cadence(60);
//!     let plan = build_plan(
//!         60,
//!         session.session_kcal,
//!         session.session_fluid_liters,
//!         cadence.eat_interval_minutes,
//!         cadence.drink_interval_minutes,
//!     )?;
//!
//!     println!("BMR {:.0} kcal, {} checkpoints", energy.basal_kcal_per_day, plan.checkpoints.len());
//!     Ok(())
//! }
//! ```

/// Error types shared by the library
pub mod errors;

/// Common data models
pub mod models;

/// Formula coefficients and environment defaults
pub mod constants;

/// Configuration management and persistence
pub mod config;

/// Structured logging
pub mod logging;

/// Planning calculations
pub mod intelligence;

/// Offline calorie model training and runtime prediction
pub mod predictor;

/// Food and activity data sources
pub mod providers;
