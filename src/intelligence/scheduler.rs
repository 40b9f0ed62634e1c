// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Timed eat and drink checkpoints for one session

use crate::config::CadenceConfig;
use crate::errors::{FuelError, FuelResult};
use crate::logging::AppLogger;
use crate::models::{Checkpoint, CheckpointKind, IntakePlan, SessionResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Eat and drink intervals in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    pub eat_interval_minutes: u32,
    pub drink_interval_minutes: u32,
}

/// Cadence tiers from `config` for a session length
pub fn cadence_for(duration_minutes: u32, config: &CadenceConfig) -> Cadence {
    let eat_interval_minutes = config
        .eat_tiers
        .iter()
        .find(|(max_duration, _)| duration_minutes <= *max_duration)
        .map_or(config.eat_interval_long, |(_, interval)| *interval);

    Cadence {
        eat_interval_minutes,
        drink_interval_minutes: config.drink_interval,
    }
}

/// Default cadence: eat every 20/30/45/60 min by session length, drink every 15
pub fn default_cadence(duration_minutes: u32) -> Cadence {
    cadence_for(duration_minutes, &CadenceConfig::default())
}

#[derive(Default)]
struct Slot {
    eat_kcal: Option<f64>,
    drink_liters: Option<f64>,
}

/// Build the checkpoint plan for a session
///
/// Eat and drink shares are computed from their own checkpoint counts, so a
/// minute that is both receives a full share of each.
///
/// # Errors
///
/// Returns `InvalidInput` for zero intervals or negative/non-finite amounts
pub fn build_plan(
    duration_minutes: u32,
    session_kcal: f64,
    session_fluid_liters: f64,
    eat_interval_minutes: u32,
    drink_interval_minutes: u32,
) -> FuelResult<IntakePlan> {
    if eat_interval_minutes == 0 || drink_interval_minutes == 0 {
        return Err(FuelError::invalid_input("intake intervals must be positive"));
    }
    if !session_kcal.is_finite() || session_kcal < 0.0 {
        return Err(FuelError::invalid_input(format!(
            "session kcal must be non-negative, got {session_kcal}"
        )));
    }
    if !session_fluid_liters.is_finite() || session_fluid_liters < 0.0 {
        return Err(FuelError::invalid_input(format!(
            "session fluid must be non-negative, got {session_fluid_liters}"
        )));
    }

    let n_eat = duration_minutes / eat_interval_minutes;
    let n_drink = duration_minutes / drink_interval_minutes;

    let mut slots: BTreeMap<u32, Slot> = BTreeMap::new();

    if n_eat > 0 {
        let share = session_kcal / f64::from(n_eat);
        for k in 1..=n_eat {
            slots.entry(k * eat_interval_minutes).or_default().eat_kcal = Some(share);
        }
    }
    if n_drink > 0 {
        let share = session_fluid_liters / f64::from(n_drink);
        for k in 1..=n_drink {
            slots.entry(k * drink_interval_minutes).or_default().drink_liters = Some(share);
        }
    }

    let checkpoints: Vec<Checkpoint> = slots
        .into_iter()
        .filter_map(|(minute_offset, slot)| {
            let kind = match (slot.eat_kcal, slot.drink_liters) {
                (Some(_), Some(_)) => CheckpointKind::Both,
                (Some(_), None) => CheckpointKind::Eat,
                (None, Some(_)) => CheckpointKind::Drink,
                (None, None) => return None,
            };
            Some(Checkpoint {
                minute_offset,
                kind,
                eat_kcal: slot.eat_kcal,
                drink_liters: slot.drink_liters,
            })
        })
        .collect();

    AppLogger::log_plan_built(duration_minutes, n_eat as usize, n_drink as usize);

    Ok(IntakePlan {
        duration_minutes,
        eat_interval_minutes,
        drink_interval_minutes,
        checkpoints,
    })
}

/// Plan for a computed session; fractional minutes are dropped
///
/// # Errors
///
/// Returns `InvalidInput` for a negative duration or zero intervals
pub fn plan_for_session(
    duration_minutes: f64,
    session: &SessionResult,
    cadence: Cadence,
) -> FuelResult<IntakePlan> {
    if !duration_minutes.is_finite() || duration_minutes < 0.0 {
        return Err(FuelError::invalid_input(format!(
            "duration must be non-negative, got {duration_minutes}"
        )));
    }
    let whole_minutes = duration_minutes.floor().min(f64::from(u32::MAX)) as u32;

    build_plan(
        whole_minutes,
        session.session_kcal,
        session.session_fluid_liters,
        cadence.eat_interval_minutes,
        cadence.drink_interval_minutes,
    )
}
