// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests for intake checkpoint plans

use anyhow::Result;
use sport_fuel_planner::intelligence::{build_plan, default_cadence, plan_for_session, session_energy};
use sport_fuel_planner::models::{ActivityKind, CheckpointKind, Intensity};

#[test]
fn test_hour_with_thirty_and_fifteen_minute_intervals() -> Result<()> {
    let plan = build_plan(60, 630.0, 0.7, 30, 15)?;

    let offsets: Vec<u32> = plan.checkpoints.iter().map(|c| c.minute_offset).collect();
    assert_eq!(offsets, vec![15, 30, 45, 60]);
    assert_eq!(plan.eat_count(), 2);
    assert_eq!(plan.drink_count(), 4);

    for checkpoint in &plan.checkpoints {
        if let Some(drink) = checkpoint.drink_liters {
            assert!((drink - 0.175).abs() < 1e-12);
        }
    }

    for minute in [30, 60] {
        let both = plan
            .checkpoints
            .iter()
            .find(|c| c.minute_offset == minute)
            .expect("checkpoint present");
        assert_eq!(both.kind, CheckpointKind::Both);
        assert_eq!(both.eat_kcal, Some(315.0));
        assert!((both.drink_liters.unwrap_or_default() - 0.175).abs() < 1e-12);
    }
    Ok(())
}

#[test]
fn test_amounts_sum_to_session_totals() -> Result<()> {
    for duration in [1_u32, 29, 60, 95, 137, 181, 300] {
        for (eat, drink) in [(20, 15), (7, 11), (45, 15), (60, 60)] {
            let plan = build_plan(duration, 812.3, 1.37, eat, drink)?;

            if duration >= eat {
                assert!((plan.total_eat_kcal() - 812.3).abs() < 1e-6);
            } else {
                assert_eq!(plan.eat_count(), 0);
            }
            if duration >= drink {
                assert!((plan.total_drink_liters() - 1.37).abs() < 1e-6);
            }
        }
    }
    Ok(())
}

#[test]
fn test_offsets_increase_and_hit_a_cadence() -> Result<()> {
    let plan = build_plan(240, 2400.0, 2.8, 45, 20)?;

    for pair in plan.checkpoints.windows(2) {
        assert!(pair[0].minute_offset < pair[1].minute_offset);
    }
    for checkpoint in &plan.checkpoints {
        let offset = checkpoint.minute_offset;
        assert!(offset > 0 && offset <= 240);
        assert!(offset % 45 == 0 || offset % 20 == 0);
        match checkpoint.kind {
            CheckpointKind::Eat => assert!(offset % 45 == 0 && offset % 20 != 0),
            CheckpointKind::Drink => assert!(offset % 20 == 0 && offset % 45 != 0),
            CheckpointKind::Both => assert_eq!(offset % 180, 0),
        }
    }
    Ok(())
}

#[test]
fn test_eat_interval_beyond_duration_emits_no_food() -> Result<()> {
    let plan = build_plan(30, 250.0, 0.35, 45, 15)?;
    assert_eq!(plan.eat_count(), 0);
    assert_eq!(plan.total_eat_kcal(), 0.0);
    assert!(plan.checkpoints.iter().all(|c| c.eat_kcal.is_none()));
    Ok(())
}

#[test]
fn test_any_positive_interval_is_accepted() -> Result<()> {
    let plan = build_plan(10, 100.0, 0.1, 1, 3)?;
    assert_eq!(plan.eat_count(), 10);
    assert_eq!(plan.drink_count(), 3);
    assert!(build_plan(10, 100.0, 0.1, 0, 3).is_err());
    Ok(())
}

#[test]
fn test_session_to_plan_pipeline() -> Result<()> {
    let session = session_energy(ActivityKind::Triathlon, Intensity::Hard, 150.0, 72.0)?;
    let cadence = default_cadence(150);
    assert_eq!(cadence.eat_interval_minutes, 45);
    assert_eq!(cadence.drink_interval_minutes, 15);

    let plan = plan_for_session(150.0, &session, cadence)?;
    assert_eq!(plan.eat_count(), 3);
    assert_eq!(plan.drink_count(), 10);
    assert!((plan.total_eat_kcal() - session.session_kcal).abs() < 1e-6);
    assert!((plan.total_drink_liters() - session.session_fluid_liters).abs() < 1e-6);
    Ok(())
}
