// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests for the daily plan and post-workout analysis,
//! including the async provider seams.

use anyhow::Result;
use async_trait::async_trait;
use sport_fuel_planner::constants::meals;
use sport_fuel_planner::errors::{FuelError, FuelResult};
use sport_fuel_planner::intelligence::{
    analyze_import, cumulative_series, daily_totals, energy_for, per_meal_kcal,
    pre_workout_snack_kcal, recommend_snack, session_energy, MeasurementSource,
};
use sport_fuel_planner::models::{ActivityKind, BodyMetrics, Intensity, MeasuredSession, Sex};
use sport_fuel_planner::providers::{ActivityImportProvider, FoodLookupProvider, StaticFoodCatalog};

/// Tracker returning one canned workout
struct CannedTracker {
    session: MeasuredSession,
}

#[async_trait]
impl ActivityImportProvider for CannedTracker {
    async fn fetch_session(&self, session_id: &str) -> FuelResult<MeasuredSession> {
        if session_id == "ride-42" {
            Ok(self.session.clone())
        } else {
            Err(FuelError::ProviderUnavailable(format!("no session {session_id}")))
        }
    }

    fn provider_name(&self) -> &'static str {
        "canned_tracker"
    }
}

#[tokio::test]
async fn test_full_training_day() -> Result<()> {
    let metrics = BodyMetrics::new(70.0, 175, 25, Sex::Male)?;
    let energy = energy_for(&metrics)?;
    let session = session_energy(ActivityKind::Cycling, Intensity::Moderate, 120.0, metrics.weight_kg)?;

    let totals = daily_totals(&energy, &session);
    assert!((totals.total_kcal - (1730.47 + 980.0)).abs() < 1e-6);
    assert!((totals.total_fluid_liters - (2.45 + 1.4)).abs() < 1e-9);
    assert_eq!(per_meal_kcal(totals.total_kcal, meals::MEALS_PER_DAY)?, 903.0);

    // 30 % of 980 kcal is 294: nothing reaches it, so the largest snack wins
    let target = pre_workout_snack_kcal(session.session_kcal);
    let catalog = StaticFoodCatalog::default();
    let snack = recommend_snack(&catalog, &meals::CANDIDATE_SNACKS, target)
        .await
        .expect("snack");
    assert_eq!(snack.name, "Clif Bar");

    let curve = cumulative_series(120, &session);
    assert_eq!(curve.len(), 121);
    assert!((curve[60].kcal - 490.0).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn test_snack_skips_unknown_candidates() -> Result<()> {
    let catalog = StaticFoodCatalog::default();
    assert!(catalog.lookup("Banana").await.is_err());

    let snack = recommend_snack(&catalog, &["Banana", "Gatorade", "Honey Stinger Gel"], 120.0)
        .await
        .expect("snack");
    assert_eq!(snack.name, "Gatorade");

    assert!(recommend_snack(&catalog, &["Banana"], 120.0).await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_imported_workout_against_plan() -> Result<()> {
    let metrics = BodyMetrics::new(68.0, 180, 34, Sex::Female)?;
    let planned = session_energy(ActivityKind::Cycling, Intensity::Hard, 60.0, metrics.weight_kg)?;
    let tracker = CannedTracker {
        session: MeasuredSession {
            duration_minutes: 60.0,
            distance_km: Some(31.5),
            avg_hr: Some(155.0),
            max_hr: Some(181.0),
            reported_kcal: Some(640.0),
        },
    };

    let comparison = analyze_import(&tracker, "ride-42", &metrics, Some(&planned)).await?;
    assert_eq!(comparison.measurement_source, Some(MeasurementSource::HeartRate));

    let expected_kcal = (0.4472 * 155.0 + 0.1263 * 68.0 + 0.0740 * 34.0 - 20.4022) / 4.184 * 60.0;
    let measured = comparison.measured_kcal.expect("measured kcal");
    assert!((measured - expected_kcal).abs() < 1e-9);
    assert!((comparison.measured_fluid_liters.expect("fluid") - 1.38e-3 * expected_kcal).abs() < 1e-9);
    assert!((comparison.kcal_delta.expect("delta") - (expected_kcal - 680.0)).abs() < 1e-9);

    assert!(matches!(
        analyze_import(&tracker, "run-1", &metrics, None).await,
        Err(FuelError::ProviderUnavailable(_))
    ));
    Ok(())
}
