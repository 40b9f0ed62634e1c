// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::errors::{FuelError, FuelResult};
use crate::models::{FoodItem, MeasuredSession};
use async_trait::async_trait;

pub mod catalog;

pub use catalog::StaticFoodCatalog;

/// Source of nutrition facts for a named food
#[async_trait]
pub trait FoodLookupProvider: Send + Sync {
    async fn lookup(&self, query: &str) -> FuelResult<FoodItem>;

    fn provider_name(&self) -> &'static str;
}

/// Source of recorded workouts
#[async_trait]
pub trait ActivityImportProvider: Send + Sync {
    async fn fetch_session(&self, session_id: &str) -> FuelResult<MeasuredSession>;

    fn provider_name(&self) -> &'static str;
}

pub fn create_food_provider(provider_type: &str) -> FuelResult<Box<dyn FoodLookupProvider>> {
    match provider_type.to_lowercase().as_str() {
        "static" | "catalog" => Ok(Box::new(StaticFoodCatalog::default())),
        _ => Err(FuelError::ProviderUnavailable(format!(
            "Unknown food provider: {provider_type}. Currently supported: static"
        ))),
    }
}
