// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! In-process food table answering lookups without network access

use super::FoodLookupProvider;
use crate::errors::{FuelError, FuelResult};
use crate::models::FoodItem;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Case-insensitive lookup over a fixed set of foods
#[derive(Debug, Clone)]
pub struct StaticFoodCatalog {
    items: HashMap<String, FoodItem>,
}

impl StaticFoodCatalog {
    pub fn new(items: impl IntoIterator<Item = FoodItem>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|item| (item.name.to_lowercase(), item))
                .collect(),
        }
    }

    pub fn insert(&mut self, item: FoodItem) {
        self.items.insert(item.name.to_lowercase(), item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn item(name: &str, calories: f64, serving_qty: f64, serving_unit: &str) -> FoodItem {
    FoodItem {
        name: name.to_string(),
        calories,
        serving_qty,
        serving_unit: serving_unit.to_string(),
    }
}

impl Default for StaticFoodCatalog {
    /// Common endurance snacks with label nutrition values
    fn default() -> Self {
        Self::new([
            item("Clif Bar", 250.0, 1.0, "bar"),
            item("Honey Stinger Gel", 100.0, 1.0, "packet"),
            item("Gatorade", 140.0, 1.0, "bottle"),
        ])
    }
}

#[async_trait]
impl FoodLookupProvider for StaticFoodCatalog {
    async fn lookup(&self, query: &str) -> FuelResult<FoodItem> {
        debug!("Static catalog lookup: {}", query);
        self.items
            .get(&query.trim().to_lowercase())
            .cloned()
            .ok_or_else(|| FuelError::ProviderUnavailable(format!("no catalog entry for '{query}'")))
    }

    fn provider_name(&self) -> &'static str {
        "static_catalog"
    }
}
