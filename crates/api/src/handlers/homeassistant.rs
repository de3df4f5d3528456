//! Read-only summaries for Home Assistant REST sensors.
//!
//! The summaries authenticate with a regular bearer token; the sensor
//! configuration itself is public.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Local, NaiveDate, Timelike};
use kitchenry_core::types::MealType;
use kitchenry_db::models::meal_plan::MealPlan;
use kitchenry_db::models::shopping_list::ShoppingListItem;
use kitchenry_db::repositories::{MealPlanRepo, ShoppingListRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TodaySummary {
    pub date: NaiveDate,
    pub meals: Vec<MealPlan>,
    /// Title of the first meal that has not started yet.
    pub next_meal: Option<String>,
    pub meal_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ShoppingSummary {
    pub list_name: Option<String>,
    pub unchecked_count: usize,
    pub total_count: usize,
    pub items: Vec<ShoppingListItem>,
}

/// One Home Assistant REST sensor backed by a summary endpoint.
#[derive(Debug, Serialize)]
pub struct SensorConfig {
    pub name: &'static str,
    pub resource: &'static str,
    pub value_template: &'static str,
    pub json_attributes: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct IntegrationConfig {
    pub sensors: &'static [SensorConfig],
    /// Ready-to-paste `configuration.yaml` snippet.
    pub example_config: String,
}

pub const SENSORS: &[SensorConfig] = &[
    SensorConfig {
        name: "Kitchenry Today's Meals",
        resource: "/api/homeassistant/today",
        value_template: "{{ value_json.data.meal_count }} meals planned",
        json_attributes: &["meals", "next_meal"],
    },
    SensorConfig {
        name: "Kitchenry Shopping List",
        resource: "/api/homeassistant/shopping",
        value_template: "{{ value_json.data.unchecked_count }} items",
        json_attributes: &["list_name", "items"],
    },
];

/// `configuration.yaml` snippet for [`SENSORS`], with placeholders for the
/// server address and the token.
pub fn example_config(sensors: &[SensorConfig]) -> String {
    let mut yaml = String::from("# configuration.yaml\nrest:\n");
    for sensor in sensors {
        yaml.push_str(&format!(
            "  - resource: http://YOUR_KITCHENRY_HOST:8001{}\n",
            sensor.resource
        ));
        yaml.push_str("    headers:\n      Authorization: Bearer YOUR_TOKEN\n");
        yaml.push_str("    json_attributes_path: \"$.data\"\n");
        yaml.push_str("    sensor:\n");
        yaml.push_str(&format!("      - name: \"{}\"\n", sensor.name));
        yaml.push_str(&format!("        value_template: \"{}\"\n", sensor.value_template));
        yaml.push_str("        json_attributes:\n");
        for attribute in sensor.json_attributes {
            yaml.push_str(&format!("          - {attribute}\n"));
        }
    }
    yaml
}

/// First meal of `meals` whose slot starts after `hour`, in slot order.
pub fn next_meal(meals: &[MealPlan], hour: u32) -> Option<&MealPlan> {
    meals
        .iter()
        .filter_map(|m| Some((m.meal_type.parse::<MealType>().ok()?.start_hour(), m)))
        .filter(|(start, _)| *start > hour)
        .min_by_key(|(start, _)| *start)
        .map(|(_, m)| m)
}

/// GET /api/homeassistant/config
pub async fn config() -> impl IntoResponse {
    Json(DataResponse {
        data: IntegrationConfig {
            sensors: SENSORS,
            example_config: example_config(SENSORS),
        },
    })
}

/// GET /api/homeassistant/today
pub async fn today(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let now = Local::now();
    let date = now.date_naive();
    let meals = MealPlanRepo::list_in_range(&state.pool, user.scope(), date, date).await?;
    let next = next_meal(&meals, now.hour()).map(|m| m.recipe_title.clone());

    Ok(Json(DataResponse {
        data: TodaySummary {
            date,
            meal_count: meals.len(),
            next_meal: next,
            meals,
        },
    }))
}

/// GET /api/homeassistant/shopping
///
/// Unchecked items of the newest list.
pub async fn shopping(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let summary = match ShoppingListRepo::latest(&state.pool, user.scope()).await? {
        Some(list) => {
            let total_count = list.items.len();
            let items: Vec<ShoppingListItem> =
                list.items.into_iter().filter(|i| !i.checked).collect();
            ShoppingSummary {
                list_name: Some(list.list.name),
                unchecked_count: items.len(),
                total_count,
                items,
            }
        }
        None => ShoppingSummary {
            list_name: None,
            unchecked_count: 0,
            total_count: 0,
            items: Vec::new(),
        },
    };

    Ok(Json(DataResponse { data: summary }))
}
