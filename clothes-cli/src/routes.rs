//! API routes for the clothes service

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use clothes_core::{ClothingRule, Lookup, Recommendation};
use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::{error::ApiError, server::AppState};

type AppStateArc = Arc<AppState>;

/// Longest location name accepted.
pub const MAX_LOCATION_CHARS: usize = 122;

pub fn plan_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/get_plan/{id}", get(get_plan))
        .route("/get_all_plan/", get(get_all_plan))
        .route("/get_city_list/", get(get_city_list))
        .route("/{location}", get(clothes_plan))
}

async fn clothes_plan(
    State(state): State<AppStateArc>,
    Path(location): Path<String>,
) -> Result<Json<Recommendation>, ApiError> {
    let len = location.chars().count();
    if len == 0 || len > MAX_LOCATION_CHARS {
        return Err(ApiError::InvalidLocation {
            max: MAX_LOCATION_CHARS,
        });
    }

    match state.provider.current(&location).await? {
        Lookup::Found(observation) => {
            let recommendation = state.resolver.recommend(&observation);
            info!(
                location = %location,
                condition_id = observation.condition_id,
                temp_now = observation.temp_now,
                "recommendation served"
            );
            Ok(Json(recommendation))
        }
        Lookup::NotFound | Lookup::Rejected { .. } | Lookup::Malformed(_) => {
            warn!(location = %location, provider = state.provider.name(), "city not found");
            Err(ApiError::CityNotFound)
        }
    }
}

#[derive(Debug, Serialize)]
struct PlanResponse {
    id: i32,
    status: u16,
    clothes_plan: String,
    temp_min: String,
    temp_max: String,
}

async fn get_plan(
    State(state): State<AppStateArc>,
    Path(id): Path<i32>,
) -> Result<Json<PlanResponse>, ApiError> {
    let rule = state
        .resolver
        .find_by_condition(id)
        .ok_or(ApiError::NoPlan { id })?;

    Ok(Json(PlanResponse {
        id,
        status: 200,
        clothes_plan: rule.message.clone(),
        temp_min: rule.temp_min.to_string(),
        temp_max: rule.temp_max.to_string(),
    }))
}

#[derive(Debug, Serialize)]
struct PlanEntry {
    id: Vec<i32>,
    clothes_plan: String,
    temp_min: String,
    temp_max: String,
}

impl From<&ClothingRule> for PlanEntry {
    fn from(rule: &ClothingRule) -> Self {
        Self {
            id: rule.condition_codes.clone(),
            clothes_plan: rule.message.clone(),
            temp_min: rule.temp_min.to_string(),
            temp_max: rule.temp_max.to_string(),
        }
    }
}

/// Rules keyed by rule id. Serialized as a JSON object in table order.
#[derive(Debug)]
struct PlanListing(Vec<(u32, PlanEntry)>);

impl Serialize for PlanListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(id, entry)| (id.to_string(), entry)))
    }
}

async fn get_all_plan(State(state): State<AppStateArc>) -> Json<PlanListing> {
    let listing = state
        .resolver
        .all()
        .iter()
        .map(|rule| (rule.id, PlanEntry::from(rule)))
        .collect();

    Json(PlanListing(listing))
}

/// Serves the city list file as-is, read fresh on every request.
async fn get_city_list(State(state): State<AppStateArc>) -> Result<Response, ApiError> {
    let bytes = tokio::fs::read(&state.city_list_path)
        .await
        .map_err(ApiError::CityList)?;

    Ok(([(header::CONTENT_TYPE, "application/json")], bytes).into_response())
}
