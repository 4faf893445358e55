//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    domain::HouseName,
    infrastructure::dto::http::{CreateHouseRequest, HouseSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let connections = state.registry.count_connections().await;
    Json(serde_json::json!({"status": "ok", "connections": connections}))
}

/// List all live houses
pub async fn get_houses(State(state): State<Arc<AppState>>) -> Json<Vec<HouseSummaryDto>> {
    let houses = state.registry.list_houses().await;
    Json(houses.iter().map(HouseSummaryDto::from).collect())
}

/// Create a house explicitly. Creating an existing public house by name
/// returns the existing one; this endpoint is the only way to create a
/// private house.
pub async fn create_house(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateHouseRequest>,
) -> Result<(StatusCode, Json<HouseSummaryDto>), StatusCode> {
    let name = match HouseName::new(request.name) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Rejected house create: {}", e);
            return Err(StatusCode::UNPROCESSABLE_ENTITY);
        }
    };

    let snapshot = state.registry.create_house(name, request.private).await;
    Ok((StatusCode::CREATED, Json(HouseSummaryDto::from(&snapshot))))
}
