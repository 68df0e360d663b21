//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{domain::RoomKey, infrastructure::dto::http::RoomSummaryDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List non-empty rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.coordinator.rooms().await;
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get one room by key; empty and unknown rooms are both 404
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSummaryDto>, StatusCode> {
    let key = RoomKey::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;
    match state.coordinator.room(&key).await {
        Some(room) => Ok(Json(RoomSummaryDto::from(&room))),
        None => Err(StatusCode::NOT_FOUND),
    }
}
