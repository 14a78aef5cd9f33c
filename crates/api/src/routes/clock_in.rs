//! Clock-in route handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::error::Result;
use crate::extract::AppJson;
use crate::models::{ClockInRecord, ClockInUpdate, MessageResponse, NewClockInRecord, RecordCreated};
use crate::state::AppState;

/// Record a clock-in.
///
/// POST /clock-in
pub async fn create(
    State(state): State<AppState>,
    AppJson(record): AppJson<NewClockInRecord>,
) -> Result<Json<RecordCreated>> {
    let id = state.clock_in().create(record).await?;

    Ok(Json(RecordCreated {
        message: "Clock-in record created",
        record_id: id.to_string(),
    }))
}

/// GET /clock-in/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClockInRecord>> {
    let record = state.clock_in().get_by_id(&id).await?;
    Ok(Json(record))
}

/// PUT /clock-in/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(update): AppJson<ClockInUpdate>,
) -> Result<Json<MessageResponse>> {
    state.clock_in().update_by_id(&id, update).await?;

    Ok(Json(MessageResponse {
        message: "Clock-in record updated successfully",
    }))
}
