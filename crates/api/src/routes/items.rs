//! Item route handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::error::Result;
use crate::extract::{AppJson, AppQuery};
use crate::models::{
    EmailCount, Item, ItemCreated, ItemFilterParams, ItemUpdate, MessageResponse, NewItem,
};
use crate::state::AppState;

/// Create an item.
///
/// POST /items
pub async fn create(
    State(state): State<AppState>,
    AppJson(item): AppJson<NewItem>,
) -> Result<Json<ItemCreated>> {
    let id = state.items().create(item).await?;

    Ok(Json(ItemCreated {
        message: "Item created",
        item_id: id.to_string(),
    }))
}

/// List items matching the query parameters.
///
/// GET /items/filter?email=&expiry_date=&insert_date=&quantity=
pub async fn filter(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ItemFilterParams>,
) -> Result<Json<Vec<Item>>> {
    let items = state.items().filter(&params).await?;
    Ok(Json(items))
}

/// Item counts per email.
///
/// GET /items/aggregate
pub async fn aggregate(State(state): State<AppState>) -> Result<Json<Vec<EmailCount>>> {
    let counts = state.items().aggregate_by_email().await?;
    Ok(Json(counts))
}

/// GET /items/{id}
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Item>> {
    let item = state.items().get_by_id(&id).await?;
    Ok(Json(item))
}

/// PUT /items/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(update): AppJson<ItemUpdate>,
) -> Result<Json<MessageResponse>> {
    state.items().update_by_id(&id, update).await?;

    Ok(Json(MessageResponse {
        message: "Item updated successfully",
    }))
}

/// DELETE /items/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.items().delete_by_id(&id).await?;

    Ok(Json(MessageResponse {
        message: "Item deleted successfully",
    }))
}
