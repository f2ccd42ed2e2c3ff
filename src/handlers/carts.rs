use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::common::success_response;
use crate::{errors::ServiceError, sessions::SessionIdentity, AppState};

/// Creates the router for cart endpoints
pub fn cart_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(view_cart))
        .route("/items", post(add_item))
        .route("/items/{product_id}/decrease", post(decrease_item))
        .route("/items/{product_id}", delete(remove_item))
}

#[derive(Debug, Deserialize)]
struct AddItemRequest {
    product_id: Uuid,
}

/// Priced cart view; availability is not enforced here.
async fn view_cart(
    State(state): State<Arc<AppState>>,
    identity: SessionIdentity,
) -> Result<Response, ServiceError> {
    let entries = state.services.carts.view(&identity.cart_key());
    let view = state.services.pricing.view(&entries).await?;
    Ok(success_response(view))
}

async fn add_item(
    State(state): State<Arc<AppState>>,
    identity: SessionIdentity,
    Json(payload): Json<AddItemRequest>,
) -> Result<Response, ServiceError> {
    let key = identity.cart_key();
    state.services.carts.add(&key, payload.product_id);
    let view = state
        .services
        .pricing
        .view(&state.services.carts.view(&key))
        .await?;
    Ok(success_response(view))
}

async fn decrease_item(
    State(state): State<Arc<AppState>>,
    identity: SessionIdentity,
    Path(product_id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let key = identity.cart_key();
    state.services.carts.decrease(&key, product_id);
    let view = state
        .services
        .pricing
        .view(&state.services.carts.view(&key))
        .await?;
    Ok(success_response(view))
}

async fn remove_item(
    State(state): State<Arc<AppState>>,
    identity: SessionIdentity,
    Path(product_id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let key = identity.cart_key();
    state.services.carts.remove(&key, product_id);
    let view = state
        .services
        .pricing
        .view(&state.services.carts.view(&key))
        .await?;
    Ok(success_response(view))
}
