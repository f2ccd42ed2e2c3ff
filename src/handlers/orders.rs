use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::common::success_response;
use crate::{
    entities::OrderStatus, errors::ServiceError, sessions::SessionIdentity, AppState,
};

/// Creates the router for order endpoints
pub fn order_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(my_orders))
        .route("/{id}/status", put(update_status))
}

/// The authenticated customer's orders, newest first.
async fn my_orders(
    State(state): State<Arc<AppState>>,
    identity: SessionIdentity,
) -> Result<Response, ServiceError> {
    let customer_id = identity
        .customer_id
        .ok_or_else(|| ServiceError::Unauthorized("Please log in to view your orders".to_string()))?;

    let orders = state.services.orders.list_for_customer(customer_id).await?;
    Ok(success_response(orders))
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: OrderStatus,
}

/// Staff status update; any state is reachable from any other.
async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Response, ServiceError> {
    let order = state
        .services
        .orders
        .update_status(order_id, payload.status)
        .await?;
    Ok(success_response(order))
}
