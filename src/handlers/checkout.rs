use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::common::{pdf_attachment, success_response, validate_input};
use crate::{
    documents::receipt::RECEIPT_FILENAME,
    services::checkout::{CheckoutError, CheckoutRequest},
    sessions::SessionIdentity,
    AppState,
};

/// Creates the router for checkout endpoints
pub fn checkout_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(checkout_summary).post(submit_checkout))
}

/// Priced summary for the checkout page.
async fn checkout_summary(
    State(state): State<Arc<AppState>>,
    identity: SessionIdentity,
) -> Response {
    match state.services.checkout.summary(&identity.cart_key()).await {
        Ok(quote) => success_response(quote),
        Err(err) => rejection_response(&state, &identity, err).await,
    }
}

/// Runs the commit sequence; success streams back the receipt PDF.
async fn submit_checkout(
    State(state): State<Arc<AppState>>,
    identity: SessionIdentity,
    Json(payload): Json<CheckoutRequest>,
) -> Response {
    if validate_input(&payload).is_err() {
        return rejection_response(&state, &identity, CheckoutError::MissingDeliveryInfo).await;
    }

    let result = state
        .services
        .checkout
        .checkout(&identity.cart_key(), identity.customer_id, payload)
        .await;

    match result {
        Ok(receipt) => pdf_attachment(RECEIPT_FILENAME, receipt.pdf),
        Err(err) => rejection_response(&state, &identity, err).await,
    }
}

/// Failed attempts return the cart view augmented with a human-readable
/// error; unauthenticated attempts redirect to identity collection instead
/// of rendering an error.
async fn rejection_response(
    state: &AppState,
    identity: &SessionIdentity,
    err: CheckoutError,
) -> Response {
    let status = match &err {
        CheckoutError::Unauthenticated => return Redirect::to("/login").into_response(),
        CheckoutError::Service(service_err) => {
            // Persistence failures surface the generic error body.
            return crate::errors::ServiceError::InternalError(service_err.to_string())
                .into_response();
        }
        CheckoutError::EmptyCart | CheckoutError::MissingDeliveryInfo => StatusCode::BAD_REQUEST,
        CheckoutError::InsufficientStock { .. }
        | CheckoutError::StockReconciliationFailed { .. } => StatusCode::CONFLICT,
    };

    let entries = state.services.carts.view(&identity.cart_key());
    let cart = state.services.pricing.view(&entries).await.ok();

    (
        status,
        Json(json!({
            "error": err.to_string(),
            "cart": cart,
        })),
    )
        .into_response()
}
