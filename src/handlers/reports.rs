use std::sync::Arc;

use axum::{extract::State, response::Response, routing::get, Router};
use chrono::Utc;

use super::common::{pdf_attachment, success_response};
use crate::{
    documents::{pdf, report::{sales_report_document, SALES_REPORT_FILENAME}},
    errors::ServiceError,
    services::reports::TOP_PRODUCTS_LIMIT,
    AppState,
};

/// Creates the router for report endpoints
pub fn report_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sales", get(sales_summary))
        .route("/sales/pdf", get(sales_report_pdf))
}

/// On-screen aggregate view.
async fn sales_summary(State(state): State<Arc<AppState>>) -> Result<Response, ServiceError> {
    let summary = state
        .services
        .reports
        .sales_summary(TOP_PRODUCTS_LIMIT)
        .await?;
    Ok(success_response(summary))
}

/// The same aggregation rendered as a PDF document.
async fn sales_report_pdf(State(state): State<Arc<AppState>>) -> Result<Response, ServiceError> {
    let summary = state
        .services
        .reports
        .sales_summary(TOP_PRODUCTS_LIMIT)
        .await?;
    let document = sales_report_document(&state.config.store, &summary, Utc::now());
    let bytes = pdf::render(&document)?;
    Ok(pdf_attachment(SALES_REPORT_FILENAME, bytes))
}
