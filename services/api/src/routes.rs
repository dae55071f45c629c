use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use credit_flow::error::AppError;
use credit_flow::workflows::credit::approvals::{
    approval_router, ApprovalRepository, DirectorApprovalService, SignatoryNotifier,
    SubmissionGateway,
};
use credit_flow::workflows::credit::quote::{
    CreditQuote, LoanItem, PricingPolicy, QuoteLine, QuoteTotals,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteRequest {
    pub(crate) items: Vec<LoanItem>,
    /// Apply the house pricing grid before amortizing. Defaults to true;
    /// disable to quote items exactly as configured.
    #[serde(default = "default_apply_pricing")]
    pub(crate) apply_standard_pricing: bool,
}

fn default_apply_pricing() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub(crate) struct QuoteResponse {
    pub(crate) lines: Vec<QuoteLine>,
    pub(crate) totals: QuoteTotals,
    pub(crate) pricing_applied: bool,
}

pub(crate) fn with_credit_routes<R, N, G>(
    service: Arc<DirectorApprovalService<R, N, G>>,
) -> axum::Router
where
    R: ApprovalRepository + 'static,
    N: SignatoryNotifier + 'static,
    G: SubmissionGateway + 'static,
{
    approval_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/credit/quotes", axum::routing::post(quote_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Stateless quoting: price the submitted items and return their schedules.
pub(crate) async fn quote_endpoint(
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let QuoteRequest {
        items,
        apply_standard_pricing,
    } = payload;

    let pricing = if apply_standard_pricing {
        PricingPolicy::standard()
    } else {
        PricingPolicy::passthrough()
    };

    let mut quote = CreditQuote::new(pricing);
    for item in items {
        quote.add_item(item)?;
    }

    let totals = quote.totals();
    Ok(Json(QuoteResponse {
        lines: quote.lines().to_vec(),
        totals,
        pricing_applied: apply_standard_pricing,
    }))
}
