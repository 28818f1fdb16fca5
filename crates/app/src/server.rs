use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};
use venue_models::{ApiResponse, ReservationStatus, ValidationLimits};

use crate::payload::{self, PayloadError, PayloadKind};

type Limits = Arc<ValidationLimits>;
type Envelope = (StatusCode, Json<ApiResponse<Value>>);

fn failure(status: StatusCode, error: impl Into<String>) -> Envelope {
    (status, Json(ApiResponse::error(error)))
}

fn unknown_kind(kind: &str) -> Envelope {
    failure(StatusCode::NOT_FOUND, format!("Unknown payload kind '{kind}'"))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Venue booking schema service",
        "version": crate::version_string()
    }))
}

async fn api_statuses() -> Json<ApiResponse<Vec<&'static str>>> {
    Json(ApiResponse::ok(
        ReservationStatus::ALL.iter().map(|s| s.as_str()).collect(),
    ))
}

async fn api_sample(Path(kind): Path<String>) -> Envelope {
    match PayloadKind::parse(&kind) {
        Some(k) => (StatusCode::OK, Json(ApiResponse::ok(payload::sample(k)))),
        None => unknown_kind(&kind),
    }
}

async fn api_check(
    State(limits): State<Limits>,
    Path(kind): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Envelope {
    let Some(kind) = PayloadKind::parse(&kind) else {
        return unknown_kind(&kind);
    };
    let Json(value) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!("Rejected {kind} body: {rejection}");
            return failure(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match payload::check(kind, value, &limits) {
        Ok(normalized) => (
            StatusCode::OK,
            Json(ApiResponse::ok_with_message(normalized, "valid")),
        ),
        Err(e @ PayloadError::Shape { .. }) => {
            debug!("{e}");
            failure(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e @ PayloadError::Invalid { .. }) => {
            warn!("{e}");
            failure(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    }
}

pub fn router(limits: ValidationLimits) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/statuses", get(api_statuses))
        .route("/sample/{kind}", get(api_sample))
        .route("/check/{kind}", post(api_check));

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(limits))
}

pub async fn run_server(port: u16, limits: ValidationLimits) -> anyhow::Result<()> {
    info!("venue v{}", crate::version_string());
    info!(
        "PIN length {}, party size cap {}",
        limits.pin_length,
        limits.max_party_size.map_or("none".to_string(), |n| n.to_string())
    );

    let app = router(limits);

    let addr = format!("0.0.0.0:{port}");
    info!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
