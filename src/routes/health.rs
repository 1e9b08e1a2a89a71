use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::response::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health))
}

#[derive(Serialize)]
struct PingResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    timestamp: String,
    #[serde(rename = "startTime")]
    start_time: String,
    uptime: u64,
}

/// Liveness probe. The only endpoint that reports the raw connection error.
async fn ping(State(state): State<AppState>) -> Result<Json<PingResponse>, AppError> {
    state.db().probe().await.map_err(|err| {
        tracing::warn!(error = %err, "ping failed");
        AppError::internal(format!("Error de conexión a la base de datos: {err}"))
    })?;

    Ok(Json(PingResponse {
        message: "API funcionando correctamente y conexión a la base de datos exitosa.",
    }))
}

async fn health(State(state): State<AppState>) -> Response {
    let ok = state.db().probe().await.is_ok();

    let response = HealthResponse {
        status: if ok { "ok" } else { "degraded" },
        database: if ok { "connected" } else { "disconnected" },
        timestamp: now_iso(),
        start_time: system_time_iso(state.started_at_system()),
        uptime: state.uptime_seconds(),
    };

    let status_code = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response)).into_response()
}

fn system_time_iso(time: std::time::SystemTime) -> String {
    let datetime: chrono::DateTime<chrono::Utc> = time.into();
    datetime.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
