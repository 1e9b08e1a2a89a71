use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::db::operations::streak;
use crate::response::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/racha", get(get_streak).post(register_today))
}

#[derive(Serialize)]
struct StreakResponse {
    racha: i64,
}

#[derive(Serialize)]
struct RegisteredResponse {
    mensaje: &'static str,
}

async fn get_streak(State(state): State<AppState>) -> Result<Json<StreakResponse>, AppError> {
    let db = state.db();
    let mut conn = db.acquire().await?;
    let racha = db.bounded(streak::count_days(&mut conn)).await?;

    Ok(Json(StreakResponse { racha }))
}

async fn register_today(
    State(state): State<AppState>,
) -> Result<Json<RegisteredResponse>, AppError> {
    let db = state.db();
    let today = state.today();
    let mut conn = db.acquire().await?;
    let inserted = db.bounded(streak::record_day(&mut conn, today)).await?;

    tracing::debug!(day = %today, inserted, "streak day registered");
    Ok(Json(RegisteredResponse {
        mensaje: "Fecha registrada con éxito",
    }))
}
