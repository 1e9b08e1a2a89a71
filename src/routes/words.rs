use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::db::operations::words::{self, NewWord, Word};
use crate::response::{AppError, MessageResponse};
use crate::state::AppState;

const WORD_NOT_FOUND: &str = "Palabra no encontrada";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/words", get(list_words).post(create_word))
        .route("/words/:id", put(update_word).delete(delete_word))
        .route("/words/:id/progress", put(update_progress))
}

#[derive(Debug, Deserialize)]
struct ProgressQuery {
    points: i64,
}

async fn list_words(State(state): State<AppState>) -> Result<Json<Vec<Word>>, AppError> {
    let db = state.db();
    let mut conn = db.acquire().await?;
    let rows = db.bounded(words::list_words(&mut conn)).await?;
    Ok(Json(rows))
}

async fn create_word(
    State(state): State<AppState>,
    payload: Result<Json<NewWord>, JsonRejection>,
) -> Result<Json<Word>, AppError> {
    let Json(payload) = payload?;
    let db = state.db();
    let mut conn = db.acquire().await?;
    let word = db.bounded(words::insert_word(&mut conn, &payload)).await?;

    tracing::info!(word_id = word.id, "word created");
    Ok(Json(word))
}

/// Overwrites the editable fields and echoes the stored progress back.
async fn update_word(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NewWord>, JsonRejection>,
) -> Result<Json<Word>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let db = state.db();
    let mut conn = db.acquire().await?;
    db.bounded(words::update_word(&mut conn, id, &payload)).await?;

    let progress = db
        .bounded(words::select_progress(&mut conn, id))
        .await?
        .ok_or_else(|| AppError::not_found(WORD_NOT_FOUND))?;

    Ok(Json(Word {
        id,
        english: payload.english,
        spanish: payload.spanish,
        category_id: payload.category_id,
        progress,
    }))
}

async fn update_progress(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    query: Result<Query<ProgressQuery>, QueryRejection>,
) -> Result<Json<Word>, AppError> {
    let Path(id) = id?;
    let Query(query) = query?;
    let db = state.db();
    let mut conn = db.acquire().await?;
    db.bounded(words::add_progress(&mut conn, id, query.points))
        .await?;

    let word = db
        .bounded(words::select_word(&mut conn, id))
        .await?
        .ok_or_else(|| AppError::not_found(WORD_NOT_FOUND))?;

    tracing::debug!(
        word_id = id,
        points = query.points,
        progress = word.progress,
        "progress updated"
    );
    Ok(Json(word))
}

async fn delete_word(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;
    let db = state.db();
    let mut conn = db.acquire().await?;
    if !db.bounded(words::word_exists(&mut conn, id)).await? {
        return Err(AppError::not_found(WORD_NOT_FOUND));
    }

    db.bounded(words::delete_word(&mut conn, id)).await?;

    tracing::info!(word_id = id, "word deleted");
    Ok(Json(MessageResponse {
        message: "Palabra eliminada exitosamente",
    }))
}
