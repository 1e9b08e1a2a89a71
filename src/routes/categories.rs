use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::db::operations::categories::{self, Category};
use crate::response::{AppError, MessageResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            put(update_category).delete(delete_category),
        )
}

#[derive(Debug, Deserialize)]
struct CategoryRequest {
    name: String,
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    let db = state.db();
    let mut conn = db.acquire().await?;
    let rows = db.bounded(categories::list_categories(&mut conn)).await?;
    Ok(Json(rows))
}

async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<Json<Category>, AppError> {
    let Json(payload) = payload?;
    let db = state.db();
    let mut conn = db.acquire().await?;
    let category = db
        .bounded(categories::insert_category(&mut conn, &payload.name))
        .await?;

    tracing::info!(category_id = category.id, "category created");
    Ok(Json(category))
}

async fn update_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<Json<Category>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let db = state.db();
    let mut conn = db.acquire().await?;
    let matched = db
        .bounded(categories::rename_category(&mut conn, id, &payload.name))
        .await?;
    if matched == 0 {
        return Err(AppError::not_found("Categoría no encontrada"));
    }

    Ok(Json(Category {
        id,
        name: payload.name,
    }))
}

async fn delete_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;
    let db = state.db();
    let mut conn = db.acquire().await?;
    if !db.bounded(categories::category_exists(&mut conn, id)).await? {
        return Err(AppError::not_found("Categoria no encontrada"));
    }

    let detached = db.bounded(categories::detach_words(&mut conn, id)).await?;
    db.bounded(categories::delete_category(&mut conn, id)).await?;

    tracing::info!(category_id = id, detached, "category deleted");
    Ok(Json(MessageResponse {
        message: "Categoria eliminada exitosamente",
    }))
}
