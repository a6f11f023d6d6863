//! Menu HTTP handlers: request/response mapping only.

use crate::error::{AppError, FieldError};
use crate::menu::types::{CreateMenuInput, MenuFilters, UpdateMenuInput};
use crate::response;
use crate::sql::SortDir;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| {
        AppError::Validation(vec![FieldError::new("id", "id must be a valid UUID")])
    })
}

#[derive(Deserialize, Default)]
pub struct SearchQuery {
    pub category: Option<String>,
    pub name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub max_cal: Option<i64>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort_by: Option<String>,
    pub sort: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateMenuInput>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.menus.create(body).await?;
    Ok(response::created(record))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.menus.get_by_id(parse_id(&id)?).await?;
    Ok(response::success_one(record))
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let records = state.menus.list().await?;
    Ok(response::success_many(records))
}

pub async fn update_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateMenuInput>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.menus.update_by_id(parse_id(&id)?, body).await?;
    Ok(response::success_one(record))
}

pub async fn delete_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.menus.soft_delete_by_id(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Filtered search. An unknown sort direction or column falls back to
/// database-default order instead of failing.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filters = MenuFilters {
        category: query.category,
        name: query.name,
        min_price: query.min_price,
        max_price: query.max_price,
        max_calories: query.max_cal,
    };
    let sort_dir = query.sort.as_deref().and_then(SortDir::parse);
    let (data, pagination) = state
        .menus
        .search(filters, query.page, query.per_page, query.sort_by, sort_dir)
        .await?;
    Ok(response::success_page(data, pagination))
}

pub async fn count_by_category(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let counts = state.menus.count_by_category().await?;
    Ok(response::success_one(counts))
}

#[derive(Deserialize)]
pub struct GroupQuery {
    pub per_category: Option<i64>,
}

pub async fn group_by_category(
    State(state): State<AppState>,
    Query(query): Query<GroupQuery>,
) -> Result<impl IntoResponse, AppError> {
    let groups = state
        .menus
        .group_by_category(query.per_category.unwrap_or(3))
        .await?;
    Ok(response::success_one(groups))
}
