//! Rental-contract HTTP handlers.

use crate::contract::types::{ContractStatus, CreateContractInput, UpdateContractInput};
use crate::error::{AppError, FieldError};
use crate::response;
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

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateContractInput>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.contracts.create(body).await?;
    Ok(response::created(record))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.contracts.get_by_id(parse_id(&id)?).await?;
    Ok(response::success_one(record))
}

#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// An unknown status filter is treated as absent rather than an error,
/// matching the permissive filter policy elsewhere.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = query.status.as_deref().and_then(ContractStatus::parse);
    let records = state.contracts.list(status).await?;
    Ok(response::success_many(records))
}

pub async fn update_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateContractInput>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.contracts.update_by_id(parse_id(&id)?, body).await?;
    Ok(response::success_one(record))
}

pub async fn delete_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.contracts.soft_delete_by_id(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
