//! Router assembly: resource routes plus health/readiness/version.

use crate::state::AppState;
use crate::store;
use crate::{contract, menu};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

const BODY_LIMIT_BYTES: usize = 256 * 1024;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    database: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadyBody>, (axum::http::StatusCode, Json<ReadyBody>)> {
    if !store::check_health(&state.pool).await {
        return Err((
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                database: "unavailable",
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "ok",
        database: "ok",
    }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::handlers::search).post(menu::handlers::create))
        .route("/all", get(menu::handlers::list))
        .route("/count-by-category", get(menu::handlers::count_by_category))
        .route("/by-category", get(menu::handlers::group_by_category))
        .route(
            "/:id",
            get(menu::handlers::get_by_id)
                .put(menu::handlers::update_by_id)
                .delete(menu::handlers::delete_by_id),
        )
}

fn contract_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(contract::handlers::list).post(contract::handlers::create),
        )
        .route(
            "/:id",
            get(contract::handlers::get_by_id)
                .put(contract::handlers::update_by_id)
                .delete(contract::handlers::delete_by_id),
        )
}

/// The full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api/menu", menu_routes())
        .nest("/api/contract", contract_routes())
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
