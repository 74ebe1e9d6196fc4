//! Route definitions for the admin API.
//!
//! - `GET /health`
//! - `GET|PUT /admin/resourceServer`
//! - `GET|POST|DELETE /admin/resourceServer/{id}`

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use uuid::Uuid;
use warden_core::error::WardenError;
use warden_core::models::resource_server::{ResourceServer, ResourceServerDraft};

use crate::error::ApiError;
use crate::state::{AppState, CallerOwner};

pub const RESOURCE_SERVER_PATH: &str = "/admin/resourceServer";

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(RESOURCE_SERVER_PATH, get(list).put(create))
        .route(
            &format!("{RESOURCE_SERVER_PATH}/{{id}}"),
            get(fetch).post(update).delete(remove),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// A malformed id cannot name an existing server.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError(WardenError::not_found("resource_server", raw)))
}

async fn list(
    State(state): State<AppState>,
    CallerOwner(owner): CallerOwner,
) -> Result<Json<Vec<ResourceServer>>, ApiError> {
    Ok(Json(state.manager.list_by_owner(&owner).await?))
}

async fn fetch(
    State(state): State<AppState>,
    CallerOwner(owner): CallerOwner,
    Path(id): Path<String>,
) -> Result<Json<ResourceServer>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.manager.get_by_id_and_owner(id, &owner).await?))
}

async fn create(
    State(state): State<AppState>,
    CallerOwner(owner): CallerOwner,
    payload: Result<Json<ResourceServerDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = payload?;
    let server = state.manager.create(&owner, draft).await?;
    let location = format!("{RESOURCE_SERVER_PATH}/{}", server.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(server)))
}

async fn update(
    State(state): State<AppState>,
    CallerOwner(owner): CallerOwner,
    Path(id): Path<String>,
    payload: Result<Json<ResourceServerDraft>, JsonRejection>,
) -> Result<Json<ResourceServer>, ApiError> {
    let id = parse_id(&id)?;
    let Json(draft) = payload?;
    Ok(Json(state.manager.update(&owner, id, draft).await?))
}

async fn remove(
    State(state): State<AppState>,
    CallerOwner(owner): CallerOwner,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.manager.delete(id, &owner).await?;
    Ok(StatusCode::NO_CONTENT)
}
