//! Endpoint handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use promptsmith_core::history::LoggedRequest;
use promptsmith_core::types::{
    GenerateRequest, GenerateResponse, KeyCheckRequest, KeyCheckResponse, ProviderInfo,
};
use promptsmith_providers::{registry, GenerateError};

use crate::error::ApiError;
use crate::state::AppState;

/// Default and maximum page size for `GET /api/history`.
pub const HISTORY_DEFAULT_LIMIT: usize = 20;
pub const HISTORY_MAX_LIMIT: usize = 100;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub docs: &'static str,
    pub health: &'static str,
}

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Promptsmith API",
        docs: "/docs",
        health: "/api/health",
    })
}

/// One line of the `/docs` endpoint index.
#[derive(Debug, Serialize)]
pub struct EndpointDoc {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

const fn endpoint(
    method: &'static str,
    path: &'static str,
    description: &'static str,
) -> EndpointDoc {
    EndpointDoc {
        method,
        path,
        description,
    }
}

const ENDPOINTS: &[EndpointDoc] = &[
    endpoint("GET", "/api/health", "Liveness check"),
    endpoint("GET", "/api/providers", "Providers and their selectable models"),
    endpoint("POST", "/api/test-api", "Check an API key against a provider"),
    endpoint("POST", "/api/generate", "Generate up to five prompts for a role in a business"),
    endpoint("GET", "/api/history", "Most recent logged generations (?limit=N)"),
    endpoint("GET", "/api/history/{id}", "One logged generation"),
    endpoint("DELETE", "/api/history/{id}", "Delete a logged generation and its prompts"),
];

pub async fn docs() -> Json<&'static [EndpointDoc]> {
    Json(ENDPOINTS)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn list_providers() -> Json<Vec<ProviderInfo>> {
    Json(registry::list_all().iter().map(|d| d.to_info()).collect())
}

pub async fn test_api(
    State(state): State<AppState>,
    payload: Result<Json<KeyCheckRequest>, JsonRejection>,
) -> Result<Json<KeyCheckResponse>, ApiError> {
    let Json(req) = payload?;
    if req.api_key.is_empty() {
        return Err(GenerateError::MissingCredential.into());
    }
    debug!(provider = %req.provider, "checking API key");
    let check = state.validator.check(&req.provider, &req.api_key).await;
    Ok(Json(check.into()))
}

pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(req) = payload?;
    req.validate().map_err(ApiError::bad_request)?;

    let generation = state
        .dispatcher
        .generate(
            &req.provider,
            &req.api_key,
            &req.model,
            &req.business,
            &req.role,
            &req.system_prompt,
        )
        .await?;

    let history = state.history.clone();
    let (business, role, prompts) = (
        req.business.clone(),
        req.role.clone(),
        generation.prompts.clone(),
    );
    let logged = tokio::task::spawn_blocking(move || history.record(&business, &role, &prompts))
        .await
        .map_err(ApiError::generation)?
        .map_err(ApiError::generation)?;
    info!(request_id = %logged.id, provider = %req.provider, "generation logged");

    Ok(Json(GenerateResponse {
        prompts: generation.prompts,
        role: req.role,
        business: req.business,
        provider: generation.provider.display_name.to_string(),
        model: generation.model,
    }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub async fn list_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<LoggedRequest>>, ApiError> {
    let Query(query) = query?;
    let limit = query
        .limit
        .unwrap_or(HISTORY_DEFAULT_LIMIT)
        .clamp(1, HISTORY_MAX_LIMIT);

    let history = state.history.clone();
    let rows = tokio::task::spawn_blocking(move || history.list_recent(limit))
        .await
        .map_err(internal)??;
    Ok(Json(rows))
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LoggedRequest>, ApiError> {
    let id = parse_id(&id)?;
    let history = state.history.clone();
    tokio::task::spawn_blocking(move || history.get(id))
        .await
        .map_err(internal)??
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn delete_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let history = state.history.clone();
    let removed = tokio::task::spawn_blocking(move || history.delete(id))
        .await
        .map_err(internal)??;
    if removed {
        info!(request_id = %id, "logged request deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}

// Malformed ids can never match a row.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| not_found())
}

fn not_found() -> ApiError {
    ApiError::not_found("Запись не найдена")
}

fn internal(err: tokio::task::JoinError) -> ApiError {
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
