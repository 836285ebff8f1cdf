//! HTTP routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use std::sync::Arc;

use realtor_domain::{PageRequest, Property};
use realtor_shared::{ErrorResponse, HealthResponse, ListPropertiesQuery, PropertyPageResponse};

use super::error::ApiError;
use super::extract::{ApiJson, IdPath};
use crate::app::App;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/properties",
            get(list_properties).post(create_property),
        )
        .route(
            "/api/properties/{id}",
            get(get_property)
                .put(update_property)
                .delete(delete_property),
        )
        .fallback(not_found)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found()))
}

async fn list_properties(
    State(app): State<Arc<App>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<PropertyPageResponse>, ApiError> {
    let query = ListPropertiesQuery::from_pairs(pairs);
    let request = PageRequest::parse(query.page.as_deref(), query.per_page.as_deref());
    let page = app.use_cases.management.property.list(request).await?;
    Ok(Json(page.into()))
}

async fn get_property(
    State(app): State<Arc<App>>,
    IdPath(id): IdPath,
) -> Result<Json<Property>, ApiError> {
    let property = app.use_cases.management.property.get(id).await?;
    Ok(Json(property))
}

async fn create_property(
    State(app): State<Arc<App>>,
    ApiJson(payload): ApiJson<Map<String, Value>>,
) -> Result<(StatusCode, Json<Property>), ApiError> {
    let property = app.use_cases.management.property.create(payload).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

async fn update_property(
    State(app): State<Arc<App>>,
    IdPath(id): IdPath,
    ApiJson(payload): ApiJson<Map<String, Value>>,
) -> Result<Json<Property>, ApiError> {
    let property = app
        .use_cases
        .management
        .property
        .update(id, payload)
        .await?;
    Ok(Json(property))
}

async fn delete_property(
    State(app): State<Arc<App>>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    app.use_cases.management.property.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
