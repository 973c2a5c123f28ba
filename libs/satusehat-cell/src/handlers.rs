use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use serde_json::Value;

use shared_models::error::AppError;
use shared_utils::extractor::ApiJson;

use crate::models::{AuthTokenRequest, MedicineQuery};
use crate::services::SatuSehatClient;

pub async fn request_token(
    State(client): State<SatuSehatClient>,
    ApiJson(request): ApiJson<AuthTokenRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let reply = client.request_token(&request).await?;
    Ok((reply.status, Json(reply.body)))
}

pub async fn list_medicines(
    State(client): State<SatuSehatClient>,
    headers: HeaderMap,
    Query(query): Query<MedicineQuery>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Token is required".to_string()))?;

    let reply = client
        .list_medicines(authorization, query.page(), query.limit())
        .await?;
    Ok((reply.status, Json(reply.body)))
}
