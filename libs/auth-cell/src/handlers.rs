use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use tracing::debug;

use shared_models::error::AppError;
use shared_utils::extractor::ApiJson;

use crate::models::{AuthResponse, AuthState, SigninRequest, SignupRequest, VerifyQuery};
use crate::services::AccountService;

const VERIFIED_PAGE: &str = include_str!("../templates/verification.html");

pub async fn signup(
    State(state): State<AuthState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    debug!("Signup request for {}", request.username);

    let (doctor, token) = AccountService::new(&state).signup(request).await?;

    Ok(Json(AuthResponse::ok(
        "Doctor account registered successfully",
        token,
        doctor.id,
    )))
}

pub async fn signin(
    State(state): State<AuthState>,
    ApiJson(request): ApiJson<SigninRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (doctor, token) = AccountService::new(&state).signin(request).await?;

    Ok(Json(AuthResponse::ok("Doctor login successful", token, doctor.id)))
}

pub async fn verify(
    State(state): State<AuthState>,
    Query(query): Query<VerifyQuery>,
) -> Result<Html<&'static str>, AppError> {
    AccountService::new(&state).verify(query.token.as_deref()).await?;

    Ok(Html(VERIFIED_PAGE))
}
