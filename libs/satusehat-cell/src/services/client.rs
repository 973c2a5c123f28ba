use anyhow::Context;
use axum::http::StatusCode;
use reqwest::{header::AUTHORIZATION, Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::AuthTokenRequest;

/// Upstream reply passed back to the caller untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Value,
}

/// Pass-through client for the SatuSehat token and medicine endpoints.
#[derive(Clone)]
pub struct SatuSehatClient {
    client: Client,
    auth_url: String,
    medicine_url: String,
}

impl SatuSehatClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            auth_url: config.satusehat_auth_url.clone(),
            medicine_url: config.satusehat_medicine_url.clone(),
        }
    }

    async fn forward(request: RequestBuilder) -> anyhow::Result<(StatusCode, reqwest::Response)> {
        let response = request.send().await.context("upstream request failed")?;
        let status = StatusCode::from_u16(response.status().as_u16())
            .context("upstream returned an invalid status")?;
        Ok((status, response))
    }

    async fn relay(
        request: RequestBuilder,
        send_failure: &str,
        parse_failure: &str,
    ) -> Result<UpstreamReply, AppError> {
        let (status, response) = Self::forward(request).await.map_err(|e| {
            error!("{}: {:#}", send_failure, e);
            AppError::ExternalService(send_failure.to_string())
        })?;

        if !status.is_success() {
            warn!("SatuSehat answered {}", status);
        }

        let body = response.json::<Value>().await.map_err(|e| {
            error!("{}: {}", parse_failure, e);
            AppError::ExternalService(parse_failure.to_string())
        })?;

        Ok(UpstreamReply { status, body })
    }

    /// Exchanges client credentials for an access token. The grant type is
    /// sent both as a form field and as a query parameter.
    pub async fn request_token(&self, request: &AuthTokenRequest) -> Result<UpstreamReply, AppError> {
        if self.auth_url.is_empty() {
            return Err(AppError::Internal("AUTH_URL is not set in the environment".to_string()));
        }

        let grant_type = request.grant_type();
        debug!("Requesting SatuSehat token for client {}", request.client_id);

        let builder = self
            .client
            .post(&self.auth_url)
            .query(&[("grant_type", grant_type)])
            .form(&[
                ("client_id", request.client_id.as_str()),
                ("client_secret", request.client_secret.as_str()),
                ("grant_type", grant_type),
            ]);

        Self::relay(
            builder,
            "Failed to get access token",
            "Failed to parse access token response",
        )
        .await
    }

    /// Fetches one page of the medicine catalogue with the caller's own
    /// Authorization header.
    pub async fn list_medicines(
        &self,
        authorization: &str,
        page: u32,
        limit: u32,
    ) -> Result<UpstreamReply, AppError> {
        if self.medicine_url.is_empty() {
            return Err(AppError::Internal(
                "MEDICINE_URL is not set in the environment".to_string(),
            ));
        }

        let builder = self
            .client
            .get(&self.medicine_url)
            .header(AUTHORIZATION, authorization)
            .query(&[("page", page), ("limit", limit)]);

        Self::relay(
            builder,
            "Failed to get medicine list",
            "Failed to parse medicine list response",
        )
        .await
    }
}
