use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::StoreError;

const UNIQUE_VIOLATION_CODE: &str = "23505";

/// Thin PostgREST client authenticated with the service key.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();

        let key = HeaderValue::from_str(&self.service_key)
            .map_err(|_| StoreError::Configuration("service key is not a valid header value".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_key))
            .map_err(|_| StoreError::Configuration("service key is not a valid header value".to_string()))?;

        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<reqwest::Response, StoreError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            if let Some(column) = unique_violation(&error_text) {
                return Err(StoreError::UniqueViolation(column));
            }

            return Err(StoreError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        Ok(response)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: Option<HeaderMap>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, body, headers).await?;
        Ok(response.json::<T>().await?)
    }

    /// GET with `Prefer: count=exact`; returns the rows and the total parsed
    /// from the `Content-Range` header (`0-9/42`, or `*/0` when empty).
    pub async fn request_with_count<T>(&self, path: &str) -> Result<(T, Option<u64>), StoreError>
    where
        T: DeserializeOwned,
    {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("count=exact"));

        let response = self.send(Method::GET, path, None, Some(headers)).await?;
        let total = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range_total);

        let rows = response.json::<T>().await?;
        Ok((rows, total))
    }
}

fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit('/').next().and_then(|total| total.parse().ok())
}

/// Returns the offending column when the PostgREST error body carries
/// Postgres code `23505`. Other 409s (foreign keys, exclusions) are not
/// uniqueness failures.
fn unique_violation(error_text: &str) -> Option<String> {
    let body = serde_json::from_str::<Value>(error_text).ok()?;
    if body.get("code").and_then(Value::as_str) != Some(UNIQUE_VIOLATION_CODE) {
        return None;
    }

    let details = body.get("details").and_then(Value::as_str).unwrap_or_default();
    let column = details
        .split_once("Key (")
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(column, _)| column.to_string())
        .unwrap_or_else(|| "record".to_string());
    Some(column)
}
