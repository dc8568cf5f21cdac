//! Platform API client.
//!
//! Provides the HTTP verbs the list views and row actions need, behind the
//! [`Transport`] trait so views can run against any implementation.

use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde_json::Value;

/// HTTP verbs used by the portal, with JSON in and JSON out.
///
/// `endpoint` is a path relative to the API base URL (e.g. `/linkers/7/users`).
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `endpoint` with query parameters. Repeated keys are allowed.
    async fn get(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value, AppError>;

    /// PATCH `endpoint` with a JSON body.
    async fn patch(&self, endpoint: &str, body: &Value) -> Result<Value, AppError>;

    /// PUT `endpoint` with a JSON body.
    async fn put(&self, endpoint: &str, body: &Value) -> Result<Value, AppError>;
}

/// Portal API client configuration.
#[derive(Debug, Clone)]
pub struct PortalClientConfig {
    /// Base URL of the platform API (e.g., `https://api.example.mx/v1`).
    pub base_url: String,

    /// Bearer token of the current session.
    pub token: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for PortalClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            timeout_secs: 30,
        }
    }
}

/// `reqwest`-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: Client,
    config: PortalClientConfig,
}

impl PortalClient {
    /// Create a new portal client.
    pub fn new(config: PortalClientConfig) -> Result<Self, AppError> {
        if config.base_url.trim().is_empty() {
            return Err(AppError::configuration("API base URL is not set"));
        }

        let mut headers = header::HeaderMap::new();

        let token_value = header::HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| AppError::invalid_input_field("Invalid token format", "token"))?;
        headers.insert(header::AUTHORIZATION, token_value);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Full URL for an endpoint path.
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Turn a response into JSON, mapping non-success statuses to errors.
    async fn handle_response(&self, response: Response, endpoint: &str) -> Result<Value, AppError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&body).map_err(|e| {
                AppError::shape_mismatch(format!("Response is not JSON: {}", e), endpoint)
            })
        } else if status == StatusCode::UNAUTHORIZED {
            Err(AppError::authentication_expired(
                "Session expired or revoked. Please log in again.",
            ))
        } else {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();
            let body_message = serde_json::from_str::<Value>(&body).ok().and_then(|v| {
                v.get("message").or_else(|| v.get("error")).map(|m| match m.as_str() {
                    Some(s) => s.to_string(),
                    None => m.to_string(),
                })
            });

            let message = match (status, &body_message) {
                (StatusCode::FORBIDDEN, _) => "Access denied".to_string(),
                (StatusCode::NOT_FOUND, _) => "Resource not found".to_string(),
                (StatusCode::TOO_MANY_REQUESTS, _) => "Rate limit exceeded".to_string(),
                (_, Some(msg)) => msg.clone(),
                _ => format!("Request failed ({}): {}", status_code, body),
            };

            Err(AppError::api_full(message, status_code, endpoint))
        }
    }
}

#[async_trait]
impl Transport for PortalClient {
    async fn get(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value, AppError> {
        let url = self.api_url(endpoint);
        log::debug!("GET {} ({} params)", url, params.len());

        let response = self.client.get(&url).query(params).send().await?;
        self.handle_response(response, endpoint).await
    }

    async fn patch(&self, endpoint: &str, body: &Value) -> Result<Value, AppError> {
        let url = self.api_url(endpoint);
        log::debug!("PATCH {}", url);

        let response = self.client.patch(&url).json(body).send().await?;
        self.handle_response(response, endpoint).await
    }

    async fn put(&self, endpoint: &str, body: &Value) -> Result<Value, AppError> {
        let url = self.api_url(endpoint);
        log::debug!("PUT {}", url);

        let response = self.client.put(&url).json(body).send().await?;
        self.handle_response(response, endpoint).await
    }
}

/// Join a row id onto an endpoint base, percent-encoding the id.
pub fn row_endpoint(base: &str, row_id: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(row_id)
    )
}
