//! Shared JSON client with status-code classification.

use reqwest::{Method, StatusCode};
use serde_json::Value;
use shared_types::{ReadError, WriteError};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("gap-core/", env!("CARGO_PKG_VERSION"));

/// JSON over HTTP against one base URL.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// `GET path` decoded as JSON.
    pub async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ReadError> {
        debug!("[gap-runtime] GET {}", path);
        let response = self
            .request(Method::GET, path)
            .query(query)
            .send()
            .await
            .map_err(|e| ReadError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(read_status_error(status, path, body));
        }

        response
            .json()
            .await
            .map_err(|e| ReadError::Decode(e.to_string()))
    }

    /// Send `body` with `method`; the response body is ignored.
    pub async fn send_json(&self, method: Method, path: &str, body: &Value) -> Result<(), WriteError> {
        debug!("[gap-runtime] {} {}", method, path);
        let response = self
            .request(method, path)
            .json(body)
            .send()
            .await
            .map_err(|e| WriteError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(write_status_error(status, body))
    }
}

/// Pull a human message out of an error body, falling back to the raw text.
fn error_message(body: String) -> String {
    serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(body)
}

pub(crate) fn read_status_error(status: StatusCode, path: &str, body: String) -> ReadError {
    if status == StatusCode::NOT_FOUND {
        return ReadError::NotFound(path.to_string());
    }
    ReadError::Api {
        status: status.as_u16(),
        message: error_message(body),
    }
}

pub(crate) fn write_status_error(status: StatusCode, body: String) -> WriteError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => WriteError::Unauthorized(message),
        _ => WriteError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
