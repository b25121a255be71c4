use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_models::error::AppError;

/// JSON client for one owning service. Every request carries the bounded
/// timeout the client was built with.
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self.client.request(method, &url).headers(self.get_headers());

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = extract_error_message(&error_text);
            error!("Service error ({}): {}", status, message);

            return Err(match status.as_u16() {
                404 => AppError::NotFound(message),
                // The owning services answer 400/409 when a mutation hits a
                // terminal-state record; the message comes through verbatim.
                400 | 409 | 422 => AppError::DomainRejection(message),
                _ => AppError::Upstream(format!("Service error ({}): {}", status, message)),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Upstream(format!("Malformed response body: {}", e)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// The owning services wrap failures as `{"error": "..."}`. Unwrap that
/// envelope; fall back to the raw body text.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
