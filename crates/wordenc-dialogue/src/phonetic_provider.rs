use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::service_error::{map_http_status_error, ServiceError, ServiceResult};

const DEFAULT_PHONETIC_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_PHONETIC_API_BASE: &str = "https://labs.goo.ne.jp";
pub const DEFAULT_PHONETIC_PATH: &str = "/api/hiragana";

/// Converts free recognizer text into the kana alphabet. Called at most once per
/// turn and never retried.
#[async_trait]
pub trait PhoneticConverter: Send + Sync {
    fn provider_name(&self) -> &str;

    async fn convert(&self, raw_text: &str, credential: &str) -> ServiceResult<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpPhoneticProviderConfig {
    pub provider_name: String,
    pub api_base: String,
    pub path: String,
    pub output_type: String,
    pub timeout_ms: u64,
}

impl Default for HttpPhoneticProviderConfig {
    fn default() -> Self {
        Self {
            provider_name: "http-phonetic".to_string(),
            api_base: DEFAULT_PHONETIC_API_BASE.to_string(),
            path: DEFAULT_PHONETIC_PATH.to_string(),
            output_type: "hiragana".to_string(),
            timeout_ms: DEFAULT_PHONETIC_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpPhoneticProvider {
    config: HttpPhoneticProviderConfig,
    client: Client,
}

impl HttpPhoneticProvider {
    pub fn new(config: HttpPhoneticProviderConfig) -> ServiceResult<Self> {
        if config.provider_name.trim().is_empty() {
            return Err(ServiceError::invalid_input(
                "http-phonetic",
                "provider_name must not be empty",
            ));
        }
        let provider = config.provider_name.trim().to_string();
        if config.api_base.trim().is_empty() {
            return Err(ServiceError::invalid_input(
                &provider,
                "api_base must not be empty",
            ));
        }
        if config.path.trim().is_empty() || config.output_type.trim().is_empty() {
            return Err(ServiceError::invalid_input(
                &provider,
                "path and output_type must not be empty",
            ));
        }

        let client = Client::builder().build().map_err(|error| {
            ServiceError::backend_unavailable(
                &provider,
                format!("failed to initialize http client: {error}"),
            )
        })?;

        let mut normalized = config;
        normalized.provider_name = provider;
        normalized.api_base = normalized.api_base.trim().trim_end_matches('/').to_string();
        normalized.path = normalized.path.trim().to_string();
        normalized.timeout_ms = normalized.timeout_ms.max(1);
        Ok(Self {
            config: normalized,
            client,
        })
    }

    pub fn config(&self) -> &HttpPhoneticProviderConfig {
        &self.config
    }

    fn endpoint_url(&self) -> String {
        if self.config.path.starts_with('/') {
            format!("{}{}", self.config.api_base, self.config.path)
        } else {
            format!("{}/{}", self.config.api_base, self.config.path)
        }
    }

    fn map_request_error(&self, error: reqwest::Error) -> ServiceError {
        if error.is_timeout() {
            return ServiceError::timeout(
                &self.config.provider_name,
                "operation=convert request timed out",
            );
        }
        ServiceError::backend_unavailable(
            &self.config.provider_name,
            format!("operation=convert request failed: {error}"),
        )
    }
}

#[async_trait]
impl PhoneticConverter for HttpPhoneticProvider {
    fn provider_name(&self) -> &str {
        &self.config.provider_name
    }

    async fn convert(&self, raw_text: &str, credential: &str) -> ServiceResult<String> {
        let provider = self.config.provider_name.as_str();
        let sentence = raw_text.trim();
        if sentence.is_empty() {
            return Err(ServiceError::invalid_input(provider, "sentence must not be empty"));
        }
        if credential.trim().is_empty() {
            return Err(ServiceError::invalid_input(provider, "credential must not be empty"));
        }

        let payload = json!({
            "app_id": credential.trim(),
            "sentence": sentence,
            "output_type": self.config.output_type,
        });
        let response = self
            .client
            .post(self.endpoint_url())
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .json(&payload)
            .send()
            .await
            .map_err(|error| self.map_request_error(error))?;

        let status = response.status();
        let body = response.text().await.map_err(|error| {
            if error.is_timeout() {
                return self.map_request_error(error);
            }
            ServiceError::backend_unavailable(
                provider,
                format!("operation=convert response body read failed: {error}"),
            )
        })?;
        if !status.is_success() {
            return Err(map_http_status_error(provider, "convert", status, &body));
        }
        let parsed = serde_json::from_str::<Value>(&body).map_err(|error| {
            ServiceError::invalid_response(
                provider,
                format!("operation=convert invalid json response: {error}"),
            )
        })?;
        let converted = parsed
            .get("converted")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();
        if converted.is_empty() {
            return Err(ServiceError::invalid_response(
                provider,
                "operation=convert missing converted field",
            ));
        }
        Ok(converted)
    }
}

/// Offline converter: the input is assumed to already be kana.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughPhoneticProvider;

impl PassthroughPhoneticProvider {
    const PROVIDER_NAME: &'static str = "passthrough";
}

#[async_trait]
impl PhoneticConverter for PassthroughPhoneticProvider {
    fn provider_name(&self) -> &str {
        Self::PROVIDER_NAME
    }

    async fn convert(&self, raw_text: &str, _credential: &str) -> ServiceResult<String> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::invalid_input(
                Self::PROVIDER_NAME,
                "sentence must not be empty",
            ));
        }
        Ok(trimmed.to_string())
    }
}
