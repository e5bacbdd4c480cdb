use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorCode {
    InvalidInput,
    InvalidResponse,
    AuthFailed,
    Timeout,
    RateLimited,
    BackendUnavailable,
    CredentialMissing,
    CredentialRevoked,
    Unknown,
}

impl ServiceErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidResponse => "invalid_response",
            Self::AuthFailed => "auth_failed",
            Self::Timeout => "timeout",
            Self::RateLimited => "rate_limited",
            Self::BackendUnavailable => "backend_unavailable",
            Self::CredentialMissing => "credential_missing",
            Self::CredentialRevoked => "credential_revoked",
            Self::Unknown => "unknown",
        }
    }

    /// Whether a later turn could plausibly succeed without operator action.
    /// Nothing retries inside a turn; this only feeds logging.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::RateLimited | Self::BackendUnavailable
        )
    }
}

/// Failure of an external collaborator (credential store or phonetic converter).
/// A turn that hits one of these leaves the session untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceError {
    pub code: ServiceErrorCode,
    pub service: String,
    pub message: String,
}

impl ServiceError {
    pub fn new(code: ServiceErrorCode, service: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            service: service.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_input(service: &str, message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::InvalidInput, service, message)
    }

    pub fn invalid_response(service: &str, message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::InvalidResponse, service, message)
    }

    pub fn backend_unavailable(service: &str, message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::BackendUnavailable, service, message)
    }

    pub fn timeout(service: &str, message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::Timeout, service, message)
    }

    pub fn credential_missing(service: &str, name: &str) -> Self {
        Self::new(
            ServiceErrorCode::CredentialMissing,
            service,
            format!("credential '{name}' is not configured"),
        )
    }

    pub fn credential_revoked(service: &str, name: &str) -> Self {
        Self::new(
            ServiceErrorCode::CredentialRevoked,
            service,
            format!("credential '{name}' is revoked"),
        )
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "service error: service={} code={} message={}",
            self.service,
            self.code.as_str(),
            self.message
        )
    }
}

impl std::error::Error for ServiceError {}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) fn map_http_status_error(
    service: &str,
    operation: &str,
    status: StatusCode,
    body: &str,
) -> ServiceError {
    let message = format!(
        "operation={operation} status={} body={}",
        status.as_u16(),
        truncate_error_body(body)
    );
    let code = if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ServiceErrorCode::AuthFailed
    } else if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
        ServiceErrorCode::Timeout
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        ServiceErrorCode::RateLimited
    } else if status.is_server_error() {
        ServiceErrorCode::BackendUnavailable
    } else if status.is_client_error() {
        ServiceErrorCode::InvalidInput
    } else {
        ServiceErrorCode::Unknown
    };
    ServiceError::new(code, service, message)
}

pub(crate) fn truncate_error_body(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let truncated = trimmed
        .chars()
        .take(MAX_ERROR_BODY_CHARS)
        .collect::<String>();
    format!("{truncated}...")
}
