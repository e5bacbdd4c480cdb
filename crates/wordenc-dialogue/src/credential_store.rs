//! Secret lookup for the phonetic conversion API key.
//!
//! Stores distinguish a credential that was never configured from one that was
//! revoked so operators get an actionable failure instead of a generic one.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::service_error::{ServiceError, ServiceResult};

const CREDENTIAL_SERVICE: &str = "credentials";
const ENV_PREFIX: &str = "WORDENC_";

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, name: &str) -> ServiceResult<String>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialRecord {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub revoked: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialStoreSnapshot {
    #[serde(default)]
    pub credentials: BTreeMap<String, CredentialRecord>,
}

impl CredentialStoreSnapshot {
    pub fn resolve(&self, name: &str) -> ServiceResult<String> {
        let Some(record) = self.credentials.get(name) else {
            return Err(ServiceError::credential_missing(CREDENTIAL_SERVICE, name));
        };
        if record.revoked {
            return Err(ServiceError::credential_revoked(CREDENTIAL_SERVICE, name));
        }
        non_empty_secret(record.secret.as_deref())
            .ok_or_else(|| ServiceError::credential_missing(CREDENTIAL_SERVICE, name))
    }
}

fn non_empty_secret(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Re-reads the JSON snapshot on every lookup so rotated secrets apply to the
/// next turn.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, name: &str) -> ServiceResult<String> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|error| {
            ServiceError::backend_unavailable(
                CREDENTIAL_SERVICE,
                format!(
                    "credential store {} is unreadable: {error}",
                    self.path.display()
                ),
            )
        })?;
        let snapshot = serde_json::from_str::<CredentialStoreSnapshot>(&raw).map_err(|error| {
            ServiceError::invalid_response(
                CREDENTIAL_SERVICE,
                format!(
                    "credential store {} is not valid json: {error}",
                    self.path.display()
                ),
            )
        })?;
        snapshot.resolve(name)
    }
}

/// Reads `NAME_WITH_UNDERSCORES`, then `WORDENC_NAME_WITH_UNDERSCORES`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentialStore;

impl EnvCredentialStore {
    pub fn variable_names(name: &str) -> [String; 2] {
        let base = name.trim().to_ascii_uppercase().replace(['-', '.'], "_");
        let prefixed = if base.starts_with(ENV_PREFIX) {
            base.clone()
        } else {
            format!("{ENV_PREFIX}{base}")
        };
        [base, prefixed]
    }
}

#[async_trait]
impl CredentialStore for EnvCredentialStore {
    async fn get(&self, name: &str) -> ServiceResult<String> {
        Self::variable_names(name)
            .iter()
            .find_map(|variable| non_empty_secret(std::env::var(variable).ok().as_deref()))
            .ok_or_else(|| ServiceError::credential_missing(CREDENTIAL_SERVICE, name))
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    snapshot: CredentialStoreSnapshot,
}

impl StaticCredentialStore {
    pub fn new(snapshot: CredentialStoreSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn with_secret(name: &str, secret: &str) -> Self {
        let mut snapshot = CredentialStoreSnapshot::default();
        snapshot.credentials.insert(
            name.to_string(),
            CredentialRecord {
                secret: Some(secret.to_string()),
                revoked: false,
            },
        );
        Self { snapshot }
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn get(&self, name: &str) -> ServiceResult<String> {
        self.snapshot.resolve(name)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{
        CredentialRecord, CredentialStore, CredentialStoreSnapshot, EnvCredentialStore,
        FileCredentialStore, StaticCredentialStore,
    };
    use crate::service_error::ServiceErrorCode;

    #[tokio::test]
    async fn functional_static_store_returns_trimmed_secret() {
        let store = StaticCredentialStore::with_secret("API", "  secret-1 ");
        assert_eq!(store.get("API").await.expect("secret"), "secret-1");
        let error = store.get("OTHER").await.expect_err("missing");
        assert_eq!(error.code, ServiceErrorCode::CredentialMissing);
    }

    #[test]
    fn unit_snapshot_distinguishes_revoked_from_missing() {
        let mut snapshot = CredentialStoreSnapshot::default();
        snapshot.credentials.insert(
            "revoked".to_string(),
            CredentialRecord {
                secret: Some("old".to_string()),
                revoked: true,
            },
        );
        snapshot.credentials.insert(
            "blank".to_string(),
            CredentialRecord {
                secret: Some("   ".to_string()),
                revoked: false,
            },
        );
        assert_eq!(
            snapshot.resolve("revoked").expect_err("revoked").code,
            ServiceErrorCode::CredentialRevoked
        );
        assert_eq!(
            snapshot.resolve("blank").expect_err("blank").code,
            ServiceErrorCode::CredentialMissing
        );
    }

    #[tokio::test]
    async fn functional_file_store_reads_snapshot() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("credentials.json");
        std::fs::write(
            &path,
            r#"{"credentials":{"WORDENC-PHONETIC-API-KEY":{"secret":"abc"}}}"#,
        )
        .expect("write");
        let store = FileCredentialStore::new(&path);
        assert_eq!(
            store.get("WORDENC-PHONETIC-API-KEY").await.expect("secret"),
            "abc"
        );
    }

    #[tokio::test]
    async fn regression_file_store_unreadable_is_backend_unavailable() {
        let temp = tempdir().expect("tempdir");
        let store = FileCredentialStore::new(temp.path().join("absent.json"));
        let error = store.get("ANY").await.expect_err("unreadable");
        assert_eq!(error.code, ServiceErrorCode::BackendUnavailable);

        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{").expect("write");
        let error = FileCredentialStore::new(&path)
            .get("ANY")
            .await
            .expect_err("invalid");
        assert_eq!(error.code, ServiceErrorCode::InvalidResponse);
    }

    #[test]
    fn unit_env_variable_names_normalize_and_prefix() {
        assert_eq!(
            EnvCredentialStore::variable_names("phonetic-api-key"),
            [
                "PHONETIC_API_KEY".to_string(),
                "WORDENC_PHONETIC_API_KEY".to_string()
            ]
        );
        assert_eq!(
            EnvCredentialStore::variable_names("WORDENC-PHONETIC-API-KEY"),
            [
                "WORDENC_PHONETIC_API_KEY".to_string(),
                "WORDENC_PHONETIC_API_KEY".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn functional_env_store_falls_back_to_prefixed_variable() {
        std::env::set_var("WORDENC_CREDENTIAL_STORE_TEST_ONLY", "from-env");
        let secret = EnvCredentialStore
            .get("credential-store-test-only")
            .await
            .expect("secret");
        assert_eq!(secret, "from-env");
        let error = EnvCredentialStore
            .get("credential-store-test-absent")
            .await
            .expect_err("missing");
        assert_eq!(error.code, ServiceErrorCode::CredentialMissing);
    }
}
