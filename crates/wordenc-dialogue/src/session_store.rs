use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use wordenc_core::{current_unix_timestamp_ms, read_text_if_exists, write_text_atomic};

use crate::session_state::SessionAttributes;

pub const SESSION_RECORD_SCHEMA_VERSION: u32 = 1;
const MAX_SESSION_FILE_STEM_CHARS: usize = 128;

/// Persists the attribute map between turns. Turns for one session arrive
/// serialized, so implementations need no per-session locking.
pub trait SessionStore: Send + Sync {
    /// Empty map for sessions never saved.
    fn load(&self, session_id: &str) -> Result<SessionAttributes>;

    fn save(&self, session_id: &str, attributes: &SessionAttributes) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, SessionAttributes>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions
            .lock()
            .map(|sessions| sessions.len())
            .unwrap_or_default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, session_id: &str) -> Result<SessionAttributes> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_| anyhow!("session store mutex is poisoned"))?;
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }

    fn save(&self, session_id: &str, attributes: &SessionAttributes) -> Result<()> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| anyhow!("session store mutex is poisoned"))?;
        sessions.insert(session_id.to_string(), attributes.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct SessionRecord {
    schema_version: u32,
    session_id: String,
    updated_unix_ms: u64,
    #[serde(default)]
    attributes: SessionAttributes,
}

/// One JSON record per session under `root`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    root: PathBuf,
}

impl FileSessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session_path(&self, session_id: &str) -> PathBuf {
        self.root
            .join(format!("{}.json", sanitize_session_file_stem(session_id)))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, session_id: &str) -> Result<SessionAttributes> {
        let path = self.session_path(session_id);
        let Some(raw) = read_text_if_exists(&path)? else {
            return Ok(SessionAttributes::new());
        };
        let record = match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "session record is unreadable; starting fresh"
                );
                return Ok(SessionAttributes::new());
            }
        };
        if record.schema_version != SESSION_RECORD_SCHEMA_VERSION {
            tracing::warn!(
                path = %path.display(),
                expected = SESSION_RECORD_SCHEMA_VERSION,
                found = record.schema_version,
                "unsupported session record schema; starting fresh"
            );
            return Ok(SessionAttributes::new());
        }
        if record.session_id != session_id {
            tracing::warn!(
                path = %path.display(),
                "session record belongs to another session id; starting fresh"
            );
            return Ok(SessionAttributes::new());
        }
        Ok(record.attributes)
    }

    fn save(&self, session_id: &str, attributes: &SessionAttributes) -> Result<()> {
        let path = self.session_path(session_id);
        let record = SessionRecord {
            schema_version: SESSION_RECORD_SCHEMA_VERSION,
            session_id: session_id.to_string(),
            updated_unix_ms: current_unix_timestamp_ms(),
            attributes: attributes.clone(),
        };
        let mut payload = serde_json::to_string_pretty(&record)
            .context("failed to serialize session record")?;
        payload.push('\n');
        write_text_atomic(&path, &payload)
            .with_context(|| format!("failed to write session record {}", path.display()))
    }
}

fn sanitize_session_file_stem(session_id: &str) -> String {
    let stem = session_id
        .chars()
        .take(MAX_SESSION_FILE_STEM_CHARS)
        .map(|character| {
            if character.is_ascii_alphanumeric() || matches!(character, '-' | '_') {
                character
            } else {
                '_'
            }
        })
        .collect::<String>();
    if stem.is_empty() {
        "_".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{
        sanitize_session_file_stem, FileSessionStore, InMemorySessionStore, SessionStore,
    };
    use crate::session_state::SessionAttributes;

    fn attributes(pairs: &[(&str, &str)]) -> SessionAttributes {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn unit_in_memory_store_returns_empty_for_unknown_session() {
        let store = InMemorySessionStore::new();
        assert!(store.load("missing").expect("load").is_empty());
        store
            .save("s-1", &attributes(&[("STATE", "1")]))
            .expect("save");
        assert_eq!(store.load("s-1").expect("load"), attributes(&[("STATE", "1")]));
        assert_eq!(store.session_count(), 1);
    }

    #[test]
    fn functional_file_store_persists_across_instances() {
        let temp = tempdir().expect("tempdir");
        let saved = attributes(&[("STATE", "2"), ("MESSAGE", "あいうえお")]);
        FileSessionStore::new(temp.path())
            .save("amzn1.echo-api.session.abc", &saved)
            .expect("save");

        let reopened = FileSessionStore::new(temp.path());
        assert_eq!(
            reopened.load("amzn1.echo-api.session.abc").expect("load"),
            saved
        );
        assert!(reopened
            .session_path("amzn1.echo-api.session.abc")
            .ends_with("amzn1_echo-api_session_abc.json"));
    }

    #[test]
    fn regression_colliding_file_names_do_not_leak_between_sessions() {
        let temp = tempdir().expect("tempdir");
        let store = FileSessionStore::new(temp.path());
        store
            .save("a.b", &attributes(&[("MESSAGE", "ひみつ")]))
            .expect("save");
        assert_eq!(store.session_path("a.b"), store.session_path("a/b"));
        assert!(store.load("a/b").expect("load").is_empty());
    }

    #[test]
    fn regression_file_store_treats_unknown_schema_version_as_fresh() {
        let temp = tempdir().expect("tempdir");
        let store = FileSessionStore::new(temp.path());
        std::fs::write(
            store.session_path("s-9"),
            r#"{"schema_version":99,"session_id":"s-9","updated_unix_ms":0,"attributes":{"STATE":"2"}}"#,
        )
        .expect("write");
        assert!(store.load("s-9").expect("load").is_empty());
    }

    #[test]
    fn regression_file_store_treats_truncated_record_as_fresh() {
        let temp = tempdir().expect("tempdir");
        let store = FileSessionStore::new(temp.path());
        std::fs::write(store.session_path("s-1"), "{ truncated").expect("write");
        assert!(store.load("s-1").expect("load").is_empty());

        store
            .save("s-1", &attributes(&[("STATE", "1")]))
            .expect("save over corrupt record");
        assert_eq!(store.load("s-1").expect("load"), attributes(&[("STATE", "1")]));
    }

    #[test]
    fn regression_file_store_keeps_io_errors_fatal() {
        let temp = tempdir().expect("tempdir");
        let store = FileSessionStore::new(temp.path());
        std::fs::create_dir_all(store.session_path("s-dir")).expect("dir in place of record");
        assert!(store.load("s-dir").is_err());
    }

    #[test]
    fn unit_sanitize_never_returns_empty_stem() {
        assert_eq!(sanitize_session_file_stem(""), "_");
        assert_eq!(sanitize_session_file_stem("../x"), "___x");
    }
}
