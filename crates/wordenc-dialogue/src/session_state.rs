//! Typed session record and its string attribute encoding.
//!
//! The platform persists a flat string map per session. Only this module reads
//! or writes the keys below; the controller works on [`SessionState`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wordenc_cipher::{CipherKey, WordToken};

pub const STATE_ATTRIBUTE: &str = "STATE";
pub const MESSAGE_ATTRIBUTE: &str = "MESSAGE";
pub const KEY_ATTRIBUTE: &str = "KEY";
pub const REPROMPT_ATTRIBUTE: &str = "REPROMPT_OUTPUT";
pub const ENCRYPTED_WORDS_ATTRIBUTE: &str = "ENCRYPTED_WORDS";

const OWNED_ATTRIBUTES: [&str; 5] = [
    STATE_ATTRIBUTE,
    MESSAGE_ATTRIBUTE,
    KEY_ATTRIBUTE,
    REPROMPT_ATTRIBUTE,
    ENCRYPTED_WORDS_ATTRIBUTE,
];

pub type SessionAttributes = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    AcceptMessage,
    ConfirmUseKey,
    AcceptKey,
    ConfirmRead,
}

impl DialogueState {
    pub fn ordinal(self) -> u8 {
        match self {
            Self::AcceptMessage => 0,
            Self::ConfirmUseKey => 1,
            Self::AcceptKey => 2,
            Self::ConfirmRead => 3,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::AcceptMessage),
            1 => Some(Self::ConfirmUseKey),
            2 => Some(Self::AcceptKey),
            3 => Some(Self::ConfirmRead),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AcceptMessage => "accept_message",
            Self::ConfirmUseKey => "confirm_use_key",
            Self::AcceptKey => "accept_key",
            Self::ConfirmRead => "confirm_read",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionDecodeError {
    #[error("attribute KEY is not a key in 0..=9999: '{0}'")]
    InvalidKey(String),
    #[error("attribute ENCRYPTED_WORDS is not a word token list: {0}")]
    InvalidEncryptedWords(String),
    #[error("{words} encrypted words stored for a {characters}-character message")]
    LengthMismatch { words: usize, characters: usize },
}

/// Reads only the `STATE` attribute. Missing or unknown ordinals are `None`.
pub fn state_from_attributes(attributes: &SessionAttributes) -> Option<DialogueState> {
    attributes
        .get(STATE_ATTRIBUTE)
        .and_then(|raw| raw.trim().parse::<u8>().ok())
        .and_then(DialogueState::from_ordinal)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub state: Option<DialogueState>,
    pub message: String,
    /// Set only when the user supplied a key.
    pub key: Option<CipherKey>,
    pub encrypted_words: Vec<WordToken>,
    pub reprompt_text: Option<String>,
}

impl SessionState {
    /// First-turn sessions and sessions with an unknown ordinal sit in AcceptMessage.
    pub fn effective_state(&self) -> DialogueState {
        self.state.unwrap_or(DialogueState::AcceptMessage)
    }

    pub fn from_attributes(attributes: &SessionAttributes) -> Result<Self, SessionDecodeError> {
        let message = attributes
            .get(MESSAGE_ATTRIBUTE)
            .cloned()
            .unwrap_or_default();

        let key = match attributes.get(KEY_ATTRIBUTE) {
            None => None,
            Some(raw) => {
                let key = raw
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .and_then(|value| CipherKey::new(value).ok())
                    .ok_or_else(|| SessionDecodeError::InvalidKey(raw.clone()))?;
                Some(key)
            }
        };

        let encrypted_words = match attributes.get(ENCRYPTED_WORDS_ATTRIBUTE) {
            None => Vec::new(),
            Some(raw) => serde_json::from_str::<Vec<WordToken>>(raw)
                .map_err(|error| SessionDecodeError::InvalidEncryptedWords(error.to_string()))?,
        };
        let characters = message.chars().count();
        if !encrypted_words.is_empty() && encrypted_words.len() != characters {
            return Err(SessionDecodeError::LengthMismatch {
                words: encrypted_words.len(),
                characters,
            });
        }

        Ok(Self {
            state: state_from_attributes(attributes),
            message,
            key,
            encrypted_words,
            reprompt_text: attributes
                .get(REPROMPT_ATTRIBUTE)
                .filter(|text| !text.is_empty())
                .cloned(),
        })
    }

    /// Writes this record over `base`, keeping attributes owned by someone else.
    pub fn to_attributes(&self, base: &SessionAttributes) -> serde_json::Result<SessionAttributes> {
        let mut attributes = base.clone();
        for name in OWNED_ATTRIBUTES {
            attributes.remove(name);
        }
        if let Some(state) = self.state {
            attributes.insert(STATE_ATTRIBUTE.to_string(), state.ordinal().to_string());
        }
        if !self.message.is_empty() {
            attributes.insert(MESSAGE_ATTRIBUTE.to_string(), self.message.clone());
        }
        if let Some(key) = self.key {
            attributes.insert(KEY_ATTRIBUTE.to_string(), key.value().to_string());
        }
        if let Some(reprompt) = &self.reprompt_text {
            attributes.insert(REPROMPT_ATTRIBUTE.to_string(), reprompt.clone());
        }
        if !self.encrypted_words.is_empty() {
            attributes.insert(
                ENCRYPTED_WORDS_ATTRIBUTE.to_string(),
                serde_json::to_string(&self.encrypted_words)?,
            );
        }
        Ok(attributes)
    }
}
