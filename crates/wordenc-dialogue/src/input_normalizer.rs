//! Cleans noisy recognizer output before the dialogue acts on it.

use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use thiserror::Error;
use wordenc_cipher::{filter_kana, CipherKey, FilteredKana, KEY_DIGITS};

use crate::content_policy::ContentPolicy;
use crate::dialogue_config::{normalize_answer_word, DialogueConfig};

/// Recoverable input problems. Each one re-prompts instead of ending the turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("message contains a denied term")]
    PolicyDenied,
    #[error("message has no encodable characters")]
    EmptyMessage,
    #[error("message has {length} characters, limit is {max}")]
    MessageTooLong { length: usize, max: usize },
    #[error("key is not exactly 4 digits")]
    MalformedKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerPolarity {
    Affirm,
    Negate,
    Ambiguous,
}

/// Drops every whitespace character, including ideographic spaces.
pub fn remove_whitespace(raw: &str) -> String {
    raw.chars().filter(|character| !character.is_whitespace()).collect()
}

#[derive(Debug, Clone)]
pub struct InputNormalizer {
    digit_corrections: BTreeMap<char, char>,
    affirm_words: HashSet<String>,
    negate_words: HashSet<String>,
    policy: ContentPolicy,
    max_message_len: usize,
}

impl InputNormalizer {
    pub fn from_config(config: &DialogueConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            digit_corrections: config.digit_correction_table()?,
            affirm_words: config
                .affirm_words
                .iter()
                .map(|word| normalize_answer_word(word))
                .collect(),
            negate_words: config
                .negate_words
                .iter()
                .map(|word| normalize_answer_word(word))
                .collect(),
            policy: ContentPolicy::new(&config.denied_terms)?,
            max_message_len: config.max_message_len,
        })
    }

    pub fn max_message_len(&self) -> usize {
        self.max_message_len
    }

    /// Whitespace removal, then digit corrections, then a strict 4-digit check.
    pub fn parse_key(&self, raw: &str) -> Result<CipherKey, ValidationError> {
        let corrected = remove_whitespace(raw)
            .chars()
            .map(|character| {
                self.digit_corrections
                    .get(&character)
                    .copied()
                    .unwrap_or(character)
            })
            .collect::<String>();
        if corrected.len() != KEY_DIGITS || !corrected.bytes().all(|byte| byte.is_ascii_digit())
        {
            return Err(ValidationError::MalformedKey);
        }
        corrected
            .parse::<u32>()
            .ok()
            .and_then(|value| CipherKey::new(value).ok())
            .ok_or(ValidationError::MalformedKey)
    }

    /// Looks the answer up in the configured word lists. Never guesses a polarity.
    pub fn classify_answer(&self, raw: &str) -> AnswerPolarity {
        let normalized = normalize_answer_word(raw);
        if normalized.is_empty() {
            return AnswerPolarity::Ambiguous;
        }
        if self.affirm_words.contains(&normalized) {
            AnswerPolarity::Affirm
        } else if self.negate_words.contains(&normalized) {
            AnswerPolarity::Negate
        } else {
            AnswerPolarity::Ambiguous
        }
    }

    /// Filters converter output to the codec alphabet, then applies the content
    /// policy and the length bound.
    pub fn validate_message(&self, phonetic: &str) -> Result<FilteredKana, ValidationError> {
        let filtered = filter_kana(phonetic);
        if filtered.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        if self.policy.is_denied(&filtered.kana) {
            return Err(ValidationError::PolicyDenied);
        }
        if filtered.exceeds(self.max_message_len) {
            return Err(ValidationError::MessageTooLong {
                length: filtered.length,
                max: self.max_message_len,
            });
        }
        Ok(filtered)
    }
}
