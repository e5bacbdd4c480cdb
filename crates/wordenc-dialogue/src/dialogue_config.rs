//! Tunable dialogue vocabulary and limits, loadable from TOML.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use wordenc_cipher::{CipherKey, MAX_KEY_VALUE};

use crate::content_policy::is_matchable_term;
use crate::input_normalizer::remove_whitespace;

pub const DEFAULT_MAX_MESSAGE_LEN: usize = 20;
pub const DEFAULT_CREDENTIAL_NAME: &str = "WORDENC-PHONETIC-API-KEY";

const DEFAULT_AFFIRM_WORDS: &[&str] = &[
    "はい",
    "うん",
    "ええ",
    "お願い",
    "おねがい",
    "お願いします",
    "おねがいします",
    "オーケー",
    "yes",
    "ok",
];

const DEFAULT_NEGATE_WORDS: &[&str] = &[
    "いいえ",
    "いや",
    "ううん",
    "いらない",
    "いりません",
    "けっこうです",
    "結構です",
    "しない",
    "しません",
    "no",
];

const DEFAULT_DENIED_TERMS: &[&str] = &["ころす", "しね"];

/// Characters the recognizer tends to return in place of a spoken digit.
const DEFAULT_DIGIT_CORRECTIONS: &[(&str, &str)] = &[
    ("語", "5"),
    ("後", "5"),
    ("碁", "5"),
    ("御", "5"),
    ("〇", "0"),
    ("零", "0"),
    ("一", "1"),
    ("二", "2"),
    ("三", "3"),
    ("四", "4"),
    ("五", "5"),
    ("六", "6"),
    ("七", "7"),
    ("八", "8"),
    ("九", "9"),
    ("０", "0"),
    ("１", "1"),
    ("２", "2"),
    ("３", "3"),
    ("４", "4"),
    ("５", "5"),
    ("６", "6"),
    ("７", "7"),
    ("８", "8"),
    ("９", "9"),
];

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Upper bound on the filtered kana message, in characters.
    pub max_message_len: usize,
    /// Key used when the user declines to set one.
    pub default_key: u16,
    pub affirm_words: Vec<String>,
    pub negate_words: Vec<String>,
    pub denied_terms: Vec<String>,
    /// Single character → single ASCII digit.
    pub digit_corrections: BTreeMap<String, String>,
    /// Credential holding the phonetic conversion API key.
    pub credential_name: String,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            default_key: 0,
            affirm_words: to_strings(DEFAULT_AFFIRM_WORDS),
            negate_words: to_strings(DEFAULT_NEGATE_WORDS),
            denied_terms: to_strings(DEFAULT_DENIED_TERMS),
            digit_corrections: DEFAULT_DIGIT_CORRECTIONS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            credential_name: DEFAULT_CREDENTIAL_NAME.to_string(),
        }
    }
}

impl DialogueConfig {
    pub fn parse_toml(raw: &str) -> Result<Self> {
        let config =
            toml::from_str::<Self>(raw).context("failed to parse dialogue config toml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dialogue config {}", path.display()))?;
        Self::parse_toml(&raw)
            .with_context(|| format!("invalid dialogue config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_message_len == 0 {
            bail!("max_message_len must be greater than 0");
        }
        if self.default_key > MAX_KEY_VALUE {
            bail!(
                "default_key {} exceeds {}",
                self.default_key,
                MAX_KEY_VALUE
            );
        }
        if self.credential_name.trim().is_empty() {
            bail!("credential_name must not be empty");
        }

        let affirm = normalized_word_set(&self.affirm_words, "affirm_words")?;
        let negate = normalized_word_set(&self.negate_words, "negate_words")?;
        if let Some(overlap) = affirm.intersection(&negate).next() {
            bail!("'{overlap}' is listed as both affirmation and negation");
        }
        for term in &self.denied_terms {
            let normalized = remove_whitespace(term);
            if normalized.is_empty() {
                bail!("denied_terms must not contain blank entries");
            }
            if !is_matchable_term(&normalized) {
                bail!("denied term '{term}' must be written in hiragana to ever match");
            }
        }
        self.digit_correction_table()?;
        Ok(())
    }

    pub fn default_cipher_key(&self) -> Result<CipherKey> {
        CipherKey::new(u32::from(self.default_key))
            .with_context(|| format!("invalid default_key {}", self.default_key))
    }

    /// Correction table keyed by the misheard character.
    pub fn digit_correction_table(&self) -> Result<BTreeMap<char, char>> {
        self.digit_corrections
            .iter()
            .map(|(from, to)| {
                let from_char = single_char(from)
                    .with_context(|| format!("digit correction source '{from}'"))?;
                let to_char = single_char(to)
                    .filter(char::is_ascii_digit)
                    .with_context(|| {
                        format!("digit correction for '{from}' must map to one ASCII digit")
                    })?;
                Ok((from_char, to_char))
            })
            .collect()
    }
}

pub(crate) fn normalize_answer_word(raw: &str) -> String {
    remove_whitespace(raw).to_ascii_lowercase()
}

fn normalized_word_set(words: &[String], field: &str) -> Result<HashSet<String>> {
    let mut set = HashSet::with_capacity(words.len());
    for word in words {
        let normalized = normalize_answer_word(word);
        if normalized.is_empty() {
            bail!("{field} must not contain blank entries");
        }
        set.insert(normalized);
    }
    if set.is_empty() {
        bail!("{field} must not be empty");
    }
    Ok(set)
}

fn single_char(raw: &str) -> Option<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(character), None) => Some(character),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::DialogueConfig;

    #[test]
    fn unit_default_config_validates() {
        let config = DialogueConfig::default();
        config.validate().expect("default config");
        assert_eq!(config.default_cipher_key().expect("key").value(), 0);
        let corrections = config.digit_correction_table().expect("table");
        assert_eq!(corrections.get(&'語'), Some(&'5'));
        assert_eq!(corrections.get(&'９'), Some(&'9'));
    }

    #[test]
    fn functional_toml_overrides_only_named_fields() {
        let config = DialogueConfig::parse_toml(
            r#"
max_message_len = 8
default_key = 4321
affirm_words = ["はい", "Yes"]

[digit_corrections]
"語" = "5"
"#,
        )
        .expect("config");
        assert_eq!(config.max_message_len, 8);
        assert_eq!(config.default_key, 4321);
        assert_eq!(config.affirm_words, vec!["はい", "Yes"]);
        assert_eq!(config.digit_corrections.len(), 1);
        assert_eq!(config.negate_words, DialogueConfig::default().negate_words);
    }

    #[test]
    fn regression_rejects_zero_length_limit_and_out_of_range_key() {
        let error = DialogueConfig::parse_toml("max_message_len = 0").expect_err("zero");
        assert!(format!("{error:#}").contains("max_message_len"));

        let error = DialogueConfig::parse_toml("default_key = 10000").expect_err("range");
        assert!(format!("{error:#}").contains("default_key"));
    }

    #[test]
    fn regression_rejects_word_listed_in_both_polarities() {
        let config = DialogueConfig {
            negate_words: vec!["は い".to_string()],
            ..DialogueConfig::default()
        };
        let error = config.validate().expect_err("overlap");
        assert!(error.to_string().contains("both affirmation and negation"));
    }

    #[test]
    fn regression_rejects_non_digit_correction_target() {
        let mut config = DialogueConfig::default();
        config
            .digit_corrections
            .insert("ご".to_string(), "five".to_string());
        let error = config.validate().expect_err("bad target");
        assert!(format!("{error:#}").contains("ASCII digit"));
    }

    #[test]
    fn regression_rejects_denied_term_that_filtered_messages_cannot_contain() {
        let error = DialogueConfig::parse_toml(r#"denied_terms = ["殺す"]"#).expect_err("kanji term");
        assert!(format!("{error:#}").contains("must be written in hiragana"));

        let config = DialogueConfig::parse_toml(r#"denied_terms = ["こ ろ す"]"#).expect("kana term");
        assert_eq!(config.denied_terms, vec!["こ ろ す"]);
    }
}
