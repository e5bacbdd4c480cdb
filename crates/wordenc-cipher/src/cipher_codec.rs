//! Deterministic kana → cover-word encoder.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::cipher_key::{CipherKey, DEFAULT_KEY};
use crate::word_table::{candidates_for, WordEntry};

const KEY_SCHEDULE_DOMAIN: &[u8] = b"wordenc/v1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("unsupported character '{character}' at position {position}")]
    UnsupportedCharacter { character: char, position: usize },
    #[error("cipher key {0} is outside 0..=9999")]
    KeyOutOfRange(u32),
}

/// One encoded character.
///
/// `word` is the display form. When `use_alternate_reading` is set, playback must
/// speak `alternate_reading` instead, since the display form is a homograph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordToken {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_reading: Option<String>,
    #[serde(default)]
    pub use_alternate_reading: bool,
}

impl WordToken {
    fn from_entry(entry: &WordEntry) -> Self {
        if entry.homograph {
            Self {
                word: entry.word.to_string(),
                alternate_reading: Some(entry.reading.to_string()),
                use_alternate_reading: true,
            }
        } else {
            Self {
                word: entry.word.to_string(),
                alternate_reading: None,
                use_alternate_reading: false,
            }
        }
    }

    /// The form playback should voice.
    pub fn spoken_form(&self) -> &str {
        match (self.use_alternate_reading, self.alternate_reading.as_deref()) {
            (true, Some(reading)) => reading,
            _ => &self.word,
        }
    }
}

/// Encodes `message` one token per character. `None` selects [`DEFAULT_KEY`].
pub fn encode(key: Option<CipherKey>, message: &str) -> Result<Vec<WordToken>, CipherError> {
    let key = key.unwrap_or(DEFAULT_KEY);
    message
        .chars()
        .enumerate()
        .map(|(position, character)| {
            let candidates = candidates_for(character)
                .ok_or(CipherError::UnsupportedCharacter {
                    character,
                    position,
                })?;
            let index = candidate_index(key, position, character, candidates.len());
            Ok(WordToken::from_entry(&candidates[index]))
        })
        .collect()
}

/// Index into a row of `count` candidates, derived from the key digits, the
/// position, and the character itself.
pub(crate) fn candidate_index(
    key: CipherKey,
    position: usize,
    character: char,
    count: usize,
) -> usize {
    if count <= 1 {
        return 0;
    }
    let mut utf8 = [0_u8; 4];
    let position = u32::try_from(position).unwrap_or(u32::MAX);
    let digest = Sha256::new()
        .chain_update(KEY_SCHEDULE_DOMAIN)
        .chain_update(key.value().to_be_bytes())
        .chain_update(position.to_be_bytes())
        .chain_update(character.encode_utf8(&mut utf8).as_bytes())
        .finalize();
    let mut prefix = [0_u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let count = u64::try_from(count).unwrap_or(u64::MAX);
    usize::try_from(u64::from_be_bytes(prefix) % count).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::{candidate_index, encode, CipherError, WordToken};
    use crate::cipher_key::{CipherKey, DEFAULT_KEY};
    use crate::kana_filter::supported_alphabet;
    use crate::word_table::{candidates_for, CODEBOOK};

    fn key(value: u32) -> CipherKey {
        CipherKey::new(value).expect("valid key")
    }

    #[test]
    fn functional_encode_emits_one_token_per_character_in_order() {
        let tokens = encode(Some(key(1234)), "あいうえお").expect("encode");
        assert_eq!(tokens.len(), 5);
        for (token, character) in tokens.iter().zip("あいうえお".chars()) {
            let candidates = candidates_for(character).expect("row");
            assert!(candidates.iter().any(|entry| entry.word == token.word));
        }
    }

    #[test]
    fn unit_keyless_encoding_matches_default_key() {
        let message = "ひみつのめっせーじ";
        assert_eq!(
            encode(None, message).expect("keyless"),
            encode(Some(DEFAULT_KEY), message).expect("default")
        );
    }

    #[test]
    fn functional_varying_key_changes_selected_candidate() {
        let words = (0..64)
            .map(|value| encode(Some(key(value)), "あ").expect("encode")[0].word.clone())
            .collect::<HashSet<_>>();
        assert!(words.len() > 1, "key never changed the selection");
    }

    #[test]
    fn unit_homograph_tokens_carry_alternate_reading() {
        let entries = candidates_for('あ').expect("row");
        let homograph = entries.iter().find(|entry| entry.homograph).expect("homograph");
        let (value, _) = (0..10_000_u32)
            .map(|value| (value, candidate_index(key(value), 0, 'あ', entries.len())))
            .find(|(_, index)| entries[*index].word == homograph.word)
            .expect("some key selects the homograph");

        let token = &encode(Some(key(value)), "あ").expect("encode")[0];
        assert!(token.use_alternate_reading);
        assert_eq!(token.alternate_reading.as_deref(), Some(homograph.reading));
        assert_eq!(token.spoken_form(), homograph.reading);
    }

    #[test]
    fn unit_plain_tokens_speak_their_display_form() {
        let token = WordToken {
            word: "りんご".to_string(),
            alternate_reading: None,
            use_alternate_reading: false,
        };
        assert_eq!(token.spoken_form(), "りんご");
        let serialized = serde_json::to_string(&token).expect("serialize");
        assert_eq!(
            serialized,
            r#"{"word":"りんご","use_alternate_reading":false}"#
        );
    }

    #[test]
    fn regression_encode_rejects_unsupported_character_with_position() {
        let error = encode(None, "あいA").expect_err("unsupported");
        assert_eq!(
            error,
            CipherError::UnsupportedCharacter {
                character: 'A',
                position: 2
            }
        );
    }

    #[test]
    fn unit_single_candidate_rows_always_pick_index_zero() {
        assert_eq!(candidate_index(key(7), 3, 'を', 1), 0);
        assert_eq!(candidate_index(key(7), 3, 'を', 0), 0);
    }

    #[test]
    fn unit_empty_message_encodes_to_no_tokens() {
        assert!(encode(Some(key(9_999)), "").expect("encode").is_empty());
    }

    fn supported_message() -> impl Strategy<Value = String> {
        let alphabet = supported_alphabet().collect::<Vec<_>>();
        proptest::collection::vec(proptest::sample::select(alphabet), 0..=20)
            .prop_map(|characters| characters.into_iter().collect())
    }

    proptest! {
        #[test]
        fn property_encode_preserves_length(value in 0_u32..=9_999, message in supported_message()) {
            let tokens = encode(Some(key(value)), &message).expect("encode");
            prop_assert_eq!(tokens.len(), message.chars().count());
        }

        #[test]
        fn property_encode_is_deterministic(value in 0_u32..=9_999, message in supported_message()) {
            let first = encode(Some(key(value)), &message).expect("first");
            let second = encode(Some(key(value)), &message).expect("second");
            prop_assert_eq!(first, second);
        }

        #[test]
        fn property_every_token_decodes_to_its_source_character(
            value in 0_u32..=9_999,
            message in supported_message()
        ) {
            let tokens = encode(Some(key(value)), &message).expect("encode");
            for (token, character) in tokens.iter().zip(message.chars()) {
                let owner = CODEBOOK
                    .iter()
                    .find(|row| row.candidates.iter().any(|entry| entry.word == token.word))
                    .map(|row| row.character);
                prop_assert_eq!(owner, Some(character));
            }
        }
    }
}
