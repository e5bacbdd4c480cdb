//! Word cipher for short hiragana messages.
//!
//! A message is first narrowed to the supported kana alphabet by the kana filter,
//! then each character is replaced by one cover word chosen from the codebook
//! with an index derived from the 4-digit key and the character position.

pub mod cipher_codec;
pub mod cipher_key;
pub mod kana_filter;
pub mod word_table;

pub use cipher_codec::{encode, CipherError, WordToken};
pub use cipher_key::{CipherKey, DEFAULT_KEY, KEY_DIGITS, MAX_KEY_VALUE};
pub use kana_filter::{filter_kana, supported_alphabet, FilteredKana};
pub use word_table::{candidates_for, is_supported_character, WordEntry};
