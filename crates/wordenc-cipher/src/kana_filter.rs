//! Narrows converter output to the characters the codec can encode.

use crate::word_table::{is_supported_character, CODEBOOK};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredKana {
    pub kana: String,
    pub length: usize,
    pub dropped_characters: usize,
}

impl FilteredKana {
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn exceeds(&self, max_length: usize) -> bool {
        self.length > max_length
    }
}

/// Drops every character without a codebook row, keeping the order of the rest.
pub fn filter_kana(input: &str) -> FilteredKana {
    let mut kana = String::with_capacity(input.len());
    let mut length = 0;
    let mut dropped_characters = 0;
    for character in input.chars() {
        if is_supported_character(character) {
            kana.push(character);
            length += 1;
        } else {
            dropped_characters += 1;
        }
    }
    FilteredKana {
        kana,
        length,
        dropped_characters,
    }
}

/// Supported characters in codebook order.
pub fn supported_alphabet() -> impl Iterator<Item = char> {
    CODEBOOK.iter().map(|row| row.character)
}
