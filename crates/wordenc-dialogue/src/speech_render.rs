//! Speech markup helpers. Only the directives the platform understands are
//! emitted; everything interpolated is escaped first.

use wordenc_cipher::{CipherKey, WordToken};

pub const WORD_BREAK: &str = "<break time=\"700ms\"/>";
pub const CARD_WORD_SEPARATOR: &str = "、";

pub fn escape_speech(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for character in raw.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn say_digits(key: CipherKey) -> String {
    format!("<say-as interpret-as=\"digits\">{}</say-as>", key.digits())
}

/// Voices each token in order, using the alternate reading where one is flagged.
pub fn render_playback(words: &[WordToken]) -> String {
    words
        .iter()
        .map(|token| escape_speech(token.spoken_form()))
        .collect::<Vec<_>>()
        .join(WORD_BREAK)
}

pub fn render_card_words(words: &[WordToken]) -> String {
    words
        .iter()
        .map(|token| token.word.as_str())
        .collect::<Vec<_>>()
        .join(CARD_WORD_SEPARATOR)
}
