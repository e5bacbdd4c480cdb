//! Fixed prompts. Functions take only already-validated values.

use wordenc_cipher::CipherKey;

use crate::speech_render::{escape_speech, say_digits};

pub const WELCOME: &str = "ようこそ。暗号化したいメッセージをどうぞ。";
pub const ASK_MESSAGE: &str = "暗号化したいメッセージをどうぞ。";
pub const CONFIRM_USE_KEY: &str = "復号のための鍵を設定しますか?";
pub const ASK_KEY: &str = "鍵に使う4桁の数字を言ってください。";
pub const MALFORMED_KEY: &str = "鍵は4桁の数字で言ってください。";
pub const CONFIRM_READ: &str = "暗号文を読み上げますか?";
pub const CONFIRM_REPEAT: &str = "もう一度読み上げますか?";
pub const KEYLESS_ENCODED: &str = "鍵を設定せずに暗号化しました。";
pub const PLAYBACK_INTRO: &str = "暗号文を読み上げます。";
pub const EMPTY_MESSAGE: &str = "メッセージを聞き取れませんでした。";
pub const POLICY_DENIED: &str = "そのメッセージは暗号化できません。";
pub const HELP: &str =
    "このスキルでは、メッセージを普通の単語の並びに暗号化します。鍵を設定すると、同じ鍵を知っている人だけが元に戻せます。";
pub const SERVICE_FAILURE: &str = "すみません、うまく処理できませんでした。もう一度お試しください。";
pub const FAREWELL: &str = "ご利用ありがとうございました。";
pub const STOP: &str = "さようなら。";

pub const MESSAGE_CARD_TITLE: &str = "暗号化メッセージ";
pub const CIPHER_CARD_TITLE: &str = "暗号文";

pub fn message_accepted(kana: &str) -> String {
    format!(
        "メッセージ「{}」を暗号化します。{CONFIRM_USE_KEY}",
        escape_speech(kana)
    )
}

pub fn message_too_long(max: usize) -> String {
    format!("メッセージが長すぎます。{max}文字以内で言ってください。")
}

pub fn key_accepted(key: CipherKey) -> String {
    format!("鍵を{}で受け付けました。", say_digits(key))
}
