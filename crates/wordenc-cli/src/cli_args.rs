use std::path::PathBuf;

use clap::Parser;

const DEFAULT_PHONETIC_TIMEOUT_MS: &str = "15000";

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "wordenc",
    about = "Voice dialogue that reads a message back as a keyed list of cover words",
    version
)]
pub struct Cli {
    #[arg(
        long = "turn-request",
        value_name = "PATH",
        conflicts_with = "replay_fixture",
        required_unless_present = "replay_fixture",
        help = "Run one turn from a JSON turn request file ('-' reads stdin) and print the JSON response."
    )]
    pub turn_request: Option<String>,

    #[arg(
        long = "replay-fixture",
        value_name = "PATH",
        help = "Replay a scripted conversation fixture and print the replay summary."
    )]
    pub replay_fixture: Option<PathBuf>,

    #[arg(
        long = "state-dir",
        env = "WORDENC_STATE_DIR",
        default_value = ".wordenc/sessions",
        help = "Directory holding one JSON session record per session id."
    )]
    pub state_dir: PathBuf,

    #[arg(
        long = "dialogue-config",
        env = "WORDENC_DIALOGUE_CONFIG",
        help = "Optional TOML file overriding word lists, limits and digit corrections."
    )]
    pub dialogue_config: Option<PathBuf>,

    #[arg(
        long = "phonetic-api-base",
        env = "WORDENC_PHONETIC_API_BASE",
        default_value = "https://labs.goo.ne.jp",
        help = "Base URL of the kana conversion API."
    )]
    pub phonetic_api_base: String,

    #[arg(
        long = "phonetic-path",
        env = "WORDENC_PHONETIC_PATH",
        default_value = "/api/hiragana",
        help = "Request path of the kana conversion endpoint."
    )]
    pub phonetic_path: String,

    #[arg(
        long = "phonetic-timeout-ms",
        env = "WORDENC_PHONETIC_TIMEOUT_MS",
        default_value = DEFAULT_PHONETIC_TIMEOUT_MS,
        value_parser = parse_positive_u64,
        help = "Per-request timeout for the kana conversion API."
    )]
    pub phonetic_timeout_ms: u64,

    #[arg(
        long = "credential-store",
        env = "WORDENC_CREDENTIAL_STORE",
        help = "JSON credential snapshot. Environment variables are used when omitted."
    )]
    pub credential_store: Option<PathBuf>,

    #[arg(
        long,
        env = "WORDENC_OFFLINE",
        default_value_t = false,
        help = "Treat message text as kana already and skip the conversion API."
    )]
    pub offline: bool,
}
