use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use wordenc_dialogue::{
    CredentialStore, DialogueConfig, DialogueController, DialogueRuntime, EnvCredentialStore,
    FileCredentialStore, FileSessionStore, HttpPhoneticProvider, HttpPhoneticProviderConfig,
    PassthroughPhoneticProvider, PhoneticConverter, StaticCredentialStore,
};

use crate::cli_args::Cli;

const OFFLINE_CREDENTIAL: &str = "offline";

/// Logs go to stderr so stdout carries only JSON.
pub(crate) fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

pub(crate) fn load_dialogue_config(cli: &Cli) -> Result<DialogueConfig> {
    match cli.dialogue_config.as_deref() {
        Some(path) => DialogueConfig::load(path),
        None => Ok(DialogueConfig::default()),
    }
}

fn build_credentials(cli: &Cli, config: &DialogueConfig) -> Arc<dyn CredentialStore> {
    if cli.offline {
        return Arc::new(StaticCredentialStore::with_secret(
            &config.credential_name,
            OFFLINE_CREDENTIAL,
        ));
    }
    match cli.credential_store.as_deref() {
        Some(path) => Arc::new(FileCredentialStore::new(path)),
        None => Arc::new(EnvCredentialStore),
    }
}

fn build_converter(cli: &Cli) -> Result<Arc<dyn PhoneticConverter>> {
    if cli.offline {
        return Ok(Arc::new(PassthroughPhoneticProvider));
    }
    let provider = HttpPhoneticProvider::new(HttpPhoneticProviderConfig {
        api_base: cli.phonetic_api_base.clone(),
        path: cli.phonetic_path.clone(),
        timeout_ms: cli.phonetic_timeout_ms,
        ..HttpPhoneticProviderConfig::default()
    })
    .context("failed to configure phonetic conversion provider")?;
    Ok(Arc::new(provider))
}

pub(crate) fn build_runtime(cli: &Cli) -> Result<DialogueRuntime> {
    let config = load_dialogue_config(cli)?;
    let credentials = build_credentials(cli, &config);
    let converter = build_converter(cli)?;
    tracing::debug!(
        offline = cli.offline,
        converter = converter.provider_name(),
        state_dir = %cli.state_dir.display(),
        "building dialogue runtime"
    );
    let controller = DialogueController::new(config, credentials, converter)?;
    let store = Arc::new(FileSessionStore::new(cli.state_dir.clone()));
    Ok(DialogueRuntime::new(controller, store))
}
