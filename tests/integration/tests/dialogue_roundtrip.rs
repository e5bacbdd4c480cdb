use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex as AsyncMutex;
use wordenc_cipher::{encode, CipherKey};
use wordenc_dialogue::{
    DialogueConfig, DialogueController, DialogueRuntime, DialogueState, FileSessionStore,
    InMemorySessionStore, PhoneticConverter, ServiceError, SessionState, SessionStore,
    StaticCredentialStore, TurnRequest,
};

const CREDENTIAL_SECRET: &str = "integration-secret";

/// Hands back queued conversion results in order and records what it was asked.
struct ScriptedConverter {
    responses: AsyncMutex<VecDeque<Result<String, ServiceError>>>,
    requests: AsyncMutex<Vec<(String, String)>>,
}

impl ScriptedConverter {
    fn new(responses: Vec<Result<String, ServiceError>>) -> Self {
        Self {
            responses: AsyncMutex::new(VecDeque::from(responses)),
            requests: AsyncMutex::new(Vec::new()),
        }
    }

    async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl PhoneticConverter for ScriptedConverter {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn convert(&self, raw_text: &str, credential: &str) -> Result<String, ServiceError> {
        self.requests
            .lock()
            .await
            .push((raw_text.to_string(), credential.to_string()));
        self.responses.lock().await.pop_front().unwrap_or_else(|| {
            Err(ServiceError::invalid_response(
                "scripted",
                "scripted response queue exhausted",
            ))
        })
    }
}

fn runtime_with(
    converter: Arc<ScriptedConverter>,
    store: Arc<dyn SessionStore>,
) -> DialogueRuntime {
    let config = DialogueConfig::default();
    let credentials = Arc::new(StaticCredentialStore::with_secret(
        &config.credential_name,
        CREDENTIAL_SECRET,
    ));
    let controller =
        DialogueController::new(config, credentials, converter).expect("controller");
    DialogueRuntime::new(controller, store)
}

#[tokio::test]
async fn integration_keyed_conversation_survives_process_restarts_between_turns() {
    let temp = tempfile::tempdir().expect("tempdir");
    let converter = Arc::new(ScriptedConverter::new(vec![Ok(
        "きょう は はれ。".to_string()
    )]));
    let session = "amzn1.echo-api.session.integration-1";
    let fresh_runtime = || {
        runtime_with(
            converter.clone(),
            Arc::new(FileSessionStore::new(temp.path())),
        )
    };

    let launch = fresh_runtime()
        .run_turn(TurnRequest::start(session))
        .await
        .expect("launch");
    assert_eq!(launch.dialogue_state(), Some(DialogueState::AcceptMessage));

    let message = fresh_runtime()
        .run_turn(TurnRequest::recognized(session, "AcceptMessageIntent").with_message("今日は晴れ"))
        .await
        .expect("message");
    assert_eq!(message.dialogue_state(), Some(DialogueState::ConfirmUseKey));
    assert_eq!(
        message.card.as_ref().map(|card| card.body.as_str()),
        Some("きょうははれ")
    );
    {
        let requests = converter.requests.lock().await;
        assert_eq!(
            requests.as_slice(),
            &[("今日は晴れ".to_string(), CREDENTIAL_SECRET.to_string())]
        );
    }

    fresh_runtime()
        .run_turn(TurnRequest::recognized(session, "AMAZON.YesIntent"))
        .await
        .expect("use key");
    let keyed = fresh_runtime()
        .run_turn(TurnRequest::recognized(session, "AcceptKeyIntent").with_key("0 4 2 7"))
        .await
        .expect("key");
    assert_eq!(keyed.dialogue_state(), Some(DialogueState::ConfirmRead));

    let stored = FileSessionStore::new(temp.path())
        .load(session)
        .expect("load");
    let record = SessionState::from_attributes(&stored).expect("decode");
    let key = CipherKey::new(427).expect("key");
    assert_eq!(record.message, "きょうははれ");
    assert_eq!(record.key, Some(key));
    assert_eq!(
        record.encrypted_words,
        encode(Some(key), "きょうははれ").expect("encode")
    );

    let farewell = fresh_runtime()
        .run_turn(TurnRequest::recognized(session, "AMAZON.NoIntent"))
        .await
        .expect("farewell");
    assert!(farewell.end_session);
    assert_eq!(
        FileSessionStore::new(temp.path())
            .load(session)
            .expect("load"),
        stored
    );
    assert_eq!(converter.request_count().await, 1);
}

#[tokio::test]
async fn integration_service_failure_then_fallback_recovers_the_conversation() {
    let converter = Arc::new(ScriptedConverter::new(vec![
        Err(ServiceError::timeout(
            "scripted",
            "operation=convert request timed out",
        )),
        Ok("たちつてと".to_string()),
    ]));
    let store = Arc::new(InMemorySessionStore::new());
    let runtime = runtime_with(converter.clone(), store.clone());
    let session = "session-recovery";

    runtime
        .run_turn(TurnRequest::start(session))
        .await
        .expect("launch");
    let before = store.load(session).expect("load");

    let failed = runtime
        .run_turn(TurnRequest::recognized(session, "AcceptMessageIntent").with_message("立ち"))
        .await
        .expect("failed turn still answers");
    assert!(!failed.end_session);
    assert_eq!(store.load(session).expect("load"), before);

    let fallback = runtime
        .run_turn(TurnRequest::recognized(session, "AMAZON.FallbackIntent"))
        .await
        .expect("fallback");
    assert_eq!(
        Some(fallback.spoken_text.as_str()),
        failed.reprompt_text.as_deref()
    );

    let retried = runtime
        .run_turn(TurnRequest::recognized(session, "AcceptMessageIntent").with_message("立ち"))
        .await
        .expect("retry");
    assert_eq!(retried.dialogue_state(), Some(DialogueState::ConfirmUseKey));
    assert_eq!(converter.request_count().await, 2);
}

#[tokio::test]
async fn integration_concurrent_sessions_do_not_share_state() {
    let converter = Arc::new(ScriptedConverter::new(vec![
        Ok("あいうえお".to_string()),
        Ok("あいうえお".to_string()),
    ]));
    let store = Arc::new(InMemorySessionStore::new());
    let runtime = Arc::new(runtime_with(converter, store.clone()));

    let drive = |session: &'static str, key: &'static str| {
        let runtime = runtime.clone();
        async move {
            runtime.run_turn(TurnRequest::start(session)).await?;
            runtime
                .run_turn(
                    TurnRequest::recognized(session, "AcceptMessageIntent").with_message("あいうえお"),
                )
                .await?;
            runtime
                .run_turn(TurnRequest::recognized(session, "AMAZON.YesIntent"))
                .await?;
            runtime
                .run_turn(TurnRequest::recognized(session, "AcceptKeyIntent").with_key(key))
                .await
        }
    };

    let (first, second) = tokio::join!(drive("session-a", "1111"), drive("session-b", "2222"));
    assert_eq!(
        first.expect("first").dialogue_state(),
        Some(DialogueState::ConfirmRead)
    );
    assert_eq!(
        second.expect("second").dialogue_state(),
        Some(DialogueState::ConfirmRead)
    );

    let a = SessionState::from_attributes(&store.load("session-a").expect("load")).expect("a");
    let b = SessionState::from_attributes(&store.load("session-b").expect("load")).expect("b");
    assert_eq!(a.key.map(|key| key.value()), Some(1111));
    assert_eq!(b.key.map(|key| key.value()), Some(2222));
    assert_eq!(a.message, b.message);
    assert_eq!(a.encrypted_words.len(), b.encrypted_words.len());
}
