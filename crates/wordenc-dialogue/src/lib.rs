//! Multi-turn voice dialogue that collects a message and an optional 4-digit key,
//! then reads the message back as a list of cover words.
//!
//! Each turn is stateless on its own: the typed [`SessionState`] is decoded from
//! platform-held attributes, the [`DialogueController`] dispatches on
//! `(state, classified event)`, and the updated attributes are handed back for
//! the [`SessionStore`] to persist.

pub mod content_policy;
pub mod credential_store;
pub mod dialogue_config;
pub mod dialogue_contract;
pub mod dialogue_controller;
pub mod dialogue_fixture;
pub mod dialogue_runtime;
pub mod dialogue_texts;
pub mod input_normalizer;
pub mod phonetic_provider;
pub mod service_error;
pub mod session_state;
pub mod session_store;
pub mod speech_render;


pub use content_policy::ContentPolicy;
pub use credential_store::{
    CredentialRecord, CredentialStore, CredentialStoreSnapshot, EnvCredentialStore,
    FileCredentialStore, StaticCredentialStore,
};
pub use dialogue_config::DialogueConfig;
pub use dialogue_contract::{
    RecognizedIntent, TurnCard, TurnEvent, TurnRequest, TurnResponse, TurnSlots,
};
pub use dialogue_controller::{classify_event, DialogueController, DialogueEvent};
pub use dialogue_fixture::{
    load_dialogue_fixture, parse_dialogue_fixture, replay_dialogue_fixture,
    validate_dialogue_fixture, DialogueFixture, ReplaySummary,
};
pub use dialogue_runtime::DialogueRuntime;
pub use input_normalizer::{remove_whitespace, AnswerPolarity, InputNormalizer, ValidationError};
pub use phonetic_provider::{
    HttpPhoneticProvider, HttpPhoneticProviderConfig, PassthroughPhoneticProvider,
    PhoneticConverter,
};
pub use service_error::{ServiceError, ServiceErrorCode, ServiceResult};
pub use session_state::{DialogueState, SessionAttributes, SessionDecodeError, SessionState};
pub use session_store::{FileSessionStore, InMemorySessionStore, SessionStore};
