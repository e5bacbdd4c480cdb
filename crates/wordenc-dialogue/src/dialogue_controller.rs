//! Dialogue state machine.
//!
//! Every turn is classified once into a [`DialogueEvent`] using the current state
//! and the decoded slot text, then dispatched through a single
//! `match (state, event)`. Paths that keep the conversation open rewrite the
//! session record, including the reprompt the fallback replays next turn.
//! Terminal paths, help, verbatim fallback and service failures hand the stored
//! attributes back untouched.

use std::sync::Arc;

use anyhow::Result;
use wordenc_cipher::{encode, CipherKey};

use crate::credential_store::CredentialStore;
use crate::dialogue_config::DialogueConfig;
use crate::dialogue_contract::{RecognizedIntent, TurnCard, TurnEvent, TurnRequest, TurnResponse};
use crate::dialogue_texts as texts;
use crate::input_normalizer::{AnswerPolarity, InputNormalizer, ValidationError};
use crate::phonetic_provider::PhoneticConverter;
use crate::service_error::ServiceError;
use crate::session_state::{DialogueState, SessionState};
use crate::speech_render::{render_card_words, render_playback, WORD_BREAK};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueEvent {
    Launch,
    Message(String),
    Key(String),
    Affirm,
    Negate,
    Help,
    Stop,
    SessionEnded,
    Unrecognized,
}

impl DialogueEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Launch => "launch",
            Self::Message(_) => "message",
            Self::Key(_) => "key",
            Self::Affirm => "affirm",
            Self::Negate => "negate",
            Self::Help => "help",
            Self::Stop => "stop",
            Self::SessionEnded => "session_ended",
            Self::Unrecognized => "unrecognized",
        }
    }
}

fn slot_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn polarity_event(polarity: AnswerPolarity) -> DialogueEvent {
    match polarity {
        AnswerPolarity::Affirm => DialogueEvent::Affirm,
        AnswerPolarity::Negate => DialogueEvent::Negate,
        AnswerPolarity::Ambiguous => DialogueEvent::Unrecognized,
    }
}

/// Folds the platform event and its slot text into one dialogue event.
///
/// Free text recognized as a message is re-read as a key in AcceptKey and as a
/// yes/no answer in the two confirmation states. Answers found in neither word
/// list never default to a polarity.
pub fn classify_event(
    state: DialogueState,
    request: &TurnRequest,
    normalizer: &InputNormalizer,
) -> DialogueEvent {
    match request.event {
        TurnEvent::Start => return DialogueEvent::Launch,
        TurnEvent::End => return DialogueEvent::SessionEnded,
        TurnEvent::Recognized => {}
    }
    let Some(event_name) = request.event_name.as_deref() else {
        return DialogueEvent::Unrecognized;
    };
    let message = slot_text(request.slots.message.as_deref());
    let key = slot_text(request.slots.key.as_deref());

    match RecognizedIntent::parse(event_name) {
        RecognizedIntent::AcceptMessage => match (state, message) {
            (_, None) => DialogueEvent::Unrecognized,
            (DialogueState::AcceptMessage, Some(text)) => DialogueEvent::Message(text),
            (DialogueState::AcceptKey, Some(text)) => DialogueEvent::Key(text),
            (DialogueState::ConfirmUseKey | DialogueState::ConfirmRead, Some(text)) => {
                polarity_event(normalizer.classify_answer(&text))
            }
        },
        RecognizedIntent::AcceptKey => match (state, key.or(message)) {
            (DialogueState::AcceptKey, Some(text)) => DialogueEvent::Key(text),
            _ => DialogueEvent::Unrecognized,
        },
        RecognizedIntent::Yes => DialogueEvent::Affirm,
        RecognizedIntent::No => DialogueEvent::Negate,
        RecognizedIntent::Help => DialogueEvent::Help,
        RecognizedIntent::Cancel | RecognizedIntent::Stop => DialogueEvent::Stop,
        RecognizedIntent::Other(_) => DialogueEvent::Unrecognized,
    }
}

/// What a dispatch arm decided before it is turned into a response.
enum TurnOutcome {
    /// Conversation continues and `session` replaces the stored record.
    Advance {
        session: SessionState,
        spoken_text: String,
        reprompt_text: String,
        card: Option<TurnCard>,
    },
    /// Conversation continues with the stored record left as is.
    Hold {
        spoken_text: String,
        reprompt_text: String,
    },
    End {
        spoken_text: String,
    },
    ServiceFailure {
        reprompt_text: String,
    },
}

pub struct DialogueController {
    config: DialogueConfig,
    normalizer: InputNormalizer,
    default_key: CipherKey,
    credentials: Arc<dyn CredentialStore>,
    converter: Arc<dyn PhoneticConverter>,
}

impl DialogueController {
    pub fn new(
        config: DialogueConfig,
        credentials: Arc<dyn CredentialStore>,
        converter: Arc<dyn PhoneticConverter>,
    ) -> Result<Self> {
        let normalizer = InputNormalizer::from_config(&config)?;
        let default_key = config.default_cipher_key()?;
        Ok(Self {
            config,
            normalizer,
            default_key,
            credentials,
            converter,
        })
    }

    pub fn config(&self) -> &DialogueConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &InputNormalizer {
        &self.normalizer
    }

    #[tracing::instrument(
        name = "wordenc.dialogue.turn",
        skip(self, request),
        fields(
            session_id = %request.session_id,
            turn_event = request.event.as_str()
        )
    )]
    pub async fn handle_turn(&self, request: &TurnRequest) -> TurnResponse {
        let session = match SessionState::from_attributes(&request.stored_attributes) {
            Ok(session) => session,
            Err(error) => {
                tracing::warn!(%error, "stored session attributes are undecodable; starting fresh");
                SessionState::default()
            }
        };
        let state = session.effective_state();
        let event = classify_event(state, request, &self.normalizer);
        let event_kind = event.kind();

        let outcome = match (state, event) {
            (_, DialogueEvent::Launch) => self.launch(),
            (_, DialogueEvent::SessionEnded) => TurnOutcome::End {
                spoken_text: String::new(),
            },
            (_, DialogueEvent::Stop) => TurnOutcome::End {
                spoken_text: texts::STOP.to_string(),
            },
            (_, DialogueEvent::Help) => self.help(&session),
            (DialogueState::AcceptMessage, DialogueEvent::Message(text)) => {
                self.accept_message(&session, &text).await
            }
            (DialogueState::ConfirmUseKey, DialogueEvent::Affirm) => TurnOutcome::Advance {
                session: SessionState {
                    state: Some(DialogueState::AcceptKey),
                    ..session
                },
                spoken_text: texts::ASK_KEY.to_string(),
                reprompt_text: texts::ASK_KEY.to_string(),
                card: None,
            },
            (DialogueState::ConfirmUseKey, DialogueEvent::Negate) => {
                self.encode_and_confirm(session, None)
            }
            (DialogueState::AcceptKey, DialogueEvent::Key(text)) => {
                match self.normalizer.parse_key(&text) {
                    Ok(key) => self.encode_and_confirm(session, Some(key)),
                    Err(error) => {
                        tracing::debug!(%error, "key rejected");
                        TurnOutcome::Advance {
                            session: SessionState {
                                state: Some(DialogueState::AcceptKey),
                                ..session
                            },
                            spoken_text: format!("{}{}", texts::MALFORMED_KEY, texts::ASK_KEY),
                            reprompt_text: texts::ASK_KEY.to_string(),
                            card: None,
                        }
                    }
                }
            }
            (DialogueState::ConfirmRead, DialogueEvent::Affirm) => self.play_back(session),
            (DialogueState::ConfirmRead, DialogueEvent::Negate) => TurnOutcome::End {
                spoken_text: texts::FAREWELL.to_string(),
            },
            (_, _) => self.fallback(&session),
        };

        let response = self.respond(request, outcome);
        tracing::debug!(
            state = state.as_str(),
            event = event_kind,
            next_state = response.dialogue_state().map(DialogueState::as_str),
            end_session = response.end_session,
            "dispatched turn"
        );
        response
    }

    fn launch(&self) -> TurnOutcome {
        TurnOutcome::Advance {
            session: SessionState {
                state: Some(DialogueState::AcceptMessage),
                ..SessionState::default()
            },
            spoken_text: texts::WELCOME.to_string(),
            reprompt_text: texts::ASK_MESSAGE.to_string(),
            card: None,
        }
    }

    fn help(&self, session: &SessionState) -> TurnOutcome {
        match session.reprompt_text.as_deref() {
            Some(reprompt) => TurnOutcome::Hold {
                spoken_text: format!("{}{reprompt}", texts::HELP),
                reprompt_text: reprompt.to_string(),
            },
            None => TurnOutcome::Hold {
                spoken_text: format!("{}{}", texts::HELP, texts::ASK_MESSAGE),
                reprompt_text: texts::ASK_MESSAGE.to_string(),
            },
        }
    }

    /// Replays the stored reprompt verbatim, or restarts when there is none.
    fn fallback(&self, session: &SessionState) -> TurnOutcome {
        match session.reprompt_text.as_deref() {
            Some(reprompt) => TurnOutcome::Hold {
                spoken_text: reprompt.to_string(),
                reprompt_text: reprompt.to_string(),
            },
            None => self.restart(texts::ASK_MESSAGE.to_string()),
        }
    }

    fn restart(&self, spoken_text: String) -> TurnOutcome {
        TurnOutcome::Advance {
            session: SessionState {
                state: Some(DialogueState::AcceptMessage),
                ..SessionState::default()
            },
            spoken_text,
            reprompt_text: texts::ASK_MESSAGE.to_string(),
            card: None,
        }
    }

    async fn accept_message(&self, session: &SessionState, raw_text: &str) -> TurnOutcome {
        let phonetic = match self.convert_message(raw_text).await {
            Ok(phonetic) => phonetic,
            Err(error) => {
                tracing::warn!(
                    service = %error.service,
                    code = error.code.as_str(),
                    transient = error.code.is_transient(),
                    detail = %error.message,
                    "message conversion failed"
                );
                return TurnOutcome::ServiceFailure {
                    reprompt_text: session
                        .reprompt_text
                        .clone()
                        .unwrap_or_else(|| texts::ASK_MESSAGE.to_string()),
                };
            }
        };

        match self.normalizer.validate_message(&phonetic) {
            Ok(filtered) => {
                tracing::info!(
                    length = filtered.length,
                    dropped_characters = filtered.dropped_characters,
                    "message accepted"
                );
                TurnOutcome::Advance {
                    spoken_text: texts::message_accepted(&filtered.kana),
                    reprompt_text: texts::CONFIRM_USE_KEY.to_string(),
                    card: Some(TurnCard {
                        title: texts::MESSAGE_CARD_TITLE.to_string(),
                        body: filtered.kana.clone(),
                    }),
                    session: SessionState {
                        state: Some(DialogueState::ConfirmUseKey),
                        message: filtered.kana,
                        ..SessionState::default()
                    },
                }
            }
            Err(error) => {
                tracing::debug!(%error, "message rejected");
                let reason = match error {
                    ValidationError::MessageTooLong { max, .. } => texts::message_too_long(max),
                    ValidationError::PolicyDenied => texts::POLICY_DENIED.to_string(),
                    _ => texts::EMPTY_MESSAGE.to_string(),
                };
                self.restart(format!("{reason}{}", texts::ASK_MESSAGE))
            }
        }
    }

    async fn convert_message(&self, raw_text: &str) -> Result<String, ServiceError> {
        let credential = self.credentials.get(&self.config.credential_name).await?;
        self.converter.convert(raw_text, &credential).await
    }

    /// `key == None` is keyless mode and encodes with the configured default key.
    fn encode_and_confirm(&self, session: SessionState, key: Option<CipherKey>) -> TurnOutcome {
        if session.message.is_empty() {
            tracing::warn!("no stored message to encode; restarting");
            return self.restart(texts::ASK_MESSAGE.to_string());
        }
        let words = match encode(Some(key.unwrap_or(self.default_key)), &session.message) {
            Ok(words) => words,
            Err(error) => {
                tracing::warn!(%error, "stored message is not encodable; restarting");
                return self.restart(texts::ASK_MESSAGE.to_string());
            }
        };
        tracing::info!(
            word_count = words.len(),
            keyless = key.is_none(),
            "message encoded"
        );
        let lead = match key {
            Some(key) => texts::key_accepted(key),
            None => texts::KEYLESS_ENCODED.to_string(),
        };
        TurnOutcome::Advance {
            spoken_text: format!("{lead}{}", texts::CONFIRM_READ),
            reprompt_text: texts::CONFIRM_READ.to_string(),
            card: Some(TurnCard {
                title: texts::CIPHER_CARD_TITLE.to_string(),
                body: render_card_words(&words),
            }),
            session: SessionState {
                state: Some(DialogueState::ConfirmRead),
                key,
                encrypted_words: words,
                ..session
            },
        }
    }

    fn play_back(&self, session: SessionState) -> TurnOutcome {
        if session.encrypted_words.is_empty() {
            tracing::warn!("no stored cipher words to read; restarting");
            return self.restart(texts::ASK_MESSAGE.to_string());
        }
        TurnOutcome::Advance {
            spoken_text: format!(
                "{}{}{WORD_BREAK}{}",
                texts::PLAYBACK_INTRO,
                render_playback(&session.encrypted_words),
                texts::CONFIRM_REPEAT
            ),
            reprompt_text: texts::CONFIRM_REPEAT.to_string(),
            card: Some(TurnCard {
                title: texts::CIPHER_CARD_TITLE.to_string(),
                body: render_card_words(&session.encrypted_words),
            }),
            session,
        }
    }

    fn respond(&self, request: &TurnRequest, outcome: TurnOutcome) -> TurnResponse {
        let unchanged = request.stored_attributes.clone();
        match outcome {
            TurnOutcome::Advance {
                mut session,
                spoken_text,
                reprompt_text,
                card,
            } => {
                session.reprompt_text = Some(reprompt_text.clone());
                match session.to_attributes(&request.stored_attributes) {
                    Ok(updated_attributes) => TurnResponse {
                        spoken_text,
                        reprompt_text: Some(reprompt_text),
                        card,
                        updated_attributes,
                        end_session: false,
                    },
                    Err(error) => {
                        tracing::warn!(%error, "failed to encode session attributes");
                        TurnResponse {
                            spoken_text: texts::SERVICE_FAILURE.to_string(),
                            reprompt_text: Some(reprompt_text),
                            card: None,
                            updated_attributes: unchanged,
                            end_session: false,
                        }
                    }
                }
            }
            TurnOutcome::Hold {
                spoken_text,
                reprompt_text,
            } => TurnResponse {
                spoken_text,
                reprompt_text: Some(reprompt_text),
                card: None,
                updated_attributes: unchanged,
                end_session: false,
            },
            TurnOutcome::End { spoken_text } => TurnResponse {
                spoken_text,
                reprompt_text: None,
                card: None,
                updated_attributes: unchanged,
                end_session: true,
            },
            TurnOutcome::ServiceFailure { reprompt_text } => TurnResponse {
                spoken_text: texts::SERVICE_FAILURE.to_string(),
                reprompt_text: Some(reprompt_text),
                card: None,
                updated_attributes: unchanged,
                end_session: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_event, DialogueEvent};
    use crate::dialogue_config::DialogueConfig;
    use crate::dialogue_contract::TurnRequest;
    use crate::input_normalizer::InputNormalizer;
    use crate::session_state::DialogueState;

    fn normalizer() -> InputNormalizer {
        InputNormalizer::from_config(&DialogueConfig::default()).expect("normalizer")
    }

    #[test]
    fn unit_message_intent_is_reinterpreted_per_state() {
        let normalizer = normalizer();
        let request = TurnRequest::recognized("s", "AcceptMessageIntent").with_message("はい");
        assert_eq!(
            classify_event(DialogueState::AcceptMessage, &request, &normalizer),
            DialogueEvent::Message("はい".to_string())
        );
        assert_eq!(
            classify_event(DialogueState::ConfirmUseKey, &request, &normalizer),
            DialogueEvent::Affirm
        );
        assert_eq!(
            classify_event(DialogueState::AcceptKey, &request, &normalizer),
            DialogueEvent::Key("はい".to_string())
        );

        let ambiguous = TurnRequest::recognized("s", "AcceptMessageIntent").with_message("たぶん");
        assert_eq!(
            classify_event(DialogueState::ConfirmRead, &ambiguous, &normalizer),
            DialogueEvent::Unrecognized
        );
    }

    #[test]
    fn unit_key_intent_only_counts_in_accept_key() {
        let normalizer = normalizer();
        let request = TurnRequest::recognized("s", "AcceptKeyIntent").with_key("1234");
        assert_eq!(
            classify_event(DialogueState::AcceptKey, &request, &normalizer),
            DialogueEvent::Key("1234".to_string())
        );
        assert_eq!(
            classify_event(DialogueState::ConfirmUseKey, &request, &normalizer),
            DialogueEvent::Unrecognized
        );
    }

    #[test]
    fn unit_lifecycle_and_builtin_intents_classify_independent_of_state() {
        let normalizer = normalizer();
        let state = DialogueState::AcceptKey;
        assert_eq!(
            classify_event(state, &TurnRequest::start("s"), &normalizer),
            DialogueEvent::Launch
        );
        assert_eq!(
            classify_event(state, &TurnRequest::end("s"), &normalizer),
            DialogueEvent::SessionEnded
        );
        assert_eq!(
            classify_event(state, &TurnRequest::recognized("s", "AMAZON.YesIntent"), &normalizer),
            DialogueEvent::Affirm
        );
        assert_eq!(
            classify_event(state, &TurnRequest::recognized("s", "AMAZON.CancelIntent"), &normalizer),
            DialogueEvent::Stop
        );
        assert_eq!(
            classify_event(
                state,
                &TurnRequest::recognized("s", "AMAZON.FallbackIntent"),
                &normalizer
            ),
            DialogueEvent::Unrecognized
        );
    }

    #[test]
    fn regression_blank_message_slot_is_unrecognized() {
        let request = TurnRequest::recognized("s", "AcceptMessageIntent").with_message("   ");
        assert_eq!(
            classify_event(DialogueState::AcceptMessage, &request, &normalizer()),
            DialogueEvent::Unrecognized
        );
    }
}
