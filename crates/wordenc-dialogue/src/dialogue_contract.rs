//! Platform-neutral turn request/response shapes.

use serde::{Deserialize, Serialize};

use crate::session_state::{DialogueState, SessionAttributes};

pub const ACCEPT_MESSAGE_INTENT: &str = "AcceptMessageIntent";
pub const ACCEPT_KEY_INTENT: &str = "AcceptKeyIntent";
pub const YES_INTENT: &str = "YesIntent";
pub const NO_INTENT: &str = "NoIntent";
pub const HELP_INTENT: &str = "HelpIntent";
pub const CANCEL_INTENT: &str = "CancelIntent";
pub const STOP_INTENT: &str = "StopIntent";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TurnEvent {
    Start,
    Recognized,
    End,
}

impl TurnEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Recognized => "recognized",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnSlots {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnRequest {
    pub session_id: String,
    pub event: TurnEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default)]
    pub slots: TurnSlots,
    #[serde(default)]
    pub stored_attributes: SessionAttributes,
}

impl TurnRequest {
    pub fn start(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            event: TurnEvent::Start,
            event_name: None,
            slots: TurnSlots::default(),
            stored_attributes: SessionAttributes::new(),
        }
    }

    pub fn recognized(session_id: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            event: TurnEvent::Recognized,
            event_name: Some(event_name.into()),
            ..Self::start(session_id)
        }
    }

    pub fn end(session_id: impl Into<String>) -> Self {
        Self {
            event: TurnEvent::End,
            ..Self::start(session_id)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.slots.message = Some(message.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.slots.key = Some(key.into());
        self
    }

    pub fn with_attributes(mut self, attributes: SessionAttributes) -> Self {
        self.stored_attributes = attributes;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnCard {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnResponse {
    /// May embed `<break>` and `<say-as>` directives.
    pub spoken_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<TurnCard>,
    #[serde(default)]
    pub updated_attributes: SessionAttributes,
    #[serde(default)]
    pub end_session: bool,
}

impl TurnResponse {
    /// Dialogue state recorded in the updated attributes, if any.
    pub fn dialogue_state(&self) -> Option<DialogueState> {
        crate::session_state::state_from_attributes(&self.updated_attributes)
    }
}

/// Intent recognized by the platform, matched on the last `.`-separated segment
/// of the event name so namespaced built-ins resolve the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizedIntent {
    AcceptMessage,
    AcceptKey,
    Yes,
    No,
    Help,
    Cancel,
    Stop,
    Other(String),
}

impl RecognizedIntent {
    pub fn parse(event_name: &str) -> Self {
        let trimmed = event_name.trim();
        let segment = trimmed.rsplit('.').next().unwrap_or(trimmed);
        match segment {
            ACCEPT_MESSAGE_INTENT => Self::AcceptMessage,
            ACCEPT_KEY_INTENT => Self::AcceptKey,
            YES_INTENT => Self::Yes,
            NO_INTENT => Self::No,
            HELP_INTENT => Self::Help,
            CANCEL_INTENT => Self::Cancel,
            STOP_INTENT => Self::Stop,
            _ => Self::Other(trimmed.to_string()),
        }
    }
}
