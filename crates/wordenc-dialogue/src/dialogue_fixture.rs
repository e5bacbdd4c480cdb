//! Scripted conversations replayed through a [`DialogueRuntime`].
//!
//! A fixture lists the turns of one session and what each response must look
//! like. Replay stops at the first mismatch and names the turn.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::dialogue_contract::{TurnEvent, TurnRequest, TurnSlots};
use crate::dialogue_runtime::DialogueRuntime;
use crate::session_state::DialogueState;

pub const DIALOGUE_FIXTURE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogueTurnExpectation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<DialogueState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoken_contains: Option<String>,
    #[serde(default)]
    pub end_session: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogueFixtureTurn {
    pub turn_id: String,
    pub event: TurnEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub expected: DialogueTurnExpectation,
}

impl DialogueFixtureTurn {
    fn to_request(&self, session_id: &str) -> TurnRequest {
        TurnRequest {
            session_id: session_id.to_string(),
            event: self.event,
            event_name: self.event_name.clone(),
            slots: TurnSlots {
                message: self.message.clone(),
                key: self.key.clone(),
            },
            stored_attributes: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogueFixture {
    pub schema_version: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub session_id: String,
    pub turns: Vec<DialogueFixtureTurn>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplaySummary {
    pub fixture: String,
    pub turns: usize,
    pub matched: usize,
    pub state_changes: usize,
    pub terminal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_state: Option<DialogueState>,
}

pub fn parse_dialogue_fixture(raw: &str) -> Result<DialogueFixture> {
    let fixture = serde_json::from_str::<DialogueFixture>(raw)
        .context("failed to parse dialogue fixture")?;
    validate_dialogue_fixture(&fixture)?;
    Ok(fixture)
}

pub fn load_dialogue_fixture(path: &Path) -> Result<DialogueFixture> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture {}", path.display()))?;
    parse_dialogue_fixture(&raw).with_context(|| format!("invalid fixture {}", path.display()))
}

pub fn validate_dialogue_fixture(fixture: &DialogueFixture) -> Result<()> {
    if fixture.schema_version != DIALOGUE_FIXTURE_SCHEMA_VERSION {
        bail!(
            "unsupported dialogue fixture schema version {} (expected {})",
            fixture.schema_version,
            DIALOGUE_FIXTURE_SCHEMA_VERSION
        );
    }
    if fixture.name.trim().is_empty() {
        bail!("fixture name cannot be empty");
    }
    if fixture.session_id.trim().is_empty() {
        bail!("fixture session_id cannot be empty");
    }
    if fixture.turns.is_empty() {
        bail!("fixture must include at least one turn");
    }

    let mut turn_ids = HashSet::new();
    for (index, turn) in fixture.turns.iter().enumerate() {
        let turn_id = turn.turn_id.trim();
        if turn_id.is_empty() {
            bail!("fixture turn index {index} has an empty turn_id");
        }
        if !turn_ids.insert(turn_id.to_string()) {
            bail!("fixture contains duplicate turn_id '{turn_id}'");
        }
        let has_event_name = turn
            .event_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        match turn.event {
            TurnEvent::Recognized if !has_event_name => {
                bail!("fixture turn '{turn_id}' is recognized but has no event_name")
            }
            TurnEvent::Start | TurnEvent::End if has_event_name => {
                bail!(
                    "fixture turn '{turn_id}' sets event_name on a {} event",
                    turn.event.as_str()
                )
            }
            _ => {}
        }
    }
    Ok(())
}

pub async fn replay_dialogue_fixture(
    runtime: &DialogueRuntime,
    fixture: &DialogueFixture,
) -> Result<ReplaySummary> {
    validate_dialogue_fixture(fixture)?;
    let mut summary = ReplaySummary {
        fixture: fixture.name.clone(),
        turns: fixture.turns.len(),
        ..ReplaySummary::default()
    };

    for turn in &fixture.turns {
        let response = runtime
            .run_turn(turn.to_request(&fixture.session_id))
            .await
            .with_context(|| format!("turn '{}' failed", turn.turn_id))?;
        let state = response.dialogue_state();

        let expected = &turn.expected;
        if let Some(expected_state) = expected.state {
            if state != Some(expected_state) {
                bail!(
                    "turn '{}' expected state {} but found {}",
                    turn.turn_id,
                    expected_state.as_str(),
                    state.map(|state| state.as_str()).unwrap_or("none")
                );
            }
        }
        if let Some(fragment) = expected.spoken_contains.as_deref() {
            if !response.spoken_text.contains(fragment) {
                bail!(
                    "turn '{}' spoken text does not contain '{}': {}",
                    turn.turn_id,
                    fragment,
                    response.spoken_text
                );
            }
        }
        if response.end_session != expected.end_session {
            bail!(
                "turn '{}' expected end_session={} but found {}",
                turn.turn_id,
                expected.end_session,
                response.end_session
            );
        }

        summary.matched = summary.matched.saturating_add(1);
        if !response.end_session && state != summary.final_state {
            summary.state_changes = summary.state_changes.saturating_add(1);
            summary.final_state = state;
        }
        if response.end_session {
            summary.terminal = true;
            break;
        }
    }
    Ok(summary)
}
