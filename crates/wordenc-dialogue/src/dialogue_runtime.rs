use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::dialogue_contract::{TurnRequest, TurnResponse};
use crate::dialogue_controller::DialogueController;
use crate::session_store::SessionStore;

/// Controller plus the store that carries attributes between turns.
pub struct DialogueRuntime {
    controller: DialogueController,
    store: Arc<dyn SessionStore>,
}

impl DialogueRuntime {
    pub fn new(controller: DialogueController, store: Arc<dyn SessionStore>) -> Self {
        Self { controller, store }
    }

    pub fn controller(&self) -> &DialogueController {
        &self.controller
    }

    /// Loads, dispatches and persists one turn.
    ///
    /// Attributes carried on the request win over the store. Unchanged
    /// attributes are not written back, which covers terminal turns, help,
    /// verbatim fallback and service failures.
    pub async fn run_turn(&self, request: TurnRequest) -> Result<TurnResponse> {
        if request.session_id.trim().is_empty() {
            bail!("turn request session_id must not be empty");
        }
        let mut request = request;
        if request.stored_attributes.is_empty() {
            request.stored_attributes = self
                .store
                .load(&request.session_id)
                .with_context(|| format!("failed to load session '{}'", request.session_id))?;
        }

        let response = self.controller.handle_turn(&request).await;
        if response.updated_attributes != request.stored_attributes {
            self.store
                .save(&request.session_id, &response.updated_attributes)
                .with_context(|| format!("failed to save session '{}'", request.session_id))?;
            tracing::debug!(
                session_id = %request.session_id,
                attribute_count = response.updated_attributes.len(),
                "persisted session attributes"
            );
        }
        Ok(response)
    }
}
