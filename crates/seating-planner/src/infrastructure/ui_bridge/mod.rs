//! Command bridge between the planner UI and the application layer.
//!
//! The UI sends [`LayoutCommand`]s as JSON and reads back a
//! [`CommandResult`] plus a [`PlannerStateDto`] to re-render.  Every response
//! has the same shape, `{ success, data, error }`, so the frontend never has
//! to catch exceptions around a command call.
//!
//! [`PlannerSession`] is the single owner of the controller.  After every
//! successful command it drains the engine's persistence outbox into the
//! optional [`SyncQueue`]; the UI never waits on the store.

use serde::{Deserialize, Serialize};
use tracing::debug;

use seating_core::{Guest, PlanSnapshot, SeatingPlan, TableView};

use crate::application::{
    assignment::AssignmentEngine,
    interaction::{CommandOutcome, LayoutCommand, LayoutController},
    selection::Selection,
};
use crate::infrastructure::{persistence::sync::SyncQueue, storage::config::AppConfig};

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// Everything the canvas and the guest panel need to re-render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerStateDto {
    pub tables: Vec<TableView>,
    pub unseated_guests: Vec<Guest>,
    pub selection: Selection,
    pub seated_count: usize,
    pub guest_count: usize,
}

/// Unified response wrapper used by every command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One open plan: the controller plus where its changes are sent.
#[derive(Debug)]
pub struct PlannerSession {
    controller: LayoutController,
    sync: Option<SyncQueue>,
}

impl PlannerSession {
    /// Opens `plan` with the limits and defaults from `config`.
    pub fn new(plan: SeatingPlan, config: &AppConfig, sync: Option<SyncQueue>) -> Self {
        let engine = AssignmentEngine::new(plan, config.engine_limits());
        Self {
            controller: LayoutController::new(engine, config.interaction_settings()),
            sync,
        }
    }

    /// Applies one command and forwards the resulting changes to the store.
    pub fn dispatch(&mut self, command: LayoutCommand) -> CommandResult<CommandOutcome> {
        let result = self.controller.handle(command);
        let ops = self.controller.engine_mut().take_persist_ops();
        match result {
            Ok(outcome) => {
                if let Some(queue) = &self.sync {
                    let queued = queue.enqueue(self.controller.engine().plan(), ops);
                    debug!(queued, "changes queued for sync");
                }
                CommandResult::ok(outcome)
            }
            Err(e) => CommandResult::err(e.to_string()),
        }
    }

    /// Parses a JSON command and dispatches it.
    pub fn dispatch_json(&mut self, json: &str) -> CommandResult<CommandOutcome> {
        match serde_json::from_str::<LayoutCommand>(json) {
            Ok(command) => self.dispatch(command),
            Err(e) => CommandResult::err(format!("invalid command: {e}")),
        }
    }

    /// Current render state.
    pub fn state(&self) -> PlannerStateDto {
        let engine = self.controller.engine();
        let plan = engine.plan();
        PlannerStateDto {
            tables: plan.views(),
            unseated_guests: plan.unseated_guests().cloned().collect(),
            selection: engine.selection(),
            seated_count: plan.seated_count(),
            guest_count: plan.guest_count(),
        }
    }

    pub fn plan(&self) -> &SeatingPlan {
        self.controller.engine().plan()
    }

    pub fn snapshot(&self) -> PlanSnapshot {
        self.plan().snapshot()
    }

    /// Closes the session, returning its sync queue so the caller can drop it
    /// and wait for the worker.
    pub fn into_sync(self) -> Option<SyncQueue> {
        self.sync
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
