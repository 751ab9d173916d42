//! AssignmentEngine: user-facing table and seating actions.
//!
//! The engine composes [`SeatingPlan`] primitives into the actions the planner
//! UI offers (create a table, drag a guest onto a seat, shrink a table, ...),
//! keeps the UI selection consistent with the plan, and records which
//! records the caller has to push to the hosted store afterwards.
//!
//! # Moving guests
//!
//! The low-level [`SeatingPlan::assign_guest`] refuses to seat a guest who
//! already has a seat.  [`AssignmentEngine::move_guest_to_seat`] is the only
//! path that changes a guest's seat: it validates the target first, then
//! unassigns the old seat and assigns the new one.  It never bumps an
//! occupant; dropping onto someone else's seat is rejected.
//!
//! # Persistence
//!
//! Mutations are applied locally and synchronously.  Each one appends
//! [`PersistOp`]s to an outbox that the caller drains with
//! [`AssignmentEngine::take_persist_ops`] and forwards to the store.

use serde::{Deserialize, Serialize};
use tracing::info;

use seating_core::{
    GuestId, GuestPatch, NewGuest, Point, SeatRef, SeatingError, SeatingPlan, TableId, TableShape,
};

use super::selection::Selection;

/// Default upper bound on seats per table.
pub const DEFAULT_MAX_CAPACITY: usize = 24;

/// A record the hosted store must be told about after a local change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "id", rename_all = "snake_case")]
pub enum PersistOp {
    SaveTable(TableId),
    SaveGuest(GuestId),
    DeleteTable(TableId),
    DeleteGuest(GuestId),
}

/// Limits the engine enforces on top of the model's own invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineLimits {
    pub max_capacity: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

/// Result of [`AssignmentEngine::move_guest_to_seat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The guest now sits at `to`; `from` is the seat they left, if any.
    Moved { from: Option<SeatRef>, to: SeatRef },
    /// The guest was dropped on the seat they already hold.
    Unchanged { seat: SeatRef },
}

/// Owns the seating plan and the UI selection, and applies user actions.
#[derive(Debug, Default)]
pub struct AssignmentEngine {
    plan: SeatingPlan,
    selection: Selection,
    limits: EngineLimits,
    outbox: Vec<PersistOp>,
}

impl AssignmentEngine {
    pub fn new(plan: SeatingPlan, limits: EngineLimits) -> Self {
        Self {
            plan,
            selection: Selection::None,
            limits,
            outbox: Vec::new(),
        }
    }

    pub fn plan(&self) -> &SeatingPlan {
        &self.plan
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn limits(&self) -> EngineLimits {
        self.limits
    }

    /// Replaces the current selection.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the selection names something that does
    /// not exist; the previous selection is kept.
    pub fn select(&mut self, selection: Selection) -> Result<(), SeatingError> {
        match selection {
            Selection::None => {}
            Selection::Table { table_id } => {
                self.plan
                    .table(table_id)
                    .ok_or(SeatingError::TableNotFound(table_id))?;
            }
            Selection::Seat { seat } => {
                self.plan.occupant(seat.table_id, seat.seat_index)?;
            }
            Selection::Guest { guest_id } => {
                self.plan
                    .guest(guest_id)
                    .ok_or(SeatingError::GuestNotFound(guest_id))?;
            }
        }
        self.selection = selection;
        Ok(())
    }

    /// Drains the records changed since the last call, in change order.
    pub fn take_persist_ops(&mut self) -> Vec<PersistOp> {
        std::mem::take(&mut self.outbox)
    }

    // ── Tables ────────────────────────────────────────────────────────────────

    /// Creates a table and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::InvalidArgument`] if `capacity` is zero or above
    /// the configured maximum.
    pub fn create_table(
        &mut self,
        shape: TableShape,
        capacity: usize,
        position: Point,
    ) -> Result<TableId, SeatingError> {
        self.check_max_capacity(capacity)?;
        let table_id = self.plan.add_table(shape, capacity, position)?.id();
        info!(%table_id, %shape, capacity, "table created");
        self.record(PersistOp::SaveTable(table_id));
        Ok(table_id)
    }

    /// Deletes a table, unseating its guests and dropping any selection of it.
    ///
    /// Returns the guests that lost their seat.
    pub fn delete_table(&mut self, table_id: TableId) -> Result<Vec<GuestId>, SeatingError> {
        let unseated = self.plan.remove_table(table_id)?;
        self.selection.forget_table(table_id);
        info!(%table_id, unseated = unseated.len(), "table deleted");
        self.record(PersistOp::DeleteTable(table_id));
        Ok(unseated)
    }

    /// Changes the table shape.  Seat coordinates are re-derived on next read.
    pub fn change_table_shape(
        &mut self,
        table_id: TableId,
        shape: TableShape,
    ) -> Result<(), SeatingError> {
        self.plan.set_shape(table_id, shape)?;
        self.record(PersistOp::SaveTable(table_id));
        Ok(())
    }

    /// Changes the number of seats, unseating guests in removed seats.
    ///
    /// Returns the guests that lost their seat.
    pub fn change_capacity(
        &mut self,
        table_id: TableId,
        capacity: usize,
    ) -> Result<Vec<GuestId>, SeatingError> {
        self.check_max_capacity(capacity)?;
        let unseated = self.plan.resize_table(table_id, capacity)?;
        self.selection.forget_seats_from(table_id, capacity);
        info!(%table_id, capacity, unseated = unseated.len(), "table capacity changed");
        self.record(PersistOp::SaveTable(table_id));
        Ok(unseated)
    }

    /// Moves a table.  Seats and guests are untouched.
    pub fn move_table(&mut self, table_id: TableId, position: Point) -> Result<(), SeatingError> {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return Err(SeatingError::InvalidArgument(
                "table position must be finite".to_string(),
            ));
        }
        self.plan.set_position(table_id, position)?;
        self.record(PersistOp::SaveTable(table_id));
        Ok(())
    }

    pub fn rotate_table(&mut self, table_id: TableId, degrees: f64) -> Result<(), SeatingError> {
        self.plan.set_rotation(table_id, degrees)?;
        self.record(PersistOp::SaveTable(table_id));
        Ok(())
    }

    pub fn rename_table(&mut self, table_id: TableId, label: String) -> Result<(), SeatingError> {
        self.plan.rename_table(table_id, label)?;
        self.record(PersistOp::SaveTable(table_id));
        Ok(())
    }

    // ── Guests ────────────────────────────────────────────────────────────────

    pub fn add_guest(&mut self, guest: NewGuest) -> GuestId {
        let guest_id = self.plan.add_guest(guest);
        self.record(PersistOp::SaveGuest(guest_id));
        guest_id
    }

    pub fn update_guest(
        &mut self,
        guest_id: GuestId,
        patch: GuestPatch,
    ) -> Result<(), SeatingError> {
        self.plan.update_guest(guest_id, patch)?;
        self.record(PersistOp::SaveGuest(guest_id));
        Ok(())
    }

    /// Deletes a guest, vacating their seat first.
    pub fn remove_guest(&mut self, guest_id: GuestId) -> Result<(), SeatingError> {
        let (_, vacated) = self.plan.remove_guest(guest_id)?;
        self.selection.forget_guest(guest_id);
        if let Some(seat) = vacated {
            self.selection_forget_seat(seat);
            self.record(PersistOp::SaveTable(seat.table_id));
        }
        self.record(PersistOp::DeleteGuest(guest_id));
        Ok(())
    }

    // ── Seating ───────────────────────────────────────────────────────────────

    /// Seats a guest at a specific seat, leaving any previous seat.
    ///
    /// Dropping a guest onto the seat they already hold is a no-op.
    ///
    /// # Errors
    ///
    /// - Not-found errors for an unknown guest, table, or seat.
    /// - [`SeatingError::SeatOccupied`] if another guest holds the target seat;
    ///   the occupant is never displaced.
    ///
    /// On error nothing changes.
    pub fn move_guest_to_seat(
        &mut self,
        guest_id: GuestId,
        table_id: TableId,
        seat_index: usize,
    ) -> Result<MoveOutcome, SeatingError> {
        let target = SeatRef { table_id, seat_index };
        let occupant = self.plan.occupant(table_id, seat_index)?;
        if self.plan.guest(guest_id).is_none() {
            return Err(SeatingError::GuestNotFound(guest_id));
        }
        match occupant {
            Some(current) if current == guest_id => {
                return Ok(MoveOutcome::Unchanged { seat: target })
            }
            Some(current) => {
                return Err(SeatingError::SeatOccupied {
                    table_id,
                    seat_index,
                    occupant: current,
                })
            }
            None => {}
        }

        // Target validated: the unassign/assign pair below cannot fail halfway.
        let from = self.plan.unassign_guest(guest_id)?;
        self.plan.assign_guest(table_id, seat_index, guest_id)?;

        if let Some(prior) = from {
            if prior.table_id != table_id {
                self.record(PersistOp::SaveTable(prior.table_id));
            }
        }
        self.record(PersistOp::SaveTable(table_id));
        info!(%guest_id, %table_id, seat_index, "guest moved to seat");
        Ok(MoveOutcome::Moved { from, to: target })
    }

    /// Sends a guest back to the unseated list.  Unseating an unseated guest
    /// is a no-op that returns `None`.
    pub fn unassign_guest(&mut self, guest_id: GuestId) -> Result<Option<SeatRef>, SeatingError> {
        let vacated = self.plan.unassign_guest(guest_id)?;
        if let Some(seat) = vacated {
            self.record(PersistOp::SaveTable(seat.table_id));
        }
        Ok(vacated)
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn check_max_capacity(&self, capacity: usize) -> Result<(), SeatingError> {
        if capacity > self.limits.max_capacity {
            return Err(SeatingError::InvalidArgument(format!(
                "table capacity {capacity} exceeds the maximum of {}",
                self.limits.max_capacity
            )));
        }
        Ok(())
    }

    fn selection_forget_seat(&mut self, seat: SeatRef) {
        if self.selection.seat() == Some(seat) {
            self.selection = Selection::None;
        }
    }

    /// Appends to the outbox, skipping an op already waiting there.
    fn record(&mut self, op: PersistOp) {
        if !self.outbox.contains(&op) {
            self.outbox.push(op);
        }
    }
}
