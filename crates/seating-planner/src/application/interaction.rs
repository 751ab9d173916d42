//! LayoutController: turns canvas events into engine calls.
//!
//! The UI sends a stream of [`LayoutCommand`]s (pointer drags, drops, clicks)
//! and the controller applies each one synchronously to the
//! [`AssignmentEngine`].
//!
//! # Table drags
//!
//! ```text
//! BeginTableDrag ──► DragTo* ──► EndDrag
//!                        │
//!                        └────► CancelDrag   (table returns to its start)
//! ```
//!
//! Each drag position is the position the table had when the drag started
//! plus the total pointer delta since then, never a sum of per-frame deltas.
//! Dragged and nudged tables keep their center on the canvas.
//!
//! # Guest drops
//!
//! A drop with no seat under the pointer is a no-op ([`CommandOutcome::NoOp`]).
//! A drop on someone else's seat is an error ([`SeatingError::SeatOccupied`]).
//! The UI shows different feedback for the two.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use seating_core::{
    GuestId, GuestPatch, NewGuest, Point, SeatRef, SeatingError, TableId, TableShape,
};

use super::assignment::{AssignmentEngine, MoveOutcome};
use super::selection::Selection;

/// One UI event, already translated to canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutCommand {
    /// Adds a table; missing fields use the configured defaults.
    AddTable {
        #[serde(default)]
        shape: Option<TableShape>,
        #[serde(default)]
        capacity: Option<usize>,
        position: Point,
    },
    DeleteTable { table_id: TableId },
    ResizeTable { table_id: TableId, capacity: usize },
    ChangeShape { table_id: TableId, shape: TableShape },
    RotateTable { table_id: TableId, degrees: f64 },
    RenameTable { table_id: TableId, label: String },
    /// Nudges a table by `delta` (keyboard arrows, toolbar buttons).
    MoveTable { table_id: TableId, delta: Point },

    BeginTableDrag { table_id: TableId, pointer: Point },
    DragTo { pointer: Point },
    EndDrag { pointer: Point },
    CancelDrag,

    AddGuest { guest: NewGuest },
    UpdateGuest { guest_id: GuestId, patch: GuestPatch },
    RemoveGuest { guest_id: GuestId },
    /// Drop onto a seat the UI has already resolved.
    DropGuest { guest_id: GuestId, table_id: TableId, seat_index: usize },
    /// Drop at a canvas point; the seat is found by hit testing.
    DropGuestAt { guest_id: GuestId, pointer: Point },
    /// Drag a guest back onto the unseated list.
    UnseatGuest { guest_id: GuestId },

    SelectTable { table_id: TableId },
    SelectSeat { table_id: TableId, seat_index: usize },
    SelectGuest { guest_id: GuestId },
    ClearSelection,
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// The command was applied.
    Applied,
    /// The command had nothing to act on (e.g. a drop over empty canvas).
    NoOp,
    TableCreated { table_id: TableId },
    GuestCreated { guest_id: GuestId },
    GuestMoved { guest_id: GuestId, from: Option<SeatRef>, to: SeatRef },
    GuestUnseated { guest_id: GuestId, from: SeatRef },
    /// Guests that lost their seat because a table shrank or was deleted.
    GuestsDisplaced { guest_ids: Vec<GuestId> },
}

/// Tunables the controller needs from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSettings {
    pub default_shape: TableShape,
    pub default_capacity: usize,
    /// Grid size for snapping dragged tables; `0.0` disables snapping.
    pub grid_snap: f64,
    /// Canvas extent.  Moved tables are kept inside `0..=width`, `0..=height`.
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            default_shape: TableShape::Round,
            default_capacity: 8,
            grid_snap: 0.0,
            canvas_width: 1600.0,
            canvas_height: 1000.0,
        }
    }
}

/// An in-progress table drag.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TableDrag {
    table_id: TableId,
    pointer_start: Point,
    table_start: Point,
}

/// Applies [`LayoutCommand`]s to an [`AssignmentEngine`].
#[derive(Debug)]
pub struct LayoutController {
    engine: AssignmentEngine,
    settings: InteractionSettings,
    drag: Option<TableDrag>,
}

impl LayoutController {
    pub fn new(engine: AssignmentEngine, settings: InteractionSettings) -> Self {
        Self {
            engine,
            settings,
            drag: None,
        }
    }

    pub fn engine(&self) -> &AssignmentEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AssignmentEngine {
        &mut self.engine
    }

    /// The table currently being dragged, if any.
    pub fn dragging(&self) -> Option<TableId> {
        self.drag.map(|d| d.table_id)
    }

    /// Applies one command.
    ///
    /// # Errors
    ///
    /// Returns the engine's [`SeatingError`] unchanged; a failed command
    /// leaves the plan as it was.
    pub fn handle(&mut self, command: LayoutCommand) -> Result<CommandOutcome, SeatingError> {
        match command {
            LayoutCommand::AddTable { shape, capacity, position } => {
                let table_id = self.engine.create_table(
                    shape.unwrap_or(self.settings.default_shape),
                    capacity.unwrap_or(self.settings.default_capacity),
                    position,
                )?;
                Ok(CommandOutcome::TableCreated { table_id })
            }
            LayoutCommand::DeleteTable { table_id } => {
                let guest_ids = self.engine.delete_table(table_id)?;
                if self.dragging() == Some(table_id) {
                    self.drag = None;
                }
                Ok(displaced(guest_ids))
            }
            LayoutCommand::ResizeTable { table_id, capacity } => {
                let guest_ids = self.engine.change_capacity(table_id, capacity)?;
                Ok(displaced(guest_ids))
            }
            LayoutCommand::ChangeShape { table_id, shape } => {
                self.engine.change_table_shape(table_id, shape)?;
                Ok(CommandOutcome::Applied)
            }
            LayoutCommand::RotateTable { table_id, degrees } => {
                self.engine.rotate_table(table_id, degrees)?;
                Ok(CommandOutcome::Applied)
            }
            LayoutCommand::RenameTable { table_id, label } => {
                self.engine.rename_table(table_id, label)?;
                Ok(CommandOutcome::Applied)
            }
            LayoutCommand::MoveTable { table_id, delta } => {
                let current = self.table_position(table_id)?;
                self.engine.move_table(table_id, self.clamp(current.offset_by(delta)))?;
                Ok(CommandOutcome::Applied)
            }

            LayoutCommand::BeginTableDrag { table_id, pointer } => {
                let table_start = self.table_position(table_id)?;
                self.engine.select(Selection::Table { table_id })?;
                self.drag = Some(TableDrag {
                    table_id,
                    pointer_start: pointer,
                    table_start,
                });
                debug!(%table_id, "table drag started");
                Ok(CommandOutcome::Applied)
            }
            LayoutCommand::DragTo { pointer } => self.drag_to(pointer, false),
            LayoutCommand::EndDrag { pointer } => self.drag_to(pointer, true),
            LayoutCommand::CancelDrag => {
                let Some(drag) = self.drag.take() else {
                    return Ok(CommandOutcome::NoOp);
                };
                self.engine.move_table(drag.table_id, drag.table_start)?;
                debug!(table_id = %drag.table_id, "table drag cancelled");
                Ok(CommandOutcome::Applied)
            }

            LayoutCommand::AddGuest { guest } => {
                let guest_id = self.engine.add_guest(guest);
                Ok(CommandOutcome::GuestCreated { guest_id })
            }
            LayoutCommand::UpdateGuest { guest_id, patch } => {
                self.engine.update_guest(guest_id, patch)?;
                Ok(CommandOutcome::Applied)
            }
            LayoutCommand::RemoveGuest { guest_id } => {
                self.engine.remove_guest(guest_id)?;
                Ok(CommandOutcome::Applied)
            }
            LayoutCommand::DropGuest { guest_id, table_id, seat_index } => {
                self.drop_guest(guest_id, table_id, seat_index)
            }
            LayoutCommand::DropGuestAt { guest_id, pointer } => {
                match self.engine.plan().seat_at(pointer) {
                    Some(seat) => self.drop_guest(guest_id, seat.table_id, seat.seat_index),
                    None => {
                        debug!(
                            %guest_id,
                            x = pointer.x,
                            y = pointer.y,
                            "guest dropped outside any seat"
                        );
                        Ok(CommandOutcome::NoOp)
                    }
                }
            }
            LayoutCommand::UnseatGuest { guest_id } => {
                match self.engine.unassign_guest(guest_id)? {
                    Some(from) => Ok(CommandOutcome::GuestUnseated { guest_id, from }),
                    None => Ok(CommandOutcome::NoOp),
                }
            }

            LayoutCommand::SelectTable { table_id } => {
                self.engine.select(Selection::Table { table_id })?;
                Ok(CommandOutcome::Applied)
            }
            LayoutCommand::SelectSeat { table_id, seat_index } => {
                self.engine.select(Selection::Seat {
                    seat: SeatRef { table_id, seat_index },
                })?;
                Ok(CommandOutcome::Applied)
            }
            LayoutCommand::SelectGuest { guest_id } => {
                self.engine.select(Selection::Guest { guest_id })?;
                Ok(CommandOutcome::Applied)
            }
            LayoutCommand::ClearSelection => {
                self.engine.select(Selection::None)?;
                Ok(CommandOutcome::Applied)
            }
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn table_position(&self, table_id: TableId) -> Result<Point, SeatingError> {
        self.engine
            .plan()
            .table(table_id)
            .map(|t| t.position())
            .ok_or(SeatingError::TableNotFound(table_id))
    }

    fn drag_to(&mut self, pointer: Point, finish: bool) -> Result<CommandOutcome, SeatingError> {
        let Some(drag) = self.drag else {
            return Ok(CommandOutcome::NoOp);
        };
        if finish {
            self.drag = None;
        }
        let moved = drag.table_start.offset_by(pointer.delta_from(drag.pointer_start));
        let target = self.clamp(self.snap(moved));
        if let Err(e) = self.engine.move_table(drag.table_id, target) {
            self.drag = None;
            return Err(e);
        }
        Ok(CommandOutcome::Applied)
    }

    fn drop_guest(
        &mut self,
        guest_id: GuestId,
        table_id: TableId,
        seat_index: usize,
    ) -> Result<CommandOutcome, SeatingError> {
        match self.engine.move_guest_to_seat(guest_id, table_id, seat_index) {
            Ok(MoveOutcome::Moved { from, to }) => {
                Ok(CommandOutcome::GuestMoved { guest_id, from, to })
            }
            Ok(MoveOutcome::Unchanged { .. }) => Ok(CommandOutcome::NoOp),
            Err(e) => {
                warn!(%guest_id, %table_id, seat_index, error = %e, "guest drop rejected");
                Err(e)
            }
        }
    }

    fn snap(&self, p: Point) -> Point {
        let grid = self.settings.grid_snap;
        if grid <= 0.0 {
            return p;
        }
        Point::new((p.x / grid).round() * grid, (p.y / grid).round() * grid)
    }

    fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.max(0.0).min(self.settings.canvas_width),
            p.y.max(0.0).min(self.settings.canvas_height),
        )
    }
}

fn displaced(guest_ids: Vec<GuestId>) -> CommandOutcome {
    if guest_ids.is_empty() {
        CommandOutcome::Applied
    } else {
        CommandOutcome::GuestsDisplaced { guest_ids }
    }
}
