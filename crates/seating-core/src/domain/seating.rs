//! Seating plan domain entity.
//!
//! The [`SeatingPlan`] owns every table, seat, and guest, and is the only
//! place where seat assignments change.  It keeps two views of the same
//! relation in step:
//!
//! - each [`Seat`] holds an optional [`GuestId`] (lookup by table + index), and
//! - a reverse index maps each seated [`GuestId`] to its [`SeatRef`].
//!
//! Both are updated inside the same method call, so between calls the
//! following always holds:
//!
//! - `table.seats().len() == table.capacity()` for every table;
//! - a guest occupies at most one seat across the whole plan;
//! - the reverse index contains exactly the occupied seats.
//!
//! Every mutating method validates all of its preconditions before touching
//! any state, so a returned error means nothing changed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::geometry::{Point, TableShape};

/// Unique identifier of a table.
pub type TableId = Uuid;

/// Unique identifier of a guest.
pub type GuestId = Uuid;

/// Errors returned by seating plan operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SeatingError {
    #[error("table not found: {0}")]
    TableNotFound(TableId),

    #[error("seat {seat_index} not found on table {table_id}")]
    SeatNotFound { table_id: TableId, seat_index: usize },

    #[error("guest not found: {0}")]
    GuestNotFound(GuestId),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The target seat already holds a different guest.
    #[error("seat {seat_index} on table {table_id} is occupied by guest {occupant}")]
    SeatOccupied {
        table_id: TableId,
        seat_index: usize,
        occupant: GuestId,
    },

    /// The guest already holds another seat and must be unassigned first.
    #[error("guest {guest_id} is already seated at seat {seat_index} on table {table_id}")]
    GuestAlreadySeated {
        guest_id: GuestId,
        table_id: TableId,
        seat_index: usize,
    },
}

impl SeatingError {
    /// Returns `true` for the unknown table / seat / guest variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SeatingError::TableNotFound(_)
                | SeatingError::SeatNotFound { .. }
                | SeatingError::GuestNotFound(_)
        )
    }
}

/// Location of one seat: a table plus a zero-based seat index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatRef {
    pub table_id: TableId,
    pub seat_index: usize,
}

// ── Guests ────────────────────────────────────────────────────────────────────

/// RSVP state of a guest.  Informational only; it never affects seating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Confirmed,
    #[default]
    Pending,
    Declined,
}

/// Dietary requirement shown next to a seated guest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryFlag {
    Vegetarian,
    Vegan,
    GlutenFree,
    NutAllergy,
    Other(String),
}

/// A wedding guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub id: GuestId,
    /// Display name.
    pub name: String,
    /// Free-text group label; drives the seat color.
    #[serde(default)]
    pub group: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dietary: Vec<DietaryFlag>,
    #[serde(default)]
    pub rsvp: RsvpStatus,
}

/// Input for [`SeatingPlan::add_guest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewGuest {
    pub name: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub dietary: Vec<DietaryFlag>,
    #[serde(default)]
    pub rsvp: RsvpStatus,
}

impl NewGuest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }
}

/// Partial update for [`SeatingPlan::update_guest`]; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuestPatch {
    pub name: Option<String>,
    pub group: Option<String>,
    pub dietary: Option<Vec<DietaryFlag>>,
    pub rsvp: Option<RsvpStatus>,
}

// ── Tables and seats ──────────────────────────────────────────────────────────

/// One occupiable slot at a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    index: usize,
    guest: Option<GuestId>,
}

impl Seat {
    fn empty(index: usize) -> Self {
        Self { index, guest: None }
    }

    /// Zero-based position of this seat at its table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The guest sitting here, if any.
    pub fn guest(&self) -> Option<GuestId> {
        self.guest
    }

    pub fn is_empty(&self) -> bool {
        self.guest.is_none()
    }
}

/// A table on the planner canvas.
///
/// Fields are private so the seat list can only change through
/// [`SeatingPlan`]; the capacity *is* the seat count.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    id: TableId,
    label: String,
    shape: TableShape,
    position: Point,
    rotation: f64,
    seats: Vec<Seat>,
}

impl Table {
    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shape(&self) -> TableShape {
        self.shape
    }

    /// Center of the table in canvas units.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Rotation in degrees, always in `0.0..360.0`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn capacity(&self) -> usize {
        self.seats.len()
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, seat_index: usize) -> Option<&Seat> {
        self.seats.get(seat_index)
    }

    /// Seats that currently hold a guest.
    pub fn occupied_seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter(|s| !s.is_empty())
    }

    fn seated_guests(&self) -> impl Iterator<Item = GuestId> + '_ {
        self.seats.iter().filter_map(Seat::guest)
    }
}

/// Normalizes an angle in degrees into `0.0..360.0`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

// ── Seating plan ──────────────────────────────────────────────────────────────

/// Authoritative table / seat / guest state.
#[derive(Debug, Default, Clone)]
pub struct SeatingPlan {
    tables: HashMap<TableId, Table>,
    /// Creation order; also the rendering order (last is topmost).
    table_order: Vec<TableId>,
    guests: HashMap<GuestId, Guest>,
    guest_order: Vec<GuestId>,
    /// Reverse index: seated guest → seat.
    seat_index: HashMap<GuestId, SeatRef>,
    /// Tables ever created, for default labels.
    tables_created: usize,
}

impl SeatingPlan {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Tables ────────────────────────────────────────────────────────────────

    /// Creates a table with `capacity` empty seats and a default label.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::InvalidArgument`] if `capacity` is zero.
    pub fn add_table(
        &mut self,
        shape: TableShape,
        capacity: usize,
        position: Point,
    ) -> Result<&Table, SeatingError> {
        validate_capacity(capacity)?;
        let label = format!("Table {}", self.tables_created + 1);
        let table = Table {
            id: Uuid::new_v4(),
            label,
            shape,
            position,
            rotation: 0.0,
            seats: (0..capacity).map(Seat::empty).collect(),
        };
        debug!(table_id = %table.id, %shape, capacity, "table added");
        Ok(self.insert_table(table))
    }

    /// Unassigns every guest seated at the table, then deletes it.
    ///
    /// Returns the guests that lost their seat.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::TableNotFound`] if no table has that id.
    pub fn remove_table(&mut self, table_id: TableId) -> Result<Vec<GuestId>, SeatingError> {
        let table = self
            .tables
            .remove(&table_id)
            .ok_or(SeatingError::TableNotFound(table_id))?;
        let unseated: Vec<GuestId> = table.seated_guests().collect();
        for guest_id in &unseated {
            self.seat_index.remove(guest_id);
        }
        self.table_order.retain(|id| *id != table_id);
        debug!(%table_id, unseated = unseated.len(), "table removed");
        Ok(unseated)
    }

    /// Changes the number of seats at a table.
    ///
    /// Shrinking first unassigns guests in seats at indices `>= new_capacity`,
    /// then truncates; growing appends empty seats.  Returns the guests that
    /// lost their seat.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::InvalidArgument`] if `new_capacity` is zero and
    /// [`SeatingError::TableNotFound`] if the table does not exist.
    pub fn resize_table(
        &mut self,
        table_id: TableId,
        new_capacity: usize,
    ) -> Result<Vec<GuestId>, SeatingError> {
        validate_capacity(new_capacity)?;
        let table = self
            .tables
            .get_mut(&table_id)
            .ok_or(SeatingError::TableNotFound(table_id))?;

        let old_capacity = table.seats.len();
        let mut unseated = Vec::new();
        if new_capacity < old_capacity {
            unseated.extend(table.seats[new_capacity..].iter().filter_map(Seat::guest));
            table.seats.truncate(new_capacity);
        } else {
            table.seats.extend((old_capacity..new_capacity).map(Seat::empty));
        }
        for guest_id in &unseated {
            self.seat_index.remove(guest_id);
        }
        debug!(%table_id, old_capacity, new_capacity, unseated = unseated.len(), "table resized");
        Ok(unseated)
    }

    /// Changes the table shape.  Seat assignments are unaffected.
    pub fn set_shape(&mut self, table_id: TableId, shape: TableShape) -> Result<(), SeatingError> {
        self.table_mut(table_id)?.shape = shape;
        debug!(%table_id, %shape, "table shape changed");
        Ok(())
    }

    /// Moves the table center.  Seat assignments are unaffected.
    pub fn set_position(&mut self, table_id: TableId, position: Point) -> Result<(), SeatingError> {
        self.table_mut(table_id)?.position = position;
        Ok(())
    }

    /// Sets the rotation, wrapping any angle into `0.0..360.0`.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::InvalidArgument`] for a non-finite angle.
    pub fn set_rotation(&mut self, table_id: TableId, degrees: f64) -> Result<(), SeatingError> {
        if !degrees.is_finite() {
            return Err(SeatingError::InvalidArgument(format!(
                "rotation must be finite, got {degrees}"
            )));
        }
        self.table_mut(table_id)?.rotation = normalize_rotation(degrees);
        Ok(())
    }

    pub fn rename_table(
        &mut self,
        table_id: TableId,
        label: impl Into<String>,
    ) -> Result<(), SeatingError> {
        self.table_mut(table_id)?.label = label.into();
        Ok(())
    }

    pub fn table(&self, table_id: TableId) -> Option<&Table> {
        self.tables.get(&table_id)
    }

    /// All tables in creation order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.table_order.iter().filter_map(move |id| self.tables.get(id))
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    // ── Guests ────────────────────────────────────────────────────────────────

    /// Registers a new, unseated guest.
    pub fn add_guest(&mut self, guest: NewGuest) -> GuestId {
        let id = Uuid::new_v4();
        self.guests.insert(
            id,
            Guest {
                id,
                name: guest.name,
                group: guest.group,
                dietary: guest.dietary,
                rsvp: guest.rsvp,
            },
        );
        self.guest_order.push(id);
        debug!(guest_id = %id, "guest added");
        id
    }

    /// Applies a partial update to a guest's details.
    pub fn update_guest(
        &mut self,
        guest_id: GuestId,
        patch: GuestPatch,
    ) -> Result<(), SeatingError> {
        let guest = self
            .guests
            .get_mut(&guest_id)
            .ok_or(SeatingError::GuestNotFound(guest_id))?;
        if let Some(name) = patch.name {
            guest.name = name;
        }
        if let Some(group) = patch.group {
            guest.group = group;
        }
        if let Some(dietary) = patch.dietary {
            guest.dietary = dietary;
        }
        if let Some(rsvp) = patch.rsvp {
            guest.rsvp = rsvp;
        }
        Ok(())
    }

    /// Unassigns the guest (if seated) and deletes it.
    ///
    /// Returns the removed guest and the seat it vacated.
    pub fn remove_guest(
        &mut self,
        guest_id: GuestId,
    ) -> Result<(Guest, Option<SeatRef>), SeatingError> {
        let vacated = self.unassign_guest(guest_id)?;
        let guest = self
            .guests
            .remove(&guest_id)
            .ok_or(SeatingError::GuestNotFound(guest_id))?;
        self.guest_order.retain(|id| *id != guest_id);
        debug!(%guest_id, "guest removed");
        Ok((guest, vacated))
    }

    pub fn guest(&self, guest_id: GuestId) -> Option<&Guest> {
        self.guests.get(&guest_id)
    }

    /// All guests in insertion order.
    pub fn guests(&self) -> impl Iterator<Item = &Guest> {
        self.guest_order.iter().filter_map(move |id| self.guests.get(id))
    }

    /// Guests without a seat, in insertion order.
    pub fn unseated_guests(&self) -> impl Iterator<Item = &Guest> {
        self.guests().filter(move |g| !self.seat_index.contains_key(&g.id))
    }

    pub fn guest_count(&self) -> usize {
        self.guests.len()
    }

    // ── Assignments ───────────────────────────────────────────────────────────

    /// Seats `guest_id` at `seat_index` of `table_id`.
    ///
    /// Assigning a guest to the seat it already holds is a no-op.
    ///
    /// # Errors
    ///
    /// - [`SeatingError::TableNotFound`], [`SeatingError::SeatNotFound`],
    ///   [`SeatingError::GuestNotFound`] for unknown ids.
    /// - [`SeatingError::SeatOccupied`] if a different guest holds the seat.
    /// - [`SeatingError::GuestAlreadySeated`] if the guest holds another seat.
    pub fn assign_guest(
        &mut self,
        table_id: TableId,
        seat_index: usize,
        guest_id: GuestId,
    ) -> Result<(), SeatingError> {
        let occupant = self.occupant(table_id, seat_index)?;
        if !self.guests.contains_key(&guest_id) {
            return Err(SeatingError::GuestNotFound(guest_id));
        }
        match occupant {
            Some(current) if current == guest_id => return Ok(()),
            Some(current) => {
                return Err(SeatingError::SeatOccupied {
                    table_id,
                    seat_index,
                    occupant: current,
                })
            }
            None => {}
        }
        if let Some(prior) = self.seat_index.get(&guest_id) {
            return Err(SeatingError::GuestAlreadySeated {
                guest_id,
                table_id: prior.table_id,
                seat_index: prior.seat_index,
            });
        }

        // Preconditions hold; both writes below cannot fail.
        if let Some(seat) = self
            .tables
            .get_mut(&table_id)
            .and_then(|t| t.seats.get_mut(seat_index))
        {
            seat.guest = Some(guest_id);
        }
        self.seat_index.insert(guest_id, SeatRef { table_id, seat_index });
        debug!(%guest_id, %table_id, seat_index, "guest assigned");
        Ok(())
    }

    /// Clears the guest's seat.  Returns the vacated seat, or `None` when the
    /// guest was not seated (which is not an error).
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::GuestNotFound`] for an unknown guest.
    pub fn unassign_guest(&mut self, guest_id: GuestId) -> Result<Option<SeatRef>, SeatingError> {
        if !self.guests.contains_key(&guest_id) {
            return Err(SeatingError::GuestNotFound(guest_id));
        }
        let Some(seat_ref) = self.seat_index.remove(&guest_id) else {
            return Ok(None);
        };
        if let Some(seat) = self
            .tables
            .get_mut(&seat_ref.table_id)
            .and_then(|t| t.seats.get_mut(seat_ref.seat_index))
        {
            seat.guest = None;
        }
        debug!(
            %guest_id,
            table_id = %seat_ref.table_id,
            seat_index = seat_ref.seat_index,
            "guest unassigned"
        );
        Ok(Some(seat_ref))
    }

    pub fn is_guest_seated(&self, guest_id: GuestId) -> bool {
        self.seat_index.contains_key(&guest_id)
    }

    /// Where the guest sits, via the reverse index.
    pub fn seat_of(&self, guest_id: GuestId) -> Option<SeatRef> {
        self.seat_index.get(&guest_id).copied()
    }

    /// The guest in a given seat.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::TableNotFound`] or [`SeatingError::SeatNotFound`]
    /// when the seat does not exist.
    pub fn occupant(
        &self,
        table_id: TableId,
        seat_index: usize,
    ) -> Result<Option<GuestId>, SeatingError> {
        let table = self
            .tables
            .get(&table_id)
            .ok_or(SeatingError::TableNotFound(table_id))?;
        table
            .seat(seat_index)
            .map(Seat::guest)
            .ok_or(SeatingError::SeatNotFound { table_id, seat_index })
    }

    /// Number of guests currently holding a seat.
    pub fn seated_count(&self) -> usize {
        self.seat_index.len()
    }

    // ── Crate-internal helpers ────────────────────────────────────────────────

    /// Inserts a fully built table, keeping creation order.
    pub(crate) fn insert_table(&mut self, table: Table) -> &Table {
        let id = table.id;
        self.tables_created += 1;
        self.table_order.push(id);
        self.tables.entry(id).or_insert(table)
    }

    pub(crate) fn insert_guest(&mut self, guest: Guest) {
        self.guest_order.push(guest.id);
        self.guests.insert(guest.id, guest);
    }

    pub(crate) fn build_table(
        id: TableId,
        label: String,
        shape: TableShape,
        position: Point,
        rotation: f64,
        occupants: &[Option<GuestId>],
    ) -> Table {
        Table {
            id,
            label,
            shape,
            position,
            rotation: normalize_rotation(rotation),
            seats: occupants
                .iter()
                .enumerate()
                .map(|(index, guest)| Seat { index, guest: *guest })
                .collect(),
        }
    }

    /// Records an assignment that the caller has already validated.
    pub(crate) fn index_seat(&mut self, guest_id: GuestId, seat_ref: SeatRef) {
        self.seat_index.insert(guest_id, seat_ref);
    }

    fn table_mut(&mut self, table_id: TableId) -> Result<&mut Table, SeatingError> {
        self.tables
            .get_mut(&table_id)
            .ok_or(SeatingError::TableNotFound(table_id))
    }
}

fn validate_capacity(capacity: usize) -> Result<(), SeatingError> {
    if capacity < 1 {
        return Err(SeatingError::InvalidArgument(
            "table capacity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
