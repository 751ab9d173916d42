//! # seating-core
//!
//! Domain library for the wedding table planner: table geometry, the seating
//! model, and group colors.
//!
//! It has zero dependencies on storage, UI frameworks, or network sockets;
//! those live in `seating-planner`.
//!
//! # Architecture overview
//!
//! The planner canvas shows tables of various shapes with numbered seats
//! around them.  Guests are dragged from a side panel onto seats.  This crate
//! defines:
//!
//! - **`domain::geometry`** – Where each seat sits relative to its table
//!   center, and how big a table is drawn, for each [`TableShape`].
//!
//! - **`domain::seating`** – The [`SeatingPlan`]: the authoritative set of
//!   tables, seats, and guests.  It guarantees a guest holds at most one seat
//!   and a table always has exactly `capacity` seats.
//!
//! - **`domain::snapshot`** / **`domain::view`** – Plain records for the
//!   hosted store and render data for the canvas.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `seating_core::SeatingPlan` instead of `seating_core::domain::seating::SeatingPlan`.
pub use domain::color::{group_color, GroupColor};
pub use domain::geometry::{footprint, rotate, seat_position, Footprint, Point, TableShape};
pub use domain::seating::{
    DietaryFlag, Guest, GuestId, GuestPatch, NewGuest, RsvpStatus, Seat, SeatRef, SeatingError,
    SeatingPlan, Table, TableId,
};
pub use domain::snapshot::{PlanSnapshot, TableRecord};
pub use domain::view::{SeatView, TableView};
