//! Domain entities for the table planner.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: no storage, no network, no UI toolkit.  Everything here can
//! be compiled and tested headlessly.
//!
//! Outer layers (the assignment engine, interaction controller, persistence
//! adapters) depend on the domain, but the domain never depends on them.

/// Footprints and seat coordinates per table shape.
pub mod geometry;

/// Tables, seats, guests, and the seat assignment relation.
///
/// See [`seating::SeatingPlan`] for the main type.
pub mod seating;

/// Group label → display color.
pub mod color;

/// Plain-data records for loading and saving a plan.
pub mod snapshot;

/// Render data and seat hit testing.
pub mod view;
