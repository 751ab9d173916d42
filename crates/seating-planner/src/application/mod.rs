//! Application layer use cases for the planner.
//!
//! This layer sits between the domain model in `seating_core` and the
//! infrastructure (config files, the hosted store, the UI bridge).  It
//! performs no I/O: every use case runs synchronously against an in-memory
//! [`seating_core::SeatingPlan`] and reports which records changed so the
//! infrastructure can persist them.
//!
//! # Sub-modules
//!
//! - **`assignment`**  – Table and guest actions composed from plan
//!   primitives, plus the persistence outbox.
//!
//! - **`selection`**   – The single selected table, seat, or guest.
//!
//! - **`interaction`** – Canvas events (drags, drops, clicks) translated into
//!   assignment actions.

pub mod assignment;
pub mod interaction;
pub mod selection;
