//! Infrastructure layer for the planner.
//!
//! Contains the I/O-facing adapters: the TOML config file, the plan store and
//! its background sync worker, and the UI command bridge.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `seating_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod persistence;
pub mod storage;
pub mod ui_bridge;
