//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for a PropSense board: round
//! orchestration, cue dispatch, and the supervisor that chains rounds
//! forever. All interaction with hardware and the network happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
pub mod supervisor;
