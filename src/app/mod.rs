//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the sensing node: command
//! handling on the single control task, the periodic sampler, and the
//! indicator follower.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod indicator;
pub mod ports;
pub mod sampler;
pub mod service;
