//! Application core: pure ritual logic, zero I/O.
//!
//! Greeting and smile detection feed the ritual FSM; its commands and UI
//! events leave through **port traits** defined in [`ports`], keeping this
//! layer fully testable without a camera or a box.

pub mod events;
pub mod inbox;
pub mod ports;
pub mod service;
