//! PoliteBox ritual controller library.
//!
//! Greet the box, hold a smile, and it opens.  Exposes the pure ritual
//! logic for integration testing and the host adapters used by the
//! `politebox` binary.

#![deny(unused_must_use)]

pub mod actuator;
pub mod adapters;
pub mod app;
pub mod config;
pub mod detect;
pub mod error;
pub mod frames;
pub mod fsm;
