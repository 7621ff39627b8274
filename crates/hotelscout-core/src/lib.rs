//! Hotelscout core: the conversation controller, session store, command
//! state machine, and the search execution strategies.
//!
//! The chat transport, calendar widget, and HTTP provider live behind the
//! boundaries in [`transport`] and [`search::service`]; everything in this
//! crate is transport-agnostic and unit-testable with mock collaborators.

pub mod command;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod search;
pub mod session;
pub mod transport;

pub use error::{Result, ScoutError};
