//! Command definitions and the conversation state machine table.

pub mod model;
pub mod registry;

pub use model::{CommandDefinition, CommandKind, DialogState};
pub use registry::{definition_for, COMMANDS};
