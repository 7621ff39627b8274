//! Process-wide command registry, loaded once.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::model::{CommandDefinition, CommandKind, DialogState};

use DialogState::*;

const PRICE_SORT_STATES: &[DialogState] = &[
    Start,
    AskLocation,
    ChooseCity,
    AskResultSize,
    OfferDefaults,
    AskGuestCount,
    AskCheckIn,
    AskCheckOut,
    End,
];

const BEST_DEAL_STATES: &[DialogState] = &[
    Start,
    AskLocation,
    ChooseCity,
    AskPriceRange,
    AskDistRange,
    AskResultSize,
    OfferDefaults,
    AskGuestCount,
    AskCheckIn,
    AskCheckOut,
    End,
];

/// Immutable command table keyed by command kind. `/help` is stateless and
/// carries no definition.
pub static COMMANDS: Lazy<HashMap<CommandKind, CommandDefinition>> = Lazy::new(|| {
    HashMap::from([
        (
            CommandKind::LowPrice,
            CommandDefinition {
                states: PRICE_SORT_STATES,
            },
        ),
        (
            CommandKind::HighPrice,
            CommandDefinition {
                states: PRICE_SORT_STATES,
            },
        ),
        (
            CommandKind::BestDeal,
            CommandDefinition {
                states: BEST_DEAL_STATES,
            },
        ),
    ])
});

/// Looks up the definition for a stateful command.
///
/// # Panics
///
/// Panics for `CommandKind::Help`, which has no conversation.
pub fn definition_for(kind: CommandKind) -> &'static CommandDefinition {
    COMMANDS
        .get(&kind)
        .unwrap_or_else(|| panic!("{} has no conversation definition", kind.as_str()))
}
