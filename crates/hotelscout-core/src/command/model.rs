//! Command and dialog state domain models.

use serde::{Deserialize, Serialize};

/// The fixed set of user-facing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    /// List the available commands
    Help,
    /// Cheapest hotels in a city
    LowPrice,
    /// Most expensive hotels in a city
    HighPrice,
    /// Best match by price and distance from the city center
    BestDeal,
}

impl CommandKind {
    /// The literal command token as typed in chat.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Help => "/help",
            Self::LowPrice => "/lowprice",
            Self::HighPrice => "/highprice",
            Self::BestDeal => "/bestdeal",
        }
    }

    /// Parses a chat message into a command, if it is one.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "/help" | "/start" => Some(Self::Help),
            "/lowprice" => Some(Self::LowPrice),
            "/highprice" => Some(Self::HighPrice),
            "/bestdeal" => Some(Self::BestDeal),
            _ => None,
        }
    }

    /// One-line description used by `/help` and in result headers.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Help => "show this message",
            Self::LowPrice => "cheapest hotels in a city",
            Self::HighPrice => "most expensive hotels in a city",
            Self::BestDeal => "best match by price and distance from the center",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed enumeration of conversation states.
///
/// Each command declares an ordered subset of these, always beginning with
/// `Start` and ending with `End`. `Start` is a pass-through sentinel;
/// `End` renders the confirmation summary and dispatches execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogState {
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
}

/// Immutable, process-wide definition of one command's conversation.
#[derive(Debug, Clone)]
pub struct CommandDefinition {
    /// Ordered state sequence, `Start` first and `End` last.
    pub states: &'static [DialogState],
}

impl CommandDefinition {
    /// The state immediately following `current` in the sequence, or `None`
    /// when `current` is not a member or is the terminal state.
    pub fn next_state(&self, current: DialogState) -> Option<DialogState> {
        let pos = self.states.iter().position(|s| *s == current)?;
        self.states.get(pos + 1).copied()
    }

    /// Whether `state` belongs to this command's sequence.
    pub fn contains(&self, state: DialogState) -> bool {
        self.states.contains(&state)
    }

    /// The prompt text shown when `state` is entered.
    pub fn prompt_for(&self, state: DialogState) -> &'static str {
        match state {
            DialogState::AskLocation => "Which city should we search in?",
            DialogState::ChooseCity => {
                "Confirm or refine the location, pick one of the options below:"
            }
            DialogState::AskPriceRange => {
                "Price range per night, as min-max (for example 50-200)?"
            }
            DialogState::AskDistRange => {
                "Accepted distance from the city center, as min-max km (for example 0.5-3)?"
            }
            DialogState::AskResultSize => "How many hotels to show (max 25)?",
            DialogState::OfferDefaults => {
                "By default the search covers one guest and the next three nights."
            }
            DialogState::AskGuestCount => "How many guests?",
            DialogState::AskCheckIn => "Check-in date (yyyy-mm-dd)?",
            DialogState::AskCheckOut => "Ok. Now the check-out date (yyyy-mm-dd)?",
            DialogState::Start | DialogState::End => "",
        }
    }

    /// The human-readable label under which `state`'s value appears in the
    /// confirmation summary.
    pub fn confirm_label_for(&self, state: DialogState) -> Option<&'static str> {
        match state {
            DialogState::ChooseCity => Some("Search city"),
            DialogState::AskPriceRange => Some("Price range"),
            DialogState::AskDistRange => Some("Distance range"),
            DialogState::AskResultSize => Some("Hotels to show"),
            DialogState::AskGuestCount => Some("Guests"),
            DialogState::AskCheckIn => Some("Check-in"),
            DialogState::AskCheckOut => Some("Check-out"),
            _ => None,
        }
    }
}
