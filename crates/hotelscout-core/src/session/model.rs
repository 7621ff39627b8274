//! Session domain model.
//!
//! A session is the live conversation of exactly one user with exactly one
//! active command. It exists if and only if a command is active, is mutated
//! only by the controller in response to validated input, and is destroyed
//! when the command completes or is cancelled.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::command::{definition_for, CommandKind, DialogState};
use crate::search::LocationChoice;
use crate::transport::Prompt;

/// Provider sort-order tokens, passed through verbatim on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    PriceAscending,
    PriceDescending,
    DistanceFromLandmark,
}

impl SortOrder {
    /// The provider's wire token for this order.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::PriceAscending => "PRICE",
            Self::PriceDescending => "PRICE_HIGHEST_FIRST",
            Self::DistanceFromLandmark => "DISTANCE_FROM_LANDMARK",
        }
    }
}

/// Provider query parameters accumulated across states.
///
/// Every field the conversation can set is statically enumerable here;
/// values are only added or overwritten, never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    pub destination_id: Option<u64>,
    pub adults: Option<u32>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    /// Optional price bounds for bestdeal, as entered low-high
    pub price_range: Option<(u32, u32)>,
    pub sort_order: Option<SortOrder>,
}

/// UI-only knobs that are never sent to the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Requested number of hotels in the output, 1..=25
    pub result_size: usize,
    /// Accepted distance window from the city center, in km
    pub dist_range: Option<(f64, f64)>,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            result_size: 1,
            dist_range: None,
        }
    }
}

/// The live conversation state of one user, keyed by user id in the
/// session repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    /// The command this session collects input for
    pub command: CommandKind,
    /// Current position in the command's state sequence
    pub state: DialogState,
    /// Accumulated provider query parameters
    pub query: QueryParams,
    /// Accumulated UI-only options
    pub display: DisplayOptions,
    /// Ordered label -> value rows for the confirmation summary
    pub confirmation: Vec<(String, String)>,
    /// City matches from the most recent location lookup, offered as the
    /// valid choices for the `ChooseCity` state
    pub locations: Vec<LocationChoice>,
    /// Most recently sent prompt, re-shown after unrecognized input
    pub last_prompt: Option<Prompt>,
}

impl Session {
    /// Creates a new session at the sentinel `Start` state.
    pub fn new(user_id: i64, command: CommandKind) -> Self {
        Self {
            user_id,
            command,
            state: DialogState::Start,
            query: QueryParams::default(),
            display: DisplayOptions::default(),
            confirmation: Vec::new(),
            locations: Vec::new(),
            last_prompt: None,
        }
    }

    /// Resets accumulated input while keeping the active command, used by
    /// the explicit "start command again" action. The sort order is part of
    /// the command itself and survives the reset.
    pub fn restart(&mut self) {
        let sort_order = self.query.sort_order;
        self.query = QueryParams::default();
        self.query.sort_order = sort_order;
        self.display = DisplayOptions::default();
        self.confirmation.clear();
        self.locations.clear();
        self.last_prompt = None;
        self.state = DialogState::Start;
    }

    /// Appends a confirmation row for `state`, using its fixed label.
    /// States without a label (sentinels) are skipped.
    pub fn push_confirmation(&mut self, state: DialogState, value: impl Into<String>) {
        let def = definition_for(self.command);
        if let Some(label) = def.confirm_label_for(state) {
            self.confirmation.push((label.to_string(), value.into()));
        }
    }
}
