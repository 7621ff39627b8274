//! Transport boundary types.
//!
//! The chat transport itself (message delivery, keyboard rendering, the
//! inline calendar widget) lives outside this workspace. The controller and
//! dispatcher communicate with it purely through these values: every
//! operation returns the `Reply` items the transport should deliver.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A callback action tag, as produced by an inline keyboard press or by the
/// calendar widget's "OK" confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Accept the default guest count and date window
    SetDefaults,
    /// Continue the normal question sequence instead
    ChangeDefaults,
    /// Run the command with the confirmed parameters
    Confirm,
    /// Start the active command over from the beginning
    Restart,
    /// A date picked in the calendar widget
    CalendarDate(NaiveDate),
}

/// Keyboard attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Keyboard {
    /// Plain text message, no controls
    None,
    /// Reply keyboard of free-text choices (a cancel row is always rendered
    /// by the transport)
    Choices(Vec<String>),
    /// Inline keyboard of callback actions
    Actions(Vec<(String, Action)>),
}

/// A prompt retained on the session so an unrecognized input can be answered
/// by re-showing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Prompt {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::None,
        }
    }

    pub fn with_choices(text: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Choices(choices),
        }
    }

    pub fn with_actions(text: impl Into<String>, actions: Vec<(String, Action)>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Actions(actions),
        }
    }
}

/// One outbound message for the transport to deliver.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
    /// Photo to attach, when the reply presents a single hotel
    pub photo_url: Option<String>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::None,
            photo_url: None,
        }
    }

    pub fn with_photo(text: impl Into<String>, photo_url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::None,
            photo_url: Some(photo_url.into()),
        }
    }
}

impl From<Prompt> for Reply {
    fn from(prompt: Prompt) -> Self {
        Self {
            text: prompt.text,
            keyboard: prompt.keyboard,
            photo_url: None,
        }
    }
}
