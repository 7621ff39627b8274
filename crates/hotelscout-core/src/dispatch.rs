//! Inbound event dispatch.
//!
//! The transport feeds every free-text message and callback action through
//! here. Each event runs to completion before the next event for the same
//! user is processed; the dispatcher validates the event against the
//! session, drives the controller, and hands the resulting replies back to
//! the transport.

use std::sync::Arc;
use tracing::{info, warn};

use crate::command::{CommandKind, DialogState, COMMANDS};
use crate::controller::Controller;
use crate::error::Result;
use crate::search::HotelProvider;
use crate::transport::{Action, Reply};

/// The literal cancel keyword, recognized in any state.
pub const CANCEL_KEYWORD: &str = "Cancel";

const RETRY_LATER_MESSAGE: &str = "Request error. Try the command again later.";

pub struct Dispatcher {
    controller: Controller,
    provider: Arc<dyn HotelProvider>,
}

impl Dispatcher {
    pub fn new(controller: Controller, provider: Arc<dyn HotelProvider>) -> Self {
        Self {
            controller,
            provider,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Handles one free-text message from a user.
    pub async fn handle_message(&self, user_id: i64, text: &str) -> Result<Vec<Reply>> {
        let text = text.trim();

        if text.eq_ignore_ascii_case(CANCEL_KEYWORD) {
            if let Some(kind) = self.controller.cancel(user_id).await? {
                return Ok(vec![Reply::text(format!("Command {kind} cancelled"))]);
            }
            return Ok(self.unknown_message(user_id).await?);
        }

        if let Some(kind) = CommandKind::parse(text) {
            return self.start_command(user_id, kind).await;
        }

        let session = self.controller.sessions().find_by_user(user_id).await?;
        let Some(session) = session else {
            return self.unknown_message(user_id).await;
        };

        match session.state {
            DialogState::AskLocation => self.lookup_location(user_id, text).await,
            // Button-only states answer free text by re-showing the prompt
            DialogState::Start | DialogState::OfferDefaults | DialogState::End => {
                self.unknown_message(user_id).await
            }
            _ => match self.controller.record_input(user_id, text).await {
                Ok(replies) => Ok(replies),
                Err(err) if err.is_validation() => Ok(vec![Reply::text(err.to_string())]),
                Err(err) => Err(err),
            },
        }
    }

    /// Handles one callback action (inline keyboard press or a calendar
    /// widget confirmation). Stale actions for a missing or mismatched
    /// state are ignored.
    pub async fn handle_action(&self, user_id: i64, action: Action) -> Result<Vec<Reply>> {
        let session = self.controller.sessions().find_by_user(user_id).await?;
        let Some(session) = session else {
            return Ok(Vec::new());
        };

        match action {
            Action::SetDefaults => self.controller.accept_defaults(user_id).await,
            Action::ChangeDefaults => self.controller.decline_defaults(user_id).await,
            Action::Confirm => self.controller.confirm_and_execute(user_id).await,
            Action::Restart => self.controller.restart(user_id).await,
            Action::CalendarDate(date) => {
                if !matches!(
                    session.state,
                    DialogState::AskCheckIn | DialogState::AskCheckOut
                ) {
                    return Ok(Vec::new());
                }
                let raw = date.format("%Y-%m-%d").to_string();
                match self.controller.record_input(user_id, &raw).await {
                    Ok(replies) => Ok(replies),
                    Err(err) if err.is_validation() => Ok(vec![Reply::text(err.to_string())]),
                    Err(err) => Err(err),
                }
            }
        }
    }

    async fn start_command(&self, user_id: i64, kind: CommandKind) -> Result<Vec<Reply>> {
        if kind == CommandKind::Help {
            return Ok(vec![Reply::text(help_text())]);
        }
        match self.controller.begin(user_id, kind).await {
            Ok(replies) => Ok(replies),
            Err(err) if err.is_validation() => Ok(vec![Reply::text(err.to_string())]),
            Err(err) => Err(err),
        }
    }

    /// Resolves the typed city via the provider and offers the matches. A
    /// lookup failure tears the session down; an empty match set re-prompts.
    async fn lookup_location(&self, user_id: i64, text: &str) -> Result<Vec<Reply>> {
        match self.provider.find_locations(text).await {
            Ok(locations) if locations.is_empty() => {
                info!(user_id, query = text, "no locations matched");
                Ok(vec![Reply::text(
                    "No such city found. Check the name and try again.",
                )])
            }
            Ok(locations) => self.controller.offer_locations(user_id, locations).await,
            Err(err) => {
                warn!(user_id, error = %err, "location lookup failed");
                self.controller.cancel(user_id).await?;
                Ok(vec![Reply::text(RETRY_LATER_MESSAGE)])
            }
        }
    }

    /// Unrecognized input: point at /help and re-show the pending prompt,
    /// if any, so the conversation can resume.
    async fn unknown_message(&self, user_id: i64) -> Result<Vec<Reply>> {
        let mut replies = vec![Reply::text("Unknown command. Command list: /help")];
        if let Some(session) = self.controller.sessions().find_by_user(user_id).await? {
            if let Some(prompt) = session.last_prompt {
                replies.push(prompt.into());
            }
        }
        Ok(replies)
    }
}

/// The `/help` listing, assembled from the command table.
pub fn help_text() -> String {
    let mut text = String::from("Hotel deal finder\n\nCommands:\n");
    text.push_str(&format!(
        "{} -> {}\n",
        CommandKind::Help.as_str(),
        CommandKind::Help.description()
    ));
    let mut kinds: Vec<CommandKind> = COMMANDS.keys().copied().collect();
    kinds.sort_by_key(|kind| kind.as_str());
    for kind in kinds {
        text.push_str(&format!("{} -> {}\n", kind.as_str(), kind.description()));
    }
    text
}
