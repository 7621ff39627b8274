//! Conversation controller.
//!
//! Orchestrates the state machine table against the session repository: on
//! each inbound event it validates input against the current state, merges
//! the parsed value into the session, and advances to the next state or
//! re-prompts. Side effects are confined to session mutation; every method
//! returns the outbound `Reply` values for the transport to deliver.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::command::{definition_for, CommandKind, DialogState};
use crate::error::{Result, ScoutError};
use crate::input;
use crate::search::{BestDealSearch, HotelProvider, HotelRecord, LocationChoice, SearchOutcome};
use crate::search::simple_sort::simple_sort_search;
use crate::session::{Session, SessionRepository, SortOrder};
use crate::transport::{Action, Prompt, Reply};

const RETRY_LATER_MESSAGE: &str = "Request error. Try the command again later.";
const NO_HOTELS_MESSAGE: &str = "Unfortunately no available hotels were found for your query.";

pub struct Controller {
    sessions: Arc<dyn SessionRepository>,
    provider: Arc<dyn HotelProvider>,
    /// Fixed page size for paginated best-deal fetches
    page_size: usize,
    currency: String,
}

impl Controller {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        provider: Arc<dyn HotelProvider>,
        page_size: usize,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            provider,
            page_size,
            currency: currency.into(),
        }
    }

    pub fn sessions(&self) -> &Arc<dyn SessionRepository> {
        &self.sessions
    }

    /// Starts a command for a user. Exactly one command may be active per
    /// user; an existing session must be cancelled first.
    pub async fn begin(&self, user_id: i64, kind: CommandKind) -> Result<Vec<Reply>> {
        if self.sessions.exists(user_id).await? {
            return Err(ScoutError::validation(
                "You already have an active command. Finish it or type Cancel first.",
            ));
        }
        info!(user_id, command = kind.as_str(), "command started");

        let mut session = Session::new(user_id, kind);
        session.query.sort_order = Some(match kind {
            CommandKind::LowPrice => SortOrder::PriceAscending,
            CommandKind::HighPrice => SortOrder::PriceDescending,
            CommandKind::BestDeal => SortOrder::DistanceFromLandmark,
            CommandKind::Help => return Err(ScoutError::internal("/help has no conversation")),
        });

        // Start is a pass-through sentinel
        let reply = self.advance_session(&mut session)?;
        self.sessions.save(session).await?;
        Ok(vec![reply])
    }

    /// Applies the current state's validator to free-text input. On failure
    /// the session is untouched and the error carries the re-prompt text;
    /// on success the value is recorded and the conversation advances.
    pub async fn record_input(&self, user_id: i64, raw: &str) -> Result<Vec<Reply>> {
        let mut session = self.require_session(user_id).await?;
        let today = Utc::now().date_naive();

        match session.state {
            DialogState::ChooseCity => {
                let choice = session
                    .locations
                    .iter()
                    .find(|loc| loc.name == raw.trim())
                    .cloned()
                    .ok_or_else(|| {
                        ScoutError::validation(
                            "Invalid input. Pick one of the options below with a button.",
                        )
                    })?;
                session.query.destination_id = Some(choice.destination_id);
                session.push_confirmation(DialogState::ChooseCity, choice.name);
            }
            DialogState::AskPriceRange => {
                let (low, high) = input::parse_price_range(raw)?;
                session.query.price_range = Some((low, high));
                session.push_confirmation(DialogState::AskPriceRange, format!("{low}-{high}"));
            }
            DialogState::AskDistRange => {
                let (low, high) = input::parse_dist_range(raw)?;
                session.display.dist_range = Some((low, high));
                session.push_confirmation(DialogState::AskDistRange, format!("{low}-{high} km"));
            }
            DialogState::AskResultSize => {
                let size = input::parse_bounded_number(raw, 1, 25)?;
                session.display.result_size = size as usize;
                session.push_confirmation(DialogState::AskResultSize, size.to_string());
            }
            DialogState::AskGuestCount => {
                let adults = input::parse_bounded_number(raw, 1, 15)?;
                session.query.adults = Some(adults);
                session.push_confirmation(DialogState::AskGuestCount, adults.to_string());
            }
            DialogState::AskCheckIn => {
                let date = input::parse_future_date(raw, today)?;
                session.query.check_in = Some(date);
                session.push_confirmation(DialogState::AskCheckIn, date.format("%Y-%m-%d").to_string());
            }
            DialogState::AskCheckOut => {
                let check_in = session
                    .query
                    .check_in
                    .ok_or_else(|| ScoutError::internal("check-out reached without check-in"))?;
                let date = input::parse_checkout_after(raw, today, check_in)?;
                session.query.check_out = Some(date);
                session.push_confirmation(DialogState::AskCheckOut, date.format("%Y-%m-%d").to_string());
            }
            state => {
                return Err(ScoutError::internal(format!(
                    "free-text input is not valid in state {state:?}"
                )))
            }
        }

        let reply = self.advance_session(&mut session)?;
        self.sessions.save(session).await?;
        Ok(vec![reply])
    }

    /// Stores the city matches discovered by the location lookup and moves
    /// on to the choice-of-city state.
    pub async fn offer_locations(
        &self,
        user_id: i64,
        locations: Vec<LocationChoice>,
    ) -> Result<Vec<Reply>> {
        let mut session = self.require_session(user_id).await?;
        if session.state != DialogState::AskLocation {
            return Err(ScoutError::internal("location offer outside AskLocation"));
        }
        session.locations = locations;
        let reply = self.advance_session(&mut session)?;
        self.sessions.save(session).await?;
        Ok(vec![reply])
    }

    /// Advances the user's session to the next state in its sequence.
    pub async fn advance(&self, user_id: i64) -> Result<Vec<Reply>> {
        let mut session = self.require_session(user_id).await?;
        let reply = self.advance_session(&mut session)?;
        self.sessions.save(session).await?;
        Ok(vec![reply])
    }

    /// Removes the user's session unconditionally. Idempotent; returns the
    /// cancelled command, if any.
    pub async fn cancel(&self, user_id: i64) -> Result<Option<CommandKind>> {
        let command = self
            .sessions
            .find_by_user(user_id)
            .await?
            .map(|session| session.command);
        self.sessions.delete(user_id).await?;
        if let Some(kind) = command {
            info!(user_id, command = kind.as_str(), "command cancelled");
        }
        Ok(command)
    }

    /// Accepts the defaults offered at `OfferDefaults`: one guest and a
    /// three-night window starting today, then jumps straight to the
    /// confirmation summary.
    pub async fn accept_defaults(&self, user_id: i64) -> Result<Vec<Reply>> {
        let mut session = self.require_session(user_id).await?;
        if session.state != DialogState::OfferDefaults {
            return Ok(Vec::new());
        }
        let today = Utc::now().date_naive();
        let check_out = today + Duration::days(3);

        session.query.adults = Some(1);
        session.query.check_in = Some(today);
        session.query.check_out = Some(check_out);
        session.push_confirmation(DialogState::AskGuestCount, "1");
        session.push_confirmation(DialogState::AskCheckIn, today.format("%Y-%m-%d").to_string());
        session.push_confirmation(
            DialogState::AskCheckOut,
            check_out.format("%Y-%m-%d").to_string(),
        );

        session.state = DialogState::End;
        let prompt = Self::build_prompt(&session, DialogState::End);
        session.last_prompt = Some(prompt.clone());
        self.sessions.save(session).await?;
        Ok(vec![
            Reply::text("Keeping the default values."),
            prompt.into(),
        ])
    }

    /// Declines the defaults and continues the normal question sequence.
    pub async fn decline_defaults(&self, user_id: i64) -> Result<Vec<Reply>> {
        let mut session = self.require_session(user_id).await?;
        if session.state != DialogState::OfferDefaults {
            return Ok(Vec::new());
        }
        let reply = self.advance_session(&mut session)?;
        self.sessions.save(session).await?;
        Ok(vec![Reply::text("Entering custom search values."), reply])
    }

    /// The explicit "start command again" action, valid on the confirmation
    /// screen. Resets the session to `Start` and re-runs the first prompt.
    pub async fn restart(&self, user_id: i64) -> Result<Vec<Reply>> {
        let mut session = self.require_session(user_id).await?;
        if session.state != DialogState::End {
            return Ok(Vec::new());
        }
        let kind = session.command;
        session.restart();
        let reply = self.advance_session(&mut session)?;
        self.sessions.save(session).await?;
        Ok(vec![
            Reply::text(format!("Ok. Starting {kind} over.")),
            reply,
        ])
    }

    /// Executes the confirmed command, formats the outcome, and destroys
    /// the session. Only valid on the confirmation screen.
    pub async fn confirm_and_execute(&self, user_id: i64) -> Result<Vec<Reply>> {
        let session = self.require_session(user_id).await?;
        if session.state != DialogState::End {
            return Ok(Vec::new());
        }
        info!(user_id, command = session.command.as_str(), "executing command");

        let outcome = match session.command {
            CommandKind::LowPrice | CommandKind::HighPrice => {
                simple_sort_search(
                    self.provider.as_ref(),
                    &session.query,
                    session.display.result_size,
                )
                .await
            }
            CommandKind::BestDeal => {
                let dist_range = session
                    .display
                    .dist_range
                    .ok_or_else(|| ScoutError::internal("bestdeal confirmed without a distance window"))?;
                BestDealSearch::new(
                    self.provider.as_ref(),
                    &session.query,
                    dist_range,
                    session.display.result_size,
                    self.page_size,
                )
                .run()
                .await
            }
            CommandKind::Help => return Err(ScoutError::internal("/help cannot be executed")),
        };

        // The session may have been cancelled while a page fetch was in
        // flight; only report back when it still exists.
        if !self.sessions.exists(user_id).await? {
            return Ok(Vec::new());
        }
        self.sessions.delete(user_id).await?;

        match outcome {
            Ok(outcome) => Ok(self.render_outcome(&session, outcome)),
            Err(err) => {
                warn!(user_id, error = %err, "command execution failed");
                Ok(vec![Reply::text(RETRY_LATER_MESSAGE)])
            }
        }
    }

    async fn require_session(&self, user_id: i64) -> Result<Session> {
        self.sessions
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| ScoutError::internal(format!("no active session for user {user_id}")))
    }

    /// Installs the next state and records its prompt. `Start` entries are
    /// passed through immediately.
    fn advance_session(&self, session: &mut Session) -> Result<Reply> {
        let def = definition_for(session.command);
        let mut next = def
            .next_state(session.state)
            .ok_or_else(|| ScoutError::internal(format!("no state after {:?}", session.state)))?;
        if next == DialogState::Start {
            next = def
                .next_state(next)
                .ok_or_else(|| ScoutError::internal("empty state sequence"))?;
        }
        session.state = next;
        let prompt = Self::build_prompt(session, next);
        session.last_prompt = Some(prompt.clone());
        Ok(prompt.into())
    }

    fn build_prompt(session: &Session, state: DialogState) -> Prompt {
        let def = definition_for(session.command);
        match state {
            DialogState::End => {
                let mut text = String::from("Please check that everything is correct:\n\n");
                text.push_str(&format!("Command: {}\n", session.command));
                for (label, value) in &session.confirmation {
                    text.push_str(&format!("{label}: {value}\n"));
                }
                Prompt::with_actions(
                    text,
                    vec![
                        ("Yes, all correct".to_string(), Action::Confirm),
                        ("No, start over".to_string(), Action::Restart),
                    ],
                )
            }
            DialogState::ChooseCity => Prompt::with_choices(
                def.prompt_for(state),
                session.locations.iter().map(|loc| loc.name.clone()).collect(),
            ),
            DialogState::OfferDefaults => Prompt::with_actions(
                def.prompt_for(state),
                vec![
                    ("Keep the defaults".to_string(), Action::SetDefaults),
                    ("Change them".to_string(), Action::ChangeDefaults),
                ],
            ),
            _ => Prompt::text_only(def.prompt_for(state)),
        }
    }

    fn render_outcome(&self, session: &Session, outcome: SearchOutcome) -> Vec<Reply> {
        if outcome.hotels.is_empty() {
            let mut text = NO_HOTELS_MESSAGE.to_string();
            if !outcome.note.is_empty() {
                text.push('\n');
                text.push_str(&outcome.note);
            }
            return vec![Reply::text(text)];
        }

        let mut head = format!(
            "Result of command {}\n({})",
            session.command,
            session.command.description()
        );
        if !outcome.note.is_empty() {
            head.push('\n');
            head.push_str(&outcome.note);
        }

        let mut replies = vec![Reply::text(head)];
        for hotel in &outcome.hotels {
            replies.push(self.render_hotel(hotel));
        }
        replies
    }

    fn render_hotel(&self, hotel: &HotelRecord) -> Reply {
        let text = format!(
            "Name: {}\n\nAddress: {}\nDistance to the center: {}\n\nPrice: {} {} ({})",
            hotel.name, hotel.address, hotel.to_center, hotel.price, self.currency, hotel.price_info
        );
        if hotel.photo_url.is_empty() {
            Reply::text(text)
        } else {
            Reply::with_photo(text, &hotel.photo_url)
        }
    }
}
