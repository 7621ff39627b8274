//! Full conversation flows through the dispatcher, with a mock provider.

use async_trait::async_trait;
use std::sync::Arc;

use hotelscout_core::command::{CommandKind, DialogState};
use hotelscout_core::controller::Controller;
use hotelscout_core::dispatch::Dispatcher;
use hotelscout_core::error::Result;
use hotelscout_core::search::{HotelPage, HotelProvider, HotelRecord, LocationChoice};
use hotelscout_core::session::{InMemorySessionRepository, QueryParams, SessionRepository, SortOrder};
use hotelscout_core::transport::{Action, Keyboard, Reply};

const USER: i64 = 42;

struct MockProvider;

#[async_trait]
impl HotelProvider for MockProvider {
    async fn find_locations(&self, query: &str) -> Result<Vec<LocationChoice>> {
        if query.eq_ignore_ascii_case("lisbon") {
            Ok(vec![
                LocationChoice {
                    name: "Lisbon, Portugal".to_string(),
                    destination_id: 1706,
                },
                LocationChoice {
                    name: "Lisbon Falls, South Africa".to_string(),
                    destination_id: 9931,
                },
            ])
        } else {
            Ok(Vec::new())
        }
    }

    async fn find_hotels(
        &self,
        _params: &QueryParams,
        _page_number: u32,
        page_size: usize,
    ) -> Result<HotelPage> {
        let records = (1..=page_size.min(2))
            .map(|i| HotelRecord {
                name: format!("Hotel {i}"),
                address: "Rua Augusta, Lisbon".to_string(),
                price_exact: 100.0 * i as f64,
                price: format!("${}", 100 * i),
                price_info: "nightly price per room".to_string(),
                to_center: "0.4 km".to_string(),
                to_center_exact: Some(0.4),
                photo_url: String::new(),
            })
            .collect();
        Ok(HotelPage {
            records,
            next_page_number: 0,
        })
    }
}

fn dispatcher() -> (Dispatcher, Arc<InMemorySessionRepository>) {
    let sessions = Arc::new(InMemorySessionRepository::new());
    let provider: Arc<dyn HotelProvider> = Arc::new(MockProvider);
    let controller = Controller::new(sessions.clone(), provider.clone(), 25, "USD");
    (Dispatcher::new(controller, provider), sessions)
}

async fn state_of(sessions: &InMemorySessionRepository, user: i64) -> DialogState {
    sessions.find_by_user(user).await.unwrap().unwrap().state
}

#[tokio::test]
async fn lowprice_flow_with_defaults_runs_to_completion() {
    let (dispatcher, sessions) = dispatcher();

    let replies = dispatcher.handle_message(USER, "/lowprice").await.unwrap();
    assert!(replies[0].text.contains("Which city"));
    assert_eq!(state_of(&sessions, USER).await, DialogState::AskLocation);

    let replies = dispatcher.handle_message(USER, "Lisbon").await.unwrap();
    assert_eq!(state_of(&sessions, USER).await, DialogState::ChooseCity);
    match &replies[0].keyboard {
        Keyboard::Choices(choices) => assert_eq!(choices.len(), 2),
        other => panic!("expected city choices, got {other:?}"),
    }

    dispatcher
        .handle_message(USER, "Lisbon, Portugal")
        .await
        .unwrap();
    assert_eq!(state_of(&sessions, USER).await, DialogState::AskResultSize);

    dispatcher.handle_message(USER, "2").await.unwrap();
    assert_eq!(state_of(&sessions, USER).await, DialogState::OfferDefaults);

    // Accept the defaults: guest count and dates are prefilled and the
    // conversation jumps straight to the confirmation summary.
    let replies = dispatcher
        .handle_action(USER, Action::SetDefaults)
        .await
        .unwrap();
    assert_eq!(state_of(&sessions, USER).await, DialogState::End);
    let summary = &replies[1].text;
    assert!(summary.contains("Command: /lowprice"));
    assert!(summary.contains("Search city: Lisbon, Portugal"));
    assert!(summary.contains("Guests: 1"));
    assert!(summary.contains("Check-in:"));
    assert!(summary.contains("Check-out:"));

    let session = sessions.find_by_user(USER).await.unwrap().unwrap();
    assert_eq!(session.query.adults, Some(1));
    assert_eq!(session.query.sort_order, Some(SortOrder::PriceAscending));
    assert_eq!(session.query.destination_id, Some(1706));

    let replies = dispatcher.handle_action(USER, Action::Confirm).await.unwrap();
    assert!(replies[0].text.contains("Result of command /lowprice"));
    assert_eq!(replies.len(), 3); // header + two hotels
    assert!(replies[1].text.contains("Hotel 1"));

    // The session is destroyed once the result is delivered
    assert!(sessions.find_by_user(USER).await.unwrap().is_none());
}

#[tokio::test]
async fn bestdeal_flow_collects_ranges_and_custom_dates() {
    let (dispatcher, sessions) = dispatcher();

    dispatcher.handle_message(USER, "/bestdeal").await.unwrap();
    dispatcher.handle_message(USER, "Lisbon").await.unwrap();
    dispatcher
        .handle_message(USER, "Lisbon, Portugal")
        .await
        .unwrap();
    assert_eq!(state_of(&sessions, USER).await, DialogState::AskPriceRange);

    dispatcher.handle_message(USER, "50-200").await.unwrap();
    assert_eq!(state_of(&sessions, USER).await, DialogState::AskDistRange);

    dispatcher.handle_message(USER, "0.5-3").await.unwrap();
    assert_eq!(state_of(&sessions, USER).await, DialogState::AskResultSize);

    dispatcher.handle_message(USER, "3").await.unwrap();
    dispatcher
        .handle_action(USER, Action::ChangeDefaults)
        .await
        .unwrap();
    assert_eq!(state_of(&sessions, USER).await, DialogState::AskGuestCount);

    dispatcher.handle_message(USER, "2").await.unwrap();
    dispatcher.handle_message(USER, "2099-06-10").await.unwrap();
    dispatcher.handle_message(USER, "2099-06-12").await.unwrap();
    assert_eq!(state_of(&sessions, USER).await, DialogState::End);

    let session = sessions.find_by_user(USER).await.unwrap().unwrap();
    assert_eq!(session.query.price_range, Some((50, 200)));
    assert_eq!(session.display.dist_range, Some((0.5, 3.0)));
    assert_eq!(session.display.result_size, 3);
    assert_eq!(
        session.query.sort_order,
        Some(SortOrder::DistanceFromLandmark)
    );
}

#[tokio::test]
async fn invalid_range_input_does_not_advance() {
    let (dispatcher, sessions) = dispatcher();

    dispatcher.handle_message(USER, "/bestdeal").await.unwrap();
    dispatcher.handle_message(USER, "Lisbon").await.unwrap();
    dispatcher
        .handle_message(USER, "Lisbon, Portugal")
        .await
        .unwrap();

    for bad in ["200-50", "5-5", "abc-5", "100"] {
        let replies = dispatcher.handle_message(USER, bad).await.unwrap();
        assert!(replies[0].text.contains("min-max"), "input {bad:?}");
        assert_eq!(state_of(&sessions, USER).await, DialogState::AskPriceRange);
    }

    let session = sessions.find_by_user(USER).await.unwrap().unwrap();
    assert!(session.query.price_range.is_none());
}

#[tokio::test]
async fn calendar_action_feeds_the_date_states() {
    let (dispatcher, sessions) = dispatcher();

    dispatcher.handle_message(USER, "/lowprice").await.unwrap();
    dispatcher.handle_message(USER, "Lisbon").await.unwrap();
    dispatcher
        .handle_message(USER, "Lisbon, Portugal")
        .await
        .unwrap();
    dispatcher.handle_message(USER, "2").await.unwrap();
    dispatcher
        .handle_action(USER, Action::ChangeDefaults)
        .await
        .unwrap();
    dispatcher.handle_message(USER, "1").await.unwrap();
    assert_eq!(state_of(&sessions, USER).await, DialogState::AskCheckIn);

    let date = chrono::NaiveDate::from_ymd_opt(2099, 6, 10).unwrap();
    dispatcher
        .handle_action(USER, Action::CalendarDate(date))
        .await
        .unwrap();
    assert_eq!(state_of(&sessions, USER).await, DialogState::AskCheckOut);

    let session = sessions.find_by_user(USER).await.unwrap().unwrap();
    assert_eq!(session.query.check_in, Some(date));
}

#[tokio::test]
async fn begin_is_rejected_while_a_command_is_active() {
    let (dispatcher, sessions) = dispatcher();

    dispatcher.handle_message(USER, "/lowprice").await.unwrap();
    let replies = dispatcher.handle_message(USER, "/bestdeal").await.unwrap();

    assert!(replies[0].text.contains("already have an active command"));
    let session = sessions.find_by_user(USER).await.unwrap().unwrap();
    assert_eq!(session.command, CommandKind::LowPrice);
}

#[tokio::test]
async fn cancel_removes_the_session_and_is_idempotent() {
    let (dispatcher, sessions) = dispatcher();

    dispatcher.handle_message(USER, "/lowprice").await.unwrap();
    let replies = dispatcher.handle_message(USER, "Cancel").await.unwrap();
    assert!(replies[0].text.contains("/lowprice cancelled"));
    assert!(sessions.find_by_user(USER).await.unwrap().is_none());

    // Repeated cancels are safe no-ops
    let replies = dispatcher.handle_message(USER, "cancel").await.unwrap();
    assert!(replies[0].text.contains("Unknown command"));
}

#[tokio::test]
async fn restart_resets_to_the_first_question() {
    let (dispatcher, sessions) = dispatcher();

    dispatcher.handle_message(USER, "/lowprice").await.unwrap();
    dispatcher.handle_message(USER, "Lisbon").await.unwrap();
    dispatcher
        .handle_message(USER, "Lisbon, Portugal")
        .await
        .unwrap();
    dispatcher.handle_message(USER, "2").await.unwrap();
    dispatcher
        .handle_action(USER, Action::SetDefaults)
        .await
        .unwrap();
    assert_eq!(state_of(&sessions, USER).await, DialogState::End);

    let replies = dispatcher.handle_action(USER, Action::Restart).await.unwrap();
    assert!(replies[0].text.contains("Starting /lowprice over"));
    assert_eq!(state_of(&sessions, USER).await, DialogState::AskLocation);

    let session = sessions.find_by_user(USER).await.unwrap().unwrap();
    assert!(session.confirmation.is_empty());
    assert!(session.query.destination_id.is_none());
    // The command's sort order survives the reset
    assert_eq!(session.query.sort_order, Some(SortOrder::PriceAscending));
}

#[tokio::test]
async fn unknown_city_reprompts_without_advancing() {
    let (dispatcher, sessions) = dispatcher();

    dispatcher.handle_message(USER, "/lowprice").await.unwrap();
    let replies = dispatcher.handle_message(USER, "Atlantis").await.unwrap();

    assert!(replies[0].text.contains("No such city found"));
    assert_eq!(state_of(&sessions, USER).await, DialogState::AskLocation);
}

#[tokio::test]
async fn free_text_on_a_button_state_reshows_the_prompt() {
    let (dispatcher, sessions) = dispatcher();

    dispatcher.handle_message(USER, "/lowprice").await.unwrap();
    dispatcher.handle_message(USER, "Lisbon").await.unwrap();
    dispatcher
        .handle_message(USER, "Lisbon, Portugal")
        .await
        .unwrap();
    dispatcher.handle_message(USER, "2").await.unwrap();
    assert_eq!(state_of(&sessions, USER).await, DialogState::OfferDefaults);

    let replies = dispatcher.handle_message(USER, "hello?").await.unwrap();
    assert!(replies[0].text.contains("Unknown command"));
    // The pending prompt is re-shown so the conversation can resume
    assert!(replies[1].text.contains("one guest and the next three nights"));
    assert_eq!(state_of(&sessions, USER).await, DialogState::OfferDefaults);
}

#[tokio::test]
async fn stale_actions_are_ignored() {
    let (dispatcher, _sessions) = dispatcher();

    // No session at all
    let replies = dispatcher.handle_action(USER, Action::Confirm).await.unwrap();
    assert!(replies.is_empty());

    // Session exists but is not at the matching state
    dispatcher.handle_message(USER, "/lowprice").await.unwrap();
    let replies = dispatcher
        .handle_action(USER, Action::SetDefaults)
        .await
        .unwrap();
    assert!(replies.is_empty());
}

#[tokio::test]
async fn help_lists_every_command() {
    let (dispatcher, _sessions) = dispatcher();
    let replies = dispatcher.handle_message(USER, "/help").await.unwrap();
    for token in ["/help", "/lowprice", "/highprice", "/bestdeal"] {
        assert!(replies[0].text.contains(token), "missing {token}");
    }
}

#[tokio::test]
async fn short_result_carries_the_found_count_note() {
    let (dispatcher, _sessions) = dispatcher();

    dispatcher.handle_message(USER, "/lowprice").await.unwrap();
    dispatcher.handle_message(USER, "Lisbon").await.unwrap();
    dispatcher
        .handle_message(USER, "Lisbon, Portugal")
        .await
        .unwrap();
    // The mock provider returns at most two hotels
    dispatcher.handle_message(USER, "5").await.unwrap();
    dispatcher
        .handle_action(USER, Action::SetDefaults)
        .await
        .unwrap();
    let replies = dispatcher.handle_action(USER, Action::Confirm).await.unwrap();

    assert!(replies[0].text.contains("Offers found: 2"));
}

#[tokio::test]
async fn replies_are_plain_values() {
    // Reply is a pure data carrier for the transport boundary
    let reply = Reply::text("hi");
    assert_eq!(reply.keyboard, Keyboard::None);
    assert!(reply.photo_url.is_none());
}
