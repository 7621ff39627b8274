//! Console front end for hotelscout.
//!
//! A minimal stand-in for the chat transport: reads lines from stdin,
//! routes them through the dispatcher, and renders the replies. Inline
//! keyboard actions are triggered by typing the button caption.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hotelscout_core::config::AppConfig;
use hotelscout_core::controller::Controller;
use hotelscout_core::dispatch::{help_text, Dispatcher};
use hotelscout_core::search::HotelProvider;
use hotelscout_core::session::InMemorySessionRepository;
use hotelscout_core::transport::{Action, Keyboard, Reply};
use hotelscout_provider::RapidApiProvider;

/// The single console user.
const CONSOLE_USER: i64 = 1;

#[derive(Parser)]
#[command(name = "hotelscout")]
#[command(about = "Conversational hotel deal finder", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    info!(locale = %config.locale, currency = %config.currency, "starting hotelscout");

    let provider: Arc<dyn HotelProvider> =
        Arc::new(RapidApiProvider::new(&config).context("failed to create the hotel provider")?);
    let sessions = Arc::new(InMemorySessionRepository::new());
    let controller = Controller::new(
        sessions,
        provider.clone(),
        config.page_size,
        config.currency.clone(),
    );
    let dispatcher = Dispatcher::new(controller, provider);

    println!("{}", help_text());

    let mut pending_actions: Vec<(String, Action)> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }

        let matched_action = pending_actions
            .iter()
            .find(|(caption, _)| caption.eq_ignore_ascii_case(&line))
            .map(|(_, action)| *action);

        let result = match matched_action {
            Some(action) => dispatcher.handle_action(CONSOLE_USER, action).await,
            None => dispatcher.handle_message(CONSOLE_USER, &line).await,
        };

        match result {
            Ok(replies) => {
                pending_actions.clear();
                for reply in &replies {
                    render(reply, &mut pending_actions);
                }
            }
            Err(err) => eprintln!("error: {err}"),
        }
    }

    Ok(())
}

fn render(reply: &Reply, pending_actions: &mut Vec<(String, Action)>) {
    println!("{}", reply.text);
    if let Some(url) = &reply.photo_url {
        println!("photo: {url}");
    }
    match &reply.keyboard {
        Keyboard::None => {}
        Keyboard::Choices(choices) => {
            for choice in choices {
                println!("  [{choice}]");
            }
            println!("  [Cancel]");
        }
        Keyboard::Actions(actions) => {
            for (caption, action) in actions {
                println!("  [{caption}]");
                pending_actions.push((caption.clone(), *action));
            }
        }
    }
    println!();
}
