pub mod api;
pub mod commands;
pub mod config;
pub mod display;
pub mod progress;
pub mod settings;
pub mod state;

use std::time::Duration;

use spelling_core::SessionMode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::ApiClient;
use crate::commands::{Command, Reply, HELP};
use crate::config::ClientConfig;
use crate::settings::FileSettingsStore;
use crate::state::AppState;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(api_url = %config.api_url, "starting spelling client");

    let api = ApiClient::new(&config.api_url, config.timeout)?;
    if !api.check_connectivity().await {
        println!(
            "Warning: cannot reach the word service at {}. Set SPELLING_API_URL if it lives elsewhere.",
            api.base_url()
        );
    }

    let mut state = AppState::new(api, FileSettingsStore::new(&config.settings_path));
    state.progress.refresh(&state.api).await;

    println!("Spelling game. Level {}, {} coins.", state.progress.level(), state.progress.coins());
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut clock = tokio::time::interval(Duration::from_secs(1));
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let in_challenge = state.session.mode() == SessionMode::Challenge;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                let (reply, starts_clock) = match commands::parse(&line) {
                    Ok(command) => {
                        let starts_clock = matches!(command, Command::Challenge(_) | Command::Switch);
                        (commands::execute(&mut state, command).await, starts_clock)
                    }
                    Err(e) => (Reply::line(e.to_string()), false),
                };
                print_reply(&reply);
                if reply.quit {
                    break;
                }

                // A fresh challenge gets a full first second.
                if starts_clock && state.session.mode() == SessionMode::Challenge {
                    clock.reset();
                }
            }
            _ = clock.tick(), if in_challenge => {
                print_reply(&commands::study::tick(&mut state));
            }
        }
    }

    Ok(())
}

fn print_reply(reply: &Reply) {
    for line in &reply.lines {
        println!("{line}");
    }
}
