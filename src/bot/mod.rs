//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the studio ledger,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (recurring, revenue, integrity, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    core::{debounce::RecalcHandle, revenue::RevenueCache},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
/// This structure holds the database connection, the revenue cache and the
/// handle of the background recalculation worker.
pub struct BotData {
    /// Database connection for all database operations
    pub database: Arc<DatabaseConnection>,
    /// Month-keyed revenue cache
    pub revenue: RevenueCache,
    /// Notifies the recalculation worker after writes
    pub recalc: RecalcHandle,
}

impl BotData {
    /// Creates a new `BotData` instance from the already initialized services.
    #[must_use]
    pub const fn new(
        database: Arc<DatabaseConnection>,
        revenue: RevenueCache,
        recalc: RecalcHandle,
    ) -> Self {
        Self {
            database,
            revenue,
            recalc,
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ An error occurred: {error}")).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Registers all commands and runs the Discord client until it stops.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::generate(),
                commands::edit_entry(),
                commands::blueprints(),
                commands::revenue(),
                commands::recalculate(),
                commands::integrity(),
                commands::proofing(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
