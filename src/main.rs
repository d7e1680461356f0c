use dotenvy::dotenv;
use std::{env, sync::Arc, time::Duration};
use studio_ledger::{
    bot::{self, BotData},
    config,
    core::{
        debounce,
        period::Period,
        recurring,
        revenue::RevenueCache,
        workflow::{self, Addon},
    },
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the studio configuration
    let studio_config = config::studio::load_default_config()
        .inspect_err(|e| error!("Failed to load studio configuration: {e}"))?;
    info!(
        "Studio configuration loaded: {} blueprints, gallery proofing {}",
        studio_config.blueprints.len(),
        if studio_config.addons.gallery_proofing { "on" } else { "off" }
    );

    // 4. Connect to the database and create missing tables
    let db = Arc::new(config::database::create_connection().await?);
    config::database::create_tables(&db).await?;

    // 5. Seed stages and blueprints, apply add-ons
    workflow::seed_default_stages(&db).await?;
    recurring::seed_blueprints(&db, &studio_config.blueprints).await?;
    workflow::provision_addon_stages(
        &db,
        Addon::GalleryProofing,
        studio_config.addons.gallery_proofing,
    )
    .await?;

    // 6. Generate the current month so the ledger is up to date at startup
    let current = Period::current();
    let report = recurring::generate_for_month(&db, current.year(), current.month()).await?;
    if !report.skipped.is_empty() {
        warn!("{} blueprints skipped for {}", report.skipped.len(), current);
    }

    // 7. Open the revenue cache and start the recalculation worker
    let revenue = RevenueCache::open(Arc::clone(&db)).await?;
    let (recalc, _worker) = debounce::spawn_recalc_worker(
        revenue.clone(),
        Duration::from_millis(studio_config.revenue.recalc_debounce_ms),
    );
    if !report.created.is_empty() {
        recalc.notify(current.year());
    }

    // 8. Start the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|_| error!("Expected a DISCORD_BOT_TOKEN in the environment"))?;
    info!("Starting the bot...");
    bot::run_bot(token, BotData::new(db, revenue, recalc)).await?;

    info!("Bot shut down.");
    Ok(())
}
