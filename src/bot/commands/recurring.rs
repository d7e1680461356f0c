//! Recurring blueprint Discord commands - `generate`, `edit_entry` and `blueprints`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{ledger::EntryChanges, period::Period, recurring, report},
        errors::{Error, Result},
    };
    use chrono::Datelike;
    use std::fmt::Write;

    /// Generates the recurring entries of a month.
    ///
    /// Running it again for the same month creates nothing new.
    #[poise::command(slash_command, prefix_command)]
    pub async fn generate(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Month to generate (YYYY-MM), defaults to the current month"]
        #[autocomplete = "autocomplete::autocomplete_period"]
        period: Option<String>,
    ) -> Result<()> {
        let period = match period.as_deref() {
            Some(text) => text.parse::<Period>()?,
            None => Period::current(),
        };

        ctx.defer().await?;

        let data = ctx.data();
        let db = data.database.as_ref();
        let result = recurring::generate_for_month(db, period.year(), period.month()).await?;
        if !result.created.is_empty() {
            data.recalc.notify(period.year());
        }

        let summary = report::format_generation_report(&result)?;
        ctx.say(format!("🔁 **Recurring entries**\n```\n{summary}\n```"))
            .await?;
        Ok(())
    }

    /// Edits a single generated entry. The blueprint and other months are not touched.
    #[poise::command(slash_command, prefix_command)]
    pub async fn edit_entry(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "ID of the generated entry"] entry_id: i64,
        #[description = "Actual amount (fills in variable placeholders)"] amount: Option<f64>,
        #[description = "New description"] description: Option<String>,
        #[description = "New notes"] notes: Option<String>,
    ) -> Result<()> {
        let changes = EntryChanges {
            description,
            amount,
            entry_date: None,
            notes: notes.map(Some),
        };
        if changes.is_empty() {
            ctx.say("ℹ️ Nothing to change. Provide an amount, description or notes.")
                .await?;
            return Ok(());
        }

        let data = ctx.data();
        match recurring::update_generated_entry(data.database.as_ref(), entry_id, changes).await {
            Ok(entry) => {
                data.recalc.notify(entry.entry_date.year());
                ctx.say(format!(
                    "✅ Updated `{}`",
                    report::format_entry_line(&entry)
                ))
                .await?;
            }
            Err(Error::EntryNotFound { id }) => {
                ctx.say(format!("❌ Entry #{id} not found.")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Lists the active recurring blueprints.
    #[poise::command(slash_command, prefix_command)]
    pub async fn blueprints(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let blueprints = recurring::get_active_blueprints(ctx.data().database.as_ref()).await?;

        if blueprints.is_empty() {
            ctx.say("📋 No active blueprints. Add some under `[[blueprints]]` in studio.toml.")
                .await?;
            return Ok(());
        }

        let mut text = String::new();
        for blueprint in &blueprints {
            writeln!(text, "{}", report::format_blueprint_line(blueprint))?;
        }
        ctx.say(format!("📋 **Active blueprints**\n```\n{text}```"))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
