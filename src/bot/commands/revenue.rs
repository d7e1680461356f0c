//! Revenue cache Discord commands - `revenue` and `recalculate`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{period::Period, report, revenue::CacheEntry},
        errors::{Error, Result},
    };

    /// Shows the cached monthly revenue of a year.
    ///
    /// A year that was never computed is computed on first request.
    #[poise::command(slash_command, prefix_command)]
    pub async fn revenue(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Year, defaults to the current year"] year: Option<i32>,
    ) -> Result<()> {
        let year = year.unwrap_or_else(|| Period::current().year());
        let cache = &ctx.data().revenue;

        let mut months = cache.months(year).await;
        if months.is_empty() {
            ctx.defer().await?;
            months = cache.refresh_year(year).await?;
        }

        let table = report::format_revenue_months(year, &months)?;
        ctx.say(format!("💰 **Revenue {year}**\n```\n{table}\n```"))
            .await?;
        Ok(())
    }

    /// Rebuilds a year of the revenue cache from sessions and ledger entries.
    ///
    /// With `reset`, every cached month of every year is dropped first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn recalculate(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Year, defaults to the current year"] year: Option<i32>,
        #[description = "Drop the whole cache before rebuilding"] reset: Option<bool>,
    ) -> Result<()> {
        let year = year.unwrap_or_else(|| Period::current().year());
        let cache = &ctx.data().revenue;

        ctx.defer().await?;

        if reset.unwrap_or(false) {
            cache.reset().await?;
        }
        let months = cache.refresh_year(year).await?;
        let total: f64 = months.iter().map(CacheEntry::total).sum();
        ctx.say(format!(
            "✅ Recalculated {} months of {year}. Total: ${total:.2}",
            months.len()
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
