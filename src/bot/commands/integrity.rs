//! Maintenance Discord commands - `integrity` and `proofing`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{
            integrity, report,
            workflow::{self, Addon},
        },
        errors::{Error, Result},
    };

    /// Checks appointments against workflow sessions.
    ///
    /// With `repair`, every issue is fixed and the check runs again.
    #[poise::command(slash_command, prefix_command)]
    pub async fn integrity(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Repair the issues found"] repair: Option<bool>,
    ) -> Result<()> {
        let db = ctx.data().database.as_ref();

        ctx.defer().await?;

        let text = if repair.unwrap_or(false) {
            let (repaired, remaining) = integrity::check_and_repair(db).await?;
            report::format_repair(&repaired, &remaining)?
        } else {
            let issues = integrity::check_integrity(db).await?;
            report::format_issues(&issues)?
        };

        ctx.say(format!("🩺 **Integrity**\n```\n{text}\n```")).await?;
        Ok(())
    }

    /// Enables or disables the gallery proofing stages on the workflow board.
    #[poise::command(slash_command, prefix_command)]
    pub async fn proofing(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Whether gallery proofing is enabled"] enabled: bool,
    ) -> Result<()> {
        let db = ctx.data().database.as_ref();
        let stages = workflow::provision_addon_stages(db, Addon::GalleryProofing, enabled).await?;
        let names: Vec<&str> = stages.iter().map(|s| s.name.as_str()).collect();

        let reply = if enabled {
            format!("✅ Gallery proofing enabled: {}", names.join(", "))
        } else {
            "✅ Gallery proofing disabled. Existing sessions keep their stage.".to_string()
        };
        ctx.say(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
