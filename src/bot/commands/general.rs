//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Studio Ledger Help**\n\
        Here is a summary of all available commands.\n\n\
        **Recurring Entries**\n\
        • `/generate [period]` - Generates the recurring entries of a month (YYYY-MM, defaults to now).\n\
        • `/edit_entry <id> [amount] [description] [notes]` - Edits one generated entry only.\n\
        • `/blueprints` - Lists active recurring blueprints.\n\n\
        **Revenue**\n\
        • `/revenue [year]` - Shows cached monthly revenue.\n\
        • `/recalculate [year] [reset]` - Rebuilds a year of the revenue cache, optionally dropping it first.\n\n\
        **Maintenance**\n\
        • `/integrity [repair]` - Checks appointments against workflow sessions, optionally repairing.\n\
        • `/proofing <enabled>` - Enables or disables the gallery proofing workflow stages.\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
