//! General Discord commands - ping and help.
//! These commands don't require database operations.

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
        let help_text = "**ProductionBuddy Help**\n\
        Here is a summary of all available commands.\n\n\
        **Floor Commands**\n\
        • `/produce <part> <description> <entries> [customer] [cut] [notes]` - Logs finished goods. Entries look like `Blue:PP=1,M=3; Black:G=2`.\n\
        • `/cut <code> <part> <description> <grade> <colors> [notes]` - Logs a cutting batch. Grade looks like `PP=1,M=2`, colors like `Blue=10; Black=5`.\n\n\
        **Order Commands**\n\
        • `/order create <customer> <items> [code] [expected] [notes]` - Items look like `PART|Description|Color|PP=1,M=2; ...` (leave the color empty to accept any).\n\
        • `/order add-item <code> <part> <description> <sizes> [color]` - Adds a line to an open order.\n\
        • `/order status <code>` - Shows per-part and per-color progress.\n\
        • `/order list` - Shows progress and deadline status of every order.\n\
        • `/order deliver <code>` - Marks an order delivered today.\n\n\
        **Reports**\n\
        • `/stock [search]` - Shows stock on hand with open-order reservations.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
