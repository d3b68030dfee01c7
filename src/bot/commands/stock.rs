//! Stock Discord command - the stock ledger with reservations.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{report, stock},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Discord embed field limit
    const MAX_FIELDS: usize = 25;

    /// Shows stock on hand per part, with open-order reservations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn stock(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Filter by part id or description"] search: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        ctx.defer().await?;

        let ledger =
            stock::build_stock_ledger(&data.database, data.settings.stock.visibility()).await?;
        let ledger = match search.as_deref() {
            Some(query) => stock::filter_stock(ledger, query),
            None => ledger,
        };

        if ledger.is_empty() {
            ctx.say("📦 Nothing in stock matches.").await?;
            return Ok(());
        }

        let mut embed_fields = Vec::new();
        for balance in ledger.iter().take(MAX_FIELDS) {
            let field_name = format!("{} - {}", balance.part_id, balance.description);
            embed_fields.push((field_name, report::format_stock_balance(balance)?, false));
        }

        let total: i64 = ledger.iter().map(|b| b.total_on_hand).sum();
        let mut embed = serenity::CreateEmbed::default()
            .title("📦 Stock on Hand")
            .color(0x0034_98DB)
            .fields(embed_fields)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} part{} | {total} piece{}",
                ledger.len(),
                if ledger.len() == 1 { "" } else { "s" },
                if total == 1 { "" } else { "s" }
            )));
        if ledger.len() > MAX_FIELDS {
            embed = embed.description(format!(
                "Showing the first {MAX_FIELDS} parts. Narrow the list with `search`."
            ));
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

pub use inner::*;
