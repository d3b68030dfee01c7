//! Production Discord commands - `produce` and `cut`.
//!
//! Both commands take compact multi-entry input, parse it with `bot::input`, and
//! hand it to the core workflows, which write every row of a submission in one
//! transaction.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, input},
        core::{
            cut::{self, NewCut},
            deadline,
            production::{self, NewProduction},
            report,
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Logs finished goods for one part, one row per color.
    #[poise::command(slash_command, prefix_command)]
    pub async fn produce(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Part id"]
        #[autocomplete = "autocomplete::autocomplete_part_id"]
        part_id: String,
        #[description = "Part description"] description: String,
        #[description = "Entries, e.g. Blue:PP=1,M=3; Black:G=2"] entries: String,
        #[description = "Customer the goods were made for"] customer: Option<String>,
        #[description = "Cutting batch code"] cut_code: Option<String>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let launches = input::parse_production_entries(&entries)?;
        let new_production = NewProduction {
            production_date: deadline::today(),
            cut_code,
            part_id,
            description,
            customer,
            notes,
        };

        let rows = production::log_production(&ctx.data().database, new_production, launches).await?;

        let mut message = String::from("✅ Production logged:\n");
        for row in &rows {
            writeln!(
                message,
                "• {} {}: {} ({} pcs)",
                row.part_id,
                row.color,
                report::format_sizes(&row.sizes()),
                row.total
            )?;
        }
        ctx.say(message).await?;
        Ok(())
    }

    /// Logs a cutting batch; quantities per color are grade × sheets.
    #[poise::command(slash_command, prefix_command)]
    pub async fn cut(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Batch code"] cut_code: String,
        #[description = "Part id"]
        #[autocomplete = "autocomplete::autocomplete_part_id"]
        part_id: String,
        #[description = "Part description"] description: String,
        #[description = "Pieces per sheet, e.g. PP=1,M=2"] grade: String,
        #[description = "Sheets per color, e.g. Blue=10; Black=5"] colors: String,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let new_cut = NewCut {
            cut_date: deadline::today(),
            cut_code,
            part_id,
            description,
            grade: grade.parse()?,
            notes,
        };
        let colors = input::parse_cut_colors(&colors)?;

        let rows = cut::log_cut(&ctx.data().database, new_cut, colors).await?;

        let mut message = String::new();
        if let Some(first) = rows.first() {
            writeln!(message, "✅ Cut {} logged for {}:", first.cut_code, first.part_id)?;
        }
        for row in &rows {
            writeln!(
                message,
                "• {} × {} sheets = {} pcs",
                row.color, row.sheets, row.qty_total
            )?;
        }
        ctx.say(message).await?;
        Ok(())
    }
}

pub use inner::*;
