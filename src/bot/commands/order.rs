//! Order Discord commands - `/order create|add-item|status|list|deliver`.
//!
//! Status and list views are recomputed from the store on every call, so they
//! always reflect the latest production and deliveries.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, input},
        core::{
            deadline,
            order::{self, NewOrder, NewOrderItem},
            progress, report,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Discord embed field limit
    const MAX_FIELDS: usize = 25;
    /// Discord embed description limit, with room for the truncation note
    const MAX_DESCRIPTION: usize = 3900;

    /// Parent command for customer orders.
    #[poise::command(
        slash_command,
        subcommands(
            "order_create",
            "order_add_item",
            "order_status",
            "order_list",
            "order_deliver"
        )
    )]
    pub async fn order(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Order command. Available subcommands:\n\
            `/order create` - Enter a new order\n\
            `/order add-item` - Add a line to an open order\n\
            `/order status` - Progress of one order\n\
            `/order list` - Progress and deadlines of every order\n\
            `/order deliver` - Mark an order delivered";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Enters a new order with its line items.
    #[poise::command(slash_command, rename = "create")]
    pub async fn order_create(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer name"] customer: String,
        #[description = "Items, e.g. CAM-01|T-shirt|Blue|PP=1,M=2; CAL-02|Trousers||G=4"]
        items: String,
        #[description = "Order code (generated when omitted)"] code: Option<String>,
        #[description = "Expected delivery date, e.g. 2026-03-10"] expected: Option<String>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let items = input::parse_order_items(&items)?;
        let expected_date = expected.as_deref().map(input::parse_date).transpose()?;
        let new_order = NewOrder {
            order_code: code,
            customer,
            entry_date: deadline::today(),
            expected_date,
            notes,
        };

        let created = order::create_order(&ctx.data().database, new_order, items).await?;

        let pieces: i64 = created.items.iter().map(|i| i.total).sum();
        ctx.say(format!(
            "✅ Order {} created for {} with {} item{} ({pieces} pcs).",
            created.order.order_code,
            created.order.customer,
            created.items.len(),
            if created.items.len() == 1 { "" } else { "s" }
        ))
        .await?;
        Ok(())
    }

    /// Adds one part/color line to an order that is not delivered yet.
    #[poise::command(slash_command, rename = "add-item")]
    pub async fn order_add_item(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order code"]
        #[autocomplete = "autocomplete::autocomplete_order_code"]
        code: String,
        #[description = "Part id"]
        #[autocomplete = "autocomplete::autocomplete_part_id"]
        part_id: String,
        #[description = "Part description"] description: String,
        #[description = "Quantities, e.g. PP=1,M=2"] sizes: String,
        #[description = "Color (omit to accept any color)"]
        #[autocomplete = "autocomplete::autocomplete_color"]
        color: Option<String>,
    ) -> Result<()> {
        let item = NewOrderItem {
            part_id,
            description,
            color: color.unwrap_or_default(),
            sizes: sizes.parse()?,
        };

        let added = order::add_order_item(&ctx.data().database, code.trim(), item).await?;

        let color = if added.color.is_empty() {
            "any color"
        } else {
            added.color.as_str()
        };
        ctx.say(format!(
            "✅ Added {} {} ({color}): {} to order {}.",
            added.total,
            added.part_id,
            report::format_sizes(&added.sizes()),
            added.order_code
        ))
        .await?;
        Ok(())
    }

    /// Shows ordered vs produced quantities of one order, per part and color.
    #[poise::command(slash_command, rename = "status")]
    pub async fn order_status(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order code"]
        #[autocomplete = "autocomplete::autocomplete_order_code"]
        code: String,
    ) -> Result<()> {
        let data = ctx.data();
        let progress = progress::build_order_progress(&data.database, code.trim()).await?;
        let status = deadline::classify_order(
            &progress.order,
            deadline::today(),
            data.settings.deadlines.warning_days,
        );

        let mut embed_fields = Vec::new();
        for part in progress.parts.iter().take(MAX_FIELDS) {
            let field_name = format!("{} - {}", part.part_id, part.description);
            embed_fields.push((field_name, report::format_part_progress(part)?, false));
        }

        let header = &progress.order;
        let mut description = format!(
            "**Customer:** {}\n**Entered:** {}\n",
            header.customer, header.entry_date
        );
        if let Some(expected) = header.expected_date {
            writeln!(description, "**Expected:** {expected}")?;
        }
        if let Some(delivered) = header.delivery_date {
            writeln!(description, "**Delivered:** {delivered}")?;
        }
        writeln!(description, "**Status:** {status}")?;
        write!(description, "**Progress:** {}", report::format_order_totals(&progress))?;

        let embed = serenity::CreateEmbed::default()
            .title(format!("🧵 Order {}", header.order_code))
            .description(description)
            .color(if status.is_alert() { 0x00E7_4C3C } else { 0x002E_CC71 })
            .fields(embed_fields);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Lists every order with its progress and delivery status, newest first.
    #[poise::command(slash_command, rename = "list")]
    pub async fn order_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        ctx.defer().await?;

        let summaries = progress::build_fleet_progress(
            &data.database,
            deadline::today(),
            data.settings.deadlines.warning_days,
        )
        .await?;

        if summaries.is_empty() {
            ctx.say("No orders yet. Use `/order create` to enter one!").await?;
            return Ok(());
        }

        let mut description = String::new();
        let mut shown = 0;
        for summary in &summaries {
            let line = report::format_order_summary(summary);
            if description.len() + line.len() > MAX_DESCRIPTION {
                break;
            }
            writeln!(description, "{line}")?;
            shown += 1;
        }
        if shown < summaries.len() {
            write!(description, "… and {} more", summaries.len() - shown)?;
        }

        let alerts = summaries
            .iter()
            .filter(|s| s.delivery_status.is_alert())
            .count();
        let embed = serenity::CreateEmbed::default()
            .title("📋 Orders")
            .description(description)
            .color(0x0058_65F2)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} order{} | {alerts} alert{}",
                summaries.len(),
                if summaries.len() == 1 { "" } else { "s" },
                if alerts == 1 { "" } else { "s" }
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Marks an order delivered today.
    #[poise::command(slash_command, rename = "deliver")]
    pub async fn order_deliver(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order code"]
        #[autocomplete = "autocomplete::autocomplete_order_code"]
        code: String,
    ) -> Result<()> {
        let data = ctx.data();
        let today = deadline::today();
        let delivered = order::mark_delivered(&data.database, code.trim(), today).await?;
        let status =
            deadline::classify_order(&delivered, today, data.settings.deadlines.warning_days);

        ctx.say(format!(
            "📦 Order {} for {} marked delivered on {today} ({status}).",
            delivered.order_code, delivered.customer
        ))
        .await?;
        Ok(())
    }
}

pub use inner::*;
