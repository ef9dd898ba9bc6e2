use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use warden_core::{Context, Error};
use warden_utils::embed::INFO_COLOR;
use warden_utils::formatting::format_uptime;

pub const META: CommandMeta = CommandMeta {
    name: "stats",
    desc: "Show bot statistics.",
    category: "utility",
    usage: "!stats",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn stats(ctx: Context<'_>) -> Result<(), Error> {
    let (guild_count, member_count) = {
        let cache = &ctx.serenity_context().cache;
        let guild_ids = cache.guilds();
        let member_count: u64 = guild_ids
            .iter()
            .filter_map(|guild_id| guild_id.to_guild_cached(cache).map(|guild| guild.member_count))
            .sum();
        (guild_ids.len(), member_count)
    };

    let latency = ctx.ping().await;
    let uptime = format_uptime(ctx.data().started_at.elapsed().as_secs());

    let embed = serenity::CreateEmbed::new()
        .title("Bot Statistics")
        .color(INFO_COLOR)
        .field("Servers", guild_count.to_string(), true)
        .field("Users", member_count.to_string(), true)
        .field("Latency", format!("{}ms", latency.as_millis()), true)
        .field("Uptime", uptime, true)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Requested by {}",
            ctx.author().tag()
        )))
        .timestamp(serenity::Timestamp::now());

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
