use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use warden_core::{Context, Error};
use warden_utils::embed::SUCCESS_COLOR;

pub const META: CommandMeta = CommandMeta {
    name: "serverinfo",
    desc: "Show information about this server.",
    category: "utility",
    usage: "!serverinfo",
};

struct GuildSnapshot {
    name: String,
    icon_url: Option<String>,
    owner_id: serenity::UserId,
    member_count: u64,
    channel_count: usize,
    role_count: usize,
    emoji_count: usize,
}

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn serverinfo(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    // Snapshot the cached guild before the first await; the cache reference
    // can't be held across suspension points.
    let snapshot = ctx.guild().map(|guild| GuildSnapshot {
        name: guild.name.clone(),
        icon_url: guild.icon_url(),
        owner_id: guild.owner_id,
        member_count: guild.member_count,
        channel_count: guild.channels.len(),
        role_count: guild.roles.len(),
        emoji_count: guild.emojis.len(),
    });

    let Some(snapshot) = snapshot else {
        ctx.say("Server details are not cached yet. Try again in a moment.")
            .await?;
        return Ok(());
    };

    let created_unix = guild_id.created_at().unix_timestamp();

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("{} Server Info", snapshot.name))
        .color(SUCCESS_COLOR)
        .field("Owner", format!("<@{}>", snapshot.owner_id.get()), true)
        .field("Members", snapshot.member_count.to_string(), true)
        .field("Created", format!("<t:{}:F>", created_unix), true)
        .field("Channels", snapshot.channel_count.to_string(), true)
        .field("Roles", snapshot.role_count.to_string(), true)
        .field("Emojis", snapshot.emoji_count.to_string(), true)
        .timestamp(serenity::Timestamp::now());

    if let Some(icon_url) = snapshot.icon_url {
        embed = embed.thumbnail(icon_url);
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
