use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    guild_only_message, missing_permission_message, moderation_action_embed,
    moderation_self_action_message, target_profile_from_user, usage_message,
};
use crate::moderation::logging::publish_audit_event;
use warden_core::{Context, Error};
use warden_guard::Severity;
use warden_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "ban",
    desc: "Ban a user from the server.",
    category: "moderation",
    usage: "!ban <user> [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "The user to ban"] user: Option<serenity::User>,
    #[description = "Days of messages to delete (0-7)"]
    #[min = 0]
    #[max = 7]
    delete_days: Option<u8>,
    #[description = "Reason for the ban"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::BAN_MEMBERS,
    )
    .await?
    {
        ctx.say(missing_permission_message("Ban Members")).await?;
        return Ok(());
    }

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if user.id == ctx.author().id {
        ctx.say(moderation_self_action_message("ban")).await?;
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| "No reason provided".to_owned());
    let delete_days = delete_days.unwrap_or(0).min(7);

    let ban_result = guild_id
        .ban_with_reason(ctx.http(), user.id, delete_days, &reason)
        .await;

    if let Err(source) = ban_result {
        error!(?source, "ban request failed");
        ctx.say("I couldn't ban that user. Check role hierarchy and permissions.")
            .await?;
        return Ok(());
    }

    publish_audit_event(
        ctx.http(),
        guild_id,
        &ctx.data().settings.log_channel_name,
        "User Banned",
        &format!(
            "{} was banned by {}. Reason: {}",
            user.tag(),
            ctx.author().tag(),
            reason
        ),
        Severity::Error,
    )
    .await;

    let target_profile = target_profile_from_user(&user);
    let embed = moderation_action_embed(
        &target_profile,
        user.id,
        "banned",
        Some(&reason),
        None,
        Severity::Error,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
