use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    guild_only_message, missing_permission_message, moderation_action_embed,
    moderation_bot_target_message, send_moderation_target_dm_for_guild,
    target_profile_from_user, usage_message,
};
use crate::moderation::logging::publish_audit_event;
use warden_core::{Context, Error};
use warden_guard::Severity;
use warden_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "warn",
    desc: "Warn a user via DM.",
    category: "moderation",
    usage: "!warn <user> <reason>",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "The user to warn"] user: Option<serenity::User>,
    #[description = "Reason for the warning"]
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
        serenity::Permissions::MODERATE_MEMBERS,
    )
    .await?
    {
        ctx.say(missing_permission_message("Moderate Members"))
            .await?;
        return Ok(());
    }

    let (Some(user), Some(reason)) = (user, reason) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if user.bot {
        ctx.say(moderation_bot_target_message()).await?;
        return Ok(());
    }

    let dm_result = send_moderation_target_dm_for_guild(
        ctx.http(),
        &user,
        guild_id,
        "warned",
        Some(&reason),
        None,
    )
    .await;

    publish_audit_event(
        ctx.http(),
        guild_id,
        &ctx.data().settings.log_channel_name,
        "User Warned",
        &format!(
            "{} was warned by {}. Reason: {}",
            user.tag(),
            ctx.author().tag(),
            reason
        ),
        Severity::Warning,
    )
    .await;

    let target_profile = target_profile_from_user(&user);
    let embed = moderation_action_embed(
        &target_profile,
        user.id,
        "warned",
        Some(&reason),
        None,
        Severity::Warning,
    )
    .footer(serenity::CreateEmbedFooter::new(if dm_result.is_ok() {
        "DM delivered"
    } else {
        "DM could not be delivered"
    }));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
