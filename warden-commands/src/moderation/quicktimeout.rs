use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::error;

use poise::serenity_prelude as serenity;

use crate::moderation::embeds::{
    guild_only_message, is_missing_permissions_error, missing_permission_message,
    moderation_bot_target_message, moderation_self_action_message,
};
use crate::moderation::logging::publish_audit_event;
use warden_core::{Context, Error};
use warden_guard::Severity;
use warden_utils::permissions::has_user_permission;

const QUICK_TIMEOUT_SECS: u64 = 10 * 60;

/// Right-click a user: apply a 10-minute timeout without typing a command.
#[poise::command(context_menu_command = "Quick Timeout", category = "Moderation")]
pub async fn quick_timeout(
    ctx: Context<'_>,
    #[description = "The user to timeout"] user: serenity::User,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.send(
            poise::CreateReply::default()
                .ephemeral(true)
                .content(guild_only_message()),
        )
        .await?;
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
        ctx.send(
            poise::CreateReply::default()
                .ephemeral(true)
                .content(missing_permission_message("Moderate Members")),
        )
        .await?;
        return Ok(());
    }

    if user.bot {
        ctx.send(
            poise::CreateReply::default()
                .ephemeral(true)
                .content(moderation_bot_target_message()),
        )
        .await?;
        return Ok(());
    }

    if user.id == ctx.author().id {
        ctx.send(
            poise::CreateReply::default()
                .ephemeral(true)
                .content(moderation_self_action_message("timeout")),
        )
        .await?;
        return Ok(());
    }

    let until_system_time = SystemTime::now()
        .checked_add(Duration::from_secs(QUICK_TIMEOUT_SECS))
        .unwrap_or(SystemTime::now());
    let until_unix = until_system_time
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs()) as i64;
    let until = serenity::Timestamp::from_unix_timestamp(until_unix)?;

    let edit = serenity::EditMember::new().disable_communication_until_datetime(until);
    if let Err(source) = guild_id.edit_member(ctx.http(), user.id, edit).await {
        if !is_missing_permissions_error(&source) {
            error!(?source, "quick timeout request failed");
        }
        ctx.send(
            poise::CreateReply::default()
                .ephemeral(true)
                .content("I couldn't timeout that user. Check role hierarchy and permissions."),
        )
        .await?;
        return Ok(());
    }

    publish_audit_event(
        ctx.http(),
        guild_id,
        &ctx.data().settings.log_channel_name,
        "Quick Timeout",
        &format!(
            "{} was timed out for 10 minutes by {}",
            user.tag(),
            ctx.author().tag()
        ),
        Severity::Warning,
    )
    .await;

    ctx.send(
        poise::CreateReply::default()
            .ephemeral(true)
            .content(format!("{} has been timed out for 10 minutes.", user.tag())),
    )
    .await?;

    Ok(())
}
