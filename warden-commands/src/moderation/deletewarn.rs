use tracing::error;

use poise::serenity_prelude as serenity;

use crate::moderation::embeds::{
    guild_only_message, missing_permission_message, send_moderation_target_dm_for_guild,
};
use crate::moderation::logging::publish_audit_event;
use warden_core::{Context, Error};
use warden_guard::Severity;
use warden_utils::permissions::has_user_permission;

/// Right-click a message: delete it and warn its author via DM.
#[poise::command(context_menu_command = "Delete & Warn", category = "Moderation")]
pub async fn delete_and_warn(
    ctx: Context<'_>,
    #[description = "The message to delete"] message: serenity::Message,
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
        serenity::Permissions::MANAGE_MESSAGES,
    )
    .await?
    {
        ctx.send(
            poise::CreateReply::default()
                .ephemeral(true)
                .content(missing_permission_message("Manage Messages")),
        )
        .await?;
        return Ok(());
    }

    if message.author.bot {
        ctx.send(
            poise::CreateReply::default()
                .ephemeral(true)
                .content("You can't warn bots or application accounts."),
        )
        .await?;
        return Ok(());
    }

    if let Err(source) = message.delete(ctx.http()).await {
        error!(?source, "delete-and-warn message deletion failed");
        ctx.send(
            poise::CreateReply::default()
                .ephemeral(true)
                .content("I couldn't delete that message."),
        )
        .await?;
        return Ok(());
    }

    let _ = send_moderation_target_dm_for_guild(
        ctx.http(),
        &message.author,
        guild_id,
        "warned",
        Some("Your message was removed by a moderator"),
        None,
    )
    .await;

    publish_audit_event(
        ctx.http(),
        guild_id,
        &ctx.data().settings.log_channel_name,
        "Message Deleted & User Warned",
        &format!(
            "{}'s message was deleted and the user warned by {}",
            message.author.tag(),
            ctx.author().tag()
        ),
        Severity::Moderate,
    )
    .await;

    ctx.send(
        poise::CreateReply::default()
            .ephemeral(true)
            .content(format!("Deleted the message and warned {}.", message.author.tag())),
    )
    .await?;

    Ok(())
}
