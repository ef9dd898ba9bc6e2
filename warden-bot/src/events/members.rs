use poise::serenity_prelude as serenity;
use tracing::{error, warn};

use warden_commands::moderation::logging::publish_audit_event;
use warden_core::{Data, Error};
use warden_guard::{Directive, Severity};
use warden_utils::embed::{SUCCESS_COLOR, build_basic_embed};
use warden_utils::time::now_unix_millis;

use crate::events::automod::{audit_title, is_missing_permissions};

/// Audit a join, evaluate the join-flood policy, and greet the member.
pub async fn handle_member_join(
    ctx: &serenity::Context,
    data: &Data,
    member: &serenity::Member,
) -> Result<(), Error> {
    let guild_id = member.guild_id;

    publish_audit_event(
        &ctx.http,
        guild_id,
        &data.settings.log_channel_name,
        "Member Joined",
        &format!(
            "{} ({}) joined the server",
            member.user.tag(),
            member.user.id.get()
        ),
        Severity::Success,
    )
    .await;

    let directive = {
        let mut automod = data.automod.lock().await;
        automod.on_member_join(member.user.id.get(), now_unix_millis())?
    };

    if let Some(directive) = directive {
        execute_join_directive(ctx, data, guild_id, &directive).await;
    }

    send_welcome_message(ctx, member).await;
    Ok(())
}

/// Audit a member leaving the guild.
pub async fn handle_member_leave(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: serenity::GuildId,
    user: &serenity::User,
) {
    publish_audit_event(
        &ctx.http,
        guild_id,
        &data.settings.log_channel_name,
        "Member Left",
        &format!("{} ({}) left the server", user.tag(), user.id.get()),
        Severity::Error,
    )
    .await;
}

/// Kick every contributor named by a join-flood directive, best-effort.
async fn execute_join_directive(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: serenity::GuildId,
    directive: &Directive,
) {
    let mut kicked = 0_usize;

    for target in &directive.targets {
        match guild_id
            .kick_with_reason(&ctx.http, serenity::UserId::new(*target), &directive.reason)
            .await
        {
            Ok(()) => kicked += 1,
            Err(source) => {
                if !is_missing_permissions(&source) {
                    error!(?source, user_id = *target, "failed to kick raid member");
                } else {
                    warn!(user_id = *target, "missing permissions to kick raid member");
                }
            }
        }
    }

    publish_audit_event(
        &ctx.http,
        guild_id,
        &data.settings.log_channel_name,
        audit_title(directive.policy),
        &format!(
            "Kicked {} of {} members: {}",
            kicked,
            directive.targets.len(),
            directive.reason
        ),
        directive.severity,
    )
    .await;
}

/// Greet a new member in the guild's welcome channel, if one exists.
async fn send_welcome_message(ctx: &serenity::Context, member: &serenity::Member) {
    let channels = match member.guild_id.channels(&ctx.http).await {
        Ok(channels) => channels,
        Err(source) => {
            error!(?source, "failed to list channels for the welcome message");
            return;
        }
    };

    let Some(channel) = channels
        .values()
        .find(|channel| channel.name == "welcome" || channel.name == "general")
    else {
        return;
    };

    let embed = build_basic_embed(
        "Welcome!",
        format!(
            "Welcome to the server, <@{}>! Please read the rules and enjoy your stay.",
            member.user.id.get()
        ),
        SUCCESS_COLOR,
    )
    .thumbnail(member.user.face());

    if let Err(source) = channel
        .id
        .send_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
        .await
    {
        error!(?source, "failed to send welcome message");
    }
}
