use std::time::{Duration, SystemTime, UNIX_EPOCH};

use poise::serenity_prelude as serenity;
use tracing::{error, warn};

use warden_commands::moderation::logging::publish_audit_event;
use warden_core::{Data, Error};
use warden_guard::{Action, Directive, PolicyKind};
use warden_utils::permissions::bot_has_permission;
use warden_utils::time::now_unix_millis;

/// Feed an inbound message to the abuse evaluator and execute whatever
/// directive comes back.
pub async fn handle_message_automod(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
) -> Result<(), Error> {
    let Some(guild_id) = message.guild_id else {
        return Ok(());
    };

    let is_automated = message.author.bot || message.webhook_id.is_some();
    let mentioned: Vec<u64> = message.mentions.iter().map(|user| user.id.get()).collect();

    // Hold the lock only for the synchronous evaluate step; the platform
    // calls below must not serialize other inbound events.
    let directive = {
        let mut automod = data.automod.lock().await;
        automod.on_message(
            message.author.id.get(),
            is_automated,
            &mentioned,
            now_unix_millis(),
        )?
    };

    let Some(directive) = directive else {
        return Ok(());
    };

    execute_message_directive(ctx, data, guild_id, message, &directive).await;
    Ok(())
}

/// Carry out a directive produced for a message event. Every platform call
/// is best-effort: failures are logged and the directive is simply dropped;
/// the evaluator re-emits it if the condition recurs.
async fn execute_message_directive(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: serenity::GuildId,
    message: &serenity::Message,
    directive: &Directive,
) {
    for action in &directive.actions {
        match action {
            Action::PurgeRecent { lookback } => {
                purge_recent_from_targets(ctx, message, directive, *lookback).await;
            }
            Action::DeleteMessage => {
                if let Err(source) = message.delete(&ctx.http).await {
                    if !is_missing_permissions(&source) {
                        error!(?source, "failed to delete the triggering message");
                    } else {
                        warn!("missing permissions to delete the triggering message");
                    }
                }
            }
            Action::Timeout { secs } => {
                timeout_targets(ctx, guild_id, directive, *secs).await;
            }
            Action::Kick => {
                kick_targets(ctx, guild_id, directive).await;
            }
        }
    }

    publish_audit_event(
        &ctx.http,
        guild_id,
        &data.settings.log_channel_name,
        audit_title(directive.policy),
        &format!("{}: {}", message.author.tag(), directive.reason),
        directive.severity,
    )
    .await;
}

async fn purge_recent_from_targets(
    ctx: &serenity::Context,
    message: &serenity::Message,
    directive: &Directive,
    lookback: u8,
) {
    let fetched = message
        .channel_id
        .messages(&ctx.http, serenity::GetMessages::new().limit(lookback))
        .await;

    let recent = match fetched {
        Ok(messages) => messages,
        Err(source) => {
            error!(?source, "failed to fetch recent messages for flood purge");
            return;
        }
    };

    for offending in recent
        .iter()
        .filter(|candidate| directive.targets.contains(&candidate.author.id.get()))
    {
        if let Err(source) = offending.delete(&ctx.http).await {
            if !is_missing_permissions(&source) {
                error!(?source, "failed to delete flood message");
            }
        }
    }
}

async fn timeout_targets(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    directive: &Directive,
    secs: u64,
) {
    if !bot_has_permission(
        &ctx.http,
        guild_id,
        serenity::Permissions::MODERATE_MEMBERS,
    )
    .await
    {
        warn!("missing Moderate Members permission; skipping automod timeout");
        return;
    }

    let until_system_time = SystemTime::now()
        .checked_add(Duration::from_secs(secs))
        .unwrap_or(SystemTime::now());
    let until_unix = until_system_time
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs()) as i64;
    let Ok(until) = serenity::Timestamp::from_unix_timestamp(until_unix) else {
        return;
    };

    for target in &directive.targets {
        let edit = serenity::EditMember::new()
            .disable_communication_until_datetime(until)
            .audit_log_reason(&directive.reason);
        if let Err(source) = guild_id
            .edit_member(&ctx.http, serenity::UserId::new(*target), edit)
            .await
        {
            if !is_missing_permissions(&source) {
                error!(?source, user_id = *target, "failed to timeout user");
            } else {
                warn!(
                    user_id = *target,
                    "missing permissions to timeout user (check role hierarchy)"
                );
            }
        }
    }
}

async fn kick_targets(ctx: &serenity::Context, guild_id: serenity::GuildId, directive: &Directive) {
    for target in &directive.targets {
        if let Err(source) = guild_id
            .kick_with_reason(&ctx.http, serenity::UserId::new(*target), &directive.reason)
            .await
        {
            if !is_missing_permissions(&source) {
                error!(?source, user_id = *target, "failed to kick user");
            } else {
                warn!(user_id = *target, "missing permissions to kick user");
            }
        }
    }
}

pub(crate) fn audit_title(policy: PolicyKind) -> &'static str {
    match policy {
        PolicyKind::MessageFlood => "Anti-Spam Triggered",
        PolicyKind::MentionFlood => "Mention Spam",
        PolicyKind::JoinFlood => "Raid Protection Triggered",
    }
}

pub(crate) fn is_missing_permissions(source: &serenity::Error) -> bool {
    matches!(
        source,
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 403 || response.error.code == 50013
    )
}
