use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    guild_only_message, is_missing_permissions_error, missing_permission_message,
    moderation_action_embed, moderation_bot_target_message, moderation_self_action_message,
    target_profile_from_user, usage_message,
};
use crate::moderation::logging::publish_audit_event;
use warden_core::{Context, Error};
use warden_guard::Severity;
use warden_utils::formatting::format_compact_duration;
use warden_utils::parse::parse_timeout_seconds;
use warden_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "timeout",
    desc: "Timeout a user for a duration (default: 10m).",
    category: "moderation",
    usage: "!timeout <user> [duration] [reason]",
};

const DEFAULT_TIMEOUT_SECS: u64 = 10 * 60;
const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn timeout(
    ctx: Context<'_>,
    #[description = "The user to timeout"] user: Option<serenity::User>,
    #[description = "Duration (e.g. 30s, 10m, 2h; plain numbers are minutes)"] duration: Option<
        String,
    >,
    #[description = "Reason for the timeout"]
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

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if user.bot {
        ctx.say(moderation_bot_target_message()).await?;
        return Ok(());
    }

    if user.id == ctx.author().id {
        ctx.say(moderation_self_action_message("timeout")).await?;
        return Ok(());
    }

    let timeout_secs = match duration.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => {
            let Some(seconds) = parse_timeout_seconds(raw) else {
                ctx.say(format!(
                    "Invalid duration. Usage: `{}` (examples: 30s, 10m, 2h, 1d)",
                    META.usage
                ))
                .await?;
                return Ok(());
            };
            seconds
        }
        None => DEFAULT_TIMEOUT_SECS,
    };

    if timeout_secs > MAX_TIMEOUT_SECS {
        ctx.say("Maximum timeout duration is 1 day.").await?;
        return Ok(());
    }

    let duration_label = format_compact_duration(timeout_secs);

    let until_system_time = SystemTime::now()
        .checked_add(Duration::from_secs(timeout_secs))
        .unwrap_or(SystemTime::now());
    let until_unix = until_system_time
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs()) as i64;
    let until = serenity::Timestamp::from_unix_timestamp(until_unix)?;

    let edit = serenity::EditMember::new().disable_communication_until_datetime(until);
    let timeout_result = guild_id.edit_member(ctx.http(), user.id, edit).await;

    if let Err(source) = timeout_result {
        if !is_missing_permissions_error(&source) {
            error!(?source, "timeout request failed");
        }
        ctx.say("I couldn't timeout that user. Check role hierarchy and permissions.")
            .await?;
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| "No reason provided".to_owned());

    publish_audit_event(
        ctx.http(),
        guild_id,
        &ctx.data().settings.log_channel_name,
        "User Timed Out",
        &format!(
            "{} was timed out by {} for {}. Reason: {}",
            user.tag(),
            ctx.author().tag(),
            duration_label,
            reason
        ),
        Severity::Warning,
    )
    .await;

    let target_profile = target_profile_from_user(&user);
    let embed = moderation_action_embed(
        &target_profile,
        user.id,
        "timed out",
        Some(&reason),
        Some(&duration_label),
        Severity::Warning,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
