use tracing::error;

use poise::serenity_prelude as serenity;

use crate::moderation::embeds::severity_color;
use warden_guard::Severity;
use warden_utils::embed::build_basic_embed;

/// Publish an audit embed to the guild channel named by the settings.
///
/// Best-effort: a guild without the channel is skipped silently, and a
/// failed send is logged and swallowed. Moderation must not fail because
/// the audit trail did.
pub async fn publish_audit_event(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    log_channel_name: &str,
    title: &str,
    description: &str,
    severity: Severity,
) {
    let channels = match guild_id.channels(http).await {
        Ok(channels) => channels,
        Err(source) => {
            error!(?source, "failed to list guild channels for the audit log");
            return;
        }
    };

    let Some(channel) = channels
        .values()
        .find(|channel| channel.name == log_channel_name)
    else {
        return;
    };

    let embed = build_basic_embed(title, description, severity_color(severity));

    if let Err(source) = channel
        .id
        .send_message(http, serenity::CreateMessage::new().embed(embed))
        .await
    {
        error!(
            ?source,
            channel = %log_channel_name,
            "failed to publish audit event"
        );
    }
}
