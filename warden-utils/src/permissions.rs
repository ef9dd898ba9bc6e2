use poise::serenity_prelude as serenity;
use tracing::warn;

/// Resolve a member's effective guild-level permissions from their roles.
///
/// The guild owner short-circuits to all permissions.
pub async fn resolve_member_permissions(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<serenity::Permissions> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(serenity::Permissions::all());
    }

    let member = guild_id.member(http, user_id).await?;
    let roles = guild_id.roles(http).await?;

    let mut resolved = serenity::Permissions::empty();
    let everyone_role_id = serenity::RoleId::new(guild_id.get());

    for role in roles.values() {
        if role.id == everyone_role_id || member.roles.contains(&role.id) {
            resolved |= role.permissions;
        }
    }

    Ok(resolved)
}

pub async fn has_user_permission(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    required: serenity::Permissions,
) -> anyhow::Result<bool> {
    let perms = resolve_member_permissions(http, guild_id, user_id).await?;

    Ok(perms.contains(serenity::Permissions::ADMINISTRATOR) || perms.contains(required))
}

/// Whether the bot's own member holds `required` in this guild. Used by the
/// protection hooks before attempting timeouts; failure to resolve counts as
/// not permitted.
pub async fn bot_has_permission(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    required: serenity::Permissions,
) -> bool {
    let bot_user = match http.get_current_user().await {
        Ok(user) => user,
        Err(source) => {
            warn!(?source, "failed to resolve the bot's own user");
            return false;
        }
    };

    has_user_permission(http, guild_id, bot_user.id, required)
        .await
        .unwrap_or(false)
}
