use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use warden_core::{Context, Error};
use warden_utils::embed::INFO_COLOR;

pub const META: CommandMeta = CommandMeta {
    name: "userinfo",
    desc: "Show information about a user.",
    category: "utility",
    usage: "!userinfo <user>",
};

#[poise::command(
    prefix_command,
    slash_command,
    context_menu_command = "User Info",
    category = "Utility"
)]
pub async fn userinfo(
    ctx: Context<'_>,
    #[description = "The user to inspect"] user: serenity::User,
) -> Result<(), Error> {
    let mut embed = serenity::CreateEmbed::new()
        .title(user.tag())
        .color(INFO_COLOR)
        .thumbnail(user.face())
        .field("User ID", user.id.to_string(), true)
        .field(
            "Account Created",
            format!("<t:{}:F>", user.id.created_at().unix_timestamp()),
            false,
        );

    if let Some(guild_id) = ctx.guild_id()
        && let Ok(member) = guild_id.member(ctx.http(), user.id).await
    {
        if let Some(joined_at) = member.joined_at {
            embed = embed.field(
                "Joined Server",
                format!("<t:{}:F>", joined_at.unix_timestamp()),
                false,
            );
        }

        let roles = member
            .roles
            .iter()
            .map(|role_id| format!("<@&{}>", role_id.get()))
            .collect::<Vec<_>>()
            .join(", ");
        embed = embed.field(
            "Roles",
            if roles.is_empty() {
                "None".to_owned()
            } else {
                roles
            },
            false,
        );
    }

    ctx.send(poise::CreateReply::default().ephemeral(true).embed(embed))
        .await?;
    Ok(())
}
