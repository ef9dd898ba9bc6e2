use poise::serenity_prelude as serenity;

use crate::utility::embeds::{grouped_help_description, protection_overview};
use crate::{COMMANDS, CommandMeta};
use warden_core::{Context, Error};
use warden_utils::embed::INFO_COLOR;

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let command_list = grouped_help_description(&sorted_commands());

    let overview = {
        let automod = ctx.data().automod.lock().await;
        protection_overview(automod.config(), &ctx.data().settings.log_channel_name)
    };

    let embed = serenity::CreateEmbed::new()
        .title("Warden Commands")
        .color(INFO_COLOR)
        .description(command_list)
        .field("Auto Protection", overview, false)
        .field(
            "Context Menus",
            "Right-click a user: Quick Timeout, User Info\n\
             Right-click a message: Delete & Warn",
            false,
        );

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn sorted_commands() -> Vec<&'static CommandMeta> {
    let mut commands: Vec<&'static CommandMeta> = COMMANDS.iter().collect();

    commands.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    commands
}
