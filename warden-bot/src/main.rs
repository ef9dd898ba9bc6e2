mod events;

use std::env;
use std::sync::Arc;
use std::time::Instant;

use poise::serenity_prelude as serenity;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;

use warden_core::{Data, Error, Settings};
use warden_guard::{AutoMod, GuardConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN")?;

    let defaults = GuardConfig::default();
    let guard_config = GuardConfig {
        message_flood_threshold: env_u64(
            "MESSAGE_FLOOD_THRESHOLD",
            defaults.message_flood_threshold as u64,
        ) as u32,
        message_flood_timeframe_ms: env_u64(
            "MESSAGE_FLOOD_TIMEFRAME_MS",
            defaults.message_flood_timeframe_ms,
        ),
        mention_flood_max: env_u64("MENTION_FLOOD_MAX", defaults.mention_flood_max as u64) as u32,
        join_flood_threshold: env_u64(
            "JOIN_FLOOD_THRESHOLD",
            defaults.join_flood_threshold as u64,
        ) as u32,
        join_flood_timeframe_ms: env_u64(
            "JOIN_FLOOD_TIMEFRAME_MS",
            defaults.join_flood_timeframe_ms,
        ),
    };
    info!(?guard_config, "Protection thresholds configured.");

    let settings = Settings {
        log_channel_name: env_str("LOG_CHANNEL", "mod-logs"),
        prefix: env_str("COMMAND_PREFIX", warden_utils::DEFAULT_COMMAND_PREFIX),
    };
    info!(
        log_channel = %settings.log_channel_name,
        prefix = %settings.prefix,
        "Runtime settings loaded."
    );

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MODERATION;

    let prefix = settings.prefix.clone();
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: warden_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!(
                    user = %ready.user.name,
                    guilds = ready.guilds.len(),
                    "Warden has awoken!"
                );

                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Application commands registered globally.");

                ctx.set_activity(Some(serenity::ActivityData::watching(
                    "/help | Protecting servers",
                )));

                Ok(Data {
                    automod: Arc::new(Mutex::new(AutoMod::new(guard_config))),
                    settings: Arc::new(settings),
                    started_at: Instant::now(),
                })
            })
        })
        .build();

    info!("Warden is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_str(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_owned(),
        _ => default.to_owned(),
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, "command error");

            let embed = serenity::CreateEmbed::new()
                .title("Command Error")
                .description("Something went wrong while running this command.")
                .color(warden_utils::embed::ERROR_COLOR);

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = format!(
                "Usage: `{}{}`",
                ctx.data().settings.prefix,
                ctx.command().qualified_name
            );
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\n{}", input, usage)
            } else {
                format!("Missing required argument.\n{}", usage)
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            events::automod::handle_message_automod(ctx, data, new_message).await?;
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            events::members::handle_member_join(ctx, data, new_member).await?;
        }
        serenity::FullEvent::GuildMemberRemoval { guild_id, user, .. } => {
            events::members::handle_member_leave(ctx, data, *guild_id, user).await;
        }
        _ => {}
    }

    Ok(())
}
