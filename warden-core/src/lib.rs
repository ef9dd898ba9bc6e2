use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use warden_guard::AutoMod;

pub type Error = anyhow::Error;

/// Runtime settings the command and event layers read.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Name of the guild channel audit embeds are published to.
    pub log_channel_name: String,
    /// Prefix for legacy text commands.
    pub prefix: String,
}

#[derive(Clone, Debug)]
pub struct Data {
    /// The one shared abuse evaluator. The gateway dispatches handlers
    /// concurrently, so it sits behind a mutex held only for the synchronous
    /// evaluate step.
    pub automod: Arc<Mutex<AutoMod>>,
    pub settings: Arc<Settings>,
    pub started_at: Instant,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
