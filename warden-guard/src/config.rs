/// Thresholds and timeframes for the abuse policies.
///
/// Values are environment-sourced at startup; every field has a default so
/// the bot runs unconfigured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardConfig {
    /// Messages from one user within the timeframe that count as a flood.
    pub message_flood_threshold: u32,
    /// Width of the message-flood window in milliseconds.
    pub message_flood_timeframe_ms: u64,
    /// Distinct users a single message may mention before it is flagged.
    pub mention_flood_max: u32,
    /// Guild joins within the timeframe that count as a raid.
    pub join_flood_threshold: u32,
    /// Width of the join-flood window in milliseconds.
    pub join_flood_timeframe_ms: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            message_flood_threshold: 5,
            message_flood_timeframe_ms: 5_000,
            mention_flood_max: 5,
            join_flood_threshold: 5,
            join_flood_timeframe_ms: 30_000,
        }
    }
}
