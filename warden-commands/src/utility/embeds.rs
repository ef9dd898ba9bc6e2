use crate::CommandMeta;
use warden_guard::GuardConfig;

pub fn grouped_help_description(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for command in commands {
        if current_category != Some(command.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", display_category(command.category)));
            current_category = Some(command.category);
        }

        out.push_str(&format!("`{}`: {}\n", command.name, command.desc));
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }

    out.trim_end().to_owned()
}

/// Summarize the active protection thresholds for the help embed.
pub fn protection_overview(config: &GuardConfig, log_channel_name: &str) -> String {
    format!(
        "Anti-spam: {} messages within {}s\n\
         Mention spam: more than {} mentions in one message\n\
         Raid protection: {} joins within {}s\n\
         Audit trail: #{}",
        config.message_flood_threshold,
        config.message_flood_timeframe_ms / 1000,
        config.mention_flood_max,
        config.join_flood_threshold,
        config.join_flood_timeframe_ms / 1000,
        log_channel_name
    )
}

fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}
