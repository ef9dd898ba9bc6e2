use poise::serenity_prelude as serenity;

/// Embed colors for the audit severities.
pub const SUCCESS_COLOR: u32 = 0x00_FF_00;
pub const INFO_COLOR: u32 = 0x00_99_FF;
pub const WARNING_COLOR: u32 = 0xFF_FF_00;
pub const ERROR_COLOR: u32 = 0xFF_00_00;
pub const MODERATE_COLOR: u32 = 0xFF_66_00;

/// Build a titled, timestamped embed with the standard styling.
pub fn build_basic_embed(
    title: &str,
    description: impl Into<String>,
    color: u32,
) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title.to_owned())
        .color(color)
        .description(description)
        .timestamp(serenity::Timestamp::now())
}
