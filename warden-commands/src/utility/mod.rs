pub mod embeds;
pub mod help;
pub mod ping;
pub mod serverinfo;
pub mod stats;
pub mod userinfo;
