pub mod moderation;
pub mod utility;

use warden_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    utility::stats::META,
    utility::serverinfo::META,
    utility::userinfo::META,
    moderation::ban::META,
    moderation::kick::META,
    moderation::timeout::META,
    moderation::warn::META,
    moderation::purge::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::help::help(),
        utility::stats::stats(),
        utility::serverinfo::serverinfo(),
        utility::userinfo::userinfo(),
        moderation::ban::ban(),
        moderation::kick::kick(),
        moderation::timeout::timeout(),
        moderation::warn::warn(),
        moderation::purge::purge(),
        moderation::quicktimeout::quick_timeout(),
        moderation::deletewarn::delete_and_warn(),
    ]
}
