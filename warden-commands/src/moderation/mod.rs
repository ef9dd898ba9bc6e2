pub mod ban;
pub mod deletewarn;
pub mod kick;
pub mod purge;
pub mod quicktimeout;
pub mod timeout;
pub mod warn;

pub mod embeds;
pub mod logging;
