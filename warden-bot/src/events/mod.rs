pub mod automod;
pub mod members;
