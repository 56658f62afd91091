//! CLI command implementations

pub mod events;
pub mod init;
pub mod races;
