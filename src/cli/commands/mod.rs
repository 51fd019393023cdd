//! Command implementations, one module per subcommand

pub mod completions;
pub mod course;
pub mod export;
pub mod group;
pub mod init;
pub mod item;
pub mod letter;
pub mod order;
pub mod status;
pub mod sweep;
pub mod user;
