pub mod args;
pub mod commands;

pub use args::{AliasCommands, Cli, Commands, SnippetDetails};
pub use commands::handle_command;
