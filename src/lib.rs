pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod exec;
pub mod shell;
pub mod utils;
pub mod version;

pub use db::Store;
pub use error::{Error, Result};
pub use shell::AliasProjector;
pub use version::VERSION;
