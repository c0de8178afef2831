pub mod aliases;
pub mod history;
pub mod hooks;

pub use aliases::AliasProjector;
