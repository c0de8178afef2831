/// The current version of the application.
/// This should match the version in Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the application, also the name of its executable
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
