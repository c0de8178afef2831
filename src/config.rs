//! Resolution of the snippet and alias file locations.
//!
//! Precedence: command-line flag, then environment variable, then the
//! default under the user's configuration directory.

use std::path::PathBuf;

use crate::version::APP_NAME;

/// Environment variable overriding the snippet file path.
pub const SNIPPETS_FILE_ENV: &str = "SNIPPET_VAULT_FILE";
/// Environment variable overriding the generated alias file path.
pub const ALIAS_FILE_ENV: &str = "SNIPPET_VAULT_ALIAS_FILE";

const SNIPPETS_FILE_NAME: &str = "snippets.toml";
const ALIAS_FILE_NAME: &str = "aliases.sh";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub snippets_path: PathBuf,
    pub alias_path: PathBuf,
}

impl Config {
    pub fn resolve(file_arg: Option<&str>, alias_file_arg: Option<&str>) -> Self {
        Self {
            snippets_path: resolve_path(file_arg, SNIPPETS_FILE_ENV, SNIPPETS_FILE_NAME),
            alias_path: resolve_path(alias_file_arg, ALIAS_FILE_ENV, ALIAS_FILE_NAME),
        }
    }
}

/// `<config dir>/snippet-vault`, falling back to `~/.config` and then the
/// working directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

fn resolve_path(arg: Option<&str>, env_var: &str, file_name: &str) -> PathBuf {
    if let Some(path) = arg {
        return expand(path);
    }
    match std::env::var(env_var) {
        Ok(path) if !path.trim().is_empty() => expand(&path),
        _ => default_config_dir().join(file_name),
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.trim()).as_ref())
}
