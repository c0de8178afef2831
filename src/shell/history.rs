//! Reading the user's shell history for `save-last`.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use super::hooks::detect_current_shell;
use crate::error::{Error, Result};
use crate::version::APP_NAME;

/// `$HISTFILE`, or the default history file of the detected shell.
pub fn default_history_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("HISTFILE") {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(shellexpand::tilde(path.trim()).as_ref()));
        }
    }
    let file_name = match detect_current_shell().as_deref() {
        Some("zsh") => ".zsh_history",
        _ => ".bash_history",
    };
    dirs::home_dir().map(|home| home.join(file_name))
}

/// The command stored on one history line.
///
/// Handles zsh's extended format (`: 1700000000:0;cmd`). Bash timestamp
/// comments (`#1700000000`) and blank lines yield `None`.
pub fn parse_history_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Some(stamp) = line.strip_prefix('#') {
        if !stamp.is_empty() && stamp.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    let command = match line.strip_prefix(": ") {
        Some(rest) => match rest.split_once(';') {
            Some((meta, command)) if is_zsh_metadata(meta) => command.trim(),
            _ => line,
        },
        None => line,
    };
    (!command.is_empty()).then(|| command.to_string())
}

fn is_zsh_metadata(meta: &str) -> bool {
    match meta.split_once(':') {
        Some((stamp, elapsed)) => {
            !stamp.is_empty()
                && stamp.bytes().all(|b| b.is_ascii_digit())
                && elapsed.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Most recent command in `path`, skipping invocations of this tool.
///
/// zsh may store non-UTF-8 bytes, so the file is decoded lossily.
pub fn last_command(path: &Path) -> Result<Option<String>> {
    let bytes = fs::read(path).map_err(|e| Error::io_error("history", path.to_path_buf(), e))?;
    let content = String::from_utf8_lossy(&bytes);

    let command = content
        .lines()
        .rev()
        .filter_map(parse_history_line)
        .find(|command| !is_own_invocation(command));
    debug!("Last history entry in {}: {:?}", path.display(), command);
    Ok(command)
}

fn is_own_invocation(command: &str) -> bool {
    command
        .split_whitespace()
        .next()
        .and_then(|program| Path::new(program).file_name())
        .is_some_and(|name| name == APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_own_invocation() {
        assert!(is_own_invocation("snippet-vault save-last"));
        assert!(is_own_invocation("/usr/local/bin/snippet-vault list"));
        assert!(!is_own_invocation("git status"));
        assert!(!is_own_invocation("echo snippet-vault"));
    }

    #[test]
    fn test_zsh_metadata() {
        assert!(is_zsh_metadata("1700000000:0"));
        assert!(!is_zsh_metadata("1700000000"));
        assert!(!is_zsh_metadata("abc:0"));
    }
}
