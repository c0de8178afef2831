use anyhow::{anyhow, Context, Result};
use log::debug;
use std::process::{Command as ProcessCommand, Stdio};

use crate::shell::hooks::shell_name;

/// Shell operators worth a second look before running a command.
const SHELL_OPERATORS: [&str; 8] = [";", "&&", "||", "|", ">", "<", "`", "$("];

pub struct ExecutionContext {
    /// Fully resolved command line.
    pub command: String,
    /// Shell executable used to run it.
    pub shell: String,
}

impl ExecutionContext {
    /// Runs `command` with the user's `$SHELL`, or `/bin/sh` when unset.
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            shell: std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string()),
        }
    }
}

/// Whether `command` contains pipes, redirects, command chaining or
/// substitution.
pub fn has_shell_operators(command: &str) -> bool {
    SHELL_OPERATORS.iter().any(|op| command.contains(op))
}

/// Prefixes `command` so bash and zsh load the user's rc file, making their
/// aliases and functions available. Other shells get the command as is.
pub fn wrap_command(command: &str, shell: &str) -> String {
    match shell_name(shell).as_deref() {
        Some("bash") => format!(
            "source ~/.bashrc 2>/dev/null; shopt -s expand_aliases; {}",
            command
        ),
        Some("zsh") => format!("source ~/.zshrc 2>/dev/null; {}", command),
        _ => command.to_string(),
    }
}

/// Runs the command with inherited stdout and stderr. A non-zero exit is an
/// error carrying the status.
pub fn execute_shell_command(ctx: &ExecutionContext) -> Result<()> {
    let wrapped_command = wrap_command(&ctx.command, &ctx.shell);
    debug!("Running with {}: {}", ctx.shell, wrapped_command);

    let mut command = ProcessCommand::new(&ctx.shell);
    command.arg("-c").arg(&wrapped_command);
    // Sourced rc files may prompt; keep them off the terminal.
    if shell_name(&ctx.shell).is_some() {
        command.stdin(Stdio::null());
    }

    let status = command
        .status()
        .with_context(|| format!("Failed to start shell {}", ctx.shell))?;

    if !status.success() {
        return Err(match status.code() {
            Some(code) => anyhow!("Command failed with exit code {}", code),
            None => anyhow!("Command terminated by signal"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_command_for_bash_enables_aliases() {
        let wrapped = wrap_command("ll", "/usr/bin/bash");
        assert!(wrapped.starts_with("source ~/.bashrc"));
        assert!(wrapped.contains("shopt -s expand_aliases"));
        assert!(wrapped.ends_with("; ll"));
    }

    #[test]
    fn test_wrap_command_for_zsh() {
        assert_eq!(
            wrap_command("ll", "/bin/zsh"),
            "source ~/.zshrc 2>/dev/null; ll"
        );
    }

    #[test]
    fn test_wrap_command_other_shell_untouched() {
        assert_eq!(wrap_command("echo hi", "/bin/sh"), "echo hi");
        assert_eq!(wrap_command("echo hi", "/usr/bin/fish"), "echo hi");
    }
}
