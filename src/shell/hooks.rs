use std::path::Path;

/// Shells whose rc files are sourced before running a snippet.
pub const SUPPORTED_SHELLS: [&str; 2] = ["bash", "zsh"];

/// Detects the user's shell from `$SHELL`, returning `bash` or `zsh`.
pub fn detect_current_shell() -> Option<String> {
    let shell = std::env::var("SHELL").ok()?;
    shell_name(&shell)
}

/// Lowercased name of a supported shell given its path.
pub fn shell_name(shell_path: &str) -> Option<String> {
    let name = Path::new(shell_path).file_name()?.to_str()?.to_lowercase();
    SUPPORTED_SHELLS.contains(&name.as_str()).then_some(name)
}

/// Profile file a user of `shell` should add the alias `source` line to.
pub fn profile_path(shell: &str) -> &'static str {
    match shell {
        "zsh" => "~/.zshrc",
        _ => "~/.bashrc",
    }
}
