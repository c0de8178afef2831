use log::{debug, info};
use shell_escape::unix::escape;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use super::hooks::{detect_current_shell, profile_path};
use crate::db::models::Snippet;
use crate::error::{Error, Result};
use crate::version::{APP_NAME, VERSION};

/// Generates the shell source file that exposes snippet aliases.
///
/// The file is derived from the store and always rewritten in full.
pub struct AliasProjector {
    alias_path: PathBuf,
    program: String,
}

impl AliasProjector {
    pub fn new(alias_path: impl Into<PathBuf>) -> Self {
        Self {
            alias_path: alias_path.into(),
            program: APP_NAME.to_string(),
        }
    }

    /// Overrides the executable the generated functions call.
    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    pub fn alias_path(&self) -> &Path {
        &self.alias_path
    }

    /// Alias or function definition for one snippet, `None` if it has no
    /// alias.
    ///
    /// A snippet without parameters becomes a plain alias of its quoted
    /// command. A snippet with parameters becomes a function that forwards
    /// its arguments to `exec`, so values are resolved when it runs.
    pub fn definition(&self, id: &str, snippet: &Snippet) -> Option<String> {
        let alias = snippet.alias()?;
        if snippet.get_all_parameters().is_empty() {
            let command = escape(Cow::Borrowed(snippet.command()));
            return Some(format!("alias {}={}", alias, command));
        }
        Some(format!(
            "{}() {{\n    {} exec {} \"$@\"\n}}",
            alias,
            self.program,
            escape(Cow::Borrowed(id))
        ))
    }

    /// Full file content for the given `(id, snippet)` pairs, in order.
    pub fn render(&self, snippets: &[(String, Snippet)]) -> String {
        let mut out = format!(
            "# {} aliases - generated by {} {}, do not edit\n",
            APP_NAME, APP_NAME, VERSION
        );
        out.push_str("# Add this line to your shell profile (~/.bashrc, ~/.zshrc, etc.):\n");
        out.push_str(&format!("#   {}\n\n", self.source_instruction()));

        for (id, snippet) in snippets {
            let Some(definition) = self.definition(id, snippet) else {
                continue;
            };
            if let Some(description) = snippet.description() {
                let comment = description.lines().collect::<Vec<_>>().join(" ");
                out.push_str(&format!("# {}\n", comment));
            }
            out.push_str(&definition);
            out.push_str("\n\n");
        }
        out
    }

    /// Replaces the alias file with a fresh rendering.
    pub fn update_aliases_file(&self, snippets: &[(String, Snippet)]) -> Result<()> {
        if let Some(parent) = self.alias_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| Error::io_error("alias directory", parent.to_path_buf(), e))?;
        }
        fs::write(&self.alias_path, self.render(snippets))
            .map_err(|e| Error::io_error("alias", self.alias_path.clone(), e))?;
        info!(
            "Wrote {} aliases to {}",
            snippets.iter().filter(|(_, s)| s.alias().is_some()).count(),
            self.alias_path.display()
        );
        Ok(())
    }

    pub fn source_instruction(&self) -> String {
        format!(
            "source {}",
            escape(Cow::Owned(self.alias_path.display().to_string()))
        )
    }

    /// Lines explaining how to load the alias file from a shell profile.
    pub fn setup_instructions(&self) -> Vec<String> {
        let shell = detect_current_shell();
        debug!("Detected shell: {:?}", shell);
        let mut lines = vec![
            format!("To use {} aliases in your shell, add this line to your shell profile:", APP_NAME),
            String::new(),
            format!("  {}", self.source_instruction()),
            String::new(),
        ];
        match shell.as_deref() {
            Some(shell) => lines.push(format!("For {}, add it to {}", shell, profile_path(shell))),
            None => {
                lines.push(format!("For bash, add it to {}", profile_path("bash")));
                lines.push(format!("For zsh, add it to {}", profile_path("zsh")));
            }
        }
        lines.push(String::new());
        lines.push("Then reload your shell or run:".to_string());
        lines.push(format!("  {}", self.source_instruction()));
        lines
    }
}
