use anyhow::{bail, Context, Result};
use chrono::Local;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, FuzzySelect, Input};
use log::warn;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use super::args::{AliasCommands, Commands, SnippetDetails};
use crate::db::{NewSnippet, Snippet, SnippetPatch, SnippetRecord, Store};
use crate::exec::{execute_shell_command, has_shell_operators, ExecutionContext};
use crate::shell::history::{default_history_file, last_command};
use crate::shell::AliasProjector;
use crate::utils::clipboard::{copy_to_clipboard, read_clipboard};
use crate::utils::params::{parse_parameter_definitions, parse_parameter_values};

const SEPARATOR: &str = "─────────────────────────────────────────────";

pub fn handle_command(
    command: Commands,
    store: &mut Store,
    aliases: &AliasProjector,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::New { command, details } => {
            add_snippet(store, aliases, out, command, details)?;
        }
        Commands::SaveClipboard { details } => {
            let command = read_clipboard()?;
            if command.is_empty() {
                bail!("Clipboard is empty");
            }
            writeln!(out, "{} {}", "Saving from clipboard:".yellow(), command)?;
            add_snippet(store, aliases, out, command, details)?;
        }
        Commands::SaveLast {
            history_file,
            details,
        } => {
            let path = match history_file {
                Some(path) => PathBuf::from(shellexpand::tilde(&path).as_ref()),
                None => default_history_file()
                    .context("Cannot locate a shell history file, pass --history-file")?,
            };
            let Some(command) = last_command(&path)? else {
                bail!("No command found in history file {}", path.display());
            };
            writeln!(out, "{} {}", "Saving from history:".yellow(), command)?;
            add_snippet(store, aliases, out, command, details)?;
        }
        Commands::List { json } => {
            let snippets = store.list();
            if json {
                print_json(out, &snippets)?;
            } else {
                print_snippets(out, &snippets)?;
            }
        }
        Commands::Search { query } => {
            let snippets = store.search(&query);
            print_snippets(out, &snippets)?;
        }
        Commands::Edit {
            snippet,
            command,
            description,
            tags,
            alias,
            params,
        } => {
            let (id, existing) = resolve_snippet(store, &snippet)?;
            let patch = SnippetPatch {
                command,
                description: description.map(Some),
                tags: tags.as_deref().map(split_tags),
                alias: alias.map(Some),
                parameters: params
                    .as_deref()
                    .map(parse_parameter_definitions)
                    .transpose()?,
            };
            if patch.is_empty() {
                bail!("Nothing to update: pass at least one field to change");
            }

            if !store.update(&id, patch)? {
                bail!("Snippet not found: {}", id);
            }
            let updated = store
                .get(&id)
                .with_context(|| format!("Snippet {} vanished after update", id))?;
            if existing.alias().is_some() || updated.alias().is_some() {
                refresh_aliases(store, aliases)?;
            }
            writeln!(out, "{} {}", "Successfully updated snippet:".green(), id)?;
            print_snippets(out, &[(id, updated)])?;
        }
        Commands::Delete { snippet } => {
            let (id, existing) = resolve_snippet(store, &snippet)?;
            if !store.delete(&id)? {
                bail!("Snippet not found: {}", id);
            }
            if existing.alias().is_some() {
                refresh_aliases(store, aliases)?;
            }
            writeln!(out, "{} {}", "Deleted snippet:".green(), id)?;
        }
        Commands::Exec {
            snippet,
            print_only,
            yes,
            copy,
            params,
        } => {
            let Some(final_command) = resolve_final_command(store, out, snippet, &params)? else {
                return Ok(());
            };

            if print_only {
                writeln!(out, "{}", final_command)?;
                return Ok(());
            }
            if copy {
                return copy_command(out, &final_command);
            }

            writeln!(out, "{} {}", "Execute command:".yellow(), final_command)?;
            if has_shell_operators(&final_command) {
                writeln!(
                    out,
                    "{} Command contains shell operators. Please review carefully before executing.",
                    "Warning:".red()
                )?;
            }
            if !yes
                && !Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt("Execute this command?")
                    .default(false)
                    .interact()?
            {
                writeln!(out, "{}", "Command execution cancelled".yellow())?;
                return Ok(());
            }
            out.flush()?;
            execute_shell_command(&ExecutionContext::new(&final_command))?;
        }
        Commands::Copy { snippet, params } => {
            let Some(final_command) = resolve_final_command(store, out, snippet, &params)? else {
                return Ok(());
            };
            copy_command(out, &final_command)?;
        }
        Commands::Alias { action } => match action {
            AliasCommands::Add { snippet, name } => {
                let (id, _) = resolve_snippet(store, &snippet)?;
                let patch = SnippetPatch {
                    alias: Some(Some(name.clone())),
                    ..SnippetPatch::default()
                };
                if !store.update(&id, patch)? {
                    bail!("Snippet not found: {}", id);
                }
                refresh_aliases(store, aliases)?;
                writeln!(out, "{} {} -> {}", "Alias added:".green(), name, id)?;
                writeln!(out, "Run `{}` to load it", aliases.source_instruction())?;
            }
            AliasCommands::Remove { snippet } => {
                let (id, existing) = resolve_snippet(store, &snippet)?;
                let Some(alias) = existing.alias() else {
                    writeln!(out, "{} {}", "Snippet has no alias:".yellow(), id)?;
                    return Ok(());
                };
                let patch = SnippetPatch {
                    alias: Some(None),
                    ..SnippetPatch::default()
                };
                if !store.update(&id, patch)? {
                    bail!("Snippet not found: {}", id);
                }
                refresh_aliases(store, aliases)?;
                writeln!(out, "{} {}", "Alias removed:".green(), alias)?;
            }
            AliasCommands::List => {
                let snippets = store.get_snippets_with_aliases();
                if snippets.is_empty() {
                    writeln!(out, "No aliases defined")?;
                    return Ok(());
                }
                for (id, snippet) in &snippets {
                    writeln!(
                        out,
                        "{} -> {} ({})",
                        snippet.alias().unwrap_or_default().cyan(),
                        snippet.command(),
                        id
                    )?;
                }
            }
            AliasCommands::Update => {
                refresh_aliases(store, aliases)?;
                writeln!(
                    out,
                    "{} {}",
                    "Alias file updated:".green(),
                    aliases.alias_path().display()
                )?;
            }
            AliasCommands::Setup => {
                for line in aliases.setup_instructions() {
                    writeln!(out, "{}", line)?;
                }
            }
        },
    }
    Ok(())
}

fn add_snippet(
    store: &mut Store,
    aliases: &AliasProjector,
    out: &mut dyn Write,
    command: String,
    details: SnippetDetails,
) -> Result<()> {
    let fields = NewSnippet {
        command,
        description: details.description,
        tags: details.tags.as_deref().map(split_tags).unwrap_or_default(),
        alias: details.alias,
        parameters: match details.params {
            Some(params) => parse_parameter_definitions(&params)?,
            None => Vec::new(),
        },
    };
    let has_alias = fields.alias.is_some();
    let id = store.add(fields)?;
    writeln!(out, "{} {}", "Added new snippet with ID:".green(), id)?;
    if has_alias {
        refresh_aliases(store, aliases)?;
        writeln!(out, "Run `{}` to load the alias", aliases.source_instruction())?;
    }
    Ok(())
}

/// Picks the snippet (by ID, alias or interactively) and resolves its
/// parameters. `None` when the user cancels the selection.
fn resolve_final_command(
    store: &Store,
    out: &mut dyn Write,
    snippet: Option<String>,
    params: &[String],
) -> Result<Option<String>> {
    let selected = match snippet {
        Some(target) => Some(resolve_snippet(store, &target)?),
        None => select_snippet(store, out)?,
    };
    let Some((_, snippet)) = selected else {
        writeln!(out, "{}", "Operation cancelled".yellow())?;
        return Ok(None);
    };

    let mut values = parse_parameter_values(params)?;
    if std::io::stdin().is_terminal() {
        prompt_for_parameters(&snippet, &mut values)?;
    }
    Ok(Some(snippet.apply_parameters(&values)?))
}

/// Copies `command` to the clipboard. Without a usable clipboard the command
/// is printed instead.
fn copy_command(out: &mut dyn Write, command: &str) -> Result<()> {
    match copy_to_clipboard(command) {
        Ok(()) => writeln!(out, "{} {}", "Copied to clipboard:".green(), command)?,
        Err(e) => {
            warn!("Clipboard copy failed: {:#}", e);
            writeln!(out, "{} {:#}", "Failed to copy to clipboard:".red(), e)?;
            writeln!(out, "{} {}", "Command:".yellow(), command)?;
        }
    }
    Ok(())
}

/// Looks a snippet up by ID, then by alias.
pub fn resolve_snippet(store: &Store, target: &str) -> Result<(String, Snippet)> {
    if let Some(snippet) = store.get(target) {
        return Ok((target.to_string(), snippet));
    }
    match store.find_by_alias(target) {
        Some(found) => Ok(found),
        None => bail!("Snippet not found: {}", target),
    }
}

fn refresh_aliases(store: &Store, aliases: &AliasProjector) -> Result<()> {
    aliases.update_aliases_file(&store.get_snippets_with_aliases())?;
    Ok(())
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',').map(|t| t.trim().to_string()).collect()
}

fn select_snippet(store: &Store, out: &mut dyn Write) -> Result<Option<(String, Snippet)>> {
    let mut snippets = store.list();
    if snippets.is_empty() {
        writeln!(out, "{} Add some with `new`", "No snippets found.".yellow())?;
        return Ok(None);
    }

    let items: Vec<String> = snippets
        .iter()
        .map(|(id, snippet)| match snippet.description() {
            Some(description) => format!("{}  {}  ({})", id, snippet.command(), description),
            None => format!("{}  {}", id, snippet.command()),
        })
        .collect();
    let choice = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a snippet")
        .items(&items)
        .default(0)
        .interact_opt()?;

    Ok(choice.map(|index| snippets.swap_remove(index)))
}

/// Asks for every parameter without a supplied value, offering its default.
fn prompt_for_parameters(snippet: &Snippet, values: &mut HashMap<String, String>) -> Result<()> {
    for parameter in snippet.get_all_parameters() {
        if values.get(parameter.name()).is_some_and(|v| !v.is_empty()) {
            continue;
        }

        let prompt = match parameter.description() {
            Some(description) => format!("{} ({})", parameter.name(), description),
            None => parameter.name().to_string(),
        };
        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = parameter.default() {
            input = input.default(default.to_string());
        }

        let value = input.interact_text()?;
        if !value.is_empty() {
            values.insert(parameter.name().to_string(), value);
        }
    }
    Ok(())
}

/// `name=default` or `name=<required>`, with the description in parentheses.
pub fn format_parameters(snippet: &Snippet) -> String {
    snippet
        .get_all_parameters()
        .iter()
        .map(|p| {
            let mut text = format!("{}={}", p.name(), p.default().unwrap_or("<required>"));
            if let Some(description) = p.description() {
                text.push_str(&format!(" ({})", description));
            }
            text
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_snippets(out: &mut dyn Write, snippets: &[(String, Snippet)]) -> Result<()> {
    if snippets.is_empty() {
        writeln!(out, "No matching snippets found.")?;
        return Ok(());
    }

    writeln!(out, "\nFound {} snippets:", snippets.len())?;
    writeln!(out, "{}", SEPARATOR)?;

    for (id, snippet) in snippets {
        let local_time = snippet.updated_at().with_timezone(&Local);
        writeln!(
            out,
            "({}) [{}] {}",
            id.blue(),
            local_time.format("%Y-%m-%d %H:%M:%S"),
            snippet.command().green()
        )?;

        if let Some(description) = snippet.description() {
            writeln!(out, "    Description: {}", description)?;
        }
        if let Some(alias) = snippet.alias() {
            writeln!(out, "    Alias: {}", alias.cyan())?;
        }
        if !snippet.tags().is_empty() {
            writeln!(out, "    Tags: {}", snippet.tags().join(", ").yellow())?;
        }
        let parameters = format_parameters(snippet);
        if !parameters.is_empty() {
            writeln!(out, "    Parameters: {}", parameters.magenta())?;
        }

        writeln!(out, "{}", SEPARATOR)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct ListedSnippet<'a> {
    id: &'a str,
    #[serde(flatten)]
    record: SnippetRecord,
}

fn print_json(out: &mut dyn Write, snippets: &[(String, Snippet)]) -> Result<()> {
    let listed: Vec<ListedSnippet> = snippets
        .iter()
        .map(|(id, snippet)| ListedSnippet {
            id,
            record: snippet.to_record(),
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &listed)?;
    writeln!(out)?;
    Ok(())
}
