use anyhow::Result;
use clap::Parser;
use snippet_vault::cli::args::{AliasCommands, Cli, Commands};

#[test]
fn test_new_command_parsing() -> Result<()> {
    let args = Cli::try_parse_from([
        "snippet-vault",
        "new",
        "ssh {user}@{host}",
        "--description",
        "Connect",
        "-t",
        "ssh,remote",
        "-a",
        "myssh",
        "-p",
        "user=admin:Login name",
    ])?;

    match args.command {
        Commands::New { command, details } => {
            assert_eq!(command, "ssh {user}@{host}");
            assert_eq!(details.description.as_deref(), Some("Connect"));
            assert_eq!(details.tags.as_deref(), Some("ssh,remote"));
            assert_eq!(details.alias.as_deref(), Some("myssh"));
            assert_eq!(details.params.as_deref(), Some("user=admin:Login name"));
        }
        _ => panic!("Expected New command"),
    }
    Ok(())
}

#[test]
fn test_new_requires_command() {
    assert!(Cli::try_parse_from(["snippet-vault", "new"]).is_err());
}

#[test]
fn test_list_parsing() -> Result<()> {
    let args = Cli::try_parse_from(["snippet-vault", "list"])?;
    assert!(matches!(args.command, Commands::List { json: false }));

    let args = Cli::try_parse_from(["snippet-vault", "list", "--json"])?;
    assert!(matches!(args.command, Commands::List { json: true }));
    Ok(())
}

#[test]
fn test_edit_parsing_distinguishes_omitted_and_empty() -> Result<()> {
    let args = Cli::try_parse_from(["snippet-vault", "edit", "123", "--alias", "", "-t", "a,b"])?;
    match args.command {
        Commands::Edit {
            snippet,
            command,
            description,
            tags,
            alias,
            params,
        } => {
            assert_eq!(snippet, "123");
            assert!(command.is_none());
            assert!(description.is_none());
            assert_eq!(tags.as_deref(), Some("a,b"));
            assert_eq!(alias.as_deref(), Some(""));
            assert!(params.is_none());
        }
        _ => panic!("Expected Edit command"),
    }
    Ok(())
}

#[test]
fn test_exec_parsing() -> Result<()> {
    let args = Cli::try_parse_from([
        "snippet-vault",
        "exec",
        "myssh",
        "-P",
        "host=example.com",
        "--param",
        "user=root",
        "--print-only",
    ])?;
    match args.command {
        Commands::Exec {
            snippet,
            print_only,
            yes,
            copy,
            params,
        } => {
            assert_eq!(snippet.as_deref(), Some("myssh"));
            assert!(print_only);
            assert!(!yes);
            assert!(!copy);
            assert_eq!(params, vec!["host=example.com", "user=root"]);
        }
        _ => panic!("Expected Exec command"),
    }

    let args = Cli::try_parse_from(["snippet-vault", "exec"])?;
    assert!(matches!(args.command, Commands::Exec { snippet: None, .. }));

    let args = Cli::try_parse_from(["snippet-vault", "exec", "myssh", "--copy"])?;
    assert!(matches!(args.command, Commands::Exec { copy: true, .. }));
    Ok(())
}

#[test]
fn test_copy_parsing() -> Result<()> {
    let args = Cli::try_parse_from(["snippet-vault", "copy", "42", "-P", "host=db"])?;
    match args.command {
        Commands::Copy { snippet, params } => {
            assert_eq!(snippet.as_deref(), Some("42"));
            assert_eq!(params, vec!["host=db"]);
        }
        _ => panic!("Expected Copy command"),
    }

    let args = Cli::try_parse_from(["snippet-vault", "copy"])?;
    assert!(matches!(args.command, Commands::Copy { snippet: None, .. }));
    Ok(())
}

#[test]
fn test_save_commands_parsing() -> Result<()> {
    let args = Cli::try_parse_from([
        "snippet-vault",
        "save-last",
        "--history-file",
        "/tmp/history",
        "-d",
        "Last one",
        "-a",
        "again",
    ])?;
    match args.command {
        Commands::SaveLast {
            history_file,
            details,
        } => {
            assert_eq!(history_file.as_deref(), Some("/tmp/history"));
            assert_eq!(details.description.as_deref(), Some("Last one"));
            assert_eq!(details.alias.as_deref(), Some("again"));
            assert!(details.tags.is_none());
        }
        _ => panic!("Expected SaveLast command"),
    }

    let args = Cli::try_parse_from(["snippet-vault", "save-clipboard", "-t", "clip"])?;
    match args.command {
        Commands::SaveClipboard { details } => {
            assert_eq!(details.tags.as_deref(), Some("clip"));
        }
        _ => panic!("Expected SaveClipboard command"),
    }
    Ok(())
}

#[test]
fn test_alias_subcommands() -> Result<()> {
    let args = Cli::try_parse_from(["snippet-vault", "alias", "add", "123", "ll"])?;
    match args.command {
        Commands::Alias {
            action: AliasCommands::Add { snippet, name },
        } => {
            assert_eq!(snippet, "123");
            assert_eq!(name, "ll");
        }
        _ => panic!("Expected alias add"),
    }

    let args = Cli::try_parse_from(["snippet-vault", "alias", "list"])?;
    assert!(matches!(
        args.command,
        Commands::Alias {
            action: AliasCommands::List
        }
    ));

    let args = Cli::try_parse_from(["snippet-vault", "alias", "update"])?;
    assert!(matches!(
        args.command,
        Commands::Alias {
            action: AliasCommands::Update
        }
    ));

    let args = Cli::try_parse_from(["snippet-vault", "alias", "remove", "ll"])?;
    assert!(matches!(
        args.command,
        Commands::Alias {
            action: AliasCommands::Remove { ref snippet }
        } if snippet == "ll"
    ));
    Ok(())
}

#[test]
fn test_global_options() -> Result<()> {
    let args = Cli::try_parse_from([
        "snippet-vault",
        "search",
        "git",
        "--file",
        "/tmp/s.toml",
        "--alias-file",
        "/tmp/a.sh",
        "-v",
    ])?;
    assert_eq!(args.file.as_deref(), Some("/tmp/s.toml"));
    assert_eq!(args.alias_file.as_deref(), Some("/tmp/a.sh"));
    assert!(args.verbose);
    assert!(matches!(args.command, Commands::Search { ref query } if query == "git"));
    Ok(())
}
