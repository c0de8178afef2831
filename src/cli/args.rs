use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Snippet file to use instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<String>,

    /// Alias file to generate instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    pub alias_file: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new snippet
    ///
    /// Placeholders are written {name}, ${name} or {name=default} inside the
    /// command.
    /// Examples:
    ///   - ssh {user}@{host}
    ///   - ssh {user}@{host} -p {port=22}
    New {
        /// Command template
        command: String,

        #[command(flatten)]
        details: SnippetDetails,
    },

    /// Save the command currently on the clipboard as a snippet
    SaveClipboard {
        #[command(flatten)]
        details: SnippetDetails,
    },

    /// Save the most recent shell history entry as a snippet
    SaveLast {
        /// History file to read instead of $HISTFILE or the shell's default
        #[arg(long, value_name = "PATH")]
        history_file: Option<String>,

        #[command(flatten)]
        details: SnippetDetails,
    },

    /// List all snippets
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search snippets by command, description, tag or alias
    Search {
        /// Search query
        #[arg(required = true)]
        query: String,
    },

    /// Edit an existing snippet
    ///
    /// Only the given fields change. Pass an empty value to clear a field,
    /// e.g. --alias "".
    Edit {
        /// Snippet ID or alias
        snippet: String,

        /// New command
        #[arg(short, long)]
        command: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New tags, comma-separated
        #[arg(short, long)]
        tags: Option<String>,

        /// New alias
        #[arg(short, long)]
        alias: Option<String>,

        /// New parameters, replacing all declared ones
        #[arg(short, long)]
        params: Option<String>,
    },

    /// Delete a snippet
    Delete {
        /// Snippet ID or alias
        snippet: String,
    },

    /// Execute a snippet. Without an ID or alias, pick one interactively.
    Exec {
        /// Snippet ID or alias
        snippet: Option<String>,

        /// Only print the resolved command
        #[arg(short, long)]
        print_only: bool,

        /// Run without asking for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Copy the resolved command to the clipboard instead of running it
        #[arg(short, long)]
        copy: bool,

        /// Parameter value as name=value. Can be repeated.
        #[arg(short = 'P', long = "param")]
        params: Vec<String>,
    },

    /// Copy a snippet's resolved command to the clipboard. Without an ID or
    /// alias, pick one interactively.
    Copy {
        /// Snippet ID or alias
        snippet: Option<String>,

        /// Parameter value as name=value. Can be repeated.
        #[arg(short = 'P', long = "param")]
        params: Vec<String>,
    },

    /// Manage shell aliases
    Alias {
        #[command(subcommand)]
        action: AliasCommands,
    },
}

/// Metadata shared by every command that creates a snippet.
#[derive(Args, Debug, Default)]
pub struct SnippetDetails {
    /// Description of the snippet
    #[arg(short, long)]
    pub description: Option<String>,

    /// Tags, comma-separated
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Shell alias that runs the snippet
    #[arg(short, long)]
    pub alias: Option<String>,

    /// Parameters as name[=default][:description],...
    /// Example: host=localhost:The host,port=8080:Port number
    #[arg(short, long)]
    pub params: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum AliasCommands {
    /// Give a snippet an alias
    Add {
        /// Snippet ID or alias
        #[arg(required = true)]
        snippet: String,

        /// Alias name
        #[arg(required = true)]
        name: String,
    },
    /// Remove a snippet's alias
    Remove {
        /// Snippet ID or alias
        #[arg(required = true)]
        snippet: String,
    },
    /// List snippets that have aliases
    List,
    /// Regenerate the alias file
    Update,
    /// Show how to load the alias file from a shell profile
    Setup,
}
