use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::debug;

use snippet_vault::cli::{self, Cli};
use snippet_vault::config::Config;
use snippet_vault::{AliasProjector, Store};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let config = Config::resolve(cli.file.as_deref(), cli.alias_file.as_deref());
    debug!("Using {:?}", config);

    let mut store = Store::new(&config.snippets_path)?;
    let aliases = AliasProjector::new(&config.alias_path);

    let mut stdout = std::io::stdout();
    cli::handle_command(cli.command, &mut store, &aliases, &mut stdout)
}
