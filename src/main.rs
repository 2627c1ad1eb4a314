//! nimbus - command-line client for the Nimbus Cloud management APIs.
//!
//! Every subcommand is a single parse -> validate -> execute -> render pass:
//! one outbound API request per invocation, results on stdout, errors on
//! stderr with a non-zero exit code.

mod api;
mod cli;
mod commands;
mod config;
mod error;
mod models;
mod output;
mod validate;

use clap::Parser;

use cli::{Cli, Commands};
use output::Printer;

#[tokio::main]
async fn main() {
    config::load_env();
    let cli = Cli::parse();
    let p = Printer::new(cli.global.verbose);

    let config_path = config::default_path();
    p.debug(&format!("config file: {}", config_path.display()));
    let file_cfg = match config::read(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            p.warn(&format!("ignoring config file: {e:#}"));
            config::FileConfig::default()
        }
    };

    // Precedence for the project ID: flag, then env, then config file.
    let mut global = cli.global.clone();
    if global.project_id.is_none() {
        global.project_id = file_cfg.project_id.clone();
    }
    let base_url = file_cfg.base_url.as_deref();

    let result = match cli.command {
        Commands::Server(cmd) => commands::server::run(cmd, &global, &p, base_url).await,
        Commands::Backup(cmd) => commands::backup::run(cmd, &global, &p, base_url).await,
        Commands::Update(cmd) => commands::update::run(cmd, &global, &p, base_url).await,
        Commands::Database(cmd) => commands::database::run(cmd, &global, &p, base_url).await,
        Commands::Config(cmd) => commands::configure::run(cmd, &global, &p, &config_path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
