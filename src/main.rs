use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use projdesk::api::{HttpApi, ProjectApi};
use projdesk::settings::Settings;
use projdesk::{cli, logging, tui};

#[derive(Parser)]
#[command(name = "projdesk", about = "Terminal client for the projects REST API")]
struct Cli {
    /// Base URL of the projects API
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal UI (default)
    Tui,
    /// Print every project and exit
    List {
        /// Print the raw projects as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (settings, settings_error) = match Settings::load() {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    let base_url = settings.resolve_api_url(cli.api_url.as_deref());
    let api = HttpApi::new(&base_url, settings.request_timeout())?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            let _guard = logging::init_file(&Settings::dir_in(&cwd), settings.log_level())?;
            warn_settings(settings_error.as_ref());
            let base_url = api.base_url().to_string();
            let api: Arc<dyn ProjectApi> = Arc::new(api);
            tui::run(api, settings, base_url)?;
        }
        Commands::List { json } => {
            logging::init_stderr(settings.log_level())?;
            warn_settings(settings_error.as_ref());
            tracing::info!(%base_url, "listing projects");
            cli::list(&api, json, &mut std::io::stdout().lock()).await?;
        }
    }

    Ok(())
}

fn warn_settings(error: Option<&anyhow::Error>) {
    if let Some(e) = error {
        let chain = format!("{e:#}");
        tracing::warn!(error = %chain, "ignoring settings file, using defaults");
    }
}
