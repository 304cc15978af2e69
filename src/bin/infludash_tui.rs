//! infludash terminal dashboard entry point

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tracing::{error, info};

use infludash::{
    api::ApiClient,
    config::Config,
    credentials::FileCredentialStore,
    dashboard::App,
    resources::ResourceKind,
};

#[derive(Parser)]
#[command(name = "infludash-tui")]
#[command(about = "Terminal dashboard for the influencer marketplace API")]
#[command(version)]
pub struct Cli {
    /// Override the API base URL (INFLUDASH_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Open this listing on startup (e.g. kyc, payments)
    #[arg(long)]
    pub open: Option<String>,

    /// Parent id when --open names a scoped listing
    #[arg(long)]
    pub parent: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "infludash_tui=info,infludash=info");
    }

    // Log to a file only so the terminal stays clean
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("infludash_tui.log")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting infludash TUI...");

    let mut config = Config::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url);
    }
    config.validate()?;

    // Resolve the startup listing before touching the terminal
    let startup = cli
        .open
        .as_deref()
        .map(|name| ResourceKind::parse(name, cli.parent.as_deref()))
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let store = Arc::new(FileCredentialStore::new(config.credentials_path.clone()));
    let client = ApiClient::from_config(&config, store)?;
    let mut app = App::new(config, client);
    if let Some(kind) = startup {
        app.open_list(kind);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match result {
        Ok(()) => {
            info!("infludash TUI exited successfully");
            Ok(())
        }
        Err(e) => {
            error!("infludash TUI encountered an error: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
