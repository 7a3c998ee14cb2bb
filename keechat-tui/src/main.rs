mod app;
mod event;
mod theme;
mod ui;
mod views;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use keechat_core::KeechatConfig;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use event::EventReader;

#[derive(Parser)]
#[command(name = "keechat-tui", about = "Terminal client for the Kee campus chatbot")]
struct Args {
    /// Start on the admin screens instead of the chat
    #[arg(long)]
    admin: bool,

    /// Override the configured API base URL
    #[arg(long, env = "KEECHAT_BASE_URL")]
    base_url: Option<String>,

    /// Explicit config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = KeechatConfig::load_from(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
        config.validate()?;
    }
    setup_logging(&config.logging.level);

    let mut app = App::new(&config, args.admin)?;
    let events = EventReader::new(200);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal, &events).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn setup_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .init();
}
