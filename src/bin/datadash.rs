use clap::{Parser, ValueEnum};
use color_eyre::Result;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use datadash::config::Config;
use datadash::tui::{App, EventLoop, KeyBindings, Theme};
use datadash::{Dashboard, DashboardOptions, HttpTransport};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Upload a CSV or Excel file and run analyses on it from the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Analysis server base URL (overrides the config file)
    #[arg(long = "server", value_name = "URL")]
    server: Option<String>,
    /// Directory downloads are written to (overrides the config file)
    #[arg(long = "download-dir", value_name = "DIR")]
    download_dir: Option<PathBuf>,
    /// Path to a config file (overrides default config discovery)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// Enable file logging at the given level (overrides RUST_LOG)
    #[arg(long = "logging", value_enum)]
    logging: Option<LogLevel>,
    /// Write the default key bindings as JSON to PATH and exit
    #[arg(long = "write-keybindings", value_name = "PATH")]
    write_keybindings: Option<PathBuf>,
    /// File to choose and upload on startup
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let log_path = datadash::logging::init_with(None, args.logging.map(Into::into))?;
    info!("Logging to {}", log_path.display());

    if let Some(path) = &args.write_keybindings {
        KeyBindings::default().save_to_file(path)?;
        info!("Wrote default key bindings to {}", path.display());
        println!("Wrote default key bindings to {}", path.display());
        return Ok(());
    }

    let mut config = Config::from_path(args.config.as_ref())?;
    if let Some(server) = args.server {
        config.server.base_url = server;
    }
    if let Some(dir) = args.download_dir {
        config.download_dir = dir;
    }
    info!(
        "Starting against {} (downloads to {})",
        config.server.base_url,
        config.download_dir.display()
    );

    let transport = HttpTransport::new(&config.server.base_url, &config.server.user_agent)?;
    let dashboard = Dashboard::new(
        Arc::new(transport),
        DashboardOptions {
            download_dir: config.download_dir.clone(),
            notice_timeout: config.notice_timeout(),
        },
    );

    let mut events = EventLoop::new();
    let mut app = App::new(dashboard, events.tasks());
    app.set_theme(Theme::named(config.theme));
    if let Some(path) = &config.keybindings_file {
        let bindings = KeyBindings::load_from_file(path)?;
        for warning in bindings.validate() {
            warn!("{warning}");
        }
        app.set_keybindings(bindings);
    }
    if let Some(file) = args.file {
        app.dashboard_mut().select_file(Some(file));
        app.start_upload();
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    install_panic_hook();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    events.start(config.tick_rate());
    let res = run_app(&mut terminal, &mut app, &mut events).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    if let Err(e) = &res {
        error!("Error: {e:?}");
    }
    res
}

/// Leave raw mode before the default hook prints the panic report
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut EventLoop,
) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| app.render(f))?;
        let Some(event) = events.next().await else {
            break;
        };
        app.handle_event(event)?;
    }
    Ok(())
}
