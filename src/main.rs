use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use envwatch::app::write_export;
use envwatch::{
    events, run_cycle, ui, App, DataSource, FileSource, Overrides, PollingSource, Session,
    Settings, View,
};

/// How often the UI drains delivered poll results.
const DRAIN_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "envwatch")]
#[command(about = "Terminal dashboard for ThingSpeak environmental sensor channels")]
#[command(version)]
struct Args {
    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// ThingSpeak channel ID
    #[arg(long)]
    channel: Option<String>,

    /// Read API key for private channels
    #[arg(long, env = "THINGSPEAK_READ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Refresh interval in seconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Read entries from a local JSON file instead of the API
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Fetch once, write the session to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write logs to this file while the TUI is running
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.log_file.as_deref(), args.export.is_some())?;

    let overrides = Overrides {
        channel_id: args.channel.clone(),
        read_api_key: args.api_key.clone(),
        base_url: args.base_url.clone(),
        refresh_secs: args.refresh,
    };
    let settings = Settings::load(args.config.as_deref(), &overrides)?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_to_file(&settings, args.file.as_deref(), export_path);
    }

    if let Some(ref path) = args.file {
        return run_with_file(path, settings.refresh_interval());
    }

    run_with_api(&settings)
}

/// Install the tracing subscriber.
///
/// The TUI owns the terminal, so interactive runs only log when a log file
/// is given. Export runs log to stderr.
fn init_tracing(log_file: Option<&Path>, to_stderr: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "envwatch=info".into());

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };
    let stderr_layer = (to_stderr && log_file.is_none()).then(|| fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

/// Run with a file-based data source
fn run_with_file(path: &Path, refresh: Duration) -> Result<()> {
    let source = Box::new(FileSource::new(path));
    run_tui(source, refresh)
}

/// Run against the ThingSpeak API
fn run_with_api(settings: &Settings) -> Result<()> {
    let client = settings.client()?;
    info!(channel = %client.channel_id(), refresh = settings.refresh_secs, "starting dashboard");

    // The runtime drives the poller while the TUI runs on the main thread
    let rt = tokio::runtime::Runtime::new()?;
    let result = {
        let _guard = rt.enter();
        let source = PollingSource::spawn(
            Arc::new(client),
            settings.refresh_interval(),
            settings.history_results,
        );

        // Results arrive on the poller's schedule; the UI drains them promptly
        run_tui(Box::new(source), DRAIN_INTERVAL)
    };

    rt.shutdown_timeout(Duration::from_secs(1));
    result
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, refresh_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(source);
    app.reload_data();

    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 14;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = Paragraph::new(msg)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow));
                let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5)
                    .intersection(area);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Overview => ui::overview::render(frame, app, chunks[2]),
                View::History => ui::history::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(Event::Key(key)) = events::poll_event(Duration::from_millis(100))? {
            events::handle_key_event(app, key);
        }

        if last_refresh.elapsed() >= refresh_interval {
            app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Run one poll cycle and write the resulting session as JSON.
fn export_to_file(settings: &Settings, file: Option<&Path>, export_path: &Path) -> Result<()> {
    let event = match file {
        Some(path) => FileSource::new(path)
            .poll()
            .with_context(|| format!("No data in {}", path.display()))?,
        None => {
            let client = settings.client()?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_cycle(&client))
        }
    };

    let mut session = Session::new();
    session.apply(event, Utc::now());
    if let Some(cause) = session.error_cause() {
        tracing::warn!(cause, "exporting offline state");
    }

    write_export(&session, export_path)?;
    println!("Exported sensor state to: {}", export_path.display());
    Ok(())
}
