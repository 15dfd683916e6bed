use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
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
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use envwatch::app::{App, View};
use envwatch::config::Settings;
use envwatch::data::refresh;
use envwatch::events;
use envwatch::source::{self, MeasurementStore, Refresher};
use envwatch::ui::{self, Theme};

#[derive(Parser, Debug)]
#[command(name = "envwatch")]
#[command(about = "Terminal dashboard for office temperature, humidity and light sensors")]
struct Args {
    /// Settings file (TOML). Defaults to ./envwatch.toml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Supabase project URL
    #[arg(long)]
    url: Option<String>,

    /// Supabase API key
    #[arg(long)]
    api_key: Option<String>,

    /// Table holding the measurements
    #[arg(long)]
    table: Option<String>,

    /// Read measurements from a JSON file instead of Supabase
    #[arg(short, long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Refresh interval in seconds
    #[arg(short, long, default_value = "60")]
    refresh: u64,

    /// Maximum rows fetched per refresh
    #[arg(long)]
    limit: Option<usize>,

    /// Fetch once, write the dashboard data to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write logs to this file while the dashboard is running
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Command-line flags take precedence over the file and the environment.
    ///
    /// `--url` and `--file` each replace the store location outright, so a
    /// file configured elsewhere cannot shadow a URL given here, and vice versa.
    fn apply(&self, settings: &mut Settings) {
        if let Some(ref url) = self.url {
            settings.store.url = Some(url.clone());
            settings.store.file = None;
        }
        if let Some(ref key) = self.api_key {
            settings.store.api_key = Some(key.clone());
        }
        if let Some(ref table) = self.table {
            settings.store.table = table.clone();
        }
        if let Some(ref file) = self.file {
            settings.store.file = Some(file.clone());
            settings.store.url = None;
        }
        if let Some(limit) = self.limit {
            settings.store.limit = limit;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref(), args.export.is_some())?;

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);
    settings.validate()?;

    let store = source::open(&settings.store).context("failed to open measurement store")?;
    info!(store = store.description(), "starting envwatch");

    let rt = Runtime::new()?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_to_file(&rt, store.as_ref(), &settings, export_path);
    }

    let refresher = Refresher::new(
        store,
        settings.window,
        settings.store.limit,
        rt.handle().clone(),
    );
    let refresh_interval = Duration::from_secs(args.refresh.max(1));
    run_tui(refresher, settings, refresh_interval)
}

/// Logs go to `log_file` if given, or to stderr in export mode. The TUI
/// owns the terminal otherwise, so nothing is installed.
fn init_logging(log_file: Option<&Path>, export: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if export {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    Ok(())
}

/// Run the TUI against the given refresher
fn run_tui(refresher: Refresher, settings: Settings, refresh_interval: Duration) -> Result<()> {
    // Detect the theme before raw mode; detection queries the terminal itself.
    let theme = Theme::auto_detect();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = App::new(refresher, settings, theme);
    app.request_refresh();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
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
    const MIN_HEIGHT: u16 = 20;

    while app.running {
        app.poll_refresh();
        app.set_viewport_height(terminal.size()?.height);

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
                let centered =
                    Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5u16.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(12),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Overview => ui::overview::render(frame, app, chunks[2]),
                View::Table => ui::table::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                // Content starts after header (1) + tabs (1)
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, 2),
                _ => {}
            }
        }

        if last_refresh.elapsed() >= refresh_interval {
            app.request_refresh();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Fetch once and write the dashboard data to a JSON file
fn export_to_file(
    rt: &Runtime,
    store: &dyn MeasurementStore,
    settings: &Settings,
    export_path: &Path,
) -> Result<()> {
    let data = rt.block_on(refresh(store, Utc::now(), settings))?;

    let json = serde_json::to_string_pretty(&data)?;
    std::fs::write(export_path, json)
        .with_context(|| format!("failed to write {}", export_path.display()))?;

    info!(
        records = data.measurements.len(),
        samples = data.summary.samples,
        "export complete"
    );
    println!("Exported dashboard data to: {}", export_path.display());
    Ok(())
}
