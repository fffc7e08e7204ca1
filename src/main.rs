use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sitewatch::data::duration::parse_duration;
use sitewatch::source::{
    DateRange, ReplaySource, SissClient, SiteSource, TowerReportClient, TowerSource,
};
use sitewatch::ui::{self, Theme};
use sitewatch::{events, App, ExportFormat, Settings, View};

/// Page fetched by `--once`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Page {
    Towers,
    Sites,
}

#[derive(Parser, Debug)]
#[command(name = "sitewatch")]
#[command(about = "Terminal dashboard for tower online/offline and SISS site status")]
struct Args {
    /// TOML settings file (endpoints, offset, defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serve captured tower.html / siss.json from a directory instead of logging in
    #[arg(long)]
    replay: Option<PathBuf>,

    /// First day of the SISS range (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the SISS range (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// HTTP request timeout (e.g. "10s", "2500ms"); overrides the settings file
    #[arg(short, long)]
    timeout: Option<String>,

    /// Directory export files are written to
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Export file format
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Write logs to this file (the TUI otherwise discards them)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Fetch one page, export it and exit without starting the TUI
    #[arg(long, value_enum)]
    once: Option<Page>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // A missing .env is fine; variables may come from the real environment.
    dotenvy::dotenv().ok();

    init_tracing(args.log_file.as_deref(), args.once.is_some())?;

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(dir) = &args.export_dir {
        settings.export_dir = dir.clone();
    }
    let timeout = match &args.timeout {
        Some(t) => parse_duration(t).with_context(|| format!("Invalid --timeout: {}", t))?,
        None => settings.request_timeout(),
    };

    let (tower_source, site_source) = build_sources(&args, &settings, timeout);
    info!(
        towers = tower_source.description(),
        sites = site_source.description(),
        "Starting"
    );

    let mut app = App::new(settings, tower_source, site_source)?;
    app.export_format = args.format;
    if args.from.is_some() || args.to.is_some() {
        let start = args.from.unwrap_or(app.range.start_date());
        let end = args.to.unwrap_or(app.range.end_date());
        let offset = app.settings().offset();
        app = app.with_range(DateRange::new(start, end, offset));
    }

    match args.once {
        Some(page) => run_once(app, page),
        None => run_tui(app.with_theme(Theme::auto_detect())),
    }
}

/// Logs go to `--log-file` when given. Otherwise headless runs log to
/// stderr and the TUI discards them, since it owns the terminal.
fn init_tracing(log_file: Option<&Path>, headless: bool) -> Result<()> {
    let writer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None if headless => BoxMakeWriter::new(io::stderr),
        None => BoxMakeWriter::new(io::sink),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(log_file.is_none() && headless),
        )
        .init();
    Ok(())
}

fn build_sources(
    args: &Args,
    settings: &Settings,
    timeout: Duration,
) -> (Box<dyn TowerSource>, Box<dyn SiteSource>) {
    match &args.replay {
        Some(dir) => (
            Box::new(ReplaySource::new(dir)),
            Box::new(ReplaySource::new(dir)),
        ),
        None => (
            Box::new(TowerReportClient::new(settings.tower.clone(), timeout)),
            Box::new(SissClient::new(settings.siss.clone(), timeout)),
        ),
    }
}

/// Refresh one page, export the full table and print the path.
fn run_once(mut app: App, page: Page) -> Result<()> {
    app.set_view(match page {
        Page::Towers => View::Towers,
        Page::Sites => View::Sites,
    });
    app.refresh()?;
    let path = app.export_current(false)?;
    println!("{}", path.display());
    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
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

    let result = run_app(&mut terminal, &mut app);

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

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered =
                    ratatui::layout::Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Towers | View::Sites => ui::page::render(frame, app, chunks[2]),
                View::History => ui::history::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                // Content starts after header (1) + tabs (1)
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, 2),
                _ => {}
            }
        }
    }

    Ok(())
}
