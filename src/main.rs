mod app;
mod catalog;
mod config;
mod engine;
mod event;
mod services;
mod session;
mod store;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use app::{App, AppScreen, AssistRequest};
use catalog::Catalog;
use config::Config;
use event::{AppEvent, EventHandler};
use services::{Clock, Services, SystemClock};
use session::share;
use store::json_store::JsonStore;
use store::{MemoryStore, Persistence, ProgressStore, Storage};
use ui::components::calendar_view::CalendarView;
use ui::components::progress_bar::ProgressBar;
use ui::components::quote_board::QuoteBoard;
use ui::components::stats_panel::StatsPanel;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "unquote", version, about = "Daily quote unscramble puzzle")]
struct Cli {
    #[arg(short, long, help = "Open a shared challenge (date or link)")]
    challenge: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Quote catalog JSON file")]
    catalog: Option<PathBuf>,

    #[arg(long, help = "Sync endpoint for completion history")]
    remote: Option<String>,

    #[arg(long, help = "Print statistics and exit")]
    stats: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.stats);

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("config unreadable, using defaults: {e:#}");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(path) = cli.catalog {
        config.catalog_path = Some(path.to_string_lossy().to_string());
    }
    if let Some(remote) = cli.remote {
        config.remote_url = Some(remote);
    }
    config.validate();

    let catalog = match config.catalog_path.as_deref() {
        Some(path) => Catalog::from_path(path.as_ref())
            .with_context(|| format!("loading catalog {path}"))?,
        None => Catalog::bundled().context("loading bundled catalog")?,
    };
    let progress = ProgressStore::open(build_storage(&config));

    if cli.stats {
        print_stats(&progress);
        return Ok(());
    }

    let mut shared: Option<NaiveDate> = match cli.challenge.as_deref() {
        Some(link) => {
            let parsed = share::parse_challenge(link);
            if parsed.is_none() {
                log::warn!("ignoring unrecognised challenge {link:?}");
            }
            parsed
        }
        None => None,
    };

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        log::warn!(
            "unknown theme {:?}, available: {}",
            config.theme,
            Theme::available_themes().join(", ")
        );
        Theme::default()
    });
    let tick_rate = config.tick_rate();
    let mut app = App::open(config, catalog, progress, Services::default(), &mut shared)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(tick_rate);

    let result = run_app(&mut terminal, &mut app, &theme, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// The terminal is owned by the UI, so log lines go to a file.
fn init_logging(to_stderr: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if !to_stderr {
        let dir = JsonStore::default_dir();
        let file = fs::create_dir_all(&dir).and_then(|()| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("unquote.log"))
        });
        let target: Box<dyn io::Write + Send> = match file {
            Ok(file) => Box::new(file),
            Err(_) => Box::new(io::sink()),
        };
        builder.target(env_logger::Target::Pipe(target));
    }
    builder.init();
}

fn build_storage(config: &Config) -> Storage {
    let local: Box<dyn Persistence> = match JsonStore::new() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("data directory unavailable, progress will not persist: {e:#}");
            Box::new(MemoryStore::new())
        }
    };
    let storage = Storage::new(local, remote_store(config));
    log::info!(
        "progress storage: {}",
        if storage.has_remote() { "remote with local backup" } else { "local only" }
    );
    storage
}

#[cfg(feature = "network")]
fn remote_store(config: &Config) -> Option<Box<dyn Persistence>> {
    let url = config.remote_url.as_deref()?;
    match store::remote::HttpStore::new(url) {
        Ok(remote) => Some(Box::new(remote)),
        Err(e) => {
            log::warn!("remote store {url} unavailable: {e:#}");
            None
        }
    }
}

#[cfg(not(feature = "network"))]
fn remote_store(config: &Config) -> Option<Box<dyn Persistence>> {
    if config.remote_url.is_some() {
        log::warn!("built without the network feature, ignoring remote_url");
    }
    None
}

fn print_stats(progress: &ProgressStore) {
    let stats = progress.display_stats(SystemClock.today());
    println!("Played:         {}", stats.total_played);
    println!("Win rate:       {}%", stats.win_rate);
    println!("Current streak: {}", stats.current_streak);
    println!("Max streak:     {}", stats.max_streak);
    if let Some(avg) = engine::stats::average_time(&progress.user_data().puzzles) {
        println!("Average time:   {}", app::format_duration(avg));
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    theme: &Theme,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app, theme))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Puzzle => handle_puzzle_key(app, key),
        AppScreen::Stats => handle_stats_key(app, key),
        AppScreen::Calendar => handle_calendar_key(app, key),
    }
}

fn handle_puzzle_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char(ch) if ch.is_alphanumeric() => app.type_char(ch, now),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.reset(),
        KeyCode::Tab => {
            if app.assist(now) == AssistRequest::Unavailable {
                app.status = Some("Nothing to unscramble right now".to_string());
            }
        }
        KeyCode::Right | KeyCode::Down => {
            app.cycle_target(true);
        }
        KeyCode::Left | KeyCode::Up => {
            app.cycle_target(false);
        }
        KeyCode::F(2) => app.go_to_stats(),
        KeyCode::F(3) => app.go_to_calendar(),
        KeyCode::F(4) => app.share(),
        KeyCode::F(5) => app.toggle_sound(),
        KeyCode::F(6) => app.toggle_music(),
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::F(2) | KeyCode::Char('q') => app.go_to_puzzle(),
        KeyCode::F(3) => app.go_to_calendar(),
        _ => {}
    }
}

fn handle_calendar_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::F(3) | KeyCode::Char('q') => app.go_to_puzzle(),
        KeyCode::Left | KeyCode::Char('h') => app.calendar_move(-1),
        KeyCode::Right | KeyCode::Char('l') => app.calendar_move(1),
        KeyCode::Up | KeyCode::Char('k') => app.calendar_move(-7),
        KeyCode::Down | KeyCode::Char('j') => app.calendar_move(7),
        KeyCode::PageUp => app.calendar_shift_month(-1),
        KeyCode::PageDown => app.calendar_shift_month(1),
        KeyCode::Enter => {
            let date = app.calendar.cursor;
            if !app.select_date(date) {
                app.status = Some(format!("No puzzle available for {date}"));
            }
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App, theme: &Theme) {
    let area = frame.area();
    let colors = &theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let hints: &[&str] = match app.screen {
        AppScreen::Puzzle => &[
            "[a-z] Place letter",
            "[Bksp] Undo",
            "[Del] Clear",
            "[←/→] Switch word",
            "[Tab] Assist",
            "[F2] Stats",
            "[F3] Calendar",
            "[F4] Share",
            "[F5] Sound",
            "[F6] Music",
            "[Esc] Quit",
        ],
        AppScreen::Stats => &["[Esc] Back", "[F3] Calendar"],
        AppScreen::Calendar => &[
            "[Arrows] Move",
            "[PgUp/PgDn] Month",
            "[Enter] Open",
            "[Esc] Back",
        ],
    };
    let mut footer_lines = pack_hint_lines(hints, area.width as usize);
    if let Some(status) = &app.status {
        footer_lines.insert(0, format!("  {status}"));
    }
    let layout = AppLayout::new(area, footer_lines.len() as u16);

    let stats = app.display_stats();
    let mut header_info = format!(" {}", app.session.date().format("%b %-d, %Y"));
    if stats.current_streak > 0 {
        header_info.push_str(&format!(" | {} day streak", stats.current_streak));
    }
    if !app.settings.sound_effects_enabled {
        header_info.push_str(" | muted");
    }
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " unquote ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            &*header_info,
            Style::default()
                .fg(colors.accent_dim())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let now = chrono::Utc::now();
    match app.screen {
        AppScreen::Puzzle => {
            let show_bars = layout.tier.show_cooldown_bar(area.height);
            let mut constraints = vec![Constraint::Min(8)];
            if show_bars {
                constraints.push(Constraint::Length(3));
                constraints.push(Constraint::Length(3));
            }
            let main = Layout::default()
                .direction(Direction::Vertical)
                .constraints(constraints)
                .split(layout.main);

            frame.render_widget(QuoteBoard::new(&app.session, theme), main[0]);

            if show_bars {
                frame.render_widget(
                    ProgressBar::new("Progress", app.session.progress(), theme),
                    main[1],
                );
                let instant = Instant::now();
                let remaining = app.assist_remaining(instant);
                let cooldown = if remaining.is_zero() {
                    ProgressBar::new("Assist", 1.0, theme).caption("ready [Tab]")
                } else {
                    ProgressBar::new("Assist", app.gate.progress(instant), theme)
                        .caption(format!("{}s", remaining.as_secs() + 1))
                };
                frame.render_widget(cooldown, main[2]);
            }

            if let Some(sidebar) = layout.sidebar {
                frame.render_widget(
                    StatsPanel::new(stats, theme).elapsed(app.session.elapsed_secs(now)),
                    sidebar,
                );
            }
        }
        AppScreen::Stats => {
            let average = engine::stats::average_time(&app.progress.user_data().puzzles);
            frame.render_widget(StatsPanel::new(stats, theme).average(average), layout.main);
        }
        AppScreen::Calendar => {
            let days = app.month_view();
            frame.render_widget(CalendarView::new(&days, app.calendar.cursor, theme), layout.main);
        }
    }

    let footer = Paragraph::new(
        footer_lines
            .into_iter()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.accent_dim()))))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(footer, layout.footer);
}
