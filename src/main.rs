use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use timestable::{
    app::App,
    config::{MAX_TIMER_SECS, MIN_SCORE_LIMIT, MIN_TIMER_SECS},
    difficulty::{self, DifficultySelection},
    engine::QuizEngine,
    history::GameHistory,
    runtime::{Clock, CrosstermEventSource, FixedTicker, QuizEvent, Runner, SystemClock},
    store::{SettingsStore, SqliteSettingsStore, StoreError},
    TICK_RATE_MS,
};

/// multiplication tables quiz for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A multiple-choice multiplication quiz with configurable operand ranges, an optional per-question countdown, and a persisted history of finished games."
)]
pub struct Cli {
    /// settings database to use instead of the default location
    #[clap(long)]
    db: Option<PathBuf>,

    /// points needed to finish a game
    #[clap(long, value_parser = clap::value_parser!(u32).range(MIN_SCORE_LIMIT as i64..))]
    score_limit: Option<u32>,

    /// enable the per-question countdown with this many seconds
    #[clap(long, value_parser = clap::value_parser!(u32).range(MIN_TIMER_SECS as i64..=MAX_TIMER_SECS as i64))]
    timer: Option<u32>,

    /// disable the per-question countdown
    #[clap(long, conflicts_with = "timer")]
    no_timer: bool,

    /// never repeat a question within a game
    #[clap(long)]
    no_duplicates: bool,

    /// difficulty group (easy, medium, hard, expert, god)
    #[clap(long)]
    group: Option<String>,

    /// difficulty level within the group (1-5)
    #[clap(long)]
    level: Option<String>,

    /// seed the question generator for a reproducible game
    #[clap(long)]
    seed: Option<u64>,

    /// write the game history as CSV to this path and exit
    #[clap(long, value_name = "PATH")]
    export_history: Option<PathBuf>,
}

impl Cli {
    fn open_store(&self) -> Result<SqliteSettingsStore, StoreError> {
        let opened = match &self.db {
            Some(path) => SqliteSettingsStore::open(path),
            None => SqliteSettingsStore::open_default(),
        };

        opened.or_else(|e| {
            warn!("settings database unavailable ({e}), settings will not be saved");
            SqliteSettingsStore::open_in_memory()
        })
    }

    fn difficulty(&self) -> DifficultySelection {
        if self.group.is_none() && self.level.is_none() {
            return DifficultySelection::default();
        }
        difficulty::validate(
            Some(self.group.as_deref().unwrap_or("easy")),
            Some(self.level.as_deref().unwrap_or("1")),
        )
    }

    /// Apply command line overrides; they are persisted like any other edit.
    fn apply<S: SettingsStore, C: Clock>(&self, engine: &mut QuizEngine<S, C>) {
        if let Some(limit) = self.score_limit {
            engine.set_score_limit(&limit.to_string());
        }
        if let Some(secs) = self.timer {
            engine.set_timer_duration(secs);
            engine.set_use_timer(true);
        }
        if self.no_timer {
            engine.set_use_timer(false);
        }
        if self.no_duplicates {
            engine.set_allow_duplicates(false);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if std::env::var_os("RUST_LOG").is_some() {
        pretty_env_logger::init();
    }

    let store = cli.open_store()?;

    if let Some(path) = &cli.export_history {
        let history = GameHistory::load(&store);
        history.export_csv_to_path(path)?;
        info!("exported {} games to {}", history.len(), path.display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut engine = QuizEngine::with_parts(store, SystemClock, rng);
    cli.apply(&mut engine);
    let mut app = App::new(engine, cli.difficulty());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, S: SettingsStore, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<S, C>,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            QuizEvent::Tick => {
                let size = terminal.size()?;
                app.on_tick(size.width, size.height);
            }
            QuizEvent::Resize => {}
            QuizEvent::Key(key) => {
                if app.on_key(key) {
                    break;
                }
            }
        }
        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui<S: SettingsStore, C: Clock>(app: &App<S, C>, f: &mut Frame) {
    f.render_widget(app, f.area());
}
