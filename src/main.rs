//! cinegrid - terminal movie catalog backed by TMDB
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! cinegrid
//!
//! # CLI mode (for automation)
//! cinegrid discover --genre 878 --sort vote_average.desc
//! cinegrid search "blade runner" --json
//! cinegrid info 78
//! ```

use std::io::{stdout, Stdout};
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use cinegrid::app::{Action, App, AppState};
use cinegrid::cli::{Cli, Command, ExitCode, Output};
use cinegrid::commands;
use cinegrid::config::{Config, ConfigError};
use cinegrid::controller::{
    self, DebounceTicket, DetailController, DetailTicket, ListController, PageTicket,
    SearchController, SearchTicket,
};
use cinegrid::logging;
use cinegrid::models::{Filters, Genre, MovieDetails, MoviePage};
use cinegrid::storage::{MemoryStorage, Storage};
use cinegrid::store::MoviesStore;
use cinegrid::ui;
use cinegrid::TmdbClient;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let output = Output::new(&cli);
            let code = output.error(e.to_string(), ExitCode::ConfigError);
            std::process::exit(code.into());
        }
    };

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        logging::init_cli(cli.quiet);
        let exit_code = run_cli(cli, &config).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        let client = match config.client() {
            Ok(client) => client,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(ExitCode::ConfigError.into());
            }
        };
        run_tui(&config, client).await
    }
}

fn load_config(path: Option<&Path>) -> std::result::Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: &Config) -> ExitCode {
    let output = Output::new(&cli);

    match cli.command {
        Some(Command::Discover(cmd)) => commands::discover_cmd(cmd, config, &output).await,
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, config, &output).await,
        Some(Command::Info(cmd)) => commands::info_cmd(cmd, config, &output).await,
        Some(Command::Genres(cmd)) => commands::genres_cmd(cmd, config, &output).await,
        Some(Command::Recent(cmd)) => commands::recent_cmd(cmd, config, &output).await,
        Some(Command::Filters(cmd)) => commands::filters_cmd(cmd, config, &output).await,
        None => ExitCode::InvalidArgs,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Open durable storage, falling back to memory so the TUI still starts
fn open_storage(config: &Config) -> Box<dyn Storage> {
    match config.storage() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            tracing::warn!(error = %e, "durable storage unavailable, state will not persist");
            Box::new(MemoryStorage::new())
        }
    }
}

/// Run interactive TUI
async fn run_tui(config: &Config, client: TmdbClient) -> Result<()> {
    if let Ok(dir) = config.data_dir() {
        match logging::init_tui(&dir) {
            Ok(path) => tracing::info!(log = %path.display(), "cinegrid starting"),
            Err(e) => eprintln!("Warning: logging disabled: {}", e),
        }
    }

    let store = MoviesStore::new(open_storage(config));
    let mut app = App::new().with_image_base_url(client.image_base_url());
    let (tx, rx) = mpsc::unbounded_channel();
    let mut session = Session::new(client, ListController::new(store), tx);

    // Initialize terminal
    let mut terminal = init_terminal()?;

    // Run the main event loop
    let result = run_event_loop(&mut terminal, &mut app, &mut session, rx).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - handles input, applies async results, renders UI
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    session: &mut Session,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    session.start();
    let mut revisions = session.list.store().subscribe();
    let mut dirty = true;

    while app.running {
        if dirty || revisions.has_changed().unwrap_or(false) {
            revisions.borrow_and_update();
            let store = session.list.store();
            terminal.draw(|frame| ui::draw(frame, app, store))?;
            dirty = false;
        }

        // Poll for events with timeout so async results are picked up
        if event::poll(TICK_RATE)? {
            match event::read()? {
                // Only handle key press events (ignore releases on Windows)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    session.on_key(app, key);
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }

        // Results from spawned requests are only applied here
        while let Ok(event) = rx.try_recv() {
            session.on_event(app, event);
            dirty = true;
        }
    }

    tracing::info!("cinegrid exiting");
    Ok(())
}

// =============================================================================
// Async Plumbing
// =============================================================================

/// Completed background work, delivered to the main loop
enum AppEvent {
    Page(PageTicket, Result<MoviePage>),
    SearchDue(DebounceTicket),
    Search(SearchTicket, Result<MoviePage>),
    Details(DetailTicket, Result<MovieDetails>),
    Genres(Result<Vec<Genre>>),
}

/// Controllers plus the channel their spawned requests report on
struct Session {
    client: TmdbClient,
    list: ListController,
    search: SearchController,
    detail: DetailController,
    tx: UnboundedSender<AppEvent>,
}

impl Session {
    fn new(client: TmdbClient, list: ListController, tx: UnboundedSender<AppEvent>) -> Self {
        Self {
            client,
            list,
            search: SearchController::new(),
            detail: DetailController::new(),
            tx,
        }
    }

    /// First page and the genre list
    fn start(&mut self) {
        if let Some(ticket) = self.list.init() {
            self.spawn_page(ticket);
        }

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = controller::fetch_genres(&client).await;
            let _ = tx.send(AppEvent::Genres(result));
        });
    }

    fn spawn_page(&self, ticket: PageTicket) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = ListController::fetch(&client, &ticket).await;
            let _ = tx.send(AppEvent::Page(ticket, result));
        });
    }

    fn spawn_search(&self, ticket: SearchTicket) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = SearchController::fetch(&client, &ticket).await;
            let _ = tx.send(AppEvent::Search(ticket, result));
        });
    }

    fn spawn_details(&self, ticket: DetailTicket) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = DetailController::fetch(&client, &ticket).await;
            let _ = tx.send(AppEvent::Details(ticket, result));
        });
    }

    fn on_key(&mut self, app: &mut App, key: crossterm::event::KeyEvent) {
        // Any key dismisses the error popup
        if self.list.store().error().is_some() {
            self.list.store_mut().set_error(None);
        }

        let action = app.handle_key(key, self.list.store());
        if let Some(action) = action {
            self.on_action(app, action);
        }

        if app.state == AppState::Browse {
            if let Some(ticket) = self.list.on_scroll(app.grid.scroll_metrics()) {
                self.spawn_page(ticket);
            }
        }
    }

    fn on_action(&mut self, app: &mut App, action: Action) {
        match action {
            Action::OpenDetails(id) => {
                if let Some(ticket) = self.detail.open(Some(id)) {
                    self.spawn_details(ticket);
                }
            }
            Action::ApplyFilters(filters) => self.change_filters(app, filters),
            Action::ClearFilters => self.change_filters(app, Filters::default()),
            Action::SearchInput(query) => match self.search.on_input(&query) {
                Some(ticket) => {
                    let tx = self.tx.clone();
                    self.search.schedule(ticket, move |ticket| {
                        let _ = tx.send(AppEvent::SearchDue(ticket));
                    });
                }
                None => app.search.set_suggestions(Vec::new()),
            },
            Action::SearchSubmit(query) => {
                self.search.clear();
                let mut filters = self.list.store().filters().clone();
                filters.query = (!query.is_empty()).then_some(query);
                self.change_filters(app, filters);
            }
            Action::Quit => {}
        }
    }

    fn change_filters(&mut self, app: &mut App, filters: Filters) {
        let ticket = self.list.on_filters_changed(filters);
        if self.list.take_scroll_reset() {
            app.grid.reset();
        }
        if let Some(ticket) = ticket {
            self.spawn_page(ticket);
        }
    }

    fn on_event(&mut self, app: &mut App, event: AppEvent) {
        match event {
            AppEvent::Page(ticket, result) => {
                self.list.apply_page(ticket, result);
            }
            AppEvent::SearchDue(ticket) => {
                if let Some(ticket) = self.search.on_timer(ticket) {
                    self.spawn_search(ticket);
                }
            }
            AppEvent::Search(ticket, result) => {
                if self.search.apply(self.list.store_mut(), ticket, result) {
                    app.search
                        .set_suggestions(self.search.suggestions().to_vec());
                }
            }
            AppEvent::Details(ticket, result) => {
                if self.detail.apply(self.list.store_mut(), ticket, result) {
                    app.detail_loading = false;
                }
            }
            AppEvent::Genres(result) => {
                let genres = controller::apply_genres(self.list.store_mut(), result);
                app.filters.set_genres(genres);
            }
        }
    }
}
