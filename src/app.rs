//! Screen state machine for the TUI
//!
//! Which screen is showing, how Esc walks back through them, and what each
//! key does.
//! Key handling only changes view state; anything that needs the network
//! or the store is returned as an [`Action`] for the main loop to perform.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::Filters;
use crate::store::MoviesStore;
use crate::ui::filters::FilterField;
use crate::ui::{DetailView, FilterPanel, MovieGrid, SearchBox};

// =============================================================================
// Screens
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Movie grid with search box
    #[default]
    Browse,
    /// Detail view for one movie
    Detail,
    /// Genre/year/sort filter panel
    Filters,
    /// Recently viewed movies
    Recent,
}

/// Whether keys navigate or type into a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Search box (Browse) or year field (Filters) has focus
    Editing,
}

// =============================================================================
// Actions
// =============================================================================

/// Work requested by a key press
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Load details for a movie id
    OpenDetails(u64),
    /// Replace the active filters and reload the listing
    ApplyFilters(Filters),
    /// Reset filters and reload the listing
    ClearFilters,
    /// Search text changed
    SearchInput(String),
    /// Search text submitted as the listing query
    SearchSubmit(String),
    Quit,
}

// =============================================================================
// Selection State
// =============================================================================

/// Selection state for plain list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub selected: usize,
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self) {
        self.selected = (self.selected + 1).min(self.len.saturating_sub(1));
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.len.saturating_sub(1);
    }

    /// Update length, clamping the selection
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

// =============================================================================
// App
// =============================================================================

/// View state of the TUI; movie data itself lives in the store
#[derive(Debug)]
pub struct App {
    pub state: AppState,
    /// Screens to return to on Esc
    pub nav_stack: Vec<AppState>,
    /// Cleared on quit; the event loop exits
    pub running: bool,
    pub input_mode: InputMode,

    pub grid: MovieGrid,
    pub search: SearchBox,
    pub filters: FilterPanel,
    pub detail: DetailView,
    pub recent: ListState,
    /// Movie the detail screen was opened for
    pub detail_id: Option<u64>,
    /// Details request still in flight
    pub detail_loading: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            state: AppState::Browse,
            nav_stack: Vec::new(),
            running: true,
            input_mode: InputMode::Normal,
            grid: MovieGrid::new(),
            search: SearchBox::new(),
            filters: FilterPanel::new(),
            detail: DetailView::default(),
            recent: ListState::default(),
            detail_id: None,
            detail_loading: false,
        }
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom image CDN for cast photos
    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.detail = DetailView::new(image_base_url);
        self
    }

    /// Switch screens, remembering the current one for `back`
    pub fn navigate(&mut self, state: AppState) {
        if self.state != state {
            self.nav_stack.push(self.state);
            self.state = state;
        }
        self.set_input_mode(InputMode::Normal);
    }

    /// Leave the focused field, else pop a screen; false when nothing to undo
    pub fn back(&mut self) -> bool {
        if self.input_mode == InputMode::Editing {
            self.set_input_mode(InputMode::Normal);
            return true;
        }

        if let Some(prev) = self.nav_stack.pop() {
            self.state = prev;
            true
        } else {
            false
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.search.focused = mode == InputMode::Editing && self.state == AppState::Browse;
    }

    /// Focus the search input (browse screen only)
    pub fn focus_search(&mut self) {
        if self.state == AppState::Browse {
            self.set_input_mode(InputMode::Editing);
        }
    }

    /// Open the filter panel on a copy of the active filters
    pub fn open_filters(&mut self, active: &Filters) {
        self.filters.open(active);
        self.navigate(AppState::Filters);
    }

    fn open_details(&mut self, id: u64) -> Option<Action> {
        self.detail.reset();
        self.detail_id = Some(id);
        self.detail_loading = true;
        self.navigate(AppState::Detail);
        Some(Action::OpenDetails(id))
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle a key press, returning any work for the main loop
    pub fn handle_key(&mut self, key: KeyEvent, store: &MoviesStore) -> Option<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return Some(Action::Quit);
        }

        if self.input_mode == InputMode::Editing {
            match self.state {
                AppState::Filters => self.handle_year_key(key),
                _ => self.handle_search_key(key),
            }
        } else {
            self.handle_normal_key(key, store)
        }
    }

    /// Keys while the search box is focused
    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.set_input_mode(InputMode::Normal);
                None
            }
            KeyCode::Enter => {
                if let Some(id) = self.search.selected_suggestion().map(|m| m.id) {
                    self.search.clear();
                    return self.open_details(id);
                }
                self.set_input_mode(InputMode::Normal);
                self.search.set_suggestions(Vec::new());
                Some(Action::SearchSubmit(self.search.query.trim().to_string()))
            }
            KeyCode::Down | KeyCode::Tab => {
                self.search.next_suggestion();
                None
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.search.prev_suggestion();
                None
            }
            KeyCode::Char(_) | KeyCode::Backspace | KeyCode::Delete => {
                match key.code {
                    KeyCode::Char(c) => self.search.insert(c),
                    KeyCode::Backspace => self.search.backspace(),
                    _ => self.search.delete(),
                }
                Some(Action::SearchInput(self.search.query.clone()))
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End => {
                match key.code {
                    KeyCode::Left => self.search.cursor_left(),
                    KeyCode::Right => self.search.cursor_right(),
                    KeyCode::Home => self.search.cursor_home(),
                    _ => self.search.cursor_end(),
                }
                None
            }
            _ => None,
        }
    }

    /// Keys while the release year field is focused
    fn handle_year_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => self.set_input_mode(InputMode::Normal),
            KeyCode::Char(c) => self.filters.year_push(c),
            KeyCode::Backspace => self.filters.year_backspace(),
            _ => {}
        }
        None
    }

    /// Keys in normal navigation mode
    fn handle_normal_key(&mut self, key: KeyEvent, store: &MoviesStore) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return Some(Action::Quit);
            }
            KeyCode::Esc => {
                self.back();
                return None;
            }
            _ => {}
        }

        match self.state {
            AppState::Browse => self.handle_browse_key(key, store),
            AppState::Detail => self.handle_detail_key(key, store),
            AppState::Filters => self.handle_filters_key(key),
            AppState::Recent => self.handle_recent_key(key, store),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent, store: &MoviesStore) -> Option<Action> {
        self.grid.set_len(store.movies().len());
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.grid.left(),
            KeyCode::Right | KeyCode::Char('l') => self.grid.right(),
            KeyCode::Up | KeyCode::Char('k') => self.grid.up(),
            KeyCode::Down | KeyCode::Char('j') => self.grid.down(),
            KeyCode::PageUp => self.grid.page_up(),
            KeyCode::PageDown => self.grid.page_down(),
            KeyCode::Home | KeyCode::Char('g') => self.grid.first(),
            KeyCode::End | KeyCode::Char('G') => self.grid.last(),
            KeyCode::Enter => {
                let id = store.movies().get(self.grid.selected).map(|m| m.id)?;
                return self.open_details(id);
            }
            KeyCode::Char('/') | KeyCode::Char('s') => self.focus_search(),
            KeyCode::Char('f') => self.open_filters(store.filters()),
            KeyCode::Char('r') => {
                self.recent = ListState::new(store.recently_viewed().len());
                self.navigate(AppState::Recent);
            }
            KeyCode::Char('c') => {
                self.search.clear();
                return Some(Action::ClearFilters);
            }
            _ => {}
        }
        None
    }

    fn handle_detail_key(&mut self, key: KeyEvent, store: &MoviesStore) -> Option<Action> {
        let cast_len = store
            .selected_movie()
            .map(|d| d.credits.cast.len())
            .unwrap_or(0);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.detail.up(),
            KeyCode::Down | KeyCode::Char('j') => self.detail.down(cast_len),
            KeyCode::Tab => self.detail.toggle_focus(),
            KeyCode::Backspace => {
                self.back();
            }
            _ => {}
        }
        None
    }

    fn handle_filters_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.filters.up(),
            KeyCode::Down | KeyCode::Char('j') => self.filters.down(),
            KeyCode::Char(' ') => self.filters.toggle(),
            KeyCode::Tab => self.filters.next_field(),
            KeyCode::Char('s') => self.filters.sort_next(),
            KeyCode::Char('S') => self.filters.sort_prev(),
            KeyCode::Char('y') => {
                self.filters.field = FilterField::Year;
                self.set_input_mode(InputMode::Editing);
            }
            KeyCode::Enter => {
                let filters = self.filters.to_filters();
                self.back();
                return Some(Action::ApplyFilters(filters));
            }
            KeyCode::Char('c') => {
                self.back();
                self.search.clear();
                return Some(Action::ClearFilters);
            }
            _ => {}
        }
        None
    }

    fn handle_recent_key(&mut self, key: KeyEvent, store: &MoviesStore) -> Option<Action> {
        self.recent.set_len(store.recently_viewed().len());
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.recent.up(),
            KeyCode::Down | KeyCode::Char('j') => self.recent.down(),
            KeyCode::Home | KeyCode::Char('g') => self.recent.first(),
            KeyCode::End | KeyCode::Char('G') => self.recent.last(),
            KeyCode::Enter => {
                let id = store
                    .recently_viewed()
                    .get(self.recent.selected)
                    .map(|m| m.id)?;
                return self.open_details(id);
            }
            _ => {}
        }
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
