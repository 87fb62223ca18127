//! Application state store
//!
//! Holds the browse/search/detail state in one [`MoviesState`] value. Every
//! mutation replaces the whole state, bumps a revision observers can wait
//! on, and persists the durable subset (recently viewed + filters) under the
//! `moviesState` storage key.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::models::{Filters, Movie, MovieDetails};
use crate::storage::Storage;

/// Storage key for the durable blob
pub const STORAGE_KEY: &str = "moviesState";

/// Maximum number of recently viewed movies kept
pub const RECENTLY_VIEWED_LIMIT: usize = 10;

/// Complete in-memory state
#[derive(Debug, Clone, PartialEq)]
pub struct MoviesState {
    pub movies: Vec<Movie>,
    pub recently_viewed: Vec<Movie>,
    pub selected_movie: Option<MovieDetails>,
    pub loading: bool,
    pub error: Option<String>,
    pub current_page: u32,
    pub total_pages: u32,
    pub filters: Filters,
}

impl Default for MoviesState {
    fn default() -> Self {
        Self {
            movies: Vec::new(),
            recently_viewed: Vec::new(),
            selected_movie: None,
            loading: false,
            error: None,
            current_page: 1,
            total_pages: 1,
            filters: Filters::default(),
        }
    }
}

/// The persisted subset of [`MoviesState`]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default)]
    recently_viewed: Vec<Movie>,
    #[serde(default)]
    filters: Filters,
}

/// Single owner of [`MoviesState`]
pub struct MoviesStore {
    state: MoviesState,
    storage: Box<dyn Storage>,
    revision: watch::Sender<u64>,
}

impl std::fmt::Debug for MoviesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoviesStore")
            .field("state", &self.state)
            .field("revision", &*self.revision.borrow())
            .finish()
    }
}

impl MoviesStore {
    /// Create a store, restoring durable state from `storage`
    ///
    /// A missing or unreadable blob falls back to defaults.
    pub fn new(storage: Box<dyn Storage>) -> Self {
        let persisted = Self::load(storage.as_ref());
        let state = MoviesState {
            recently_viewed: persisted.recently_viewed,
            filters: persisted.filters,
            ..MoviesState::default()
        };
        let (revision, _) = watch::channel(0);

        Self {
            state,
            storage,
            revision,
        }
    }

    fn load(storage: &dyn Storage) -> PersistedState {
        let raw = match storage.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PersistedState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read saved state");
                return PersistedState::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(persisted) => persisted,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unparseable saved state");
                PersistedState::default()
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> &MoviesState {
        &self.state
    }

    pub fn movies(&self) -> &[Movie] {
        &self.state.movies
    }

    pub fn recently_viewed(&self) -> &[Movie] {
        &self.state.recently_viewed
    }

    pub fn selected_movie(&self) -> Option<&MovieDetails> {
        self.state.selected_movie.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn current_page(&self) -> u32 {
        self.state.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.state.total_pages
    }

    pub fn filters(&self) -> &Filters {
        &self.state.filters
    }

    /// Receiver that observes one revision bump per mutation
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    pub fn set_movies(&mut self, movies: Vec<Movie>) {
        self.update(|s| s.movies = movies);
    }

    /// Append a further page to the current list
    pub fn append_movies(&mut self, movies: Vec<Movie>) {
        self.update(|s| s.movies.extend(movies));
    }

    pub fn set_current_page(&mut self, page: u32) {
        self.update(|s| s.current_page = page);
    }

    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.update(|s| s.total_pages = total_pages);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.update(|s| s.loading = loading);
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.update(|s| s.error = error);
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.update(|s| s.filters = filters);
    }

    pub fn clear_filters(&mut self) {
        self.set_filters(Filters::default());
    }

    /// Select a movie; a present value is also pushed to recently viewed
    pub fn set_selected_movie(&mut self, movie: Option<MovieDetails>) {
        let recent = movie.as_ref().map(MovieDetails::as_movie);
        self.update(|s| s.selected_movie = movie);
        if let Some(recent) = recent {
            self.add_to_recently_viewed(recent);
        }
    }

    /// Prepend `movie`, drop older entries with the same id, keep the newest 10
    pub fn add_to_recently_viewed(&mut self, movie: Movie) {
        self.update(|s| {
            s.recently_viewed.retain(|m| m.id != movie.id);
            s.recently_viewed.insert(0, movie);
            s.recently_viewed.truncate(RECENTLY_VIEWED_LIMIT);
        });
    }

    /// Replace the state with a modified copy, persist, then notify
    fn update(&mut self, f: impl FnOnce(&mut MoviesState)) {
        let mut next = self.state.clone();
        f(&mut next);
        self.state = next;
        self.persist();
        self.revision.send_modify(|rev| *rev += 1);
    }

    fn persist(&mut self) {
        let persisted = PersistedState {
            recently_viewed: self.state.recently_viewed.clone(),
            filters: self.state.filters.clone(),
        };

        let json = match serde_json::to_string(&persisted) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize state");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(STORAGE_KEY, &json) {
            tracing::error!(error = %e, "failed to save state");
        }
    }
}
