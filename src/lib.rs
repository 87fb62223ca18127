//! cinegrid - terminal movie catalog backed by TMDB
//!
//! An infinitely scrolling poster grid with genre/year/sort filters,
//! debounced search suggestions and a detail view with cast. Recently viewed
//! movies and the active filters survive restarts.
//!
//! # Modules
//!
//! - `models` - Movies, details, credits, filters and sort keys
//! - `api` - TMDB catalog client
//! - `storage` - Durable key-value storage (file and in-memory)
//! - `store` - Application state store with persistence and change notification
//! - `controller` - List paging, search debouncing and detail loading
//! - `ui` - TUI components
//! - `app` - Screen state machine and key handling
//! - `cli` / `commands` - Scriptable command line surface
//! - `config` / `logging` - Ambient setup

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod logging;
pub mod models;
pub mod storage;
pub mod store;
pub mod ui;

// Re-export commonly used types
pub use models::{
    CastMember, Credits, Filters, Genre, Movie, MovieDetails, MoviePage, SortKey,
};

pub use api::{PageRequest, TmdbClient, TmdbError};
pub use app::{Action, App, AppState};
pub use controller::{DetailController, ListController, SearchController};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{MoviesState, MoviesStore};
