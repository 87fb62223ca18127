//! Controllers that sit between the catalog client and the state store
//!
//! Each controller splits a request into a synchronous "ticket" step, an
//! async fetch, and an `apply` step that writes the result into the store.
//! The TUI runs the fetch on a spawned task and applies results on its main
//! loop; the CLI and tests simply await the fetch in between.

pub mod detail;
pub mod list;
pub mod search;

pub use detail::{DetailController, DetailTicket};
pub use list::{ListController, PageTicket, ScrollMetrics, SCROLL_THRESHOLD_ROWS};
pub use search::{DebounceTicket, SearchController, SearchTicket, MIN_QUERY_LEN, SEARCH_DEBOUNCE};

use anyhow::Result;

use crate::api::TmdbClient;
use crate::models::Genre;
use crate::store::MoviesStore;

pub const LOAD_MOVIES_ERROR: &str = "Failed to load movies";
pub const LOAD_DETAILS_ERROR: &str = "Failed to load movie details";
pub const SEARCH_ERROR: &str = "Failed to search movies";
pub const LOAD_GENRES_ERROR: &str = "Failed to load genres";

/// Fetch the genre list
pub async fn fetch_genres(client: &TmdbClient) -> Result<Vec<Genre>> {
    client.fetch_genres().await
}

/// Record a genre fetch outcome; failures leave an empty list and an error
pub fn apply_genres(store: &mut MoviesStore, result: Result<Vec<Genre>>) -> Vec<Genre> {
    match result {
        Ok(genres) => genres,
        Err(e) => {
            tracing::error!(error = %e, "genre request failed");
            store.set_error(Some(LOAD_GENRES_ERROR.to_string()));
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_apply_genres_failure_sets_error() {
        let mut store = MoviesStore::new(Box::new(MemoryStorage::new()));
        let genres = apply_genres(&mut store, Err(anyhow::anyhow!("boom")));
        assert!(genres.is_empty());
        assert_eq!(store.error(), Some(LOAD_GENRES_ERROR));
    }

    #[test]
    fn test_apply_genres_success() {
        let mut store = MoviesStore::new(Box::new(MemoryStorage::new()));
        let genres = apply_genres(
            &mut store,
            Ok(vec![Genre {
                id: 28,
                name: "Action".into(),
            }]),
        );
        assert_eq!(genres.len(), 1);
        assert!(store.error().is_none());
    }
}
