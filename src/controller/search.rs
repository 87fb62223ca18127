//! Debounced type-ahead search
//!
//! Input passes through four stages: a minimum length check, a 500ms
//! debounce, duplicate suppression against the last issued query, and a
//! latest-wins guard on responses.

use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinHandle;

use super::SEARCH_ERROR;
use crate::api::{PageRequest, TmdbClient};
use crate::models::{Movie, MoviePage};
use crate::store::MoviesStore;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Shorter queries never reach the network
pub const MIN_QUERY_LEN: usize = 3;

/// Input waiting out the debounce window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceTicket {
    pub seq: u64,
    pub query: String,
}

/// A search that should be sent to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
}

#[derive(Debug, Default)]
pub struct SearchController {
    /// Bumped on every keystroke
    seq: u64,
    last_issued: Option<String>,
    latest_issued: Option<u64>,
    suggestions: Vec<Movie>,
    timer: Option<JoinHandle<()>>,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register new input text
    ///
    /// Returns a ticket carrying the trimmed text, or None when that text is
    /// too short. A short query also drops pending work and clears
    /// suggestions; the last issued query is kept, so coming back to it is
    /// still a duplicate.
    pub fn on_input(&mut self, query: &str) -> Option<DebounceTicket> {
        self.seq += 1;

        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            self.cancel();
            self.suggestions.clear();
            self.latest_issued = None;
            return None;
        }

        Some(DebounceTicket {
            seq: self.seq,
            query: query.to_string(),
        })
    }

    /// Fire `on_fire` with the ticket after the debounce window
    ///
    /// Replaces any pending timer. Must be called inside a tokio runtime.
    pub fn schedule<F>(&mut self, ticket: DebounceTicket, on_fire: F)
    where
        F: FnOnce(DebounceTicket) + Send + 'static,
    {
        self.cancel();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(SEARCH_DEBOUNCE).await;
            on_fire(ticket);
        }));
    }

    /// Abort the pending debounce timer, if any
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Debounce elapsed; returns the search to issue, if still wanted
    pub fn on_timer(&mut self, ticket: DebounceTicket) -> Option<SearchTicket> {
        self.timer = None;

        if ticket.seq != self.seq {
            tracing::trace!(seq = ticket.seq, latest = self.seq, "superseded input");
            return None;
        }
        if self.last_issued.as_deref() == Some(ticket.query.as_str()) {
            tracing::trace!(query = %ticket.query, "duplicate query suppressed");
            return None;
        }

        tracing::debug!(query = %ticket.query, "issuing search");
        self.last_issued = Some(ticket.query.clone());
        self.latest_issued = Some(ticket.seq);
        Some(SearchTicket {
            seq: ticket.seq,
            query: ticket.query,
        })
    }

    /// Perform the search a ticket describes (first page only)
    pub async fn fetch(client: &TmdbClient, ticket: &SearchTicket) -> Result<MoviePage> {
        client
            .fetch_page(&PageRequest::new(1).query(ticket.query.clone()))
            .await
    }

    /// Apply a response; only the most recently issued search is kept
    pub fn apply(
        &mut self,
        store: &mut MoviesStore,
        ticket: SearchTicket,
        result: Result<MoviePage>,
    ) -> bool {
        if self.latest_issued != Some(ticket.seq) {
            tracing::debug!(query = %ticket.query, "dropping superseded search results");
            return false;
        }

        match result {
            Ok(page) => self.suggestions = page.results,
            Err(e) => {
                tracing::error!(query = %ticket.query, error = %e, "search failed");
                store.set_error(Some(SEARCH_ERROR.to_string()));
            }
        }
        true
    }

    pub fn suggestions(&self) -> &[Movie] {
        &self.suggestions
    }

    /// Forget the current suggestions (after one is selected)
    pub fn clear(&mut self) {
        self.cancel();
        self.suggestions.clear();
        self.last_issued = None;
        self.latest_issued = None;
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel();
    }
}
