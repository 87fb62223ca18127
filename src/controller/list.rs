//! Paged movie listing with infinite scroll

use anyhow::Result;

use super::LOAD_MOVIES_ERROR;
use crate::api::{PageRequest, TmdbClient};
use crate::models::{Filters, MoviePage};
use crate::store::MoviesStore;

/// Load the next page once the viewport is this many grid rows from the end
pub const SCROLL_THRESHOLD_ROWS: usize = 2;

/// Viewport position over the movie grid, in rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// First visible row
    pub offset: usize,
    /// Number of rows that fit on screen
    pub visible: usize,
    /// Total rows in the grid
    pub total: usize,
}

impl ScrollMetrics {
    pub fn near_bottom(&self) -> bool {
        self.offset + self.visible + SCROLL_THRESHOLD_ROWS >= self.total
    }
}

/// An issued page load, to be fetched then handed back to [`ListController::apply_page`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    pub generation: u64,
    pub request: PageRequest,
}

/// Drives the browse list: filter changes, page loads, scroll-triggered loads
#[derive(Debug)]
pub struct ListController {
    store: MoviesStore,
    is_loading_more: bool,
    /// Bumped on each filter change so late pages for old filters are dropped
    generation: u64,
    scroll_reset: bool,
}

impl ListController {
    pub fn new(store: MoviesStore) -> Self {
        Self {
            store,
            is_loading_more: false,
            generation: 0,
            scroll_reset: false,
        }
    }

    pub fn store(&self) -> &MoviesStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MoviesStore {
        &mut self.store
    }

    pub fn into_store(self) -> MoviesStore {
        self.store
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// First load when the list is empty
    pub fn init(&mut self) -> Option<PageTicket> {
        if self.store.movies().is_empty() {
            self.load_movies()
        } else {
            None
        }
    }

    /// Reset the listing for new filters and start loading page 1
    pub fn on_filters_changed(&mut self, filters: Filters) -> Option<PageTicket> {
        tracing::debug!(?filters, "filters changed");
        self.scroll_reset = true;
        self.generation += 1;

        self.store.set_movies(Vec::new());
        self.store.set_current_page(1);
        self.store.set_filters(filters);
        self.store.set_loading(true);
        self.store.set_total_pages(1);

        self.load_movies()
    }

    /// Whether the view should jump back to the top; clears the flag
    pub fn take_scroll_reset(&mut self) -> bool {
        std::mem::take(&mut self.scroll_reset)
    }

    /// Issue a load for the current page, or None once past the last page
    pub fn load_movies(&mut self) -> Option<PageTicket> {
        let page = self.store.current_page();
        if page > self.store.total_pages() {
            return None;
        }

        self.is_loading_more = true;
        self.store.set_loading(true);

        Some(PageTicket {
            generation: self.generation,
            request: PageRequest::from_filters(page, self.store.filters()),
        })
    }

    /// Load more when scrolled near the bottom and nothing is in flight
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Option<PageTicket> {
        if self.is_loading_more || self.store.loading() || self.store.movies().is_empty() {
            return None;
        }
        if self.store.current_page() > self.store.total_pages() {
            return None;
        }
        if metrics.near_bottom() {
            self.load_movies()
        } else {
            None
        }
    }

    /// Apply a fetched page; returns false for a ticket from older filters
    pub fn apply_page(&mut self, ticket: PageTicket, result: Result<MoviePage>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping stale page"
            );
            return false;
        }

        let page = ticket.request.page;
        match result {
            Ok(response) => {
                tracing::debug!(
                    page,
                    results = response.results.len(),
                    total_pages = response.total_pages,
                    "page loaded"
                );
                self.store.set_total_pages(response.total_pages);
                if page == 1 {
                    self.store.set_movies(response.results);
                } else {
                    self.store.append_movies(response.results);
                }
                self.store.set_loading(false);
                self.store.set_current_page(page + 1);
            }
            Err(e) => {
                tracing::error!(page, error = %e, "page load failed");
                self.store.set_error(Some(LOAD_MOVIES_ERROR.to_string()));
                self.store.set_loading(false);
            }
        }
        self.is_loading_more = false;
        true
    }

    /// Perform the request a ticket describes
    pub async fn fetch(client: &TmdbClient, ticket: &PageTicket) -> Result<MoviePage> {
        client.fetch_page(&ticket.request).await
    }

    /// Load the current page inline; returns false when nothing was loaded
    pub async fn load_now(&mut self, client: &TmdbClient) -> bool {
        let Some(ticket) = self.load_movies() else {
            return false;
        };
        let result = Self::fetch(client, &ticket).await;
        let ok = result.is_ok();
        self.apply_page(ticket, result) && ok
    }
}
