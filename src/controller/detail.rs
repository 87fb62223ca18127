//! Movie detail loading

use anyhow::Result;

use super::LOAD_DETAILS_ERROR;
use crate::api::TmdbClient;
use crate::models::MovieDetails;
use crate::store::MoviesStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket {
    pub seq: u64,
    pub id: u64,
}

#[derive(Debug, Default)]
pub struct DetailController {
    seq: u64,
    pending: Option<DetailTicket>,
}

impl DetailController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading a movie; a missing id is skipped without error
    pub fn open(&mut self, id: Option<u64>) -> Option<DetailTicket> {
        let id = id?;
        self.seq += 1;
        let ticket = DetailTicket { seq: self.seq, id };
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Id of the movie currently being fetched
    pub fn pending(&self) -> Option<u64> {
        self.pending.map(|t| t.id)
    }

    pub async fn fetch(client: &TmdbClient, ticket: &DetailTicket) -> Result<MovieDetails> {
        client.fetch_details(ticket.id).await
    }

    /// Apply a response; only the most recently opened movie is kept
    pub fn apply(
        &mut self,
        store: &mut MoviesStore,
        ticket: DetailTicket,
        result: Result<MovieDetails>,
    ) -> bool {
        if self.pending != Some(ticket) {
            tracing::debug!(id = ticket.id, "dropping stale details");
            return false;
        }
        self.pending = None;

        match result {
            Ok(details) => store.set_selected_movie(Some(details)),
            Err(e) => {
                tracing::error!(id = ticket.id, error = %e, "details request failed");
                store.set_error(Some(LOAD_DETAILS_ERROR.to_string()));
            }
        }
        true
    }

    /// Open, fetch and apply inline
    pub async fn load_now(
        &mut self,
        client: &TmdbClient,
        store: &mut MoviesStore,
        id: Option<u64>,
    ) -> bool {
        let Some(ticket) = self.open(id) else {
            return false;
        };
        let result = Self::fetch(client, &ticket).await;
        let ok = result.is_ok();
        self.apply(store, ticket, result) && ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_missing_id_is_skipped() {
        let mut detail = DetailController::new();
        assert!(detail.open(None).is_none());
        assert!(detail.pending().is_none());
    }

    #[test]
    fn test_only_latest_open_applies() {
        let mut detail = DetailController::new();
        let mut store = MoviesStore::new(Box::new(MemoryStorage::new()));

        let first = detail.open(Some(1)).unwrap();
        let second = detail.open(Some(2)).unwrap();
        assert_eq!(detail.pending(), Some(2));

        assert!(!detail.apply(&mut store, first, Err(anyhow::anyhow!("late"))));
        assert!(store.error().is_none());

        assert!(detail.apply(&mut store, second, Err(anyhow::anyhow!("boom"))));
        assert_eq!(store.error(), Some(LOAD_DETAILS_ERROR));
        assert!(detail.pending().is_none());
    }
}
