//! Controller flow tests
//!
//! Paging, filter changes, detail loading and persistence, driven the way
//! the TUI drives them: ticket, fetch against a mock server, apply.

use cinegrid::api::TmdbClient;
use cinegrid::controller::{DetailController, ListController, ScrollMetrics};
use cinegrid::models::{Filters, SortKey};
use cinegrid::storage::{FileStorage, MemoryStorage};
use cinegrid::store::MoviesStore;
use mockito::{Matcher, Mock, Server, ServerGuard};
use tempfile::TempDir;

fn page_body(ids: &[u64], total_pages: u32) -> String {
    let results: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "title": format!("Movie {}", id),
                "release_date": "2020-01-01",
                "vote_average": 6.5,
                "poster_path": null
            })
        })
        .collect();
    serde_json::json!({ "page": 1, "results": results, "total_pages": total_pages }).to_string()
}

async fn mock_page(server: &mut ServerGuard, page: u32, ids: &[u64], total_pages: u32) -> Mock {
    server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::UrlEncoded("page".into(), page.to_string()))
        .with_status(200)
        .with_body(page_body(ids, total_pages))
        .create_async()
        .await
}

fn controller() -> ListController {
    ListController::new(MoviesStore::new(Box::new(MemoryStorage::new())))
}

/// Viewport sitting at the bottom of a grid with `rows` rows
fn at_bottom(rows: usize) -> ScrollMetrics {
    ScrollMetrics {
        offset: rows.saturating_sub(1),
        visible: 1,
        total: rows,
    }
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_infinite_scroll_loads_until_last_page() {
    let mut server = Server::new_async().await;
    let first = mock_page(&mut server, 1, &[1, 2, 3], 2).await;
    let second = mock_page(&mut server, 2, &[4, 5], 2).await;
    let client = TmdbClient::with_base_url("test_key", server.url());

    let mut list = controller();
    let ticket = list.init().expect("first page");
    let result = ListController::fetch(&client, &ticket).await;
    assert!(list.apply_page(ticket, result));

    assert_eq!(list.store().movies().len(), 3);
    assert_eq!(list.store().current_page(), 2);
    assert_eq!(list.store().total_pages(), 2);
    assert!(!list.store().loading());

    let ticket = list.on_scroll(at_bottom(1)).expect("second page");
    assert_eq!(ticket.request.page, 2);
    let result = ListController::fetch(&client, &ticket).await;
    list.apply_page(ticket, result);

    first.assert_async().await;
    second.assert_async().await;

    let ids: Vec<u64> = list.store().movies().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(list.store().current_page(), 3);

    // Past the last page nothing more is requested
    assert!(list.on_scroll(at_bottom(2)).is_none());
    assert!(!list.load_now(&client).await);
}

#[tokio::test]
async fn test_scroll_far_from_bottom_does_not_load() {
    let mut server = Server::new_async().await;
    mock_page(&mut server, 1, &[1, 2, 3], 5).await;
    let client = TmdbClient::with_base_url("test_key", server.url());

    let mut list = controller();
    assert!(list.load_now(&client).await);

    let metrics = ScrollMetrics {
        offset: 0,
        visible: 2,
        total: 10,
    };
    assert!(list.on_scroll(metrics).is_none());
}

#[tokio::test]
async fn test_filter_change_discards_in_flight_page() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::UrlEncoded("with_genres".into(), "27".into()))
        .with_status(200)
        .with_body(page_body(&[666], 1))
        .create_async()
        .await;
    server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::UrlEncoded("sort_by".into(), "popularity.desc".into()))
        .with_status(200)
        .with_body(page_body(&[1, 2], 3))
        .create_async()
        .await;
    let client = TmdbClient::with_base_url("test_key", server.url());

    let mut list = controller();
    let stale = list.init().expect("first page");

    let horror = Filters {
        selected_genres: [27].into_iter().collect(),
        sort_by: Some(SortKey::RatingDesc),
        ..Filters::default()
    };
    let fresh = list.on_filters_changed(horror.clone()).expect("reload");
    assert!(list.take_scroll_reset());
    assert!(!list.take_scroll_reset());

    let (fresh_result, stale_result) = futures::join!(
        ListController::fetch(&client, &fresh),
        ListController::fetch(&client, &stale)
    );
    // Fresh response applied first, the stale one afterwards
    assert!(list.apply_page(fresh, fresh_result));
    assert!(!list.apply_page(stale, stale_result));

    let ids: Vec<u64> = list.store().movies().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![666]);
    assert_eq!(list.store().filters(), &horror);
    assert_eq!(list.store().total_pages(), 1);
}

#[tokio::test]
async fn test_page_failure_sets_error_once() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let client = TmdbClient::with_base_url("test_key", server.url());

    let mut list = controller();
    assert!(!list.load_now(&client).await);

    mock.assert_async().await;
    assert_eq!(list.store().error(), Some("Failed to load movies"));
    assert!(!list.store().loading());
    assert!(!list.is_loading_more());
    assert!(list.store().movies().is_empty());
}

// =============================================================================
// Details
// =============================================================================

#[tokio::test]
async fn test_detail_load_records_recently_viewed() {
    let mut server = Server::new_async().await;
    for id in [11_u64, 12] {
        server
            .mock("GET", format!("/movie/{}", id).as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "id": id,
                    "title": format!("Movie {}", id),
                    "release_date": "2001-05-05",
                    "vote_average": 7.0
                })
                .to_string(),
            )
            .create_async()
            .await;
    }
    let client = TmdbClient::with_base_url("test_key", server.url());
    let mut store = MoviesStore::new(Box::new(MemoryStorage::new()));
    let mut detail = DetailController::new();

    assert!(detail.load_now(&client, &mut store, Some(11)).await);
    assert!(detail.load_now(&client, &mut store, Some(12)).await);
    assert!(detail.load_now(&client, &mut store, Some(11)).await);

    assert_eq!(store.selected_movie().map(|d| d.id()), Some(11));
    let recent: Vec<u64> = store.recently_viewed().iter().map(|m| m.id).collect();
    assert_eq!(recent, vec![11, 12]);
}

#[tokio::test]
async fn test_detail_missing_id_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let client = TmdbClient::with_base_url("test_key", server.url());
    let mut store = MoviesStore::new(Box::new(MemoryStorage::new()));

    assert!(!DetailController::new().load_now(&client, &mut store, None).await);

    mock.assert_async().await;
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_detail_failure_message() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/movie/5")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;
    let client = TmdbClient::with_base_url("test_key", server.url());
    let mut store = MoviesStore::new(Box::new(MemoryStorage::new()));

    assert!(!DetailController::new().load_now(&client, &mut store, Some(5)).await);
    assert_eq!(store.error(), Some("Failed to load movie details"));
    assert!(store.recently_viewed().is_empty());
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_filters_and_recent_survive_restart() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(page_body(&[1, 2], 1))
        .create_async()
        .await;
    let client = TmdbClient::with_base_url("test_key", server.url());
    let dir = TempDir::new().unwrap();

    let filters = Filters {
        release_year: Some(2020),
        ..Filters::default()
    };
    {
        let store = MoviesStore::new(Box::new(FileStorage::new(dir.path()).unwrap()));
        let mut list = ListController::new(store);
        let ticket = list.on_filters_changed(filters.clone()).expect("reload");
        let result = ListController::fetch(&client, &ticket).await;
        list.apply_page(ticket, result);

        let first = list.store().movies()[0].clone();
        list.store_mut().add_to_recently_viewed(first);
    }

    let restored = MoviesStore::new(Box::new(FileStorage::new(dir.path()).unwrap()));
    assert_eq!(restored.filters(), &filters);
    assert_eq!(restored.recently_viewed().len(), 1);
    assert_eq!(restored.recently_viewed()[0].id, 1);
    // Listing data is not durable
    assert!(restored.movies().is_empty());
    assert_eq!(restored.current_page(), 1);
}
