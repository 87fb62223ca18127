//! TMDB API client tests
//!
//! Tests listing, search, details, genres and error handling against a
//! mock server.

use cinegrid::api::{PageRequest, TmdbClient, TmdbError};
use cinegrid::models::SortKey;
use mockito::{Matcher, Server};

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

fn list_body() -> &'static str {
    r#"{
        "page": 1,
        "results": [
            {
                "id": 603,
                "title": "The Matrix",
                "release_date": "1999-03-30",
                "overview": "A hacker learns the truth about reality.",
                "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
                "backdrop_path": "/fNG7i7RqMErkcqhohV2a6cV1Ehy.jpg",
                "vote_average": 8.2,
                "genre_ids": [28, 878]
            },
            {
                "id": 604,
                "title": "The Matrix Reloaded",
                "release_date": "",
                "overview": null,
                "poster_path": null,
                "backdrop_path": null,
                "vote_average": 7.0
            }
        ],
        "total_results": 2,
        "total_pages": 7
    }"#
}

fn details_body() -> &'static str {
    r#"{
        "id": 949,
        "title": "Heat",
        "release_date": "1995-12-15",
        "overview": "Obsessive master thief Neil McCauley leads a top-notch crew.",
        "poster_path": "/umSVjVdbVwtx5ryCA2QXL44Durm.jpg",
        "backdrop_path": null,
        "vote_average": 7.9,
        "runtime": 170,
        "tagline": "A Los Angeles crime saga",
        "original_language": "en",
        "status": "Released",
        "budget": 60000000,
        "revenue": 187436818,
        "genres": [{"id": 80, "name": "Crime"}, {"id": 18, "name": "Drama"}],
        "production_companies": [{"id": 508, "name": "Regency Enterprises"}],
        "credits": {
            "cast": [
                {"id": 380, "name": "Robert De Niro", "character": "Neil McCauley", "profile_path": "/cT8htcckIuyI1Lqwt1CvD02ynTh.jpg", "order": 1},
                {"id": 1158, "name": "Al Pacino", "character": "Vincent Hanna", "profile_path": null, "order": 0}
            ],
            "crew": [
                {"id": 1, "name": "Art Linson", "job": "Producer"},
                {"id": 638, "name": "Michael Mann", "job": "Director"}
            ]
        }
    }"#
}

// =============================================================================
// Listing Tests
// =============================================================================

#[tokio::test]
async fn test_discover_parses_page() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api_key".into(), "test_key".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("language".into(), "en-US".into()),
            Matcher::UrlEncoded("sort_by".into(), "popularity.desc".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(list_body())
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let page = client.fetch_page(&PageRequest::new(1)).await.unwrap();

    mock.assert_async().await;

    assert_eq!(page.total_pages, 7);
    assert_eq!(page.results.len(), 2);

    let matrix = &page.results[0];
    assert_eq!(matrix.id, 603);
    assert_eq!(matrix.year, "1999");
    assert_eq!(
        matrix.poster_url,
        format!("{}/w500/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg", IMAGE_BASE)
    );
    assert_eq!(
        matrix.backdrop_url,
        format!("{}/w780/fNG7i7RqMErkcqhohV2a6cV1Ehy.jpg", IMAGE_BASE)
    );

    // Missing optional fields default rather than fail
    let reloaded = &page.results[1];
    assert_eq!(reloaded.year, "Unknown");
    assert_eq!(reloaded.poster_url, "");
    assert_eq!(reloaded.backdrop_url, "");
    assert_eq!(reloaded.overview, "");
    assert!(!reloaded.has_poster());
}

#[tokio::test]
async fn test_discover_sends_filters() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "3".into()),
            Matcher::UrlEncoded("sort_by".into(), "vote_average.desc".into()),
            Matcher::UrlEncoded("with_genres".into(), "28,878".into()),
            Matcher::UrlEncoded("primary_release_year".into(), "1999".into()),
        ]))
        .with_status(200)
        .with_body(list_body())
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let request = PageRequest::new(3)
        .genres([28, 878])
        .year(1999)
        .sort_by(SortKey::RatingDesc);
    client.fetch_page(&request).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_query_switches_to_search_endpoint() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "the matrix".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(list_body())
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let page = client
        .fetch_page(&PageRequest::new(1).query("  the matrix "))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.results[0].title, "The Matrix");
}

#[tokio::test]
async fn test_blank_query_uses_discover() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(list_body())
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    client
        .fetch_page(&PageRequest::new(1).query("   "))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[test]
fn test_page_url_parameter_order() {
    let client = TmdbClient::with_base_url("k", "http://localhost");
    let url = client.page_url(&PageRequest::new(2).genres([12, 16]).year(2001));
    assert_eq!(
        url,
        "http://localhost/discover/movie?api_key=k&page=2&language=en-US&sort_by=popularity.desc\
         &with_genres=12,16&primary_release_year=2001"
    );
}

#[test]
fn test_search_url_ignores_genre_and_year() {
    let client = TmdbClient::with_base_url("k", "http://localhost");
    let url = client.page_url(
        &PageRequest::new(2)
            .genres([12, 16])
            .year(2001)
            .query("shrek"),
    );
    assert_eq!(
        url,
        "http://localhost/search/movie?api_key=k&page=2&language=en-US&sort_by=popularity.desc\
         &query=shrek"
    );
}

// =============================================================================
// Details & Genres Tests
// =============================================================================

#[tokio::test]
async fn test_details_maps_credits() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/949")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api_key".into(), "test_key".into()),
            Matcher::UrlEncoded("append_to_response".into(), "credits".into()),
        ]))
        .with_status(200)
        .with_body(details_body())
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let details = client.fetch_details(949).await.unwrap();

    mock.assert_async().await;

    assert_eq!(details.title(), "Heat");
    assert_eq!(details.movie.year, "1995");
    assert_eq!(details.runtime, 170);
    assert_eq!(details.runtime_str().as_deref(), Some("2h 50m"));
    assert_eq!(details.tagline, "A Los Angeles crime saga");
    assert_eq!(details.language, "English");
    assert_eq!(details.release_date, "1995-12-15");
    assert_eq!(details.status, "Released");
    assert_eq!(details.budget, 60_000_000);
    assert_eq!(details.revenue, 187_436_818);
    assert_eq!(details.genres_str(), "Crime, Drama");
    assert_eq!(details.production_companies, vec!["Regency Enterprises"]);

    // Billing order, not response order
    assert_eq!(details.credits.director, "Michael Mann");
    assert_eq!(details.credits.cast[0].name, "Al Pacino");
    assert_eq!(details.credits.cast[1].name, "Robert De Niro");
    assert!(details.credits.cast[0].profile_url(IMAGE_BASE).is_none());
    assert_eq!(
        details.credits.cast[1].profile_url(IMAGE_BASE).as_deref(),
        Some("https://image.tmdb.org/t/p/w185/cT8htcckIuyI1Lqwt1CvD02ynTh.jpg")
    );
}

#[tokio::test]
async fn test_details_without_credits() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"id": 1, "title": "Obscure", "release_date": null,
                "original_language": "xx", "tagline": null}"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let details = client.fetch_details(1).await.unwrap();

    mock.assert_async().await;

    assert_eq!(details.credits.director, "Unknown");
    assert!(details.credits.cast.is_empty());
    assert_eq!(details.language, "XX");
    assert_eq!(details.movie.year, "Unknown");
    assert_eq!(details.tagline, "");
    assert!(details.runtime_str().is_none());
}

#[tokio::test]
async fn test_genres() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/genre/movie/list")
        .match_query(Matcher::UrlEncoded("api_key".into(), "test_key".into()))
        .with_status(200)
        .with_body(r#"{"genres": [{"id": 28, "name": "Action"}, {"id": 35, "name": "Comedy"}]}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let genres = client.fetch_genres().await.unwrap();

    mock.assert_async().await;
    assert_eq!(genres.len(), 2);
    assert_eq!(genres[1].name, "Comedy");
}

#[tokio::test]
async fn test_custom_language_and_image_base() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::UrlEncoded("language".into(), "fr-FR".into()))
        .with_status(200)
        .with_body(list_body())
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url())
        .with_language("fr-FR")
        .with_image_base_url("http://img.local");
    let page = client.fetch_page(&PageRequest::new(1)).await.unwrap();

    mock.assert_async().await;
    assert!(page.results[0].poster_url.starts_with("http://img.local/w500/"));
}

// =============================================================================
// Error Handling Tests
// =============================================================================

async fn error_for(status: usize, body: &str) -> anyhow::Error {
    let mut server = Server::new_async().await;

    // Exactly one request: no retry
    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::Any)
        .with_status(status)
        .with_body(body)
        .expect(1)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let err = client.fetch_page(&PageRequest::new(1)).await.unwrap_err();

    mock.assert_async().await;
    err
}

#[tokio::test]
async fn test_handles_unauthorized() {
    let err = error_for(401, r#"{"status_code": 7}"#).await;
    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_handles_rate_limit() {
    let err = error_for(429, "").await;
    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::RateLimited)
    ));
}

#[tokio::test]
async fn test_handles_server_error() {
    let err = error_for(503, "Service Unavailable").await;
    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::ServerError(503))
    ));
}

#[tokio::test]
async fn test_handles_invalid_json() {
    let err = error_for(200, "not json").await;
    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_handles_not_found() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/999999")
        .match_query(Matcher::Any)
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let err = client.fetch_details(999999).await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::NotFound)
    ));
}

#[tokio::test]
async fn test_handles_connection_failure() {
    // Nothing listens on port 9 locally
    let client = TmdbClient::with_base_url("test_key", "http://127.0.0.1:9");
    let err = client.fetch_genres().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::RequestFailed(_))
    ));
}
