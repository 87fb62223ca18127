//! TMDB (The Movie Database) API client
//!
//! Builds discover/search/detail/genre requests and normalizes the raw
//! responses into the frontend models.
//! API docs: https://developer.themoviedb.org/docs

use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    year_from_date, CastMember, Credits, Filters, Genre, Movie, MovieDetails, MoviePage, SortKey,
    UNKNOWN_DIRECTOR,
};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_LANGUAGE: &str = "en-US";

const POSTER_SIZE: &str = "w500";
const BACKDROP_SIZE: &str = "w780";

/// ISO 639-1 codes the detail view shows by name
const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh", "Chinese"),
    ("hi", "Hindi"),
    ("ar", "Arabic"),
    ("tr", "Turkish"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("vi", "Vietnamese"),
    ("th", "Thai"),
    ("sv", "Swedish"),
    ("da", "Danish"),
    ("fi", "Finnish"),
];

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Invalid API key (401)")]
    Unauthorized,

    #[error("Resource not found (404)")]
    NotFound,

    #[error("Rate limited (429)")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// Parameters for one page of a discover or search listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub genres: Vec<u64>,
    pub year: Option<u16>,
    pub query: Option<String>,
    pub sort_by: Option<SortKey>,
}

impl PageRequest {
    pub fn new(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Build a request for `page` from the active filters
    pub fn from_filters(page: u32, filters: &Filters) -> Self {
        Self {
            page,
            genres: filters.selected_genres.iter().copied().collect(),
            year: filters.release_year,
            query: filters.active_query().map(str::to_string),
            sort_by: filters.sort_by,
        }
    }

    pub fn genres(mut self, genres: impl IntoIterator<Item = u64>) -> Self {
        self.genres = genres.into_iter().collect();
        self
    }

    pub fn year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn sort_by(mut self, sort_by: SortKey) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    /// Non-blank query text, which switches the request to the search endpoint
    pub fn search_query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// TMDB API client
///
/// Every call is a single attempt: failures surface to the caller
/// without retry or backoff.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    image_base_url: String,
    language: String,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Override the response language (default en-US)
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Override the image CDN base URL
    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = image_base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// Full URL for a listing page
    ///
    /// Parameter order: api_key, page, language, sort_by, then either the
    /// query (search) or the optional with_genres and primary_release_year
    /// (discover). Genre and year filters do not apply to title search.
    pub fn page_url(&self, request: &PageRequest) -> String {
        let search = request.search_query();
        let endpoint = if search.is_some() {
            "/search/movie"
        } else {
            "/discover/movie"
        };

        let sort_by = request.sort_by.unwrap_or_default();
        let mut url = format!(
            "{}{}?api_key={}&page={}&language={}&sort_by={}",
            self.base_url,
            endpoint,
            urlencoding::encode(&self.api_key),
            request.page,
            urlencoding::encode(&self.language),
            sort_by.as_str(),
        );

        match search {
            Some(query) => url.push_str(&format!("&query={}", urlencoding::encode(query))),
            None => {
                if !request.genres.is_empty() {
                    let ids: Vec<String> =
                        request.genres.iter().map(|id| id.to_string()).collect();
                    url.push_str(&format!("&with_genres={}", ids.join(",")));
                }
                if let Some(year) = request.year {
                    url.push_str(&format!("&primary_release_year={}", year));
                }
            }
        }

        url
    }

    /// Full URL for the movie details resource with credits embedded
    pub fn details_url(&self, id: u64) -> String {
        format!(
            "{}/movie/{}?api_key={}&language={}&append_to_response=credits",
            self.base_url,
            id,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.language),
        )
    }

    /// Full URL for the movie genre list
    pub fn genres_url(&self) -> String {
        format!(
            "{}/genre/movie/list?api_key={}&language={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.language),
        )
    }

    /// Make a single GET request and decode the JSON body
    async fn get<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        tracing::debug!(endpoint = %redact(url), "tmdb request");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(TmdbError::from)?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await.map_err(TmdbError::from)?;
                let parsed: T = serde_json::from_str(&body).map_err(|e| {
                    TmdbError::InvalidResponse(format!("JSON parse error: {}", e))
                })?;
                Ok(parsed)
            }
            StatusCode::UNAUTHORIZED => Err(TmdbError::Unauthorized.into()),
            StatusCode::NOT_FOUND => Err(TmdbError::NotFound.into()),
            StatusCode::TOO_MANY_REQUESTS => Err(TmdbError::RateLimited.into()),
            status => {
                tracing::warn!(status = status.as_u16(), "tmdb request failed");
                Err(TmdbError::ServerError(status.as_u16()).into())
            }
        }
    }

    /// Fetch one page of movies
    ///
    /// Uses the search endpoint when the request carries a non-blank query,
    /// otherwise discover with the optional genre/year/sort parameters.
    pub async fn fetch_page(&self, request: &PageRequest) -> Result<MoviePage> {
        let response: ListResponse = self.get(&self.page_url(request)).await?;
        Ok(response.into_page(&self.image_base_url))
    }

    /// Fetch full details for a movie, including credits
    pub async fn fetch_details(&self, id: u64) -> Result<MovieDetails> {
        let response: DetailsResponse = self.get(&self.details_url(id)).await?;
        Ok(response.into_details(&self.image_base_url))
    }

    /// Fetch the movie genre list
    pub async fn fetch_genres(&self) -> Result<Vec<Genre>> {
        let response: GenresResponse = self.get(&self.genres_url()).await?;
        Ok(response.genres.into_iter().map(GenreRaw::into_genre).collect())
    }
}

/// Resolve a language code through the name table, else uppercase it
pub fn language_name(code: &str) -> String {
    LANGUAGE_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.to_uppercase())
}

/// Join base, size token and path; an absent or empty path yields ""
pub fn image_url(image_base_url: &str, size: &str, path: Option<&str>) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{}/{}{}", image_base_url, size, p),
        _ => String::new(),
    }
}

/// Hide the API key when logging URLs
fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListResponse {
    results: Vec<MovieRaw>,
    #[serde(default)]
    total_pages: u32,
}

impl ListResponse {
    fn into_page(self, image_base_url: &str) -> MoviePage {
        MoviePage {
            results: self
                .results
                .into_iter()
                .map(|r| r.into_movie(image_base_url))
                .collect(),
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MovieRaw {
    id: u64,
    #[serde(default)]
    title: String,
    overview: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f32>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
}

impl MovieRaw {
    fn into_movie(self, image_base_url: &str) -> Movie {
        Movie {
            id: self.id,
            title: self.title,
            overview: self.overview.unwrap_or_default(),
            year: year_from_date(self.release_date.as_deref()),
            // Listing DTOs only carry genre ids; names arrive with details
            genres: Vec::new(),
            rating: self.vote_average.unwrap_or(0.0),
            poster_url: image_url(image_base_url, POSTER_SIZE, self.poster_path.as_deref()),
            backdrop_url: image_url(
                image_base_url,
                BACKDROP_SIZE,
                self.backdrop_path.as_deref(),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(flatten)]
    base: MovieRaw,
    runtime: Option<u32>,
    tagline: Option<String>,
    #[serde(default)]
    production_companies: Vec<CompanyRaw>,
    budget: Option<u64>,
    revenue: Option<u64>,
    original_language: Option<String>,
    status: Option<String>,
    #[serde(default)]
    genres: Vec<GenreRaw>,
    #[serde(default)]
    credits: CreditsRaw,
}

impl DetailsResponse {
    fn into_details(self, image_base_url: &str) -> MovieDetails {
        let release_date = self.base.release_date.clone().unwrap_or_default();
        let mut movie = self.base.into_movie(image_base_url);
        movie.genres = self.genres.into_iter().map(GenreRaw::into_genre).collect();

        MovieDetails {
            movie,
            runtime: self.runtime.unwrap_or(0),
            tagline: self.tagline.unwrap_or_default(),
            language: language_name(self.original_language.as_deref().unwrap_or_default()),
            release_date,
            status: self.status.unwrap_or_default(),
            budget: self.budget.unwrap_or(0),
            revenue: self.revenue.unwrap_or(0),
            production_companies: self
                .production_companies
                .into_iter()
                .map(|c| c.name)
                .collect(),
            credits: self.credits.into_credits(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompanyRaw {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenresResponse {
    genres: Vec<GenreRaw>,
}

#[derive(Debug, Deserialize)]
struct GenreRaw {
    id: u64,
    name: String,
}

impl GenreRaw {
    fn into_genre(self) -> Genre {
        Genre {
            id: self.id,
            name: self.name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CreditsRaw {
    #[serde(default)]
    cast: Vec<CastRaw>,
    #[serde(default)]
    crew: Vec<CrewRaw>,
}

impl CreditsRaw {
    fn into_credits(self) -> Credits {
        let director = self
            .crew
            .into_iter()
            .find(|c| c.job == "Director")
            .map(|c| c.name)
            .unwrap_or_else(|| UNKNOWN_DIRECTOR.to_string());

        let mut cast: Vec<CastMember> = self.cast.into_iter().map(CastRaw::into_member).collect();
        // Stable sort keeps TMDB's order for equal billing positions
        cast.sort_by_key(|c| c.order);

        Credits { cast, director }
    }
}

#[derive(Debug, Deserialize)]
struct CastRaw {
    id: u64,
    name: String,
    #[serde(default)]
    character: Option<String>,
    profile_path: Option<String>,
    #[serde(default)]
    order: u32,
}

impl CastRaw {
    fn into_member(self) -> CastMember {
        CastMember {
            id: self.id,
            name: self.name,
            character: self.character.unwrap_or_default(),
            profile_path: self.profile_path,
            order: self.order,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CrewRaw {
    name: String,
    #[serde(default)]
    job: String,
}
