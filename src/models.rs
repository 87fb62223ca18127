//! Data structures and types for cinegrid
//!
//! Frontend-friendly records produced by the catalog client and held by the
//! state store:
//! - **Catalog**: movies, genres, paged listings
//! - **Details**: full movie information with credits
//! - **Filters**: the user's browse/search preferences

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Fallback shown when a release date has no usable year
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Director name used when the crew has no "Director" entry
pub const UNKNOWN_DIRECTOR: &str = "Unknown";

// =============================================================================
// Catalog Models
// =============================================================================

/// Movie genre as returned by TMDB
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Movie summary shown in grids and lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    /// Four-digit year, or "Unknown"
    pub year: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub rating: f32,
    /// Full poster URL, empty when TMDB has no poster
    #[serde(default)]
    pub poster_url: String,
    /// Full backdrop URL, empty when TMDB has no backdrop
    #[serde(default)]
    pub backdrop_url: String,
}

impl Movie {
    pub fn has_poster(&self) -> bool {
        !self.poster_url.is_empty()
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) ★ {:.1}", self.title, self.year, self.rating)
    }
}

/// One page of a discover or search listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub results: Vec<Movie>,
    pub total_pages: u32,
}

// =============================================================================
// Detail Models
// =============================================================================

/// Billed cast member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
    pub order: u32,
}

impl CastMember {
    /// Profile image URL (w185), or None when there is no photo to show
    pub fn profile_url(&self, image_base_url: &str) -> Option<String> {
        self.profile_path
            .as_deref()
            .map(|path| format!("{}/w185{}", image_base_url, path))
    }
}

impl fmt::Display for CastMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.character.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} as {}", self.name, self.character)
        }
    }
}

/// Cast (billing order ascending) and resolved director
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    pub cast: Vec<CastMember>,
    pub director: String,
}

impl Default for Credits {
    fn default() -> Self {
        Self {
            cast: Vec::new(),
            director: UNKNOWN_DIRECTOR.to_string(),
        }
    }
}

/// Full movie information from the details endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    pub runtime: u32,
    pub tagline: String,
    /// Language name, or the uppercased ISO code when not in the table
    pub language: String,
    pub release_date: String,
    pub status: String,
    pub budget: u64,
    pub revenue: u64,
    pub production_companies: Vec<String>,
    pub credits: Credits,
}

impl MovieDetails {
    /// Project down to the summary record (used for recently viewed)
    pub fn as_movie(&self) -> Movie {
        self.movie.clone()
    }

    pub fn id(&self) -> u64 {
        self.movie.id
    }

    pub fn title(&self) -> &str {
        &self.movie.title
    }

    /// "2h 5m", "45m", or None when TMDB reports no runtime
    pub fn runtime_str(&self) -> Option<String> {
        if self.runtime == 0 {
            return None;
        }
        let hours = self.runtime / 60;
        let mins = self.runtime % 60;
        if hours > 0 {
            Some(format!("{}h {}m", hours, mins))
        } else {
            Some(format!("{}m", mins))
        }
    }

    pub fn genres_str(&self) -> String {
        self.movie
            .genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for MovieDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.movie)?;
        if let Some(runtime) = self.runtime_str() {
            write!(f, " - {}", runtime)?;
        }
        write!(f, " - dir. {}", self.credits.director)
    }
}

/// Format a dollar amount for display ("$1.2M", "$850K", "—" for zero)
pub fn format_money(amount: u64) -> String {
    const BILLION: f64 = 1_000_000_000.0;
    const MILLION: f64 = 1_000_000.0;
    const THOUSAND: f64 = 1_000.0;

    let value = amount as f64;
    if amount == 0 {
        "—".to_string()
    } else if value >= BILLION {
        format!("${:.1}B", value / BILLION)
    } else if value >= MILLION {
        format!("${:.1}M", value / MILLION)
    } else if value >= THOUSAND {
        format!("${:.0}K", value / THOUSAND)
    } else {
        format!("${}", amount)
    }
}

// =============================================================================
// Filter Models
// =============================================================================

/// Listing order understood by the discover endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "popularity.desc")]
    PopularityDesc,
    #[serde(rename = "popularity.asc")]
    PopularityAsc,
    #[serde(rename = "vote_average.desc")]
    RatingDesc,
    #[serde(rename = "vote_average.asc")]
    RatingAsc,
    #[serde(rename = "primary_release_date.desc")]
    ReleaseDateDesc,
    #[serde(rename = "primary_release_date.asc")]
    ReleaseDateAsc,
    #[serde(rename = "revenue.desc")]
    RevenueDesc,
    #[serde(rename = "title.asc")]
    TitleAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::PopularityDesc,
        SortKey::PopularityAsc,
        SortKey::RatingDesc,
        SortKey::RatingAsc,
        SortKey::ReleaseDateDesc,
        SortKey::ReleaseDateAsc,
        SortKey::RevenueDesc,
        SortKey::TitleAsc,
    ];

    /// Wire value for the `sort_by` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::PopularityDesc => "popularity.desc",
            SortKey::PopularityAsc => "popularity.asc",
            SortKey::RatingDesc => "vote_average.desc",
            SortKey::RatingAsc => "vote_average.asc",
            SortKey::ReleaseDateDesc => "primary_release_date.desc",
            SortKey::ReleaseDateAsc => "primary_release_date.asc",
            SortKey::RevenueDesc => "revenue.desc",
            SortKey::TitleAsc => "title.asc",
        }
    }

    /// Human label for the filter panel
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::PopularityDesc => "Most popular",
            SortKey::PopularityAsc => "Least popular",
            SortKey::RatingDesc => "Highest rated",
            SortKey::RatingAsc => "Lowest rated",
            SortKey::ReleaseDateDesc => "Newest",
            SortKey::ReleaseDateAsc => "Oldest",
            SortKey::RevenueDesc => "Top grossing",
            SortKey::TitleAsc => "Title A-Z",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown sort key: {}", s))
    }
}

/// Active browse filters
///
/// `selected_genres` is always present; a stored object without it
/// deserializes to an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(rename = "selectedGenres", default)]
    pub selected_genres: BTreeSet<u64>,
    #[serde(
        rename = "primary_release_year",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub release_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortKey>,
}

impl Filters {
    /// Query text if it is non-blank
    pub fn active_query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.active_query().is_none()
            && self.selected_genres.is_empty()
            && self.release_year.is_none()
            && self.sort_by.is_none()
    }

    pub fn toggle_genre(&mut self, id: u64) {
        if !self.selected_genres.remove(&id) {
            self.selected_genres.insert(id);
        }
    }
}

/// Extract the year from a date like "2024-01-01"
///
/// Empty or unparseable dates yield "Unknown".
pub fn year_from_date(date: Option<&str>) -> String {
    date.and_then(|d| d.get(..4))
        .filter(|y| y.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
}
