//! CLI Command Handlers
//!
//! Implements all CLI commands on top of the catalog client and the durable
//! store. Each handler takes CLI args, the loaded config and Output, and
//! returns an ExitCode.

use crate::api::{PageRequest, TmdbClient, TmdbError};
use crate::cli::{
    DiscoverCmd, ExitCode, FiltersCmd, GenresCmd, InfoCmd, Output, RecentCmd, SearchCmd,
};
use crate::config::Config;
use crate::controller::DetailController;
use crate::models::{format_money, Filters, Genre, Movie, MovieDetails};
use crate::store::MoviesStore;

// =============================================================================
// Shared Helpers
// =============================================================================

/// Map a client failure onto a semantic exit code
pub fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<TmdbError>() {
        Some(TmdbError::NotFound) => ExitCode::NotFound,
        Some(TmdbError::Unauthorized) => ExitCode::ConfigError,
        Some(TmdbError::RequestFailed(_))
        | Some(TmdbError::RateLimited)
        | Some(TmdbError::ServerError(_)) => ExitCode::NetworkError,
        Some(TmdbError::InvalidResponse(_)) | None => ExitCode::Error,
    }
}

fn client_or_exit(config: &Config, output: &Output) -> Result<TmdbClient, ExitCode> {
    config
        .client()
        .map_err(|e| output.error(e.to_string(), ExitCode::ConfigError))
}

fn open_store(config: &Config) -> anyhow::Result<MoviesStore> {
    Ok(MoviesStore::new(Box::new(config.storage()?)))
}

fn format_movies(movies: &[Movie]) -> String {
    if movies.is_empty() {
        return "No movies found".to_string();
    }
    movies
        .iter()
        .map(|m| format!("{:>8}  {}", m.id, m))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_details(details: &MovieDetails) -> String {
    let mut lines = vec![details.to_string()];
    if !details.tagline.is_empty() {
        lines.push(format!("\"{}\"", details.tagline));
    }
    lines.push(format!("Genres:   {}", details.genres_str()));
    lines.push(format!("Released: {} ({})", details.release_date, details.status));
    lines.push(format!("Language: {}", details.language));
    lines.push(format!(
        "Budget:   {}  Revenue: {}",
        format_money(details.budget),
        format_money(details.revenue)
    ));
    if !details.production_companies.is_empty() {
        lines.push(format!("Studios:  {}", details.production_companies.join(", ")));
    }
    if !details.movie.overview.is_empty() {
        lines.push(String::new());
        lines.push(details.movie.overview.clone());
    }
    if !details.credits.cast.is_empty() {
        lines.push(String::new());
        lines.push("Cast:".to_string());
        for member in details.credits.cast.iter().take(10) {
            lines.push(format!("  {}", member));
        }
    }
    lines.join("\n")
}

async fn list_page(
    client: &TmdbClient,
    request: PageRequest,
    limit: usize,
    output: &Output,
) -> ExitCode {
    match client.fetch_page(&request).await {
        Ok(mut page) => {
            page.results.truncate(limit);
            if let Err(e) = output.print(&page.results, |m| format_movies(m)) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            output.info(format!("Page {} of {}", request.page, page.total_pages));
            ExitCode::Success
        }
        Err(e) => output.error(format!("Failed to load movies: {}", e), exit_code_for(&e)),
    }
}

// =============================================================================
// Discover Command
// =============================================================================

pub async fn discover_cmd(cmd: DiscoverCmd, config: &Config, output: &Output) -> ExitCode {
    if cmd.page == 0 {
        return output.error("Page numbers start at 1", ExitCode::InvalidArgs);
    }
    let client = match client_or_exit(config, output) {
        Ok(client) => client,
        Err(code) => return code,
    };

    let filters = Filters {
        query: None,
        selected_genres: cmd.genres.into_iter().collect(),
        release_year: cmd.year,
        sort_by: cmd.sort,
    };
    list_page(
        &client,
        PageRequest::from_filters(cmd.page, &filters),
        cmd.limit,
        output,
    )
    .await
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, config: &Config, output: &Output) -> ExitCode {
    let query = cmd.query.trim();
    if query.is_empty() {
        return output.error("Search query is empty", ExitCode::InvalidArgs);
    }
    if cmd.page == 0 {
        return output.error("Page numbers start at 1", ExitCode::InvalidArgs);
    }
    let client = match client_or_exit(config, output) {
        Ok(client) => client,
        Err(code) => return code,
    };

    output.info(format!("Searching for: {}", query));
    list_page(
        &client,
        PageRequest::new(cmd.page).query(query),
        cmd.limit,
        output,
    )
    .await
}

// =============================================================================
// Info Command
// =============================================================================

/// Print details and record the movie as recently viewed
pub async fn info_cmd(cmd: InfoCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match client_or_exit(config, output) {
        Ok(client) => client,
        Err(code) => return code,
    };

    let mut detail = DetailController::new();
    let Some(ticket) = detail.open(Some(cmd.id)) else {
        return ExitCode::Error;
    };

    let details = match DetailController::fetch(&client, &ticket).await {
        Ok(details) => details,
        Err(e) => {
            return output.error(
                format!("Failed to load movie {}: {}", cmd.id, e),
                exit_code_for(&e),
            )
        }
    };

    match open_store(config) {
        Ok(mut store) => {
            detail.apply(&mut store, ticket, Ok(details.clone()));
        }
        Err(e) => tracing::warn!(error = %e, "recently viewed not recorded"),
    }

    if let Err(e) = output.print(&details, |d| format_details(d)) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Genres Command
// =============================================================================

pub async fn genres_cmd(_cmd: GenresCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match client_or_exit(config, output) {
        Ok(client) => client,
        Err(code) => return code,
    };

    match client.fetch_genres().await {
        Ok(genres) => {
            let human = |genres: &Vec<Genre>| {
                genres
                    .iter()
                    .map(|g| format!("{:>6}  {}", g.id, g.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            if let Err(e) = output.print(genres, human) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Failed to load genres: {}", e), exit_code_for(&e)),
    }
}

// =============================================================================
// Recent Command
// =============================================================================

pub async fn recent_cmd(cmd: RecentCmd, config: &Config, output: &Output) -> ExitCode {
    let store = match open_store(config) {
        Ok(store) => store,
        Err(e) => return output.error(format!("Failed to open storage: {}", e), ExitCode::Error),
    };

    let recent: Vec<Movie> = store
        .recently_viewed()
        .iter()
        .take(cmd.limit)
        .cloned()
        .collect();
    if let Err(e) = output.print(&recent, |m| format_movies(m)) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Filters Command
// =============================================================================

pub async fn filters_cmd(cmd: FiltersCmd, config: &Config, output: &Output) -> ExitCode {
    let mut store = match open_store(config) {
        Ok(store) => store,
        Err(e) => return output.error(format!("Failed to open storage: {}", e), ExitCode::Error),
    };

    if cmd.clear {
        store.clear_filters();
        output.info("Filters cleared");
    }

    let human = |filters: &Filters| {
        if filters.is_empty() {
            return "No filters set".to_string();
        }
        let genres = filters
            .selected_genres
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "query:  {}\ngenres: {}\nyear:   {}\nsort:   {}",
            filters.query.as_deref().unwrap_or("-"),
            if genres.is_empty() { "-".to_string() } else { genres },
            filters
                .release_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".into()),
            filters.sort_by.map(|s| s.as_str()).unwrap_or("-"),
        )
    };
    if let Err(e) = output.print(store.filters().clone(), human) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}
