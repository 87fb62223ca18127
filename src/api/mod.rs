//! API clients for external services
//!
//! - TMDB: movie discovery, search, details and genres

pub mod tmdb;

pub use tmdb::{PageRequest, TmdbClient, TmdbError};
