use tracing::info;

use crate::directors::{resolve_top_candidates, DEFAULT_PERSON_LIMIT};
use crate::error::{AppError, AppResult};
use crate::models::{MovieSummary, SearchResults};
use crate::tmdb::TmdbApi;

/// Title matches considered before dropping poster-less results.
pub const MOVIE_RESULT_LIMIT: usize = 5;

/// Title search and director resolution for the same query, side by side.
///
/// Both branches run concurrently; if either fails the whole search fails.
pub async fn combined_search(tmdb: &dyn TmdbApi, query: &str) -> AppResult<SearchResults> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::bad_request("No search query provided"));
    }

    let (movies, directors) = tokio::try_join!(
        async {
            let results = tmdb.search_movies(query).await?;
            Ok::<_, AppError>(
                results
                    .iter()
                    .take(MOVIE_RESULT_LIMIT)
                    .filter_map(MovieSummary::from_result)
                    .collect::<Vec<_>>(),
            )
        },
        resolve_top_candidates(tmdb, query, DEFAULT_PERSON_LIMIT),
    )?;

    info!(
        "Search '{}' -> {} movies, {} directors",
        query,
        movies.len(),
        directors.len()
    );
    Ok(SearchResults { movies, directors })
}
