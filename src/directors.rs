//! Director lookup: person search, department classification and filmography.
//!
//! A person counts as a director only when TMDB lists "Directing" as their
//! `known_for_department`. People who direct but are primarily known for
//! acting are therefore not picked up.

use futures::future::try_join_all;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{DirectorInfo, MovieSummary, PersonCandidate};
use crate::tmdb::{PersonResult, TmdbApi};

/// Filmography size for an explicit director lookup.
pub const DIRECTOR_MOVIE_LIMIT: usize = 8;
/// Filmography size for directors surfaced by the combined search.
pub const COMBINED_MOVIE_LIMIT: usize = 6;
/// Person results the combined search is allowed to classify.
pub const DEFAULT_PERSON_LIMIT: usize = 2;

async fn classify(tmdb: &dyn TmdbApi, person: &PersonResult) -> AppResult<PersonCandidate> {
    let details = tmdb.person_details(person.id).await?;
    Ok(PersonCandidate {
        id: person.id,
        name: person.name.clone(),
        profile_path: person.profile_path.clone(),
        known_for_department: details.known_for_department,
    })
}

/// Best rated movies for `director`, keeping only those with posters among
/// the first `limit` discovery results.
async fn filmography(
    tmdb: &dyn TmdbApi,
    director: PersonCandidate,
    limit: usize,
) -> AppResult<DirectorInfo> {
    let movies = tmdb
        .discover_by_crew(director.id)
        .await?
        .iter()
        .take(limit)
        .filter_map(MovieSummary::from_result)
        .collect::<Vec<_>>();
    debug!(
        director = %director.name,
        id = director.id,
        movies = movies.len(),
        "Resolved filmography"
    );
    Ok(DirectorInfo {
        id: director.id,
        name: director.name,
        profile_path: director.profile_path,
        movies,
    })
}

/// Finds the first search result for `name` that is classified as a director.
///
/// Candidates are checked one at a time in ranking order and the scan stops
/// at the first hit.
pub async fn resolve_by_query(tmdb: &dyn TmdbApi, name: &str) -> AppResult<DirectorInfo> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("No director name provided"));
    }

    let people = tmdb.search_people(name).await?;
    if people.is_empty() {
        return Err(AppError::not_found("Director not found"));
    }

    let mut director = None;
    for person in &people {
        let candidate = classify(tmdb, person).await?;
        if candidate.is_director() {
            director = Some(candidate);
            break;
        }
        debug!(
            person = %candidate.name,
            department = ?candidate.known_for_department,
            "Skipping non-director"
        );
    }
    let Some(director) = director else {
        return Err(AppError::not_found("No director found with that name"));
    };

    let info = filmography(tmdb, director, DIRECTOR_MOVIE_LIMIT).await?;
    if info.movies.is_empty() {
        return Err(AppError::not_found(format!(
            "No rated movies with posters found for {}",
            info.name
        )));
    }
    Ok(info)
}

/// Classifies only the first `person_limit` people matching `query` and
/// returns the directors among them that have at least one movie to show.
pub async fn resolve_top_candidates(
    tmdb: &dyn TmdbApi,
    query: &str,
    person_limit: usize,
) -> AppResult<Vec<DirectorInfo>> {
    let people = tmdb.search_people(query).await?;
    let candidates = try_join_all(
        people
            .iter()
            .take(person_limit)
            .map(|person| classify(tmdb, person)),
    )
    .await?;

    let resolved = try_join_all(
        candidates
            .into_iter()
            .filter(PersonCandidate::is_director)
            .map(|director| filmography(tmdb, director, COMBINED_MOVIE_LIMIT)),
    )
    .await?;

    Ok(resolved
        .into_iter()
        .filter(|info| !info.movies.is_empty())
        .collect())
}
