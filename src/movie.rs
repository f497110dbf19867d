use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::{backdrop_url, poster_url, CastEntry, MovieDetail, MovieSummary};
use crate::tmdb::{MovieResult, TmdbApi};

const NOT_AVAILABLE: &str = "N/A";
const CAST_LIMIT: usize = 5;
const SIMILAR_LIMIT: usize = 4;
const TRAILER_SITE: &str = "YouTube";

#[derive(Debug, Deserialize)]
struct RawMovie {
    id: i64,
    title: String,
    overview: String,
    vote_average: f64,
    release_date: Option<String>,
    runtime: Option<u32>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    genres: Vec<Genre>,
    credits: Credits,
    videos: Paged<Video>,
    similar: Paged<MovieResult>,
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<CastMember>,
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct CastMember {
    name: String,
    #[serde(default)]
    character: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    name: String,
    job: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Paged<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Video {
    key: String,
    site: String,
    #[serde(rename = "type")]
    video_type: String,
}

/// Fetches a movie with its credits, videos and similar titles and formats it.
pub async fn movie_detail(tmdb: &dyn TmdbApi, id: i64) -> AppResult<MovieDetail> {
    let raw = tmdb.movie_details(id).await?;
    format_movie(raw)
}

/// Flattens an upstream movie record into the display shape.
///
/// Any missing required field fails the whole record.
pub fn format_movie(raw: Value) -> AppResult<MovieDetail> {
    let movie: RawMovie = serde_json::from_value(raw)
        .map_err(|e| AppError::malformed(format!("movie record: {e}")))?;

    let release_date = match movie.release_date.as_deref().filter(|d| !d.is_empty()) {
        Some(date) => long_date(date)?,
        None => NOT_AVAILABLE.to_string(),
    };
    let runtime = match movie.runtime {
        Some(minutes) if minutes > 0 => format!("{minutes} minutes"),
        _ => NOT_AVAILABLE.to_string(),
    };
    let director = movie
        .credits
        .crew
        .iter()
        .find(|c| c.job.as_deref() == Some("Director"))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let cast = movie
        .credits
        .cast
        .into_iter()
        .take(CAST_LIMIT)
        .map(|c| CastEntry {
            name: c.name,
            character: c.character.unwrap_or_default(),
        })
        .collect();
    let trailer_key = movie
        .videos
        .results
        .into_iter()
        .find(|v| v.video_type == "Trailer" && v.site == TRAILER_SITE)
        .map(|v| v.key);
    let similar_movies = movie
        .similar
        .results
        .iter()
        .filter_map(MovieSummary::from_result)
        .take(SIMILAR_LIMIT)
        .collect();

    Ok(MovieDetail {
        id: movie.id,
        title: movie.title,
        overview: movie.overview,
        release_date,
        runtime,
        vote_average: round_tenths(movie.vote_average),
        poster_url: poster_url(movie.poster_path.as_deref()),
        backdrop_url: backdrop_url(movie.backdrop_path.as_deref()),
        genres: movie.genres.into_iter().map(|g| g.name).collect(),
        director,
        cast,
        trailer_key,
        similar_movies,
    })
}

fn long_date(date: &str) -> AppResult<String> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| AppError::malformed(format!("release_date '{date}': {e}")))?;
    Ok(parsed.format("%B %d, %Y").to_string())
}

/// Rounds on the exact decimal value with ties to even, so 8.25 becomes 8.2.
fn round_tenths(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}
