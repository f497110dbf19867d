use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tmdb::MovieResult;

pub const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub const BACKDROP_BASE: &str = "https://image.tmdb.org/t/p/original";

pub fn poster_url(path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{POSTER_BASE}{p}"))
}

pub fn backdrop_url(path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{BACKDROP_BASE}{p}"))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    pub poster_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl MovieSummary {
    /// Poster-less movies never leave the service, so they map to `None`.
    pub fn from_result(movie: &MovieResult) -> Option<Self> {
        let poster_url = poster_url(movie.poster_path.as_deref())?;
        Some(Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_url,
            vote_average: movie.vote_average,
            release_date: movie.release_date.clone().filter(|d| !d.is_empty()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastEntry {
    pub name: String,
    pub character: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetail {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub release_date: String,
    pub runtime: String,
    pub vote_average: f64,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub genres: Vec<String>,
    pub director: String,
    pub cast: Vec<CastEntry>,
    pub trailer_key: Option<String>,
    pub similar_movies: Vec<MovieSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonCandidate {
    pub id: i64,
    pub name: String,
    pub profile_path: Option<String>,
    pub known_for_department: Option<String>,
}

impl PersonCandidate {
    pub fn is_director(&self) -> bool {
        self.known_for_department.as_deref() == Some("Directing")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectorInfo {
    pub id: i64,
    pub name: String,
    pub profile_path: Option<String>,
    pub movies: Vec<MovieSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub movies: Vec<MovieSummary>,
    pub directors: Vec<DirectorInfo>,
}

/// Watchlist ids arrive as numbers from the UI and as strings from forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PosterId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PosterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PosterId::Number(n) => write!(f, "{n}"),
            PosterId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPoster {
    pub id: PosterId,
    pub title: String,
    pub poster_url: String,
}
