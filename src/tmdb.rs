use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::AppConfig;

/// Minimum number of votes a movie needs to show up in a director's filmography.
pub const MIN_VOTE_COUNT: u32 = 100;
const DISCOVER_SORT: &str = "vote_average.desc";
const MOVIE_APPENDS: &str = "credits,videos,similar";
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} -> {status}: {body}")]
    Status {
        endpoint: String,
        status: StatusCode,
        body: String,
    },
    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The slice of the TMDB API this service depends on.
#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieResult>, TmdbError>;
    async fn search_people(&self, query: &str) -> Result<Vec<PersonResult>, TmdbError>;
    async fn person_details(&self, id: i64) -> Result<PersonDetails, TmdbError>;
    /// Movies crewed by `person_id`, best rated first, above the vote floor.
    async fn discover_by_crew(&self, person_id: i64) -> Result<Vec<MovieResult>, TmdbError>;
    /// Raw movie record with credits, videos and similar movies appended.
    async fn movie_details(&self, id: i64) -> Result<Value, TmdbError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieResult {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonResult {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonDetails {
    pub id: i64,
    #[serde(default)]
    pub known_for_department: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Paged<T> {
    results: Vec<T>,
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let user_agent = format!("marquee/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            base_url: config.tmdb_base_url.clone(),
            api_key: config.tmdb_api_key.clone(),
        })
    }

    /// GET `endpoint` with `params`; the API key is always attached.
    pub async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, TmdbError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let res = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|source| TmdbError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let status = res.status();
        let text = res.text().await.map_err(|source| TmdbError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        if !status.is_success() {
            return Err(TmdbError::Status {
                endpoint: endpoint.to_string(),
                status,
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }
        serde_json::from_str(&text).map_err(|source| TmdbError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieResult>, TmdbError> {
        let page: Paged<MovieResult> = self
            .get_json("/search/movie", &[("query", query.to_string())])
            .await?;
        Ok(page.results)
    }

    async fn search_people(&self, query: &str) -> Result<Vec<PersonResult>, TmdbError> {
        let page: Paged<PersonResult> = self
            .get_json("/search/person", &[("query", query.to_string())])
            .await?;
        Ok(page.results)
    }

    async fn person_details(&self, id: i64) -> Result<PersonDetails, TmdbError> {
        self.get_json(&format!("/person/{id}"), &[]).await
    }

    async fn discover_by_crew(&self, person_id: i64) -> Result<Vec<MovieResult>, TmdbError> {
        let page: Paged<MovieResult> = self
            .get_json(
                "/discover/movie",
                &[
                    ("with_crew", person_id.to_string()),
                    ("sort_by", DISCOVER_SORT.to_string()),
                    ("vote_count.gte", MIN_VOTE_COUNT.to_string()),
                ],
            )
            .await?;
        Ok(page.results)
    }

    async fn movie_details(&self, id: i64) -> Result<Value, TmdbError> {
        self.get_json(
            &format!("/movie/{id}"),
            &[("append_to_response", MOVIE_APPENDS.to_string())],
        )
        .await
    }
}
