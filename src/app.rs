use crate::config::AppConfig;
use crate::directors;
use crate::error::{AppError, AppResult};
use crate::models::{DirectorInfo, MovieDetail, SavedPoster, SearchResults};
use crate::movie;
use crate::search;
use crate::tmdb::{TmdbApi, TmdbClient};
use crate::watchlist::{self, AddPosterRequest};
use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DirectorParams {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    #[serde(alias = "posterId")]
    poster_id: Option<String>,
}

pub async fn run_server(config: AppConfig) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&config)?);
    let app = build_router(AppState { tmdb });

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_posters))
        .route("/health", get(health))
        .route("/movie/:id", get(get_movie))
        .route("/search", get(search))
        .route("/search_director", get(search_director))
        .route("/add-movie", post(add_movie))
        .route("/delete-poster", post(delete_poster))
        .route("/clear-posters", post(clear_posters))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

fn load_watchlist(jar: &CookieJar) -> Vec<SavedPoster> {
    watchlist::decode(jar.get(watchlist::COOKIE_NAME).map(|c| c.value()))
}

/// Writes the next list back to the client; an empty list expires the cookie.
fn persist_watchlist(jar: CookieJar, list: &[SavedPoster]) -> CookieJar {
    if list.is_empty() {
        return jar.remove(Cookie::build(watchlist::COOKIE_NAME).path("/"));
    }
    let cookie = Cookie::build((watchlist::COOKIE_NAME, watchlist::encode(list)))
        .path("/")
        .max_age(time::Duration::days(watchlist::COOKIE_MAX_AGE_DAYS))
        .build();
    let wire_len = cookie.encoded().stripped().to_string().len();
    watchlist::check_wire_size(wire_len, list.len());
    jar.add(cookie)
}

async fn list_posters(jar: CookieJar) -> Json<Vec<SavedPoster>> {
    Json(load_watchlist(&jar))
}

async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MovieDetail>> {
    let detail = movie::movie_detail(state.tmdb.as_ref(), id).await?;
    debug!(movie_id = id, title = %detail.title, "Formatted movie detail");
    Ok(Json(detail))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResults>> {
    let query = params
        .query
        .ok_or_else(|| AppError::bad_request("No search query provided"))?;
    let results = search::combined_search(state.tmdb.as_ref(), &query).await?;
    Ok(Json(results))
}

async fn search_director(
    State(state): State<AppState>,
    Query(params): Query<DirectorParams>,
) -> AppResult<Json<DirectorInfo>> {
    let name = params
        .name
        .ok_or_else(|| AppError::bad_request("No director name provided"))?;
    let info = directors::resolve_by_query(state.tmdb.as_ref(), &name).await?;
    info!(
        "Director '{}' -> {} ({} movies)",
        name,
        info.name,
        info.movies.len()
    );
    Ok(Json(info))
}

async fn add_movie(jar: CookieJar, body: Bytes) -> AppResult<(CookieJar, Json<Value>)> {
    let payload: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::bad_request(format!("Invalid movie data: {e}")))?
    };
    if is_blank(&payload) {
        return Err(AppError::bad_request("No movie data provided"));
    }

    let request: AddPosterRequest = serde_json::from_value(payload)
        .map_err(|e| AppError::internal(format!("Invalid movie data: {e}")))?;
    let (list, movie) = watchlist::add(load_watchlist(&jar), request.into_saved());
    info!("Watchlist now holds {} posters", list.len());

    let jar = persist_watchlist(jar, &list);
    Ok((
        jar,
        Json(json!({ "message": "Movie added successfully", "movie": movie })),
    ))
}

/// Bodies that carry no movie at all: null, false, zero and empty values.
fn is_blank(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

async fn delete_poster(
    jar: CookieJar,
    form: Option<Form<RemoveForm>>,
) -> AppResult<(CookieJar, Json<Value>)> {
    let poster_id = form
        .and_then(|Form(f)| f.poster_id)
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::bad_request("Poster ID is required"))?;

    let list = watchlist::remove(load_watchlist(&jar), &poster_id);
    let jar = persist_watchlist(jar, &list);
    Ok((jar, Json(json!({ "message": "Poster deleted" }))))
}

async fn clear_posters(jar: CookieJar) -> (CookieJar, Json<Value>) {
    (
        persist_watchlist(jar, &watchlist::clear()),
        Json(json!({ "message": "Posters cleared" })),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
