//! Saved posters live entirely in a client-held blob; these functions take
//! the current list and hand back the next one.

use serde::Deserialize;
use tracing::warn;

use crate::models::{poster_url, PosterId, SavedPoster};

/// Name of the client-held token carrying the watchlist.
pub const COOKIE_NAME: &str = "saved_posters";
pub const COOKIE_MAX_AGE_DAYS: i64 = 365;
/// Browsers start dropping cookies past this size.
pub const BLOB_SOFT_LIMIT: usize = 4096;

#[derive(Debug, Clone, Deserialize)]
pub struct AddPosterRequest {
    pub id: PosterId,
    pub title: String,
    #[serde(alias = "posterPath")]
    pub poster_path: String,
}

impl AddPosterRequest {
    pub fn into_saved(self) -> SavedPoster {
        let poster_url = poster_url(Some(self.poster_path.as_str())).unwrap_or_default();
        SavedPoster {
            id: self.id,
            title: self.title,
            poster_url,
        }
    }
}

/// Appends `item` unless an entry with the same id is already saved.
///
/// Returns the next list together with the attempted item.
pub fn add(mut list: Vec<SavedPoster>, item: SavedPoster) -> (Vec<SavedPoster>, SavedPoster) {
    let key = item.id.to_string();
    if !list.iter().any(|p| p.id.to_string() == key) {
        list.push(item.clone());
    }
    (list, item)
}

pub fn remove(list: Vec<SavedPoster>, id: &str) -> Vec<SavedPoster> {
    list.into_iter()
        .filter(|p| p.id.to_string() != id)
        .collect()
}

pub fn clear() -> Vec<SavedPoster> {
    Vec::new()
}

/// Reads a persisted blob; anything unreadable counts as an empty list.
///
/// The cookie jar has already undone its percent-encoding, so `blob` is JSON.
pub fn decode(blob: Option<&str>) -> Vec<SavedPoster> {
    let Some(blob) = blob.filter(|b| !b.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str(blob) {
        Ok(list) => list,
        Err(e) => {
            warn!("Discarding unreadable watchlist blob: {}", e);
            Vec::new()
        }
    }
}

/// Plain JSON; the cookie jar percent-encodes it on the way out.
pub fn encode(list: &[SavedPoster]) -> String {
    // Vec<SavedPoster> always serializes.
    serde_json::to_string(list).unwrap_or_else(|_| "[]".to_string())
}

/// Warns when the encoded value written to the client passes the soft limit.
pub fn check_wire_size(wire_len: usize, posters: usize) -> bool {
    let oversized = wire_len > BLOB_SOFT_LIMIT;
    if oversized {
        warn!(
            "Watchlist cookie is {} bytes ({} posters); clients may drop it",
            wire_len, posters
        );
    }
    oversized
}
