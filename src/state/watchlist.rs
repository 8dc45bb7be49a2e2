/// The user's watched list
///
/// A sequence of rated movies keyed by external id. It is serialized to
/// JSON as a whole and written through the store after every change.

use serde::{Deserialize, Serialize};

use super::data::MovieDetail;
use crate::errors::{Error, Result};

/// Highest rating a user can give
pub const MAX_USER_RATING: u8 = 10;

/// A movie the user has watched and rated
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WatchedRecord {
    /// External identifier, unique within the list
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    /// IMDb rating at the time it was added
    pub external_rating: f32,
    /// 1..=10
    pub user_rating: u8,
    pub runtime_minutes: u32,
}

impl WatchedRecord {
    /// Build a record from a loaded detail and the user's rating
    pub fn from_detail(detail: &MovieDetail, user_rating: u8) -> Result<Self> {
        if !(1..=MAX_USER_RATING).contains(&user_rating) {
            return Err(Error::InvalidRating {
                rating: user_rating,
                max: MAX_USER_RATING,
            });
        }

        Ok(Self {
            id: detail.id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster_url: detail.poster_url.clone(),
            external_rating: detail.rating,
            user_rating,
            runtime_minutes: detail.runtime_minutes,
        })
    }
}

/// Aggregates shown above the watched list
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WatchStats {
    pub count: usize,
    pub avg_external_rating: f32,
    pub avg_user_rating: f32,
    pub avg_runtime: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct Watchlist {
    records: Vec<WatchedRecord>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[WatchedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|record| record.id == id)
    }

    /// Rating the user gave a watched movie
    pub fn user_rating_for(&self, id: &str) -> Option<u8> {
        self.records
            .iter()
            .find(|record| record.id == id)
            .map(|record| record.user_rating)
    }

    /// Append a record. Callers only offer this for ids not yet present.
    pub fn add(&mut self, record: WatchedRecord) {
        self.records.push(record);
    }

    /// Remove every record with this id; absent ids are ignored
    pub fn remove(&mut self, id: &str) {
        self.records.retain(|record| record.id != id);
    }

    pub fn stats(&self) -> WatchStats {
        WatchStats {
            count: self.records.len(),
            avg_external_rating: average(self.records.iter().map(|r| r.external_rating)),
            avg_user_rating: average(self.records.iter().map(|r| f32::from(r.user_rating))),
            avg_runtime: average(self.records.iter().map(|r| r.runtime_minutes as f32)),
        }
    }

    /// Convert to JSON string for storage
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string (from storage)
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Incremental mean; 0 for no values
fn average(values: impl ExactSizeIterator<Item = f32>) -> f32 {
    let len = values.len() as f32;
    values.fold(0.0, |acc, value| acc + value / len)
}
