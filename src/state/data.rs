/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the movie database client, the controllers and the UI layer.

/// One row of a search result list
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultItem {
    /// External identifier (e.g., "tt1375666")
    pub id: String,
    pub title: String,
    pub year: String,
    /// Poster URL, or "N/A" when the database has none
    pub poster_url: String,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPage {
    /// False when the database reported no match
    pub found: bool,
    pub items: Vec<SearchResultItem>,
}

/// Full record of a selected movie
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    /// Runtime as the database spells it (e.g., "148 min")
    pub runtime_text: String,
    /// Leading integer of `runtime_text`, 0 when there is none
    pub runtime_minutes: u32,
    /// External (IMDb) rating, 0.0 when unrated
    pub rating: f32,
    pub plot: String,
    pub released: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}

/// Parse the leading integer token of a runtime string.
///
/// "148 min" -> 148, "N/A" -> 0, "" -> 0
pub fn parse_runtime_minutes(runtime: &str) -> u32 {
    runtime
        .split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .unwrap_or(0)
}

/// Parse an external rating, treating "N/A" and garbage as unrated
pub fn parse_rating(rating: &str) -> f32 {
    rating
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Whether a poster URL points at an actual image
pub fn has_poster(url: &str) -> bool {
    !url.is_empty() && url != "N/A"
}
