//! Wire types of the OMDb API.
//!
//! OMDb answers `200 OK` even when nothing matched; the `Response` field
//! carries "True" or "False" and every other field may be missing.

use serde::Deserialize;

use crate::errors::ApiError;
use crate::state::data::{parse_rating, parse_runtime_minutes, MovieDetail, SearchPage, SearchResultItem};

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Search", default)]
    pub search: Vec<SearchEntry>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchEntry {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Released", default)]
    pub released: String,
    #[serde(rename = "Actors", default)]
    pub actors: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
}

fn is_true(response: &str) -> bool {
    response.eq_ignore_ascii_case("true")
}

impl From<SearchResponse> for SearchPage {
    fn from(response: SearchResponse) -> Self {
        if !is_true(&response.response) {
            return SearchPage::default();
        }

        let items: Vec<SearchResultItem> = response
            .search
            .into_iter()
            .map(|entry| SearchResultItem {
                id: entry.imdb_id,
                title: entry.title,
                year: entry.year,
                poster_url: entry.poster,
            })
            .collect();

        SearchPage {
            found: !items.is_empty(),
            items,
        }
    }
}

impl TryFrom<DetailResponse> for MovieDetail {
    type Error = ApiError;

    fn try_from(response: DetailResponse) -> Result<Self, Self::Error> {
        if !is_true(&response.response) {
            return Err(ApiError::NotFound);
        }

        Ok(MovieDetail {
            runtime_minutes: parse_runtime_minutes(&response.runtime),
            rating: parse_rating(&response.imdb_rating),
            id: response.imdb_id,
            title: response.title,
            year: response.year,
            poster_url: response.poster,
            runtime_text: response.runtime,
            plot: response.plot,
            released: response.released,
            actors: response.actors,
            director: response.director,
            genre: response.genre,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_hit() {
        let body = r#"{
            "Search": [
                {"Title": "Inception", "Year": "2010", "imdbID": "tt1375666",
                 "Type": "movie", "Poster": "https://m.media-amazon.com/images/M/inception.jpg"}
            ],
            "totalResults": "1",
            "Response": "True"
        }"#;

        let response: SearchResponse = serde_json::from_str(body).unwrap();
        let page = SearchPage::from(response);

        assert!(page.found);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "tt1375666");
        assert_eq!(page.items[0].title, "Inception");
        assert_eq!(page.items[0].year, "2010");
    }

    #[test]
    fn test_search_miss() {
        let body = r#"{"Response": "False", "Error": "Movie not found!"}"#;

        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.error.as_deref(), Some("Movie not found!"));

        let page = SearchPage::from(response);
        assert!(!page.found);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_detail_conversion() {
        let body = r#"{
            "Title": "Inception", "Year": "2010", "Rated": "PG-13",
            "Released": "16 Jul 2010", "Runtime": "148 min",
            "Genre": "Action, Adventure, Sci-Fi", "Director": "Christopher Nolan",
            "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt, Elliot Page",
            "Plot": "A thief who steals corporate secrets.",
            "Poster": "https://m.media-amazon.com/images/M/inception.jpg",
            "imdbRating": "8.8", "imdbID": "tt1375666", "Type": "movie",
            "Response": "True"
        }"#;

        let response: DetailResponse = serde_json::from_str(body).unwrap();
        let detail = MovieDetail::try_from(response).unwrap();

        assert_eq!(detail.id, "tt1375666");
        assert_eq!(detail.title, "Inception");
        assert_eq!(detail.runtime_text, "148 min");
        assert_eq!(detail.runtime_minutes, 148);
        assert_eq!(detail.rating, 8.8);
        assert_eq!(detail.director, "Christopher Nolan");
    }

    #[test]
    fn test_detail_unknown_id() {
        let body = r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#;

        let response: DetailResponse = serde_json::from_str(body).unwrap();
        assert_eq!(MovieDetail::try_from(response), Err(ApiError::NotFound));
    }
}
