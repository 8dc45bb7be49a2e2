use reqwest::{Client, Request};
use tracing::debug;

use super::model::{DetailResponse, SearchResponse};
use crate::config::ApiConfig;
use crate::errors::ApiError;
use crate::state::data::{MovieDetail, SearchPage};

/// HTTP client of the OMDb movie database.
///
/// Cheap to clone; every background task gets its own handle.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// `GET {base}?apikey=KEY&s=QUERY`
    pub fn search_request(&self, query: &str) -> Result<Request, ApiError> {
        self.http
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("s", query)])
            .build()
            .map_err(ApiError::from)
    }

    /// `GET {base}?apikey=KEY&i=ID`
    pub fn detail_request(&self, id: &str) -> Result<Request, ApiError> {
        self.http
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("i", id)])
            .build()
            .map_err(ApiError::from)
    }

    /// Search movies by title.
    ///
    /// A response reporting no match is returned as a page with
    /// `found == false`, not as an error.
    pub async fn search_movies(&self, query: &str) -> Result<SearchPage, ApiError> {
        let request = self.search_request(query)?;
        let response: SearchResponse = self.execute(request).await?;
        let page = SearchPage::from(response);

        debug!(query, results = page.items.len(), "search completed");
        Ok(page)
    }

    /// Fetch the full record of one movie
    pub async fn movie_detail(&self, id: &str) -> Result<MovieDetail, ApiError> {
        let request = self.detail_request(id)?;
        let response: DetailResponse = self.execute(request).await?;
        MovieDetail::try_from(response)
    }

    /// Fetch raw poster image bytes
    pub async fn poster(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn execute<T: serde::de::DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        let response = self.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response.json::<T>().await?)
    }
}
