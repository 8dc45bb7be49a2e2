//! Search session controller.
//!
//! Owns the query text, the result list, the loading flag and the error
//! message. Every non-empty query change issues a new [`SearchRequest`]
//! and cancels the previous one; a completion is committed only while it
//! still belongs to the active request (last query wins).

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::data::{SearchPage, SearchResultItem};
use crate::errors::{ApiError, NOT_FOUND_MESSAGE};

/// A search the caller must run in the background
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub generation: u64,
    pub query: String,
    pub token: CancellationToken,
}

/// Completion of a [`SearchRequest`]
#[derive(Debug, Clone)]
pub struct SearchFinished {
    pub generation: u64,
    pub outcome: Result<SearchPage, ApiError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Loading,
    Success,
    Error,
}

/// What the result box shows. Exactly one of these at a time.
#[derive(Debug, PartialEq)]
pub enum ResultsView<'a> {
    Loading,
    Error(&'a str),
    Results(&'a [SearchResultItem]),
}

#[derive(Debug)]
struct ActiveSearch {
    generation: u64,
    token: CancellationToken,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    query: String,
    results: Vec<SearchResultItem>,
    error: Option<String>,
    loading: bool,
    active: Option<ActiveSearch>,
    generation: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResultItem] {
        &self.results
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> SearchPhase {
        if self.loading {
            SearchPhase::Loading
        } else if self.error.is_some() {
            SearchPhase::Error
        } else if self.query.is_empty() {
            SearchPhase::Idle
        } else {
            SearchPhase::Success
        }
    }

    pub fn view(&self) -> ResultsView<'_> {
        if self.loading {
            ResultsView::Loading
        } else if let Some(error) = &self.error {
            ResultsView::Error(error)
        } else {
            ResultsView::Results(&self.results)
        }
    }

    /// Apply a query change.
    ///
    /// Returns the request to run, or `None` for an empty query. The caller
    /// clears the current selection whenever a request is returned.
    pub fn set_query(&mut self, query: impl Into<String>) -> Option<SearchRequest> {
        self.query = query.into();
        self.cancel();
        self.error = None;

        if self.query.is_empty() {
            self.results.clear();
            return None;
        }

        self.generation += 1;
        let token = CancellationToken::new();
        self.active = Some(ActiveSearch {
            generation: self.generation,
            token: token.clone(),
        });
        self.loading = true;

        debug!(generation = self.generation, query = %self.query, "search started");

        Some(SearchRequest {
            generation: self.generation,
            query: self.query.clone(),
            token,
        })
    }

    /// Cancel the in-flight request, if any
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
            debug!(generation = active.generation, "search superseded");
        }
        self.loading = false;
    }

    /// Commit a completed search.
    ///
    /// Returns `false` when the completion is stale and was discarded.
    pub fn complete(&mut self, finished: SearchFinished) -> bool {
        let is_active = self.active.as_ref().is_some_and(|active| {
            active.generation == finished.generation && !active.token.is_cancelled()
        });

        if !is_active {
            debug!(generation = finished.generation, "stale search result discarded");
            return false;
        }

        self.active = None;
        self.loading = false;

        match finished.outcome {
            Ok(page) if page.found && !page.items.is_empty() => {
                self.results = page.items;
                self.error = None;
            }
            Ok(_) => {
                self.results.clear();
                self.error = Some(NOT_FOUND_MESSAGE.to_string());
            }
            Err(err) => {
                if let Some(message) = err.user_message() {
                    self.results.clear();
                    self.error = Some(message.to_string());
                }
            }
        }

        true
    }
}
