//! Detail loader.
//!
//! Tracks the selected movie, its detail record and the per-view widget
//! state (star rating, plot expansion). Independent from the search
//! session: a new search clears the selection through [`DetailLoader::close`].

use tracing::debug;

use super::data::MovieDetail;
use crate::errors::ApiError;

/// Window title while no detail is shown
pub const DEFAULT_TITLE: &str = "watchList";

/// Completion of a detail fetch
#[derive(Debug, Clone)]
pub struct DetailLoaded {
    pub id: String,
    pub outcome: Result<MovieDetail, ApiError>,
}

#[derive(Debug, Default)]
pub struct DetailLoader {
    selected: Option<String>,
    detail: Option<MovieDetail>,
    loading: bool,
    error: Option<String>,
    user_rating: u8,
    hover_rating: Option<u8>,
    plot_expanded: bool,
}

impl DetailLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn detail(&self) -> Option<&MovieDetail> {
        self.detail.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn user_rating(&self) -> u8 {
        self.user_rating
    }

    /// Rating the stars currently display: the hovered one, else the set one
    pub fn displayed_rating(&self) -> u8 {
        self.hover_rating.unwrap_or(self.user_rating)
    }

    pub fn is_plot_expanded(&self) -> bool {
        self.plot_expanded
    }

    /// Select a movie, or deselect it when it is already selected.
    ///
    /// Returns the id to fetch when a new selection was made.
    pub fn select(&mut self, id: &str) -> Option<String> {
        if self.selected.as_deref() == Some(id) {
            self.close();
            return None;
        }

        *self = Self {
            selected: Some(id.to_string()),
            loading: true,
            ..Self::default()
        };

        debug!(id, "detail requested");
        Some(id.to_string())
    }

    /// Drop the selection and everything loaded for it
    pub fn close(&mut self) {
        if let Some(id) = self.selected.take() {
            debug!(id = %id, "detail closed");
        }
        *self = Self::default();
    }

    /// Commit a finished fetch.
    ///
    /// Returns `false` when the movie is no longer selected.
    pub fn complete(&mut self, loaded: DetailLoaded) -> bool {
        if self.selected.as_deref() != Some(loaded.id.as_str()) {
            debug!(id = %loaded.id, "detail for deselected movie discarded");
            return false;
        }

        self.loading = false;
        match loaded.outcome {
            Ok(detail) => {
                self.detail = Some(detail);
                self.error = None;
            }
            Err(err) => {
                self.detail = None;
                self.error = err.user_message().map(str::to_string);
            }
        }

        true
    }

    pub fn set_rating(&mut self, rating: u8) {
        self.user_rating = rating;
    }

    pub fn hover_rating(&mut self, rating: Option<u8>) {
        self.hover_rating = rating;
    }

    pub fn toggle_plot(&mut self) {
        self.plot_expanded = !self.plot_expanded;
    }

    /// "Movie | {title}" while a titled detail is loaded
    pub fn page_title(&self) -> String {
        match &self.detail {
            Some(detail) if !detail.title.is_empty() => format!("Movie | {}", detail.title),
            _ => DEFAULT_TITLE.to_string(),
        }
    }
}
