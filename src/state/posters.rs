use std::collections::{HashMap, HashSet};

use iced::widget::image;

use super::data::has_poster;

#[derive(Debug, Clone)]
pub enum PosterState {
    Loading,
    Loaded(image::Handle),
    Failed,
}

/// Poster images keyed by URL.
///
/// A URL is fetched at most once while it stays in the cache. Entries that
/// no longer back anything on screen are dropped with [`PosterCache::retain`].
#[derive(Debug, Default)]
pub struct PosterCache {
    states: HashMap<String, PosterState>,
}

impl PosterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `url` as loading. Returns `true` when the caller should fetch it.
    pub fn request(&mut self, url: &str) -> bool {
        if !has_poster(url) || self.states.contains_key(url) {
            return false;
        }
        self.states.insert(url.to_string(), PosterState::Loading);
        true
    }

    /// URLs among `urls` that still need fetching, each marked as loading
    pub fn request_all<'a>(&mut self, urls: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        urls.into_iter()
            .filter(|url| self.request(url))
            .map(str::to_string)
            .collect()
    }

    /// Store a finished fetch. Ignored when the URL was dropped meanwhile.
    pub fn finish(&mut self, url: String, handle: Option<image::Handle>) {
        let Some(state) = self.states.get_mut(&url) else {
            return;
        };
        *state = match handle {
            Some(handle) => PosterState::Loaded(handle),
            None => PosterState::Failed,
        };
    }

    /// Drop every entry whose URL is not in `keep`
    pub fn retain<'a>(&mut self, keep: impl IntoIterator<Item = &'a str>) {
        let keep: HashSet<&str> = keep.into_iter().collect();
        self.states.retain(|url, _| keep.contains(url.as_str()));
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn get(&self, url: &str) -> Option<&image::Handle> {
        match self.states.get(url) {
            Some(PosterState::Loaded(handle)) => Some(handle),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn state(&self, url: &str) -> Option<&PosterState> {
        self.states.get(url)
    }
}
