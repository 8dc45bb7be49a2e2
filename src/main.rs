use iced::widget::{column, container, image, row, text, text_input};
use iced::{Element, Length, Subscription, Task, Theme};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod errors;
mod state;
mod ui;

use api::{loader, OmdbClient};
use crate::config::AppConfig;
use errors::{ApiError, Error};
use state::detail::{DetailLoaded, DetailLoader};
use state::posters::PosterCache;
use state::session::{SearchFinished, SearchSession};
use state::store::WatchlistStore;
use state::watchlist::{WatchedRecord, Watchlist};
use ui::keys::KeyListener;
use ui::panels;

/// Main application state
struct WatchList {
    config: AppConfig,
    client: OmdbClient,
    /// Durable home of the watched list
    store: WatchlistStore,
    session: SearchSession,
    detail: DetailLoader,
    watched: Watchlist,
    posters: PosterCache,
    results_open: bool,
    watched_open: bool,
    /// Notice shown under the header (startup and save problems)
    status: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User edited the search box
    QueryChanged(String),
    /// Background search finished (possibly superseded)
    SearchFinished(SearchFinished),
    /// Enter pressed outside the search box
    FocusSearch,
    SelectMovie(String),
    CloseDetail,
    DetailLoaded(DetailLoaded),
    RatingHovered(Option<u8>),
    RatingSelected(u8),
    TogglePlot,
    /// "+ Add to list" on the open detail
    AddWatched,
    DeleteWatched(String),
    ToggleResultsBox,
    ToggleWatchedBox,
    PosterLoaded(String, Result<image::Handle, ApiError>),
}

impl WatchList {
    /// Create a new instance of the application
    fn new(config: AppConfig, store: WatchlistStore, status: Option<String>) -> (Self, Task<Message>) {
        let watched = store.load_watched();
        info!(
            movies = watched.len(),
            persistent = store.is_persistent(),
            "watchList initialized"
        );

        let mut app = WatchList {
            client: OmdbClient::new(&config.api),
            config,
            store,
            session: SearchSession::new(),
            detail: DetailLoader::new(),
            watched,
            posters: PosterCache::new(),
            results_open: true,
            watched_open: true,
            status,
        };

        let urls: Vec<String> = app
            .watched
            .records()
            .iter()
            .map(|record| record.poster_url.clone())
            .collect();
        let task = app.fetch_posters(urls.iter().map(String::as_str));

        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::QueryChanged(query) => match self.session.set_query(query) {
                Some(request) => {
                    // A new search always returns to the watched list
                    self.detail.close();
                    Task::perform(
                        loader::search(self.client.clone(), request),
                        Message::SearchFinished,
                    )
                }
                None => {
                    self.prune_posters();
                    Task::none()
                }
            },
            Message::SearchFinished(finished) => {
                if !self.session.complete(finished) {
                    return Task::none();
                }
                debug!(phase = ?self.session.phase(), "search settled");
                self.prune_posters();
                let urls: Vec<String> = self
                    .session
                    .results()
                    .iter()
                    .map(|item| item.poster_url.clone())
                    .collect();
                self.fetch_posters(urls.iter().map(String::as_str))
            }
            Message::FocusSearch => {
                let clear = self.update(Message::QueryChanged(String::new()));
                Task::batch([text_input::focus(panels::search_input_id()), clear])
            }
            Message::SelectMovie(id) => match self.detail.select(&id) {
                Some(id) => Task::perform(
                    loader::detail(self.client.clone(), id),
                    Message::DetailLoaded,
                ),
                None => Task::none(),
            },
            Message::CloseDetail => {
                self.detail.close();
                Task::none()
            }
            Message::DetailLoaded(loaded) => {
                if !self.detail.complete(loaded) {
                    return Task::none();
                }
                let url = self.detail.detail().map(|detail| detail.poster_url.clone());
                self.fetch_posters(url.as_deref())
            }
            Message::RatingHovered(rating) => {
                self.detail.hover_rating(rating);
                Task::none()
            }
            Message::RatingSelected(rating) => {
                self.detail.set_rating(rating);
                Task::none()
            }
            Message::TogglePlot => {
                self.detail.toggle_plot();
                Task::none()
            }
            Message::AddWatched => {
                self.add_watched();
                Task::none()
            }
            Message::DeleteWatched(id) => {
                self.watched.remove(&id);
                self.persist();
                self.prune_posters();
                Task::none()
            }
            Message::ToggleResultsBox => {
                self.results_open = !self.results_open;
                Task::none()
            }
            Message::ToggleWatchedBox => {
                self.watched_open = !self.watched_open;
                Task::none()
            }
            Message::PosterLoaded(url, result) => {
                self.posters.finish(url, result.ok());
                Task::none()
            }
        }
    }

    /// Turn the open detail and its rating into a watched record
    fn add_watched(&mut self) {
        let Some(detail) = self.detail.detail() else {
            return;
        };
        if self.watched.contains(&detail.id) {
            return;
        }

        match WatchedRecord::from_detail(detail, self.detail.user_rating()) {
            Ok(record) => {
                info!(id = %record.id, rating = record.user_rating, "movie added to watch list");
                self.watched.add(record);
                self.persist();
                self.detail.close();
            }
            Err(err) => warn!(error = %err, "movie not added"),
        }
    }

    /// Write the watched list through to the store
    fn persist(&mut self) {
        if let Err(err) = self.store.save_watched(&self.watched) {
            error!(error = %err, "failed to save watch list");
            self.status = Some(format!("Could not save your watch list: {}", err));
        }
    }

    fn fetch_posters<'a>(&mut self, urls: impl IntoIterator<Item = &'a str>) -> Task<Message> {
        let tasks: Vec<Task<Message>> = self
            .posters
            .request_all(urls)
            .into_iter()
            .map(|url| {
                Task::perform(loader::poster(self.client.clone(), url), |(url, result)| {
                    Message::PosterLoaded(url, result)
                })
            })
            .collect();
        Task::batch(tasks)
    }

    /// Forget posters of rows that are no longer shown
    fn prune_posters(&mut self) {
        let results = self.session.results().iter().map(|item| item.poster_url.as_str());
        let watched = self.watched.records().iter().map(|record| record.poster_url.as_str());
        let detail = self.detail.detail().map(|detail| detail.poster_url.as_str());

        self.posters.retain(results.chain(watched).chain(detail));
        debug!(posters = self.posters.len(), "poster cache pruned");
    }

    /// Keyboard listeners that should exist right now
    fn key_listeners(&self) -> Vec<KeyListener> {
        let mut listeners = vec![KeyListener::FocusSearch];
        if self.detail.is_open() {
            listeners.push(KeyListener::CloseDetail);
        }
        listeners
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch(self.key_listeners().into_iter().map(KeyListener::subscription))
    }

    /// Window title follows the open detail
    fn title(&self) -> String {
        self.detail.page_title()
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let results = panels::collapsible(
            self.results_open,
            Message::ToggleResultsBox,
            panels::results_box(&self.session, &self.posters),
        );

        let right = if self.detail.is_open() {
            panels::detail_view(&self.detail, &self.watched, &self.posters, &self.config.ui)
        } else {
            panels::watched_box(&self.watched, &self.posters)
        };
        let right = panels::collapsible(self.watched_open, Message::ToggleWatchedBox, right);

        let mut content = column![panels::nav_bar(&self.session)].spacing(12);
        if let Some(status) = &self.status {
            content = content.push(text(status).size(14));
        }
        content = content.push(row![results, right].spacing(20).height(Length::Fill));

        container(content.padding(20))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Open the configured database, falling back to a session-only store
fn open_store(config: &AppConfig) -> errors::Result<(WatchlistStore, Option<String>)> {
    let opened = config
        .db_path()
        .ok_or(Error::NoDataDir)
        .and_then(|path| WatchlistStore::open(&path));

    match opened {
        Ok(store) => Ok((store, None)),
        Err(err) => {
            error!(error = %err, "could not open watch list database");
            let store = WatchlistStore::in_memory()?;
            Ok((store, Some(format!("Your watch list will not be saved: {}", err))))
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("movie_watchlist=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::load().unwrap_or_else(|err| {
        warn!(error = %err, "invalid configuration, using defaults");
        AppConfig::default()
    });
    if config.api.api_key.is_empty() {
        warn!("no API key configured; set WATCHLIST__API__API_KEY");
    }

    let (store, status) = open_store(&config)?;

    iced::application(WatchList::title, WatchList::update, WatchList::view)
        .subscription(WatchList::subscription)
        .theme(WatchList::theme)
        .centered()
        .run_with(move || WatchList::new(config, store, status))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{MovieDetail, SearchPage, SearchResultItem};
    use crate::state::store::WATCHED_KEY;

    fn app() -> WatchList {
        let store = WatchlistStore::in_memory().unwrap();
        let (app, _) = WatchList::new(AppConfig::default(), store, None);
        app
    }

    fn inception() -> MovieDetail {
        MovieDetail {
            id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            poster_url: "N/A".to_string(),
            runtime_text: "148 min".to_string(),
            runtime_minutes: 148,
            rating: 8.8,
            ..MovieDetail::default()
        }
    }

    fn open_inception(app: &mut WatchList) {
        let _ = app.update(Message::SelectMovie("tt1375666".to_string()));
        let _ = app.update(Message::DetailLoaded(DetailLoaded {
            id: "tt1375666".to_string(),
            outcome: Ok(inception()),
        }));
    }

    #[test]
    fn test_detail_drives_window_title() {
        let mut app = app();
        assert_eq!(app.title(), "watchList");

        let _ = app.update(Message::SelectMovie("tt1375666".to_string()));
        assert!(app.detail.is_loading());

        let _ = app.update(Message::DetailLoaded(DetailLoaded {
            id: "tt1375666".to_string(),
            outcome: Ok(inception()),
        }));
        assert_eq!(app.title(), "Movie | Inception");

        let _ = app.update(Message::CloseDetail);
        assert_eq!(app.title(), "watchList");
        assert!(app.detail.selected_id().is_none());
    }

    #[test]
    fn test_add_with_rating_persists_and_closes() {
        let mut app = app();
        open_inception(&mut app);

        let _ = app.update(Message::RatingSelected(8));
        let _ = app.update(Message::AddWatched);

        assert_eq!(app.watched.len(), 1);
        assert_eq!(app.watched.user_rating_for("tt1375666"), Some(8));
        assert_eq!(app.watched.records()[0].runtime_minutes, 148);

        let stored = app.store.get(WATCHED_KEY).unwrap().unwrap();
        assert_eq!(Watchlist::from_json(&stored).unwrap(), app.watched);

        assert!(app.detail.selected_id().is_none());
        assert_eq!(app.title(), "watchList");
    }

    #[test]
    fn test_add_without_rating_is_ignored() {
        let mut app = app();
        open_inception(&mut app);

        let _ = app.update(Message::AddWatched);

        assert!(app.watched.is_empty());
        assert_eq!(app.store.get(WATCHED_KEY).unwrap(), None);
        assert!(app.detail.is_open());
    }

    #[test]
    fn test_already_watched_movie_is_not_added_twice() {
        let mut app = app();
        open_inception(&mut app);
        let _ = app.update(Message::RatingSelected(8));
        let _ = app.update(Message::AddWatched);

        open_inception(&mut app);
        let _ = app.update(Message::RatingSelected(3));
        let _ = app.update(Message::AddWatched);

        assert_eq!(app.watched.len(), 1);
        assert_eq!(app.watched.user_rating_for("tt1375666"), Some(8));
    }

    #[test]
    fn test_delete_is_written_through() {
        let mut app = app();
        open_inception(&mut app);
        let _ = app.update(Message::RatingSelected(8));
        let _ = app.update(Message::AddWatched);

        let _ = app.update(Message::DeleteWatched("tt1375666".to_string()));

        assert!(app.watched.is_empty());
        assert_eq!(app.store.get(WATCHED_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_failed_save_keeps_change_and_reports() {
        let mut app = app();
        open_inception(&mut app);
        let _ = app.update(Message::RatingSelected(8));
        app.store.break_table();

        let _ = app.update(Message::AddWatched);

        assert_eq!(app.watched.len(), 1);
        assert!(!app.detail.is_open());
        let status = app.status.as_deref().unwrap();
        assert!(status.starts_with("Could not save your watch list"));

        let _ = app.update(Message::DeleteWatched("tt1375666".to_string()));
        assert!(app.watched.is_empty());
    }

    #[test]
    fn test_watched_list_is_restored_on_start() {
        let store = WatchlistStore::in_memory().unwrap();
        let mut list = Watchlist::new();
        list.add(WatchedRecord::from_detail(&inception(), 9).unwrap());
        store.save_watched(&list).unwrap();

        let (app, _) = WatchList::new(AppConfig::default(), store, None);
        assert_eq!(app.watched, list);
    }

    #[test]
    fn test_new_search_closes_detail() {
        let mut app = app();
        open_inception(&mut app);

        let _ = app.update(Message::QueryChanged("interstellar".to_string()));

        assert!(app.session.is_loading());
        assert!(!app.detail.is_open());
    }

    #[test]
    fn test_clearing_query_keeps_detail_open() {
        let mut app = app();
        open_inception(&mut app);

        let _ = app.update(Message::QueryChanged(String::new()));

        assert!(app.detail.is_open());
    }

    #[test]
    fn test_search_results_reach_the_session() {
        let mut app = app();
        let _ = app.update(Message::QueryChanged("inception".to_string()));

        let item = SearchResultItem {
            id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            poster_url: "N/A".to_string(),
        };
        let _ = app.update(Message::SearchFinished(SearchFinished {
            generation: 1,
            outcome: Ok(SearchPage {
                found: true,
                items: vec![item.clone()],
            }),
        }));

        assert_eq!(app.session.results(), &[item]);
        assert!(!app.session.is_loading());
    }

    fn finish_search(app: &mut WatchList, generation: u64, posters: &[&str]) {
        let items = posters
            .iter()
            .enumerate()
            .map(|(i, url)| SearchResultItem {
                id: format!("tt{i}"),
                title: format!("Movie {i}"),
                year: "2010".to_string(),
                poster_url: url.to_string(),
            })
            .collect();
        let _ = app.update(Message::SearchFinished(SearchFinished {
            generation,
            outcome: Ok(SearchPage { found: true, items }),
        }));
    }

    #[test]
    fn test_posters_of_replaced_results_are_dropped() {
        let mut app = app();

        let _ = app.update(Message::QueryChanged("inception".to_string()));
        finish_search(&mut app, 1, &["https://img/a.jpg", "https://img/b.jpg"]);
        assert_eq!(app.posters.len(), 2);

        let _ = app.update(Message::QueryChanged("interstellar".to_string()));
        finish_search(&mut app, 2, &["https://img/b.jpg", "https://img/c.jpg"]);
        assert_eq!(app.posters.len(), 2);
        assert!(app.posters.state("https://img/a.jpg").is_none());

        let _ = app.update(Message::PosterLoaded(
            "https://img/a.jpg".to_string(),
            Ok(image::Handle::from_bytes(vec![0u8; 4])),
        ));
        assert!(app.posters.get("https://img/a.jpg").is_none());

        let _ = app.update(Message::QueryChanged(String::new()));
        assert_eq!(app.posters.len(), 0);
    }

    #[test]
    fn test_watched_posters_survive_new_searches() {
        let mut app = app();
        let mut detail = inception();
        detail.poster_url = "https://img/inception.jpg".to_string();

        let _ = app.update(Message::SelectMovie(detail.id.clone()));
        let _ = app.update(Message::DetailLoaded(DetailLoaded {
            id: detail.id.clone(),
            outcome: Ok(detail),
        }));
        let _ = app.update(Message::RatingSelected(9));
        let _ = app.update(Message::AddWatched);

        let _ = app.update(Message::QueryChanged("matrix".to_string()));
        finish_search(&mut app, 1, &["https://img/matrix.jpg"]);

        assert!(app.posters.state("https://img/inception.jpg").is_some());
        assert!(app.posters.state("https://img/matrix.jpg").is_some());
    }

    #[test]
    fn test_focus_search_clears_query() {
        let mut app = app();
        let _ = app.update(Message::QueryChanged("inception".to_string()));

        let _ = app.update(Message::FocusSearch);

        assert_eq!(app.session.query(), "");
        assert!(!app.session.is_loading());
    }

    #[test]
    fn test_escape_listener_lives_only_while_detail_is_open() {
        let mut app = app();
        assert_eq!(app.key_listeners(), vec![KeyListener::FocusSearch]);

        for _ in 0..3 {
            open_inception(&mut app);
            assert_eq!(
                app.key_listeners(),
                vec![KeyListener::FocusSearch, KeyListener::CloseDetail]
            );

            let _ = app.update(Message::CloseDetail);
            assert_eq!(app.key_listeners(), vec![KeyListener::FocusSearch]);
        }
    }

    #[test]
    fn test_boxes_toggle() {
        let mut app = app();

        let _ = app.update(Message::ToggleResultsBox);
        let _ = app.update(Message::ToggleWatchedBox);
        assert!(!app.results_open);
        assert!(!app.watched_open);

        let _ = app.update(Message::ToggleResultsBox);
        assert!(app.results_open);
    }

    #[test]
    fn test_open_store_falls_back_to_memory() {
        let temp_dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file
        let mut config = AppConfig::default();
        config.storage.db_path = Some(temp_dir.path().to_path_buf());

        let (store, status) = open_store(&config).unwrap();

        assert!(!store.is_persistent());
        assert!(status.is_some());
    }
}
