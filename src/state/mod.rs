/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The search session controller (session.rs)
/// - Selection and detail loading (detail.rs)
/// - The watched list and its statistics (watchlist.rs)
/// - The SQLite-backed key-value store (store.rs)
/// - Poster image cache (posters.rs)

pub mod data;
pub mod detail;
pub mod posters;
pub mod session;
pub mod store;
pub mod watchlist;
