/// Movie database module
///
/// This module handles:
/// - OMDb wire types and their conversion to the app's data model
/// - The HTTP client (search, detail, poster)
/// - Background loaders run as iced tasks

pub mod client;
pub mod loader;
pub mod model;

pub use client::OmdbClient;
