/// Presentation layer
///
/// Pure functions from state to widgets, plus the keyboard listeners.

pub mod keys;
pub mod panels;
pub mod star_rating;
pub mod text_expander;
