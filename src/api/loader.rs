/// Background loaders
///
/// Each function is run by `Task::perform` on the tokio runtime and turns
/// its outcome into a value the `update` loop can match on.

use iced::widget::image;
use tracing::{debug, warn};

use super::client::OmdbClient;
use crate::errors::ApiError;
use crate::state::detail::DetailLoaded;
use crate::state::session::{SearchFinished, SearchRequest};

/// Run one search, racing it against the request's cancellation token
///
/// A request cancelled before or while it runs completes with
/// `ApiError::Cancelled`.
pub async fn search(client: OmdbClient, request: SearchRequest) -> SearchFinished {
    let SearchRequest {
        generation,
        query,
        token,
    } = request;

    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!(generation, query = %query, "search cancelled");
            Err(ApiError::Cancelled)
        }
        page = client.search_movies(&query) => page,
    };

    if let Err(err) = &outcome {
        if *err != ApiError::Cancelled {
            warn!(generation, query = %query, error = %err, "search failed");
        }
    }

    SearchFinished { generation, outcome }
}

/// Fetch the detail record for one movie
pub async fn detail(client: OmdbClient, id: String) -> DetailLoaded {
    let outcome = client.movie_detail(&id).await;

    if let Err(err) = &outcome {
        warn!(id = %id, error = %err, "detail request failed");
    }

    DetailLoaded { id, outcome }
}

/// Fetch a poster and wrap it in an image handle
pub async fn poster(client: OmdbClient, url: String) -> (String, Result<image::Handle, ApiError>) {
    let outcome = client.poster(&url).await.map(image::Handle::from_bytes);

    if let Err(err) = &outcome {
        debug!(url = %url, error = %err, "poster unavailable");
    }

    (url, outcome)
}
