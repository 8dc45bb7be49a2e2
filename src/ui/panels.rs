/// Layout pieces of the main window
use iced::widget::{
    button, column, container, horizontal_space, image, row, scrollable, text, text_input,
    Column,
};
use iced::{Alignment, Element, Length};

use super::star_rating::star_rating;
use super::text_expander::text_expander;
use crate::config::UiConfig;
use crate::state::data::SearchResultItem;
use crate::state::detail::DetailLoader;
use crate::state::posters::PosterCache;
use crate::state::session::{ResultsView, SearchSession};
use crate::state::watchlist::{WatchedRecord, Watchlist};
use crate::Message;

const POSTER_WIDTH: f32 = 48.0;
const DETAIL_POSTER_WIDTH: f32 = 160.0;

pub fn search_input_id() -> text_input::Id {
    text_input::Id::new("search")
}

pub fn nav_bar(session: &SearchSession) -> Element<'_, Message> {
    row![
        text("🍿 watchList").size(28),
        horizontal_space(),
        text_input("Search movies...", session.query())
            .id(search_input_id())
            .on_input(Message::QueryChanged)
            .padding(10)
            .width(Length::Fixed(360.0)),
        horizontal_space(),
        text(format!("Found {} results", session.results().len())).size(16),
    ]
    .spacing(20)
    .padding(16)
    .align_y(Alignment::Center)
    .into()
}

/// A box whose content can be collapsed with a "–"/"+" toggle
pub fn collapsible<'a>(
    open: bool,
    on_toggle: Message,
    content: Element<'a, Message>,
) -> Element<'a, Message> {
    let toggle = button(text(if open { "–" } else { "+" }))
        .style(button::secondary)
        .on_press(on_toggle);

    let body: Element<'a, Message> = if open {
        content
    } else {
        horizontal_space().into()
    };

    container(column![row![horizontal_space(), toggle], body].spacing(8))
        .padding(12)
        .width(Length::FillPortion(1))
        .height(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn poster<'a>(posters: &'a PosterCache, url: &str, width: f32) -> Element<'a, Message> {
    match posters.get(url) {
        Some(handle) => image(handle.clone()).width(Length::Fixed(width)).into(),
        None => container(text("🎬"))
            .width(Length::Fixed(width))
            .center_x(Length::Fixed(width))
            .into(),
    }
}

pub fn results_box<'a>(session: &'a SearchSession, posters: &'a PosterCache) -> Element<'a, Message> {
    match session.view() {
        ResultsView::Loading => text("Loading ...").size(20).into(),
        ResultsView::Error(message) => text(format!("❌ {}", message)).size(20).into(),
        ResultsView::Results(items) => {
            let rows = items.iter().map(|item| result_row(item, posters));
            scrollable(Column::with_children(rows).spacing(6))
                .height(Length::Fill)
                .into()
        }
    }
}

fn result_row<'a>(item: &'a SearchResultItem, posters: &'a PosterCache) -> Element<'a, Message> {
    button(
        row![
            poster(posters, &item.poster_url, POSTER_WIDTH),
            column![text(&item.title).size(18), text(format!("🗓 {}", item.year)).size(14)]
                .spacing(4),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .style(button::text)
    .width(Length::Fill)
    .on_press(Message::SelectMovie(item.id.clone()))
    .into()
}

pub fn watched_box<'a>(watched: &'a Watchlist, posters: &'a PosterCache) -> Element<'a, Message> {
    let stats = watched.stats();

    let summary = column![
        text("Movies you watched").size(20),
        row![
            text(format!("#️⃣ {} movies", stats.count)),
            text(format!("⭐️ {:.2}", stats.avg_external_rating)),
            text(format!("🌟 {:.2}", stats.avg_user_rating)),
            text(format!("⏳ {:.0} min", stats.avg_runtime)),
        ]
        .spacing(16),
    ]
    .spacing(8);

    if watched.is_empty() {
        return column![summary, text("Rate a movie and add it to start your list")]
            .spacing(12)
            .into();
    }

    let rows = watched.records().iter().map(|record| watched_row(record, posters));

    column![
        summary,
        scrollable(Column::with_children(rows).spacing(6)).height(Length::Fill),
    ]
    .spacing(12)
    .into()
}

fn watched_row<'a>(record: &'a WatchedRecord, posters: &'a PosterCache) -> Element<'a, Message> {
    row![
        poster(posters, &record.poster_url, POSTER_WIDTH),
        column![
            text(&record.title).size(18),
            row![
                text(format!("⭐️ {}", record.external_rating)),
                text(format!("🌟 {}", record.user_rating)),
                text(format!("⏳ {} min", record.runtime_minutes)),
            ]
            .spacing(12),
        ]
        .spacing(4),
        horizontal_space(),
        button(text("X"))
            .style(button::danger)
            .on_press(Message::DeleteWatched(record.id.clone())),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .into()
}

pub fn detail_view<'a>(
    loader: &'a DetailLoader,
    watched: &'a Watchlist,
    posters: &'a PosterCache,
    ui: &UiConfig,
) -> Element<'a, Message> {
    let back = button(text("←")).on_press(Message::CloseDetail);

    if loader.is_loading() {
        return column![back, text("Loading ...").size(20)].spacing(12).into();
    }

    let Some(detail) = loader.detail() else {
        let message = loader.error().unwrap_or_default();
        return column![back, text(format!("❌ {}", message)).size(20)]
            .spacing(12)
            .into();
    };

    let header = row![
        poster(posters, &detail.poster_url, DETAIL_POSTER_WIDTH),
        column![
            text(&detail.title).size(26),
            text(format!("Year: {}", detail.year)),
            text(format!("{} • {}", detail.released, detail.runtime_text)),
            text(&detail.genre),
            text(format!("⭐ {} IMDb rating", detail.rating)),
        ]
        .spacing(6),
    ]
    .spacing(16);

    let rating: Element<'a, Message> = match watched.user_rating_for(&detail.id) {
        Some(rated) => text(format!("You rated this movie {}⭐", rated)).into(),
        None => {
            let mut rating = column![star_rating(ui.max_rating, loader.displayed_rating())].spacing(8);
            if loader.user_rating() > 0 {
                rating = rating.push(
                    button(text("+ Add to list"))
                        .style(button::primary)
                        .on_press(Message::AddWatched),
                );
            }
            rating.into()
        }
    };

    scrollable(
        column![
            back,
            header,
            container(rating).padding(12).style(container::rounded_box),
            text_expander(&detail.plot, ui.plot_preview_words, loader.is_plot_expanded()),
            text(format!("Starring {}", detail.actors)),
            text(format!("Directed by {}", detail.director)),
        ]
        .spacing(16),
    )
    .height(Length::Fill)
    .into()
}
