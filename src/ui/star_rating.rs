/// Star rating widget
/// A row of clickable stars with hover preview
use iced::widget::{button, mouse_area, row, text, Row};
use iced::{Alignment, Element};

use crate::Message;

const FILLED: &str = "★";
const EMPTY: &str = "☆";

/// Glyph for each star, `filled` of them lit
pub fn star_glyphs(max: u8, filled: u8) -> Vec<&'static str> {
    (1..=max)
        .map(|star| if star <= filled { FILLED } else { EMPTY })
        .collect()
}

pub fn star_rating<'a>(max: u8, displayed: u8) -> Element<'a, Message> {
    let stars = star_glyphs(max, displayed)
        .into_iter()
        .zip(1..=max)
        .map(|(glyph, star)| -> Element<'a, Message> {
            mouse_area(
                button(text(glyph).size(24))
                    .style(button::text)
                    .padding(2)
                    .on_press(Message::RatingSelected(star)),
            )
            .on_enter(Message::RatingHovered(Some(star)))
            .on_exit(Message::RatingHovered(None))
            .into()
        });

    let label = if displayed > 0 {
        displayed.to_string()
    } else {
        String::new()
    };

    row![Row::with_children(stars), text(label).size(20)]
        .spacing(12)
        .align_y(Alignment::Center)
        .into()
}
