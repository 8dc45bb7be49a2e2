/// Collapsible paragraph
/// Shows the first few words of a long text with a "Show More" toggle
use iced::widget::{button, column, text};
use iced::Element;

use crate::Message;

/// First `words` words of `text` followed by "...", or `None` when the
/// text is short enough to show whole
pub fn collapse_words(text: &str, words: usize) -> Option<String> {
    let mut tokens = text.split_whitespace();
    let head: Vec<&str> = tokens.by_ref().take(words).collect();

    if tokens.next().is_none() {
        return None;
    }
    Some(format!("{}...", head.join(" ")))
}

pub fn text_expander(content: &str, words: usize, expanded: bool) -> Element<'_, Message> {
    let Some(collapsed) = collapse_words(content, words) else {
        return text(content).into();
    };

    let (shown, label) = if expanded {
        (content.to_string(), "Show Less")
    } else {
        (collapsed, "Show More")
    };

    column![
        text(shown),
        button(text(label).size(14))
            .style(button::text)
            .padding(0)
            .on_press(Message::TogglePlot),
    ]
    .spacing(4)
    .into()
}
