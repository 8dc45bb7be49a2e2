/// Global keyboard listeners
///
/// Listeners are derived from state on every frame, so one only exists
/// while the view that owns it is shown. iced drops a subscription as
/// soon as it is no longer returned.
use iced::keyboard::{self, key, Key, Modifiers};
use iced::{event, window, Event, Subscription};

use crate::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyListener {
    /// Enter outside the search box focuses it
    FocusSearch,
    /// Escape closes the open detail
    CloseDetail,
}

impl KeyListener {
    pub fn subscription(self) -> Subscription<Message> {
        match self {
            KeyListener::FocusSearch => keyboard::on_key_press(focus_on_enter),
            KeyListener::CloseDetail => event::listen_with(close_on_escape_event),
        }
    }
}

fn focus_on_enter(key: Key, _modifiers: Modifiers) -> Option<Message> {
    matches!(key, Key::Named(key::Named::Enter)).then_some(Message::FocusSearch)
}

// Also fires for captured events: Escape must close the detail while the
// search box has focus.
fn close_on_escape_event(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => close_on_escape(key),
        _ => None,
    }
}

fn close_on_escape(key: Key) -> Option<Message> {
    matches!(key, Key::Named(key::Named::Escape)).then_some(Message::CloseDetail)
}
