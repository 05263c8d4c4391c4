use sectioned_changes::Position;

use crate::KindHandle;

/// Requests and notifications the list view sends to its delegate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    ElementKind(Position),
    HeaderKind(usize),
    FooterKind(usize),
    WillDisplay(Position),
    Selected(Position),
    Deselected(Position),
    ContextMenu(Position),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResponse {
    Kind(KindHandle),
    Handled,
    Unhandled,
}

pub trait ViewEventHandler {
    fn handle_event(&mut self, event: &ViewEvent) -> EventResponse;
}

/// No delegate.
impl ViewEventHandler for () {
    fn handle_event(&mut self, _event: &ViewEvent) -> EventResponse {
        EventResponse::Unhandled
    }
}
