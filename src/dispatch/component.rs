//! Component trait for pure UI elements

use ratatui::{layout::Rect, Frame};

use crate::action::Action;
use crate::dispatch::event::EventKind;

/// A UI element that renders from read-only props and emits actions.
///
/// Rules:
/// 1. Props carry all data needed for rendering, borrowed from `AppState`.
/// 2. `handle_event` returns actions; it never mutates shared state.
/// 3. Internal UI state (cursor column, scroll offset, last rendered area)
///    may live in `&mut self`, but data changes go through actions.
///
/// Focus is passed through props rather than tracked globally.
pub trait Component {
    /// Read-only data required to render the component.
    type Props<'a>;

    /// Handle an event and return actions to dispatch. The default is a
    /// render-only component that emits nothing.
    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        None::<Action>
    }

    /// Render the component to the frame.
    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);
}
