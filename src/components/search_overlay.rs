//! Modal search overlay: text input on top, result dropdown below

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, Borders, Clear},
    Frame,
};

use super::{SelectList, SelectListProps, TextInput, TextInputProps};
use crate::action::Action;
use crate::dispatch::{Component, EventKind};
use crate::state::Location;

pub struct SearchOverlayProps<'a> {
    pub query: &'a str,
    pub results: &'a [Location],
    pub selected: usize,
    pub is_focused: bool,
    /// Action constructors
    pub on_query_change: fn(String) -> Action,
    pub on_query_submit: fn(String) -> Action,
    pub on_select: fn(usize) -> Action,
}

pub struct SearchOverlay {
    input: TextInput,
    list: SelectList,
    was_open: bool,
}

impl Default for SearchOverlay {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            list: SelectList::new(),
            was_open: false,
        }
    }
}

impl SearchOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the inner widgets each time the overlay opens, so cursor and
    /// scroll positions do not leak between uses.
    pub fn set_open(&mut self, is_open: bool) {
        if is_open && !self.was_open {
            self.input = TextInput::new();
            self.list = SelectList::new();
        }
        self.was_open = is_open;
    }

    fn result_items(results: &[Location]) -> Vec<String> {
        results.iter().map(|location| location.label.clone()).collect()
    }
}

impl Component for SearchOverlay {
    type Props<'a> = SearchOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Esc => return vec![Action::SearchClose],
            KeyCode::Enter => {
                // With results, Enter confirms the highlighted one;
                // otherwise it submits the query text.
                if !props.results.is_empty() {
                    return vec![Action::SearchConfirm];
                }
                return vec![(props.on_query_submit)(props.query.to_string())];
            }
            KeyCode::Up | KeyCode::Down => {
                let items = Self::result_items(props.results);
                let list_props = SelectListProps {
                    items: &items,
                    selected: props.selected,
                    is_focused: true,
                    on_select: props.on_select,
                };
                return self.list.handle_event(event, list_props).into_iter().collect();
            }
            _ => {}
        }

        // Everything else edits the query
        let input_props = TextInputProps {
            value: props.query,
            placeholder: "Search for a place...",
            is_focused: true,
            on_change: props.on_query_change,
            on_submit: props.on_query_submit,
        };
        self.input.handle_event(event, input_props).into_iter().collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 24 || area.height < 10 {
            return;
        }

        let modal_area = centered_rect(50, 14, area);
        frame.render_widget(Clear, modal_area);

        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Search ")
            .title_style(Style::default().fg(Color::Cyan).bold());
        frame.render_widget(outer.clone(), modal_area);
        let inner = outer.inner(modal_area);

        let chunks = Layout::vertical([
            Constraint::Length(3), // Input
            Constraint::Min(1),    // Results
        ])
        .split(inner);

        let input_props = TextInputProps {
            value: props.query,
            placeholder: "Search for a place...",
            is_focused: props.is_focused,
            on_change: props.on_query_change,
            on_submit: props.on_query_submit,
        };
        self.input.render(frame, chunks[0], input_props);

        let items = Self::result_items(props.results);
        let list_props = SelectListProps {
            items: &items,
            selected: props.selected,
            is_focused: props.is_focused,
            on_select: props.on_select,
        };
        self.list.render(frame, chunks[1], list_props);
    }
}

/// Rectangle of the given size centered within `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testing::{key, ActionAssertions, RenderHarness};

    fn results() -> Vec<Location> {
        vec![
            Location::new("Accra", 5.6145, -0.2056),
            Location::new("Kumasi", 6.6885, -1.6244),
        ]
    }

    fn props<'a>(query: &'a str, results: &'a [Location], selected: usize) -> SearchOverlayProps<'a> {
        SearchOverlayProps {
            query,
            results,
            selected,
            is_focused: true,
            on_query_change: Action::SearchQueryChange,
            on_query_submit: Action::SearchQuerySubmit,
            on_select: Action::SearchSelect,
        }
    }

    fn handle(
        overlay: &mut SearchOverlay,
        event: &EventKind,
        p: SearchOverlayProps<'_>,
    ) -> Vec<Action> {
        overlay.handle_event(event, p).into_iter().collect()
    }

    #[test]
    fn test_escape_closes() {
        let mut overlay = SearchOverlay::new();
        let actions = handle(&mut overlay, &EventKind::Key(key("esc")), props("", &[], 0));
        actions.assert_first(Action::SearchClose);
    }

    #[test]
    fn test_enter_with_results_confirms() {
        let mut overlay = SearchOverlay::new();
        let results = results();
        let actions = handle(
            &mut overlay,
            &EventKind::Key(key("enter")),
            props("acc", &results, 0),
        );
        actions.assert_first(Action::SearchConfirm);
    }

    #[test]
    fn test_enter_without_results_submits_query() {
        let mut overlay = SearchOverlay::new();
        let actions = handle(
            &mut overlay,
            &EventKind::Key(key("enter")),
            props("accra", &[], 0),
        );
        actions.assert_first(Action::SearchQuerySubmit("accra".into()));
    }

    #[test]
    fn test_arrows_navigate_results() {
        let mut overlay = SearchOverlay::new();
        let results = results();
        let actions = handle(
            &mut overlay,
            &EventKind::Key(key("down")),
            props("a", &results, 0),
        );
        actions.assert_first(Action::SearchSelect(1));
    }

    #[test]
    fn test_typing_edits_query() {
        let mut overlay = SearchOverlay::new();
        let actions = handle(&mut overlay, &EventKind::Key(key("a")), props("", &[], 0));
        actions.assert_first(Action::SearchQueryChange("a".into()));
    }

    #[test]
    fn test_unfocused_ignores_events() {
        let mut overlay = SearchOverlay::new();
        let mut p = props("", &[], 0);
        p.is_focused = false;
        let actions = handle(&mut overlay, &EventKind::Key(key("a")), p);
        actions.assert_empty();
    }

    #[test]
    fn test_render_shows_query_and_results() {
        let mut harness = RenderHarness::new(70, 20);
        let mut overlay = SearchOverlay::new();
        overlay.set_open(true);
        let results = results();

        let output = harness.render_to_string_plain(|frame| {
            overlay.render(frame, frame.area(), props("acc", &results, 0));
        });

        assert!(output.contains("Search"));
        assert!(output.contains("acc"));
        assert!(output.contains("Accra"));
        assert!(output.contains("Kumasi"));
    }
}
