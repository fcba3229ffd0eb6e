//! Scrollable selection list for the search dropdown

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::action::Action;
use crate::dispatch::{Component, EventKind};

pub struct SelectListProps<'a> {
    pub items: &'a [String],
    pub selected: usize,
    pub is_focused: bool,
    /// Action constructor for selection changes
    pub on_select: fn(usize) -> Action,
}

/// Up/Down move the highlight; Enter re-emits the current index so the
/// parent can treat it as a confirmation.
#[derive(Default)]
pub struct SelectList {
    scroll_offset: usize,
}

impl SelectList {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_visible(&mut self, selected: usize, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + viewport_height {
            self.scroll_offset = selected.saturating_sub(viewport_height - 1);
        }
    }
}

impl Component for SelectList {
    type Props<'a> = SelectListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || props.items.is_empty() {
            return None;
        }
        let last = props.items.len() - 1;

        let EventKind::Key(key) = event else {
            return None;
        };

        match key.code {
            KeyCode::Down => {
                let next = (props.selected + 1).min(last);
                (next != props.selected).then(|| (props.on_select)(next))
            }
            KeyCode::Up => {
                let next = props.selected.saturating_sub(1);
                (next != props.selected).then(|| (props.on_select)(next))
            }
            KeyCode::Enter => Some((props.on_select)(props.selected)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let viewport_height = area.height.saturating_sub(2) as usize;
        self.ensure_visible(props.selected, viewport_height);

        let items: Vec<ListItem> = props
            .items
            .iter()
            .map(|item| ListItem::new(Line::raw(item.as_str())))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(if props.is_focused {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    }),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );

        let mut list_state = ListState::default().with_selected(Some(props.selected));
        *list_state.offset_mut() = self.scroll_offset;
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}
