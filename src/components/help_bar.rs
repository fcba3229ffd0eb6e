//! One-line key hint bar

use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::dispatch::Component;

pub struct HelpBar;

pub struct HelpBarProps;

impl Component for HelpBar {
    type Props<'a> = HelpBarProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, _props: Self::Props<'_>) {
        let hint = |key: &'static str, label: &'static str| {
            [
                Span::styled(key, Style::default().fg(Color::Cyan).bold()),
                Span::styled(label, Style::default().fg(Color::DarkGray)),
            ]
        };

        let help = Line::from(
            [
                hint(" /", " search  "),
                hint("↑↓←→", " cursor  "),
                hint("enter", " select  "),
                hint("l", " layer  "),
                hint("u", " units  "),
                hint("r", " refresh  "),
                hint("q", " quit "),
            ]
            .concat(),
        )
        .centered();
        frame.render_widget(Paragraph::new(help), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testing::RenderHarness;

    #[test]
    fn test_shows_key_hints() {
        let mut harness = RenderHarness::new(80, 1);
        let mut bar = HelpBar;
        let output = harness.render_to_string_plain(|frame| {
            bar.render(frame, frame.area(), HelpBarProps);
        });

        assert!(output.contains("search"));
        assert!(output.contains("layer"));
        assert!(output.contains("units"));
        assert!(output.contains("quit"));
    }
}
