//! Weather side panel - pure presentation of the latest reading

use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::dispatch::Component;
use crate::state::AppState;

pub const SPINNERS: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Shown before anything has been hovered or selected.
pub const PLACEHOLDER_LABEL: &str = "Hover over a town";

pub struct WeatherPanelProps<'a> {
    pub state: &'a AppState,
}

#[derive(Default)]
pub struct WeatherPanel;

impl Component for WeatherPanel {
    type Props<'a> = WeatherPanelProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;

        let spinner = if state.is_loading {
            let frame_idx = (state.tick_count as usize / 2) % SPINNERS.len();
            format!(" {} ", SPINNERS[frame_idx])
        } else {
            String::new()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
            .title(format!(" ☁ Weather{}", spinner))
            .title_style(Style::default().fg(Color::Cyan).bold());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label = state.panel_label.as_deref().unwrap_or(PLACEHOLDER_LABEL);

        let dim = Style::default().fg(Color::DarkGray);
        let value = Style::default().fg(Color::White);

        let (temperature, condition, humidity, wind) = match &state.weather {
            Some(weather) => (
                state.unit.format(weather.temperature_c),
                weather.condition.clone(),
                format!("{}%", weather.humidity_pct),
                format!("{} km/h", weather.wind_speed),
            ),
            None => ("--".into(), "--".into(), "--%".into(), "-- km/h".into()),
        };

        let mut lines = vec![
            Line::styled(label.to_string(), Style::default().fg(Color::White).bold()),
            Line::raw(""),
        ];
        if let Some((lat, lon)) = state.selection.position {
            lines.push(Line::styled(
                format!("{:.2}, {:.2}", lat, lon),
                Style::default().fg(Color::DarkGray),
            ));
            lines.push(Line::raw(""));
        }
        lines.extend([
            Line::from(vec![
                Span::styled("Temperature: ", dim),
                Span::styled(temperature, value),
            ]),
            Line::from(vec![
                Span::styled("Condition: ", dim),
                Span::styled(condition, value),
            ]),
            Line::from(vec![
                Span::styled("Humidity: ", dim),
                Span::styled(humidity, value),
            ]),
            Line::from(vec![Span::styled("Wind: ", dim), Span::styled(wind, value)]),
        ]);

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}
