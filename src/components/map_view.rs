//! Canvas map: world outline, town markers, selection marker, hover cursor
//!
//! The viewport maps the inner drawing area onto a lat/lon window centered
//! on the camera. Pointer events are converted back through the same
//! transform, so clicks and hovers land on the geographic position under
//! the cell.

use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Style, Stylize},
    symbols,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Map, MapResolution, Points},
        Block, Borders,
    },
    Frame,
};

use crate::action::Action;
use crate::dispatch::{Component, EventKind};
use crate::state::{AppState, MapLayer, Viewport};

const ZOOM_IN: f64 = 0.7;
const ZOOM_OUT: f64 = 1.0 / 0.7;

/// Town labels clutter the view once the camera is far out.
const LABEL_MAX_SPAN: f64 = 16.0;

pub const SELECTION_ICON: &str = "◆";
pub const CURSOR_ICON: &str = "+";

struct Palette {
    land: Color,
    town: Color,
    marker: Color,
    cursor: Color,
}

fn palette(layer: MapLayer) -> Palette {
    match layer {
        MapLayer::Street => Palette {
            land: Color::Green,
            town: Color::Yellow,
            marker: Color::Red,
            cursor: Color::White,
        },
        MapLayer::Satellite => Palette {
            land: Color::Rgb(90, 110, 160),
            town: Color::White,
            marker: Color::LightRed,
            cursor: Color::LightYellow,
        },
        MapLayer::Topographic => Palette {
            land: Color::Rgb(180, 140, 90),
            town: Color::LightMagenta,
            marker: Color::Red,
            cursor: Color::White,
        },
        MapLayer::Dark => Palette {
            land: Color::DarkGray,
            town: Color::Cyan,
            marker: Color::LightRed,
            cursor: Color::White,
        },
    }
}

pub struct MapViewProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Remembers the last rendered drawing area and geo bounds so pointer
/// events can be hit-tested against the same transform that drew the frame.
#[derive(Default)]
pub struct MapView {
    inner: Option<Rect>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl MapView {
    pub fn new() -> Self {
        Self::default()
    }

    fn bounds(viewport: &Viewport, inner: Rect) -> ([f64; 2], [f64; 2]) {
        let (clat, clon) = viewport.center;
        let half_lat = viewport.span_lat / 2.0;
        // A terminal cell is roughly twice as tall as wide; widen the
        // longitude window accordingly so degrees look square on screen.
        let half_lon = if inner.height == 0 {
            half_lat
        } else {
            half_lat * f64::from(inner.width) / (2.0 * f64::from(inner.height))
        };
        (
            [clon - half_lon, clon + half_lon],
            [clat - half_lat, clat + half_lat],
        )
    }

    /// Geographic position under a terminal cell, if it lies inside the
    /// last rendered drawing area.
    fn geo_at(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        let inner = self.inner?;
        if inner.width == 0 || inner.height == 0 || !inner.contains(Position::new(column, row)) {
            return None;
        }
        let fx = (f64::from(column - inner.x) + 0.5) / f64::from(inner.width);
        let fy = (f64::from(row - inner.y) + 0.5) / f64::from(inner.height);
        let longitude = self.x_bounds[0] + fx * (self.x_bounds[1] - self.x_bounds[0]);
        let latitude = self.y_bounds[1] - fy * (self.y_bounds[1] - self.y_bounds[0]);
        Some((latitude, longitude))
    }
}

impl Component for MapView {
    type Props<'a> = MapViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        match event {
            EventKind::Key(key) => {
                let step = props.state.viewport.step();
                let action = match key.code {
                    KeyCode::Char('/') => Some(Action::SearchOpen),
                    KeyCode::Char('l') => Some(Action::MapCycleLayer),
                    KeyCode::Char('u') => Some(Action::UiToggleUnits),
                    KeyCode::Char('r') => Some(Action::WeatherRefresh),
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        Some(Action::MapZoom { factor: ZOOM_IN })
                    }
                    KeyCode::Char('-') => Some(Action::MapZoom { factor: ZOOM_OUT }),
                    KeyCode::Up => Some(Action::CursorMove {
                        dlat: step,
                        dlon: 0.0,
                    }),
                    KeyCode::Down => Some(Action::CursorMove {
                        dlat: -step,
                        dlon: 0.0,
                    }),
                    KeyCode::Left => Some(Action::CursorMove {
                        dlat: 0.0,
                        dlon: -step,
                    }),
                    KeyCode::Right => Some(Action::CursorMove {
                        dlat: 0.0,
                        dlon: step,
                    }),
                    KeyCode::Enter => Some(Action::CursorSelect),
                    KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                    _ => None,
                };
                action.into_iter().collect()
            }

            EventKind::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Moved => self
                    .geo_at(mouse.column, mouse.row)
                    .map(|(latitude, longitude)| Action::MapHover {
                        latitude,
                        longitude,
                    })
                    .into_iter()
                    .collect(),
                MouseEventKind::Down(MouseButton::Left) => self
                    .geo_at(mouse.column, mouse.row)
                    .map(|(latitude, longitude)| Action::MapClick {
                        latitude,
                        longitude,
                    })
                    .into_iter()
                    .collect(),
                _ => Vec::new(),
            },

            EventKind::Scroll { delta, .. } => {
                let factor = if *delta < 0 { ZOOM_IN } else { ZOOM_OUT };
                vec![Action::MapZoom { factor }]
            }

            EventKind::Resize(_, _) => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let colors = palette(state.layer);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
            .title(format!(" Map · {} ", state.layer.title()))
            .title_style(Style::default().fg(Color::Cyan).bold());
        let inner = block.inner(area);

        let (x_bounds, y_bounds) = Self::bounds(&state.viewport, inner);
        self.inner = Some(inner);
        self.x_bounds = x_bounds;
        self.y_bounds = y_bounds;

        // Owned copies for the paint closure
        let town_coords: Vec<(f64, f64)> = state
            .towns
            .iter()
            .map(|town| (town.longitude, town.latitude))
            .collect();
        let town_labels: Vec<(f64, f64, String)> = if state.viewport.span_lat <= LABEL_MAX_SPAN {
            state
                .towns
                .iter()
                .map(|town| (town.longitude, town.latitude, town.label.clone()))
                .collect()
        } else {
            Vec::new()
        };
        let selection = state.selection.position;
        let hover = state.hover;
        let marker_radius = state.viewport.span_lat / 40.0;

        let canvas = Canvas::default()
            .block(block)
            .marker(symbols::Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(move |ctx| {
                ctx.draw(&Map {
                    color: colors.land,
                    resolution: MapResolution::High,
                });

                ctx.draw(&Points {
                    coords: &town_coords,
                    color: colors.town,
                });
                for (lon, lat, label) in &town_labels {
                    ctx.print(
                        *lon,
                        *lat,
                        Span::styled(label.clone(), Style::default().fg(colors.town)),
                    );
                }

                if let Some((lat, lon)) = selection {
                    ctx.draw(&Circle {
                        x: lon,
                        y: lat,
                        radius: marker_radius,
                        color: colors.marker,
                    });
                    ctx.print(
                        lon,
                        lat,
                        Span::styled(
                            SELECTION_ICON,
                            Style::default().fg(colors.marker).bold(),
                        ),
                    );
                }

                if let Some((lat, lon)) = hover {
                    ctx.print(
                        lon,
                        lat,
                        Span::styled(CURSOR_ICON, Style::default().fg(colors.cursor).bold()),
                    );
                }
            });

        frame.render_widget(canvas, area);
    }
}
