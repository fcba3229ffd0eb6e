//! weathermap - interactive map + weather TUI
//!
//! Wiring:
//! - `Runtime` owns the store, the fetch coordinator, and subscriptions
//! - `AppUi` composes the map, the weather panel, and the search overlay
//! - `handle_effect` turns reducer effects into coordinator tasks

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{backend::CrosstermBackend, layout::{Constraint, Layout, Rect}, Frame, Terminal};
use tracing_subscriber::EnvFilter;

use tui_weathermap::action::Action;
use tui_weathermap::api::{GeoWeatherClient, Observation, ProviderConfig};
use tui_weathermap::components::{
    Component, HelpBar, HelpBarProps, MapView, MapViewProps, SearchOverlay, SearchOverlayProps,
    WeatherPanel, WeatherPanelProps,
};
use tui_weathermap::dispatch::{
    EffectContext, EventKind, EventOutcome, Runtime, SEARCH_TASK, WEATHER_TASK,
};
use tui_weathermap::effect::{Effect, FetchTag};
use tui_weathermap::reducer::reducer;
use tui_weathermap::state::{
    AppState, LocationSource, HOVER_DEBOUNCE_MS, SEARCH_DEBOUNCE_MS, TICK_MS,
};

/// Interactive town map with hover/click/search weather lookups
#[derive(Parser, Debug)]
#[command(name = "weathermap")]
#[command(about = "Terminal map and weather explorer")]
struct Args {
    /// Weather provider API key (without one, readings fall back to a
    /// fixed placeholder)
    #[arg(long, env = "OPENWEATHER_API_KEY")]
    api_key: Option<String>,

    /// Resolve searches against the remote geocoder instead of the fixed
    /// town list
    #[arg(long)]
    live_search: bool,

    /// Auto-refresh interval for the selected location, in seconds
    /// (0 disables)
    #[arg(long, short, default_value = "300")]
    refresh_interval: u64,

    /// Append logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let file = std::fs::File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .init();
    }

    if args.api_key.is_none() {
        eprintln!(
            "Warning: no API key configured (--api-key or OPENWEATHER_API_KEY); \
             weather readings will use the built-in fallback."
        );
    }

    let client = match GeoWeatherClient::new(ProviderConfig::new(args.api_key.clone())) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Error: could not initialize the HTTP client.");
            eprintln!("Details: {}", e);
            std::process::exit(1);
        }
    };

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, client, &args).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Composes the screen: map on the left, weather panel on the right, key
/// hints at the bottom, search overlay on top when open.
struct AppUi {
    map: MapView,
    panel: WeatherPanel,
    search: SearchOverlay,
    help: HelpBar,
}

impl AppUi {
    fn new() -> Self {
        Self {
            map: MapView::new(),
            panel: WeatherPanel,
            search: SearchOverlay::new(),
            help: HelpBar,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let rows = Layout::vertical([
            Constraint::Min(1),    // Map + panel
            Constraint::Length(1), // Help bar
        ])
        .split(area);
        let columns = Layout::horizontal([
            Constraint::Min(20),    // Map
            Constraint::Length(34), // Weather panel
        ])
        .split(rows[0]);

        self.map.render(
            frame,
            columns[0],
            MapViewProps {
                state,
                is_focused: !state.search.open,
            },
        );
        self.panel
            .render(frame, columns[1], WeatherPanelProps { state });
        self.help.render(frame, rows[1], HelpBarProps);

        self.search.set_open(state.search.open);
        if state.search.open {
            let props = SearchOverlayProps {
                query: &state.search.query,
                results: &state.search.results,
                selected: state.search.selected,
                is_focused: true,
                on_query_change: Action::SearchQueryChange,
                on_query_submit: Action::SearchQuerySubmit,
                on_select: Action::SearchSelect,
            };
            self.search.render(frame, area, props);
        }
    }

    fn map_event(&mut self, event: &EventKind, state: &AppState) -> EventOutcome {
        if let EventKind::Resize(width, height) = event {
            return EventOutcome::action(Action::UiTerminalResize(*width, *height)).with_render();
        }

        if let EventKind::Key(key) = event {
            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
            {
                return EventOutcome::action(Action::Quit);
            }
        }

        if state.search.open {
            let props = SearchOverlayProps {
                query: &state.search.query,
                results: &state.search.results,
                selected: state.search.selected,
                is_focused: true,
                on_query_change: Action::SearchQueryChange,
                on_query_submit: Action::SearchQuerySubmit,
                on_select: Action::SearchSelect,
            };
            return EventOutcome::from_actions(self.search.handle_event(event, props));
        }

        let props = MapViewProps {
            state,
            is_focused: true,
        };
        EventOutcome::from_actions(self.map.handle_event(event, props))
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    client: Arc<GeoWeatherClient>,
    args: &Args,
) -> io::Result<()> {
    let source = if args.live_search {
        LocationSource::Live
    } else {
        LocationSource::Fixed
    };

    let mut runtime = Runtime::new(AppState::new(source), reducer);

    // Spinner + camera pan animation
    runtime
        .subscriptions()
        .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);

    // Periodic re-fetch of whatever is selected
    if args.refresh_interval > 0 {
        runtime.subscriptions().interval(
            "refresh",
            Duration::from_secs(args.refresh_interval),
            || Action::WeatherRefresh,
        );
    }

    let ui = RefCell::new(AppUi::new());

    runtime
        .run(
            terminal,
            |frame, area, state| {
                ui.borrow_mut().render(frame, area, state);
            },
            |event, state| ui.borrow_mut().map_event(event, state),
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &client),
        )
        .await
}

fn did_load(observation: Observation, label: Option<String>, tag: FetchTag, latitude: f64, longitude: f64) -> Action {
    Action::WeatherDidLoad {
        snapshot: observation.snapshot,
        place_name: observation.place_name,
        label,
        tag,
        latitude,
        longitude,
    }
}

/// Turn reducer effects into coordinator tasks. Debounced and immediate
/// weather fetches share the WEATHER_TASK slot, so an immediate fetch
/// always cancels a pending hover fetch.
fn handle_effect(effect: Effect, ctx: &mut EffectContext, client: &Arc<GeoWeatherClient>) {
    match effect {
        Effect::FetchWeather {
            latitude,
            longitude,
            label,
            tag,
        } => {
            let client = client.clone();
            ctx.tasks().spawn(WEATHER_TASK, async move {
                let observation = client.fetch_weather(latitude, longitude).await;
                did_load(observation, label, tag, latitude, longitude)
            });
        }

        Effect::ScheduleHoverFetch {
            latitude,
            longitude,
            label,
        } => {
            let client = client.clone();
            ctx.tasks().debounce(
                WEATHER_TASK,
                Duration::from_millis(HOVER_DEBOUNCE_MS),
                async move {
                    let observation = client.fetch_weather(latitude, longitude).await;
                    did_load(observation, label, FetchTag::Hover, latitude, longitude)
                },
            );
        }

        Effect::SearchPlaces { query, immediate } => {
            let query = query.trim().to_string();
            if query.is_empty() {
                ctx.tasks().cancel(SEARCH_TASK);
                return;
            }
            let client = client.clone();
            let fetch = async move { Action::SearchDidLoad(client.search_places(&query).await) };
            if immediate {
                ctx.tasks().spawn(SEARCH_TASK, fetch);
            } else {
                ctx.tasks()
                    .debounce(SEARCH_TASK, Duration::from_millis(SEARCH_DEBOUNCE_MS), fetch);
            }
        }
    }
}
