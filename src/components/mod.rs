pub mod help_bar;
pub mod map_view;
pub mod search_overlay;
pub mod select_list;
pub mod text_input;
pub mod weather_panel;

// Re-export the Component trait next to the components themselves
pub use crate::dispatch::Component;

pub use help_bar::{HelpBar, HelpBarProps};
pub use map_view::{MapView, MapViewProps};
pub use search_overlay::{SearchOverlay, SearchOverlayProps};
pub use select_list::{SelectList, SelectListProps};
pub use text_input::{TextInput, TextInputProps};
pub use weather_panel::{WeatherPanel, WeatherPanelProps, PLACEHOLDER_LABEL};
