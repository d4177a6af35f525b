//! Map view layer: binds search results to clustered map markers and selection to popups.

pub mod config;
pub mod content;
pub mod controller;
pub mod events;
pub mod headless;
pub mod icons;
pub mod marker;
pub mod state;
pub mod utils;
pub mod widget;

pub use config::{load_settings, load_settings_from, MapSettings};
pub use controller::MapViewController;
pub use headless::{HeadlessMap, MapOperation, MarkerLayer};
pub use marker::{Marker, MarkerKey};
pub use widget::{MapOptions, MapWidget, MarkerClusterer};
