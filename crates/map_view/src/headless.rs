//! Widget and clusterer that keep the view in memory instead of drawing it. Used by the
//! command-line tool and for server-side snapshots of the map.

use shared::domain::{LatLng, LatLngBounds};

use crate::{
    icons::{default_cluster_styles, ClusterStyle},
    marker::{Marker, MarkerKey},
    widget::{MapOptions, MapWidget, MarkerClusterer},
};

const MAX_ZOOM: u8 = 21;

#[derive(Debug, Clone, PartialEq)]
pub enum MapOperation {
    SetCenter { center: LatLng, zoom: Option<u8> },
    FitBounds(LatLngBounds),
    OpenInfoWindow { anchor: MarkerKey },
    CloseInfoWindow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub anchor: MarkerKey,
    pub position: LatLng,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct HeadlessMap {
    options: MapOptions,
    center: LatLng,
    zoom: u8,
    fitted_bounds: Option<LatLngBounds>,
    popup: Option<Popup>,
    operations: Vec<MapOperation>,
}

impl HeadlessMap {
    pub fn new(options: MapOptions) -> Self {
        Self {
            center: options.center,
            zoom: options.zoom,
            options,
            fitted_bounds: None,
            popup: None,
            operations: Vec::new(),
        }
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn fitted_bounds(&self) -> Option<&LatLngBounds> {
        self.fitted_bounds.as_ref()
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn operations(&self) -> &[MapOperation] {
        &self.operations
    }

    pub fn take_operations(&mut self) -> Vec<MapOperation> {
        std::mem::take(&mut self.operations)
    }
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new(MapOptions::default())
    }
}

/// Rough web-mercator zoom at which `bounds` spans a single 256px tile.
fn zoom_for_bounds(bounds: &LatLngBounds) -> u8 {
    let (Some(south_west), Some(north_east)) = (bounds.south_west(), bounds.north_east()) else {
        return 0;
    };
    let span = (north_east.lat - south_west.lat)
        .abs()
        .max((north_east.lng - south_west.lng).abs());
    if span <= f64::EPSILON {
        return MAX_ZOOM;
    }
    (360.0 / span).log2().floor().clamp(0.0, MAX_ZOOM as f64) as u8
}

impl MapWidget for HeadlessMap {
    fn set_center(&mut self, center: LatLng, zoom: Option<u8>) {
        self.center = center;
        if let Some(zoom) = zoom {
            self.zoom = zoom.min(MAX_ZOOM);
        }
        self.operations.push(MapOperation::SetCenter { center, zoom });
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        if let Some(center) = bounds.center() {
            self.center = center;
            self.zoom = zoom_for_bounds(bounds);
        }
        self.fitted_bounds = Some(*bounds);
        self.operations.push(MapOperation::FitBounds(*bounds));
    }

    fn center(&self) -> LatLng {
        self.center
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn open_info_window(&mut self, anchor: &Marker, content: &str) {
        self.popup = Some(Popup {
            anchor: anchor.key(),
            position: anchor.position(),
            content: content.to_string(),
        });
        self.operations.push(MapOperation::OpenInfoWindow {
            anchor: anchor.key(),
        });
    }

    fn close_info_window(&mut self) {
        self.popup = None;
        self.operations.push(MapOperation::CloseInfoWindow);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredMarker {
    pub key: MarkerKey,
    pub position: LatLng,
    pub icon: &'static str,
}

/// Marker registry standing in for a clustering library.
#[derive(Debug, Clone)]
pub struct MarkerLayer {
    styles: Vec<ClusterStyle>,
    registered: Vec<RegisteredMarker>,
    batches: usize,
}

impl MarkerLayer {
    pub fn new(styles: Vec<ClusterStyle>) -> Self {
        Self {
            styles,
            registered: Vec::new(),
            batches: 0,
        }
    }

    pub fn styles(&self) -> &[ClusterStyle] {
        &self.styles
    }

    pub fn registered(&self) -> &[RegisteredMarker] {
        &self.registered
    }

    /// Number of `add_markers` calls seen so far.
    pub fn batches(&self) -> usize {
        self.batches
    }
}

impl Default for MarkerLayer {
    fn default() -> Self {
        Self::new(default_cluster_styles())
    }
}

impl MarkerClusterer for MarkerLayer {
    fn add_markers(&mut self, markers: &[Marker]) {
        self.registered
            .extend(markers.iter().map(|marker| RegisteredMarker {
                key: marker.key(),
                position: marker.position(),
                icon: marker.icon(),
            }));
        self.batches += 1;
    }

    fn clear_markers(&mut self) {
        self.registered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_bounds_centers_and_zooms_to_the_span() {
        let mut map = HeadlessMap::default();
        let mut bounds = LatLngBounds::new();
        bounds.extend(LatLng::new(-10.0, 110.0));
        bounds.extend(LatLng::new(-40.0, 160.0));

        map.fit_bounds(&bounds);

        assert_eq!(map.center(), LatLng::new(-25.0, 135.0));
        assert_eq!(map.zoom(), 2);
        assert_eq!(map.fitted_bounds(), Some(&bounds));
    }

    #[test]
    fn single_point_bounds_zoom_all_the_way_in() {
        let mut map = HeadlessMap::default();
        map.fit_bounds(&LatLngBounds::from_point(LatLng::new(-33.87, 151.21)));
        assert_eq!(map.zoom(), MAX_ZOOM);
    }

    #[test]
    fn set_center_without_zoom_keeps_current_zoom() {
        let mut map = HeadlessMap::default();
        map.set_center(LatLng::new(0.0, 0.0), None);
        assert_eq!(map.zoom(), 5);
        map.set_center(LatLng::new(0.0, 0.0), Some(8));
        assert_eq!(map.zoom(), 8);
        assert_eq!(map.take_operations().len(), 2);
        assert!(map.operations().is_empty());
    }
}
