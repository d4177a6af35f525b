//! Seams to the map widget library. The controller only talks to these traits.

use shared::domain::{LatLng, LatLngBounds};

use crate::marker::Marker;

pub trait MapWidget {
    /// Moves the viewport; `zoom` of `None` keeps the current zoom level.
    fn set_center(&mut self, center: LatLng, zoom: Option<u8>);
    fn fit_bounds(&mut self, bounds: &LatLngBounds);
    fn center(&self) -> LatLng;
    fn zoom(&self) -> u8;
    fn open_info_window(&mut self, anchor: &Marker, content: &str);
    fn close_info_window(&mut self);
}

/// Groups nearby markers at low zoom. Receives borrowed markers and keeps only what it
/// needs to draw them.
pub trait MarkerClusterer {
    fn add_markers(&mut self, markers: &[Marker]);
    fn clear_markers(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapTypeId {
    Roadmap,
    Satellite,
    Hybrid,
    Terrain,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: u8,
    pub map_type: MapTypeId,
    pub map_type_control: bool,
    pub navigation_control: bool,
    pub overview_map_control: bool,
    pub pan_control: bool,
    pub rotate_control: bool,
    pub scale_control: bool,
    pub street_view_control: bool,
    pub zoom_control: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: LatLng::new(-32.3456, 141.4346),
            zoom: 5,
            map_type: MapTypeId::Terrain,
            map_type_control: false,
            navigation_control: true,
            overview_map_control: false,
            pan_control: true,
            rotate_control: true,
            scale_control: true,
            street_view_control: false,
            zoom_control: true,
        }
    }
}
