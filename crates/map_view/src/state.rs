//! View-local state owned by the map controller.

use std::collections::HashMap;

use shared::domain::DocumentId;

use crate::{
    events::ViewError,
    marker::{Marker, MarkerKey},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoWindow {
    content: Option<String>,
    anchor: Option<MarkerKey>,
}

impl InfoWindow {
    pub fn close(&mut self) {
        self.anchor = None;
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = Some(content.into());
    }

    pub fn open(&mut self, anchor: MarkerKey) {
        self.anchor = Some(anchor);
    }

    pub fn is_open(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn anchor(&self) -> Option<MarkerKey> {
        self.anchor
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

#[derive(Debug, Default)]
pub struct MapViewState {
    markers: Vec<Marker>,
    id_to_marker: HashMap<DocumentId, MarkerKey>,
    generation: u64,
    info_window: InfoWindow,
    user_query: String,
    message: Option<String>,
    error: Option<ViewError>,
}

impl MapViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every marker and index entry from the previous cycle and returns the new
    /// cycle's generation.
    pub(crate) fn begin_cycle(&mut self) -> u64 {
        self.id_to_marker.clear();
        self.markers.clear();
        self.generation += 1;
        self.generation
    }

    pub(crate) fn next_key(&self) -> MarkerKey {
        MarkerKey::new(self.generation, self.markers.len())
    }

    /// A repeated document id re-points the index at the newest marker.
    pub(crate) fn push_marker(&mut self, id: DocumentId, marker: Marker) {
        self.id_to_marker.insert(id, marker.key());
        self.markers.push(marker);
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, key: MarkerKey) -> Option<&Marker> {
        if key.generation() != self.generation {
            return None;
        }
        self.markers.get(key.index())
    }

    pub fn marker_key_for(&self, id: &DocumentId) -> Option<MarkerKey> {
        self.id_to_marker.get(id).copied()
    }

    pub fn marker_for(&self, id: &DocumentId) -> Option<&Marker> {
        self.marker_key_for(id).and_then(|key| self.marker(key))
    }

    pub fn indexed_ids(&self) -> impl Iterator<Item = &DocumentId> {
        self.id_to_marker.keys()
    }

    pub fn index_len(&self) -> usize {
        self.id_to_marker.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn info_window(&self) -> &InfoWindow {
        &self.info_window
    }

    pub(crate) fn info_window_mut(&mut self) -> &mut InfoWindow {
        &mut self.info_window
    }

    pub fn user_query(&self) -> &str {
        &self.user_query
    }

    pub(crate) fn set_user_query(&mut self, text: &str) {
        self.user_query = text.to_string();
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }

    pub fn set_error(&mut self, error: ViewError) {
        self.error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
