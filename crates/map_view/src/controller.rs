//! Map view controller: rebuilds markers when results change and opens the popup of the
//! selected document.

use search_client::{
    bus::{NotificationBus, Subscription, Topic},
    selection::SelectionService,
    service::QueryService,
};
use shared::{
    domain::{Category, LatLng, LatLngBounds},
    error::SearchFailure,
    protocol::Notification,
};

use crate::{
    config::MapSettings,
    content::info_window_html,
    events::ViewError,
    icons::icon_for,
    marker::{Marker, MarkerKey},
    state::MapViewState,
    widget::{MapWidget, MarkerClusterer},
};

pub struct MapViewController<M, C> {
    map: M,
    clusterer: C,
    settings: MapSettings,
    state: MapViewState,
    subscription: Option<Subscription>,
}

impl<M: MapWidget, C: MarkerClusterer> MapViewController<M, C> {
    pub fn new(map: M, clusterer: C, settings: MapSettings) -> Self {
        Self {
            map,
            clusterer,
            settings,
            state: MapViewState::new(),
            subscription: None,
        }
    }

    /// Subscribes to result and selection notifications, then runs the default query.
    pub fn initialize(&mut self, bus: &NotificationBus, queries: &mut dyn QueryService) {
        self.subscription = Some(bus.subscribe_all(vec![
            Topic::Query(self.settings.query_name.clone()),
            Topic::SelectionSetUpdate,
        ]));
        let default_query = self.settings.default_user_query.clone();
        self.set_user_query(queries, &default_query);
    }

    /// Runs `text` with the location clause and row override merged in. `text` is passed
    /// through unvalidated.
    pub fn set_user_query(&mut self, queries: &mut dyn QueryService, text: &str) {
        let name = self.settings.query_name.clone();
        let query = queries.query_mut(&name);
        // TODO: fetch numFound first and page through results instead of one oversized request.
        query.set_option("rows", self.settings.rows.to_string());
        query.set_user_query(text);
        query.set_user_query_parameters(vec![self.settings.location_filter.clone()]);
        self.state.set_user_query(text);
        tracing::debug!(query = %name, user_query = text, "requesting located results");
        queries.update_query(&name);
    }

    /// Replaces every marker with the current results and moves the viewport.
    pub fn update(&mut self, queries: &dyn QueryService) {
        self.state.begin_cycle();
        self.close_info_window();
        self.clusterer.clear_markers();

        let mut bounds = LatLngBounds::new();
        if let Some(response) = queries.response(&self.settings.query_name) {
            for doc in &response.docs {
                let Some(position) = doc.position() else {
                    continue;
                };
                let content = info_window_html(doc, self.settings.max_field_length);
                let marker = Self::get_marker(
                    self.state.next_key(),
                    doc.title.as_deref(),
                    content,
                    doc.category(),
                    position.lat,
                    position.lng,
                );
                bounds.extend(marker.position());
                self.state.push_marker(doc.id.clone(), marker);
            }
        }
        self.clusterer.add_markers(self.state.markers());
        tracing::debug!(
            markers = self.state.markers().len(),
            generation = self.state.generation(),
            "rebuilt map markers"
        );

        if self.settings.force_start_location {
            let start = LatLng::new(self.settings.start_latitude, self.settings.start_longitude);
            self.map.set_center(start, Some(self.settings.start_zoom));
        } else if !bounds.is_empty() {
            self.map.fit_bounds(&bounds);
        }

        if self.settings.show_messages {
            if let Some(message) = self.state.message().filter(|m| !m.is_empty()) {
                tracing::info!("{message}");
            }
        }
        if self.settings.show_errors {
            if let Some(error) = self.state.error() {
                tracing::error!(category = ?error.category(), "{}", error.summary());
            }
        }
    }

    /// Centers on the first selected document and opens its popup. The popup model holds a
    /// single window, so further selected ids are ignored.
    pub fn select(&mut self, selection: &dyn SelectionService) {
        let Some(id) = selection.selection_set().first() else {
            return;
        };
        let Some(marker) = self.state.marker_for(id) else {
            tracing::debug!(document = %id, "selected document has no marker");
            return;
        };
        let key = marker.key();
        let position = marker.position();

        self.map.set_center(position, None);
        self.map.fit_bounds(&LatLngBounds::from_point(position));
        self.click_marker(key);
    }

    /// Builds a marker for one result; the icon comes from the category.
    pub fn get_marker(
        key: MarkerKey,
        title: Option<&str>,
        content: String,
        category: Category,
        lat: f64,
        lng: f64,
    ) -> Marker {
        Marker::new(
            key,
            title.map(str::to_string),
            icon_for(category),
            LatLng::new(lat, lng),
            content,
        )
    }

    /// Marker click: shows that marker's content in the shared info window.
    /// Returns false for keys from an earlier update.
    pub fn click_marker(&mut self, key: MarkerKey) -> bool {
        let Some(marker) = self.state.marker(key).cloned() else {
            return false;
        };
        self.close_info_window();
        let info_window = self.state.info_window_mut();
        info_window.set_content(marker.popup());
        info_window.open(key);
        self.map.open_info_window(&marker, marker.popup());
        true
    }

    pub fn close_info_window(&mut self) {
        self.state.info_window_mut().close();
        self.map.close_info_window();
    }

    /// Handles every queued notification in publish order. Returns how many were handled.
    pub fn pump(&mut self, queries: &dyn QueryService, selection: &dyn SelectionService) -> usize {
        let notifications: Vec<Notification> = self
            .subscription
            .as_ref()
            .map(Subscription::drain)
            .unwrap_or_default();
        for notification in &notifications {
            match notification {
                Notification::ResultsChanged { .. } => self.update(queries),
                Notification::SelectionSetUpdate => self.select(selection),
            }
        }
        notifications.len()
    }

    pub fn report_search_failure(&mut self, failure: &SearchFailure) {
        let error = ViewError::from_failure(failure);
        tracing::warn!(category = ?error.category(), "search failed: {}", error.message());
        self.state.set_error(error);
    }

    pub fn state(&self) -> &MapViewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MapViewState {
        &mut self.state
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn clusterer(&self) -> &C {
        &self.clusterer
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
