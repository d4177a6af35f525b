use std::collections::HashMap;

use super::*;
use crate::{
    headless::{HeadlessMap, MapOperation, MarkerLayer},
    icons::{CORPORATE_BODY_ICON, DEFAULT_ICON, PERSON_ICON},
    widget::MapOptions,
};
use search_client::{
    query::SearchQuery,
    selection::InMemorySelectionService,
    service::StaticSearchService,
};
use shared::{
    domain::DocumentId,
    error::FailureKind,
    protocol::{ResultDocument, SearchResponse},
};

type TestController = MapViewController<HeadlessMap, MarkerLayer>;

/// Query service that ignores the query and always answers with the same documents.
#[derive(Default)]
struct FixedResults {
    queries: HashMap<String, SearchQuery>,
    response: SearchResponse,
    updates: Vec<String>,
}

impl FixedResults {
    fn with_docs(docs: Vec<ResultDocument>) -> Self {
        Self {
            response: SearchResponse {
                num_found: docs.len() as u64,
                start: 0,
                docs,
            },
            ..Default::default()
        }
    }
}

impl QueryService for FixedResults {
    fn query(&self, name: &str) -> Option<&SearchQuery> {
        self.queries.get(name)
    }

    fn query_mut(&mut self, name: &str) -> &mut SearchQuery {
        self.queries.entry(name.to_string()).or_default()
    }

    fn update_query(&mut self, name: &str) {
        self.updates.push(name.to_string());
    }

    fn response(&self, name: &str) -> Option<&SearchResponse> {
        (name == "defaultQuery").then_some(&self.response)
    }
}

fn doc(id: &str, kind: Option<&str>, lat: Option<f64>, lng: Option<f64>) -> ResultDocument {
    ResultDocument {
        id: DocumentId::from(id),
        title: Some(format!("Entity {id}")),
        abstract_text: Some("Summary text".to_string()),
        doc_type: kind.map(str::to_string),
        location_0_coordinate: lat,
        location_1_coordinate: lng,
        referrer_uri: Some(format!("http://example.org/{id}")),
        ..Default::default()
    }
}

fn sample_docs() -> Vec<ResultDocument> {
    vec![
        doc("E1", Some("corporateBody"), Some(-33.87), Some(151.21)),
        doc("E2", Some("person"), Some(-37.81), Some(144.96)),
        doc("E3", None, None, None),
        doc("E4", Some("government"), Some(-27.47), None),
        doc("E5", Some("family"), None, Some(153.02)),
        doc("E6", Some("family"), Some(-31.95), Some(115.86)),
    ]
}

fn controller() -> TestController {
    controller_with(MapSettings::default())
}

fn controller_with(settings: MapSettings) -> TestController {
    MapViewController::new(HeadlessMap::default(), MarkerLayer::default(), settings)
}

fn ids(controller: &TestController) -> Vec<String> {
    let mut ids: Vec<String> = controller
        .state()
        .indexed_ids()
        .map(|id| id.as_str().to_string())
        .collect();
    ids.sort();
    ids
}

#[test]
fn creates_markers_only_for_documents_with_both_coordinates() {
    let queries = FixedResults::with_docs(sample_docs());
    let mut controller = controller();

    controller.update(&queries);

    let markers = controller.state().markers();
    assert_eq!(markers.len(), 3);
    assert_eq!(controller.clusterer().registered().len(), 3);
    assert_eq!(controller.clusterer().batches(), 1);
    assert_eq!(markers[0].icon(), CORPORATE_BODY_ICON);
    assert_eq!(markers[1].icon(), PERSON_ICON);
    assert_eq!(markers[2].icon(), DEFAULT_ICON);
    assert_eq!(markers[0].title(), Some("Entity E1"));
    assert!(markers[0]
        .popup()
        .contains("<a href='http://example.org/E1'>Entity E1</a>"));
}

#[test]
fn index_holds_one_entry_per_marker_keyed_by_document_id() {
    let queries = FixedResults::with_docs(sample_docs());
    let mut controller = controller();

    controller.update(&queries);

    assert_eq!(controller.state().index_len(), controller.state().markers().len());
    assert_eq!(ids(&controller), vec!["E1", "E2", "E6"]);
    let marker = controller
        .state()
        .marker_for(&DocumentId::from("E2"))
        .expect("marker for E2");
    assert_eq!(marker.position(), LatLng::new(-37.81, 144.96));
}

#[test]
fn update_fits_viewport_to_result_bounds() {
    let queries = FixedResults::with_docs(sample_docs());
    let mut controller = controller();

    controller.update(&queries);

    let bounds = controller.map().fitted_bounds().expect("fitted bounds");
    assert_eq!(bounds.south_west(), Some(LatLng::new(-37.81, 115.86)));
    assert_eq!(bounds.north_east(), Some(LatLng::new(-31.95, 151.21)));
    assert!(!controller
        .map()
        .operations()
        .iter()
        .any(|op| matches!(op, MapOperation::SetCenter { .. })));
}

#[test]
fn forced_start_location_overrides_result_bounds() {
    let settings = MapSettings {
        force_start_location: true,
        start_latitude: -27.47,
        start_longitude: 153.02,
        ..MapSettings::default()
    };
    let queries = FixedResults::with_docs(sample_docs());
    let mut controller = controller_with(settings);

    controller.update(&queries);

    assert_eq!(controller.map().center(), LatLng::new(-27.47, 153.02));
    assert_eq!(controller.map().zoom(), 8);
    assert!(controller.map().fitted_bounds().is_none());
    assert_eq!(controller.state().markers().len(), 3);
}

#[test]
fn empty_results_leave_the_viewport_alone() {
    let queries = FixedResults::with_docs(vec![doc("E3", None, None, None)]);
    let mut controller = controller();

    controller.update(&queries);

    assert!(controller.state().markers().is_empty());
    assert!(controller.map().fitted_bounds().is_none());
    assert_eq!(controller.map().center(), MapOptions::default().center);
}

#[test]
fn update_discards_previous_markers_and_popup() {
    let mut queries = FixedResults::with_docs(sample_docs());
    let mut controller = controller();
    controller.update(&queries);
    let stale_key = controller.state().markers()[0].key();
    assert!(controller.click_marker(stale_key));
    assert!(controller.map().popup().is_some());

    queries.response.docs.truncate(1);
    controller.update(&queries);

    assert_eq!(controller.state().markers().len(), 1);
    assert_eq!(controller.clusterer().registered().len(), 1);
    assert_eq!(controller.clusterer().batches(), 2);
    assert!(controller.map().popup().is_none());
    assert!(!controller.state().info_window().is_open());
    assert!(!controller.click_marker(stale_key));
    assert_eq!(ids(&controller), vec!["E1"]);
}

#[test]
fn select_with_empty_selection_is_a_no_op() {
    let bus = NotificationBus::new();
    let selection = InMemorySelectionService::new(bus);
    let queries = FixedResults::with_docs(sample_docs());
    let mut controller = controller();
    controller.update(&queries);
    let map_ops_before = controller.map().operations().len();

    controller.select(&selection);

    assert_eq!(controller.map().operations().len(), map_ops_before);
    assert!(controller.map().popup().is_none());
}

#[test]
fn select_with_unknown_ids_is_a_no_op() {
    let bus = NotificationBus::new();
    let mut selection = InMemorySelectionService::new(bus);
    selection.add("E3");
    selection.add("E1");
    let queries = FixedResults::with_docs(sample_docs());
    let mut controller = controller();
    controller.update(&queries);
    let map_ops_before = controller.map().operations().len();

    // E3 has no coordinates; only the first selected id is considered.
    controller.select(&selection);

    assert_eq!(controller.map().operations().len(), map_ops_before);
    assert!(!controller.state().info_window().is_open());
}

#[test]
fn select_centers_on_marker_and_opens_its_popup() {
    let bus = NotificationBus::new();
    let mut selection = InMemorySelectionService::new(bus);
    selection.add("E2");
    selection.add("E1");
    let queries = FixedResults::with_docs(sample_docs());
    let mut controller = controller();
    controller.update(&queries);
    let marker = controller
        .state()
        .marker_for(&DocumentId::from("E2"))
        .cloned()
        .expect("marker for E2");

    controller.select(&selection);

    let map = controller.map();
    assert_eq!(map.center(), marker.position());
    assert_eq!(
        map.fitted_bounds().and_then(|bounds| bounds.center()),
        Some(marker.position())
    );
    let popup = map.popup().expect("popup");
    assert_eq!(popup.anchor, marker.key());
    assert_eq!(popup.content, marker.popup());
    let info_window = controller.state().info_window();
    assert_eq!(info_window.anchor(), Some(marker.key()));
    assert_eq!(info_window.content(), Some(marker.popup()));
}

#[test]
fn set_user_query_merges_rows_and_location_filter_idempotently() {
    let mut queries = FixedResults::default();
    let mut controller = controller();

    controller.set_user_query(&mut queries, "foo");
    let first = queries.query("defaultQuery").cloned().expect("query");
    controller.set_user_query(&mut queries, "foo");
    let second = queries.query("defaultQuery").cloned().expect("query");

    assert_eq!(first, second);
    assert_eq!(second.option("rows"), Some("5000"));
    assert_eq!(second.user_query(), "foo");
    assert_eq!(
        second.user_query_parameters(),
        ["+location_0_coordinate:[* TO *]".to_string()]
    );
    assert_eq!(queries.updates, vec!["defaultQuery", "defaultQuery"]);
    assert_eq!(controller.state().user_query(), "foo");
}

#[test]
fn initialize_runs_default_query_and_pump_drives_update_then_select() {
    let bus = NotificationBus::new();
    let mut queries = StaticSearchService::new(bus.clone(), sample_docs());
    let mut selection = InMemorySelectionService::new(bus.clone());
    let mut controller = controller();

    controller.initialize(&bus, &mut queries);
    let query = queries.query("defaultQuery").expect("default query");
    assert_eq!(query.user_query(), "*:*");
    assert!(query.requires_location());

    selection.select("E6");
    assert_eq!(controller.pump(&queries, &selection), 2);

    assert_eq!(controller.state().markers().len(), 3);
    let popup = controller.map().popup().expect("popup");
    assert_eq!(popup.position, LatLng::new(-31.95, 115.86));
    assert_eq!(controller.pump(&queries, &selection), 0);
}

#[test]
fn results_arriving_after_a_selection_close_its_popup() {
    let bus = NotificationBus::new();
    let mut queries = StaticSearchService::new(bus.clone(), sample_docs());
    let mut selection = InMemorySelectionService::new(bus.clone());
    let mut controller = controller();
    controller.initialize(&bus, &mut queries);
    controller.pump(&queries, &selection);

    selection.select("E6");
    queries.update_query("defaultQuery");
    assert_eq!(controller.pump(&queries, &selection), 2);

    assert_eq!(controller.state().markers().len(), 3);
    assert!(controller.map().popup().is_none());
    assert!(!controller.state().info_window().is_open());
}

#[test]
fn notifications_for_other_queries_are_ignored() {
    let bus = NotificationBus::new();
    let mut queries = StaticSearchService::new(bus.clone(), sample_docs());
    let selection = InMemorySelectionService::new(bus.clone());
    let mut controller = controller();
    controller.initialize(&bus, &mut queries);
    controller.pump(&queries, &selection);

    queries.update_query("facetQuery");

    assert_eq!(controller.pump(&queries, &selection), 0);
}

#[test]
fn search_failures_are_kept_in_view_state() {
    let mut controller = controller();
    controller.report_search_failure(&SearchFailure::new(
        FailureKind::Transport,
        "search transport error: connection refused",
    ));

    let error = controller.state().error().expect("error");
    assert_eq!(error.message(), "search transport error: connection refused");

    controller.update(&FixedResults::default());
    assert!(controller.state().error().is_some());
    controller.state_mut().clear_error();
    assert!(controller.state().error().is_none());
}
