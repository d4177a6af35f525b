use map_view::{
    icons::{CORPORATE_BODY_ICON, DEFAULT_ICON, PERSON_ICON},
    HeadlessMap, MapSettings, MapViewController, MapWidget, MarkerLayer,
};
use search_client::{InMemorySelectionService, NotificationBus, StaticSearchService};
use shared::domain::{DocumentId, LatLng};

fn fixture() -> String {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/results.json");
    std::fs::read_to_string(path).expect("fixture")
}

#[test]
fn saved_results_render_to_markers_and_selection_opens_popup() {
    let bus = NotificationBus::new();
    let mut queries = StaticSearchService::from_json(bus.clone(), &fixture()).expect("results");
    let mut selection = InMemorySelectionService::new(bus.clone()).with_single_selection(true);
    let mut controller = MapViewController::new(
        HeadlessMap::default(),
        MarkerLayer::default(),
        MapSettings::default(),
    );

    controller.initialize(&bus, &mut queries);
    assert_eq!(controller.pump(&queries, &selection), 1);

    let icons: Vec<&str> = controller
        .state()
        .markers()
        .iter()
        .map(|marker| marker.icon())
        .collect();
    assert_eq!(
        icons,
        vec![CORPORATE_BODY_ICON, PERSON_ICON, CORPORATE_BODY_ICON, DEFAULT_ICON]
    );
    assert!(controller
        .state()
        .marker_for(&DocumentId::from("E000104"))
        .is_none());

    selection.select("E000102");
    assert_eq!(controller.pump(&queries, &selection), 1);

    let popup = controller.map().popup().expect("popup");
    assert_eq!(popup.position, LatLng::new(-37.8303, 144.9796));
    assert!(popup.content.contains("<div class='existdates'>1825 - 1896</div>"));
    assert_eq!(controller.map().center(), LatLng::new(-37.8303, 144.9796));

    controller.set_user_query(&mut queries, "river");
    assert_eq!(controller.pump(&queries, &selection), 1);

    let titles: Vec<Option<&str>> = controller
        .state()
        .markers()
        .iter()
        .map(|marker| marker.title())
        .collect();
    assert_eq!(
        titles,
        vec![Some("River Murray Commission"), Some("Swan River Colony Survey")]
    );
    assert!(controller.map().popup().is_none());
}
