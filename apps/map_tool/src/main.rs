use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use map_view::{
    load_settings, load_settings_from, HeadlessMap, MapOptions, MapSettings, MapViewController,
    MapWidget, MarkerLayer,
};
use search_client::{
    InMemorySelectionService, NotificationBus, SolrHttpBackend, SolrSearchService,
    StaticSearchService,
};
use serde::Serialize;
use shared::domain::LatLng;
use tracing_subscriber::EnvFilter;

type Controller = MapViewController<HeadlessMap, MarkerLayer>;

#[derive(Parser, Debug)]
#[command(about = "Place search results on a headless map and print the view")]
struct Cli {
    /// Settings file; defaults to ./map.toml plus APP__* overrides.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// User query to run after the default one.
    #[arg(long, global = true)]
    query: Option<String>,
    /// Document id to select once results are shown.
    #[arg(long, global = true)]
    select: Option<String>,
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read results from a saved search response.
    File { results: PathBuf },
    /// Query a live Solr core.
    Solr {
        url: Option<String>,
        #[arg(long, default_value_t = 30)]
        wait_secs: u64,
    },
}

#[derive(Serialize)]
struct MarkerRow<'a> {
    title: Option<&'a str>,
    icon: &'a str,
    position: LatLng,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    user_query: &'a str,
    center: LatLng,
    zoom: u8,
    markers: Vec<MarkerRow<'a>>,
    popup: Option<&'a str>,
    error: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => load_settings_from(path)?,
        None => load_settings(),
    };
    tracing::debug!(
        query = %settings.query_name,
        force_start_location = settings.force_start_location,
        "loaded map settings"
    );

    let bus = NotificationBus::new();
    let mut selection = InMemorySelectionService::new(bus.clone()).with_single_selection(true);
    let mut controller = MapViewController::new(
        HeadlessMap::new(MapOptions::default()),
        MarkerLayer::default(),
        settings.clone(),
    );

    match &cli.command {
        Command::File { results } => {
            let raw = fs::read_to_string(results)
                .with_context(|| format!("failed to read results file '{}'", results.display()))?;
            let mut queries = StaticSearchService::from_json(bus.clone(), &raw)
                .with_context(|| format!("failed to parse results file '{}'", results.display()))?;

            controller.initialize(&bus, &mut queries);
            if let Some(text) = &cli.query {
                controller.set_user_query(&mut queries, text);
            }
            controller.pump(&queries, &selection);

            if let Some(id) = &cli.select {
                selection.select(id.as_str());
                controller.pump(&queries, &selection);
            }
        }
        Command::Solr { url, wait_secs } => {
            let url = url
                .clone()
                .or_else(|| settings.solr_url.clone())
                .context("no Solr core url given; pass one or set APP__SOLR_URL")?;
            let backend =
                SolrHttpBackend::new(&url, Duration::from_secs(settings.request_timeout_secs))?;
            let mut queries = SolrSearchService::new(Arc::new(backend), bus.clone());

            controller.initialize(&bus, &mut queries);
            let mut expected = 1;
            if let Some(text) = &cli.query {
                controller.set_user_query(&mut queries, text);
                expected += 1;
            }
            wait_for_results(
                &mut controller,
                &mut queries,
                expected,
                Duration::from_secs(*wait_secs),
            )?;
            controller.pump(&queries, &selection);

            if let Some(id) = &cli.select {
                selection.select(id.as_str());
                controller.pump(&queries, &selection);
            }
        }
    }

    print_snapshot(&controller, &settings, cli.json)
}

/// Blocks until `expected` search requests have finished or `wait` elapses.
fn wait_for_results(
    controller: &mut Controller,
    queries: &mut SolrSearchService,
    expected: usize,
    wait: Duration,
) -> Result<()> {
    let deadline = Instant::now() + wait;
    let mut finished = 0;
    while finished < expected {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let arrived = !remaining.is_zero() && queries.wait_for_event(remaining);
        let failures = queries.poll_events();
        for failure in &failures {
            controller.report_search_failure(failure);
        }
        if arrived {
            finished += 1;
        } else if !failures.is_empty() {
            break;
        } else {
            bail!("timed out after {wait:?} waiting for search results");
        }
    }
    Ok(())
}

fn print_snapshot(controller: &Controller, settings: &MapSettings, json: bool) -> Result<()> {
    let state = controller.state();
    let map = controller.map();
    let snapshot = Snapshot {
        user_query: state.user_query(),
        center: map.center(),
        zoom: map.zoom(),
        markers: state
            .markers()
            .iter()
            .map(|marker| MarkerRow {
                title: marker.title(),
                icon: marker.icon(),
                position: marker.position(),
            })
            .collect(),
        popup: map.popup().map(|popup| popup.content.as_str()),
        error: state
            .error()
            .filter(|_| settings.show_errors)
            .map(|error| error.summary()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("query: {}", snapshot.user_query);
    println!(
        "view: center=({:.4}, {:.4}) zoom={}",
        snapshot.center.lat, snapshot.center.lng, snapshot.zoom
    );
    println!("markers: {}", snapshot.markers.len());
    for row in &snapshot.markers {
        println!(
            "  ({:.4}, {:.4}) {} [{}]",
            row.position.lat,
            row.position.lng,
            row.title.unwrap_or("(untitled)"),
            row.icon
        );
    }
    if let Some(popup) = snapshot.popup {
        println!("popup: {popup}");
    }
    if let Some(error) = &snapshot.error {
        println!("error: {error}");
    }
    Ok(())
}
