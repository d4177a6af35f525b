//! Collaborators of the map view: query execution, result storage, selection tracking and the
//! notification bus that ties them to the UI thread.

pub mod bus;
pub mod query;
pub mod selection;
pub mod service;
pub mod solr;

pub use bus::{NotificationBus, Subscription, Topic};
pub use query::SearchQuery;
pub use selection::{InMemorySelectionService, SelectionService, SelectionSet};
pub use service::{QueryService, StaticSearchService};
pub use solr::{
    spawn_search_worker, SearchBackend, SearchCommand, SearchEvent, SolrHttpBackend,
    SolrSearchService,
};
