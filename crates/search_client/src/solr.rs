//! Solr-backed query service. The UI side owns a [`SolrSearchService`]; requests run on a
//! dedicated worker thread and come back as [`SearchEvent`]s.

use std::{
    collections::HashMap,
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

use async_trait::async_trait;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use reqwest::Client;
use shared::{
    error::{SearchError, SearchFailure},
    protocol::{Notification, SearchEnvelope, SearchResponse},
};
use url::Url;

use crate::{bus::NotificationBus, query::SearchQuery, service::QueryService};

const COMMAND_QUEUE_DEPTH: usize = 64;
const EVENT_QUEUE_DEPTH: usize = 256;

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn execute(&self, params: &[(String, String)]) -> Result<SearchResponse, SearchError>;
}

pub struct SolrHttpBackend {
    http: Client,
    select_url: Url,
}

impl SolrHttpBackend {
    /// `core_url` points at a Solr core, e.g. `http://localhost:8983/solr/eac`.
    pub fn new(core_url: &str, timeout: Duration) -> Result<Self, SearchError> {
        let mut base = Url::parse(core_url.trim())
            .map_err(|err| SearchError::Transport(format!("invalid core url '{core_url}': {err}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let select_url = base
            .join("select")
            .map_err(|err| SearchError::Transport(format!("invalid core url '{core_url}': {err}")))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SearchError::Transport(err.to_string()))?;
        Ok(Self { http, select_url })
    }

    pub fn request_url(&self, params: &[(String, String)]) -> Url {
        let mut url = self.select_url.clone();
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(key, value)| (key.as_str(), value.as_str())));
        url
    }
}

#[async_trait]
impl SearchBackend for SolrHttpBackend {
    async fn execute(&self, params: &[(String, String)]) -> Result<SearchResponse, SearchError> {
        let url = self.request_url(params);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| SearchError::Transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| SearchError::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let envelope: SearchEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.response)
    }
}

pub enum SearchCommand {
    Execute {
        query_name: String,
        params: Vec<(String, String)>,
    },
}

#[derive(Debug)]
pub enum SearchEvent {
    ResponseReady {
        query_name: String,
        response: SearchResponse,
    },
    Failed {
        query_name: String,
        failure: SearchFailure,
    },
}

/// Runs queued commands in arrival order until every command sender is dropped.
pub fn spawn_search_worker(
    backend: Arc<dyn SearchBackend>,
    cmd_rx: Receiver<SearchCommand>,
    event_tx: Sender<SearchEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build search worker runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    SearchCommand::Execute { query_name, params } => {
                        let event = match backend.execute(&params).await {
                            Ok(response) => SearchEvent::ResponseReady {
                                query_name,
                                response,
                            },
                            Err(err) => {
                                tracing::warn!(query = %query_name, "search request failed: {err}");
                                SearchEvent::Failed {
                                    query_name,
                                    failure: err.into(),
                                }
                            }
                        };
                        if event_tx.send(event).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("search worker stopped");
        });
    })
}

pub struct SolrSearchService {
    queries: HashMap<String, SearchQuery>,
    responses: HashMap<String, SearchResponse>,
    cmd_tx: Sender<SearchCommand>,
    event_rx: Receiver<SearchEvent>,
    bus: NotificationBus,
    pending_failures: Vec<SearchFailure>,
}

impl SolrSearchService {
    pub fn new(backend: Arc<dyn SearchBackend>, bus: NotificationBus) -> Self {
        let (cmd_tx, cmd_rx) = bounded(COMMAND_QUEUE_DEPTH);
        let (event_tx, event_rx) = bounded(EVENT_QUEUE_DEPTH);
        spawn_search_worker(backend, cmd_rx, event_tx);
        Self {
            queries: HashMap::new(),
            responses: HashMap::new(),
            cmd_tx,
            event_rx,
            bus,
            pending_failures: Vec::new(),
        }
    }

    /// Applies every finished request without blocking. Returns the failures seen since the
    /// previous poll; successful responses are announced on the bus instead.
    pub fn poll_events(&mut self) -> Vec<SearchFailure> {
        while let Ok(event) = self.event_rx.try_recv() {
            self.apply(event);
        }
        std::mem::take(&mut self.pending_failures)
    }

    /// Waits up to `timeout` for the next finished request, then drains the rest.
    /// Returns false if nothing arrived in time.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => {
                self.apply(event);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                self.pending_failures.push(SearchError::WorkerDisconnected.into());
                false
            }
        }
    }

    fn apply(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::ResponseReady {
                query_name,
                response,
            } => {
                tracing::debug!(
                    query = %query_name,
                    returned = response.docs.len(),
                    "search response ready"
                );
                self.responses.insert(query_name.clone(), response);
                self.bus
                    .publish(Notification::ResultsChanged { query_name });
            }
            SearchEvent::Failed { failure, .. } => self.pending_failures.push(failure),
        }
    }
}

impl QueryService for SolrSearchService {
    fn query(&self, name: &str) -> Option<&SearchQuery> {
        self.queries.get(name)
    }

    fn query_mut(&mut self, name: &str) -> &mut SearchQuery {
        self.queries.entry(name.to_string()).or_default()
    }

    fn update_query(&mut self, name: &str) {
        let params = self.queries.get(name).cloned().unwrap_or_default().to_params();
        let cmd = SearchCommand::Execute {
            query_name: name.to_string(),
            params,
        };
        match self.cmd_tx.try_send(cmd) {
            Ok(()) => tracing::debug!(query = name, "queued search request"),
            Err(TrySendError::Full(_)) => {
                tracing::warn!(query = name, "search command queue is full");
                self.pending_failures.push(SearchError::QueueFull.into());
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::warn!(query = name, "search worker disconnected");
                self.pending_failures
                    .push(SearchError::WorkerDisconnected.into());
            }
        }
    }

    fn response(&self, name: &str) -> Option<&SearchResponse> {
        self.responses.get(name)
    }
}

#[cfg(test)]
#[path = "tests/solr_tests.rs"]
mod tests;
