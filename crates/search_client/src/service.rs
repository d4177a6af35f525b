//! The query/result service seam and an in-process implementation backed by a fixed corpus.

use std::collections::HashMap;

use shared::{
    error::SearchError,
    protocol::{Notification, ResultDocument, SearchEnvelope, SearchResponse},
};

use crate::{
    bus::NotificationBus,
    query::{SearchQuery, MATCH_ALL_QUERY},
};

/// Backend default when a query carries no `rows` option.
const DEFAULT_ROWS: usize = 10;

pub trait QueryService {
    fn query(&self, name: &str) -> Option<&SearchQuery>;

    /// Returns the named query, creating an empty one on first use.
    fn query_mut(&mut self, name: &str) -> &mut SearchQuery;

    /// Re-executes the named query. Completion is announced on the bus with
    /// [`Notification::ResultsChanged`], possibly after this call returns.
    fn update_query(&mut self, name: &str);

    fn response(&self, name: &str) -> Option<&SearchResponse>;
}

pub struct StaticSearchService {
    documents: Vec<ResultDocument>,
    queries: HashMap<String, SearchQuery>,
    responses: HashMap<String, SearchResponse>,
    bus: NotificationBus,
    executions: usize,
}

impl StaticSearchService {
    pub fn new(bus: NotificationBus, documents: Vec<ResultDocument>) -> Self {
        Self {
            documents,
            queries: HashMap::new(),
            responses: HashMap::new(),
            bus,
            executions: 0,
        }
    }

    /// Accepts either the backend envelope `{"response": {...}}` or a bare response object.
    /// A top-level `response` key selects the envelope shape, and its decode errors are returned.
    pub fn from_json(bus: NotificationBus, raw: &str) -> Result<Self, SearchError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let response = if value.get("response").is_some() {
            serde_json::from_value::<SearchEnvelope>(value)?.response
        } else {
            serde_json::from_value::<SearchResponse>(value)?
        };
        Ok(Self::new(bus, response.docs))
    }

    pub fn set_documents(&mut self, documents: Vec<ResultDocument>) {
        self.documents = documents;
    }

    pub fn executions(&self) -> usize {
        self.executions
    }

    fn execute(&self, query: &SearchQuery) -> SearchResponse {
        let needle = query.user_query().trim().to_lowercase();
        let match_all = needle.is_empty() || needle == MATCH_ALL_QUERY;
        let matching: Vec<&ResultDocument> = self
            .documents
            .iter()
            .filter(|doc| !query.requires_location() || doc.position().is_some())
            .filter(|doc| match_all || mentions(doc, &needle))
            .collect();

        SearchResponse {
            num_found: matching.len() as u64,
            start: 0,
            docs: matching
                .into_iter()
                .take(query.rows().unwrap_or(DEFAULT_ROWS))
                .cloned()
                .collect(),
        }
    }
}

fn mentions(doc: &ResultDocument, needle: &str) -> bool {
    [&doc.title, &doc.abstract_text]
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(needle))
}

impl QueryService for StaticSearchService {
    fn query(&self, name: &str) -> Option<&SearchQuery> {
        self.queries.get(name)
    }

    fn query_mut(&mut self, name: &str) -> &mut SearchQuery {
        self.queries.entry(name.to_string()).or_default()
    }

    fn update_query(&mut self, name: &str) {
        let query = self.queries.get(name).cloned().unwrap_or_default();
        let response = self.execute(&query);
        tracing::debug!(
            query = name,
            num_found = response.num_found,
            returned = response.docs.len(),
            "executed query against static corpus"
        );
        self.responses.insert(name.to_string(), response);
        self.executions += 1;
        self.bus.publish(Notification::ResultsChanged {
            query_name: name.to_string(),
        });
    }

    fn response(&self, name: &str) -> Option<&SearchResponse> {
        self.responses.get(name)
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
