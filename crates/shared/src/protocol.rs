use serde::{Deserialize, Serialize};

use crate::domain::{Category, DocumentId, LatLng};

/// A single record returned by the search index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultDocument {
    pub id: DocumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_0_coordinate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_1_coordinate: Option<f64>,
    #[serde(default, rename = "fromDate", skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    #[serde(default, rename = "toDate", skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer_uri: Option<String>,
}

impl ResultDocument {
    /// Both coordinate fields must be present; one without the other is treated as no location.
    pub fn position(&self) -> Option<LatLng> {
        match (self.location_0_coordinate, self.location_1_coordinate) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }

    pub fn category(&self) -> Category {
        Category::parse(self.doc_type.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, rename = "numFound")]
    pub num_found: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub docs: Vec<ResultDocument>,
}

/// Outer envelope of a search backend reply: `{ "response": { ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchEnvelope {
    pub response: SearchResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Notification {
    ResultsChanged { query_name: String },
    SelectionSetUpdate,
}
