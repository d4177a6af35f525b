use std::collections::BTreeMap;

pub const MATCH_ALL_QUERY: &str = "*:*";
const REQUIRED_LOCATION_CLAUSE: &str = "+location_0_coordinate:";

/// Mutable description of a named search: the user's text, extra query clauses and raw
/// backend options such as `rows`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    user_query: String,
    user_query_parameters: Vec<String>,
    options: BTreeMap<String, String>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            user_query: MATCH_ALL_QUERY.to_string(),
            user_query_parameters: Vec::new(),
            options: BTreeMap::new(),
        }
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key.into(), value.into());
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn set_user_query(&mut self, text: impl Into<String>) {
        self.user_query = text.into();
    }

    pub fn user_query(&self) -> &str {
        &self.user_query
    }

    /// Replaces, rather than appends to, the extra clauses.
    pub fn set_user_query_parameters(&mut self, parameters: Vec<String>) {
        self.user_query_parameters = parameters;
    }

    pub fn user_query_parameters(&self) -> &[String] {
        &self.user_query_parameters
    }

    pub fn rows(&self) -> Option<usize> {
        self.option("rows").and_then(|rows| rows.trim().parse().ok())
    }

    /// True when a clause requires the latitude field; exclusions and bare mentions do not count.
    pub fn requires_location(&self) -> bool {
        self.user_query_parameters
            .iter()
            .any(|parameter| parameter.trim_start().starts_with(REQUIRED_LOCATION_CLAUSE))
    }

    /// The `q` value sent to the backend: user text followed by each clause.
    pub fn query_text(&self) -> String {
        std::iter::once(self.user_query.trim())
            .chain(self.user_query_parameters.iter().map(|p| p.trim()))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("q".to_string(), self.query_text())];
        params.extend(
            self.options
                .iter()
                .filter(|(key, _)| key.as_str() != "q")
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        if !self.options.contains_key("wt") {
            params.push(("wt".to_string(), "json".to_string()));
        }
        params
    }
}
