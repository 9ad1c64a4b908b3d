//! Search query construction

use std::fmt;

use url::Url;

/// A search predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact match on a field path, e.g. `document.type`
    At { path: String, value: String },
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::At { path, value } => {
                write!(f, "[at({},\"{}\")]", path, escape(value))
            }
        }
    }
}

/// Escape a predicate value for a double-quoted string literal
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Parameters of a documents search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    predicates: Vec<Predicate>,
    fetch: Vec<String>,
    page_size: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents of the given custom type
    pub fn document_type(doc_type: &str) -> Self {
        Self::new().at("document.type", doc_type)
    }

    pub fn at(mut self, path: &str, value: &str) -> Self {
        self.predicates.push(Predicate::At {
            path: path.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn fetch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fetch.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// The `q` parameter
    pub fn predicate_string(&self) -> String {
        let inner: String = self.predicates.iter().map(ToString::to_string).collect();
        format!("[{}]", inner)
    }

    /// Query string pairs, excluding `ref` and `access_token`
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", self.predicate_string())];
        if !self.fetch.is_empty() {
            params.push(("fetch", self.fetch.join(",")));
        }
        if let Some(size) = self.page_size {
            params.push(("pageSize", size.to_string()));
        }
        params
    }
}

/// Whether `cursor` points at the same origin as the API endpoint
pub fn same_origin(endpoint: &str, cursor: &str) -> bool {
    match (Url::parse(endpoint), Url::parse(cursor)) {
        (Ok(endpoint), Ok(cursor)) => {
            endpoint.scheme() == cursor.scheme()
                && endpoint.host_str() == cursor.host_str()
                && endpoint.port_or_known_default() == cursor.port_or_known_default()
        }
        _ => false,
    }
}
