use crate::client::SolrClient;
use std::sync::Arc;

/// HTTP method used for select requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMethod {
    Get,
    Post,
}

impl SearchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMethod::Get => "GET",
            SearchMethod::Post => "POST",
        }
    }
}

impl Default for SearchMethod {
    fn default() -> Self {
        Self::Get
    }
}

/// Server configuration consulted at search time.
///
/// Carries either a directly-held client handle or a configuration
/// scope + key pair that a [`ServerResolver`](crate::ServerResolver)
/// turns into a handle. A direct handle always wins.
#[derive(Debug, Clone, Default)]
pub struct SearchServerConfig {
    instance: Option<Arc<SolrClient>>,
    scope: Option<String>,
    scope_key: Option<String>,
    method: SearchMethod,
}

impl SearchServerConfig {
    /// Configuration around an already-connected client handle
    pub fn direct(instance: Arc<SolrClient>) -> Self {
        Self {
            instance: Some(instance),
            ..Self::default()
        }
    }

    /// Configuration naming a stored server via scope + key
    pub fn scoped(scope: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            scope_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Set the HTTP method used for select requests
    pub fn with_method(mut self, method: SearchMethod) -> Self {
        self.method = method;
        self
    }

    pub fn instance(&self) -> Option<&Arc<SolrClient>> {
        self.instance.as_ref()
    }

    /// The scope + key pair, when both are present
    pub fn scope(&self) -> Option<(&str, &str)> {
        match (self.scope.as_deref(), self.scope_key.as_deref()) {
            (Some(scope), Some(key)) => Some((scope, key)),
            _ => None,
        }
    }

    pub fn method(&self) -> SearchMethod {
        self.method
    }
}
