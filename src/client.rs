use crate::config::SearchMethod;
use crate::error::{Result, SolrError};
use crate::query::QueryParams;
use crate::server::ServerRecord;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Transport timeouts applied to the underlying HTTP client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Handle to one Solr core, speaking JSON over HTTP.
///
/// Cheap to clone behind an `Arc`; holds a pooled `reqwest::Client`.
pub struct SolrClient {
    http: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl SolrClient {
    /// Create a handle from host, port and core path with default timeouts
    pub fn new(host: &str, port: u16, path: &str) -> Result<Self> {
        Self::with_options(host, port, path, ClientOptions::default())
    }

    /// Create a handle from host, port and core path
    pub fn with_options(host: &str, port: u16, path: &str, options: ClientOptions) -> Result<Self> {
        let base_url = format!("http://{}:{}{}", host, port, normalize_path(path));
        Self::from_parts(base_url, None, None, options)
    }

    /// Create a handle from a full base URL, e.g. `http://localhost:8983/solr`
    pub fn from_url(url: &str) -> Result<Self> {
        Self::from_parts(
            url.trim_end_matches('/').to_string(),
            None,
            None,
            ClientOptions::default(),
        )
    }

    /// Create a handle from a stored server record with default timeouts
    pub fn from_record(record: &ServerRecord) -> Result<Self> {
        Self::from_record_with_options(record, ClientOptions::default())
    }

    /// Create a handle from a stored server record.
    ///
    /// Credentials on the record are applied as HTTP basic auth.
    pub fn from_record_with_options(record: &ServerRecord, options: ClientOptions) -> Result<Self> {
        let base_url = format!(
            "http://{}:{}{}",
            record.host,
            record.port,
            normalize_path(&record.path)
        );
        Self::from_parts(
            base_url,
            record.username.clone(),
            record.password.clone(),
            options,
        )
    }

    fn from_parts(
        base_url: String,
        username: Option<String>,
        password: Option<String>,
        options: ClientOptions,
    ) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.timeout)
            .build()
            .map_err(|e| SolrError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            username,
            password,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a select request and return the raw response body.
    ///
    /// The query string, paging window and assembled parameters are sent
    /// either as URL parameters (GET) or as a form body (POST). Responses
    /// are always requested as JSON with map-style named lists.
    pub async fn select(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
        params: &QueryParams,
        method: SearchMethod,
    ) -> Result<String> {
        let url = format!("{}/select", self.base_url);
        let mut pairs: Vec<(String, String)> = vec![
            ("q".to_string(), query.to_string()),
            ("start".to_string(), offset.to_string()),
            ("rows".to_string(), limit.to_string()),
            ("wt".to_string(), "json".to_string()),
            ("json.nl".to_string(), "map".to_string()),
        ];
        pairs.extend(params.pairs().iter().cloned());

        let request = match method {
            SearchMethod::Get => self.http.get(&url).query(&pairs),
            SearchMethod::Post => self.http.post(&url).form(&pairs),
        };

        debug!(url = %url, method = method.as_str(), "issuing solr select");
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_else(|_| String::new());

        if !status.is_success() {
            error!(url = %url, status = %status, "solr select failed");
            return Err(SolrError::Request(format!(
                "select returned status {}: {}",
                status,
                if body.is_empty() {
                    "no response body"
                } else {
                    body.as_str()
                }
            )));
        }

        Ok(body)
    }

    /// Lightweight liveness check against the ping handler
    pub async fn ping(&self) -> bool {
        let url = format!("{}/admin/ping", self.base_url);
        let request = self.authorize(self.http.get(&url).query(&[("wt", "json")]));

        match request.send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!(url = %url, status = %response.status(), "solr ping returned non-success status");
                false
            }
            Err(e) => {
                warn!(url = %url, error = %e, "solr ping failed");
                false
            }
        }
    }

    /// Ask the server to commit pending index changes
    pub async fn commit(&self) -> Result<()> {
        let url = format!("{}/update", self.base_url);
        let request = self
            .http
            .post(&url)
            .query(&[("wt", "json")])
            .json(&serde_json::json!({ "commit": {} }));

        let response = self.authorize(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            error!(url = %url, status = %status, "solr commit failed");
            return Err(SolrError::Request(format!(
                "commit returned status {}: {}",
                status, body
            )));
        }

        info!(url = %url, "solr commit issued");
        Ok(())
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.username {
            Some(username) => request.basic_auth(username, self.password.as_deref()),
            None => request,
        }
    }
}

impl fmt::Debug for SolrClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolrClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.username.is_some())
            .finish()
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_from_parts() {
        let client = SolrClient::new("localhost", 8983, "/solr").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8983/solr");
    }

    #[test]
    fn test_path_normalization() {
        assert_eq!(normalize_path("/solr/"), "/solr");
        assert_eq!(normalize_path("solr"), "/solr");
        assert_eq!(normalize_path(""), "");
        assert_eq!(normalize_path("/"), "");
    }

    #[test]
    fn test_from_url_strips_trailing_slash() {
        let client = SolrClient::from_url("http://localhost:8983/solr/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8983/solr");
    }

    #[test]
    fn test_from_record_applies_defaults() {
        let record = crate::server::ServerRecord::new(1, "main", "search.internal");
        let client = SolrClient::from_record(&record).unwrap();
        assert_eq!(client.base_url(), "http://search.internal:8080/solr");
    }
}
