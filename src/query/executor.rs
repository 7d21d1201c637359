use crate::client::SolrClient;
use crate::config::SearchMethod;
use crate::error::Result;
use crate::query::QueryParams;
use crate::response::{SearchResults, SelectResponse};
use tracing::debug;

/// Run one select round trip and interpret the response body.
pub(crate) async fn execute(
    client: &SolrClient,
    method: SearchMethod,
    query: &str,
    offset: usize,
    limit: usize,
    params: &QueryParams,
) -> Result<SearchResults> {
    let body = client.select(query, offset, limit, params, method).await?;
    let response: SelectResponse = serde_json::from_str(&body)?;
    let results = SearchResults::from(response);

    debug!(
        query,
        num_found = results.num_found,
        returned = results.docs.len(),
        "select round trip completed"
    );

    Ok(results)
}
