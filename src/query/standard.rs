use crate::client::SolrClient;
use crate::config::SearchServerConfig;
use crate::error::{Result, SolrError};
use crate::query::{
    boost_token, executor, FacetMethod, FacetOrder, QueryParams, QueryParser, SolrQuery, SortOrder,
};
use crate::response::{Document, SearchResults};
use crate::server::ServerResolver;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// The base query builder.
///
/// Accumulates filters, highlighting directives, facet options and sort
/// clauses, assembles them into the outbound parameter set, executes
/// searches against a configured server, and keeps the most recent
/// result for read-only access.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    server_config: Option<SearchServerConfig>,
    resolver: Option<Arc<ServerResolver>>,
    query_fields: BTreeMap<String, String>,
    facet_fields: Vec<String>,
    facet_queries: Vec<String>,
    facet_ranges: Vec<String>,
    pub(crate) params: QueryParams,
    filters: Vec<String>,
    highlight_fields: Vec<String>,
    sorts: Vec<String>,
    last_result: Option<SearchResults>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server configuration used when `search` gets none
    pub fn with_server_config(mut self, config: SearchServerConfig) -> Self {
        self.server_config = Some(config);
        self
    }

    /// Set the resolver consulted for scoped server configurations
    pub fn with_resolver(mut self, resolver: Arc<ServerResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Register a query field; boost > 0 renders `name^boost`.
    ///
    /// Re-registering the same field overwrites its token.
    pub fn add_query_field(mut self, name: &str, boost: f32) -> Self {
        self.query_fields
            .insert(name.to_string(), boost_token(name, boost));
        self
    }

    /// Append an additive filter clause `+field:value` (value urlencoded)
    pub fn add_filter(mut self, field: &str, value: &str) -> Self {
        self.filters
            .push(format!("+{}:{}", field, urlencoding::encode(value)));
        self
    }

    /// Append a pre-rendered filter clause, e.g. a [`FilterGroup`] rendering
    ///
    /// [`FilterGroup`]: crate::FilterGroup
    pub fn add_filter_clause(mut self, clause: impl Into<String>) -> Self {
        self.filters.push(clause.into());
        self
    }

    /// Request highlighting for a field (enables highlighting overall)
    pub fn highlight_field(mut self, field: impl Into<String>) -> Self {
        self.params.set("hl", "true");
        self.highlight_fields.push(field.into());
        self
    }

    /// Number of highlighted snippets per field
    pub fn highlight_snippet_count(mut self, count: u32) -> Self {
        self.params.set("hl.snippets", count);
        self
    }

    /// Size in characters of each highlighted fragment
    pub fn highlight_fragment_size(mut self, size: u32) -> Self {
        self.params.set("hl.fragsize", size);
        self
    }

    /// Collapse contiguous fragments into one
    pub fn highlight_merge_contiguous(mut self, merge: bool) -> Self {
        self.params.set("hl.mergeContiguous", merge);
        self
    }

    /// Only highlight query terms that matched in the field itself
    pub fn highlight_require_field_match(mut self, require: bool) -> Self {
        self.params.set("hl.requireFieldMatch", require);
        self
    }

    /// Cap on characters scanned for highlightable terms
    pub fn highlight_max_analyzed_chars(mut self, chars: u32) -> Self {
        self.params.set("hl.maxAnalyzedChars", chars);
        self
    }

    /// Fallback field shown when no fragment matches
    pub fn highlight_alternate_field(mut self, field: impl Into<String>) -> Self {
        self.params.set("hl.alternateField", field.into());
        self
    }

    /// Length cap for the alternate-field fallback
    pub fn highlight_max_alternate_field_length(mut self, length: u32) -> Self {
        self.params.set("hl.maxAlternateFieldLength", length);
        self
    }

    /// Markers wrapped around highlighted terms
    pub fn highlight_markers(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.params.set("hl.simple.pre", prefix.into());
        self.params.set("hl.simple.post", suffix.into());
        self
    }

    /// Facet match counts over a field (enables faceting overall)
    pub fn facet_field(mut self, field: impl Into<String>) -> Self {
        self.params.set("facet", "true");
        self.facet_fields.push(field.into());
        self
    }

    /// Facet match counts for an arbitrary query expression
    pub fn facet_query(mut self, query: impl Into<String>) -> Self {
        self.params.set("facet", "true");
        self.facet_queries.push(query.into());
        self
    }

    /// Only count terms starting with `prefix`, globally or per field
    pub fn facet_prefix(mut self, prefix: &str, field: Option<&str>) -> Self {
        self.params.set(facet_option_key("prefix", field), prefix);
        self
    }

    /// Facet term ordering, globally or per field
    pub fn facet_sort(mut self, order: FacetOrder, field: Option<&str>) -> Self {
        self.params
            .set(facet_option_key("sort", field), order.as_str());
        self
    }

    /// Cap on returned facet terms; -1 lifts the cap
    pub fn facet_limit(mut self, limit: i32, field: Option<&str>) -> Self {
        self.params.set(facet_option_key("limit", field), limit);
        self
    }

    /// Offset into the facet term list
    pub fn facet_offset(mut self, offset: u32, field: Option<&str>) -> Self {
        self.params.set(facet_option_key("offset", field), offset);
        self
    }

    /// Minimum count for a term to appear
    pub fn facet_mincount(mut self, mincount: u32, field: Option<&str>) -> Self {
        self.params
            .set(facet_option_key("mincount", field), mincount);
        self
    }

    /// Also count documents missing the facet field
    pub fn facet_missing(mut self, missing: bool, field: Option<&str>) -> Self {
        self.params.set(facet_option_key("missing", field), missing);
        self
    }

    /// Facet computation strategy, globally or per field
    pub fn facet_method(mut self, method: FacetMethod, field: Option<&str>) -> Self {
        self.params
            .set(facet_option_key("method", field), method.as_str());
        self
    }

    /// Facet counts over value ranges of a field.
    ///
    /// Registers the field for range faceting and sets its per-field
    /// start/end/gap parameters (gap stays empty when not given).
    pub fn facet_range(
        mut self,
        field: &str,
        start: impl ToString,
        end: impl ToString,
        gap: Option<&str>,
    ) -> Self {
        self.params.set("facet", "true");
        self.facet_ranges.push(field.to_string());
        self.params
            .set(format!("f.{}.facet.range.start", field), start);
        self.params.set(format!("f.{}.facet.range.end", field), end);
        self.params
            .set(format!("f.{}.facet.range.gap", field), gap.unwrap_or(""));
        self
    }

    /// Append a sort clause; repeats are not deduplicated
    pub fn sort(mut self, field: &str, order: SortOrder) -> Self {
        self.sorts.push(format!("{} {}", field, order.as_str()));
        self
    }

    /// Base parameter assembly, stamping the given parser selector.
    ///
    /// The dismax builder reuses this with its own selector before
    /// layering its parameters on top.
    pub(crate) fn assemble(&self, parser: QueryParser) -> QueryParams {
        let mut params = self.params.clone();
        params.set("defType", parser.as_str());

        if !self.filters.is_empty() {
            params.set("fq", self.filters.join(" "));
        }
        if !self.highlight_fields.is_empty() {
            params.set("hl.fl", self.highlight_fields.join(","));
        }
        if !self.sorts.is_empty() {
            params.set("sort", self.sorts.join(","));
        }
        for field in &self.facet_fields {
            params.append("facet.field", field);
        }
        for query in &self.facet_queries {
            params.append("facet.query", query);
        }
        for field in &self.facet_ranges {
            params.append("facet.range", field);
        }

        params
    }

    /// Execute a search with this builder's parameters.
    ///
    /// Returns `Ok(None)` when neither the argument nor the builder
    /// carries a server configuration, leaving nothing to search
    /// against. A configured but unresolvable or unreachable server is
    /// an error.
    pub async fn search(
        &mut self,
        query: &str,
        limit: usize,
        offset: usize,
        server_config: Option<&SearchServerConfig>,
    ) -> Result<Option<SearchResults>> {
        let params = self.query_params();
        self.search_with_params(params, query, limit, offset, server_config)
            .await
    }

    pub(crate) async fn search_with_params(
        &mut self,
        params: QueryParams,
        query: &str,
        limit: usize,
        offset: usize,
        server_config: Option<&SearchServerConfig>,
    ) -> Result<Option<SearchResults>> {
        let config = match server_config.or(self.server_config.as_ref()) {
            Some(config) => config.clone(),
            None => {
                debug!("no server configuration available, skipping search");
                return Ok(None);
            }
        };

        let client = self.client_for(&config).await?;
        let results =
            executor::execute(&client, config.method(), query, offset, limit, &params).await?;

        self.last_result = Some(results.clone());
        Ok(Some(results))
    }

    async fn client_for(&self, config: &SearchServerConfig) -> Result<Arc<SolrClient>> {
        if let Some(instance) = config.instance() {
            return Ok(instance.clone());
        }

        let Some((scope, key)) = config.scope() else {
            return Err(SolrError::Configuration(
                "server configuration carries neither a client instance nor a scope".to_string(),
            ));
        };
        let Some(resolver) = self.resolver.as_ref() else {
            return Err(SolrError::Configuration(
                "scoped server configuration requires a resolver".to_string(),
            ));
        };

        match resolver.resolve(scope, Some(key)).await? {
            Some(client) => Ok(client),
            None => Err(SolrError::Unavailable(format!(
                "could not obtain a live solr handle for scope {}",
                scope
            ))),
        }
    }

    /// Documents from the last successful search
    pub fn results(&self) -> &[Document] {
        self.last_result
            .as_ref()
            .map(|results| results.docs.as_slice())
            .unwrap_or(&[])
    }

    /// Total match count from the last successful search
    pub fn result_count(&self) -> u64 {
        self.last_result
            .as_ref()
            .map(|results| results.num_found)
            .unwrap_or(0)
    }

    /// Facet counts for one field from the last search, when present
    pub fn result_facets(&self, field: &str) -> Option<&Value> {
        self.last_result.as_ref()?.field_facets(field)
    }

    /// The full facet-fields mapping from the last search, when present
    pub fn result_facet_fields(&self) -> Option<&Map<String, Value>> {
        self.last_result.as_ref()?.facet_fields()
    }

    pub fn last_result(&self) -> Option<&SearchResults> {
        self.last_result.as_ref()
    }
}

impl SolrQuery for SearchQuery {
    fn parser(&self) -> QueryParser {
        QueryParser::Func
    }

    fn query_params(&self) -> QueryParams {
        self.assemble(QueryParser::Func)
    }
}

fn facet_option_key(option: &str, field: Option<&str>) -> String {
    match field {
        Some(field) => format!("f.facet.{}.{}", field, option),
        None => format!("facet.{}", option),
    }
}
