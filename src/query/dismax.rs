use crate::config::SearchServerConfig;
use crate::error::Result;
use crate::query::standard::SearchQuery;
use crate::query::{
    boost_token, FacetMethod, FacetOrder, QueryParams, QueryParser, SolrQuery, SortOrder,
};
use crate::response::{Document, SearchResults};
use crate::server::ServerResolver;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Query builder for the edismax parser.
///
/// Wraps the base builder and layers the dismax parameter family on
/// top: weighted query fields, the phrase-boost tiers, minimum-match
/// rules and the slop/tie-breaker scalars. Query fields registered
/// here feed `qf`, which is always emitted, even when empty.
#[derive(Debug, Clone, Default)]
pub struct DismaxQuery {
    base: SearchQuery,
    query_fields: BTreeMap<String, String>,
    phrase_fields: BTreeMap<String, String>,
    phrase_fields2: BTreeMap<String, String>,
    phrase_fields3: BTreeMap<String, String>,
    minimum_should_match: BTreeMap<u32, String>,
}

impl DismaxQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server_config(mut self, config: SearchServerConfig) -> Self {
        self.base = self.base.with_server_config(config);
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<ServerResolver>) -> Self {
        self.base = self.base.with_resolver(resolver);
        self
    }

    /// Register a weighted query field for `qf`; boost > 0 renders
    /// `name^boost`, re-registering a field overwrites its token.
    pub fn add_query_field(mut self, name: &str, boost: f32) -> Self {
        self.query_fields
            .insert(name.to_string(), boost_token(name, boost));
        self
    }

    /// Register a phrase-boost field for `pf`
    pub fn add_phrase_field(mut self, name: &str, boost: f32) -> Self {
        self.phrase_fields
            .insert(name.to_string(), boost_token(name, boost));
        self
    }

    /// Register a bigram phrase-boost field for `pf2`
    pub fn add_phrase_field2(mut self, name: &str, boost: f32) -> Self {
        self.phrase_fields2
            .insert(name.to_string(), boost_token(name, boost));
        self
    }

    /// Register a trigram phrase-boost field for `pf3`
    pub fn add_phrase_field3(mut self, name: &str, boost: f32) -> Self {
        self.phrase_fields3
            .insert(name.to_string(), boost_token(name, boost));
        self
    }

    /// Minimum-match rule for queries with `clause_count` optional
    /// clauses.
    ///
    /// With a value the rule renders `count<value` (e.g. `2<75%`),
    /// without one it renders the bare count. Rules render in
    /// ascending clause-count order; a repeated count overwrites.
    pub fn minimum_should_match(mut self, clause_count: u32, value: Option<&str>) -> Self {
        let rule = match value {
            Some(value) => format!("{}<{}", clause_count, value),
            None => clause_count.to_string(),
        };
        self.minimum_should_match.insert(clause_count, rule);
        self
    }

    /// Slop for explicit phrase queries (`qs`)
    pub fn query_slop(mut self, slop: u32) -> Self {
        self.base.params.set("qs", slop);
        self
    }

    /// Slop for the implicit phrase boost (`ps`)
    pub fn phrase_slop(mut self, slop: u32) -> Self {
        self.base.params.set("ps", slop);
        self
    }

    /// Tie breaker between the scores of overlapping fields (`tie`)
    pub fn tie_breaker(mut self, tie: f32) -> Self {
        self.base.params.set("tie", tie);
        self
    }

    pub fn add_filter(mut self, field: &str, value: &str) -> Self {
        self.base = self.base.add_filter(field, value);
        self
    }

    pub fn add_filter_clause(mut self, clause: impl Into<String>) -> Self {
        self.base = self.base.add_filter_clause(clause);
        self
    }

    pub fn highlight_field(mut self, field: impl Into<String>) -> Self {
        self.base = self.base.highlight_field(field);
        self
    }

    pub fn highlight_snippet_count(mut self, count: u32) -> Self {
        self.base = self.base.highlight_snippet_count(count);
        self
    }

    pub fn highlight_fragment_size(mut self, size: u32) -> Self {
        self.base = self.base.highlight_fragment_size(size);
        self
    }

    pub fn highlight_merge_contiguous(mut self, merge: bool) -> Self {
        self.base = self.base.highlight_merge_contiguous(merge);
        self
    }

    pub fn highlight_require_field_match(mut self, require: bool) -> Self {
        self.base = self.base.highlight_require_field_match(require);
        self
    }

    pub fn highlight_max_analyzed_chars(mut self, chars: u32) -> Self {
        self.base = self.base.highlight_max_analyzed_chars(chars);
        self
    }

    pub fn highlight_alternate_field(mut self, field: impl Into<String>) -> Self {
        self.base = self.base.highlight_alternate_field(field);
        self
    }

    pub fn highlight_max_alternate_field_length(mut self, length: u32) -> Self {
        self.base = self.base.highlight_max_alternate_field_length(length);
        self
    }

    pub fn highlight_markers(
        mut self,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        self.base = self.base.highlight_markers(prefix, suffix);
        self
    }

    pub fn facet_field(mut self, field: impl Into<String>) -> Self {
        self.base = self.base.facet_field(field);
        self
    }

    pub fn facet_query(mut self, query: impl Into<String>) -> Self {
        self.base = self.base.facet_query(query);
        self
    }

    pub fn facet_prefix(mut self, prefix: &str, field: Option<&str>) -> Self {
        self.base = self.base.facet_prefix(prefix, field);
        self
    }

    pub fn facet_sort(mut self, order: FacetOrder, field: Option<&str>) -> Self {
        self.base = self.base.facet_sort(order, field);
        self
    }

    pub fn facet_limit(mut self, limit: i32, field: Option<&str>) -> Self {
        self.base = self.base.facet_limit(limit, field);
        self
    }

    pub fn facet_offset(mut self, offset: u32, field: Option<&str>) -> Self {
        self.base = self.base.facet_offset(offset, field);
        self
    }

    pub fn facet_mincount(mut self, mincount: u32, field: Option<&str>) -> Self {
        self.base = self.base.facet_mincount(mincount, field);
        self
    }

    pub fn facet_missing(mut self, missing: bool, field: Option<&str>) -> Self {
        self.base = self.base.facet_missing(missing, field);
        self
    }

    pub fn facet_method(mut self, method: FacetMethod, field: Option<&str>) -> Self {
        self.base = self.base.facet_method(method, field);
        self
    }

    pub fn facet_range(
        mut self,
        field: &str,
        start: impl ToString,
        end: impl ToString,
        gap: Option<&str>,
    ) -> Self {
        self.base = self.base.facet_range(field, start, end, gap);
        self
    }

    pub fn sort(mut self, field: &str, order: SortOrder) -> Self {
        self.base = self.base.sort(field, order);
        self
    }

    /// Execute a search with the assembled dismax parameters
    pub async fn search(
        &mut self,
        query: &str,
        limit: usize,
        offset: usize,
        server_config: Option<&SearchServerConfig>,
    ) -> Result<Option<SearchResults>> {
        let params = self.query_params();
        self.base
            .search_with_params(params, query, limit, offset, server_config)
            .await
    }

    pub fn results(&self) -> &[Document] {
        self.base.results()
    }

    pub fn result_count(&self) -> u64 {
        self.base.result_count()
    }

    pub fn result_facets(&self, field: &str) -> Option<&Value> {
        self.base.result_facets(field)
    }

    pub fn result_facet_fields(&self) -> Option<&Map<String, Value>> {
        self.base.result_facet_fields()
    }

    pub fn last_result(&self) -> Option<&SearchResults> {
        self.base.last_result()
    }
}

impl SolrQuery for DismaxQuery {
    fn parser(&self) -> QueryParser {
        QueryParser::Edismax
    }

    fn query_params(&self) -> QueryParams {
        let mut params = self.base.assemble(QueryParser::Edismax);

        // qf is part of the dismax contract and goes out even when no
        // field has been registered.
        params.set("qf", join_tokens(&self.query_fields));
        if !self.phrase_fields.is_empty() {
            params.set("pf", join_tokens(&self.phrase_fields));
        }
        if !self.phrase_fields2.is_empty() {
            params.set("pf2", join_tokens(&self.phrase_fields2));
        }
        if !self.phrase_fields3.is_empty() {
            params.set("pf3", join_tokens(&self.phrase_fields3));
        }
        if !self.minimum_should_match.is_empty() {
            let rules: Vec<&str> = self
                .minimum_should_match
                .values()
                .map(String::as_str)
                .collect();
            params.set("mm", rules.join(" "));
        }

        params
    }
}

fn join_tokens(tokens: &BTreeMap<String, String>) -> String {
    tokens
        .values()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
