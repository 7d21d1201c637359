//! Client-side query construction and response interpretation for
//! Apache Solr
//!
//! This crate assembles the outbound parameter set for Solr's select
//! handler and interprets what comes back, including:
//!
//! - **Two query builders**: the standard parser (`func`) and the
//!   extended dismax parser (`edismax`) with weighted query and phrase
//!   fields
//! - **Filtering**: additive field filters plus nestable boolean
//!   filter groups
//! - **Highlighting**: per-field snippet requests, merged back into
//!   the matching documents on the way in
//! - **Faceting**: field, query and range facets with global and
//!   per-field options
//! - **Server resolution**: id, name and scope based lookup of stored
//!   server records, with ping-checked and cached client handles
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  SearchQuery / DismaxQuery                    │
//! │  filters, highlighting, facets, sort clauses  │
//! └───────────────────────────────────────────────┘
//!                 │ assembled QueryParams
//!                 ▼
//! ┌───────────────────────────────────────────────┐
//! │  SolrClient                                   │◀── ServerResolver
//! │  select / ping / commit over HTTP + JSON      │    (records, scope
//! └───────────────────────────────────────────────┘    config, cache)
//!                 │ raw JSON body
//!                 ▼
//! ┌───────────────────────────────────────────────┐
//! │  SearchResults                                │
//! │  documents + merged highlights + facet counts │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use solr_client::{SearchQuery, SearchServerConfig, SolrClient, SortOrder};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(SolrClient::new("localhost", 8983, "/solr")?);
//!     let config = SearchServerConfig::direct(client);
//!
//!     let mut query = SearchQuery::new()
//!         .add_filter("type", "article")
//!         .highlight_field("title")
//!         .facet_field("category")
//!         .sort("created", SortOrder::Desc);
//!
//!     if let Some(results) = query.search("web framework", 10, 0, Some(&config)).await? {
//!         println!("{} documents matched", results.num_found);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod response;
pub mod server;

pub use client::{ClientOptions, SolrClient};
pub use config::{SearchMethod, SearchServerConfig};
pub use error::{Result, SolrError};
pub use query::{
    DismaxQuery, FacetMethod, FacetOrder, FilterGroup, FilterOperator, QueryParams, QueryParser,
    SearchQuery, SolrQuery, SortOrder,
};
pub use response::{Document, FacetCounts, SearchResults, SelectResponse};
pub use server::{
    InMemoryScopeConfig, InMemoryServerStore, ScopeConfigStore, ServerRecord, ServerResolver,
    ServerStore,
};
