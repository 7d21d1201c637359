//! Query construction and execution
//!
//! Two builders share one parameter-assembly contract:
//!
//! - [`SearchQuery`]: the base builder with filters, highlighting, faceting,
//!   sorting, and generic parameter tuning
//! - [`DismaxQuery`]: extends the base with edismax relevance tuning
//!   (weighted query fields, phrase-boost tiers, minimum-should-match,
//!   slop and tie-breaker weights)
//!
//! Builders accumulate state through chained mutators, render their full
//! outbound parameter set on demand, and keep the most recent decoded
//! result for read-only access.

mod dismax;
pub(crate) mod executor;
mod filter;
mod params;
mod standard;

pub use dismax::DismaxQuery;
pub use filter::{FilterGroup, FilterOperator};
pub use params::QueryParams;
pub use standard::SearchQuery;

/// Query parser selector stamped into `defType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryParser {
    /// Selector used by the base builder
    Func,
    /// Extended dismax selector
    Edismax,
}

impl QueryParser {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryParser::Func => "func",
            QueryParser::Edismax => "edismax",
        }
    }
}

/// Sort direction for result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Facet term ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetOrder {
    /// Highest counts first
    Count,
    /// Index (lexicographic) order
    Index,
}

impl FacetOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacetOrder::Count => "count",
            FacetOrder::Index => "index",
        }
    }
}

/// Facet computation strategy hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetMethod {
    /// Term enumeration, best for few distinct values
    Enum,
    /// Field-cache driven counting
    Fc,
}

impl FacetMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacetMethod::Enum => "enum",
            FacetMethod::Fc => "fc",
        }
    }
}

/// Shared parameter-assembly contract implemented by both builders
pub trait SolrQuery {
    /// The parser selector this builder stamps into `defType`.
    ///
    /// Fixed per builder type, never caller-mutable.
    fn parser(&self) -> QueryParser;

    /// Assemble the full outbound parameter set.
    ///
    /// Pure; yields identical output until the builder is mutated again.
    fn query_params(&self) -> QueryParams;
}

/// Render a field token, `name^boost` when the boost is positive.
///
/// Boosts at or below zero render the bare field name.
pub(crate) fn boost_token(name: &str, boost: f32) -> String {
    if boost > 0.0 {
        format!("{}^{}", name, boost)
    } else {
        name.to_string()
    }
}
