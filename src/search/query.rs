//! Query expressions
//!
//! A `QueryExpression` is a structured description of which fields to match
//! and how. Expressions are built by the per-entity search strategies and
//! rendered to the Elasticsearch query DSL; the in-process backend
//! interprets them directly.

use serde_json::{json, Value};

/// Tolerance for character-level edit distance between query terms and
/// indexed field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fuzziness {
    /// Terms must match exactly
    None,
    /// Edit distance scaled by term length (Elasticsearch AUTO)
    Auto,
}

/// A structured search query over one index.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpression {
    /// Boolean query of per-field match clauses; a document is a hit when at
    /// least `minimum_should_match` clauses match.
    BoolShould {
        /// Free-text query matched by every clause
        query: String,
        /// Fields, one match clause each
        fields: Vec<&'static str>,
        /// Minimum number of clauses that must match
        minimum_should_match: u32,
    },
    /// Single match over multiple fields.
    MultiMatch {
        /// Free-text query
        query: String,
        /// Fields searched
        fields: Vec<&'static str>,
        /// Edit-distance tolerance
        fuzziness: Fuzziness,
    },
}

impl QueryExpression {
    /// Boolean "should" query over the given fields
    pub fn bool_should(
        query: impl Into<String>,
        fields: Vec<&'static str>,
        minimum_should_match: u32,
    ) -> Self {
        Self::BoolShould {
            query: query.into(),
            fields,
            minimum_should_match,
        }
    }

    /// Multi-field match query
    pub fn multi_match(
        query: impl Into<String>,
        fields: Vec<&'static str>,
        fuzziness: Fuzziness,
    ) -> Self {
        Self::MultiMatch {
            query: query.into(),
            fields,
            fuzziness,
        }
    }

    /// Render to the Elasticsearch query DSL
    pub fn to_query_dsl(&self) -> Value {
        match self {
            Self::BoolShould {
                query,
                fields,
                minimum_should_match,
            } => {
                let clauses: Vec<Value> = fields
                    .iter()
                    .map(|field| json!({ "match": { *field: query } }))
                    .collect();
                json!({
                    "bool": {
                        "should": clauses,
                        "minimum_should_match": minimum_should_match,
                    }
                })
            }
            Self::MultiMatch {
                query,
                fields,
                fuzziness,
            } => {
                let mut body = json!({
                    "query": query,
                    "fields": fields,
                });
                if *fuzziness == Fuzziness::Auto {
                    body["fuzziness"] = json!("AUTO");
                }
                json!({ "multi_match": body })
            }
        }
    }
}
