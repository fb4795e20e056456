//! In-process search backend
//!
//! A small token-based index used for development and tests. Documents are
//! held in memory per index, ordered by document id, and query expressions
//! are interpreted directly: a match clause hits when any query token
//! matches any field token, with AUTO fuzziness realized as length-scaled
//! edit distance.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use super::{documents, Fuzziness, QueryExpression, SearchBackend, SearchPage};

/// In-memory implementation of the search backend
#[derive(Default)]
pub struct MemoryBackend {
    indices: RwLock<HashMap<String, BTreeMap<i64, Value>>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SearchBackend for MemoryBackend {
    async fn ensure_indices(&self) -> Result<()> {
        let mut indices = self.indices.write().unwrap_or_else(|e| e.into_inner());
        for (index, _) in documents::index_definitions() {
            indices.entry(index.to_string()).or_default();
        }
        Ok(())
    }

    async fn index_document(&self, index: &str, id: i64, document: &Value) -> Result<()> {
        let mut indices = self.indices.write().unwrap_or_else(|e| e.into_inner());
        indices
            .entry(index.to_string())
            .or_default()
            .insert(id, document.clone());
        Ok(())
    }

    async fn delete_document(&self, index: &str, id: i64) -> Result<()> {
        let mut indices = self.indices.write().unwrap_or_else(|e| e.into_inner());
        if let Some(docs) = indices.get_mut(index) {
            docs.remove(&id);
        }
        Ok(())
    }

    async fn search(
        &self,
        index: &str,
        expression: &QueryExpression,
        limit: i64,
        offset: i64,
    ) -> Result<SearchPage> {
        let indices = self.indices.read().unwrap_or_else(|e| e.into_inner());
        let matched: Vec<Value> = indices
            .get(index)
            .map(|docs| {
                docs.values()
                    .filter(|doc| matches_expression(expression, doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let total = matched.len() as i64;
        let hits = matched
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok(SearchPage { total, hits })
    }
}

/// Evaluate a query expression against one document
fn matches_expression(expression: &QueryExpression, doc: &Value) -> bool {
    match expression {
        QueryExpression::BoolShould {
            query,
            fields,
            minimum_should_match,
        } => {
            let matched = fields
                .iter()
                .filter(|field| field_matches(doc, field, query, Fuzziness::None))
                .count();
            matched as u32 >= *minimum_should_match
        }
        QueryExpression::MultiMatch {
            query,
            fields,
            fuzziness,
        } => fields
            .iter()
            .any(|field| field_matches(doc, field, query, *fuzziness)),
    }
}

fn field_matches(doc: &Value, field: &str, query: &str, fuzziness: Fuzziness) -> bool {
    let Some(text) = doc.get(field).and_then(Value::as_str) else {
        return false;
    };

    let field_tokens = tokenize(text);
    tokenize(query).iter().any(|query_token| {
        field_tokens
            .iter()
            .any(|field_token| term_matches(query_token, field_token, fuzziness))
    })
}

fn term_matches(query_term: &str, field_term: &str, fuzziness: Fuzziness) -> bool {
    if query_term == field_term {
        return true;
    }
    match fuzziness {
        Fuzziness::None => false,
        Fuzziness::Auto => {
            levenshtein(query_term, field_term) <= max_edits(query_term.chars().count())
        }
    }
}

/// Allowed edit distance for a term (Elasticsearch AUTO scheme)
fn max_edits(term_len: usize) -> usize {
    match term_len {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

/// Lowercase tokens split on non-alphanumeric boundaries
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Character-level edit distance
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    async fn backend_with_articles() -> MemoryBackend {
        let backend = MemoryBackend::new();
        let docs = [
            (1, json!({"id": 1, "title": "Rust Tutorial", "author": "jdoe", "type": "Tutorial", "content": "Getting started"})),
            (2, json!({"id": 2, "title": "Benchmark Review", "author": "asmith", "type": "Review", "content": "Numbers and charts"})),
            (3, json!({"id": 3, "title": "Async Research", "author": "jdoe", "type": "Research", "content": "Deep dive"})),
        ];
        for (id, doc) in docs {
            backend
                .index_document(super::super::ARTICLES_INDEX, id, &doc)
                .await
                .unwrap();
        }
        backend
    }

    #[tokio::test]
    async fn test_exact_match_search() {
        let backend = backend_with_articles().await;
        let expr = QueryExpression::multi_match(
            "Tutorial",
            vec!["title", "author", "type", "content"],
            Fuzziness::Auto,
        );

        let page = backend
            .search(super::super::ARTICLES_INDEX, &expr, 10, 0)
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.hits[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_fuzzy_match_tolerates_one_edit() {
        let backend = backend_with_articles().await;
        let expr = QueryExpression::multi_match(
            "Tutoial",
            vec!["title", "author", "type", "content"],
            Fuzziness::Auto,
        );

        let page = backend
            .search(super::super::ARTICLES_INDEX, &expr, 10, 0)
            .await
            .unwrap();
        assert_eq!(page.total, 1, "one-edit query should still hit");
        assert_eq!(page.hits[0]["type"], "Tutorial");
    }

    #[tokio::test]
    async fn test_bool_should_requires_minimum_matches() {
        let backend = MemoryBackend::new();
        backend
            .index_document(
                super::super::USERS_INDEX,
                1,
                &json!({"id": 1, "username": "jdoe", "first_name": "Jane", "last_name": "Doe"}),
            )
            .await
            .unwrap();

        let hit = QueryExpression::bool_should(
            "jane",
            vec!["username", "first_name", "last_name"],
            1,
        );
        let page = backend
            .search(super::super::USERS_INDEX, &hit, 10, 0)
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        // No fuzziness on the boolean clauses: a near-miss is a miss
        let miss = QueryExpression::bool_should(
            "jayne",
            vec!["username", "first_name", "last_name"],
            1,
        );
        let page = backend
            .search(super::super::USERS_INDEX, &miss, 10, 0)
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.hits.is_empty());
    }

    #[tokio::test]
    async fn test_pagination_slices_are_disjoint_and_ordered() {
        let backend = backend_with_articles().await;
        let expr = QueryExpression::multi_match(
            "jdoe",
            vec!["title", "author", "type", "content"],
            Fuzziness::Auto,
        );

        let first = backend
            .search(super::super::ARTICLES_INDEX, &expr, 1, 0)
            .await
            .unwrap();
        let second = backend
            .search(super::super::ARTICLES_INDEX, &expr, 1, 1)
            .await
            .unwrap();
        let both = backend
            .search(super::super::ARTICLES_INDEX, &expr, 2, 0)
            .await
            .unwrap();

        assert_eq!(first.total, 2);
        assert_eq!(first.hits.len(), 1);
        assert_eq!(second.hits.len(), 1);
        assert_ne!(first.hits[0]["id"], second.hits[0]["id"]);
        assert_eq!(both.hits[0], first.hits[0]);
        assert_eq!(both.hits[1], second.hits[0]);
    }

    #[tokio::test]
    async fn test_offset_past_end_returns_empty_page() {
        let backend = backend_with_articles().await;
        let expr = QueryExpression::multi_match(
            "jdoe",
            vec!["author"],
            Fuzziness::Auto,
        );

        let page = backend
            .search(super::super::ARTICLES_INDEX, &expr, 10, 50)
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert!(page.hits.is_empty());
    }

    #[tokio::test]
    async fn test_delete_document_removes_hit() {
        let backend = backend_with_articles().await;
        backend
            .delete_document(super::super::ARTICLES_INDEX, 1)
            .await
            .unwrap();

        let expr = QueryExpression::multi_match("Tutorial", vec!["type"], Fuzziness::Auto);
        let page = backend
            .search(super::super::ARTICLES_INDEX, &expr, 10, 0)
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_unknown_index_yields_empty_page() {
        let backend = MemoryBackend::new();
        let expr = QueryExpression::multi_match("anything", vec!["name"], Fuzziness::Auto);

        let page = backend.search("missing", &expr, 10, 0).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.hits.is_empty());
    }

    #[test]
    fn test_tokenize_splits_and_lowercases() {
        assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
        assert_eq!(tokenize("  "), Vec::<String>::new());
        assert_eq!(tokenize("rust-lang 2024"), vec!["rust", "lang", "2024"]);
    }

    #[test]
    fn test_max_edits_scale() {
        assert_eq!(max_edits(2), 0);
        assert_eq!(max_edits(3), 1);
        assert_eq!(max_edits(5), 1);
        assert_eq!(max_edits(8), 2);
    }

    #[test]
    fn test_short_terms_do_not_fuzz() {
        assert!(!term_matches("ab", "ax", Fuzziness::Auto));
        assert!(term_matches("ab", "ab", Fuzziness::Auto));
    }

    proptest! {
        #[test]
        fn prop_levenshtein_identity(s in "[a-z]{0,12}") {
            prop_assert_eq!(levenshtein(&s, &s), 0);
        }

        #[test]
        fn prop_levenshtein_symmetric(a in "[a-z]{0,10}", b in "[a-z]{0,10}") {
            prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
        }

        #[test]
        fn prop_levenshtein_bounded_by_longer(a in "[a-z]{0,10}", b in "[a-z]{0,10}") {
            let distance = levenshtein(&a, &b);
            prop_assert!(distance <= a.chars().count().max(b.chars().count()));
        }
    }
}
