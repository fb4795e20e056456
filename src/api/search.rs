//! Search API endpoints
//!
//! Handles HTTP requests for index-backed search:
//! - GET /api/v1/search/users/:query
//! - GET /api/v1/search/categories/:query
//! - GET /api/v1/search/articles/:query
//!
//! All three endpoints share one handler that takes a free-text query,
//! executes the entity's query expression against its index, paginates by
//! limit/offset, and serializes the hit page. The endpoints differ only in
//! the fields searched and the matching mode. Any failure along that path
//! is surfaced as a 500 whose body is the stringified error.

use anyhow::Context;
use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::api::common::{page_links, PageQuery};
use crate::api::middleware::AppState;
use crate::api::responses::PaginatedResponse;
use crate::search::{
    ArticleDocument, CategoryDocument, Fuzziness, QueryExpression, UserDocument, ARTICLES_INDEX,
    CATEGORIES_INDEX, USERS_INDEX,
};

/// A searchable entity: its index, hit type, and query strategy.
///
/// Supplying the query expression is the only per-entity obligation; the
/// shared handler does everything else.
pub trait SearchEntity: Send + Sync + 'static {
    /// Hit type deserialized from the index and returned in `results`
    type Hit: Serialize + DeserializeOwned + Send + 'static;

    /// Name of the backing index
    const INDEX: &'static str;

    /// Build the query expression for a free-text query
    fn query_expression(query: &str) -> QueryExpression;
}

/// User search: boolean "should" across the name fields, at least one
/// clause must match, no fuzziness.
pub struct UserSearch;

impl SearchEntity for UserSearch {
    type Hit = UserDocument;
    const INDEX: &'static str = USERS_INDEX;

    fn query_expression(query: &str) -> QueryExpression {
        QueryExpression::bool_should(query, vec!["username", "first_name", "last_name"], 1)
    }
}

/// Category search: fuzzy multi-field match over name and description.
pub struct CategorySearch;

impl SearchEntity for CategorySearch {
    type Hit = CategoryDocument;
    const INDEX: &'static str = CATEGORIES_INDEX;

    fn query_expression(query: &str) -> QueryExpression {
        QueryExpression::multi_match(query, vec!["name", "description"], Fuzziness::Auto)
    }
}

/// Article search: fuzzy multi-field match over title, author, type and
/// content.
pub struct ArticleSearch;

impl SearchEntity for ArticleSearch {
    type Hit = ArticleDocument;
    const INDEX: &'static str = ARTICLES_INDEX;

    fn query_expression(query: &str) -> QueryExpression {
        QueryExpression::multi_match(
            query,
            vec!["title", "author", "type", "content"],
            Fuzziness::Auto,
        )
    }
}

/// Build the search router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{query}", get(search_handler::<UserSearch>))
        .route("/categories/{query}", get(search_handler::<CategorySearch>))
        .route("/articles/{query}", get(search_handler::<ArticleSearch>))
}

/// GET /api/v1/search/<entity>/:query - Paginated search
async fn search_handler<E: SearchEntity>(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(page): Query<PageQuery>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    match run_search::<E>(&state, &query, &page, uri.path()).await {
        Ok(body) => body.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn run_search<E: SearchEntity>(
    state: &AppState,
    query: &str,
    page: &PageQuery,
    path: &str,
) -> anyhow::Result<Json<PaginatedResponse<E::Hit>>> {
    let (limit, offset) = state.pagination.resolve(page.limit, page.offset);

    let expression = E::query_expression(query);
    let hit_page = state
        .search
        .search(E::INDEX, &expression, limit, offset)
        .await?;

    tracing::info!("Found {} hit(s) for query: {:?}", hit_page.total, query);

    let mut results = Vec::with_capacity(hit_page.hits.len());
    for hit in hit_page.hits {
        results.push(
            serde_json::from_value::<E::Hit>(hit)
                .with_context(|| format!("Malformed hit in index {}", E::INDEX))?,
        );
    }

    let links = page_links(path, limit, offset, hit_page.total);
    Ok(Json(PaginatedResponse::new(hit_page.total, links, results)))
}
