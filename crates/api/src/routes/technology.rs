//! Route definitions for technologies.

use axum::routing::get;
use axum::Router;

use crate::handlers::technology;
use crate::state::AppState;

/// Routes mounted at `/portfolio/techs`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// PATCH  /{id}    -> patch
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(technology::list).post(technology::create))
        .route(
            "/{id}",
            get(technology::get_by_id)
                .put(technology::update)
                .patch(technology::patch)
                .delete(technology::delete),
        )
}
