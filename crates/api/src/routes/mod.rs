pub mod health;
pub mod project;
pub mod technology;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /portfolio/techs                 list, create
/// /portfolio/techs/{id}            get, update, patch, delete
///
/// /portfolio/projects              list, create
/// /portfolio/projects/{id}         get, update, patch, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest(
        "/portfolio",
        Router::new()
            .nest("/techs", technology::router())
            .nest("/projects", project::router()),
    )
}
