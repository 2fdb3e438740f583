//! Handlers for the `/portfolio/techs` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_db::models::technology::{CreateTechnology, Technology, UpdateTechnology};
use validator::Validate;

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::query::TechnologyListParams;
use crate::response::CreatedResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Technology",
        id,
    })
}

/// GET /api/v1/portfolio/techs
///
/// List technologies, optionally restricted to `tech_id`, sorted and paged.
#[utoipa::path(
    get,
    path = "/api/v1/portfolio/techs",
    tag = "technologies",
    operation_id = "list_technologies",
    params(TechnologyListParams),
    responses(
        (status = 200, description = "Matching technologies", body = Vec<Technology>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TechnologyListParams>,
) -> AppResult<impl IntoResponse> {
    let criteria = params.into_criteria()?;
    let technologies = state.portfolio.list_technologies(&criteria).await?;
    Ok(Json(technologies))
}

/// POST /api/v1/portfolio/techs
#[utoipa::path(
    post,
    path = "/api/v1/portfolio/techs",
    tag = "technologies",
    operation_id = "create_technology",
    request_body = CreateTechnology,
    responses(
        (status = 201, description = "Technology created", body = CreatedResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTechnology>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let id = state.portfolio.create_technology(&input).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /api/v1/portfolio/techs/{id}
#[utoipa::path(
    get,
    path = "/api/v1/portfolio/techs/{id}",
    tag = "technologies",
    operation_id = "get_technology",
    params(("id" = i64, Path, description = "Technology id")),
    responses(
        (status = 200, description = "Technology found", body = Technology),
        (status = 404, description = "Technology not found", body = ErrorResponse),
    )
)]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let technology = state
        .portfolio
        .get_technology(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(technology))
}

/// PATCH /api/v1/portfolio/techs/{id}
///
/// Absent or empty `name` keeps the stored name.
#[utoipa::path(
    patch,
    path = "/api/v1/portfolio/techs/{id}",
    tag = "technologies",
    operation_id = "patch_technology",
    params(("id" = i64, Path, description = "Technology id")),
    request_body = UpdateTechnology,
    responses(
        (status = 200, description = "Technology after the patch", body = Technology),
        (status = 404, description = "Technology not found", body = ErrorResponse),
    )
)]
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTechnology>,
) -> AppResult<impl IntoResponse> {
    let technology = state
        .portfolio
        .patch_technology(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(technology))
}

/// PUT /api/v1/portfolio/techs/{id}
///
/// Replace the whole technology. Validated like a create.
#[utoipa::path(
    put,
    path = "/api/v1/portfolio/techs/{id}",
    tag = "technologies",
    operation_id = "update_technology",
    params(("id" = i64, Path, description = "Technology id")),
    request_body = CreateTechnology,
    responses(
        (status = 200, description = "Technology after replacement", body = Technology),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 404, description = "Technology not found", body = ErrorResponse),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateTechnology>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let technology = state
        .portfolio
        .update_technology(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(technology))
}

/// DELETE /api/v1/portfolio/techs/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/portfolio/techs/{id}",
    tag = "technologies",
    operation_id = "delete_technology",
    params(("id" = i64, Path, description = "Technology id")),
    responses(
        (status = 204, description = "Technology deleted"),
        (status = 404, description = "Technology not found", body = ErrorResponse),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if state.portfolio.delete_technology(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
