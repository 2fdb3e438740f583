//! Handlers for the `/portfolio/projects` resource.
//!
//! Projects are returned with their full technology list.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_db::models::project::{CreateProject, Project, UpdateProject};
use validator::Validate;

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::query::ProjectListParams;
use crate::response::CreatedResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

/// GET /api/v1/portfolio/projects
///
/// List projects filtered by flags and technology, sorted and paged.
#[utoipa::path(
    get,
    path = "/api/v1/portfolio/projects",
    tag = "projects",
    operation_id = "list_projects",
    params(ProjectListParams),
    responses(
        (status = 200, description = "Matching projects with their technologies", body = Vec<Project>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProjectListParams>,
) -> AppResult<impl IntoResponse> {
    let criteria = params.into_criteria()?;
    let projects = state.portfolio.list_projects(&criteria).await?;
    Ok(Json(projects))
}

/// POST /api/v1/portfolio/projects
///
/// Create a project and associate the given technologies.
#[utoipa::path(
    post,
    path = "/api/v1/portfolio/projects",
    tag = "projects",
    operation_id = "create_project",
    request_body = CreateProject,
    responses(
        (status = 201, description = "Project created", body = CreatedResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let id = state.portfolio.create_project(&input).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /api/v1/portfolio/projects/{id}
#[utoipa::path(
    get,
    path = "/api/v1/portfolio/projects/{id}",
    tag = "projects",
    operation_id = "get_project",
    params(("id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project found", body = Project),
        (status = 404, description = "Project not found", body = ErrorResponse),
    )
)]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = state
        .portfolio
        .get_project(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(project))
}

/// PATCH /api/v1/portfolio/projects/{id}
///
/// If `technology_ids` is present, replaces the technology associations.
#[utoipa::path(
    patch,
    path = "/api/v1/portfolio/projects/{id}",
    tag = "projects",
    operation_id = "patch_project",
    params(("id" = i64, Path, description = "Project id")),
    request_body = UpdateProject,
    responses(
        (status = 200, description = "Project after the patch", body = Project),
        (status = 404, description = "Project not found", body = ErrorResponse),
    )
)]
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<impl IntoResponse> {
    let project = state
        .portfolio
        .patch_project(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(project))
}

/// PUT /api/v1/portfolio/projects/{id}
///
/// Replace the whole project. Validated like a create.
#[utoipa::path(
    put,
    path = "/api/v1/portfolio/projects/{id}",
    tag = "projects",
    operation_id = "update_project",
    params(("id" = i64, Path, description = "Project id")),
    request_body = CreateProject,
    responses(
        (status = 200, description = "Project after replacement", body = Project),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let project = state
        .portfolio
        .update_project(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(project))
}

/// DELETE /api/v1/portfolio/projects/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/portfolio/projects/{id}",
    tag = "projects",
    operation_id = "delete_project",
    params(("id" = i64, Path, description = "Project id")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Project not found", body = ErrorResponse),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if state.portfolio.delete_project(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
