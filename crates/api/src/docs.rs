//! OpenAPI document for the HTTP surface, served under `/swagger`.

use folio_db::models::project::{CreateProject, Project, UpdateProject};
use folio_db::models::technology::{CreateTechnology, Technology, UpdateTechnology};
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers::{project, technology};
use crate::response::CreatedResponse;
use crate::routes::health::{self, HealthResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Folio API",
        description = "Technologies and projects behind a portfolio website"
    ),
    paths(
        health::health_check,
        health::ping,
        technology::list,
        technology::create,
        technology::get_by_id,
        technology::update,
        technology::patch,
        technology::delete,
        project::list,
        project::create,
        project::get_by_id,
        project::update,
        project::patch,
        project::delete,
    ),
    components(schemas(
        Technology,
        CreateTechnology,
        UpdateTechnology,
        Project,
        CreateProject,
        UpdateProject,
        CreatedResponse,
        ErrorResponse,
        HealthResponse,
    )),
    tags(
        (name = "technologies", description = "Technologies shown on the portfolio"),
        (name = "projects", description = "Projects and the technologies they use"),
        (name = "health", description = "Liveness and database health"),
    )
)]
pub struct ApiDoc;
