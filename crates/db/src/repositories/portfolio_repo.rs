//! Storage capability set consumed by the service layer.
//!
//! [`PortfolioRepository`] is the seam between HTTP handling and Postgres:
//! production wires in [`PgPortfolioRepository`], tests substitute an
//! in-memory implementation.

use async_trait::async_trait;
use folio_core::criteria::{ProjectCriteria, TechnologyCriteria};
use folio_core::types::DbId;
use sqlx::PgPool;

use super::{ProjectRepo, TechnologyRepo};
use crate::error::RepoError;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::technology::{CreateTechnology, Technology, UpdateTechnology};

/// Persistence operations for technologies and projects.
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    // -- Technologies ---------------------------------------------------------

    async fn create_technology(&self, input: &CreateTechnology) -> Result<DbId, RepoError>;

    async fn get_technology(&self, id: DbId) -> Result<Option<Technology>, RepoError>;

    async fn list_technologies(
        &self,
        criteria: &TechnologyCriteria,
    ) -> Result<Vec<Technology>, RepoError>;

    /// Returns `None` if the technology does not exist.
    async fn patch_technology(
        &self,
        id: DbId,
        input: &UpdateTechnology,
    ) -> Result<Option<Technology>, RepoError>;

    /// Full replacement. Returns `None` if the technology does not exist.
    async fn update_technology(
        &self,
        id: DbId,
        input: &CreateTechnology,
    ) -> Result<Option<Technology>, RepoError>;

    /// Returns `false` if the technology does not exist.
    async fn delete_technology(&self, id: DbId) -> Result<bool, RepoError>;

    // -- Projects -------------------------------------------------------------

    async fn create_project(&self, input: &CreateProject) -> Result<DbId, RepoError>;

    async fn get_project(&self, id: DbId) -> Result<Option<Project>, RepoError>;

    async fn list_projects(&self, criteria: &ProjectCriteria) -> Result<Vec<Project>, RepoError>;

    /// Returns `None` if the project does not exist.
    async fn patch_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, RepoError>;

    /// Full replacement, including the association set. Returns `None` if
    /// the project does not exist.
    async fn update_project(
        &self,
        id: DbId,
        input: &CreateProject,
    ) -> Result<Option<Project>, RepoError>;

    /// Returns `false` if the project does not exist.
    async fn delete_project(&self, id: DbId) -> Result<bool, RepoError>;

    // -- Health ---------------------------------------------------------------

    /// Confirm the backing store is reachable.
    async fn ping(&self) -> Result<(), RepoError>;
}

/// Postgres-backed [`PortfolioRepository`].
#[derive(Debug, Clone)]
pub struct PgPortfolioRepository {
    pool: PgPool,
}

impl PgPortfolioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortfolioRepository for PgPortfolioRepository {
    async fn create_technology(&self, input: &CreateTechnology) -> Result<DbId, RepoError> {
        TechnologyRepo::create(&self.pool, input).await
    }

    async fn get_technology(&self, id: DbId) -> Result<Option<Technology>, RepoError> {
        TechnologyRepo::find_by_id(&self.pool, id).await
    }

    async fn list_technologies(
        &self,
        criteria: &TechnologyCriteria,
    ) -> Result<Vec<Technology>, RepoError> {
        TechnologyRepo::list(&self.pool, criteria).await
    }

    async fn patch_technology(
        &self,
        id: DbId,
        input: &UpdateTechnology,
    ) -> Result<Option<Technology>, RepoError> {
        TechnologyRepo::patch(&self.pool, id, input).await
    }

    async fn update_technology(
        &self,
        id: DbId,
        input: &CreateTechnology,
    ) -> Result<Option<Technology>, RepoError> {
        TechnologyRepo::update(&self.pool, id, input).await
    }

    async fn delete_technology(&self, id: DbId) -> Result<bool, RepoError> {
        TechnologyRepo::delete(&self.pool, id).await
    }

    async fn create_project(&self, input: &CreateProject) -> Result<DbId, RepoError> {
        ProjectRepo::create(&self.pool, input).await
    }

    async fn get_project(&self, id: DbId) -> Result<Option<Project>, RepoError> {
        ProjectRepo::find_by_id(&self.pool, id).await
    }

    async fn list_projects(&self, criteria: &ProjectCriteria) -> Result<Vec<Project>, RepoError> {
        ProjectRepo::list(&self.pool, criteria).await
    }

    async fn patch_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, RepoError> {
        ProjectRepo::patch(&self.pool, id, input).await
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &CreateProject,
    ) -> Result<Option<Project>, RepoError> {
        ProjectRepo::update(&self.pool, id, input).await
    }

    async fn delete_project(&self, id: DbId) -> Result<bool, RepoError> {
        ProjectRepo::delete(&self.pool, id).await
    }

    async fn ping(&self) -> Result<(), RepoError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
