//! Service layer between handlers and storage.
//!
//! [`PortfolioService`] forwards each operation to the configured
//! [`PortfolioRepository`] unchanged. Handlers depend on the service, never
//! on a concrete repository, so tests can swap in an in-memory store.

use std::sync::Arc;

use folio_core::criteria::{ProjectCriteria, TechnologyCriteria};
use folio_core::types::DbId;
use folio_db::models::project::{CreateProject, Project, UpdateProject};
use folio_db::models::technology::{CreateTechnology, Technology, UpdateTechnology};
use folio_db::repositories::PortfolioRepository;
use folio_db::RepoError;

/// Cheaply cloneable handle over a shared repository.
#[derive(Clone)]
pub struct PortfolioService {
    repo: Arc<dyn PortfolioRepository>,
}

impl PortfolioService {
    pub fn new(repo: Arc<dyn PortfolioRepository>) -> Self {
        Self { repo }
    }

    // -- Technologies ---------------------------------------------------------

    pub async fn create_technology(&self, input: &CreateTechnology) -> Result<DbId, RepoError> {
        self.repo.create_technology(input).await
    }

    pub async fn get_technology(&self, id: DbId) -> Result<Option<Technology>, RepoError> {
        self.repo.get_technology(id).await
    }

    pub async fn list_technologies(
        &self,
        criteria: &TechnologyCriteria,
    ) -> Result<Vec<Technology>, RepoError> {
        self.repo.list_technologies(criteria).await
    }

    pub async fn patch_technology(
        &self,
        id: DbId,
        input: &UpdateTechnology,
    ) -> Result<Option<Technology>, RepoError> {
        self.repo.patch_technology(id, input).await
    }

    pub async fn update_technology(
        &self,
        id: DbId,
        input: &CreateTechnology,
    ) -> Result<Option<Technology>, RepoError> {
        self.repo.update_technology(id, input).await
    }

    pub async fn delete_technology(&self, id: DbId) -> Result<bool, RepoError> {
        self.repo.delete_technology(id).await
    }

    // -- Projects -------------------------------------------------------------

    pub async fn create_project(&self, input: &CreateProject) -> Result<DbId, RepoError> {
        self.repo.create_project(input).await
    }

    pub async fn get_project(&self, id: DbId) -> Result<Option<Project>, RepoError> {
        self.repo.get_project(id).await
    }

    pub async fn list_projects(&self, criteria: &ProjectCriteria) -> Result<Vec<Project>, RepoError> {
        self.repo.list_projects(criteria).await
    }

    pub async fn patch_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, RepoError> {
        self.repo.patch_project(id, input).await
    }

    pub async fn update_project(
        &self,
        id: DbId,
        input: &CreateProject,
    ) -> Result<Option<Project>, RepoError> {
        self.repo.update_project(id, input).await
    }

    pub async fn delete_project(&self, id: DbId) -> Result<bool, RepoError> {
        self.repo.delete_project(id).await
    }

    // -- Health ---------------------------------------------------------------

    pub async fn ping(&self) -> Result<(), RepoError> {
        self.repo.ping().await
    }
}
