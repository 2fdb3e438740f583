#![allow(dead_code)]

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use folio_api::config::ServerConfig;
use folio_api::router::build_app_router;
use folio_api::service::PortfolioService;
use folio_api::state::AppState;
use folio_core::criteria::{Page, ProjectCriteria, Sort, SortOrder, TechnologyCriteria};
use folio_core::types::DbId;
use folio_db::models::project::{CreateProject, Project, UpdateProject};
use folio_db::models::technology::{CreateTechnology, Technology, UpdateTechnology};
use folio_db::repositories::PortfolioRepository;
use folio_db::RepoError;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: "postgres://unused".to_string(),
        database_max_connections: 1,
    }
}

/// Build the full application router over the given repository.
///
/// Uses the same [`build_app_router`] as production so tests exercise the
/// real middleware stack.
pub fn build_test_app(repo: Arc<dyn PortfolioRepository>) -> Router {
    let config = test_config();
    let state = AppState {
        portfolio: PortfolioService::new(repo),
    };
    build_app_router(state, &config).unwrap()
}

/// Router over a fresh in-memory repository, plus a handle to that repository.
pub fn mock_app() -> (Router, Arc<MockPortfolioRepository>) {
    let repo = Arc::new(MockPortfolioRepository::default());
    (build_test_app(repo.clone()), repo)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PATCH, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, body).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// In-memory repository
// ---------------------------------------------------------------------------

/// A project row plus its association set, as the junction table would hold it.
#[derive(Debug, Clone)]
struct StoredProject {
    project: Project,
    technology_ids: Vec<DbId>,
}

#[derive(Debug, Default)]
struct MockData {
    next_id: DbId,
    technologies: Vec<Technology>,
    projects: Vec<StoredProject>,
}

impl MockData {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn resolve(&self, stored: &StoredProject) -> Project {
        let mut technologies: Vec<Technology> = self
            .technologies
            .iter()
            .filter(|t| stored.technology_ids.contains(&t.id))
            .cloned()
            .collect();
        technologies.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Project {
            technologies,
            ..stored.project.clone()
        }
    }
}

/// In-memory [`PortfolioRepository`] mirroring the Postgres semantics that
/// handlers rely on: ordering with tiebreaks, pagination, patch rules and
/// association replacement.
#[derive(Debug, Default)]
pub struct MockPortfolioRepository {
    data: Mutex<MockData>,
    unhealthy: AtomicBool,
}

impl MockPortfolioRepository {
    pub fn set_healthy(&self, healthy: bool) {
        self.unhealthy.store(!healthy, AtomicOrdering::SeqCst);
    }

    pub fn technology_count(&self) -> usize {
        self.data.lock().unwrap().technologies.len()
    }

    pub fn project_count(&self) -> usize {
        self.data.lock().unwrap().projects.len()
    }
}

fn directed(order: SortOrder, ordering: Ordering) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    let offset = page.offset.unwrap_or(0) as usize;
    let limit = page.limit.map_or(usize::MAX, |l| l as usize);
    items.into_iter().skip(offset).take(limit).collect()
}

fn compare_technologies(sort: Option<Sort>, a: &Technology, b: &Technology) -> Ordering {
    let primary = match sort {
        Some(s) if s.column == "id" => directed(s.order, a.id.cmp(&b.id)),
        Some(s) => directed(s.order, a.name.cmp(&b.name)),
        None => Ordering::Equal,
    };
    primary
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

fn compare_projects(sort: Option<Sort>, a: &Project, b: &Project) -> Ordering {
    let primary = match sort {
        Some(s) => {
            let ordering = match s.column {
                "id" => a.id.cmp(&b.id),
                "version" => a.version.cmp(&b.version),
                "description" => a.description.cmp(&b.description),
                "is_active" => a.is_active.cmp(&b.is_active),
                "is_archived" => a.is_archived.cmp(&b.is_archived),
                "is_developing" => a.is_developing.cmp(&b.is_developing),
                _ => a.title.cmp(&b.title),
            };
            directed(s.order, ordering)
        }
        None => Ordering::Equal,
    };
    primary
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

fn dedup(ids: &[DbId]) -> Vec<DbId> {
    let mut unique = Vec::new();
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}

fn keep_or_replace(current: &mut String, value: &Option<String>) {
    if let Some(v) = value.as_ref().filter(|v| !v.is_empty()) {
        *current = v.clone();
    }
}

#[async_trait]
impl PortfolioRepository for MockPortfolioRepository {
    async fn create_technology(&self, input: &CreateTechnology) -> Result<DbId, RepoError> {
        let mut data = self.data.lock().unwrap();
        let id = data.allocate_id();
        data.technologies.push(Technology {
            id,
            name: input.name.clone(),
            svg: input.svg.clone(),
        });
        Ok(id)
    }

    async fn get_technology(&self, id: DbId) -> Result<Option<Technology>, RepoError> {
        let data = self.data.lock().unwrap();
        Ok(data.technologies.iter().find(|t| t.id == id).cloned())
    }

    async fn list_technologies(
        &self,
        criteria: &TechnologyCriteria,
    ) -> Result<Vec<Technology>, RepoError> {
        let data = self.data.lock().unwrap();
        let mut list: Vec<Technology> = data
            .technologies
            .iter()
            .filter(|t| criteria.ids.is_empty() || criteria.ids.contains(&t.id))
            .cloned()
            .collect();
        list.sort_by(|a, b| compare_technologies(criteria.sort, a, b));
        Ok(paginate(list, criteria.page))
    }

    async fn patch_technology(
        &self,
        id: DbId,
        input: &UpdateTechnology,
    ) -> Result<Option<Technology>, RepoError> {
        let mut data = self.data.lock().unwrap();
        let Some(technology) = data.technologies.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        keep_or_replace(&mut technology.name, &input.name);
        if let Some(svg) = &input.svg {
            technology.svg = Some(svg.clone());
        }
        Ok(Some(technology.clone()))
    }

    async fn update_technology(
        &self,
        id: DbId,
        input: &CreateTechnology,
    ) -> Result<Option<Technology>, RepoError> {
        let mut data = self.data.lock().unwrap();
        let Some(technology) = data.technologies.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        technology.name = input.name.clone();
        technology.svg = input.svg.clone();
        Ok(Some(technology.clone()))
    }

    async fn delete_technology(&self, id: DbId) -> Result<bool, RepoError> {
        let mut data = self.data.lock().unwrap();
        let before = data.technologies.len();
        data.technologies.retain(|t| t.id != id);
        let deleted = data.technologies.len() < before;
        if deleted {
            for stored in &mut data.projects {
                stored.technology_ids.retain(|t| *t != id);
            }
        }
        Ok(deleted)
    }

    async fn create_project(&self, input: &CreateProject) -> Result<DbId, RepoError> {
        let mut data = self.data.lock().unwrap();
        let id = data.allocate_id();
        data.projects.push(StoredProject {
            project: Project {
                id,
                title: input.title.clone(),
                version: input.version.clone(),
                description: input.description.clone(),
                is_active: input.is_active,
                is_archived: input.is_archived,
                is_developing: input.is_developing,
                links: input.links.clone(),
                technologies: Vec::new(),
            },
            technology_ids: dedup(&input.technology_ids),
        });
        Ok(id)
    }

    async fn get_project(&self, id: DbId) -> Result<Option<Project>, RepoError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .projects
            .iter()
            .find(|p| p.project.id == id)
            .map(|p| data.resolve(p)))
    }

    async fn list_projects(&self, criteria: &ProjectCriteria) -> Result<Vec<Project>, RepoError> {
        let data = self.data.lock().unwrap();
        let flag_matches = |wanted: Option<bool>, actual: Option<bool>| match wanted {
            Some(w) => actual == Some(w),
            None => true,
        };
        let mut list: Vec<Project> = data
            .projects
            .iter()
            .filter(|p| {
                criteria.technology_ids.is_empty()
                    || p
                        .technology_ids
                        .iter()
                        .any(|t| criteria.technology_ids.contains(t))
            })
            .filter(|p| flag_matches(criteria.is_active, p.project.is_active))
            .filter(|p| flag_matches(criteria.is_archived, p.project.is_archived))
            .filter(|p| flag_matches(criteria.is_developing, p.project.is_developing))
            .map(|p| data.resolve(p))
            .collect();
        list.sort_by(|a, b| compare_projects(criteria.sort, a, b));
        Ok(paginate(list, criteria.page))
    }

    async fn patch_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, RepoError> {
        let mut data = self.data.lock().unwrap();
        let Some(stored) = data.projects.iter_mut().find(|p| p.project.id == id) else {
            return Ok(None);
        };
        let project = &mut stored.project;
        keep_or_replace(&mut project.title, &input.title);
        keep_or_replace(&mut project.version, &input.version);
        keep_or_replace(&mut project.description, &input.description);
        if input.is_active.is_some() {
            project.is_active = input.is_active;
        }
        if input.is_archived.is_some() {
            project.is_archived = input.is_archived;
        }
        if input.is_developing.is_some() {
            project.is_developing = input.is_developing;
        }
        if let Some(links) = &input.links {
            project.links = links.clone();
        }
        if let Some(ids) = &input.technology_ids {
            stored.technology_ids = dedup(ids);
        }
        let snapshot = stored.clone();
        Ok(Some(data.resolve(&snapshot)))
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &CreateProject,
    ) -> Result<Option<Project>, RepoError> {
        let mut data = self.data.lock().unwrap();
        let Some(stored) = data.projects.iter_mut().find(|p| p.project.id == id) else {
            return Ok(None);
        };
        stored.project = Project {
            id,
            title: input.title.clone(),
            version: input.version.clone(),
            description: input.description.clone(),
            is_active: input.is_active,
            is_archived: input.is_archived,
            is_developing: input.is_developing,
            links: input.links.clone(),
            technologies: Vec::new(),
        };
        stored.technology_ids = dedup(&input.technology_ids);
        let snapshot = stored.clone();
        Ok(Some(data.resolve(&snapshot)))
    }

    async fn delete_project(&self, id: DbId) -> Result<bool, RepoError> {
        let mut data = self.data.lock().unwrap();
        let before = data.projects.len();
        data.projects.retain(|p| p.project.id != id);
        Ok(data.projects.len() < before)
    }

    async fn ping(&self) -> Result<(), RepoError> {
        if self.unhealthy.load(AtomicOrdering::SeqCst) {
            Err(RepoError::Execution(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}
