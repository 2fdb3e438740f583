//! Project entity model and DTOs.
//!
//! Projects are associated with technologies through the `project_tech`
//! junction table. Reads join both sides and fold the rows back together
//! via [`ProjectTechnologyRow`].

use folio_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::technology::Technology;
use crate::aggregate::JoinedRow;

/// A project enriched with its associated technologies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Project {
    #[schema(value_type = i64)]
    pub id: DbId,
    pub title: String,
    pub version: String,
    pub description: String,
    /// `None` means the flag was never specified.
    pub is_active: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_developing: Option<bool>,
    pub links: Vec<String>,
    pub technologies: Vec<Technology>,
}

/// One row of `projects LEFT JOIN project_tech LEFT JOIN technologies`.
///
/// The `tech_*` columns are all null when the project has no technologies.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectTechnologyRow {
    pub id: DbId,
    pub title: String,
    pub version: String,
    pub description: String,
    pub is_active: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_developing: Option<bool>,
    pub links: Vec<String>,
    pub tech_id: Option<DbId>,
    pub tech_name: Option<String>,
    pub tech_svg: Option<String>,
}

impl JoinedRow for ProjectTechnologyRow {
    type Parent = Project;
    type Child = Technology;

    fn parent_id(&self) -> DbId {
        self.id
    }

    fn into_parts(self) -> (Project, Option<Technology>) {
        let technology = match (self.tech_id, self.tech_name) {
            (Some(id), Some(name)) => Some(Technology {
                id,
                name,
                svg: self.tech_svg,
            }),
            _ => None,
        };

        let project = Project {
            id: self.id,
            title: self.title,
            version: self.version,
            description: self.description,
            is_active: self.is_active,
            is_archived: self.is_archived,
            is_developing: self.is_developing,
            links: self.links,
            technologies: Vec::new(),
        };

        (project, technology)
    }

    fn attach(parent: &mut Project, child: Technology) {
        parent.technologies.push(child);
    }
}

/// DTO for creating a new project together with its technology associations.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProject {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "version must not be empty"))]
    pub version: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    pub is_active: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_developing: Option<bool>,
    #[serde(default)]
    pub links: Vec<String>,
    /// Technology IDs to associate with this project.
    #[serde(default, alias = "tech_id")]
    #[schema(value_type = Vec<i64>)]
    pub technology_ids: Vec<DbId>,
}

/// DTO for patching a project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_developing: Option<bool>,
    pub links: Option<Vec<String>>,
    /// If `Some`, replaces all technology associations. If `None`, leaves
    /// them unchanged.
    #[serde(alias = "tech_id")]
    #[schema(value_type = Option<Vec<i64>>)]
    pub technology_ids: Option<Vec<DbId>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;

    fn row(id: DbId, title: &str, tech: Option<(DbId, &str)>) -> ProjectTechnologyRow {
        ProjectTechnologyRow {
            id,
            title: title.to_string(),
            version: "1.0".to_string(),
            description: "desc".to_string(),
            is_active: Some(true),
            is_archived: None,
            is_developing: Some(false),
            links: vec!["https://example.com".to_string()],
            tech_id: tech.map(|(id, _)| id),
            tech_name: tech.map(|(_, name)| name.to_string()),
            tech_svg: None,
        }
    }

    #[test]
    fn folds_joined_rows_into_projects() {
        let projects = aggregate(vec![
            row(1, "Alpha", Some((10, "Go"))),
            row(1, "Alpha", Some((11, "Rust"))),
            row(2, "Beta", None),
        ]);

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].title, "Alpha");
        let names: Vec<&str> = projects[0]
            .technologies
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["Go", "Rust"]);
        assert_eq!(projects[0].is_archived, None);
        assert_eq!(projects[0].links, vec!["https://example.com"]);

        assert_eq!(projects[1].title, "Beta");
        assert!(projects[1].technologies.is_empty());
    }

    #[test]
    fn create_dto_defaults_collections() {
        let input: CreateProject = serde_json::from_value(serde_json::json!({
            "title": "Site",
            "version": "0.1",
            "description": "Portfolio"
        }))
        .unwrap();
        assert!(input.links.is_empty());
        assert!(input.technology_ids.is_empty());
        assert_eq!(input.is_active, None);
    }

    #[test]
    fn create_dto_rejects_empty_title() {
        let input = CreateProject {
            title: String::new(),
            version: "1".into(),
            description: "d".into(),
            is_active: None,
            is_archived: None,
            is_developing: None,
            links: vec![],
            technology_ids: vec![],
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_dto_distinguishes_absent_from_empty_technologies() {
        let absent: UpdateProject = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(absent.technology_ids, None);

        let cleared: UpdateProject =
            serde_json::from_value(serde_json::json!({ "technology_ids": [] })).unwrap();
        assert_eq!(cleared.technology_ids, Some(vec![]));
    }
}
