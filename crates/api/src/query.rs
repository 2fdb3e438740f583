//! Query parameter types for the list endpoints.
//!
//! Each struct mirrors the raw `?key=value` surface and converts into the
//! typed criteria the repositories accept. Conversion is where invalid
//! sort fields, negative pagination and malformed id lists are rejected.

use folio_core::criteria::{
    parse_id_list, Page, ProjectCriteria, Sort, TechnologyCriteria, PROJECT_SORT_FIELDS,
    TECHNOLOGY_SORT_FIELDS,
};
use folio_core::error::CoreError;
use serde::Deserialize;
use utoipa::IntoParams;

/// `GET /techs?tech_id=1,2&sort_field=name&sort_order=desc&limit=&offset=`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TechnologyListParams {
    /// Comma-separated technology ids.
    pub tech_id: Option<String>,
    /// `id` or `name`.
    pub sort_field: Option<String>,
    /// `asc` (default) or `desc`.
    pub sort_order: Option<String>,
    /// Maximum rows; 0 or absent means unbounded.
    pub limit: Option<i64>,
    /// Rows to skip; 0 or absent means none.
    pub offset: Option<i64>,
}

impl TechnologyListParams {
    pub fn into_criteria(self) -> Result<TechnologyCriteria, CoreError> {
        Ok(TechnologyCriteria {
            ids: parse_id_list(self.tech_id.as_deref().unwrap_or_default())?,
            sort: Sort::parse(
                self.sort_field.as_deref(),
                self.sort_order.as_deref(),
                TECHNOLOGY_SORT_FIELDS,
            )?,
            page: Page::new(self.limit, self.offset)?,
        })
    }
}

/// `GET /projects?tech_id=&is_active=&is_archived=&is_developing=&sort_field=&sort_order=&limit=&offset=`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectListParams {
    /// Comma-separated technology ids; keeps projects using any of them.
    pub tech_id: Option<String>,
    pub is_active: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_developing: Option<bool>,
    /// `id`, `title`, `version`, `description`, `is_active`, `is_archived`
    /// or `is_developing`.
    pub sort_field: Option<String>,
    /// `asc` (default) or `desc`.
    pub sort_order: Option<String>,
    /// Maximum projects; 0 or absent means unbounded.
    pub limit: Option<i64>,
    /// Projects to skip; 0 or absent means none.
    pub offset: Option<i64>,
}

impl ProjectListParams {
    pub fn into_criteria(self) -> Result<ProjectCriteria, CoreError> {
        Ok(ProjectCriteria {
            technology_ids: parse_id_list(self.tech_id.as_deref().unwrap_or_default())?,
            is_active: self.is_active,
            is_archived: self.is_archived,
            is_developing: self.is_developing,
            sort: Sort::parse(
                self.sort_field.as_deref(),
                self.sort_order.as_deref(),
                PROJECT_SORT_FIELDS,
            )?,
            page: Page::new(self.limit, self.offset)?,
        })
    }
}
