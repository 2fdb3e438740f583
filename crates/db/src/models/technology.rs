//! Technology entity model and DTOs.

use folio_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A row from the `technologies` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, ToSchema)]
pub struct Technology {
    #[schema(value_type = i64)]
    pub id: DbId,
    pub name: String,
    /// Icon reference (inline SVG or URL).
    pub svg: Option<String>,
}

/// DTO for creating a new technology.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTechnology {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub svg: Option<String>,
}

/// DTO for patching a technology. Absent fields and empty names are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTechnology {
    pub name: Option<String>,
    pub svg: Option<String>,
}
