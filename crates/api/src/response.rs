//! Shared response payloads for API handlers.

use folio_core::types::DbId;
use serde::Serialize;
use utoipa::ToSchema;

/// Body of a successful create: the generated identifier.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    #[schema(value_type = i64)]
    pub id: DbId,
}
