//! Repository for the `technologies` table.

use folio_core::criteria::TechnologyCriteria;
use folio_core::types::DbId;
use sqlx::PgPool;

use super::non_empty;
use crate::error::RepoError;
use crate::models::technology::{CreateTechnology, Technology, UpdateTechnology};
use crate::query::{DeleteQuery, InsertQuery, Predicate, SelectQuery, UpdateQuery};

const TABLE: &str = "technologies";

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, svg";

/// Column list for INSERT (excludes auto-generated `id`).
const INSERT_COLUMNS: &[&str] = &["name", "svg"];

/// Stable secondary ordering applied to every list.
const TIEBREAK: &[&str] = &["name", "id"];

/// Provides CRUD operations for technologies.
pub struct TechnologyRepo;

impl TechnologyRepo {
    /// Insert a new technology, returning its generated ID.
    pub async fn create(pool: &PgPool, input: &CreateTechnology) -> Result<DbId, RepoError> {
        let stmt = InsertQuery::new(TABLE, INSERT_COLUMNS)
            .row(vec![input.name.clone().into(), input.svg.clone().into()])
            .returning("id")
            .build()?;
        let id = stmt.query_scalar::<DbId>().fetch_one(pool).await?;
        tracing::info!(technology_id = id, "Technology created");
        Ok(id)
    }

    /// Find a technology by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Technology>, RepoError> {
        let stmt = SelectQuery::new(TABLE, COLUMNS)
            .filter(Predicate::eq("id", id))
            .build()?;
        let technology = stmt.query_as::<Technology>().fetch_optional(pool).await?;
        Ok(technology)
    }

    /// List technologies matching `criteria`.
    ///
    /// Always ordered by name then id after any requested sort.
    pub async fn list(
        pool: &PgPool,
        criteria: &TechnologyCriteria,
    ) -> Result<Vec<Technology>, RepoError> {
        let mut query = SelectQuery::new(TABLE, COLUMNS);
        if !criteria.ids.is_empty() {
            query = query.filter(Predicate::any_of("id", criteria.ids.clone()));
        }
        let stmt = query
            .order_by(criteria.sort)
            .tiebreak(TIEBREAK)
            .limit(criteria.page.limit)
            .offset(criteria.page.offset)
            .build()?;

        tracing::debug!(sql = %stmt.sql, binds = stmt.binds.len(), "Listing technologies");
        let technologies = stmt.query_as::<Technology>().fetch_all(pool).await?;
        Ok(technologies)
    }

    /// Patch a technology. Only present, non-empty fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn patch(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTechnology,
    ) -> Result<Option<Technology>, RepoError> {
        let update = UpdateQuery::new(TABLE)
            .set_opt("name", non_empty(&input.name))
            .set_opt("svg", input.svg.clone())
            .key("id", id)
            .returning(COLUMNS);

        if update.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let stmt = update.build()?;
        let technology = stmt.query_as::<Technology>().fetch_optional(pool).await?;
        if technology.is_some() {
            tracing::info!(technology_id = id, "Technology updated");
        }
        Ok(technology)
    }

    /// Replace every column of a technology. An absent `svg` clears it.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateTechnology,
    ) -> Result<Option<Technology>, RepoError> {
        let stmt = UpdateQuery::new(TABLE)
            .set("name", input.name.clone())
            .set("svg", input.svg.clone())
            .key("id", id)
            .returning(COLUMNS)
            .build()?;
        let technology = stmt.query_as::<Technology>().fetch_optional(pool).await?;
        if technology.is_some() {
            tracing::info!(technology_id = id, "Technology replaced");
        }
        Ok(technology)
    }

    /// Delete a technology by ID. Returns `true` if a row was removed.
    ///
    /// Association rows are removed by the `project_tech` foreign key.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, RepoError> {
        let stmt = DeleteQuery::new(TABLE)
            .filter(Predicate::eq("id", id))
            .build()?;
        let result = stmt.query().execute(pool).await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(technology_id = id, "Technology deleted");
        }
        Ok(deleted)
    }
}
