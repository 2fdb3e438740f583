//! Repository for the `projects` and `project_tech` tables.
//!
//! Reads select a page of projects in a subquery, LEFT JOIN their
//! technologies and fold the joined rows back into [`Project`]s. Paginating
//! the subquery keeps `LIMIT`/`OFFSET` counting projects rather than joined
//! rows, and filtering on technology ids through `project_tech` keeps every
//! returned project's technology list complete.

use folio_core::criteria::{ProjectCriteria, Sort};
use folio_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use super::non_empty;
use crate::aggregate::aggregate;
use crate::error::RepoError;
use crate::models::project::{CreateProject, Project, ProjectTechnologyRow, UpdateProject};
use crate::query::{
    order_by_clause, DeleteQuery, InsertQuery, Predicate, SelectQuery, Statement, UpdateQuery,
};

const TABLE: &str = "projects";

/// Column list for the `projects` table.
const COLUMNS: &str =
    "id, title, version, description, is_active, is_archived, is_developing, links";

/// Column list for INSERT (excludes auto-generated `id`).
const INSERT_COLUMNS: &[&str] = &[
    "title",
    "version",
    "description",
    "is_active",
    "is_archived",
    "is_developing",
    "links",
];

/// Stable secondary ordering applied to every list. `id` last keeps each
/// project's joined rows contiguous.
const TIEBREAK: &[&str] = &["title", "id"];

/// Columns of the joined read, aliased to match [`ProjectTechnologyRow`].
const JOINED_COLUMNS: &str = "p.id, p.title, p.version, p.description, \
    p.is_active, p.is_archived, p.is_developing, p.links, \
    t.id AS tech_id, t.name AS tech_name, t.svg AS tech_svg";

const ASSOCIATION_TABLE: &str = "project_tech";
const ASSOCIATION_COLUMNS: &[&str] = &["project_id", "tech_id"];

/// Provides CRUD operations for projects and their technology associations.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project with its technology associations, returning the
    /// generated ID.
    ///
    /// Both writes run in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<DbId, RepoError> {
        let stmt = InsertQuery::new(TABLE, INSERT_COLUMNS)
            .row(vec![
                input.title.clone().into(),
                input.version.clone().into(),
                input.description.clone().into(),
                input.is_active.into(),
                input.is_archived.into(),
                input.is_developing.into(),
                input.links.clone().into(),
            ])
            .returning("id")
            .build()?;

        let mut tx = pool.begin().await?;
        let id = stmt.query_scalar::<DbId>().fetch_one(&mut *tx).await?;
        Self::insert_technologies(&mut tx, id, &input.technology_ids).await?;
        tx.commit().await?;

        tracing::info!(
            project_id = id,
            technologies = input.technology_ids.len(),
            "Project created"
        );
        Ok(id)
    }

    /// Find a project by its ID, enriched with its technologies.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, RepoError> {
        let stmt = Self::find_statement(id)?;
        let rows = stmt
            .query_as::<ProjectTechnologyRow>()
            .fetch_all(pool)
            .await?;
        Ok(aggregate(rows).into_iter().next())
    }

    /// List projects matching `criteria`, each with its technologies.
    ///
    /// Always ordered by title then id after any requested sort.
    pub async fn list(pool: &PgPool, criteria: &ProjectCriteria) -> Result<Vec<Project>, RepoError> {
        let mut query = SelectQuery::new(TABLE, COLUMNS);
        if !criteria.technology_ids.is_empty() {
            query = query.filter(Predicate::in_subquery(
                "id",
                "project_id",
                ASSOCIATION_TABLE,
                "tech_id",
                criteria.technology_ids.clone(),
            ));
        }
        let stmt = query
            .filter_eq_opt("is_active", criteria.is_active)
            .filter_eq_opt("is_archived", criteria.is_archived)
            .filter_eq_opt("is_developing", criteria.is_developing)
            .order_by(criteria.sort)
            .tiebreak(TIEBREAK)
            .limit(criteria.page.limit)
            .offset(criteria.page.offset)
            .build()?
            .wrap(|inner| joined_sql(inner, criteria.sort));

        tracing::debug!(sql = %stmt.sql, binds = stmt.binds.len(), "Listing projects");
        let rows = stmt
            .query_as::<ProjectTechnologyRow>()
            .fetch_all(pool)
            .await?;
        Ok(aggregate(rows))
    }

    /// Patch a project. Only present, non-empty fields are applied.
    ///
    /// If `technology_ids` is `Some`, replaces all technology associations.
    /// The update and the association replacement share one transaction.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn patch(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, RepoError> {
        let update = UpdateQuery::new(TABLE)
            .set_opt("title", non_empty(&input.title))
            .set_opt("version", non_empty(&input.version))
            .set_opt("description", non_empty(&input.description))
            .set_opt("is_active", input.is_active)
            .set_opt("is_archived", input.is_archived)
            .set_opt("is_developing", input.is_developing)
            .set_opt("links", input.links.clone())
            .key("id", id)
            .returning("id");

        let lookup = if update.is_empty() {
            SelectQuery::new(TABLE, "id")
                .filter(Predicate::eq("id", id))
                .build()?
        } else {
            update.build()?
        };

        let mut tx = pool.begin().await?;
        let found = lookup
            .query_scalar::<DbId>()
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            return Ok(None);
        }

        if let Some(technology_ids) = &input.technology_ids {
            Self::replace_technologies(&mut tx, id, technology_ids).await?;
        }

        let stmt = Self::find_statement(id)?;
        let rows = stmt
            .query_as::<ProjectTechnologyRow>()
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(project_id = id, "Project updated");
        Ok(aggregate(rows).into_iter().next())
    }

    /// Replace every column of a project and its whole association set.
    ///
    /// Absent flags are stored as NULL. Runs in one transaction.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateProject,
    ) -> Result<Option<Project>, RepoError> {
        let stmt = UpdateQuery::new(TABLE)
            .set("title", input.title.clone())
            .set("version", input.version.clone())
            .set("description", input.description.clone())
            .set("is_active", input.is_active)
            .set("is_archived", input.is_archived)
            .set("is_developing", input.is_developing)
            .set("links", input.links.clone())
            .key("id", id)
            .returning("id")
            .build()?;

        let mut tx = pool.begin().await?;
        let found = stmt
            .query_scalar::<DbId>()
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            return Ok(None);
        }

        Self::replace_technologies(&mut tx, id, &input.technology_ids).await?;

        let read = Self::find_statement(id)?;
        let rows = read
            .query_as::<ProjectTechnologyRow>()
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(project_id = id, "Project replaced");
        Ok(aggregate(rows).into_iter().next())
    }

    /// Delete a project by ID. Returns `true` if a row was removed.
    ///
    /// Association rows are removed by the `project_tech` foreign key.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, RepoError> {
        let stmt = DeleteQuery::new(TABLE)
            .filter(Predicate::eq("id", id))
            .build()?;
        let result = stmt.query().execute(pool).await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(project_id = id, "Project deleted");
        }
        Ok(deleted)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Joined read of a single project.
    fn find_statement(id: DbId) -> Result<Statement, RepoError> {
        let stmt = SelectQuery::new(TABLE, COLUMNS)
            .filter(Predicate::eq("id", id))
            .build()?
            .wrap(|inner| joined_sql(inner, None));
        Ok(stmt)
    }

    /// Insert association rows within an existing transaction.
    ///
    /// Duplicate ids are collapsed so the association set stays a set.
    async fn insert_technologies(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
        technology_ids: &[DbId],
    ) -> Result<(), RepoError> {
        let mut unique: Vec<DbId> = Vec::with_capacity(technology_ids.len());
        for id in technology_ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        if unique.is_empty() {
            return Ok(());
        }

        let stmt = unique
            .into_iter()
            .fold(
                InsertQuery::new(ASSOCIATION_TABLE, ASSOCIATION_COLUMNS),
                |insert, tech_id| insert.row(vec![project_id.into(), tech_id.into()]),
            )
            .build()?;
        stmt.query().execute(&mut **tx).await?;
        Ok(())
    }

    /// Replace association rows within an existing transaction.
    ///
    /// Deletes existing associations, then inserts the new set.
    async fn replace_technologies(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
        technology_ids: &[DbId],
    ) -> Result<(), RepoError> {
        let stmt = DeleteQuery::new(ASSOCIATION_TABLE)
            .filter(Predicate::eq("project_id", project_id))
            .build()?;
        stmt.query().execute(&mut **tx).await?;

        Self::insert_technologies(tx, project_id, technology_ids).await
    }
}

/// Wrap a projects SELECT so each selected project is joined with its
/// technologies, re-applying the project ordering outside the subquery and
/// ordering each project's technologies by name.
fn joined_sql(inner: &str, sort: Option<Sort>) -> String {
    format!(
        "SELECT {JOINED_COLUMNS} FROM ({inner}) p \
         LEFT JOIN {ASSOCIATION_TABLE} pt ON pt.project_id = p.id \
         LEFT JOIN technologies t ON t.id = pt.tech_id\
         {}, t.name ASC, t.id ASC",
        order_by_clause(sort, TIEBREAK, Some("p"))
    )
}
