//! Parameterized statement builders.
//!
//! Builders assemble SQL text with `$n` placeholders and collect the values
//! to bind, in order, into a [`Statement`]. Values never appear in the SQL
//! text. Identifiers (tables, columns) are `&'static str` supplied by the
//! repositories; caller-influenced sort columns arrive pre-validated as a
//! [`Sort`] whose column comes from a static allow-list.
//!
//! Building is pure: nothing here touches the database.

use folio_core::criteria::Sort;
use folio_core::types::DbId;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{Query, QueryAs, QueryScalar};
use sqlx::{FromRow, Postgres};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A statement descriptor was incomplete. Never caused by request data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryBuildError {
    #[error("Statement has no table")]
    MissingTable,

    #[error("Statement on {table} has no columns")]
    MissingColumns { table: &'static str },

    #[error("Insert into {table} has no rows")]
    NoRows { table: &'static str },

    #[error("Insert into {table} expects {expected} values per row, got {actual}")]
    RowArity {
        table: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Update of {table} assigns no columns")]
    NoAssignments { table: &'static str },

    #[error("Update of {table} has no key")]
    MissingKey { table: &'static str },

    #[error("Delete from {table} has no predicate")]
    UnboundedDelete { table: &'static str },
}

// ---------------------------------------------------------------------------
// Bind values and statements
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    BigInt(i64),
    BigIntArray(Vec<i64>),
    Bool(Option<bool>),
    Text(Option<String>),
    TextArray(Vec<String>),
}

impl From<i64> for BindValue {
    fn from(v: i64) -> Self {
        BindValue::BigInt(v)
    }
}

impl From<Vec<i64>> for BindValue {
    fn from(v: Vec<i64>) -> Self {
        BindValue::BigIntArray(v)
    }
}

impl From<bool> for BindValue {
    fn from(v: bool) -> Self {
        BindValue::Bool(Some(v))
    }
}

impl From<Option<bool>> for BindValue {
    fn from(v: Option<bool>) -> Self {
        BindValue::Bool(v)
    }
}

impl From<String> for BindValue {
    fn from(v: String) -> Self {
        BindValue::Text(Some(v))
    }
}

impl From<&str> for BindValue {
    fn from(v: &str) -> Self {
        BindValue::Text(Some(v.to_string()))
    }
}

impl From<Option<String>> for BindValue {
    fn from(v: Option<String>) -> Self {
        BindValue::Text(v)
    }
}

impl From<Vec<String>> for BindValue {
    fn from(v: Vec<String>) -> Self {
        BindValue::TextArray(v)
    }
}

/// SQL text plus its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

macro_rules! bind_all {
    ($q:expr, $binds:expr) => {{
        let mut q = $q;
        for value in $binds {
            q = match value {
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::BigIntArray(v) => q.bind(v.as_slice()),
                BindValue::Bool(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_deref()),
                BindValue::TextArray(v) => q.bind(v.as_slice()),
            };
        }
        q
    }};
}

impl Statement {
    /// Rewrite the SQL text, keeping the bind values.
    ///
    /// Used to embed a built statement as a subquery. The wrapper must not
    /// introduce placeholders of its own.
    pub fn wrap(self, f: impl FnOnce(&str) -> String) -> Statement {
        Statement {
            sql: f(&self.sql),
            binds: self.binds,
        }
    }

    /// A sqlx query with every value bound, for statements without rows.
    pub fn query(&self) -> Query<'_, Postgres, PgArguments> {
        bind_all!(sqlx::query(&self.sql), &self.binds)
    }

    /// A sqlx query mapping rows into `O`.
    pub fn query_as<O>(&self) -> QueryAs<'_, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>,
    {
        bind_all!(sqlx::query_as::<_, O>(&self.sql), &self.binds)
    }

    /// A sqlx query returning the first column of each row.
    pub fn query_scalar<O>(&self) -> QueryScalar<'_, Postgres, O, PgArguments>
    where
        (O,): for<'r> FromRow<'r, PgRow>,
    {
        bind_all!(sqlx::query_scalar::<_, O>(&self.sql), &self.binds)
    }
}

/// Collects bind values and hands out their placeholders.
#[derive(Debug, Default)]
struct Binder {
    binds: Vec<BindValue>,
}

impl Binder {
    fn push(&mut self, value: BindValue) -> String {
        self.binds.push(value);
        format!("${}", self.binds.len())
    }

    fn finish(self, sql: String) -> Statement {
        Statement {
            sql,
            binds: self.binds,
        }
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// A single conjunct of a WHERE clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column = $n`
    Eq {
        column: &'static str,
        value: BindValue,
    },
    /// `column = ANY($n)`
    AnyOf {
        column: &'static str,
        values: Vec<DbId>,
    },
    /// `column IN (SELECT select FROM from WHERE match_column = ANY($n))`
    InSubquery {
        column: &'static str,
        select: &'static str,
        from: &'static str,
        match_column: &'static str,
        values: Vec<DbId>,
    },
}

impl Predicate {
    pub fn eq(column: &'static str, value: impl Into<BindValue>) -> Self {
        Predicate::Eq {
            column,
            value: value.into(),
        }
    }

    pub fn any_of(column: &'static str, values: Vec<DbId>) -> Self {
        Predicate::AnyOf { column, values }
    }

    /// Keep rows whose `column` appears as `select` in `from` rows where
    /// `match_column` is one of `values`.
    pub fn in_subquery(
        column: &'static str,
        select: &'static str,
        from: &'static str,
        match_column: &'static str,
        values: Vec<DbId>,
    ) -> Self {
        Predicate::InSubquery {
            column,
            select,
            from,
            match_column,
            values,
        }
    }

    fn render(&self, binder: &mut Binder) -> String {
        match self {
            Predicate::Eq { column, value } => {
                format!("{column} = {}", binder.push(value.clone()))
            }
            Predicate::AnyOf { column, values } => {
                format!("{column} = ANY({})", binder.push(values.clone().into()))
            }
            Predicate::InSubquery {
                column,
                select,
                from,
                match_column,
                values,
            } => format!(
                "{column} IN (SELECT {select} FROM {from} WHERE {match_column} = ANY({}))",
                binder.push(values.clone().into())
            ),
        }
    }
}

/// Render ` WHERE a AND b ...`, or nothing when there are no predicates.
fn render_where(predicates: &[Predicate], binder: &mut Binder) -> String {
    if predicates.is_empty() {
        return String::new();
    }
    let conditions: Vec<String> = predicates.iter().map(|p| p.render(binder)).collect();
    format!(" WHERE {}", conditions.join(" AND "))
}

/// Render an ORDER BY clause: the optional sort first, then every tiebreak
/// column ascending. Each column is prefixed with `alias.` when given.
///
/// Returns an empty string when there is nothing to order by.
pub fn order_by_clause(sort: Option<Sort>, tiebreak: &[&str], alias: Option<&str>) -> String {
    let qualify = |column: &str| match alias {
        Some(a) => format!("{a}.{column}"),
        None => column.to_string(),
    };

    let mut terms = Vec::with_capacity(tiebreak.len() + 1);
    if let Some(sort) = sort {
        terms.push(format!("{} {}", qualify(sort.column), sort.order.as_sql()));
    }
    terms.extend(tiebreak.iter().map(|c| format!("{} ASC", qualify(c))));

    if terms.is_empty() {
        String::new()
    } else {
        format!(" ORDER BY {}", terms.join(", "))
    }
}

// ---------------------------------------------------------------------------
// SELECT
// ---------------------------------------------------------------------------

/// Builder for a filtered, ordered, paginated SELECT over one table.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    table: &'static str,
    columns: &'static str,
    predicates: Vec<Predicate>,
    sort: Option<Sort>,
    tiebreak: Vec<&'static str>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl SelectQuery {
    pub fn new(table: &'static str, columns: &'static str) -> Self {
        Self {
            table,
            columns,
            ..Self::default()
        }
    }

    /// AND another predicate onto the WHERE clause.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Add a predicate only when `value` is present.
    pub fn filter_eq_opt<T: Into<BindValue>>(self, column: &'static str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.filter(Predicate::eq(column, v)),
            None => self,
        }
    }

    pub fn order_by(mut self, sort: Option<Sort>) -> Self {
        self.sort = sort;
        self
    }

    /// Secondary sort keys, always applied ascending after the main sort.
    pub fn tiebreak(mut self, columns: &[&'static str]) -> Self {
        self.tiebreak = columns.to_vec();
        self
    }

    pub fn limit(mut self, limit: Option<i64>) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: Option<i64>) -> Self {
        self.offset = offset;
        self
    }

    pub fn build(self) -> Result<Statement, QueryBuildError> {
        if self.table.trim().is_empty() {
            return Err(QueryBuildError::MissingTable);
        }
        if self.columns.trim().is_empty() {
            return Err(QueryBuildError::MissingColumns { table: self.table });
        }

        let mut binder = Binder::default();
        let mut sql = format!("SELECT {} FROM {}", self.columns, self.table);
        sql.push_str(&render_where(&self.predicates, &mut binder));
        sql.push_str(&order_by_clause(self.sort, &self.tiebreak, None));

        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            sql.push_str(&format!(" LIMIT {}", binder.push(limit.into())));
        }
        if let Some(offset) = self.offset.filter(|o| *o > 0) {
            sql.push_str(&format!(" OFFSET {}", binder.push(offset.into())));
        }

        Ok(binder.finish(sql))
    }
}

// ---------------------------------------------------------------------------
// INSERT
// ---------------------------------------------------------------------------

/// Builder for a single- or multi-row INSERT.
#[derive(Debug, Clone)]
pub struct InsertQuery {
    table: &'static str,
    columns: &'static [&'static str],
    rows: Vec<Vec<BindValue>>,
    returning: Option<&'static str>,
}

impl InsertQuery {
    pub fn new(table: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            table,
            columns,
            rows: Vec::new(),
            returning: None,
        }
    }

    pub fn row(mut self, values: Vec<BindValue>) -> Self {
        self.rows.push(values);
        self
    }

    pub fn returning(mut self, columns: &'static str) -> Self {
        self.returning = Some(columns);
        self
    }

    pub fn build(self) -> Result<Statement, QueryBuildError> {
        if self.table.trim().is_empty() {
            return Err(QueryBuildError::MissingTable);
        }
        if self.columns.is_empty() {
            return Err(QueryBuildError::MissingColumns { table: self.table });
        }
        if self.rows.is_empty() {
            return Err(QueryBuildError::NoRows { table: self.table });
        }

        let mut binder = Binder::default();
        let mut tuples = Vec::with_capacity(self.rows.len());
        for row in self.rows {
            if row.len() != self.columns.len() {
                return Err(QueryBuildError::RowArity {
                    table: self.table,
                    expected: self.columns.len(),
                    actual: row.len(),
                });
            }
            let placeholders: Vec<String> = row.into_iter().map(|v| binder.push(v)).collect();
            tuples.push(format!("({})", placeholders.join(", ")));
        }

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.table,
            self.columns.join(", "),
            tuples.join(", ")
        );
        if let Some(returning) = self.returning {
            sql.push_str(&format!(" RETURNING {returning}"));
        }

        Ok(binder.finish(sql))
    }
}

// ---------------------------------------------------------------------------
// UPDATE
// ---------------------------------------------------------------------------

/// Builder for a keyed UPDATE that assigns only the columns it was given.
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    table: &'static str,
    sets: Vec<(&'static str, BindValue)>,
    key: Option<(&'static str, BindValue)>,
    returning: Option<&'static str>,
}

impl UpdateQuery {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            sets: Vec::new(),
            key: None,
            returning: None,
        }
    }

    pub fn set(mut self, column: &'static str, value: impl Into<BindValue>) -> Self {
        self.sets.push((column, value.into()));
        self
    }

    /// Assign `column` only when `value` is present.
    pub fn set_opt<T: Into<BindValue>>(self, column: &'static str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// Restrict the update to rows where `column = value`.
    pub fn key(mut self, column: &'static str, value: impl Into<BindValue>) -> Self {
        self.key = Some((column, value.into()));
        self
    }

    pub fn returning(mut self, columns: &'static str) -> Self {
        self.returning = Some(columns);
        self
    }

    /// `true` when no column would be assigned.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn build(self) -> Result<Statement, QueryBuildError> {
        if self.table.trim().is_empty() {
            return Err(QueryBuildError::MissingTable);
        }
        if self.sets.is_empty() {
            return Err(QueryBuildError::NoAssignments { table: self.table });
        }
        let Some((key_column, key_value)) = self.key else {
            return Err(QueryBuildError::MissingKey { table: self.table });
        };

        let mut binder = Binder::default();
        let assignments: Vec<String> = self
            .sets
            .into_iter()
            .map(|(column, value)| format!("{column} = {}", binder.push(value)))
            .collect();

        let mut sql = format!(
            "UPDATE {} SET {} WHERE {key_column} = {}",
            self.table,
            assignments.join(", "),
            binder.push(key_value)
        );
        if let Some(returning) = self.returning {
            sql.push_str(&format!(" RETURNING {returning}"));
        }

        Ok(binder.finish(sql))
    }
}

// ---------------------------------------------------------------------------
// DELETE
// ---------------------------------------------------------------------------

/// Builder for a DELETE. Refuses to build without at least one predicate.
#[derive(Debug, Clone)]
pub struct DeleteQuery {
    table: &'static str,
    predicates: Vec<Predicate>,
}

impl DeleteQuery {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            predicates: Vec::new(),
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn build(self) -> Result<Statement, QueryBuildError> {
        if self.table.trim().is_empty() {
            return Err(QueryBuildError::MissingTable);
        }
        if self.predicates.is_empty() {
            return Err(QueryBuildError::UnboundedDelete { table: self.table });
        }

        let mut binder = Binder::default();
        let sql = format!(
            "DELETE FROM {}{}",
            self.table,
            render_where(&self.predicates, &mut binder)
        );
        Ok(binder.finish(sql))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
