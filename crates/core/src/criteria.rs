//! List criteria: optional equality filters, sort and pagination.
//!
//! Criteria values are built per request and never persisted. Everything a
//! caller can influence is validated here, before any statement is built:
//! sort fields are resolved against a static allow-list so the resulting
//! column name is always a `&'static str` owned by this crate, never caller
//! text.

use std::str::FromStr;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Sort allow-lists
// ---------------------------------------------------------------------------

/// Columns a technology list may be sorted by.
pub const TECHNOLOGY_SORT_FIELDS: &[&str] = &["id", "name"];

/// Columns a project list may be sorted by.
pub const PROJECT_SORT_FIELDS: &[&str] = &[
    "id",
    "title",
    "version",
    "description",
    "is_active",
    "is_archived",
    "is_developing",
];

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    /// Case-insensitive `asc` / `desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(CoreError::Validation(format!(
                "Invalid sort order '{other}', expected 'asc' or 'desc'"
            ))),
        }
    }
}

/// A validated sort instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    /// Always one of the entries of the allow-list it was parsed against.
    pub column: &'static str,
    pub order: SortOrder,
}

impl Sort {
    /// Resolve a caller-supplied sort field and order.
    ///
    /// - No field (or a blank one) means no explicit sort; an order on its
    ///   own is still validated but otherwise ignored.
    /// - The field must match an entry of `allowed` (case-insensitive).
    /// - A missing order defaults to ascending.
    pub fn parse(
        field: Option<&str>,
        order: Option<&str>,
        allowed: &[&'static str],
    ) -> Result<Option<Sort>, CoreError> {
        let order = match order.map(str::trim).filter(|o| !o.is_empty()) {
            Some(o) => o.parse::<SortOrder>()?,
            None => SortOrder::default(),
        };

        let Some(field) = field.map(str::trim).filter(|f| !f.is_empty()) else {
            return Ok(None);
        };

        let column = allowed
            .iter()
            .copied()
            .find(|c| c.eq_ignore_ascii_case(field))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Cannot sort by '{field}', expected one of: {}",
                    allowed.join(", ")
                ))
            })?;

        Ok(Some(Sort { column, order }))
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Row cap and skip for list queries. `None` means unbounded / no skip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Page {
    /// Build a page from raw query values.
    ///
    /// Zero is treated as "not specified" for both fields; negative values
    /// are rejected.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Page, CoreError> {
        Ok(Page {
            limit: positive_or_none("limit", limit)?,
            offset: positive_or_none("offset", offset)?,
        })
    }
}

fn positive_or_none(name: &str, value: Option<i64>) -> Result<Option<i64>, CoreError> {
    match value {
        Some(v) if v < 0 => Err(CoreError::Validation(format!(
            "{name} must not be negative, got {v}"
        ))),
        Some(0) | None => Ok(None),
        Some(v) => Ok(Some(v)),
    }
}

// ---------------------------------------------------------------------------
// Entity criteria
// ---------------------------------------------------------------------------

/// Filters for listing technologies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnologyCriteria {
    /// Restrict to these ids. Empty means no restriction.
    pub ids: Vec<DbId>,
    pub sort: Option<Sort>,
    pub page: Page,
}

/// Filters for listing projects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectCriteria {
    /// Keep projects associated with at least one of these technologies.
    pub technology_ids: Vec<DbId>,
    pub is_active: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_developing: Option<bool>,
    pub sort: Option<Sort>,
    pub page: Page,
}

/// Parse a comma-separated id list such as `"1,2, 3"`.
///
/// Blank input yields an empty list; any non-numeric element is an error.
pub fn parse_id_list(raw: &str) -> Result<Vec<DbId>, CoreError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<DbId>()
                .map_err(|_| CoreError::Validation(format!("'{s}' is not a valid id")))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
