//! Repository layer.
//!
//! Each entity repository is a zero-sized struct providing async CRUD
//! methods that accept `&PgPool` as the first argument. The
//! [`PortfolioRepository`] trait bundles them behind one object-safe
//! capability set for the service layer.

pub mod portfolio_repo;
pub mod project_repo;
pub mod technology_repo;

pub use portfolio_repo::{PgPortfolioRepository, PortfolioRepository};
pub use project_repo::ProjectRepo;
pub use technology_repo::TechnologyRepo;

/// Patch semantics for required text columns: an absent or empty string
/// leaves the stored value untouched.
pub(crate) fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
