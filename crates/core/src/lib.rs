//! Domain building blocks shared by the database and API crates.
//!
//! Zero internal dependencies and no I/O: error taxonomy, id types and the
//! list criteria model with its validation rules.

pub mod criteria;
pub mod error;
pub mod types;
