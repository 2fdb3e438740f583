//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize` entity struct returned to callers
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod project;
pub mod technology;
