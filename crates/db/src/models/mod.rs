//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts where the table accepts them
//! - Aggregate/join view structs returned by reporting queries

pub mod farm;
pub mod reading;
