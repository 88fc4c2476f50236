//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` create/update DTOs where the table is written to

pub mod category;
pub mod order;
pub mod product;
pub mod session;
pub mod user;
