//! Configuration loader and schema types.
//!
//! Settings cover the catalog connection and how the library is scanned.
//! Everything is optional; a missing file means defaults.

mod load;
mod schema;

pub use load::Credentials;
pub use schema::*;
