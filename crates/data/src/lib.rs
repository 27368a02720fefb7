//! Loading and validation of Farkle configuration files.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
