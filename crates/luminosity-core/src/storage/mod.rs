pub mod models;
pub mod queries;
pub mod sqlite;

pub use queries::SqliteCatalog;
pub use sqlite::Database;
