pub mod walk;

pub use walk::{find_catalogs, is_catalog_file, CATALOG_DATA_DIR_EXTENSION, CATALOG_EXTENSION};
