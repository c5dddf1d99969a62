pub mod cache;
pub mod container;
pub mod extract;

pub use cache::{previews_root_path, CatalogPreviews, PhotoCacheInfo};
pub use container::{read_sections, PreviewFile, SectionHeader};
pub use extract::{extract_previews, ExtractSummary};
