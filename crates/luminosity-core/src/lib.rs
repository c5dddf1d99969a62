pub mod apex;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod preview;
pub mod progress;
pub mod scanner;
pub mod storage;

pub use catalog::Catalog;
pub use config::AppConfig;
pub use engine::{StatsEngine, StatsResult};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
