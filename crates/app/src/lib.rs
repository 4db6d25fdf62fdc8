pub mod app;
pub mod config;
pub mod error;
pub mod fetch;
pub mod join;
pub mod output;
pub mod startup;

pub use app::{AppState, DataSources};
pub use config::{AppConfig, DEFAULT_URL_BASE, ISSUANCE_FILE, PAGELOADS_FILE};
pub use error::{AppError, Result};
pub use fetch::{cached_download, http_client};
pub use join::{JoinReport, SeriesJoiner};
pub use output::{OutputFormat, write_csv, write_json_lines, write_report};
pub use startup::{AppPaths, ensure_cache_dir};
