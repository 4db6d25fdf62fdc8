use std::fs::File;
use std::path::{Path, PathBuf};

use ingest::{IngestStats, IssuanceTimeline, PageloadSeries, read_issuance, read_pageloads};
use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::fetch::cached_download;
use crate::join::{JoinReport, SeriesJoiner};
use crate::startup::{AppPaths, ensure_cache_dir};

/// Local files holding the two input datasets.
#[derive(Clone, Debug)]
pub struct DataSources {
    pub pageloads: PathBuf,
    pub issuance: PathBuf,
}

/// Validated configuration plus the joiner built from it.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: AppConfig,
    joiner: SeriesJoiner,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let joiner = SeriesJoiner::new(config.filter_set()?);
        Ok(Self { config, joiner })
    }

    /// Fills in any source not given locally by downloading it into the cache.
    pub fn resolve_sources(
        &self,
        client: &Client,
        paths: &AppPaths,
        pageloads: Option<PathBuf>,
        issuance: Option<PathBuf>,
    ) -> Result<DataSources> {
        if pageloads.is_none() || issuance.is_none() {
            ensure_cache_dir(paths)?;
        }
        let pageloads = match pageloads {
            Some(path) => path,
            None => cached_download(client, &paths.cache_dir, &self.config.pageloads_url())?,
        };
        let issuance = match issuance {
            Some(path) => path,
            None => cached_download(client, &paths.cache_dir, &self.config.issuance_url())?,
        };
        Ok(DataSources {
            pageloads,
            issuance,
        })
    }

    pub fn load_pageloads(&self, path: &Path) -> Result<(PageloadSeries, IngestStats)> {
        let mut series = PageloadSeries::new();
        let stats = read_pageloads(open(path)?, &mut series, self.config.validation)?;
        for issue in &stats.issues {
            warn!(path = %path.display(), line = ?issue.line, "{}", issue.message);
        }
        info!(
            path = %path.display(),
            rows = stats.rows_logged,
            days = series.len(),
            "loaded pageloads"
        );
        Ok((series, stats))
    }

    pub fn load_issuance(&self, path: &Path) -> Result<(IssuanceTimeline, IngestStats)> {
        let mut timeline = IssuanceTimeline::new();
        let stats = read_issuance(open(path)?, &mut timeline)?;
        info!(
            path = %path.display(),
            rows = stats.rows_logged,
            dates = timeline.len(),
            "loaded issuance timeline"
        );
        Ok((timeline, stats))
    }

    /// Builds both indices, then joins them.
    pub fn synthesize(&self, sources: &DataSources) -> Result<JoinReport> {
        let (series, _) = self.load_pageloads(&sources.pageloads)?;
        let (timeline, _) = self.load_issuance(&sources.issuance)?;
        self.joiner.join(&series, &timeline)
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|err| AppError::Message(format!("open {}: {}", path.display(), err)))
}
