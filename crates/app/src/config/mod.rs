use adoption_core::{FilterSet, NamedFilter, default_filters};
use ingest::ValidationPolicy;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const DEFAULT_URL_BASE: &str = "https://d4twhgtvn0ff5.cloudfront.net";
pub const PAGELOADS_FILE: &str = "current-https-adoption.csv";
pub const ISSUANCE_FILE: &str = "cert-timeline.tsv";

/// Run configuration shared by frontends.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub url_base: String,
    pub validation: ValidationPolicy,
    pub filters: Vec<NamedFilter>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            url_base: DEFAULT_URL_BASE.to_string(),
            validation: ValidationPolicy::default(),
            filters: default_filters(),
        }
    }
}

impl AppConfig {
    pub fn filter_set(&self) -> Result<FilterSet> {
        FilterSet::new(self.filters.clone()).map_err(|err| AppError::Config(err.to_string()))
    }

    pub fn pageloads_url(&self) -> String {
        self.file_url(PAGELOADS_FILE)
    }

    pub fn issuance_url(&self) -> String {
        self.file_url(ISSUANCE_FILE)
    }

    fn file_url(&self, file: &str) -> String {
        format!("{}/{}", self.url_base.trim_end_matches('/'), file)
    }
}
