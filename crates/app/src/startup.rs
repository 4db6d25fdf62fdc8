use std::path::PathBuf;

use crate::Result;

/// Where downloaded datasets are cached.
#[derive(Clone, Debug)]
pub struct AppPaths {
    pub cache_dir: PathBuf,
}

impl AppPaths {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

pub fn ensure_cache_dir(paths: &AppPaths) -> Result<()> {
    std::fs::create_dir_all(&paths.cache_dir)?;
    Ok(())
}
