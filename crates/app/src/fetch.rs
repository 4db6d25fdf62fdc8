use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::error::{AppError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub fn http_client() -> Result<Client> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Downloads `url` into `dest_dir`, named after the last path segment.
///
/// An existing non-empty file is reused without touching the network.
pub fn cached_download(client: &Client, dest_dir: &Path, url: &str) -> Result<PathBuf> {
    let file_name = url
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("url has no file name: {}", url)))?;
    let local_path = dest_dir.join(file_name);
    if is_cached(&local_path) {
        debug!(path = %local_path.display(), "using cached file");
        return Ok(local_path);
    }

    info!(url, path = %local_path.display(), "downloading");
    let partial_path = local_path.with_extension("part");
    let result = download_to(client, url, &partial_path);
    if let Err(err) = result {
        let _ = fs::remove_file(&partial_path);
        return Err(err);
    }
    fs::rename(&partial_path, &local_path)?;
    Ok(local_path)
}

fn download_to(client: &Client, url: &str, path: &Path) -> Result<()> {
    let mut response = client.get(url).send()?.error_for_status()?;
    let mut file = File::create(path)?;
    io::copy(&mut response, &mut file)?;
    Ok(())
}

fn is_cached(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}
