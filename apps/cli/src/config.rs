use std::fs;
use std::path::{Path, PathBuf};

use adoption_app::AppConfig;

const CONFIG_DIR_NAME: &str = "https-adoption";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: AppConfig,
    /// File the config came from, `None` when running on defaults.
    pub file: Option<PathBuf>,
}

/// Loads `explicit` if given, else the per-user config file if it exists,
/// else the built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<ConfigLoad, String> {
    let file = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_file().filter(|path| path.is_file()),
    };
    let Some(file) = file else {
        return Ok(ConfigLoad {
            config: AppConfig::default(),
            file: None,
        });
    };

    let contents = fs::read_to_string(&file)
        .map_err(|err| format!("read config {}: {}", file.display(), err))?;
    let config =
        parse(&contents).map_err(|err| format!("parse config {}: {}", file.display(), err))?;
    Ok(ConfigLoad {
        config,
        file: Some(file),
    })
}

fn parse(contents: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(contents)
}

fn default_config_file() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
