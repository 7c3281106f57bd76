//! CLI configuration (`config.toml` in the user config dir).

use directories::ProjectDirs;
use log::LevelFilter;
use reckon_core::MAX_CELLS;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    rows: Option<usize>,
    columns: Option<usize>,
    log_level: Option<String>,
}

/// Effective settings after applying the config file over the defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub rows: usize,
    pub columns: usize,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: 50,
            columns: 26,
            log_level: LevelFilter::Warn,
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "reckon")?;
    Some(proj.config_dir().join("config.toml"))
}

/// Load the config from `explicit` or the default location.
///
/// Problems are returned as warnings and the affected settings keep their
/// defaults. A missing default file is silently ignored.
pub fn load_config(explicit: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let mut config = Config::default();

    let Some(path) = explicit.map(Path::to_path_buf).or_else(user_config_path) else {
        return (config, warnings);
    };
    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (config, warnings);
    }

    let content = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            return (config, warnings);
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                return (config, warnings);
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            return (config, warnings);
        }
    };

    match parse_config(&content) {
        Ok((parsed, mut parse_warnings)) => {
            config = parsed;
            warnings.append(&mut parse_warnings);
        }
        Err(err) => warnings.push(format!("Failed to parse {}: {}", path.display(), err)),
    }
    (config, warnings)
}

fn parse_config(content: &str) -> Result<(Config, Vec<String>), toml::de::Error> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut warnings = Vec::new();
    let mut config = Config::default();

    match file.rows {
        Some(0) => warnings.push("rows must be at least 1; using default".to_string()),
        Some(rows) => config.rows = rows,
        None => {}
    }
    match file.columns {
        Some(0) => warnings.push("columns must be at least 1; using default".to_string()),
        Some(columns) => config.columns = columns,
        None => {}
    }
    if config.rows.checked_mul(config.columns).is_none_or(|cells| cells > MAX_CELLS) {
        warnings.push(format!(
            "{} x {} grid exceeds {} cells; using default size",
            config.rows, config.columns, MAX_CELLS
        ));
        let defaults = Config::default();
        config.rows = defaults.rows;
        config.columns = defaults.columns;
    }
    if let Some(level) = file.log_level {
        match level.parse::<LevelFilter>() {
            Ok(level) => config.log_level = level,
            Err(_) => warnings.push(format!("Unknown log_level {:?}; using default", level)),
        }
    }

    Ok((config, warnings))
}
