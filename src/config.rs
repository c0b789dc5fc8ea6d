use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default STAC API root (swisstopo data service).
pub const DEFAULT_API_URL: &str = "https://data.geo.admin.ch/api/stac/v0.9";
/// Default collection holding the SwissEO VHI products.
pub const DEFAULT_COLLECTION: &str = "ch.swisstopo.swisseo_vhi_v100";
/// Default cache directory for downloaded Parquet files.
pub const DEFAULT_OUTPUT_DIR: &str = "./parquet_files";
/// Default embedded database file.
pub const DEFAULT_DATABASE: &str = "vhi.duckdb";

/// Resolved pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base STAC API URL, typically `https://data.geo.admin.ch/api/stac/v0.9`.
    pub api_url: String,
    /// Collection ID to fetch.
    pub collection: String,
    /// Directory receiving downloaded Parquet files and exported CSVs.
    pub output_dir: PathBuf,
    /// Path of the DuckDB database file.
    pub database: PathBuf,
}

#[derive(Debug, Default)]
struct RcConfig {
    url: Option<String>,
    collection: Option<String>,
    output_dir: Option<String>,
    database: Option<String>,
}

impl Config {
    /// Creates a configuration from the environment and/or `.vhirc`.
    ///
    /// Equivalent to `Config::load(None, None, None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::load(None, None, None, None)
    }

    /// Resolves configuration using (in order of precedence):
    /// - explicit arguments
    /// - environment variables `VHI_API_URL` / `VHI_COLLECTION` /
    ///   `VHI_OUTPUT_DIR` / `VHI_DATABASE`
    /// - config file from `VHI_RC` or `.vhirc`
    /// - compiled defaults
    pub fn load(
        url: Option<String>,
        collection: Option<String>,
        output_dir: Option<PathBuf>,
        database: Option<PathBuf>,
    ) -> Result<Self> {
        let mut url = url.or_else(|| std::env::var("VHI_API_URL").ok());
        let mut collection = collection.or_else(|| std::env::var("VHI_COLLECTION").ok());
        let mut output_dir =
            output_dir.or_else(|| std::env::var("VHI_OUTPUT_DIR").ok().map(PathBuf::from));
        let mut database =
            database.or_else(|| std::env::var("VHI_DATABASE").ok().map(PathBuf::from));

        if url.is_none() || collection.is_none() || output_dir.is_none() || database.is_none() {
            for rc_path in rc_candidates() {
                if rc_path.exists() {
                    let cfg = read_rc(&rc_path)?;

                    if url.is_none() {
                        url = cfg.url;
                    }
                    if collection.is_none() {
                        collection = cfg.collection;
                    }
                    if output_dir.is_none() {
                        output_dir = cfg.output_dir.map(PathBuf::from);
                    }
                    if database.is_none() {
                        database = cfg.database.map(PathBuf::from);
                    }
                    break;
                }
            }
        }

        Ok(Config {
            api_url: url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            collection: collection.unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            output_dir: output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            database: database.unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
        })
    }
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Storage {
        path: path.to_path_buf(),
        source,
    })?;

    let mut cfg = RcConfig::default();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((k, v)) = line.split_once(':') {
            let v = strip_quotes(v.trim());
            if v.is_empty() {
                continue;
            }
            match k.trim() {
                "url" => cfg.url = Some(v.to_string()),
                "collection" => cfg.collection = Some(v.to_string()),
                "output_dir" => cfg.output_dir = Some(v.to_string()),
                "database" => cfg.database = Some(v.to_string()),
                _ => {}
            }
        }
    }

    Ok(cfg)
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // Search order:
    // 1) VHI_RC (explicit)
    // 2) ./.vhirc (current working directory)
    // 3) ~/.vhirc
    if let Ok(p) = std::env::var("VHI_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".vhirc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".vhirc"));
    }
    v
}

// -- Tests -------------------------------------------------------------------
