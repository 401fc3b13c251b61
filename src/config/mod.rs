use anyhow::{bail, Result};
use pf_core::SearchSettings;
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "placefinder.toml";

pub const ENV_NAME_API_URL: &str = "PLACES_API_URL";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub catalog: Catalog,
    pub search: SearchSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub base_url: String,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: PathBuf = file_path.map_or_else(
            || {
                log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
                PathBuf::from(DEFAULT_CONFIG_FILE_NAME)
            },
            |p| p.as_ref().to_path_buf(),
        );

        let raw_config = match fs::read_to_string(&file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        cfg.override_api_url(env::var(ENV_NAME_API_URL).ok());
        Ok(cfg)
    }

    pub fn override_api_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|url| !url.trim().is_empty()) {
            log::debug!("Use catalog API at {url}");
            self.catalog.base_url = url;
        }
    }
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config { catalog, search } = from;

        let raw::Catalog { base_url } = catalog.unwrap_or_default();
        if base_url.trim().is_empty() {
            bail!("The base URL of the catalog must not be empty");
        }
        let catalog = Catalog { base_url };

        let raw::Search { radius, page_size } = search.unwrap_or_default();
        let defaults = SearchSettings::default();
        let radius = radius.unwrap_or(defaults.radius);
        if !radius.is_finite() || radius <= 0.0 {
            bail!("Invalid search radius: {radius}");
        }
        let page_size = page_size.unwrap_or(defaults.page_size);
        if page_size == 0 {
            bail!("The page size must be greater than zero");
        }
        let search = SearchSettings { radius, page_size };

        Ok(Self { catalog, search })
    }
}
