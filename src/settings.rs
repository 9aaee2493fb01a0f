use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::reduce::Domain;

pub const WEATHER_DATA_FILE: &str = "w_data.dat";
pub const SOCCER_DATA_FILE: &str = "soccer.dat";
/// Optional overrides, looked up as `pre_table.{toml,json,yaml,...}` in the working directory.
const SETTINGS_FILE: &str = "pre_table";

/// Default data files used when a command is given no path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub weather_file: PathBuf,
    pub soccer_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weather_file: PathBuf::from(WEATHER_DATA_FILE),
            soccer_file: PathBuf::from(SOCCER_DATA_FILE),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(SETTINGS_FILE)
    }

    pub fn load_from(basename: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("weather_file", WEATHER_DATA_FILE)?
            .set_default("soccer_file", SOCCER_DATA_FILE)?
            .add_source(File::with_name(basename).required(false))
            .build()?
            .try_deserialize()
    }

    pub fn data_file(&self, domain: Domain) -> &Path {
        match domain {
            Domain::Weather => &self.weather_file,
            Domain::Soccer => &self.soccer_file,
        }
    }
}
