//! TOML configuration for the command line front end

use std::fs;
use std::path::Path;

use geoconv_core::{Ellipsoid, GeoConverter, Origin, ZoneWidth};
use log::debug;
use serde::Deserialize;

use crate::error::{CliError, Result};

/// Digits after the decimal point when none is configured
pub const DEFAULT_PRECISION: usize = 6;

/// Settings shared by every subcommand.
///
/// Missing keys fall back to the survey origin, 6° zones on WGS84.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub origin: Origin,
    pub ellipsoid: Ellipsoid,
    pub zone_width: ZoneWidth,
    pub precision: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: Origin::default(),
            ellipsoid: Ellipsoid::default(),
            zone_width: ZoneWidth::default(),
            precision: DEFAULT_PRECISION,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Converter bound to this configuration's origin, ellipsoid and zones
    pub fn converter(&self) -> Result<GeoConverter> {
        Ok(GeoConverter::with_ellipsoid(
            self.origin,
            self.ellipsoid,
            self.zone_width,
        )?)
    }
}
