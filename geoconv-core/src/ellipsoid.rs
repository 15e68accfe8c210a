//! Reference ellipsoids

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GeoconvError, ProjectionError};

/// Reference ellipsoids accepted by the converter.
///
/// Only the ellipsoid shape changes between variants. No datum shift is
/// applied, so a longitude/latitude pair is taken to already be on the
/// selected ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ellipsoid {
    #[default]
    #[serde(rename = "WGS84")]
    Wgs84,
    #[serde(rename = "CGCS2000")]
    Cgcs2000,
    /// Krassovsky 1940, the Beijing 1954 ellipsoid
    #[serde(rename = "Beijing54")]
    Beijing54,
}

impl Ellipsoid {
    pub const ALL: [Ellipsoid; 3] = [Ellipsoid::Wgs84, Ellipsoid::Cgcs2000, Ellipsoid::Beijing54];

    pub fn name(&self) -> &'static str {
        match self {
            Ellipsoid::Wgs84 => "WGS84",
            Ellipsoid::Cgcs2000 => "CGCS2000",
            Ellipsoid::Beijing54 => "Beijing54",
        }
    }

    /// Semi-major axis *a* in meters
    pub fn semi_major_axis(&self) -> f64 {
        match self {
            Ellipsoid::Wgs84 | Ellipsoid::Cgcs2000 => 6378137.0,
            Ellipsoid::Beijing54 => 6378245.0,
        }
    }

    /// Flattening *f = (a - b) / a*
    pub fn flattening(&self) -> f64 {
        match self {
            Ellipsoid::Wgs84 => 1.0 / 298.257223563,
            Ellipsoid::Cgcs2000 => 1.0 / 298.257222101,
            Ellipsoid::Beijing54 => 1.0 / 298.3,
        }
    }

    /// Semi-minor axis *b*
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis() * (1.0 - self.flattening())
    }

    /// First eccentricity squared *e² = f (2 - f)*
    pub fn eccentricity_squared(&self) -> f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }

    /// Third flattening *n = f / (2 - f)*
    pub fn third_flattening(&self) -> f64 {
        let f = self.flattening();
        f / (2.0 - f)
    }

    /// Radius of curvature in the prime vertical, *N*, at a latitude in radians
    pub fn prime_vertical_radius(&self, lat_rad: f64) -> f64 {
        let sin_lat = lat_rad.sin();
        self.semi_major_axis() / (1.0 - self.eccentricity_squared() * sin_lat * sin_lat).sqrt()
    }

    /// Meridian radius of curvature, *M*, at a latitude in radians
    pub fn meridian_radius(&self, lat_rad: f64) -> f64 {
        let sin_lat = lat_rad.sin();
        let e2 = self.eccentricity_squared();
        self.semi_major_axis() * (1.0 - e2) / (1.0 - e2 * sin_lat * sin_lat).powf(1.5)
    }
}

impl fmt::Display for Ellipsoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ellipsoid {
    type Err = GeoconvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wgs84" | "wgs-84" | "epsg:4326" => Ok(Ellipsoid::Wgs84),
            "cgcs2000" | "epsg:4490" => Ok(Ellipsoid::Cgcs2000),
            "beijing54" | "krass" | "krassovsky" => Ok(Ellipsoid::Beijing54),
            _ => Err(ProjectionError::UnknownEllipsoid(s.to_string()).into()),
        }
    }
}
