use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::coordinate::{EnuCoord, LlaCoord, LocalFrame, Origin};
use crate::error::{GeoconvError, ProjectionError, Result, ensure_finite};
use crate::projection::tmerc::wrap_longitude;
use crate::transform::EllipsoidalTransform;

/// Multiplier that packs the zone number in front of the easting
pub const ZONE_MULTIPLIER: f64 = 1_000_000.0;

/// Longitudinal width of a Gauss-Krüger zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ZoneWidth {
    Three,
    #[default]
    Six,
}

impl ZoneWidth {
    pub fn degrees(&self) -> u8 {
        match self {
            ZoneWidth::Three => 3,
            ZoneWidth::Six => 6,
        }
    }

    /// Zone number containing a longitude in degrees.
    ///
    /// Western longitudes in 6° zones are shifted up by one, so anything in
    /// (-6, 0) lands in zone 1. Far enough west the number drops below zero.
    pub fn zone_number(&self, lon: f64) -> i32 {
        let zone = match self {
            ZoneWidth::Six if lon < 0.0 => ((lon + 6.0) / 6.0).floor() + 1.0,
            ZoneWidth::Six => ((lon + 6.0) / 6.0).floor(),
            ZoneWidth::Three => ((lon + 1.5) / 3.0 + 0.5).floor(),
        };
        zone as i32
    }

    /// Central meridian of a zone in degrees
    pub fn central_meridian(&self, zone: i32) -> f64 {
        match self {
            ZoneWidth::Six => zone as f64 * 6.0 - 3.0,
            ZoneWidth::Three => zone as f64 * 3.0,
        }
    }
}

impl TryFrom<u8> for ZoneWidth {
    type Error = GeoconvError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            3 => Ok(ZoneWidth::Three),
            6 => Ok(ZoneWidth::Six),
            other => Err(ProjectionError::InvalidZoneWidth(other).into()),
        }
    }
}

impl From<ZoneWidth> for u8 {
    fn from(width: ZoneWidth) -> Self {
        width.degrees()
    }
}

impl FromStr for ZoneWidth {
    type Err = GeoconvError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let degrees: u8 = s
            .trim()
            .trim_end_matches('°')
            .parse()
            .map_err(|_| GeoconvError::InvalidInput(format!("zone width '{s}' is not 3 or 6")))?;
        ZoneWidth::try_from(degrees)
    }
}

impl fmt::Display for ZoneWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// Gauss-Krüger grid coordinates with the zone number packed into x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussCoord {
    /// `zone * 1_000_000 + easting`, easting including the 500 km offset
    pub x_with_zone: f64,
    /// Northing in meters
    pub y: f64,
    /// Central meridian of the zone in degrees
    pub central_meridian: f64,
}

impl GaussCoord {
    pub fn new(x_with_zone: f64, y: f64, central_meridian: f64) -> Self {
        Self {
            x_with_zone,
            y,
            central_meridian,
        }
    }

    /// Zone number packed into `x_with_zone`
    pub fn zone(&self) -> i32 {
        split_zone(self.x_with_zone).0
    }

    /// Easting with the zone prefix stripped
    pub fn easting(&self) -> f64 {
        split_zone(self.x_with_zone).1
    }
}

fn split_zone(x_with_zone: f64) -> (i32, f64) {
    let zone = (x_with_zone / ZONE_MULTIPLIER).floor();
    (zone as i32, x_with_zone - zone * ZONE_MULTIPLIER)
}

/// Project a geodetic point into its Gauss-Krüger zone
pub fn wgs84_to_gauss<T: EllipsoidalTransform>(
    lon: f64,
    lat: f64,
    zone_width: ZoneWidth,
    transform: T,
) -> Result<GaussCoord> {
    ensure_finite("lon", lon)?;
    ensure_finite("lat", lat)?;

    let zone = zone_width.zone_number(lon);
    if zone < 0 {
        return Err(GeoconvError::InvalidInput(format!(
            "longitude {lon} falls in {zone_width}° zone {zone}, which x cannot carry"
        )));
    }
    let central_meridian = zone_width.central_meridian(zone);
    debug!(
        "lon {} falls in {}° zone {} (central meridian {})",
        lon, zone_width, zone, central_meridian
    );

    let (x, y) = transform.project_transverse_mercator(lon, lat, central_meridian)?;
    if !(0.0..ZONE_MULTIPLIER).contains(&x) {
        return Err(GeoconvError::InvalidInput(format!(
            "easting {x} of lon {lon} is outside the band of zone {zone}"
        )));
    }

    Ok(GaussCoord {
        x_with_zone: zone as f64 * ZONE_MULTIPLIER + x,
        y,
        central_meridian,
    })
}

/// Unproject zoned Gauss-Krüger coordinates to (lon, lat).
///
/// The zone prefix is stripped from `x_with_zone`. An explicit
/// `central_meridian` wins over the one implied by the zone number; without
/// one the zone number must be present.
pub fn gauss_to_wgs84<T: EllipsoidalTransform>(
    x_with_zone: f64,
    y: f64,
    central_meridian: Option<f64>,
    zone_width: ZoneWidth,
    transform: T,
) -> Result<(f64, f64)> {
    ensure_finite("x", x_with_zone)?;
    ensure_finite("y", y)?;
    if x_with_zone < 0.0 {
        return Err(GeoconvError::InvalidInput(format!(
            "x {x_with_zone} is negative and carries no zone"
        )));
    }

    let (zone, easting) = split_zone(x_with_zone);
    let central_meridian = match (central_meridian, zone) {
        (Some(cm), 0) => ensure_finite("central meridian", cm)?,
        (Some(cm), zone) => {
            let cm = ensure_finite("central meridian", cm)?;
            let decoded = zone_width.central_meridian(zone);
            if wrap_longitude(decoded - cm).abs() > zone_width.degrees() as f64 / 2.0 {
                warn!(
                    "central meridian {} is outside {}° zone {} (centered on {})",
                    cm, zone_width, zone, decoded
                );
            }
            cm
        }
        (None, 0) => return Err(ProjectionError::MissingZone(x_with_zone).into()),
        (None, zone) => zone_width.central_meridian(zone),
    };
    debug!(
        "unprojecting easting {} northing {} about central meridian {}",
        easting, y, central_meridian
    );

    transform.unproject_transverse_mercator(easting, y, central_meridian)
}

/// Gauss-Krüger coordinates to an ENU offset; the point is placed on the
/// ellipsoid surface since the grid carries no height
pub fn gauss_to_enu<T: EllipsoidalTransform>(
    gauss: &GaussCoord,
    origin: &Origin,
    zone_width: ZoneWidth,
    transform: T,
) -> Result<EnuCoord> {
    let (lon, lat) = gauss_to_wgs84(
        gauss.x_with_zone,
        gauss.y,
        Some(gauss.central_meridian),
        zone_width,
        &transform,
    )?;
    LocalFrame::new(*origin, &transform)?.to_enu(&LlaCoord::new(lat, lon, 0.0))
}

/// ENU offset to Gauss-Krüger coordinates; the height is dropped
pub fn enu_to_gauss<T: EllipsoidalTransform>(
    enu: &EnuCoord,
    origin: &Origin,
    zone_width: ZoneWidth,
    transform: T,
) -> Result<GaussCoord> {
    let lla = LocalFrame::new(*origin, &transform)?.to_geodetic(enu)?;
    wgs84_to_gauss(lla.lon, lla.lat, zone_width, &transform)
}
