//! Transverse Mercator and Gauss-Krüger zoning

mod gauss;
pub(crate) mod tmerc;

pub use gauss::{
    enu_to_gauss, gauss_to_enu, gauss_to_wgs84, wgs84_to_gauss,
    GaussCoord, ZoneWidth, ZONE_MULTIPLIER,
};
pub use tmerc::{wrap_longitude, TransverseMercator, FALSE_EASTING};
