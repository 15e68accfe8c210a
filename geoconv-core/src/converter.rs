use crate::coordinate::{DEFAULT_ORIGIN, EnuCoord, LlaCoord, LocalFrame, Origin};
use crate::ellipsoid::Ellipsoid;
use crate::error::Result;
use crate::projection::{self, GaussCoord, ZoneWidth};
use crate::transform::EllipsoidalTransform;

/// Converter with the origin, zone width and ellipsoid bound once
#[derive(Debug, Clone, Copy)]
pub struct GeoConverter<T: EllipsoidalTransform = Ellipsoid> {
    frame: LocalFrame<T>,
    zone_width: ZoneWidth,
}

impl GeoConverter<Ellipsoid> {
    /// Converter on one of the built-in ellipsoids
    pub fn with_ellipsoid(
        origin: Origin,
        ellipsoid: Ellipsoid,
        zone_width: ZoneWidth,
    ) -> Result<Self> {
        Self::new(origin, ellipsoid, zone_width)
    }

    /// Survey origin, 6° zones, WGS84
    pub fn survey() -> Result<Self> {
        Self::new(DEFAULT_ORIGIN, Ellipsoid::Wgs84, ZoneWidth::Six)
    }
}

impl<T: EllipsoidalTransform> GeoConverter<T> {
    pub fn new(origin: Origin, transform: T, zone_width: ZoneWidth) -> Result<Self> {
        Ok(Self {
            frame: LocalFrame::new(origin, transform)?,
            zone_width,
        })
    }

    pub fn origin(&self) -> &Origin {
        self.frame.origin()
    }

    pub fn zone_width(&self) -> ZoneWidth {
        self.zone_width
    }

    pub fn frame(&self) -> &LocalFrame<T> {
        &self.frame
    }

    pub fn enu_to_wgs84(&self, enu: &EnuCoord) -> Result<LlaCoord> {
        self.frame.to_geodetic(enu)
    }

    pub fn wgs84_to_enu(&self, lla: &LlaCoord) -> Result<EnuCoord> {
        self.frame.to_enu(lla)
    }

    pub fn wgs84_to_gauss(&self, lon: f64, lat: f64) -> Result<GaussCoord> {
        projection::wgs84_to_gauss(lon, lat, self.zone_width, self.frame.transform())
    }

    /// Returns (lon, lat)
    pub fn gauss_to_wgs84(
        &self,
        x_with_zone: f64,
        y: f64,
        central_meridian: Option<f64>,
    ) -> Result<(f64, f64)> {
        projection::gauss_to_wgs84(
            x_with_zone,
            y,
            central_meridian,
            self.zone_width,
            self.frame.transform(),
        )
    }

    pub fn gauss_to_enu(&self, gauss: &GaussCoord) -> Result<EnuCoord> {
        let (lon, lat) =
            self.gauss_to_wgs84(gauss.x_with_zone, gauss.y, Some(gauss.central_meridian))?;
        self.frame.to_enu(&LlaCoord::new(lat, lon, 0.0))
    }

    pub fn enu_to_gauss(&self, enu: &EnuCoord) -> Result<GaussCoord> {
        let lla = self.frame.to_geodetic(enu)?;
        self.wgs84_to_gauss(lla.lon, lla.lat)
    }
}
