//! Conversions between geodetic, local East-North-Up and Gauss-Krüger
//! grid coordinates.

pub mod converter;
pub mod coordinate;
pub mod ellipsoid;
pub mod error;
pub mod projection;
pub mod transform;

pub use converter::GeoConverter;
pub use coordinate::{EnuCoord, LlaCoord, LocalFrame, Origin, SensorPolar, DEFAULT_ORIGIN};
pub use ellipsoid::Ellipsoid;
pub use error::{CoordinateError, GeoconvError, ProjectionError, Result};
pub use projection::{GaussCoord, TransverseMercator, ZoneWidth};
pub use transform::EllipsoidalTransform;
