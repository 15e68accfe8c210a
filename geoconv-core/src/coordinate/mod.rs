//! Coordinate frames and the transforms between them

mod enu;
mod polar;
mod transforms;

pub use enu::{enu_to_wgs84, wgs84_to_enu, EnuCoord, LocalFrame, Origin, DEFAULT_ORIGIN};
pub use polar::SensorPolar;
pub use transforms::{
    ecef_to_lla, lla_to_ecef,
    EcefCoord, LlaCoord,
};
