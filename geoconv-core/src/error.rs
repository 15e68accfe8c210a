use thiserror::Error;

/// Common errors across the coordinate converter
#[derive(Error, Debug)]
pub enum GeoconvError {
    #[error("Coordinate transform error: {0}")]
    Coordinate(#[from] CoordinateError),

    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Numerical error: {0}")]
    Numerical(String),
}

#[derive(Error, Debug)]
pub enum CoordinateError {
    #[error("Invalid latitude: {0} (must be -90 to 90)")]
    InvalidLatitude(f64),

    #[error("Non-finite {field}: {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("Coordinate transform failed: {0}")]
    TransformFailed(String),

    #[error("Geodetic latitude did not converge after {0} iterations")]
    NoConvergence(usize),
}

#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("No zone number in x coordinate {0} and no central meridian given")]
    MissingZone(f64),

    #[error("Invalid zone width: {0} (must be 3 or 6)")]
    InvalidZoneWidth(u8),

    #[error("Unknown ellipsoid: {0}")]
    UnknownEllipsoid(String),

    #[error("Projection did not converge after {0} iterations")]
    NoConvergence(usize),
}

pub type Result<T> = std::result::Result<T, GeoconvError>;

/// Reject NaN and infinities before they reach the trigonometry.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoordinateError::NonFinite { field, value }.into())
    }
}
