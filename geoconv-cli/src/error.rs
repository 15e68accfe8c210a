use geoconv_core::GeoconvError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Conversion(#[from] GeoconvError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
