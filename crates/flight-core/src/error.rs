use thiserror::Error;

/// Errors raised by the platform-free engine.
///
/// None of these are fatal to the hosting page: callers log them and degrade
/// to defaults or to an empty slot.
#[derive(Debug, Error, PartialEq)]
pub enum FlightError {
    #[error("atmosphere zone table is empty")]
    NoZones,

    #[error("atmosphere zone {index} has max depth {max_depth} which does not increase")]
    ZonesOutOfOrder { index: usize, max_depth: f32 },

    #[error("last atmosphere zone must be unbounded, found max depth {0}")]
    ZonesNotExhaustive(f32),

    #[error("blend factor {0} is outside (0, 1]")]
    InvalidBlendFactor(f32),

    #[error("raster surface of {width}x{height} could not be allocated")]
    RasterUnavailable { width: u32, height: u32 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Problems found while reading per-mount options.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown render mode `{0}` (expected auto, scene or field)")]
    UnknownMode(String),

    #[error("value `{value}` for `{key}` is not a number")]
    NotANumber { key: String, value: String },

    #[error("value {value} for `{key}` is outside {min}..={max}")]
    OutOfRange {
        key: String,
        value: f64,
        min: f64,
        max: f64,
    },
}
