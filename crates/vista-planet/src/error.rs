use vista_noise::NoiseError;
use vista_raster::RasterError;

/// Errors raised while constructing planet generators.
#[derive(Debug, thiserror::Error)]
pub enum PlanetError {
    #[error("planet parameter `{name}` is invalid ({value})")]
    InvalidParameter { name: &'static str, value: f64 },

    /// One of the surface, land or cloud fields is malformed.
    #[error("{field} noise: {source}")]
    Noise {
        field: &'static str,
        #[source]
        source: NoiseError,
    },

    #[error(transparent)]
    Raster(#[from] RasterError),
}
