use vista_raster::RasterError;

/// Errors raised while constructing space-vista generators.
#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    /// A generator parameter was out of its valid range.
    #[error("{generator}: parameter `{name}` is invalid ({value})")]
    InvalidParameter {
        generator: &'static str,
        name: &'static str,
        value: f64,
    },

    /// The canvas could not be created.
    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// Require `value` to be finite.
pub(crate) fn finite(generator: &'static str, name: &'static str, value: f64) -> Result<f64, SpaceError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SpaceError::InvalidParameter {
            generator,
            name,
            value,
        })
    }
}

/// Require `value` to be finite and at least `min` (or strictly above it when `strict`).
pub(crate) fn at_least(
    generator: &'static str,
    name: &'static str,
    value: f64,
    min: f64,
    strict: bool,
) -> Result<f64, SpaceError> {
    let ok = value.is_finite() && if strict { value > min } else { value >= min };
    if ok {
        Ok(value)
    } else {
        Err(SpaceError::InvalidParameter {
            generator,
            name,
            value,
        })
    }
}
