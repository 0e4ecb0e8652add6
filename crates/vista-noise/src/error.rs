//! Noise parameter validation errors.

/// Errors returned when a [`NoiseParameters`](crate::NoiseParameters) set is malformed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NoiseError {
    /// A scale parameter was zero, negative, or not finite.
    #[error("noise parameter `{name}` must be a positive finite number, got {value}")]
    NonPositiveScale { name: &'static str, value: f64 },

    /// The primary octave count was zero.
    #[error("noise parameter `i_octaves` must be at least 1")]
    ZeroOctaves,

    /// An octave count so large the per-octave frequency would overflow.
    #[error("noise parameter `{name}` must be at most {max}, got {value}")]
    TooManyOctaves {
        name: &'static str,
        value: u32,
        max: u32,
    },

    /// A falloff or intensity parameter was NaN or infinite.
    #[error("noise parameter `{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    /// Ridginess outside `[0, 1]`.
    #[error("noise parameter `i_ridginess` must lie in [0, 1], got {0}")]
    RidginessOutOfRange(f64),
}
