//! Layered noise: octave compositing, domain warping ("smear") and ridging.
//!
//! [`LayeredNoiseSampler`] is the density field behind terrain height, land
//! colour blending, cloud cover and nebula structure. Its output is always
//! clamped to `[0, 1]`.

use serde::{Deserialize, Serialize};

use crate::error::NoiseError;
use crate::gradient::GradientNoise3D;

/// Upper bound on any octave count; `2^k` stays exact well below `f64` limits.
pub const MAX_OCTAVES: u32 = 32;

/// Z offset decorrelating the ridge field from the base field.
const RIDGE_Z_OFFSET: f64 = 11.0;

/// Parameters of one layered noise field.
///
/// `i_*` fields shape the primary ("intensity") field, `s_*` fields the
/// secondary field used to smear the primary field's input coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParameters {
    /// Primary coordinate divisor. Larger values produce larger features.
    pub i_scale: f64,
    /// Primary octave count, at least 1.
    pub i_octaves: u32,
    /// Exponent applied to the final value.
    pub i_falloff: f64,
    /// Multiplier applied after the falloff.
    pub i_intensity: f64,
    /// Blend weight of the ridged field in `[0, 1]`.
    pub i_ridginess: f64,
    /// Secondary coordinate divisor.
    pub s_scale: f64,
    /// Secondary octave count. Zero disables smearing.
    pub s_octaves: u32,
    /// Exponent applied to the secondary field.
    pub s_falloff: f64,
    /// Multiplier turning the secondary field into a coordinate offset.
    pub s_intensity: f64,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self {
            i_scale: 1.0,
            i_octaves: 4,
            i_falloff: 1.0,
            i_intensity: 1.0,
            i_ridginess: 0.0,
            s_scale: 1.0,
            s_octaves: 0,
            s_falloff: 1.0,
            s_intensity: 1.0,
        }
    }
}

impl NoiseParameters {
    /// Check every field, naming the first offending one.
    pub fn validate(&self) -> Result<(), NoiseError> {
        for (name, value) in [("i_scale", self.i_scale), ("s_scale", self.s_scale)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(NoiseError::NonPositiveScale { name, value });
            }
        }
        if self.i_octaves == 0 {
            return Err(NoiseError::ZeroOctaves);
        }
        for (name, value) in [("i_octaves", self.i_octaves), ("s_octaves", self.s_octaves)] {
            if value > MAX_OCTAVES {
                return Err(NoiseError::TooManyOctaves {
                    name,
                    value,
                    max: MAX_OCTAVES,
                });
            }
        }
        for (name, value) in [
            ("i_falloff", self.i_falloff),
            ("i_intensity", self.i_intensity),
            ("s_falloff", self.s_falloff),
            ("s_intensity", self.s_intensity),
        ] {
            if !value.is_finite() {
                return Err(NoiseError::NonFinite { name, value });
            }
        }
        if !(0.0..=1.0).contains(&self.i_ridginess) {
            return Err(NoiseError::RidginessOutOfRange(self.i_ridginess));
        }
        Ok(())
    }
}

/// Normalized octave sum: `sum(noise(p * 2^k) / 2^k) / (2 - 2^(1 - n))`.
pub fn octave(noise: &GradientNoise3D, x: f64, y: f64, z: f64, octaves: u32) -> f64 {
    let mut total = 0.0;
    let mut frequency = 1.0;
    for _ in 0..octaves {
        total += noise.noise(x * frequency, y * frequency, z * frequency) / frequency;
        frequency *= 2.0;
    }
    total / (2.0 - 2f64.powi(1 - octaves as i32))
}

/// Tent fold `1 - 2|v - 0.5|`, turning smooth noise into creases.
#[inline]
pub fn ridge(v: f64) -> f64 {
    1.0 - 2.0 * (v - 0.5).abs()
}

/// A validated noise field over one exclusively owned [`GradientNoise3D`].
#[derive(Clone, Debug)]
pub struct LayeredNoiseSampler {
    noise: GradientNoise3D,
    params: NoiseParameters,
}

impl LayeredNoiseSampler {
    /// Validate `params` and bind them to `noise`.
    pub fn new(noise: GradientNoise3D, params: NoiseParameters) -> Result<Self, NoiseError> {
        params.validate()?;
        Ok(Self { noise, params })
    }

    /// Sample the field at a point, returning a value in `[0, 1]`.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = &self.params;

        let offset = if p.s_octaves > 0 {
            let s = octave(
                &self.noise,
                x / p.s_scale,
                y / p.s_scale,
                z / p.s_scale,
                p.s_octaves,
            );
            s.powf(p.s_falloff) * p.s_intensity
        } else {
            0.0
        };

        let nx = x / p.i_scale + offset;
        let ny = y / p.i_scale + offset;
        let nz = z / p.i_scale + offset;
        let mut value = octave(&self.noise, nx, ny, nz, p.i_octaves);

        if p.i_ridginess > 0.0 {
            let r = ridge(octave(
                &self.noise,
                nx,
                ny,
                nz + RIDGE_Z_OFFSET,
                p.i_octaves,
            ));
            value = p.i_ridginess * r + (1.0 - p.i_ridginess) * value;
        }

        (value.powf(p.i_falloff) * p.i_intensity).clamp(0.0, 1.0)
    }

    /// The parameters this sampler was built with.
    pub fn params(&self) -> &NoiseParameters {
        &self.params
    }
}
