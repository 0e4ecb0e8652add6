//! Equirectangular planet texture synthesis.
//!
//! Each texel centre is mapped onto the unit sphere and three independent
//! layered noise fields are sampled there: terrain height, land colour blend
//! and cloud cover. One texel of all four output maps is written per
//! [`advance`](PlanetTextureGenerator::advance) call.

use std::f64::consts::{PI, TAU};

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vista_noise::{GradientNoise3D, LayeredNoiseSampler, NoiseParameters, Seed, SeededRandom};
use vista_raster::{
    FlushPolicy, GeneratorState, Incremental, PixelBuffer, Progress, RasterSurface, Rgb,
    ScanCursor, ScanStep, smootherstep,
};

use crate::error::PlanetError;

/// Encoded normal of a flat surface, `(0, 0, 1) * 0.5 + 0.5`.
const FLAT_NORMAL: Rgb = Rgb::new(0.5, 0.5, 1.0);

/// Everything that shapes a planet texture set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetTextureParams {
    /// Terrain height field.
    pub surface: NoiseParameters,
    /// Blend factor between the two land colours.
    pub land: NoiseParameters,
    /// Cloud coverage.
    pub clouds: NoiseParameters,
    pub water_deep: Rgb,
    pub water_shallow: Rgb,
    /// Heights at or below this are water. Must be positive.
    pub water_level: f64,
    /// Exponent on the depth ratio before easing. Must be positive.
    pub water_falloff: f64,
    pub water_specular: f64,
    pub land_color1: Rgb,
    pub land_color2: Rgb,
    pub land_specular: f64,
    pub cloud_color: Rgb,
    /// Cloud opacity multiplier in `[0, 1]`.
    pub cloud_opacity: f64,
    /// Height exaggeration used when estimating land normals.
    pub normal_scale: f64,
    /// Completed rows between flushes of every output map.
    pub rows_per_flush: u32,
}

impl Default for PlanetTextureParams {
    fn default() -> Self {
        Self {
            surface: NoiseParameters {
                i_scale: 2.0,
                i_octaves: 8,
                i_falloff: 1.0,
                i_intensity: 1.0,
                i_ridginess: 0.2,
                s_scale: 2.0,
                s_octaves: 0,
                s_falloff: 1.0,
                s_intensity: 1.0,
            },
            land: NoiseParameters {
                i_scale: 2.0,
                i_octaves: 2,
                i_falloff: 2.0,
                i_intensity: 1.5,
                i_ridginess: 0.0,
                s_scale: 1.0,
                s_octaves: 0,
                s_falloff: 1.0,
                s_intensity: 1.0,
            },
            clouds: NoiseParameters {
                i_scale: 1.0,
                i_octaves: 6,
                i_falloff: 4.0,
                i_intensity: 1.8,
                i_ridginess: 0.0,
                s_scale: 1.0,
                s_octaves: 6,
                s_falloff: 2.0,
                s_intensity: 2.0,
            },
            water_deep: Rgb::new(0.0, 0.0, 40.0 / 255.0),
            water_shallow: Rgb::new(0.0, 80.0 / 255.0, 160.0 / 255.0),
            water_level: 0.68,
            water_falloff: 1.0,
            water_specular: 1.0,
            land_color1: Rgb::new(0.0, 60.0 / 255.0, 0.0),
            land_color2: Rgb::new(130.0 / 255.0, 110.0 / 255.0, 70.0 / 255.0),
            land_specular: 0.0,
            cloud_color: Rgb::WHITE,
            cloud_opacity: 1.0,
            normal_scale: 20.0,
            rows_per_flush: FlushPolicy::default().rows_per_flush,
        }
    }
}

impl PlanetTextureParams {
    fn validate(&self) -> Result<(), PlanetError> {
        let check = |name: &'static str, value: f64, ok: bool| {
            if value.is_finite() && ok {
                Ok(())
            } else {
                Err(PlanetError::InvalidParameter { name, value })
            }
        };
        check("water_level", self.water_level, self.water_level > 0.0)?;
        check("water_falloff", self.water_falloff, self.water_falloff > 0.0)?;
        check("water_specular", self.water_specular, true)?;
        check("land_specular", self.land_specular, true)?;
        check(
            "cloud_opacity",
            self.cloud_opacity,
            (0.0..=1.0).contains(&self.cloud_opacity),
        )?;
        check("normal_scale", self.normal_scale, true)?;
        for (name, field) in [
            ("surface", &self.surface),
            ("land", &self.land),
            ("clouds", &self.clouds),
        ] {
            field
                .validate()
                .map_err(|source| PlanetError::Noise { field: name, source })?;
        }
        Ok(())
    }
}

/// The four co-registered output rasters.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanetTextures {
    /// Albedo.
    pub diffuse: RasterSurface,
    /// Tangent-space normals encoded as `n * 0.5 + 0.5`.
    pub normal: RasterSurface,
    /// Grey specular intensity.
    pub specular: RasterSurface,
    /// Cloud colour, coverage in the alpha channel.
    pub cloud: RasterSurface,
}

/// Map a texel centre to a point on the unit sphere.
///
/// `u` runs around the equator (`azimuth = 2pi u`), `v` from pole to pole
/// (`inclination = pi v`).
pub fn sphere_point(u: f64, v: f64) -> DVec3 {
    let azimuth = TAU * u;
    let inclination = PI * v;
    DVec3::new(
        inclination.sin() * azimuth.cos(),
        inclination.sin() * azimuth.sin(),
        inclination.cos(),
    )
}

/// Incremental generator of a [`PlanetTextures`] set.
pub struct PlanetTextureGenerator {
    params: PlanetTextureParams,
    surface: LayeredNoiseSampler,
    land: LayeredNoiseSampler,
    clouds: LayeredNoiseSampler,
    diffuse: PixelBuffer,
    normal: PixelBuffer,
    specular: PixelBuffer,
    cloud: PixelBuffer,
    cursor: ScanCursor,
    state: GeneratorState,
}

impl PlanetTextureGenerator {
    /// Validate `params` and seed the three noise fields from `seed`, in the
    /// order surface, land, clouds.
    pub fn new(
        seed: &Seed,
        width: u32,
        height: u32,
        params: PlanetTextureParams,
    ) -> Result<Self, PlanetError> {
        params.validate()?;
        let policy = FlushPolicy {
            rows_per_flush: params.rows_per_flush,
        };
        let diffuse = PixelBuffer::new(width, height, policy)?;
        let normal = PixelBuffer::new(width, height, policy)?;
        let specular = PixelBuffer::new(width, height, policy)?;
        let cloud = PixelBuffer::new(width, height, policy)?;

        let mut rng = SeededRandom::new(seed);
        let field = |name: &'static str, noise: GradientNoise3D, p: &NoiseParameters| {
            LayeredNoiseSampler::new(noise, p.clone())
                .map_err(|source| PlanetError::Noise { field: name, source })
        };
        let surface = field("surface", GradientNoise3D::from_rng(&mut rng), &params.surface)?;
        let land = field("land", GradientNoise3D::from_rng(&mut rng), &params.land)?;
        let clouds = field("clouds", GradientNoise3D::from_rng(&mut rng), &params.clouds)?;

        debug!(%seed, width, height, "planet texture generator created");
        Ok(Self {
            params,
            surface,
            land,
            clouds,
            diffuse,
            normal,
            specular,
            cloud,
            cursor: ScanCursor::new(width, height),
            state: GeneratorState::Pending,
        })
    }

    /// Terrain height at a texel centre.
    fn height_at(&self, px: f64, py: f64) -> f64 {
        let (w, h) = (self.cursor.width() as f64, self.cursor.height() as f64);
        let p = sphere_point((px + 0.5) / w, (py + 0.5) / h);
        self.surface.sample(p.x, p.y, p.z)
    }

    /// Tangent-space normal from forward differences one texel east and one
    /// texel south.
    fn land_normal(&self, px: f64, py: f64, height: f64) -> DVec3 {
        let k = self.params.normal_scale;
        let east = DVec3::new(1.0, 0.0, (self.height_at(px + 1.0, py) - height) * k);
        let south = DVec3::new(0.0, 1.0, (self.height_at(px, py + 1.0) - height) * k);
        east.cross(south).normalize_or(DVec3::Z)
    }

    fn shade(&mut self, x: u32, y: u32) {
        let (px, py) = (x as f64, y as f64);
        let (w, h) = (self.cursor.width() as f64, self.cursor.height() as f64);
        let p = sphere_point((px + 0.5) / w, (py + 0.5) / h);
        let height = self.surface.sample(p.x, p.y, p.z);
        let params = &self.params;

        let (albedo, normal, spec) = if height > params.water_level {
            let t = self.land.sample(p.x, p.y, p.z);
            let n = self.land_normal(px, py, height) * 0.5 + 0.5;
            (
                params.land_color1.lerp(params.land_color2, t),
                Rgb::new(n.x, n.y, n.z),
                params.land_specular,
            )
        } else {
            let ratio = (height / params.water_level).powf(params.water_falloff);
            (
                params
                    .water_deep
                    .lerp(params.water_shallow, smootherstep(ratio)),
                FLAT_NORMAL,
                params.water_specular,
            )
        };
        let coverage = self.clouds.sample(p.x, p.y, p.z) * params.cloud_opacity;
        let cloud_color = params.cloud_color;

        self.diffuse.set_pixel(x, y, albedo, 1.0);
        self.normal.set_pixel(x, y, normal, 1.0);
        self.specular.set_pixel(x, y, Rgb::grey(spec), 1.0);
        self.cloud.set_pixel(x, y, cloud_color, coverage);
    }

    fn buffers_mut(&mut self) -> [&mut PixelBuffer; 4] {
        [
            &mut self.diffuse,
            &mut self.normal,
            &mut self.specular,
            &mut self.cloud,
        ]
    }

    /// Live view of the maps, in the order diffuse, normal, specular, cloud.
    pub fn buffers(&self) -> [&PixelBuffer; 4] {
        [&self.diffuse, &self.normal, &self.specular, &self.cloud]
    }

    pub fn params(&self) -> &PlanetTextureParams {
        &self.params
    }

    /// The flushed output maps.
    pub fn into_textures(self) -> PlanetTextures {
        PlanetTextures {
            diffuse: self.diffuse.into_front(),
            normal: self.normal.into_front(),
            specular: self.specular.into_front(),
            cloud: self.cloud.into_front(),
        }
    }
}

impl Incremental for PlanetTextureGenerator {
    fn advance(&mut self) -> Progress {
        let progress = match self.cursor.advance() {
            ScanStep::Finished => {
                if self.state != GeneratorState::Done {
                    for buffer in self.buffers_mut() {
                        buffer.flush();
                    }
                    info!(
                        width = self.cursor.width(),
                        height = self.cursor.height(),
                        "planet textures complete"
                    );
                }
                Progress::DONE
            }
            ScanStep::Cell { x, y, progress } => {
                for buffer in self.buffers_mut() {
                    buffer.note_row(y);
                }
                self.shade(x, y);
                Progress::partial(progress)
            }
        };
        self.state = GeneratorState::after(progress);
        progress
    }

    fn state(&self) -> GeneratorState {
        self.state
    }

    fn status_label(&self) -> String {
        match self.state {
            GeneratorState::Done => "Rendering complete.".to_string(),
            _ => "Rendering planet textures".to_string(),
        }
    }
}
