//! Classic 3D Perlin gradient noise over a seeded permutation table.

use crate::random::{RandomSource, Seed, SeededRandom};

/// The twelve edge-midpoint gradient directions of a cube.
const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Quintic fade curve `t^3 (t (6t - 15) + 10)`.
#[inline]
pub(crate) fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn mix(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

#[inline]
fn dot(g: &[f64; 3], x: f64, y: f64, z: f64) -> f64 {
    g[0] * x + g[1] * y + g[2] * z
}

/// Seeded 3D gradient noise.
///
/// The permutation table is a shuffle of `0..=255` drawn from the seed,
/// doubled to 512 entries so corner lookups never wrap. It is immutable after
/// construction.
#[derive(Clone)]
pub struct GradientNoise3D {
    perm: Box<[u8; 512]>,
}

impl GradientNoise3D {
    /// Build the permutation table from a seed.
    pub fn from_seed(seed: &Seed) -> Self {
        Self::from_rng(&mut SeededRandom::new(seed))
    }

    /// Build the permutation table from draws on an existing stream.
    pub fn from_rng(rng: &mut impl RandomSource) -> Self {
        let mut p: [u8; 256] = std::array::from_fn(|i| i as u8);
        for i in (1..p.len()).rev() {
            let j = rng.next_index(i + 1);
            p.swap(i, j);
        }
        let mut perm = Box::new([0u8; 512]);
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn hash(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    /// Raw gradient noise in `[-1, 1]`.
    pub fn noise_signed(&self, x: f64, y: f64, z: f64) -> f64 {
        let fx = x.floor();
        let fy = y.floor();
        let fz = z.floor();
        let x = x - fx;
        let y = y - fy;
        let z = z - fz;
        let xi = (fx as i64 & 255) as usize;
        let yi = (fy as i64 & 255) as usize;
        let zi = (fz as i64 & 255) as usize;

        let corner = |dx: usize, dy: usize, dz: usize| {
            self.hash(xi + dx + self.hash(yi + dy + self.hash(zi + dz))) % 12
        };

        let n000 = dot(&GRAD3[corner(0, 0, 0)], x, y, z);
        let n100 = dot(&GRAD3[corner(1, 0, 0)], x - 1.0, y, z);
        let n010 = dot(&GRAD3[corner(0, 1, 0)], x, y - 1.0, z);
        let n110 = dot(&GRAD3[corner(1, 1, 0)], x - 1.0, y - 1.0, z);
        let n001 = dot(&GRAD3[corner(0, 0, 1)], x, y, z - 1.0);
        let n101 = dot(&GRAD3[corner(1, 0, 1)], x - 1.0, y, z - 1.0);
        let n011 = dot(&GRAD3[corner(0, 1, 1)], x, y - 1.0, z - 1.0);
        let n111 = dot(&GRAD3[corner(1, 1, 1)], x - 1.0, y - 1.0, z - 1.0);

        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let nx00 = mix(n000, n100, u);
        let nx01 = mix(n001, n101, u);
        let nx10 = mix(n010, n110, u);
        let nx11 = mix(n011, n111, u);
        let nxy0 = mix(nx00, nx10, v);
        let nxy1 = mix(nx01, nx11, v);
        mix(nxy0, nxy1, w)
    }

    /// Gradient noise remapped to `[0, 1]`.
    #[inline]
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        (0.5 * self.noise_signed(x, y, z) + 0.5).clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for GradientNoise3D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradientNoise3D")
            .field("perm", &&self.perm[..8])
            .finish_non_exhaustive()
    }
}
