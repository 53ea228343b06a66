//! Multi-octave 2D gradient noise.
//!
//! The lattice is a 256-entry permutation shuffled from the run's
//! [`SeedStream`] at construction; after that the field is a pure function
//! of its inputs. One octave is classic gradient noise with a quintic fade
//! and eight unit gradient directions, rescaled by √2 so it spans `[-1, 1]`.
//! Octaves are summed with weights `persistence^i` at frequency `2^i` and
//! divided by the total weight.

use std::f32::consts::FRAC_1_SQRT_2;

use super::SeedStream;

const DIAG: f32 = FRAC_1_SQRT_2;

/// Unit gradient directions (axis-aligned and diagonal).
const GRADIENTS: [(f32, f32); 8] = [
    (0.0, 1.0),
    (DIAG, DIAG),
    (1.0, 0.0),
    (DIAG, -DIAG),
    (0.0, -1.0),
    (-DIAG, -DIAG),
    (-1.0, 0.0),
    (-DIAG, DIAG),
];

/// Pixel-space sampling parameters for a [`NoiseField`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParams {
    /// Pixels per noise lattice cell at the first octave.
    pub scale: f32,
    pub octaves: u32,
    pub persistence: f32,
}

impl NoiseParams {
    pub fn new(scale: f32, octaves: u32, persistence: f32) -> Self {
        Self {
            scale,
            octaves,
            persistence,
        }
    }
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self::new(80.0, 6, 0.5)
    }
}

/// Seeded 2D gradient noise field.
#[derive(Debug, Clone)]
pub struct NoiseField {
    perm: [u8; 512],
}

impl NoiseField {
    /// Build a field whose lattice is shuffled from `rng`.
    ///
    /// Consumes one shuffle of 256 entries from the stream.
    pub fn new(rng: &mut SeedStream) -> Self {
        let mut table: Vec<u8> = (0..=255u8).collect();
        rng.shuffle(&mut table);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    /// Sample multi-octave noise at `(x, y)`; the result is in `[-1, 1]`.
    ///
    /// Zero octaves yield `0.0`. A negative or non-finite persistence is
    /// treated as zero, leaving only the first octave.
    pub fn sample(&self, x: f32, y: f32, octaves: u32, persistence: f32) -> f32 {
        if octaves == 0 {
            return 0.0;
        }
        let persistence = if persistence.is_finite() {
            persistence.max(0.0)
        } else {
            0.0
        };

        let mut total = 0.0f32;
        let mut weight = 0.0f32;
        let mut amplitude = 1.0f32;
        let mut frequency = 1.0f32;
        for _ in 0..octaves {
            total += self.base(x * frequency, y * frequency) * amplitude;
            weight += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
            if amplitude == 0.0 {
                break;
            }
        }

        if weight > 0.0 && total.is_finite() {
            (total / weight).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    /// Sample at a pixel position using pixel-space parameters.
    pub fn sample_pixel(&self, px: f32, py: f32, params: &NoiseParams) -> f32 {
        let scale = if params.scale > 0.0 { params.scale } else { 1.0 };
        self.sample(px / scale, py / scale, params.octaves, params.persistence)
    }

    /// One octave of gradient noise, in `[-1, 1]`.
    pub fn base(&self, x: f32, y: f32) -> f32 {
        if !x.is_finite() || !y.is_finite() {
            return 0.0;
        }
        let x0 = x.floor();
        let y0 = y.floor();
        let xf = x - x0;
        let yf = y - y0;
        let xi = (x0 as i64).rem_euclid(256) as usize;
        let yi = (y0 as i64).rem_euclid(256) as usize;

        let n00 = self.corner(xi, yi, xf, yf);
        let n10 = self.corner(xi + 1, yi, xf - 1.0, yf);
        let n01 = self.corner(xi, yi + 1, xf, yf - 1.0);
        let n11 = self.corner(xi + 1, yi + 1, xf - 1.0, yf - 1.0);

        let u = fade(xf);
        let v = fade(yf);
        let nx0 = lerp(n00, n10, u);
        let nx1 = lerp(n01, n11, u);

        (lerp(nx0, nx1, v) * std::f32::consts::SQRT_2).clamp(-1.0, 1.0)
    }

    fn corner(&self, xi: usize, yi: usize, dx: f32, dy: f32) -> f32 {
        let h = self.perm[self.perm[xi] as usize + yi] as usize;
        let (gx, gy) = GRADIENTS[h & 7];
        gx * dx + gy * dy
    }
}

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}
