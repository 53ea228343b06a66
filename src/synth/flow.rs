//! Noise-derived flow field.
//!
//! A stylized stand-in for fluid motion, not a Navier–Stokes solve: the
//! gradient of a [`NoiseField`] is estimated by central differences and
//! rotated by 90° so paths swirl along the noise iso-lines instead of
//! climbing them. The result is normalized and scaled by `strength`.
//!
//! Sampling is local and deterministic; every call is a pure function of
//! the field and the coordinates.

use super::noise::NoiseField;

/// 2D vector field derived from a noise field.
#[derive(Debug, Clone)]
pub struct FlowField<'a> {
    noise: &'a NoiseField,
    scale: f32,
    strength: f32,
    epsilon: f32,
    octaves: u32,
    persistence: f32,
}

impl<'a> FlowField<'a> {
    /// Create a flow field over `noise` with default parameters
    /// (scale 200px, strength 1, ε 0.01, 3 octaves, persistence 0.5).
    pub fn new(noise: &'a NoiseField) -> Self {
        Self {
            noise,
            scale: 200.0,
            strength: 1.0,
            epsilon: 0.01,
            octaves: 3,
            persistence: 0.5,
        }
    }

    /// Pixels per noise lattice cell.
    pub fn scale(mut self, scale: f32) -> Self {
        if scale > 0.0 && scale.is_finite() {
            self.scale = scale;
        }
        self
    }

    /// Length of every non-zero flow vector.
    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = if strength.is_finite() { strength.max(0.0) } else { 0.0 };
        self
    }

    /// Finite-difference offset, in noise space.
    pub fn epsilon(mut self, epsilon: f32) -> Self {
        if epsilon > 0.0 && epsilon.is_finite() {
            self.epsilon = epsilon;
        }
        self
    }

    pub fn octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves;
        self
    }

    /// Flow vector at pixel `(x, y)`.
    ///
    /// Returns `(0, 0)` where the gradient vanishes.
    pub fn sample(&self, x: f32, y: f32) -> (f32, f32) {
        let (gx, gy) = self.gradient(x, y);
        let len = (gx * gx + gy * gy).sqrt();
        if !len.is_finite() || len < 1e-6 {
            return (0.0, 0.0);
        }
        // Perpendicular to the gradient.
        (-gy / len * self.strength, gx / len * self.strength)
    }

    /// Central-difference gradient of the noise at pixel `(x, y)`.
    pub fn gradient(&self, x: f32, y: f32) -> (f32, f32) {
        let nx = x / self.scale;
        let ny = y / self.scale;
        let e = self.epsilon;
        let n = |x: f32, y: f32| self.noise.sample(x, y, self.octaves, self.persistence);

        let gx = (n(nx + e, ny) - n(nx - e, ny)) / (2.0 * e);
        let gy = (n(nx, ny + e) - n(nx, ny - e)) / (2.0 * e);
        (gx, gy)
    }
}
