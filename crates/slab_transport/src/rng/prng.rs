//! Pseudo-random number generator wrapper for photon transport.
//!
//! This module provides [`SlabRng`], a seeded PRNG wrapper that offers
//! reproducible uniform deviates on the open interval (0, 1) together with
//! the derived samplers the transport loop needs: exponential optical
//! depths and photon directions.

use std::f64::consts::PI;

use rand::distributions::Open01;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::packet::Direction;

/// Photon transport random number generator.
///
/// Each worker owns its own instance, so no synchronisation is needed and
/// every stream is reproducible from its seed alone.
///
/// # Examples
///
/// ```rust
/// use slab_transport::rng::SlabRng;
///
/// let mut rng = SlabRng::from_seed(42);
///
/// let u = rng.uniform();
/// assert!(u > 0.0 && u < 1.0);
///
/// let tau = rng.sample_tau();
/// assert!(tau > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct SlabRng {
    /// The underlying PRNG instance.
    inner: StdRng,
    /// The seed used for initialisation (stored for reproducibility tracking).
    seed: u64,
}

impl SlabRng {
    /// Creates a new RNG instance initialised with the given seed.
    ///
    /// The same seed will always produce the same sequence of random numbers.
    ///
    /// ```rust
    /// use slab_transport::rng::SlabRng;
    ///
    /// let mut rng1 = SlabRng::from_seed(12345);
    /// let mut rng2 = SlabRng::from_seed(12345);
    /// assert_eq!(rng1.uniform(), rng2.uniform());
    /// ```
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates the independent stream with the given index.
    ///
    /// Stream `index` is seeded with `seed + index` (wrapping), so stream 0
    /// is identical to [`SlabRng::from_seed`] with the base seed.
    #[inline]
    pub fn stream(seed: u64, index: usize) -> Self {
        Self::from_seed(seed.wrapping_add(index as u64))
    }

    /// Returns the seed used for initialisation.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates a uniform random value in the open interval (0, 1).
    ///
    /// Zero is excluded so the value can be passed to a logarithm.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.inner.sample(Open01)
    }

    /// Generates a uniform random value in the open interval (min, max).
    #[inline]
    pub fn uniform_in(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.uniform()
    }

    /// Samples an optical depth from the unit exponential distribution.
    ///
    /// Uses `-ln(1 - U)`; every draw in the engine goes through this sampler.
    #[inline]
    pub fn sample_tau(&mut self) -> f64 {
        -(1.0 - self.uniform()).ln()
    }

    /// Samples a direction uniformly over the full sphere.
    ///
    /// `cos(theta) = 2U - 1` and `phi = 2 pi U'` from two independent draws.
    /// Used when a packet scatters.
    #[inline]
    pub fn sample_isotropic_direction(&mut self) -> Direction {
        let cos_theta = 2.0 * self.uniform() - 1.0;
        let phi = 2.0 * PI * self.uniform();
        Direction::from_angles(cos_theta, phi)
    }

    /// Samples an emission direction into the upper hemisphere.
    ///
    /// `cos(theta) = sqrt(U)` weights the polar angle by `cos(theta)`, the
    /// Lambertian law for packets entering the slab from the source below.
    #[inline]
    pub fn sample_emission_direction(&mut self) -> Direction {
        let cos_theta = self.uniform().sqrt();
        let phi = 2.0 * PI * self.uniform();
        Direction::from_angles(cos_theta, phi)
    }

    /// Fills the buffer with uniform random values in (0, 1).
    ///
    /// Empty buffers are handled gracefully (no operation).
    #[inline]
    pub fn fill_uniform(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = self.uniform();
        }
    }
}
