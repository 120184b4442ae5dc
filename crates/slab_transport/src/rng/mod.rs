//! # Random Number Generation
//!
//! Seeded random streams for the photon transport loop.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: every stream is derived from the base seed and a
//!   stream index, so a run is fully determined by its configuration
//! - **Independence**: each worker owns a private stream; no generator is
//!   shared between threads
//! - **Open interval**: uniform deviates exclude 0 and 1, so optical depth
//!   sampling never takes the logarithm of zero
//!
//! ## Usage Example
//!
//! ```rust
//! use slab_transport::rng::SlabRng;
//!
//! let mut rng = SlabRng::stream(1337, 3);
//! assert_eq!(rng.seed(), 1340);
//!
//! let direction = rng.sample_isotropic_direction();
//! assert!(direction.cos_theta >= -1.0 && direction.cos_theta <= 1.0);
//! ```

mod prng;

pub use prng::SlabRng;
