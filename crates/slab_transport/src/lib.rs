//! # Slab Transport
//!
//! Monte Carlo radiative transfer through a plane-parallel slab of constant
//! density with isotropic scattering.
//!
//! Photon packets are emitted at the bottom of the slab (`z = 0`), take
//! exponentially distributed optical-depth steps, and at each interaction
//! either scatter isotropically (probability `albedo`) or are absorbed.
//! Packets that fall back below the slab are re-emitted; packets that leave
//! through the top (`z > 1`) are binned by escape angle. Optionally, the J,
//! H and K moments of the radiation field are estimated at a set of
//! equally spaced levels by counting level crossings.
//!
//! ## Modules
//!
//! - [`config`]: validated, immutable simulation configuration
//! - [`rng`]: seeded random source and the distributions sampled from it
//! - [`packet`]: photon packet state and movement
//! - [`histogram`]: escape-angle histogram and emergent intensity
//! - [`moments`]: level-crossing moment estimators
//! - [`transport`]: the per-packet transport loop
//! - [`tally`]: per-stream accumulation of histories
//! - [`driver`]: runs a whole simulation and finalises the results
//!
//! ## Usage Example
//!
//! ```rust
//! use slab_transport::{SimulationConfig, SlabSimulator};
//!
//! let config = SimulationConfig::builder()
//!     .n_photons(5_000)
//!     .tau_max(5.0)
//!     .albedo(0.9)
//!     .mu_bins(10)
//!     .n_levels(10)
//!     .seed(1337)
//!     .build()
//!     .unwrap();
//!
//! let simulator = SlabSimulator::new(config).unwrap();
//! let result = simulator.run();
//!
//! assert_eq!(result.n_escaped + result.n_absorbed, 5_000);
//! for (theta, count, intensity) in result.intensity.rows() {
//!     assert!(theta > 0.0 && theta < std::f64::consts::FRAC_PI_2);
//!     assert!(intensity >= 0.0 || count == 0);
//! }
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize` for the configuration and result tables

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod config;
pub mod driver;
pub mod error;
pub mod histogram;
pub mod moments;
pub mod packet;
pub mod rng;
pub mod tally;
pub mod transport;

// Re-export commonly used items for convenience
pub use config::{SimulationConfig, SimulationConfigBuilder};
pub use driver::{SimulationResult, SlabSimulator};
pub use error::ConfigError;
pub use histogram::{EscapeHistogram, IntensityTable};
pub use moments::{MomentAccumulators, MomentTable};
pub use transport::PacketOutcome;
