//! Photon packet state.
//!
//! A [`PhotonPacket`] is the mutable state of one Monte Carlo history. It is
//! owned by the transport loop for its whole lifetime and discarded once the
//! packet escapes through the top of the slab or is absorbed.
//!
//! The slab occupies `0 <= z <= 1` in units of its physical thickness; only
//! the `z` coordinate decides where a packet is, `x` and `y` are carried for
//! completeness of the spherical step.

use crate::rng::SlabRng;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Direction of travel as direction cosines.
///
/// Invariants: `sin_theta = sqrt(1 - cos_theta^2) >= 0`, and
/// `(cos_phi, sin_phi)` are the cosine and sine of the same azimuth.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Direction {
    /// Cosine of the polar angle, measured from the slab normal.
    pub cos_theta: f64,
    /// Sine of the polar angle, non-negative.
    pub sin_theta: f64,
    /// Cosine of the azimuth.
    pub cos_phi: f64,
    /// Sine of the azimuth.
    pub sin_phi: f64,
}

impl Direction {
    /// Builds a direction from `cos(theta)` and the azimuth `phi` in radians.
    #[inline]
    pub fn from_angles(cos_theta: f64, phi: f64) -> Self {
        let (sin_phi, cos_phi) = phi.sin_cos();
        Self {
            cos_theta,
            sin_theta: (1.0 - cos_theta * cos_theta).max(0.0).sqrt(),
            cos_phi,
            sin_phi,
        }
    }
}

/// Where a packet sits relative to the slab boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlabRegion {
    /// `z < 0`: back in the source region below the slab.
    Below,
    /// `0 <= z <= 1`: inside the slab.
    Inside,
    /// `z > 1`: escaped through the top.
    Above,
}

/// A photon packet.
///
/// # Examples
///
/// ```rust
/// use slab_transport::packet::{PhotonPacket, SlabRegion};
/// use slab_transport::rng::SlabRng;
///
/// let mut rng = SlabRng::from_seed(1);
/// let mut packet = PhotonPacket::emit(&mut rng);
/// assert_eq!(packet.z, 0.0);
/// assert!(packet.direction.cos_theta > 0.0);
///
/// packet.step(0.1);
/// assert_eq!(packet.region(), SlabRegion::Inside);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PhotonPacket {
    /// x position.
    pub x: f64,
    /// y position.
    pub y: f64,
    /// z position, in units of the slab thickness.
    pub z: f64,
    /// Current direction of travel.
    pub direction: Direction,
    /// Set once the packet has been absorbed; terminal.
    pub absorbed: bool,
    /// Free-path steps taken by this history.
    pub interaction_count: u64,
}

impl PhotonPacket {
    /// Emits a new packet at the slab origin.
    ///
    /// The direction is drawn from the emission law (`cos(theta) = sqrt(U)`),
    /// not the isotropic scattering law.
    #[inline]
    pub fn emit(rng: &mut SlabRng) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            direction: rng.sample_emission_direction(),
            absorbed: false,
            interaction_count: 0,
        }
    }

    /// Re-emits a packet that has fallen back below the slab.
    ///
    /// Position, direction and the absorbed flag are reset exactly as in
    /// [`PhotonPacket::emit`]. The interaction counter is kept: re-entry is
    /// part of the same history, so its steps count towards that history.
    #[inline]
    pub fn re_emit(&mut self, rng: &mut SlabRng) {
        self.x = 0.0;
        self.y = 0.0;
        self.z = 0.0;
        self.direction = rng.sample_emission_direction();
        self.absorbed = false;
    }

    /// Moves the packet a distance `ds` along its current direction.
    #[inline]
    pub fn step(&mut self, ds: f64) {
        let d = &self.direction;
        self.x += ds * d.sin_theta * d.cos_phi;
        self.y += ds * d.sin_theta * d.sin_phi;
        self.z += ds * d.cos_theta;
    }

    /// Scatters the packet into a new isotropic direction.
    #[inline]
    pub fn scatter(&mut self, rng: &mut SlabRng) {
        self.direction = rng.sample_isotropic_direction();
    }

    /// Returns the region of the slab the packet is in.
    #[inline]
    pub fn region(&self) -> SlabRegion {
        if self.z < 0.0 {
            SlabRegion::Below
        } else if self.z <= 1.0 {
            SlabRegion::Inside
        } else {
            SlabRegion::Above
        }
    }
}
