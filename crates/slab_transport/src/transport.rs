//! Photon transport through a slab of constant density.
//!
//! [`transport_packet`] drives one emitted packet through the slab until it
//! escapes through the top or is absorbed:
//!
//! ```text
//! EMITTED ──► IN_SLAB ◄──► SCATTERED
//!    ▲           │
//!    │           ├──► ESCAPED   (z > 1)
//!    │           └──► ABSORBED  (xi > albedo)
//!    └── RE-ENTERED_BELOW (z < 0)
//! ```
//!
//! Each free path samples an optical depth, converts it to a physical step
//! `ds = tau / tau_max`, moves the packet, and updates the moment estimators
//! along the direction just travelled. Only then is the interaction at the
//! new position decided.
//!
//! A packet that falls back below the slab is re-emitted at the origin. This
//! keeps the incoming flux at the lower boundary fixed; it is not a new
//! history.
//!
//! There is no intrinsic bound on the number of steps. Near `albedo = 1` a
//! history can scatter for a long time; an optional cap
//! (`max_interactions`) ends it as [`PacketOutcome::Truncated`].

use crate::config::SimulationConfig;
use crate::moments::MomentAccumulators;
use crate::packet::{PhotonPacket, SlabRegion};
use crate::rng::SlabRng;

/// Terminal state of a photon history.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PacketOutcome {
    /// Left through the top of the slab with the given direction cosine.
    Escaped {
        /// `cos(theta)` of the escape direction.
        cos_theta: f64,
    },
    /// Absorbed inside the slab.
    Absorbed,
    /// Stopped by the interaction cap before escaping or being absorbed.
    Truncated,
}

/// Transports a packet until it escapes, is absorbed or hits the cap.
///
/// The packet is expected to come straight from [`PhotonPacket::emit`].
/// When `moments` is given, every free path is recorded in it.
///
/// # Examples
///
/// ```rust
/// use slab_transport::packet::PhotonPacket;
/// use slab_transport::rng::SlabRng;
/// use slab_transport::transport::{transport_packet, PacketOutcome};
/// use slab_transport::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .n_photons(1)
///     .tau_max(1.0)
///     .albedo(1.0)
///     .build()
///     .unwrap();
///
/// let mut rng = SlabRng::from_seed(42);
/// let mut packet = PhotonPacket::emit(&mut rng);
/// let outcome = transport_packet(&mut packet, &config, &mut rng, None);
///
/// assert!(matches!(outcome, PacketOutcome::Escaped { .. }));
/// assert!(packet.interaction_count >= 1);
/// ```
pub fn transport_packet(
    packet: &mut PhotonPacket,
    config: &SimulationConfig,
    rng: &mut SlabRng,
    mut moments: Option<&mut MomentAccumulators>,
) -> PacketOutcome {
    let tau_max = config.tau_max();
    let albedo = config.albedo();
    let max_interactions = config.max_interactions();

    loop {
        if max_interactions.is_some_and(|cap| packet.interaction_count >= cap) {
            return PacketOutcome::Truncated;
        }

        let z_before = packet.z;
        let ds = rng.sample_tau() / tau_max;
        packet.step(ds);
        packet.interaction_count += 1;

        if let Some(moments) = moments.as_deref_mut() {
            moments.record_crossing(z_before, packet.z, packet.direction.cos_theta);
        }

        match packet.region() {
            SlabRegion::Below => packet.re_emit(rng),
            SlabRegion::Inside => {
                if rng.uniform() <= albedo {
                    packet.scatter(rng);
                } else {
                    packet.absorbed = true;
                    return PacketOutcome::Absorbed;
                }
            }
            SlabRegion::Above => {
                return PacketOutcome::Escaped {
                    cos_theta: packet.direction.cos_theta,
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(tau_max: f64, albedo: f64) -> SimulationConfig {
        SimulationConfig::builder()
            .n_photons(1)
            .tau_max(tau_max)
            .albedo(albedo)
            .build()
            .unwrap()
    }

    #[test]
    fn test_pure_scattering_always_escapes() {
        let config = config(5.0, 1.0);
        let mut rng = SlabRng::from_seed(11);

        for _ in 0..500 {
            let mut packet = PhotonPacket::emit(&mut rng);
            let outcome = transport_packet(&mut packet, &config, &mut rng, None);
            match outcome {
                PacketOutcome::Escaped { cos_theta } => {
                    assert!(cos_theta > 0.0 && cos_theta <= 1.0);
                    assert!(packet.z > 1.0);
                    assert!(!packet.absorbed);
                }
                other => panic!("unexpected outcome {:?}", other),
            }
        }
    }

    #[test]
    fn test_zero_albedo_absorbs_on_first_step() {
        // Optically thick enough that no packet crosses the slab unscattered.
        let config = config(50.0, 0.0);
        let mut rng = SlabRng::from_seed(12);

        for _ in 0..500 {
            let mut packet = PhotonPacket::emit(&mut rng);
            let outcome = transport_packet(&mut packet, &config, &mut rng, None);
            assert_eq!(outcome, PacketOutcome::Absorbed);
            assert!(packet.absorbed);
            assert_eq!(packet.interaction_count, 1);
        }
    }

    #[test]
    fn test_optically_thin_slab_transmits_directly() {
        // With tau_max tiny almost every first step leaves the slab.
        let config = config(1e-9, 0.0);
        let mut rng = SlabRng::from_seed(13);
        let mut packet = PhotonPacket::emit(&mut rng);

        let outcome = transport_packet(&mut packet, &config, &mut rng, None);
        assert!(matches!(outcome, PacketOutcome::Escaped { .. }));
        assert_eq!(packet.interaction_count, 1);
    }

    #[test]
    fn test_interaction_cap_truncates() {
        let config = SimulationConfig::builder()
            .n_photons(1)
            .tau_max(1000.0)
            .albedo(1.0)
            .max_interactions(3)
            .build()
            .unwrap();
        let mut rng = SlabRng::from_seed(14);
        let mut packet = PhotonPacket::emit(&mut rng);

        let outcome = transport_packet(&mut packet, &config, &mut rng, None);
        assert_eq!(outcome, PacketOutcome::Truncated);
        assert_eq!(packet.interaction_count, 3);
    }

    #[test]
    fn test_moments_recorded_along_path() {
        let config = config(2.0, 1.0);
        let mut rng = SlabRng::from_seed(15);
        let mut moments = MomentAccumulators::new(10);

        for _ in 0..200 {
            let mut packet = PhotonPacket::emit(&mut rng);
            transport_packet(&mut packet, &config, &mut rng, Some(&mut moments));
        }

        // Every escaping packet crosses the top level moving upward.
        assert!(moments.h_plus()[10] >= 200.0);
        assert!(moments.h_minus().iter().all(|&h| h <= 0.0));
        assert!(moments.j_plus().iter().all(|&j| j >= 0.0));
    }

    #[test]
    fn test_same_seed_same_history() {
        let config = config(5.0, 0.9);
        let mut rng1 = SlabRng::from_seed(16);
        let mut rng2 = SlabRng::from_seed(16);

        for _ in 0..100 {
            let mut p1 = PhotonPacket::emit(&mut rng1);
            let mut p2 = PhotonPacket::emit(&mut rng2);
            let o1 = transport_packet(&mut p1, &config, &mut rng1, None);
            let o2 = transport_packet(&mut p2, &config, &mut rng2, None);
            assert_eq!(o1, o2);
            assert_eq!(p1, p2);
        }
    }
}
