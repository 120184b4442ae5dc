//! Per-stream accumulation of photon histories.
//!
//! Every random stream owns one [`Tally`]. Histories only ever write to the
//! tally of the stream that runs them, so no synchronisation is needed while
//! transporting; the driver merges the finished tallies in stream order.

use crate::config::SimulationConfig;
use crate::histogram::EscapeHistogram;
use crate::moments::MomentAccumulators;
use crate::packet::PhotonPacket;
use crate::rng::SlabRng;
use crate::transport::{transport_packet, PacketOutcome};

/// Accumulated results of a set of photon histories.
#[derive(Clone, Debug, PartialEq)]
pub struct Tally {
    histogram: EscapeHistogram,
    moments: Option<MomentAccumulators>,
    n_escaped: u64,
    n_absorbed: u64,
    n_truncated: u64,
    total_interactions: u64,
}

impl Tally {
    /// Creates an empty tally shaped by `config`.
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            histogram: EscapeHistogram::new(config.mu_bins()),
            moments: config
                .track_moments()
                .then(|| MomentAccumulators::new(config.n_levels())),
            n_escaped: 0,
            n_absorbed: 0,
            n_truncated: 0,
            total_interactions: 0,
        }
    }

    /// Emits, transports and records one photon history.
    pub fn run_history(&mut self, config: &SimulationConfig, rng: &mut SlabRng) -> PacketOutcome {
        let mut packet = PhotonPacket::emit(rng);
        let outcome = transport_packet(&mut packet, config, rng, self.moments.as_mut());
        self.record(outcome, packet.interaction_count);
        outcome
    }

    /// Records the outcome of a finished history.
    pub fn record(&mut self, outcome: PacketOutcome, interactions: u64) {
        match outcome {
            PacketOutcome::Escaped { cos_theta } => {
                self.histogram.bin_photon(cos_theta);
                self.n_escaped += 1;
            }
            PacketOutcome::Absorbed => self.n_absorbed += 1,
            PacketOutcome::Truncated => self.n_truncated += 1,
        }
        self.total_interactions += interactions;
    }

    /// Adds another tally into this one.
    ///
    /// # Panics
    ///
    /// Panics if the two tallies were built from different binning, or if
    /// only one of them tracks moments.
    pub fn merge(&mut self, other: &Tally) {
        self.histogram.merge(&other.histogram);
        match (&mut self.moments, &other.moments) {
            (Some(mine), Some(theirs)) => mine.merge(theirs),
            (None, None) => {}
            _ => panic!("cannot merge tallies with and without moments"),
        }
        self.n_escaped += other.n_escaped;
        self.n_absorbed += other.n_absorbed;
        self.n_truncated += other.n_truncated;
        self.total_interactions += other.total_interactions;
    }

    /// Escape-angle histogram.
    #[inline]
    pub fn histogram(&self) -> &EscapeHistogram {
        &self.histogram
    }

    /// Moment accumulators, if tracked.
    #[inline]
    pub fn moments(&self) -> Option<&MomentAccumulators> {
        self.moments.as_ref()
    }

    /// Histories that escaped through the top.
    #[inline]
    pub fn n_escaped(&self) -> u64 {
        self.n_escaped
    }

    /// Histories that ended in absorption.
    #[inline]
    pub fn n_absorbed(&self) -> u64 {
        self.n_absorbed
    }

    /// Histories stopped by the interaction cap.
    #[inline]
    pub fn n_truncated(&self) -> u64 {
        self.n_truncated
    }

    /// Total interactions over all recorded histories.
    #[inline]
    pub fn total_interactions(&self) -> u64 {
        self.total_interactions
    }

    /// Number of recorded histories.
    #[inline]
    pub fn n_histories(&self) -> u64 {
        self.n_escaped + self.n_absorbed + self.n_truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(track_moments: bool) -> SimulationConfig {
        SimulationConfig::builder()
            .n_photons(100)
            .tau_max(3.0)
            .albedo(0.8)
            .mu_bins(5)
            .n_levels(4)
            .track_moments(track_moments)
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_tally_is_empty() {
        let tally = Tally::new(&config(true));
        assert_eq!(tally.n_histories(), 0);
        assert_eq!(tally.histogram().n_bins(), 5);
        assert_eq!(tally.moments().map(|m| m.n_levels()), Some(4));

        assert!(Tally::new(&config(false)).moments().is_none());
    }

    #[test]
    fn test_record_outcomes() {
        let mut tally = Tally::new(&config(false));
        tally.record(PacketOutcome::Escaped { cos_theta: 0.5 }, 4);
        tally.record(PacketOutcome::Absorbed, 2);
        tally.record(PacketOutcome::Truncated, 10);

        assert_eq!(tally.n_escaped(), 1);
        assert_eq!(tally.n_absorbed(), 1);
        assert_eq!(tally.n_truncated(), 1);
        assert_eq!(tally.total_interactions(), 16);
        assert_eq!(tally.histogram().bin_counts(), &[0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_run_history_conserves_photons() {
        let config = config(true);
        let mut tally = Tally::new(&config);
        let mut rng = SlabRng::from_seed(8);

        for _ in 0..100 {
            tally.run_history(&config, &mut rng);
        }

        assert_eq!(tally.n_histories(), 100);
        assert_eq!(tally.histogram().total_count(), tally.n_escaped());
        assert!(tally.total_interactions() >= 100);
    }

    #[test]
    fn test_merge() {
        let config = config(true);
        let mut a = Tally::new(&config);
        let mut b = Tally::new(&config);
        a.record(PacketOutcome::Escaped { cos_theta: 0.1 }, 1);
        b.record(PacketOutcome::Escaped { cos_theta: 0.9 }, 3);
        b.record(PacketOutcome::Absorbed, 2);

        a.merge(&b);

        assert_eq!(a.n_histories(), 3);
        assert_eq!(a.total_interactions(), 6);
        assert_eq!(a.histogram().bin_counts(), &[1, 0, 0, 0, 1]);
    }

    #[test]
    #[should_panic(expected = "with and without moments")]
    fn test_merge_mismatched_moments_panics() {
        let mut a = Tally::new(&config(true));
        a.merge(&Tally::new(&config(false)));
    }
}
