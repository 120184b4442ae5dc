//! Escape-angle histogram and emergent intensity.
//!
//! Escaping packets are binned by `mu = cos(theta)` of their final direction
//! into `n_bins` equal-width bins on `[0, 1]`. Bin `i` is represented by the
//! angle `theta_i = acos((i + 0.5) / n_bins)`, so the angles decrease as the
//! bin index increases.
//!
//! The histogram is only written while histories run and only read once
//! they have finished, when [`EscapeHistogram::intensity`] converts counts
//! to a flux-normalised intensity.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Histogram of escape angles.
#[derive(Clone, Debug, PartialEq)]
pub struct EscapeHistogram {
    bin_counts: Vec<u64>,
    theta: Vec<f64>,
}

impl EscapeHistogram {
    /// Creates an empty histogram with `n_bins` bins.
    ///
    /// # Panics
    ///
    /// Panics if `n_bins` is zero; configurations are validated beforehand.
    pub fn new(n_bins: usize) -> Self {
        assert!(n_bins > 0, "escape histogram needs at least one bin");

        let width = 1.0 / n_bins as f64;
        let half_width = 0.5 * width;
        let theta = (0..n_bins)
            .map(|i| (i as f64 * width + half_width).acos())
            .collect();

        Self {
            bin_counts: vec![0; n_bins],
            theta,
        }
    }

    /// Returns the number of bins.
    #[inline]
    pub fn n_bins(&self) -> usize {
        self.bin_counts.len()
    }

    /// Returns the escape counts per bin.
    #[inline]
    pub fn bin_counts(&self) -> &[u64] {
        &self.bin_counts
    }

    /// Returns the bin-centre escape angles, in radians.
    #[inline]
    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    /// Returns the total number of binned packets.
    #[inline]
    pub fn total_count(&self) -> u64 {
        self.bin_counts.iter().sum()
    }

    /// Returns the bin index for an escape cosine.
    ///
    /// The index is `|floor(mu * n_bins)|`, clamped to the last bin so that
    /// `mu == 1` exactly stays in range.
    #[inline]
    pub fn bin_index(&self, cos_theta: f64) -> usize {
        let n_bins = self.n_bins();
        let index = (cos_theta * n_bins as f64).floor().abs() as usize;
        index.min(n_bins - 1)
    }

    /// Records one packet escaping with direction cosine `cos_theta`.
    #[inline]
    pub fn bin_photon(&mut self, cos_theta: f64) {
        let index = self.bin_index(cos_theta);
        self.bin_counts[index] += 1;
    }

    /// Adds the counts of another histogram with the same binning.
    ///
    /// # Panics
    ///
    /// Panics if the bin counts differ.
    pub fn merge(&mut self, other: &EscapeHistogram) {
        assert_eq!(
            self.n_bins(),
            other.n_bins(),
            "cannot merge histograms with different binning"
        );
        for (count, &add) in self.bin_counts.iter_mut().zip(&other.bin_counts) {
            *count += add;
        }
    }

    /// Converts the counts to flux-normalised intensity.
    ///
    /// `intensity_i = counts_i * n_bins / (2 * n_photons * cos(theta_i))`.
    /// For a Lambertian emergent field every entry is 1.
    pub fn intensity(&self, n_photons: u64) -> Vec<f64> {
        let n_bins = self.n_bins() as f64;
        let n_photons = n_photons as f64;
        self.bin_counts
            .iter()
            .zip(&self.theta)
            .map(|(&count, &theta)| count as f64 * n_bins / (2.0 * n_photons * theta.cos()))
            .collect()
    }

    /// Finalises the histogram into an [`IntensityTable`].
    pub fn finalise(&self, n_photons: u64) -> IntensityTable {
        IntensityTable {
            theta: self.theta.clone(),
            counts: self.bin_counts.clone(),
            intensity: self.intensity(n_photons),
        }
    }
}

/// Finalised escape-angle table: one row per bin.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IntensityTable {
    /// Bin-centre escape angle, in radians.
    pub theta: Vec<f64>,
    /// Escape counts.
    pub counts: Vec<u64>,
    /// Flux-normalised intensity.
    pub intensity: Vec<f64>,
}

impl IntensityTable {
    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.theta.len()
    }

    /// Returns true if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.theta.is_empty()
    }

    /// Iterates over `(theta, count, intensity)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (f64, u64, f64)> + '_ {
        self.theta
            .iter()
            .zip(&self.counts)
            .zip(&self.intensity)
            .map(|((&theta, &count), &intensity)| (theta, count, intensity))
    }
}
