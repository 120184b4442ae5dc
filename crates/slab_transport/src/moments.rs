//! J, H and K moments of the radiation field.
//!
//! The slab is cut into `n_levels` equal layers bounded by `n_levels + 1`
//! levels. Every time a packet's free path carries it across a level, the
//! estimators for that level are incremented:
//!
//! | Moment | Upward (`mu > 0`) | Downward (`mu < 0`) |
//! |--------|-------------------|---------------------|
//! | J (mean intensity) | `+1/mu` | `+1/|mu|` |
//! | H (Eddington flux) | `+1` | `-1` |
//! | K (radiation pressure) | `+mu` | `+|mu|` |
//!
//! Upward and downward contributions are kept apart and only summed when
//! the table is read, after normalising by the number of histories.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Running sums of the level-crossing estimators.
#[derive(Clone, Debug, PartialEq)]
pub struct MomentAccumulators {
    n_levels: usize,
    j_plus: Vec<f64>,
    h_plus: Vec<f64>,
    k_plus: Vec<f64>,
    j_minus: Vec<f64>,
    h_minus: Vec<f64>,
    k_minus: Vec<f64>,
}

impl MomentAccumulators {
    /// Creates zeroed accumulators for `n_levels + 1` levels.
    pub fn new(n_levels: usize) -> Self {
        let len = n_levels + 1;
        Self {
            n_levels,
            j_plus: vec![0.0; len],
            h_plus: vec![0.0; len],
            k_plus: vec![0.0; len],
            j_minus: vec![0.0; len],
            h_minus: vec![0.0; len],
            k_minus: vec![0.0; len],
        }
    }

    /// Returns the number of levels (each array has `n_levels + 1` entries).
    #[inline]
    pub fn n_levels(&self) -> usize {
        self.n_levels
    }

    /// Upward mean-intensity sums.
    #[inline]
    pub fn j_plus(&self) -> &[f64] {
        &self.j_plus
    }

    /// Upward flux sums.
    #[inline]
    pub fn h_plus(&self) -> &[f64] {
        &self.h_plus
    }

    /// Upward pressure sums.
    #[inline]
    pub fn k_plus(&self) -> &[f64] {
        &self.k_plus
    }

    /// Downward mean-intensity sums.
    #[inline]
    pub fn j_minus(&self) -> &[f64] {
        &self.j_minus
    }

    /// Downward flux sums (non-positive).
    #[inline]
    pub fn h_minus(&self) -> &[f64] {
        &self.h_minus
    }

    /// Downward pressure sums.
    #[inline]
    pub fn k_minus(&self) -> &[f64] {
        &self.k_minus
    }

    /// Level index containing height `z`.
    #[inline]
    fn level_of(&self, z: f64) -> i64 {
        (z * self.n_levels as f64).floor() as i64
    }

    /// Records a free path from `z_before` to `z_after` along `cos_theta`.
    ///
    /// Must be called with the direction the packet travelled along, before
    /// any scattering changes it.
    ///
    /// - Both heights above zero and inside the same level: nothing crossed.
    /// - Upward: levels `start..=end` with `start = 0` if `z_before <= 0`
    ///   else `level(z_before) + 1`, and `end = n_levels` if `z_after >= 1`
    ///   else `level(z_after)`.
    /// - Downward: levels `end..=start` with `start = level(z_before)` and
    ///   `end = 0` if `z_after <= 0` else `level(z_after) + 1`.
    /// - `cos_theta == 0`: no contribution.
    ///
    /// Indices are clamped to `[0, n_levels]`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slab_transport::moments::MomentAccumulators;
    ///
    /// let mut moments = MomentAccumulators::new(10);
    /// moments.record_crossing(0.05, 0.15, 0.5);
    ///
    /// assert_eq!(moments.h_plus()[1], 1.0);
    /// assert_eq!(moments.h_plus().iter().sum::<f64>(), 1.0);
    /// ```
    pub fn record_crossing(&mut self, z_before: f64, z_after: f64, cos_theta: f64) {
        if z_before > 0.0 && z_after > 0.0 && self.level_of(z_before) == self.level_of(z_after) {
            return;
        }

        let top = self.n_levels as i64;

        if cos_theta > 0.0 {
            let start = if z_before <= 0.0 {
                0
            } else {
                self.level_of(z_before) + 1
            };
            let end = if z_after >= 1.0 {
                top
            } else {
                self.level_of(z_after)
            };

            let inv_mu = 1.0 / cos_theta;
            for i in clamp_levels(start, end, top) {
                self.j_plus[i] += inv_mu;
                self.h_plus[i] += 1.0;
                self.k_plus[i] += cos_theta;
            }
        } else if cos_theta < 0.0 {
            let start = self.level_of(z_before);
            let end = if z_after <= 0.0 {
                0
            } else {
                self.level_of(z_after) + 1
            };

            let mu = cos_theta.abs();
            let inv_mu = 1.0 / mu;
            for i in clamp_levels(end, start, top) {
                self.j_minus[i] += inv_mu;
                self.h_minus[i] -= 1.0;
                self.k_minus[i] += mu;
            }
        }
    }

    /// Adds the sums of another accumulator with the same levels.
    ///
    /// # Panics
    ///
    /// Panics if the level counts differ.
    pub fn merge(&mut self, other: &MomentAccumulators) {
        assert_eq!(
            self.n_levels, other.n_levels,
            "cannot merge moments with different level counts"
        );
        add_into(&mut self.j_plus, &other.j_plus);
        add_into(&mut self.h_plus, &other.h_plus);
        add_into(&mut self.k_plus, &other.k_plus);
        add_into(&mut self.j_minus, &other.j_minus);
        add_into(&mut self.h_minus, &other.h_minus);
        add_into(&mut self.k_minus, &other.k_minus);
    }

    /// Divides every sum by `n_photons`, producing per-photon moments.
    pub fn normalise(&self, n_photons: u64) -> MomentTable {
        let norm = n_photons as f64;
        let scale = |values: &[f64]| values.iter().map(|v| v / norm).collect::<Vec<_>>();

        MomentTable {
            levels: (0..=self.n_levels).collect(),
            j_plus: scale(&self.j_plus),
            j_minus: scale(&self.j_minus),
            h_plus: scale(&self.h_plus),
            h_minus: scale(&self.h_minus),
            k_plus: scale(&self.k_plus),
            k_minus: scale(&self.k_minus),
        }
    }
}

/// Inclusive level range `low..=high` restricted to `[0, top]`.
fn clamp_levels(low: i64, high: i64, top: i64) -> std::ops::RangeInclusive<usize> {
    let low = low.clamp(0, top + 1) as usize;
    let high = high.clamp(-1, top);
    if high < 0 {
        // An empty range that stays empty for any `low`.
        return 1..=0;
    }
    low..=high as usize
}

fn add_into(acc: &mut [f64], other: &[f64]) {
    for (a, &b) in acc.iter_mut().zip(other) {
        *a += b;
    }
}

/// Normalised moments table, one row per level.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MomentTable {
    /// Level index, `0..=n_levels`.
    pub levels: Vec<usize>,
    /// Upward mean intensity.
    pub j_plus: Vec<f64>,
    /// Downward mean intensity.
    pub j_minus: Vec<f64>,
    /// Upward flux.
    pub h_plus: Vec<f64>,
    /// Downward flux.
    pub h_minus: Vec<f64>,
    /// Upward radiation pressure.
    pub k_plus: Vec<f64>,
    /// Downward radiation pressure.
    pub k_minus: Vec<f64>,
}

impl MomentTable {
    /// Returns the number of levels in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns true if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Total mean intensity `J+ + J-` per level.
    pub fn j(&self) -> Vec<f64> {
        sum_pairs(&self.j_plus, &self.j_minus)
    }

    /// Net flux `H+ + H-` per level.
    pub fn h(&self) -> Vec<f64> {
        sum_pairs(&self.h_plus, &self.h_minus)
    }

    /// Total radiation pressure `K+ + K-` per level.
    pub fn k(&self) -> Vec<f64> {
        sum_pairs(&self.k_plus, &self.k_minus)
    }
}

fn sum_pairs(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}
