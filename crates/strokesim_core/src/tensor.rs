//! Flat row-major grids for per-sample, per-center quantities.

use serde::{Deserialize, Serialize};

use crate::constants::NUM_STATES;

/// (n_samples x n_centers) grid with a flat backing array.
///
/// Stores values in row-major order: one row per sample, centers varying
/// fastest within a row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleMatrix {
    data: Vec<f64>,
    n_samples: usize,
    n_centers: usize,
}

impl SampleMatrix {
    /// Create a zero-filled matrix.
    #[must_use]
    pub fn new(n_samples: usize, n_centers: usize) -> Self {
        Self {
            data: vec![0.0; n_samples * n_centers],
            n_samples,
            n_centers,
        }
    }

    /// Create a matrix from existing data. Data must be in row-major order.
    pub fn from_data(n_samples: usize, n_centers: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != n_samples * n_centers {
            return None;
        }
        Some(Self {
            data,
            n_samples,
            n_centers,
        })
    }

    /// Create a matrix with every cell set to `value`.
    #[must_use]
    pub fn filled(n_samples: usize, n_centers: usize, value: f64) -> Self {
        Self {
            data: vec![value; n_samples * n_centers],
            n_samples,
            n_centers,
        }
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    #[must_use]
    pub fn n_centers(&self) -> usize {
        self.n_centers
    }

    #[inline]
    fn flat_index(&self, sample: usize, center: usize) -> usize {
        debug_assert!(sample < self.n_samples && center < self.n_centers);
        sample * self.n_centers + center
    }

    #[must_use]
    #[inline]
    pub fn get(&self, sample: usize, center: usize) -> f64 {
        self.data[self.flat_index(sample, center)]
    }

    #[inline]
    pub fn set(&mut self, sample: usize, center: usize, value: f64) {
        let idx = self.flat_index(sample, center);
        self.data[idx] = value;
    }

    /// One sample's values across all centers.
    #[must_use]
    pub fn row(&self, sample: usize) -> &[f64] {
        let start = sample * self.n_centers;
        &self.data[start..start + self.n_centers]
    }

    /// Mean over samples for one center column.
    #[must_use]
    pub fn column_mean(&self, center: usize) -> f64 {
        if self.n_samples == 0 {
            return f64::NAN;
        }
        let sum: f64 = (0..self.n_samples).map(|i| self.get(i, center)).sum();
        sum / self.n_samples as f64
    }

    /// Get a reference to the underlying data
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

/// (n_samples x n_centers x NUM_STATES) outcome-state grid.
///
/// The innermost axis holds the modified Rankin Scale distribution for one
/// (sample, center) pair. Every such row of probabilities sums to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeTensor {
    data: Vec<f64>,
    n_samples: usize,
    n_centers: usize,
}

impl OutcomeTensor {
    /// Create a zero-filled tensor.
    #[must_use]
    pub fn new(n_samples: usize, n_centers: usize) -> Self {
        Self {
            data: vec![0.0; n_samples * n_centers * NUM_STATES],
            n_samples,
            n_centers,
        }
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    #[must_use]
    pub fn n_centers(&self) -> usize {
        self.n_centers
    }

    #[inline]
    fn cell_start(&self, sample: usize, center: usize) -> usize {
        debug_assert!(sample < self.n_samples && center < self.n_centers);
        (sample * self.n_centers + center) * NUM_STATES
    }

    #[must_use]
    #[inline]
    pub fn get(&self, sample: usize, center: usize, state: usize) -> f64 {
        debug_assert!(state < NUM_STATES);
        self.data[self.cell_start(sample, center) + state]
    }

    /// The mRS distribution for one (sample, center) pair.
    #[must_use]
    pub fn cell(&self, sample: usize, center: usize) -> &[f64] {
        let start = self.cell_start(sample, center);
        &self.data[start..start + NUM_STATES]
    }

    pub fn cell_mut(&mut self, sample: usize, center: usize) -> &mut [f64] {
        let start = self.cell_start(sample, center);
        &mut self.data[start..start + NUM_STATES]
    }

    /// Get a reference to the underlying data
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }
}
