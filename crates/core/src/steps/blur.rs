//! Separable Gaussian blur
//!
//! Softens a scalar field with a horizontal pass followed by a vertical
//! pass. Weights are precomputed at pipeline assembly; each pass runs
//! through the store's update path so both intermediate and final results
//! are committed by a swap.

use super::SimulationStep;
use crate::kernel;
use crate::store::{FieldStore, ScalarField};

/// Two-pass Gaussian blur over one scalar field.
pub struct GaussianBlur {
    field: ScalarField,
    weights: Vec<f32>,
}

impl GaussianBlur {
    /// Build a blur with the given radius multiplier and tap count.
    ///
    /// # Panics
    ///
    /// Panics unless `kernel_size` is odd and at least 3.
    #[must_use]
    pub fn new(field: ScalarField, radius: f32, kernel_size: usize) -> Self {
        assert!(
            kernel_size >= 3 && kernel_size % 2 == 1,
            "Blur kernel size must be odd and at least 3"
        );
        let half = (kernel_size / 2) as i64;
        let sigma = (half as f32 / 2.0 * radius).max(1e-3);

        let mut weights: Vec<f32> = (-half..=half)
            .map(|i| {
                let d = i as f32;
                (-d * d / (2.0 * sigma * sigma)).exp()
            })
            .collect();
        let total: f32 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }

        Self { field, weights }
    }

    fn pass(&self, fields: &mut FieldStore, dx: i64, dy: i64) {
        let weights = &self.weights;
        let half = (weights.len() / 2) as i64;
        fields.update_scalar(self.field, |fields, dst| {
            let src = fields.scalar(self.field);
            kernel::run(dst, |x, y| {
                let (x, y) = (x as i64, y as i64);
                weights
                    .iter()
                    .enumerate()
                    .map(|(i, w)| {
                        let offset = i as i64 - half;
                        w * src.get_clamped(x + offset * dx, y + offset * dy)
                    })
                    .sum()
            });
        });
    }
}

impl SimulationStep for GaussianBlur {
    fn name(&self) -> &'static str {
        "gaussian-blur"
    }

    fn execute(&self, fields: &mut FieldStore, _dt: f32) {
        self.pass(fields, 1, 0);
        self.pass(fields, 0, 1);
    }
}
