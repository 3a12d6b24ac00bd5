//! Divergence, pressure solve, and projection
//!
//! The incompressibility half of the stable-fluids method: measure the
//! divergence of velocity, solve the discrete Poisson equation
//! `∇²p = div` with fixed-count Jacobi relaxation, and subtract the
//! pressure gradient from velocity. After projection the velocity field is
//! approximately divergence-free.
//!
//! Every Jacobi pass goes through the store's update path, which swaps
//! once per pass — so after the final pass the committed buffer holds the
//! result no matter whether the iteration count was odd or even.

use super::SimulationStep;
use crate::kernel;
use crate::store::{FieldStore, ScalarField, VectorField};
use crate::vec2::Vec2;

/// Central-difference estimate of `∇·velocity` per cell.
pub struct ComputeDivergence;

impl SimulationStep for ComputeDivergence {
    fn name(&self) -> &'static str {
        "compute-divergence"
    }

    fn execute(&self, fields: &mut FieldStore, _dt: f32) {
        fields.update_scalar(ScalarField::Divergence, |fields, dst| {
            let velocity = fields.vector(VectorField::Velocity);
            kernel::run(dst, |x, y| {
                let (x, y) = (x as i64, y as i64);
                let du = velocity.get_clamped(x + 1, y).x - velocity.get_clamped(x - 1, y).x;
                let dv = velocity.get_clamped(x, y + 1).y - velocity.get_clamped(x, y - 1).y;
                0.5 * (du + dv)
            });
        });
    }
}

/// Expansion source from combustion.
///
/// Burning cells push gas outward; subtracting a constant from their
/// measured divergence makes the pressure solve produce that outflow.
pub struct CombustionDivergence {
    ignition_temperature: f32,
    min_fuel_threshold: f32,
    combustion_pressure: f32,
}

impl CombustionDivergence {
    #[must_use]
    pub fn new(
        ignition_temperature: f32,
        min_fuel_threshold: f32,
        combustion_pressure: f32,
    ) -> Self {
        Self {
            ignition_temperature,
            min_fuel_threshold,
            combustion_pressure,
        }
    }
}

impl SimulationStep for CombustionDivergence {
    fn name(&self) -> &'static str {
        "combustion-divergence"
    }

    fn execute(&self, fields: &mut FieldStore, _dt: f32) {
        let ignition = self.ignition_temperature;
        let min_fuel = self.min_fuel_threshold;
        let pressure = self.combustion_pressure;

        fields.update_scalar(ScalarField::Divergence, |fields, dst| {
            let divergence = fields.scalar(ScalarField::Divergence);
            let temperature = fields.scalar(ScalarField::Temperature);
            let fuel = fields.scalar(ScalarField::Fuel);
            kernel::run(dst, |x, y| {
                let d = divergence.get(x, y);
                if temperature.get(x, y) >= ignition && fuel.get(x, y) > min_fuel {
                    d - pressure
                } else {
                    d
                }
            });
        });
    }
}

/// Jacobi solve of `∇²pressure = divergence`.
///
/// Both pressure buffers are zeroed before iterating so the solve starts
/// from the same state every tick rather than warm-starting off whatever
/// the previous tick left behind.
pub struct SolvePressure {
    iterations: usize,
}

impl SolvePressure {
    #[must_use]
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }
}

impl SimulationStep for SolvePressure {
    fn name(&self) -> &'static str {
        "solve-pressure"
    }

    fn execute(&self, fields: &mut FieldStore, _dt: f32) {
        fields.reset_scalar(ScalarField::Pressure, 0.0);

        for _ in 0..self.iterations {
            fields.update_scalar(ScalarField::Pressure, |fields, dst| {
                let pressure = fields.scalar(ScalarField::Pressure);
                let divergence = fields.scalar(ScalarField::Divergence);
                kernel::run(dst, |x, y| {
                    let (x, y) = (x as i64, y as i64);
                    let neighbors = pressure.get_clamped(x - 1, y)
                        + pressure.get_clamped(x + 1, y)
                        + pressure.get_clamped(x, y - 1)
                        + pressure.get_clamped(x, y + 1);
                    (neighbors - divergence.get_clamped(x, y)) * 0.25
                });
            });
        }
    }
}

/// Subtract the pressure gradient from velocity.
pub struct Project;

impl SimulationStep for Project {
    fn name(&self) -> &'static str {
        "project"
    }

    fn execute(&self, fields: &mut FieldStore, _dt: f32) {
        fields.update_vector(VectorField::Velocity, |fields, dst| {
            let velocity = fields.vector(VectorField::Velocity);
            let pressure = fields.scalar(ScalarField::Pressure);
            kernel::run(dst, |x, y| {
                let (x, y) = (x as i64, y as i64);
                let grad = Vec2::new(
                    pressure.get_clamped(x + 1, y) - pressure.get_clamped(x - 1, y),
                    pressure.get_clamped(x, y + 1) - pressure.get_clamped(x, y - 1),
                );
                velocity.get_clamped(x, y) - grad * 0.5
            });
        });
    }
}

/// Mean absolute divergence of the committed velocity field; the tests and
/// the demo use this to watch projection do its job.
#[must_use]
pub fn mean_abs_divergence(fields: &FieldStore) -> f32 {
    let velocity = fields.vector(VectorField::Velocity);
    let n = fields.size();
    let mut total = 0.0;
    for y in 0..n {
        for x in 0..n {
            let (xi, yi) = (x as i64, y as i64);
            let du = velocity.get_clamped(xi + 1, yi).x - velocity.get_clamped(xi - 1, yi).x;
            let dv = velocity.get_clamped(xi, yi + 1).y - velocity.get_clamped(xi, yi - 1).y;
            total += (0.5 * (du + dv)).abs();
        }
    }
    total / (n * n) as f32
}
