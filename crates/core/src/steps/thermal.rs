//! Thermal forcing: gravity, cooling, buoyancy
//!
//! The grid uses texture coordinates: +y points down, so upward forces are
//! negative along y.

use super::SimulationStep;
use crate::kernel;
use crate::store::{FieldStore, ScalarField, VectorField};
use crate::vec2::Vec2;

/// Constant acceleration applied to every cell's velocity.
pub struct ApplyGravity {
    gravity: f32,
}

impl ApplyGravity {
    #[must_use]
    pub fn new(gravity: f32) -> Self {
        Self { gravity }
    }
}

impl SimulationStep for ApplyGravity {
    fn name(&self) -> &'static str {
        "apply-gravity"
    }

    fn execute(&self, fields: &mut FieldStore, dt: f32) {
        let dv = self.gravity * dt;
        fields.update_vector(VectorField::Velocity, |fields, dst| {
            let src = fields.vector(VectorField::Velocity);
            kernel::map(dst, src, |v| Vec2::new(v.x, v.y + dv));
        });
    }
}

/// Radiative cooling: temperature relaxes toward ambient and is clamped to
/// its documented range.
///
/// The per-tick retention factor is `1 − cooling_rate·dt/max_temperature`,
/// so the nominal cooling rate is reached at the top of the temperature
/// range and cooling never overshoots past ambient.
pub struct Radiance {
    ambient_temperature: f32,
    max_temperature: f32,
    cooling_rate: f32,
}

impl Radiance {
    #[must_use]
    pub fn new(ambient_temperature: f32, max_temperature: f32, cooling_rate: f32) -> Self {
        Self {
            ambient_temperature,
            max_temperature,
            cooling_rate,
        }
    }
}

impl SimulationStep for Radiance {
    fn name(&self) -> &'static str {
        "radiance"
    }

    fn execute(&self, fields: &mut FieldStore, dt: f32) {
        let ambient = self.ambient_temperature;
        let max = self.max_temperature;
        let retain = (1.0 - self.cooling_rate * dt / max).max(0.0);

        fields.update_scalar(ScalarField::Temperature, |fields, dst| {
            let src = fields.scalar(ScalarField::Temperature);
            kernel::map(dst, src, |t| {
                (ambient + (t - ambient) * retain).clamp(0.0, max)
            });
        });
    }
}

/// Upward force on hot cells, plus the configured constant acceleration.
pub struct Buoyancy {
    ambient_temperature: f32,
    buoyancy_constant: f32,
    gravity: f32,
}

impl Buoyancy {
    #[must_use]
    pub fn new(ambient_temperature: f32, buoyancy_constant: f32, gravity: f32) -> Self {
        Self {
            ambient_temperature,
            buoyancy_constant,
            gravity,
        }
    }
}

impl SimulationStep for Buoyancy {
    fn name(&self) -> &'static str {
        "buoyancy"
    }

    fn execute(&self, fields: &mut FieldStore, dt: f32) {
        let ambient = self.ambient_temperature;
        let lift = self.buoyancy_constant;
        let gravity = self.gravity;

        fields.update_vector(VectorField::Velocity, |fields, dst| {
            let velocity = fields.vector(VectorField::Velocity);
            let temperature = fields.scalar(ScalarField::Temperature);
            kernel::run(dst, |x, y| {
                let v = velocity.get(x, y);
                let excess = temperature.get(x, y) - ambient;
                // Hot cells rise (-y); cold cells sink.
                Vec2::new(v.x, v.y + dt * (gravity - lift * excess))
            });
        });
    }
}
