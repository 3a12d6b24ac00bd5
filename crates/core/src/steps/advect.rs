//! Semi-Lagrangian advection
//!
//! Each destination cell traces backward along the velocity field by one
//! timestep and bilinearly samples the source there. Backtracing is
//! unconditionally stable: a sample is always an interpolation of existing
//! values, never an extrapolation, which is what lets the pipeline run
//! comparatively large fixed timesteps.

use super::SimulationStep;
use crate::kernel;
use crate::store::{FieldStore, ScalarField, VectorField};

/// Transport a scalar field through the velocity field.
pub struct AdvectScalar {
    field: ScalarField,
}

impl AdvectScalar {
    #[must_use]
    pub fn new(field: ScalarField) -> Self {
        Self { field }
    }
}

impl SimulationStep for AdvectScalar {
    fn name(&self) -> &'static str {
        "advect"
    }

    fn execute(&self, fields: &mut FieldStore, dt: f32) {
        fields.update_scalar(self.field, |fields, dst| {
            let velocity = fields.vector(VectorField::Velocity);
            let src = fields.scalar(self.field);
            kernel::run(dst, |x, y| {
                let v = velocity.get(x, y);
                src.sample(x as f32 - v.x * dt, y as f32 - v.y * dt)
            });
        });
    }
}

/// Transport the velocity field through itself.
pub struct AdvectVelocity;

impl SimulationStep for AdvectVelocity {
    fn name(&self) -> &'static str {
        "advect-velocity"
    }

    fn execute(&self, fields: &mut FieldStore, dt: f32) {
        fields.update_vector(VectorField::Velocity, |fields, dst| {
            let src = fields.vector(VectorField::Velocity);
            kernel::run(dst, |x, y| {
                let v = src.get(x, y);
                src.sample(x as f32 - v.x * dt, y as f32 - v.y * dt)
            });
        });
    }
}
