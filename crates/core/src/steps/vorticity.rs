//! Vorticity confinement
//!
//! Semi-Lagrangian advection and Jacobi diffusion numerically damp
//! small-scale rotation. Confinement measures the curl of velocity, then
//! pushes each cell along the gradient of curl magnitude to restore the
//! swirls that were lost. The step pair is optional and disabled in the
//! default pipeline; enable it with a nonzero `vorticity_strength`.
//!
//! The vorticity field stores `(curl, |curl|)` per cell: the signed curl
//! drives the restoring force, the magnitude feeds the gradient stencil of
//! the apply pass.

use super::SimulationStep;
use crate::kernel;
use crate::store::{FieldStore, VectorField};
use crate::vec2::Vec2;

/// Curl of the velocity field.
pub struct ComputeVorticity;

impl SimulationStep for ComputeVorticity {
    fn name(&self) -> &'static str {
        "compute-vorticity"
    }

    fn execute(&self, fields: &mut FieldStore, _dt: f32) {
        fields.update_vector(VectorField::Vorticity, |fields, dst| {
            let velocity = fields.vector(VectorField::Velocity);
            kernel::run(dst, |x, y| {
                let (x, y) = (x as i64, y as i64);
                let dvy_dx =
                    velocity.get_clamped(x + 1, y).y - velocity.get_clamped(x - 1, y).y;
                let dvx_dy =
                    velocity.get_clamped(x, y + 1).x - velocity.get_clamped(x, y - 1).x;
                let curl = 0.5 * (dvy_dx - dvx_dy);
                Vec2::new(curl, curl.abs())
            });
        });
    }
}

/// Restoring force along the gradient of curl magnitude.
pub struct ApplyVorticity {
    strength: f32,
}

impl ApplyVorticity {
    #[must_use]
    pub fn new(strength: f32) -> Self {
        Self { strength }
    }
}

impl SimulationStep for ApplyVorticity {
    fn name(&self) -> &'static str {
        "apply-vorticity"
    }

    fn execute(&self, fields: &mut FieldStore, dt: f32) {
        let strength = self.strength;
        fields.update_vector(VectorField::Velocity, |fields, dst| {
            let velocity = fields.vector(VectorField::Velocity);
            let vorticity = fields.vector(VectorField::Vorticity);
            kernel::run(dst, |x, y| {
                let v = velocity.get(x, y);
                let (xi, yi) = (x as i64, y as i64);
                let grad = Vec2::new(
                    vorticity.get_clamped(xi + 1, yi).y - vorticity.get_clamped(xi - 1, yi).y,
                    vorticity.get_clamped(xi, yi + 1).y - vorticity.get_clamped(xi, yi - 1).y,
                ) * 0.5;
                let mag = grad.norm();
                if mag < 1e-5 {
                    return v;
                }
                let n = grad / mag;
                let curl = vorticity.get(x, y).x;
                v + Vec2::new(n.y, -n.x) * (strength * curl * dt)
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_flow_has_zero_curl() {
        let mut store = FieldStore::new(16);
        store.update_vector(VectorField::Velocity, |_, dst| {
            dst.fill(Vec2::new(4.0, -2.0));
        });

        ComputeVorticity.execute(&mut store, 0.0);

        let vorticity = store.vector(VectorField::Vorticity);
        for y in 1..15 {
            for x in 1..15 {
                assert_eq!(vorticity.get(x, y).x, 0.0);
            }
        }
    }

    #[test]
    fn test_shear_flow_has_curl() {
        let mut store = FieldStore::new(16);
        // vx grows with y: a horizontal shear layer.
        store.update_vector(VectorField::Velocity, |_, dst| {
            kernel::run(dst, |_, y| Vec2::new(y as f32, 0.0));
        });

        ComputeVorticity.execute(&mut store, 0.0);

        let w = store.vector(VectorField::Vorticity).get(8, 8);
        assert!(w.x < 0.0, "Shear should produce negative curl (got {})", w.x);
        assert_eq!(w.y, w.x.abs());
    }

    #[test]
    fn test_apply_vorticity_noop_without_curl_gradient() {
        let mut store = FieldStore::new(8);
        store.update_vector(VectorField::Velocity, |_, dst| {
            dst.fill(Vec2::new(1.0, 1.0));
        });
        ComputeVorticity.execute(&mut store, 0.0);

        ApplyVorticity::new(5.0).execute(&mut store, 1.0 / 60.0);

        let v = store.vector(VectorField::Velocity).get(4, 4);
        assert_eq!(v, Vec2::new(1.0, 1.0));
    }
}
