//! Damping, clamping, and dissipation
//!
//! These steps keep the solve numerically bounded between pressure solves:
//! velocity decays and is hard-capped in magnitude, scalar fields are
//! clamped to their documented ranges, and smoke fades over time. Injected
//! values are never clamped at injection time; the next tick's clamp steps
//! are what guarantee the documented bounds.

use super::SimulationStep;
use crate::kernel;
use crate::store::{FieldStore, ScalarField, VectorField};
use crate::vec2::Vec2;

/// Frame-rate independent exponential velocity decay.
pub struct VelocityDamping {
    damping: f32,
}

impl VelocityDamping {
    #[must_use]
    pub fn new(damping: f32) -> Self {
        Self { damping }
    }
}

impl SimulationStep for VelocityDamping {
    fn name(&self) -> &'static str {
        "velocity-damping"
    }

    fn execute(&self, fields: &mut FieldStore, dt: f32) {
        // damping is the fraction retained per second.
        let retain = self.damping.powf(dt);
        fields.update_vector(VectorField::Velocity, |fields, dst| {
            let src = fields.vector(VectorField::Velocity);
            kernel::map(dst, src, |v| v * retain);
        });
    }
}

/// Hard cap on velocity magnitude.
pub struct ClampVelocity {
    max_velocity: f32,
}

impl ClampVelocity {
    #[must_use]
    pub fn new(max_velocity: f32) -> Self {
        Self { max_velocity }
    }
}

impl SimulationStep for ClampVelocity {
    fn name(&self) -> &'static str {
        "clamp-velocity"
    }

    fn execute(&self, fields: &mut FieldStore, _dt: f32) {
        let max = self.max_velocity;
        fields.update_vector(VectorField::Velocity, |fields, dst| {
            let src = fields.vector(VectorField::Velocity);
            kernel::map(dst, src, |v| {
                let mag = v.norm();
                if mag.is_finite() && mag <= max {
                    v
                } else if mag > 0.0 && mag.is_finite() {
                    v * (max / mag)
                } else {
                    // NaN or infinite velocity: drop the cell to rest
                    // rather than letting the value propagate.
                    Vec2::zeros()
                }
            });
        });
    }
}

/// Clamp a scalar field into `[0, max]`, squashing NaN to zero.
pub struct ClampScalar {
    field: ScalarField,
    max: f32,
}

impl ClampScalar {
    #[must_use]
    pub fn new(field: ScalarField, max: f32) -> Self {
        Self { field, max }
    }
}

impl SimulationStep for ClampScalar {
    fn name(&self) -> &'static str {
        "clamp"
    }

    fn execute(&self, fields: &mut FieldStore, _dt: f32) {
        let max = self.max;
        fields.update_scalar(self.field, |fields, dst| {
            let src = fields.scalar(self.field);
            kernel::map(dst, src, |v| {
                if v.is_finite() {
                    v.clamp(0.0, max)
                } else {
                    0.0
                }
            });
        });
    }
}

/// Exponential per-second fade of a scalar field.
pub struct Dissipate {
    field: ScalarField,
    rate: f32,
}

impl Dissipate {
    #[must_use]
    pub fn new(field: ScalarField, rate: f32) -> Self {
        Self { field, rate }
    }
}

impl SimulationStep for Dissipate {
    fn name(&self) -> &'static str {
        "dissipate"
    }

    fn execute(&self, fields: &mut FieldStore, dt: f32) {
        let factor = 1.0 / (1.0 + self.rate * dt);
        fields.update_scalar(self.field, |fields, dst| {
            let src = fields.scalar(self.field);
            kernel::map(dst, src, |v| v * factor);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_damping_reduces_magnitude() {
        let mut store = FieldStore::new(8);
        store.update_vector(VectorField::Velocity, |_, dst| {
            dst.fill(Vec2::new(10.0, 0.0));
        });

        VelocityDamping::new(0.75).execute(&mut store, DT);

        let v = store.vector(VectorField::Velocity).get(4, 4);
        assert!(v.x < 10.0 && v.x > 9.0, "One tick of damping is gentle (got {})", v.x);
    }

    #[test]
    fn test_damping_is_framerate_independent() {
        // One full second of damping should retain the configured fraction
        // regardless of how many ticks it is split into.
        let run = |dt: f32, ticks: usize| {
            let mut store = FieldStore::new(8);
            store.update_vector(VectorField::Velocity, |_, dst| {
                dst.fill(Vec2::new(10.0, 0.0));
            });
            let step = VelocityDamping::new(0.75);
            for _ in 0..ticks {
                step.execute(&mut store, dt);
            }
            store.vector(VectorField::Velocity).get(4, 4).x
        };

        assert_relative_eq!(run(1.0 / 60.0, 60), run(1.0 / 30.0, 30), epsilon = 1e-3);
        assert_relative_eq!(run(1.0, 1), 7.5, epsilon = 1e-3);
    }

    #[test]
    fn test_clamp_velocity_caps_magnitude() {
        let mut store = FieldStore::new(8);
        store.update_vector(VectorField::Velocity, |_, dst| {
            dst.set(4, 4, Vec2::new(300.0, 400.0));
        });

        ClampVelocity::new(128.0).execute(&mut store, 0.0);

        let v = store.vector(VectorField::Velocity).get(4, 4);
        assert_relative_eq!(v.norm(), 128.0, epsilon = 1e-3);
        // Direction preserved.
        assert_relative_eq!(v.y / v.x, 400.0 / 300.0, epsilon = 1e-4);
    }

    #[test]
    fn test_clamp_velocity_zeroes_nan() {
        let mut store = FieldStore::new(8);
        store.update_vector(VectorField::Velocity, |_, dst| {
            dst.set(4, 4, Vec2::new(f32::NAN, 1.0));
        });

        ClampVelocity::new(128.0).execute(&mut store, 0.0);
        assert_eq!(store.vector(VectorField::Velocity).get(4, 4), Vec2::zeros());
    }

    #[test]
    fn test_clamp_scalar_bounds_and_nan() {
        let mut store = FieldStore::new(8);
        store.update_scalar(ScalarField::Fuel, |_, dst| {
            dst.set(1, 1, -5.0);
            dst.set(2, 2, 1e9);
            dst.set(3, 3, f32::NAN);
        });

        ClampScalar::new(ScalarField::Fuel, 100.0).execute(&mut store, 0.0);

        let fuel = store.scalar(ScalarField::Fuel);
        assert_eq!(fuel.get(1, 1), 0.0);
        assert_eq!(fuel.get(2, 2), 100.0);
        assert_eq!(fuel.get(3, 3), 0.0);
    }

    #[test]
    fn test_dissipate_fades_field() {
        let mut store = FieldStore::new(8);
        store.update_scalar(ScalarField::Smoke, |_, dst| dst.fill(10.0));

        Dissipate::new(ScalarField::Smoke, 0.35).execute(&mut store, DT);

        let s = store.scalar(ScalarField::Smoke).get(4, 4);
        assert!(s < 10.0 && s > 9.0);
    }
}
