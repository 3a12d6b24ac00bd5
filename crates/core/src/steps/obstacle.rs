//! Obstacle-to-fuel conversion
//!
//! Externally registered burnable shapes are rasterized into the
//! sprite-obstacle field by the bridge before the pipeline runs; this step
//! then feeds covered cells into the fuel field at a configurable rate, so
//! obstacle geometry becomes material the fire can consume.

use super::SimulationStep;
use crate::kernel;
use crate::store::{FieldStore, ScalarField};

/// Convert sprite-obstacle coverage into fuel.
pub struct ObstacleToFuel {
    fuel_conversion_rate: f32,
}

impl ObstacleToFuel {
    #[must_use]
    pub fn new(fuel_conversion_rate: f32) -> Self {
        Self {
            fuel_conversion_rate,
        }
    }
}

impl SimulationStep for ObstacleToFuel {
    fn name(&self) -> &'static str {
        "obstacle-to-fuel"
    }

    fn execute(&self, fields: &mut FieldStore, dt: f32) {
        let rate = self.fuel_conversion_rate * dt;
        fields.update_scalar(ScalarField::Fuel, |fields, dst| {
            let fuel = fields.scalar(ScalarField::Fuel);
            let coverage = fields.scalar(ScalarField::SpriteObstacle);
            kernel::run(dst, |x, y| {
                let c = coverage.get(x, y);
                let f = fuel.get(x, y);
                if c > 0.0 {
                    f + c * rate
                } else {
                    f
                }
            });
        });
    }
}
