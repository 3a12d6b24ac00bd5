//! Grid boundary conditions
//!
//! After a solve pass the 1-cell border is overwritten from the adjacent
//! interior cell: negated for velocity (no-slip, no penetration), copied
//! unchanged for pressure and other scalars (zero-gradient Neumann). The
//! velocity variant also zeroes flow inside obstacle-covered cells so
//! external geometry deflects the fluid.

use super::SimulationStep;
use crate::kernel;
use crate::store::{FieldStore, ScalarField, VectorField};
use crate::vec2::Vec2;

/// Obstacle coverage at or above this fraction blocks flow entirely.
const OBSTACLE_SOLID: f32 = 0.5;

/// How the border row/column relates to the adjacent interior value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// No-slip: border takes the negated interior value.
    Velocity,
    /// Neumann: border copies the interior value (zero normal gradient).
    Pressure,
    /// Copy, for scalars without a physical boundary condition.
    Other,
}

impl BoundaryKind {
    fn scale(self) -> f32 {
        match self {
            BoundaryKind::Velocity => -1.0,
            BoundaryKind::Pressure | BoundaryKind::Other => 1.0,
        }
    }
}

/// Nearest interior cell for a border cell; corners resolve diagonally.
#[inline]
fn interior_neighbor(x: usize, y: usize, size: usize) -> (usize, usize) {
    (x.clamp(1, size - 2), y.clamp(1, size - 2))
}

#[inline]
fn is_border(x: usize, y: usize, size: usize) -> bool {
    x == 0 || y == 0 || x == size - 1 || y == size - 1
}

/// Enforce a border condition on a scalar field.
pub struct ScalarBoundary {
    field: ScalarField,
    kind: BoundaryKind,
}

impl ScalarBoundary {
    #[must_use]
    pub fn new(field: ScalarField, kind: BoundaryKind) -> Self {
        Self { field, kind }
    }
}

impl SimulationStep for ScalarBoundary {
    fn name(&self) -> &'static str {
        "boundary"
    }

    fn execute(&self, fields: &mut FieldStore, _dt: f32) {
        let scale = self.kind.scale();
        fields.update_scalar(self.field, |fields, dst| {
            let src = fields.scalar(self.field);
            let size = src.size();
            kernel::run(dst, |x, y| {
                if is_border(x, y, size) {
                    let (ix, iy) = interior_neighbor(x, y, size);
                    scale * src.get(ix, iy)
                } else {
                    src.get(x, y)
                }
            });
        });
    }
}

/// Enforce no-slip borders on velocity and block flow through obstacles.
pub struct VelocityBoundary;

impl SimulationStep for VelocityBoundary {
    fn name(&self) -> &'static str {
        "boundary-velocity"
    }

    fn execute(&self, fields: &mut FieldStore, _dt: f32) {
        fields.update_vector(VectorField::Velocity, |fields, dst| {
            let src = fields.vector(VectorField::Velocity);
            let obstacle = fields.scalar(ScalarField::Obstacle);
            let sprite = fields.scalar(ScalarField::SpriteObstacle);
            let size = src.size();
            kernel::run(dst, |x, y| {
                if obstacle.get(x, y) + sprite.get(x, y) >= OBSTACLE_SOLID {
                    return Vec2::zeros();
                }
                if is_border(x, y, size) {
                    let (ix, iy) = interior_neighbor(x, y, size);
                    -src.get(ix, iy)
                } else {
                    src.get(x, y)
                }
            });
        });
    }
}
