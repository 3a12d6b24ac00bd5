//! Vector type alias for 2D velocities and forces.

use nalgebra::Vector2;

/// 2D vector type for velocities, forces, and grid-space positions.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`, used throughout
/// the simulation for the velocity field, injected forces, and normalized
/// positions handed in by callers.
pub type Vec2 = Vector2<f32>;
