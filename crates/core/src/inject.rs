//! Point-source injection kernels
//!
//! The only mutation entry points besides the tick itself: localized
//! additive writes with a radial falloff, and absolute obstacle writes.
//! Positions and radii are in normalized `[0,1]²` space. Out-of-grid
//! positions are not an error; their contribution simply falls to zero.
//!
//! Injected amounts are deliberately not clamped here; the next tick's
//! clamp steps bound every field regardless of what was injected.

use crate::field::{CellValue, FieldBuffer};
use crate::kernel;
use crate::store::{FieldStore, ScalarField, VectorField};
use crate::vec2::Vec2;

/// Quadratic falloff: full weight at the center, zero at the radius.
#[inline]
fn falloff(dist_sq: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    (1.0 - dist_sq / (radius * radius)).max(0.0)
}

/// Normalized-space distance squared from cell center to `pos`.
#[inline]
fn cell_dist_sq(x: usize, y: usize, size: usize, pos: Vec2) -> f32 {
    let n = size as f32;
    let cx = (x as f32 + 0.5) / n;
    let cy = (y as f32 + 0.5) / n;
    let dx = cx - pos.x;
    let dy = cy - pos.y;
    dx * dx + dy * dy
}

fn splat<T, F>(dst: &mut FieldBuffer<T>, src: &FieldBuffer<T>, pos: Vec2, radius: f32, add: F)
where
    T: CellValue,
    F: Fn(T, f32) -> T + Sync,
{
    let size = src.size();
    kernel::run(dst, |x, y| {
        let w = falloff(cell_dist_sq(x, y, size, pos), radius);
        add(src.get(x, y), w)
    });
}

/// Add a force to the velocity field around `pos`.
pub fn add_force(fields: &mut FieldStore, pos: Vec2, force: Vec2, radius: f32) {
    fields.update_vector(VectorField::Velocity, |fields, dst| {
        let src = fields.vector(VectorField::Velocity);
        splat(dst, src, pos, radius, |v, w| v + force * w);
    });
}

/// Add to a scalar field around `pos`.
pub fn add_scalar(
    fields: &mut FieldStore,
    field: ScalarField,
    pos: Vec2,
    amount: f32,
    radius: f32,
) {
    fields.update_scalar(field, |fields, dst| {
        let src = fields.scalar(field);
        splat(dst, src, pos, radius, |v, w| v + amount * w);
    });
}

/// Absolute obstacle write: cells within the radius become fully solid.
pub fn set_obstacle(fields: &mut FieldStore, pos: Vec2, radius: f32) {
    fields.update_scalar(ScalarField::Obstacle, |fields, dst| {
        let src = fields.scalar(ScalarField::Obstacle);
        let size = src.size();
        kernel::run(dst, |x, y| {
            if cell_dist_sq(x, y, size, pos) <= radius * radius {
                1.0
            } else {
                src.get(x, y)
            }
        });
    });
}

/// Clear every obstacle cell written through [`set_obstacle`].
pub fn clear_obstacles(fields: &mut FieldStore) {
    fields.update_scalar(ScalarField::Obstacle, |_, dst| dst.fill(0.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_add_scalar_peaks_at_center() {
        let mut store = FieldStore::new(16);
        add_scalar(
            &mut store,
            ScalarField::Fuel,
            Vec2::new(0.5, 0.5),
            8.0,
            0.25,
        );

        let fuel = store.scalar(ScalarField::Fuel);
        let center = fuel.get(8, 8);
        assert!(center > 0.0);
        assert!(center > fuel.get(11, 8), "Falloff decreases with distance");
        assert_eq!(fuel.get(0, 0), 0.0, "No contribution beyond the radius");
    }

    #[test]
    fn test_zero_amount_is_identity() {
        let mut store = FieldStore::new(16);
        add_scalar(&mut store, ScalarField::Fuel, Vec2::new(0.3, 0.3), 5.0, 0.2);
        let before: Vec<f32> = store.scalar(ScalarField::Fuel).iter().copied().collect();

        add_scalar(&mut store, ScalarField::Fuel, Vec2::new(0.3, 0.3), 0.0, 0.2);

        for (a, b) in before.iter().zip(store.scalar(ScalarField::Fuel).iter()) {
            assert_relative_eq!(a, b);
        }
    }

    #[test]
    fn test_out_of_grid_position_is_noop() {
        let mut store = FieldStore::new(16);
        add_scalar(
            &mut store,
            ScalarField::Smoke,
            Vec2::new(5.0, 5.0),
            100.0,
            0.1,
        );
        assert!(store.scalar(ScalarField::Smoke).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_injection_is_additive() {
        let mut store = FieldStore::new(16);
        let pos = Vec2::new(0.5, 0.5);
        add_scalar(&mut store, ScalarField::Fuel, pos, 2.0, 0.2);
        let once = store.scalar(ScalarField::Fuel).get(8, 8);
        add_scalar(&mut store, ScalarField::Fuel, pos, 2.0, 0.2);
        assert_relative_eq!(store.scalar(ScalarField::Fuel).get(8, 8), 2.0 * once);
    }

    #[test]
    fn test_add_force_directional() {
        let mut store = FieldStore::new(16);
        add_force(&mut store, Vec2::new(0.5, 0.5), Vec2::new(10.0, 0.0), 0.2);

        let v = store.vector(VectorField::Velocity).get(8, 8);
        assert!(v.x > 0.0);
        assert_relative_eq!(v.y, 0.0);
    }

    #[test]
    fn test_set_obstacle_absolute_and_clear() {
        let mut store = FieldStore::new(16);
        set_obstacle(&mut store, Vec2::new(0.5, 0.5), 0.1);
        assert_eq!(store.scalar(ScalarField::Obstacle).get(8, 8), 1.0);

        // A second write does not accumulate past 1.0.
        set_obstacle(&mut store, Vec2::new(0.5, 0.5), 0.1);
        assert_eq!(store.scalar(ScalarField::Obstacle).get(8, 8), 1.0);

        clear_obstacles(&mut store);
        assert!(store
            .scalar(ScalarField::Obstacle)
            .iter()
            .all(|&v| v == 0.0));
    }
}
