//! Obstacle/fuel bridge
//!
//! External collaborators own burnable objects (sprites with a shape and a
//! burn progress); the bridge is how those objects meet the grid. Each
//! tick the caller re-registers every object it wants considered, the
//! bridge rasterizes their coverage into the sprite-obstacle field, and
//! after the pipeline has run it samples the temperature field at each
//! object's position to report whether that object is burning.
//!
//! Registration is call-and-clear: objects are consumed by the tick that
//! processes them and never retained, so a caller that stops registering
//! an object cannot leak it into later ticks.

use crate::store::{FieldStore, ScalarField};
use crate::vec2::Vec2;
use rustc_hash::FxHashMap;
use tracing::warn;

/// A rasterized shape: per-cell coverage in `[0, 1]` over a small window.
#[derive(Debug, Clone)]
pub struct CoverageMask {
    width: usize,
    height: usize,
    coverage: Vec<f32>,
}

impl CoverageMask {
    /// Build a mask from raw coverage values.
    ///
    /// # Panics
    ///
    /// Panics if the data length does not match the dimensions.
    #[must_use]
    pub fn new(width: usize, height: usize, coverage: Vec<f32>) -> Self {
        assert_eq!(
            coverage.len(),
            width * height,
            "Coverage data must match mask dimensions"
        );
        Self {
            width,
            height,
            coverage,
        }
    }

    /// Fully covered rectangle of `width`×`height` cells.
    #[must_use]
    pub fn filled(width: usize, height: usize) -> Self {
        Self::new(width, height, vec![1.0; width * height])
    }

    /// Filled disc with the given diameter in cells.
    #[must_use]
    pub fn disc(diameter: usize) -> Self {
        let r = diameter as f32 / 2.0;
        let mut coverage = Vec::with_capacity(diameter * diameter);
        for y in 0..diameter {
            for x in 0..diameter {
                let dx = x as f32 + 0.5 - r;
                let dy = y as f32 + 0.5 - r;
                coverage.push(if dx * dx + dy * dy <= r * r { 1.0 } else { 0.0 });
            }
        }
        Self::new(diameter, diameter, coverage)
    }

    #[must_use]
    fn get(&self, x: usize, y: usize) -> f32 {
        self.coverage[y * self.width + x]
    }
}

/// One externally owned burnable object, registered for a single tick.
#[derive(Debug, Clone)]
pub struct BurnableObject {
    /// Caller-chosen identifier the burn report is keyed by.
    pub id: u64,
    /// Center of the shape in normalized `[0,1]²` space.
    pub position: Vec2,
    /// Shape coverage rasterized by the caller.
    pub mask: CoverageMask,
    /// How far the object has burned away, `0` intact to `1` consumed.
    /// Coverage is scaled by the remainder.
    pub burn_progress: f32,
}

/// Rasterizes registered objects and reports their ignition state.
pub struct ObstacleBridge {
    pending: Vec<BurnableObject>,
    reports: FxHashMap<u64, bool>,
}

impl ObstacleBridge {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            reports: FxHashMap::default(),
        }
    }

    /// Register an object for the next tick only.
    pub fn submit(&mut self, object: BurnableObject) {
        self.pending.push(object);
    }

    /// Number of objects waiting for the next tick.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Burn state of an object sampled at the end of the last tick.
    ///
    /// Unknown ids (never registered, or outside the grid) read as not
    /// burning.
    #[must_use]
    pub fn is_burning(&self, id: u64) -> bool {
        self.reports.get(&id).copied().unwrap_or(false)
    }

    /// Rasterize all pending objects into the sprite-obstacle field.
    ///
    /// The field is rebuilt from scratch each tick; overlapping shapes
    /// keep the larger coverage value.
    pub fn rasterize(&mut self, fields: &mut FieldStore) {
        let pending = &self.pending;
        fields.update_scalar(ScalarField::SpriteObstacle, |fields, dst| {
            let size = fields.size();
            dst.fill(0.0);
            let n = size as f32;
            for object in pending {
                let remaining = (1.0 - object.burn_progress).clamp(0.0, 1.0);
                if remaining == 0.0 {
                    continue;
                }
                let mask = &object.mask;
                // Anchor the mask so its center lands on the object position.
                let origin_x = object.position.x * n - mask.width as f32 / 2.0;
                let origin_y = object.position.y * n - mask.height as f32 / 2.0;
                for my in 0..mask.height {
                    for mx in 0..mask.width {
                        let gx = origin_x + mx as f32;
                        let gy = origin_y + my as f32;
                        if gx < 0.0 || gy < 0.0 {
                            continue;
                        }
                        let (gx, gy) = (gx as usize, gy as usize);
                        if gx >= size || gy >= size {
                            continue;
                        }
                        let value = mask.get(mx, my) * remaining;
                        if value > dst.get(gx, gy) {
                            dst.set(gx, gy, value);
                        }
                    }
                }
            }
        });
    }

    /// Sample the temperature field at each pending object's position and
    /// record its burn report, then clear the registration list.
    ///
    /// Objects positioned outside the grid are reported as not burning;
    /// an out-of-range sample is a normal boundary condition here, not a
    /// fault.
    pub fn sample_reports(&mut self, fields: &FieldStore, ignition_temperature: f32) {
        let temperature = fields.scalar(ScalarField::Temperature);
        let n = fields.size() as f32;
        self.reports.clear();

        for object in self.pending.drain(..) {
            let x = object.position.x * n;
            let y = object.position.y * n;
            let in_bounds = x >= 0.0 && y >= 0.0 && x < n && y < n;
            let burning = if in_bounds {
                temperature.get(x as usize, y as usize) >= ignition_temperature
            } else {
                warn!(
                    id = object.id,
                    x = object.position.x,
                    y = object.position.y,
                    "Burnable object outside grid; reporting not burning"
                );
                false
            };
            self.reports.insert(object.id, burning);
        }
    }
}

impl Default for ObstacleBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(id: u64, position: Vec2, burn_progress: f32) -> BurnableObject {
        BurnableObject {
            id,
            position,
            mask: CoverageMask::filled(4, 4),
            burn_progress,
        }
    }

    #[test]
    fn test_rasterize_writes_coverage() {
        let mut store = FieldStore::new(16);
        let mut bridge = ObstacleBridge::new();
        bridge.submit(object(1, Vec2::new(0.5, 0.5), 0.0));

        bridge.rasterize(&mut store);

        let sprite = store.scalar(ScalarField::SpriteObstacle);
        assert_eq!(sprite.get(8, 8), 1.0);
        assert_eq!(sprite.get(0, 0), 0.0);
    }

    #[test]
    fn test_burn_progress_scales_coverage() {
        let mut store = FieldStore::new(16);
        let mut bridge = ObstacleBridge::new();
        bridge.submit(object(1, Vec2::new(0.5, 0.5), 0.75));

        bridge.rasterize(&mut store);

        let sprite = store.scalar(ScalarField::SpriteObstacle);
        assert_eq!(sprite.get(8, 8), 0.25);
    }

    #[test]
    fn test_rasterize_clears_previous_tick() {
        let mut store = FieldStore::new(16);
        let mut bridge = ObstacleBridge::new();
        bridge.submit(object(1, Vec2::new(0.25, 0.25), 0.0));
        bridge.rasterize(&mut store);
        bridge.sample_reports(&store, 0.3);

        // Nothing re-registered: next tick's rasterization leaves an empty
        // field.
        bridge.rasterize(&mut store);
        assert!(store
            .scalar(ScalarField::SpriteObstacle)
            .iter()
            .all(|&v| v == 0.0));
    }

    #[test]
    fn test_report_burning_when_hot() {
        let mut store = FieldStore::new(16);
        store.update_scalar(ScalarField::Temperature, |_, dst| dst.set(8, 8, 1.0));
        let mut bridge = ObstacleBridge::new();
        bridge.submit(object(7, Vec2::new(0.5, 0.5), 0.0));

        bridge.rasterize(&mut store);
        bridge.sample_reports(&store, 0.3);

        assert!(bridge.is_burning(7));
        assert_eq!(bridge.pending_count(), 0, "Registration is call-and-clear");
    }

    #[test]
    fn test_report_not_burning_when_cold() {
        let mut store = FieldStore::new(16);
        let mut bridge = ObstacleBridge::new();
        bridge.submit(object(7, Vec2::new(0.5, 0.5), 0.0));

        bridge.rasterize(&mut store);
        bridge.sample_reports(&store, 0.3);

        assert!(!bridge.is_burning(7));
    }

    #[test]
    fn test_out_of_grid_object_reports_not_burning() {
        let mut store = FieldStore::new(16);
        store.update_scalar(ScalarField::Temperature, |_, dst| dst.fill(50.0));
        let mut bridge = ObstacleBridge::new();
        bridge.submit(object(9, Vec2::new(4.0, 4.0), 0.0));

        bridge.rasterize(&mut store);
        bridge.sample_reports(&store, 0.3);

        assert!(!bridge.is_burning(9));
    }

    #[test]
    fn test_unknown_id_reads_not_burning() {
        let bridge = ObstacleBridge::new();
        assert!(!bridge.is_burning(42));
    }

    #[test]
    fn test_disc_mask_round() {
        let mask = CoverageMask::disc(8);
        assert_eq!(mask.get(4, 4), 1.0, "Center covered");
        assert_eq!(mask.get(0, 0), 0.0, "Corners uncovered");
    }

    #[test]
    fn test_overlapping_masks_keep_max() {
        let mut store = FieldStore::new(16);
        let mut bridge = ObstacleBridge::new();
        bridge.submit(object(1, Vec2::new(0.5, 0.5), 0.5));
        bridge.submit(object(2, Vec2::new(0.5, 0.5), 0.0));

        bridge.rasterize(&mut store);
        assert_eq!(store.scalar(ScalarField::SpriteObstacle).get(8, 8), 1.0);
    }
}
