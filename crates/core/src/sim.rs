//! Top-level simulation
//!
//! [`FireSim`] owns the field store, the assembled pipeline, and the
//! obstacle bridge, and exposes the public surface consumers use: the
//! per-tick [`update`](FireSim::update), the injection calls, burnable
//! object registration, and read-only field access for visualization.
//!
//! The simulation is single-threaded at the tick level: injection calls
//! and `update` must come from the same thread, in whatever order the
//! caller's frame loop produces them. Within a tick, individual kernels
//! parallelize across cells internally.

use crate::bridge::{BurnableObject, ObstacleBridge};
use crate::config::SimulationConfig;
use crate::field::FieldBuffer;
use crate::inject;
use crate::pipeline::SimulationPipeline;
use crate::store::{FieldStore, ScalarField, VectorField};
use crate::vec2::Vec2;
use tracing::{debug, info};

/// The interactive fire/smoke solver over one square grid.
pub struct FireSim {
    fields: FieldStore,
    pipeline: SimulationPipeline,
    bridge: ObstacleBridge,
    config: SimulationConfig,
    time: f32,
    tick: u64,
}

impl FireSim {
    /// Allocate a simulation with zero-initialized fields.
    #[must_use]
    pub fn new(grid_size: usize, config: SimulationConfig) -> Self {
        let pipeline = SimulationPipeline::new(&config);
        info!(
            grid_size,
            diffuse_iterations = config.diffuse_iterations,
            pressure_iterations = config.pressure_iterations,
            "Creating fire simulation"
        );
        Self {
            fields: FieldStore::new(grid_size),
            pipeline,
            bridge: ObstacleBridge::new(),
            config,
            time: 0.0,
            tick: 0,
        }
    }

    /// Allocate with default tuning.
    #[must_use]
    pub fn with_defaults(grid_size: usize) -> Self {
        Self::new(grid_size, SimulationConfig::default())
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Registered burnable objects are rasterized first, the fixed step
    /// pipeline runs once, then each object's burn state is sampled and
    /// the registration list cleared. A tick is atomic from the caller's
    /// perspective; there is no partial-tick recovery because none is
    /// needed.
    pub fn update(&mut self, dt: f32) {
        self.bridge.rasterize(&mut self.fields);
        self.pipeline.run(&mut self.fields, dt);
        self.bridge
            .sample_reports(&self.fields, self.config.ignition_temperature);

        self.time += dt;
        self.tick += 1;
        debug!(tick = self.tick, time = self.time, dt, "Tick complete");
    }

    /// Add a force to the velocity field around `pos` (normalized space).
    pub fn add_force(&mut self, pos: Vec2, force: Vec2, radius: f32) {
        debug!(x = pos.x, y = pos.y, radius, "Injecting force");
        inject::add_force(
            &mut self.fields,
            pos,
            force * self.config.force_strength,
            radius,
        );
    }

    /// Add fuel around `pos` (normalized space).
    pub fn add_fuel(&mut self, pos: Vec2, amount: f32, radius: f32) {
        debug!(x = pos.x, y = pos.y, amount, radius, "Injecting fuel");
        inject::add_scalar(
            &mut self.fields,
            ScalarField::Fuel,
            pos,
            amount * self.config.source_strength,
            radius,
        );
    }

    /// Add heat around `pos` (normalized space).
    pub fn add_temperature(&mut self, pos: Vec2, amount: f32, radius: f32) {
        debug!(x = pos.x, y = pos.y, amount, radius, "Injecting temperature");
        inject::add_scalar(
            &mut self.fields,
            ScalarField::Temperature,
            pos,
            amount * self.config.source_strength,
            radius,
        );
    }

    /// Mark cells within `radius` of `pos` as solid obstacle.
    pub fn set_obstacle(&mut self, pos: Vec2, radius: f32) {
        inject::set_obstacle(&mut self.fields, pos, radius);
    }

    /// Remove all obstacles written through [`set_obstacle`](Self::set_obstacle).
    pub fn clear_obstacles(&mut self) {
        inject::clear_obstacles(&mut self.fields);
    }

    /// Register a burnable object for the next tick. Objects are consumed
    /// by that tick; re-register every tick the object should participate.
    pub fn register_burnable(&mut self, object: BurnableObject) {
        self.bridge.submit(object);
    }

    /// Whether a registered object sat at or above ignition temperature at
    /// the end of the last tick.
    #[must_use]
    pub fn is_burning(&self, id: u64) -> bool {
        self.bridge.is_burning(id)
    }

    /// Grid edge length in cells.
    #[must_use]
    pub fn grid_size(&self) -> usize {
        self.fields.size()
    }

    /// The configuration the pipeline was assembled from.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Seconds of simulated time.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Completed tick count.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Committed fuel field, for visualization consumers.
    #[must_use]
    pub fn fuel(&self) -> &FieldBuffer<f32> {
        self.fields.scalar(ScalarField::Fuel)
    }

    /// Committed temperature field.
    #[must_use]
    pub fn temperature(&self) -> &FieldBuffer<f32> {
        self.fields.scalar(ScalarField::Temperature)
    }

    /// Committed pressure field.
    #[must_use]
    pub fn pressure(&self) -> &FieldBuffer<f32> {
        self.fields.scalar(ScalarField::Pressure)
    }

    /// Committed smoke field.
    #[must_use]
    pub fn smoke(&self) -> &FieldBuffer<f32> {
        self.fields.scalar(ScalarField::Smoke)
    }

    /// Committed obstacle field (injection-written obstacles).
    #[must_use]
    pub fn obstacle(&self) -> &FieldBuffer<f32> {
        self.fields.scalar(ScalarField::Obstacle)
    }

    /// Committed velocity field.
    #[must_use]
    pub fn velocity(&self) -> &FieldBuffer<Vec2> {
        self.fields.vector(VectorField::Velocity)
    }

    /// Direct store access for diagnostics and tests.
    #[must_use]
    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_new_sim_is_quiescent() {
        let sim = FireSim::with_defaults(32);
        assert_eq!(sim.grid_size(), 32);
        assert!(sim.fuel().iter().all(|&v| v == 0.0));
        assert!(sim.temperature().iter().all(|&v| v == 0.0));
        assert!(sim.smoke().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_update_advances_clock() {
        let mut sim = FireSim::with_defaults(16);
        sim.update(DT);
        sim.update(DT);
        assert_eq!(sim.tick(), 2);
        assert!((sim.time() - 2.0 * DT).abs() < 1e-6);
    }

    #[test]
    fn test_injected_fuel_is_visible() {
        let mut sim = FireSim::with_defaults(32);
        sim.add_fuel(Vec2::new(0.5, 0.5), 4.0, 0.1);
        assert!(sim.fuel().get(16, 16) > 0.0);
    }

    #[test]
    fn test_fire_ignites_and_burns_fuel() {
        let mut sim = FireSim::with_defaults(32);
        sim.add_fuel(Vec2::new(0.5, 0.5), 5.0, 0.1);
        sim.add_temperature(Vec2::new(0.5, 0.5), 1.0, 0.1);

        let fuel_before = sim.fuel().get(16, 16);
        for _ in 0..10 {
            sim.update(DT);
        }

        assert!(
            sim.fuel().get(16, 16) < fuel_before,
            "Ignited fuel should be consumed"
        );
        assert!(sim.smoke().get(16, 16) > 0.0, "Burning should emit smoke");
    }

    #[test]
    fn test_burnable_object_reports_follow_heat() {
        let mut sim = FireSim::with_defaults(32);
        sim.add_temperature(Vec2::new(0.5, 0.5), 5.0, 0.2);

        sim.register_burnable(BurnableObject {
            id: 3,
            position: Vec2::new(0.5, 0.5),
            mask: crate::bridge::CoverageMask::filled(2, 2),
            burn_progress: 0.0,
        });
        sim.update(DT);

        assert!(sim.is_burning(3));
        // Not re-registered: the stale id reads as not burning after the
        // next tick's sweep.
        sim.update(DT);
        assert!(!sim.is_burning(3));
    }
}
