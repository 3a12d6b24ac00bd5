//! Per-tick step pipeline
//!
//! The pipeline is an ordered list of steps built once from the
//! configuration and executed in the same fixed order every tick. The
//! ordering is load-bearing: advection before projection, combustion after
//! projection, clamps before transport of fields that must not go
//! negative. Reordering changes both stability and the visual result.

use crate::config::SimulationConfig;
use crate::steps::{
    AddSmoke, AdvectScalar, AdvectVelocity, ApplyGravity, ApplyVorticity, BoundaryKind, Buoyancy,
    ClampScalar, ClampVelocity, CombustionDivergence, ComputeDivergence, ComputeVorticity,
    ConsumeFuel, DiffuseScalar, DiffuseVelocity, Dissipate, GaussianBlur, Ignition, ObstacleToFuel,
    Project, Radiance, ScalarBoundary, SimulationStep, SolvePressure, SpreadFire, VelocityBoundary,
    VelocityDamping,
};
use crate::store::{FieldStore, ScalarField};
use tracing::trace;

/// The fixed per-tick step sequence.
pub struct SimulationPipeline {
    steps: Vec<Box<dyn SimulationStep>>,
}

impl SimulationPipeline {
    /// Assemble the pipeline from its configuration.
    ///
    /// Optional steps (vorticity confinement, combustion divergence) are
    /// included only when their strength is nonzero, so the assembled list
    /// contains exactly the work each tick performs.
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        config.validate();
        let mut steps: Vec<Box<dyn SimulationStep>> = Vec::new();

        // Feed rasterized obstacle coverage into fuel, then bound the
        // combustion fields before anything transports them.
        steps.push(Box::new(ObstacleToFuel::new(config.fuel_conversion_rate)));
        steps.push(Box::new(ClampScalar::new(ScalarField::Fuel, config.max_fuel)));
        steps.push(Box::new(ClampScalar::new(
            ScalarField::Temperature,
            config.max_temperature,
        )));

        steps.push(Box::new(ApplyGravity::new(config.gravity)));

        steps.push(Box::new(AdvectVelocity));
        steps.push(Box::new(AdvectScalar::new(ScalarField::Fuel)));
        steps.push(Box::new(AdvectScalar::new(ScalarField::Temperature)));
        steps.push(Box::new(AdvectScalar::new(ScalarField::Smoke)));

        steps.push(Box::new(DiffuseVelocity::new(
            config.diffuse_iterations,
            config.diffusion,
        )));
        steps.push(Box::new(DiffuseScalar::new(
            ScalarField::Fuel,
            config.diffuse_iterations,
            config.diffusion,
        )));
        steps.push(Box::new(GaussianBlur::new(
            ScalarField::Temperature,
            config.blur_radius,
            config.blur_kernel_size,
        )));

        if config.vorticity_strength > 0.0 {
            steps.push(Box::new(ComputeVorticity));
            steps.push(Box::new(ApplyVorticity::new(config.vorticity_strength)));
        }

        steps.push(Box::new(ComputeDivergence));
        if config.combustion_pressure > 0.0 {
            steps.push(Box::new(CombustionDivergence::new(
                config.ignition_temperature,
                config.min_fuel_threshold,
                config.combustion_pressure,
            )));
        }
        steps.push(Box::new(SolvePressure::new(config.pressure_iterations)));
        steps.push(Box::new(ScalarBoundary::new(
            ScalarField::Pressure,
            BoundaryKind::Pressure,
        )));
        steps.push(Box::new(Project));
        steps.push(Box::new(VelocityBoundary));
        steps.push(Box::new(AdvectVelocity));

        steps.push(Box::new(Ignition::new(
            config.ignition_temperature,
            config.fuel_burn_temperature,
            config.min_fuel_threshold,
            config.combustion_heat_rate,
        )));
        steps.push(Box::new(SpreadFire::new(
            config.spread_fire_iterations,
            config.ignition_temperature,
            config.fuel_burn_temperature,
            config.min_fuel_threshold,
            config.combustion_heat_rate,
        )));
        steps.push(Box::new(ConsumeFuel::new(
            config.ignition_temperature,
            config.fuel_consumption_rate,
        )));
        steps.push(Box::new(AddSmoke::new(
            config.smoke_emission_rate,
            config.min_fuel_threshold,
            config.ignition_temperature,
        )));
        steps.push(Box::new(ClampScalar::new(
            ScalarField::Smoke,
            config.max_smoke,
        )));
        steps.push(Box::new(Dissipate::new(
            ScalarField::Smoke,
            config.smoke_dissipation_rate,
        )));

        steps.push(Box::new(Radiance::new(
            config.ambient_temperature,
            config.max_temperature,
            config.cooling_rate,
        )));
        steps.push(Box::new(Buoyancy::new(
            config.ambient_temperature,
            config.buoyancy_constant,
            config.gravity,
        )));

        steps.push(Box::new(VelocityDamping::new(config.velocity_damping)));
        steps.push(Box::new(ClampVelocity::new(config.max_velocity)));

        Self { steps }
    }

    /// Run every step once, in order.
    pub fn run(&self, fields: &mut FieldStore, dt: f32) {
        for step in &self.steps {
            trace!(step = step.name(), "Executing pipeline step");
            step.execute(fields, dt);
        }
    }

    /// Step names in execution order, for diagnostics and tests.
    pub fn step_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(|s| s.name())
    }
}
