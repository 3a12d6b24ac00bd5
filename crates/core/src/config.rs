//! Simulation configuration
//!
//! All tunable constants for the pipeline, supplied once at construction.
//! There is no mid-tick reconfiguration: changing parameters means building
//! a new pipeline.

use serde::{Deserialize, Serialize};

/// Tunable parameters for the solver pipeline.
///
/// Defaults reproduce the hand-tuned values the simulation ships with.
/// Temperature, fuel, and smoke are unitless quantities on the grid's own
/// scale rather than physical units; the documented bounds
/// (`max_temperature`, `max_fuel`, `max_smoke`, `max_velocity`) are the
/// ranges every field is guaranteed to stay inside after each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Jacobi passes for the implicit diffusion solve.
    pub diffuse_iterations: usize,
    /// Jacobi passes for the pressure Poisson solve.
    pub pressure_iterations: usize,
    /// Neighbor-propagation passes per tick for fire spread.
    pub spread_fire_iterations: usize,
    /// Diffusion constant for velocity and fuel.
    pub diffusion: f32,

    /// Temperature the grid relaxes toward when nothing burns.
    pub ambient_temperature: f32,
    /// Temperature at which fuel catches fire.
    pub ignition_temperature: f32,
    /// Temperature burning fuel drives its cell toward.
    pub fuel_burn_temperature: f32,
    /// Rate (1/s) at which a burning cell approaches `fuel_burn_temperature`.
    pub combustion_heat_rate: f32,
    /// Fuel consumed per second in burning cells.
    pub fuel_consumption_rate: f32,
    /// Fuel below this threshold no longer sustains fire.
    pub min_fuel_threshold: f32,

    /// Smoke emitted per second by burning cells.
    pub smoke_emission_rate: f32,
    /// Exponential smoke fade rate (1/s).
    pub smoke_dissipation_rate: f32,
    /// Radiative cooling rate toward ambient.
    pub cooling_rate: f32,

    /// Upward force per unit of temperature above ambient.
    pub buoyancy_constant: f32,
    /// Constant acceleration along +y (downward positive) applied to all
    /// cells. The default is negative: a net lift tuned for rising hot gas.
    pub gravity: f32,
    /// Fraction of velocity retained per second.
    pub velocity_damping: f32,

    /// Upper bound for the temperature field.
    pub max_temperature: f32,
    /// Upper bound for the fuel field.
    pub max_fuel: f32,
    /// Upper bound for the smoke field.
    pub max_smoke: f32,
    /// Hard cap on velocity magnitude, in cells per second.
    pub max_velocity: f32,

    /// Radius multiplier for the temperature blur.
    pub blur_radius: f32,
    /// Taps in the separable Gaussian kernel (odd, at least 3).
    pub blur_kernel_size: usize,

    /// Vorticity-confinement strength; 0 disables the step.
    pub vorticity_strength: f32,
    /// Extra divergence sourced by burning cells; 0 disables the step.
    pub combustion_pressure: f32,

    /// Fuel added per second per unit of rasterized obstacle coverage.
    pub fuel_conversion_rate: f32,
    /// Scale applied to injected forces.
    pub force_strength: f32,
    /// Scale applied to injected fuel and temperature amounts.
    pub source_strength: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            diffuse_iterations: 20,
            pressure_iterations: 20,
            spread_fire_iterations: 3,
            diffusion: 0.0001,

            ambient_temperature: 0.0,
            ignition_temperature: 0.3,
            fuel_burn_temperature: 20.0,
            combustion_heat_rate: 10.0,
            fuel_consumption_rate: 32.0,
            min_fuel_threshold: 0.01,

            smoke_emission_rate: 256.0,
            smoke_dissipation_rate: 0.35,
            cooling_rate: 62.5,

            buoyancy_constant: 80.0,
            gravity: -9.81,
            velocity_damping: 0.75,

            max_temperature: 100.0,
            max_fuel: 100.0,
            max_smoke: 100.0,
            max_velocity: 128.0,

            blur_radius: 1.0,
            blur_kernel_size: 9,

            vorticity_strength: 0.0,
            combustion_pressure: 0.0,

            fuel_conversion_rate: 1.0,
            force_strength: 1.0,
            source_strength: 1.0,
        }
    }
}

impl SimulationConfig {
    /// Validate parameter combinations that would silently break the solve.
    ///
    /// # Panics
    ///
    /// Panics on non-positive iteration counts, an even or degenerate blur
    /// kernel, or a damping factor outside `(0, 1]`.
    pub fn validate(&self) {
        assert!(self.pressure_iterations > 0, "Pressure solve needs at least one pass");
        assert!(self.diffuse_iterations > 0, "Diffusion needs at least one pass");
        assert!(
            self.blur_kernel_size >= 3 && self.blur_kernel_size % 2 == 1,
            "Blur kernel size must be odd and at least 3"
        );
        assert!(
            self.velocity_damping > 0.0 && self.velocity_damping <= 1.0,
            "Velocity damping must be in (0, 1]"
        );
        assert!(self.max_temperature > 0.0, "Temperature bound must be positive");
    }
}
