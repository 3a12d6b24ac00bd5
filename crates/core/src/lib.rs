//! Ember Simulation Core Library
//!
//! An interactive, real-time Eulerian fluid-and-combustion solver: named
//! scalar and vector fields over a square grid, advanced each tick by a
//! fixed pipeline of numerical operators (advection, Jacobi diffusion,
//! pressure projection, combustion, buoyancy, damping) to produce
//! physically plausible fire and smoke at interactive rates.
//!
//! The crate is the simulation engine only. Rendering, scene management,
//! and input are collaborator concerns; they drive the engine through the
//! injection API and read fields back through the visualization accessors.
//!
//! ## Structure
//!
//! - Double-buffered field storage with enumerated field identifiers
//! - A full-grid kernel runner (Rayon-parallel per-cell operators)
//! - One simulation step per physical effect, assembled into a fixed
//!   per-tick pipeline
//! - Point-source injection (force, fuel, temperature, obstacles)
//! - An obstacle/fuel bridge for externally owned burnable objects

// Field storage and kernels
pub mod field;
pub mod kernel;
pub mod store;

// Pipeline and steps
pub mod config;
pub mod pipeline;
pub mod steps;

// Public surface
pub mod bridge;
pub mod inject;
pub mod sim;
pub mod vec2;

// Re-export the types most consumers need
pub use bridge::{BurnableObject, CoverageMask, ObstacleBridge};
pub use config::SimulationConfig;
pub use field::{CellValue, FieldBuffer, FieldPair};
pub use pipeline::SimulationPipeline;
pub use sim::FireSim;
pub use steps::SimulationStep;
pub use store::{FieldStore, ScalarField, VectorField};
pub use vec2::Vec2;
