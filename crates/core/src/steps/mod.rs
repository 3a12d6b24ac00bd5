//! Simulation steps
//!
//! One module per physical effect. Each step is a small struct holding its
//! own tunables, built once at pipeline assembly and invoked once per tick
//! (iteration-based steps loop internally). Steps are stateless with
//! respect to the grid: all field state lives in the
//! [`FieldStore`](crate::store::FieldStore).

mod advect;
mod blur;
mod boundary;
mod combustion;
mod damping;
mod diffuse;
mod obstacle;
mod pressure;
mod thermal;
mod vorticity;

pub use advect::{AdvectScalar, AdvectVelocity};
pub use blur::GaussianBlur;
pub use diffuse::{DiffuseScalar, DiffuseVelocity};
pub use boundary::{BoundaryKind, ScalarBoundary, VelocityBoundary};
pub use combustion::{AddSmoke, ConsumeFuel, Ignition, SpreadFire};
pub use damping::{ClampScalar, ClampVelocity, Dissipate, VelocityDamping};
pub use obstacle::ObstacleToFuel;
pub use pressure::{
    mean_abs_divergence, CombustionDivergence, ComputeDivergence, Project, SolvePressure,
};
pub use thermal::{ApplyGravity, Buoyancy, Radiance};
pub use vorticity::{ApplyVorticity, ComputeVorticity};

use crate::store::FieldStore;

/// A unit of work in the per-tick pipeline.
///
/// A step reads committed buffers from the store, runs one or more kernel
/// passes, and commits what it wrote. Steps never hold grid state of their
/// own, so the pipeline can run them in any externally chosen fixed order.
pub trait SimulationStep: Send + Sync {
    /// Stable identifier used in trace output.
    fn name(&self) -> &'static str;

    /// Advance this effect by `dt` seconds.
    fn execute(&self, fields: &mut FieldStore, dt: f32);
}
