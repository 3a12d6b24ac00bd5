//! Field store: owned, enumerated field pairs
//!
//! The store owns one double-buffered [`FieldPair`] per field the solver
//! uses. Fields are addressed by the closed enums [`ScalarField`] and
//! [`VectorField`] rather than string names, so an unknown-field lookup is
//! a compile error instead of a runtime one, and the full set of fields is
//! fixed at construction.

use crate::field::{FieldBuffer, FieldPair};
use crate::vec2::Vec2;

/// Scalar fields held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    /// Combustible material per cell.
    Fuel,
    /// Heat per cell; drives ignition, buoyancy, and smoke emission.
    Temperature,
    /// Pressure solved each tick to make velocity divergence-free.
    Pressure,
    /// Visible smoke density emitted by burning cells.
    Smoke,
    /// Velocity divergence, input to the pressure solve.
    Divergence,
    /// Obstacle coverage written through the injection API.
    Obstacle,
    /// Obstacle coverage rasterized from externally registered shapes.
    SpriteObstacle,
}

impl ScalarField {
    /// All scalar fields, in storage order.
    pub const ALL: [Self; 7] = [
        Self::Fuel,
        Self::Temperature,
        Self::Pressure,
        Self::Smoke,
        Self::Divergence,
        Self::Obstacle,
        Self::SpriteObstacle,
    ];

    #[inline]
    fn index(self) -> usize {
        match self {
            Self::Fuel => 0,
            Self::Temperature => 1,
            Self::Pressure => 2,
            Self::Smoke => 3,
            Self::Divergence => 4,
            Self::Obstacle => 5,
            Self::SpriteObstacle => 6,
        }
    }
}

/// Two-component vector fields held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorField {
    /// Fluid velocity in cells per second.
    Velocity,
    /// Curl of velocity plus its magnitude, for vorticity confinement.
    Vorticity,
}

impl VectorField {
    /// All vector fields, in storage order.
    pub const ALL: [Self; 2] = [Self::Velocity, Self::Vorticity];

    #[inline]
    fn index(self) -> usize {
        match self {
            Self::Velocity => 0,
            Self::Vorticity => 1,
        }
    }
}

/// Owns every field pair over one square grid.
///
/// All buffers share the same resolution; a pass reads committed buffers
/// through [`scalar`](Self::scalar)/[`vector`](Self::vector) and commits
/// its output through [`update_scalar`](Self::update_scalar)/
/// [`update_vector`](Self::update_vector), which pair the kernel write with
/// exactly one buffer swap.
pub struct FieldStore {
    size: usize,
    scalars: Vec<FieldPair<f32>>,
    vectors: Vec<FieldPair<Vec2>>,
}

impl FieldStore {
    /// Allocate zero-initialized buffer pairs for every field.
    ///
    /// # Panics
    ///
    /// Panics if `size` is smaller than 3 cells; the boundary handling
    /// needs at least one interior cell.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size >= 3, "Grid must have at least one interior cell");
        Self {
            size,
            scalars: ScalarField::ALL
                .iter()
                .map(|_| FieldPair::new(size))
                .collect(),
            vectors: VectorField::ALL
                .iter()
                .map(|_| FieldPair::new(size))
                .collect(),
        }
    }

    /// Grid edge length in cells.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Committed buffer of a scalar field.
    #[must_use]
    pub fn scalar(&self, id: ScalarField) -> &FieldBuffer<f32> {
        self.scalars[id.index()].current()
    }

    /// Committed buffer of a vector field.
    #[must_use]
    pub fn vector(&self, id: VectorField) -> &FieldBuffer<Vec2> {
        self.vectors[id.index()].current()
    }

    /// Run one write pass against a scalar field.
    ///
    /// The operator receives the store (for reading any committed buffer)
    /// and the field's checked-out scratch buffer. When it returns, the
    /// scratch is committed by swapping, so the write observes the
    /// one-swap-per-write discipline by construction.
    pub fn update_scalar<F>(&mut self, id: ScalarField, op: F)
    where
        F: FnOnce(&Self, &mut FieldBuffer<f32>),
    {
        let mut out = self.scalars[id.index()].take_scratch();
        op(self, &mut out);
        let pair = &mut self.scalars[id.index()];
        pair.restore_scratch(out);
        pair.swap();
    }

    /// Run one write pass against a vector field. See
    /// [`update_scalar`](Self::update_scalar).
    pub fn update_vector<F>(&mut self, id: VectorField, op: F)
    where
        F: FnOnce(&Self, &mut FieldBuffer<Vec2>),
    {
        let mut out = self.vectors[id.index()].take_scratch();
        op(self, &mut out);
        let pair = &mut self.vectors[id.index()];
        pair.restore_scratch(out);
        pair.swap();
    }

    /// Reset both buffers of a scalar field to `value`.
    ///
    /// Iterative solves use this so their first pass starts from a known
    /// state in whichever buffer ends up being read.
    pub fn reset_scalar(&mut self, id: ScalarField, value: f32) {
        self.scalars[id.index()].fill(value);
    }

    /// Mutable access to a scalar field's committed buffer, for localized
    /// writes that do not go through a kernel pass.
    pub fn scalar_mut(&mut self, id: ScalarField) -> &mut FieldBuffer<f32> {
        self.scalars[id.index()].current_mut()
    }
}
