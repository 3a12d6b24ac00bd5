//! Full-grid kernel runner
//!
//! Every numerical operator in the pipeline is a pure per-cell function
//! over the store's current buffers. [`run`] evaluates one such operator
//! for every cell of a destination buffer, parallelized across rows with
//! Rayon. Cells are independent within a pass: operators read only
//! committed buffers and write only the destination, so parallel execution
//! cannot change results.

use crate::field::{CellValue, FieldBuffer};
use rayon::prelude::*;

/// Evaluate `op(x, y)` for every cell and write the result into `dst`.
///
/// The destination is overwritten in full; there are no partial writes.
pub fn run<T, F>(dst: &mut FieldBuffer<T>, op: F)
where
    T: CellValue,
    F: Fn(usize, usize) -> T + Sync,
{
    let width = dst.size();
    dst.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = op(x, y);
            }
        });
}

/// Run an operator that maps one source field through a per-cell function.
///
/// # Panics
///
/// Panics if source and destination dimensions differ; a shape mismatch is
/// a wiring bug, not a recoverable state.
pub fn map<T, U, F>(dst: &mut FieldBuffer<T>, src: &FieldBuffer<U>, op: F)
where
    T: CellValue,
    U: CellValue,
    F: Fn(U) -> T + Sync,
{
    assert_eq!(
        src.size(),
        dst.size(),
        "Kernel source and destination dimensions must match"
    );
    let width = dst.size();
    let src_data = src.as_slice();
    dst.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = op(src_data[y * width + x]);
            }
        });
}
