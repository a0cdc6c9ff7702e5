// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parallel decomposition of independent geometries.

use geo::Geometry;
use gridcover_index::Result;
use rayon::prelude::*;

use crate::decompose::{CellRecord, Decomposer};

/// Decompose every geometry on the rayon pool.
///
/// Each geometry is decomposed on its own, exactly as
/// [`Decomposer::decompose`] would; the results come back in input order.
/// Use [`rayon::ThreadPoolBuilder`] to bound the number of threads.
pub fn decompose_batch(
    decomposer: &Decomposer<'_>,
    geometries: &[Geometry<f64>],
) -> Vec<Result<Vec<CellRecord>>> {
    let results: Vec<_> = geometries
        .par_iter()
        .map(|geometry| decomposer.decompose(Some(geometry)))
        .collect();
    tracing::debug!(geometries = results.len(), "batch decomposed");
    results
}
