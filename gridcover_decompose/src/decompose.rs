// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell enumeration and classification.

use core::ops::ControlFlow;

use geo::Geometry;
use gridcover_index::{CellId, GridSpec, Result};

use crate::candidates::CandidateRange;
use crate::engine::{CellPredicates, GeometryEngine};
use crate::error::Unsupported;
use crate::options::DecomposeOptions;
use crate::region::Region;

/// One output row: a cell overlapping the geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRecord {
    /// The overlapping cell.
    pub cell: CellId,
    /// Whether the geometry covers the whole cell.
    pub fully_covered: bool,
}

/// Counters gathered while decomposing one geometry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DecomposeStats {
    /// Candidate cells classified.
    pub candidates: u64,
    /// Records emitted.
    pub emitted: u64,
    /// Emitted records with `fully_covered` set.
    pub fully_covered: u64,
    /// The callback asked to stop before the candidates ran out.
    pub stopped_early: bool,
}

/// Decomposes geometries into cells of one grid.
///
/// A `Decomposer` only borrows the grid, so any number of them, on any number
/// of threads, can share one [`GridSpec`]. All per-geometry state lives on the
/// stack of the call that decomposes that geometry.
#[derive(Copy, Clone, Debug)]
pub struct Decomposer<'g> {
    grid: &'g GridSpec,
    options: DecomposeOptions,
}

impl<'g> Decomposer<'g> {
    /// Create a decomposer with default options.
    pub fn new(grid: &'g GridSpec) -> Self {
        Self::with_options(grid, DecomposeOptions::default())
    }

    /// Create a decomposer with explicit options.
    pub fn with_options(grid: &'g GridSpec, options: DecomposeOptions) -> Self {
        Self { grid, options }
    }

    /// The grid cells are reported on.
    pub fn grid(&self) -> &'g GridSpec {
        self.grid
    }

    /// The options in effect.
    pub fn options(&self) -> &DecomposeOptions {
        &self.options
    }

    /// Validate a decoded geometry and apply the configured antimeridian
    /// handling.
    ///
    /// # Errors
    ///
    /// Returns [`Unsupported`] for a missing, empty, or non-polygonal
    /// geometry.
    pub fn region(
        &self,
        geometry: Option<&Geometry<f64>>,
    ) -> core::result::Result<Region, Unsupported> {
        let region = Region::from_geometry(geometry.ok_or(Unsupported::Missing)?)?;
        Ok(if self.options.wrap_antimeridian {
            region.wrap_antimeridian()
        } else {
            region
        })
    }

    /// Decompose a decoded geometry.
    ///
    /// Missing, empty, and non-polygonal geometries are logged and yield no
    /// records.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`][gridcover_index::GridError::OutOfRange]
    /// when the geometry reaches outside the grid domain.
    pub fn decompose(&self, geometry: Option<&Geometry<f64>>) -> Result<Vec<CellRecord>> {
        match self.region(geometry) {
            Ok(region) => self.cells(&region),
            Err(reason) => {
                tracing::warn!(%reason, "skipping geometry");
                Ok(Vec::new())
            }
        }
    }

    /// Collect every cell overlapping `geometry`, in increasing id order.
    ///
    /// # Errors
    ///
    /// See [`Decomposer::try_visit_cells`].
    pub fn cells<G: GeometryEngine>(&self, geometry: &G) -> Result<Vec<CellRecord>> {
        let mut out = Vec::new();
        self.visit_cells(geometry, |record| out.push(record))?;
        Ok(out)
    }

    /// Visit every cell overlapping `geometry` (does not allocate result
    /// storage).
    ///
    /// Calls `f(record)` for each cell, in increasing id order.
    ///
    /// # Errors
    ///
    /// See [`Decomposer::try_visit_cells`].
    pub fn visit_cells<G, F>(&self, geometry: &G, mut f: F) -> Result<DecomposeStats>
    where
        G: GeometryEngine,
        F: FnMut(CellRecord),
    {
        self.try_visit_cells(geometry, |record| {
            f(record);
            ControlFlow::Continue(())
        })
    }

    /// Visit cells overlapping `geometry` until `f` breaks.
    ///
    /// The walk can be abandoned between any two cells; records already
    /// handed to `f` stay valid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`][gridcover_index::GridError::OutOfRange]
    /// when the geometry's envelope reaches outside the grid domain. A geometry
    /// without an envelope, or with a zero-area one, is not an error and yields
    /// nothing.
    pub fn try_visit_cells<G, F>(&self, geometry: &G, f: F) -> Result<DecomposeStats>
    where
        G: GeometryEngine,
        F: FnMut(CellRecord) -> ControlFlow<()>,
    {
        let Some(envelope) = geometry.envelope() else {
            tracing::warn!("geometry has no envelope");
            return Ok(DecomposeStats::default());
        };
        if envelope.is_empty() {
            tracing::warn!(?envelope, "envelope is empty");
            return Ok(DecomposeStats::default());
        }

        tracing::debug!(
            min_lat = envelope.min_lat,
            max_lat = envelope.max_lat,
            min_lon = envelope.min_lon,
            max_lon = envelope.max_lon,
            "establishing cells enclosed by envelope"
        );
        let range = CandidateRange::new(self.grid, &envelope, self.options.buffer_cells)?;
        let (omit_left, omit_right) = range.column_window();
        tracing::debug!(
            lower = %range.lower(),
            upper = %range.upper(),
            omit_left,
            omit_right,
            "checking candidate cells"
        );

        let stats = if self.options.accelerate {
            let prepared = geometry.accelerate();
            self.classify(&range, &prepared, f)?
        } else {
            self.classify(&range, geometry, f)?
        };
        tracing::debug!(
            candidates = stats.candidates,
            emitted = stats.emitted,
            fully_covered = stats.fully_covered,
            "decomposition finished"
        );
        Ok(stats)
    }

    fn classify<P, F>(&self, range: &CandidateRange, predicates: &P, mut f: F) -> Result<DecomposeStats>
    where
        P: CellPredicates,
        F: FnMut(CellRecord) -> ControlFlow<()>,
    {
        let mut stats = DecomposeStats::default();
        for cell in range {
            stats.candidates += 1;
            let envelope = self.grid.cell_envelope(cell)?;
            if !predicates.intersects(&envelope) {
                continue;
            }
            let fully_covered = predicates.contains(&envelope);
            stats.emitted += 1;
            stats.fully_covered += u64::from(fully_covered);
            tracing::trace!(%cell, fully_covered, "cell overlaps geometry");

            if f(CellRecord {
                cell,
                fully_covered,
            })
            .is_break()
            {
                stats.stopped_early = true;
                break;
            }
        }
        Ok(stats)
    }
}
