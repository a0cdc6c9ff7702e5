// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry engine abstraction used by the classifier.
//!
//! The decomposer never inspects coordinates itself. It asks a
//! [`GeometryEngine`] for an envelope, optionally for an accelerated form, and
//! then tests each candidate cell through [`CellPredicates`].

use gridcover_index::Envelope;

/// Spatial predicates between one geometry and a grid cell.
pub trait CellPredicates {
    /// Whether the cell and the geometry share interior area.
    ///
    /// Cells that only touch the geometry along an edge or at a corner do not
    /// intersect it.
    fn intersects(&self, cell: &Envelope) -> bool;

    /// Whether the geometry contains the whole cell. A shared boundary still
    /// counts as contained.
    fn contains(&self, cell: &Envelope) -> bool;
}

/// A geometry that can be decomposed into grid cells.
pub trait GeometryEngine: CellPredicates {
    /// Form used for repeated predicate queries against this geometry.
    ///
    /// Building it is a performance hint only: it must answer every query
    /// exactly as `Self` would.
    type Accelerated<'a>: CellPredicates
    where
        Self: 'a;

    /// Bounding envelope, or `None` when the geometry has no coordinates.
    fn envelope(&self) -> Option<Envelope>;

    /// Build the accelerated form.
    ///
    /// The result borrows `self` and is dropped at the end of the
    /// decomposition that built it.
    fn accelerate(&self) -> Self::Accelerated<'_>;
}

/// Rectangular region. Useful as a cheap stand-in for a real geometry.
impl CellPredicates for Envelope {
    fn intersects(&self, cell: &Self) -> bool {
        self.min_lat < cell.max_lat
            && cell.min_lat < self.max_lat
            && self.min_lon < cell.max_lon
            && cell.min_lon < self.max_lon
    }

    fn contains(&self, cell: &Self) -> bool {
        self.min_lat <= cell.min_lat
            && cell.max_lat <= self.max_lat
            && self.min_lon <= cell.min_lon
            && cell.max_lon <= self.max_lon
    }
}

impl GeometryEngine for Envelope {
    type Accelerated<'a> = Self;

    fn envelope(&self) -> Option<Self> {
        (!self.is_empty()).then_some(*self)
    }

    fn accelerate(&self) -> Self {
        *self
    }
}
