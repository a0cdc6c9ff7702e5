// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform latitude/longitude grid with a global linear cell id.
//!
//! The grid origin is the south-west corner of the domain, `(-90, -180)`.
//! Cells are numbered row-major: row 0 runs eastwards along the south pole,
//! and each following row lies one cell size further north.

use core::fmt;

use crate::error::{GridError, Result};
use crate::types::{Envelope, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Identifier of one cell on a [`GridSpec`].
///
/// The value is `row * max_lon_cell + col`; it is only meaningful relative to
/// the grid that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct CellId(u64);

impl CellId {
    /// Wrap a raw cell id.
    #[inline(always)]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw cell id.
    #[inline(always)]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<CellId> for u64 {
    #[inline]
    fn from(id: CellId) -> Self {
        id.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Grid parameters, fixed at construction.
///
/// A `GridSpec` is cheap to copy and immutable, so one instance can be shared
/// by reference across any number of concurrent decompositions.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GridSpec {
    cell_size: f64,
    max_lon_cell: u64,
    max_lat_cell: u64,
}

/// Number of whole cells along an axis of `extent` degrees.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Cell counts are floored; non-finite or huge ratios saturate and are rejected by the caller."
)]
#[inline]
fn axis_cells(extent: f64, cell_size: f64) -> u64 {
    (extent / cell_size).floor() as u64
}

/// Map a coordinate to its cell index along one axis, clamped to the last
/// valid index so that the far domain edge resolves to the final cell.
#[allow(
    clippy::cast_possible_truncation,
    reason = "The value was range-checked; the floored ratio is non-negative and clamped below."
)]
#[inline]
fn axis_coord(value: f64, origin: f64, cell_size: f64, cells: u64) -> u64 {
    let t = ((value - origin) / cell_size).floor();
    debug_assert!(t >= 0.0, "coordinate below the grid origin");
    (t as u64).min(cells - 1)
}

impl GridSpec {
    /// Create grid parameters for cells of `cell_size` degrees.
    ///
    /// Ratios that do not divide the domain evenly are accepted; the partial
    /// cells along the northern and eastern edges are simply not part of the
    /// grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidCellSize`] when `cell_size` is not finite,
    /// not positive, wider than the latitude span, or so small that the cell
    /// count does not fit in a `u64`.
    pub fn new(cell_size: f64) -> Result<Self> {
        let invalid = |reason| GridError::InvalidCellSize { cell_size, reason };

        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(invalid("must be a positive, finite number of degrees"));
        }
        if cell_size > MAX_LAT - MIN_LAT {
            return Err(invalid("must not exceed 180 degrees"));
        }

        let max_lon_cell = axis_cells(MAX_LON - MIN_LON, cell_size);
        let max_lat_cell = axis_cells(MAX_LAT - MIN_LAT, cell_size);
        if max_lon_cell.checked_mul(max_lat_cell).is_none() {
            return Err(invalid("too small, the cell count overflows"));
        }

        Ok(Self {
            cell_size,
            max_lon_cell,
            max_lat_cell,
        })
    }

    /// Cell size in degrees.
    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of cells per row (columns), `floor(360 / cell_size)`.
    #[inline]
    pub fn max_lon_cell(&self) -> u64 {
        self.max_lon_cell
    }

    /// Number of rows, `floor(180 / cell_size)`.
    #[inline]
    pub fn max_lat_cell(&self) -> u64 {
        self.max_lat_cell
    }

    /// Total number of cells on the grid.
    #[inline]
    pub fn cell_count(&self) -> u64 {
        self.max_lon_cell * self.max_lat_cell
    }

    /// The highest valid cell id.
    #[inline]
    pub fn last_cell(&self) -> CellId {
        CellId(self.cell_count() - 1)
    }

    /// Cell containing the point `(lat, lon)`.
    ///
    /// Points on a shared cell edge belong to the cell to their north/east,
    /// except on the northern and eastern domain edges (`lat == 90`,
    /// `lon == 180`), which resolve to the last row/column.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`] if `lat` is outside `[-90, 90]` or
    /// `lon` is outside `[-180, 180]`, NaN included.
    pub fn cell_id_of(&self, lat: f64, lon: f64) -> Result<CellId> {
        if !(MIN_LAT..=MAX_LAT).contains(&lat) || !(MIN_LON..=MAX_LON).contains(&lon) {
            return Err(GridError::OutOfRange { lat, lon });
        }

        let row = axis_coord(lat, MIN_LAT, self.cell_size, self.max_lat_cell);
        let col = axis_coord(lon, MIN_LON, self.cell_size, self.max_lon_cell);
        let id = (row * self.max_lon_cell + col).min(self.cell_count() - 1);
        Ok(CellId(id))
    }

    /// Split a cell id into `(row, col)`.
    #[inline]
    pub fn row_col(&self, id: CellId) -> (u64, u64) {
        (id.0 / self.max_lon_cell, id.0 % self.max_lon_cell)
    }

    /// Geographic bounds of a cell.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownCell`] if `id` is not on this grid.
    pub fn cell_envelope(&self, id: CellId) -> Result<Envelope> {
        if id.0 >= self.cell_count() {
            return Err(GridError::UnknownCell {
                id: id.0,
                cell_count: self.cell_count(),
            });
        }
        let (row, col) = self.row_col(id);
        let min_lon = MIN_LON + col as f64 * self.cell_size;
        let min_lat = MIN_LAT + row as f64 * self.cell_size;
        Ok(Envelope::new(
            min_lat,
            min_lat + self.cell_size,
            min_lon,
            min_lon + self.cell_size,
        ))
    }
}
