// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for grid arithmetic.

use thiserror::Error;

/// Grid index errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// The cell size is not a usable grid parameter.
    #[error("invalid cell size {cell_size}: {reason}")]
    InvalidCellSize {
        /// The rejected cell size, in degrees.
        cell_size: f64,
        /// Which constraint it violates.
        reason: &'static str,
    },

    /// A coordinate lies outside `[-90, 90] x [-180, 180]`.
    #[error("coordinates out of range: lat={lat}, lon={lon}")]
    OutOfRange {
        /// Offending latitude.
        lat: f64,
        /// Offending longitude.
        lon: f64,
    },

    /// A cell id that does not exist on this grid.
    #[error("cell {id} is not on a grid of {cell_count} cells")]
    UnknownCell {
        /// Offending cell id.
        id: u64,
        /// Number of cells on the grid.
        cell_count: u64,
    },
}

/// Result type for grid operations.
pub type Result<T> = core::result::Result<T, GridError>;
