// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for decoding and decomposition.

use gridcover_index::GridError;
use thiserror::Error;

/// Failure to decode a geometry from its text form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// WKT parsing or conversion error.
    #[error("WKT parse error: {0}")]
    Wkt(String),
}

/// Why a geometry was skipped instead of decomposed.
///
/// These are soft failures: the decomposition of such a geometry is empty,
/// and one bad row never fails a batch.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    /// No geometry was supplied.
    #[error("geometry is null")]
    Missing,

    /// The geometry has no coordinates.
    #[error("geometry is empty")]
    Empty,

    /// The geometry is not a polygon or multipolygon.
    #[error("geometry is not a polygon: {0}")]
    NotPolygonal(&'static str),
}

/// Errors surfaced by a [`Session`][crate::Session].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Structural grid error (bad cell size, malformed envelope).
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The row's geometry text could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A row asked for a cell size other than the one the session was
    /// established with.
    #[error("session grid uses cell size {established}, row asked for {requested}")]
    CellSizeMismatch {
        /// Cell size fixed by the first row.
        established: f64,
        /// Cell size carried by the offending row.
        requested: f64,
    },
}
