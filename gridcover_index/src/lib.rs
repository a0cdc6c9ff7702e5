// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gridcover Index: a fixed-size latitude/longitude grid with global cell ids.
//!
//! The grid partitions the WGS84 degree domain `[-90, 90] x [-180, 180]` into
//! square cells of a fixed size. Every cell is addressed by a single integer
//! [`CellId`], numbered row-major from the south-west corner.
//!
//! - Map a point to its cell with [`GridSpec::cell_id_of`].
//! - Map a cell back to its bounds with [`GridSpec::cell_envelope`].
//! - Split ids into rows and columns with [`GridSpec::row_col`].
//!
//! This crate is pure arithmetic and does not depend on any geometry crate.
//! Higher layers (like `gridcover_decompose`) compute geometry envelopes and
//! feed them here.
//!
//! ## Features
//!
//! - `serde`: derives `Serialize` for [`CellId`], [`Envelope`] and
//!   [`GridSpec`], and `Deserialize` for the first two.
//!
//! # Example
//!
//! ```rust
//! use gridcover_index::{CellId, Envelope, GridSpec};
//!
//! // Ten-degree cells: 36 columns by 18 rows.
//! let grid = GridSpec::new(10.0).unwrap();
//! assert_eq!(grid.cell_count(), 648);
//!
//! // The origin cell and the north-east corner.
//! assert_eq!(grid.cell_id_of(-90.0, -180.0).unwrap(), CellId::new(0));
//! assert_eq!(grid.cell_id_of(90.0, 180.0).unwrap(), grid.last_cell());
//!
//! // A point just north-east of the origin of the map.
//! let id = grid.cell_id_of(5.0, 5.0).unwrap();
//! assert_eq!(grid.row_col(id), (9, 18));
//! assert_eq!(grid.cell_envelope(id).unwrap(), Envelope::new(0.0, 10.0, 0.0, 10.0));
//! ```
//!
//! ### Float semantics
//!
//! Coordinates outside the domain, NaN included, are rejected rather than
//! clamped. Only points exactly on the northern or eastern domain edge are
//! folded into the last row or column.

mod error;
mod grid;
mod types;

pub use error::{GridError, Result};
pub use grid::{CellId, GridSpec};
pub use types::{Envelope, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
