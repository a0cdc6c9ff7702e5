// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gridcover Decompose: polygons to grid cells.
//!
//! Given a [`GridSpec`][gridcover_index::GridSpec] and a polygonal geometry,
//! find every grid cell whose interior overlaps the geometry's interior, and
//! tell for each whether the geometry covers it completely.
//!
//! - [`Decomposer`] walks the candidate cells around a geometry's envelope and
//!   classifies each one. Results come back in increasing cell id order, with
//!   no duplicates.
//! - [`GeometryEngine`] and [`CellPredicates`] are the seam to the geometry
//!   library. [`Region`] implements them on top of `geo`, and a plain
//!   [`Envelope`][gridcover_index::Envelope] implements them as a rectangle.
//! - [`Session`] fixes the grid on its first row and decomposes the rest with
//!   it, for hosts that supply the cell size with every row.
//! - [`parse_wkt`] decodes text geometries.
//!
//! Cells that only share an edge or a corner with a geometry are not reported.
//! Polygons whose edges cross the antimeridian are split at ±180 before
//! decomposition unless [`DecomposeOptions::wrap_antimeridian`] is turned off.
//!
//! ## Features
//!
//! - `parallel` *(default)*: [`decompose_batch`] decomposes many geometries
//!   on the `rayon` thread pool.
//! - `serde`: derives serialization for [`CellRecord`] and
//!   [`DecomposeOptions`].
//!
//! # Example
//!
//! ```rust
//! use gridcover_decompose::{Decomposer, parse_wkt};
//! use gridcover_index::{CellId, GridSpec};
//!
//! let grid = GridSpec::new(1.0).unwrap();
//! let square = parse_wkt("POLYGON((-1 -1, 1 -1, 1 1, -1 1, -1 -1))").unwrap();
//!
//! let records = Decomposer::new(&grid).decompose(Some(&square)).unwrap();
//! let cells: Vec<_> = records.iter().map(|r| r.cell).collect();
//! assert_eq!(
//!     cells,
//!     [32219, 32220, 32579, 32580].map(CellId::new).to_vec()
//! );
//! assert!(records.iter().all(|r| r.fully_covered));
//! ```
//!
//! Walking the cells without collecting them, and stopping early:
//!
//! ```rust
//! use core::ops::ControlFlow;
//! use gridcover_decompose::Decomposer;
//! use gridcover_index::{Envelope, GridSpec};
//!
//! let grid = GridSpec::new(10.0).unwrap();
//! let block = Envelope::new(-30.0, 30.0, -30.0, 30.0);
//!
//! let mut first = None;
//! let stats = Decomposer::new(&grid)
//!     .try_visit_cells(&block, |record| {
//!         first = Some(record.cell);
//!         ControlFlow::Break(())
//!     })
//!     .unwrap();
//! assert!(stats.stopped_early);
//! assert_eq!(first, grid.cell_id_of(-25.0, -25.0).ok());
//! ```

mod candidates;
mod decode;
mod decompose;
mod engine;
mod error;
mod options;
mod region;
mod session;

#[cfg(feature = "parallel")]
mod batch;

pub use candidates::{CandidateRange, Candidates};
pub use decode::parse_wkt;
pub use decompose::{CellRecord, DecomposeStats, Decomposer};
pub use engine::{CellPredicates, GeometryEngine};
pub use error::{DecodeError, SessionError, Unsupported};
pub use options::DecomposeOptions;
pub use region::{PreparedRegion, Region};
pub use session::Session;

#[cfg(feature = "parallel")]
pub use batch::decompose_batch;
