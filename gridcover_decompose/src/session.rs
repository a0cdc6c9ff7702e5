// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-facing entry point for row-at-a-time decomposition.

use std::sync::OnceLock;

use geo::Geometry;
use gridcover_index::GridSpec;

use crate::decode::parse_wkt;
use crate::decompose::{CellRecord, Decomposer};
use crate::error::SessionError;
use crate::options::DecomposeOptions;

/// A run of decompositions sharing one grid.
///
/// Hosts that hand over a cell size with every row use a `Session`: the grid
/// is built from the first row's cell size and reused for the rest. A later
/// row with a different cell size is rejected.
///
/// Sessions are `Sync`; rows may be processed from several threads.
#[derive(Debug, Default)]
pub struct Session {
    grid: OnceLock<GridSpec>,
    options: DecomposeOptions,
}

impl Session {
    /// Create a session whose grid is set by the first row.
    pub fn new(options: DecomposeOptions) -> Self {
        Self {
            grid: OnceLock::new(),
            options,
        }
    }

    /// Create a session with its grid already established.
    pub fn with_grid(grid: GridSpec, options: DecomposeOptions) -> Self {
        Self {
            grid: OnceLock::from(grid),
            options,
        }
    }

    /// The grid, once established.
    pub fn grid(&self) -> Option<&GridSpec> {
        self.grid.get()
    }

    /// The options every row is decomposed with.
    pub fn options(&self) -> &DecomposeOptions {
        &self.options
    }

    /// Decompose one row.
    ///
    /// A missing, empty, or non-polygonal geometry yields no records.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Grid`] if `cell_size` is invalid or the geometry
    ///   reaches outside the grid domain.
    /// - [`SessionError::CellSizeMismatch`] if the session was established
    ///   with another cell size.
    pub fn process(
        &self,
        cell_size: f64,
        geometry: Option<&Geometry<f64>>,
    ) -> Result<Vec<CellRecord>, SessionError> {
        let grid = self.establish(cell_size)?;
        Ok(Decomposer::with_options(grid, self.options).decompose(geometry)?)
    }

    /// Decode a WKT row and decompose it.
    ///
    /// # Errors
    ///
    /// As [`Session::process`], plus [`SessionError::Decode`] for text that is
    /// not valid WKT.
    pub fn process_wkt(
        &self,
        cell_size: f64,
        text: &str,
    ) -> Result<Vec<CellRecord>, SessionError> {
        let grid = self.establish(cell_size)?;
        let geometry = parse_wkt(text)?;
        Ok(Decomposer::with_options(grid, self.options).decompose(Some(&geometry))?)
    }

    fn establish(&self, cell_size: f64) -> Result<&GridSpec, SessionError> {
        let grid = match self.grid.get() {
            Some(grid) => grid,
            None => {
                let candidate = GridSpec::new(cell_size)?;
                let grid = self.grid.get_or_init(|| candidate);
                tracing::debug!(
                    cell_size = grid.cell_size(),
                    columns = grid.max_lon_cell(),
                    rows = grid.max_lat_cell(),
                    "session grid established"
                );
                grid
            }
        };
        if grid.cell_size() == cell_size {
            Ok(grid)
        } else {
            Err(SessionError::CellSizeMismatch {
                established: grid.cell_size(),
                requested: cell_size,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use gridcover_index::GridError;

    fn square() -> Geometry<f64> {
        Geometry::Polygon(polygon![
            (x: -1.0, y: -1.0),
            (x: 1.0, y: -1.0),
            (x: 1.0, y: 1.0),
            (x: -1.0, y: 1.0),
        ])
    }

    #[test]
    fn first_row_establishes_the_grid() {
        let session = Session::default();
        assert!(session.grid().is_none(), "grid set before any row");

        let records = session.process(1.0, Some(&square())).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(session.grid().map(GridSpec::cell_size), Some(1.0));

        // The same cell size keeps working.
        assert_eq!(session.process(1.0, Some(&square())).unwrap(), records);
    }

    #[test]
    fn later_rows_cannot_change_the_cell_size() {
        let grid = GridSpec::new(10.0).unwrap();
        let session = Session::with_grid(grid, DecomposeOptions::default());
        assert_eq!(
            session.process(5.0, Some(&square())),
            Err(SessionError::CellSizeMismatch {
                established: 10.0,
                requested: 5.0
            })
        );
    }

    #[test]
    fn invalid_cell_size_leaves_the_session_open() {
        let session = Session::default();
        assert!(matches!(
            session.process(0.0, Some(&square())),
            Err(SessionError::Grid(GridError::InvalidCellSize { .. }))
        ));
        assert!(session.grid().is_none(), "bad row established the grid");
        assert!(session.process(2.0, Some(&square())).is_ok());
    }

    #[test]
    fn missing_geometry_is_not_an_error() {
        let session = Session::default();
        assert_eq!(session.process(1.0, None), Ok(vec![]));
    }

    #[test]
    fn wkt_rows_are_decoded() {
        let session = Session::default();
        let records = session
            .process_wkt(1.0, "POLYGON((-1 -1, 1 -1, 1 1, -1 1, -1 -1))")
            .unwrap();
        assert_eq!(records, session.process(1.0, Some(&square())).unwrap());

        assert!(matches!(
            session.process_wkt(1.0, "POLYGON((-1 -1"),
            Err(SessionError::Decode(_))
        ));
        assert_eq!(session.process_wkt(1.0, "POINT(1 1)"), Ok(vec![]));
    }

    #[test]
    fn rows_from_many_threads_share_one_grid() {
        let session = Session::default();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    assert_eq!(session.process(1.0, Some(&square())).unwrap().len(), 4);
                });
            }
        });
        assert_eq!(session.grid().map(GridSpec::cell_size), Some(1.0));
    }
}
