// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate cell ranges.
//!
//! A geometry's envelope is buffered, its two corners are mapped to cell ids,
//! and every id between them is a candidate, provided its column falls inside
//! the column window derived from those two corners. The window is computed
//! once and applied to every row, so a narrow longitude band never turns into
//! a sweep across whole rows.
//!
//! The candidate set is a superset of the cells a geometry can overlap; the
//! classifier weeds out the rest.

use gridcover_index::{CellId, Envelope, GridSpec, Result};

/// Cell ids worth classifying for one envelope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CandidateRange {
    lower: u64,
    upper: u64,
    omit_left: u64,
    omit_right: u64,
    columns: u64,
}

impl CandidateRange {
    /// Compute the candidate range of `envelope` on `grid`, buffered by
    /// `buffer_cells` cells on every side.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`][gridcover_index::GridError::OutOfRange]
    /// if a corner of `envelope` lies outside the grid domain. Only the buffer
    /// is clamped to the domain, never the envelope itself.
    pub fn new(grid: &GridSpec, envelope: &Envelope, buffer_cells: u32) -> Result<Self> {
        grid.cell_id_of(envelope.min_lat, envelope.min_lon)?;
        grid.cell_id_of(envelope.max_lat, envelope.max_lon)?;

        let buffered = envelope.buffered(f64::from(buffer_cells) * grid.cell_size());
        let lower = grid.cell_id_of(buffered.min_lat, buffered.min_lon)?;
        let upper = grid.cell_id_of(buffered.max_lat, buffered.max_lon)?;

        // Clip to the cell limit.
        let last = grid.last_cell().get();
        let lower = lower.get().min(last);
        let upper = upper.get().min(last);

        let columns = grid.max_lon_cell();
        let omit_left = lower % columns;
        let mut omit_right = upper % columns;
        if omit_right == 0 {
            // An upper bound on a row boundary keeps the full width of the
            // rows before it.
            omit_right = columns;
        }

        Ok(Self {
            lower,
            upper,
            omit_left,
            omit_right,
            columns,
        })
    }

    /// First candidate id.
    #[inline]
    pub fn lower(&self) -> CellId {
        CellId::new(self.lower)
    }

    /// Last candidate id.
    #[inline]
    pub fn upper(&self) -> CellId {
        CellId::new(self.upper)
    }

    /// Inclusive column window `(omit_left, omit_right)` applied to every row.
    #[inline]
    pub fn column_window(&self) -> (u64, u64) {
        (self.omit_left, self.omit_right)
    }

    /// Whether `id` is a candidate.
    #[inline]
    pub fn contains(&self, id: CellId) -> bool {
        let col = id.get() % self.columns;
        (self.lower..=self.upper).contains(&id.get())
            && self.omit_left <= col
            && col <= self.omit_right
    }

    /// Iterate over the candidates in increasing id order.
    #[inline]
    pub fn iter(&self) -> Candidates {
        Candidates {
            next: self.lower,
            range: *self,
        }
    }
}

impl IntoIterator for &CandidateRange {
    type Item = CellId;
    type IntoIter = Candidates;

    fn into_iter(self) -> Candidates {
        self.iter()
    }
}

/// Iterator over a [`CandidateRange`].
///
/// Columns outside the window are skipped a row at a time rather than tested
/// one id at a time.
#[derive(Clone, Debug)]
pub struct Candidates {
    next: u64,
    range: CandidateRange,
}

impl Iterator for Candidates {
    type Item = CellId;

    fn next(&mut self) -> Option<CellId> {
        let r = &self.range;
        while self.next <= r.upper {
            let id = self.next;
            let col = id % r.columns;
            if col < r.omit_left {
                self.next = id - col + r.omit_left;
            } else if col > r.omit_right {
                self.next = id - col + r.columns + r.omit_left;
            } else {
                self.next = id + 1;
                return Some(CellId::new(id));
            }
        }
        None
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Only a size hint; saturates on targets with a narrow usize."
    )]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.range.upper + 1).saturating_sub(self.next);
        (0, Some(remaining.min(usize::MAX as u64) as usize))
    }
}

impl core::iter::FusedIterator for Candidates {}
