// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decomposition configuration.

/// Knobs for a [`Decomposer`][crate::Decomposer].
///
/// None of these change which cells are reported for well-formed input,
/// except `wrap_antimeridian`, which decides how polygons with edges spanning
/// more than half the globe are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DecomposeOptions {
    /// Margin, in cells, added around the geometry envelope before the
    /// candidate range is computed. Guards against cells lost to rounding at
    /// cell edges. Default: 1
    pub buffer_cells: u32,

    /// Prepare the geometry once before classifying candidates.
    /// Only affects throughput. Default: true
    pub accelerate: bool,

    /// Split polygons whose edges cross the antimeridian into parts on
    /// either side of it. Default: true
    pub wrap_antimeridian: bool,
}

impl Default for DecomposeOptions {
    fn default() -> Self {
        Self {
            buffer_cells: 1,
            accelerate: true,
            wrap_antimeridian: true,
        }
    }
}

impl DecomposeOptions {
    /// Set the envelope margin in cells.
    pub fn with_buffer_cells(mut self, buffer_cells: u32) -> Self {
        self.buffer_cells = buffer_cells;
        self
    }

    /// Enable or disable geometry acceleration.
    pub fn with_accelerate(mut self, accelerate: bool) -> Self {
        self.accelerate = accelerate;
        self
    }

    /// Enable or disable antimeridian splitting.
    pub fn with_wrap_antimeridian(mut self, wrap_antimeridian: bool) -> Self {
        self.wrap_antimeridian = wrap_antimeridian;
        self
    }
}
