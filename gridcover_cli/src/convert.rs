// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input to output: decode rows, decompose them in parallel chunks, write
//! records.

use std::io::{BufRead, Write};
use std::num::NonZeroUsize;
use std::path::Path;

use geo::Geometry;
use gridcover_decompose::{Decomposer, decompose_batch, parse_wkt};
use tracing::{debug, info, warn};

use crate::error::CliError;
use crate::rows::{OutputFormat, Row, write_records};

/// Row counts for the end-of-run summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Summary {
    /// Geometry rows read.
    pub(crate) rows: usize,
    /// Rows that produced no output because they failed.
    pub(crate) skipped: usize,
    /// Records written.
    pub(crate) records: usize,
}

/// Streams rows from input to output, a chunk at a time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Converter<'a> {
    pub(crate) decomposer: &'a Decomposer<'a>,
    pub(crate) format: OutputFormat,
    /// Geometry rows decoded before a batch is decomposed and written.
    pub(crate) chunk_size: NonZeroUsize,
}

impl Converter<'_> {
    /// Decode the rows of `input`, decompose them, and write the records in
    /// input order. `source` names the input in error messages (`None` for
    /// stdin).
    ///
    /// At most `chunk_size` decoded geometries are held at once: each chunk is
    /// decomposed on the worker pool, written and flushed before more input is
    /// read. Rows that fail to decode, or reach outside the grid, are logged
    /// and skipped. Rows without a key are keyed by their line number.
    pub(crate) fn convert<R: BufRead, W: Write>(
        &self,
        input: R,
        source: Option<&Path>,
        output: &mut W,
    ) -> Result<Summary, CliError> {
        let mut summary = Summary::default();
        let mut keys = Vec::with_capacity(self.chunk_size.get());
        let mut geometries = Vec::with_capacity(self.chunk_size.get());
        for (index, line) in input.lines().enumerate() {
            let line = line.map_err(|error| CliError::Input {
                path: source.map(Path::to_path_buf),
                error,
            })?;
            let line_no = index + 1;
            let Some(row) = Row::parse(&line) else {
                continue;
            };
            summary.rows += 1;
            match parse_wkt(row.wkt) {
                Ok(geometry) => {
                    keys.push(row.key.map_or_else(|| line_no.to_string(), str::to_owned));
                    geometries.push(geometry);
                }
                Err(e) => {
                    warn!(line = line_no, error = %e, "skipping row");
                    summary.skipped += 1;
                }
            }
            if geometries.len() >= self.chunk_size.get() {
                self.flush_chunk(&mut keys, &mut geometries, output, &mut summary)?;
            }
        }
        self.flush_chunk(&mut keys, &mut geometries, output, &mut summary)?;

        info!(
            rows = summary.rows,
            skipped = summary.skipped,
            records = summary.records,
            "decomposition complete"
        );
        Ok(summary)
    }

    /// Decompose and write the buffered rows, leaving both buffers empty.
    fn flush_chunk<W: Write>(
        &self,
        keys: &mut Vec<String>,
        geometries: &mut Vec<Geometry<f64>>,
        output: &mut W,
        summary: &mut Summary,
    ) -> Result<(), CliError> {
        if geometries.is_empty() {
            return Ok(());
        }
        let results = decompose_batch(self.decomposer, geometries);
        for (key, result) in keys.drain(..).zip(results) {
            match result {
                Ok(records) => {
                    write_records(output, self.format, &key, &records)
                        .map_err(CliError::Output)?;
                    summary.records += records.len();
                }
                Err(e) => {
                    warn!(%key, error = %e, "skipping row");
                    summary.skipped += 1;
                }
            }
        }
        debug!(rows = geometries.len(), "chunk written");
        geometries.clear();
        output.flush().map_err(CliError::Output)
    }
}
