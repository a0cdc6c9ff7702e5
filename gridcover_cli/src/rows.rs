// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input rows and output records.

use std::io::{self, Write};

use clap::ValueEnum;
use gridcover_decompose::CellRecord;
use gridcover_index::CellId;
use serde::Serialize;

/// One geometry line of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Row<'a> {
    /// Caller-chosen key, echoed on every output record of the row.
    pub(crate) key: Option<&'a str>,
    /// Geometry text.
    pub(crate) wkt: &'a str,
}

impl<'a> Row<'a> {
    /// Split an input line into an optional key and its WKT.
    ///
    /// Blank lines and `#` comments yield `None`.
    pub(crate) fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            return None;
        }
        Some(match line.split_once('\t') {
            Some((key, wkt)) => Self {
                key: Some(key.trim()),
                wkt: wkt.trim(),
            },
            None => Self {
                key: None,
                wkt: line.trim(),
            },
        })
    }
}

/// Output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Tab-separated `key`, `cell`, `fully_covered`.
    #[default]
    Tsv,
    /// One JSON object per line.
    Json,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    key: &'a str,
    cell: CellId,
    fully_covered: bool,
}

/// Write the records of one row.
pub(crate) fn write_records<W: Write>(
    out: &mut W,
    format: OutputFormat,
    key: &str,
    records: &[CellRecord],
) -> io::Result<()> {
    for record in records {
        match format {
            OutputFormat::Tsv => {
                writeln!(out, "{key}\t{}\t{}", record.cell, record.fully_covered)?;
            }
            OutputFormat::Json => {
                let json = JsonRecord {
                    key,
                    cell: record.cell,
                    fully_covered: record.fully_covered,
                };
                serde_json::to_writer(&mut *out, &json)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}
