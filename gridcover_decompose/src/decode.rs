// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry decoding from Well-Known Text.

use core::str::FromStr;

use geo::Geometry;

use crate::error::DecodeError;

/// Parse a WKT string into a `geo` geometry.
///
/// Any geometry kind is accepted here; whether it can be decomposed is decided
/// later by [`Region::from_geometry`][crate::Region::from_geometry].
///
/// # Errors
///
/// Returns [`DecodeError::Wkt`] for malformed text or for WKT that has no
/// `geo` counterpart (like an empty point).
pub fn parse_wkt(text: &str) -> Result<Geometry<f64>, DecodeError> {
    let parsed =
        wkt::Wkt::<f64>::from_str(text.trim()).map_err(|e| DecodeError::Wkt(e.to_string()))?;
    parsed
        .try_into()
        .map_err(|e: wkt::conversion::Error| DecodeError::Wkt(format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_polygons_and_multipolygons() {
        let polygon = parse_wkt("POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))").unwrap();
        assert!(matches!(polygon, Geometry::Polygon(_)));

        let multi =
            parse_wkt("MULTIPOLYGON(((0 0, 1 0, 1 1, 0 0)), ((5 5, 6 5, 6 6, 5 5)))").unwrap();
        match multi {
            Geometry::MultiPolygon(polygons) => assert_eq!(polygons.0.len(), 2),
            other => panic!("expected a multipolygon, got {other:?}"),
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let point = parse_wkt("  POINT(3 4)\n").unwrap();
        assert!(matches!(point, Geometry::Point(_)));
    }

    #[test]
    fn malformed_text_is_rejected() {
        for text in ["", "POLYGON((0 0, 1 0", "CIRCLE(0 0, 1)", "not wkt at all"] {
            assert!(
                matches!(parse_wkt(text), Err(DecodeError::Wkt(_))),
                "{text:?} decoded"
            );
        }
    }
}
