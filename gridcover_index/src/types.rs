// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geographic envelope type and domain constants.

use core::cmp::Ordering;

/// Southern edge of the grid domain, in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Northern edge of the grid domain, in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Western edge of the grid domain (the antimeridian), in degrees.
pub const MIN_LON: f64 = -180.0;
/// Eastern edge of the grid domain (the antimeridian), in degrees.
pub const MAX_LON: f64 = 180.0;

/// Axis-aligned bounding box in latitude/longitude degrees.
///
/// Plain data; whether two boxes overlap is left to the decomposition layer,
/// which only counts shared interior as overlap.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    /// Minimum latitude (south)
    pub min_lat: f64,
    /// Maximum latitude (north)
    pub max_lat: f64,
    /// Minimum longitude (west)
    pub min_lon: f64,
    /// Maximum longitude (east)
    pub max_lon: f64,
}

impl Envelope {
    /// The whole grid domain, `[-90, 90] x [-180, 180]`.
    pub const DOMAIN: Self = Self::new(MIN_LAT, MAX_LAT, MIN_LON, MAX_LON);

    /// Create a new envelope from its latitude and longitude bounds.
    #[inline(always)]
    pub const fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Return true if the envelope has no area: inverted, zero-width, or
    /// carrying a NaN bound.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !matches!(
            self.max_lat.partial_cmp(&self.min_lat),
            Some(Ordering::Greater)
        ) || !matches!(
            self.max_lon.partial_cmp(&self.min_lon),
            Some(Ordering::Greater)
        )
    }

    /// The center point as `(lat, lon)`.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            0.5 * (self.min_lat + self.max_lat),
            0.5 * (self.min_lon + self.max_lon),
        )
    }

    /// Grow the envelope by `margin` degrees on every side, clamped to the
    /// grid domain.
    #[inline]
    pub fn buffered(&self, margin: f64) -> Self {
        Self {
            min_lat: (self.min_lat - margin).max(MIN_LAT),
            max_lat: (self.max_lat + margin).min(MAX_LAT),
            min_lon: (self.min_lon - margin).max(MIN_LON),
            max_lon: (self.max_lon + margin).min(MAX_LON),
        }
    }
}
