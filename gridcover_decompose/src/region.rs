// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygonal regions backed by the `geo` crate.
//!
//! [`Region`] is the validated input of a decomposition: a non-empty
//! multipolygon in WGS84 degrees. It implements [`GeometryEngine`] with
//! DE-9IM predicates, and accelerates through [`PreparedGeometry`].
//!
//! ## Antimeridian
//!
//! Two successive ring vertices more than 180 degrees of longitude apart are
//! read as joined the short way round, across the antimeridian. Vertices lying
//! on ±180 are skipped when comparing, so a ring may cross through a `180`
//! vertex; such a vertex takes the sign of the side it is reached from.
//! [`Region::wrap_antimeridian`] unwraps these polygons and splits them at ±180
//! into parts that each lie inside the grid domain.
//!
//! This changes how a polygon with a planar edge wider than 180 degrees is
//! read: `POLYGON((-100 0, 100 0, 100 10, -100 10, -100 0))` becomes the band
//! from 100 east to 100 west across the antimeridian, not the band through
//! Greenwich. Turn wrapping off to read rings literally. Rings whose vertices
//! all lie on ±180 (as in a whole-globe polygon) never cross.

use core::fmt;

use geo::{
    BooleanOps, BoundingRect, Coord, Geometry, HasDimensions, LineString, MultiPolygon, Polygon,
    PreparedGeometry, Rect, Relate,
};
use gridcover_index::{Envelope, MAX_LON};
use smallvec::SmallVec;

use crate::engine::{CellPredicates, GeometryEngine};
use crate::error::Unsupported;

const FULL_TURN: f64 = 360.0;
const HALF_TURN: f64 = 180.0;

/// A validated polygon or multipolygon.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    polygons: MultiPolygon<f64>,
}

impl Region {
    /// Accept a polygon or multipolygon.
    ///
    /// # Errors
    ///
    /// Returns [`Unsupported`] for empty or non-polygonal geometries.
    pub fn from_geometry(geometry: &Geometry<f64>) -> Result<Self, Unsupported> {
        let polygons = match geometry {
            Geometry::Polygon(polygon) => MultiPolygon::new(vec![polygon.clone()]),
            Geometry::MultiPolygon(polygons) => polygons.clone(),
            other => return Err(Unsupported::NotPolygonal(kind_name(other))),
        };
        Self::from_polygons(polygons)
    }

    /// Accept a multipolygon.
    ///
    /// # Errors
    ///
    /// Returns [`Unsupported::Empty`] when no polygon carries coordinates.
    pub fn from_polygons(polygons: MultiPolygon<f64>) -> Result<Self, Unsupported> {
        if HasDimensions::is_empty(&polygons) {
            return Err(Unsupported::Empty);
        }
        Ok(Self { polygons })
    }

    /// The underlying multipolygon.
    pub fn polygons(&self) -> &MultiPolygon<f64> {
        &self.polygons
    }

    /// Whether any ring crosses the antimeridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.polygons.iter().any(polygon_crosses_antimeridian)
    }

    /// Split every polygon that crosses the antimeridian into parts on either
    /// side of it. Polygons that do not cross are kept as they are.
    ///
    /// Polygons that wind around a pole cannot be split into parts on the
    /// grid and are kept unchanged.
    pub fn wrap_antimeridian(self) -> Self {
        if !self.crosses_antimeridian() {
            return self;
        }

        let mut parts = Vec::with_capacity(self.polygons.0.len() + 1);
        for polygon in self.polygons {
            if !polygon_crosses_antimeridian(&polygon) {
                parts.push(polygon);
                continue;
            }
            match split_at_antimeridian(&polygon) {
                Some(split) => {
                    tracing::debug!(parts = split.len(), "split polygon at the antimeridian");
                    parts.extend(split);
                }
                None => {
                    tracing::warn!("polygon winds around a pole, left unsplit");
                    parts.push(polygon);
                }
            }
        }
        Self {
            polygons: MultiPolygon::new(parts),
        }
    }
}

impl CellPredicates for Region {
    fn intersects(&self, cell: &Envelope) -> bool {
        let matrix = self.polygons.relate(&cell_polygon(cell));
        matrix.is_intersects() && !matrix.is_touches()
    }

    fn contains(&self, cell: &Envelope) -> bool {
        self.polygons.relate(&cell_polygon(cell)).is_contains()
    }
}

impl GeometryEngine for Region {
    type Accelerated<'a> = PreparedRegion<'a>;

    fn envelope(&self) -> Option<Envelope> {
        self.polygons.bounding_rect().map(envelope_of)
    }

    fn accelerate(&self) -> PreparedRegion<'_> {
        PreparedRegion {
            prepared: PreparedGeometry::from(&self.polygons),
        }
    }
}

/// A [`Region`] with its edge index built, for repeated cell queries.
pub struct PreparedRegion<'a> {
    prepared: PreparedGeometry<'a, &'a MultiPolygon<f64>>,
}

impl fmt::Debug for PreparedRegion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedRegion").finish_non_exhaustive()
    }
}

impl CellPredicates for PreparedRegion<'_> {
    fn intersects(&self, cell: &Envelope) -> bool {
        let matrix = self.prepared.relate(&cell_polygon(cell));
        matrix.is_intersects() && !matrix.is_touches()
    }

    fn contains(&self, cell: &Envelope) -> bool {
        self.prepared.relate(&cell_polygon(cell)).is_contains()
    }
}

fn cell_polygon(cell: &Envelope) -> Polygon<f64> {
    Rect::new(
        Coord {
            x: cell.min_lon,
            y: cell.min_lat,
        },
        Coord {
            x: cell.max_lon,
            y: cell.max_lat,
        },
    )
    .to_polygon()
}

fn envelope_of(rect: Rect<f64>) -> Envelope {
    Envelope::new(rect.min().y, rect.max().y, rect.min().x, rect.max().x)
}

fn kind_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

fn on_antimeridian(c: Coord<f64>) -> bool {
    c.x.abs() >= MAX_LON
}

/// Whether two successive vertices off the antimeridian are more than half a
/// turn apart. Vertices on ±180 between them are skipped, so a ring passing
/// through a 180 vertex still counts as crossing.
fn ring_crosses_antimeridian(ring: &LineString<f64>) -> bool {
    let mut regular = ring.coords().filter(|c| !on_antimeridian(**c));
    let Some(mut prev) = regular.next() else {
        return false;
    };
    regular.any(|c| {
        let jump = (c.x - prev.x).abs() > HALF_TURN;
        prev = c;
        jump
    })
}

fn polygon_crosses_antimeridian(polygon: &Polygon<f64>) -> bool {
    core::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .any(ring_crosses_antimeridian)
}

/// Give every ±180 vertex sitting at a crossing the sign of the vertex before
/// it, so `180` and `-180` read as the same meridian. Other ±180 vertices are
/// left alone.
fn snap_antimeridian_vertices(ring: &LineString<f64>) -> Vec<Coord<f64>> {
    let mut out = ring.0.clone();
    let closed = ring.is_closed() && out.len() > 1;
    let n = if closed { out.len() - 1 } else { out.len() };
    let vertices = &ring.0[..n];
    let regular_at = |i: usize| Some(vertices[i % n]).filter(|c| !on_antimeridian(*c));

    for (i, vertex) in vertices.iter().enumerate() {
        if !on_antimeridian(*vertex) {
            continue;
        }
        let prev = (1..n).find_map(|k| regular_at(i + n - k));
        let next = (1..n).find_map(|k| regular_at(i + k));
        if let (Some(p), Some(q)) = (prev, next)
            && (q.x - p.x).abs() > HALF_TURN
        {
            out[i].x = MAX_LON.copysign(p.x);
        }
    }
    if closed {
        out[n] = out[0];
    }
    out
}

/// Make a ring continuous in longitude by shifting every vertex that follows
/// an antimeridian crossing by a full turn. Returns `None` when the ring does
/// not come back to its starting frame, i.e. it winds around a pole.
fn unwrap_ring(ring: &LineString<f64>) -> Option<LineString<f64>> {
    let mut offset = 0.0;
    let mut anchor: Option<f64> = None;
    let snapped = snap_antimeridian_vertices(ring);
    let mut coords = Vec::with_capacity(snapped.len());
    for c in snapped {
        if !on_antimeridian(c) {
            if let Some(a) = anchor
                && (c.x - a).abs() > HALF_TURN
            {
                offset += if c.x < a { FULL_TURN } else { -FULL_TURN };
            }
            anchor = Some(c.x);
        }
        coords.push(Coord {
            x: c.x + offset,
            y: c.y,
        });
    }
    (offset == 0.0).then(|| LineString::new(coords))
}

/// Shift a ring by whole turns so its first vertex lands in
/// `[west, west + 360)`.
fn align_ring(ring: LineString<f64>, west: f64) -> LineString<f64> {
    let Some(first) = ring.0.first() else {
        return ring;
    };
    let turns = ((first.x - west) / FULL_TURN).floor();
    if turns == 0.0 {
        return ring;
    }
    let shift = -turns * FULL_TURN;
    LineString::new(
        ring.0
            .into_iter()
            .map(|c| Coord {
                x: c.x + shift,
                y: c.y,
            })
            .collect(),
    )
}

fn shift_polygon(polygon: &Polygon<f64>, dx: f64) -> Polygon<f64> {
    let shift = |ring: &LineString<f64>| {
        LineString::new(
            ring.coords()
                .map(|c| Coord {
                    x: c.x + dx,
                    y: c.y,
                })
                .collect(),
        )
    };
    Polygon::new(
        shift(polygon.exterior()),
        polygon.interiors().iter().map(shift).collect(),
    )
}

/// Unwrap a polygon across the antimeridian and cut it into the pieces that
/// fall in each 360-degree window, shifted back into `[-180, 180]`.
fn split_at_antimeridian(polygon: &Polygon<f64>) -> Option<SmallVec<[Polygon<f64>; 2]>> {
    let exterior = unwrap_ring(polygon.exterior())?;
    let bounds = exterior.bounding_rect()?;
    let west = bounds.min().x;
    let interiors = polygon
        .interiors()
        .iter()
        .map(|ring| unwrap_ring(ring).map(|ring| align_ring(ring, west)))
        .collect::<Option<Vec<_>>>()?;
    let unwrapped = Polygon::new(exterior, interiors);

    let mut parts = SmallVec::new();
    for turn in [-1.0, 0.0, 1.0] {
        let window_west = -MAX_LON + turn * FULL_TURN;
        let window_east = MAX_LON + turn * FULL_TURN;
        if bounds.max().x <= window_west || bounds.min().x >= window_east {
            continue;
        }
        let window = Rect::new(
            Coord {
                x: window_west,
                y: bounds.min().y,
            },
            Coord {
                x: window_east,
                y: bounds.max().y,
            },
        )
        .to_polygon();
        for piece in unwrapped.intersection(&window) {
            if !HasDimensions::is_empty(&piece) {
                parts.push(shift_polygon(&piece, -turn * FULL_TURN));
            }
        }
    }
    Some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, LineString, Point, polygon};

    fn square(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon<f64> {
        polygon![
            (x: min_x, y: min_y),
            (x: max_x, y: min_y),
            (x: max_x, y: max_y),
            (x: min_x, y: max_y),
        ]
    }

    #[test]
    fn accepts_polygons_and_multipolygons() {
        let poly = Geometry::Polygon(square(0.0, 0.0, 1.0, 1.0));
        let region = Region::from_geometry(&poly).unwrap();
        assert_eq!(region.polygons().0.len(), 1);

        let multi = Geometry::MultiPolygon(MultiPolygon::new(vec![
            square(0.0, 0.0, 1.0, 1.0),
            square(5.0, 5.0, 6.0, 6.0),
        ]));
        let region = Region::from_geometry(&multi).unwrap();
        assert_eq!(
            region.envelope(),
            Some(Envelope::new(0.0, 6.0, 0.0, 6.0))
        );
    }

    #[test]
    fn rejects_empty_and_non_polygonal_geometries() {
        let point = Geometry::Point(Point::new(1.0, 2.0));
        assert_eq!(
            Region::from_geometry(&point),
            Err(Unsupported::NotPolygonal("Point"))
        );

        let line = Geometry::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]));
        assert_eq!(
            Region::from_geometry(&line),
            Err(Unsupported::NotPolygonal("LineString"))
        );

        let empty = Geometry::MultiPolygon(MultiPolygon::new(vec![]));
        assert_eq!(Region::from_geometry(&empty), Err(Unsupported::Empty));

        let hollow = Geometry::Polygon(Polygon::new(LineString::new(vec![]), vec![]));
        assert_eq!(Region::from_geometry(&hollow), Err(Unsupported::Empty));
    }

    #[test]
    fn predicates_ignore_touching_cells() {
        let region = Region::from_polygons(MultiPolygon::new(vec![square(0.0, 0.0, 2.0, 2.0)]))
            .unwrap();
        let prepared = region.accelerate();

        let inside = Envelope::new(0.0, 1.0, 0.0, 1.0);
        let straddling = Envelope::new(1.5, 2.5, 1.5, 2.5);
        let touching = Envelope::new(2.0, 3.0, 0.0, 1.0);
        let corner = Envelope::new(2.0, 3.0, 2.0, 3.0);

        let engines: [&dyn CellPredicates; 2] = [&region, &prepared];
        for predicates in engines {
            assert!(predicates.intersects(&inside), "inner cell missed");
            assert!(predicates.contains(&inside), "inner cell not contained");
            assert!(predicates.intersects(&straddling), "straddling cell missed");
            assert!(!predicates.contains(&straddling), "straddling cell contained");
            assert!(!predicates.intersects(&touching), "edge-touching cell reported");
            assert!(!predicates.intersects(&corner), "corner-touching cell reported");
        }
    }

    #[test]
    fn holes_are_not_covered() {
        let with_hole = Polygon::new(
            square(0.0, 0.0, 10.0, 10.0).exterior().clone(),
            vec![square(4.0, 4.0, 6.0, 6.0).exterior().clone()],
        );
        let region = Region::from_polygons(MultiPolygon::new(vec![with_hole])).unwrap();
        let prepared = region.accelerate();

        let in_hole = Envelope::new(4.5, 5.5, 4.5, 5.5);
        let over_hole_edge = Envelope::new(3.0, 5.0, 3.0, 5.0);
        assert!(!prepared.intersects(&in_hole), "cell inside the hole reported");
        assert!(prepared.intersects(&over_hole_edge), "partial cell missed");
        assert!(!prepared.contains(&over_hole_edge), "cell over the hole contained");
    }

    #[test]
    fn splits_a_polygon_crossing_the_antimeridian() {
        let crossing = polygon![
            (x: 170.0, y: 0.0),
            (x: -170.0, y: 0.0),
            (x: -170.0, y: 10.0),
            (x: 170.0, y: 10.0),
        ];
        let region = Region::from_polygons(MultiPolygon::new(vec![crossing])).unwrap();
        assert!(region.crosses_antimeridian(), "crossing not detected");

        let wrapped = region.wrap_antimeridian();
        assert!(!wrapped.crosses_antimeridian(), "split parts still cross");
        assert_eq!(wrapped.polygons().0.len(), 2);
        assert!(
            (wrapped.polygons().unsigned_area() - 200.0).abs() < 1e-9,
            "split parts lost area"
        );
        assert_eq!(
            wrapped.envelope(),
            Some(Envelope::new(0.0, 10.0, -180.0, 180.0))
        );

        let east = Envelope::new(0.0, 10.0, 170.0, 180.0);
        let west = Envelope::new(0.0, 10.0, -180.0, -170.0);
        let middle = Envelope::new(0.0, 10.0, 0.0, 10.0);
        assert!(wrapped.contains(&east), "eastern part missing");
        assert!(wrapped.contains(&west), "western part missing");
        assert!(!wrapped.intersects(&middle), "split region spans the globe");
    }

    #[test]
    fn crossing_through_an_antimeridian_vertex() {
        // Both crossings pass through a vertex on the antimeridian, written
        // once as 180 and once as -170 on either side of it.
        let ring = polygon![
            (x: 170.0, y: 0.0),
            (x: 180.0, y: 0.0),
            (x: -170.0, y: 0.0),
            (x: -170.0, y: 10.0),
            (x: 180.0, y: 10.0),
            (x: 170.0, y: 10.0),
        ];
        let region = Region::from_polygons(MultiPolygon::new(vec![ring])).unwrap();
        assert!(region.crosses_antimeridian(), "crossing through 180 missed");

        let wrapped = region.wrap_antimeridian();
        assert!(!wrapped.crosses_antimeridian(), "split parts still cross");
        assert_eq!(wrapped.polygons().0.len(), 2);
        assert!(
            (wrapped.polygons().unsigned_area() - 200.0).abs() < 1e-9,
            "split parts lost area"
        );
        assert_eq!(
            wrapped.envelope(),
            Some(Envelope::new(0.0, 10.0, -180.0, 180.0))
        );
        assert!(
            !wrapped.intersects(&Envelope::new(0.0, 10.0, 0.0, 10.0)),
            "ring read as the band through 0"
        );
    }

    #[test]
    fn antimeridian_vertex_without_a_crossing_is_kept() {
        // Touches 180 and turns back east of it.
        let touching = polygon![
            (x: 170.0, y: 0.0),
            (x: 180.0, y: 5.0),
            (x: 170.0, y: 10.0),
        ];
        let region = Region::from_polygons(MultiPolygon::new(vec![touching])).unwrap();
        assert!(!region.crosses_antimeridian(), "touching 180 read as a crossing");
        assert_eq!(region.clone().wrap_antimeridian(), region);
    }

    #[test]
    fn wide_planar_edge_is_read_across_the_antimeridian() {
        let band = polygon![
            (x: -100.0, y: 0.0),
            (x: 100.0, y: 0.0),
            (x: 100.0, y: 10.0),
            (x: -100.0, y: 10.0),
        ];
        let region = Region::from_polygons(MultiPolygon::new(vec![band])).unwrap();
        assert!(region.crosses_antimeridian(), "200-degree edge not a crossing");

        let wrapped = region.clone().wrap_antimeridian();
        // 100E..180 and -180..100W: 160 degrees wide.
        assert!(
            (wrapped.polygons().unsigned_area() - 1600.0).abs() < 1e-9,
            "wrapped band has the wrong extent"
        );
        assert!(!wrapped.intersects(&Envelope::new(0.0, 10.0, -10.0, 10.0)));
        assert!(region.intersects(&Envelope::new(0.0, 10.0, -10.0, 10.0)));
    }

    #[test]
    fn whole_globe_polygon_is_not_a_crossing() {
        let globe = square(-180.0, -90.0, 180.0, 90.0);
        let region = Region::from_polygons(MultiPolygon::new(vec![globe])).unwrap();
        assert!(!region.crosses_antimeridian(), "globe edges read as crossings");
        assert_eq!(region.clone().wrap_antimeridian(), region);
    }

    #[test]
    fn hole_follows_its_shell_across_the_antimeridian() {
        let shell = LineString::from(vec![
            (160.0, -10.0),
            (-160.0, -10.0),
            (-160.0, 10.0),
            (160.0, 10.0),
            (160.0, -10.0),
        ]);
        let hole = LineString::from(vec![
            (-175.0, -5.0),
            (-165.0, -5.0),
            (-165.0, 5.0),
            (-175.0, 5.0),
            (-175.0, -5.0),
        ]);
        let region =
            Region::from_polygons(MultiPolygon::new(vec![Polygon::new(shell, vec![hole])]))
                .unwrap()
                .wrap_antimeridian();

        // 40 x 20 shell minus a 10 x 10 hole.
        assert!(
            (region.polygons().unsigned_area() - 700.0).abs() < 1e-9,
            "hole not carried into the split parts"
        );
        assert!(
            !region.intersects(&Envelope::new(-4.0, 4.0, -174.0, -166.0)),
            "hole reported as covered"
        );
    }
}
