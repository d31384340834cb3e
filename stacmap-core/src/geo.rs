//! Bounds math for item footprints and the map viewport.
//!
//! All bounds are WGS84 longitude/latitude rectangles stored as
//! [`tilejson::Bounds`] (`left`/`bottom`/`right`/`top`, i.e. west/south/east/north).

pub use tilejson::Bounds;

/// The fixed pan envelope of the viewer: SW (40, -150) to NE (65, -100).
///
/// Prevents panning away from the region the catalog covers, and doubles as
/// the default `bbox` filter for item feeds when the caller does not set one.
#[must_use]
pub fn region_bounds() -> Bounds {
    Bounds::new(-150.0, 40.0, -100.0, 65.0)
}

/// Minimum zoom level of the viewer.
pub const MIN_ZOOM: u8 = 5;
/// Maximum zoom level of the viewer.
pub const MAX_ZOOM: u8 = 15;
/// Initial view center as (longitude, latitude).
pub const INITIAL_CENTER: (f64, f64) = (-125.0, 54.0);
/// Initial zoom level.
pub const INITIAL_ZOOM: u8 = 5;

/// Grows `bounds` to include the point (`x`, `y`).
pub fn update_bounds(bounds: &mut Bounds, x: f64, y: f64) {
    bounds.left = f64::min(bounds.left, x);
    bounds.right = f64::max(bounds.right, x);
    bounds.bottom = f64::min(bounds.bottom, y);
    bounds.top = f64::max(bounds.top, y);
}

/// Builds bounds from a GeoJSON `bbox` array.
///
/// Accepts both 2D (`[west, south, east, north]`) and 3D
/// (`[west, south, min_elev, east, north, max_elev]`) arrays; anything else
/// yields `None`.
#[must_use]
pub fn from_bbox(bbox: &[f64]) -> Option<Bounds> {
    match bbox.len() {
        4 => Some(Bounds::new(bbox[0], bbox[1], bbox[2], bbox[3])),
        6 => Some(Bounds::new(bbox[0], bbox[1], bbox[3], bbox[4])),
        _ => None,
    }
}

/// Computes the bounding box of a GeoJSON geometry.
///
/// Returns `None` for geometries without coordinates (e.g. an empty
/// `GeometryCollection`).
#[must_use]
pub fn geometry_bounds(geometry: &geojson::Value) -> Option<Bounds> {
    let mut bounds = Bounds::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);

    match geometry {
        geojson::Value::Point(point) => {
            update_bounds(&mut bounds, point[0], point[1]);
        }
        geojson::Value::MultiPoint(points) | geojson::Value::LineString(points) => {
            for point in points {
                update_bounds(&mut bounds, point[0], point[1]);
            }
        }
        geojson::Value::MultiLineString(lines) | geojson::Value::Polygon(lines) => {
            for line in lines {
                for point in line {
                    update_bounds(&mut bounds, point[0], point[1]);
                }
            }
        }
        geojson::Value::MultiPolygon(polygons) => {
            for polygon in polygons {
                for ring in polygon {
                    for point in ring {
                        update_bounds(&mut bounds, point[0], point[1]);
                    }
                }
            }
        }
        geojson::Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                if let Some(inner) = geometry_bounds(&geometry.value) {
                    update_bounds(&mut bounds, inner.left, inner.bottom);
                    update_bounds(&mut bounds, inner.right, inner.top);
                }
            }
        }
    }

    // nothing touched the accumulator
    if bounds.left > bounds.right || bounds.bottom > bounds.top {
        return None;
    }
    Some(bounds)
}

/// Closed-interval overlap test: rectangles sharing only an edge intersect.
#[must_use]
pub fn intersects(a: &Bounds, b: &Bounds) -> bool {
    a.left <= b.right && a.right >= b.left && a.bottom <= b.top && a.top >= b.bottom
}

/// Whether `outer` fully contains `inner`.
#[must_use]
pub fn contains(outer: &Bounds, inner: &Bounds) -> bool {
    outer.left <= inner.left
        && outer.right >= inner.right
        && outer.bottom <= inner.bottom
        && outer.top >= inner.top
}

/// Smallest bounds covering both `a` and `b`.
#[must_use]
pub fn union(a: &Bounds, b: &Bounds) -> Bounds {
    Bounds::new(
        f64::min(a.left, b.left),
        f64::min(a.bottom, b.bottom),
        f64::max(a.right, b.right),
        f64::max(a.top, b.top),
    )
}

/// Center of the bounds as (longitude, latitude).
#[must_use]
pub fn center(bounds: &Bounds) -> (f64, f64) {
    (
        f64::midpoint(bounds.left, bounds.right),
        f64::midpoint(bounds.bottom, bounds.top),
    )
}
