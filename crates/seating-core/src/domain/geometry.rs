//! Table geometry: footprints and seat placement.
//!
//! All coordinates are canvas units.  Seat positions are returned as offsets
//! from the table center in the table's *unrotated* frame; the caller applies
//! the table rotation afterwards with [`rotate`].  The canvas y axis grows
//! downward, so "above the center" means a negative `y`.
//!
//! Every function in this module is pure: identical inputs always produce
//! bit-identical outputs.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// Radius of a rendered seat marker.  Also used as the hit-test radius.
pub const SEAT_RADIUS: f64 = 14.0;

/// Distance from the table edge to the center of each seat marker.
const SEAT_CLEARANCE: f64 = 22.0;

/// Round table diameter with no seats, grown by [`ROUND_DIAMETER_PER_SEAT`].
const ROUND_BASE_DIAMETER: f64 = 60.0;
const ROUND_DIAMETER_PER_SEAT: f64 = 12.0;

/// Oval tables are wider than round ones; height is a fixed ratio of width.
const OVAL_BASE_WIDTH: f64 = 80.0;
const OVAL_WIDTH_PER_SEAT: f64 = 16.0;
const OVAL_HEIGHT_RATIO: f64 = 0.7;

/// Spacing between neighbouring seats along a straight table side.
const SEAT_PITCH: f64 = 44.0;
/// Free space left at each end of a straight side.
const CORNER_MARGIN: f64 = 12.0;
const RECT_MIN_LENGTH: f64 = 120.0;
/// Rectangular tables are twice as long as they are deep, unless the short
/// sides need more room for their seats.
const RECT_DEPTH_RATIO: f64 = 0.5;
/// Smallest center-to-center distance between seats spread along a side.
const MIN_SEAT_SPACING: f64 = 2.0 * SEAT_RADIUS + 4.0;
const SQUARE_MIN_SIDE: f64 = 80.0;

/// Shape of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
    #[default]
    Round,
    Rectangular,
    Square,
    Oval,
    /// User-drawn outline.  Seats are placed with the round layout.
    Custom,
}

impl std::fmt::Display for TableShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TableShape::Round => "round",
            TableShape::Rectangular => "rectangular",
            TableShape::Square => "square",
            TableShape::Oval => "oval",
            TableShape::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// A point (or offset) in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    pub fn offset_by(self, delta: Point) -> Point {
        Point::new(self.x + delta.x, self.y + delta.y)
    }

    /// Component-wise difference `self - other`.
    pub fn delta_from(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let d = self.delta_from(other);
        d.x.hypot(d.y)
    }
}

/// Rendered bounding size of a table, excluding the seat ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
}

/// Returns the bounding size of a table of `shape` holding `capacity` seats.
///
/// A capacity of zero is treated as one so the result is always drawable.
pub fn footprint(shape: TableShape, capacity: usize) -> Footprint {
    let capacity = capacity.max(1);
    match shape {
        TableShape::Round | TableShape::Custom => {
            let d = ROUND_BASE_DIAMETER + ROUND_DIAMETER_PER_SEAT * capacity as f64;
            Footprint { width: d, height: d }
        }
        TableShape::Oval => {
            let w = OVAL_BASE_WIDTH + OVAL_WIDTH_PER_SEAT * capacity as f64;
            Footprint { width: w, height: w * OVAL_HEIGHT_RATIO }
        }
        TableShape::Rectangular => {
            let per_side = seats_per_side(capacity);
            let w = straight_side_length(per_side).max(RECT_MIN_LENGTH);
            // Short sides carry as many seats as long ones.
            let h = (w * RECT_DEPTH_RATIO).max(MIN_SEAT_SPACING * (per_side + 1) as f64);
            Footprint { width: w, height: h }
        }
        TableShape::Square => {
            let s = straight_side_length(seats_per_side(capacity)).max(SQUARE_MIN_SIDE);
            Footprint { width: s, height: s }
        }
    }
}

/// Returns the offset of seat `seat_index` from the table center, before rotation.
///
/// `total_seats` is the number of seats being laid out (normally the table
/// capacity).  Returns the origin when `total_seats` is zero.  An index past
/// the end wraps around, so callers never have to special-case stale indices.
pub fn seat_position(shape: TableShape, seat_index: usize, total_seats: usize) -> Point {
    if total_seats == 0 {
        return Point::ORIGIN;
    }
    let index = seat_index % total_seats;
    let fp = footprint(shape, total_seats);

    match shape {
        TableShape::Round | TableShape::Custom | TableShape::Oval => ellipse_seat(
            fp.width / 2.0 + SEAT_CLEARANCE,
            fp.height / 2.0 + SEAT_CLEARANCE,
            index,
            total_seats,
        ),
        TableShape::Rectangular | TableShape::Square => side_seat(fp, index, total_seats),
    }
}

/// Rotates `point` about the origin by `degrees` (clockwise on a y-down canvas).
pub fn rotate(point: Point, degrees: f64) -> Point {
    if degrees == 0.0 {
        return point;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(point.x * cos - point.y * sin, point.x * sin + point.y * cos)
}

/// Number of seats on each side of a rectangular or square table.
pub fn seats_per_side(total_seats: usize) -> usize {
    total_seats.div_ceil(4)
}

// ── Per-shape placement ───────────────────────────────────────────────────────

/// Seat `index` of `total` on an ellipse with radii `rx`, `ry`.
///
/// Angle zero points straight up and angles grow clockwise.
fn ellipse_seat(rx: f64, ry: f64, index: usize, total: usize) -> Point {
    let angle = TAU * index as f64 / total as f64;
    Point::new(rx * angle.sin(), -ry * angle.cos())
}

/// Seat `index` of `total` on a four-sided table.
///
/// Sides are filled in order top, right, bottom, left with `ceil(total / 4)`
/// seats each; the last sides may hold fewer (or none).  Seats are spread
/// evenly along a side and the walk is clockwise.
fn side_seat(fp: Footprint, index: usize, total: usize) -> Point {
    let per_side = seats_per_side(total);
    let side = index / per_side;
    let slot = index % per_side;
    let on_side = per_side.min(total - side * per_side);
    let t = (slot + 1) as f64 / (on_side + 1) as f64;

    let half_w = fp.width / 2.0;
    let half_h = fp.height / 2.0;
    match side {
        0 => Point::new(-half_w + t * fp.width, -(half_h + SEAT_CLEARANCE)),
        1 => Point::new(half_w + SEAT_CLEARANCE, -half_h + t * fp.height),
        2 => Point::new(half_w - t * fp.width, half_h + SEAT_CLEARANCE),
        _ => Point::new(-(half_w + SEAT_CLEARANCE), half_h - t * fp.height),
    }
}

fn straight_side_length(seats_on_side: usize) -> f64 {
    seats_on_side as f64 * SEAT_PITCH + 2.0 * CORNER_MARGIN
}

// ── Tests ─────────────────────────────────────────────────────────────────────
