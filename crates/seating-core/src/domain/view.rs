//! Read-only render data for the planner canvas.
//!
//! The renderer gets, per table, its shape, position, rotation and footprint
//! plus one [`SeatView`] per seat with absolute canvas coordinates (rotation
//! and translation already applied) and the occupant's group color.  This
//! module also answers the reverse question for drag-and-drop: which seat is
//! under a given canvas point.

use serde::{Deserialize, Serialize};

use super::color::{group_color, GroupColor};
use super::geometry::{footprint, rotate, seat_position, Point, TableShape, SEAT_RADIUS};
use super::seating::{GuestId, SeatRef, SeatingPlan, Table, TableId};

/// One seat as drawn on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatView {
    pub index: usize,
    pub guest_id: Option<GuestId>,
    pub guest_name: Option<String>,
    /// Absolute canvas position of the seat center.
    pub center: Point,
    pub color: Option<GroupColor>,
}

/// One table as drawn on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub id: TableId,
    pub label: String,
    pub shape: TableShape,
    pub position: Point,
    pub rotation: f64,
    pub width: f64,
    pub height: f64,
    pub seats: Vec<SeatView>,
}

/// Absolute canvas position of seat `seat_index` at `table`.
pub fn seat_center(table: &Table, seat_index: usize) -> Point {
    let offset = seat_position(table.shape(), seat_index, table.capacity());
    table.position().offset_by(rotate(offset, table.rotation()))
}

impl SeatingPlan {
    /// Render data for one table.
    pub fn table_view(&self, table_id: TableId) -> Option<TableView> {
        self.table(table_id).map(|t| self.build_view(t))
    }

    /// Render data for every table, in drawing order.
    pub fn views(&self) -> Vec<TableView> {
        self.tables().map(|t| self.build_view(t)).collect()
    }

    /// Finds the seat whose marker contains `point`.
    ///
    /// Tables drawn later sit on top, so they are hit first.  Within a table
    /// the nearest marker wins.
    pub fn seat_at(&self, point: Point) -> Option<SeatRef> {
        let tables: Vec<&Table> = self.tables().collect();
        tables.into_iter().rev().find_map(|table| {
            (0..table.capacity())
                .map(|i| (i, seat_center(table, i).distance_to(point)))
                .filter(|&(_, distance)| distance <= SEAT_RADIUS)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(seat_index, _)| SeatRef { table_id: table.id(), seat_index })
        })
    }

    fn build_view(&self, table: &Table) -> TableView {
        let fp = footprint(table.shape(), table.capacity());
        let seats = table
            .seats()
            .iter()
            .map(|seat| {
                let guest = seat.guest().and_then(|id| self.guest(id));
                SeatView {
                    index: seat.index(),
                    guest_id: seat.guest(),
                    guest_name: guest.map(|g| g.name.clone()),
                    center: seat_center(table, seat.index()),
                    color: guest.map(|g| group_color(&g.group)),
                }
            })
            .collect();

        TableView {
            id: table.id(),
            label: table.label().to_string(),
            shape: table.shape(),
            position: table.position(),
            rotation: table.rotation(),
            width: fp.width,
            height: fp.height,
            seats,
        }
    }
}
