//! Plain-data form of a seating plan.
//!
//! The hosted store hands the planner its tables and guests as plain records
//! at start-up, and receives individual records back after each change.
//! [`PlanSnapshot`] is that record shape; it serializes to JSON with `serde`.
//!
//! Seat assignments are stored on the table record (`seats[i]` is the guest
//! in seat `i`), so the seat list length is the table capacity.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::geometry::{Point, TableShape};
use super::seating::{Guest, GuestId, SeatRef, SeatingError, SeatingPlan, Table, TableId};

/// Persisted form of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    pub id: TableId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub shape: TableShape,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub rotation: f64,
    /// Occupant of each seat; the length is the table capacity.
    pub seats: Vec<Option<GuestId>>,
}

impl From<&Table> for TableRecord {
    fn from(table: &Table) -> Self {
        Self {
            id: table.id(),
            label: table.label().to_string(),
            shape: table.shape(),
            position: table.position(),
            rotation: table.rotation(),
            seats: table.seats().iter().map(|s| s.guest()).collect(),
        }
    }
}

/// Every table and guest in a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    #[serde(default)]
    pub tables: Vec<TableRecord>,
    #[serde(default)]
    pub guests: Vec<Guest>,
}

impl SeatingPlan {
    /// Builds a plan from persisted records.
    ///
    /// The snapshot is fully validated before a plan is returned.
    ///
    /// # Errors
    ///
    /// - [`SeatingError::InvalidArgument`] for duplicate ids, a table with no
    ///   seats, or a non-finite position / rotation.
    /// - [`SeatingError::GuestNotFound`] if a seat names an unknown guest.
    /// - [`SeatingError::GuestAlreadySeated`] if two seats name the same guest.
    pub fn from_snapshot(snapshot: PlanSnapshot) -> Result<SeatingPlan, SeatingError> {
        let mut guest_ids = HashSet::new();
        for guest in &snapshot.guests {
            if !guest_ids.insert(guest.id) {
                return Err(SeatingError::InvalidArgument(format!(
                    "duplicate guest id {}",
                    guest.id
                )));
            }
        }

        let mut table_ids = HashSet::new();
        let mut seated: HashMap<GuestId, SeatRef> = HashMap::new();
        for record in &snapshot.tables {
            if !table_ids.insert(record.id) {
                return Err(SeatingError::InvalidArgument(format!(
                    "duplicate table id {}",
                    record.id
                )));
            }
            if record.seats.is_empty() {
                return Err(SeatingError::InvalidArgument(format!(
                    "table {} has no seats",
                    record.id
                )));
            }
            if !(record.rotation.is_finite()
                && record.position.x.is_finite()
                && record.position.y.is_finite())
            {
                return Err(SeatingError::InvalidArgument(format!(
                    "table {} has a non-finite position or rotation",
                    record.id
                )));
            }
            for (seat_index, occupant) in record.seats.iter().enumerate() {
                let Some(guest_id) = *occupant else { continue };
                if !guest_ids.contains(&guest_id) {
                    return Err(SeatingError::GuestNotFound(guest_id));
                }
                let here = SeatRef { table_id: record.id, seat_index };
                if let Some(prior) = seated.insert(guest_id, here) {
                    return Err(SeatingError::GuestAlreadySeated {
                        guest_id,
                        table_id: prior.table_id,
                        seat_index: prior.seat_index,
                    });
                }
            }
        }

        let mut plan = SeatingPlan::new();
        for guest in snapshot.guests {
            plan.insert_guest(guest);
        }
        for (n, record) in snapshot.tables.into_iter().enumerate() {
            let label = if record.label.trim().is_empty() {
                format!("Table {}", n + 1)
            } else {
                record.label
            };
            plan.insert_table(SeatingPlan::build_table(
                record.id,
                label,
                record.shape,
                record.position,
                record.rotation,
                &record.seats,
            ));
        }
        for (guest_id, seat_ref) in seated {
            plan.index_seat(guest_id, seat_ref);
        }
        Ok(plan)
    }

    /// Exports every table and guest, in creation order.
    pub fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            tables: self.tables().map(TableRecord::from).collect(),
            guests: self.guests().cloned().collect(),
        }
    }

    /// Exports a single table, for saving after a change.
    pub fn table_record(&self, table_id: TableId) -> Option<TableRecord> {
        self.table(table_id).map(TableRecord::from)
    }

    /// Exports a single guest, for saving after a change.
    pub fn guest_record(&self, guest_id: GuestId) -> Option<Guest> {
        self.guest(guest_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seating::{NewGuest, RsvpStatus};
    use uuid::Uuid;

    fn guest(name: &str) -> Guest {
        Guest {
            id: Uuid::new_v4(),
            name: name.to_string(),
            group: String::new(),
            dietary: Vec::new(),
            rsvp: RsvpStatus::Pending,
        }
    }

    fn table(seats: Vec<Option<GuestId>>) -> TableRecord {
        TableRecord {
            id: Uuid::new_v4(),
            label: String::new(),
            shape: TableShape::Round,
            position: Point::new(10.0, 20.0),
            rotation: 0.0,
            seats,
        }
    }

    #[test]
    fn test_from_snapshot_rebuilds_reverse_index() {
        let g = guest("Ana");
        let t = table(vec![None, Some(g.id), None]);
        let table_id = t.id;

        let snapshot = PlanSnapshot { tables: vec![t], guests: vec![g.clone()] };
        let plan = SeatingPlan::from_snapshot(snapshot).expect("valid snapshot");

        assert_eq!(plan.seat_of(g.id), Some(SeatRef { table_id, seat_index: 1 }));
        assert_eq!(plan.table(table_id).unwrap().capacity(), 3);
    }

    #[test]
    fn test_from_snapshot_fills_blank_labels() {
        let plan = SeatingPlan::from_snapshot(PlanSnapshot {
            tables: vec![table(vec![None]), table(vec![None])],
            guests: vec![],
        })
        .unwrap();
        let labels: Vec<_> = plan.tables().map(|t| t.label().to_string()).collect();
        assert_eq!(labels, vec!["Table 1", "Table 2"]);
    }

    #[test]
    fn test_from_snapshot_rejects_guest_in_two_seats() {
        let g = guest("Ben");
        let snapshot = PlanSnapshot {
            tables: vec![table(vec![Some(g.id)]), table(vec![None, Some(g.id)])],
            guests: vec![g.clone()],
        };
        assert!(matches!(
            SeatingPlan::from_snapshot(snapshot),
            Err(SeatingError::GuestAlreadySeated { guest_id, .. }) if guest_id == g.id
        ));
    }

    #[test]
    fn test_from_snapshot_rejects_unknown_guest_reference() {
        let missing = Uuid::new_v4();
        let snapshot = PlanSnapshot { tables: vec![table(vec![Some(missing)])], guests: vec![] };
        assert_eq!(
            SeatingPlan::from_snapshot(snapshot).err(),
            Some(SeatingError::GuestNotFound(missing))
        );
    }

    #[test]
    fn test_from_snapshot_rejects_table_without_seats() {
        let snapshot = PlanSnapshot { tables: vec![table(vec![])], guests: vec![] };
        assert!(matches!(
            SeatingPlan::from_snapshot(snapshot),
            Err(SeatingError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_snapshot_rejects_duplicate_guest_ids() {
        let g = guest("Cy");
        let snapshot = PlanSnapshot { tables: vec![], guests: vec![g.clone(), g] };
        assert!(matches!(
            SeatingPlan::from_snapshot(snapshot),
            Err(SeatingError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_snapshot_exports_what_from_snapshot_imported() {
        let mut plan = SeatingPlan::new();
        let g = plan.add_guest(NewGuest::named("Dee").in_group("Work"));
        let t = plan
            .add_table(TableShape::Oval, 4, Point::new(50.0, 60.0))
            .unwrap()
            .id();
        plan.set_rotation(t, 45.0).unwrap();
        plan.assign_guest(t, 2, g).unwrap();

        let snapshot = plan.snapshot();
        let restored = SeatingPlan::from_snapshot(snapshot.clone()).unwrap();

        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.seat_of(g), Some(SeatRef { table_id: t, seat_index: 2 }));
    }

    #[test]
    fn test_snapshot_json_uses_lowercase_shape_and_null_seats() {
        let record = table(vec![None]);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["shape"], "round");
        assert!(json["seats"][0].is_null());
    }

    #[test]
    fn test_table_record_for_unknown_table_is_none() {
        let plan = SeatingPlan::new();
        assert!(plan.table_record(Uuid::new_v4()).is_none());
    }
}
