//! UI-local selection state.
//!
//! At most one thing is selected at a time.  Selecting a table replaces any
//! selected seat or guest, and vice versa.

use serde::{Deserialize, Serialize};

use seating_core::{GuestId, SeatRef, TableId};

/// What the user currently has selected on the planner canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    Table { table_id: TableId },
    Seat { seat: SeatRef },
    Guest { guest_id: GuestId },
}

impl Selection {
    pub fn table(&self) -> Option<TableId> {
        match self {
            Selection::Table { table_id } => Some(*table_id),
            _ => None,
        }
    }

    pub fn seat(&self) -> Option<SeatRef> {
        match self {
            Selection::Seat { seat } => Some(*seat),
            _ => None,
        }
    }

    pub fn guest(&self) -> Option<GuestId> {
        match self {
            Selection::Guest { guest_id } => Some(*guest_id),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    /// Returns `true` if the selection is the table or one of its seats.
    pub fn references_table(&self, table_id: TableId) -> bool {
        match self {
            Selection::Table { table_id: t } => *t == table_id,
            Selection::Seat { seat } => seat.table_id == table_id,
            _ => false,
        }
    }

    /// Clears the selection if it points at the table or one of its seats.
    pub fn forget_table(&mut self, table_id: TableId) {
        if self.references_table(table_id) {
            *self = Selection::None;
        }
    }

    /// Clears a selected seat of `table_id` whose index no longer exists.
    pub fn forget_seats_from(&mut self, table_id: TableId, capacity: usize) {
        if let Selection::Seat { seat } = self {
            if seat.table_id == table_id && seat.seat_index >= capacity {
                *self = Selection::None;
            }
        }
    }

    pub fn forget_guest(&mut self, guest_id: GuestId) {
        if self.guest() == Some(guest_id) {
            *self = Selection::None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_selection_defaults_to_none() {
        assert!(Selection::default().is_none());
    }

    #[test]
    fn test_selecting_table_replaces_selected_guest() {
        let sel = Selection::Guest { guest_id: Uuid::new_v4() };
        assert!(sel.guest().is_some());

        let t = Uuid::new_v4();
        let sel = Selection::Table { table_id: t };
        assert_eq!(sel.table(), Some(t));
        assert_eq!(sel.guest(), None);
    }

    #[test]
    fn test_forget_table_clears_table_and_its_seats() {
        let t = Uuid::new_v4();
        let mut sel = Selection::Seat { seat: SeatRef { table_id: t, seat_index: 2 } };
        sel.forget_table(t);
        assert!(sel.is_none());

        let mut sel = Selection::Table { table_id: t };
        sel.forget_table(t);
        assert!(sel.is_none());
    }

    #[test]
    fn test_forget_table_keeps_unrelated_selection() {
        let other = Uuid::new_v4();
        let mut sel = Selection::Table { table_id: other };
        sel.forget_table(Uuid::new_v4());
        assert_eq!(sel.table(), Some(other));
    }

    #[test]
    fn test_forget_seats_from_clears_only_removed_seats() {
        let t = Uuid::new_v4();
        let mut kept = Selection::Seat { seat: SeatRef { table_id: t, seat_index: 1 } };
        let mut dropped = Selection::Seat { seat: SeatRef { table_id: t, seat_index: 5 } };
        kept.forget_seats_from(t, 3);
        dropped.forget_seats_from(t, 3);
        assert!(kept.seat().is_some());
        assert!(dropped.is_none());
    }
}
