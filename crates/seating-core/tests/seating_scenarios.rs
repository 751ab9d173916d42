//! Integration tests for the seating model.
//!
//! These drive the public `seating_core` API through the end-to-end seating
//! scenarios: occupied seats, shrinking tables, and removing tables.

use seating_core::{
    seat_position, NewGuest, Point, SeatRef, SeatingError, SeatingPlan, TableId, TableShape,
};

fn table(plan: &mut SeatingPlan, shape: TableShape, capacity: usize) -> TableId {
    plan.add_table(shape, capacity, Point::new(200.0, 200.0))
        .expect("table must be created")
        .id()
}

/// No guest may appear in more than one seat, and every seated guest must
/// be found by the reverse index at the seat that holds them.
fn assert_unique_seating(plan: &SeatingPlan) {
    let mut seen = std::collections::HashSet::new();
    for t in plan.tables() {
        assert_eq!(t.seats().len(), t.capacity());
        for seat in t.seats() {
            if let Some(g) = seat.guest() {
                assert!(seen.insert(g), "guest {g} seated twice");
                assert_eq!(
                    plan.seat_of(g),
                    Some(SeatRef { table_id: t.id(), seat_index: seat.index() })
                );
            }
        }
    }
    assert_eq!(seen.len(), plan.seated_count());
}

#[test]
fn test_second_guest_cannot_take_occupied_seat() {
    let mut plan = SeatingPlan::new();
    let t = table(&mut plan, TableShape::Round, 8);
    let g1 = plan.add_guest(NewGuest::named("G1"));
    let g2 = plan.add_guest(NewGuest::named("G2"));

    plan.assign_guest(t, 0, g1).unwrap();
    let err = plan.assign_guest(t, 0, g2).unwrap_err();

    assert!(matches!(err, SeatingError::SeatOccupied { .. }));
    assert!(plan.is_guest_seated(g1));
    assert!(!plan.is_guest_seated(g2));
    assert_unique_seating(&plan);
}

#[test]
fn test_shrinking_rectangular_table_unseats_guests_in_removed_seats() {
    let mut plan = SeatingPlan::new();
    let t = table(&mut plan, TableShape::Rectangular, 6);
    let g4 = plan.add_guest(NewGuest::named("Four"));
    let g5 = plan.add_guest(NewGuest::named("Five"));
    plan.assign_guest(t, 4, g4).unwrap();
    plan.assign_guest(t, 5, g5).unwrap();

    plan.resize_table(t, 3).unwrap();

    assert!(!plan.is_guest_seated(g4));
    assert!(!plan.is_guest_seated(g5));
    let tbl = plan.table(t).unwrap();
    assert_eq!(tbl.capacity(), 3);
    assert!(tbl.seats().iter().all(|s| s.is_empty()));
    assert_unique_seating(&plan);
}

#[test]
fn test_removing_table_unseats_all_three_guests() {
    let mut plan = SeatingPlan::new();
    let t = table(&mut plan, TableShape::Oval, 10);
    let guests: Vec<_> = ["A", "B", "C"]
        .iter()
        .map(|n| plan.add_guest(NewGuest::named(*n)))
        .collect();
    for (i, g) in guests.iter().enumerate() {
        plan.assign_guest(t, i + 3, *g).unwrap();
    }

    plan.remove_table(t).unwrap();

    for g in guests {
        assert!(!plan.is_guest_seated(g));
    }
    assert_eq!(plan.unseated_guests().count(), 3);
}

#[test]
fn test_round_eight_top_and_bottom_seats() {
    let top = seat_position(TableShape::Round, 0, 8);
    let bottom = seat_position(TableShape::Round, 4, 8);
    assert!(top.x.abs() < 1e-9 && top.y < 0.0);
    assert!(bottom.x.abs() < 1e-9 && bottom.y > 0.0);
}

#[test]
fn test_mixed_operation_sequence_preserves_invariants() {
    let mut plan = SeatingPlan::new();
    let a = table(&mut plan, TableShape::Round, 6);
    let b = table(&mut plan, TableShape::Square, 8);
    let guests: Vec<_> = (0..10)
        .map(|i| plan.add_guest(NewGuest::named(format!("g{i}"))))
        .collect();

    for (i, g) in guests.iter().enumerate().take(6) {
        plan.assign_guest(a, i, *g).unwrap();
    }
    for (i, g) in guests.iter().enumerate().skip(6) {
        plan.assign_guest(b, i - 6, *g).unwrap();
    }
    assert_unique_seating(&plan);

    plan.resize_table(a, 2).unwrap();
    assert_unique_seating(&plan);
    plan.unassign_guest(guests[7]).unwrap();
    plan.assign_guest(b, 5, guests[5]).unwrap();
    assert_unique_seating(&plan);
    plan.resize_table(b, 12).unwrap();
    plan.remove_guest(guests[8]).unwrap();
    assert_unique_seating(&plan);
    plan.remove_table(a).unwrap();
    assert_unique_seating(&plan);

    assert_eq!(plan.seated_count(), 3);
}
