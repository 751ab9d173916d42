//! Integration tests for the planner pipeline.
//!
//! These tests drive the public API end-to-end: `PlannerSession` →
//! `LayoutController` → `AssignmentEngine` → `SeatingPlan`, with the sync
//! worker writing to an in-memory or JSON file store.

use std::sync::Arc;

use seating_core::{NewGuest, Point, SeatRef, SeatingError, SeatingPlan, TableShape};
use seating_planner::application::assignment::{AssignmentEngine, EngineLimits, PersistOp};
use seating_planner::application::interaction::{
    CommandOutcome, InteractionSettings, LayoutCommand, LayoutController,
};
use seating_planner::infrastructure::persistence::{
    sync::SyncQueue, JsonFileStore, MemoryStore, PlanStore,
};
use seating_planner::infrastructure::storage::config::AppConfig;
use seating_planner::infrastructure::ui_bridge::PlannerSession;
use uuid::Uuid;

fn engine() -> AssignmentEngine {
    AssignmentEngine::new(SeatingPlan::new(), EngineLimits::default())
}

// ── Assignment scenarios ──────────────────────────────────────────────────────

#[test]
fn test_moving_guest_between_tables_updates_both_tables() {
    let mut engine = engine();
    let a = engine.create_table(TableShape::Round, 8, Point::new(200.0, 200.0)).unwrap();
    let b = engine.create_table(TableShape::Round, 8, Point::new(600.0, 200.0)).unwrap();
    let g1 = engine.add_guest(NewGuest::named("G1"));
    engine.move_guest_to_seat(g1, a, 0).unwrap();
    engine.take_persist_ops();

    engine.move_guest_to_seat(g1, b, 2).unwrap();

    let plan = engine.plan();
    assert_eq!(plan.occupant(a, 0), Ok(None));
    assert_eq!(plan.occupant(b, 2), Ok(Some(g1)));
    assert_eq!(plan.seat_of(g1), Some(SeatRef { table_id: b, seat_index: 2 }));
    assert_eq!(
        engine.take_persist_ops(),
        vec![PersistOp::SaveTable(a), PersistOp::SaveTable(b)]
    );
}

#[test]
fn test_deleting_table_with_three_guests_unseats_all_of_them() {
    let mut engine = engine();
    let t = engine.create_table(TableShape::Oval, 10, Point::ORIGIN).unwrap();
    let guests: Vec<_> = (0..3)
        .map(|i| engine.add_guest(NewGuest::named(format!("Guest {i}"))))
        .collect();
    for (i, g) in guests.iter().enumerate() {
        engine.move_guest_to_seat(*g, t, i * 3).unwrap();
    }

    let mut unseated = engine.delete_table(t).unwrap();

    unseated.sort();
    let mut expected = guests.clone();
    expected.sort();
    assert_eq!(unseated, expected);
    for g in guests {
        assert!(!engine.plan().is_guest_seated(g));
        assert!(engine.plan().guest(g).is_some(), "guests survive their table");
    }
}

#[test]
fn test_occupied_drop_leaves_both_guests_where_they_were() {
    let mut engine = engine();
    let t = engine.create_table(TableShape::Round, 8, Point::ORIGIN).unwrap();
    let g1 = engine.add_guest(NewGuest::named("G1"));
    let g2 = engine.add_guest(NewGuest::named("G2"));
    engine.move_guest_to_seat(g1, t, 0).unwrap();
    engine.take_persist_ops();

    let result = engine.move_guest_to_seat(g2, t, 0);

    assert_eq!(
        result,
        Err(SeatingError::SeatOccupied { table_id: t, seat_index: 0, occupant: g1 })
    );
    assert_eq!(engine.plan().seat_of(g1), Some(SeatRef { table_id: t, seat_index: 0 }));
    assert!(!engine.plan().is_guest_seated(g2));
    assert!(engine.take_persist_ops().is_empty(), "failed moves persist nothing");
}

// ── Interaction scenarios ─────────────────────────────────────────────────────

#[test]
fn test_drag_table_then_drop_guest_on_moved_seat() {
    let mut controller = LayoutController::new(engine(), InteractionSettings::default());
    let t = match controller
        .handle(LayoutCommand::AddTable {
            shape: Some(TableShape::Square),
            capacity: Some(4),
            position: Point::new(100.0, 100.0),
        })
        .unwrap()
    {
        CommandOutcome::TableCreated { table_id } => table_id,
        other => panic!("unexpected {other:?}"),
    };
    let g = controller.engine_mut().add_guest(NewGuest::named("Ivy"));

    controller
        .handle(LayoutCommand::BeginTableDrag { table_id: t, pointer: Point::new(100.0, 100.0) })
        .unwrap();
    controller
        .handle(LayoutCommand::EndDrag { pointer: Point::new(400.0, 300.0) })
        .unwrap();
    let seat_center = controller.engine().plan().table_view(t).unwrap().seats[1].center;

    let outcome = controller
        .handle(LayoutCommand::DropGuestAt { guest_id: g, pointer: seat_center })
        .unwrap();

    assert_eq!(
        controller.engine().plan().table(t).unwrap().position(),
        Point::new(400.0, 300.0)
    );
    let to = SeatRef { table_id: t, seat_index: 1 };
    assert_eq!(outcome, CommandOutcome::GuestMoved { guest_id: g, from: None, to });
}

// ── Persistence round trips ───────────────────────────────────────────────────

#[tokio::test]
async fn test_session_changes_reach_store_and_reload_identically() {
    // Arrange
    let store = Arc::new(MemoryStore::default());
    let (queue, worker) = SyncQueue::spawn(store.clone());
    let mut session = PlannerSession::new(SeatingPlan::new(), &AppConfig::default(), Some(queue));

    // Act
    session.dispatch(LayoutCommand::AddTable {
        shape: Some(TableShape::Rectangular),
        capacity: Some(6),
        position: Point::new(300.0, 300.0),
    });
    session.dispatch(LayoutCommand::AddGuest { guest: NewGuest::named("Noor").in_group("Groom") });
    let t = session.plan().tables().next().unwrap().id();
    let g = session.plan().guests().next().unwrap().id;
    session.dispatch(LayoutCommand::DropGuest { guest_id: g, table_id: t, seat_index: 5 });
    session.dispatch(LayoutCommand::ResizeTable { table_id: t, capacity: 3 });
    let expected = session.snapshot();
    drop(session.into_sync());
    let stats = worker.await.unwrap();

    // Assert
    assert_eq!(stats.failed, 0);
    let reloaded = SeatingPlan::from_snapshot(store.load().await.unwrap()).unwrap();
    assert_eq!(reloaded.snapshot(), expected);
    assert!(!reloaded.is_guest_seated(g), "resize displaced the guest");
    assert_eq!(reloaded.table(t).unwrap().capacity(), 3);
}

#[tokio::test]
async fn test_json_file_store_survives_process_restart() {
    let path = std::env::temp_dir()
        .join(format!("seating_it_{}", Uuid::new_v4()))
        .join("plan.json");

    // First "run": build a plan and let the worker write it.
    {
        let store = Arc::new(JsonFileStore::new(&path));
        let (queue, worker) = SyncQueue::spawn(store);
        let mut session =
            PlannerSession::new(SeatingPlan::new(), &AppConfig::default(), Some(queue));
        session.dispatch(LayoutCommand::AddTable {
            shape: None,
            capacity: None,
            position: Point::new(50.0, 50.0),
        });
        session.dispatch(LayoutCommand::AddGuest { guest: NewGuest::named("Ola") });
        let t = session.plan().tables().next().unwrap().id();
        let g = session.plan().guests().next().unwrap().id;
        session.dispatch(LayoutCommand::DropGuest { guest_id: g, table_id: t, seat_index: 4 });
        drop(session.into_sync());
        assert_eq!(worker.await.unwrap().failed, 0);
    }

    // Second "run": load from disk.
    let snapshot = JsonFileStore::new(&path).load().await.unwrap();
    let plan = SeatingPlan::from_snapshot(snapshot).unwrap();
    assert_eq!(plan.table_count(), 1);
    assert_eq!(plan.seated_count(), 1);
    let seat = plan.seat_of(plan.guests().next().unwrap().id).unwrap();
    assert_eq!(seat.seat_index, 4);

    if let Some(dir) = path.parent() {
        std::fs::remove_dir_all(dir).ok();
    }
}
