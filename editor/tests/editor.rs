//! End-to-end command/event exercises for the editing session.

use bastion_core::{
    Command, Event, LayoutSnapshot, LevelIndex, LevelShift, Piece, PieceId, PieceKind,
    RestoreCause, Rotation, ScreenPoint, WorldPoint,
};
use bastion_editor::{apply, query, EditorWorld, InvalidCellSize, MAX_ZOOM, MIN_ZOOM};

fn submit(world: &mut EditorWorld, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}

fn place_at(world: &mut EditorWorld, kind: PieceKind, x: f32, y: f32) -> PieceId {
    let events = submit(
        world,
        Command::PlacePiece {
            kind,
            position: WorldPoint::new(x, y),
            rotation: Rotation::R0,
        },
    );
    events
        .iter()
        .find_map(|event| match event {
            Event::PiecePlaced { piece, .. } => Some(*piece),
            _ => None,
        })
        .expect("placement must announce the new piece")
}

#[test]
fn selecting_a_piece_promotes_it_to_the_top_of_paint_order() {
    let mut world = EditorWorld::new();
    let first = place_at(&mut world, PieceKind::Foundation, 25.0, 25.0);
    let second = place_at(&mut world, PieceKind::Foundation, 25.0, 25.0);

    // Both pieces cover the probe point; the later one wins, and selecting
    // it keeps it on top. Selecting the first moves it above the second.
    let events = submit(
        &mut world,
        Command::SelectAt {
            position: WorldPoint::new(25.0, 25.0),
        },
    );
    assert_eq!(events, vec![Event::PieceSelected { piece: second }]);

    let ids: Vec<PieceId> = query::pieces(&world, LevelIndex::ground())
        .iter()
        .map(|piece| piece.id)
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn clicking_empty_space_clears_the_selection() {
    let mut world = EditorWorld::new();
    let piece = place_at(&mut world, PieceKind::Foundation, 25.0, 25.0);
    let _ = submit(
        &mut world,
        Command::SelectAt {
            position: WorldPoint::new(25.0, 25.0),
        },
    );
    assert_eq!(query::selected_piece(&world).map(|p| p.id), Some(piece));

    let events = submit(
        &mut world,
        Command::SelectAt {
            position: WorldPoint::new(900.0, 900.0),
        },
    );
    assert_eq!(events, vec![Event::SelectionCleared]);
    assert!(query::selected_piece(&world).is_none());
}

#[test]
fn dragging_is_unsnapped_and_committing_re_homes_the_piece() {
    let mut world = EditorWorld::new();
    let id = place_at(&mut world, PieceKind::Foundation, 25.0, 25.0);
    let _ = submit(
        &mut world,
        Command::SelectAt {
            position: WorldPoint::new(25.0, 25.0),
        },
    );

    let _ = submit(
        &mut world,
        Command::DragSelected {
            position: WorldPoint::new(137.0, 88.0),
        },
    );
    let dragged = query::selected_piece(&world).expect("selected");
    assert_eq!(dragged.position, WorldPoint::new(112.0, 63.0));

    let events = submit(
        &mut world,
        Command::CommitSelectedMove {
            position: WorldPoint::new(137.0, 88.0),
        },
    );
    assert_eq!(
        events,
        vec![Event::PieceMoved {
            piece: id,
            position: WorldPoint::new(100.0, 50.0),
        }]
    );
    let committed = query::selected_piece(&world).expect("selected");
    assert_eq!(committed.home, WorldPoint::new(100.0, 50.0));
    assert_eq!(committed.position, WorldPoint::new(100.0, 50.0));
}

#[test]
fn rotating_the_selection_re_snaps_onto_the_home_cell() {
    let mut world = EditorWorld::new();
    let id = place_at(&mut world, PieceKind::Stairs, 125.0, 125.0);
    let _ = submit(
        &mut world,
        Command::SelectAt {
            position: WorldPoint::new(125.0, 125.0),
        },
    );

    let events = submit(&mut world, Command::RotateSelected);
    assert_eq!(
        events,
        vec![Event::PieceRotated {
            piece: id,
            rotation: Rotation::R90,
        }]
    );

    // Stairs lie sideways after a quarter turn: 100 wide, 50 tall, still
    // centered on the home cell at (100, 100).
    let piece = query::selected_piece(&world).expect("selected");
    assert_eq!(piece.home, WorldPoint::new(100.0, 100.0));
    assert_eq!(piece.position, WorldPoint::new(75.0, 100.0));
}

#[test]
fn deleting_a_fief_removes_its_border_atomically() {
    let mut world = EditorWorld::new();
    let id = place_at(&mut world, PieceKind::SubFief, 125.0, 125.0);
    assert_eq!(query::borders(&world, LevelIndex::ground()).len(), 1);

    let _ = submit(
        &mut world,
        Command::SelectAt {
            position: WorldPoint::new(125.0, 125.0),
        },
    );
    let events = submit(&mut world, Command::DeleteSelected);

    assert_eq!(
        events,
        vec![
            Event::PieceDeleted {
                piece: id,
                kind: PieceKind::SubFief,
                level: LevelIndex::ground(),
            },
            Event::BorderRemoved {
                owner: id,
                level: LevelIndex::ground(),
            },
        ]
    );
    assert!(query::pieces(&world, LevelIndex::ground()).is_empty());
    assert!(query::borders(&world, LevelIndex::ground()).is_empty());
    assert!(query::selected_piece(&world).is_none());
}

#[test]
fn level_navigation_stops_at_the_stack_bounds() {
    let mut world = EditorWorld::new();

    let events = submit(
        &mut world,
        Command::ChangeLevel {
            shift: LevelShift::Down,
        },
    );
    assert!(events.is_empty());
    assert_eq!(query::current_level(&world), LevelIndex::ground());

    for _ in 0..20 {
        let _ = submit(
            &mut world,
            Command::ChangeLevel {
                shift: LevelShift::Up,
            },
        );
    }
    assert_eq!(query::current_level(&world), LevelIndex::new(10));
}

#[test]
fn changing_level_clears_the_selection() {
    let mut world = EditorWorld::new();
    let _ = place_at(&mut world, PieceKind::Foundation, 25.0, 25.0);
    let _ = submit(
        &mut world,
        Command::SelectAt {
            position: WorldPoint::new(25.0, 25.0),
        },
    );

    let events = submit(
        &mut world,
        Command::ChangeLevel {
            shift: LevelShift::Up,
        },
    );
    assert_eq!(
        events,
        vec![
            Event::SelectionCleared,
            Event::LevelChanged {
                level: LevelIndex::new(1),
            },
        ]
    );
    assert!(query::selected_piece(&world).is_none());
}

#[test]
fn pieces_land_on_the_level_being_edited() {
    let mut world = EditorWorld::new();
    let _ = submit(
        &mut world,
        Command::ChangeLevel {
            shift: LevelShift::Up,
        },
    );
    let _ = place_at(&mut world, PieceKind::Wall, 25.0, 25.0);

    assert!(query::pieces(&world, LevelIndex::ground()).is_empty());
    assert_eq!(query::pieces(&world, LevelIndex::new(1)).len(), 1);
}

#[test]
fn undo_restores_the_pre_placement_layout() {
    let mut world = EditorWorld::new();
    let _ = place_at(&mut world, PieceKind::SubFief, 25.0, 25.0);
    assert!(query::base_started(&world));

    let events = submit(&mut world, Command::Undo);
    assert_eq!(
        events,
        vec![Event::LayoutRestored {
            cause: RestoreCause::Undo,
        }]
    );
    assert!(query::pieces(&world, LevelIndex::ground()).is_empty());
    assert!(query::borders(&world, LevelIndex::ground()).is_empty());
    assert!(!query::base_started(&world));
}

#[test]
fn redo_replays_an_undone_placement() {
    let mut world = EditorWorld::new();
    let _ = place_at(&mut world, PieceKind::Foundation, 25.0, 25.0);
    let _ = submit(&mut world, Command::Undo);
    assert!(query::can_redo(&world));

    let events = submit(&mut world, Command::Redo);
    assert_eq!(
        events,
        vec![Event::LayoutRestored {
            cause: RestoreCause::Redo,
        }]
    );
    assert_eq!(query::pieces(&world, LevelIndex::ground()).len(), 1);
}

#[test]
fn undo_clears_selection_and_placement_preview() {
    let mut world = EditorWorld::new();
    let _ = place_at(&mut world, PieceKind::Foundation, 25.0, 25.0);
    let _ = submit(
        &mut world,
        Command::SelectAt {
            position: WorldPoint::new(25.0, 25.0),
        },
    );
    let _ = submit(&mut world, Command::Undo);
    let _ = submit(
        &mut world,
        Command::BeginPlacement {
            kind: PieceKind::Wall,
        },
    );

    let _ = submit(&mut world, Command::Undo);
    assert!(query::selected_piece(&world).is_none());
    assert!(query::preview(&world).is_none());
}

#[test]
fn a_new_mutation_invalidates_the_redo_stack() {
    let mut world = EditorWorld::new();
    let _ = place_at(&mut world, PieceKind::Foundation, 25.0, 25.0);
    let _ = submit(&mut world, Command::Undo);
    assert!(query::can_redo(&world));

    let _ = place_at(&mut world, PieceKind::Wall, 75.0, 75.0);
    assert!(!query::can_redo(&world));
}

#[test]
fn undo_snapshots_are_isolated_from_later_mutations() {
    let mut world = EditorWorld::new();
    let _ = place_at(&mut world, PieceKind::Foundation, 25.0, 25.0);
    let _ = submit(
        &mut world,
        Command::SelectAt {
            position: WorldPoint::new(25.0, 25.0),
        },
    );
    let _ = submit(&mut world, Command::RotateSelected);
    let _ = submit(&mut world, Command::RotateSelected);

    // Two undos step back through both rotations one at a time, proving the
    // stack held deep copies rather than aliases of the live piece.
    let _ = submit(&mut world, Command::Undo);
    assert_eq!(
        query::pieces(&world, LevelIndex::ground())[0].rotation,
        Rotation::R90
    );
    let _ = submit(&mut world, Command::Undo);
    assert_eq!(
        query::pieces(&world, LevelIndex::ground())[0].rotation,
        Rotation::R0
    );
}

#[test]
fn clearing_resets_the_layout_but_keeps_the_preview_armed() {
    let mut world = EditorWorld::new();
    let _ = place_at(&mut world, PieceKind::SubFief, 25.0, 25.0);
    let _ = submit(
        &mut world,
        Command::BeginPlacement {
            kind: PieceKind::Wall,
        },
    );

    let events = submit(&mut world, Command::ClearLayout);
    assert_eq!(events, vec![Event::LayoutCleared]);
    assert!(query::pieces(&world, LevelIndex::ground()).is_empty());
    assert!(!query::base_started(&world));
    assert!(query::preview(&world).is_some());

    // The cleared layout is undoable.
    let _ = submit(&mut world, Command::Undo);
    assert_eq!(query::pieces(&world, LevelIndex::ground()).len(), 1);
}

#[test]
fn loading_a_layout_resets_history_and_returns_to_ground_level() {
    let mut world = EditorWorld::new();
    let _ = submit(
        &mut world,
        Command::ChangeLevel {
            shift: LevelShift::Up,
        },
    );
    let _ = place_at(&mut world, PieceKind::Foundation, 25.0, 25.0);

    let mut layout = LayoutSnapshot::empty();
    layout.pieces[2].push(Piece {
        id: PieceId::new(41),
        kind: PieceKind::Wall,
        rotation: Rotation::R0,
        position: WorldPoint::new(0.0, 0.0),
        home: WorldPoint::new(0.0, 0.0),
    });
    layout.base_started = true;

    let events = submit(&mut world, Command::LoadLayout { layout });
    assert_eq!(
        events,
        vec![
            Event::LayoutRestored {
                cause: RestoreCause::Load,
            },
            Event::LevelChanged {
                level: LevelIndex::ground(),
            },
        ]
    );
    assert_eq!(query::current_level(&world), LevelIndex::ground());
    assert_eq!(query::pieces(&world, LevelIndex::new(2)).len(), 1);
    assert!(query::base_started(&world));
    assert!(!query::can_redo(&world));

    // New pieces must not collide with identifiers from the loaded layout.
    let fresh = place_at(&mut world, PieceKind::Foundation, 25.0, 25.0);
    assert!(fresh.get() > 41);
}

#[test]
fn camera_zoom_is_clamped_and_reported() {
    let mut world = EditorWorld::new();
    let anchor = ScreenPoint::new(200.0, 150.0);

    let events = submit(
        &mut world,
        Command::ZoomCamera {
            anchor,
            steps: 1_000,
        },
    );
    match events.as_slice() {
        [Event::CameraChanged { zoom, .. }] => assert_eq!(*zoom, MAX_ZOOM),
        other => panic!("expected a single camera event, got {other:?}"),
    }

    let events = submit(
        &mut world,
        Command::ZoomCamera {
            anchor,
            steps: -1_000,
        },
    );
    match events.as_slice() {
        [Event::CameraChanged { zoom, .. }] => assert_eq!(*zoom, MIN_ZOOM),
        other => panic!("expected a single camera event, got {other:?}"),
    }
}

#[test]
fn zooming_keeps_the_world_point_under_the_anchor() {
    let mut world = EditorWorld::new();
    let anchor = ScreenPoint::new(320.0, 240.0);
    let pivot_before = query::camera(&world).screen_to_world(anchor);

    let _ = submit(&mut world, Command::ZoomCamera { anchor, steps: 4 });
    let pivot_after = query::camera(&world).screen_to_world(anchor);

    assert!((pivot_after.x() - pivot_before.x()).abs() < 1e-3);
    assert!((pivot_after.y() - pivot_before.y()).abs() < 1e-3);
}

#[test]
fn panning_reports_the_absolute_offset() {
    let mut world = EditorWorld::new();
    let events = submit(
        &mut world,
        Command::PanCamera {
            offset: ScreenPoint::new(-30.0, 42.0),
        },
    );

    assert_eq!(
        events,
        vec![Event::CameraChanged {
            offset: ScreenPoint::new(-30.0, 42.0),
            zoom: 1.0,
        }]
    );
}

#[test]
fn rotating_the_preview_does_not_touch_history() {
    let mut world = EditorWorld::new();
    let _ = place_at(&mut world, PieceKind::Stairs, 125.0, 125.0);
    let _ = submit(
        &mut world,
        Command::BeginPlacement {
            kind: PieceKind::Stairs,
        },
    );
    let _ = submit(
        &mut world,
        Command::HoverAt {
            position: Some(WorldPoint::new(125.0, 125.0)),
        },
    );

    let _ = submit(&mut world, Command::RotatePreview);
    let preview = query::preview(&world).expect("preview");
    assert_eq!(preview.rotation, Rotation::R90);
    assert_eq!(preview.position, WorldPoint::new(75.0, 100.0));

    // A single undo removes the placed piece, proving preview rotation
    // pushed nothing onto the stack.
    let _ = submit(&mut world, Command::Undo);
    assert!(query::pieces(&world, LevelIndex::ground()).is_empty());
}

#[test]
fn degenerate_cell_sizes_are_rejected_before_a_session_starts() {
    // A zero pitch would divide every cell snap by zero, so placements
    // would silently land at non-finite coordinates.
    let error = EditorWorld::with_cell_size(0.0).expect_err("zero pitch");
    assert_eq!(error, InvalidCellSize { cell_size: 0.0 });
    assert!(EditorWorld::with_cell_size(-50.0).is_err());
    assert!(EditorWorld::with_cell_size(f32::NAN).is_err());
    assert!(EditorWorld::with_cell_size(f32::INFINITY).is_err());

    let mut world = EditorWorld::with_cell_size(25.0).expect("valid pitch");
    let _ = place_at(&mut world, PieceKind::Foundation, 27.0, 27.0);
    let piece = query::pieces(&world, LevelIndex::ground())[0];
    assert!(piece.position.x().is_finite());
    assert_eq!(piece.home, WorldPoint::new(25.0, 25.0));
}
