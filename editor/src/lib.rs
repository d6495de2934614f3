#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative editing state for Bastion Planner.
//!
//! The [`EditorWorld`] owns the level stack, selection, placement preview,
//! camera and undo history. Adapters never mutate it directly: they submit
//! [`Command`] values through [`apply`] and observe the resulting [`Event`]
//! stream, while the [`query`] module offers read-only projections for
//! presentation and persistence.

use std::{error::Error, fmt};

use bastion_core::{
    Command, Event, LayoutSnapshot, LevelIndex, LevelShift, Piece, PieceId, PieceKind,
    RestoreCause, Rotation, WorldPoint,
};

mod camera;
mod history;
mod levels;
mod placement;

pub use camera::{Camera, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};

use history::History;
use levels::LevelStore;

/// Side length of a grid cell in world units, matching the in-game fief grid.
pub const DEFAULT_CELL_SIZE: f32 = 50.0;

/// Error returned when a session is requested over a degenerate grid pitch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidCellSize {
    /// Cell size that failed validation.
    pub cell_size: f32,
}

impl fmt::Display for InvalidCellSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grid cell size must be positive and finite (received {})",
            self.cell_size
        )
    }
}

impl Error for InvalidCellSize {}

/// Ghost piece that follows the cursor while placement is armed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewPiece {
    /// Catalog kind the preview will place.
    pub kind: PieceKind,
    /// Rotation the placed piece will carry.
    pub rotation: Rotation,
    /// Origin of the grid cell currently under the cursor.
    pub home: WorldPoint,
    /// Snapped top-left position of the preview footprint.
    pub position: WorldPoint,
    /// Whether the cursor is over the editing surface.
    pub visible: bool,
}

impl PreviewPiece {
    /// Creates a freshly armed preview parked outside the visible plane
    /// until the first hover report arrives.
    fn armed(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::R0,
            home: WorldPoint::new(0.0, 0.0),
            position: WorldPoint::new(-100.0, -100.0),
            visible: true,
        }
    }
}

/// Authoritative state of an editing session.
#[derive(Debug)]
pub struct EditorWorld {
    levels: LevelStore,
    base_started: bool,
    current_level: LevelIndex,
    selected: Option<PieceId>,
    preview: Option<PreviewPiece>,
    camera: Camera,
    history: History,
    next_piece_id: u64,
    cell_size: f32,
}

impl Default for EditorWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorWorld {
    /// Creates an empty session over the default grid pitch.
    #[must_use]
    pub fn new() -> Self {
        Self::construct(DEFAULT_CELL_SIZE)
    }

    /// Creates an empty session with a custom grid pitch.
    ///
    /// Cell snapping divides cursor coordinates by the pitch, so zero,
    /// negative and non-finite values are rejected here rather than left to
    /// poison every later placement with non-finite geometry.
    pub fn with_cell_size(cell_size: f32) -> Result<Self, InvalidCellSize> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(InvalidCellSize { cell_size });
        }
        Ok(Self::construct(cell_size))
    }

    /// The empty layout is recorded as the undo baseline so the very first
    /// undo returns to a blank slate.
    fn construct(cell_size: f32) -> Self {
        let mut world = Self {
            levels: LevelStore::new(),
            base_started: false,
            current_level: LevelIndex::ground(),
            selected: None,
            preview: None,
            camera: Camera::new(),
            history: History::new(),
            next_piece_id: 0,
            cell_size,
        };
        world.record_history();
        world
    }

    fn record_history(&mut self) {
        self.history.record(self.levels.snapshot(self.base_started));
    }

    fn allocate_piece_id(&mut self) -> PieceId {
        let id = PieceId::new(self.next_piece_id);
        self.next_piece_id += 1;
        id
    }

    fn install_layout(&mut self, layout: LayoutSnapshot) {
        self.base_started = layout.base_started;
        self.next_piece_id = layout
            .max_piece_id()
            .map_or(self.next_piece_id, |id| self.next_piece_id.max(id.get() + 1));
        self.levels.install(layout);
    }

    fn clear_selection(&mut self, out_events: &mut Vec<Event>) {
        if self.selected.take().is_some() {
            out_events.push(Event::SelectionCleared);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut EditorWorld, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BeginPlacement { kind } => {
            // Re-selecting the armed kind toggles the preview off.
            if world.preview.map(|preview| preview.kind) == Some(kind) {
                world.preview = None;
            } else {
                world.preview = Some(PreviewPiece::armed(kind));
            }
        }
        Command::CancelPlacement => {
            world.preview = None;
        }
        Command::HoverAt { position } => {
            if let Some(preview) = world.preview.as_mut() {
                match position {
                    Some(cursor) => {
                        preview.home = placement::cell_origin(cursor, world.cell_size);
                        preview.position = placement::snapped_position(
                            preview.home,
                            preview.kind,
                            preview.rotation,
                            world.cell_size,
                        );
                        preview.visible = true;
                    }
                    None => preview.visible = false,
                }
            }
        }
        Command::RotatePreview => {
            if let Some(preview) = world.preview.as_mut() {
                preview.rotation = preview.rotation.advanced();
                preview.position = placement::snapped_position(
                    preview.home,
                    preview.kind,
                    preview.rotation,
                    world.cell_size,
                );
            }
        }
        Command::PlacePiece {
            kind,
            position,
            rotation,
        } => {
            world.record_history();
            let home = placement::cell_origin(position, world.cell_size);
            let piece = Piece {
                id: world.allocate_piece_id(),
                kind,
                rotation,
                position: placement::snapped_position(home, kind, rotation, world.cell_size),
                home,
            };
            let level = world.current_level;
            world.levels.push_piece(level, piece);
            out_events.push(Event::PiecePlaced {
                piece: piece.id,
                kind,
                level,
            });

            if let Some(spec) = kind.template().border_spec() {
                let border = placement::border_for(home, spec, world.cell_size, piece.id);
                world.levels.push_border(level, border);
                out_events.push(Event::BorderCreated {
                    owner: piece.id,
                    level,
                });

                if !world.base_started {
                    world.base_started = true;
                    out_events.push(Event::BaseStarted);
                }
            }
        }
        Command::SelectAt { position } => {
            // Armed placement captures clicks, so selection is unavailable.
            if world.preview.is_some() {
                return;
            }
            match world
                .levels
                .hit_test(world.current_level, position, world.cell_size)
            {
                Some(id) => {
                    world.record_history();
                    world.levels.promote(world.current_level, id);
                    world.selected = Some(id);
                    out_events.push(Event::PieceSelected { piece: id });
                }
                None => world.clear_selection(out_events),
            }
        }
        Command::DragSelected { position } => {
            let cell_size = world.cell_size;
            if let Some(id) = world.selected {
                if let Some(piece) = world.levels.piece_mut(world.current_level, id) {
                    piece.position =
                        placement::centered_position(position, piece.kind, piece.rotation, cell_size);
                }
            }
        }
        Command::CommitSelectedMove { position } => {
            let cell_size = world.cell_size;
            if let Some(id) = world.selected {
                if let Some(piece) = world.levels.piece_mut(world.current_level, id) {
                    piece.home = placement::cell_origin(position, cell_size);
                    piece.position =
                        placement::snapped_position(piece.home, piece.kind, piece.rotation, cell_size);
                    out_events.push(Event::PieceMoved {
                        piece: id,
                        position: piece.position,
                    });
                }
            }
        }
        Command::RotateSelected => {
            let cell_size = world.cell_size;
            if let Some(id) = world.selected {
                world.record_history();
                if let Some(piece) = world.levels.piece_mut(world.current_level, id) {
                    piece.rotation = piece.rotation.advanced();
                    piece.position =
                        placement::snapped_position(piece.home, piece.kind, piece.rotation, cell_size);
                    out_events.push(Event::PieceRotated {
                        piece: id,
                        rotation: piece.rotation,
                    });
                }
            }
        }
        Command::DeleteSelected => {
            if let Some(id) = world.selected.take() {
                world.record_history();
                let level = world.current_level;
                // Piece and border removal are attempted independently so a
                // stray border never outlives its owner.
                if let Some(piece) = world.levels.remove_piece(level, id) {
                    out_events.push(Event::PieceDeleted {
                        piece: id,
                        kind: piece.kind,
                        level,
                    });
                }
                if world.levels.remove_border_owned_by(level, id).is_some() {
                    out_events.push(Event::BorderRemoved { owner: id, level });
                }
            }
        }
        Command::ChangeLevel { shift } => {
            let next = match shift {
                LevelShift::Up => world.current_level.up(),
                LevelShift::Down => world.current_level.down(),
            };
            if let Some(level) = next {
                world.current_level = level;
                world.clear_selection(out_events);
                out_events.push(Event::LevelChanged { level });
            }
        }
        Command::PanCamera { offset } => {
            world.camera.set_offset(offset);
            out_events.push(Event::CameraChanged {
                offset: world.camera.offset(),
                zoom: world.camera.zoom(),
            });
        }
        Command::ZoomCamera { anchor, steps } => {
            world.camera.zoom_by(anchor, steps);
            out_events.push(Event::CameraChanged {
                offset: world.camera.offset(),
                zoom: world.camera.zoom(),
            });
        }
        Command::ClearLayout => {
            world.record_history();
            world.levels.clear();
            world.base_started = false;
            world.clear_selection(out_events);
            out_events.push(Event::LayoutCleared);
            if world.current_level != LevelIndex::ground() {
                world.current_level = LevelIndex::ground();
                out_events.push(Event::LevelChanged {
                    level: world.current_level,
                });
            }
        }
        Command::Undo => {
            let current = world.levels.snapshot(world.base_started);
            if let Some(restored) = world.history.undo(current) {
                world.install_layout(restored);
                world.selected = None;
                world.preview = None;
                out_events.push(Event::LayoutRestored {
                    cause: RestoreCause::Undo,
                });
            }
        }
        Command::Redo => {
            let current = world.levels.snapshot(world.base_started);
            if let Some(restored) = world.history.redo(current) {
                world.install_layout(restored);
                world.selected = None;
                world.preview = None;
                out_events.push(Event::LayoutRestored {
                    cause: RestoreCause::Redo,
                });
            }
        }
        Command::LoadLayout { layout } => {
            world.install_layout(layout.normalized());
            world.current_level = LevelIndex::ground();
            world.selected = None;
            world.history.reset();
            world.record_history();
            out_events.push(Event::LayoutRestored {
                cause: RestoreCause::Load,
            });
            out_events.push(Event::LevelChanged {
                level: world.current_level,
            });
        }
    }
}

/// Query functions that provide read-only access to the editor state.
pub mod query {
    use super::{Camera, EditorWorld, PreviewPiece};
    use bastion_core::{Border, LayoutSnapshot, LevelIndex, Piece, PieceId};

    /// Level currently being edited.
    #[must_use]
    pub fn current_level(world: &EditorWorld) -> LevelIndex {
        world.current_level
    }

    /// Side length of a grid cell in world units.
    #[must_use]
    pub fn cell_size(world: &EditorWorld) -> f32 {
        world.cell_size
    }

    /// Reports whether a fief has been placed in this session.
    #[must_use]
    pub fn base_started(world: &EditorWorld) -> bool {
        world.base_started
    }

    /// Pieces on the given level, in paint order.
    #[must_use]
    pub fn pieces(world: &EditorWorld, level: LevelIndex) -> &[Piece] {
        world.levels.pieces(level)
    }

    /// Borders on the given level.
    #[must_use]
    pub fn borders(world: &EditorWorld, level: LevelIndex) -> &[Border] {
        world.levels.borders(level)
    }

    /// Looks up a piece on the given level by identifier.
    #[must_use]
    pub fn piece(world: &EditorWorld, level: LevelIndex, id: PieceId) -> Option<Piece> {
        world.levels.piece(level, id)
    }

    /// The currently selected piece, if any.
    #[must_use]
    pub fn selected_piece(world: &EditorWorld) -> Option<Piece> {
        let id = world.selected?;
        world.levels.piece(world.current_level, id)
    }

    /// The armed placement preview, if any.
    #[must_use]
    pub fn preview(world: &EditorWorld) -> Option<PreviewPiece> {
        world.preview
    }

    /// The viewport camera transform.
    #[must_use]
    pub fn camera(world: &EditorWorld) -> &Camera {
        &world.camera
    }

    /// Captures a deep snapshot of every level for persistence.
    #[must_use]
    pub fn layout_snapshot(world: &EditorWorld) -> LayoutSnapshot {
        world.levels.snapshot(world.base_started)
    }

    /// Reports whether an undo snapshot is available.
    #[must_use]
    pub fn can_undo(world: &EditorWorld) -> bool {
        world.history.can_undo()
    }

    /// Reports whether a redo snapshot is available.
    #[must_use]
    pub fn can_redo(world: &EditorWorld) -> bool {
        world.history.can_redo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(world: &mut EditorWorld, kind: PieceKind, x: f32, y: f32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::PlacePiece {
                kind,
                position: WorldPoint::new(x, y),
                rotation: Rotation::R0,
            },
            &mut events,
        );
        events
    }

    #[test]
    fn placing_a_piece_snaps_it_onto_the_cursor_cell() {
        let mut world = EditorWorld::new();
        let events = place(&mut world, PieceKind::Foundation, 127.0, 63.0);

        assert!(matches!(events[0], Event::PiecePlaced { .. }));
        let piece = query::pieces(&world, LevelIndex::ground())[0];
        assert_eq!(piece.home, WorldPoint::new(100.0, 50.0));
        assert_eq!(piece.position, WorldPoint::new(100.0, 50.0));
    }

    #[test]
    fn placing_a_fief_creates_a_border_and_starts_the_base() {
        let mut world = EditorWorld::new();
        assert!(!query::base_started(&world));

        let events = place(&mut world, PieceKind::SubFief, 110.0, 110.0);

        assert!(events.iter().any(|e| matches!(e, Event::BorderCreated { .. })));
        assert!(events.iter().any(|e| matches!(e, Event::BaseStarted)));
        assert!(query::base_started(&world));

        let border = query::borders(&world, LevelIndex::ground())[0];
        assert_eq!(border.width, 250.0);
        assert_eq!(border.position, WorldPoint::new(0.0, 0.0));
    }

    #[test]
    fn base_started_is_announced_only_once() {
        let mut world = EditorWorld::new();
        let first = place(&mut world, PieceKind::SubFief, 0.0, 0.0);
        let second = place(&mut world, PieceKind::AdvancedSubFief, 300.0, 300.0);

        assert!(first.iter().any(|e| matches!(e, Event::BaseStarted)));
        assert!(!second.iter().any(|e| matches!(e, Event::BaseStarted)));
    }

    #[test]
    fn arming_the_same_kind_twice_toggles_the_preview_off() {
        let mut world = EditorWorld::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BeginPlacement {
                kind: PieceKind::Wall,
            },
            &mut events,
        );
        assert!(query::preview(&world).is_some());

        apply(
            &mut world,
            Command::BeginPlacement {
                kind: PieceKind::Wall,
            },
            &mut events,
        );
        assert!(query::preview(&world).is_none());
    }

    #[test]
    fn hovering_moves_the_preview_and_leaving_hides_it() {
        let mut world = EditorWorld::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BeginPlacement {
                kind: PieceKind::Foundation,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::HoverAt {
                position: Some(WorldPoint::new(127.0, 63.0)),
            },
            &mut events,
        );

        let preview = query::preview(&world).expect("preview");
        assert_eq!(preview.home, WorldPoint::new(100.0, 50.0));
        assert_eq!(preview.position, WorldPoint::new(100.0, 50.0));
        assert!(preview.visible);

        apply(&mut world, Command::HoverAt { position: None }, &mut events);
        assert!(!query::preview(&world).expect("preview").visible);
    }

    #[test]
    fn selection_is_unavailable_while_placement_is_armed() {
        let mut world = EditorWorld::new();
        let _ = place(&mut world, PieceKind::Foundation, 25.0, 25.0);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BeginPlacement {
                kind: PieceKind::Wall,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SelectAt {
                position: WorldPoint::new(25.0, 25.0),
            },
            &mut events,
        );

        assert!(query::selected_piece(&world).is_none());
    }
}
