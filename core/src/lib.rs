#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bastion Planner engine.
//!
//! This crate defines the message surface that connects adapters and the
//! authoritative editor world. Adapters submit [`Command`] values describing
//! desired mutations, the editor executes those commands via its `apply`
//! entry point, and then broadcasts [`Event`] values so adapters can confirm
//! effects deterministically. The piece catalog, coordinate newtypes and the
//! serializable [`LayoutSnapshot`] contract also live here so that the
//! persistence and rendering collaborators never depend on editor internals.

use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

mod catalog;

pub use catalog::{BorderSpec, Category, Faction, Footprint, PieceKind, PieceTemplate, Shape};

/// Highest addressable level index in the editor's vertical stack.
pub const MAX_LEVEL: u8 = 10;

/// Number of levels carried by every layout (indices `0..=MAX_LEVEL`).
pub const LEVEL_COUNT: usize = MAX_LEVEL as usize + 1;

/// Commands that express all permissible editor mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Arms the placement preview with the provided catalog kind.
    ///
    /// Re-sending the kind that is already armed cancels the preview, which
    /// mirrors toggling a sidebar entry on and off.
    BeginPlacement {
        /// Catalog kind the preview should assume.
        kind: PieceKind,
    },
    /// Discards the placement preview without placing anything.
    CancelPlacement,
    /// Reports the cursor's world position so the preview can follow it.
    ///
    /// A `None` position indicates that the pointer left the editing surface
    /// and hides the preview until the cursor returns.
    HoverAt {
        /// Cursor position in world coordinates, if the cursor is present.
        position: Option<WorldPoint>,
    },
    /// Rotates the placement preview by a quarter turn.
    ///
    /// Preview rotation is transient and therefore never snapshotted.
    RotatePreview,
    /// Places a new piece of `kind` with the cursor at `position`.
    PlacePiece {
        /// Catalog kind of the piece to create.
        kind: PieceKind,
        /// Cursor position in world coordinates; its grid cell becomes the
        /// piece's home cell.
        position: WorldPoint,
        /// Rotation applied to the piece at creation time.
        rotation: Rotation,
    },
    /// Hit-tests the current level at `position`, selecting the topmost
    /// piece or clearing the selection on a miss.
    SelectAt {
        /// Probe position in world coordinates.
        position: WorldPoint,
    },
    /// Centers the selected piece on the cursor during a drag gesture.
    ///
    /// Drag updates are unsnapped and covered by the snapshot taken when the
    /// piece was selected.
    DragSelected {
        /// Cursor position in world coordinates.
        position: WorldPoint,
    },
    /// Commits a drag gesture, re-homing the selected piece to the cursor's
    /// grid cell and snapping it onto that cell's center.
    CommitSelectedMove {
        /// Cursor position in world coordinates at release time.
        position: WorldPoint,
    },
    /// Rotates the selected piece by a quarter turn and re-snaps it onto its
    /// existing home cell.
    RotateSelected,
    /// Deletes the selected piece together with any border it owns.
    DeleteSelected,
    /// Moves the active level up or down within the stack bounds.
    ChangeLevel {
        /// Direction of travel through the level stack.
        shift: LevelShift,
    },
    /// Sets the camera offset to a new absolute value (drag panning).
    PanCamera {
        /// New camera offset in screen coordinates.
        offset: ScreenPoint,
    },
    /// Zooms the camera by whole notches anchored at a screen point.
    ZoomCamera {
        /// Screen point that should keep covering the same world point.
        anchor: ScreenPoint,
        /// Signed number of zoom notches; positive zooms in.
        steps: i32,
    },
    /// Clears every level and returns the session to its initial state.
    ClearLayout,
    /// Restores the most recent undo snapshot, if one exists.
    Undo,
    /// Re-applies the most recently undone snapshot, if one exists.
    Redo,
    /// Replaces the live layout with a previously persisted snapshot.
    LoadLayout {
        /// Layout to install as the new live state.
        layout: LayoutSnapshot,
    },
}

/// Events broadcast by the editor after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a piece was created and appended to a level.
    PiecePlaced {
        /// Identifier allocated to the new piece.
        piece: PieceId,
        /// Catalog kind of the placed piece.
        kind: PieceKind,
        /// Level that received the piece.
        level: LevelIndex,
    },
    /// Confirms that a fief border was synthesized for a placed piece.
    BorderCreated {
        /// Identifier of the piece that owns the border.
        owner: PieceId,
        /// Level that received the border.
        level: LevelIndex,
    },
    /// Announces that the first fief was placed and the base is now started.
    BaseStarted,
    /// Confirms that a piece was selected and promoted to the front.
    PieceSelected {
        /// Identifier of the selected piece.
        piece: PieceId,
    },
    /// Announces that the selection was cleared.
    SelectionCleared,
    /// Confirms that a drag gesture was committed onto a grid cell.
    PieceMoved {
        /// Identifier of the moved piece.
        piece: PieceId,
        /// Snapped top-left position after the move.
        position: WorldPoint,
    },
    /// Confirms that the selected piece was rotated.
    PieceRotated {
        /// Identifier of the rotated piece.
        piece: PieceId,
        /// Rotation the piece now carries.
        rotation: Rotation,
    },
    /// Confirms that a piece was removed from a level.
    PieceDeleted {
        /// Identifier of the deleted piece.
        piece: PieceId,
        /// Catalog kind of the deleted piece.
        kind: PieceKind,
        /// Level the piece was removed from.
        level: LevelIndex,
    },
    /// Confirms that an owned border was removed with its piece.
    BorderRemoved {
        /// Identifier of the piece that owned the border.
        owner: PieceId,
        /// Level the border was removed from.
        level: LevelIndex,
    },
    /// Announces that the active level changed.
    LevelChanged {
        /// Level that became active.
        level: LevelIndex,
    },
    /// Announces that the camera transform changed.
    CameraChanged {
        /// Absolute camera offset in screen coordinates.
        offset: ScreenPoint,
        /// Zoom factor after clamping.
        zoom: f32,
    },
    /// Confirms that every level was cleared.
    LayoutCleared,
    /// Announces that the live layout was replaced wholesale.
    LayoutRestored {
        /// Operation that produced the restored layout.
        cause: RestoreCause,
    },
}

/// Operations that replace the live layout with a stored snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RestoreCause {
    /// The layout was restored from the undo stack.
    Undo,
    /// The layout was restored from the redo stack.
    Redo,
    /// The layout was loaded from the persistence collaborator.
    Load,
}

/// Direction of travel through the level stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelShift {
    /// Move toward higher level indices.
    Up,
    /// Move toward lower level indices.
    Down,
}

/// Unique identifier assigned to a piece by the editor world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(u64);

impl PieceId {
    /// Creates a new piece identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Index of a level within the editor's fixed vertical stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelIndex(u8);

impl LevelIndex {
    /// Creates a new level index, clamped to the stack bounds.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        if value > MAX_LEVEL {
            Self(MAX_LEVEL)
        } else {
            Self(value)
        }
    }

    /// The ground level at the bottom of the stack.
    #[must_use]
    pub const fn ground() -> Self {
        Self(0)
    }

    /// Retrieves the underlying level number.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Position of the level within dense per-level storage.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// The level directly above, unless this is the topmost level.
    #[must_use]
    pub const fn up(&self) -> Option<Self> {
        if self.0 < MAX_LEVEL {
            Some(Self(self.0 + 1))
        } else {
            None
        }
    }

    /// The level directly below, unless this is the ground level.
    #[must_use]
    pub const fn down(&self) -> Option<Self> {
        if self.0 > 0 {
            Some(Self(self.0 - 1))
        } else {
            None
        }
    }
}

/// Rotation applied to a piece, restricted to cardinal quarter turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    /// No rotation.
    R0,
    /// Quarter turn clockwise.
    R90,
    /// Half turn.
    R180,
    /// Three-quarter turn clockwise.
    R270,
}

impl Rotation {
    /// Rotation advanced by a further quarter turn, wrapping past 270°.
    #[must_use]
    pub const fn advanced(self) -> Self {
        match self {
            Self::R0 => Self::R90,
            Self::R90 => Self::R180,
            Self::R180 => Self::R270,
            Self::R270 => Self::R0,
        }
    }

    /// Reports whether the rotation exchanges a footprint's axes.
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Self::R90 | Self::R270)
    }

    /// Rotation expressed in degrees.
    #[must_use]
    pub const fn degrees(self) -> f32 {
        match self {
            Self::R0 => 0.0,
            Self::R90 => 90.0,
            Self::R180 => 180.0,
            Self::R270 => 270.0,
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::R0
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees() as u16
    }
}

impl TryFrom<u16> for Rotation {
    type Error = InvalidRotation;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::R0),
            90 => Ok(Self::R90),
            180 => Ok(Self::R180),
            270 => Ok(Self::R270),
            other => Err(InvalidRotation { degrees: other }),
        }
    }
}

/// Error raised when a serialized rotation is not a cardinal quarter turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidRotation {
    /// Value that failed validation.
    pub degrees: u16,
}

impl fmt::Display for InvalidRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rotation must be one of 0, 90, 180 or 270 degrees (received {})",
            self.degrees
        )
    }
}

impl Error for InvalidRotation {}

/// Position expressed in world coordinates over the infinite grid plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal world coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical world coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Position translated by the provided deltas.
    #[must_use]
    pub fn offset_by(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Position expressed in screen coordinates as delivered by input devices.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    x: f32,
    y: f32,
}

impl ScreenPoint {
    /// Creates a new screen-space position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal screen coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical screen coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Opaque RGB color carried by catalog templates and synthesized borders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorRgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl ColorRgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// A placed piece instance within a level's paint-ordered sequence.
///
/// The piece's footprint is never stored; it is derived on demand from the
/// catalog template and the carried rotation so the two can never drift
/// apart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// Identifier allocated by the editor world.
    pub id: PieceId,
    /// Catalog kind the piece was created from.
    pub kind: PieceKind,
    /// Rotation currently applied to the piece.
    pub rotation: Rotation,
    /// Top-left corner of the rotation-adjusted footprint in world units.
    pub position: WorldPoint,
    /// Origin of the grid cell the piece is anchored to, in world units.
    pub home: WorldPoint,
}

impl Piece {
    /// Footprint of the piece in world units, honoring its rotation.
    #[must_use]
    pub fn footprint(&self, cell_size: f32) -> Footprint {
        self.kind.template().footprint(self.rotation, cell_size)
    }

    /// Center of the piece's footprint in world units.
    #[must_use]
    pub fn center(&self, cell_size: f32) -> WorldPoint {
        let footprint = self.footprint(cell_size);
        self.position
            .offset_by(footprint.width / 2.0, footprint.height / 2.0)
    }
}

/// Square region synthesized around a fief piece.
///
/// A border has no identity beyond its owner: it is created atomically with
/// the owning piece and removed atomically when that piece is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// Top-left corner of the border rectangle in world units.
    pub position: WorldPoint,
    /// Width of the border rectangle in world units.
    pub width: f32,
    /// Height of the border rectangle in world units.
    pub height: f32,
    /// Color the rendering collaborator should outline the border with.
    pub color: ColorRgb,
    /// Identifier of the piece that produced the border.
    pub owner: PieceId,
}

/// Deep, self-contained copy of every level's pieces and borders.
///
/// The snapshot doubles as the persistence payload and as the unit pushed
/// onto the undo/redo stacks; its owned collections guarantee that no stored
/// state aliases the live level store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Per-level piece sequences in paint order, one entry per level.
    pub pieces: Vec<Vec<Piece>>,
    /// Per-level border sequences, one entry per level.
    #[serde(default)]
    pub borders: Vec<Vec<Border>>,
    /// Whether a fief has been placed in this layout.
    #[serde(default, rename = "baseStarted")]
    pub base_started: bool,
}

impl LayoutSnapshot {
    /// Creates an empty snapshot covering the full level stack.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            pieces: vec![Vec::new(); LEVEL_COUNT],
            borders: vec![Vec::new(); LEVEL_COUNT],
            base_started: false,
        }
    }

    /// Pads or truncates the per-level collections to the fixed stack size.
    ///
    /// Deserialized payloads may carry fewer levels (legacy saves) or more
    /// (corrupt input); normalizing keeps the level store's shape invariant.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.pieces.truncate(LEVEL_COUNT);
        self.pieces.resize_with(LEVEL_COUNT, Vec::new);
        self.borders.truncate(LEVEL_COUNT);
        self.borders.resize_with(LEVEL_COUNT, Vec::new);
        self
    }

    /// Reports whether the snapshot contains no pieces on any level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.iter().all(Vec::is_empty)
    }

    /// Highest piece identifier present in the snapshot, if any.
    #[must_use]
    pub fn max_piece_id(&self) -> Option<PieceId> {
        self.pieces
            .iter()
            .flat_map(|level| level.iter())
            .map(|piece| piece.id)
            .max()
    }
}

impl Default for LayoutSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn piece_id_round_trips_through_bincode() {
        assert_round_trip(&PieceId::new(42));
    }

    #[test]
    fn rotation_round_trips_through_bincode() {
        for rotation in [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270] {
            assert_round_trip(&rotation);
        }
    }

    #[test]
    fn piece_round_trips_through_bincode() {
        let piece = Piece {
            id: PieceId::new(7),
            kind: PieceKind::Stairs,
            rotation: Rotation::R90,
            position: WorldPoint::new(75.0, 100.0),
            home: WorldPoint::new(100.0, 100.0),
        };
        assert_round_trip(&piece);
    }

    #[test]
    fn border_round_trips_through_bincode() {
        let border = Border {
            position: WorldPoint::new(-25.0, -25.0),
            width: 250.0,
            height: 250.0,
            color: ColorRgb::from_rgb(0, 0, 139),
            owner: PieceId::new(3),
        };
        assert_round_trip(&border);
    }

    #[test]
    fn layout_snapshot_round_trips_through_bincode() {
        let mut snapshot = LayoutSnapshot::empty();
        snapshot.pieces[0].push(Piece {
            id: PieceId::new(1),
            kind: PieceKind::SubFief,
            rotation: Rotation::R0,
            position: WorldPoint::new(100.0, 100.0),
            home: WorldPoint::new(100.0, 100.0),
        });
        snapshot.base_started = true;
        assert_round_trip(&snapshot);
    }

    #[test]
    fn rotation_rejects_non_cardinal_degrees() {
        let error = Rotation::try_from(45).expect_err("45 degrees must be rejected");
        assert_eq!(error.degrees, 45);
    }

    #[test]
    fn rotation_advances_through_a_full_turn() {
        let mut rotation = Rotation::R0;
        for _ in 0..4 {
            rotation = rotation.advanced();
        }
        assert_eq!(rotation, Rotation::R0);
    }

    #[test]
    fn only_quarter_and_three_quarter_turns_swap_axes() {
        assert!(!Rotation::R0.swaps_axes());
        assert!(Rotation::R90.swaps_axes());
        assert!(!Rotation::R180.swaps_axes());
        assert!(Rotation::R270.swaps_axes());
    }

    #[test]
    fn level_index_clamps_to_stack_bounds() {
        assert_eq!(LevelIndex::new(25).get(), MAX_LEVEL);
        assert_eq!(LevelIndex::new(3).get(), 3);
    }

    #[test]
    fn level_index_navigation_stops_at_bounds() {
        assert!(LevelIndex::ground().down().is_none());
        assert!(LevelIndex::new(MAX_LEVEL).up().is_none());
        assert_eq!(LevelIndex::ground().up(), Some(LevelIndex::new(1)));
    }

    #[test]
    fn normalized_pads_missing_levels() {
        let snapshot = LayoutSnapshot {
            pieces: vec![Vec::new(); 3],
            borders: Vec::new(),
            base_started: false,
        }
        .normalized();

        assert_eq!(snapshot.pieces.len(), LEVEL_COUNT);
        assert_eq!(snapshot.borders.len(), LEVEL_COUNT);
    }

    #[test]
    fn max_piece_id_spans_all_levels() {
        let mut snapshot = LayoutSnapshot::empty();
        snapshot.pieces[0].push(Piece {
            id: PieceId::new(4),
            kind: PieceKind::Foundation,
            rotation: Rotation::R0,
            position: WorldPoint::new(0.0, 0.0),
            home: WorldPoint::new(0.0, 0.0),
        });
        snapshot.pieces[6].push(Piece {
            id: PieceId::new(9),
            kind: PieceKind::Wall,
            rotation: Rotation::R0,
            position: WorldPoint::new(0.0, 0.0),
            home: WorldPoint::new(0.0, 0.0),
        });

        assert_eq!(snapshot.max_piece_id(), Some(PieceId::new(9)));
    }
}
