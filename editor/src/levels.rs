//! Per-level storage for placed pieces and synthesized borders.

use bastion_core::{Border, LayoutSnapshot, LevelIndex, Piece, PieceId, WorldPoint, LEVEL_COUNT};

/// Dense per-level storage holding every placed piece and border.
///
/// Pieces are kept in paint order; the last entry of a level draws on top
/// and therefore wins hit-testing ties.
#[derive(Debug)]
pub(crate) struct LevelStore {
    pieces: Vec<Vec<Piece>>,
    borders: Vec<Vec<Border>>,
}

impl LevelStore {
    /// Creates a store with every level empty.
    pub(crate) fn new() -> Self {
        Self {
            pieces: vec![Vec::new(); LEVEL_COUNT],
            borders: vec![Vec::new(); LEVEL_COUNT],
        }
    }

    /// Empties every level.
    pub(crate) fn clear(&mut self) {
        for level in &mut self.pieces {
            level.clear();
        }
        for level in &mut self.borders {
            level.clear();
        }
    }

    /// Pieces stored on the given level, in paint order.
    pub(crate) fn pieces(&self, level: LevelIndex) -> &[Piece] {
        &self.pieces[level.index()]
    }

    /// Borders stored on the given level.
    pub(crate) fn borders(&self, level: LevelIndex) -> &[Border] {
        &self.borders[level.index()]
    }

    /// Appends a piece to the given level's paint order.
    pub(crate) fn push_piece(&mut self, level: LevelIndex, piece: Piece) {
        self.pieces[level.index()].push(piece);
    }

    /// Appends a border to the given level.
    pub(crate) fn push_border(&mut self, level: LevelIndex, border: Border) {
        self.borders[level.index()].push(border);
    }

    /// Mutable access to a piece on the given level.
    pub(crate) fn piece_mut(&mut self, level: LevelIndex, id: PieceId) -> Option<&mut Piece> {
        self.pieces[level.index()]
            .iter_mut()
            .find(|piece| piece.id == id)
    }

    /// Read-only access to a piece on the given level.
    pub(crate) fn piece(&self, level: LevelIndex, id: PieceId) -> Option<Piece> {
        self.pieces[level.index()]
            .iter()
            .find(|piece| piece.id == id)
            .copied()
    }

    /// Moves a piece to the end of its level's paint order so it draws on
    /// top of its neighbors.
    pub(crate) fn promote(&mut self, level: LevelIndex, id: PieceId) {
        let entries = &mut self.pieces[level.index()];
        if let Some(index) = entries.iter().position(|piece| piece.id == id) {
            let piece = entries.remove(index);
            entries.push(piece);
        }
    }

    /// Removes a piece from the given level, returning it when present.
    pub(crate) fn remove_piece(&mut self, level: LevelIndex, id: PieceId) -> Option<Piece> {
        let entries = &mut self.pieces[level.index()];
        let index = entries.iter().position(|piece| piece.id == id)?;
        Some(entries.remove(index))
    }

    /// Removes the border owned by a piece, returning it when present.
    pub(crate) fn remove_border_owned_by(
        &mut self,
        level: LevelIndex,
        owner: PieceId,
    ) -> Option<Border> {
        let entries = &mut self.borders[level.index()];
        let index = entries.iter().position(|border| border.owner == owner)?;
        Some(entries.remove(index))
    }

    /// Topmost piece on the given level whose rotated footprint contains the
    /// probe point.
    pub(crate) fn hit_test(
        &self,
        level: LevelIndex,
        point: WorldPoint,
        cell_size: f32,
    ) -> Option<PieceId> {
        self.pieces[level.index()]
            .iter()
            .rev()
            .find(|piece| piece_contains(piece, point, cell_size))
            .map(|piece| piece.id)
    }

    /// Captures a deep, self-contained copy of every level.
    pub(crate) fn snapshot(&self, base_started: bool) -> LayoutSnapshot {
        LayoutSnapshot {
            pieces: self.pieces.clone(),
            borders: self.borders.clone(),
            base_started,
        }
    }

    /// Replaces every level with the contents of a normalized snapshot.
    pub(crate) fn install(&mut self, snapshot: LayoutSnapshot) {
        let snapshot = snapshot.normalized();
        self.pieces = snapshot.pieces;
        self.borders = snapshot.borders;
    }
}

/// Rotation-aware containment test against a piece's unrotated footprint.
///
/// The probe point is translated into the piece's local frame by undoing the
/// rotation about the footprint center, then box-tested against the
/// unrotated extent.
fn piece_contains(piece: &Piece, point: WorldPoint, cell_size: f32) -> bool {
    let center = piece.center(cell_size);
    let angle = -piece.rotation.degrees().to_radians();
    let dx = point.x() - center.x();
    let dy = point.y() - center.y();
    let local_x = dx * angle.cos() - dy * angle.sin();
    let local_y = dx * angle.sin() + dy * angle.cos();
    let base = piece.kind.template().base_footprint(cell_size);
    local_x.abs() <= base.width / 2.0 && local_y.abs() <= base.height / 2.0
}
