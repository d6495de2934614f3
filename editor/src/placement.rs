//! Pure geometry helpers for grid snapping and border synthesis.

use bastion_core::{Border, BorderSpec, PieceId, PieceKind, Rotation, WorldPoint};

/// Origin of the grid cell containing `point`.
pub(crate) fn cell_origin(point: WorldPoint, cell_size: f32) -> WorldPoint {
    WorldPoint::new(
        (point.x() / cell_size).floor() * cell_size,
        (point.y() / cell_size).floor() * cell_size,
    )
}

/// Top-left position that centers a piece's rotated footprint on the center
/// of its home cell.
pub(crate) fn snapped_position(
    home: WorldPoint,
    kind: PieceKind,
    rotation: Rotation,
    cell_size: f32,
) -> WorldPoint {
    let footprint = kind.template().footprint(rotation, cell_size);
    let center = home.offset_by(cell_size / 2.0, cell_size / 2.0);
    center.offset_by(-footprint.width / 2.0, -footprint.height / 2.0)
}

/// Top-left position that centers a piece's rotated footprint on the cursor,
/// used for unsnapped drag updates.
pub(crate) fn centered_position(
    cursor: WorldPoint,
    kind: PieceKind,
    rotation: Rotation,
    cell_size: f32,
) -> WorldPoint {
    let footprint = kind.template().footprint(rotation, cell_size);
    cursor.offset_by(-footprint.width / 2.0, -footprint.height / 2.0)
}

/// Synthesizes the square border a fief projects around its home cell.
///
/// Odd side lengths center the square on the home cell's center; even side
/// lengths center it on the cell's top-left corner, so the square always
/// lands on grid lines.
pub(crate) fn border_for(
    home: WorldPoint,
    spec: BorderSpec,
    cell_size: f32,
    owner: PieceId,
) -> Border {
    let side = spec.cells() as f32 * cell_size;
    let epicenter = if spec.cells() % 2 != 0 {
        home.offset_by(cell_size / 2.0, cell_size / 2.0)
    } else {
        home
    };
    Border {
        position: epicenter.offset_by(-side / 2.0, -side / 2.0),
        width: side,
        height: side,
        color: spec.color(),
        owner,
    }
}
