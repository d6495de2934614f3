//! Builds rendering scenes from editor state for console inspection.

use std::fmt::Write as _;

use bastion_editor::{query, EditorWorld, PreviewPiece};
use bastion_rendering::{
    BorderPresentation, CameraPresentation, Color, GridPresentation, PiecePresentation,
    RenderingError, Scene, SelectionHighlight, GRID_LINE_COLOR, PREVIEW_ALPHA,
};
use glam::Vec2;

/// Projects the editor state into a drawable scene.
///
/// The level directly below the active one contributes ghosted underlay
/// channels; the preview only appears while it is visible.
pub(crate) fn scene_from_world(world: &EditorWorld) -> Result<Scene, RenderingError> {
    let cell_size = query::cell_size(world);
    let grid = GridPresentation::new(cell_size, GRID_LINE_COLOR)?;
    let camera = query::camera(world);
    let camera = CameraPresentation::new(
        Vec2::new(camera.offset().x(), camera.offset().y()),
        camera.zoom(),
    );
    let level = query::current_level(world);

    let (underlay_borders, underlay_pieces) = match level.down() {
        Some(below) => (
            query::borders(world, below)
                .iter()
                .map(|border| BorderPresentation::from_border(border, true))
                .collect(),
            query::pieces(world, below)
                .iter()
                .map(|piece| PiecePresentation::from_piece(piece, cell_size, true, 1.0))
                .collect(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    let borders = query::borders(world, level)
        .iter()
        .map(|border| BorderPresentation::from_border(border, false))
        .collect();
    let pieces = query::pieces(world, level)
        .iter()
        .map(|piece| PiecePresentation::from_piece(piece, cell_size, false, 1.0))
        .collect();

    let preview = query::preview(world)
        .filter(|preview| preview.visible)
        .map(|preview| preview_presentation(&preview, cell_size));
    let selection = query::selected_piece(world)
        .map(|piece| SelectionHighlight::from_piece(&piece, cell_size));

    Ok(Scene::new(
        grid,
        camera,
        level,
        underlay_borders,
        underlay_pieces,
        borders,
        pieces,
        preview,
        selection,
    ))
}

fn preview_presentation(preview: &PreviewPiece, cell_size: f32) -> PiecePresentation {
    let template = preview.kind.template();
    let footprint = template.footprint(preview.rotation, cell_size);
    let base = template.base_footprint(cell_size);
    PiecePresentation {
        center: Vec2::new(
            preview.position.x() + footprint.width / 2.0,
            preview.position.y() + footprint.height / 2.0,
        ),
        rotation_degrees: preview.rotation.degrees(),
        base_size: Vec2::new(base.width, base.height),
        shape: template.shape(),
        fill: Color::from_core(template.color()).with_alpha(PREVIEW_ALPHA),
        ghosted: false,
    }
}

/// Console summary of a scene's channels.
pub(crate) fn describe_scene(scene: &Scene) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "level {}", scene.level.get());
    let _ = writeln!(
        out,
        "camera offset ({}, {}) zoom {:.1}",
        scene.camera.offset.x, scene.camera.offset.y, scene.camera.zoom
    );
    let _ = writeln!(
        out,
        "{} piece(s), {} border(s) on this level",
        scene.pieces.len(),
        scene.borders.len()
    );
    let _ = writeln!(
        out,
        "{} ghosted piece(s), {} ghosted border(s) from the level below",
        scene.underlay_pieces.len(),
        scene.underlay_borders.len()
    );
    match &scene.preview {
        Some(preview) => {
            let _ = writeln!(
                out,
                "preview at ({}, {}) rotated {} degrees",
                preview.center.x, preview.center.y, preview.rotation_degrees
            );
        }
        None => {
            let _ = writeln!(out, "no placement preview");
        }
    }
    match &scene.selection {
        Some(selection) => {
            let _ = write!(
                out,
                "selection highlight at ({}, {})",
                selection.center.x, selection.center.y
            );
        }
        None => {
            let _ = write!(out, "no selection");
        }
    }
    out
}
