#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Bastion Planner adapters.

use anyhow::Result as AnyResult;
use bastion_core::{Border, ColorRgb, LevelIndex, Piece, Shape};
use glam::Vec2;
use std::{error::Error, fmt, path::Path, time::Duration};

/// Stroke color of the background grid lines.
pub const GRID_LINE_COLOR: Color = Color::from_rgb_u8(0x44, 0x44, 0x44);

/// Fill used when a piece is drawn as a ghost from the level below.
pub const GHOST_FILL: Color = Color::new(0.5, 0.5, 0.5, 0.3);

/// Outline used for ghosted pieces and borders.
pub const GHOST_OUTLINE: Color = Color::new(0.39, 0.39, 0.39, 0.5);

/// Outline color of the selection highlight.
pub const SELECTION_COLOR: Color = Color::new(1.0, 1.0, 0.0, 1.0);

/// Alpha applied to the armed placement preview.
pub const PREVIEW_ALPHA: f32 = 0.7;

/// Stroke width of fief borders in world units.
pub const BORDER_STROKE_WIDTH: f32 = 4.0;

/// Stroke width of the selection highlight before zoom compensation.
pub const SELECTION_STROKE_WIDTH: f32 = 3.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from a core catalog color.
    #[must_use]
    pub const fn from_core(color: ColorRgb) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }

    /// Returns the same color with a replacement alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position in screen coordinates, if over the editing surface.
    pub cursor_screen_space: Option<Vec2>,
    /// Whether the adapter detected a primary click on this frame.
    pub primary_click: bool,
    /// Whether the primary button is held (drag gestures).
    pub primary_held: bool,
    /// Whether a pan drag is active.
    pub pan_active: bool,
    /// Signed wheel travel in notches; positive zooms in.
    pub wheel_steps: i32,
    /// Whether the rotate key was pressed on this frame.
    pub rotate_pressed: bool,
    /// Whether the delete key was pressed on this frame.
    pub delete_pressed: bool,
}

/// Viewport transform carried alongside the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPresentation {
    /// Pan offset in screen coordinates.
    pub offset: Vec2,
    /// Zoom factor applied after the offset.
    pub zoom: f32,
}

impl CameraPresentation {
    /// Creates a camera presentation from an offset and zoom factor.
    #[must_use]
    pub const fn new(offset: Vec2, zoom: f32) -> Self {
        Self { offset, zoom }
    }
}

/// Background grid description validated against degenerate spacing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    cell_size: f32,
    line_color: Color,
}

impl GridPresentation {
    /// Creates a grid presentation, rejecting non-positive cell sizes.
    pub fn new(cell_size: f32, line_color: Color) -> Result<Self, RenderingError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(RenderingError::NonPositiveCellSize { cell_size });
        }
        Ok(Self {
            cell_size,
            line_color,
        })
    }

    /// Side length of a grid cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Stroke color of the grid lines.
    #[must_use]
    pub const fn line_color(&self) -> Color {
        self.line_color
    }

    /// World-space window of grid lines covering the visible viewport,
    /// expanded outward to whole cell multiples.
    #[must_use]
    pub fn visible_window(&self, camera: CameraPresentation, viewport: Vec2) -> GridWindow {
        let world_min = -camera.offset / camera.zoom;
        let world_max = world_min + viewport / camera.zoom;
        GridWindow {
            start_x: (world_min.x / self.cell_size).floor() * self.cell_size,
            end_x: (world_max.x / self.cell_size).ceil() * self.cell_size,
            start_y: (world_min.y / self.cell_size).floor() * self.cell_size,
            end_y: (world_max.y / self.cell_size).ceil() * self.cell_size,
        }
    }
}

/// Cell-aligned world-space extent covered by visible grid lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridWindow {
    /// Leftmost vertical grid line.
    pub start_x: f32,
    /// Rightmost vertical grid line.
    pub end_x: f32,
    /// Topmost horizontal grid line.
    pub start_y: f32,
    /// Bottommost horizontal grid line.
    pub end_y: f32,
}

/// Errors surfaced while validating presentation inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderingError {
    /// The grid cell size was zero, negative or not finite.
    NonPositiveCellSize {
        /// Cell size that failed validation.
        cell_size: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveCellSize { cell_size } => {
                write!(f, "grid cell size must be positive (received {cell_size})")
            }
        }
    }
}

impl Error for RenderingError {}

/// Drawable description of a single placed piece.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PiecePresentation {
    /// Center of the rotated footprint in world units.
    pub center: Vec2,
    /// Rotation applied around the center, in degrees.
    pub rotation_degrees: f32,
    /// Unrotated footprint extent in world units.
    pub base_size: Vec2,
    /// Outline shape drawn within the footprint.
    pub shape: Shape,
    /// Fill color of the piece, opacity included.
    pub fill: Color,
    /// Whether the piece is drawn in the muted ghost style.
    pub ghosted: bool,
}

impl PiecePresentation {
    /// Builds the drawable description of a placed piece.
    ///
    /// Ghosted pieces take the fixed grey ghost fill; live pieces carry the
    /// catalog color composited with `alpha`.
    #[must_use]
    pub fn from_piece(piece: &Piece, cell_size: f32, ghosted: bool, alpha: f32) -> Self {
        let template = piece.kind.template();
        let base = template.base_footprint(cell_size);
        let center = piece.center(cell_size);
        let fill = if ghosted {
            GHOST_FILL
        } else {
            Color::from_core(template.color()).with_alpha(alpha)
        };
        Self {
            center: Vec2::new(center.x(), center.y()),
            rotation_degrees: piece.rotation.degrees(),
            base_size: Vec2::new(base.width, base.height),
            shape: template.shape(),
            fill,
            ghosted,
        }
    }
}

/// Drawable description of a fief border rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderPresentation {
    /// Top-left corner of the rectangle in world units.
    pub position: Vec2,
    /// Extent of the rectangle in world units.
    pub size: Vec2,
    /// Stroke color of the rectangle.
    pub color: Color,
    /// Stroke width of the rectangle in world units.
    pub stroke_width: f32,
    /// Whether the border is drawn in the muted ghost style.
    pub ghosted: bool,
}

impl BorderPresentation {
    /// Builds the drawable description of a border.
    #[must_use]
    pub fn from_border(border: &Border, ghosted: bool) -> Self {
        let color = if ghosted {
            GHOST_OUTLINE
        } else {
            Color::from_core(border.color)
        };
        Self {
            position: Vec2::new(border.position.x(), border.position.y()),
            size: Vec2::new(border.width, border.height),
            color,
            stroke_width: BORDER_STROKE_WIDTH,
            ghosted,
        }
    }
}

/// Rotated outline drawn around the selected piece.
///
/// The highlight traces the unrotated footprint under the piece's rotation,
/// matching the frame the piece itself is drawn in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionHighlight {
    /// Center of the rotated footprint in world units.
    pub center: Vec2,
    /// Rotation applied around the center, in degrees.
    pub rotation_degrees: f32,
    /// Unrotated footprint extent in world units.
    pub base_size: Vec2,
    /// Stroke color of the outline.
    pub color: Color,
}

impl SelectionHighlight {
    /// Builds the highlight outline for a selected piece.
    #[must_use]
    pub fn from_piece(piece: &Piece, cell_size: f32) -> Self {
        let base = piece.kind.template().base_footprint(cell_size);
        let center = piece.center(cell_size);
        Self {
            center: Vec2::new(center.x(), center.y()),
            rotation_degrees: piece.rotation.degrees(),
            base_size: Vec2::new(base.width, base.height),
            color: SELECTION_COLOR,
        }
    }

    /// Stroke width of the highlight, thinned as the camera zooms in so the
    /// outline keeps a constant on-screen weight.
    #[must_use]
    pub fn stroke_width(&self, zoom: f32) -> f32 {
        SELECTION_STROKE_WIDTH / zoom
    }
}

/// Scene description combining the grid, both visible levels and overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Background grid of the editing surface.
    pub grid: GridPresentation,
    /// Viewport transform the scene is drawn under.
    pub camera: CameraPresentation,
    /// Level currently being edited.
    pub level: LevelIndex,
    /// Ghosted borders from the level directly below, drawn first.
    pub underlay_borders: Vec<BorderPresentation>,
    /// Ghosted pieces from the level directly below.
    pub underlay_pieces: Vec<PiecePresentation>,
    /// Borders on the active level.
    pub borders: Vec<BorderPresentation>,
    /// Pieces on the active level, in paint order.
    pub pieces: Vec<PiecePresentation>,
    /// Armed placement preview, drawn above the active level.
    pub preview: Option<PiecePresentation>,
    /// Highlight around the selected piece, drawn last.
    pub selection: Option<SelectionHighlight>,
}

impl Scene {
    /// Creates a new scene from its presentation channels.
    #[must_use]
    #[allow(clippy::too_many_arguments)] // Scene construction intentionally enumerates every channel explicitly.
    pub fn new(
        grid: GridPresentation,
        camera: CameraPresentation,
        level: LevelIndex,
        underlay_borders: Vec<BorderPresentation>,
        underlay_pieces: Vec<PiecePresentation>,
        borders: Vec<BorderPresentation>,
        pieces: Vec<PiecePresentation>,
        preview: Option<PiecePresentation>,
        selection: Option<SelectionHighlight>,
    ) -> Self {
        Self {
            grid,
            camera,
            level,
            underlay_borders,
            underlay_pieces,
            borders,
            pieces,
            preview,
            selection,
        }
    }

    /// Copy of the scene prepared for image export.
    ///
    /// Exported images never show the selection highlight; every other
    /// channel is carried over unchanged.
    #[must_use]
    pub fn export_view(&self) -> Self {
        let mut view = self.clone();
        view.selection = None;
        view
    }
}

/// Configuration describing how a backend should open its window.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title displayed by the backend window.
    pub window_title: String,
    /// Color used to clear the frame before drawing.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Creates a new presentation configuration.
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Abstraction implemented by windowing backends.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame
    /// delta and per-frame input captured by the adapter, and may mutate the
    /// scene before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Abstraction implemented by image writers for layout exports.
pub trait ImageExporter {
    /// Renders the provided scene into an image file at `path`.
    fn export(&mut self, scene: &Scene, path: &Path) -> AnyResult<()>;
}

/// Suggested file name for an exported level image.
#[must_use]
pub fn export_file_name(level: LevelIndex) -> String {
    format!("bastion-level-{}.png", level.get())
}

/// Hands the exporter a highlight-free copy of the scene, leaving the live
/// scene untouched.
pub fn export_scene<E>(scene: &Scene, exporter: &mut E, path: &Path) -> AnyResult<()>
where
    E: ImageExporter,
{
    exporter.export(&scene.export_view(), path)
}
