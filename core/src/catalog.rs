//! Static catalog of placeable piece templates.

use serde::{Deserialize, Serialize};

use crate::{ColorRgb, Rotation};

/// Color every synthesized fief border is outlined with.
const BORDER_COLOR: ColorRgb = ColorRgb::from_rgb(0, 0, 139);

const SANDYBROWN: ColorRgb = ColorRgb::from_rgb(244, 164, 96);
const DARKGREY: ColorRgb = ColorRgb::from_rgb(169, 169, 169);
const SLATEBLUE: ColorRgb = ColorRgb::from_rgb(106, 90, 205);
const SIENNA: ColorRgb = ColorRgb::from_rgb(160, 82, 45);

const FOUNDATION: PieceTemplate = PieceTemplate::new(
    1.0,
    1.0,
    SANDYBROWN,
    Shape::Rectangle,
    Faction::General,
    Category::Structural,
    None,
);
const HARKONNEN_FLOOR_QUARTER: PieceTemplate = PieceTemplate::new(
    1.0,
    1.0,
    SANDYBROWN,
    Shape::Custom("quarter_disc"),
    Faction::Harkonnen,
    Category::Structural,
    None,
);
const HARKONNEN_FLOOR_TRIANGLE: PieceTemplate = PieceTemplate::new(
    1.0,
    1.0,
    SANDYBROWN,
    Shape::Custom("triangle"),
    Faction::Harkonnen,
    Category::Structural,
    None,
);
const WALL: PieceTemplate = PieceTemplate::new(
    1.0,
    0.2,
    DARKGREY,
    Shape::Custom("hatched_wall"),
    Faction::General,
    Category::Walls,
    None,
);
const HARKONNEN_WINDOW_WALL: PieceTemplate = PieceTemplate::new(
    1.0,
    0.2,
    DARKGREY,
    Shape::Custom("window_wall"),
    Faction::Harkonnen,
    Category::Walls,
    None,
);
const HARKONNEN_WALL_QUARTER: PieceTemplate = PieceTemplate::new(
    1.0,
    1.0,
    DARKGREY,
    Shape::Custom("quarter_arc_wall"),
    Faction::Harkonnen,
    Category::Walls,
    None,
);
const HARKONNEN_DOOR: PieceTemplate = PieceTemplate::new(
    1.0,
    0.2,
    DARKGREY,
    Shape::Custom("doorway"),
    Faction::Harkonnen,
    Category::Walls,
    None,
);
const HARKONNEN_CENTER_COLUMN: PieceTemplate = PieceTemplate::new(
    0.5,
    0.5,
    DARKGREY,
    Shape::Hexagon,
    Faction::Harkonnen,
    Category::Structural,
    None,
);
const HARKONNEN_CORNER_COLUMN: PieceTemplate = PieceTemplate::new(
    0.5,
    0.5,
    DARKGREY,
    Shape::Hexagon,
    Faction::Harkonnen,
    Category::Structural,
    None,
);
const SUB_FIEF: PieceTemplate = PieceTemplate::new(
    0.5,
    0.5,
    SLATEBLUE,
    Shape::Circle,
    Faction::General,
    Category::Special,
    Some(BorderSpec::new(5, BORDER_COLOR)),
);
const ADVANCED_SUB_FIEF: PieceTemplate = PieceTemplate::new(
    0.5,
    0.5,
    SLATEBLUE,
    Shape::Circle,
    Faction::General,
    Category::Special,
    Some(BorderSpec::new(11, BORDER_COLOR)),
);
const STAIRS: PieceTemplate = PieceTemplate::new(
    1.0,
    2.0,
    SIENNA,
    Shape::Custom("steps"),
    Faction::General,
    Category::Inclines,
    None,
);
const HARKONNEN_HALF_STAIRS: PieceTemplate = PieceTemplate::new(
    1.0,
    1.0,
    SIENNA,
    Shape::Custom("steps"),
    Faction::Harkonnen,
    Category::Inclines,
    None,
);

/// Kind of piece available for placement, one per catalog template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    /// Full-cell structural foundation tile.
    Foundation,
    /// Quarter-size Harkonnen floor tile.
    HarkonnenFloorQuarter,
    /// Triangular Harkonnen floor tile.
    HarkonnenFloorTriangle,
    /// Thin full-width wall segment.
    Wall,
    /// Thin Harkonnen wall segment with a window cutout.
    HarkonnenWindowWall,
    /// Quarter-size Harkonnen wall block.
    HarkonnenWallQuarter,
    /// Thin Harkonnen wall segment with a doorway.
    HarkonnenDoor,
    /// Hexagonal column placed at a cell center.
    HarkonnenCenterColumn,
    /// Hexagonal column placed at a cell corner.
    HarkonnenCornerColumn,
    /// Fief claim marker that projects a five-cell border.
    SubFief,
    /// Upgraded fief claim marker that projects an eleven-cell border.
    AdvancedSubFief,
    /// Two-cell staircase.
    Stairs,
    /// Single-cell Harkonnen half staircase.
    HarkonnenHalfStairs,
}

impl PieceKind {
    /// Every catalog kind in sidebar presentation order.
    #[must_use]
    pub const fn all() -> [Self; 13] {
        [
            Self::Foundation,
            Self::HarkonnenFloorQuarter,
            Self::HarkonnenFloorTriangle,
            Self::Wall,
            Self::HarkonnenWindowWall,
            Self::HarkonnenWallQuarter,
            Self::HarkonnenDoor,
            Self::HarkonnenCenterColumn,
            Self::HarkonnenCornerColumn,
            Self::SubFief,
            Self::AdvancedSubFief,
            Self::Stairs,
            Self::HarkonnenHalfStairs,
        ]
    }

    /// Stable external name of the kind, matching its serialized form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Foundation => "foundation",
            Self::HarkonnenFloorQuarter => "harkonnen_floor_quarter",
            Self::HarkonnenFloorTriangle => "harkonnen_floor_triangle",
            Self::Wall => "wall",
            Self::HarkonnenWindowWall => "harkonnen_window_wall",
            Self::HarkonnenWallQuarter => "harkonnen_wall_quarter",
            Self::HarkonnenDoor => "harkonnen_door",
            Self::HarkonnenCenterColumn => "harkonnen_center_column",
            Self::HarkonnenCornerColumn => "harkonnen_corner_column",
            Self::SubFief => "sub_fief",
            Self::AdvancedSubFief => "advanced_sub_fief",
            Self::Stairs => "stairs",
            Self::HarkonnenHalfStairs => "harkonnen_half_stairs",
        }
    }

    /// Looks up a kind by its stable external name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|kind| kind.name() == name)
    }

    /// The immutable template describing the kind's geometry and styling.
    #[must_use]
    pub const fn template(self) -> &'static PieceTemplate {
        match self {
            Self::Foundation => &FOUNDATION,
            Self::HarkonnenFloorQuarter => &HARKONNEN_FLOOR_QUARTER,
            Self::HarkonnenFloorTriangle => &HARKONNEN_FLOOR_TRIANGLE,
            Self::Wall => &WALL,
            Self::HarkonnenWindowWall => &HARKONNEN_WINDOW_WALL,
            Self::HarkonnenWallQuarter => &HARKONNEN_WALL_QUARTER,
            Self::HarkonnenDoor => &HARKONNEN_DOOR,
            Self::HarkonnenCenterColumn => &HARKONNEN_CENTER_COLUMN,
            Self::HarkonnenCornerColumn => &HARKONNEN_CORNER_COLUMN,
            Self::SubFief => &SUB_FIEF,
            Self::AdvancedSubFief => &ADVANCED_SUB_FIEF,
            Self::Stairs => &STAIRS,
            Self::HarkonnenHalfStairs => &HARKONNEN_HALF_STAIRS,
        }
    }

    /// Reports whether placing this kind claims territory with a border.
    #[must_use]
    pub const fn is_fief(self) -> bool {
        self.template().border_spec().is_some()
    }
}

/// Outline shape the rendering collaborator draws for a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Axis-aligned rectangle spanning the full footprint.
    Rectangle,
    /// Regular hexagon inscribed in the footprint.
    Hexagon,
    /// Circle inscribed in the footprint.
    Circle,
    /// Named silhouette drawn by a dedicated routine in the rendering
    /// collaborator (hatched walls, doorways, stair steps and the like).
    Custom(&'static str),
}

/// Faction a catalog entry belongs to, used by sidebar filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Faction {
    /// Pieces available to every faction.
    General,
    /// Harkonnen-specific pieces.
    Harkonnen,
}

/// Functional grouping of a catalog entry, used by sidebar filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Floors, foundations and columns.
    Structural,
    /// Wall segments, windows and doors.
    Walls,
    /// Fief claim markers.
    Special,
    /// Stairs and ramps.
    Inclines,
}

/// Declarative description of the square border a fief piece projects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BorderSpec {
    cells: u32,
    color: ColorRgb,
}

impl BorderSpec {
    /// Creates a border specification spanning `cells` grid cells per side.
    #[must_use]
    pub const fn new(cells: u32, color: ColorRgb) -> Self {
        Self { cells, color }
    }

    /// Side length of the border square, in grid cells.
    #[must_use]
    pub const fn cells(&self) -> u32 {
        self.cells
    }

    /// Color the border is outlined with.
    #[must_use]
    pub const fn color(&self) -> ColorRgb {
        self.color
    }
}

/// Immutable description of a piece kind's geometry and styling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieceTemplate {
    grid_width: f32,
    grid_height: f32,
    color: ColorRgb,
    shape: Shape,
    faction: Faction,
    category: Category,
    border_spec: Option<BorderSpec>,
}

impl PieceTemplate {
    const fn new(
        grid_width: f32,
        grid_height: f32,
        color: ColorRgb,
        shape: Shape,
        faction: Faction,
        category: Category,
        border_spec: Option<BorderSpec>,
    ) -> Self {
        Self {
            grid_width,
            grid_height,
            color,
            shape,
            faction,
            category,
            border_spec,
        }
    }

    /// Unrotated width of the template, in grid cells.
    #[must_use]
    pub const fn grid_width(&self) -> f32 {
        self.grid_width
    }

    /// Unrotated height of the template, in grid cells.
    #[must_use]
    pub const fn grid_height(&self) -> f32 {
        self.grid_height
    }

    /// Fill color of the template.
    #[must_use]
    pub const fn color(&self) -> ColorRgb {
        self.color
    }

    /// Outline shape of the template.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Faction the template belongs to.
    #[must_use]
    pub const fn faction(&self) -> Faction {
        self.faction
    }

    /// Functional grouping of the template.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Border specification, present only for fief templates.
    #[must_use]
    pub const fn border_spec(&self) -> Option<BorderSpec> {
        self.border_spec
    }

    /// Footprint of the template in world units under the given rotation.
    ///
    /// Quarter and three-quarter turns exchange the axes; square templates
    /// are unaffected by rotation.
    #[must_use]
    pub fn footprint(&self, rotation: Rotation, cell_size: f32) -> Footprint {
        let width = self.grid_width * cell_size;
        let height = self.grid_height * cell_size;
        if rotation.swaps_axes() && self.grid_width != self.grid_height {
            Footprint {
                width: height,
                height: width,
            }
        } else {
            Footprint { width, height }
        }
    }

    /// Unrotated footprint of the template in world units.
    ///
    /// Hit-testing probes the unrotated extent after transforming the probe
    /// point into the piece's local frame.
    #[must_use]
    pub fn base_footprint(&self, cell_size: f32) -> Footprint {
        self.footprint(Rotation::R0, cell_size)
    }
}

/// Axis-aligned extent of a piece in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    /// Horizontal extent in world units.
    pub width: f32,
    /// Vertical extent in world units.
    pub height: f32,
}
