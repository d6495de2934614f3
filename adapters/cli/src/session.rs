//! Line-oriented session grammar translating console input into commands.

use std::{error::Error, fmt};

use bastion_core::{
    Command, Event, LevelShift, PieceKind, RestoreCause, Rotation, ScreenPoint, WorldPoint,
};

/// Action requested by a single console line.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SessionAction {
    /// Submit a command to the editor world.
    Submit(Command),
    /// Persist the current layout into the store.
    Save,
    /// Load the layout stored under the default key.
    Load,
    /// Print the current layout as a shareable string.
    Share,
    /// Decode a shared string and load it.
    Import(String),
    /// Describe the current scene.
    Scene,
    /// Describe the scene as it would be exported, and name the image file.
    Export,
    /// List the piece catalog.
    Catalog,
    /// Print the command reference.
    Help,
    /// End the session.
    Quit,
}

/// Errors raised while parsing a console line.
#[derive(Debug, PartialEq)]
pub(crate) enum ParseError {
    /// The line did not start with a recognized command word.
    UnknownCommand(String),
    /// A `place` or `arm` line named a piece kind outside the catalog.
    UnknownPieceKind(String),
    /// The command was missing a required argument.
    MissingArgument {
        /// Command word the line started with.
        command: &'static str,
        /// Name of the argument that was absent.
        argument: &'static str,
    },
    /// A numeric argument could not be parsed.
    InvalidNumber {
        /// Name of the offending argument.
        argument: &'static str,
        /// Text that failed to parse.
        value: String,
    },
    /// A rotation argument was not a cardinal quarter turn.
    InvalidRotation(String),
    /// A `level` line used a direction other than `up` or `down`.
    InvalidLevelDirection(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(word) => write!(f, "unknown command '{word}' (try 'help')"),
            Self::UnknownPieceKind(name) => {
                write!(f, "unknown piece kind '{name}' (try 'catalog')")
            }
            Self::MissingArgument { command, argument } => {
                write!(f, "'{command}' is missing its {argument} argument")
            }
            Self::InvalidNumber { argument, value } => {
                write!(f, "could not parse {argument} '{value}' as a number")
            }
            Self::InvalidRotation(value) => {
                write!(f, "rotation must be 0, 90, 180 or 270 (received '{value}')")
            }
            Self::InvalidLevelDirection(value) => {
                write!(f, "level direction must be 'up' or 'down' (received '{value}')")
            }
        }
    }
}

impl Error for ParseError {}

fn parse_f32(
    tokens: &mut std::str::SplitWhitespace<'_>,
    command: &'static str,
    argument: &'static str,
) -> Result<f32, ParseError> {
    let value = tokens
        .next()
        .ok_or(ParseError::MissingArgument { command, argument })?;
    value.parse().map_err(|_| ParseError::InvalidNumber {
        argument,
        value: value.to_owned(),
    })
}

fn parse_i32(
    tokens: &mut std::str::SplitWhitespace<'_>,
    command: &'static str,
    argument: &'static str,
) -> Result<i32, ParseError> {
    let value = tokens
        .next()
        .ok_or(ParseError::MissingArgument { command, argument })?;
    value.parse().map_err(|_| ParseError::InvalidNumber {
        argument,
        value: value.to_owned(),
    })
}

fn parse_kind(
    tokens: &mut std::str::SplitWhitespace<'_>,
    command: &'static str,
) -> Result<PieceKind, ParseError> {
    let name = tokens.next().ok_or(ParseError::MissingArgument {
        command,
        argument: "piece kind",
    })?;
    PieceKind::parse(name).ok_or_else(|| ParseError::UnknownPieceKind(name.to_owned()))
}

/// Parses a console line into a session action.
///
/// Blank lines and lines starting with `#` yield `None`. Unknown piece kinds
/// are rejected here, before any command reaches the editor, so a typo never
/// mutates the session.
pub(crate) fn parse_line(line: &str) -> Result<Option<SessionAction>, ParseError> {
    let mut tokens = line.split_whitespace();
    let Some(word) = tokens.next() else {
        return Ok(None);
    };
    if word.starts_with('#') {
        return Ok(None);
    }

    let action = match word {
        "place" => {
            let kind = parse_kind(&mut tokens, "place")?;
            let x = parse_f32(&mut tokens, "place", "x")?;
            let y = parse_f32(&mut tokens, "place", "y")?;
            let rotation = match tokens.next() {
                Some(value) => {
                    let degrees: u16 = value
                        .parse()
                        .map_err(|_| ParseError::InvalidRotation(value.to_owned()))?;
                    Rotation::try_from(degrees)
                        .map_err(|_| ParseError::InvalidRotation(value.to_owned()))?
                }
                None => Rotation::R0,
            };
            SessionAction::Submit(Command::PlacePiece {
                kind,
                position: WorldPoint::new(x, y),
                rotation,
            })
        }
        "arm" => {
            let kind = parse_kind(&mut tokens, "arm")?;
            SessionAction::Submit(Command::BeginPlacement { kind })
        }
        "cancel" => SessionAction::Submit(Command::CancelPlacement),
        "hover" => match tokens.clone().next() {
            Some("off") => SessionAction::Submit(Command::HoverAt { position: None }),
            _ => {
                let x = parse_f32(&mut tokens, "hover", "x")?;
                let y = parse_f32(&mut tokens, "hover", "y")?;
                SessionAction::Submit(Command::HoverAt {
                    position: Some(WorldPoint::new(x, y)),
                })
            }
        },
        "rotate-preview" => SessionAction::Submit(Command::RotatePreview),
        "select" => {
            let x = parse_f32(&mut tokens, "select", "x")?;
            let y = parse_f32(&mut tokens, "select", "y")?;
            SessionAction::Submit(Command::SelectAt {
                position: WorldPoint::new(x, y),
            })
        }
        "drag" => {
            let x = parse_f32(&mut tokens, "drag", "x")?;
            let y = parse_f32(&mut tokens, "drag", "y")?;
            SessionAction::Submit(Command::DragSelected {
                position: WorldPoint::new(x, y),
            })
        }
        "move" => {
            let x = parse_f32(&mut tokens, "move", "x")?;
            let y = parse_f32(&mut tokens, "move", "y")?;
            SessionAction::Submit(Command::CommitSelectedMove {
                position: WorldPoint::new(x, y),
            })
        }
        "rotate" => SessionAction::Submit(Command::RotateSelected),
        "delete" => SessionAction::Submit(Command::DeleteSelected),
        "level" => {
            let direction = tokens.next().ok_or(ParseError::MissingArgument {
                command: "level",
                argument: "direction",
            })?;
            let shift = match direction {
                "up" => LevelShift::Up,
                "down" => LevelShift::Down,
                other => return Err(ParseError::InvalidLevelDirection(other.to_owned())),
            };
            SessionAction::Submit(Command::ChangeLevel { shift })
        }
        "pan" => {
            let x = parse_f32(&mut tokens, "pan", "x")?;
            let y = parse_f32(&mut tokens, "pan", "y")?;
            SessionAction::Submit(Command::PanCamera {
                offset: ScreenPoint::new(x, y),
            })
        }
        "zoom" => {
            let x = parse_f32(&mut tokens, "zoom", "anchor x")?;
            let y = parse_f32(&mut tokens, "zoom", "anchor y")?;
            let steps = parse_i32(&mut tokens, "zoom", "steps")?;
            SessionAction::Submit(Command::ZoomCamera {
                anchor: ScreenPoint::new(x, y),
                steps,
            })
        }
        "clear" => SessionAction::Submit(Command::ClearLayout),
        "undo" => SessionAction::Submit(Command::Undo),
        "redo" => SessionAction::Submit(Command::Redo),
        "save" => SessionAction::Save,
        "load" => SessionAction::Load,
        "share" => SessionAction::Share,
        "import" => {
            let payload = tokens.next().ok_or(ParseError::MissingArgument {
                command: "import",
                argument: "payload",
            })?;
            SessionAction::Import(payload.to_owned())
        }
        "scene" => SessionAction::Scene,
        "export" => SessionAction::Export,
        "catalog" => SessionAction::Catalog,
        "help" => SessionAction::Help,
        "quit" | "exit" => SessionAction::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(action))
}

/// Human-readable confirmation of an editor event.
pub(crate) fn describe_event(event: &Event) -> String {
    match event {
        Event::PiecePlaced { piece, kind, level } => format!(
            "placed {} as piece #{} on level {}",
            kind.name(),
            piece.get(),
            level.get()
        ),
        Event::BorderCreated { owner, level } => format!(
            "fief border created for piece #{} on level {}",
            owner.get(),
            level.get()
        ),
        Event::BaseStarted => "base started".to_owned(),
        Event::PieceSelected { piece } => format!("selected piece #{}", piece.get()),
        Event::SelectionCleared => "selection cleared".to_owned(),
        Event::PieceMoved { piece, position } => format!(
            "piece #{} moved to ({}, {})",
            piece.get(),
            position.x(),
            position.y()
        ),
        Event::PieceRotated { piece, rotation } => format!(
            "piece #{} rotated to {} degrees",
            piece.get(),
            rotation.degrees()
        ),
        Event::PieceDeleted { piece, kind, level } => format!(
            "deleted {} piece #{} from level {}",
            kind.name(),
            piece.get(),
            level.get()
        ),
        Event::BorderRemoved { owner, level } => format!(
            "fief border of piece #{} removed from level {}",
            owner.get(),
            level.get()
        ),
        Event::LevelChanged { level } => format!("now editing level {}", level.get()),
        Event::CameraChanged { offset, zoom } => format!(
            "camera at offset ({}, {}) zoom {zoom:.1}",
            offset.x(),
            offset.y()
        ),
        Event::LayoutCleared => "layout cleared".to_owned(),
        Event::LayoutRestored { cause } => match cause {
            RestoreCause::Undo => "undo applied".to_owned(),
            RestoreCause::Redo => "redo applied".to_owned(),
            RestoreCause::Load => "layout loaded".to_owned(),
        },
    }
}

/// Command reference printed by the `help` action.
pub(crate) const HELP_TEXT: &str = "\
place <kind> <x> <y> [rotation]  place a piece at world coordinates
arm <kind>                       arm the placement preview (repeat to toggle off)
cancel                           disarm the placement preview
hover <x> <y> | hover off        move or hide the placement preview
rotate-preview                   rotate the armed preview a quarter turn
select <x> <y>                   select the topmost piece under the point
drag <x> <y>                     drag the selected piece (unsnapped)
move <x> <y>                     commit the selected piece onto a grid cell
rotate                           rotate the selected piece a quarter turn
delete                           delete the selected piece
level up | level down            change the level being edited
pan <x> <y>                      set the camera offset
zoom <x> <y> <steps>             zoom by notches anchored at a screen point
clear                            clear every level
undo | redo                      walk the edit history
save | load                      persist or restore the layout
share | import <payload>         exchange layouts as single-line strings
scene                            describe the visible scene
export                           describe the exported image for this level
catalog                          list the piece catalog
help                             show this reference
quit                             end the session";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_lines_parse_with_and_without_rotation() {
        let action = parse_line("place foundation 127 63").expect("parse");
        assert_eq!(
            action,
            Some(SessionAction::Submit(Command::PlacePiece {
                kind: PieceKind::Foundation,
                position: WorldPoint::new(127.0, 63.0),
                rotation: Rotation::R0,
            }))
        );

        let action = parse_line("place stairs 10 20 270").expect("parse");
        assert_eq!(
            action,
            Some(SessionAction::Submit(Command::PlacePiece {
                kind: PieceKind::Stairs,
                position: WorldPoint::new(10.0, 20.0),
                rotation: Rotation::R270,
            }))
        );
    }

    #[test]
    fn unknown_piece_kinds_are_rejected_before_reaching_the_editor() {
        let error = parse_line("place ornithopter_pad 0 0").expect_err("must fail");
        assert_eq!(error, ParseError::UnknownPieceKind("ornithopter_pad".to_owned()));

        let error = parse_line("arm spice_silo").expect_err("must fail");
        assert_eq!(error, ParseError::UnknownPieceKind("spice_silo".to_owned()));
    }

    #[test]
    fn non_cardinal_rotations_are_rejected() {
        let error = parse_line("place wall 0 0 45").expect_err("must fail");
        assert_eq!(error, ParseError::InvalidRotation("45".to_owned()));
    }

    #[test]
    fn hover_accepts_coordinates_and_the_off_keyword() {
        assert_eq!(
            parse_line("hover 12 34").expect("parse"),
            Some(SessionAction::Submit(Command::HoverAt {
                position: Some(WorldPoint::new(12.0, 34.0)),
            }))
        );
        assert_eq!(
            parse_line("hover off").expect("parse"),
            Some(SessionAction::Submit(Command::HoverAt { position: None }))
        );
    }

    #[test]
    fn level_lines_require_a_valid_direction() {
        assert_eq!(
            parse_line("level up").expect("parse"),
            Some(SessionAction::Submit(Command::ChangeLevel {
                shift: LevelShift::Up,
            }))
        );
        let error = parse_line("level sideways").expect_err("must fail");
        assert_eq!(error, ParseError::InvalidLevelDirection("sideways".to_owned()));
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        assert_eq!(parse_line("").expect("parse"), None);
        assert_eq!(parse_line("   ").expect("parse"), None);
        assert_eq!(parse_line("# a note").expect("parse"), None);
    }

    #[test]
    fn unknown_commands_are_reported_by_name() {
        let error = parse_line("teleport 1 2").expect_err("must fail");
        assert_eq!(error, ParseError::UnknownCommand("teleport".to_owned()));
    }

    #[test]
    fn missing_arguments_name_the_gap() {
        let error = parse_line("select 10").expect_err("must fail");
        assert_eq!(
            error,
            ParseError::MissingArgument {
                command: "select",
                argument: "y",
            }
        );
    }

    #[test]
    fn zoom_lines_parse_anchor_and_steps() {
        assert_eq!(
            parse_line("zoom 320 240 -3").expect("parse"),
            Some(SessionAction::Submit(Command::ZoomCamera {
                anchor: ScreenPoint::new(320.0, 240.0),
                steps: -3,
            }))
        );
    }
}
