#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a Bastion Planner editing session.

mod present;
mod session;
mod store;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use bastion_core::{Command, PieceKind};
use bastion_editor::{apply, query, EditorWorld, DEFAULT_CELL_SIZE};
use bastion_persistence::{load_layout, save_layout, share, LayoutLoadError, DEFAULT_LAYOUT_KEY};
use bastion_rendering::export_file_name;
use clap::Parser;

use session::{describe_event, parse_line, SessionAction, HELP_TEXT};
use store::FileStore;

/// Interactive grid layout planner for fortress bases.
#[derive(Debug, Parser)]
#[command(name = "bastion-planner")]
struct Args {
    /// Path of the JSON file layouts are persisted into.
    #[arg(long, default_value = "bastion-layouts.json")]
    store: PathBuf,

    /// Side length of a grid cell in world units.
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE, value_parser = parse_cell_size)]
    cell_size: f32,
}

/// Rejects grid pitches the editor would refuse before the session starts.
fn parse_cell_size(value: &str) -> Result<f32, String> {
    let cell_size: f32 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(format!(
            "cell size must be positive and finite (received {cell_size})"
        ));
    }
    Ok(cell_size)
}

/// Entry point for the Bastion Planner command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let mut store = FileStore::open(args.store.clone())
        .with_context(|| format!("could not open layout store at {}", args.store.display()))?;
    let mut world = EditorWorld::with_cell_size(args.cell_size)
        .with_context(|| format!("cannot edit on a {} unit grid", args.cell_size))?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    println!("bastion-planner ready (type 'help' for commands)");

    for line in stdin.lock().lines() {
        let line = line.context("failed to read from standard input")?;
        match parse_line(&line) {
            Ok(Some(action)) => {
                if run_action(&mut world, &mut store, action)? {
                    break;
                }
            }
            Ok(None) => {}
            Err(error) => println!("error: {error}"),
        }
        stdout.flush().context("failed to flush standard output")?;
    }

    Ok(())
}

/// Executes a single session action. Returns `true` when the session ends.
fn run_action(world: &mut EditorWorld, store: &mut FileStore, action: SessionAction) -> Result<bool> {
    match action {
        SessionAction::Submit(command) => {
            submit(world, command);
        }
        SessionAction::Save => {
            let layout = query::layout_snapshot(world);
            save_layout(store, DEFAULT_LAYOUT_KEY, &layout).context("could not save the layout")?;
            println!("layout saved");
        }
        SessionAction::Load => match load_layout(store, DEFAULT_LAYOUT_KEY) {
            Ok(layout) => submit(world, Command::LoadLayout { layout }),
            Err(LayoutLoadError::Missing { .. }) => println!("no saved layout found"),
            Err(error) => return Err(error).context("could not load the layout"),
        },
        SessionAction::Share => {
            let layout = query::layout_snapshot(world);
            println!("{}", share::encode(&layout));
        }
        SessionAction::Import(payload) => match share::decode(&payload) {
            Ok(layout) => submit(world, Command::LoadLayout { layout }),
            Err(error) => println!("error: {error}"),
        },
        SessionAction::Scene => {
            let scene = present::scene_from_world(world).context("could not build the scene")?;
            println!("{}", present::describe_scene(&scene));
        }
        SessionAction::Export => {
            let scene = present::scene_from_world(world).context("could not build the scene")?;
            let view = scene.export_view();
            println!("export target: {}", export_file_name(view.level));
            println!("{}", present::describe_scene(&view));
        }
        SessionAction::Catalog => {
            for kind in PieceKind::all() {
                let template = kind.template();
                println!(
                    "{:<26} {:?}/{:?} {}x{} cells{}",
                    kind.name(),
                    template.faction(),
                    template.category(),
                    template.grid_width(),
                    template.grid_height(),
                    match template.border_spec() {
                        Some(spec) => format!(" (border {} cells)", spec.cells()),
                        None => String::new(),
                    }
                );
            }
        }
        SessionAction::Help => println!("{HELP_TEXT}"),
        SessionAction::Quit => return Ok(true),
    }
    Ok(false)
}

fn submit(world: &mut EditorWorld, command: Command) {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    for event in &events {
        println!("{}", describe_event(event));
    }
}
