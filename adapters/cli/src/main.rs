#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs an Imla session in the terminal.

mod config;
mod input;

use std::{
    io::{self, StdinLock},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use glam::UVec2;
use imla_core::{Event, PlayerProfile, Point};
use imla_rendering::{Presentation, RenderingBackend, Scene, SceneFlow, TextBackend, Viewport};
use imla_system_turn::{Config, TurnController};
use imla_world::{query, LevelLayout, World};

use crate::{
    config::{SessionFile, Settings},
    input::{action_for_key, KeyAction, KeySource},
};

const DEFAULT_LEVEL: &str = "\
##########################
#@.....#.........#.......#
#......#...o.....#...g...#
#..$.....................#
#......#.........#....=..#
####.######:::#####.######
   #.#    #...#   #.#
####.######...#####.######
#.......^........o.......#
#...o.........../........#
##########################
";

/// Command line flags; each one overrides the matching session file value.
#[derive(Debug, Parser)]
#[command(name = "imla", about = "Turn-based dungeon crawl in the terminal")]
pub(crate) struct Args {
    /// Session file in TOML format.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Seed for every damage roll.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Plain-text level layout to load instead of the built-in one.
    #[arg(long)]
    pub(crate) level: Option<PathBuf>,
    /// Number of map columns shown.
    #[arg(long)]
    pub(crate) viewport_width: Option<u32>,
    /// Number of map rows shown.
    #[arg(long)]
    pub(crate) viewport_height: Option<u32>,
    /// Keys to replay instead of reading standard input.
    #[arg(long)]
    pub(crate) script: Option<String>,
    /// Emit ANSI colors.
    #[arg(long)]
    pub(crate) color: bool,
}

/// Entry point for the Imla command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let file = match &args.config {
        Some(path) => SessionFile::load(path)?,
        None => SessionFile::default(),
    };
    let settings = Settings::resolve(&args, file);

    let layout_text = match &settings.level {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("read level {}", path.display()))?,
        None => DEFAULT_LEVEL.to_owned(),
    };
    let layout =
        LevelLayout::parse(&layout_text, PlayerProfile::default()).context("parse level layout")?;
    let (mut world, _) = layout.into_world();
    tracing::info!(
        seed = settings.seed,
        monsters = query::monster_view(&world).iter().count(),
        "level loaded"
    );

    let mut controller = TurnController::new(Config::new(settings.seed));
    let _ = controller.begin_level(&mut world);
    let viewport = settings.viewport;
    let scene = capture(&world, viewport)?;

    let mut keys: KeySource<StdinLock<'static>> = match &settings.script {
        Some(script) => KeySource::scripted(script),
        None => KeySource::interactive(io::stdin().lock()),
    };

    TextBackend::new(io::stdout())
        .with_ansi(settings.ansi)
        .run(Presentation::new("Imla", scene), move |scene| {
            let Some(key) = keys.next_key()? else {
                return Ok(SceneFlow::Exit);
            };

            let intent = match action_for_key(key) {
                KeyAction::Intent(intent) => intent,
                KeyAction::Quit => return Ok(SceneFlow::Exit),
                KeyAction::Ignored => {
                    tracing::debug!(%key, "unbound key");
                    return Ok(SceneFlow::Continue);
                }
            };

            let outcome = controller.resolve(&mut world, intent);
            outcome.events().iter().for_each(report);
            *scene = capture(&world, viewport)?;

            if outcome.player_alive() {
                Ok(SceneFlow::Continue)
            } else {
                tracing::info!(turn = query::turn(&world), "you died");
                Ok(SceneFlow::Exit)
            }
        })
}

fn capture(world: &World, size: UVec2) -> Result<Scene> {
    let map = query::tile_map(world);
    let focus = query::player_position(world).unwrap_or(Point::new(0, 0));
    let viewport = Viewport::centered_on(focus, size, map.width(), map.height())?;
    Ok(Scene::capture(world, viewport))
}

/// Writes the message log.
fn report(event: &Event) {
    match event {
        Event::MonsterDamaged {
            monster,
            amount,
            remaining,
        } => tracing::info!(monster = monster.get(), amount, remaining, "you hit"),
        Event::PlayerDamaged {
            source,
            amount,
            remaining,
        } => tracing::info!(?source, amount, remaining, "you are hit"),
        Event::MonsterDied { monster, .. } => tracing::info!(monster = monster.get(), "slain"),
        Event::ItemDropped { at, drop } => {
            tracing::info!(?at, kind = ?drop.kind, amount = drop.amount, "loot")
        }
        Event::PlayerLeveledUp { level } => tracing::info!(level, "level up"),
        Event::InteractableUsed { at, .. } => tracing::info!(?at, "chest opened"),
        Event::CommandRejected { reason } => tracing::debug!(?reason, "command rejected"),
        other => tracing::debug!(event = ?other),
    }
}
