//! Plain-text level layouts.
//!
//! Each character of a layout describes one tile:
//!
//! | glyph | meaning                               |
//! |-------|---------------------------------------|
//! | `#`   | wall                                  |
//! | `.`   | floor                                 |
//! | `:`   | rubble, walkable but slow             |
//! | ` `   | no tile                               |
//! | `@`   | player on floor                       |
//! | `o`   | orc on floor                          |
//! | `g`   | goblin archer on floor                |
//! | `=`   | chest holding gold on floor           |
//! | `^`   | burning floor                         |
//! | `$`   | gold on floor                         |
//! | `/`   | dagger on floor                       |
//!
//! Rows shorter than the longest row are padded with absent tiles.

use imla_core::{
    Command, EffectKind, Event, InteractionKind, ItemDrop, ItemKind, MonsterProfile,
    PlayerProfile, Point,
};
use imla_grid::{Tile, TileMap};

use crate::{apply, World};

const CHEST_GOLD: u32 = 25;
const LOOSE_GOLD: u32 = 5;
const FIRE_ATTACK_POWER: u32 = 2;
const FIRE_TICKS: u32 = 5;

/// Errors raised while parsing a level layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The layout contained no rows or only blank rows.
    #[error("layout is empty")]
    Empty,
    /// A character did not map onto any known tile or entity.
    #[error("unknown glyph {glyph:?} at line {line}, column {column}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// One-based line number.
        line: usize,
        /// One-based column number.
        column: usize,
    },
    /// No `@` was present.
    #[error("layout does not place the player")]
    MissingPlayer,
    /// More than one `@` was present.
    #[error("second player at line {line}, column {column}")]
    DuplicatePlayer {
        /// One-based line number.
        line: usize,
        /// One-based column number.
        column: usize,
    },
}

/// Parsed level: the tile map plus the commands that populate it.
#[derive(Clone, Debug)]
pub struct LevelLayout {
    map: TileMap,
    commands: Vec<Command>,
}

impl LevelLayout {
    /// Parses a layout, spawning the player with the provided profile.
    pub fn parse(text: &str, player: PlayerProfile) -> Result<Self, LayoutError> {
        let mut rows: Vec<&str> = text.lines().collect();
        while rows.last().is_some_and(|row| row.trim().is_empty()) {
            let _ = rows.pop();
        }

        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut map = TileMap::new(to_u32(width), to_u32(rows.len()));
        let mut player_spawn: Option<Point> = None;
        let mut commands = Vec::new();

        for (row_index, row) in rows.iter().enumerate() {
            for (column_index, glyph) in row.chars().enumerate() {
                let at = Point::new(to_i32(column_index), to_i32(row_index));
                let line = row_index + 1;
                let column = column_index + 1;

                let tile = match glyph {
                    ' ' => None,
                    '#' => Some(Tile::wall()),
                    ':' => Some(Tile::rubble()),
                    '.' | '@' | 'o' | 'g' | '=' | '^' | '$' | '/' => Some(Tile::floor()),
                    _ => return Err(LayoutError::UnknownGlyph { glyph, line, column }),
                };
                if let Some(tile) = tile {
                    let _ = map.set_tile(at, tile);
                }

                match glyph {
                    '@' => {
                        if player_spawn.is_some() {
                            return Err(LayoutError::DuplicatePlayer { line, column });
                        }
                        player_spawn = Some(at);
                    }
                    'o' => commands.push(Command::SpawnMonster {
                        at,
                        profile: MonsterProfile::orc(),
                    }),
                    'g' => commands.push(Command::SpawnMonster {
                        at,
                        profile: MonsterProfile::goblin_archer(),
                    }),
                    '=' => commands.push(Command::PlaceInteractable {
                        at,
                        kind: InteractionKind::Chest {
                            drop: ItemDrop::new(ItemKind::Gold, CHEST_GOLD),
                        },
                    }),
                    '^' => commands.push(Command::PlaceFloorEffect {
                        at,
                        kind: EffectKind::Burn,
                        attack_power: FIRE_ATTACK_POWER,
                        ticks: FIRE_TICKS,
                    }),
                    '$' => commands.push(Command::PlaceFloorItem {
                        at,
                        drop: ItemDrop::new(ItemKind::Gold, LOOSE_GOLD),
                    }),
                    '/' => commands.push(Command::PlaceFloorItem {
                        at,
                        drop: ItemDrop::new(ItemKind::Dagger, 1),
                    }),
                    _ => {}
                }
            }
        }

        let at = player_spawn.ok_or(LayoutError::MissingPlayer)?;
        commands.insert(0, Command::SpawnPlayer { at, profile: player });

        Ok(Self { map, commands })
    }

    /// Tile map described by the layout.
    #[must_use]
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// Commands that populate the level, player first, then in reading order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Builds the world and applies every populating command.
    #[must_use]
    pub fn into_world(self) -> (World, Vec<Event>) {
        let mut world = World::new(self.map);
        let mut events = Vec::new();
        for command in self.commands {
            apply(&mut world, command, &mut events);
        }
        (world, events)
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
