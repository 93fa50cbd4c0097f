#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Imla adapters.
//!
//! Backends never read the world directly: adapters capture a [`Scene`] through
//! the world's query interface and hand it to a [`RenderingBackend`].

use anyhow::Result as AnyResult;
use glam::{IVec2, UVec2};
use imla_core::{Color, Point};
use imla_world::{query, World};
use std::{error::Error, fmt, io::Write};

/// Rectangle of the level that is presented on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    origin: IVec2,
    size: UVec2,
}

impl Viewport {
    /// Creates a viewport anchored at `origin` covering `size` tiles.
    pub fn new(origin: IVec2, size: UVec2) -> Result<Self, RenderingError> {
        if size.x == 0 || size.y == 0 {
            return Err(RenderingError::EmptyViewport {
                width: size.x,
                height: size.y,
            });
        }

        Ok(Self { origin, size })
    }

    /// Creates a viewport centred on `focus`, clamped so it never scrolls past
    /// the level edges. Levels smaller than the viewport are anchored at zero.
    pub fn centered_on(
        focus: Point,
        size: UVec2,
        level_width: u32,
        level_height: u32,
    ) -> Result<Self, RenderingError> {
        let half = (size / 2).as_ivec2();
        let wanted = IVec2::new(focus.x(), focus.y()) - half;
        let level = UVec2::new(level_width, level_height).as_ivec2();
        let max_origin = (level - size.as_ivec2()).max(IVec2::ZERO);
        Self::new(wanted.clamp(IVec2::ZERO, max_origin), size)
    }

    /// Top-left level point shown by the viewport.
    #[must_use]
    pub const fn origin(&self) -> IVec2 {
        self.origin
    }

    /// Number of columns and rows shown.
    #[must_use]
    pub const fn size(&self) -> UVec2 {
        self.size
    }

    /// Whether the level point falls inside the viewport.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.to_screen(point).is_some()
    }

    /// Screen cell showing the level point, if it is inside the viewport.
    #[must_use]
    pub fn to_screen(&self, point: Point) -> Option<UVec2> {
        let relative = IVec2::new(point.x(), point.y()) - self.origin;
        if relative.x < 0 || relative.y < 0 {
            return None;
        }
        let relative = relative.as_uvec2();
        (relative.x < self.size.x && relative.y < self.size.y).then_some(relative)
    }

    fn points(&self) -> impl Iterator<Item = Point> {
        let origin = self.origin;
        let size = self.size.as_ivec2();
        (0..size.y).flat_map(move |row| {
            (0..size.x).map(move |column| Point::new(origin.x + column, origin.y + row))
        })
    }
}

/// Everything a backend needs to draw one tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileSample {
    /// Level point of the tile.
    pub point: Point,
    /// Glyph drawn for the tile.
    pub glyph: char,
    /// Whether the tile is currently lit.
    pub is_visible: bool,
    /// Whether the tile has ever been lit.
    pub has_been_visible: bool,
    /// Color used while the tile is lit.
    pub visible_color: Color,
    /// Color used while the tile is only remembered.
    pub fow_color: Color,
}

/// Everything a backend needs to draw one entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySample {
    /// Level point of the entity.
    pub point: Point,
    /// Glyph drawn for the entity.
    pub glyph: char,
    /// Color of the glyph.
    pub color: Color,
    /// Whether the entity's tile is currently lit.
    pub is_visible: bool,
}

/// Player summary shown beneath the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusLine {
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub health_max: f32,
    /// Experience level.
    pub level: u32,
    /// Total experience.
    pub xp: u32,
    /// Experience required for the next level.
    pub next_level_xp: u32,
    /// Elapsed turns.
    pub turn: u64,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HP {:.1}/{:.1}  LVL {}  XP {}/{}  T {}",
            self.health.max(0.0),
            self.health_max,
            self.level,
            self.xp,
            self.next_level_xp,
            self.turn
        )
    }
}

/// Snapshot of the visible part of the level.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Area of the level captured by the scene.
    pub viewport: Viewport,
    /// Present tiles inside the viewport in row-major order.
    pub tiles: Vec<TileSample>,
    /// Entities inside the viewport in draw order.
    pub entities: Vec<EntitySample>,
    /// Player summary, absent before the player spawns.
    pub status: Option<StatusLine>,
}

impl Scene {
    /// Captures the world as seen through `viewport`.
    #[must_use]
    pub fn capture(world: &World, viewport: Viewport) -> Self {
        let map = query::tile_map(world);
        let tiles = viewport
            .points()
            .filter_map(|point| {
                map.tile(point).map(|tile| TileSample {
                    point,
                    glyph: tile.glyph(),
                    is_visible: tile.is_visible(),
                    has_been_visible: tile.has_been_visible(),
                    visible_color: tile.visible_color(),
                    fow_color: tile.remembered_color(),
                })
            })
            .collect();

        let is_visible = |point: Point| map.tile(point).is_some_and(|tile| tile.is_visible());
        let mut entities = Vec::new();
        let mut push = |point: Point, glyph: char, color: Color| {
            if viewport.contains(point) {
                entities.push(EntitySample {
                    point,
                    glyph,
                    color,
                    is_visible: is_visible(point),
                });
            }
        };

        for item in query::floor_items(world) {
            push(item.at, item.drop.kind.glyph(), item.drop.kind.color());
        }
        for effect in query::floor_effects(world) {
            push(effect.at, effect.glyph(), effect.color());
        }
        for interactable in query::interactables(world) {
            push(interactable.at, interactable.glyph(), interactable.color());
        }
        for monster in query::monster_view(world).iter() {
            push(monster.position, monster.glyph, monster.color);
        }
        for marker in query::visual_effects(world) {
            push(marker.at, marker.glyph, marker.color);
        }

        let player = query::player(world);
        if let Some(player) = &player {
            push(player.position, player.glyph, player.color);
        }

        let status = player.map(|player| StatusLine {
            health: player.health,
            health_max: player.health_max,
            level: player.level,
            xp: player.xp,
            next_level_xp: player.next_level_xp,
            turn: query::turn(world),
        });

        Self {
            viewport,
            tiles,
            entities,
            status,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown above the first frame.
    pub title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Decision returned by the scene update closure after each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneFlow {
    /// Draw the updated scene and keep running.
    Continue,
    /// Draw the updated scene one last time and stop.
    Exit,
}

/// Rendering backend capable of presenting Imla scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until the update closure requests an exit.
    ///
    /// The provided `update_scene` closure is called after every presented
    /// frame and may replace the scene before the next one is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(&mut Scene) -> AnyResult<SceneFlow>;
}

/// Backend that writes every frame as plain lines of text.
#[derive(Debug)]
pub struct TextBackend<W> {
    out: W,
    ansi: bool,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing uncolored frames to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out, ansi: false }
    }

    /// Enables or disables ANSI truecolor escapes.
    #[must_use]
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        for line in render_lines(scene, self.ansi) {
            writeln!(self.out, "{line}")?;
        }
        if let Some(status) = &scene.status {
            writeln!(self.out, "{status}")?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(&mut Scene) -> AnyResult<SceneFlow>,
    {
        writeln!(self.out, "{}", presentation.title)?;
        let mut scene = presentation.scene;
        self.present(&scene)?;

        loop {
            let flow = update_scene(&mut scene)?;
            self.present(&scene)?;
            if flow == SceneFlow::Exit {
                return Ok(());
            }
        }
    }
}

/// Renders the map part of a scene as one string per viewport row.
///
/// Never-seen tiles and empty points are blank; only visible entities are drawn.
#[must_use]
pub fn render_lines(scene: &Scene, ansi: bool) -> Vec<String> {
    let size = scene.viewport.size();
    let width = size.x as usize;
    let mut cells: Vec<Option<(char, Color)>> = vec![None; width * size.y as usize];
    let index = |point: Point| {
        scene
            .viewport
            .to_screen(point)
            .map(|cell| cell.y as usize * width + cell.x as usize)
    };

    for tile in &scene.tiles {
        let color = if tile.is_visible {
            tile.visible_color
        } else if tile.has_been_visible {
            tile.fow_color
        } else {
            continue;
        };
        if let Some(slot) = index(tile.point) {
            cells[slot] = Some((tile.glyph, color));
        }
    }

    for entity in scene.entities.iter().filter(|entity| entity.is_visible) {
        if let Some(slot) = index(entity.point) {
            cells[slot] = Some((entity.glyph, entity.color));
        }
    }

    cells
        .chunks(width.max(1))
        .map(|row| {
            let mut line = String::new();
            for cell in row {
                match cell {
                    Some((glyph, color)) if ansi => line.push_str(&format!(
                        "\x1b[38;2;{};{};{}m{glyph}\x1b[0m",
                        color.red(),
                        color.green(),
                        color.blue()
                    )),
                    Some((glyph, _)) => line.push(*glyph),
                    None => line.push(' '),
                }
            }
            if !ansi {
                line.truncate(line.trim_end().len());
            }
            line
        })
        .collect()
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Viewports must show at least one tile in each direction.
    EmptyViewport {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyViewport { width, height } => {
                write!(f, "viewport must not be empty (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use imla_core::{Command, PlayerProfile};
    use imla_world::{apply, LevelLayout};

    const ROOM: &str = "\
#########
#@..#...#
#...#.o.#
#########
";

    fn lit_world() -> World {
        let (mut world, _) = LevelLayout::parse(ROOM, PlayerProfile::default())
            .expect("valid layout")
            .into_world();
        let mut events = Vec::new();
        apply(&mut world, Command::RefreshVisibility, &mut events);
        world
    }

    #[test]
    fn viewport_creation_rejects_empty_sizes() {
        let error = Viewport::new(IVec2::ZERO, UVec2::new(0, 3)).expect_err("empty viewport");

        assert_eq!(error, RenderingError::EmptyViewport { width: 0, height: 3 });
    }

    #[test]
    fn centered_viewport_is_clamped_to_level_edges() {
        let size = UVec2::new(5, 3);

        let corner = Viewport::centered_on(Point::new(0, 0), size, 20, 10).expect("viewport");
        assert_eq!(corner.origin(), IVec2::ZERO);

        let middle = Viewport::centered_on(Point::new(10, 5), size, 20, 10).expect("viewport");
        assert_eq!(middle.origin(), IVec2::new(8, 4));

        let far = Viewport::centered_on(Point::new(19, 9), size, 20, 10).expect("viewport");
        assert_eq!(far.origin(), IVec2::new(15, 7));

        let tiny = Viewport::centered_on(Point::new(2, 1), size, 3, 2).expect("viewport");
        assert_eq!(tiny.origin(), IVec2::ZERO);
    }

    #[test]
    fn to_screen_maps_only_points_inside_the_viewport() {
        let viewport = Viewport::new(IVec2::new(2, 3), UVec2::new(4, 2)).expect("viewport");

        assert_eq!(viewport.to_screen(Point::new(2, 3)), Some(UVec2::ZERO));
        assert_eq!(viewport.to_screen(Point::new(5, 4)), Some(UVec2::new(3, 1)));
        assert_eq!(viewport.to_screen(Point::new(6, 4)), None);
        assert_eq!(viewport.to_screen(Point::new(1, 3)), None);
    }

    #[test]
    fn capture_lists_the_player_last_and_marks_hidden_monsters() {
        let world = lit_world();
        let viewport = Viewport::new(IVec2::ZERO, UVec2::new(9, 4)).expect("viewport");

        let scene = Scene::capture(&world, viewport);

        assert_eq!(scene.tiles.len(), 36);
        let last = scene.entities.last().expect("player captured");
        assert_eq!(last.glyph, '@');
        assert!(last.is_visible);
        let orc = scene
            .entities
            .iter()
            .find(|entity| entity.glyph == 'o')
            .expect("orc captured");
        assert!(!orc.is_visible);
        assert_eq!(scene.status.map(|status| status.level), Some(1));
    }

    #[test]
    fn text_frames_hide_unseen_tiles_and_entities() {
        let world = lit_world();
        let viewport = Viewport::new(IVec2::ZERO, UVec2::new(9, 4)).expect("viewport");
        let scene = Scene::capture(&world, viewport);

        let lines = render_lines(&scene, false);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "#@..#");
        assert_eq!(lines[2], "#...#");
        assert!(!lines.iter().any(|line| line.contains('o')));
    }

    #[test]
    fn text_backend_stops_when_asked() {
        let world = lit_world();
        let viewport = Viewport::new(IVec2::ZERO, UVec2::new(9, 4)).expect("viewport");
        let presentation = Presentation::new("Imla", Scene::capture(&world, viewport));
        let mut output = Vec::new();
        let mut frames = 0;

        TextBackend::new(&mut output)
            .run(presentation, |_| {
                frames += 1;
                Ok(if frames == 2 {
                    SceneFlow::Exit
                } else {
                    SceneFlow::Continue
                })
            })
            .expect("backend runs");

        let text = String::from_utf8(output).expect("utf8 output");
        assert!(text.starts_with("Imla\n"));
        assert_eq!(text.matches("HP 20.0/20.0").count(), 3);
    }
}
