//! Individual level cells and their sight bookkeeping.

use imla_core::Color;

const MIN_MOVEMENT_WEIGHT: f32 = f32::EPSILON;

/// One cell of the level grid.
///
/// The sight flags are only written through [`Tile::mark_sight`], which keeps
/// `is_visible` implying `is_in_los` and makes `has_been_visible` sticky.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    glyph: char,
    blocks_movement: bool,
    blocks_sight: bool,
    movement_weight: f32,
    visible_color: Color,
    remembered_color: Color,
    is_in_los: bool,
    is_visible: bool,
    has_been_visible: bool,
}

impl Tile {
    /// Creates a walkable, transparent tile with unit movement weight.
    #[must_use]
    pub const fn new(glyph: char, visible_color: Color, remembered_color: Color) -> Self {
        Self {
            glyph,
            blocks_movement: false,
            blocks_sight: false,
            movement_weight: 1.0,
            visible_color,
            remembered_color,
            is_in_los: false,
            is_visible: false,
            has_been_visible: false,
        }
    }

    /// Plain stone floor.
    #[must_use]
    pub const fn floor() -> Self {
        Self::new('.', Color::MID_GREY, Color::DARK_GREY)
    }

    /// Solid wall that blocks both movement and sight.
    #[must_use]
    pub const fn wall() -> Self {
        Self::new('#', Color::LIGHT_GREY, Color::MID_GREY)
            .blocking_movement()
            .blocking_sight()
    }

    /// Rough ground that is walkable but costs more to cross.
    #[must_use]
    pub fn rubble() -> Self {
        Self::new(':', Color::TAN, Color::SIENNA).with_weight(3.0)
    }

    /// Marks the tile as impassable.
    #[must_use]
    pub const fn blocking_movement(mut self) -> Self {
        self.blocks_movement = true;
        self
    }

    /// Marks the tile as opaque.
    #[must_use]
    pub const fn blocking_sight(mut self) -> Self {
        self.blocks_sight = true;
        self
    }

    /// Replaces the cost of entering the tile. Non-positive weights are raised
    /// to the smallest positive weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.movement_weight = if weight.is_nan() {
            1.0
        } else {
            weight.max(MIN_MOVEMENT_WEIGHT)
        };
        self
    }

    /// Glyph drawn for the tile.
    #[must_use]
    pub const fn glyph(&self) -> char {
        self.glyph
    }

    /// Whether actors may not enter the tile.
    #[must_use]
    pub const fn blocks_movement(&self) -> bool {
        self.blocks_movement
    }

    /// Whether the tile occludes sight.
    #[must_use]
    pub const fn blocks_sight(&self) -> bool {
        self.blocks_sight
    }

    /// Cost of stepping onto the tile.
    #[must_use]
    pub const fn movement_weight(&self) -> f32 {
        self.movement_weight
    }

    /// Color used while the tile is visible.
    #[must_use]
    pub const fn visible_color(&self) -> Color {
        self.visible_color
    }

    /// Color used while the tile is remembered but not visible.
    #[must_use]
    pub const fn remembered_color(&self) -> Color {
        self.remembered_color
    }

    /// Whether the tile is geometrically unoccluded from the last sweep origin.
    #[must_use]
    pub const fn is_in_los(&self) -> bool {
        self.is_in_los
    }

    /// Whether the tile is in line of sight and within sight range.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Whether the tile has ever been visible.
    #[must_use]
    pub const fn has_been_visible(&self) -> bool {
        self.has_been_visible
    }

    /// Records the outcome of a visibility sweep for this tile.
    pub fn mark_sight(&mut self, in_los: bool, in_range: bool) {
        self.is_in_los = in_los;
        self.is_visible = in_los && in_range;
        if self.is_visible {
            self.has_been_visible = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_requires_line_of_sight() {
        let mut tile = Tile::floor();
        tile.mark_sight(false, true);

        assert!(!tile.is_visible());
        assert!(!tile.has_been_visible());
    }

    #[test]
    fn remembered_flag_survives_losing_sight() {
        let mut tile = Tile::floor();
        tile.mark_sight(true, true);
        tile.mark_sight(true, false);

        assert!(tile.is_in_los());
        assert!(!tile.is_visible());
        assert!(tile.has_been_visible());

        tile.mark_sight(false, false);
        assert!(tile.has_been_visible());
    }

    #[test]
    fn weights_stay_positive() {
        assert!(Tile::floor().with_weight(-2.0).movement_weight() > 0.0);
        assert_eq!(Tile::floor().with_weight(f32::NAN).movement_weight(), 1.0);
        assert_eq!(Tile::rubble().movement_weight(), 3.0);
    }

    #[test]
    fn walls_block_everything() {
        let wall = Tile::wall();
        assert!(wall.blocks_movement());
        assert!(wall.blocks_sight());
        assert_eq!(wall.glyph(), '#');
    }
}
