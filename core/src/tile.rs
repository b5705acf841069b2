use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::*;

/// Points a plain tile is worth per level.
pub const BASE_POINTS: Score = 10;

/// How a played tile spreads its color across the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Recolors the target cell only.
    #[default]
    Simple,
    /// Recolors the target cell and its four orthogonal neighbors.
    Area,
    /// Flood-fills the same-colored region containing the target cell.
    Fill,
}

/// A 3×3 neighbor-color precondition.
///
/// Slot `i + 3 * j` constrains the board cell at offset `(i - 1, j - 1)` from
/// the play position. Empty slots impose no constraint.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    slots: [Option<Color>; Pattern::SLOTS],
}

impl Pattern {
    pub const SLOTS: usize = 9;

    pub const fn new(slots: [Option<Color>; Pattern::SLOTS]) -> Self {
        Self { slots }
    }

    pub fn from_slots(slots: &[Option<Color>]) -> Result<Self> {
        let slots = slots
            .try_into()
            .map_err(|_| GameError::InvalidPattern(slots.len()))?;
        Ok(Self::new(slots))
    }

    /// Slot index for a neighbor offset in `-1..=1` on both axes.
    pub fn slot_index((dx, dy): (i32, i32)) -> Option<usize> {
        let i = usize::try_from(dx + 1).ok().filter(|&i| i < 3)?;
        let j = usize::try_from(dy + 1).ok().filter(|&j| j < 3)?;
        Some(i + 3 * j)
    }

    /// Neighbor offset constrained by slot `index`.
    pub const fn slot_offset(index: usize) -> (i32, i32) {
        ((index % 3) as i32 - 1, (index / 3) as i32 - 1)
    }

    /// Builder-style helper constraining the neighbor at `offset` to `color`.
    pub fn with(mut self, offset: (i32, i32), color: Color) -> Self {
        if let Some(index) = Self::slot_index(offset) {
            self.slots[index] = Some(color);
        }
        self
    }

    pub fn slot(&self, index: usize) -> Option<Color> {
        self.slots.get(index).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<Color>; Pattern::SLOTS] {
        &self.slots
    }

    /// Constrained neighbor offsets with the color each must have.
    pub fn constraints(&self) -> impl Iterator<Item = ((i32, i32), Color)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|color| (Self::slot_offset(index), color)))
    }

    pub fn constraint_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn unique_colors(&self) -> usize {
        self.slots.iter().flatten().collect::<BTreeSet<_>>().len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraint_count() == 0
    }
}

/// A placeable tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    color: Color,
    kind: TileKind,
    pattern: Option<Pattern>,
}

impl Tile {
    pub const fn new(color: Color, kind: TileKind) -> Self {
        Self {
            color,
            kind,
            pattern: None,
        }
    }

    pub const fn simple(color: Color) -> Self {
        Self::new(color, TileKind::Simple)
    }

    /// Creates a tile carrying a neighbor pattern.
    ///
    /// A pattern without any constrained slot would play anywhere, so it is
    /// stored as a plain tile instead.
    pub fn constrained(color: Color, kind: TileKind, pattern: Pattern) -> Self {
        if pattern.is_empty() {
            log::warn!("Empty neighbor pattern, creating plain {:?} tile", kind);
            return Self::new(color, kind);
        }
        Self {
            color,
            kind,
            pattern: Some(pattern),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn is_constrained(&self) -> bool {
        self.pattern.is_some()
    }

    /// Whether the tile may be played at `(x, y)` on `board`.
    pub fn can_play(&self, board: &Board, (x, y): Point) -> bool {
        let Some(pattern) = &self.pattern else {
            return true;
        };
        pattern
            .constraints()
            .all(|((dx, dy), color)| board.color_at((x + dx, y + dy)) == color)
    }

    /// Whether there is at least one board cell where the tile can be played.
    pub fn can_play_anywhere(&self, board: &Board) -> bool {
        iter_coords(board.size()).any(|coords| self.can_play(board, coords.to_point()))
    }

    /// Base score for playing this tile at `level`.
    pub fn points(&self, level: Level) -> Score {
        let level = Score::from(level);
        match &self.pattern {
            None => level * BASE_POINTS,
            Some(pattern) => {
                let neighbors = pattern.constraint_count() as Score;
                let unique = pattern.unique_colors() as Score;
                level * (1 + neighbors * unique * unique) * BASE_POINTS
            }
        }
    }

    /// Whether the play at `this` relied on whatever sits at `other`.
    ///
    /// Offsets are not wrapped, so a neighbor across the board seam does not count.
    pub fn play_depends_on(&self, (this_x, this_y): Point, (other_x, other_y): Point) -> bool {
        self.pattern
            .as_ref()
            .and_then(|pattern| {
                let index = Pattern::slot_index((other_x - this_x, other_y - this_y))?;
                pattern.slot(index)
            })
            .is_some()
    }
}
