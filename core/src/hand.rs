use serde::{Deserialize, Serialize};

use crate::*;

/// A hand slot holding zero or one tile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandCell {
    tile: Option<Tile>,
    playable: bool,
}

impl HandCell {
    pub fn tile(&self) -> Option<&Tile> {
        self.tile.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.tile.is_none()
    }

    /// Whether the tile here can be played somewhere on the board.
    pub fn is_playable(&self) -> bool {
        self.playable
    }
}

/// Requested layout of the hand relative to the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Hand below the board, wider than tall.
    Portrait,
    /// Hand beside the board, taller than wide.
    Landscape,
}

/// The tiles available to play. Coordinates do not wrap.
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    grid: Grid<HandCell>,
}

impl Hand {
    pub fn new(size: Coord2) -> Self {
        let size = (size.0.max(1), size.1.max(1));
        Self {
            grid: Grid::from_shape_fn(size, |_| HandCell::default()),
        }
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn grid(&self) -> &Grid<HandCell> {
        &self.grid
    }

    pub fn set_layout(&mut self, layout: GridLayout) {
        self.grid.set_layout(layout);
    }

    pub fn cell(&self, coords: Coord2) -> Option<&HandCell> {
        self.grid.get(coords)
    }

    pub fn tile(&self, coords: Coord2) -> Option<&Tile> {
        self.cell(coords).and_then(HandCell::tile)
    }

    pub fn cells(&self) -> impl Iterator<Item = (Coord2, &HandCell)> {
        self.grid.iter()
    }

    /// Coordinates of every slot, in refill order.
    pub fn coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        iter_coords(self.size())
    }

    /// Removes and returns the tile at `coords`.
    pub fn take(&mut self, coords: Coord2) -> Option<Tile> {
        self.grid.get_mut(coords)?.tile.take()
    }

    /// Places `tile` at `coords`, returning whatever was there.
    ///
    /// Out-of-range coordinates hand the tile straight back.
    pub fn replace(&mut self, coords: Coord2, tile: Option<Tile>) -> Option<Tile> {
        match self.grid.get_mut(coords) {
            Some(cell) => core::mem::replace(&mut cell.tile, tile),
            None => tile,
        }
    }

    pub(crate) fn set_playable(&mut self, coords: Coord2, playable: bool) {
        if let Some(cell) = self.grid.get_mut(coords) {
            cell.playable = playable;
        }
    }

    /// Swaps width and height, transposing the contents.
    pub fn flip(&mut self) {
        let (width, height) = self.size();
        self.grid.permute((height, width), |(x, y)| (y, x));
    }

    /// Flips the hand if its long axis disagrees with `orientation`.
    ///
    /// Returns whether a flip happened.
    pub fn orient(&mut self, orientation: Orientation) -> bool {
        let (width, height) = self.size();
        let needs_flip = match orientation {
            Orientation::Portrait => width < height,
            Orientation::Landscape => height < width,
        };
        if needs_flip {
            self.flip();
        }
        needs_flip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Color::*;

    #[test]
    fn take_and_replace_move_tiles() {
        let mut hand = Hand::new((2, 1));
        assert_eq!(hand.replace((0, 0), Some(Tile::simple(Red))), None);
        assert_eq!(hand.take((1, 0)), None);
        assert_eq!(hand.take((0, 0)), Some(Tile::simple(Red)));
        assert!(hand.cell((0, 0)).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_coords_do_not_match() {
        let mut hand = Hand::new((2, 1));
        assert_eq!(hand.cell((2, 0)), None);
        assert_eq!(hand.take((0, 5)), None);
        assert_eq!(hand.replace((9, 9), Some(Tile::simple(Blue))), Some(Tile::simple(Blue)));
    }

    #[test]
    fn flip_transposes_contents() {
        let mut hand = Hand::new((4, 2));
        hand.replace((3, 0), Some(Tile::simple(Red)));
        hand.replace((1, 1), Some(Tile::simple(Green)));

        hand.flip();

        assert_eq!(hand.size(), (2, 4));
        assert_eq!(hand.tile((0, 3)), Some(&Tile::simple(Red)));
        assert_eq!(hand.tile((1, 1)), Some(&Tile::simple(Green)));
        assert_eq!(hand.cells().filter(|(_, cell)| !cell.is_empty()).count(), 2);
    }

    #[test]
    fn orient_flips_only_when_needed() {
        let mut hand = Hand::new((4, 2));
        assert!(!hand.orient(Orientation::Portrait));
        assert!(hand.orient(Orientation::Landscape));
        assert_eq!(hand.size(), (2, 4));
        assert!(!hand.orient(Orientation::Landscape));
    }
}
