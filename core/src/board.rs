use core::fmt;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// How long a cell flashes after a scoring event.
pub const FLASH_DURATION: Millis = 1000;

/// Blink interval while flashing.
pub const FLASH_PERIOD: Millis = 200;

/// A board cell. Always owns exactly one tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardCell {
    tile: Tile,
    flash_start: Option<Millis>,
}

impl BoardCell {
    pub const fn new(tile: Tile) -> Self {
        Self {
            tile,
            flash_start: None,
        }
    }

    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    pub fn color(&self) -> Color {
        self.tile.color()
    }

    pub fn flash_start(&self) -> Option<Millis> {
        self.flash_start
    }

    pub fn is_flashing(&self, now: Millis) -> bool {
        self.flash_start
            .and_then(|start| now.checked_sub(start))
            .is_some_and(|elapsed| elapsed <= FLASH_DURATION)
    }

    /// Whether the highlight is drawn at `now`; blinks every `FLASH_PERIOD`.
    pub fn flash_visible(&self, now: Millis) -> bool {
        match self.flash_start.and_then(|start| now.checked_sub(start)) {
            Some(elapsed) if elapsed <= FLASH_DURATION => (elapsed / FLASH_PERIOD) & 1 == 1,
            _ => false,
        }
    }

    pub(crate) fn start_flash(&mut self, now: Millis) {
        self.flash_start = Some(now);
    }
}

/// The toroidal playing field.
///
/// Every coordinate is taken modulo the board size, so any `Point` addresses
/// a valid cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    grid: Grid<BoardCell>,
}

impl Board {
    /// Square board of `size` filled with random simple tiles from `palette`.
    pub fn random(size: Coord, rng: &mut StdRng, palette: &[Color]) -> Self {
        let size = size.max(1);
        let grid = Grid::from_shape_fn((size, size), |_| {
            BoardCell::new(Tile::simple(random_color(rng, palette.len())))
        });
        Self { grid }
    }

    /// Builds a board from rows of colors, `rows[y][x]`.
    pub fn from_rows(rows: &[&[Color]]) -> Result<Self> {
        let size = rows.len();
        if size == 0 || size > Coord::MAX.into() || rows.iter().any(|row| row.len() != size) {
            return Err(GameError::InvalidBoardShape);
        }
        let size = size as Coord;
        let grid = Grid::from_shape_fn((size, size), |(x, y)| {
            BoardCell::new(Tile::simple(rows[usize::from(y)][usize::from(x)]))
        });
        Ok(Self { grid })
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn width(&self) -> Coord {
        self.grid.width()
    }

    pub fn height(&self) -> Coord {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid<BoardCell> {
        &self.grid
    }

    pub fn set_layout(&mut self, layout: GridLayout) {
        self.grid.set_layout(layout);
    }

    pub fn wrap(&self, point: Point) -> Coord2 {
        wrap_point(point, self.size())
    }

    pub fn cell(&self, point: Point) -> &BoardCell {
        &self.grid[self.wrap(point)]
    }

    pub fn color_at(&self, point: Point) -> Color {
        self.cell(point).color()
    }

    pub fn cells(&self) -> impl Iterator<Item = (Coord2, &BoardCell)> {
        self.grid.iter()
    }

    /// Recolors the tile at `point` and starts its flash; returns the wrapped coordinates.
    pub(crate) fn set_color_at(&mut self, point: Point, color: Color, now: Millis) -> Coord2 {
        let coords = self.wrap(point);
        let cell = &mut self.grid[coords];
        cell.tile.set_color(color);
        cell.start_flash(now);
        coords
    }

    /// Replaces every tile with a fresh random simple tile. Flash state is kept.
    pub fn randomize(&mut self, rng: &mut StdRng, palette: &[Color]) {
        for cell in self.grid.iter_mut() {
            cell.tile = Tile::simple(random_color(rng, palette.len()));
        }
    }

    fn is_uniform(mut colors: impl Iterator<Item = Color>) -> bool {
        match colors.next() {
            Some(first) => colors.all(|color| color == first),
            None => false,
        }
    }

    pub fn is_row_filled(&self, y: Coord) -> bool {
        Self::is_uniform((0..self.width()).map(|x| self.grid[(x, y)].color()))
    }

    pub fn is_column_filled(&self, x: Coord) -> bool {
        Self::is_uniform((0..self.height()).map(|y| self.grid[(x, y)].color()))
    }

    /// Whether every cell on the board shares one color.
    pub fn is_filled(&self) -> bool {
        Self::is_uniform(self.cells().map(|(_, cell)| cell.color()))
    }

    pub(crate) fn flash_at(&mut self, coords: Coord2, now: Millis) {
        if let Some(cell) = self.grid.get_mut(coords) {
            cell.start_flash(now);
        }
    }

    pub(crate) fn flash_row(&mut self, y: Coord, now: Millis) {
        for x in 0..self.width() {
            self.flash_at((x, y), now);
        }
    }

    pub(crate) fn flash_column(&mut self, x: Coord, now: Millis) {
        for y in 0..self.height() {
            self.flash_at((x, y), now);
        }
    }

    pub(crate) fn flash_all(&mut self, now: Millis) {
        for cell in self.grid.iter_mut() {
            cell.start_flash(now);
        }
    }

    /// Cyclically shifts cell contents; `(i, j)` receives what was at `(i + dx, j + dy)`.
    pub fn rotate(&mut self, dx: i32, dy: i32) {
        let size = self.size();
        let dx = dx.rem_euclid(i32::from(size.0));
        let dy = dy.rem_euclid(i32::from(size.1));
        log::trace!("Rotating board by ({}, {})", dx, dy);
        self.grid.permute(size, |(x, y)| {
            wrap_point((i32::from(x) + dx, i32::from(y) + dy), size)
        });
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            for x in 0..self.width() {
                write!(f, "{}", self.grid[(x, y)].color().initial())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Tracks a pointer dragging the board around.
///
/// The board itself only moves in whole cells: each time the pointer travels
/// more than one cell from the anchor, the anchor follows by one cell and the
/// board rotates one step the other way.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoardDrag {
    anchor: (f32, f32),
}

impl BoardDrag {
    pub const fn new(anchor: (f32, f32)) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> (f32, f32) {
        self.anchor
    }

    /// Moves the pointer, returning the rotation to apply to the board.
    pub fn advance(&mut self, (px, py): (f32, f32), cell_size: f32) -> (i32, i32) {
        if cell_size <= 0.0 {
            return (0, 0);
        }
        let step_x = Self::step_axis(&mut self.anchor.0, px, cell_size);
        let step_y = Self::step_axis(&mut self.anchor.1, py, cell_size);
        (step_x, step_y)
    }

    /// Whole cells the pointer is past the anchor, strictly more than one cell counting as one.
    fn step_axis(anchor: &mut f32, pointer: f32, cell_size: f32) -> i32 {
        let distance = pointer - *anchor;
        let cells = (distance.abs() / cell_size).ceil() - 1.0;
        if cells.is_nan() || cells < 1.0 {
            return 0;
        }
        let cells = cells.copysign(distance);
        *anchor += cells * cell_size;
        // float to int casts saturate
        (-cells) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Color::*;

    fn sample_board() -> Board {
        Board::from_rows(&[
            &[Red, Green, Blue],
            &[Blue, Red, Green],
            &[Green, Blue, Red],
        ])
        .unwrap()
    }

    #[test]
    fn color_at_wraps_in_both_axes() {
        let board = sample_board();
        for x in 0..3 {
            for y in 0..3 {
                for k in -3..=3 {
                    assert_eq!(board.color_at((x + k * 3, y)), board.color_at((x, y)));
                    assert_eq!(board.color_at((x, y + k * 3)), board.color_at((x, y)));
                }
            }
        }
        assert_eq!(board.color_at((-1, -1)), Red);
        assert_eq!(board.color_at((-1, 0)), Blue);
    }

    #[test]
    fn from_rows_rejects_non_square() {
        assert_eq!(
            Board::from_rows(&[&[Red, Red], &[Red]]),
            Err(GameError::InvalidBoardShape)
        );
        assert_eq!(Board::from_rows(&[]), Err(GameError::InvalidBoardShape));
    }

    #[test]
    fn rotate_shifts_contents_without_losing_tiles() {
        let mut board = sample_board();
        board.rotate(1, 0);
        assert_eq!(board.to_string(), "GBR\nRGB\nBRG\n");

        let mut board = Board::from_rows(&[
            &[Blue, Red, Red],
            &[Red, Red, Red],
            &[Red, Red, Red],
        ])
        .unwrap();
        board.rotate(1, 0);
        assert_eq!(board.color_at((2, 0)), Blue);

        board.rotate(-4, 5);
        assert_eq!(board.to_string(), "RRR\nBRR\nRRR\n");
        let blues = board.cells().filter(|(_, cell)| cell.color() == Blue).count();
        assert_eq!(blues, 1);
    }

    #[test]
    fn rotate_reduces_huge_offsets() {
        let mut board = sample_board();
        let mut expected = sample_board();
        board.rotate(i32::MAX, i32::MIN);
        expected.rotate(1, 1);
        assert_eq!(board, expected);
    }

    #[test]
    fn line_and_board_fill_detection() {
        let mut board = Board::from_rows(&[
            &[Red, Red, Red],
            &[Blue, Red, Green],
            &[Green, Red, Red],
        ])
        .unwrap();
        assert!(board.is_row_filled(0));
        assert!(!board.is_row_filled(1));
        assert!(board.is_column_filled(1));
        assert!(!board.is_column_filled(0));
        assert!(!board.is_filled());

        for point in [(0, 1), (2, 1), (0, 2)] {
            board.set_color_at(point, Red, 0);
        }
        assert!(board.is_filled());
    }

    #[test]
    fn flash_blinks_for_its_duration() {
        let mut cell = BoardCell::new(Tile::simple(Red));
        assert!(!cell.is_flashing(0));

        cell.start_flash(1_000);
        assert!(!cell.is_flashing(999));
        assert!(cell.is_flashing(1_000));
        assert!(!cell.flash_visible(1_100));
        assert!(cell.flash_visible(1_300));
        assert!(cell.is_flashing(2_000));
        assert!(!cell.is_flashing(2_001));
        assert!(!cell.flash_visible(2_001));
    }

    #[test]
    fn drag_rotates_one_step_per_cell() {
        let mut drag = BoardDrag::new((0.0, 0.0));
        assert_eq!(drag.advance((15.0, 5.0), 20.0), (0, 0));
        assert_eq!(drag.advance((25.0, -45.0), 20.0), (-1, 2));
        assert_eq!(drag.anchor(), (20.0, -40.0));

        // exactly two cells away only counts one
        assert_eq!(drag.advance((60.0, -40.0), 20.0), (-1, 0));
        assert_eq!(drag.anchor(), (40.0, -40.0));
    }

    #[test]
    fn far_pointer_steps_in_one_go() {
        let mut drag = BoardDrag::new((0.0, 0.0));
        let (dx, dy) = drag.advance((3.0e7, 0.0), 1.0);
        assert!(dx < -29_000_000);
        assert_eq!(dy, 0);
        assert!((3.0e7 - drag.anchor().0).abs() <= 4.0);

        let (dx, _) = drag.advance((-1.0e12, 0.0), 1.0);
        assert_eq!(dx, i32::MAX);
    }
}
