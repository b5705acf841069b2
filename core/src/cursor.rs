use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Which grid the cursor points into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorTarget {
    Board(Coord2),
    Hand(Coord2),
}

/// Keyboard cursor. Never wraps: coordinates clamp to the grid it is on,
/// and moving vertically past the edge between hand and board crosses over.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    position: Coord2,
    on_board: bool,
    hidden: bool,
}

/// Maps `x` from a row of `from` cells onto a row of `to` cells, keeping both ends aligned.
fn rescale(x: Coord, from: Coord, to: Coord) -> Coord {
    let (from, to) = (from.saturating_sub(1), to.saturating_sub(1));
    if from == 0 {
        return 0;
    }
    (u16::from(x) * u16::from(to) / u16::from(from)) as Coord
}

impl Cursor {
    /// Hidden cursor on the middle of the hand's top row.
    pub fn new((hand_width, _): Coord2) -> Self {
        Self {
            position: (hand_width / 2, 0),
            on_board: false,
            hidden: true,
        }
    }

    pub fn target(&self) -> CursorTarget {
        if self.on_board {
            CursorTarget::Board(self.position)
        } else {
            CursorTarget::Hand(self.position)
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub(crate) fn show(&mut self) {
        self.hidden = false;
    }

    pub fn step(&mut self, direction: Direction, board_size: Coord2, hand_size: Coord2) {
        self.hidden = false;
        let (board_width, board_height) = board_size;
        let (hand_width, _) = hand_size;
        let (width, height) = if self.on_board { board_size } else { hand_size };
        let (x, y) = self.position;

        self.position = match direction {
            Direction::Left => (x.saturating_sub(1), y),
            Direction::Right => ((x + 1).min(width.saturating_sub(1)), y),
            Direction::Down if self.on_board && y + 1 >= board_height => {
                self.on_board = false;
                (rescale(x, board_width, hand_width), 0)
            }
            Direction::Down => (x, (y + 1).min(height.saturating_sub(1))),
            Direction::Up if !self.on_board && y == 0 => {
                self.on_board = true;
                (
                    rescale(x, hand_width, board_width),
                    board_height.saturating_sub(1),
                )
            }
            Direction::Up => (x, y.saturating_sub(1)),
        };
    }

    /// Pulls the position back inside the current grid, e.g. after the hand flipped.
    pub(crate) fn clamp(&mut self, board_size: Coord2, hand_size: Coord2) {
        let (width, height) = if self.on_board { board_size } else { hand_size };
        let (x, y) = self.position;
        self.position = (
            x.min(width.saturating_sub(1)),
            y.min(height.saturating_sub(1)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    const BOARD: Coord2 = (4, 4);
    const HAND: Coord2 = (4, 2);

    fn walk(cursor: &mut Cursor, steps: &[Direction]) {
        for &direction in steps {
            cursor.step(direction, BOARD, HAND);
        }
    }

    #[test]
    fn starts_hidden_mid_hand() {
        let cursor = Cursor::new(HAND);
        assert!(cursor.is_hidden());
        assert_eq!(cursor.target(), CursorTarget::Hand((2, 0)));
    }

    #[test]
    fn clamps_inside_hand() {
        let mut cursor = Cursor::new(HAND);
        walk(&mut cursor, &[Right, Right, Right, Down, Down, Down]);
        assert!(!cursor.is_hidden());
        assert_eq!(cursor.target(), CursorTarget::Hand((3, 1)));

        walk(&mut cursor, &[Left, Left, Left, Left, Left]);
        assert_eq!(cursor.target(), CursorTarget::Hand((0, 1)));
    }

    #[test]
    fn crosses_between_hand_and_board() {
        let mut cursor = Cursor::new((3, 2));
        cursor.step(Up, BOARD, (3, 2));
        // hand x 1 of 0..=2 maps to board x 1 of 0..=3
        assert_eq!(cursor.target(), CursorTarget::Board((1, 3)));

        for _ in 0..6 {
            cursor.step(Up, BOARD, (3, 2));
        }
        assert_eq!(cursor.target(), CursorTarget::Board((1, 0)));

        cursor.step(Right, BOARD, (3, 2));
        cursor.step(Right, BOARD, (3, 2));
        for _ in 0..4 {
            cursor.step(Down, BOARD, (3, 2));
        }
        assert_eq!(cursor.target(), CursorTarget::Hand((2, 0)));
    }

    #[test]
    fn single_column_hand_maps_to_first_column() {
        assert_eq!(rescale(3, 1, 4), 0);
        assert_eq!(rescale(0, 4, 1), 0);
        assert_eq!(rescale(4, 5, 3), 2);
    }
}
