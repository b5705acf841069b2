use hashbrown::HashSet;
use rand::prelude::*;
use smallvec::SmallVec;
use std::collections::{BTreeSet, VecDeque};

use crate::*;

/// Flat bonus added before the multiplier when the whole board turns one color.
pub const BOARD_FILL_BONUS: Score = 2000;

/// A tile lifted out of the hand, waiting to be played or returned.
#[derive(Clone, Debug, PartialEq)]
pub struct HeldTile {
    tile: Tile,
    origin: Coord2,
}

impl HeldTile {
    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    /// Hand cell the tile was taken from.
    pub fn origin(&self) -> Coord2 {
        self.origin
    }
}

/// What a successful play did to the session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayReport {
    /// Wrapped board cell the tile landed on.
    pub target: Coord2,
    /// Number of cells recolored by propagation.
    pub recolored: usize,
    pub filled_rows: SmallVec<[Coord; 4]>,
    pub filled_columns: SmallVec<[Coord; 4]>,
    /// Whole board turned one color and was re-randomized.
    pub board_filled: bool,
    pub same_color: bool,
    /// The play relied on the previous play's cell.
    pub streak: bool,
    /// Score gained by this play.
    pub points: Score,
    pub level_up: bool,
}

impl PlayReport {
    pub fn filled_lines(&self) -> usize {
        self.filled_rows.len() + self.filled_columns.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlayOutcome {
    /// No tile was held.
    NothingHeld,
    /// The tile cannot be played there and went back to its hand cell.
    Rejected,
    Played(PlayReport),
}

impl PlayOutcome {
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Played(_))
    }

    pub fn report(&self) -> Option<&PlayReport> {
        match self {
            Self::Played(report) => Some(report),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HandOutcome {
    NoChange,
    Swapped,
}

impl HandOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Swapped => true,
        }
    }
}

/// Score for a regular play: `base`, +20% per bonus, then +10% per filled line.
///
/// Computed in integers, truncating once at the end.
pub fn play_points(base: Score, same_color: bool, streak: bool, filled_lines: usize) -> Score {
    let mut numerator = base * (10 + filled_lines as Score);
    let mut denominator: Score = 10;
    for bonus in [same_color, streak] {
        if bonus {
            numerator *= 6;
            denominator *= 5;
        }
    }
    numerator / denominator
}

/// Score after a whole-board fill: `floor((score + 2000) * 1.5)`.
pub const fn board_fill_score(score: Score) -> Score {
    (score + BOARD_FILL_BONUS) * 3 / 2
}

/// One game session: board, hand, counters and the tile in flight.
#[derive(Debug)]
pub struct PlayEngine {
    config: GameConfig,
    board: Board,
    hand: Hand,
    held: Option<HeldTile>,
    level: Level,
    turns_remaining: u32,
    score: Score,
    last_play: Option<Coord2>,
    drag: Option<BoardDrag>,
    cursor: Cursor,
    rng: StdRng,
}

impl PlayEngine {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let config = GameConfig::new(
            config.board_size,
            config.hand_size,
            config.plays_per_level,
            config.start_level,
        );
        let mut rng = StdRng::seed_from_u64(seed);
        let board = Board::random(
            config.board_size,
            &mut rng,
            palette_for_level(config.start_level),
        );
        let mut engine = Self {
            config,
            board,
            hand: Hand::new(config.hand_size),
            held: None,
            level: config.start_level,
            turns_remaining: config.plays_per_level,
            score: 0,
            last_play: None,
            drag: None,
            cursor: Cursor::new(config.hand_size),
            rng,
        };
        engine.fill_hand();
        engine
    }

    /// Starts over at `level` with a fresh board and hand.
    pub fn restart(&mut self, level: Level) {
        let level = level.max(1);
        log::debug!("Starting session at level {}", level);
        self.level = level;
        self.turns_remaining = self.config.plays_per_level;
        self.score = 0;
        self.last_play = None;
        self.held = None;
        self.drag = None;
        self.cursor = Cursor::new(self.config.hand_size);
        self.board = Board::random(
            self.config.board_size,
            &mut self.rng,
            palette_for_level(level),
        );
        self.hand = Hand::new(self.config.hand_size);
        self.fill_hand();
    }

    fn fill_hand(&mut self) {
        for coords in self.hand.coords() {
            self.reset_hand_cell(coords);
        }
        self.refresh_playability();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn held_tile(&self) -> Option<&HeldTile> {
        self.held.as_ref()
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn turns_remaining(&self) -> u32 {
        self.turns_remaining
    }

    /// Plays made so far in the current level.
    pub fn plays_into_level(&self) -> u32 {
        self.config.plays_per_level - self.turns_remaining
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn last_play(&self) -> Option<Coord2> {
        self.last_play
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn is_dragging_board(&self) -> bool {
        self.drag.is_some()
    }

    pub fn set_board_layout(&mut self, layout: GridLayout) {
        self.board.set_layout(layout);
    }

    pub fn set_hand_layout(&mut self, layout: GridLayout) {
        self.hand.set_layout(layout);
    }

    /// Whether any hand tile can be played anywhere.
    pub fn has_playable_tile(&self) -> bool {
        self.hand.cells().any(|(_, cell)| cell.is_playable())
            || self
                .held
                .as_ref()
                .is_some_and(|held| held.tile.can_play_anywhere(&self.board))
    }

    /// Lifts the tile at `coords` out of the hand.
    ///
    /// Any tile already held goes back first. Empty or out-of-range cells
    /// leave nothing held.
    pub fn grab_from_hand(&mut self, coords: Coord2) -> Option<&Tile> {
        self.return_held_tile();
        let tile = self.hand.take(coords)?;
        self.hand.set_playable(coords, false);
        log::trace!("Grabbed {:?} from hand {:?}", tile, coords);
        self.held = Some(HeldTile {
            tile,
            origin: coords,
        });
        self.held.as_ref().map(HeldTile::tile)
    }

    /// Puts the held tile back into the hand cell it came from.
    pub fn return_held_tile(&mut self) {
        if let Some(HeldTile { tile, origin }) = self.held.take() {
            log::trace!("Returning {:?} to hand {:?}", tile, origin);
            self.hand.set_playable(origin, tile.can_play_anywhere(&self.board));
            if let Some(displaced) = self.hand.replace(origin, Some(tile)) {
                log::warn!(
                    "Hand {:?} was refilled while its tile was held, dropping {:?}",
                    origin,
                    displaced
                );
            }
        }
    }

    /// Releases the held tile over hand cell `coords`, swapping it with that cell's content.
    pub fn drop_in_hand(&mut self, coords: Coord2) -> HandOutcome {
        let Some(HeldTile { tile, origin }) = self.held.take() else {
            return HandOutcome::NoChange;
        };
        if !self.hand.grid().contains(coords) {
            self.held = Some(HeldTile { tile, origin });
            self.return_held_tile();
            return HandOutcome::NoChange;
        }

        // the target's tile (if any) goes where the held tile came from
        let target_tile = self.hand.take(coords);
        self.hand.replace(origin, target_tile);
        self.hand.replace(coords, Some(tile));
        self.refresh_playability();
        log::debug!("Swapped hand {:?} with {:?}", origin, coords);
        HandOutcome::Swapped
    }

    /// Plays the held tile at `point`, or returns it to the hand if it does not fit.
    pub fn attempt_play(&mut self, point: Point, now: Millis) -> PlayOutcome {
        let Some(held) = self.held.take() else {
            return PlayOutcome::NothingHeld;
        };

        if !held.tile.can_play(&self.board, point) {
            log::debug!("Cannot play {:?} at {:?}", held.tile, point);
            self.held = Some(held);
            self.return_held_tile();
            return PlayOutcome::Rejected;
        }

        let HeldTile { tile, origin } = held;
        PlayOutcome::Played(self.resolve_play(point, tile, origin, now))
    }

    /// Grabs the tile at `hand` and plays it at `point` in one step.
    pub fn play_from_hand(&mut self, hand: Coord2, point: Point, now: Millis) -> PlayOutcome {
        if self.grab_from_hand(hand).is_none() {
            return PlayOutcome::NothingHeld;
        }
        self.attempt_play(point, now)
    }

    /// Applies a legal play of `tile` (taken from hand cell `origin`) at `point`.
    fn resolve_play(
        &mut self,
        point: Point,
        tile: Tile,
        origin: Coord2,
        now: Millis,
    ) -> PlayReport {
        // at most one tile is ever in flight
        self.return_held_tile();

        let target = self.board.wrap(point);
        let played_color = tile.color();
        let played_on_color = self.board.color_at(point);
        let same_color = played_on_color == played_color;

        let recolored = self.propagate(&tile, target, played_on_color, now);
        let rows: BTreeSet<Coord> = recolored.iter().map(|&(_, y)| y).collect();
        let columns: BTreeSet<Coord> = recolored.iter().map(|&(x, _)| x).collect();

        let filled_rows: SmallVec<[Coord; 4]> = rows
            .into_iter()
            .filter(|&y| self.board.is_row_filled(y))
            .collect();
        for &y in &filled_rows {
            self.board.flash_row(y, now);
        }
        let filled_columns: SmallVec<[Coord; 4]> = columns
            .into_iter()
            .filter(|&x| self.board.is_column_filled(x))
            .collect();
        for &x in &filled_columns {
            self.board.flash_column(x, now);
        }

        let board_filled = self.board.is_filled();
        let mut streak = false;
        let points = if board_filled {
            self.board.flash_all(now);
            let before = self.score;
            self.score = board_fill_score(self.score);
            self.board.randomize(&mut self.rng, palette_for_level(self.level));
            log::debug!(
                "Board filled with {}, score {} -> {}",
                played_color,
                before,
                self.score
            );
            self.score - before
        } else {
            streak = self.last_play.is_some_and(|last| {
                tile.play_depends_on(target.to_point(), last.to_point())
            });
            if let Some(last) = self.last_play.filter(|_| streak) {
                self.board.flash_at(last, now);
            }
            let points = play_points(
                tile.points(self.level),
                same_color,
                streak,
                filled_rows.len() + filled_columns.len(),
            );
            self.score += points;
            points
        };

        self.turns_remaining = self.turns_remaining.saturating_sub(1);
        let level_up = self.turns_remaining == 0;
        if level_up {
            self.turns_remaining = self.config.plays_per_level;
            self.level += 1;
            log::debug!("Level up to {}", self.level);
        }

        self.reset_hand_cell(origin);
        self.last_play = Some(target);
        self.refresh_playability();

        let report = PlayReport {
            target,
            recolored: recolored.len(),
            filled_rows,
            filled_columns,
            board_filled,
            same_color,
            streak,
            points,
            level_up,
        };
        log::debug!(
            "Played {:?} {} at {:?}: +{} (lines: {}, streak: {})",
            tile.kind(),
            played_color,
            target,
            points,
            report.filled_lines(),
            streak
        );
        report
    }

    /// Spreads the tile's color from `target` according to its kind.
    ///
    /// Returns every recolored cell.
    fn propagate(
        &mut self,
        tile: &Tile,
        target: Coord2,
        played_on_color: Color,
        now: Millis,
    ) -> Vec<Coord2> {
        let color = tile.color();
        let (x, y) = target.to_point();
        let points: Vec<Point> = match tile.kind() {
            TileKind::Simple => vec![(x, y)],
            TileKind::Area => {
                let mut points = vec![(x, y)];
                points.extend(ORTHOGONAL.iter().map(|(dx, dy)| (x + dx, y + dy)));
                points
            }
            TileKind::Fill => self
                .flood_region(target, played_on_color)
                .into_iter()
                .map(ToPoint::to_point)
                .collect(),
        };
        points
            .into_iter()
            .map(|point| self.board.set_color_at(point, color, now))
            .collect()
    }

    /// Cells reachable from `start` through orthogonal wrapped steps over `color`.
    fn flood_region(&self, start: Coord2, color: Color) -> Vec<Coord2> {
        let mut visited = HashSet::new();
        visited.insert(start);
        let mut to_visit = VecDeque::from([start]);
        let mut region = Vec::new();

        while let Some(coords) = to_visit.pop_front() {
            region.push(coords);
            let (x, y) = coords.to_point();
            for (dx, dy) in ORTHOGONAL {
                let next = self.board.wrap((x + dx, y + dy));
                if self.board.color_at(next.to_point()) == color && visited.insert(next) {
                    to_visit.push_back(next);
                }
            }
        }

        log::trace!("Flood fill from {:?} covers {} cells", start, region.len());
        region
    }

    /// Puts a freshly generated tile into hand cell `coords`.
    fn reset_hand_cell(&mut self, coords: Coord2) {
        let tile = random_hand_tile(&mut self.rng, self.level);
        self.hand.replace(coords, Some(tile));
    }

    /// Recomputes which hand tiles can be played somewhere on the board.
    pub fn refresh_playability(&mut self) {
        for coords in self.hand.coords() {
            let playable = self
                .hand
                .tile(coords)
                .is_some_and(|tile| tile.can_play_anywhere(&self.board));
            self.hand.set_playable(coords, playable);
        }
    }

    /// Starts dragging the board from pointer position `pointer`.
    pub fn begin_board_drag(&mut self, pointer: (f32, f32)) {
        self.return_held_tile();
        if self.drag.is_none() {
            self.drag = Some(BoardDrag::new(pointer));
        }
    }

    /// Moves the dragging pointer, rotating the board by whole cells.
    ///
    /// Returns the rotation applied.
    pub fn drag_board_to(&mut self, pointer: (f32, f32)) -> (i32, i32) {
        let cell_size = self.board.grid().layout().scale;
        let Some(drag) = self.drag.as_mut() else {
            return (0, 0);
        };
        let (dx, dy) = drag.advance(pointer, cell_size);
        if (dx, dy) != (0, 0) {
            self.return_held_tile();
            self.board.rotate(dx, dy);
        }
        (dx, dy)
    }

    pub fn end_board_drag(&mut self) {
        self.drag = None;
        self.return_held_tile();
    }

    /// Re-orients the hand for the caller's layout.
    pub fn orient_hand(&mut self, orientation: Orientation) -> bool {
        self.return_held_tile();
        let flipped = self.hand.orient(orientation);
        self.cursor.clamp(self.board.size(), self.hand.size());
        flipped
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        self.cursor.step(direction, self.board.size(), self.hand.size());
    }

    pub fn hide_cursor(&mut self) {
        self.cursor.hide();
    }

    /// Acts on the cell under the cursor.
    ///
    /// In the hand this swaps the held tile with the cell's content. On the
    /// board it plays the held tile if it fits there, and keeps holding it
    /// otherwise. Returns the report when a play happened.
    pub fn cursor_click(&mut self, now: Millis) -> Option<PlayReport> {
        self.cursor.show();
        match self.cursor.target() {
            CursorTarget::Hand(coords) => {
                let picked = self.hand.take(coords);
                self.held = match self.held.take() {
                    Some(HeldTile { tile, origin }) => {
                        self.hand.replace(coords, Some(tile));
                        picked.map(|tile| HeldTile { tile, origin })
                    }
                    None => picked.map(|tile| HeldTile {
                        tile,
                        origin: coords,
                    }),
                };
                self.refresh_playability();
                None
            }
            CursorTarget::Board(coords) => {
                let point = coords.to_point();
                if !self
                    .held
                    .as_ref()
                    .is_some_and(|held| held.tile.can_play(&self.board, point))
                {
                    return None;
                }
                let HeldTile { tile, origin } = self.held.take()?;
                Some(self.resolve_play(point, tile, origin, now))
            }
        }
    }

    /// Ends the session, producing the entry for a high-score list.
    pub fn finish(mut self, name: impl Into<String>) -> ScoreRecord {
        self.return_held_tile();
        let record = ScoreRecord {
            name: name.into(),
            level: self.level,
            score: self.score,
        };
        log::debug!("Session finished: {:?}", record);
        record
    }
}
