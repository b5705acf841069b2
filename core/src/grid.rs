use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Half-extent of a cell in grid-local units.
pub const SPAN: f32 = 0.5;

/// Placement of a grid in the caller's world space.
///
/// Cell `(x, y)` is centered at `origin + (x, y) * scale`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub origin: (f32, f32),
    pub scale: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            origin: (0.0, 0.0),
            scale: 1.0,
        }
    }
}

/// Rectangular cell storage shared by the board and the hand.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<C> {
    cells: Array2<C>,
    layout: GridLayout,
}

impl<C> Grid<C> {
    pub fn from_shape_fn(size: Coord2, mut f: impl FnMut(Coord2) -> C) -> Self {
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(x, y)| {
            // indices come from a Coord2-sized shape
            f((x as Coord, y as Coord))
        });
        Self {
            cells,
            layout: GridLayout::default(),
        }
    }

    pub fn size(&self) -> Coord2 {
        let (x, y) = self.cells.dim();
        (x as Coord, y as Coord)
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (x, y) = self.size();
        mult(x, y)
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let (size_x, size_y) = self.size();
        coords.0 < size_x && coords.1 < size_y
    }

    pub fn get(&self, coords: Coord2) -> Option<&C> {
        self.cells.get(coords.to_nd_index())
    }

    pub fn get_mut(&mut self, coords: Coord2) -> Option<&mut C> {
        self.cells.get_mut(coords.to_nd_index())
    }

    /// Iterates cells with their coordinates in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &C)> {
        iter_coords(self.size()).map(move |coords| (coords, &self.cells[coords.to_nd_index()]))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut C> {
        self.cells.iter_mut()
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: GridLayout) {
        self.layout = layout;
    }

    /// World-space center of the cell at `coords`.
    pub fn world_position(&self, (x, y): Coord2) -> (f32, f32) {
        let GridLayout { origin, scale } = self.layout;
        (
            f32::from(x) * scale + origin.0,
            f32::from(y) * scale + origin.1,
        )
    }

    /// Finds the cell whose box contains the world-space point.
    pub fn cell_at_point(&self, (px, py): (f32, f32)) -> Option<Coord2> {
        let scale = self.layout.scale;
        if scale <= 0.0 {
            return None;
        }
        iter_coords(self.size()).find(|&coords| {
            let (wx, wy) = self.world_position(coords);
            let local_x = (px - wx) / scale;
            let local_y = (py - wy) / scale;
            (-SPAN..=SPAN).contains(&local_x) && (-SPAN..=SPAN).contains(&local_y)
        })
    }

    /// Rebuilds the cell array, the new cell at `(i, j)` taken from `source(i, j)`.
    pub(crate) fn permute(&mut self, size: Coord2, source: impl Fn(Coord2) -> Coord2)
    where
        C: Clone,
    {
        let old = &self.cells;
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(x, y)| {
            old[source((x as Coord, y as Coord)).to_nd_index()].clone()
        });
        self.cells = cells;
    }
}

impl<C> core::ops::Index<Coord2> for Grid<C> {
    type Output = C;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl<C> core::ops::IndexMut<Coord2> for Grid<C> {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
