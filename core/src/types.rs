/// Single coordinate axis used for grid width, height, and positions.
pub type Coord = u8;

/// Count type used for cell totals.
pub type CellCount = u16;

/// Two-dimensional in-grid coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Unbounded board coordinates, normalized by wrapping before use.
pub type Point = (i32, i32);

/// Game level, starting at 1.
pub type Level = u32;

/// Accumulated player score.
pub type Score = u64;

/// Milliseconds on the caller's clock.
pub type Millis = u64;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Wraps an unbounded value into `0..size`.
pub fn wrap(value: i32, size: Coord) -> Coord {
    let wrapped = value.rem_euclid(i32::from(size.max(1)));
    // rem_euclid keeps the value in 0..size, which always fits
    wrapped as Coord
}

/// Wraps an unbounded point onto a `size` torus.
pub fn wrap_point((x, y): Point, (size_x, size_y): Coord2) -> Coord2 {
    (wrap(x, size_x), wrap(y, size_y))
}

pub trait ToPoint {
    fn to_point(self) -> Point;
}

impl ToPoint for Coord2 {
    fn to_point(self) -> Point {
        (self.0.into(), self.1.into())
    }
}

/// Orthogonal neighbor offsets, in flood-fill visiting order.
pub const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Iterates every coordinate of a `size` grid in column-major order.
pub fn iter_coords((size_x, size_y): Coord2) -> impl Iterator<Item = Coord2> {
    (0..size_x).flat_map(move |x| (0..size_y).map(move |y| (x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_handles_negative_and_large_values() {
        assert_eq!(wrap(-1, 4), 3);
        assert_eq!(wrap(4, 4), 0);
        assert_eq!(wrap(-9, 4), 3);
        assert_eq!(wrap(13, 4), 1);
    }

    #[test]
    fn iter_coords_is_column_major() {
        let coords: Vec<_> = iter_coords((2, 3)).collect();
        assert_eq!(coords, [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }
}
