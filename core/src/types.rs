use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board height, width, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Grid address, rows counted from the top and columns from the left.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: Coord,
    pub col: Coord,
}

impl Coordinate {
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    /// Whether `self` lies inside a `(height, width)` grid.
    pub const fn is_within(self, (height, width): (Coord, Coord)) -> bool {
        self.row < height && self.col < width
    }

    /// Row-major position of `self` in a grid `width` columns wide.
    pub const fn to_linear(self, width: Coord) -> usize {
        self.row as usize * width as usize + self.col as usize
    }

    pub const fn from_linear(index: usize, width: Coord) -> Self {
        let width = width as usize;
        Self {
            row: (index / width) as Coord,
            col: (index % width) as Coord,
        }
    }

    pub fn neighbors(self, bounds: (Coord, Coord)) -> NeighborIter {
        NeighborIter::new(self, bounds)
    }
}

impl From<(Coord, Coord)> for Coordinate {
    fn from((row, col): (Coord, Coord)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coordinate {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.row.into(), self.col.into()]
    }
}

impl ToNdIndex for (Coord, Coord) {
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

pub trait NeighborIterExt {
    fn iter_neighbors(&self, center: Coordinate) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, center: Coordinate) -> NeighborIter {
        let (rows, cols) = self.dim();
        // grids are built from a validated config, both axes fit in a Coord
        let bounds = (rows as Coord, cols as Coord);
        NeighborIter::new(center, bounds)
    }
}

/// Scan order of the eight neighbours as `(Δrow, Δcol)`, row by row.
const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `center`, returning a value only when it remains in bounds.
fn apply_delta(center: Coordinate, delta: (i8, i8), bounds: (Coord, Coord)) -> Option<Coordinate> {
    let (d_row, d_col) = delta;
    let (height, width) = bounds;

    let row = center.row.checked_add_signed(d_row)?;
    if row >= height {
        return None;
    }

    let col = center.col.checked_add_signed(d_col)?;
    if col >= width {
        return None;
    }

    Some(Coordinate { row, col })
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coordinate,
    bounds: (Coord, Coord),
    index: u8,
}

impl NeighborIter {
    fn new(center: Coordinate, bounds: (Coord, Coord)) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
