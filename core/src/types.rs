/// Single grid axis, used for row/column counts and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Grid position or size as `(row, col)`.
pub type Coord2 = (Coord, Coord);

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

/// Position of a row-major flat index on a grid of `size`.
pub(crate) const fn from_flat_index(index: usize, size: Coord2) -> Coord2 {
    let cols = size.1 as usize;
    ((index / cols) as Coord, (index % cols) as Coord)
}

/// Cells at Chebyshev distance 1 from `center`, clipped to `bounds`, in row-major order.
///
/// Walks the 3x3 window around `center` and skips the center itself.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    row_end: Coord,
    col_start: Coord,
    col_end: Coord,
    cursor: Option<Coord2>,
}

impl NeighborIter {
    pub fn new(center: Coord2, (rows, cols): Coord2) -> Self {
        let (row, col) = center;
        let row_start = row.saturating_sub(1);
        let col_start = col.saturating_sub(1);
        let row_end = row.saturating_add(1).min(rows.saturating_sub(1));
        let col_end = col.saturating_add(1).min(cols.saturating_sub(1));

        let empty = rows == 0 || cols == 0 || row_start > row_end || col_start > col_end;
        Self {
            center,
            row_end,
            col_start,
            col_end,
            cursor: (!empty).then_some((row_start, col_start)),
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = self.cursor?;
            self.cursor = if current.1 < self.col_end {
                Some((current.0, current.1 + 1))
            } else if current.0 < self.row_end {
                Some((current.0 + 1, self.col_start))
            } else {
                None
            };

            if current != self.center {
                return Some(current);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn corner_has_three_neighbors() {
        let neighbors: Vec<_> = NeighborIter::new((0, 0), (3, 3)).collect();
        assert_eq!(neighbors, [(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn interior_has_eight_neighbors() {
        assert_eq!(NeighborIter::new((1, 1), (3, 3)).count(), 8);
    }

    #[test]
    fn single_row_edge_is_clipped() {
        let neighbors: Vec<_> = NeighborIter::new((0, 4), (1, 5)).collect();
        assert_eq!(neighbors, [(0, 3)]);
    }

    #[test]
    fn far_out_of_bounds_center_has_no_neighbors() {
        assert_eq!(NeighborIter::new((9, 9), (3, 3)).count(), 0);
        assert_eq!(NeighborIter::new((0, 0), (0, 4)).count(), 0);
    }

    #[test]
    fn flat_index_is_row_major() {
        assert_eq!(from_flat_index(13, (4, 5)), (2, 3));
        assert_eq!(from_flat_index(4, (4, 5)), (0, 4));
    }
}
