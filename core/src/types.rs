/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Conversion into an `ndarray` index.
pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        let (row, col) = self;
        [usize::from(row), usize::from(col)]
    }
}

/// Cell count of a `rows × cols` board, saturating at `CellCount::MAX`.
pub const fn mult(rows: Coord, cols: Coord) -> CellCount {
    (rows as CellCount).saturating_mul(cols as CellCount)
}

/// Row and column offsets of the eight surrounding cells, row-major.
const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Iterates the up to 8 in-bounds neighbors of a cell, in row-major order.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    size: Coord2,
    offsets: core::slice::Iter<'static, (i8, i8)>,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord2, size: Coord2) -> Self {
        Self {
            center,
            size,
            offsets: NEIGHBOR_OFFSETS.iter(),
        }
    }

    fn offset(&self, (dr, dc): (i8, i8)) -> Option<Coord2> {
        let (row, col) = self.center;
        let (rows, cols) = self.size;
        let row = row.checked_add_signed(dr).filter(|&row| row < rows)?;
        let col = col.checked_add_signed(dc).filter(|&col| col < cols)?;
        Some((row, col))
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Coord2> {
        while let Some(&delta) = self.offsets.next() {
            if let Some(pos) = self.offset(delta) {
                return Some(pos);
            }
        }
        None
    }
}
