//! Pixel adjacency used when grouping cells into regions

/// Which neighbors of a cell count as adjacent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Neighborhood {
    /// Edge-sharing neighbors only (4-connectivity)
    #[default]
    Rook,
    /// Edge- and corner-sharing neighbors (8-connectivity)
    Queen,
}

const ROOK: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
const QUEEN: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl Neighborhood {
    /// Relative (row, col) offsets of the neighbors, excluding the center
    pub fn offsets(&self) -> &'static [(isize, isize)] {
        match self {
            Neighborhood::Rook => &ROOK,
            Neighborhood::Queen => &QUEEN,
        }
    }

    /// In-bounds neighbors of `(row, col)` in a `rows x cols` raster
    pub fn neighbors(
        &self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.offsets().iter().filter_map(move |&(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;
            (r < rows && c < cols).then_some((r, c))
        })
    }
}
