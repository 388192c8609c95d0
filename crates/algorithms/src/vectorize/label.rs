//! Connected-component labeling of a classified band

use gridcover_core::raster::Neighborhood;
use gridcover_core::Raster;
use std::collections::VecDeque;

/// A connected group of equal-valued pixels
#[derive(Debug, Clone)]
pub(crate) struct Region {
    /// Pixel value shared by every member
    pub class: u8,
    /// Member pixels as (row, col)
    pub pixels: Vec<(usize, usize)>,
}

/// Per-pixel region ids (`0` = background) and the regions they refer to.
///
/// Region `k` in `regions` is labeled `k + 1` in `labels`.
#[derive(Debug)]
pub(crate) struct Labeling {
    pub labels: Vec<u32>,
    pub regions: Vec<Region>,
    pub cols: usize,
}

impl Labeling {
    /// Label at `(row, col)`, `0` outside the raster
    #[inline]
    pub fn label_at(&self, row: isize, col: isize) -> u32 {
        let rows = (self.labels.len() / self.cols.max(1)) as isize;
        if row < 0 || col < 0 || row >= rows || col >= self.cols as isize {
            return 0;
        }
        self.labels[row as usize * self.cols + col as usize]
    }
}

/// Group pixels into regions of equal value using breadth-first flood fill.
///
/// Zero and nodata pixels are background. Regions are numbered in row-major
/// order of their first pixel.
pub(crate) fn label_regions(band: &Raster<u8>, connectivity: Neighborhood) -> Labeling {
    let (rows, cols) = band.shape();
    let data = band.data();
    let is_foreground = |v: u8| v != 0 && !band.is_nodata(v);

    let mut labels = vec![0u32; rows * cols];
    let mut regions = Vec::new();
    let mut queue = VecDeque::new();

    for row in 0..rows {
        for col in 0..cols {
            let class = data[(row, col)];
            if !is_foreground(class) || labels[row * cols + col] != 0 {
                continue;
            }

            let id = regions.len() as u32 + 1;
            let mut pixels = Vec::new();
            labels[row * cols + col] = id;
            queue.push_back((row, col));

            while let Some((r, c)) = queue.pop_front() {
                pixels.push((r, c));
                for (nr, nc) in connectivity.neighbors(r, c, rows, cols) {
                    let slot = &mut labels[nr * cols + nc];
                    if *slot == 0 && data[(nr, nc)] == class {
                        *slot = id;
                        queue.push_back((nr, nc));
                    }
                }
            }

            regions.push(Region { class, pixels });
        }
    }

    Labeling { labels, regions, cols }
}
