//! Row-major scalar grid shared by every pipeline stage.

use serde::{Deserialize, Serialize};

/// Grid coordinate. `row` indexes Y, `col` indexes X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    #[inline]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Cardinal neighbors in the order up, down, left, right.
    ///
    /// Neighbors that would underflow are omitted; the caller bounds-checks
    /// the high side.
    pub fn cardinal(self) -> impl Iterator<Item = Coord> {
        let Coord { row, col } = self;
        [
            row.checked_sub(1).map(|r| Coord::new(r, col)),
            Some(Coord::new(row + 1, col)),
            col.checked_sub(1).map(|c| Coord::new(row, c)),
            Some(Coord::new(row, col + 1)),
        ]
        .into_iter()
        .flatten()
    }
}

/// H x W grid of `f32`, stored as a flat array indexed `row * width + col`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Grid width (columns).
    pub width: usize,
    /// Grid height (rows).
    pub height: usize,
    /// Cell values, row-major.
    pub data: Vec<f32>,
}

impl Field {
    /// All-zero field.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0f32; width * height],
        }
    }

    /// Wrap existing row-major data.
    ///
    /// # Panics
    /// If `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    /// Get total grid size (width * height).
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Convert (row, col) to flat index.
    #[inline]
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[self.idx(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        let idx = self.idx(row, col);
        self.data[idx] = value;
    }

    #[inline]
    pub fn at(&self, coord: Coord) -> f32 {
        self.get(coord.row, coord.col)
    }

    /// Borrow one row.
    pub fn row(&self, row: usize) -> &[f32] {
        &self.data[row * self.width..(row + 1) * self.width]
    }

    /// Check whether every cell is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }

    /// Coordinates of cells with value >= `threshold`, in row-major order.
    pub fn cells_at_least(&self, threshold: f32) -> Vec<Coord> {
        self.data
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v >= threshold)
            .map(|(i, _)| Coord::new(i / self.width, i % self.width))
            .collect()
    }

    /// Clamp every value into [0, 1].
    pub fn clamp_unit(&mut self) {
        for v in &mut self.data {
            *v = v.clamp(0.0, 1.0);
        }
    }
}

/// Summary statistics of a field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldStats {
    pub total: f32,
    pub max_value: f32,
    pub min_value: f32,
    pub mean_value: f32,
    /// Cells with value above 1e-6.
    pub active_cells: usize,
}

impl FieldStats {
    /// Compute statistics from a field.
    pub fn from_field(field: &Field) -> Self {
        if field.is_empty() {
            return Self::default();
        }

        let mut total = 0.0f32;
        let mut max_value = f32::NEG_INFINITY;
        let mut min_value = f32::INFINITY;
        let mut active_cells = 0usize;

        for &v in &field.data {
            total += v;
            max_value = max_value.max(v);
            min_value = min_value.min(v);
            if v > 1e-6 {
                active_cells += 1;
            }
        }

        Self {
            total,
            max_value,
            min_value,
            mean_value: total / field.len() as f32,
            active_cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_order() {
        let n: Vec<Coord> = Coord::new(3, 5).cardinal().collect();
        assert_eq!(
            n,
            vec![
                Coord::new(2, 5),
                Coord::new(4, 5),
                Coord::new(3, 4),
                Coord::new(3, 6)
            ]
        );
    }

    #[test]
    fn test_cardinal_at_origin() {
        let n: Vec<Coord> = Coord::new(0, 0).cardinal().collect();
        assert_eq!(n, vec![Coord::new(1, 0), Coord::new(0, 1)]);
    }

    #[test]
    fn test_row_major_indexing() {
        let mut field = Field::zeros(4, 3);
        field.set(2, 1, 0.5);

        assert_eq!(field.data[2 * 4 + 1], 0.5);
        assert_eq!(field.get(2, 1), 0.5);
        assert_eq!(field.row(2), &[0.0, 0.5, 0.0, 0.0]);
        assert_eq!(field.cells_at_least(0.5), vec![Coord::new(2, 1)]);
    }

    #[test]
    fn test_stats() {
        let field = Field::from_vec(2, 2, vec![0.0, 1.0, 0.5, 0.5]);
        let stats = FieldStats::from_field(&field);

        assert_eq!(stats.active_cells, 3);
        assert!((stats.total - 2.0).abs() < 1e-6);
        assert!((stats.mean_value - 0.5).abs() < 1e-6);
        assert_eq!(stats.min_value, 0.0);
        assert_eq!(stats.max_value, 1.0);
    }
}
