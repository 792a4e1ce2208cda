use crate::cells::Cartesian2DCoordinate;
use crate::units::{Height, Width};

/// Row-major walk over every coordinate of a `width * height` grid.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    width: usize,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub(crate) fn new(width: Width, height: Height) -> CellIter {
        CellIter {
            width: width.0,
            current_cell_number: 0,
            cells_count: width.0 * height.0,
        }
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let x = self.current_cell_number % self.width;
            let y = self.current_cell_number / self.width;
            self.current_cell_number += 1;
            Some(Cartesian2DCoordinate::new(x as u32, y as u32))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}

#[derive(Debug, Copy, Clone)]
enum BatchIterType {
    Row,
    Column,
}

/// Yields whole rows (top to bottom) or whole columns (left to right).
#[derive(Debug, Copy, Clone)]
pub struct BatchIter {
    iter_type: BatchIterType,
    current_index: usize,
    width: usize,
    height: usize,
}

impl BatchIter {
    pub(crate) fn rows(width: Width, height: Height) -> BatchIter {
        BatchIter {
            iter_type: BatchIterType::Row,
            current_index: 0,
            width: width.0,
            height: height.0,
        }
    }

    pub(crate) fn columns(width: Width, height: Height) -> BatchIter {
        BatchIter {
            iter_type: BatchIterType::Column,
            current_index: 0,
            width: width.0,
            height: height.0,
        }
    }

    fn batches_count(&self) -> usize {
        match self.iter_type {
            BatchIterType::Row => self.height,
            BatchIterType::Column => self.width,
        }
    }
}

impl ExactSizeIterator for BatchIter {} // default impl using size_hint()
impl Iterator for BatchIter {
    type Item = Vec<Cartesian2DCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.batches_count() {
            return None;
        }

        let index = self.current_index as u32;
        let coords = match self.iter_type {
            BatchIterType::Row => {
                (0..self.width)
                    .map(|x| Cartesian2DCoordinate::new(x as u32, index))
                    .collect()
            }
            BatchIterType::Column => {
                (0..self.height)
                    .map(|y| Cartesian2DCoordinate::new(index, y as u32))
                    .collect()
            }
        };
        self.current_index += 1;
        Some(coords)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.batches_count() - self.current_index;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_iter_is_row_major() {
        let coords = CellIter::new(Width(2), Height(2)).collect::<Vec<_>>();
        assert_eq!(coords,
                   &[Cartesian2DCoordinate::new(0, 0),
                     Cartesian2DCoordinate::new(1, 0),
                     Cartesian2DCoordinate::new(0, 1),
                     Cartesian2DCoordinate::new(1, 1)]);
    }

    #[test]
    fn cell_iter_exact_size() {
        let mut iter = CellIter::new(Width(3), Height(2));
        assert_eq!(iter.len(), 6);
        let _ = iter.next();
        assert_eq!(iter.len(), 5);
    }

    #[test]
    fn row_iter() {
        let rows = BatchIter::rows(Width(3), Height(2)).collect::<Vec<_>>();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1],
                   &[Cartesian2DCoordinate::new(0, 1),
                     Cartesian2DCoordinate::new(1, 1),
                     Cartesian2DCoordinate::new(2, 1)]);
    }

    #[test]
    fn column_iter() {
        let columns = BatchIter::columns(Width(3), Height(2)).collect::<Vec<_>>();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[2],
                   &[Cartesian2DCoordinate::new(2, 0), Cartesian2DCoordinate::new(2, 1)]);
    }
}
