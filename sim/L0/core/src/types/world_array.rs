//! Per-world tables with broadcast indexing.
//!
//! Every per-geometry, per-world table in the model is declared with either
//! exactly one row (shared by all worlds) or exactly `nworld` rows. Lookups
//! resolve `row = worldid % rows`, so callers never branch on which of the
//! two layouts a table uses.

use std::ops::{Index, IndexMut};

use crate::error::{CollisionError, CollisionResult};

/// Row-major `(rows × cols)` table indexed by `(worldid, column)`.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldArray<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Default for WorldArray<T> {
    fn default() -> Self {
        Self {
            rows: 1,
            cols: 0,
            data: Vec::new(),
        }
    }
}

impl<T: Clone> WorldArray<T> {
    /// Single row shared by every world.
    #[must_use]
    pub fn broadcast(values: Vec<T>) -> Self {
        Self {
            rows: 1,
            cols: values.len(),
            data: values,
        }
    }

    /// `nworld` rows, each initialised to `values`.
    #[must_use]
    pub fn per_world(nworld: usize, values: &[T]) -> Self {
        let rows = nworld.max(1);
        let mut data = Vec::with_capacity(rows * values.len());
        for _ in 0..rows {
            data.extend_from_slice(values);
        }
        Self {
            rows,
            cols: values.len(),
            data,
        }
    }

    /// `rows × cols` table with every entry set to `value`.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        let rows = rows.max(1);
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Append one column, filling it with `value` in every row.
    pub fn push_column(&mut self, value: T) {
        let mut data = Vec::with_capacity(self.rows * (self.cols + 1));
        for r in 0..self.rows {
            data.extend_from_slice(&self.data[r * self.cols..(r + 1) * self.cols]);
            data.push(value.clone());
        }
        self.data = data;
        self.cols += 1;
    }

    /// Expand a broadcast table into `nworld` identical rows.
    ///
    /// Used to introduce per-world variation after construction. No-op when
    /// the table already has more than one row.
    pub fn expand(&mut self, nworld: usize) {
        if self.rows == 1 && nworld > 1 {
            *self = Self::per_world(nworld, &self.data);
        }
    }
}

impl<T> WorldArray<T> {
    /// Build from explicit row-major storage.
    ///
    /// # Errors
    ///
    /// Returns [`CollisionError::ColumnCountMismatch`] if `data.len()` is not
    /// `rows * cols`, or if `rows` is zero.
    pub fn from_rows(
        field: &'static str,
        rows: usize,
        cols: usize,
        data: Vec<T>,
    ) -> CollisionResult<Self> {
        if rows == 0 || data.len() != rows * cols {
            return Err(CollisionError::ColumnCountMismatch {
                field,
                cols: data.len().checked_div(rows).unwrap_or(0),
                expected: cols,
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Declared row count (1 or `nworld`).
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count (entity count for this table).
    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether a single row is shared by all worlds.
    #[inline]
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        self.rows == 1
    }

    /// Row that world `worldid` reads.
    #[inline]
    #[must_use]
    pub fn row_index(&self, worldid: usize) -> usize {
        worldid % self.rows
    }

    /// Entry for `(worldid, col)` under broadcast indexing.
    #[inline]
    #[must_use]
    pub fn get(&self, worldid: usize, col: usize) -> &T {
        &self.data[self.row_index(worldid) * self.cols + col]
    }

    /// Mutable entry for `(worldid, col)` under broadcast indexing.
    ///
    /// On a broadcast table this writes the shared row.
    #[inline]
    pub fn get_mut(&mut self, worldid: usize, col: usize) -> &mut T {
        let idx = self.row_index(worldid) * self.cols + col;
        &mut self.data[idx]
    }

    /// Overwrite `(worldid, col)`.
    #[inline]
    pub fn set(&mut self, worldid: usize, col: usize, value: T) {
        *self.get_mut(worldid, col) = value;
    }

    /// Full row for `worldid`.
    #[inline]
    #[must_use]
    pub fn row(&self, worldid: usize) -> &[T] {
        let r = self.row_index(worldid);
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Mutable row for `worldid`.
    #[inline]
    pub fn row_mut(&mut self, worldid: usize) -> &mut [T] {
        let r = self.row_index(worldid);
        let cols = self.cols;
        &mut self.data[r * cols..(r + 1) * cols]
    }

    /// Row-major storage.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major storage (rows are contiguous chunks of `cols()`).
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Check the 1-or-`nworld` row rule and the expected column count.
    ///
    /// # Errors
    ///
    /// Returns [`CollisionError::RowCountMismatch`] or
    /// [`CollisionError::ColumnCountMismatch`].
    pub fn check_shape(
        &self,
        field: &'static str,
        nworld: usize,
        cols: usize,
    ) -> CollisionResult<()> {
        if self.rows != 1 && self.rows != nworld {
            return Err(CollisionError::RowCountMismatch {
                field,
                rows: self.rows,
                nworld,
            });
        }
        if self.cols != cols {
            return Err(CollisionError::ColumnCountMismatch {
                field,
                cols: self.cols,
                expected: cols,
            });
        }
        Ok(())
    }
}

impl<T> Index<(usize, usize)> for WorldArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, (worldid, col): (usize, usize)) -> &T {
        self.get(worldid, col)
    }
}

impl<T> IndexMut<(usize, usize)> for WorldArray<T> {
    #[inline]
    fn index_mut(&mut self, (worldid, col): (usize, usize)) -> &mut T {
        self.get_mut(worldid, col)
    }
}
