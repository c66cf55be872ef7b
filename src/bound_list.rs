//! Row windows and the pages fetched through them.

use serde::Serialize;

/// `offset`/`limit` window of a bounded fetch. Negative inputs clamp to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowBounds {
    offset: u64,
    limit: u64,
}

impl RowBounds {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset: clamp(offset),
            limit: clamp(limit),
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

/// One page of rows with the window it was fetched through and the total
/// number of rows matching the unbounded query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundList<T> {
    rows: Vec<T>,
    offset: u64,
    limit: u64,
    total: u64,
}

impl<T> BoundList<T> {
    pub fn new(rows: Vec<T>, bounds: RowBounds, total: i64) -> Self {
        Self {
            rows,
            offset: bounds.offset(),
            limit: bounds.limit(),
            total: clamp(total),
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// True when rows exist past the end of this page.
    pub fn has_more(&self) -> bool {
        self.offset + (self.rows.len() as u64) < self.total
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> BoundList<U> {
        BoundList {
            rows: self.rows.into_iter().map(f).collect(),
            offset: self.offset,
            limit: self.limit,
            total: self.total,
        }
    }
}

impl<T> IntoIterator for BoundList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

fn clamp(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}
