use super::types::Element;

/// Square matrix indexed by an ordered element list on both axes.
///
/// Cells are `Option<f64>`: `None` marks an undefined cell (no
/// contributing observations), which is distinct from a computed `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementMatrix {
    elements: Vec<Element>,
    cells: Vec<Option<f64>>,
}

impl ElementMatrix {
    /// Creates a matrix over `elements` with every cell undefined.
    ///
    /// `elements` is expected to be sorted and free of duplicates; the
    /// aggregator always builds it from an ordered set.
    pub fn undefined(elements: Vec<Element>) -> Self {
        let n = elements.len();
        Self {
            elements,
            cells: vec![None; n * n],
        }
    }

    /// Builds a matrix from nested rows.
    ///
    /// Returns `None` if `rows` is not `elements.len()` square.
    pub fn from_rows(elements: Vec<Element>, rows: Vec<Vec<Option<f64>>>) -> Option<Self> {
        let n = elements.len();
        if rows.len() != n || rows.iter().any(|row| row.len() != n) {
            return None;
        }
        Some(Self {
            elements,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn index_of(&self, element: Element) -> Option<usize> {
        self.elements.binary_search(&element).ok()
    }

    /// Returns the cell at (`row`, `col`) by index, `None` when undefined
    /// or out of range.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        let n = self.len();
        if row >= n || col >= n {
            return None;
        }
        self.cells[row * n + col]
    }

    /// Returns the cell for the ordered element pair, `None` when undefined
    /// or when either element is outside the index space.
    pub fn get(&self, row: Element, col: Element) -> Option<f64> {
        self.cell(self.index_of(row)?, self.index_of(col)?)
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: Option<f64>) {
        let n = self.len();
        self.cells[row * n + col] = value;
    }

    pub fn row(&self, row: usize) -> &[Option<f64>] {
        let n = self.len();
        &self.cells[row * n..(row + 1) * n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<f64>]> {
        // `chunks(0)` panics, and an empty matrix has no rows anyway.
        self.cells.chunks(self.len().max(1))
    }

    /// Returns `true` if at least one cell of the row is defined.
    pub fn row_is_defined(&self, row: usize) -> bool {
        self.row(row).iter().any(Option::is_some)
    }

    /// Row-major mask of defined cells.
    pub fn defined_mask(&self) -> Vec<bool> {
        self.cells.iter().map(Option::is_some).collect()
    }

    pub fn defined_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Sum of the defined cells of a row, `None` if the row has none.
    pub fn row_sum(&self, row: usize) -> Option<f64> {
        let mut defined = self.row(row).iter().flatten().peekable();
        defined.peek()?;
        Some(defined.sum())
    }

    pub fn to_rows(&self) -> Vec<Vec<Option<f64>>> {
        self.rows().map(<[_]>::to_vec).collect()
    }

    /// Returns a copy where every row is divided by the sum of its defined
    /// cells, so defined cells of each row sum to one.
    ///
    /// Rows without defined cells, or whose defined cells sum to zero,
    /// become entirely undefined.
    pub fn row_normalized(&self) -> Self {
        let n = self.len();
        let mut out = Self::undefined(self.elements.clone());
        for i in 0..n {
            let Some(total) = self.row_sum(i).filter(|t| *t != 0.0) else {
                continue;
            };
            for j in 0..n {
                out.set(i, j, self.cell(i, j).map(|v| v / total));
            }
        }
        out
    }
}
