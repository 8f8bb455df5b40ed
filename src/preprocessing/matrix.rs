//! Transformer output storage: dense `ndarray` matrices and CSR sparse matrices.
//!
//! One-hot encoding produces mostly zeros, so encoders may emit a
//! [`CsrMatrix`]. The column router concatenates heterogeneous blocks with
//! [`Matrix::hstack`].

use crate::error::PreprocessingError;
use ndarray::{s, Array2};

/// Compressed Sparse Row matrix.
///
/// `indptr[r]..indptr[r + 1]` is the range of `indices`/`data` holding the
/// explicitly stored entries of row `r`, with column indices ascending.
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix {
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    /// Create from raw CSR arrays, validating their structure.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> Result<Self, PreprocessingError> {
        if indptr.len() != n_rows + 1 {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("indptr of length {}", n_rows + 1),
                got: format!("length {}", indptr.len()),
            });
        }
        if indices.len() != data.len() || indptr.last().copied() != Some(indices.len()) {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} stored entries", indptr.last().copied().unwrap_or(0)),
                got: format!("{} indices and {} values", indices.len(), data.len()),
            });
        }
        for r in 0..n_rows {
            let (start, end) = (indptr[r], indptr[r + 1]);
            if start > end {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "indptr decreases at row {}",
                    r
                )));
            }
            let row = &indices[start..end];
            if row.iter().any(|&c| c >= n_cols) || row.windows(2).any(|w| w[0] >= w[1]) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "column indices of row {} must be ascending and below {}",
                    r, n_cols
                )));
            }
        }
        Ok(Self {
            n_rows,
            n_cols,
            indptr,
            indices,
            data,
        })
    }

    /// An all-zero matrix with no stored entries.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            indptr: vec![0; n_rows + 1],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Build from per-row `(column, value)` entries sorted by column.
    pub(crate) fn from_row_entries(n_cols: usize, rows: Vec<Vec<(usize, f64)>>) -> Self {
        let n_rows = rows.len();
        let mut indptr = Vec::with_capacity(n_rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for row in rows {
            for (col, value) in row {
                indices.push(col);
                data.push(value);
            }
            indptr.push(indices.len());
        }
        Self {
            n_rows,
            n_cols,
            indptr,
            indices,
            data,
        }
    }

    /// Store every non-zero entry of a dense matrix.
    pub fn from_dense(dense: &Array2<f64>) -> Self {
        let rows = dense
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(_, &v)| v != 0.0)
                    .map(|(c, &v)| (c, v))
                    .collect()
            })
            .collect();
        Self::from_row_entries(dense.ncols(), rows)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of explicitly stored entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Fraction of cells that are stored.
    pub fn density(&self) -> f64 {
        let cells = self.n_rows * self.n_cols;
        if cells == 0 {
            0.0
        } else {
            self.nnz() as f64 / cells as f64
        }
    }

    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Stored column indices and values of one row.
    pub fn row(&self, row: usize) -> (&[usize], &[f64]) {
        let (start, end) = (self.indptr[row], self.indptr[row + 1]);
        (&self.indices[start..end], &self.data[start..end])
    }

    /// Value at `(row, col)`; zero when not stored.
    ///
    /// # Panics
    /// If `row` or `col` is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.n_rows && col < self.n_cols,
            "index ({}, {}) out of bounds for shape ({}, {})",
            row,
            col,
            self.n_rows,
            self.n_cols
        );
        let (cols, values) = self.row(row);
        cols.binary_search(&col).map(|i| values[i]).unwrap_or(0.0)
    }

    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.n_rows, self.n_cols));
        for r in 0..self.n_rows {
            let (cols, values) = self.row(r);
            for (&c, &v) in cols.iter().zip(values) {
                dense[[r, c]] = v;
            }
        }
        dense
    }

    /// Concatenate matrices with equal row counts side by side.
    pub fn hstack(blocks: &[CsrMatrix]) -> Result<Self, PreprocessingError> {
        let n_rows = match blocks.first() {
            Some(first) => first.n_rows,
            None => {
                return Err(PreprocessingError::InvalidParameter(
                    "Cannot concatenate empty slice of matrices".to_string(),
                ))
            }
        };
        if let Some(bad) = blocks.iter().find(|b| b.n_rows != n_rows) {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} rows", n_rows),
                got: format!("{} rows", bad.n_rows),
            });
        }

        let rows = (0..n_rows)
            .map(|r| {
                let mut offset = 0;
                let mut entries = Vec::new();
                for block in blocks {
                    let (cols, values) = block.row(r);
                    entries.extend(cols.iter().zip(values).map(|(&c, &v)| (c + offset, v)));
                    offset += block.n_cols;
                }
                entries
            })
            .collect();
        let n_cols = blocks.iter().map(|b| b.n_cols).sum();
        Ok(Self::from_row_entries(n_cols, rows))
    }
}

/// Dense or sparse transformer output.
#[derive(Clone, Debug, PartialEq)]
pub enum Matrix {
    Dense(Array2<f64>),
    Sparse(CsrMatrix),
}

impl Matrix {
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Matrix::Dense(m) => m.dim(),
            Matrix::Sparse(m) => m.shape(),
        }
    }

    pub fn nrows(&self) -> usize {
        self.shape().0
    }

    pub fn ncols(&self) -> usize {
        self.shape().1
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Matrix::Sparse(_))
    }

    /// Stored cells: every cell for dense output, stored entries for sparse.
    pub fn stored_len(&self) -> usize {
        match self {
            Matrix::Dense(m) => m.len(),
            Matrix::Sparse(m) => m.nnz(),
        }
    }

    /// Value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        match self {
            Matrix::Dense(m) => m[[row, col]],
            Matrix::Sparse(m) => m.get(row, col),
        }
    }

    pub fn to_dense(&self) -> Array2<f64> {
        match self {
            Matrix::Dense(m) => m.clone(),
            Matrix::Sparse(m) => m.to_dense(),
        }
    }

    pub fn into_dense(self) -> Array2<f64> {
        match self {
            Matrix::Dense(m) => m,
            Matrix::Sparse(m) => m.to_dense(),
        }
    }

    pub fn into_sparse(self) -> CsrMatrix {
        match self {
            Matrix::Dense(m) => CsrMatrix::from_dense(&m),
            Matrix::Sparse(m) => m,
        }
    }

    /// Concatenate blocks side by side into one dense or sparse matrix.
    ///
    /// `n_rows` fixes the row count, so an empty block list still yields a
    /// `(n_rows, 0)` matrix.
    pub fn hstack(
        n_rows: usize,
        blocks: Vec<Matrix>,
        sparse_output: bool,
    ) -> Result<Matrix, PreprocessingError> {
        if let Some(bad) = blocks.iter().find(|b| b.nrows() != n_rows) {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} rows", n_rows),
                got: format!("{} rows", bad.nrows()),
            });
        }

        if sparse_output {
            if blocks.is_empty() {
                return Ok(Matrix::Sparse(CsrMatrix::zeros(n_rows, 0)));
            }
            let sparse: Vec<CsrMatrix> = blocks.into_iter().map(Matrix::into_sparse).collect();
            return CsrMatrix::hstack(&sparse).map(Matrix::Sparse);
        }

        let n_cols = blocks.iter().map(Matrix::ncols).sum();
        let mut out = Array2::zeros((n_rows, n_cols));
        let mut offset = 0;
        for block in blocks {
            let width = block.ncols();
            out.slice_mut(s![.., offset..offset + width])
                .assign(&block.into_dense());
            offset += width;
        }
        Ok(Matrix::Dense(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_csr_from_dense_roundtrip() {
        let dense = array![[1.0, 0.0, 2.0], [0.0, 0.0, 0.0], [0.0, 3.0, 0.0]];
        let csr = CsrMatrix::from_dense(&dense);

        assert_eq!(csr.shape(), (3, 3));
        assert_eq!(csr.nnz(), 3);
        assert_eq!(csr.indptr(), &[0, 2, 2, 3]);
        assert_eq!(csr.indices(), &[0, 2, 1]);
        assert_eq!(csr.to_dense(), dense);
    }

    #[test]
    fn test_csr_get() {
        let csr = CsrMatrix::from_dense(&array![[0.0, 4.0], [5.0, 0.0]]);
        assert_eq!(csr.get(0, 1), 4.0);
        assert_eq!(csr.get(0, 0), 0.0);
        assert_eq!(csr.get(1, 0), 5.0);
    }

    #[test]
    fn test_csr_density() {
        let csr = CsrMatrix::from_dense(&array![[1.0, 0.0], [0.0, 0.0]]);
        assert!((csr.density() - 0.25).abs() < 1e-12);
        assert_eq!(CsrMatrix::zeros(0, 0).density(), 0.0);
    }

    #[test]
    fn test_csr_new_validates() {
        assert!(CsrMatrix::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0, 1.0]).is_ok());
        assert!(CsrMatrix::new(2, 2, vec![0, 1], vec![0], vec![1.0]).is_err());
        assert!(CsrMatrix::new(1, 2, vec![0, 1], vec![5], vec![1.0]).is_err());
        assert!(CsrMatrix::new(1, 3, vec![0, 2], vec![2, 1], vec![1.0, 1.0]).is_err());
        assert!(CsrMatrix::new(1, 2, vec![0, 2], vec![0, 1], vec![1.0]).is_err());
    }

    #[test]
    fn test_csr_hstack() {
        let a = CsrMatrix::from_dense(&array![[1.0, 0.0], [0.0, 2.0]]);
        let b = CsrMatrix::from_dense(&array![[0.0], [3.0]]);
        let stacked = CsrMatrix::hstack(&[a, b]).unwrap();

        assert_eq!(stacked.shape(), (2, 3));
        assert_eq!(stacked.to_dense(), array![[1.0, 0.0, 0.0], [0.0, 2.0, 3.0]]);
    }

    #[test]
    fn test_csr_hstack_row_mismatch() {
        let a = CsrMatrix::zeros(2, 1);
        let b = CsrMatrix::zeros(3, 1);
        assert!(matches!(
            CsrMatrix::hstack(&[a, b]),
            Err(PreprocessingError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_matrix_hstack_dense() {
        let blocks = vec![
            Matrix::Dense(array![[1.0], [2.0]]),
            Matrix::Sparse(CsrMatrix::from_dense(&array![[0.0, 1.0], [1.0, 0.0]])),
        ];
        let out = Matrix::hstack(2, blocks, false).unwrap();

        assert!(!out.is_sparse());
        assert_eq!(out.to_dense(), array![[1.0, 0.0, 1.0], [2.0, 1.0, 0.0]]);
    }

    #[test]
    fn test_matrix_hstack_sparse() {
        let blocks = vec![
            Matrix::Dense(array![[1.0], [0.0]]),
            Matrix::Sparse(CsrMatrix::from_dense(&array![[0.0, 1.0], [1.0, 0.0]])),
        ];
        let out = Matrix::hstack(2, blocks, true).unwrap();

        assert!(out.is_sparse());
        assert_eq!(out.stored_len(), 3);
        assert_eq!(out.get(1, 1), 1.0);
    }

    #[test]
    fn test_matrix_hstack_empty() {
        let out = Matrix::hstack(4, Vec::new(), false).unwrap();
        assert_eq!(out.shape(), (4, 0));
    }
}
