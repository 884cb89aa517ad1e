//! Dense square matrices of any order.
//!
//! Determinants go through Laplace (cofactor) expansion along the first row,
//! with closed forms for orders one to three. Fine for the small matrices this
//! crate deals with; not meant for anything large.

use std::fmt;

use crate::error::{Result, TransformError};

/// Multiple of machine epsilon a determinant may carry and still count as zero.
const SINGULAR_TOLERANCE: f64 = 8.0 * f64::EPSILON;

/// Whether `det` is zero up to rounding, given the rows it was computed from.
///
/// The cutoff is relative to the product of the row norms, which bounds
/// `|det|` (Hadamard), so scaling a matrix does not change the verdict.
pub(crate) fn is_negligible_determinant<'a>(det: f64, rows: impl IntoIterator<Item = &'a [f64]>) -> bool {
    let bound: f64 = rows
        .into_iter()
        .map(|row| row.iter().map(|v| v * v).sum::<f64>().sqrt())
        .product();
    det.abs() <= SINGULAR_TOLERANCE * bound
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Matrix> {
        let order = rows.len();
        if order == 0 || rows.iter().any(|row| row.len() != order) {
            return Err(TransformError::NotSquare);
        }
        Ok(Matrix { rows })
    }

    pub fn identity(order: usize) -> Matrix {
        let rows = (0..order)
            .map(|i| (0..order).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();
        Matrix { rows }
    }

    pub fn order(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col]
    }

    /// The matrix with `row` and `col` removed. Panics on a 1x1 matrix.
    pub fn minor(&self, row: usize, col: usize) -> Matrix {
        assert!(self.order() > 1, "a 1x1 matrix has no minors");
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != row)
            .map(|(_, r)| {
                r.iter()
                    .enumerate()
                    .filter(|(j, _)| *j != col)
                    .map(|(_, v)| *v)
                    .collect()
            })
            .collect();
        Matrix { rows }
    }

    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        sign * self.minor(row, col).determinant()
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.rows;
        match self.order() {
            1 => m[0][0],
            2 => m[0][0] * m[1][1] - m[0][1] * m[1][0],
            3 => {
                m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
                    - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
                    + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
            }
            order => (0..order)
                .filter(|&j| m[0][j] != 0.0)
                .map(|j| m[0][j] * self.cofactor(0, j))
                .sum(),
        }
    }

    pub fn is_singular(&self) -> bool {
        is_negligible_determinant(self.determinant(), self.rows.iter().map(Vec::as_slice))
    }

    /// `A^-1 = adj(A) / det(A)`.
    pub fn inverse(&self) -> Result<Matrix> {
        let det = self.determinant();
        if is_negligible_determinant(det, self.rows.iter().map(Vec::as_slice)) {
            return Err(TransformError::SingularMatrix);
        }
        let order = self.order();
        if order == 1 {
            return Ok(Matrix { rows: vec![vec![1.0 / det]] });
        }
        // adjugate is the transposed cofactor matrix
        let rows = (0..order)
            .map(|i| (0..order).map(|j| self.cofactor(j, i) / det).collect())
            .collect();
        Ok(Matrix { rows })
    }

    pub fn mul(&self, other: &Matrix) -> Result<Matrix> {
        let order = self.order();
        if other.order() != order {
            return Err(TransformError::DimensionMismatch {
                expected: order,
                found: other.order(),
            });
        }
        let rows = (0..order)
            .map(|i| {
                (0..order)
                    .map(|j| (0..order).map(|k| self.rows[i][k] * other.rows[k][j]).sum())
                    .collect()
            })
            .collect();
        Ok(Matrix { rows })
    }

    pub fn apply(&self, vec: &[f64]) -> Result<Vec<f64>> {
        if vec.len() != self.order() {
            return Err(TransformError::DimensionMismatch {
                expected: self.order(),
                found: vec.len(),
            });
        }
        Ok(self
            .rows
            .iter()
            .map(|row| row.iter().zip(vec).map(|(a, b)| a * b).sum())
            .collect())
    }

    pub fn approx_eq(&self, other: &Matrix, tolerance: f64) -> bool {
        self.order() == other.order()
            && self
                .rows
                .iter()
                .flatten()
                .zip(other.rows.iter().flatten())
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl<const N: usize> From<[[f64; N]; N]> for Matrix {
    fn from(rows: [[f64; N]; N]) -> Self {
        assert!(N > 0, "a matrix needs at least one row");
        Matrix {
            rows: rows.iter().map(|r| r.to_vec()).collect(),
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:8.3}")).collect();
            writeln!(f, "[{}]", cells.join(" "))?;
        }
        Ok(())
    }
}
