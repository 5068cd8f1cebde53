//! Dense complex matrices and the direct LU solve.

use num_complex::Complex64;

use crate::error::{NetlistError, Result};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Square complex matrix (row-major).
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexMatrix {
    data: Vec<Complex64>,
    size: usize,
}

impl ComplexMatrix {
    /// Create a zero matrix of the given dimension.
    pub fn zeros(size: usize) -> Self {
        Self {
            data: vec![ZERO; size * size],
            size,
        }
    }

    /// Matrix dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.size + col]
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: Complex64) {
        self.data[row * self.size + col] += value;
    }

    /// Matrix-vector product, used to check residuals.
    pub fn mul_vec(&self, x: &[Complex64]) -> Vec<Complex64> {
        (0..self.size)
            .map(|row| {
                self.data[row * self.size..(row + 1) * self.size]
                    .iter()
                    .zip(x)
                    .map(|(a, b)| a * b)
                    .sum()
            })
            .collect()
    }
}

/// LU decomposition with partial pivoting.
#[derive(Debug)]
pub struct LuFactors {
    lu: Vec<Complex64>,
    pivots: Vec<usize>,
    size: usize,
}

impl LuFactors {
    /// Factor `matrix`. `frequency` is only used for error reporting.
    pub fn factor(matrix: &ComplexMatrix, frequency: f64) -> Result<Self> {
        let n = matrix.size;
        let mut lu = matrix.data.clone();
        let mut pivots: Vec<usize> = (0..n).collect();

        for k in 0..n {
            // Find pivot
            let mut max_val = lu[k * n + k].norm();
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = lu[i * n + k].norm();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val == 0.0 || !max_val.is_finite() {
                return Err(NetlistError::SingularSystem { frequency });
            }

            // Swap rows if needed
            if max_row != k {
                pivots.swap(k, max_row);
                for j in 0..n {
                    lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = lu[k * n + k];
            for i in (k + 1)..n {
                let factor = lu[i * n + k] / pivot;
                lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    let upper = lu[k * n + j];
                    lu[i * n + j] -= factor * upper;
                }
            }
        }

        Ok(Self { lu, pivots, size: n })
    }

    /// Solve using the pre-computed factors.
    pub fn solve(&self, b: &[Complex64], frequency: f64) -> Result<Vec<Complex64>> {
        let n = self.size;
        let lu = &self.lu;

        // Apply pivot permutation to b
        let mut x: Vec<Complex64> = self.pivots.iter().map(|&p| b[p]).collect();

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                let xj = x[j];
                x[i] -= lu[i * n + j] * xj;
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let xj = x[j];
                x[i] -= lu[i * n + j] * xj;
            }
            x[i] /= lu[i * n + i];
        }

        if x.iter().all(|v| v.re.is_finite() && v.im.is_finite()) {
            Ok(x)
        } else {
            Err(NetlistError::SingularSystem { frequency })
        }
    }
}

/// Solve `matrix * x = vector` exactly with a dense LU factorization.
pub fn solve(matrix: &ComplexMatrix, vector: &[Complex64], frequency: f64) -> Result<Vec<Complex64>> {
    debug_assert_eq!(matrix.size(), vector.len());
    LuFactors::factor(matrix, frequency)?.solve(vector, frequency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_real_system() {
        // 2x + y = 5, x + 3y = 10 -> x = 1, y = 3
        let mut m = ComplexMatrix::zeros(2);
        m.add(0, 0, c(2.0, 0.0));
        m.add(0, 1, c(1.0, 0.0));
        m.add(1, 0, c(1.0, 0.0));
        m.add(1, 1, c(3.0, 0.0));
        let x = solve(&m, &[c(5.0, 0.0), c(10.0, 0.0)], 0.0).unwrap();
        assert_relative_eq!(x[0].re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1].re, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_complex_system_needs_pivoting() {
        // Zero on the first diagonal forces a row swap
        let mut m = ComplexMatrix::zeros(2);
        m.add(0, 1, c(0.0, 1.0));
        m.add(1, 0, c(2.0, 0.0));
        m.add(1, 1, c(1.0, 0.0));
        let b = [c(1.0, 1.0), c(4.0, 0.0)];
        let x = solve(&m, &b, 50.0).unwrap();

        let residual = m.mul_vec(&x);
        for (r, expected) in residual.iter().zip(b.iter()) {
            assert_relative_eq!(r.re, expected.re, epsilon = 1e-12);
            assert_relative_eq!(r.im, expected.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_singular_matrix() {
        let mut m = ComplexMatrix::zeros(2);
        m.add(0, 0, c(1.0, 0.0));
        m.add(0, 1, c(1.0, 0.0));
        m.add(1, 0, c(2.0, 0.0));
        m.add(1, 1, c(2.0, 0.0));
        assert_eq!(
            solve(&m, &[c(1.0, 0.0), c(2.0, 0.0)], 60.0).unwrap_err(),
            NetlistError::SingularSystem { frequency: 60.0 }
        );

        let empty_row = ComplexMatrix::zeros(3);
        assert!(solve(&empty_row, &[ZERO; 3], 0.0).is_err());
    }
}
