use std::fmt;

use crate::linalg;

quick_error! {
    #[derive(Debug, Clone, PartialEq)]
    pub enum ShapeError {
        LengthMismatch(rows: usize, cols: usize, len: usize) {
            description("Buffer length does not match matrix shape")
            display("Expected {} x {} = {} values, got {}", rows, cols, rows * cols, len)
        }
        ZeroDimension(rows: usize, cols: usize) {
            description("Matrix dimensions must be non-zero")
            display("Invalid matrix shape {} x {}", rows, cols)
        }
        Mismatch(name: &'static str, expected: (usize, usize), actual: (usize, usize)) {
            description("Unexpected matrix or vector shape")
            display("{} has shape {:?}, expected {:?}", name, actual, expected)
        }
    }
}

/// Dense row-major `f32` matrix. A vector is just a slice; anything two-dimensional carries
/// its shape here so that length mismatches are caught at the boundary.
#[derive(Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    buffer: Box<[f32]>,
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let mut s = &mut f.debug_struct("Matrix");
        s = s.field("rows", &self.rows)
            .field("cols", &self.cols);
        if self.buffer.len() < 30 {
            s = s.field("buffer", &self.buffer);
        } else {
            s = s.field("buffer_len", &self.buffer.len());
        }
        s.finish()
    }
}

impl Matrix {

    pub fn new_filled(rows: usize, cols: usize, initial_value: f32) -> Self {
        assert!(rows > 0 && cols > 0);
        Matrix {
            rows,
            cols,
            buffer: vec![initial_value; rows * cols].into_boxed_slice(),
        }
    }

    pub fn zeroed(rows: usize, cols: usize) -> Self {
        Self::new_filled(rows, cols, 0.0)
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, ShapeError> {
        if rows == 0 || cols == 0 {
            return Err(ShapeError::ZeroDimension(rows, cols));
        }
        if data.len() != rows * cols {
            return Err(ShapeError::LengthMismatch(rows, cols, data.len()));
        }
        Ok(Matrix {
            rows,
            cols,
            buffer: data.into_boxed_slice(),
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        debug_assert!(col < self.cols);
        self.buffer[row * self.cols + col]
    }

    #[inline]
    pub fn get_row(&self, row: usize) -> &[f32] {
        let offset = row * self.cols;
        &self.buffer[offset..offset + self.cols]
    }

    #[inline]
    pub fn get_row_mut(&mut self, row: usize) -> &mut [f32] {
        let offset = row * self.cols;
        &mut self.buffer[offset..offset + self.cols]
    }

    #[inline]
    pub fn row_iter(&self) -> std::slice::Chunks<'_, f32> {
        self.buffer.chunks(self.cols)
    }

    #[inline]
    pub fn get_buffer(&self) -> &[f32] {
        &self.buffer
    }

    #[inline]
    pub fn get_buffer_mut(&mut self) -> &mut [f32] {
        &mut self.buffer
    }

    pub fn add(&mut self, other: &Matrix) {
        assert_eq!(self.shape(), other.shape());
        linalg::add_assign(&mut self.buffer, &other.buffer);
    }

    pub fn add_with_multiplier(&mut self, other: &Matrix, multiplier: f32) {
        assert_eq!(self.shape(), other.shape());
        for (value, other) in self.buffer.iter_mut().zip(other.buffer.iter()) {
            *value += *other * multiplier;
        }
    }

    /// Squared Frobenius norm.
    pub fn sum_of_squares(&self) -> f32 {
        linalg::dot_product(&self.buffer, &self.buffer)
    }

    pub fn transpose_into(&self, target: &mut Matrix) {
        assert_eq!((self.cols, self.rows), target.shape());
        linalg::transpose(&self.buffer, &mut target.buffer, self.rows, self.cols);
    }

    pub fn transposed(&self) -> Matrix {
        let mut target = Matrix::zeroed(self.cols, self.rows);
        self.transpose_into(&mut target);
        target
    }

}
