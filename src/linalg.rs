//! Dense vector and matrix primitives over flat row-major `f32` buffers.
//!
//! Every function works on caller-supplied buffers and never allocates. Lengths are checked
//! with `assert_eq!`; a mismatch is a programming error and panics before any element is
//! touched. Binary element-wise ops come in two flavours: `op(a, b, dest)` writes into a
//! separate destination, `op_assign(dest, b)` updates `dest` in place.

use itertools::izip;

use crate::buffer::Matrix;

#[inline]
fn zip_with(a: &[f32], b: &[f32], dest: &mut [f32], op: impl Fn(f32, f32) -> f32) {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.len(), dest.len());
    for (d, &x, &y) in izip!(dest.iter_mut(), a, b) {
        *d = op(x, y);
    }
}

#[inline]
fn zip_with_assign(dest: &mut [f32], b: &[f32], op: impl Fn(f32, f32) -> f32) {
    assert_eq!(dest.len(), b.len());
    for (d, &y) in dest.iter_mut().zip(b) {
        *d = op(*d, y);
    }
}

#[inline]
fn map_into(src: &[f32], dest: &mut [f32], op: impl Fn(f32) -> f32) {
    assert_eq!(src.len(), dest.len());
    for (d, &x) in dest.iter_mut().zip(src) {
        *d = op(x);
    }
}

pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len());
    let mut accum = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        accum += x * y;
    }
    accum
}

/// `dest = m · v`, one dot product per row of `m`.
pub fn matrix_vector_product(m: &Matrix, v: &[f32], dest: &mut [f32]) {
    assert_eq!(m.cols(), v.len());
    assert_eq!(m.rows(), dest.len());
    for (d, row) in dest.iter_mut().zip(m.row_iter()) {
        *d = dot_product(row, v);
    }
}

/// `dest += a · b` with a naive k-i-j loop. Callers wanting a fresh product zero `dest` first.
// Not used by the pass, which only needs rank-one updates.
#[allow(dead_code)]
pub fn matrix_multiply_accumulate(a: &Matrix, b: &Matrix, dest: &mut Matrix) {
    assert_eq!(a.cols(), b.rows());
    assert_eq!(dest.shape(), (a.rows(), b.cols()));
    for k in 0..a.cols() {
        let b_row = b.get_row(k);
        for i in 0..a.rows() {
            let a_ik = a.get(i, k);
            for (d, &b_kj) in dest.get_row_mut(i).iter_mut().zip(b_row) {
                *d += a_ik * b_kj;
            }
        }
    }
}

/// `dest += col · rowᵗ`, i.e. `dest[i][j] += col[i] * row[j]`.
pub fn outer_product_accumulate(col: &[f32], row: &[f32], dest: &mut Matrix) {
    assert_eq!(dest.shape(), (col.len(), row.len()));
    for (i, &c) in col.iter().enumerate() {
        for (d, &r) in dest.get_row_mut(i).iter_mut().zip(row) {
            *d += c * r;
        }
    }
}

/// Out-of-place transpose of a `rows x cols` buffer into a `cols x rows` buffer.
pub fn transpose(src: &[f32], dest: &mut [f32], rows: usize, cols: usize) {
    assert_eq!(src.len(), rows * cols);
    assert_eq!(dest.len(), rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            dest[j * rows + i] = src[i * cols + j];
        }
    }
}

pub fn add(a: &[f32], b: &[f32], dest: &mut [f32]) {
    zip_with(a, b, dest, |x, y| x + y);
}

pub fn subtract(a: &[f32], b: &[f32], dest: &mut [f32]) {
    zip_with(a, b, dest, |x, y| x - y);
}

pub fn multiply(a: &[f32], b: &[f32], dest: &mut [f32]) {
    zip_with(a, b, dest, |x, y| x * y);
}

pub fn divide(a: &[f32], b: &[f32], dest: &mut [f32]) {
    zip_with(a, b, dest, |x, y| x / y);
}

pub fn add_assign(dest: &mut [f32], b: &[f32]) {
    zip_with_assign(dest, b, |x, y| x + y);
}

pub fn subtract_assign(dest: &mut [f32], b: &[f32]) {
    zip_with_assign(dest, b, |x, y| x - y);
}

pub fn multiply_assign(dest: &mut [f32], b: &[f32]) {
    zip_with_assign(dest, b, |x, y| x * y);
}

pub fn divide_assign(dest: &mut [f32], b: &[f32]) {
    zip_with_assign(dest, b, |x, y| x / y);
}

pub fn divide_scalar(src: &[f32], dest: &mut [f32], divisor: f32) {
    map_into(src, dest, |x| x / divisor);
}

pub fn multiply_scalar(src: &[f32], dest: &mut [f32], multiplicand: f32) {
    map_into(src, dest, |x| x * multiplicand);
}

pub fn divide_scalar_assign(dest: &mut [f32], divisor: f32) {
    for d in dest.iter_mut() {
        *d /= divisor;
    }
}

pub fn scale(dest: &mut [f32], multiplicand: f32) {
    for d in dest.iter_mut() {
        *d *= multiplicand;
    }
}

#[inline(always)]
pub fn sigmoid_f32(x: f32) -> f32 {
    1.0 / (1.0 + f32::exp(-x))
}

pub fn sigmoid(src: &[f32], dest: &mut [f32]) {
    map_into(src, dest, sigmoid_f32);
}

pub fn log(src: &[f32], dest: &mut [f32]) {
    map_into(src, dest, f32::ln);
}

pub fn sum(v: &[f32]) -> f32 {
    v.iter().sum()
}

pub fn l2_norm(v: &[f32]) -> f32 {
    dot_product(v, v).sqrt()
}

pub fn fill(dest: &mut [f32], value: f32) {
    for d in dest.iter_mut() {
        *d = value;
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dot_product() {
        assert_eq!(dot_product(&[1., 2., 3.], &[4., 5., 6.]), 32.);
        for n in 0..10 {
            let a: Vec<f32> = (0..n).map(|i| i as f32 * 0.7 - 2.0).collect();
            assert_eq!(dot_product(&a, &vec![0.0; n]), 0.0);
        }
    }

    #[test]
    #[should_panic]
    fn test_dot_product_length_mismatch() {
        dot_product(&[1., 2.], &[1.]);
    }

    #[test]
    fn test_matrix_vector_product() {
        let m = Matrix::from_vec(2, 3, vec![1., 2., 3., 4., 5., 6.]).unwrap();
        let mut dest = [9., 9.];
        matrix_vector_product(&m, &[1., 0., -1.], &mut dest);
        assert_eq!(dest, [-2., -2.]);
    }

    #[test]
    fn test_matrix_multiply_accumulates() {
        let a = Matrix::from_vec(2, 3, vec![1., 2., 3., 4., 5., 6.]).unwrap();
        let b = Matrix::from_vec(3, 2, vec![7., 8., 9., 10., 11., 12.]).unwrap();
        let mut dest = Matrix::zeroed(2, 2);
        matrix_multiply_accumulate(&a, &b, &mut dest);
        assert_eq!(dest.get_buffer(), &[58., 64., 139., 154.]);
        matrix_multiply_accumulate(&a, &b, &mut dest);
        assert_eq!(dest.get_buffer(), &[116., 128., 278., 308.]);
    }

    #[test]
    fn test_outer_product_matches_matrix_multiply() {
        let col = [1., -2., 0.5];
        let row = [3., 4.];
        let mut outer = Matrix::zeroed(3, 2);
        outer_product_accumulate(&col, &row, &mut outer);

        let mut product = Matrix::zeroed(3, 2);
        matrix_multiply_accumulate(
            &Matrix::from_vec(3, 1, col.to_vec()).unwrap(),
            &Matrix::from_vec(1, 2, row.to_vec()).unwrap(),
            &mut product,
        );
        assert_eq!(outer, product);
        assert_eq!(outer.get_buffer(), &[3., 4., -6., -8., 1.5, 2.]);
    }

    #[test]
    fn test_transpose_round_trip() {
        let src: Vec<f32> = (0..15).map(|i| i as f32).collect();
        let mut t = vec![0.0; 15];
        let mut back = vec![0.0; 15];
        transpose(&src, &mut t, 3, 5);
        assert_eq!(t[1], 5.0);
        assert_eq!(t[3], 1.0);
        transpose(&t, &mut back, 5, 3);
        assert_eq!(back, src);
    }

    #[test]
    fn test_elementwise_ops() {
        let a = [1., 4., -3., 8.];
        let b = [2., 2., 0.5, -4.];
        let mut dest = [0.0; 4];

        add(&a, &b, &mut dest);
        assert_eq!(dest, [3., 6., -2.5, 4.]);
        subtract(&a, &b, &mut dest);
        assert_eq!(dest, [-1., 2., -3.5, 12.]);
        multiply(&a, &b, &mut dest);
        assert_eq!(dest, [2., 8., -1.5, -32.]);
        divide(&a, &b, &mut dest);
        assert_eq!(dest, [0.5, 2., -6., -2.]);

        let mut acc = a;
        add_assign(&mut acc, &b);
        assert_eq!(acc, [3., 6., -2.5, 4.]);
        subtract_assign(&mut acc, &b);
        assert_eq!(acc, a);
        multiply_assign(&mut acc, &b);
        assert_eq!(acc, [2., 8., -1.5, -32.]);
        divide_assign(&mut acc, &b);
        assert_eq!(acc, a);
    }

    #[test]
    fn test_scalar_ops() {
        let mut dest = [0.0; 3];
        divide_scalar(&[2., 4., -8.], &mut dest, 4.0);
        assert_eq!(dest, [0.5, 1., -2.]);
        multiply_scalar(&[2., 4., -8.], &mut dest, 0.5);
        assert_eq!(dest, [1., 2., -4.]);
        scale(&mut dest, -2.0);
        assert_eq!(dest, [-2., -4., 8.]);
        divide_scalar_assign(&mut dest, 4.0);
        assert_eq!(dest, [-0.5, -1., 2.]);
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid_f32(0.0), 0.5);
        let src = [-10., -1., -0.1, 0., 0.1, 1., 10.];
        let mut dest = [0.0; 7];
        sigmoid(&src, &mut dest);
        for w in dest.windows(2) {
            assert!(w[0] < w[1]);
        }
        for &v in dest.iter() {
            assert!(v > 0.0 && v < 1.0);
        }
        assert_relative_eq!(dest[5], 0.731_058_6, max_relative = 1e-6);
    }

    #[test]
    fn test_log() {
        let mut dest = [0.0; 2];
        log(&[1.0, std::f32::consts::E], &mut dest);
        assert_eq!(dest[0], 0.0);
        assert_relative_eq!(dest[1], 1.0, max_relative = 1e-6);
    }

    #[test]
    fn test_reductions() {
        assert_eq!(sum(&[1., 2., 3.5]), 6.5);
        assert_eq!(sum(&[]), 0.0);
        assert_eq!(l2_norm(&[3., 4.]), 5.0);
        let mut v = [1., 2., 3.];
        fill(&mut v, -1.0);
        assert_eq!(v, [-1., -1., -1.]);
    }

}
