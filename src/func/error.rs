use crate::linalg;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ErrorFn {
    SquaredError,
}

impl ErrorFn {

    /// Error of one sample, given the squared residual norm `‖actual - expected‖²`.
    pub fn get_error(&self, squared_residual_norm: f32) -> f32 {
        match self {
            ErrorFn::SquaredError => 0.5 * squared_residual_norm,
        }
    }

    /// Writes `actual - expected`, the derivative of the squared error, into `residual`.
    pub fn error_derivative_into(&self, expected: &[f32], actual: &[f32], residual: &mut [f32]) {
        match self {
            ErrorFn::SquaredError => linalg::subtract(actual, expected, residual),
        }
    }

}
