use crate::linalg;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActivationFn {
    LogisticSigmoid,
}

impl ActivationFn {

    pub fn standard_logistic_sigmoid() -> Self {
        ActivationFn::LogisticSigmoid
    }

    pub fn activate(&self, pre_activation: &[f32], activation: &mut [f32]) {
        match self {
            ActivationFn::LogisticSigmoid => linalg::sigmoid(pre_activation, activation),
        }
    }

    /// Derivative expressed through the activation itself, `a ⊙ (1 - a)` for the sigmoid.
    pub fn derivative_from_output(&self, activation: &[f32], derivative: &mut [f32]) {
        match self {
            ActivationFn::LogisticSigmoid => {
                linalg::fill(derivative, 1.0);
                linalg::subtract_assign(derivative, activation);
                linalg::multiply_assign(derivative, activation);
            },
        }
    }

}
