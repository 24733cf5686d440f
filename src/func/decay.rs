use crate::buffer::Matrix;

/// L2 weight decay (lambda). Applies to weight matrices only, never to biases.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightDecay(pub f32);

impl WeightDecay {

    /// `grad += λ·weights`
    pub fn apply_to_gradient(&self, weights: &Matrix, grad: &mut Matrix) {
        grad.add_with_multiplier(weights, self.0);
    }

    /// `(λ/2)·Σ‖W‖_F²`
    pub fn get_cost(&self, weights: &[&Matrix]) -> f32 {
        let sum_of_squares: f32 = weights.iter()
            .map(|w| w.sum_of_squares())
            .sum();
        self.0 / 2.0 * sum_of_squares
    }

}
