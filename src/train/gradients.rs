use crate::{
    buffer::Matrix,
    func::WeightDecay,
    linalg,
    net::SparseAutoencoder,
};

/// Gradient accumulators, shaped like the parameters they belong to.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradients {
    pub w1_grad: Matrix,
    pub w2_grad: Matrix,
    pub b1_grad: Vec<f32>,
    pub b2_grad: Vec<f32>,
}

impl Gradients {

    pub fn zeroed_for_net(net: &SparseAutoencoder) -> Self {
        Gradients {
            w1_grad: Matrix::zeroed(net.hidden_size(), net.visible_size()),
            w2_grad: Matrix::zeroed(net.visible_size(), net.hidden_size()),
            b1_grad: vec![0f32; net.hidden_size()],
            b2_grad: vec![0f32; net.visible_size()],
        }
    }

    /// Adds one sample's contribution: `W2grad += d3·a2ᵗ`, `b2grad += d3`,
    /// `W1grad += d2·xᵗ`, `b1grad += d2`.
    pub fn accumulate_sample(&mut self, input: &[f32], a2: &[f32], d2: &[f32], d3: &[f32]) {
        linalg::outer_product_accumulate(d3, a2, &mut self.w2_grad);
        linalg::add_assign(&mut self.b2_grad, d3);
        linalg::outer_product_accumulate(d2, input, &mut self.w1_grad);
        linalg::add_assign(&mut self.b1_grad, d2);
    }

    /// Merges accumulators from another partition of the sample set.
    pub fn add(&mut self, other: &Gradients) {
        self.w1_grad.add(&other.w1_grad);
        self.w2_grad.add(&other.w2_grad);
        linalg::add_assign(&mut self.b1_grad, &other.b1_grad);
        linalg::add_assign(&mut self.b2_grad, &other.b2_grad);
    }

    /// Averages over `sample_count` samples and adds weight decay to the weight gradients.
    pub fn finalize(&mut self, sample_count: usize, net: &SparseAutoencoder, decay: WeightDecay) {
        let m = sample_count as f32;
        linalg::divide_scalar_assign(self.w1_grad.get_buffer_mut(), m);
        linalg::divide_scalar_assign(self.w2_grad.get_buffer_mut(), m);
        linalg::divide_scalar_assign(&mut self.b1_grad, m);
        linalg::divide_scalar_assign(&mut self.b2_grad, m);
        decay.apply_to_gradient(net.w1(), &mut self.w1_grad);
        decay.apply_to_gradient(net.w2(), &mut self.w2_grad);
    }

    /// Euclidean norms of `[W1grad, W2grad, b1grad, b2grad]`.
    pub fn norms(&self) -> [f32; 4] {
        [
            linalg::l2_norm(self.w1_grad.get_buffer()),
            linalg::l2_norm(self.w2_grad.get_buffer()),
            linalg::l2_norm(&self.b1_grad),
            linalg::l2_norm(&self.b2_grad),
        ]
    }

}
