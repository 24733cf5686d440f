use crate::{
    config::AutoencoderConfig,
    net::SparseAutoencoder,
    stats::Stats,
    train::{
        backprop::PartialPass,
        gradients::Gradients,
    },
};

/// The three summands of the regularized cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostTerms {
    /// `Σ‖a3 - x‖² / 2M`
    pub reconstruction: f32,
    /// `(λ/2)(‖W1‖² + ‖W2‖²)`
    pub weight_decay: f32,
    /// `β·Σ KL(ρ || ρ̂)`
    pub sparsity: f32,
}

impl CostTerms {
    pub fn total(&self) -> f32 {
        self.reconstruction + self.weight_decay + self.sparsity
    }
}

#[derive(Clone, Debug)]
pub struct PassOutput {
    pub cost: f32,
    pub cost_terms: CostTerms,
    pub gradients: Gradients,
    pub rho_hat: Vec<f32>,
    pub sparsity_penalty: Vec<f32>,
    /// Per-sample `0.5‖a3 - x‖²`
    pub error_stats: Stats,
}

pub fn finalize_pass(
    net: &SparseAutoencoder,
    config: &AutoencoderConfig,
    rho_hat: Vec<f32>,
    partial: PartialPass,
    sample_count: usize,
) -> PassOutput {

    let PartialPass { mut gradients, squared_error_sum, buffers } = partial;
    let weight_decay = config.weight_decay_fn();
    let sparsity_fn = config.sparsity_fn();

    gradients.finalize(sample_count, net, weight_decay);

    let mut sparsity_penalty = vec![0f32; rho_hat.len()];
    sparsity_fn.penalty_into(&rho_hat, &mut sparsity_penalty);

    let cost_terms = CostTerms {
        reconstruction: squared_error_sum / (2.0 * sample_count as f32),
        weight_decay: weight_decay.get_cost(&[net.w1(), net.w2()]),
        sparsity: sparsity_fn.get_cost(&sparsity_penalty),
    };
    let cost = cost_terms.total();
    log::info!("cost {} ({:?})", cost, cost_terms);

    PassOutput {
        cost,
        cost_terms,
        gradients,
        rho_hat,
        sparsity_penalty,
        error_stats: buffers.error_stats,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        buffer::Matrix,
        config::AutoencoderConfigBuilder,
    };
    use approx::assert_relative_eq;

    #[test]
    fn test_finalize_pass() {
        let config = AutoencoderConfigBuilder::default()
            .patch_size(2)
            .visible_size(4)
            .hidden_size(2)
            .sample_count(4)
            .weight_decay(0.5)
            .build()
            .unwrap();
        let w1 = Matrix::from_vec(2, 4, vec![1.0; 8]).unwrap();
        let w2 = Matrix::from_vec(4, 2, vec![-1.0; 8]).unwrap();
        let net = SparseAutoencoder::from_weights(&config, w1, w2).unwrap();

        let mut partial = PartialPass::new(&net);
        partial.squared_error_sum = 2.0;
        partial.gradients.b1_grad = vec![4.0, -8.0];
        partial.gradients.w2_grad.get_row_mut(1)[1] = 2.0;

        let rho_hat = vec![0.01, 0.5];
        let out = finalize_pass(&net, &config, rho_hat.clone(), partial, 4);

        assert_eq!(out.cost_terms.reconstruction, 0.25);
        assert_eq!(out.cost_terms.weight_decay, 0.25 * 16.0);
        assert_eq!(out.sparsity_penalty[0], 0.0);
        assert_relative_eq!(
            out.cost_terms.sparsity,
            3.0 * (0.01 * f32::ln(0.02) + 0.99 * f32::ln(1.98)),
            max_relative = 1e-5
        );
        assert_eq!(out.cost, out.cost_terms.total());
        assert_eq!(out.rho_hat, rho_hat);

        assert_eq!(out.gradients.b1_grad, vec![1.0, -2.0]);
        assert_eq!(out.gradients.b2_grad, vec![0.0; 4]);
        assert_eq!(out.gradients.w1_grad.get(0, 0), 0.5);
        assert_eq!(out.gradients.w2_grad.get(1, 1), 0.5 - 0.5);
        assert_eq!(out.gradients.w2_grad.get(0, 0), -0.5);
    }

}
