use crate::{
    data::PatchSet,
    func::ErrorFn,
    linalg,
    net::SparseAutoencoder,
    train::buffers::PassBuffers,
};

/// Adds the hidden activation `a2` of every patch in `data` to `rho_sum`.
pub fn accumulate_hidden_activation(
    net: &SparseAutoencoder,
    data: &PatchSet,
    buffers: &mut PassBuffers,
    rho_sum: &mut [f32],
) {
    debug_assert_eq!(net.hidden_size(), rho_sum.len());
    for input in data {
        net.forward_hidden(input, &mut buffers.z2, &mut buffers.a2);
        linalg::add_assign(rho_sum, &buffers.a2);
    }
}

/// Runs both layers for one patch and leaves `a2`, `a3` and the residual `a3 - x` in `buffers`.
/// Reports the sample error to `buffers.error_stats` and returns `‖a3 - x‖²`.
pub fn forward_pass_and_compute_error(
    net: &SparseAutoencoder,
    input: &[f32],
    error_fn: &ErrorFn,
    buffers: &mut PassBuffers,
) -> f32 {

    debug_assert_eq!(net.visible_size(), input.len());

    net.forward_hidden(input, &mut buffers.z2, &mut buffers.a2);
    net.forward_output(&buffers.a2, &mut buffers.z3, &mut buffers.a3);

    error_fn.error_derivative_into(input, &buffers.a3, &mut buffers.residual);
    let squared_norm = linalg::dot_product(&buffers.residual, &buffers.residual);
    buffers.error_stats.report(error_fn.get_error(squared_norm));
    squared_norm
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        buffer::Matrix,
        config::AutoencoderConfigBuilder,
    };
    use approx::assert_relative_eq;

    fn balanced_net() -> SparseAutoencoder {
        let config = AutoencoderConfigBuilder::default()
            .patch_size(2)
            .visible_size(4)
            .hidden_size(2)
            .sample_count(2)
            .build()
            .unwrap();
        let w1 = Matrix::from_vec(2, 4, vec![1., 0., 0., 0., 0., 0., 0., -1.]).unwrap();
        let w2 = Matrix::from_vec(4, 2, vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3, 0.4, -0.4]).unwrap();
        SparseAutoencoder::from_weights(&config, w1, w2).unwrap()
    }

    #[test]
    fn test_hidden_activation_sum() {
        let net = balanced_net();
        let data = PatchSet::from_vec(vec![0., 0., 0., 0., 2., 0., 0., 0.], 2, 4).unwrap();
        let mut buffers = PassBuffers::for_net(&net);
        let mut rho_sum = vec![0.0; 2];
        accumulate_hidden_activation(&net, &data, &mut buffers, &mut rho_sum);
        assert_relative_eq!(rho_sum[0], 0.5 + linalg::sigmoid_f32(2.0), max_relative = 1e-6);
        assert_eq!(rho_sum[1], 1.0);
    }

    #[test]
    fn test_forward_pass_error() {
        let net = balanced_net();
        let mut buffers = PassBuffers::for_net(&net);
        let input = [0.0, 1.0, 0.0, 0.5];
        let squared = forward_pass_and_compute_error(&net, &input, &ErrorFn::SquaredError, &mut buffers);

        let a3 = net.reconstruct(&input);
        assert_eq!(buffers.a3, a3);
        let expected: f32 = a3.iter().zip(input.iter()).map(|(a, x)| (a - x) * (a - x)).sum();
        assert_relative_eq!(squared, expected, max_relative = 1e-6);
        assert_eq!(buffers.error_stats.count(), 1);
        assert_eq!(buffers.error_stats.mean(), 0.5 * squared);
        assert_relative_eq!(buffers.residual[1], a3[1] - 1.0, max_relative = 1e-6);
    }

}
