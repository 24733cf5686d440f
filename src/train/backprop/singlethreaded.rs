use crate::{
    config::AutoencoderConfig,
    data::PatchSet,
    func::ErrorFn,
    net::SparseAutoencoder,
    train::{
        PassOutput,
        buffers::PassBuffers,
        finalize::finalize_pass,
        forward::accumulate_hidden_activation,
    },
};
use super::{PassContext, log_last_sample, mean_activation};

pub fn compute_pass_single_threaded(
    net: &SparseAutoencoder,
    data_set: &PatchSet,
    config: &AutoencoderConfig,
    error_fn: ErrorFn,
) -> PassOutput {

    let sample_count = data_set.num_rows();

    log::info!("phase 1: mean hidden activation over {} samples", sample_count);
    let mut buffers = PassBuffers::for_net(net);
    let mut rho_sum = vec![0f32; net.hidden_size()];
    accumulate_hidden_activation(net, data_set, &mut buffers, &mut rho_sum);
    let rho_hat = mean_activation(&rho_sum, sample_count);

    log::info!("phase 2: backpropagation over {} samples", sample_count);
    let context = PassContext::new(net, &rho_hat, &config.sparsity_fn(), error_fn);
    let partial = context.accumulate_partition(data_set);
    log_last_sample(&partial.buffers);

    finalize_pass(net, config, rho_hat, partial, sample_count)
}
