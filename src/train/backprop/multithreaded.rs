use crate::{
    config::AutoencoderConfig,
    data::PatchSet,
    func::ErrorFn,
    linalg,
    net::SparseAutoencoder,
    train::{
        PassError,
        PassOutput,
        buffers::PassBuffers,
        finalize::finalize_pass,
        forward::accumulate_hidden_activation,
    },
};
use super::{PartialPass, PassContext, log_last_sample, mean_activation};

/// Runs both phases with one scoped worker per partition. The phase 1 partial sums are reduced
/// into `rho_hat` before any phase 2 worker starts.
pub fn compute_pass_multi_threaded(
    net: &SparseAutoencoder,
    data_set: &PatchSet,
    config: &AutoencoderConfig,
    error_fn: ErrorFn,
    num_workers: usize,
) -> Result<PassOutput, PassError> {

    let sample_count = data_set.num_rows();
    let partitions = data_set.partition(num_workers);

    log::info!(
        "phase 1: mean hidden activation over {} samples, {} workers",
        sample_count, num_workers
    );
    let partial_sums: Vec<Vec<f32>> = crossbeam::scope(|scope| {
        let handles: Vec<_> = partitions.iter()
            .map(|partition| scope.spawn(move |_| {
                let mut buffers = PassBuffers::for_net(net);
                let mut rho_sum = vec![0f32; net.hidden_size()];
                accumulate_hidden_activation(net, partition, &mut buffers, &mut rho_sum);
                rho_sum
            }))
            .collect();
        handles.into_iter()
            .map(|handle| handle.join())
            .collect::<Result<Vec<_>, _>>()
    })
        .map_err(|_| PassError::WorkerPanicked)?
        .map_err(|_| PassError::WorkerPanicked)?;

    let mut rho_sum = vec![0f32; net.hidden_size()];
    for partial_sum in &partial_sums {
        linalg::add_assign(&mut rho_sum, partial_sum);
    }
    let rho_hat = mean_activation(&rho_sum, sample_count);

    log::info!(
        "phase 2: backpropagation over {} samples, {} workers",
        sample_count, num_workers
    );
    let context = PassContext::new(net, &rho_hat, &config.sparsity_fn(), error_fn);
    let context = &context;
    let partials: Vec<PartialPass> = crossbeam::scope(|scope| {
        let handles: Vec<_> = partitions.iter()
            .map(|partition| scope.spawn(move |_| context.accumulate_partition(partition)))
            .collect();
        handles.into_iter()
            .map(|handle| handle.join())
            .collect::<Result<Vec<_>, _>>()
    })
        .map_err(|_| PassError::WorkerPanicked)?
        .map_err(|_| PassError::WorkerPanicked)?;

    // the first partition holds the final rows of the data set
    if let Some(first) = partials.first() {
        log_last_sample(&first.buffers);
    }

    let mut merged = PartialPass::new(net);
    for partial in &partials {
        merged.merge(partial);
    }

    Ok(finalize_pass(net, config, rho_hat, merged, sample_count))
}
