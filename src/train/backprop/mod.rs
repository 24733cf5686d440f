mod singlethreaded;
mod multithreaded;

use self::multithreaded::*;
use self::singlethreaded::*;
use crate::{
    buffer::{Matrix, ShapeError},
    config::AutoencoderConfig,
    data::PatchSet,
    func::{ErrorFn, SparsityFn},
    linalg,
    net::SparseAutoencoder,
    train::{
        PassError,
        PassOutput,
        buffers::PassBuffers,
        forward::forward_pass_and_compute_error,
        gradients::Gradients,
    },
};

#[derive(Clone, Debug)]
pub struct PassOptions {
    pub error_fn: ErrorFn,
    pub multi_threading: Option<MultithreadingOptions>,
}

#[derive(Clone, Debug, Default)]
pub struct MultithreadingOptions {
    /// Defaults to the number of logical cpus. Never more than one worker per sample.
    pub worker_threads: Option<usize>,
}

impl Default for PassOptions {
    fn default() -> Self {
        PassOptions {
            error_fn: ErrorFn::SquaredError,
            multi_threading: None,
        }
    }
}

/// Values fixed for the whole of phase 2, shared read-only by every worker.
pub struct PassContext<'a> {
    pub net: &'a SparseAutoencoder,
    pub error_fn: ErrorFn,
    pub w2_transposed: Matrix,
    /// `β·(-ρ/ρ̂ + (1-ρ)/(1-ρ̂))`, one entry per hidden unit
    pub sparsity_term: Vec<f32>,
}

/// Unnormalized results of phase 2 over some subset of the samples.
pub struct PartialPass {
    pub gradients: Gradients,
    pub squared_error_sum: f32,
    /// Holds the vectors of the last sample processed, plus the error statistics.
    pub buffers: PassBuffers,
}

impl PartialPass {

    pub fn new(net: &SparseAutoencoder) -> Self {
        PartialPass {
            gradients: Gradients::zeroed_for_net(net),
            squared_error_sum: 0.0,
            buffers: PassBuffers::for_net(net),
        }
    }

    pub fn merge(&mut self, other: &PartialPass) {
        self.gradients.add(&other.gradients);
        self.squared_error_sum += other.squared_error_sum;
        self.buffers.error_stats.merge(&other.buffers.error_stats);
    }

}

impl<'a> PassContext<'a> {

    pub fn new(
        net: &'a SparseAutoencoder,
        rho_hat: &[f32],
        sparsity_fn: &SparsityFn,
        error_fn: ErrorFn,
    ) -> Self {
        let mut sparsity_term = vec![0f32; net.hidden_size()];
        sparsity_fn.gradient_term_into(rho_hat, &mut sparsity_term);
        PassContext {
            net,
            error_fn,
            w2_transposed: net.w2().transposed(),
            sparsity_term,
        }
    }

    /// Forward and backward pass for one patch, adding its contribution to `gradients`.
    /// Returns `‖a3 - x‖²`.
    pub fn backprop_sample(
        &self,
        input: &[f32],
        buffers: &mut PassBuffers,
        gradients: &mut Gradients,
    ) -> f32 {

        let squared_error = forward_pass_and_compute_error(self.net, input, &self.error_fn, buffers);
        let activation_fn = self.net.activation_fn();

        // d3 = (a3 - x) ⊙ a3 ⊙ (1 - a3)
        activation_fn.derivative_from_output(&buffers.a3, &mut buffers.output_derivative);
        linalg::multiply(&buffers.residual, &buffers.output_derivative, &mut buffers.d3);

        // d2 = (W2ᵗ·d3 + sparsity term) ⊙ a2 ⊙ (1 - a2)
        linalg::matrix_vector_product(&self.w2_transposed, &buffers.d3, &mut buffers.hidden_error);
        linalg::add_assign(&mut buffers.hidden_error, &self.sparsity_term);
        activation_fn.derivative_from_output(&buffers.a2, &mut buffers.hidden_derivative);
        linalg::multiply(&buffers.hidden_error, &buffers.hidden_derivative, &mut buffers.d2);

        gradients.accumulate_sample(input, &buffers.a2, &buffers.d2, &buffers.d3);
        squared_error
    }

    pub fn accumulate_partition(&self, data: &PatchSet) -> PartialPass {
        let mut partial = PartialPass::new(self.net);
        for input in data {
            partial.squared_error_sum += self.backprop_sample(
                input,
                &mut partial.buffers,
                &mut partial.gradients,
            );
        }
        partial
    }

}

/// Computes the regularized cost and its gradients over every patch in `data`.
///
/// The net is only read; no update step is taken.
pub fn compute_pass(
    net: &SparseAutoencoder,
    data: &PatchSet,
    config: &AutoencoderConfig,
    options: &PassOptions,
) -> Result<PassOutput, PassError> {

    check_shapes(net, data, config)?;

    if let Some(ref multi_threading) = options.multi_threading {

        let worker_threads = multi_threading.worker_threads
            .unwrap_or_else(num_cpus::get)
            .min(data.num_rows())
            .max(1);

        compute_pass_multi_threaded(net, data, config, options.error_fn, worker_threads)

    } else {

        Ok(compute_pass_single_threaded(net, data, config, options.error_fn))

    }
}

fn check_shapes(
    net: &SparseAutoencoder,
    data: &PatchSet,
    config: &AutoencoderConfig,
) -> Result<(), ShapeError> {
    let expected_data = (config.sample_count, config.visible_size);
    let actual_data = (data.num_rows(), data.num_cols());
    if actual_data != expected_data {
        return Err(ShapeError::Mismatch("patches", expected_data, actual_data));
    }
    let expected_w1 = (config.hidden_size, config.visible_size);
    if net.w1().shape() != expected_w1 {
        return Err(ShapeError::Mismatch("W1", expected_w1, net.w1().shape()));
    }
    Ok(())
}

/// Turns the phase 1 activation sum into `rho_hat`, warning about units whose mean activation
/// sits at 0 or 1.
fn mean_activation(rho_sum: &[f32], sample_count: usize) -> Vec<f32> {
    let mut rho_hat = vec![0f32; rho_sum.len()];
    linalg::divide_scalar(rho_sum, &mut rho_hat, sample_count as f32);
    let degenerate: Vec<usize> = rho_hat.iter()
        .enumerate()
        .filter(|&(_, &r)| SparsityFn::is_degenerate(r))
        .map(|(unit, _)| unit)
        .collect();
    if !degenerate.is_empty() {
        log::warn!(
            "mean activation of hidden units {:?} is outside (0, 1); sparsity terms will not be finite",
            degenerate
        );
    }
    rho_hat
}

fn log_last_sample(buffers: &PassBuffers) {
    log::debug!("last sample z2: {:?}", buffers.z2);
    log::debug!("last sample a2: {:?}", buffers.a2);
    log::debug!("last sample z3: {:?}", buffers.z3);
    log::debug!("last sample a3: {:?}", buffers.a3);
}
