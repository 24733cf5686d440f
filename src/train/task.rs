use std::time::{Duration, SystemTime};

use serde::Serialize;

use crate::{
    buffer::ShapeError,
    config::AutoencoderConfig,
    data::PatchSet,
    net::SparseAutoencoder,
    train::{
        PassOptions,
        PassOutput,
        backprop::compute_pass,
    },
};

quick_error! {
    #[derive(Debug)]
    pub enum PassError {
        ShapeMismatch(err: ShapeError) {
            from()
            description("Input does not match the configured shape")
            display("Input does not match the configured shape: {}", err)
            cause(err)
        }
        WorkerPanicked {
            description("A worker thread panicked")
            display("A worker thread panicked during the gradient pass")
        }
    }
}

/// One timed gradient pass over a patch set.
pub struct PassTask {
    pub task_id: String,
    pub net: SparseAutoencoder,
    pub data_set: PatchSet,
    pub config: AutoencoderConfig,
    pub options: PassOptions,
}

pub struct PassResult {
    pub task_id: String,
    pub output: PassOutput,
    pub elapsed: Duration,
}

/// Flat record of a finished pass, one CSV row.
#[derive(Debug, Serialize)]
pub struct PassSummary {
    pub task_id: String,
    pub cost: f32,
    pub reconstruction_cost: f32,
    pub weight_decay_cost: f32,
    pub sparsity_cost: f32,
    pub samples: u32,
    pub mean_sample_error: f32,
    pub min_sample_error: f32,
    pub max_sample_error: f32,
    pub elapsed_ns: u64,
}

impl PassTask {
    pub fn exec(self) -> Result<PassResult, PassError> {
        let start_time = SystemTime::now();
        log::info!("starting pass {}", self.task_id);
        let output = compute_pass(&self.net, &self.data_set, &self.config, &self.options)?;
        let elapsed = start_time.elapsed().unwrap_or_default();
        log::info!("pass {} finished in {}s", self.task_id, elapsed.as_secs_f32());
        Ok(PassResult {
            task_id: self.task_id,
            output,
            elapsed,
        })
    }
}

impl PassResult {
    pub fn summary(&self) -> PassSummary {
        let output = &self.output;
        PassSummary {
            task_id: self.task_id.clone(),
            cost: output.cost,
            reconstruction_cost: output.cost_terms.reconstruction,
            weight_decay_cost: output.cost_terms.weight_decay,
            sparsity_cost: output.cost_terms.sparsity,
            samples: output.error_stats.count(),
            mean_sample_error: output.error_stats.mean(),
            min_sample_error: output.error_stats.min(),
            max_sample_error: output.error_stats.max(),
            elapsed_ns: self.elapsed.as_nanos() as u64,
        }
    }
}
