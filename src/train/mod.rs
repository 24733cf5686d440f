mod backprop;
mod buffers;
mod finalize;
mod forward;
mod gradients;
mod task;

pub use self::{
    backprop::{MultithreadingOptions, PassOptions},
    finalize::PassOutput,
    task::{PassError, PassTask},
};
