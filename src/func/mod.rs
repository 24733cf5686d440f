mod activation;
mod error;
mod sparsity;
mod decay;

pub use self::{
    activation::*,
    error::*,
    sparsity::*,
    decay::*,
};
