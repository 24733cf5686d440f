use crate::{
    stats::Stats,
    net::SparseAutoencoder,
};

/// Per-sample working memory for one worker. Every field is overwritten for each sample, so
/// nothing carries over between samples except `error_stats`.
pub struct PassBuffers {
    pub z2: Vec<f32>,
    pub a2: Vec<f32>,
    pub z3: Vec<f32>,
    pub a3: Vec<f32>,
    /// `a3 - x`
    pub residual: Vec<f32>,
    /// `a3 ⊙ (1 - a3)`
    pub output_derivative: Vec<f32>,
    pub d3: Vec<f32>,
    /// `W2ᵗ·d3` plus the sparsity term
    pub hidden_error: Vec<f32>,
    /// `a2 ⊙ (1 - a2)`
    pub hidden_derivative: Vec<f32>,
    pub d2: Vec<f32>,
    pub error_stats: Stats,
}

impl PassBuffers {
    pub fn for_net(net: &SparseAutoencoder) -> Self {
        let hidden = net.hidden_size();
        let visible = net.visible_size();
        PassBuffers {
            z2: vec![0f32; hidden],
            a2: vec![0f32; hidden],
            z3: vec![0f32; visible],
            a3: vec![0f32; visible],
            residual: vec![0f32; visible],
            output_derivative: vec![0f32; visible],
            d3: vec![0f32; visible],
            hidden_error: vec![0f32; hidden],
            hidden_derivative: vec![0f32; hidden],
            d2: vec![0f32; hidden],
            error_stats: Stats::new(),
        }
    }
}
