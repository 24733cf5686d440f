use crate::func::{SparsityFn, WeightDecay};

pub const DEFAULT_PATCH_SIZE: usize = 8;
pub const DEFAULT_SAMPLE_COUNT: usize = 10000;
pub const DEFAULT_VISIBLE_SIZE: usize = DEFAULT_PATCH_SIZE * DEFAULT_PATCH_SIZE;
pub const DEFAULT_HIDDEN_SIZE: usize = 25;
pub const DEFAULT_SPARSITY_TARGET: f32 = 0.01;
pub const DEFAULT_WEIGHT_DECAY: f32 = 0.0001;
pub const DEFAULT_SPARSITY_WEIGHT: f32 = 3.0;

/// Dimensions and hyper-parameters of one sparse autoencoder gradient pass.
///
/// `patch_size` is the side length of a square patch, so `visible_size` must equal
/// `patch_size * patch_size`.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(pattern = "owned", build_fn(validate = "Self::validate"))]
pub struct AutoencoderConfig {
    #[builder(default = "DEFAULT_PATCH_SIZE")]
    pub patch_size: usize,
    #[builder(default = "DEFAULT_SAMPLE_COUNT")]
    pub sample_count: usize,
    #[builder(default = "DEFAULT_VISIBLE_SIZE")]
    pub visible_size: usize,
    #[builder(default = "DEFAULT_HIDDEN_SIZE")]
    pub hidden_size: usize,
    /// Desired mean activation of each hidden unit (rho).
    #[builder(default = "DEFAULT_SPARSITY_TARGET")]
    pub sparsity_target: f32,
    /// L2 regularization coefficient (lambda).
    #[builder(default = "DEFAULT_WEIGHT_DECAY")]
    pub weight_decay: f32,
    /// Weight of the sparsity penalty term (beta).
    #[builder(default = "DEFAULT_SPARSITY_WEIGHT")]
    pub sparsity_weight: f32,
}

impl AutoencoderConfigBuilder {

    fn validate(&self) -> Result<(), String> {
        let patch_size = self.patch_size.unwrap_or(DEFAULT_PATCH_SIZE);
        let sample_count = self.sample_count.unwrap_or(DEFAULT_SAMPLE_COUNT);
        let visible_size = self.visible_size.unwrap_or(DEFAULT_VISIBLE_SIZE);
        let hidden_size = self.hidden_size.unwrap_or(DEFAULT_HIDDEN_SIZE);
        let sparsity_target = self.sparsity_target.unwrap_or(DEFAULT_SPARSITY_TARGET);
        let weight_decay = self.weight_decay.unwrap_or(DEFAULT_WEIGHT_DECAY);
        let sparsity_weight = self.sparsity_weight.unwrap_or(DEFAULT_SPARSITY_WEIGHT);

        if patch_size == 0 || sample_count == 0 || visible_size == 0 || hidden_size == 0 {
            return Err("patch_size, sample_count, visible_size and hidden_size must be non-zero".to_string());
        }
        if visible_size != patch_size * patch_size {
            return Err(format!(
                "visible_size {} does not match a {}x{} patch",
                visible_size, patch_size, patch_size
            ));
        }
        if !(sparsity_target > 0.0 && sparsity_target < 1.0) {
            return Err(format!("sparsity_target {} must lie in (0, 1)", sparsity_target));
        }
        if !(weight_decay >= 0.0) {
            return Err(format!("weight_decay {} must be non-negative", weight_decay));
        }
        if !(sparsity_weight >= 0.0) {
            return Err(format!("sparsity_weight {} must be non-negative", sparsity_weight));
        }
        Ok(())
    }

}

impl AutoencoderConfig {

    pub fn sparsity_fn(&self) -> SparsityFn {
        SparsityFn::new(self.sparsity_target, self.sparsity_weight)
    }

    pub fn weight_decay_fn(&self) -> WeightDecay {
        WeightDecay(self.weight_decay)
    }

}

impl Default for AutoencoderConfig {
    fn default() -> Self {
        AutoencoderConfig {
            patch_size: DEFAULT_PATCH_SIZE,
            sample_count: DEFAULT_SAMPLE_COUNT,
            visible_size: DEFAULT_VISIBLE_SIZE,
            hidden_size: DEFAULT_HIDDEN_SIZE,
            sparsity_target: DEFAULT_SPARSITY_TARGET,
            weight_decay: DEFAULT_WEIGHT_DECAY,
            sparsity_weight: DEFAULT_SPARSITY_WEIGHT,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AutoencoderConfigBuilder::default().build().unwrap();
        assert_eq!(config, AutoencoderConfig::default());
        assert_eq!(config.visible_size, 64);
        assert_eq!(config.hidden_size, 25);
        assert_eq!(config.sample_count, 10000);
    }

    #[test]
    fn test_small_config() {
        let config = AutoencoderConfigBuilder::default()
            .patch_size(2)
            .visible_size(4)
            .hidden_size(2)
            .sample_count(1)
            .build()
            .unwrap();
        assert_eq!(config.sparsity_fn(), SparsityFn::new(0.01, 3.0));
        assert_eq!(config.weight_decay_fn(), WeightDecay(0.0001));
    }

    #[test]
    fn test_validation() {
        assert!(AutoencoderConfigBuilder::default().patch_size(2).build().is_err());
        assert!(AutoencoderConfigBuilder::default().hidden_size(0).build().is_err());
        assert!(AutoencoderConfigBuilder::default().sparsity_target(1.0).build().is_err());
        assert!(AutoencoderConfigBuilder::default().sparsity_target(0.0).build().is_err());
        assert!(AutoencoderConfigBuilder::default().weight_decay(-1.0).build().is_err());
        assert!(AutoencoderConfigBuilder::default().sparsity_weight(std::f32::NAN).build().is_err());
        assert!(AutoencoderConfigBuilder::default().weight_decay(0.0).sparsity_weight(0.0).build().is_ok());
    }

}
