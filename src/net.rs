use crate::{
    buffer::{Matrix, ShapeError},
    config::AutoencoderConfig,
    func::ActivationFn,
    initializer::RandomNetInitializer,
    linalg,
};

/// Parameters of a single-hidden-layer autoencoder.
///
/// `w1` is `hidden x visible` and maps a patch to the hidden layer, `w2` is `visible x hidden`
/// and maps back. Biases start at zero. A gradient pass only reads these.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseAutoencoder {
    visible_size: usize,
    hidden_size: usize,
    w1: Matrix,
    w2: Matrix,
    b1: Vec<f32>,
    b2: Vec<f32>,
    activation_fn: ActivationFn,
}

impl SparseAutoencoder {

    pub fn new_random(config: &AutoencoderConfig, w1_seed: &str, w2_seed: &str) -> Self {
        let w1 = RandomNetInitializer::new_with_seed(w1_seed)
            .new_weights(config.hidden_size, config.visible_size);
        let w2 = RandomNetInitializer::new_with_seed(w2_seed)
            .new_weights(config.visible_size, config.hidden_size);
        Self::new_unchecked(w1, w2)
    }

    pub fn from_weights(config: &AutoencoderConfig, w1: Matrix, w2: Matrix) -> Result<Self, ShapeError> {
        let hidden_by_visible = (config.hidden_size, config.visible_size);
        let visible_by_hidden = (config.visible_size, config.hidden_size);
        if w1.shape() != hidden_by_visible {
            return Err(ShapeError::Mismatch("W1", hidden_by_visible, w1.shape()));
        }
        if w2.shape() != visible_by_hidden {
            return Err(ShapeError::Mismatch("W2", visible_by_hidden, w2.shape()));
        }
        Ok(Self::new_unchecked(w1, w2))
    }

    fn new_unchecked(w1: Matrix, w2: Matrix) -> Self {
        let (hidden_size, visible_size) = w1.shape();
        SparseAutoencoder {
            visible_size,
            hidden_size,
            w1,
            w2,
            b1: vec![0.0; hidden_size],
            b2: vec![0.0; visible_size],
            activation_fn: ActivationFn::standard_logistic_sigmoid(),
        }
    }

    #[cfg(test)]
    pub fn with_biases(mut self, b1: Vec<f32>, b2: Vec<f32>) -> Result<Self, ShapeError> {
        if b1.len() != self.hidden_size {
            return Err(ShapeError::Mismatch("b1", (self.hidden_size, 1), (b1.len(), 1)));
        }
        if b2.len() != self.visible_size {
            return Err(ShapeError::Mismatch("b2", (self.visible_size, 1), (b2.len(), 1)));
        }
        self.b1 = b1;
        self.b2 = b2;
        Ok(self)
    }

    /// `z2 = W1·x + b1`, `a2 = f(z2)`
    pub fn forward_hidden(&self, input: &[f32], z2: &mut [f32], a2: &mut [f32]) {
        linalg::matrix_vector_product(&self.w1, input, z2);
        linalg::add_assign(z2, &self.b1);
        self.activation_fn.activate(z2, a2);
    }

    /// `z3 = W2·a2 + b2`, `a3 = f(z3)`
    pub fn forward_output(&self, a2: &[f32], z3: &mut [f32], a3: &mut [f32]) {
        linalg::matrix_vector_product(&self.w2, a2, z3);
        linalg::add_assign(z3, &self.b2);
        self.activation_fn.activate(z3, a3);
    }

    pub fn reconstruct(&self, input: &[f32]) -> Vec<f32> {
        let mut z2 = vec![0f32; self.hidden_size];
        let mut a2 = vec![0f32; self.hidden_size];
        let mut z3 = vec![0f32; self.visible_size];
        let mut a3 = vec![0f32; self.visible_size];
        self.forward_hidden(input, &mut z2, &mut a2);
        self.forward_output(&a2, &mut z3, &mut a3);
        a3
    }

    #[inline]
    pub fn visible_size(&self) -> usize {
        self.visible_size
    }

    #[inline]
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    #[inline]
    pub fn w1(&self) -> &Matrix {
        &self.w1
    }

    #[inline]
    pub fn w2(&self) -> &Matrix {
        &self.w2
    }

    #[inline]
    pub fn activation_fn(&self) -> ActivationFn {
        self.activation_fn
    }

}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::AutoencoderConfigBuilder;

    fn small_config() -> AutoencoderConfig {
        AutoencoderConfigBuilder::default()
            .patch_size(2)
            .visible_size(4)
            .hidden_size(2)
            .sample_count(1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_from_weights_checks_shapes() {
        let config = small_config();
        let ok = SparseAutoencoder::from_weights(&config, Matrix::zeroed(2, 4), Matrix::zeroed(4, 2));
        assert!(ok.is_ok());
        assert_eq!(
            SparseAutoencoder::from_weights(&config, Matrix::zeroed(4, 2), Matrix::zeroed(4, 2)),
            Err(ShapeError::Mismatch("W1", (2, 4), (4, 2)))
        );
        assert_eq!(
            SparseAutoencoder::from_weights(&config, Matrix::zeroed(2, 4), Matrix::zeroed(2, 4)),
            Err(ShapeError::Mismatch("W2", (4, 2), (2, 4)))
        );
        assert!(ok.unwrap().with_biases(vec![0.0; 3], vec![0.0; 4]).is_err());
    }

    #[test]
    fn test_new_random() {
        let config = small_config();
        let net = SparseAutoencoder::new_random(&config, "W1", "W2");
        assert_eq!(net.w1().shape(), (2, 4));
        assert_eq!(net.w2().shape(), (4, 2));
        assert_eq!(net.b1, vec![0.0, 0.0]);
        assert_eq!(net.b2, vec![0.0; 4]);
        assert_eq!(net, SparseAutoencoder::new_random(&config, "W1", "W2"));
    }

    #[test]
    fn test_forward_pass() {
        let config = small_config();
        let w1 = Matrix::from_vec(2, 4, vec![1., 0., 0., 0., 0., 0., 0., -1.]).unwrap();
        let w2 = Matrix::from_vec(4, 2, vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3, 0.4, -0.4]).unwrap();
        let net = SparseAutoencoder::from_weights(&config, w1, w2).unwrap()
            .with_biases(vec![0.0, 1.0], vec![0.0; 4])
            .unwrap();

        let mut z2 = [0.0; 2];
        let mut a2 = [0.0; 2];
        net.forward_hidden(&[2., 0., 0., 1.], &mut z2, &mut a2);
        assert_eq!(z2, [2.0, 0.0]);
        assert_eq!(a2[1], 0.5);
        assert_eq!(a2[0], linalg::sigmoid_f32(2.0));

        // rows of W2 sum to zero, so equal hidden activations give z3 = 0
        let out = net.reconstruct(&[0., 0., 0., 1.]);
        assert_eq!(out, vec![0.5; 4]);
    }

}
