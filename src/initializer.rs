use rand::SeedableRng;
use rand::Rng;
use rand::distributions::Uniform;

use crate::buffer::Matrix;
use crate::utils::stable_hash_seed;

/// Draws weights uniformly from `[-r, r)` with `r = sqrt(6) / sqrt(rows + cols + 1)`.
#[derive(Clone)]
pub struct RandomNetInitializer {
    rng: rand_xorshift::XorShiftRng
}

impl RandomNetInitializer {

    pub fn new_with_seed(val: &str) -> Self {
        let seed_bytes = stable_hash_seed(val);
        RandomNetInitializer {
            rng: rand_xorshift::XorShiftRng::from_seed(seed_bytes)
        }
    }

    pub fn weight_range(rows: usize, cols: usize) -> f32 {
        f32::sqrt(6.0) / f32::sqrt((rows + cols + 1) as f32)
    }

    pub fn initialize_weights(&mut self, weights: &mut Matrix) {
        let r = Self::weight_range(weights.rows(), weights.cols());
        let dist = Uniform::new(-r, r);
        for w in weights.get_buffer_mut() {
            *w = self.rng.sample(&dist);
        }
    }

    pub fn new_weights(&mut self, rows: usize, cols: usize) -> Matrix {
        let mut weights = Matrix::zeroed(rows, cols);
        self.initialize_weights(&mut weights);
        weights
    }

}
