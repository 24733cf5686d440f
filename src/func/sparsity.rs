use crate::linalg;

/// KL-divergence sparsity penalty pulling each hidden unit's mean activation `rho_hat`
/// towards `target`, weighted by `weight` (beta).
///
/// A `rho_hat` component of exactly 0 or 1 yields an infinite or NaN term. This is left to
/// propagate; callers decide whether to report it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SparsityFn {
    pub target: f32,
    pub weight: f32,
}

impl SparsityFn {

    pub fn new(target: f32, weight: f32) -> Self {
        SparsityFn { target, weight }
    }

    /// `KL(ρ || ρ̂) = ρ·ln(ρ/ρ̂) + (1-ρ)·ln((1-ρ)/(1-ρ̂))`, per hidden unit.
    pub fn penalty_into(&self, rho_hat: &[f32], penalty: &mut [f32]) {
        assert_eq!(rho_hat.len(), penalty.len());
        let rho = self.target;
        let n = rho_hat.len();
        let complement = complement_of(rho_hat);
        let mut ratio = vec![0f32; n];
        let mut log_ratio = vec![0f32; n];

        let mut active = vec![0f32; n];
        linalg::divide(&vec![rho; n], rho_hat, &mut ratio);
        linalg::log(&ratio, &mut log_ratio);
        linalg::multiply_scalar(&log_ratio, &mut active, rho);

        let mut inactive = vec![0f32; n];
        linalg::divide(&vec![1.0 - rho; n], &complement, &mut ratio);
        linalg::log(&ratio, &mut log_ratio);
        linalg::multiply_scalar(&log_ratio, &mut inactive, 1.0 - rho);

        linalg::add(&active, &inactive, penalty);
    }

    /// Derivative of the weighted penalty with respect to `ρ̂`, `β·(-ρ/ρ̂ + (1-ρ)/(1-ρ̂))`.
    pub fn gradient_term_into(&self, rho_hat: &[f32], term: &mut [f32]) {
        assert_eq!(rho_hat.len(), term.len());
        let rho = self.target;
        let n = rho_hat.len();
        let complement = complement_of(rho_hat);

        let mut attraction = vec![rho; n];
        linalg::divide_assign(&mut attraction, rho_hat);
        let mut repulsion = vec![1.0 - rho; n];
        linalg::divide_assign(&mut repulsion, &complement);

        linalg::subtract(&repulsion, &attraction, term);
        linalg::scale(term, self.weight);
    }

    /// `β·Σ penalty`
    pub fn get_cost(&self, penalty: &[f32]) -> f32 {
        self.weight * linalg::sum(penalty)
    }

    pub fn is_degenerate(r: f32) -> bool {
        !(r > 0.0 && r < 1.0)
    }

}

/// `1 - v`
fn complement_of(v: &[f32]) -> Vec<f32> {
    let mut complement = vec![1f32; v.len()];
    linalg::subtract_assign(&mut complement, v);
    complement
}
