//! Closed-form solutions for single-action Markov chains
//!
//! Every quantity is derived from the structural matrices of a
//! [`MarkovModel`]: the transition matrix `P` over non-terminal states, the
//! expected reward vector `R` and the feature matrix `Φ`. With
//! `C = I - γP`:
//!
//! * value function `V = C⁻¹ R`
//! * successor features `SF = C⁻¹ Φ`
//! * linear successor-feature parameters `Z = (Φᵀ C Φ)⁻¹ (Φᵀ Φ)`
//! * linear reward parameters `Wr = (Φᵀ Φ)⁻¹ Φᵀ R`
//!
//! `C` is invertible whenever `γ < 1`, and also for `γ = 1` on chains whose
//! rows of `P` leak probability into terminal states, as the random walk
//! chain does. Nothing here falls back to a pseudo-inverse; singular systems
//! are reported as [`RLError::SingularMatrix`].

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use linear_sf_core::{MarkovModel, RLError, Result};

use crate::linalg::invert;

/// Structural matrices of a model, read once and shape-checked
struct Structure {
    transitions: DMatrix<f64>,
    rewards: DVector<f64>,
    features: DMatrix<f64>,
}

impl Structure {
    fn of<M: MarkovModel + ?Sized>(model: &M) -> Result<Self> {
        let n = model.num_states();
        let transitions = model.transition_matrix();
        let rewards = model.reward_function();
        let features = model.feature_matrix();

        if transitions.shape() != (n, n) {
            return Err(RLError::shape((n, n), transitions.shape()));
        }
        if rewards.len() != n {
            return Err(RLError::shape((n, 1), (rewards.len(), 1)));
        }
        if features.nrows() != n {
            return Err(RLError::shape((n, features.ncols()), features.shape()));
        }

        Ok(Self {
            transitions,
            rewards,
            features,
        })
    }

    /// `I - γP`
    fn discounted(&self, gamma: f64) -> DMatrix<f64> {
        let n = self.transitions.nrows();
        DMatrix::identity(n, n) - &self.transitions * gamma
    }

    /// `(I - γP)⁻¹`
    fn discounted_inverse(&self, gamma: f64) -> Result<DMatrix<f64>> {
        invert(self.discounted(gamma), "I - gamma * P")
    }

    fn linear_sf_param(&self, gamma: f64) -> Result<DMatrix<f64>> {
        let phi_t = self.features.transpose();
        let projected = &phi_t * self.discounted(gamma) * &self.features;
        Ok(invert(projected, "Phi^T (I - gamma * P) Phi")? * (&phi_t * &self.features))
    }

    fn linear_reward_param(&self) -> Result<DVector<f64>> {
        let phi_t = self.features.transpose();
        let gram = invert(&phi_t * &self.features, "Phi^T Phi")?;
        Ok(gram * phi_t * &self.rewards)
    }
}

fn check_gamma(gamma: f64) -> Result<()> {
    if gamma.is_finite() && gamma >= 0.0 {
        Ok(())
    } else {
        Err(RLError::InvalidConfig(format!(
            "discount factor must be finite and non-negative, got {gamma}"
        )))
    }
}

/// Exact value function `V = (I - γP)⁻¹ R`, one entry per non-terminal state
pub fn solve_value_function<M: MarkovModel + ?Sized>(
    model: &M,
    gamma: f64,
) -> Result<DVector<f64>> {
    check_gamma(gamma)?;
    let structure = Structure::of(model)?;
    tracing::debug!(n_states = model.num_states(), gamma, "solving value function");

    Ok(structure.discounted_inverse(gamma)? * &structure.rewards)
}

/// Exact successor-feature matrix `SF = (I - γP)⁻¹ Φ`
///
/// Row `i` is the expected discounted sum of future feature vectors starting
/// from state `i`, the current state included.
pub fn solve_successor_features<M: MarkovModel + ?Sized>(
    model: &M,
    gamma: f64,
) -> Result<DMatrix<f64>> {
    check_gamma(gamma)?;
    let structure = Structure::of(model)?;
    tracing::debug!(n_states = model.num_states(), gamma, "solving successor features");

    Ok(structure.discounted_inverse(gamma)? * &structure.features)
}

/// Best linear successor-feature parameters `Z = (Φᵀ(I - γP)Φ)⁻¹ (ΦᵀΦ)`
///
/// Fails when the projected system is singular, e.g. when `Φ` does not have
/// full column rank.
pub fn solve_linear_sf_param<M: MarkovModel + ?Sized>(
    model: &M,
    gamma: f64,
) -> Result<DMatrix<f64>> {
    check_gamma(gamma)?;
    let structure = Structure::of(model)?;
    tracing::debug!(
        feature_dim = structure.features.ncols(),
        gamma,
        "solving linear SF parameters"
    );

    structure.linear_sf_param(gamma)
}

/// Least-squares reward parameters `Wr = (ΦᵀΦ)⁻¹ Φᵀ R`
pub fn solve_linear_reward_param<M: MarkovModel + ?Sized>(model: &M) -> Result<DVector<f64>> {
    let structure = Structure::of(model)?;
    tracing::debug!(feature_dim = structure.features.ncols(), "solving linear reward parameters");

    structure.linear_reward_param()
}

/// All analytical quantities of a model for one discount factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruth {
    /// Discount factor the quantities were solved for
    pub gamma: f64,
    /// `V`, length `N`
    pub value_function: DVector<f64>,
    /// `SF`, `N x d`
    pub successor_features: DMatrix<f64>,
    /// `Z`, `d x d`
    pub linear_sf_param: DMatrix<f64>,
    /// `Wr`, length `d`
    pub linear_reward_param: DVector<f64>,
}

impl GroundTruth {
    /// Solve everything at once, reading the model's matrices and inverting
    /// `I - γP` a single time
    pub fn solve<M: MarkovModel + ?Sized>(model: &M, gamma: f64) -> Result<Self> {
        check_gamma(gamma)?;
        let structure = Structure::of(model)?;
        let resolvent = structure.discounted_inverse(gamma)?;

        let truth = Self {
            gamma,
            value_function: &resolvent * &structure.rewards,
            successor_features: &resolvent * &structure.features,
            linear_sf_param: structure.linear_sf_param(gamma)?,
            linear_reward_param: structure.linear_reward_param()?,
        };
        tracing::debug!(
            n_states = model.num_states(),
            feature_dim = structure.features.ncols(),
            gamma,
            "solved ground truth"
        );

        Ok(truth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use linear_sf_env::RandomWalkChain;

    /// Chain with hand-written matrices, for shapes the random walk never has
    struct Fixed {
        p: DMatrix<f64>,
        r: DVector<f64>,
        phi: DMatrix<f64>,
    }

    impl MarkovModel for Fixed {
        fn num_states(&self) -> usize {
            self.p.nrows()
        }

        fn transition_matrix(&self) -> DMatrix<f64> {
            self.p.clone()
        }

        fn reward_function(&self) -> DVector<f64> {
            self.r.clone()
        }

        fn feature_matrix(&self) -> DMatrix<f64> {
            self.phi.clone()
        }
    }

    #[test]
    fn test_value_function_undiscounted() {
        let env = RandomWalkChain::with_seed(0);
        let v = solve_value_function(&env, 1.0).unwrap();

        assert_eq!(v.len(), 19);
        for (i, value) in v.iter().enumerate() {
            assert_abs_diff_eq!(*value, (i + 1) as f64 / 20.0, epsilon = 1e-6);
        }
        assert!(v.as_slice().windows(2).all(|w| w[0] < w[1]));
        assert_abs_diff_eq!(v[9], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(v[18], 0.95, epsilon = 1e-6);
        assert!(v[18] < 1.0);
    }

    #[test]
    fn test_value_function_discounted_bellman() {
        let env = RandomWalkChain::with_seed(0);
        let gamma = 0.9;
        let v = solve_value_function(&env, gamma).unwrap();
        let bellman = env.reward_function() + env.transition_matrix() * &v * gamma;
        assert_relative_eq!(v, bellman, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_discount_successor_features_are_features() {
        let env = RandomWalkChain::with_seed(0);
        let sf = solve_successor_features(&env, 0.0).unwrap();
        assert_eq!(sf, env.feature_matrix());
    }

    #[test]
    fn test_successor_features_reproduce_value() {
        let env = RandomWalkChain::with_seed(0);
        let gamma = 0.95;
        let sf = solve_successor_features(&env, gamma).unwrap();
        let wr = solve_linear_reward_param(&env).unwrap();
        let v = solve_value_function(&env, gamma).unwrap();
        assert_relative_eq!(sf * wr, v, epsilon = 1e-10);
    }

    #[test]
    fn test_tabular_linear_params() {
        let env = RandomWalkChain::with_seed(0);
        let gamma = 0.8;

        // With one-hot features the projections are exact
        let z = solve_linear_sf_param(&env, gamma).unwrap();
        let sf = solve_successor_features(&env, gamma).unwrap();
        assert_relative_eq!(z, sf, epsilon = 1e-10);

        let wr = solve_linear_reward_param(&env).unwrap();
        assert_relative_eq!(wr, env.reward_function(), epsilon = 1e-12);
    }

    #[test]
    fn test_ground_truth_matches_individual_solves() {
        let env = RandomWalkChain::with_seed(0);
        let truth = GroundTruth::solve(&env, 0.9).unwrap();

        assert_relative_eq!(truth.value_function, solve_value_function(&env, 0.9).unwrap());
        assert_relative_eq!(
            truth.successor_features,
            solve_successor_features(&env, 0.9).unwrap()
        );
        assert_relative_eq!(truth.linear_sf_param, solve_linear_sf_param(&env, 0.9).unwrap());
        assert_relative_eq!(truth.linear_reward_param, solve_linear_reward_param(&env).unwrap());
    }

    #[test]
    fn test_aggregated_features() {
        // Two states sharing one feature: the projection averages them
        let model = Fixed {
            p: DMatrix::from_row_slice(2, 2, &[0.0, 0.5, 0.5, 0.0]),
            r: DVector::from_vec(vec![0.0, 1.0]),
            phi: DMatrix::from_element(2, 1, 1.0),
        };

        let wr = solve_linear_reward_param(&model).unwrap();
        assert_abs_diff_eq!(wr[0], 0.5, epsilon = 1e-12);

        // Φᵀ C Φ = 2 - γ, ΦᵀΦ = 2
        let z = solve_linear_sf_param(&model, 0.5).unwrap();
        assert_abs_diff_eq!(z[(0, 0)], 2.0 / 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_resolvent() {
        // A closed, fully stochastic chain has no discounting left at γ = 1
        let model = Fixed {
            p: DMatrix::identity(3, 3),
            r: DVector::zeros(3),
            phi: DMatrix::identity(3, 3),
        };

        assert!(matches!(
            solve_value_function(&model, 1.0),
            Err(RLError::SingularMatrix { .. })
        ));
        assert!(matches!(
            solve_successor_features(&model, 1.0),
            Err(RLError::SingularMatrix { .. })
        ));
        assert!(matches!(
            solve_linear_sf_param(&model, 1.0),
            Err(RLError::SingularMatrix { .. })
        ));
        assert!(GroundTruth::solve(&model, 1.0).is_err());
        assert!(solve_value_function(&model, 0.5).is_ok());
    }

    #[test]
    fn test_rank_deficient_features() {
        let model = Fixed {
            p: DMatrix::zeros(3, 3),
            r: DVector::from_vec(vec![1.0, 0.0, 0.0]),
            phi: DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 0.0, 0.0, 2.0, 2.0]),
        };

        assert!(matches!(
            solve_linear_reward_param(&model),
            Err(RLError::SingularMatrix { context }) if context == "Phi^T Phi"
        ));
        assert!(matches!(
            solve_linear_sf_param(&model, 0.9),
            Err(RLError::SingularMatrix { .. })
        ));
        // The resolvent itself is fine
        assert!(solve_value_function(&model, 0.9).is_ok());
    }

    #[test]
    fn test_inconsistent_model_shapes() {
        let model = Fixed {
            p: DMatrix::zeros(3, 3),
            r: DVector::zeros(2),
            phi: DMatrix::identity(3, 3),
        };
        assert!(matches!(
            solve_value_function(&model, 0.9),
            Err(RLError::ShapeMismatch { expected: (3, 1), actual: (2, 1) })
        ));
    }

    #[test]
    fn test_invalid_gamma() {
        let env = RandomWalkChain::with_seed(0);
        assert!(matches!(
            solve_value_function(&env, f64::NAN),
            Err(RLError::InvalidConfig(_))
        ));
        assert!(matches!(
            solve_successor_features(&env, -0.1),
            Err(RLError::InvalidConfig(_))
        ));
    }
}
