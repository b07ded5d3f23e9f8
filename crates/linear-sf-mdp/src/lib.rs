//! Analytical solvers and evaluators for finite Markov chains
//!
//! [`solver`] derives exact value functions, successor features and linear
//! projection parameters from a [`MarkovModel`](linear_sf_core::MarkovModel)
//! by dense matrix inversion. [`evaluate`] compares an
//! [`Agent`](linear_sf_core::Agent)'s estimates with those quantities.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod evaluate;
pub mod linalg;
pub mod solver;

pub use evaluate::{
    compute_rmse, evaluate_reward_rmse, evaluate_sf_matrix_rmse, evaluate_successor_return_rmse,
    evaluate_value_rmse, EvaluationReport, Evaluator,
};
pub use linalg::{invert, SINGULAR_TOLERANCE};
pub use solver::{
    solve_linear_reward_param, solve_linear_sf_param, solve_successor_features,
    solve_value_function, GroundTruth,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        compute_rmse, solve_linear_reward_param, solve_linear_sf_param, solve_successor_features,
        solve_value_function, Evaluator, GroundTruth,
    };
    pub use linear_sf_core::prelude::*;
}
