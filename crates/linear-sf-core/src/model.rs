//! Structural description of a finite, single-action Markov chain
//!
//! A [`MarkovModel`] exposes the matrices an analytical solver needs: the
//! transition matrix restricted to non-terminal states, the expected one-step
//! reward of each non-terminal state, and the state-to-feature matrix. Terminal
//! states never appear; probability mass flowing into them is simply missing
//! from the rows of `P`, and reward earned on termination is folded into the
//! reward vector as an expectation.

use nalgebra::{DMatrix, DVector};

/// A finite Markov chain described by its structural matrices
pub trait MarkovModel {
    /// Number of non-terminal states `N`
    fn num_states(&self) -> usize;

    /// `N x N` transition matrix over non-terminal states
    fn transition_matrix(&self) -> DMatrix<f64>;

    /// Length `N` expected one-step reward of each non-terminal state
    fn reward_function(&self) -> DVector<f64>;

    /// `N x d` feature matrix; row `i` is the features of state `i`
    fn feature_matrix(&self) -> DMatrix<f64>;

    /// Feature dimensionality `d`
    fn feature_dim(&self) -> usize {
        self.feature_matrix().ncols()
    }
}

impl<M: MarkovModel + ?Sized> MarkovModel for &M {
    fn num_states(&self) -> usize {
        (**self).num_states()
    }

    fn transition_matrix(&self) -> DMatrix<f64> {
        (**self).transition_matrix()
    }

    fn reward_function(&self) -> DVector<f64> {
        (**self).reward_function()
    }

    fn feature_matrix(&self) -> DMatrix<f64> {
        (**self).feature_matrix()
    }

    fn feature_dim(&self) -> usize {
        (**self).feature_dim()
    }
}
