//! Linear agents with fixed parameters
//!
//! These agents do not learn. They hold parameters produced elsewhere (a
//! learner, a snapshot on disk, or an analytical solution) and answer the
//! evaluation queries of [`Agent`].

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::path::Path;

use linear_sf_core::{Agent, RLError, Result, SuccessorReturn};

fn check_query(
    features: &DVector<f64>,
    action: usize,
    feature_dim: usize,
    num_actions: usize,
) -> Result<()> {
    if features.len() != feature_dim {
        return Err(RLError::shape((feature_dim, 1), (features.len(), 1)));
    }
    if action >= num_actions {
        return Err(RLError::InvalidAction(format!(
            "action {action} out of range for {num_actions} actions"
        )));
    }
    Ok(())
}

fn check_weights(weights: &[DVector<f64>], feature_dim: usize) -> Result<()> {
    if weights.is_empty() {
        return Err(RLError::InvalidConfig("agent needs at least one action".to_string()));
    }
    match weights.iter().find(|w| w.len() != feature_dim) {
        Some(w) => Err(RLError::shape((feature_dim, 1), (w.len(), 1))),
        None => Ok(()),
    }
}

/// Linear value agent: `q(φ, a) = φ · w[a]`
///
/// Exposes the value query only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearValueAgent {
    weights: Vec<DVector<f64>>,
}

impl LinearValueAgent {
    /// Agent with one weight vector per action, all of the same length
    pub fn new(weights: Vec<DVector<f64>>) -> Result<Self> {
        let feature_dim = weights.first().map_or(0, DVector::len);
        check_weights(&weights, feature_dim)?;
        Ok(Self { weights })
    }

    /// Zero weights for `num_actions` actions
    pub fn zeros(num_actions: usize, feature_dim: usize) -> Result<Self> {
        Self::new(vec![DVector::zeros(feature_dim); num_actions])
    }

    /// Weights of each action
    #[must_use]
    pub fn weights(&self) -> &[DVector<f64>] {
        &self.weights
    }
}

impl Agent for LinearValueAgent {
    fn q_value(&self, features: &DVector<f64>, action: usize) -> Result<f64> {
        let feature_dim = self.weights.first().map_or(0, DVector::len);
        check_query(features, action, feature_dim, self.weights.len())?;
        Ok(features.dot(&self.weights[action]))
    }
}

/// Linear successor-feature agent
///
/// Holds per-action value weights `Wq[a]`, per-action successor-feature
/// matrices `Ws[a]` (`d x d`) and one reward vector `Wr`.
///
/// * value query: `φ · Wq[a]`
/// * successor return: `(φᵀ Ws[a]) · Wr`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSfAgent {
    value_weights: Vec<DVector<f64>>,
    sf_params: Vec<DMatrix<f64>>,
    reward_params: DVector<f64>,
}

impl LinearSfAgent {
    /// Agent from explicit parameters
    ///
    /// Every action needs a value vector of length `d` and a `d x d`
    /// successor-feature matrix, where `d` is the length of `reward_params`.
    pub fn new(
        value_weights: Vec<DVector<f64>>,
        sf_params: Vec<DMatrix<f64>>,
        reward_params: DVector<f64>,
    ) -> Result<Self> {
        let agent = Self {
            value_weights,
            sf_params,
            reward_params,
        };
        agent.validate()?;
        tracing::debug!(
            num_actions = agent.num_actions(),
            feature_dim = agent.feature_dim(),
            "created linear SF agent"
        );
        Ok(agent)
    }

    /// Zero-initialised parameters
    pub fn zeros(num_actions: usize, feature_dim: usize) -> Result<Self> {
        Self::new(
            vec![DVector::zeros(feature_dim); num_actions],
            vec![DMatrix::zeros(feature_dim, feature_dim); num_actions],
            DVector::zeros(feature_dim),
        )
    }

    /// Single-action agent whose value weights are implied by its successor
    /// features: `Wq = Ws · Wr`
    pub fn from_successor_features(
        sf_param: DMatrix<f64>,
        reward_params: DVector<f64>,
    ) -> Result<Self> {
        if sf_param.ncols() != reward_params.len() {
            let expected = (sf_param.nrows(), reward_params.len());
            return Err(RLError::shape(expected, sf_param.shape()));
        }
        let value_weights = &sf_param * &reward_params;
        Self::new(vec![value_weights], vec![sf_param], reward_params)
    }

    fn validate(&self) -> Result<()> {
        let d = self.reward_params.len();
        check_weights(&self.value_weights, d)?;
        if self.sf_params.len() != self.value_weights.len() {
            return Err(RLError::InvalidConfig(format!(
                "{} value weight vectors but {} successor feature matrices",
                self.value_weights.len(),
                self.sf_params.len()
            )));
        }
        match self.sf_params.iter().find(|ws| ws.shape() != (d, d)) {
            Some(ws) => Err(RLError::shape((d, d), ws.shape())),
            None => Ok(()),
        }
    }

    /// Number of actions
    #[must_use]
    pub fn num_actions(&self) -> usize {
        self.value_weights.len()
    }

    /// Feature dimensionality `d`
    #[must_use]
    pub fn feature_dim(&self) -> usize {
        self.reward_params.len()
    }

    /// Write the parameters as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read parameters written by [`save`](Self::save)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let agent: Self = serde_json::from_str(&json)?;
        agent.validate()?;
        Ok(agent)
    }
}

impl SuccessorReturn for LinearSfAgent {
    fn successor_return(&self, features: &DVector<f64>, action: usize) -> Result<f64> {
        check_query(features, action, self.feature_dim(), self.num_actions())?;
        // φᵀ Ws, kept as a column vector
        let successor = self.sf_params[action].tr_mul(features);
        Ok(successor.dot(&self.reward_params))
    }
}

impl Agent for LinearSfAgent {
    fn q_value(&self, features: &DVector<f64>, action: usize) -> Result<f64> {
        check_query(features, action, self.feature_dim(), self.num_actions())?;
        Ok(features.dot(&self.value_weights[action]))
    }

    fn as_successor_return(&self) -> Option<&dyn SuccessorReturn> {
        Some(self)
    }

    fn sf_params(&self) -> Option<&[DMatrix<f64>]> {
        Some(&self.sf_params)
    }

    fn reward_params(&self) -> Option<&DVector<f64>> {
        Some(&self.reward_params)
    }
}
