//! RMSE of an agent's estimates against analytical ground truth

use nalgebra::storage::RawStorage;
use nalgebra::{DMatrix, DVector, Dim, Matrix};
use serde::{Deserialize, Serialize};

use linear_sf_core::{Agent, AgentCapabilities, MarkovModel, RLError, Result};

use crate::solver::GroundTruth;

/// Action queried for every state; the chains evaluated here have one action
const EVAL_ACTION: usize = 0;

/// Root mean square error `sqrt(mean((a - b)²))`, element-wise
///
/// Vectors and matrices are both accepted, but the two operands must have the
/// same shape.
pub fn compute_rmse<R1, C1, S1, R2, C2, S2>(
    a: &Matrix<f64, R1, C1, S1>,
    b: &Matrix<f64, R2, C2, S2>,
) -> Result<f64>
where
    R1: Dim,
    C1: Dim,
    S1: RawStorage<f64, R1, C1>,
    R2: Dim,
    C2: Dim,
    S2: RawStorage<f64, R2, C2>,
{
    if a.shape() != b.shape() {
        return Err(RLError::shape(a.shape(), b.shape()));
    }
    if a.is_empty() {
        return Err(RLError::Computation("RMSE of empty inputs".to_string()));
    }

    let squared: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = squared / a.len() as f64;
    Ok(mean.sqrt())
}

/// RMSE of the agent's value estimates over all non-terminal states
pub fn evaluate_value_rmse<M, A>(model: &M, agent: &A, true_v: &DVector<f64>) -> Result<f64>
where
    M: MarkovModel + ?Sized,
    A: Agent + ?Sized,
{
    Evaluator::new(model)?.value_rmse(agent, true_v)
}

/// RMSE of the agent's successor-return estimates over all non-terminal
/// states, `None` when the agent has no successor-return query
pub fn evaluate_successor_return_rmse<M, A>(
    model: &M,
    agent: &A,
    true_v: &DVector<f64>,
) -> Result<Option<f64>>
where
    M: MarkovModel + ?Sized,
    A: Agent + ?Sized,
{
    Evaluator::new(model)?.successor_return_rmse(agent, true_v)
}

/// RMSE of `Φ · Ws` against the true successor-feature matrix
///
/// Only the parameters of action 0 are read, so this is meaningful for
/// single-action agents only.
pub fn evaluate_sf_matrix_rmse<M, A>(model: &M, agent: &A, true_sf: &DMatrix<f64>) -> Result<f64>
where
    M: MarkovModel + ?Sized,
    A: Agent + ?Sized,
{
    Evaluator::new(model)?.sf_matrix_rmse(agent, true_sf)
}

/// RMSE of `Φ · Wr` against the true reward vector
pub fn evaluate_reward_rmse<M, A>(model: &M, agent: &A, true_r: &DVector<f64>) -> Result<f64>
where
    M: MarkovModel + ?Sized,
    A: Agent + ?Sized,
{
    Evaluator::new(model)?.reward_rmse(agent, true_r)
}

/// All RMSE figures that apply to an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// What the agent exposed when it was evaluated
    pub capabilities: AgentCapabilities,
    /// Value estimates vs. `V`
    pub value_rmse: f64,
    /// Successor returns vs. `V`
    pub successor_return_rmse: Option<f64>,
    /// `Φ · Ws[0]` vs. `SF`
    pub sf_matrix_rmse: Option<f64>,
    /// `Φ · Wr` vs. `R`
    pub reward_rmse: Option<f64>,
}

/// Evaluates agents against one model
///
/// The model's feature matrix is read once at construction and reused for
/// every state and every agent.
#[derive(Debug, Clone)]
pub struct Evaluator {
    features: DMatrix<f64>,
    rewards: DVector<f64>,
}

impl Evaluator {
    /// Capture the model's feature matrix and reward vector
    pub fn new<M: MarkovModel + ?Sized>(model: &M) -> Result<Self> {
        let n = model.num_states();
        let features = model.feature_matrix();
        if features.nrows() != n {
            return Err(RLError::shape((n, features.ncols()), features.shape()));
        }

        Ok(Self {
            features,
            rewards: model.reward_function(),
        })
    }

    /// Number of states evaluated
    #[must_use]
    pub fn num_states(&self) -> usize {
        self.features.nrows()
    }

    /// Query `estimate` with the feature row of every state
    fn per_state<F>(&self, mut estimate: F) -> Result<DVector<f64>>
    where
        F: FnMut(&DVector<f64>) -> Result<f64>,
    {
        let estimates = self
            .features
            .row_iter()
            .map(|row| estimate(&row.transpose()))
            .collect::<Result<Vec<_>>>()?;
        Ok(DVector::from_vec(estimates))
    }

    /// See [`evaluate_value_rmse`]
    pub fn value_rmse<A: Agent + ?Sized>(&self, agent: &A, true_v: &DVector<f64>) -> Result<f64> {
        let estimates = self.per_state(|phi| agent.q_value(phi, EVAL_ACTION))?;
        compute_rmse(&estimates, true_v)
    }

    /// See [`evaluate_successor_return_rmse`]
    pub fn successor_return_rmse<A: Agent + ?Sized>(
        &self,
        agent: &A,
        true_v: &DVector<f64>,
    ) -> Result<Option<f64>> {
        let Some(query) = agent.as_successor_return() else {
            return Ok(None);
        };
        let estimates = self.per_state(|phi| query.successor_return(phi, EVAL_ACTION))?;
        compute_rmse(&estimates, true_v).map(Some)
    }

    /// See [`evaluate_sf_matrix_rmse`]
    pub fn sf_matrix_rmse<A: Agent + ?Sized>(
        &self,
        agent: &A,
        true_sf: &DMatrix<f64>,
    ) -> Result<f64> {
        let ws = agent
            .sf_params()
            .and_then(|params| params.get(EVAL_ACTION))
            .ok_or(RLError::MissingCapability("successor feature parameters"))?;
        if ws.nrows() != self.features.ncols() {
            return Err(RLError::shape((self.features.ncols(), ws.ncols()), ws.shape()));
        }

        compute_rmse(&(&self.features * ws), true_sf)
    }

    /// See [`evaluate_reward_rmse`]
    pub fn reward_rmse<A: Agent + ?Sized>(&self, agent: &A, true_r: &DVector<f64>) -> Result<f64> {
        let wr = agent
            .reward_params()
            .ok_or(RLError::MissingCapability("reward parameters"))?;
        if wr.len() != self.features.ncols() {
            return Err(RLError::shape((self.features.ncols(), 1), (wr.len(), 1)));
        }

        compute_rmse(&(&self.features * wr), true_r)
    }

    /// Every RMSE the agent's capabilities allow
    ///
    /// Value and successor returns are compared with `truth.value_function`,
    /// `Φ · Ws[0]` with `truth.successor_features` and `Φ · Wr` with the
    /// model's reward vector.
    pub fn evaluate<A: Agent + ?Sized>(
        &self,
        agent: &A,
        truth: &GroundTruth,
    ) -> Result<EvaluationReport> {
        let capabilities = agent.capabilities();

        let report = EvaluationReport {
            capabilities,
            value_rmse: self.value_rmse(agent, &truth.value_function)?,
            successor_return_rmse: self.successor_return_rmse(agent, &truth.value_function)?,
            sf_matrix_rmse: capabilities
                .sf_params
                .then(|| self.sf_matrix_rmse(agent, &truth.successor_features))
                .transpose()?,
            reward_rmse: capabilities
                .reward_params
                .then(|| self.reward_rmse(agent, &self.rewards))
                .transpose()?,
        };
        tracing::debug!(
            value_rmse = report.value_rmse,
            successor_return_rmse = ?report.successor_return_rmse,
            sf_matrix_rmse = ?report.sf_matrix_rmse,
            reward_rmse = ?report.reward_rmse,
            "evaluated agent"
        );

        Ok(report)
    }
}
