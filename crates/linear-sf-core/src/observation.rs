//! Observation representations and observation spaces

use nalgebra::DVector;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for observations from an environment
pub trait Observation: Clone + Debug + Send + Sync {
    /// Convert observation to a feature vector
    fn to_vec(&self) -> Vec<f64>;

    /// Get the shape of the observation
    fn shape(&self) -> Vec<usize>;
}

/// Trait for defining observation spaces
pub trait ObservationSpace: Send + Sync {
    /// The type of observations in this space
    type Observation: Observation;

    /// Sample an observation using the caller's random source
    fn sample(&self, rng: &mut dyn RngCore) -> Self::Observation;

    /// Check if an observation is valid within this space
    fn contains(&self, obs: &Self::Observation) -> bool;

    /// Get the shape of observations in this space
    fn shape(&self) -> Vec<usize>;
}

/// Feature-vector observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorObservation {
    /// The feature vector
    pub data: DVector<f64>,
}

impl VectorObservation {
    /// All-zero observation of the given dimension
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: DVector::zeros(dim),
        }
    }

    /// Whether every component is zero (terminal states have no encoding)
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&x| x == 0.0)
    }

    /// Index of the active component of a one-hot observation
    #[must_use]
    pub fn one_hot_index(&self) -> Option<usize> {
        let mut active = self.data.iter().enumerate().filter(|(_, &x)| x != 0.0);
        match (active.next(), active.next()) {
            (Some((i, &x)), None) if x == 1.0 => Some(i),
            _ => None,
        }
    }
}

impl From<DVector<f64>> for VectorObservation {
    fn from(data: DVector<f64>) -> Self {
        Self { data }
    }
}

impl Observation for VectorObservation {
    fn to_vec(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    fn shape(&self) -> Vec<usize> {
        vec![self.data.len()]
    }
}

/// Box observation space
#[derive(Debug, Clone)]
pub struct BoxObservationSpace {
    /// Lower bounds
    pub low: Vec<f64>,
    /// Upper bounds
    pub high: Vec<f64>,
    /// Shape of observations
    pub shape: Vec<usize>,
}

impl BoxObservationSpace {
    /// Create a new box observation space
    pub fn new(low: Vec<f64>, high: Vec<f64>, shape: Vec<usize>) -> crate::Result<Self> {
        let total_size: usize = shape.iter().product();
        if low.len() != total_size || high.len() != total_size {
            return Err(crate::RLError::shape(
                (total_size, 1),
                (low.len().max(high.len()), 1),
            ));
        }
        Ok(Self { low, high, shape })
    }

    /// The unit box `[0, 1]^dim`
    #[must_use]
    pub fn unit(dim: usize) -> Self {
        Self {
            low: vec![0.0; dim],
            high: vec![1.0; dim],
            shape: vec![dim],
        }
    }
}

impl ObservationSpace for BoxObservationSpace {
    type Observation = VectorObservation;

    fn sample(&self, rng: &mut dyn RngCore) -> Self::Observation {
        let data = self
            .low
            .iter()
            .zip(&self.high)
            .map(|(l, h)| rng.gen_range(*l..=*h))
            .collect::<Vec<_>>();

        VectorObservation {
            data: DVector::from_vec(data),
        }
    }

    fn contains(&self, obs: &Self::Observation) -> bool {
        obs.data.len() == self.low.len()
            && obs
                .data
                .iter()
                .zip(&self.low)
                .zip(&self.high)
                .all(|((x, l), h)| x >= l && x <= h)
    }

    fn shape(&self) -> Vec<usize> {
        self.shape.clone()
    }
}
