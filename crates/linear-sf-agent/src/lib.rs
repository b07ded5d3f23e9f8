//! Reference agents for the linear successor-feature testbed
//!
//! This crate provides agents with fixed linear parameters:
//! - [`LinearValueAgent`]: per-action value weights only
//! - [`LinearSfAgent`]: value weights, successor-feature matrices and reward
//!   weights, exposing every evaluation query

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod linear;

pub use linear::{LinearSfAgent, LinearValueAgent};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LinearSfAgent, LinearValueAgent};
    pub use linear_sf_core::prelude::*;
}
