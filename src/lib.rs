//! harvest - a turn-based multi-agent grid world
//!
//! Agents move over a shared grid, collect apples and fire short beams.
//! Every tick resolves all agents' actions against the same grid snapshot
//! and commits them together; apples regrow with a probability that depends
//! on how many apples are nearby.

pub mod action;
pub mod agent;
pub mod beam;
pub mod config;
pub mod environment;
pub mod error;
pub mod grid;
pub mod layout;
pub mod metrics;
pub mod observation;
pub mod policy;
pub mod reservation;
pub mod respawn;
pub mod reward;
pub mod types;

pub use action::Action;
pub use agent::{AgentRegistry, AgentState};
pub use config::HarvestConfig;
pub use environment::{HarvestEnv, StepResult};
pub use error::{HarvestError, Result};
pub use grid::{GridState, Window};
pub use layout::MapLayout;
pub use metrics::EvaluationMetrics;
pub use observation::{Observation, ObservationBuilder};
pub use policy::{GreedyHarvestPolicy, Policy, RandomPolicy};
pub use types::{AgentId, Cell, Orientation, Position};
