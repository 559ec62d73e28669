//! Policy trait for the Harvest environment.

use std::collections::BTreeMap;

use crate::observation::Observation;
use crate::types::AgentId;

/// A policy that selects actions for agents based on observations.
///
/// Actions are indices into [`Action::all`](crate::action::Action::all).
pub trait Policy: Send + Sync {
    /// Selects one action per observed agent.
    ///
    /// # Arguments
    ///
    /// * `observations` - Per-agent observations (from [`ObservationBuilder`](crate::observation::ObservationBuilder))
    ///
    /// # Returns
    ///
    /// An ordered action batch; the order is the environment's tie-break.
    fn select_actions(
        &mut self,
        observations: &BTreeMap<AgentId, Observation>,
    ) -> Vec<(AgentId, usize)>;

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}
