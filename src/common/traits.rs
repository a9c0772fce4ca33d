//! Common traits defining the seams of the search engine

use std::hash::Hash;

use crate::common::error::PlannerResult;
use crate::footstep_planning::{FootstepState, ProgressUpdate, SolverNode};

/// A discrete search space the solver can explore
///
/// States are compared and hashed by their discrete identity, so the closed
/// set of a search is simply a set of states.
pub trait Graph {
    /// State type of this graph
    type State: Clone + Eq + Hash;

    /// States reachable in one step from `state`, in a stable order
    fn successors(&self, state: &Self::State) -> Vec<Self::State>;

    /// Whether `state` satisfies the goal condition
    fn is_goal(&self, state: &Self::State) -> bool;

    /// Cost of moving from `from` to its successor `to`
    fn path_cost(&self, _from: &Self::State, _to: &Self::State) -> f64 {
        1.0
    }

    /// Refuse to search when the graph is not fully configured
    fn check_ready(&self) -> PlannerResult<()> {
        Ok(())
    }
}

/// Estimate of the remaining cost from a node to the goal
pub trait Heuristic<G: Graph> {
    fn estimate(&self, node: &SolverNode<G::State>, graph: &G) -> f64;
}

impl<G, F> Heuristic<G> for F
where
    G: Graph,
    F: Fn(&SolverNode<G::State>, &G) -> f64,
{
    fn estimate(&self, node: &SolverNode<G::State>, graph: &G) -> f64 {
        self(node, graph)
    }
}

/// Receiver of search progress, called once per expanded node
///
/// Implementations must not block; the search does not wait for them.
pub trait ProgressObserver<S> {
    fn on_expand(&mut self, update: &ProgressUpdate<'_, S>);
}

/// External veto on candidate footsteps (terrain support, collision, ...)
pub trait FootstepFeasibility: Send + Sync {
    /// Whether `candidate` may be placed while standing on `stance`
    fn is_feasible(&self, stance: &FootstepState, candidate: &FootstepState) -> bool;
}

impl<F> FootstepFeasibility for F
where
    F: Fn(&FootstepState, &FootstepState) -> bool + Send + Sync,
{
    fn is_feasible(&self, stance: &FootstepState, candidate: &FootstepState) -> bool {
        self(stance, candidate)
    }
}
