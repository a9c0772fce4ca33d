//! A* solver
//!
//! Generic best-first search over any [`Graph`]. Nodes are stored in an arena
//! and linked to their parents by index; the open set is a binary heap keyed
//! by `(f, insertion index)` so that ties are always broken the same way and
//! repeated searches return identical paths.
//!
//! Duplicates in the open set are tolerated and discarded when popped if
//! their state has already been closed (lazy deletion), which avoids a
//! decrease-key operation.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, trace};
use ordered_float::OrderedFloat;

use crate::common::{Graph, Heuristic, PlannerError, PlannerResult, ProgressObserver};
use crate::footstep_planning::progress::ProgressUpdate;
use crate::footstep_planning::solver_node::{trace_path, SolverNode};

/// Configuration for the A* solver
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Heuristic weight (1.0 = A*, >1.0 = faster but suboptimal, 0.0 = uniform cost)
    pub heuristic_weight: f64,
    /// Give up after this many expansions
    pub max_expansions: Option<usize>,
    /// Give up after this much wall-clock time
    pub timeout: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            heuristic_weight: 1.0,
            max_expansions: None,
            timeout: None,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> PlannerResult<()> {
        if !self.heuristic_weight.is_finite() || self.heuristic_weight < 0.0 {
            return Err(PlannerError::InvalidParameter(format!(
                "heuristic_weight must be finite and non-negative, got {}",
                self.heuristic_weight
            )));
        }
        Ok(())
    }
}

/// Why a search stopped before reaching the goal or exhausting the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    StopRequested,
    Timeout,
    ExpansionLimit,
}

/// Successful search result
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<S> {
    /// States from the start to the goal, inclusive
    pub path: Vec<S>,
    /// Accumulated cost of the path
    pub cost: f64,
    /// Number of nodes expanded
    pub expanded: usize,
}

/// Result of a search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<S> {
    Found(Solution<S>),
    /// Open set ran dry: no path exists in the graph
    Exhausted { expanded: usize },
    Cancelled { reason: CancelReason, expanded: usize },
}

impl<S> SearchOutcome<S> {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn solution(&self) -> Option<&Solution<S>> {
        match self {
            SearchOutcome::Found(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Vec<S>> {
        match self {
            SearchOutcome::Found(solution) => Some(solution.path),
            _ => None,
        }
    }

    pub fn expanded(&self) -> usize {
        match self {
            SearchOutcome::Found(solution) => solution.expanded,
            SearchOutcome::Exhausted { expanded } => *expanded,
            SearchOutcome::Cancelled { expanded, .. } => *expanded,
        }
    }
}

/// A* search engine over a graph `G` guided by heuristic `H`
pub struct AStarSolver<G: Graph, H> {
    graph: G,
    heuristic: H,
    config: SolverConfig,
    observer: Option<Box<dyn ProgressObserver<G::State>>>,
    stop_flag: Option<Arc<AtomicBool>>,
}

impl<G, H> AStarSolver<G, H>
where
    G: Graph,
    H: Heuristic<G>,
{
    pub fn new(graph: G, heuristic: H) -> Self {
        Self {
            graph,
            heuristic,
            config: SolverConfig::default(),
            observer: None,
            stop_flag: None,
        }
    }

    pub fn with_config(graph: G, heuristic: H, config: SolverConfig) -> PlannerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(graph, heuristic)
        })
    }

    /// Report every expansion to `observer`
    pub fn set_progress_observer(&mut self, observer: Box<dyn ProgressObserver<G::State>>) {
        self.observer = Some(observer);
    }

    /// Abort the search once `flag` becomes true
    pub fn set_stop_flag(&mut self, flag: Arc<AtomicBool>) {
        self.stop_flag = Some(flag);
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn into_graph(self) -> G {
        self.graph
    }

    /// Search from `start` until a goal state is popped from the open set
    pub fn solve(&mut self, start: G::State) -> PlannerResult<SearchOutcome<G::State>> {
        self.graph.check_ready()?;
        self.config.validate()?;

        let started = Instant::now();
        let weight = self.config.heuristic_weight;

        let mut arena: Vec<SolverNode<G::State>> = Vec::new();
        let mut open: BinaryHeap<Reverse<(OrderedFloat<f64>, usize)>> = BinaryHeap::new();
        let mut closed: HashSet<G::State> = HashSet::new();
        let mut best_cost: HashMap<G::State, f64> = HashMap::new();

        let mut root = SolverNode::root(start);
        let h = self.heuristic.estimate(&root, &self.graph);
        root.set_heuristic(h, weight);
        debug!("[AStar] solve: start heuristic {:.3}, weight {}", h, weight);
        best_cost.insert(root.state().clone(), 0.0);
        open.push(Reverse((OrderedFloat(root.priority()), 0)));
        arena.push(root);

        let mut expanded = 0;

        while let Some(Reverse((_, index))) = open.pop() {
            if closed.contains(arena[index].state()) {
                continue;
            }

            if self.graph.is_goal(arena[index].state()) {
                let cost = arena[index].cost();
                let path = trace_path(&arena, index);
                debug!(
                    "[AStar] goal found: {} states, cost {:.3}, {} expanded, {} generated",
                    path.len(),
                    cost,
                    expanded,
                    arena.len()
                );
                return Ok(SearchOutcome::Found(Solution {
                    path,
                    cost,
                    expanded,
                }));
            }

            if let Some(reason) = self.cancel_reason(expanded, started) {
                debug!("[AStar] cancelled ({:?}) after {} expansions", reason, expanded);
                return Ok(SearchOutcome::Cancelled { reason, expanded });
            }

            let current = arena[index].state().clone();
            let current_cost = arena[index].cost();
            closed.insert(current.clone());
            expanded += 1;
            trace!(
                "[AStar] expand #{}: g {:.3}, f {:.3}, open {}",
                expanded,
                current_cost,
                arena[index].priority(),
                open.len()
            );

            if let Some(observer) = self.observer.as_mut() {
                let footsteps = trace_path(&arena, index);
                observer.on_expand(&ProgressUpdate {
                    footsteps: &footsteps,
                    expanded,
                    cost: current_cost,
                });
            }

            for successor in self.graph.successors(&current) {
                if closed.contains(&successor) {
                    continue;
                }
                let cost = current_cost + self.graph.path_cost(&current, &successor);
                if best_cost.get(&successor).map_or(false, |&known| known <= cost) {
                    continue;
                }
                best_cost.insert(successor.clone(), cost);

                let mut node = SolverNode::new(successor, Some(index), cost);
                let h = self.heuristic.estimate(&node, &self.graph);
                node.set_heuristic(h, weight);

                let new_index = arena.len();
                open.push(Reverse((OrderedFloat(node.priority()), new_index)));
                arena.push(node);
            }
        }

        debug!("[AStar] FAILED: NoPath after expanding {} nodes", expanded);
        Ok(SearchOutcome::Exhausted { expanded })
    }

    fn cancel_reason(&self, expanded: usize, started: Instant) -> Option<CancelReason> {
        if let Some(flag) = &self.stop_flag {
            if flag.load(Ordering::Relaxed) {
                return Some(CancelReason::StopRequested);
            }
        }
        if let Some(timeout) = self.config.timeout {
            if started.elapsed() >= timeout {
                return Some(CancelReason::Timeout);
            }
        }
        if let Some(limit) = self.config.max_expansions {
            if expanded >= limit {
                return Some(CancelReason::ExpansionLimit);
            }
        }
        None
    }
}
