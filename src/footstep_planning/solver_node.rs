//! Search tree node
//!
//! Nodes live in the solver's arena and point at their parent by index, so
//! the tree never owns cycles and the open set only has to carry indices.

/// One node of the search tree
#[derive(Debug, Clone)]
pub struct SolverNode<S> {
    state: S,
    parent: Option<usize>,
    cost: f64,
    heuristic: f64,
    priority: f64,
}

impl<S> SolverNode<S> {
    pub fn new(state: S, parent: Option<usize>, cost: f64) -> Self {
        Self {
            state,
            parent,
            cost,
            heuristic: 0.0,
            priority: cost,
        }
    }

    /// Start node of a search
    pub fn root(state: S) -> Self {
        Self::new(state, None, 0.0)
    }

    /// Attach the heuristic estimate; `priority = cost + weight * heuristic`
    pub(crate) fn set_heuristic(&mut self, heuristic: f64, weight: f64) {
        self.heuristic = heuristic;
        self.priority = self.cost + weight * heuristic;
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Arena index of the parent, `None` for the root
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Accumulated path cost `g`
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Heuristic estimate `h`
    pub fn heuristic(&self) -> f64 {
        self.heuristic
    }

    /// Combined priority `f`
    pub fn priority(&self) -> f64 {
        self.priority
    }
}

/// Walk parent links from `index` to the root and return states root-first
pub fn trace_path<S: Clone>(arena: &[SolverNode<S>], index: usize) -> Vec<S> {
    let mut path = Vec::new();
    let mut current = Some(index);

    while let Some(i) = current {
        let node = &arena[i];
        path.push(node.state.clone());
        current = node.parent;
    }

    path.reverse();
    path
}
