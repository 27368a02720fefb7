use crate::SearchBudget;
use farkle_core::RngState;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A game position the tree search can branch over.
pub trait SearchState: Clone {
    type Action: Clone;
    type Error;

    fn legal_actions(&self) -> Vec<Self::Action>;
    fn apply(&self, action: &Self::Action, rng: &mut RngState) -> Result<Self, Self::Error>;
    fn is_terminal(&self) -> bool;
    fn reward(&self) -> f64;
}

/// Estimates the value of a non-terminal leaf without growing the tree.
/// Terminal leaves are scored with [`SearchState::reward`].
pub trait Rollout<S: SearchState> {
    fn evaluate(&self, state: &S, rng: &mut RngState) -> Result<f64, S::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    Unexpanded,
    Expanded,
    FullyExpanded,
    Terminal,
}

pub struct Node<S: SearchState> {
    state: S,
    parent: Option<usize>,
    action: Option<S::Action>,
    visits: u32,
    value_sum: f64,
    children: Vec<usize>,
    unexpanded: Vec<S::Action>,
    status: NodeStatus,
}

impl<S: SearchState> Node<S> {
    fn new(state: S, parent: Option<usize>, action: Option<S::Action>) -> Self {
        let (unexpanded, status) = if state.is_terminal() {
            (Vec::new(), NodeStatus::Terminal)
        } else {
            (state.legal_actions(), NodeStatus::Unexpanded)
        };
        Self {
            state,
            parent,
            action,
            visits: 0,
            value_sum: 0.0,
            children: Vec::new(),
            unexpanded,
            status,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn action(&self) -> Option<&S::Action> {
        self.action.as_ref()
    }

    pub fn visits(&self) -> u32 {
        self.visits
    }

    pub fn value_sum(&self) -> f64 {
        self.value_sum
    }

    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value_sum / self.visits as f64
        }
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn untried(&self) -> &[S::Action] {
        &self.unexpanded
    }

    pub fn status(&self) -> NodeStatus {
        self.status
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub iterations: u32,
    pub elapsed_ms: u64,
    pub root_children: usize,
    pub selected_visits: u32,
    pub selected_value: f64,
    pub nodes: usize,
}

/// Single-owner search tree. Nodes live in an arena and refer to each other
/// by index; index 0 is the root.
pub struct Mcts<S: SearchState> {
    nodes: Vec<Node<S>>,
    exploration_c: f64,
}

impl<S: SearchState> Mcts<S> {
    pub fn new(root: S, exploration_c: f64) -> Self {
        Self {
            nodes: vec![Node::new(root, None, None)],
            exploration_c,
        }
    }

    pub fn root(&self) -> &Node<S> {
        &self.nodes[0]
    }

    pub fn node(&self, idx: usize) -> Option<&Node<S>> {
        self.nodes.get(idx)
    }

    pub fn nodes(&self) -> &[Node<S>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Runs cycles until the budget is spent. A time budget always gets at
    /// least one cycle.
    pub fn run<R: Rollout<S>>(
        &mut self,
        rollout: &R,
        budget: SearchBudget,
        rng: &mut RngState,
    ) -> Result<SearchStats, S::Error> {
        let started_at = Instant::now();
        let mut iterations = 0u32;
        loop {
            let done = match budget {
                SearchBudget::Iterations(limit) => iterations >= limit,
                SearchBudget::TimeMs(limit) => {
                    iterations > 0 && started_at.elapsed().as_millis() as u64 >= limit
                }
            };
            if done {
                break;
            }
            let leaf = self.iterate(rollout, rng)?;
            iterations = iterations.saturating_add(1);
            if log::log_enabled!(log::Level::Trace) {
                let node = &self.nodes[leaf];
                log::trace!(
                    "cycle {iterations}: leaf {leaf} status {:?} visits {} mean {:.1}",
                    node.status,
                    node.visits,
                    node.mean()
                );
            }
        }

        let selected = self.best_child();
        let stats = SearchStats {
            iterations,
            elapsed_ms: started_at.elapsed().as_millis() as u64,
            root_children: self.nodes[0].children.len(),
            selected_visits: selected.map(|idx| self.nodes[idx].visits).unwrap_or(0),
            selected_value: selected.map(|idx| self.nodes[idx].mean()).unwrap_or(0.0),
            nodes: self.nodes.len(),
        };
        log::debug!(
            "search finished: {} cycles in {} ms, {} root children, {} nodes",
            stats.iterations,
            stats.elapsed_ms,
            stats.root_children,
            stats.nodes
        );
        Ok(stats)
    }

    /// One select/expand/simulate/backpropagate cycle. Returns the index of
    /// the node that was evaluated.
    pub fn iterate<R: Rollout<S>>(
        &mut self,
        rollout: &R,
        rng: &mut RngState,
    ) -> Result<usize, S::Error> {
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if node.status == NodeStatus::Terminal {
                break;
            }
            if !node.unexpanded.is_empty() {
                idx = self.expand(idx, rng)?;
                break;
            }
            if node.children.is_empty() {
                break;
            }
            idx = self.select_child(idx);
        }

        let leaf = &self.nodes[idx];
        let reward = if leaf.status == NodeStatus::Terminal {
            leaf.state.reward()
        } else {
            rollout.evaluate(&leaf.state, rng)?
        };
        self.backpropagate(idx, reward);
        Ok(idx)
    }

    fn expand(&mut self, idx: usize, rng: &mut RngState) -> Result<usize, S::Error> {
        let Some(action) = self.nodes[idx].unexpanded.pop() else {
            return Ok(idx);
        };
        let state = self.nodes[idx].state.apply(&action, rng)?;
        let child_idx = self.nodes.len();
        self.nodes.push(Node::new(state, Some(idx), Some(action)));

        let parent = &mut self.nodes[idx];
        parent.children.push(child_idx);
        parent.status = if parent.unexpanded.is_empty() {
            NodeStatus::FullyExpanded
        } else {
            NodeStatus::Expanded
        };
        Ok(child_idx)
    }

    /// UCB1 over the children of `idx`. Unvisited children win outright, in
    /// creation order; otherwise the first child with the highest score.
    fn select_child(&self, idx: usize) -> usize {
        let node = &self.nodes[idx];
        if let Some(unvisited) = node
            .children
            .iter()
            .copied()
            .find(|child| self.nodes[*child].visits == 0)
        {
            return unvisited;
        }

        let ln_parent = (node.visits.max(1) as f64).ln();
        let mut best = node.children[0];
        let mut best_score = f64::NEG_INFINITY;
        for child_idx in node.children.iter().copied() {
            let child = &self.nodes[child_idx];
            let explore = self.exploration_c * (2.0 * ln_parent / child.visits as f64).sqrt();
            let score = child.mean() + explore;
            if score > best_score {
                best_score = score;
                best = child_idx;
            }
        }
        best
    }

    fn backpropagate(&mut self, idx: usize, reward: f64) {
        let mut walk = Some(idx);
        while let Some(current) = walk {
            let node = &mut self.nodes[current];
            node.visits = node.visits.saturating_add(1);
            node.value_sum += reward;
            walk = node.parent;
        }
    }

    /// Most visited root child; ties go to the higher mean, then to the child
    /// created first.
    pub fn best_child(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for child_idx in self.nodes[0].children.iter().copied() {
            let child = &self.nodes[child_idx];
            let better = match best {
                None => true,
                Some(current) => {
                    let current = &self.nodes[current];
                    child.visits > current.visits
                        || (child.visits == current.visits && child.mean() > current.mean())
                }
            };
            if better {
                best = Some(child_idx);
            }
        }
        best
    }

    pub fn best_action(&self) -> Option<S::Action> {
        self.best_child()
            .and_then(|idx| self.nodes[idx].action.clone())
    }
}
