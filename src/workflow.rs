//! Status transition graph.
//!
//! A status change is legal when the target is reachable from the current
//! status through declared forward edges, so `submitted -> closed` is legal
//! via two intermediate steps even without a direct edge.

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::sync::OnceLock;

use tracing::debug;

use crate::record::Status;

/// Directed graph over a small vertex set.
#[derive(Debug, Clone)]
pub struct Graph<T> {
    adjacency: HashMap<T, Vec<T>>,
}

impl<T: Eq + Hash + Clone> Graph<T> {
    pub fn new() -> Self {
        Self {
            adjacency: HashMap::new(),
        }
    }

    /// Declare a direct edge `from -> to`. Both endpoints become vertices.
    pub fn add_edge(&mut self, from: T, to: T) {
        self.adjacency.entry(to.clone()).or_default();
        self.adjacency.entry(from).or_default().push(to);
    }

    pub fn contains_vertex(&self, v: &T) -> bool {
        self.adjacency.contains_key(v)
    }

    pub fn successors(&self, v: &T) -> &[T] {
        self.adjacency.get(v).map(Vec::as_slice).unwrap_or_default()
    }

    /// Breadth-first search from `start`.
    ///
    /// `start` always reaches itself, whether or not it is a known vertex.
    pub fn is_reachable(&self, start: &T, target: &T) -> bool {
        let mut queue = VecDeque::from([start]);
        let mut seen: HashSet<&T> = HashSet::from([start]);
        while let Some(v) = queue.pop_front() {
            if v == target {
                return true;
            }
            for next in self.successors(v) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }
}

impl<T: Eq + Hash + Clone> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Direct forward transitions of the record lifecycle.
pub const STATUS_EDGES: [(Status, Status); 3] = [
    (Status::Submitted, Status::InProgress),
    (Status::InProgress, Status::Resolved),
    (Status::Resolved, Status::Closed),
];

/// The lifecycle graph, built once.
pub fn status_graph() -> &'static Graph<Status> {
    static GRAPH: OnceLock<Graph<Status>> = OnceLock::new();
    GRAPH.get_or_init(|| {
        let mut g = Graph::new();
        for (from, to) in STATUS_EDGES {
            g.add_edge(from, to);
        }
        g
    })
}

/// Whether moving a record from `from` to `to` is a legal forward transition.
pub fn is_legal_transition(from: Status, to: Status) -> bool {
    let legal = status_graph().is_reachable(&from, &to);
    if !legal {
        debug!(%from, %to, "rejected status transition");
    }
    legal
}
