use super::ViolationFunction;
use crate::model::CircuitArc;
use crate::DomainId;

/// The selected arcs of a graph: their degrees and the selected arcs leaving each node.
#[derive(Debug)]
struct SelectedGraph {
    out_degree: Vec<u64>,
    in_degree: Vec<u64>,
    has_self_loop: Vec<bool>,
    /// The heads of the selected arcs which are not self-loops, per tail.
    successors: Vec<Vec<u32>>,
}

impl SelectedGraph {
    fn new(arcs: &[CircuitArc], num_nodes: usize, solution: &[i64]) -> Self {
        let mut graph = SelectedGraph {
            out_degree: vec![0; num_nodes],
            in_degree: vec![0; num_nodes],
            has_self_loop: vec![false; num_nodes],
            successors: vec![vec![]; num_nodes],
        };

        for arc in arcs.iter().filter(|arc| arc.literal.is_true_in(solution)) {
            let (tail, head) = (arc.tail as usize, arc.head as usize);
            graph.out_degree[tail] += 1;
            graph.in_degree[head] += 1;

            if tail == head {
                graph.has_self_loop[tail] = true;
            } else {
                graph.successors[tail].push(arc.head);
            }
        }

        graph
    }

    /// Marks the nodes reachable from `root` over the selected arcs which are not self-loops.
    fn reachable_from(&self, root: usize) -> Vec<bool> {
        let mut reached = vec![false; self.successors.len()];
        reached[root] = true;
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            for &successor in &self.successors[node] {
                let successor = successor as usize;
                if !reached[successor] {
                    reached[successor] = true;
                    stack.push(successor);
                }
            }
        }

        reached
    }
}

fn num_nodes(arcs: &[CircuitArc]) -> usize {
    arcs.iter()
        .map(|arc| arc.tail.max(arc.head) as usize + 1)
        .max()
        .unwrap_or(0)
}

fn collect_arc_variables(arcs: &[CircuitArc], variables: &mut Vec<DomainId>) {
    variables.extend(arcs.iter().map(|arc| arc.literal.variable()))
}

/// The selected arcs form a single circuit through all nodes which do not select their
/// self-loop.
///
/// Every node needs exactly one selected outgoing and one selected incoming arc (a self-loop
/// counts for both); the violation sums the deviations from these degrees. On top of that, every
/// node without a self-loop which cannot be reached from the first such node adds 1, so that a
/// set of disjoint sub-circuits is a violation.
#[derive(Clone, Debug)]
pub struct Circuit {
    arcs: Box<[CircuitArc]>,
    num_nodes: usize,
}

impl Circuit {
    pub(crate) fn new(arcs: Box<[CircuitArc]>) -> Self {
        let num_nodes = num_nodes(&arcs);
        Circuit { arcs, num_nodes }
    }
}

impl ViolationFunction for Circuit {
    fn compute_violation(&self, solution: &[i64]) -> i64 {
        let graph = SelectedGraph::new(&self.arcs, self.num_nodes, solution);

        let mut violation: u64 = (0..self.num_nodes)
            .map(|node| graph.out_degree[node].abs_diff(1) + graph.in_degree[node].abs_diff(1))
            .sum();

        if let Some(root) = (0..self.num_nodes).find(|&node| !graph.has_self_loop[node]) {
            let reached = graph.reachable_from(root);
            violation += (0..self.num_nodes)
                .filter(|&node| !graph.has_self_loop[node] && !reached[node])
                .count() as u64;
        }

        i64::try_from(violation).unwrap_or(i64::MAX)
    }

    fn collect_variables(&self, variables: &mut Vec<DomainId>) {
        collect_arc_variables(&self.arcs, variables)
    }
}

/// The selected arcs form routes which start and end at the depot, node 0.
///
/// The depot needs as many selected incoming as outgoing arcs. Every other node either is not
/// visited or has exactly one selected incoming and one selected outgoing arc; a selected
/// self-loop explicitly marks a node as not visited. The violation sums the deviations from these
/// degrees plus the number of visited nodes which cannot be reached from the depot.
#[derive(Clone, Debug)]
pub struct Routes {
    arcs: Box<[CircuitArc]>,
    num_nodes: usize,
}

impl Routes {
    pub(crate) fn new(arcs: Box<[CircuitArc]>) -> Self {
        let num_nodes = num_nodes(&arcs);
        Routes { arcs, num_nodes }
    }
}

impl ViolationFunction for Routes {
    fn compute_violation(&self, solution: &[i64]) -> i64 {
        if self.num_nodes == 0 {
            return 0;
        }

        let graph = SelectedGraph::new(&self.arcs, self.num_nodes, solution);

        let mut violation = graph.in_degree[0].abs_diff(graph.out_degree[0]);
        for node in 1..self.num_nodes {
            let (in_degree, out_degree) = (graph.in_degree[node], graph.out_degree[node]);
            violation += in_degree.abs_diff(out_degree)
                + in_degree.saturating_sub(1)
                + out_degree.saturating_sub(1);
        }

        let reached = graph.reachable_from(0);
        violation += (1..self.num_nodes)
            .filter(|&node| {
                let is_visited = graph.in_degree[node] + graph.out_degree[node] > 0
                    && !graph.has_self_loop[node];
                is_visited && !reached[node]
            })
            .count() as u64;

        i64::try_from(violation).unwrap_or(i64::MAX)
    }

    fn collect_variables(&self, variables: &mut Vec<DomainId>) {
        collect_arc_variables(&self.arcs, variables)
    }
}
