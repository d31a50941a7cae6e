//! Maximum flow over a dense capacity matrix (Edmonds–Karp).

use std::collections::VecDeque;

/// Maximum flow from `source` to `sink` in the directed graph whose edge
/// capacities are `capacity[from][to]`. The matrix must be square; out of
/// range endpoints carry no flow.
pub fn max_flow(capacity: &[Vec<u64>], source: usize, sink: usize) -> u64 {
    let n = capacity.len();
    if source >= n || sink >= n || source == sink {
        return 0;
    }

    let mut residual: Vec<Vec<u64>> = capacity.to_vec();
    let mut total: u64 = 0;

    while let Some(parent) = augmenting_path(&residual, source, sink) {
        let mut bottleneck = u64::MAX;
        let mut v = sink;
        while v != source {
            let u = parent[v];
            bottleneck = bottleneck.min(residual[u][v]);
            v = u;
        }

        let mut v = sink;
        while v != source {
            let u = parent[v];
            residual[u][v] -= bottleneck;
            residual[v][u] = residual[v][u].saturating_add(bottleneck);
            v = u;
        }
        total = total.saturating_add(bottleneck);
    }

    total
}

/// Breadth-first search for a shortest path with spare capacity. Returns the
/// parent of every vertex on the path.
fn augmenting_path(residual: &[Vec<u64>], source: usize, sink: usize) -> Option<Vec<usize>> {
    let n = residual.len();
    let mut parent = vec![usize::MAX; n];
    parent[source] = source;
    let mut queue = VecDeque::from([source]);

    while let Some(u) = queue.pop_front() {
        for v in 0..n {
            if parent[v] == usize::MAX && residual[u][v] > 0 {
                parent[v] = u;
                if v == sink {
                    return Some(parent);
                }
                queue.push_back(v);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_edge() {
        let graph = vec![vec![0, 7], vec![0, 0]];
        assert_eq!(max_flow(&graph, 0, 1), 7);
        assert_eq!(max_flow(&graph, 1, 0), 0);
    }

    #[test]
    fn bottleneck_along_a_path() {
        let graph = vec![vec![0, 10, 0], vec![0, 0, 3], vec![0, 0, 0]];
        assert_eq!(max_flow(&graph, 0, 2), 3);
    }

    #[test]
    fn parallel_paths_add_up() {
        // 0 -> 1 -> 3 and 0 -> 2 -> 3
        let graph = vec![
            vec![0, 4, 5, 0],
            vec![0, 0, 0, 6],
            vec![0, 0, 0, 2],
            vec![0, 0, 0, 0],
        ];
        assert_eq!(max_flow(&graph, 0, 3), 6);
    }

    #[test]
    fn needs_reverse_residual_edges() {
        // Greedy 0-1-2-3 blocks the optimum unless flow is pushed back over 1-2.
        let graph = vec![
            vec![0, 1, 1, 0],
            vec![0, 0, 1, 1],
            vec![0, 0, 0, 1],
            vec![0, 0, 0, 0],
        ];
        assert_eq!(max_flow(&graph, 0, 3), 2);
    }

    #[test]
    fn degenerate_endpoints() {
        let graph = vec![vec![0, 1], vec![1, 0]];
        assert_eq!(max_flow(&graph, 0, 0), 0);
        assert_eq!(max_flow(&graph, 0, 5), 0);
        assert_eq!(max_flow(&[], 0, 1), 0);
    }

    #[test]
    fn huge_capacities_saturate() {
        let graph = vec![
            vec![0, u64::MAX, u64::MAX, 0],
            vec![0, 0, 0, u64::MAX],
            vec![0, 0, 0, u64::MAX],
            vec![0, 0, 0, 0],
        ];
        assert_eq!(max_flow(&graph, 0, 3), u64::MAX);
    }
}
