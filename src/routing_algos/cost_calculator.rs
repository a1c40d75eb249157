use crate::graph_util::TopologyGraph;
use crate::SwitchId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathCost {
    pub delay: f64,
    pub hops: usize,
}

/// Total link cost and edge count of a path under the current cost model.
pub fn compute_path_cost(g: &TopologyGraph, path: &[SwitchId]) -> PathCost {
    let mut cost = PathCost {
        delay: 0.0,
        hops: 0,
    };
    for pair in path.windows(2) {
        cost.delay += g.link_cost(pair[0], pair[1]);
        cost.hops += 1;
    }
    cost
}
