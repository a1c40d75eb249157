use std::hash::Hash;

mod cost;
pub use cost::{DelayBands, LinkCost, UniformCost};

mod topology;
pub use topology::{CostMatrix, TopologyGraph};

/// Cost-matrix entry on the diagonal.
pub const SELF_DISTANCE: f64 = 999_999_999.0;
/// Cost-matrix entry for a pair of switches without a direct link.
pub const UNREACHABLE_DISTANCE: f64 = 99_999_999.0;

pub trait Graph<K: Hash + Eq + Copy> {
    fn get_node_cnt(&self) -> usize;
    /// Visits the active nodes in ascending order.
    fn foreach_node(&self, callback: impl FnMut(K));
    fn foreach_edge(&self, id: K, callback: impl FnMut(K, f64));
    fn get_dist(&self, path: &[K]) -> Option<f64>;
}
