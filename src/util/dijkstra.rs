use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::graph_util::Graph;

/// Single-source shortest path with a linear scan for the closest
/// undiscovered node. The graphs are a handful of switches, so no heap.
pub struct Dijkstra<'a, K: Hash + Eq + Copy, G: Graph<K>> {
    g: &'a G,
    _marker: std::marker::PhantomData<K>,
}

impl<'a, K: Hash + Eq + Copy, G: Graph<K>> Dijkstra<'a, K, G> {
    pub fn new(g: &'a G) -> Self {
        Dijkstra {
            g,
            _marker: std::marker::PhantomData,
        }
    }
    /// Returns the distance and the route from `src` to `dst`, or `None` if
    /// `dst` cannot be reached.
    pub fn get_route(&self, src_id: K, dst_id: K) -> Option<(f64, Vec<K>)> {
        if src_id == dst_id {
            return Some((0.0, vec![src_id]));
        }
        let mut distance: HashMap<K, f64> = HashMap::new();
        let mut previous: HashMap<K, K> = HashMap::new();
        let mut queue: Vec<K> = vec![];
        self.g.foreach_node(|id| {
            distance.insert(id, std::f64::INFINITY);
            queue.push(id);
        });
        if !distance.contains_key(&src_id) || !distance.contains_key(&dst_id) {
            return None;
        }
        distance.insert(src_id, 0.0);

        while !queue.is_empty() {
            let (pos, cur_dist) = Self::closest(&queue, &distance);
            if cur_dist.is_infinite() {
                // everything left is unreachable
                break;
            }
            let cur_id = queue.remove(pos);
            self.g.foreach_edge(cur_id, |next_id, cost| {
                if let Some(next_dist) = distance.get_mut(&next_id) {
                    if cur_dist + cost < *next_dist {
                        *next_dist = cur_dist + cost;
                        previous.insert(next_id, cur_id);
                    }
                }
            });
        }
        let route = backtrace(&previous, src_id, dst_id)?;
        Some((distance[&dst_id], route))
    }
    fn closest(queue: &[K], distance: &HashMap<K, f64>) -> (usize, f64) {
        let mut min = (0, std::f64::INFINITY);
        for (pos, id) in queue.iter().enumerate() {
            if distance[id] < min.1 {
                min = (pos, distance[id]);
            }
        }
        min
    }
}

/// Walks the predecessor map from `dst` back to `src`. A chain that never
/// reaches `src`, or that loops, yields `None`.
pub fn backtrace<K: Hash + Eq + Copy>(
    previous: &HashMap<K, K>,
    src_id: K,
    dst_id: K,
) -> Option<Vec<K>> {
    let mut route = vec![dst_id];
    let mut visited = HashSet::new();
    visited.insert(dst_id);
    let mut cur_id = dst_id;
    while cur_id != src_id {
        let prev_id = *previous.get(&cur_id)?;
        if !visited.insert(prev_id) {
            return None;
        }
        route.push(prev_id);
        cur_id = prev_id;
    }
    route.reverse();
    Some(route)
}
