use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{DelayBands, Graph, LinkCost, SELF_DISTANCE, UNREACHABLE_DISTANCE};
use crate::ofp::PortNo;
use crate::SwitchId;

/// Active switches plus the egress port each switch uses towards every
/// directly connected neighbour.
pub struct TopologyGraph {
    switches: BTreeSet<SwitchId>,
    adjacency: HashMap<SwitchId, BTreeMap<SwitchId, PortNo>>,
    cost_model: Box<dyn LinkCost>,
}

impl Default for TopologyGraph {
    fn default() -> Self {
        TopologyGraph::new()
    }
}

impl TopologyGraph {
    pub fn new() -> Self {
        TopologyGraph::with_cost_model(Box::new(DelayBands))
    }
    pub fn with_cost_model(cost_model: Box<dyn LinkCost>) -> Self {
        TopologyGraph {
            switches: BTreeSet::new(),
            adjacency: HashMap::new(),
            cost_model,
        }
    }
    /// Returns false if the switch was already active.
    pub fn add_switch(&mut self, id: SwitchId) -> bool {
        self.switches.insert(id)
    }
    /// Drops the switch together with every adjacency entry that mentions it.
    pub fn remove_switch(&mut self, id: SwitchId) -> bool {
        if !self.switches.remove(&id) {
            return false;
        }
        self.adjacency.remove(&id);
        for row in self.adjacency.values_mut() {
            row.remove(&id);
        }
        true
    }
    pub fn add_link(&mut self, s1: SwitchId, p1: PortNo, s2: SwitchId, p2: PortNo) {
        self.adjacency.entry(s1).or_default().insert(s2, p1);
        self.adjacency.entry(s2).or_default().insert(s1, p2);
    }
    /// Removes both directions. Returns whether anything was there.
    pub fn remove_link(&mut self, s1: SwitchId, s2: SwitchId) -> bool {
        let forward = self.remove_direction(s1, s2);
        let backward = self.remove_direction(s2, s1);
        forward || backward
    }
    fn remove_direction(&mut self, from: SwitchId, to: SwitchId) -> bool {
        match self.adjacency.get_mut(&from) {
            Some(row) => row.remove(&to).is_some(),
            None => false,
        }
    }
    pub fn neighbor_port(&self, s1: SwitchId, s2: SwitchId) -> Option<PortNo> {
        self.adjacency.get(&s1).and_then(|row| row.get(&s2)).copied()
    }
    pub fn contains_switch(&self, id: SwitchId) -> bool {
        self.switches.contains(&id)
    }
    pub fn active_switches(&self) -> &BTreeSet<SwitchId> {
        &self.switches
    }
    pub fn switch_cnt(&self) -> usize {
        self.switches.len()
    }
    pub fn link_cost(&self, s1: SwitchId, s2: SwitchId) -> f64 {
        self.cost_model.cost(s1, s2, self.switch_cnt())
    }
    fn is_linked(&self, s1: SwitchId, s2: SwitchId) -> bool {
        self.switches.contains(&s2) && self.neighbor_port(s1, s2).is_some()
    }
    pub fn cost_matrix(&self) -> CostMatrix {
        let ids: Vec<SwitchId> = self.switches.iter().copied().collect();
        let dist = ids
            .iter()
            .map(|&s1| {
                ids.iter()
                    .map(|&s2| {
                        if s1 == s2 {
                            SELF_DISTANCE
                        } else if self.is_linked(s1, s2) {
                            self.link_cost(s1, s2)
                        } else {
                            UNREACHABLE_DISTANCE
                        }
                    })
                    .collect()
            })
            .collect();
        CostMatrix { ids, dist }
    }
}

impl Graph<SwitchId> for TopologyGraph {
    fn get_node_cnt(&self) -> usize {
        self.switch_cnt()
    }
    fn foreach_node(&self, mut callback: impl FnMut(SwitchId)) {
        for &id in self.switches.iter() {
            callback(id);
        }
    }
    fn foreach_edge(&self, id: SwitchId, mut callback: impl FnMut(SwitchId, f64)) {
        if let Some(row) = self.adjacency.get(&id) {
            for &next_id in row.keys() {
                if self.switches.contains(&next_id) {
                    callback(next_id, self.link_cost(id, next_id));
                }
            }
        }
    }
    fn get_dist(&self, path: &[SwitchId]) -> Option<f64> {
        let mut dist = 0.0;
        for pair in path.windows(2) {
            if !self.is_linked(pair[0], pair[1]) {
                return None;
            }
            dist += self.link_cost(pair[0], pair[1]);
        }
        Some(dist)
    }
}

/// All-pairs link costs over the active switches. Row/column `i` belongs to
/// the `i`-th smallest switch id.
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix {
    ids: Vec<SwitchId>,
    dist: Vec<Vec<f64>>,
}

impl CostMatrix {
    pub fn len(&self) -> usize {
        self.ids.len()
    }
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
    pub fn index_of(&self, id: SwitchId) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }
    pub fn id_at(&self, index: usize) -> SwitchId {
        self.ids[index]
    }
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.dist[i][j]
    }
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.dist
    }
    /// A direct link exists from slot `i` to slot `j`.
    pub fn is_edge(&self, i: usize, j: usize) -> bool {
        i != j && self.dist[i][j] < UNREACHABLE_DISTANCE
    }
}
