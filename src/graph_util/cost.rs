use crate::SwitchId;

/// Edge weight between two adjacent switches, given how many switches are
/// currently active.
pub trait LinkCost {
    fn cost(&self, s1: SwitchId, s2: SwitchId, switch_cnt: usize) -> f64;
}

/// Synthetic delay classes derived from the switch identifiers. Existing test
/// topologies depend on these exact bands, so keep them as they are.
#[derive(Clone, Copy, Debug, Default)]
pub struct DelayBands;

impl DelayBands {
    pub fn factor(switch_cnt: usize) -> f64 {
        if switch_cnt < 10 {
            2.0
        } else {
            4.0
        }
    }
}

impl LinkCost for DelayBands {
    fn cost(&self, s1: SwitchId, s2: SwitchId, switch_cnt: usize) -> f64 {
        let value = (s1 + s2) as f64 / DelayBands::factor(switch_cnt);
        if value < 2.5 || value > 6.9 {
            4.0
        } else if value > 4.5 && value < 5.5 {
            4.0
        } else if value > 3.0 && value < 4.0 {
            10.0
        } else if value > 5.4 && value < 6.0 {
            10.0
        } else {
            7.0
        }
    }
}

/// Every link costs the same.
#[derive(Clone, Copy, Debug)]
pub struct UniformCost(pub f64);

impl LinkCost for UniformCost {
    fn cost(&self, _s1: SwitchId, _s2: SwitchId, _switch_cnt: usize) -> f64 {
        self.0
    }
}
