use std::collections::{BTreeMap, HashMap};
use std::net::Ipv4Addr;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use crate::error::ControllerError;
use crate::flow::Hop;
use crate::ofp::{
    Action, Bucket, Datapath, FlowMod, GroupMod, GroupModCommand, GroupType, Match, Message,
    PortNo, OFPG_ANY,
};
use crate::recorder::{GroupKey, GroupTable};
use crate::routing_algos::PathCost;
use crate::SwitchId;

pub const PRIORITY_IP: u16 = 32768;
pub const PRIORITY_ARP: u16 = 1;

/// Candidate egress port and the cost of the path through it.
pub type Candidate = (PortNo, f64);

/// Turns hops into flow rules, and into select groups when a hop has more
/// than one way out.
pub struct FlowInstaller<R: Rng = StdRng> {
    idle_timeout: u16,
    /// Set by the first path installation and never cleared; from then on
    /// every installed rule carries the idle timeout.
    clear_flow_entry: bool,
    groups: GroupTable<R>,
}

impl<R: Rng> FlowInstaller<R> {
    pub fn new(idle_timeout: u16, groups: GroupTable<R>) -> Self {
        FlowInstaller {
            idle_timeout,
            clear_flow_entry: false,
            groups,
        }
    }
    pub fn idle_timeout(&self) -> Option<u16> {
        if self.clear_flow_entry {
            Some(self.idle_timeout)
        } else {
            None
        }
    }
    pub fn get_groups(&self) -> &GroupTable<R> {
        &self.groups
    }
    /// Programs every hop of one direction of a path. All switches are
    /// resolved before anything is sent.
    pub fn install_path(
        &mut self,
        datapaths: &HashMap<SwitchId, Rc<dyn Datapath>>,
        hops: &[Hop],
        cost: PathCost,
        ip_src: Ipv4Addr,
        ip_dst: Ipv4Addr,
    ) -> Result<(), ControllerError> {
        let (src, dst) = match (hops.first(), hops.last()) {
            (Some(first), Some(last)) => (first.switch, last.switch),
            _ => return Ok(()),
        };
        let mut targets = Vec::with_capacity(hops.len());
        for hop in hops {
            let dp = datapaths
                .get(&hop.switch)
                .ok_or(ControllerError::UnknownSwitch(hop.switch))?;
            targets.push((hop, dp.as_ref()));
        }
        for (hop, dp) in targets {
            let mut ports: BTreeMap<PortNo, Vec<Candidate>> = BTreeMap::new();
            let out_ports = ports.entry(hop.in_port).or_default();
            let candidate = (hop.out_port, cost.delay);
            if !out_ports.contains(&candidate) {
                out_ports.push(candidate);
            }
            for (in_port, out_ports) in ports.iter() {
                self.install_hop(
                    dp,
                    (hop.switch, src, dst),
                    *in_port,
                    out_ports,
                    cost.delay,
                    ip_src,
                    ip_dst,
                );
            }
        }
        Ok(())
    }
    /// Rules for traffic entering `dp` on `in_port`. One candidate gets a
    /// plain output action; several get a select group with one weighted
    /// bucket each, each bucket watching its own port.
    pub fn install_hop(
        &mut self,
        dp: &dyn Datapath,
        key: GroupKey,
        in_port: PortNo,
        out_ports: &[Candidate],
        total_cost: f64,
        ip_src: Ipv4Addr,
        ip_dst: Ipv4Addr,
    ) {
        let actions = match out_ports {
            [] => return,
            [(port, _)] => vec![Action::output(*port)],
            _ => {
                let buckets: Vec<Bucket> = out_ports
                    .iter()
                    .map(|&(port, cost)| Bucket {
                        weight: bucket_weight(cost, total_cost),
                        watch_port: port,
                        watch_group: OFPG_ANY,
                        actions: vec![Action::output(port)],
                    })
                    .collect();
                let (group_id, is_new) = self.groups.upsert(key, buckets.clone());
                let command = if is_new {
                    GroupModCommand::Add
                } else {
                    GroupModCommand::Modify
                };
                dp.send_msg(Message::GroupMod(GroupMod {
                    command,
                    group_type: GroupType::Select,
                    group_id,
                    buckets,
                }));
                vec![Action::Group(group_id)]
            }
        };
        self.clear_flow_entry = true;
        debug!(switch = key.0, in_port, ?actions, "installing hop");
        let ip_match = Match::ipv4(in_port, ip_src, ip_dst);
        self.add_flow(dp, PRIORITY_IP, ip_match, actions.clone());
        self.add_flow(dp, PRIORITY_ARP, Match::arp(in_port, ip_src, ip_dst), actions);
    }
    fn add_flow(
        &self,
        dp: &dyn Datapath,
        priority: u16,
        match_fields: Match,
        actions: Vec<Action>,
    ) {
        let flow_mod =
            FlowMod::add(priority, match_fields, actions).with_idle_timeout(self.idle_timeout());
        dp.send_msg(Message::FlowMod(flow_mod));
    }
}

/// `round((1 - cost / total) * 10)`, ties to even, never below zero.
pub fn bucket_weight(cost: f64, total_cost: f64) -> u16 {
    let ratio = if total_cost > 0.0 { cost / total_cost } else { 0.0 };
    ((1.0 - ratio) * 10.0).round_ties_even().max(0.0) as u16
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::flow::add_ports_to_path;
    use crate::graph_util::TopologyGraph;
    use crate::ofp::mock::RecordingDatapath;
    use crate::ofp::{FlowModCommand, ETH_TYPE_ARP, ETH_TYPE_IP};
    use crate::recorder::GroupIdAllocator;
    use crate::routing_algos::compute_path_cost;
    use rand::rngs::mock::StepRng;

    const IP1: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
    const IP2: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);

    fn installer() -> FlowInstaller<StepRng> {
        FlowInstaller::new(30, GroupTable::new(GroupIdAllocator::new(StepRng::new(100, 1))))
    }

    #[test]
    fn test_bucket_weight() {
        assert_eq!(10, bucket_weight(0.0, 8.0));
        assert_eq!(5, bucket_weight(4.0, 8.0));
        assert_eq!(0, bucket_weight(8.0, 8.0));
        // 2.5 rounds to even
        assert_eq!(2, bucket_weight(6.0, 8.0));
        assert_eq!(0, bucket_weight(12.0, 8.0));
        assert_eq!(10, bucket_weight(3.0, 0.0));
    }
    #[test]
    fn test_install_path_direct_rules() -> Result<(), ControllerError> {
        let mut g = TopologyGraph::new();
        let mut datapaths: HashMap<SwitchId, Rc<dyn Datapath>> = HashMap::new();
        let mut recorders = vec![];
        for id in 1..=3 {
            g.add_switch(id);
            let dp = Rc::new(RecordingDatapath::new(id));
            recorders.push(dp.clone());
            datapaths.insert(id, dp);
        }
        g.add_link(1, 2, 2, 1);
        g.add_link(2, 3, 3, 1);
        let path = vec![1, 2, 3];
        let hops = add_ports_to_path(&g, &path, 5, 6)?;
        let cost = compute_path_cost(&g, &path);

        let mut installer = installer();
        assert_eq!(None, installer.idle_timeout());
        installer.install_path(&datapaths, &hops, cost, IP1, IP2)?;
        assert_eq!(Some(30), installer.idle_timeout());
        assert!(installer.get_groups().is_empty());

        for (dp, hop) in recorders.iter().zip(hops.iter()) {
            let sent = dp.take();
            assert_eq!(2, sent.len());
            match (&sent[0], &sent[1]) {
                (Message::FlowMod(ip), Message::FlowMod(arp)) => {
                    assert_eq!(FlowModCommand::Add, ip.command);
                    assert_eq!(PRIORITY_IP, ip.priority);
                    assert_eq!(Some(ETH_TYPE_IP), ip.match_fields.eth_type);
                    assert_eq!(Some(hop.in_port), ip.match_fields.in_port);
                    assert_eq!(Some(IP1), ip.match_fields.ipv4_src);
                    assert_eq!(vec![Action::output(hop.out_port)], ip.actions);
                    assert_eq!(Some(30), ip.idle_timeout);
                    assert_eq!(PRIORITY_ARP, arp.priority);
                    assert_eq!(Some(ETH_TYPE_ARP), arp.match_fields.eth_type);
                    assert_eq!(Some(IP2), arp.match_fields.arp_tpa);
                    assert_eq!(ip.actions, arp.actions);
                }
                other => panic!("unexpected messages {:?}", other),
            }
        }
        Ok(())
    }
    #[test]
    fn test_install_path_unknown_switch_sends_nothing() {
        let dp = Rc::new(RecordingDatapath::new(1));
        let mut datapaths: HashMap<SwitchId, Rc<dyn Datapath>> = HashMap::new();
        datapaths.insert(1, dp.clone());
        let hops = vec![
            Hop { switch: 1, in_port: 1, out_port: 2 },
            Hop { switch: 9, in_port: 1, out_port: 2 },
        ];
        let cost = PathCost { delay: 4.0, hops: 1 };
        let mut installer = installer();
        assert!(matches!(
            installer.install_path(&datapaths, &hops, cost, IP1, IP2),
            Err(ControllerError::UnknownSwitch(9))
        ));
        assert!(dp.take().is_empty());
        assert_eq!(None, installer.idle_timeout());
    }
    #[test]
    fn test_install_hop_multipath_group() {
        let dp = RecordingDatapath::new(4);
        let mut installer = installer();
        let candidates = [(2, 4.0), (3, 6.0)];
        installer.install_hop(&dp, (4, 1, 7), 1, &candidates, 8.0, IP1, IP2);

        let sent = dp.take();
        assert_eq!(3, sent.len());
        let group_id = match &sent[0] {
            Message::GroupMod(group) => {
                assert_eq!(GroupModCommand::Add, group.command);
                assert_eq!(GroupType::Select, group.group_type);
                assert_eq!(100, group.group_id);
                let shape: Vec<_> = group
                    .buckets
                    .iter()
                    .map(|b| (b.watch_port, b.weight, b.actions.clone()))
                    .collect();
                assert_eq!(
                    vec![
                        (2, 5, vec![Action::output(2)]),
                        (3, 2, vec![Action::output(3)]),
                    ],
                    shape
                );
                group.group_id
            }
            other => panic!("unexpected {:?}", other),
        };
        for msg in &sent[1..] {
            match msg {
                Message::FlowMod(flow) => assert_eq!(vec![Action::Group(group_id)], flow.actions),
                other => panic!("unexpected {:?}", other),
            }
        }

        // same key again: modify the existing group
        installer.install_hop(&dp, (4, 1, 7), 1, &[(2, 4.0), (5, 4.0)], 8.0, IP1, IP2);
        match &dp.take()[0] {
            Message::GroupMod(group) => {
                assert_eq!(GroupModCommand::Modify, group.command);
                assert_eq!(group_id, group.group_id);
                assert_eq!(5, group.buckets[1].watch_port);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(1, installer.get_groups().len());
    }
}
