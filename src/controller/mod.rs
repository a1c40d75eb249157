use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ControllerError;
use crate::flow::{add_ports_to_path, Hop};
use crate::graph_util::{CostMatrix, TopologyGraph};
use crate::ofp::packet::{Frame, MacAddr, Payload, ARP_REPLY, ARP_REQUEST};
use crate::ofp::{
    Action, Datapath, FlowMod, Match, Message, PacketOut, PortNo, ETH_TYPE_IPV6, OFPP_FLOOD,
};
use crate::recorder::{ArpTable, GroupIdAllocator, GroupTable, HostDirectory};
use crate::routing_algos::{compute_path_cost, PathFinder};
use crate::SwitchId;

mod event;
pub use event::{Event, Link, PacketIn};

mod installer;
pub use installer::{bucket_weight, Candidate, FlowInstaller, PRIORITY_ARP, PRIORITY_IP};

mod rearm;
pub use rearm::{MissFlowRearmer, PRIORITY_MISS};

pub const PRIORITY_IPV6_DROP: u16 = 1;

/// Host attachment point: switch and the port the host hangs off.
type Endpoint = (SwitchId, PortNo);

/// Owns all topology, host and group state, and turns one event at a time
/// into messages for the switches.
pub struct Controller {
    config: Config,
    graph: TopologyGraph,
    datapaths: HashMap<SwitchId, Rc<dyn Datapath>>,
    hosts: HostDirectory,
    arp_table: ArpTable,
    installer: FlowInstaller,
    rearmer: MissFlowRearmer,
    path_finder: Box<dyn PathFinder>,
    distances: CostMatrix,
    /// ARP packet-ins since the last installed path
    pkt_count: usize,
}

impl Controller {
    pub fn new(config: Config) -> Result<Self, ControllerError> {
        config.validate()?;
        let path_finder = config.build_path_finder();
        Ok(Controller::with_parts(config, TopologyGraph::new(), path_finder))
    }
    /// Assembles a controller around an existing graph and strategy.
    /// `config` is taken as is.
    pub fn with_parts(
        config: Config,
        graph: TopologyGraph,
        path_finder: Box<dyn PathFinder>,
    ) -> Self {
        let groups = GroupTable::new(GroupIdAllocator::from_seed(config.seed));
        let installer = FlowInstaller::new(config.idle_timeout, groups);
        let distances = graph.cost_matrix();
        Controller {
            config,
            graph,
            datapaths: HashMap::new(),
            hosts: HostDirectory::new(),
            arp_table: ArpTable::new(),
            installer,
            rearmer: MissFlowRearmer::new(),
            path_finder,
            distances,
            pkt_count: 0,
        }
    }

    pub fn run<I: IntoIterator<Item = Event>>(&mut self, events: I) {
        for ev in events {
            self.handle(ev);
        }
    }
    /// Processes one event. A failure only aborts this event.
    pub fn handle(&mut self, ev: Event) {
        debug!(?ev, "event");
        if let Err(err) = self.dispatch(ev) {
            warn!(%err, "event aborted");
        }
    }
    pub fn dispatch(&mut self, ev: Event) -> Result<(), ControllerError> {
        match ev {
            Event::SwitchEnter(dp) => self.switch_enter(dp),
            Event::SwitchLeave(id) => self.switch_leave(id),
            Event::LinkAdd(link) => self.link_add(link),
            Event::LinkDelete(link) => self.link_delete(link),
            Event::SwitchFeatures(dp) => self.switch_features(dp),
            Event::SwitchDisconnect(id) => self.switch_disconnect(id),
            Event::PacketIn(pkt) => return self.packet_in(pkt),
        }
        Ok(())
    }

    fn switch_enter(&mut self, dp: Rc<dyn Datapath>) {
        let id = dp.id();
        if self.graph.add_switch(id) {
            self.datapaths.insert(id, dp);
            info!(switch = id, "switch entered the network");
            self.refresh_distances();
        }
        self.pkt_count = 0;
    }
    fn switch_leave(&mut self, id: SwitchId) {
        if self.graph.remove_switch(id) {
            self.datapaths.remove(&id);
            info!(switch = id, "switch left the network");
            self.refresh_distances();
        }
    }
    fn link_add(&mut self, link: Link) {
        self.graph
            .add_link(link.src, link.src_port, link.dst, link.dst_port);
        debug!(?link, "link added");
        self.refresh_distances();
    }
    fn link_delete(&mut self, link: Link) {
        let removed = self.graph.remove_link(link.src, link.dst);
        info!(src = link.src, dst = link.dst, removed, "link has failed");
        self.refresh_distances();
        self.rearmer.rearm(&[link.src, link.dst]);
    }
    fn switch_features(&mut self, dp: Rc<dyn Datapath>) {
        debug!(switch = dp.id(), "installing table-miss entry");
        self.rearmer.install(dp);
    }
    fn switch_disconnect(&mut self, id: SwitchId) {
        if self.rearmer.forget(id) {
            debug!(switch = id, "datapath unregistered");
        }
    }
    fn refresh_distances(&mut self) {
        self.distances = self.graph.cost_matrix();
        debug!(distances = ?self.distances.rows(), "cost matrix recomputed");
    }

    fn packet_in(&mut self, pkt: PacketIn) -> Result<(), ControllerError> {
        let frame = Frame::parse(&pkt.data)?;
        let dp = self
            .datapaths
            .get(&pkt.dpid)
            .cloned()
            .or_else(|| self.rearmer.datapath(pkt.dpid))
            .ok_or(ControllerError::UnknownSwitch(pkt.dpid))?;

        match frame.payload {
            Payload::Lldp => return Ok(()),
            Payload::Ipv4 { src, dst } => {
                self.arp_table.insert(src, frame.src);
                return match self.route_pair(frame.src, frame.dst, src, dst) {
                    Ok(_) => Ok(()),
                    Err(err) if err.is_recoverable() => {
                        debug!(%err, "flooding ipv4 packet");
                        self.packet_out(dp.as_ref(), &pkt, OFPP_FLOOD);
                        Ok(())
                    }
                    Err(err) => Err(err),
                };
            }
            Payload::Ipv6 => {
                let drop = FlowMod::add(
                    PRIORITY_IPV6_DROP,
                    Match::eth_type(ETH_TYPE_IPV6),
                    vec![],
                );
                dp.send_msg(Message::FlowMod(drop));
                return Ok(());
            }
            _ => (),
        }

        if self.hosts.learn(frame.src, pkt.dpid, pkt.in_port) {
            info!(host = %frame.src, switch = pkt.dpid, port = pkt.in_port, "host learned");
        }
        let mut out_port = OFPP_FLOOD;
        if let Payload::Arp(arp) = frame.payload {
            self.pkt_count += 1;
            let target = match arp.opcode {
                ARP_REPLY => {
                    self.arp_table.insert(arp.src_ip, frame.src);
                    Some(frame.dst)
                }
                ARP_REQUEST => self.arp_table.get(&arp.dst_ip).map(|mac| {
                    self.arp_table.insert(arp.src_ip, frame.src);
                    mac
                }),
                _ => None,
            };
            if let Some(dst_mac) = target {
                match self.route_pair(frame.src, dst_mac, arp.src_ip, arp.dst_ip) {
                    Ok(first) if first.switch == pkt.dpid => out_port = first.out_port,
                    Ok(_) => (),
                    Err(err) if err.is_recoverable() => debug!(%err, "flooding arp packet"),
                    Err(err) => return Err(err),
                }
            }
        }
        self.packet_out(dp.as_ref(), &pkt, out_port);
        Ok(())
    }

    /// Installs both directions between two hosts and returns the first hop
    /// of the forward direction.
    fn route_pair(
        &mut self,
        src_mac: MacAddr,
        dst_mac: MacAddr,
        ip_src: Ipv4Addr,
        ip_dst: Ipv4Addr,
    ) -> Result<Hop, ControllerError> {
        let h1 = self
            .hosts
            .get(&src_mac)
            .ok_or(ControllerError::UnknownHost(src_mac))?;
        let h2 = self
            .hosts
            .get(&dst_mac)
            .ok_or(ControllerError::UnknownHost(dst_mac))?;
        let first = self.install_path(h1, h2, ip_src, ip_dst)?;
        self.install_path(h2, h1, ip_dst, ip_src)?;
        Ok(first)
    }
    pub fn install_path(
        &mut self,
        from: Endpoint,
        to: Endpoint,
        ip_src: Ipv4Addr,
        ip_dst: Ipv4Addr,
    ) -> Result<Hop, ControllerError> {
        let start = Instant::now();
        let (src, first_port) = from;
        let (dst, last_port) = to;
        let path = self.path_finder.find_path(&self.graph, src, dst)?;
        let cost = compute_path_cost(&self.graph, &path);
        let hops = add_ports_to_path(&self.graph, &path, first_port, last_port)?;
        self.installer
            .install_path(&self.datapaths, &hops, cost, ip_src, ip_dst)?;
        info!(
            finder = self.path_finder.name(),
            ?path,
            delay = cost.delay,
            hops = cost.hops,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            control_packets = self.pkt_count,
            "path installed"
        );
        self.pkt_count = 0;
        hops.first()
            .copied()
            .ok_or(ControllerError::NoPath { src, dst })
    }
    fn packet_out(&self, dp: &dyn Datapath, pkt: &PacketIn, port: PortNo) {
        let data = match pkt.buffer_id {
            Some(_) => None,
            None => Some(pkt.data.clone()),
        };
        dp.send_msg(Message::PacketOut(PacketOut {
            buffer_id: pkt.buffer_id,
            in_port: pkt.in_port,
            actions: vec![Action::output(port)],
            data,
        }));
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }
    pub fn get_graph(&self) -> &TopologyGraph {
        &self.graph
    }
    pub fn get_distances(&self) -> &CostMatrix {
        &self.distances
    }
    pub fn get_hosts(&self) -> &HostDirectory {
        &self.hosts
    }
    pub fn get_arp_table(&self) -> &ArpTable {
        &self.arp_table
    }
    pub fn get_installer(&self) -> &FlowInstaller {
        &self.installer
    }
    pub fn get_rearmer(&self) -> &MissFlowRearmer {
        &self.rearmer
    }
    pub fn get_datapath(&self, id: SwitchId) -> Option<&Rc<dyn Datapath>> {
        self.datapaths.get(&id)
    }
    pub fn control_packets(&self) -> usize {
        self.pkt_count
    }
}
