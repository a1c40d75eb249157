#![allow(dead_code)]

use std::cell::RefCell;
use std::net::Ipv4Addr;
use std::rc::Rc;

use sdn_router::ofp::packet::{MacAddr, ARP_REQUEST};
use sdn_router::ofp::{Datapath, FlowMod, Message, ETH_TYPE_ARP, ETH_TYPE_IP};
use sdn_router::{Controller, Event, Link, PacketIn, SwitchId};

pub const H1: MacAddr = MacAddr([0x02, 0, 0, 0, 0, 0x01]);
pub const H2: MacAddr = MacAddr([0x02, 0, 0, 0, 0, 0x02]);
pub const IP1: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
pub const IP2: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);

pub struct FakeSwitch {
    id: SwitchId,
    sent: RefCell<Vec<Message>>,
}

impl FakeSwitch {
    pub fn new(id: SwitchId) -> Rc<Self> {
        Rc::new(FakeSwitch {
            id,
            sent: RefCell::new(vec![]),
        })
    }
    pub fn take(&self) -> Vec<Message> {
        self.sent.borrow_mut().drain(..).collect()
    }
    pub fn take_flow_mods(&self) -> Vec<FlowMod> {
        self.take()
            .into_iter()
            .filter_map(|msg| match msg {
                Message::FlowMod(flow) => Some(flow),
                _ => None,
            })
            .collect()
    }
}

impl Datapath for FakeSwitch {
    fn id(&self) -> SwitchId {
        self.id
    }
    fn send_msg(&self, msg: Message) {
        self.sent.borrow_mut().push(msg);
    }
}

/// Switches `1..=n` in a line. Switch `i` reaches `i + 1` on port 3 and
/// `i - 1` on port 2; port 1 is left for hosts.
pub fn line(ctrl: &mut Controller, n: SwitchId) -> Vec<Rc<FakeSwitch>> {
    let switches: Vec<_> = (1..=n).map(FakeSwitch::new).collect();
    for sw in switches.iter() {
        ctrl.handle(Event::SwitchEnter(sw.clone()));
        ctrl.handle(Event::SwitchFeatures(sw.clone()));
    }
    for id in 1..n {
        ctrl.handle(Event::LinkAdd(link(id, id + 1)));
    }
    for sw in switches.iter() {
        sw.take();
    }
    switches
}

pub fn link(s1: SwitchId, s2: SwitchId) -> Link {
    Link {
        src: s1,
        src_port: 3,
        dst: s2,
        dst_port: 2,
    }
}

pub fn packet_in(dpid: SwitchId, in_port: u32, data: Vec<u8>) -> Event {
    Event::PacketIn(PacketIn {
        dpid,
        in_port,
        buffer_id: None,
        data,
    })
}

fn eth(dst: MacAddr, src: MacAddr, ethertype: u16) -> Vec<u8> {
    let mut v = Vec::with_capacity(64);
    v.extend_from_slice(&dst.0);
    v.extend_from_slice(&src.0);
    v.extend_from_slice(&ethertype.to_be_bytes());
    v
}

pub fn arp(
    opcode: u16,
    src: MacAddr,
    src_ip: Ipv4Addr,
    dst: MacAddr,
    dst_ip: Ipv4Addr,
) -> Vec<u8> {
    let eth_dst = if opcode == ARP_REQUEST {
        MacAddr([0xff; 6])
    } else {
        dst
    };
    let mut v = eth(eth_dst, src, ETH_TYPE_ARP);
    v.extend_from_slice(&[0, 1, 0x08, 0x00, 6, 4]);
    v.extend_from_slice(&opcode.to_be_bytes());
    v.extend_from_slice(&src.0);
    v.extend_from_slice(&src_ip.octets());
    v.extend_from_slice(&dst.0);
    v.extend_from_slice(&dst_ip.octets());
    v
}

pub fn ipv4(src: MacAddr, src_ip: Ipv4Addr, dst: MacAddr, dst_ip: Ipv4Addr) -> Vec<u8> {
    let mut v = eth(dst, src, ETH_TYPE_IP);
    let mut header = [0u8; 20];
    header[0] = 0x45;
    header[9] = 17;
    header[12..16].copy_from_slice(&src_ip.octets());
    header[16..20].copy_from_slice(&dst_ip.octets());
    v.extend_from_slice(&header);
    v
}

pub fn bare(src: MacAddr, dst: MacAddr, ethertype: u16) -> Vec<u8> {
    let mut v = eth(dst, src, ethertype);
    v.extend_from_slice(&[0; 46]);
    v
}
