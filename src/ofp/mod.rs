//! The slice of OpenFlow 1.3 the controller speaks. Byte-level encoding of
//! these messages belongs to whatever runtime implements [`Datapath`].

use std::net::Ipv4Addr;

use crate::SwitchId;

pub mod packet;

pub type PortNo = u32;
pub type GroupId = u32;

pub const OFPP_FLOOD: PortNo = 0xffff_fffb;
pub const OFPP_CONTROLLER: PortNo = 0xffff_fffd;
pub const OFPP_ANY: PortNo = 0xffff_ffff;
pub const OFPG_ANY: GroupId = 0xffff_ffff;
pub const OFPCML_NO_BUFFER: u16 = 0xffff;

pub const ETH_TYPE_IP: u16 = 0x0800;
pub const ETH_TYPE_ARP: u16 = 0x0806;
pub const ETH_TYPE_IPV6: u16 = 0x86dd;
pub const ETH_TYPE_LLDP: u16 = 0x88cc;

/// Unset fields are wildcards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Match {
    pub in_port: Option<PortNo>,
    pub eth_type: Option<u16>,
    pub ipv4_src: Option<Ipv4Addr>,
    pub ipv4_dst: Option<Ipv4Addr>,
    pub arp_spa: Option<Ipv4Addr>,
    pub arp_tpa: Option<Ipv4Addr>,
}

impl Match {
    pub fn match_all() -> Self {
        Match::default()
    }
    pub fn ipv4(in_port: PortNo, src: Ipv4Addr, dst: Ipv4Addr) -> Self {
        Match {
            in_port: Some(in_port),
            eth_type: Some(ETH_TYPE_IP),
            ipv4_src: Some(src),
            ipv4_dst: Some(dst),
            ..Match::default()
        }
    }
    pub fn arp(in_port: PortNo, spa: Ipv4Addr, tpa: Ipv4Addr) -> Self {
        Match {
            in_port: Some(in_port),
            eth_type: Some(ETH_TYPE_ARP),
            arp_spa: Some(spa),
            arp_tpa: Some(tpa),
            ..Match::default()
        }
    }
    pub fn eth_type(eth_type: u16) -> Self {
        Match {
            eth_type: Some(eth_type),
            ..Match::default()
        }
    }
    pub fn is_wildcard(&self) -> bool {
        *self == Match::default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Output { port: PortNo, max_len: u16 },
    Group(GroupId),
}

impl Action {
    pub fn output(port: PortNo) -> Self {
        Action::Output { port, max_len: 0 }
    }
    pub fn to_controller() -> Self {
        Action::Output {
            port: OFPP_CONTROLLER,
            max_len: OFPCML_NO_BUFFER,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bucket {
    pub weight: u16,
    pub watch_port: PortNo,
    pub watch_group: GroupId,
    pub actions: Vec<Action>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowModCommand {
    Add,
    Delete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowMod {
    pub command: FlowModCommand,
    pub table_id: u8,
    pub priority: u16,
    pub idle_timeout: Option<u16>,
    pub buffer_id: Option<u32>,
    pub out_port: PortNo,
    pub out_group: GroupId,
    pub match_fields: Match,
    /// Applied as a single apply-actions instruction. Empty means drop.
    pub actions: Vec<Action>,
}

impl FlowMod {
    pub fn add(priority: u16, match_fields: Match, actions: Vec<Action>) -> Self {
        FlowMod {
            command: FlowModCommand::Add,
            table_id: 0,
            priority,
            idle_timeout: None,
            buffer_id: None,
            out_port: OFPP_ANY,
            out_group: OFPG_ANY,
            match_fields,
            actions,
        }
    }
    /// Deletes every entry of `table_id` matched by `match_fields`.
    pub fn delete_all(table_id: u8, match_fields: Match) -> Self {
        FlowMod {
            command: FlowModCommand::Delete,
            table_id,
            priority: 0,
            idle_timeout: None,
            buffer_id: None,
            out_port: OFPP_ANY,
            out_group: OFPG_ANY,
            match_fields,
            actions: vec![],
        }
    }
    pub fn with_idle_timeout(mut self, idle_timeout: Option<u16>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupModCommand {
    Add,
    Modify,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupType {
    Select,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupMod {
    pub command: GroupModCommand,
    pub group_type: GroupType,
    pub group_id: GroupId,
    pub buckets: Vec<Bucket>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketOut {
    pub buffer_id: Option<u32>,
    pub in_port: PortNo,
    pub actions: Vec<Action>,
    /// Raw frame, only present when the switch did not buffer it.
    pub data: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    FlowMod(FlowMod),
    GroupMod(GroupMod),
    PacketOut(PacketOut),
}

/// Handle to a connected switch. Sends are fire-and-forget.
pub trait Datapath {
    fn id(&self) -> SwitchId;
    fn send_msg(&self, msg: Message);
}
