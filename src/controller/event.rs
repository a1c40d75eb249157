use std::fmt;
use std::rc::Rc;

use crate::ofp::{Datapath, PortNo};
use crate::SwitchId;

/// One side's port assignment is carried for each end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub src: SwitchId,
    pub src_port: PortNo,
    pub dst: SwitchId,
    pub dst_port: PortNo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketIn {
    pub dpid: SwitchId,
    pub in_port: PortNo,
    /// `None` when the switch sent the whole frame instead of buffering it.
    pub buffer_id: Option<u32>,
    pub data: Vec<u8>,
}

/// Everything the network runtime can tell the controller.
#[derive(Clone)]
pub enum Event {
    SwitchEnter(Rc<dyn Datapath>),
    SwitchLeave(SwitchId),
    LinkAdd(Link),
    LinkDelete(Link),
    PacketIn(PacketIn),
    /// Features reply of a freshly connected switch.
    SwitchFeatures(Rc<dyn Datapath>),
    /// The control connection to a switch went away.
    SwitchDisconnect(SwitchId),
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Event::SwitchEnter(dp) => write!(f, "SwitchEnter({})", dp.id()),
            Event::SwitchLeave(id) => write!(f, "SwitchLeave({})", id),
            Event::LinkAdd(link) => write!(f, "LinkAdd({:?})", link),
            Event::LinkDelete(link) => write!(f, "LinkDelete({:?})", link),
            Event::PacketIn(pkt) => write!(
                f,
                "PacketIn(dpid: {}, in_port: {}, {} bytes)",
                pkt.dpid,
                pkt.in_port,
                pkt.data.len()
            ),
            Event::SwitchFeatures(dp) => write!(f, "SwitchFeatures({})", dp.id()),
            Event::SwitchDisconnect(id) => write!(f, "SwitchDisconnect({})", id),
        }
    }
}
