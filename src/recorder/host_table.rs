use std::collections::HashMap;
use std::net::Ipv4Addr;

use crate::ofp::packet::MacAddr;
use crate::ofp::PortNo;
use crate::SwitchId;

/// Where each host is attached. The first sighting sticks.
#[derive(Clone, Debug, Default)]
pub struct HostDirectory {
    hosts: HashMap<MacAddr, (SwitchId, PortNo)>,
}

impl HostDirectory {
    pub fn new() -> Self {
        HostDirectory::default()
    }
    /// Returns false if the host was already bound.
    pub fn learn(&mut self, mac: MacAddr, switch: SwitchId, port: PortNo) -> bool {
        if self.hosts.contains_key(&mac) {
            return false;
        }
        self.hosts.insert(mac, (switch, port));
        true
    }
    pub fn get(&self, mac: &MacAddr) -> Option<(SwitchId, PortNo)> {
        self.hosts.get(mac).copied()
    }
    pub fn len(&self) -> usize {
        self.hosts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

/// IP to MAC, overwritten by every observation.
#[derive(Clone, Debug, Default)]
pub struct ArpTable {
    table: HashMap<Ipv4Addr, MacAddr>,
}

impl ArpTable {
    pub fn new() -> Self {
        ArpTable::default()
    }
    pub fn insert(&mut self, ip: Ipv4Addr, mac: MacAddr) {
        self.table.insert(ip, mac);
    }
    pub fn get(&self, ip: &Ipv4Addr) -> Option<MacAddr> {
        self.table.get(ip).copied()
    }
    pub fn contains(&self, ip: &Ipv4Addr) -> bool {
        self.table.contains_key(ip)
    }
}
