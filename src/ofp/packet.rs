use std::fmt;
use std::net::Ipv4Addr;

use super::{ETH_TYPE_ARP, ETH_TYPE_IP, ETH_TYPE_IPV6, ETH_TYPE_LLDP};
use crate::error::ControllerError;

const ETH_HEADER_LEN: usize = 14;
const ARP_LEN: usize = 28;
const IPV4_MIN_LEN: usize = 20;

pub const ARP_REQUEST: u16 = 1;
pub const ARP_REPLY: u16 = 2;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddr(pub [u8; 6]);

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let b = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl fmt::Debug for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArpPacket {
    pub opcode: u16,
    pub src_mac: MacAddr,
    pub src_ip: Ipv4Addr,
    pub dst_mac: MacAddr,
    pub dst_ip: Ipv4Addr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Payload {
    Lldp,
    Ipv4 { src: Ipv4Addr, dst: Ipv4Addr },
    Ipv6,
    Arp(ArpPacket),
    Other,
}

/// The parts of a packet-in frame the controller looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub dst: MacAddr,
    pub src: MacAddr,
    pub ethertype: u16,
    pub payload: Payload,
}

fn read_u16(data: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([data[at], data[at + 1]])
}

fn read_mac(data: &[u8], at: usize) -> MacAddr {
    let mut mac = [0; 6];
    mac.copy_from_slice(&data[at..at + 6]);
    MacAddr(mac)
}

fn read_ipv4(data: &[u8], at: usize) -> Ipv4Addr {
    Ipv4Addr::new(data[at], data[at + 1], data[at + 2], data[at + 3])
}

impl Frame {
    pub fn parse(data: &[u8]) -> Result<Frame, ControllerError> {
        if data.len() < ETH_HEADER_LEN {
            return Err(ControllerError::MalformedFrame(format!(
                "ethernet header needs {} bytes, got {}",
                ETH_HEADER_LEN,
                data.len()
            )));
        }
        let ethertype = read_u16(data, 12);
        let body = &data[ETH_HEADER_LEN..];
        let payload = match ethertype {
            ETH_TYPE_LLDP => Payload::Lldp,
            ETH_TYPE_IPV6 => Payload::Ipv6,
            ETH_TYPE_IP => {
                if body.len() < IPV4_MIN_LEN || body[0] >> 4 != 4 {
                    return Err(ControllerError::MalformedFrame(
                        "truncated or non-v4 IP header".to_owned(),
                    ));
                }
                Payload::Ipv4 {
                    src: read_ipv4(body, 12),
                    dst: read_ipv4(body, 16),
                }
            }
            ETH_TYPE_ARP => {
                if body.len() < ARP_LEN {
                    return Err(ControllerError::MalformedFrame(
                        "truncated ARP packet".to_owned(),
                    ));
                }
                Payload::Arp(ArpPacket {
                    opcode: read_u16(body, 6),
                    src_mac: read_mac(body, 8),
                    src_ip: read_ipv4(body, 14),
                    dst_mac: read_mac(body, 18),
                    dst_ip: read_ipv4(body, 24),
                })
            }
            _ => Payload::Other,
        };
        Ok(Frame {
            dst: read_mac(data, 0),
            src: read_mac(data, 6),
            ethertype,
            payload,
        })
    }
}


#[cfg(test)]
mod test {
    use super::build;
    use super::*;

    const H1: MacAddr = MacAddr([0, 0, 0, 0, 0, 1]);
    const H2: MacAddr = MacAddr([0, 0, 0, 0, 0, 2]);

    #[test]
    fn test_parse_arp() -> Result<(), ControllerError> {
        let ip1 = Ipv4Addr::new(10, 0, 0, 1);
        let ip2 = Ipv4Addr::new(10, 0, 0, 2);
        let frame = Frame::parse(&build::arp(ARP_REPLY, H1, ip1, H2, ip2))?;
        assert_eq!(ETH_TYPE_ARP, frame.ethertype);
        assert_eq!(H1, frame.src);
        assert_eq!(H2, frame.dst);
        let expected = ArpPacket {
            opcode: ARP_REPLY,
            src_mac: H1,
            src_ip: ip1,
            dst_mac: H2,
            dst_ip: ip2,
        };
        assert_eq!(Payload::Arp(expected), frame.payload);
        Ok(())
    }
    #[test]
    fn test_parse_ipv4() -> Result<(), ControllerError> {
        let ip1 = Ipv4Addr::new(10, 0, 0, 1);
        let ip2 = Ipv4Addr::new(10, 0, 0, 2);
        let frame = Frame::parse(&build::ipv4(H1, ip1, H2, ip2))?;
        assert_eq!(Payload::Ipv4 { src: ip1, dst: ip2 }, frame.payload);
        Ok(())
    }
    #[test]
    fn test_parse_other_ethertypes() -> Result<(), ControllerError> {
        assert_eq!(Payload::Lldp, Frame::parse(&build::bare(H1, H2, ETH_TYPE_LLDP))?.payload);
        assert_eq!(Payload::Ipv6, Frame::parse(&build::bare(H1, H2, ETH_TYPE_IPV6))?.payload);
        assert_eq!(Payload::Other, Frame::parse(&build::bare(H1, H2, 0x9000))?.payload);
        Ok(())
    }
    #[test]
    fn test_truncated_frames() {
        assert!(Frame::parse(&[0; 10]).is_err());
        let mut arp = build::arp(ARP_REQUEST, H1, Ipv4Addr::LOCALHOST, H2, Ipv4Addr::LOCALHOST);
        arp.truncate(30);
        assert!(Frame::parse(&arp).is_err());
    }
    #[test]
    fn test_mac_display() {
        assert_eq!("00:00:00:00:00:02", H2.to_string());
    }
}
