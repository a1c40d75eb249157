use crate::error::ControllerError;
use crate::graph_util::TopologyGraph;
use crate::ofp::PortNo;
use crate::SwitchId;

/// Switches from source to destination, both included.
pub type Path = Vec<SwitchId>;

/// One switch of a path with the ports the traffic enters and leaves by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hop {
    pub switch: SwitchId,
    pub in_port: PortNo,
    pub out_port: PortNo,
}

/// Expands a path into hops. `first_port` is where the source host hangs off
/// the first switch and `last_port` where the destination host hangs off the
/// last one.
pub fn add_ports_to_path(
    g: &TopologyGraph,
    path: &[SwitchId],
    first_port: PortNo,
    last_port: PortNo,
) -> Result<Vec<Hop>, ControllerError> {
    let mut hops = Vec::with_capacity(path.len());
    let mut in_port = first_port;
    for pair in path.windows(2) {
        let (s1, s2) = (pair[0], pair[1]);
        let out_port = g
            .neighbor_port(s1, s2)
            .ok_or(ControllerError::MissingPorts { from: s1, to: s2 })?;
        hops.push(Hop {
            switch: s1,
            in_port,
            out_port,
        });
        in_port = g
            .neighbor_port(s2, s1)
            .ok_or(ControllerError::MissingPorts { from: s2, to: s1 })?;
    }
    if let Some(&last) = path.last() {
        hops.push(Hop {
            switch: last,
            in_port,
            out_port: last_port,
        });
    }
    Ok(hops)
}
