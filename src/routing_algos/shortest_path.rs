use tracing::debug;

use super::PathFinder;
use crate::error::ControllerError;
use crate::flow::Path;
use crate::graph_util::TopologyGraph;
use crate::util::Dijkstra;
use crate::SwitchId;

/// Least total delay via Dijkstra.
#[derive(Clone, Copy, Debug, Default)]
pub struct SPF;

impl SPF {
    pub fn new() -> Self {
        SPF
    }
}

impl PathFinder for SPF {
    fn name(&self) -> &'static str {
        "dijkstra"
    }
    fn find_path(
        &mut self,
        g: &TopologyGraph,
        src: SwitchId,
        dst: SwitchId,
    ) -> Result<Path, ControllerError> {
        debug!(src, dst, "delay-based shortest path search");
        let (_, route) = Dijkstra::new(g)
            .get_route(src, dst)
            .ok_or(ControllerError::NoPath { src, dst })?;
        Ok(route)
    }
}
