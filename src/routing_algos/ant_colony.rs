use tracing::debug;

use super::PathFinder;
use crate::error::ControllerError;
use crate::flow::Path;
use crate::graph_util::TopologyGraph;
use crate::util::{ACOArgs, AntColony, WeightedSampler};
use crate::SwitchId;

/// Approximates the least-delay path with an ant colony that is rebuilt for
/// every request.
pub struct AntPath {
    args: ACOArgs,
    sampler: Box<dyn WeightedSampler>,
}

impl AntPath {
    pub fn new(args: ACOArgs, sampler: Box<dyn WeightedSampler>) -> Self {
        AntPath { args, sampler }
    }
    pub fn get_args(&self) -> &ACOArgs {
        &self.args
    }
}

impl PathFinder for AntPath {
    fn name(&self) -> &'static str {
        "ant_colony"
    }
    fn find_path(
        &mut self,
        g: &TopologyGraph,
        src: SwitchId,
        dst: SwitchId,
    ) -> Result<Path, ControllerError> {
        if src == dst {
            return Ok(vec![src]);
        }
        let distances = g.cost_matrix();
        let no_path = ControllerError::NoPath { src, dst };
        let (src_i, dst_i) = match (distances.index_of(src), distances.index_of(dst)) {
            (Some(s), Some(d)) => (s, d),
            _ => return Err(no_path),
        };
        let mut colony = AntColony::new(&distances, self.args);
        let res = colony
            .run(src_i, dst_i, self.sampler.as_mut())
            .ok_or(no_path)?;
        debug!(
            src,
            dst,
            dist = res.dist,
            history = ?res.best_history,
            "ant colony finished"
        );
        Ok(res.route.into_iter().map(|i| distances.id_at(i)).collect())
    }
}
