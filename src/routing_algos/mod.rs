use crate::error::ControllerError;
use crate::flow::Path;
use crate::graph_util::TopologyGraph;
use crate::SwitchId;

/// Path selection strategy, picked once when the controller starts.
pub trait PathFinder {
    fn name(&self) -> &'static str;
    /// A path from `src` to `dst` over the current topology, or
    /// [`ControllerError::NoPath`].
    fn find_path(
        &mut self,
        g: &TopologyGraph,
        src: SwitchId,
        dst: SwitchId,
    ) -> Result<Path, ControllerError>;
}

mod shortest_path;
pub use shortest_path::SPF;

mod ant_colony;
pub use ant_colony::AntPath;

mod cost_calculator;
pub use cost_calculator::{compute_path_cost, PathCost};
