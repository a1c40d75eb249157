pub mod aco;
pub use aco::{ACOArgs, AntColony};

mod dijkstra;
pub use dijkstra::{backtrace, Dijkstra};

mod sampler;
pub use sampler::{GreedySampler, RandSampler, WeightedSampler};
