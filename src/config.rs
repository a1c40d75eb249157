use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ControllerError;
use crate::routing_algos::{AntPath, PathFinder, SPF};
use crate::util::{ACOArgs, RandSampler};

/// Upper bound on ant-colony iterations per path request. Path computation
/// blocks every other event, so it must stay short.
pub const MAX_ACO_ITERATIONS: usize = 10_000;

/// Upper bound on ants released per iteration.
pub const MAX_ACO_ANTS: usize = 1_000;
/// Upper bound on ant walks (`n_ants * n_iterations`) per path request.
pub const MAX_ACO_WALKS: usize = 100_000;
/// Upper bound on `alpha` and `beta`.
pub const MAX_ACO_EXPONENT: f64 = 100.0;

const IDLE_TIMEOUT: u16 = 3000;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Dijkstra,
    AntColony,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Idle timeout, in seconds, of rules installed for a path
    pub idle_timeout: u16,
    pub algorithm: Algorithm,
    pub aco: ACOArgs,
    /// Seeds every random draw (ant moves, group ids). Unset means OS entropy.
    pub seed: Option<u64>,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            idle_timeout: IDLE_TIMEOUT,
            algorithm: Algorithm::Dijkstra,
            aco: ACOArgs::default(),
            seed: None,
            log_filter: "info".to_owned(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ControllerError> {
        let txt = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&txt)?;
        config.validate()?;
        Ok(config)
    }
    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ControllerError> {
        match Config::load(path) {
            Err(ControllerError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Config::default())
            }
            other => other,
        }
    }
    pub fn validate(&self) -> Result<(), ControllerError> {
        let aco = &self.aco;
        if aco.n_ants == 0 || aco.n_ants > MAX_ACO_ANTS {
            return Err(ControllerError::Config(format!(
                "aco.n_ants must be within 1..={}",
                MAX_ACO_ANTS
            )));
        }
        if aco.n_best == 0 {
            return Err(ControllerError::Config("aco.n_best must be positive".to_owned()));
        }
        if aco.n_iterations == 0 || aco.n_iterations > MAX_ACO_ITERATIONS {
            return Err(ControllerError::Config(format!(
                "aco.n_iterations must be within 1..={}",
                MAX_ACO_ITERATIONS
            )));
        }
        if aco.n_ants * aco.n_iterations > MAX_ACO_WALKS {
            return Err(ControllerError::Config(format!(
                "aco.n_ants * aco.n_iterations must not exceed {}",
                MAX_ACO_WALKS
            )));
        }
        if !(aco.decay > 0.0 && aco.decay <= 1.0) {
            return Err(ControllerError::Config("aco.decay must be within (0, 1]".to_owned()));
        }
        let exponent_range = 0.0..=MAX_ACO_EXPONENT;
        if !exponent_range.contains(&aco.alpha) || !exponent_range.contains(&aco.beta) {
            return Err(ControllerError::Config(format!(
                "aco.alpha and aco.beta must be within 0..={}",
                MAX_ACO_EXPONENT
            )));
        }
        Ok(())
    }
    pub fn build_path_finder(&self) -> Box<dyn PathFinder> {
        match self.algorithm {
            Algorithm::Dijkstra => Box::new(SPF::new()),
            Algorithm::AntColony => Box::new(AntPath::new(
                self.aco,
                Box::new(RandSampler::from_seed(self.seed)),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph_util::TopologyGraph;

    #[test]
    fn test_partial_json_uses_defaults() -> Result<(), ControllerError> {
        let config: Config = serde_json::from_str(
            r#"{
                "algorithm": "ant_colony",
                "aco": { "n_ants": 8, "n_iterations": 20 },
                "seed": 5
            }"#,
        )?;
        config.validate()?;
        assert_eq!(Algorithm::AntColony, config.algorithm);
        assert_eq!(IDLE_TIMEOUT, config.idle_timeout);
        assert_eq!(8, config.aco.n_ants);
        assert_eq!(2, config.aco.n_best);
        assert_eq!(20, config.aco.n_iterations);
        assert_eq!(0.95, config.aco.decay);
        assert_eq!(Some(5), config.seed);
        assert_eq!("ant_colony", config.build_path_finder().name());
        Ok(())
    }
    #[test]
    fn test_validate_rejects_bad_aco_args() {
        let mut config = Config::default();
        config.aco.n_iterations = MAX_ACO_ITERATIONS + 1;
        assert!(config.validate().is_err());
        let mut config = Config::default();
        config.aco.n_ants = 0;
        assert!(config.validate().is_err());
        let mut config = Config::default();
        config.aco.decay = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.aco.n_ants = MAX_ACO_ANTS + 1;
        assert!(config.validate().is_err());
        let mut config = Config::default();
        config.aco.n_ants = 1_000_000_000;
        assert!(config.validate().is_err());
        // each bound alone is fine, together they exceed the walk budget
        let mut config = Config::default();
        config.aco.n_ants = MAX_ACO_ANTS;
        config.aco.n_iterations = MAX_ACO_ITERATIONS;
        assert!(config.validate().is_err());

        for (alpha, beta) in [(300.0, 1.0), (1.0, -1.0), (-0.5, 1.0), (f64::NAN, 1.0)] {
            let mut config = Config::default();
            config.aco.alpha = alpha;
            config.aco.beta = beta;
            assert!(config.validate().is_err());
        }
        let mut config = Config::default();
        config.aco.alpha = MAX_ACO_EXPONENT;
        config.aco.beta = 0.0;
        assert!(config.validate().is_ok());
        assert!(Config::default().validate().is_ok());
    }
    #[test]
    fn test_ant_colony_with_steep_exponents_finds_path() -> Result<(), ControllerError> {
        let mut g = TopologyGraph::new();
        for id in 1..=3 {
            g.add_switch(id);
        }
        g.add_link(1, 2, 2, 1);
        g.add_link(2, 3, 3, 1);
        let mut config = Config::default();
        config.algorithm = Algorithm::AntColony;
        config.seed = Some(1);
        config.aco.n_iterations = 200;
        config.aco.decay = 1.0;
        config.aco.alpha = MAX_ACO_EXPONENT;
        config.validate()?;
        let mut finder = config.build_path_finder();
        assert_eq!(vec![1, 2, 3], finder.find_path(&g, 1, 3)?);
        Ok(())
    }
    #[test]
    fn test_load_missing_file() -> Result<(), ControllerError> {
        let config = Config::load_or_default("definitely/not/here.json")?;
        assert_eq!(Config::default(), config);
        assert!(Config::load("definitely/not/here.json").is_err());
        Ok(())
    }
    #[test]
    fn test_load_example_config() -> Result<(), ControllerError> {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json");
        let config = Config::load(path)?;
        assert_eq!(Algorithm::Dijkstra, config.algorithm);
        assert_eq!("dijkstra", config.build_path_finder().name());
        Ok(())
    }
}
