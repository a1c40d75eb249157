use tracing_subscriber::EnvFilter;

pub mod config;
pub mod controller;
pub mod error;
pub mod flow;
pub mod graph_util;
pub mod ofp;
pub mod recorder;
pub mod routing_algos;
pub mod util;

pub type SwitchId = u64;

pub use config::{Algorithm, Config};
pub use controller::{Controller, Event, Link, PacketIn};
pub use error::ControllerError;

/// Installs the global fmt subscriber. `RUST_LOG` takes precedence over
/// `default_filter`, which the embedding runtime usually takes from
/// [`Config::log_filter`]. Calling it again is a no-op.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
