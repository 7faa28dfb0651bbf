pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fs;
pub mod interact;
pub mod model;
pub mod normalize;
pub mod output;
pub mod persist;
pub mod server;
pub mod service;
pub mod store;
pub mod style;
pub mod stylesheet;
pub mod taxonomy;
pub mod view;

pub use cli::Cli;
pub use commands::{cmd_import, cmd_init, cmd_inspect, cmd_serve};
pub use config::Config;
pub use normalize::normalize;
pub use service::{GraphService, OpOutcome, ServiceError};
pub use store::GraphStore;
pub use view::GraphView;
