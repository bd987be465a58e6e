// cargo watch -x 'fmt' -x 'run'  // 'run -- config.yaml --no-cache'

pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod processing;

pub use config::{CliArgs, Config};
pub use pipeline::Pipeline;
