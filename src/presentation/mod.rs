pub mod cli;
pub mod config;

pub use cli::{Invocation, build_cli, parse_invocation};
pub use config::{Environment, Settings, TransferSettings};
