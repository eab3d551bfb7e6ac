// Exposed for the integration tests
pub mod logging;
pub mod server;

pub mod cli;
pub use cli::{Cli, Commands, run_with_cli};
