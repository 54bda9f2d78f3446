//! CLI command handlers, one file per subcommand.

mod cleanup;
mod completions;
mod download;
mod settings;

pub use cleanup::run_cleanup;
pub use completions::run_completions;
pub use download::{run_collection, run_episode};
pub use settings::run_settings;
