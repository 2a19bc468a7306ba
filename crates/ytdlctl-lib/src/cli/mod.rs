mod args;
mod download;
mod follow;
mod params;
mod resolved_command;
mod show_command;
mod update;

pub use args::{Args, BinarySelection, Command, DownloadOverrides, parse_args};
pub use download::run_download;
pub use params::RunParams;
pub use resolved_command::{ResolvedCommand, resolve_command};
pub use show_command::run_show_command;
pub use update::run_update;
