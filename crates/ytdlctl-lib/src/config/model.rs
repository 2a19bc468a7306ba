use crate::options::DownloadOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub binary: BinaryConfig,
    pub download: DownloadOptions,
}

/// Where to find the youtube-dl executable.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BinaryConfig {
    /// Explicit path to the executable; takes precedence over everything else
    pub path: Option<PathBuf>,
    /// Use the copy shipped next to the application instead of the one on `PATH`
    pub use_bundled: bool,
    /// Directory holding the bundled copy (default: `lib/` beside the executable)
    pub bundled_dir: Option<PathBuf>,
}
