use crate::options::DownloadOptions;
use crate::process::ExecutableLocator;

#[derive(Debug, Clone)]
pub struct RunParams {
    pub locator: ExecutableLocator,
    pub options: DownloadOptions,
}
