use crate::config::BinaryConfig;
use crate::error::YtdlError;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

pub const DEFAULT_EXECUTABLE_NAME: &str = "youtube-dl";
const BUNDLED_DIR_NAME: &str = "lib";

/// Decides which youtube-dl executable a run uses.
///
/// Resolution order: an explicit path, then the bundled copy (if enabled), then the
/// system `PATH`.
#[derive(Clone, Debug)]
pub struct ExecutableLocator {
    name: String,
    explicit_path: Option<PathBuf>,
    use_bundled: bool,
    bundled_dir: Option<PathBuf>,
}

impl Default for ExecutableLocator {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTABLE_NAME)
    }
}

impl ExecutableLocator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            explicit_path: None,
            use_bundled: false,
            bundled_dir: None,
        }
    }

    pub fn from_config(config: &BinaryConfig) -> Self {
        Self {
            explicit_path: config.path.clone(),
            use_bundled: config.use_bundled,
            bundled_dir: config.bundled_dir.clone(),
            ..Self::default()
        }
    }

    pub fn with_explicit_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Use the copy shipped beside the application. `dir` overrides the default
    /// `lib/` directory next to the running executable.
    pub fn with_bundled(mut self, dir: Option<PathBuf>) -> Self {
        self.use_bundled = true;
        if dir.is_some() {
            self.bundled_dir = dir;
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[instrument(level = "debug", skip(self), fields(name = %self.name), err)]
    pub fn locate(&self) -> Result<PathBuf, YtdlError> {
        if let Some(path) = &self.explicit_path {
            let resolved = which::which(path).map_err(|e| self.not_found(path, e))?;
            debug!(path = %resolved.display(), "Using explicitly configured executable");
            return Ok(resolved);
        }

        if self.use_bundled {
            let dir = match &self.bundled_dir {
                Some(dir) => dir.clone(),
                None => default_bundled_dir()?,
            };
            let path = dir.join(format!("{}{}", self.name, std::env::consts::EXE_SUFFIX));
            if !path.is_file() {
                return Err(self.not_found(&path, "bundled executable is missing"));
            }
            ensure_executable(&path)?;
            debug!(path = %path.display(), "Using bundled executable");
            return Ok(path);
        }

        let resolved = which::which(&self.name).map_err(|e| self.not_found(&self.name, e))?;
        debug!(path = %resolved.display(), "Resolved executable on PATH");
        Ok(resolved)
    }

    fn not_found(&self, looked_up: impl AsRef<Path>, reason: impl ToString) -> YtdlError {
        YtdlError::ExecutableNotFound {
            name: self.name.clone(),
            reason: format!("{}: {}", looked_up.as_ref().display(), reason.to_string()),
        }
    }
}

fn default_bundled_dir() -> Result<PathBuf, YtdlError> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().ok_or_else(|| YtdlError::ExecutableNotFound {
        name: DEFAULT_EXECUTABLE_NAME.to_string(),
        reason: format!("{} has no parent directory", exe.display()),
    })?;
    Ok(dir.join(BUNDLED_DIR_NAME))
}

/// Restores the execute bits on the bundled copy, which archive extraction tends to drop.
#[cfg(unix)]
fn ensure_executable(path: &Path) -> Result<(), YtdlError> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = std::fs::metadata(path)?.permissions();
    let mode = permissions.mode();
    if mode & 0o100 == 0 {
        permissions.set_mode(mode | 0o111);
        std::fs::set_permissions(path, permissions)?;
        tracing::info!(path = %path.display(), "Added missing execute permission");
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_executable(_path: &Path) -> Result<(), YtdlError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_path() {
        let locator = ExecutableLocator::default().with_explicit_path("/nonexistent/youtube-dl");

        assert!(matches!(
            locator.locate(),
            Err(YtdlError::ExecutableNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_on_path() {
        let locator = ExecutableLocator::new("ytdlctl-test-binary-that-does-not-exist");

        assert!(matches!(
            locator.locate(),
            Err(YtdlError::ExecutableNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_bundled_copy() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ExecutableLocator::default().with_bundled(Some(dir.path().to_path_buf()));

        let err = locator.locate().unwrap_err();
        match err {
            YtdlError::ExecutableNotFound { name, reason } => {
                assert_eq!(name, "youtube-dl");
                assert!(reason.contains("bundled executable is missing"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_explicit_path_wins_over_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ExecutableLocator::default()
            .with_bundled(Some(dir.path().to_path_buf()))
            .with_explicit_path(dir.path().join("nowhere"));

        let err = locator.locate().unwrap_err();
        match err {
            YtdlError::ExecutableNotFound { reason, .. } => assert!(reason.contains("nowhere")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_bundled_copy_gets_execute_permission() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("youtube-dl");
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let locator = ExecutableLocator::default().with_bundled(Some(dir.path().to_path_buf()));
        let resolved = locator.locate().unwrap();

        assert_eq!(resolved, path);
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_from_config() {
        let config = BinaryConfig {
            path: None,
            use_bundled: true,
            bundled_dir: Some(PathBuf::from("/opt/ytdl")),
        };
        let locator = ExecutableLocator::from_config(&config);

        assert_eq!(locator.name(), DEFAULT_EXECUTABLE_NAME);
        assert!(locator.use_bundled);
        assert_eq!(locator.bundled_dir, Some(PathBuf::from("/opt/ytdl")));
    }
}
