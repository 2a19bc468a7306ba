use eyre::{Result, eyre};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use ytdlctl_lib::config::{AppConfig, BinaryConfig};
use ytdlctl_lib::options::DownloadOptions;
use ytdlctl_lib::process::{Run, RunEvent};

/// Writes an executable shell script standing in for youtube-dl.
#[cfg(unix)]
pub fn write_fake_youtube_dl(dir: &Path, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("youtube-dl");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

pub fn create_test_config(binary_path: &Path) -> AppConfig {
    AppConfig {
        binary: BinaryConfig {
            path: Some(binary_path.to_path_buf()),
            ..Default::default()
        },
        download: DownloadOptions {
            output: Some("%(title)s.%(ext)s".to_string()),
            retries: Some(-1),
            rate_limit: Some(5.0),
            rate_limit_unit: ytdlctl_lib::options::ByteUnit::K,
            embed_subs: true,
            ..Default::default()
        },
    }
}

/// Creates a temp dir holding a fake youtube-dl and a `config.json` pointing at it.
#[cfg(unix)]
pub fn setup_test_environment(script_body: &str) -> Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;

    let binary_path = write_fake_youtube_dl(temp_dir.path(), script_body)?;
    let config = create_test_config(&binary_path);
    let config_path = temp_dir.path().join("config.json");
    std::fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    Ok(temp_dir)
}

/// Collects events until the run reports its exit.
pub async fn collect_events(run: &mut Run, timeout_secs: u64) -> Result<Vec<RunEvent>> {
    let mut events = Vec::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(timeout_secs);

    loop {
        let event = tokio::time::timeout_at(deadline, run.next_event())
            .await
            .map_err(|_| eyre!("Run did not finish within {} seconds", timeout_secs))?;
        match event {
            Some(event @ RunEvent::Exited(_)) => {
                events.push(event);
                return Ok(events);
            }
            Some(event) => events.push(event),
            None => return Ok(events),
        }
    }
}

pub async fn wait_for_file_creation(path: &Path, timeout_secs: u64) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed().as_secs() < timeout_secs {
        if path.exists() {
            return true;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }
    false
}
