use crate::cli::args::{BinarySelection, Command, DownloadOverrides};
use crate::cli::params::RunParams;
use crate::config::{AppConfig, load_config};
use crate::error::YtdlError;
use crate::options::{
    DEFAULT_MALFORMED_CUSTOM_AUDIO_QUALITY, DEFAULT_MALFORMED_RATE_LIMIT,
    DEFAULT_MALFORMED_RETRIES, DEFAULT_MALFORMED_SOCKET_TIMEOUT, DownloadOptions, parse_lenient,
};
use crate::process::ExecutableLocator;

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    Download(RunParams),
    Update(RunParams),
    ShowCommand(RunParams),
}

pub fn resolve_command(command: Command) -> Result<ResolvedCommand, YtdlError> {
    match command {
        Command::Download { binary, overrides } => {
            let params = resolve_run_params(&binary, overrides)?;

            let has_batch_file = params
                .options
                .batch_file
                .as_deref()
                .is_some_and(|path| !path.trim().is_empty());
            if params.options.urls.is_empty() && !has_batch_file {
                return Err(YtdlError::CliArgumentValidation {
                    details: "No URLs given. Pass at least one URL or configure download.batch_file."
                        .to_string(),
                });
            }

            Ok(ResolvedCommand::Download(params))
        }
        Command::Update { binary } => {
            let mut params = resolve_run_params(&binary, DownloadOverrides::default())?;
            params.options.update = true;
            Ok(ResolvedCommand::Update(params))
        }
        Command::ShowCommand { binary, overrides } => Ok(ResolvedCommand::ShowCommand(
            resolve_run_params(&binary, overrides)?,
        )),
    }
}

fn resolve_run_params(
    binary: &BinarySelection,
    overrides: DownloadOverrides,
) -> Result<RunParams, YtdlError> {
    let app_config = match &binary.config_path {
        Some(config_path) => {
            tracing::info!("Loading configuration from {}", config_path);
            load_config(config_path)?
        }
        None => AppConfig::default(),
    };

    let mut locator = ExecutableLocator::from_config(&app_config.binary);
    if binary.embedded || binary.bundled_dir.is_some() {
        locator = locator.with_bundled(binary.bundled_dir.clone());
    }
    if let Some(path) = &binary.binary {
        locator = locator.with_explicit_path(path);
    }

    let mut options = app_config.download;
    options.verbose |= binary.verbose_output;
    apply_overrides(&mut options, overrides);

    Ok(RunParams { locator, options })
}

/// Layers command line flags over the options loaded from the config file.
///
/// Flags only ever switch things on; a blank numeric value switches the option off.
fn apply_overrides(options: &mut DownloadOptions, overrides: DownloadOverrides) {
    let DownloadOverrides {
        urls,
        output,
        proxy_url,
        socket_timeout,
        rate_limit,
        rate_limit_unit,
        retries,
        no_overwrites,
        continue_downloads,
        no_continue,
        username,
        password,
        two_factor,
        video_password,
        extract_audio,
        audio_format,
        audio_quality,
        custom_audio_quality,
        keep_video,
        no_post_overwrites,
        embed_subs,
        embed_thumbnail,
        add_metadata,
        xattrs,
        fixup,
        exec_command,
        ignore_config,
        abort_on_error,
    } = overrides;

    if !urls.is_empty() {
        options.urls = urls;
    }

    if let Some(text) = socket_timeout {
        options.socket_timeout =
            parse_lenient("socket_timeout", &text, DEFAULT_MALFORMED_SOCKET_TIMEOUT);
    }
    if let Some(text) = rate_limit {
        options.rate_limit = parse_lenient("rate_limit", &text, DEFAULT_MALFORMED_RATE_LIMIT);
    }
    if let Some(text) = retries {
        options.retries = parse_lenient("retries", &text, DEFAULT_MALFORMED_RETRIES);
    }
    if let Some(text) = custom_audio_quality {
        options.custom_audio_quality = parse_lenient(
            "custom_audio_quality",
            &text,
            DEFAULT_MALFORMED_CUSTOM_AUDIO_QUALITY,
        )
        .unwrap_or(DEFAULT_MALFORMED_CUSTOM_AUDIO_QUALITY);
    }

    for (target, value) in [
        (&mut options.output, output),
        (&mut options.proxy_url, proxy_url),
        (&mut options.username, username),
        (&mut options.password, password),
        (&mut options.two_factor, two_factor),
        (&mut options.video_password, video_password),
        (&mut options.exec_command, exec_command),
    ] {
        if value.is_some() {
            *target = value;
        }
    }

    if let Some(unit) = rate_limit_unit {
        options.rate_limit_unit = unit;
    }
    if audio_format.is_some() {
        options.audio_format = audio_format;
    }
    if audio_quality.is_some() {
        options.audio_quality = audio_quality;
    }
    if fixup.is_some() {
        options.fixup = fixup;
    }

    options.no_overwrites |= no_overwrites;
    options.continue_downloads |= continue_downloads;
    options.no_continue |= no_continue;
    options.extract_audio |= extract_audio;
    options.keep_video |= keep_video;
    options.no_post_overwrites |= no_post_overwrites;
    options.embed_subs |= embed_subs;
    options.embed_thumbnail |= embed_thumbnail;
    options.add_metadata |= add_metadata;
    options.xattrs |= xattrs;
    options.ignore_config |= ignore_config;
    options.abort_on_error |= abort_on_error;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{AudioFormat, ByteUnit};
    use std::io::Write;

    fn download(overrides: DownloadOverrides) -> Command {
        Command::Download {
            binary: BinarySelection::default(),
            overrides,
        }
    }

    fn with_url() -> DownloadOverrides {
        DownloadOverrides {
            urls: vec!["https://example.com/watch?v=abc".to_string()],
            ..Default::default()
        }
    }

    fn resolved_options(command: Command) -> DownloadOptions {
        match resolve_command(command).unwrap() {
            ResolvedCommand::Download(params)
            | ResolvedCommand::Update(params)
            | ResolvedCommand::ShowCommand(params) => params.options,
        }
    }

    #[test]
    fn test_download_without_urls_is_rejected() {
        let result = resolve_command(download(DownloadOverrides::default()));

        assert!(matches!(
            result,
            Err(YtdlError::CliArgumentValidation { .. })
        ));
    }

    #[test]
    fn test_show_command_without_urls_is_allowed() {
        let command = Command::ShowCommand {
            binary: BinarySelection::default(),
            overrides: DownloadOverrides::default(),
        };

        assert!(matches!(
            resolve_command(command),
            Ok(ResolvedCommand::ShowCommand(_))
        ));
    }

    #[test]
    fn test_lenient_numbers() {
        let options = resolved_options(download(DownloadOverrides {
            retries: Some("-1".to_string()),
            socket_timeout: Some("soon".to_string()),
            rate_limit: Some("   ".to_string()),
            custom_audio_quality: Some("abc".to_string()),
            ..with_url()
        }));

        assert_eq!(options.retries, Some(-1));
        assert_eq!(options.socket_timeout, Some(0));
        assert_eq!(options.rate_limit, None);
        assert_eq!(options.custom_audio_quality, 0);
    }

    #[test]
    fn test_update_sets_update_mode() {
        let command = Command::Update {
            binary: BinarySelection {
                verbose_output: true,
                ..Default::default()
            },
        };

        let options = resolved_options(command);
        assert!(options.update);
        assert!(options.verbose);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "binary:\n  use_bundled: true\ndownload:\n  retries: 5\n  rate_limit: 50\n  rate_limit_unit: K\n  audio_format: vorbis\n  embed_subs: true"
        )
        .unwrap();

        let command = Command::Download {
            binary: BinarySelection {
                config_path: Some(file.path().to_string_lossy().into_owned()),
                ..Default::default()
            },
            overrides: DownloadOverrides {
                retries: Some("7".to_string()),
                audio_format: Some(AudioFormat::Mp3),
                ..with_url()
            },
        };

        let options = resolved_options(command);
        assert_eq!(options.retries, Some(7));
        assert_eq!(options.rate_limit, Some(50.0));
        assert_eq!(options.rate_limit_unit, ByteUnit::K);
        assert_eq!(options.audio_format, Some(AudioFormat::Mp3));
        assert!(options.embed_subs);
        assert_eq!(options.urls, vec!["https://example.com/watch?v=abc"]);
    }

    #[test]
    fn test_batch_file_satisfies_url_requirement() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "download:\n  batch_file: urls.txt").unwrap();

        let command = Command::Download {
            binary: BinarySelection {
                config_path: Some(file.path().to_string_lossy().into_owned()),
                ..Default::default()
            },
            overrides: DownloadOverrides::default(),
        };

        let options = resolved_options(command);
        assert_eq!(options.batch_file.as_deref(), Some("urls.txt"));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let command = Command::Download {
            binary: BinarySelection {
                config_path: Some("/nonexistent/ytdlctl.yaml".to_string()),
                ..Default::default()
            },
            overrides: with_url(),
        };

        assert!(matches!(
            resolve_command(command),
            Err(YtdlError::Config(_))
        ));
    }
}
