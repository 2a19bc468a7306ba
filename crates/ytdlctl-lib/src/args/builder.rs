use crate::options::{CUSTOM_AUDIO_QUALITY_INDEX, DownloadOptions};

/// Accumulates youtube-dl arguments, skipping options that are switched off.
#[derive(Debug, Default)]
struct ArgumentList {
    args: Vec<String>,
}

impl ArgumentList {
    fn push(&mut self, arg: &str) {
        self.args.push(arg.to_string());
    }

    fn flag(&mut self, enabled: bool, flag: &str) {
        if enabled {
            self.push(flag);
        }
    }

    fn text(&mut self, flag: &str, value: Option<&str>) {
        if let Some(value) = non_blank(value) {
            self.value(flag, value);
        }
    }

    fn value(&mut self, flag: &str, value: impl ToString) {
        self.push(flag);
        self.args.push(value.to_string());
    }

    fn finish(self) -> Vec<String> {
        self.args
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Translates download options into the argument vector for youtube-dl.
///
/// The result is an argv, not a shell string: every value is a single element and is
/// never re-split or interpreted by a shell. URLs follow a `--` separator.
pub fn build_arguments(options: &DownloadOptions) -> Vec<String> {
    let mut args = ArgumentList::default();

    if options.update {
        args.flag(options.verbose, "--verbose");
        args.push("-U");
        return args.finish();
    }

    args.text("-o", options.output.as_deref());
    args.flag(options.verbose, "--verbose");
    args.flag(options.ignore_config, "--ignore-config");
    args.flag(options.abort_on_error, "--abort-on-error");
    args.flag(options.flat_playlist, "--flat-playlist");

    args.text("--proxy", options.proxy_url.as_deref());
    if let Some(timeout) = options.socket_timeout.filter(|t| *t != 0) {
        args.value("--socket-timeout", timeout);
    }
    args.text("--source-address", options.source_address.as_deref());
    if let Some(ip_version) = options.ip_version {
        args.push(ip_version.as_arg());
    }
    args.text(
        "--cn-verification-proxy",
        options.cn_verification_proxy.as_deref(),
    );

    if let Some(rate) = options.rate_limit.filter(|r| *r != 0.0) {
        args.value(
            "-r",
            format!("{}{}", rate, options.rate_limit_unit.as_suffix()),
        );
    }
    match options.retries {
        Some(retries) if retries < 0 => args.value("-R", "infinite"),
        Some(retries) => args.value("-R", retries),
        None => {}
    }
    if let Some(size) = options.buffer_size.filter(|s| *s != 0) {
        args.value(
            "--buffer-size",
            format!("{}{}", size, options.buffer_size_unit.as_suffix()),
        );
    }
    args.flag(options.no_resize_buffer, "--no-resize-buffer");
    args.flag(options.playlist_reverse, "--playlist-reverse");
    if let Some(downloader) = options.external_downloader {
        args.value("--external-downloader", downloader.as_arg());
        args.text(
            "--external-downloader-args",
            options.external_downloader_args.as_deref(),
        );
    }
    args.flag(options.xattr_set_filesize, "--xattr-set-filesize");
    args.flag(options.hls_prefer_native, "--hls-prefer-native");

    args.text("-a", options.batch_file.as_deref());
    args.flag(options.restrict_filenames, "--restrict-filenames");
    args.flag(options.no_overwrites, "-w");
    if options.continue_downloads {
        args.push("-c");
    } else {
        args.flag(options.no_continue, "--no-continue");
    }
    if let Some(format) = options.recode_video {
        args.value("--recode-video", format.as_arg());
    }

    if non_blank(options.username.as_deref()).is_some() {
        args.text("-u", options.username.as_deref());
        args.text("-p", options.password.as_deref());
        args.text("-2", options.two_factor.as_deref());
    }
    args.flag(options.netrc, "-n");
    args.text("--video-password", options.video_password.as_deref());

    if options.extract_audio {
        args.push("-x");
        if let Some(format) = options.audio_format {
            args.value("--audio-format", format.as_arg());
        }
        match options.audio_quality {
            Some(CUSTOM_AUDIO_QUALITY_INDEX) => args.value(
                "--audio-quality",
                format!("{}K", options.custom_audio_quality),
            ),
            Some(index) => args.value("--audio-quality", index),
            None => {}
        }
    }
    args.flag(options.keep_video, "-k");
    args.flag(options.no_post_overwrites, "--no-post-overwrites");
    args.flag(options.embed_subs, "--embed-subs");
    args.flag(options.embed_thumbnail, "--embed-thumbnail");
    args.flag(options.add_metadata, "--add-metadata");
    args.flag(options.xattrs, "--xattrs");
    if let Some(fixup) = options.fixup {
        args.value("--fixup", fixup.as_arg());
    }
    args.text("--exec", options.exec_command.as_deref());

    let urls: Vec<&String> = options
        .urls
        .iter()
        .filter(|url| !url.trim().is_empty())
        .collect();
    if !urls.is_empty() {
        args.push("--");
        for url in urls {
            args.push(url);
        }
    }

    args.finish()
}
