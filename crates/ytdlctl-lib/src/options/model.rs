use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Everything youtube-dl needs to know about a single invocation.
///
/// Every field is off by default; [`crate::args::build_arguments`] only emits a flag
/// for options that are switched on.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DownloadOptions {
    /// Video, playlist or channel URLs, passed after `--`
    pub urls: Vec<String>,
    /// Run youtube-dl's self-update (`-U`) instead of downloading
    pub update: bool,
    pub verbose: bool,
    pub ignore_config: bool,
    pub abort_on_error: bool,
    pub flat_playlist: bool,

    // Network
    pub proxy_url: Option<String>,
    /// Seconds to wait before giving up
    pub socket_timeout: Option<u32>,
    pub source_address: Option<String>,
    pub ip_version: Option<IpVersion>,
    pub cn_verification_proxy: Option<String>,

    // Download
    pub rate_limit: Option<f64>,
    pub rate_limit_unit: ByteUnit,
    /// Negative means retry forever
    pub retries: Option<i32>,
    pub buffer_size: Option<u32>,
    pub buffer_size_unit: ByteUnit,
    pub no_resize_buffer: bool,
    pub playlist_reverse: bool,
    pub external_downloader: Option<ExternalDownloader>,
    pub external_downloader_args: Option<String>,
    pub xattr_set_filesize: bool,
    pub hls_prefer_native: bool,

    // Filesystem
    pub batch_file: Option<String>,
    /// Output filename template
    pub output: Option<String>,
    pub restrict_filenames: bool,
    pub no_overwrites: bool,
    pub continue_downloads: bool,
    pub no_continue: bool,

    // Authentication
    pub username: Option<String>,
    pub password: Option<String>,
    pub two_factor: Option<String>,
    pub netrc: bool,
    pub video_password: Option<String>,

    // Post-processing
    pub extract_audio: bool,
    pub audio_format: Option<AudioFormat>,
    /// VBR quality index 0-9 (0 is best); 10 selects `custom_audio_quality` instead
    pub audio_quality: Option<u8>,
    /// Constant bitrate in kbit/s, used when `audio_quality` is 10
    pub custom_audio_quality: u32,
    pub recode_video: Option<VideoFormat>,
    pub keep_video: bool,
    pub no_post_overwrites: bool,
    pub embed_subs: bool,
    pub embed_thumbnail: bool,
    pub add_metadata: bool,
    pub xattrs: bool,
    pub fixup: Option<FixupPolicy>,
    /// Command run on each downloaded file, `{}` is replaced by the file name
    pub exec_command: Option<String>,
}

/// Audio quality index that switches to a constant bitrate.
pub const CUSTOM_AUDIO_QUALITY_INDEX: u8 = 10;

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Best,
    Aac,
    Vorbis,
    Mp3,
    M4a,
    Opus,
    Wav,
}

impl AudioFormat {
    pub fn as_arg(&self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::Aac => "aac",
            Self::Vorbis => "vorbis",
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Opus => "opus",
            Self::Wav => "wav",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
pub enum ByteUnit {
    #[default]
    B,
    K,
    M,
}

impl ByteUnit {
    /// youtube-dl parses byte counts as a number with an optional `k`/`M`/... suffix,
    /// so plain bytes get no suffix at all.
    pub fn as_suffix(&self) -> &'static str {
        match self {
            Self::B => "",
            Self::K => "K",
            Self::M => "M",
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExternalDownloader {
    Aria2c,
    Curl,
    Wget,
}

impl ExternalDownloader {
    pub fn as_arg(&self) -> &'static str {
        match self {
            Self::Aria2c => "aria2c",
            Self::Curl => "curl",
            Self::Wget => "wget",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FixupPolicy {
    Never,
    Warn,
    #[default]
    #[value(name = "detect_or_warn", alias = "detect-or-warn")]
    DetectOrWarn,
}

impl FixupPolicy {
    pub fn as_arg(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Warn => "warn",
            Self::DetectOrWarn => "detect_or_warn",
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    Mp4,
    Flv,
    Ogg,
    Webm,
    Mkv,
    Avi,
}

impl VideoFormat {
    pub fn as_arg(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Flv => "flv",
            Self::Ogg => "ogg",
            Self::Webm => "webm",
            Self::Mkv => "mkv",
            Self::Avi => "avi",
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum IpVersion {
    #[serde(rename = "ipv4")]
    V4,
    #[serde(rename = "ipv6")]
    V6,
}

impl IpVersion {
    pub fn as_arg(&self) -> &'static str {
        match self {
            Self::V4 => "-4",
            Self::V6 => "-6",
        }
    }
}
